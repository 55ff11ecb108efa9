// Delimited SAP text exports (BSEG / BKPF)

use std::io::Read;
use std::path::Path;

use encoding_rs::Encoding;
use log::{debug, info, warn};

use saprecon_recon::config::SourcesConfig;
use saprecon_recon::{ReconError, Table, Value};

/// Table name for the line-item export.
pub const LINE_ITEMS_TABLE: &str = "BSEG";
/// Table name for the document header export.
pub const HEADERS_TABLE: &str = "BKPF";

/// What to do with a row that has more fields than the header.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RowPolicy {
    /// Drop the row and count it.
    SkipMalformed,
    /// Fail the whole import.
    Strict,
}

/// How raw file bytes become text.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Decoding {
    /// ISO-8859-1: each byte is the code point of the same value. No BOM sniffing.
    Latin1,
    /// Any other `encoding_rs` encoding; a BOM, if present, wins.
    Encoding(&'static Encoding),
}

#[derive(Debug, Clone, Copy)]
pub struct TextOptions {
    pub delimiter: u8,
    pub decoding: Decoding,
}

impl Default for TextOptions {
    fn default() -> Self {
        Self {
            delimiter: b'|',
            decoding: Decoding::Latin1,
        }
    }
}

impl TextOptions {
    pub fn from_config(sources: &SourcesConfig) -> Result<Self, ReconError> {
        let encoding = sources.text_encoding()?;
        Ok(Self {
            delimiter: sources.delimiter_byte()?,
            decoding: if sources.is_latin1() { Decoding::Latin1 } else { Decoding::Encoding(encoding) },
        })
    }
}

/// A parsed text table plus the number of malformed rows dropped.
#[derive(Debug)]
pub struct TextImport {
    pub table: Table,
    pub skipped: usize,
}

/// Read a file and decode it to UTF-8.
pub fn read_file_decoded(path: &Path, decoding: Decoding) -> Result<String, String> {
    let mut file = std::fs::File::open(path).map_err(|e| format!("{}: {}", path.display(), e))?;
    let mut bytes = Vec::new();
    file.read_to_end(&mut bytes).map_err(|e| format!("{}: {}", path.display(), e))?;

    match decoding {
        Decoding::Latin1 => Ok(encoding_rs::mem::decode_latin1(&bytes).into_owned()),
        Decoding::Encoding(encoding) => {
            let (decoded, used, had_errors) = encoding.decode(&bytes);
            if had_errors {
                warn!("{}: invalid {} sequences replaced", path.display(), used.name());
            }
            Ok(decoded.into_owned())
        }
    }
}

pub fn import(path: &Path, table_name: &str, options: &TextOptions, policy: RowPolicy) -> Result<TextImport, String> {
    let content = read_file_decoded(path, options.decoding)?;
    import_from_string(table_name, &content, options.delimiter, policy)
}

/// Parse delimited text with a header row.
///
/// Short rows are padded with empty cells. Long rows are dropped or fatal
/// depending on `policy`. Blank lines are ignored.
pub fn import_from_string(
    table_name: &str,
    content: &str,
    delimiter: u8,
    policy: RowPolicy,
) -> Result<TextImport, String> {
    let mut reader = csv::ReaderBuilder::new()
        .delimiter(delimiter)
        .has_headers(true)
        .flexible(true)
        .from_reader(content.as_bytes());

    let headers: Vec<String> = reader
        .headers()
        .map_err(|e| e.to_string())?
        .iter()
        .map(|h| h.to_string())
        .collect();
    let width = headers.len();

    let mut table = Table::new(table_name, headers);
    let mut skipped = 0usize;

    for result in reader.records() {
        let record = result.map_err(|e| e.to_string())?;
        let line = record.position().map(|p| p.line()).unwrap_or(0);

        if record.len() > width {
            match policy {
                RowPolicy::SkipMalformed => {
                    debug!("{table_name}: skipping line {line}, expected {width} fields, saw {}", record.len());
                    skipped += 1;
                    continue;
                }
                RowPolicy::Strict => {
                    return Err(format!("line {line}: expected {width} fields, saw {}", record.len()));
                }
            }
        }

        table.push_row(record.iter().map(Value::from_text).collect());
    }

    if skipped > 0 {
        warn!("{table_name}: skipped {skipped} malformed line(s)");
    }
    debug!("{table_name} columns: {:?}", table.columns());
    let (rows, cols) = table.shape();
    info!("{table_name} loaded: {rows} rows x {cols} columns");

    Ok(TextImport { table, skipped })
}

/// BSEG: malformed rows are skipped.
pub fn load_line_items(path: &Path, options: &TextOptions) -> Result<TextImport, String> {
    import(path, LINE_ITEMS_TABLE, options, RowPolicy::SkipMalformed)
}

/// BKPF: any malformed row fails the load.
pub fn load_headers(path: &Path, options: &TextOptions) -> Result<Table, String> {
    import(path, HEADERS_TABLE, options, RowPolicy::Strict).map(|import| import.table)
}
