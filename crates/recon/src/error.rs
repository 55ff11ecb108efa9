use std::fmt;

#[derive(Debug)]
pub enum ReconError {
    /// TOML parse / deserialization error.
    ConfigParse(String),
    /// Config validation error (empty path, bad delimiter, unknown encoding, etc.).
    ConfigValidation(String),
    /// A source table could not be read or parsed.
    LoadFailed { table: String, reason: String },
    /// Missing required column in a table.
    MissingColumn { table: String, column: String },
    /// Amount cell that is not a number after locale cleanup.
    /// `row` is 1-based and excludes the header row.
    AmountParse { table: String, row: usize, value: String },
    /// Orphan rows found while `strict` is set.
    Incomplete { line_items_without_header: usize, headers_without_line_items: usize },
    /// IO error (file read, etc.).
    Io(String),
}

impl fmt::Display for ReconError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ConfigParse(msg) => write!(f, "config parse error: {msg}"),
            Self::ConfigValidation(msg) => write!(f, "config validation error: {msg}"),
            Self::LoadFailed { table, reason } => write!(f, "failed to load {table}: {reason}"),
            Self::MissingColumn { table, column } => {
                write!(f, "table '{table}': missing column '{column}'")
            }
            Self::AmountParse { table, row, value } => {
                write!(f, "table '{table}', row {row}: cannot parse amount '{value}'")
            }
            Self::Incomplete { line_items_without_header, headers_without_line_items } => write!(
                f,
                "export incomplete: {line_items_without_header} line item(s) without header, \
                 {headers_without_line_items} header(s) without line items"
            ),
            Self::Io(msg) => write!(f, "IO error: {msg}"),
        }
    }
}

impl std::error::Error for ReconError {}
