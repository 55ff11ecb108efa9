// Load all three inputs named by a recon config

use std::path::Path;

use saprecon_recon::{ReconConfig, ReconError, SourceTables};

use crate::text::{self, TextOptions, HEADERS_TABLE, LINE_ITEMS_TABLE};
use crate::workbook::{self, SUMMARY_TABLE};

/// Load line items, headers, and the summary sheet.
///
/// Paths in the config resolve against `base_dir`. Any failure names the
/// table it happened on; no stage runs on a partial set.
pub fn load_sources(config: &ReconConfig, base_dir: &Path) -> Result<SourceTables, ReconError> {
    let sources = &config.sources;
    let options = TextOptions::from_config(sources)?;

    let failed = |table: &str| {
        let table = table.to_string();
        move |reason: String| ReconError::LoadFailed { table, reason }
    };

    let line_items = text::load_line_items(&base_dir.join(&sources.line_items), &options)
        .map_err(failed(LINE_ITEMS_TABLE))?;
    let headers = text::load_headers(&base_dir.join(&sources.headers), &options)
        .map_err(failed(HEADERS_TABLE))?;
    let summary = workbook::load_summary(&base_dir.join(&sources.summary), sources.summary_sheet.as_deref())
        .map_err(failed(SUMMARY_TABLE))?;

    Ok(SourceTables {
        line_items: line_items.table,
        headers,
        summary,
        skipped_line_items: line_items.skipped,
    })
}
