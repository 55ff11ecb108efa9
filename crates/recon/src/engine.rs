use log::info;

use crate::compare::{compare, summarize};
use crate::config::ReconConfig;
use crate::error::ReconError;
use crate::join::{merge, validate};
use crate::model::{LoadSummary, ReconMeta, ReconResult, SourceTables};

/// Run merge → validate → compare over loaded tables.
pub fn run(config: &ReconConfig, sources: &SourceTables) -> Result<ReconResult, ReconError> {
    let columns = &config.columns;
    let key = columns.document_key.as_str();

    let merged = merge(&sources.line_items, &sources.headers, key)?;

    let validation = validate(&sources.line_items, &sources.headers, key)?;
    if config.strict && !validation.is_complete() {
        return Err(ReconError::Incomplete {
            line_items_without_header: validation.line_items_without_header,
            headers_without_line_items: validation.headers_without_line_items,
        });
    }

    let comparison = compare(&merged, &sources.summary, columns)?;
    let summary = summarize(&comparison, config.tolerance.amount);
    info!(
        "{} account(s): {} balanced, {} mismatched, {} without computed balance",
        summary.rows, summary.balanced, summary.mismatched, summary.missing_computed
    );

    Ok(ReconResult {
        meta: ReconMeta {
            config_name: config.name.clone(),
            engine_version: env!("CARGO_PKG_VERSION").to_string(),
            run_at: chrono::Utc::now().to_rfc3339(),
        },
        load: LoadSummary {
            line_items: sources.line_items.len(),
            headers: sources.headers.len(),
            summary: sources.summary.len(),
            skipped_line_items: sources.skipped_line_items,
        },
        validation,
        merged_rows: merged.len(),
        merged,
        summary,
        comparison,
    })
}
