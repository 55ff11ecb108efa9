//! `saprecon run` / `saprecon check` — config-driven SAP balance reconciliation.

use std::path::{Path, PathBuf};

use log::info;

use saprecon_recon::model::{ComparisonRow, ReconResult};
use saprecon_recon::ReconConfig;

use crate::exit_codes::{recon_exit_code, EXIT_IO, EXIT_RECON_MISMATCH};
use crate::CliError;

fn recon_err(err: saprecon_recon::ReconError) -> CliError {
    CliError { code: recon_exit_code(&err), message: err.to_string(), hint: None }
}

fn io_err(msg: impl Into<String>) -> CliError {
    CliError { code: EXIT_IO, message: msg.into(), hint: None }
}

/// Output paths from the config resolve against the config file's directory.
fn base_dir(config_path: &Path) -> &Path {
    config_path.parent().unwrap_or_else(|| Path::new("."))
}

fn load_config(config_path: &Path) -> Result<ReconConfig, CliError> {
    ReconConfig::from_path(config_path).map_err(|e| {
        let err = recon_err(e);
        err.with_hint("see `saprecon run --help` for the config layout")
    })
}

pub fn cmd_check(config_path: PathBuf) -> Result<(), CliError> {
    let config = load_config(&config_path)?;
    let dir = base_dir(&config_path);

    eprintln!("config '{}' is valid", config.name);
    eprintln!("  line items: {}", dir.join(&config.sources.line_items).display());
    eprintln!("  headers:    {}", dir.join(&config.sources.headers).display());
    eprintln!("  summary:    {}", dir.join(&config.sources.summary).display());
    Ok(())
}

pub fn cmd_run(
    config_path: PathBuf,
    json_output: bool,
    output_file: Option<PathBuf>,
    export_file: Option<PathBuf>,
    strict: bool,
) -> Result<(), CliError> {
    let mut config = load_config(&config_path)?;
    if strict {
        config.strict = true;
    }
    let dir = base_dir(&config_path);
    info!("running '{}' from {}", config.name, config_path.display());

    let sources = saprecon_io::load_sources(&config, dir).map_err(recon_err)?;
    let result = saprecon_recon::run(&config, &sources).map_err(recon_err)?;

    // Export only when asked for, by flag or config
    let export_path = export_file.or_else(|| config.output.workbook.as_ref().map(|p| dir.join(p)));
    if let Some(ref path) = export_path {
        let export = saprecon_io::export_workbook(&result, &config.columns, path)
            .map_err(|e| io_err(format!("cannot write {}: {e}", path.display())))?;
        eprintln!("wrote {} ({})", path.display(), export.summary());
    }

    let json_path = output_file.or_else(|| config.output.json.as_ref().map(|p| dir.join(p)));
    if json_output || json_path.is_some() {
        let json_str = result.to_json_pretty().map_err(recon_err)?;
        if let Some(ref path) = json_path {
            std::fs::write(path, &json_str)
                .map_err(|e| io_err(format!("cannot write output: {e}")))?;
            eprintln!("wrote {}", path.display());
        }
        if json_output {
            println!("{json_str}");
        }
    }

    if !json_output {
        print_comparison(&result, &config);
    }
    print_summary(&result);

    if !result.summary.is_balanced() {
        return Err(CliError { code: EXIT_RECON_MISMATCH, message: mismatch_message(&result), hint: None });
    }

    Ok(())
}

fn mismatch_message(result: &ReconResult) -> String {
    let s = &result.summary;
    format!(
        "mismatches found: {} mismatched, {} without computed balance",
        s.mismatched, s.missing_computed
    )
}

fn fmt_amount(value: Option<f64>) -> String {
    match value {
        Some(n) => format!("{n:.2}"),
        None => "-".into(),
    }
}

fn comparison_line(row: &ComparisonRow) -> String {
    format!(
        "{:<10} {:>18} {:>18} {:>18}",
        row.account.as_deref().unwrap_or("-"),
        fmt_amount(row.computed),
        fmt_amount(row.reference),
        fmt_amount(row.difference),
    )
}

fn print_comparison(result: &ReconResult, config: &ReconConfig) {
    let columns = &config.columns;
    println!(
        "{:<10} {:>18} {:>18} {:>18}",
        columns.account,
        format!("{}_computed", columns.reference_balance),
        columns.reference_balance,
        "difference"
    );
    for row in &result.comparison {
        println!("{}", comparison_line(row));
    }
}

/// Human summary to stderr.
fn print_summary(result: &ReconResult) {
    let load = &result.load;
    eprintln!(
        "merged {} rows from {} line items and {} headers ({} malformed line(s) skipped)",
        result.merged_rows, load.line_items, load.headers, load.skipped_line_items
    );

    let v = &result.validation;
    if v.is_complete() {
        eprintln!("validation: no unmatched records");
    } else {
        eprintln!(
            "validation: {} line item(s) without header, {} header(s) without line items",
            v.line_items_without_header, v.headers_without_line_items
        );
    }

    let s = &result.summary;
    eprintln!(
        "{} account(s): {} balanced, {} mismatched, {} without computed balance, {} unreadable",
        s.rows, s.balanced, s.mismatched, s.missing_computed, s.unreadable
    );
}
