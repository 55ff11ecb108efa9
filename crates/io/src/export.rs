// Result workbook export

use std::path::Path;
use std::time::Instant;

use log::info;
use rust_xlsxwriter::{Format, Workbook as XlsxWorkbook, Worksheet};

use saprecon_recon::config::ColumnConfig;
use saprecon_recon::{ComparisonRow, ReconResult, Table, Value};

/// Sheet holding the full merged BSEG/BKPF record set.
pub const MERGED_SHEET: &str = "AnalyzedData";
/// Sheet holding the per-account comparison.
pub const COMPARISON_SHEET: &str = "BalancedComparison";

/// Excel's hard row limit, header included.
const MAX_ROWS: usize = 1_048_576;

#[derive(Debug, Default)]
pub struct ExportResult {
    pub sheets_exported: usize,
    pub cells_exported: usize,
    pub export_duration_ms: u128,
}

impl ExportResult {
    pub fn summary(&self) -> String {
        format!(
            "{} sheet(s), {} cell(s) in {}ms",
            self.sheets_exported, self.cells_exported, self.export_duration_ms
        )
    }
}

/// Write the merged table and the comparison to a two-sheet xlsx workbook.
pub fn export_workbook(result: &ReconResult, columns: &ColumnConfig, path: &Path) -> Result<ExportResult, String> {
    let start_time = Instant::now();
    let mut export = ExportResult::default();

    if result.merged.len() + 1 > MAX_ROWS {
        return Err(format!(
            "merged data has {} rows, more than an Excel sheet can hold",
            result.merged.len()
        ));
    }

    let header = Format::new().set_bold();
    let mut xlsx_workbook = XlsxWorkbook::new();

    let worksheet = xlsx_workbook
        .add_worksheet()
        .set_name(MERGED_SHEET)
        .map_err(|e| format!("Failed to create sheet '{}': {}", MERGED_SHEET, e))?;
    export.cells_exported += write_table(worksheet, &result.merged, &header)?;
    export.sheets_exported += 1;

    let worksheet = xlsx_workbook
        .add_worksheet()
        .set_name(COMPARISON_SHEET)
        .map_err(|e| format!("Failed to create sheet '{}': {}", COMPARISON_SHEET, e))?;
    export.cells_exported += write_comparison(worksheet, &result.comparison, columns, &header)?;
    export.sheets_exported += 1;

    xlsx_workbook
        .save(path)
        .map_err(|e| format!("Failed to save XLSX file: {}", e))?;

    export.export_duration_ms = start_time.elapsed().as_millis();
    info!("exported results to {}: {}", path.display(), export.summary());
    Ok(export)
}

fn write_header(worksheet: &mut Worksheet, names: &[&str], format: &Format) -> Result<usize, String> {
    for (col, name) in names.iter().enumerate() {
        worksheet
            .write_string_with_format(0, col as u16, *name, format)
            .map_err(|e| format!("Failed to write header '{}': {}", name, e))?;
    }
    worksheet
        .set_freeze_panes(1, 0)
        .map_err(|e| format!("Failed to freeze header row: {}", e))?;
    Ok(names.len())
}

fn write_number(worksheet: &mut Worksheet, row: u32, col: u16, value: Option<f64>) -> Result<usize, String> {
    match value {
        Some(n) if n.is_finite() => {
            worksheet
                .write_number(row, col, n)
                .map_err(|e| format!("Failed to write cell ({}, {}): {}", row, col, e))?;
            Ok(1)
        }
        _ => Ok(0),
    }
}

fn write_table(worksheet: &mut Worksheet, table: &Table, header: &Format) -> Result<usize, String> {
    let names: Vec<&str> = table.columns().iter().map(String::as_str).collect();
    let mut cells = write_header(worksheet, &names, header)?;

    for (row_idx, row) in table.rows().iter().enumerate() {
        let target_row = (row_idx + 1) as u32;
        for (col_idx, value) in row.iter().enumerate() {
            let target_col = col_idx as u16;
            match value {
                Value::Empty => {}
                Value::Number(n) => cells += write_number(worksheet, target_row, target_col, Some(*n))?,
                Value::Text(s) => {
                    worksheet
                        .write_string(target_row, target_col, s)
                        .map_err(|e| format!("Failed to write cell ({}, {}): {}", target_row, target_col, e))?;
                    cells += 1;
                }
            }
        }
    }

    Ok(cells)
}

fn write_comparison(
    worksheet: &mut Worksheet,
    rows: &[ComparisonRow],
    columns: &ColumnConfig,
    header: &Format,
) -> Result<usize, String> {
    let computed = format!("{}_computed", columns.reference_balance);
    let names = [
        columns.account.as_str(),
        computed.as_str(),
        columns.reference_balance.as_str(),
        "difference",
    ];
    let mut cells = write_header(worksheet, &names, header)?;

    for (idx, row) in rows.iter().enumerate() {
        let target_row = (idx + 1) as u32;
        if let Some(ref account) = row.account {
            worksheet
                .write_string(target_row, 0, account)
                .map_err(|e| format!("Failed to write cell ({}, 0): {}", target_row, e))?;
            cells += 1;
        }
        cells += write_number(worksheet, target_row, 1, row.computed)?;
        cells += write_number(worksheet, target_row, 2, row.reference)?;
        cells += write_number(worksheet, target_row, 3, row.difference)?;
    }

    Ok(cells)
}
