// Summary balance sheet import (xlsx, xls, xlsb, ods)

use std::path::Path;

use calamine::{open_workbook_auto, Data, Reader, Sheets};
use log::{debug, info};

use saprecon_recon::{Table, Value};

/// Table name for the summary balance sheet.
pub const SUMMARY_TABLE: &str = "summary";

/// Read one sheet of a workbook as a table. The first used row is the header.
///
/// `sheet` picks a sheet by name; `None` reads the first sheet. Rows that are
/// blank in every column are dropped.
pub fn load_summary(path: &Path, sheet: Option<&str>) -> Result<Table, String> {
    let mut workbook: Sheets<_> = open_workbook_auto(path)
        .map_err(|e| format!("Failed to open Excel file: {}", e))?;

    let sheet_names: Vec<String> = workbook.sheet_names().to_vec();
    let sheet_name = match sheet {
        Some(name) => sheet_names
            .iter()
            .find(|s| s.as_str() == name)
            .cloned()
            .ok_or_else(|| format!("sheet '{}' not found (available: {})", name, sheet_names.join(", ")))?,
        None => sheet_names
            .first()
            .cloned()
            .ok_or_else(|| "Excel file contains no sheets".to_string())?,
    };

    let range = workbook
        .worksheet_range(&sheet_name)
        .map_err(|e| format!("Failed to read sheet '{}': {}", sheet_name, e))?;

    let mut rows = range.rows();
    let Some(header_row) = rows.next() else {
        return Ok(Table::new(SUMMARY_TABLE, Vec::new()));
    };

    let headers: Vec<String> = header_row
        .iter()
        .enumerate()
        .map(|(col, cell)| match cell_value(cell) {
            Value::Empty => format!("unnamed: {col}"),
            value => value.to_string(),
        })
        .collect();

    let mut table = Table::new(SUMMARY_TABLE, headers);
    for row in rows {
        let values: Vec<Value> = row.iter().map(cell_value).collect();
        if values.iter().all(Value::is_empty) {
            continue;
        }
        table.push_row(values);
    }

    debug!("summary columns: {:?}", table.columns());
    let (n_rows, n_cols) = table.shape();
    info!("summary balance loaded from '{sheet_name}': {n_rows} rows x {n_cols} columns");

    Ok(table)
}

fn cell_value(cell: &Data) -> Value {
    match cell {
        Data::Empty => Value::Empty,
        Data::String(s) => Value::from_text(s),
        Data::Float(n) => Value::Number(*n),
        Data::Int(n) => Value::Number(*n as f64),
        // TRUE/FALSE text, as spreadsheets display them
        Data::Bool(b) => Value::Text(if *b { "TRUE" } else { "FALSE" }.to_string()),
        Data::Error(e) => Value::Text(format!("#{:?}", e)),
        // Date cells keep their serial number
        Data::DateTime(dt) => Value::Number(dt.as_f64()),
        other => Value::from_text(&other.to_string()),
    }
}
