use std::collections::{HashMap, HashSet};

use log::{info, warn};

use crate::error::ReconError;
use crate::model::{Table, ValidationReport};
use crate::normalize::document_key;

/// Name of the merged table in errors and logs.
pub const MERGED_TABLE: &str = "merged";

/// Row indices per document key. Rows with an empty key are left out.
fn index_by_key(table: &Table, key_idx: usize) -> HashMap<String, Vec<usize>> {
    let mut index: HashMap<String, Vec<usize>> = HashMap::new();
    for (row_idx, row) in table.rows().iter().enumerate() {
        if let Some(key) = document_key(&row[key_idx]) {
            index.entry(key).or_default().push(row_idx);
        }
    }
    index
}

/// Inner join of line items and headers on `key`.
///
/// Output follows line-item order; a line item with several headers yields
/// one row per header. The key column appears once. Other columns present
/// on both sides get `_x` (line items) and `_y` (headers) suffixes.
pub fn merge(line_items: &Table, headers: &Table, key: &str) -> Result<Table, ReconError> {
    let left_key = line_items.require_column(key)?;
    let right_key = headers.require_column(key)?;

    let right_cols: Vec<usize> = (0..headers.columns().len()).filter(|&i| i != right_key).collect();
    let right_names: HashSet<&str> = right_cols.iter().map(|&i| headers.columns()[i].as_str()).collect();
    let left_names: HashSet<&str> = line_items
        .columns()
        .iter()
        .enumerate()
        .filter(|&(i, _)| i != left_key)
        .map(|(_, c)| c.as_str())
        .collect();

    let mut columns: Vec<String> = Vec::with_capacity(line_items.columns().len() + right_cols.len());
    for (i, name) in line_items.columns().iter().enumerate() {
        if i != left_key && right_names.contains(name.as_str()) {
            columns.push(format!("{name}_x"));
        } else {
            columns.push(name.clone());
        }
    }
    for &i in &right_cols {
        let name = &headers.columns()[i];
        if left_names.contains(name.as_str()) {
            columns.push(format!("{name}_y"));
        } else {
            columns.push(name.clone());
        }
    }

    let header_index = index_by_key(headers, right_key);
    let mut merged = Table::new(MERGED_TABLE, columns);

    for row in line_items.rows() {
        let Some(k) = document_key(&row[left_key]) else {
            continue;
        };
        let Some(matches) = header_index.get(&k) else {
            continue;
        };
        for &h in matches {
            let header_row = &headers.rows()[h];
            let mut out = row.clone();
            out.extend(right_cols.iter().map(|&i| header_row[i].clone()));
            merged.push_row(out);
        }
    }

    info!("merged data: {} rows x {} columns", merged.len(), merged.columns().len());
    Ok(merged)
}

/// Outer-join diagnostics: orphan line items and orphan headers.
///
/// Computed independently of [`merge`]; advisory only. Rows with an empty
/// key are counted as null keys and as unmatched on their side.
pub fn validate(line_items: &Table, headers: &Table, key: &str) -> Result<ValidationReport, ReconError> {
    let left_key = line_items.require_column(key)?;
    let right_key = headers.require_column(key)?;

    let left_index = index_by_key(line_items, left_key);
    let right_index = index_by_key(headers, right_key);

    let mut report = ValidationReport::default();

    for value in line_items.column_values(left_key) {
        match document_key(value) {
            None => {
                report.null_keys_line_items += 1;
                report.line_items_without_header += 1;
            }
            Some(k) if !right_index.contains_key(&k) => report.line_items_without_header += 1,
            Some(_) => {}
        }
    }

    for value in headers.column_values(right_key) {
        match document_key(value) {
            None => {
                report.null_keys_headers += 1;
                report.headers_without_line_items += 1;
            }
            Some(k) if !left_index.contains_key(&k) => report.headers_without_line_items += 1,
            Some(_) => {}
        }
    }

    if report.null_keys_line_items > 0 {
        warn!(
            "missing key(s) in {}: {} '{key}' values are empty",
            line_items.name(),
            report.null_keys_line_items
        );
    }
    if report.null_keys_headers > 0 {
        warn!(
            "missing key(s) in {}: {} '{key}' values are empty",
            headers.name(),
            report.null_keys_headers
        );
    }
    if report.line_items_without_header > 0 {
        warn!(
            "{} {} line(s) without {} header",
            report.line_items_without_header,
            line_items.name(),
            headers.name()
        );
    }
    if report.headers_without_line_items > 0 {
        warn!(
            "{} {} header(s) without {} lines",
            report.headers_without_line_items,
            headers.name(),
            line_items.name()
        );
    }
    if report.is_complete() {
        info!("no unmatched records found, export is complete");
    }

    Ok(report)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Value;

    fn bseg() -> Table {
        Table::from_text_rows(
            "BSEG",
            &["belegnr", "hauptbuch", "bukrs"],
            &[&["1", "100", "1000"], &["2", "200", "1000"], &["3", "300", "1000"]],
        )
    }

    fn bkpf() -> Table {
        Table::from_text_rows(
            "BKPF",
            &["BELEGNR", "gjahr", "bukrs"],
            &[&["2", "2024", "1000"], &["1", "2024", "1000"], &["9", "2024", "2000"]],
        )
    }

    #[test]
    fn merge_keeps_intersection_in_line_item_order() {
        let merged = merge(&bseg(), &bkpf(), "belegnr").unwrap();
        assert_eq!(merged.columns(), &["belegnr", "hauptbuch", "bukrs_x", "gjahr", "bukrs_y"]);
        assert_eq!(merged.len(), 2);
        assert_eq!(merged.rows()[0][0], Value::Text("1".into()));
        assert_eq!(merged.rows()[1][0], Value::Text("2".into()));
        assert_eq!(merged.rows()[1][3], Value::Text("2024".into()));
    }

    #[test]
    fn merge_fans_out_duplicate_headers() {
        let headers = Table::from_text_rows("BKPF", &["belegnr", "gjahr"], &[&["1", "2023"], &["1", "2024"]]);
        let merged = merge(&bseg(), &headers, "belegnr").unwrap();
        assert_eq!(merged.len(), 2);
        assert_eq!(merged.rows()[0][3], Value::Text("2023".into()));
        assert_eq!(merged.rows()[1][3], Value::Text("2024".into()));
    }

    #[test]
    fn merge_matches_zero_padded_keys() {
        let items = Table::from_text_rows("BSEG", &["belegnr", "hauptbuch"], &[&["0000000001", "100"]]);
        let merged = merge(&items, &bkpf(), "belegnr").unwrap();
        assert_eq!(merged.len(), 1);
    }

    #[test]
    fn merge_drops_empty_keys() {
        let items = Table::from_text_rows("BSEG", &["belegnr", "hauptbuch"], &[&["", "100"]]);
        let headers = Table::from_text_rows("BKPF", &["belegnr"], &[&[""]]);
        assert!(merge(&items, &headers, "belegnr").unwrap().is_empty());
    }

    #[test]
    fn merge_requires_key_on_both_sides() {
        let headers = Table::from_text_rows("BKPF", &["gjahr"], &[]);
        let err = merge(&bseg(), &headers, "belegnr").unwrap_err();
        assert!(matches!(err, ReconError::MissingColumn { ref table, .. } if table == "BKPF"));
    }

    #[test]
    fn validate_reports_orphans_both_ways() {
        let report = validate(&bseg(), &bkpf(), "belegnr").unwrap();
        assert_eq!(report.line_items_without_header, 1);
        assert_eq!(report.headers_without_line_items, 1);
        assert!(!report.is_complete());
    }

    #[test]
    fn validate_complete() {
        let headers = Table::from_text_rows("BKPF", &["belegnr"], &[&["1"], &["2"], &["3"]]);
        let report = validate(&bseg(), &headers, "belegnr").unwrap();
        assert!(report.is_complete());
        assert_eq!(report, ValidationReport::default());
    }

    #[test]
    fn validate_counts_null_keys_as_unmatched() {
        let items = Table::from_text_rows("BSEG", &["belegnr"], &[&["1"], &[""]]);
        let headers = Table::from_text_rows("BKPF", &["belegnr"], &[&["1"], &[" "]]);
        let report = validate(&items, &headers, "belegnr").unwrap();
        assert_eq!(report.null_keys_line_items, 1);
        assert_eq!(report.null_keys_headers, 1);
        assert_eq!(report.line_items_without_header, 1);
        assert_eq!(report.headers_without_line_items, 1);
    }
}
