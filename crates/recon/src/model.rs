use std::borrow::Cow;
use std::fmt;

use serde::Serialize;

use crate::error::ReconError;

// ---------------------------------------------------------------------------
// Cells + tables
// ---------------------------------------------------------------------------

/// A single cell as loaded from a source file.
///
/// Text tables only ever produce `Empty` and `Text`. `Number` comes from
/// numeric workbook cells, which are already typed and skip locale cleanup.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Empty,
    Text(String),
    Number(f64),
}

impl Value {
    /// Empty strings become `Empty`; anything else is kept verbatim.
    pub fn from_text(s: &str) -> Self {
        if s.is_empty() {
            Self::Empty
        } else {
            Self::Text(s.to_string())
        }
    }

    pub fn is_empty(&self) -> bool {
        matches!(self, Self::Empty)
    }

    /// Text rendering used by the normalizers and the exporter.
    pub fn as_text(&self) -> Cow<'_, str> {
        match self {
            Self::Empty => Cow::Borrowed(""),
            Self::Text(s) => Cow::Borrowed(s.as_str()),
            Self::Number(n) => Cow::Owned(format_number(*n)),
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.as_text())
    }
}

/// Integers without decimals, everything else in shortest round-trip form.
fn format_number(n: f64) -> String {
    if n.fract() == 0.0 && n.abs() < 1e15 {
        format!("{}", n as i64)
    } else {
        format!("{}", n)
    }
}

/// Trim + lowercase, applied to every header on load.
pub fn normalize_header(name: &str) -> String {
    name.trim().to_lowercase()
}

/// A loaded table: normalized column names plus rectangular rows.
#[derive(Debug, Clone, PartialEq)]
pub struct Table {
    name: String,
    columns: Vec<String>,
    rows: Vec<Vec<Value>>,
}

impl Table {
    /// Create an empty table. Column names are normalized with [`normalize_header`].
    pub fn new(name: impl Into<String>, columns: Vec<String>) -> Self {
        Self {
            name: name.into(),
            columns: columns.iter().map(|c| normalize_header(c)).collect(),
            rows: Vec::new(),
        }
    }

    /// Append a row, padding short rows with `Empty` and cutting long ones
    /// to the column count.
    pub fn push_row(&mut self, mut row: Vec<Value>) {
        row.resize(self.columns.len(), Value::Empty);
        self.rows.push(row);
    }

    /// Convenience for tests and fixtures: every cell is text.
    pub fn from_text_rows(name: &str, columns: &[&str], rows: &[&[&str]]) -> Self {
        let mut table = Self::new(name, columns.iter().map(|c| c.to_string()).collect());
        for row in rows {
            table.push_row(row.iter().map(|s| Value::from_text(s)).collect());
        }
        table
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn rows(&self) -> &[Vec<Value>] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// (rows, columns)
    pub fn shape(&self) -> (usize, usize) {
        (self.rows.len(), self.columns.len())
    }

    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|c| c == name)
    }

    pub fn has_column(&self, name: &str) -> bool {
        self.column_index(name).is_some()
    }

    pub fn require_column(&self, name: &str) -> Result<usize, ReconError> {
        self.column_index(name).ok_or_else(|| ReconError::MissingColumn {
            table: self.name.clone(),
            column: name.to_string(),
        })
    }

    /// Iterate one column top to bottom.
    pub fn column_values(&self, idx: usize) -> impl Iterator<Item = &Value> + '_ {
        self.rows.iter().map(move |row| &row[idx])
    }
}

/// The three inputs, loaded and ready for the pipeline.
#[derive(Debug, Clone)]
pub struct SourceTables {
    pub line_items: Table,
    pub headers: Table,
    pub summary: Table,
    /// Malformed line-item rows dropped by the loader.
    pub skipped_line_items: usize,
}

// ---------------------------------------------------------------------------
// Validation
// ---------------------------------------------------------------------------

/// Outer-join diagnostics between line items and headers. Advisory only.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ValidationReport {
    pub line_items_without_header: usize,
    pub headers_without_line_items: usize,
    pub null_keys_line_items: usize,
    pub null_keys_headers: usize,
}

impl ValidationReport {
    pub fn is_complete(&self) -> bool {
        self.line_items_without_header == 0 && self.headers_without_line_items == 0
    }
}

// ---------------------------------------------------------------------------
// Comparison
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ComparisonRow {
    /// 0-based position in the summary sheet.
    pub order: usize,
    pub account: Option<String>,
    pub computed: Option<f64>,
    pub reference: Option<f64>,
    pub difference: Option<f64>,
}

impl ComparisonRow {
    pub fn status(&self, tolerance: f64) -> RowStatus {
        if self.account.is_none() || self.reference.is_none() {
            return RowStatus::Unreadable;
        }
        match self.difference {
            None => RowStatus::MissingComputed,
            Some(d) if d.abs() <= tolerance => RowStatus::Balanced,
            Some(_) => RowStatus::Mismatch,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RowStatus {
    Balanced,
    Mismatch,
    MissingComputed,
    Unreadable,
}

impl fmt::Display for RowStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Balanced => write!(f, "balanced"),
            Self::Mismatch => write!(f, "mismatch"),
            Self::MissingComputed => write!(f, "missing_computed"),
            Self::Unreadable => write!(f, "unreadable"),
        }
    }
}

// ---------------------------------------------------------------------------
// Summary + Output
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ComparisonSummary {
    pub rows: usize,
    pub balanced: usize,
    pub mismatched: usize,
    pub missing_computed: usize,
    pub unreadable: usize,
}

impl ComparisonSummary {
    /// No account differs or lacks a computed balance. Unreadable summary
    /// rows (headings, subtotals without an account) don't count against it.
    pub fn is_balanced(&self) -> bool {
        self.mismatched == 0 && self.missing_computed == 0
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct LoadSummary {
    pub line_items: usize,
    pub headers: usize,
    pub summary: usize,
    pub skipped_line_items: usize,
}

#[derive(Debug, Clone, Serialize)]
pub struct ReconMeta {
    pub config_name: String,
    pub engine_version: String,
    pub run_at: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct ReconResult {
    pub meta: ReconMeta,
    pub load: LoadSummary,
    pub validation: ValidationReport,
    pub merged_rows: usize,
    #[serde(skip)]
    pub merged: Table,
    pub summary: ComparisonSummary,
    pub comparison: Vec<ComparisonRow>,
}

impl ReconResult {
    pub fn to_json_pretty(&self) -> Result<String, ReconError> {
        serde_json::to_string_pretty(self)
            .map_err(|e| ReconError::Io(format!("JSON serialization error: {e}")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn headers_are_trimmed_and_lowercased() {
        let table = Table::new("bseg", vec!["  BELEGNR ".into(), "Betrag Hauswähr".into()]);
        assert_eq!(table.columns(), &["belegnr", "betrag hauswähr"]);
        assert_eq!(table.column_index("betrag hauswähr"), Some(1));
    }

    #[test]
    fn short_rows_are_padded() {
        let table = Table::from_text_rows("t", &["a", "b", "c"], &[&["1"]]);
        assert_eq!(table.rows()[0], vec![Value::Text("1".into()), Value::Empty, Value::Empty]);
        assert_eq!(table.shape(), (1, 3));
    }

    #[test]
    fn require_column_names_table() {
        let table = Table::from_text_rows("bkpf", &["gjahr"], &[]);
        let err = table.require_column("belegnr").unwrap_err();
        assert_eq!(err.to_string(), "table 'bkpf': missing column 'belegnr'");
    }

    #[test]
    fn unreadable_rows_do_not_unbalance() {
        let mut summary = ComparisonSummary { rows: 3, balanced: 2, unreadable: 1, ..Default::default() };
        assert!(summary.is_balanced());
        summary.missing_computed = 1;
        assert!(!summary.is_balanced());
        summary.missing_computed = 0;
        summary.mismatched = 1;
        assert!(!summary.is_balanced());
    }

    #[test]
    fn number_text_rendering() {
        assert_eq!(Value::Number(100.0).as_text(), "100");
        assert_eq!(Value::Number(12.5).as_text(), "12.5");
        assert_eq!(Value::Empty.as_text(), "");
    }

    #[test]
    fn row_status() {
        let mut row = ComparisonRow {
            order: 0,
            account: Some("000100".into()),
            computed: Some(10.0),
            reference: Some(10.0),
            difference: Some(0.0),
        };
        assert_eq!(row.status(0.0), RowStatus::Balanced);
        row.difference = Some(0.004);
        assert_eq!(row.status(0.005), RowStatus::Balanced);
        assert_eq!(row.status(0.0), RowStatus::Mismatch);
        row.computed = None;
        row.difference = None;
        assert_eq!(row.status(0.005), RowStatus::MissingComputed);
        row.account = None;
        assert_eq!(row.status(0.005), RowStatus::Unreadable);
    }
}
