//! Cleanup of SAP-exported values: locale amounts, account codes, document keys.

use std::num::ParseFloatError;
use std::sync::OnceLock;

use regex::Regex;

use crate::model::Value;

/// Width of a normalized general-ledger account code.
pub const ACCOUNT_WIDTH: usize = 6;

/// Parse a German-locale amount (`1.234,56`) into a float.
///
/// Periods are thousands separators and are dropped, the comma is the
/// decimal mark. Empty input is a missing value. SAP list exports put the
/// sign after the number (`1.000,00-`); that form is accepted too.
pub fn parse_locale_amount(raw: &str) -> Result<Option<f64>, ParseFloatError> {
    let cleaned = raw.replace('.', "").replace(',', ".");
    let cleaned = cleaned.trim();
    if cleaned.is_empty() {
        return Ok(None);
    }

    let n = match cleaned.strip_suffix('-') {
        Some(body) if !body.is_empty() && !body.starts_with('-') => -body.trim_end().parse::<f64>()?,
        _ => cleaned.parse::<f64>()?,
    };

    // "nan" parses, but counts as missing
    if n.is_nan() {
        Ok(None)
    } else {
        Ok(Some(n))
    }
}

/// Amount for any cell. Numeric workbook cells are already floats.
pub fn normalize_amount(value: &Value) -> Result<Option<f64>, ParseFloatError> {
    match value {
        Value::Empty => Ok(None),
        Value::Number(n) if n.is_nan() => Ok(None),
        Value::Number(n) => Ok(Some(*n)),
        Value::Text(s) => parse_locale_amount(s),
    }
}

fn account_digits() -> &'static Regex {
    static DIGITS: OnceLock<Regex> = OnceLock::new();
    DIGITS.get_or_init(|| Regex::new(r"\d+").expect("static digit pattern"))
}

/// First run of decimal digits, left-padded with zeros to [`ACCOUNT_WIDTH`].
///
/// `None` when the value has no digits at all; such rows never join.
pub fn normalize_account(value: &Value) -> Option<String> {
    let text = value.as_text();
    let digits = account_digits().find(&text)?;
    Some(format!("{:0>width$}", digits.as_str(), width = ACCOUNT_WIDTH))
}

/// Join key for document numbers.
///
/// Trimmed; purely numeric keys lose their leading zeros so that `0000100017`
/// in one export matches `100017` in the other. Empty keys are `None`.
pub fn document_key(value: &Value) -> Option<String> {
    let text = value.as_text();
    let key = text.trim();
    if key.is_empty() {
        return None;
    }
    if key.bytes().all(|b| b.is_ascii_digit()) {
        let stripped = key.trim_start_matches('0');
        return Some(if stripped.is_empty() { "0".to_string() } else { stripped.to_string() });
    }
    Some(key.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn text(s: &str) -> Value {
        Value::from_text(s)
    }

    #[test]
    fn locale_amounts() {
        assert_eq!(parse_locale_amount("1.234,56").unwrap(), Some(1234.56));
        assert_eq!(parse_locale_amount("").unwrap(), None);
        assert_eq!(parse_locale_amount("12,5").unwrap(), Some(12.5));
        assert_eq!(parse_locale_amount("  -1.000.000,00 ").unwrap(), Some(-1_000_000.0));
        assert_eq!(parse_locale_amount("   ").unwrap(), None);
        assert_eq!(parse_locale_amount("42").unwrap(), Some(42.0));
    }

    #[test]
    fn trailing_minus() {
        assert_eq!(parse_locale_amount("1.000,00-").unwrap(), Some(-1000.0));
        assert_eq!(parse_locale_amount("5,5 -").unwrap(), Some(-5.5));
        assert!(parse_locale_amount("-").is_err());
        assert!(parse_locale_amount("-5-").is_err());
    }

    #[test]
    fn garbage_amount_is_error() {
        assert!(parse_locale_amount("EUR 12").is_err());
        assert!(parse_locale_amount("1,2,3").is_err());
    }

    #[test]
    fn nan_is_missing() {
        assert_eq!(parse_locale_amount("nan").unwrap(), None);
        assert_eq!(normalize_amount(&Value::Number(f64::NAN)).unwrap(), None);
    }

    #[test]
    fn numeric_cells_skip_locale_cleanup() {
        // 1234.56 as a workbook number must not lose its decimal point
        assert_eq!(normalize_amount(&Value::Number(1234.56)).unwrap(), Some(1234.56));
        assert_eq!(normalize_amount(&Value::Empty).unwrap(), None);
        assert_eq!(normalize_amount(&text("1.500,00")).unwrap(), Some(1500.0));
    }

    #[test]
    fn account_codes() {
        assert_eq!(normalize_account(&text("100")), Some("000100".into()));
        assert_eq!(normalize_account(&text("GL 4711 / 12")), Some("004711".into()));
        assert_eq!(normalize_account(&text("1234567")), Some("1234567".into()));
        assert_eq!(normalize_account(&Value::Number(100.0)), Some("000100".into()));
        assert_eq!(normalize_account(&text("Summe")), None);
        assert_eq!(normalize_account(&Value::Empty), None);
    }

    #[test]
    fn account_digits_beyond_ascii() {
        // Fullwidth "100", as pasted from some Asian-locale exports
        assert_eq!(
            normalize_account(&text("\u{FF11}\u{FF10}\u{FF10}")),
            Some("000\u{FF11}\u{FF10}\u{FF10}".into())
        );
        assert_eq!(normalize_account(&text("Konto \u{0661}\u{0662}")), Some("0000\u{0661}\u{0662}".into()));
    }

    #[test]
    fn account_normalization_is_idempotent() {
        for raw in ["100", "000100", "  7 ", "x9y", "123456"] {
            let once = normalize_account(&text(raw)).unwrap();
            let twice = normalize_account(&text(&once)).unwrap();
            assert_eq!(once, twice);
        }
    }

    #[test]
    fn document_keys() {
        assert_eq!(document_key(&text(" 0000100017 ")), Some("100017".into()));
        assert_eq!(document_key(&text("100017")), Some("100017".into()));
        assert_eq!(document_key(&text("000")), Some("0".into()));
        assert_eq!(document_key(&text("A-17")), Some("A-17".into()));
        assert_eq!(document_key(&text("  ")), None);
        assert_eq!(document_key(&Value::Number(17.0)), Some("17".into()));
    }
}
