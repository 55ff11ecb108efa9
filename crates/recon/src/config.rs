use std::path::Path;

use encoding_rs::Encoding;
use serde::Deserialize;

use crate::error::ReconError;
use crate::model::normalize_header;

// ---------------------------------------------------------------------------
// Top-level config
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Deserialize)]
pub struct ReconConfig {
    pub name: String,
    /// Fail the run when validation finds orphan rows.
    #[serde(default)]
    pub strict: bool,
    pub sources: SourcesConfig,
    #[serde(default)]
    pub columns: ColumnConfig,
    #[serde(default)]
    pub tolerance: ToleranceConfig,
    #[serde(default)]
    pub output: OutputConfig,
}

// ---------------------------------------------------------------------------
// Sources
// ---------------------------------------------------------------------------

/// Input files. Relative paths resolve against the config file's directory.
#[derive(Debug, Clone, Deserialize)]
pub struct SourcesConfig {
    /// BSEG export, malformed rows skipped.
    pub line_items: String,
    /// BKPF export, strict.
    pub headers: String,
    /// Summary balance sheet workbook.
    pub summary: String,
    #[serde(default = "default_delimiter")]
    pub delimiter: String,
    #[serde(default = "default_encoding")]
    pub encoding: String,
    /// Sheet to read from the summary workbook; first sheet when unset.
    #[serde(default)]
    pub summary_sheet: Option<String>,
}

fn default_delimiter() -> String {
    "|".into()
}

fn default_encoding() -> String {
    "latin1".into()
}

impl SourcesConfig {
    pub fn new(line_items: impl Into<String>, headers: impl Into<String>, summary: impl Into<String>) -> Self {
        Self {
            line_items: line_items.into(),
            headers: headers.into(),
            summary: summary.into(),
            delimiter: default_delimiter(),
            encoding: default_encoding(),
            summary_sheet: None,
        }
    }

    pub fn delimiter_byte(&self) -> Result<u8, ReconError> {
        match self.delimiter.as_bytes() {
            [b] if b.is_ascii() => Ok(*b),
            _ => Err(ReconError::ConfigValidation(format!(
                "delimiter must be a single ASCII character, got {:?}",
                self.delimiter
            ))),
        }
    }

    /// True ISO-8859-1 labels. These decode byte-for-byte, without the
    /// windows-1252 remapping of 0x80..=0x9F that WHATWG applies to them.
    pub fn is_latin1(&self) -> bool {
        const LABELS: &[&str] = &[
            "latin1", "latin-1", "latin_1", "l1", "iso-8859-1", "iso8859-1", "iso_8859-1", "iso88591",
            "iso_8859-1:1987", "iso-ir-100", "cp819", "ibm819", "csisolatin1",
        ];
        let label = self.encoding.trim().to_ascii_lowercase();
        LABELS.contains(&label.as_str())
    }

    /// Encoding for a WHATWG label. `latin1` maps to windows-1252 here; see
    /// [`SourcesConfig::is_latin1`].
    pub fn text_encoding(&self) -> Result<&'static Encoding, ReconError> {
        Encoding::for_label(self.encoding.trim().as_bytes()).ok_or_else(|| {
            ReconError::ConfigValidation(format!("unknown encoding label: {:?}", self.encoding))
        })
    }
}

// ---------------------------------------------------------------------------
// Column names
// ---------------------------------------------------------------------------

/// Column names, matched after header normalization (trim + lowercase).
#[derive(Debug, Clone, Deserialize)]
pub struct ColumnConfig {
    #[serde(default = "default_document_key")]
    pub document_key: String,
    #[serde(default = "default_amount")]
    pub amount: String,
    #[serde(default = "default_account")]
    pub account: String,
    #[serde(default = "default_reference_balance")]
    pub reference_balance: String,
}

fn default_document_key() -> String {
    "belegnr".into()
}

fn default_amount() -> String {
    "betrag hauswähr".into()
}

fn default_account() -> String {
    "hauptbuch".into()
}

fn default_reference_balance() -> String {
    "endsaldo".into()
}

impl Default for ColumnConfig {
    fn default() -> Self {
        Self {
            document_key: default_document_key(),
            amount: default_amount(),
            account: default_account(),
            reference_balance: default_reference_balance(),
        }
    }
}

impl ColumnConfig {
    fn normalize(&mut self) {
        for name in [
            &mut self.document_key,
            &mut self.amount,
            &mut self.account,
            &mut self.reference_balance,
        ] {
            *name = normalize_header(name);
        }
    }
}

// ---------------------------------------------------------------------------
// Tolerance + Output
// ---------------------------------------------------------------------------

/// Largest absolute difference still counted as balanced.
#[derive(Debug, Clone, Deserialize)]
pub struct ToleranceConfig {
    #[serde(default = "default_tolerance")]
    pub amount: f64,
}

fn default_tolerance() -> f64 {
    0.005
}

impl Default for ToleranceConfig {
    fn default() -> Self {
        Self {
            amount: default_tolerance(),
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct OutputConfig {
    #[serde(default)]
    pub workbook: Option<String>,
    #[serde(default)]
    pub json: Option<String>,
}

// ---------------------------------------------------------------------------
// Parse + Validate
// ---------------------------------------------------------------------------

impl ReconConfig {
    /// Config with default columns, tolerance and no outputs.
    pub fn new(name: impl Into<String>, sources: SourcesConfig) -> Self {
        Self {
            name: name.into(),
            strict: false,
            sources,
            columns: ColumnConfig::default(),
            tolerance: ToleranceConfig::default(),
            output: OutputConfig::default(),
        }
    }

    pub fn from_toml(input: &str) -> Result<Self, ReconError> {
        let mut config: ReconConfig =
            toml::from_str(input).map_err(|e| ReconError::ConfigParse(e.to_string()))?;
        config.columns.normalize();
        config.validate()?;
        Ok(config)
    }

    pub fn from_path(path: &Path) -> Result<Self, ReconError> {
        let input = std::fs::read_to_string(path)
            .map_err(|e| ReconError::Io(format!("cannot read {}: {e}", path.display())))?;
        Self::from_toml(&input)
    }

    pub fn validate(&self) -> Result<(), ReconError> {
        for (field, value) in [
            ("sources.line_items", &self.sources.line_items),
            ("sources.headers", &self.sources.headers),
            ("sources.summary", &self.sources.summary),
        ] {
            if value.trim().is_empty() {
                return Err(ReconError::ConfigValidation(format!("{field} must not be empty")));
            }
        }

        self.sources.delimiter_byte()?;
        self.sources.text_encoding()?;

        for (field, value) in [
            ("columns.document_key", &self.columns.document_key),
            ("columns.amount", &self.columns.amount),
            ("columns.account", &self.columns.account),
            ("columns.reference_balance", &self.columns.reference_balance),
        ] {
            if value.is_empty() {
                return Err(ReconError::ConfigValidation(format!("{field} must not be empty")));
            }
        }

        if !(self.tolerance.amount >= 0.0) {
            return Err(ReconError::ConfigValidation(format!(
                "tolerance.amount must be >= 0, got {}",
                self.tolerance.amount
            )));
        }

        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
