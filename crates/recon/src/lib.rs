//! `saprecon-recon` — SAP BSEG/BKPF balance reconciliation engine.
//!
//! Pure engine crate: receives pre-loaded tables, returns the merged data and
//! the per-account comparison. No CLI or file format dependencies.

pub mod aggregate;
pub mod compare;
pub mod config;
pub mod engine;
pub mod error;
pub mod join;
pub mod model;
pub mod normalize;

pub use config::ReconConfig;
pub use engine::run;
pub use error::ReconError;
pub use model::{ComparisonRow, ReconResult, SourceTables, Table, ValidationReport, Value};
