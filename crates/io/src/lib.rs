// File I/O operations

pub mod export;
pub mod sources;
pub mod text;
pub mod workbook;

pub use export::{export_workbook, ExportResult};
pub use sources::load_sources;
