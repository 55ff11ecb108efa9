//! CLI Exit Code Registry
//!
//! This is the single source of truth for all CLI exit codes.
//! Exit codes are part of the shell contract — scripts rely on them.
//!
//! | Code | Meaning                                                   |
//! |------|-----------------------------------------------------------|
//! | 0    | Every summary account balanced                            |
//! | 1    | Reconciled, but at least one account does not balance    |
//! | 2    | Usage error (bad args, invalid config)                    |
//! | 3    | IO error (a source table could not be loaded or written)  |
//! | 4    | Data error (missing column, unparseable amount)           |
//! | 5    | Orphan rows found with `--strict`                         |

use saprecon_recon::ReconError;

/// Success - all accounts balanced.
pub const EXIT_SUCCESS: u8 = 0;

/// Differences found. Like `diff(1)`, exit 1 means "inputs differ."
pub const EXIT_RECON_MISMATCH: u8 = 1;

/// Usage error - bad arguments, invalid config.
pub const EXIT_USAGE: u8 = 2;

/// Source file unreadable, or output could not be written.
pub const EXIT_IO: u8 = 3;

/// Required column missing or amount unparseable.
pub const EXIT_DATA: u8 = 4;

/// `--strict` and validation found unmatched documents.
pub const EXIT_INCOMPLETE: u8 = 5;

/// Map an engine error to its exit code.
pub fn recon_exit_code(err: &ReconError) -> u8 {
    match err {
        ReconError::ConfigParse(_) | ReconError::ConfigValidation(_) => EXIT_USAGE,
        ReconError::LoadFailed { .. } | ReconError::Io(_) => EXIT_IO,
        ReconError::MissingColumn { .. } | ReconError::AmountParse { .. } => EXIT_DATA,
        ReconError::Incomplete { .. } => EXIT_INCOMPLETE,
    }
}
