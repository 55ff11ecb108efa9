// saprecon CLI - SAP BSEG/BKPF balance reconciliation (headless)

mod exit_codes;
mod recon;

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};

use exit_codes::EXIT_SUCCESS;

#[derive(Parser)]
#[command(name = "saprecon")]
#[command(about = "Reconcile SAP BSEG/BKPF exports against a summary balance sheet")]
#[command(version)]
#[command(long_version = long_version())]
struct Cli {
    /// Only log warnings and errors (RUST_LOG overrides)
    #[arg(long, short = 'q', global = true)]
    quiet: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the reconciliation described by a TOML config file
    #[command(after_help = "\
Config layout (paths relative to the config file):
  name = \"Berger & Co FY2024\"
  [sources]
  line_items = \"BSEG.csv\"
  headers = \"BKPF.txt\"
  summary = \"Susa_BergerUndCo.xlsx\"

Examples:
  saprecon run sap.recon.toml
  saprecon run sap.recon.toml --export Abstimmung.xlsx
  saprecon run sap.recon.toml --json --strict")]
    Run {
        /// Path to the .recon.toml config file
        config: PathBuf,

        /// Output JSON to stdout instead of the comparison table
        #[arg(long)]
        json: bool,

        /// Write JSON output to file
        #[arg(long)]
        output: Option<PathBuf>,

        /// Write merged data and comparison to an xlsx workbook
        #[arg(long)]
        export: Option<PathBuf>,

        /// Fail when line items or headers have no counterpart
        #[arg(long)]
        strict: bool,
    },

    /// Validate a recon config without running
    #[command(after_help = "\
Examples:
  saprecon check sap.recon.toml")]
    Check {
        /// Path to the .recon.toml config file
        config: PathBuf,
    },
}

fn long_version() -> &'static str {
    if cfg!(debug_assertions) {
        concat!(
            env!("CARGO_PKG_VERSION"), " (", env!("SAPRECON_COMMIT"), ")",
            "\ntarget:  ", env!("SAPRECON_TARGET"),
            "\nbuild:   debug",
        )
    } else {
        concat!(
            env!("CARGO_PKG_VERSION"), " (", env!("SAPRECON_COMMIT"), ")",
            "\ntarget:  ", env!("SAPRECON_TARGET"),
            "\nbuild:   release",
        )
    }
}

fn init_logging(quiet: bool) {
    let default_level = if quiet { "warn" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_level))
        .format_timestamp(None)
        .init();
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging(cli.quiet);

    let result = match cli.command {
        Commands::Run { config, json, output, export, strict } => {
            recon::cmd_run(config, json, output, export, strict)
        }
        Commands::Check { config } => recon::cmd_check(config),
    };

    match result {
        Ok(()) => ExitCode::from(EXIT_SUCCESS),
        Err(CliError { code, message, hint }) => {
            if !message.is_empty() {
                eprintln!("error: {}", message);
            }
            if let Some(hint) = hint {
                eprintln!("hint:  {}", hint);
            }
            ExitCode::from(code)
        }
    }
}

#[derive(Debug)]
pub struct CliError {
    pub code: u8,
    pub message: String,
    pub hint: Option<String>,
}

impl CliError {
    /// Add a hint to an existing error.
    pub fn with_hint(mut self, hint: impl Into<String>) -> Self {
        self.hint = Some(hint.into());
        self
    }
}
