//! # tabsplit CLI
//!
//! Command-line front end over `tabsplit-core`.
//!
//! ## Architecture
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                          tabsplit CLI                                   │
//! │                                                                         │
//! │  main.rs ─────► calls run()                                             │
//! │                                                                         │
//! │  lib.rs ──────► tracing, argument parsing, config, exit status          │
//! │                                                                         │
//! │  bill.rs ─────► bill.json ──► Session                                   │
//! │                                                                         │
//! │  commands.rs ─► split, check                                            │
//! │                                                                         │
//! │  render.rs ───► text breakdown                                          │
//! │                                                                         │
//! │  config.rs ───► TABSPLIT_* environment + flags                          │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Output Streams
//! - stdout: the breakdown or JSON report, nothing else
//! - stderr: logs and errors (JSON `ErrorReport` with `--format json`)

pub mod bill;
pub mod commands;
pub mod config;
pub mod error;
pub mod render;

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use tracing::debug;
use tracing_subscriber::EnvFilter;

use commands::OutputFormat;
use config::CliConfig;
use error::{AppResult, ErrorReport};

/// Split a restaurant bill by what each person actually had.
#[derive(Parser)]
#[command(name = "tabsplit", version)]
pub struct Cli {
    /// Debug logging for tabsplit crates (overridden by RUST_LOG)
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand)]
pub enum Command {
    /// Compute every participant's share of a bill file
    Split {
        /// Path to the bill JSON file
        path: PathBuf,

        /// Output format
        #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
        format: OutputFormat,

        /// Currency symbol for text output
        #[arg(long)]
        currency: Option<String>,

        /// Decimal places for text output (0-6)
        #[arg(
            long,
            value_parser = clap::value_parser!(u8).range(0..=i64::from(config::MAX_DECIMALS))
        )]
        decimals: Option<u8>,

        /// Fail if any line item is not assigned to anyone
        #[arg(long)]
        strict: bool,

        /// Print totals only, without item lines
        #[arg(long)]
        no_items: bool,
    },

    /// List line items that are not fully assigned
    Check {
        /// Path to the bill JSON file
        path: PathBuf,
    },
}

impl Command {
    fn output_format(&self) -> OutputFormat {
        match self {
            Command::Split { format, .. } => *format,
            Command::Check { .. } => OutputFormat::Text,
        }
    }
}

/// Parses arguments, runs the command and maps the outcome to an exit
/// status.
pub fn run() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let format = cli.command.output_format();
    match execute(cli.command) {
        Ok(output) => {
            print!("{output}");
            ExitCode::SUCCESS
        }
        Err(err) => {
            debug!(code = ?err.code(), "Command failed");
            if format == OutputFormat::Json {
                let report = ErrorReport::from(&err);
                match serde_json::to_string(&report) {
                    Ok(json) => eprintln!("{json}"),
                    Err(_) => eprintln!("{err}"),
                }
            } else {
                eprintln!("error: {err}");
            }
            ExitCode::from(err.exit_code())
        }
    }
}

/// Runs one command with configuration resolved from the environment.
pub fn execute(command: Command) -> AppResult<String> {
    let mut config = CliConfig::from_env()?;

    match command {
        Command::Split {
            path,
            format,
            currency,
            decimals,
            strict,
            no_items,
        } => {
            if let Some(symbol) = currency {
                config.currency_symbol = symbol;
            }
            if let Some(decimals) = decimals {
                config.decimals = decimals;
            }
            if strict {
                config.fail_on_unassigned = true;
            }
            if no_items {
                config.show_items = false;
            }
            debug!(?config, ?format, "Running split");
            commands::split(&path, format, &config)
        }
        Command::Check { path } => {
            debug!(?config, "Running check");
            let report = commands::check(&path, &config)?;
            // The listing is useful even when the check fails
            if report.unassigned > 0 {
                eprint!("{}", report.text);
            }
            report.status()?;
            Ok(report.text)
        }
    }
}

/// Initializes the tracing subscriber on stderr.
///
/// ## Log Levels
/// - Default: INFO
/// - `-v`: DEBUG for tabsplit crates
/// - `RUST_LOG` overrides both
fn init_tracing(verbose: bool) {
    let default = if verbose { "info,tabsplit=debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));

    // A second init (e.g. from a test harness) is not an error worth reporting
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_split_flags() {
        let cli = Cli::try_parse_from([
            "tabsplit",
            "split",
            "bill.json",
            "--format",
            "json",
            "--currency",
            "₹",
            "--strict",
        ])
        .unwrap();

        assert!(!cli.verbose);
        assert_eq!(cli.command.output_format(), OutputFormat::Json);
        match cli.command {
            Command::Split {
                path,
                currency,
                strict,
                no_items,
                ..
            } => {
                assert_eq!(path, PathBuf::from("bill.json"));
                assert_eq!(currency.as_deref(), Some("₹"));
                assert!(strict);
                assert!(!no_items);
            }
            Command::Check { .. } => panic!("expected split"),
        }
    }

    #[test]
    fn test_parse_check() {
        let cli = Cli::try_parse_from(["tabsplit", "-v", "check", "bill.json"]).unwrap();
        assert!(cli.verbose);
        assert!(matches!(cli.command, Command::Check { .. }));
    }

    #[test]
    fn test_decimals_flag_is_range_checked() {
        let cli =
            Cli::try_parse_from(["tabsplit", "split", "bill.json", "--decimals", "3"]).unwrap();
        assert!(matches!(cli.command, Command::Split { decimals: Some(3), .. }));

        for bad in ["12", "-1", "two"] {
            let parsed = Cli::try_parse_from(["tabsplit", "split", "bill.json", "--decimals", bad]);
            assert!(parsed.is_err(), "--decimals {bad} was accepted");
        }
    }
}
