//! Vitrine CLI Library
//!
//! Command-line front end for the Vitrine scenario harness: argument
//! parsing, configuration layering, log setup, suite execution and
//! result rendering. The `vitrine` binary is a thin wrapper over this.

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![warn(clippy::nursery)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_errors_doc)]

mod commands;
mod config;
mod error;
pub mod logging;
mod output;
mod runner;

pub use commands::{
    Cli, ColorArg, Commands, ConfigArgs, ConfigSource, ListArgs, LogFormat, RunArgs, SuiteArg,
};
pub use config::{resolve_test_config, resolve_with, CliConfig, ColorChoice, Verbosity};
pub use error::{CliError, CliResult, EXIT_CONFIG, EXIT_FAILURES, EXIT_OK};
pub use logging::init_logging;
pub use output::Printer;
pub use runner::{select_scenarios, verdict, write_report, SuiteRunner};
