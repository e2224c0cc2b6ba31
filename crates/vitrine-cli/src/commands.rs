//! CLI command definitions using clap

use clap::{Args, Parser, Subcommand, ValueEnum};
use std::path::PathBuf;
use vitrine::scenario::Suite;

/// Vitrine: run storefront and back-office scenario suites against a live browser
#[derive(Parser, Debug)]
#[command(name = "vitrine")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Verbosity level (-v, -vv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Quiet mode (only failures and the summary)
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Color output (auto, always, never)
    #[arg(long, default_value = "auto", global = true)]
    pub color: ColorArg,

    /// Log line format
    #[arg(long, default_value = "text", global = true)]
    pub log_format: LogFormat,

    /// Subcommand to run
    #[command(subcommand)]
    pub command: Commands,
}

/// CLI subcommands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Run scenario suites
    Run(RunArgs),

    /// List scenarios without running them
    List(ListArgs),

    /// Print the effective configuration as YAML
    Config(ConfigArgs),
}

/// Configuration sources shared by every subcommand
#[derive(Args, Debug, Clone, Default)]
pub struct ConfigSource {
    /// YAML configuration file
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Storefront base URL (overrides file and environment)
    #[arg(long)]
    pub base_url: Option<String>,

    /// Show the browser window
    #[arg(long)]
    pub headed: bool,
}

/// Arguments for the run command
#[derive(Parser, Debug)]
pub struct RunArgs {
    /// Suite to run
    #[arg(short, long, default_value = "all")]
    pub suite: SuiteArg,

    /// Only scenarios whose id or description contains this text
    #[arg(short, long)]
    pub filter: Option<String>,

    /// Configuration sources
    #[command(flatten)]
    pub source: ConfigSource,

    /// Scenarios run concurrently, each with its own browser session
    #[arg(short, long, default_value = "1")]
    pub jobs: usize,

    /// Stop scheduling after the first FAIL or ERROR
    #[arg(long)]
    pub fail_fast: bool,

    /// Write the JSON report here
    #[arg(short, long)]
    pub report: Option<PathBuf>,
}

/// Arguments for the list command
#[derive(Parser, Debug)]
pub struct ListArgs {
    /// Suite to list
    #[arg(short, long, default_value = "all")]
    pub suite: SuiteArg,

    /// Only scenarios whose id or description contains this text
    #[arg(short, long)]
    pub filter: Option<String>,
}

/// Arguments for the config command
#[derive(Parser, Debug)]
pub struct ConfigArgs {
    /// Configuration sources
    #[command(flatten)]
    pub source: ConfigSource,
}

/// Suite selection
#[derive(ValueEnum, Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SuiteArg {
    /// Customer-facing storefront
    User,
    /// Admin back-office
    Admin,
    /// Both, storefront first
    #[default]
    All,
}

impl SuiteArg {
    /// Suites selected, in run order
    #[must_use]
    pub fn suites(self) -> Vec<Suite> {
        match self {
            Self::User => vec![Suite::User],
            Self::Admin => vec![Suite::Admin],
            Self::All => vec![Suite::User, Suite::Admin],
        }
    }

    /// Report label
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::User => "user",
            Self::Admin => "admin",
            Self::All => "all",
        }
    }
}

/// Log line format
#[derive(ValueEnum, Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum LogFormat {
    /// Human-readable lines
    #[default]
    Text,
    /// One JSON object per event
    Json,
}

/// Color argument
#[derive(ValueEnum, Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ColorArg {
    /// Automatic detection
    #[default]
    Auto,
    /// Always use colors
    Always,
    /// Never use colors
    Never,
}
