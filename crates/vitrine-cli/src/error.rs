//! Error types for the CLI

use thiserror::Error;
use vitrine::VitrineError;

/// Result type for CLI operations
pub type CliResult<T> = Result<T, CliError>;

/// Exit status when every scenario passed or skipped
pub const EXIT_OK: u8 = 0;
/// Exit status when a scenario failed or errored
pub const EXIT_FAILURES: u8 = 1;
/// Exit status for configuration and usage problems
pub const EXIT_CONFIG: u8 = 2;

/// Errors that can occur in the CLI
#[derive(Debug, Error)]
pub enum CliError {
    /// Configuration error
    #[error("Configuration error: {message}")]
    Config {
        /// Error message
        message: String,
    },

    /// At least one scenario failed or errored
    #[error("{failed} failed, {errored} errored")]
    ScenarioFailures {
        /// FAIL count
        failed: usize,
        /// ERROR count
        errored: usize,
    },

    /// IO error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Vitrine library error
    #[error("Vitrine error: {0}")]
    Vitrine(#[from] VitrineError),

    /// Invalid argument
    #[error("Invalid argument: {message}")]
    InvalidArgument {
        /// Error message
        message: String,
    },

    /// Report generation error
    #[error("Report generation failed: {message}")]
    ReportGeneration {
        /// Error message
        message: String,
    },
}

impl CliError {
    /// Create a configuration error
    #[must_use]
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config {
            message: message.into(),
        }
    }

    /// Create an invalid argument error
    #[must_use]
    pub fn invalid_argument(message: impl Into<String>) -> Self {
        Self::InvalidArgument {
            message: message.into(),
        }
    }

    /// Create a report generation error
    #[must_use]
    pub fn report_generation(message: impl Into<String>) -> Self {
        Self::ReportGeneration {
            message: message.into(),
        }
    }

    /// Process exit status for this error
    #[must_use]
    pub const fn exit_code(&self) -> u8 {
        match self {
            Self::Config { .. }
            | Self::InvalidArgument { .. }
            | Self::Vitrine(VitrineError::Config { .. } | VitrineError::Yaml(_)) => EXIT_CONFIG,
            _ => EXIT_FAILURES,
        }
    }
}
