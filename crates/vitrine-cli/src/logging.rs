//! Log subscriber setup
//!
//! `RUST_LOG` wins when set; otherwise the verbosity picks the directive.
//! Logs go to stderr so stdout stays clean for listings and YAML.

use crate::commands::LogFormat;
use crate::config::Verbosity;
use tracing_subscriber::EnvFilter;

/// Filter for a verbosity, honouring `RUST_LOG`
#[must_use]
pub fn env_filter(verbosity: Verbosity) -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(verbosity.log_directive()))
}

/// Install the global subscriber. A second call is a no-op.
pub fn init_logging(format: LogFormat, verbosity: Verbosity, color: bool) {
    let builder = tracing_subscriber::fmt()
        .with_env_filter(env_filter(verbosity))
        .with_writer(std::io::stderr)
        .with_target(verbosity.is_verbose());
    let installed = match format {
        LogFormat::Text => builder.with_ansi(color).try_init(),
        LogFormat::Json => builder.json().with_current_span(false).try_init(),
    };
    if installed.is_err() {
        tracing::debug!("log subscriber already installed");
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;

    #[test]
    fn test_filter_follows_verbosity() {
        if std::env::var_os("RUST_LOG").is_some() {
            return;
        }
        assert_eq!(env_filter(Verbosity::Normal).to_string(), "vitrine=info");
        assert_eq!(env_filter(Verbosity::Verbose).to_string(), "vitrine=debug");
    }

    #[test]
    fn test_init_twice_is_harmless() {
        init_logging(LogFormat::Json, Verbosity::Quiet, false);
        init_logging(LogFormat::Text, Verbosity::Normal, false);
    }
}
