//! CLI configuration

use crate::commands::{Cli, ColorArg, ConfigSource, LogFormat};
use crate::error::CliResult;
use serde::{Deserialize, Serialize};
use vitrine::TestConfig;

/// CLI verbosity level
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Verbosity {
    /// Quiet - failures and summary only
    Quiet,
    /// Normal - default output
    #[default]
    Normal,
    /// Verbose - extra output
    Verbose,
    /// Debug - maximum output
    Debug,
}

impl Verbosity {
    /// Derive from the `-q` flag and the `-v` count
    #[must_use]
    pub const fn from_flags(quiet: bool, verbose: u8) -> Self {
        match (quiet, verbose) {
            (true, _) => Self::Quiet,
            (false, 0) => Self::Normal,
            (false, 1) => Self::Verbose,
            _ => Self::Debug,
        }
    }

    /// Check if quiet mode
    #[must_use]
    pub const fn is_quiet(self) -> bool {
        matches!(self, Self::Quiet)
    }

    /// Check if verbose or higher
    #[must_use]
    pub const fn is_verbose(self) -> bool {
        matches!(self, Self::Verbose | Self::Debug)
    }

    /// Default `tracing` directive for this level
    #[must_use]
    pub const fn log_directive(self) -> &'static str {
        match self {
            Self::Quiet => "vitrine=warn",
            Self::Normal => "vitrine=info",
            Self::Verbose => "vitrine=debug",
            Self::Debug => "vitrine=trace",
        }
    }
}

/// Color output choice
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum ColorChoice {
    /// Always use colors
    Always,
    /// Use colors when output is a terminal
    #[default]
    Auto,
    /// Never use colors
    Never,
}

impl ColorChoice {
    /// Should use colors based on output detection
    #[must_use]
    pub fn should_color(self) -> bool {
        match self {
            Self::Always => true,
            Self::Never => false,
            Self::Auto => console::Term::stdout().features().colors_supported(),
        }
    }
}

impl From<ColorArg> for ColorChoice {
    fn from(arg: ColorArg) -> Self {
        match arg {
            ColorArg::Auto => Self::Auto,
            ColorArg::Always => Self::Always,
            ColorArg::Never => Self::Never,
        }
    }
}

/// CLI presentation settings
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct CliConfig {
    /// Verbosity level
    pub verbosity: Verbosity,
    /// Color output choice
    pub color: ColorChoice,
    /// Log line format
    pub log_format: LogFormat,
}

impl CliConfig {
    /// Build from parsed global flags
    #[must_use]
    pub fn from_cli(cli: &Cli) -> Self {
        Self {
            verbosity: Verbosity::from_flags(cli.quiet, cli.verbose),
            color: cli.color.into(),
            log_format: cli.log_format,
        }
    }
}

/// Effective run configuration: defaults, then file, then environment, then flags
pub fn resolve_test_config(source: &ConfigSource) -> CliResult<TestConfig> {
    resolve_with(source, |name| std::env::var(name).ok())
}

/// Same as [`resolve_test_config`] with an explicit environment lookup
pub fn resolve_with(
    source: &ConfigSource,
    lookup: impl Fn(&str) -> Option<String>,
) -> CliResult<TestConfig> {
    let base = match &source.config {
        Some(path) => TestConfig::load(path)?,
        None => TestConfig::default(),
    };
    let mut config = base.apply_vars(lookup);
    if let Some(url) = &source.base_url {
        config.base_url.clone_from(url);
    }
    if source.headed {
        config.browser.headless = false;
    }
    config.validate()?;
    Ok(config)
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use crate::error::{CliError, EXIT_CONFIG};
    use std::io::Write;
    use std::path::PathBuf;

    fn no_env(_: &str) -> Option<String> {
        None
    }

    mod verbosity_tests {
        use super::*;

        #[test]
        fn test_default_verbosity() {
            assert_eq!(Verbosity::default(), Verbosity::Normal);
        }

        #[test]
        fn test_from_flags() {
            assert_eq!(Verbosity::from_flags(true, 3), Verbosity::Quiet);
            assert_eq!(Verbosity::from_flags(false, 0), Verbosity::Normal);
            assert_eq!(Verbosity::from_flags(false, 1), Verbosity::Verbose);
            assert_eq!(Verbosity::from_flags(false, 5), Verbosity::Debug);
        }

        #[test]
        fn test_is_verbose() {
            assert!(!Verbosity::Quiet.is_verbose());
            assert!(!Verbosity::Normal.is_verbose());
            assert!(Verbosity::Verbose.is_verbose());
            assert!(Verbosity::Debug.is_verbose());
            assert!(Verbosity::Quiet.is_quiet());
        }

        #[test]
        fn test_log_directive() {
            assert_eq!(Verbosity::Normal.log_directive(), "vitrine=info");
            assert_eq!(Verbosity::Verbose.log_directive(), "vitrine=debug");
        }
    }

    mod color_tests {
        use super::*;

        #[test]
        fn test_explicit_choices() {
            assert!(ColorChoice::Always.should_color());
            assert!(!ColorChoice::Never.should_color());
        }

        #[test]
        fn test_from_arg() {
            assert_eq!(ColorChoice::from(ColorArg::Never), ColorChoice::Never);
            assert_eq!(ColorChoice::from(ColorArg::Auto), ColorChoice::Auto);
        }
    }

    mod resolve_tests {
        use super::*;

        #[test]
        fn test_defaults_without_sources() {
            let config = resolve_with(&ConfigSource::default(), no_env).unwrap();
            assert_eq!(config, TestConfig::default());
        }

        #[test]
        fn test_flags_override_environment() {
            let source = ConfigSource {
                base_url: Some("http://flag.test".to_string()),
                headed: true,
                ..ConfigSource::default()
            };
            let config = resolve_with(&source, |name| match name {
                "VITRINE_BASE_URL" => Some("http://env.test".to_string()),
                "VITRINE_USER_ID" => Some("alice".to_string()),
                _ => None,
            })
            .unwrap();
            assert_eq!(config.base_url, "http://flag.test");
            assert!(!config.browser.headless);
            assert_eq!(
                config.properties.get("test.user.id").map(String::as_str),
                Some("alice")
            );
        }

        #[test]
        fn test_environment_overrides_file() {
            let mut file = tempfile::NamedTempFile::new().unwrap();
            writeln!(file, "base_url: http://file.test").unwrap();
            let source = ConfigSource {
                config: Some(file.path().to_path_buf()),
                ..ConfigSource::default()
            };

            let from_file = resolve_with(&source, no_env).unwrap();
            assert_eq!(from_file.base_url, "http://file.test");

            let from_env = resolve_with(&source, |name| {
                (name == "VITRINE_BASE_URL").then(|| "http://env.test".to_string())
            })
            .unwrap();
            assert_eq!(from_env.base_url, "http://env.test");
        }

        #[test]
        fn test_missing_file_is_config_error() {
            let source = ConfigSource {
                config: Some(PathBuf::from("/nonexistent/vitrine.yaml")),
                ..ConfigSource::default()
            };
            let err = resolve_with(&source, no_env).unwrap_err();
            assert_eq!(err.exit_code(), EXIT_CONFIG);
        }

        #[test]
        fn test_invalid_base_url_rejected() {
            let source = ConfigSource {
                base_url: Some("shop.test".to_string()),
                ..ConfigSource::default()
            };
            let err = resolve_with(&source, no_env).unwrap_err();
            assert!(matches!(err, CliError::Vitrine(_)));
            assert_eq!(err.exit_code(), EXIT_CONFIG);
        }
    }
}
