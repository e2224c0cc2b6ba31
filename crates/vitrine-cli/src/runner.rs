//! Suite runner: catalog selection and orchestrated execution

use crate::commands::{RunArgs, SuiteArg};
use crate::error::{CliError, CliResult};
use std::path::Path;
use std::sync::Arc;
use tracing::info;
use vitrine::{
    scenarios, ChromiumFactory, FailureMode, Orchestrator, Scenario, SessionFactory, SuiteReport,
    TestConfig,
};

/// Catalog scenarios for a suite selection, filtered and in run order
#[must_use]
pub fn select_scenarios(suite: SuiteArg, filter: Option<&str>) -> Vec<Scenario> {
    let mut selected: Vec<Scenario> = suite
        .suites()
        .into_iter()
        .flat_map(scenarios::catalog)
        .filter(|s| filter.map_or(true, |f| s.matches(f)))
        .collect();
    selected.sort_by_key(Scenario::key);
    selected
}

/// Runs one suite selection against a session factory
#[derive(Debug)]
pub struct SuiteRunner {
    orchestrator: Orchestrator,
    suite: SuiteArg,
}

impl SuiteRunner {
    /// Runner backed by a real browser
    pub fn from_args(args: &RunArgs, config: TestConfig) -> CliResult<Self> {
        let factory = Arc::new(ChromiumFactory::new(config.browser.clone()));
        Self::with_factory(args, config, factory)
    }

    /// Runner backed by any session factory
    pub fn with_factory(
        args: &RunArgs,
        config: TestConfig,
        factory: Arc<dyn SessionFactory>,
    ) -> CliResult<Self> {
        if args.jobs == 0 {
            return Err(CliError::invalid_argument("--jobs must be at least 1"));
        }
        let mode = if args.fail_fast {
            FailureMode::FailFast
        } else {
            FailureMode::CollectAll
        };
        let mut orchestrator = Orchestrator::new(factory, config)
            .with_jobs(args.jobs)
            .with_failure_mode(mode);
        if let Some(filter) = &args.filter {
            orchestrator = orchestrator.with_filter(filter.as_str());
        }
        Ok(Self {
            orchestrator,
            suite: args.suite,
        })
    }

    /// Execute on a fresh multi-threaded runtime
    pub fn run(&self) -> CliResult<SuiteReport> {
        let runtime = tokio::runtime::Builder::new_multi_thread()
            .enable_all()
            .build()?;
        Ok(runtime.block_on(self.run_async()))
    }

    /// Execute on the caller's runtime
    pub async fn run_async(&self) -> SuiteReport {
        let catalog = select_scenarios(self.suite, None);
        info!(
            suite = self.suite.label(),
            base_url = %self.orchestrator.config().base_url,
            "running suites"
        );
        self.orchestrator.run(self.suite.label(), &catalog).await
    }
}

/// Write the JSON report, if requested
pub fn write_report(report: &SuiteReport, path: Option<&Path>) -> CliResult<()> {
    let Some(path) = path else {
        return Ok(());
    };
    report
        .write_json(path)
        .map_err(|e| CliError::report_generation(format!("{}: {e}", path.display())))?;
    info!(path = %path.display(), "report written");
    Ok(())
}

/// Map a finished run to the command result
pub fn verdict(report: &SuiteReport) -> CliResult<()> {
    if report.all_passed() {
        Ok(())
    } else {
        Err(CliError::ScenarioFailures {
            failed: report.failed_count(),
            errored: report.errored_count(),
        })
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use crate::commands::ConfigSource;
    use crate::error::EXIT_FAILURES;
    use vitrine::locator::Selector;
    use vitrine::mock::{MockElement, MockSession, MockSessionFactory};
    use vitrine::{Suite, Timeouts};

    fn args(suite: SuiteArg, filter: Option<&str>) -> RunArgs {
        RunArgs {
            suite,
            filter: filter.map(str::to_string),
            source: ConfigSource::default(),
            jobs: 1,
            fail_fast: false,
            report: None,
        }
    }

    fn fast_config() -> TestConfig {
        TestConfig::new("http://shop.test").with_timeouts(Timeouts {
            element_ms: 50,
            navigation_ms: 50,
            settle_ms: 50,
            poll_ms: 5,
        })
    }

    mod select_tests {
        use super::*;

        #[test]
        fn test_all_is_user_then_admin() {
            let all = select_scenarios(SuiteArg::All, None);
            let first_admin = all.iter().position(|s| s.suite == Suite::Admin).unwrap();
            assert!(all[..first_admin].iter().all(|s| s.suite == Suite::User));
            assert!(all[first_admin..].iter().all(|s| s.suite == Suite::Admin));
        }

        #[test]
        fn test_filter_is_case_insensitive() {
            let selected = select_scenarios(SuiteArg::Admin, Some("ADMIN-LOGIN"));
            assert!(!selected.is_empty());
            assert!(selected.iter().all(|s| s.id.starts_with("admin-login")));
        }

        #[test]
        fn test_unmatched_filter_selects_nothing() {
            assert!(select_scenarios(SuiteArg::All, Some("no-such-scenario")).is_empty());
        }
    }

    mod runner_tests {
        use super::*;

        #[test]
        fn test_zero_jobs_rejected() {
            let mut run_args = args(SuiteArg::User, None);
            run_args.jobs = 0;
            let factory = Arc::new(MockSessionFactory::new(MockSession::new));
            let err = SuiteRunner::with_factory(&run_args, fast_config(), factory).unwrap_err();
            assert!(matches!(err, CliError::InvalidArgument { .. }));
        }

        #[tokio::test]
        async fn test_empty_selection_passes() {
            let factory = Arc::new(MockSessionFactory::new(MockSession::new));
            let runner = SuiteRunner::with_factory(
                &args(SuiteArg::All, Some("no-such-scenario")),
                fast_config(),
                factory.clone(),
            )
            .unwrap();
            let report = runner.run_async().await;
            assert_eq!(report.total_count(), 0);
            assert!(verdict(&report).is_ok());
            assert_eq!(factory.acquired(), 0);
        }

        #[tokio::test]
        async fn test_blank_storefront_fails_login() {
            let factory = Arc::new(MockSessionFactory::new(|| {
                MockSession::new().with_route("/login", |dom| {
                    dom.add(Selector::css("h1"), MockElement::new("h1").text("Sign in"));
                })
            }));
            let runner = SuiteRunner::with_factory(
                &args(SuiteArg::Admin, Some("admin-login-success")),
                fast_config(),
                factory.clone(),
            )
            .unwrap();
            let report = runner.run_async().await;
            assert_eq!(report.total_count(), 1);
            let err = verdict(&report).unwrap_err();
            assert_eq!(err.exit_code(), EXIT_FAILURES);
            assert_eq!(factory.acquired(), factory.released());
        }
    }

    mod report_tests {
        use super::*;

        #[test]
        fn test_no_path_writes_nothing() {
            assert!(write_report(&SuiteReport::new("all"), None).is_ok());
        }

        #[test]
        fn test_writes_json() {
            let dir = tempfile::tempdir().unwrap();
            let path = dir.path().join("report.json");
            write_report(&SuiteReport::new("all"), Some(&path)).unwrap();
            let json = std::fs::read_to_string(&path).unwrap();
            assert!(json.contains("\"name\": \"all\""));
        }

        #[test]
        fn test_unwritable_path_is_report_error() {
            let path = Path::new("/nonexistent-dir/report.json");
            let err = write_report(&SuiteReport::new("all"), Some(path)).unwrap_err();
            assert!(matches!(err, CliError::ReportGeneration { .. }));
        }
    }
}
