//! Scenario Orchestrator.
//!
//! Runs a filtered, ordered list of [`Scenario`]s. Every scenario gets its
//! own session from the [`SessionFactory`] and gives it back when it ends,
//! whatever the outcome. Outcomes go to the [`ReportSink`] as they happen
//! and into a [`SuiteReport`] at the end.

use crate::config::TestConfig;
use crate::data::{TestDataGenerator, UniqueDataGenerator};
use crate::driver::SessionFactory;
use crate::reporter::{
    FailureMode, ReportLevel, ReportSink, ScenarioRecord, SuiteReport, TracingSink,
};
use crate::scenario::{Scenario, ScenarioContext, ScenarioOutcome};
use futures::{stream, FutureExt, StreamExt};
use std::panic::AssertUnwindSafe;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, info, warn};

/// Runs scenarios against sessions from a factory
pub struct Orchestrator {
    factory: Arc<dyn SessionFactory>,
    config: Arc<TestConfig>,
    data: Arc<dyn TestDataGenerator>,
    sink: Arc<dyn ReportSink>,
    jobs: usize,
    mode: FailureMode,
    filter: Option<String>,
}

impl std::fmt::Debug for Orchestrator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Orchestrator")
            .field("jobs", &self.jobs)
            .field("mode", &self.mode)
            .field("filter", &self.filter)
            .finish_non_exhaustive()
    }
}

impl Orchestrator {
    /// Sequential, collect-all orchestrator logging through `tracing`
    #[must_use]
    pub fn new(factory: Arc<dyn SessionFactory>, config: TestConfig) -> Self {
        Self {
            factory,
            config: Arc::new(config),
            data: Arc::new(UniqueDataGenerator::new()),
            sink: Arc::new(TracingSink),
            jobs: 1,
            mode: FailureMode::CollectAll,
            filter: None,
        }
    }

    /// Replace the data generator
    #[must_use]
    pub fn with_data(mut self, data: Arc<dyn TestDataGenerator>) -> Self {
        self.data = data;
        self
    }

    /// Replace the report sink
    #[must_use]
    pub fn with_sink(mut self, sink: Arc<dyn ReportSink>) -> Self {
        self.sink = sink;
        self
    }

    /// Run up to `jobs` scenarios at once (at least one)
    #[must_use]
    pub fn with_jobs(mut self, jobs: usize) -> Self {
        self.jobs = jobs.max(1);
        self
    }

    /// Set the failure mode
    #[must_use]
    pub const fn with_failure_mode(mut self, mode: FailureMode) -> Self {
        self.mode = mode;
        self
    }

    /// Only run scenarios whose id or description contains `filter`
    #[must_use]
    pub fn with_filter(mut self, filter: impl Into<String>) -> Self {
        let filter = filter.into();
        self.filter = (!filter.is_empty()).then_some(filter);
        self
    }

    /// Run configuration
    #[must_use]
    pub fn config(&self) -> &TestConfig {
        &self.config
    }

    /// Scenarios that would run, in execution order
    #[must_use]
    pub fn select(&self, scenarios: &[Scenario]) -> Vec<Scenario> {
        let mut selected: Vec<Scenario> = scenarios
            .iter()
            .filter(|s| self.filter.as_deref().map_or(true, |f| s.matches(f)))
            .copied()
            .collect();
        selected.sort_by_key(Scenario::key);
        selected
    }

    /// Run the selected scenarios and collect their outcomes
    pub async fn run(&self, name: &str, scenarios: &[Scenario]) -> SuiteReport {
        let selected = self.select(scenarios);
        info!(suite = name, scenarios = selected.len(), jobs = self.jobs, "starting run");

        let stop = AtomicBool::new(false);
        let records: Vec<ScenarioRecord> = stream::iter(selected)
            .map(|scenario| {
                let stop = &stop;
                async move {
                    if stop.load(Ordering::SeqCst) {
                        debug!(id = scenario.id, "not scheduled after failure");
                        return None;
                    }
                    let record = self.run_one(scenario).await;
                    if self.mode == FailureMode::FailFast && record.status.is_failure() {
                        stop.store(true, Ordering::SeqCst);
                    }
                    Some(record)
                }
            })
            .buffer_unordered(self.jobs)
            .filter_map(futures::future::ready)
            .collect()
            .await;

        let mut report = SuiteReport::new(name);
        for record in records {
            report.record(record);
        }
        report.finish();
        info!(summary = %report.summary(), "run finished");
        report
    }

    /// Run one scenario on a fresh session
    pub async fn run_one(&self, scenario: Scenario) -> ScenarioRecord {
        let started = Instant::now();
        self.sink.log(
            ReportLevel::Info,
            &format!("Starting {}: {}", scenario.id, scenario.description),
        );

        let outcome = match self.factory.acquire().await {
            Ok(session) => {
                let ctx = ScenarioContext::new(
                    session,
                    Arc::clone(&self.config),
                    Arc::clone(&self.data),
                    Arc::clone(&self.sink),
                );
                let result = AssertUnwindSafe(scenario.run(&ctx)).catch_unwind().await;
                if let Err(e) = self.factory.release(ctx.into_session()).await {
                    warn!(id = scenario.id, error = %e, "session release failed");
                }
                match result {
                    Ok(result) => ScenarioOutcome::from(result),
                    Err(panic) => ScenarioOutcome::Errored(format!(
                        "scenario panicked: {}",
                        panic_message(panic.as_ref())
                    )),
                }
            }
            Err(e) => ScenarioOutcome::Errored(format!("could not acquire a session: {e}")),
        };

        self.report(&scenario, &outcome);
        ScenarioRecord::new(
            scenario.suite,
            scenario.priority,
            scenario.id,
            scenario.description,
            &outcome,
            started.elapsed(),
        )
    }

    fn report(&self, scenario: &Scenario, outcome: &ScenarioOutcome) {
        let (level, line) = match outcome {
            ScenarioOutcome::Passed => (
                ReportLevel::Pass,
                format!("{}: {}", scenario.id, scenario.description),
            ),
            ScenarioOutcome::Failed(m) => (ReportLevel::Fail, format!("{}: {m}", scenario.id)),
            ScenarioOutcome::Skipped(m) => (ReportLevel::Skip, format!("{}: {m}", scenario.id)),
            ScenarioOutcome::Errored(m) => {
                (ReportLevel::Fail, format!("ERROR: {}: {m}", scenario.id))
            }
        };
        self.sink.log(level, &line);
    }
}

fn panic_message(payload: &(dyn std::any::Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "non-string panic payload".to_string()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use crate::driver::BrowserSession;
    use crate::mock::{MockSession, MockSessionFactory};
    use crate::reporter::{MemorySink, OutcomeStatus};
    use crate::result::{VitrineError, VitrineResult};
    use crate::scenario::{ScenarioError, ScenarioResult, Suite};
    use async_trait::async_trait;

    async fn pass(_: &ScenarioContext) -> ScenarioResult {
        Ok(())
    }

    async fn fail(_: &ScenarioContext) -> ScenarioResult {
        Err(ScenarioError::Assertion {
            message: "Không ở trang checkout".into(),
        })
    }

    async fn skip(ctx: &ScenarioContext) -> ScenarioResult {
        ctx.require_rows(0, "Không có order để edit")
    }

    async fn error(_: &ScenarioContext) -> ScenarioResult {
        Err(ScenarioError::from(VitrineError::SessionLost {
            message: "tab crashed".into(),
        }))
    }

    async fn panics(_: &ScenarioContext) -> ScenarioResult {
        let rows: Vec<u32> = Vec::new();
        assert!(!rows.is_empty(), "boom");
        Ok(())
    }

    fn catalog() -> Vec<Scenario> {
        vec![
            Scenario::new(Suite::Admin, 2, "a-fail", "admin failure", |c| fail(c).boxed()),
            Scenario::new(Suite::User, 3, "u-skip", "user skip", |c| skip(c).boxed()),
            Scenario::new(Suite::User, 1, "u-pass", "user pass", |c| pass(c).boxed()),
            Scenario::new(Suite::Admin, 1, "a-error", "admin error", |c| error(c).boxed()),
        ]
    }

    fn orchestrator(factory: Arc<MockSessionFactory>, sink: Arc<MemorySink>) -> Orchestrator {
        Orchestrator::new(factory, TestConfig::new("http://shop.test/")).with_sink(sink)
    }

    mod selection_tests {
        use super::*;

        #[test]
        fn test_order_is_suite_then_priority() {
            let o = orchestrator(
                Arc::new(MockSessionFactory::new(MockSession::new)),
                Arc::new(MemorySink::new()),
            );
            let ids: Vec<_> = o.select(&catalog()).iter().map(|s| s.id).collect();
            assert_eq!(ids, vec!["u-pass", "u-skip", "a-error", "a-fail"]);
        }

        #[test]
        fn test_filter() {
            let o = orchestrator(
                Arc::new(MockSessionFactory::new(MockSession::new)),
                Arc::new(MemorySink::new()),
            )
            .with_filter("admin");
            assert_eq!(o.select(&catalog()).len(), 2);
            let o = o.with_filter("");
            assert_eq!(o.select(&catalog()).len(), 4);
        }
    }

    mod run_tests {
        use super::*;

        #[tokio::test]
        async fn test_every_outcome_is_recorded() {
            let factory = Arc::new(MockSessionFactory::new(MockSession::new));
            let sink = Arc::new(MemorySink::new());
            let report = orchestrator(Arc::clone(&factory), Arc::clone(&sink))
                .run("all", &catalog())
                .await;

            assert_eq!(report.total_count(), 4);
            assert_eq!(report.passed_count(), 1);
            assert_eq!(report.failed_count(), 1);
            assert_eq!(report.skipped_count(), 1);
            assert_eq!(report.errored_count(), 1);
            assert!(!report.all_passed());
            assert_eq!(factory.acquired(), 4);
            assert_eq!(factory.released(), 4);
        }

        #[tokio::test]
        async fn test_sink_lines() {
            let factory = Arc::new(MockSessionFactory::new(MockSession::new));
            let sink = Arc::new(MemorySink::new());
            orchestrator(factory, Arc::clone(&sink))
                .run("all", &catalog())
                .await;

            assert_eq!(sink.at(ReportLevel::Info).len(), 4);
            assert_eq!(sink.at(ReportLevel::Pass), vec!["u-pass: user pass".to_string()]);
            assert_eq!(
                sink.at(ReportLevel::Skip),
                vec!["u-skip: Không có order để edit".to_string()]
            );
            let fails = sink.at(ReportLevel::Fail);
            assert_eq!(fails.len(), 2);
            assert!(fails.iter().any(|l| l.starts_with("ERROR: a-error:")));
            assert!(fails.contains(&"a-fail: Không ở trang checkout".to_string()));
        }

        #[tokio::test]
        async fn test_fail_fast_stops_scheduling() {
            let factory = Arc::new(MockSessionFactory::new(MockSession::new));
            let report = orchestrator(Arc::clone(&factory), Arc::new(MemorySink::new()))
                .with_failure_mode(FailureMode::FailFast)
                .run("all", &catalog())
                .await;

            // u-pass, u-skip, then a-error stops the run before a-fail
            assert_eq!(report.total_count(), 3);
            assert_eq!(report.records[2].status, OutcomeStatus::Error);
            assert_eq!(factory.acquired(), factory.released());
        }

        #[tokio::test]
        async fn test_parallel_run_records_everything() {
            let factory = Arc::new(MockSessionFactory::new(MockSession::new));
            let report = orchestrator(Arc::clone(&factory), Arc::new(MemorySink::new()))
                .with_jobs(4)
                .run("all", &catalog())
                .await;
            assert_eq!(report.total_count(), 4);
            assert_eq!(factory.released(), 4);
        }

        #[tokio::test]
        async fn test_panic_is_error_and_session_released() {
            let factory = Arc::new(MockSessionFactory::new(MockSession::new));
            let scenarios = [Scenario::new(Suite::User, 1, "p", "panics", |c| panics(c).boxed())];
            let report = orchestrator(Arc::clone(&factory), Arc::new(MemorySink::new()))
                .run("panic", &scenarios)
                .await;
            assert_eq!(report.errored_count(), 1);
            assert!(report.records[0]
                .message
                .as_deref()
                .unwrap()
                .contains("boom"));
            assert_eq!(factory.released(), 1);
        }
    }

    mod acquisition_tests {
        use super::*;

        struct NoBrowser;

        #[async_trait]
        impl SessionFactory for NoBrowser {
            async fn acquire(&self) -> VitrineResult<Box<dyn BrowserSession>> {
                Err(VitrineError::BrowserLaunch {
                    message: "chromium not found".into(),
                })
            }
        }

        #[tokio::test]
        async fn test_acquire_failure_is_error() {
            let o = Orchestrator::new(Arc::new(NoBrowser), TestConfig::default())
                .with_sink(Arc::new(MemorySink::new()));
            let report = o.run("none", &catalog()[..1]).await;
            assert_eq!(report.errored_count(), 1);
            assert!(report.records[0]
                .message
                .as_deref()
                .unwrap()
                .contains("chromium not found"));
        }
    }
}
