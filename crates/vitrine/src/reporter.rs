//! Report Sink and suite reporting.
//!
//! Two layers:
//!
//! - [`ReportSink`]: the fire-and-forget status log scenarios write to
//!   (`INFO`, `PASS`, `FAIL`, `SKIP`). [`TracingSink`] forwards it to
//!   `tracing`; [`MemorySink`] keeps it for assertions in tests.
//! - [`SuiteReport`]: one [`ScenarioRecord`] per executed scenario, with
//!   counts per outcome and JSON export.
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────────┐
//! │  FailureMode::CollectAll        │  FailureMode::FailFast     │
//! │  run every scenario, record     │  stop scheduling after the │
//! │  every outcome (default)        │  first FAIL or ERROR       │
//! └──────────────────────────────────────────────────────────────┘
//! ```

use crate::result::VitrineResult;
use crate::scenario::{ScenarioOutcome, Suite};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::sync::{Mutex, PoisonError};
use std::time::Duration;
use tracing::{info, warn};

// =============================================================================
// REPORT SINK
// =============================================================================

/// Status level of a report line
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum ReportLevel {
    /// Progress information
    Info,
    /// Scenario passed
    Pass,
    /// Scenario failed or errored
    Fail,
    /// Scenario skipped
    Skip,
}

impl std::fmt::Display for ReportLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Info => write!(f, "INFO"),
            Self::Pass => write!(f, "PASS"),
            Self::Fail => write!(f, "FAIL"),
            Self::Skip => write!(f, "SKIP"),
        }
    }
}

/// Fire-and-forget status log
pub trait ReportSink: Send + Sync {
    /// Record one line
    fn log(&self, level: ReportLevel, message: &str);
}

/// Forwards every line to `tracing`
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingSink;

impl ReportSink for TracingSink {
    fn log(&self, level: ReportLevel, message: &str) {
        match level {
            ReportLevel::Fail => warn!(target: "vitrine::report", level = %level, "{message}"),
            _ => info!(target: "vitrine::report", level = %level, "{message}"),
        }
    }
}

/// Keeps every line in memory
#[derive(Debug, Default)]
pub struct MemorySink {
    lines: Mutex<Vec<(ReportLevel, String)>>,
}

impl MemorySink {
    /// Create an empty sink
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// All lines so far
    #[must_use]
    pub fn lines(&self) -> Vec<(ReportLevel, String)> {
        self.lines
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Lines at one level
    #[must_use]
    pub fn at(&self, level: ReportLevel) -> Vec<String> {
        self.lines()
            .into_iter()
            .filter(|(l, _)| *l == level)
            .map(|(_, m)| m)
            .collect()
    }
}

impl ReportSink for MemorySink {
    fn log(&self, level: ReportLevel, message: &str) {
        self.lines
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push((level, message.to_string()));
    }
}

// =============================================================================
// OUTCOME STATUS
// =============================================================================

/// Failure mode for a run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FailureMode {
    /// Run everything
    #[default]
    CollectAll,
    /// Stop scheduling after the first FAIL or ERROR
    FailFast,
}

/// Reported status of one scenario
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum OutcomeStatus {
    /// Assertions held
    Pass,
    /// An assertion did not hold
    Fail,
    /// Precondition not met
    Skip,
    /// The harness could not complete a step
    Error,
}

impl OutcomeStatus {
    /// FAIL or ERROR
    #[must_use]
    pub const fn is_failure(&self) -> bool {
        matches!(self, Self::Fail | Self::Error)
    }
}

impl std::fmt::Display for OutcomeStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Pass => write!(f, "PASS"),
            Self::Fail => write!(f, "FAIL"),
            Self::Skip => write!(f, "SKIP"),
            Self::Error => write!(f, "ERROR"),
        }
    }
}

impl From<&ScenarioOutcome> for OutcomeStatus {
    fn from(outcome: &ScenarioOutcome) -> Self {
        match outcome {
            ScenarioOutcome::Passed => Self::Pass,
            ScenarioOutcome::Failed(_) => Self::Fail,
            ScenarioOutcome::Skipped(_) => Self::Skip,
            ScenarioOutcome::Errored(_) => Self::Error,
        }
    }
}

// =============================================================================
// SUITE REPORT
// =============================================================================

/// Report entry for one executed scenario
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScenarioRecord {
    /// Owning suite
    pub suite: Suite,
    /// Ordering priority
    pub priority: u32,
    /// Stable identifier
    pub id: String,
    /// Human description
    pub description: String,
    /// Outcome status
    pub status: OutcomeStatus,
    /// Literal assertion, skip or error message
    pub message: Option<String>,
    /// Wall time in milliseconds
    pub duration_ms: u64,
    /// Completion time
    pub finished_at: DateTime<Utc>,
}

impl ScenarioRecord {
    /// Build a record from an outcome
    #[must_use]
    pub fn new(
        suite: Suite,
        priority: u32,
        id: impl Into<String>,
        description: impl Into<String>,
        outcome: &ScenarioOutcome,
        duration: Duration,
    ) -> Self {
        Self {
            suite,
            priority,
            id: id.into(),
            description: description.into(),
            status: OutcomeStatus::from(outcome),
            message: outcome.message().map(str::to_string),
            duration_ms: u64::try_from(duration.as_millis()).unwrap_or(u64::MAX),
            finished_at: Utc::now(),
        }
    }
}

/// Collected outcomes of a run
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SuiteReport {
    /// Run label
    pub name: String,
    /// Start time
    pub started_at: Option<DateTime<Utc>>,
    /// End time
    pub finished_at: Option<DateTime<Utc>>,
    /// One record per executed scenario, in execution order
    pub records: Vec<ScenarioRecord>,
}

impl SuiteReport {
    /// Create an empty, started report
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            started_at: Some(Utc::now()),
            finished_at: None,
            records: Vec::new(),
        }
    }

    /// Append a record
    pub fn record(&mut self, record: ScenarioRecord) {
        self.records.push(record);
    }

    /// Stamp the end time
    pub fn finish(&mut self) {
        self.finished_at = Some(Utc::now());
    }

    /// Number of records with a status
    #[must_use]
    pub fn count(&self, status: OutcomeStatus) -> usize {
        self.records.iter().filter(|r| r.status == status).count()
    }

    /// Passed scenarios
    #[must_use]
    pub fn passed_count(&self) -> usize {
        self.count(OutcomeStatus::Pass)
    }

    /// Failed scenarios
    #[must_use]
    pub fn failed_count(&self) -> usize {
        self.count(OutcomeStatus::Fail)
    }

    /// Skipped scenarios
    #[must_use]
    pub fn skipped_count(&self) -> usize {
        self.count(OutcomeStatus::Skip)
    }

    /// Errored scenarios
    #[must_use]
    pub fn errored_count(&self) -> usize {
        self.count(OutcomeStatus::Error)
    }

    /// Total executed
    #[must_use]
    pub fn total_count(&self) -> usize {
        self.records.len()
    }

    /// No FAIL and no ERROR
    #[must_use]
    pub fn all_passed(&self) -> bool {
        !self.records.iter().any(|r| r.status.is_failure())
    }

    /// FAIL and ERROR records
    #[must_use]
    pub fn failures(&self) -> Vec<&ScenarioRecord> {
        self.records
            .iter()
            .filter(|r| r.status.is_failure())
            .collect()
    }

    /// Sum of scenario durations
    #[must_use]
    pub fn total_duration(&self) -> Duration {
        Duration::from_millis(self.records.iter().map(|r| r.duration_ms).sum())
    }

    /// One-line summary
    #[must_use]
    pub fn summary(&self) -> String {
        format!(
            "{}: {} passed, {} failed, {} skipped, {} errored ({} total)",
            self.name,
            self.passed_count(),
            self.failed_count(),
            self.skipped_count(),
            self.errored_count(),
            self.total_count()
        )
    }

    /// Pretty JSON
    pub fn to_json(&self) -> VitrineResult<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Write pretty JSON to a file
    pub fn write_json(&self, path: &Path) -> VitrineResult<()> {
        std::fs::write(path, self.to_json()?)?;
        Ok(())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;

    fn record(id: &str, outcome: &ScenarioOutcome) -> ScenarioRecord {
        ScenarioRecord::new(Suite::Admin, 1, id, "desc", outcome, Duration::from_millis(25))
    }

    mod sink_tests {
        use super::*;

        #[test]
        fn test_memory_sink_keeps_order() {
            let sink = MemorySink::new();
            sink.log(ReportLevel::Info, "start");
            sink.log(ReportLevel::Skip, "no rows");
            assert_eq!(
                sink.lines(),
                vec![
                    (ReportLevel::Info, "start".to_string()),
                    (ReportLevel::Skip, "no rows".to_string())
                ]
            );
            assert_eq!(sink.at(ReportLevel::Skip), vec!["no rows".to_string()]);
        }

        #[test]
        fn test_tracing_sink_does_not_panic_without_subscriber() {
            TracingSink.log(ReportLevel::Fail, "ERROR: session lost");
        }

        #[test]
        fn test_level_display() {
            assert_eq!(ReportLevel::Pass.to_string(), "PASS");
            assert_eq!(
                serde_json::to_string(&ReportLevel::Skip).unwrap(),
                "\"SKIP\""
            );
        }
    }

    mod suite_report_tests {
        use super::*;

        #[test]
        fn test_counts_per_status() {
            let mut report = SuiteReport::new("admin");
            report.record(record("a", &ScenarioOutcome::Passed));
            report.record(record("b", &ScenarioOutcome::Failed("nope".into())));
            report.record(record("c", &ScenarioOutcome::Skipped("empty".into())));
            report.record(record("d", &ScenarioOutcome::Errored("lost".into())));
            report.finish();

            assert_eq!(report.passed_count(), 1);
            assert_eq!(report.failed_count(), 1);
            assert_eq!(report.skipped_count(), 1);
            assert_eq!(report.errored_count(), 1);
            assert_eq!(report.total_count(), 4);
            assert!(!report.all_passed());
            assert_eq!(report.failures().len(), 2);
            assert_eq!(report.total_duration(), Duration::from_millis(100));
            assert!(report.summary().contains("1 skipped"));
        }

        #[test]
        fn test_skips_do_not_fail_the_run() {
            let mut report = SuiteReport::new("user");
            report.record(record("a", &ScenarioOutcome::Skipped("cart empty".into())));
            assert!(report.all_passed());
        }

        #[test]
        fn test_message_is_literal() {
            let r = record("b", &ScenarioOutcome::Failed("Thông báo lỗi không đúng".into()));
            assert_eq!(r.message.as_deref(), Some("Thông báo lỗi không đúng"));
            assert_eq!(record("a", &ScenarioOutcome::Passed).message, None);
        }

        #[test]
        fn test_write_json() {
            let dir = tempfile::tempdir().unwrap();
            let path = dir.path().join("report.json");
            let mut report = SuiteReport::new("all");
            report.record(record("a", &ScenarioOutcome::Passed));
            report.write_json(&path).unwrap();

            let text = std::fs::read_to_string(&path).unwrap();
            assert!(text.contains("\"status\": \"PASS\""));
            let back: SuiteReport = serde_json::from_str(&text).unwrap();
            assert_eq!(back, report);
        }
    }
}
