//! Output formatting for listings and run results

use console::{style, Style, Term};
use vitrine::{OutcomeStatus, Scenario, ScenarioRecord, SuiteReport};

/// Writes human-readable results to stdout
#[derive(Debug)]
pub struct Printer {
    term: Term,
    /// Whether to use colors
    pub use_color: bool,
    /// Quiet mode
    pub quiet: bool,
}

impl Default for Printer {
    fn default() -> Self {
        Self::new(false, false)
    }
}

impl Printer {
    /// Create a printer
    #[must_use]
    pub fn new(use_color: bool, quiet: bool) -> Self {
        Self {
            term: Term::stdout(),
            use_color,
            quiet,
        }
    }

    /// Status tag, padded to a fixed width
    #[must_use]
    pub fn tag(&self, status: OutcomeStatus) -> String {
        let label = format!("{:<5}", status.to_string());
        if !self.use_color {
            return label;
        }
        let styled = match status {
            OutcomeStatus::Pass => style(label).green().bold(),
            OutcomeStatus::Fail => style(label).red().bold(),
            OutcomeStatus::Skip => style(label).yellow(),
            OutcomeStatus::Error => style(label).magenta().bold(),
        };
        styled.to_string()
    }

    /// One line per executed scenario
    #[must_use]
    pub fn record_line(&self, record: &ScenarioRecord) -> String {
        let mut line = format!(
            "{} [{}] {:>3} {} ({} ms)",
            self.tag(record.status),
            record.suite,
            record.priority,
            record.id,
            record.duration_ms
        );
        if let Some(message) = &record.message {
            line.push_str(&format!(": {message}"));
        }
        line
    }

    /// Tab-separated catalog line
    #[must_use]
    pub fn listing_line(scenario: &Scenario) -> String {
        format!(
            "{}\t{:>3}\t{}\t{}",
            scenario.suite.as_str(),
            scenario.priority,
            scenario.id,
            scenario.description
        )
    }

    /// Summary footer
    #[must_use]
    pub fn summary_line(&self, report: &SuiteReport) -> String {
        let verdict = if report.all_passed() { "PASSED" } else { "FAILED" };
        let counts = format!(
            "{} scenarios in {:.2}s ({} passed, {} failed, {} skipped, {} errored)",
            report.total_count(),
            report.total_duration().as_secs_f64(),
            report.passed_count(),
            report.failed_count(),
            report.skipped_count(),
            report.errored_count()
        );
        if !self.use_color {
            return format!("{verdict} {counts}");
        }
        let verdict_style = if report.all_passed() {
            Style::new().green().bold()
        } else {
            Style::new().red().bold()
        };
        format!("{} {counts}", verdict_style.apply_to(verdict))
    }

    /// Print a catalog listing
    pub fn listing(&self, scenarios: &[Scenario]) {
        for scenario in scenarios {
            let _ = self.term.write_line(&Self::listing_line(scenario));
        }
    }

    /// Print every record then the summary. Quiet mode keeps failures only.
    pub fn report(&self, report: &SuiteReport) {
        for record in &report.records {
            if self.quiet && !record.status.is_failure() {
                continue;
            }
            let _ = self.term.write_line(&self.record_line(record));
        }
        let _ = self.term.write_line("");
        let _ = self.term.write_line(&self.summary_line(report));
    }

    /// Print a section header
    pub fn header(&self, title: &str) {
        if self.quiet {
            return;
        }
        let styled = if self.use_color {
            style(title).bold().underlined().to_string()
        } else {
            format!("=== {title} ===")
        };
        let _ = self.term.write_line(&styled);
    }

    /// Print raw text
    pub fn raw(&self, text: &str) {
        let _ = self.term.write_str(text);
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use std::time::Duration;
    use vitrine::scenarios;
    use vitrine::{ScenarioOutcome, Suite};

    fn record(status: OutcomeStatus, message: Option<&str>) -> ScenarioRecord {
        let message = message.unwrap_or_default().to_string();
        let outcome = match status {
            OutcomeStatus::Pass => ScenarioOutcome::Passed,
            OutcomeStatus::Fail => ScenarioOutcome::Failed(message),
            OutcomeStatus::Skip => ScenarioOutcome::Skipped(message),
            OutcomeStatus::Error => ScenarioOutcome::Errored(message),
        };
        ScenarioRecord::new(
            Suite::Admin,
            3,
            "dashboard-elements",
            "dashboard shows its cards",
            &outcome,
            Duration::from_millis(42),
        )
    }

    #[test]
    fn test_plain_tags() {
        let printer = Printer::new(false, false);
        assert_eq!(printer.tag(OutcomeStatus::Pass), "PASS ");
        assert_eq!(printer.tag(OutcomeStatus::Error), "ERROR");
    }

    #[test]
    fn test_record_line_with_message() {
        let printer = Printer::new(false, false);
        let line = printer.record_line(&record(OutcomeStatus::Fail, Some("badge missing")));
        assert_eq!(
            line,
            "FAIL  [admin]   3 dashboard-elements (42 ms): badge missing"
        );
    }

    #[test]
    fn test_record_line_without_message() {
        let printer = Printer::new(false, false);
        let line = printer.record_line(&record(OutcomeStatus::Pass, None));
        assert!(line.ends_with("dashboard-elements (42 ms)"));
    }

    #[test]
    fn test_listing_line() {
        let catalog = scenarios::catalog(Suite::Admin);
        let login = catalog
            .iter()
            .find(|s| s.id == "admin-login-success")
            .unwrap();
        let line = Printer::listing_line(login);
        assert!(line.starts_with("admin\t  1\tadmin-login-success\t"));
    }

    #[test]
    fn test_summary_line() {
        let printer = Printer::new(false, false);
        let mut report = SuiteReport::new("admin");
        report.record(record(OutcomeStatus::Pass, None));
        report.record(record(OutcomeStatus::Skip, Some("no rows")));
        let line = printer.summary_line(&report);
        assert!(line.starts_with("PASSED 2 scenarios"));
        assert!(line.contains("1 passed, 0 failed, 1 skipped, 0 errored"));

        report.record(record(OutcomeStatus::Error, Some("session lost")));
        assert!(printer.summary_line(&report).starts_with("FAILED"));
    }
}
