//! Wait Engine
//!
//! Polls a condition (element visible, element clickable, URL contains a
//! substring) until it holds or its budget runs out. A condition that never
//! holds is an ordinary outcome and comes back as [`WaitOutcome::TimedOut`];
//! only fatal session faults surface as `Err`.
//!
//! Every read and mutation performed by the page layer goes through here.

use crate::driver::BrowserSession;
use crate::locator::Selector;
use crate::result::{VitrineError, VitrineResult};
use serde::{Deserialize, Serialize};
use std::future::Future;
use std::time::{Duration, Instant};
use tracing::debug;

// =============================================================================
// CONSTANTS
// =============================================================================

/// Default timeout for element waits (2 seconds)
pub const DEFAULT_WAIT_TIMEOUT_MS: u64 = 2_000;

/// Default timeout for navigation waits (5 seconds)
pub const DEFAULT_NAVIGATION_TIMEOUT_MS: u64 = 5_000;

/// Default polling interval (100ms)
pub const DEFAULT_POLL_INTERVAL_MS: u64 = 100;

// =============================================================================
// WAIT POLICY
// =============================================================================

/// What a wait policy requires of its target
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ConditionKind {
    /// Rendered with a non-empty box
    Visible,
    /// Visible and enabled
    Clickable,
    /// Current location contains a substring
    UrlContains,
}

impl std::fmt::Display for ConditionKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Visible => write!(f, "visible"),
            Self::Clickable => write!(f, "clickable"),
            Self::UrlContains => write!(f, "url-contains"),
        }
    }
}

/// Condition kind plus a strictly positive time budget
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WaitPolicy {
    kind: ConditionKind,
    timeout: Duration,
}

impl WaitPolicy {
    /// Create a policy; the budget must be greater than zero
    pub fn new(kind: ConditionKind, timeout: Duration) -> VitrineResult<Self> {
        if timeout.is_zero() {
            return Err(VitrineError::InvalidPolicy {
                message: format!("{kind} wait needs a budget greater than zero"),
            });
        }
        Ok(Self { kind, timeout })
    }

    /// Visible within the default element budget
    #[must_use]
    pub const fn visible() -> Self {
        Self {
            kind: ConditionKind::Visible,
            timeout: Duration::from_millis(DEFAULT_WAIT_TIMEOUT_MS),
        }
    }

    /// Clickable within the default element budget
    #[must_use]
    pub const fn clickable() -> Self {
        Self {
            kind: ConditionKind::Clickable,
            timeout: Duration::from_millis(DEFAULT_WAIT_TIMEOUT_MS),
        }
    }

    /// Same kind, different budget
    pub fn with_timeout(self, timeout: Duration) -> VitrineResult<Self> {
        Self::new(self.kind, timeout)
    }

    /// Condition kind
    #[must_use]
    pub const fn kind(&self) -> ConditionKind {
        self.kind
    }

    /// Time budget
    #[must_use]
    pub const fn timeout(&self) -> Duration {
        self.timeout
    }
}

impl Default for WaitPolicy {
    fn default() -> Self {
        Self::visible()
    }
}

// =============================================================================
// WAIT CONDITION
// =============================================================================

/// A concrete condition evaluated against a live session
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WaitCondition {
    /// Some element matching the selector is visible
    Visible(Selector),
    /// Some element matching the selector is visible and enabled
    Clickable(Selector),
    /// The current URL contains the substring
    UrlContains(String),
    /// The current URL does not contain the substring
    UrlLacks(String),
}

impl WaitCondition {
    /// Describe the condition for logs and failure messages
    #[must_use]
    pub fn description(&self) -> String {
        match self {
            Self::Visible(s) => format!("{s} to be visible"),
            Self::Clickable(s) => format!("{s} to be clickable"),
            Self::UrlContains(needle) => format!("url to contain '{needle}'"),
            Self::UrlLacks(needle) => format!("url to leave '{needle}'"),
        }
    }

    /// Evaluate once
    pub async fn holds(&self, session: &dyn BrowserSession) -> VitrineResult<bool> {
        match self {
            Self::Visible(selector) => Ok(session
                .query_all(selector)
                .await?
                .iter()
                .any(|h| h.is_visible())),
            Self::Clickable(selector) => Ok(session
                .query_all(selector)
                .await?
                .iter()
                .any(|h| h.is_clickable())),
            Self::UrlContains(needle) => Ok(session.current_url().await?.contains(needle.as_str())),
            Self::UrlLacks(needle) => Ok(!session.current_url().await?.contains(needle.as_str())),
        }
    }
}

// =============================================================================
// WAIT OUTCOME
// =============================================================================

/// Outcome of a bounded wait
#[derive(Debug, Clone, PartialEq)]
pub enum WaitOutcome<T> {
    /// The condition held
    Satisfied {
        /// Value produced by the satisfying probe
        value: T,
        /// Time spent waiting
        elapsed: Duration,
    },
    /// The budget ran out first
    TimedOut {
        /// What was awaited
        condition: String,
        /// The budget that elapsed
        timeout: Duration,
    },
}

impl<T> WaitOutcome<T> {
    /// Whether the condition held
    #[must_use]
    pub const fn is_satisfied(&self) -> bool {
        matches!(self, Self::Satisfied { .. })
    }

    /// The satisfying value, if any
    pub fn value(self) -> Option<T> {
        match self {
            Self::Satisfied { value, .. } => Some(value),
            Self::TimedOut { .. } => None,
        }
    }

    /// Turn a timeout into [`VitrineError::Timeout`]
    pub fn into_result(self) -> VitrineResult<T> {
        match self {
            Self::Satisfied { value, .. } => Ok(value),
            Self::TimedOut { condition, timeout } => Err(VitrineError::timeout(condition, timeout)),
        }
    }
}

// =============================================================================
// WAITER
// =============================================================================

/// Polls conditions at a fixed interval
#[derive(Debug, Clone, Copy)]
pub struct Waiter {
    poll_interval: Duration,
}

impl Default for Waiter {
    fn default() -> Self {
        Self::new()
    }
}

impl Waiter {
    /// Create a waiter with the default polling interval
    #[must_use]
    pub const fn new() -> Self {
        Self {
            poll_interval: Duration::from_millis(DEFAULT_POLL_INTERVAL_MS),
        }
    }

    /// Set the polling interval (zero is bumped to 1ms)
    #[must_use]
    pub fn with_poll_interval(mut self, interval: Duration) -> Self {
        self.poll_interval = interval.max(Duration::from_millis(1));
        self
    }

    /// Polling interval
    #[must_use]
    pub const fn poll_interval(&self) -> Duration {
        self.poll_interval
    }

    /// Poll `probe` until it yields `Some`, or `timeout` elapses.
    ///
    /// The probe always runs at least once. Non-fatal probe errors count as
    /// "not yet"; fatal ones end the wait.
    pub async fn until<T, F, Fut>(
        &self,
        condition: &str,
        timeout: Duration,
        mut probe: F,
    ) -> VitrineResult<WaitOutcome<T>>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = VitrineResult<Option<T>>>,
    {
        let start = Instant::now();
        loop {
            match probe().await {
                Ok(Some(value)) => {
                    return Ok(WaitOutcome::Satisfied {
                        value,
                        elapsed: start.elapsed(),
                    })
                }
                Ok(None) => {}
                Err(e) if e.is_fatal() => return Err(e),
                Err(e) => debug!(condition, error = %e, "probe not ready"),
            }

            let elapsed = start.elapsed();
            if elapsed >= timeout {
                return Ok(WaitOutcome::TimedOut {
                    condition: condition.to_string(),
                    timeout,
                });
            }
            tokio::time::sleep(self.poll_interval.min(timeout - elapsed)).await;
        }
    }

    /// Wait for a [`WaitCondition`] against a session
    pub async fn await_condition(
        &self,
        session: &dyn BrowserSession,
        condition: &WaitCondition,
        timeout: Duration,
    ) -> VitrineResult<WaitOutcome<()>> {
        let description = condition.description();
        self.until(&description, timeout, move || async move {
            Ok(condition.holds(session).await?.then_some(()))
        })
        .await
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use crate::mock::{MockElement, MockSession};
    use std::sync::atomic::{AtomicU32, Ordering};

    fn fast() -> Waiter {
        Waiter::new().with_poll_interval(Duration::from_millis(5))
    }

    mod policy_tests {
        use super::*;

        #[test]
        fn test_zero_budget_rejected() {
            let err = WaitPolicy::new(ConditionKind::Visible, Duration::ZERO).unwrap_err();
            assert!(matches!(err, VitrineError::InvalidPolicy { .. }));
        }

        #[test]
        fn test_defaults() {
            let p = WaitPolicy::default();
            assert_eq!(p.kind(), ConditionKind::Visible);
            assert_eq!(p.timeout(), Duration::from_millis(DEFAULT_WAIT_TIMEOUT_MS));
            assert_eq!(WaitPolicy::clickable().kind(), ConditionKind::Clickable);
        }

        #[test]
        fn test_with_timeout_keeps_kind() {
            let p = WaitPolicy::clickable()
                .with_timeout(Duration::from_millis(300))
                .unwrap();
            assert_eq!(p.kind(), ConditionKind::Clickable);
            assert_eq!(p.timeout(), Duration::from_millis(300));
            assert!(WaitPolicy::clickable().with_timeout(Duration::ZERO).is_err());
        }

        #[test]
        fn test_kind_display() {
            assert_eq!(ConditionKind::UrlContains.to_string(), "url-contains");
        }
    }

    mod waiter_tests {
        use super::*;

        #[tokio::test]
        async fn test_immediate_success() {
            let outcome = fast()
                .until("always", Duration::from_millis(50), || async { Ok(Some(7)) })
                .await
                .unwrap();
            assert!(outcome.is_satisfied());
            assert_eq!(outcome.value(), Some(7));
        }

        #[tokio::test]
        async fn test_never_holding_condition_times_out_without_error() {
            let outcome: WaitOutcome<()> = fast()
                .until("never", Duration::from_millis(30), || async { Ok(None) })
                .await
                .unwrap();
            match outcome {
                WaitOutcome::TimedOut { condition, timeout } => {
                    assert_eq!(condition, "never");
                    assert_eq!(timeout, Duration::from_millis(30));
                }
                WaitOutcome::Satisfied { .. } => panic!("should time out"),
            }
        }

        #[tokio::test]
        async fn test_eventual_success_after_polls() {
            let calls = AtomicU32::new(0);
            let outcome = fast()
                .until("third time", Duration::from_secs(1), || {
                    let n = calls.fetch_add(1, Ordering::SeqCst);
                    async move { Ok((n >= 2).then_some(n)) }
                })
                .await
                .unwrap();
            assert_eq!(outcome.value(), Some(2));
            assert_eq!(calls.load(Ordering::SeqCst), 3);
        }

        #[tokio::test]
        async fn test_transient_errors_are_polled_past() {
            let calls = AtomicU32::new(0);
            let outcome = fast()
                .until("stale then ok", Duration::from_secs(1), || {
                    let n = calls.fetch_add(1, Ordering::SeqCst);
                    async move {
                        if n == 0 {
                            Err(VitrineError::StaleElement { id: "e1".into() })
                        } else {
                            Ok(Some(()))
                        }
                    }
                })
                .await
                .unwrap();
            assert!(outcome.is_satisfied());
        }

        #[tokio::test]
        async fn test_fatal_error_ends_wait() {
            let result: VitrineResult<WaitOutcome<()>> = fast()
                .until("dead session", Duration::from_secs(1), || async {
                    Err(VitrineError::SessionLost {
                        message: "closed".into(),
                    })
                })
                .await;
            assert!(matches!(result, Err(VitrineError::SessionLost { .. })));
        }

        #[tokio::test]
        async fn test_into_result_maps_timeout() {
            let outcome: WaitOutcome<()> = WaitOutcome::TimedOut {
                condition: "x".into(),
                timeout: Duration::from_millis(40),
            };
            let err = outcome.into_result().unwrap_err();
            assert!(matches!(err, VitrineError::Timeout { timeout_ms: 40, .. }));
        }
    }

    mod condition_tests {
        use super::*;

        #[tokio::test]
        async fn test_url_contains() {
            let session = MockSession::at("http://shop.test/admin/home");
            let outcome = fast()
                .await_condition(
                    &session,
                    &WaitCondition::UrlContains("/admin/home".into()),
                    Duration::from_millis(50),
                )
                .await
                .unwrap();
            assert!(outcome.is_satisfied());

            let outcome = fast()
                .await_condition(
                    &session,
                    &WaitCondition::UrlLacks("/admin".into()),
                    Duration::from_millis(20),
                )
                .await
                .unwrap();
            assert!(!outcome.is_satisfied());
        }

        #[tokio::test]
        async fn test_visible_after_delayed_render() {
            let session = MockSession::at("http://shop.test/");
            let title = Selector::css("h4.page-title");
            session
                .dom()
                .add(title.clone(), MockElement::new("h4").text("Title").reveal_after(3));
            let outcome = fast()
                .await_condition(&session, &WaitCondition::Visible(title), Duration::from_secs(1))
                .await
                .unwrap();
            assert!(outcome.is_satisfied());
        }

        #[tokio::test]
        async fn test_clickable_requires_enabled() {
            let session = MockSession::at("http://shop.test/");
            let button = Selector::css("button.save");
            session
                .dom()
                .add(button.clone(), MockElement::new("button").disabled());
            let visible = WaitCondition::Visible(button.clone());
            let clickable = WaitCondition::Clickable(button);
            assert!(visible.holds(&session).await.unwrap());
            assert!(!clickable.holds(&session).await.unwrap());
        }

        #[test]
        fn test_descriptions() {
            let c = WaitCondition::UrlContains("/checkout".into());
            assert_eq!(c.description(), "url to contain '/checkout'");
            let v = WaitCondition::Visible(Selector::css("#x"));
            assert!(v.description().contains("#x"));
        }
    }
}
