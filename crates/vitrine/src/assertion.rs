//! Assertions for scenario verification.
//!
//! Every failing assertion carries the literal message the scenario states,
//! plus the expected and observed values where there are any.

use crate::scenario::{ScenarioError, ScenarioResult};
use std::fmt::Debug;

/// Result of an assertion
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AssertionResult {
    /// Whether the assertion passed
    pub passed: bool,
    /// Human-readable message
    pub message: String,
}

impl AssertionResult {
    /// Create a passing assertion result
    #[must_use]
    pub const fn pass() -> Self {
        Self {
            passed: true,
            message: String::new(),
        }
    }

    /// Create a failing assertion result
    #[must_use]
    pub fn fail(message: impl Into<String>) -> Self {
        Self {
            passed: false,
            message: message.into(),
        }
    }

    /// Turn a failure into a scenario-ending error
    pub fn check(self) -> ScenarioResult {
        if self.passed {
            Ok(())
        } else {
            Err(ScenarioError::Assertion {
                message: self.message,
            })
        }
    }
}

/// Assertion helpers for scenarios
pub struct Assertion;

impl Assertion {
    /// Assert a condition is true
    #[must_use]
    pub fn is_true(condition: bool, message: &str) -> AssertionResult {
        if condition {
            AssertionResult::pass()
        } else {
            AssertionResult::fail(message)
        }
    }

    /// Assert a condition is false
    #[must_use]
    pub fn is_false(condition: bool, message: &str) -> AssertionResult {
        if condition {
            AssertionResult::fail(message)
        } else {
            AssertionResult::pass()
        }
    }

    /// Assert two values are equal
    #[must_use]
    pub fn equals<T: PartialEq + Debug>(expected: &T, actual: &T, message: &str) -> AssertionResult {
        if expected == actual {
            AssertionResult::pass()
        } else {
            AssertionResult::fail(format!("{message}: expected {expected:?}, got {actual:?}"))
        }
    }

    /// Assert a string contains a substring
    #[must_use]
    pub fn contains(haystack: &str, needle: &str, message: &str) -> AssertionResult {
        if haystack.contains(needle) {
            AssertionResult::pass()
        } else {
            AssertionResult::fail(format!("{message}: '{haystack}' does not contain '{needle}'"))
        }
    }

    /// Assert a string does not contain a substring
    #[must_use]
    pub fn lacks(haystack: &str, needle: &str, message: &str) -> AssertionResult {
        if haystack.contains(needle) {
            AssertionResult::fail(format!("{message}: '{haystack}' contains '{needle}'"))
        } else {
            AssertionResult::pass()
        }
    }

    /// Assert a string contains at least one of several substrings
    #[must_use]
    pub fn contains_any(haystack: &str, needles: &[&str], message: &str) -> AssertionResult {
        if needles.iter().any(|n| haystack.contains(n)) {
            AssertionResult::pass()
        } else {
            AssertionResult::fail(format!(
                "{message}: '{haystack}' contains none of {needles:?}"
            ))
        }
    }

    /// Assert a count reaches a minimum
    #[must_use]
    pub fn at_least(actual: usize, minimum: usize, message: &str) -> AssertionResult {
        if actual >= minimum {
            AssertionResult::pass()
        } else {
            AssertionResult::fail(format!("{message}: expected at least {minimum}, got {actual}"))
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;

    #[test]
    fn test_pass_checks_ok() {
        assert!(Assertion::is_true(true, "x").check().is_ok());
        assert!(Assertion::is_false(false, "x").check().is_ok());
    }

    #[test]
    fn test_failure_carries_message() {
        let err = Assertion::is_true(false, "Không ở trang checkout").check().unwrap_err();
        match err {
            ScenarioError::Assertion { message } => assert_eq!(message, "Không ở trang checkout"),
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn test_equals_reports_both_values() {
        let r = Assertion::equals(&"Category B", &"Category A", "Danh mục không đúng");
        assert!(!r.passed);
        assert!(r.message.contains("\"Category B\""));
        assert!(r.message.contains("\"Category A\""));
    }

    #[test]
    fn test_contains_any() {
        let needles = ["không chính xác", "Tài khoản", "sai"];
        assert!(Assertion::contains_any("Mật khẩu sai", &needles, "m").passed);
        assert!(!Assertion::contains_any("Welcome", &needles, "m").passed);
    }

    #[test]
    fn test_url_containment() {
        assert!(Assertion::contains("http://shop.test/admin/home", "/admin/home", "m").passed);
        assert!(!Assertion::lacks("http://shop.test/admin/home", "/admin/home", "m").passed);
        assert!(Assertion::at_least(2, 1, "m").passed);
        assert!(!Assertion::at_least(0, 1, "m").passed);
    }
}
