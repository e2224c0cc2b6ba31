//! Result and error types for Vitrine.

use thiserror::Error;

/// Result type for Vitrine operations
pub type VitrineResult<T> = Result<T, VitrineError>;

/// Errors that can occur while driving a storefront session
#[derive(Debug, Error)]
pub enum VitrineError {
    /// A wait condition did not hold within its budget
    #[error("Timed out after {timeout_ms}ms waiting for {condition}")]
    Timeout {
        /// Human readable condition that was awaited
        condition: String,
        /// Budget in milliseconds
        timeout_ms: u64,
    },

    /// No locator strategy produced a usable element
    #[error("Element '{role}' not found (tried {strategies} strategies)")]
    NotFound {
        /// Role name
        role: String,
        /// Number of strategies evaluated
        strategies: usize,
    },

    /// Element resolved but neither native nor programmatic interaction worked
    #[error("Could not interact with '{role}': native: {native}; programmatic: {programmatic}")]
    Interaction {
        /// Role name
        role: String,
        /// Reason the native attempt was rejected
        native: String,
        /// Reason the programmatic attempt was rejected
        programmatic: String,
    },

    /// Element handle no longer attached to the document
    #[error("Element handle {id} is detached from the document")]
    StaleElement {
        /// Handle identifier
        id: String,
    },

    /// The session refused a single interaction attempt
    #[error("Element {id} not interactable: {reason}")]
    NotInteractable {
        /// Handle identifier
        id: String,
        /// Reason reported by the session
        reason: String,
    },

    /// Browser session went away
    #[error("Browser session lost: {message}")]
    SessionLost {
        /// Error message
        message: String,
    },

    /// Navigation error
    #[error("Navigation to {url} failed: {message}")]
    Navigation {
        /// URL that failed
        url: String,
        /// Error message
        message: String,
    },

    /// Browser launch error
    #[error("Failed to launch browser: {message}")]
    BrowserLaunch {
        /// Error message
        message: String,
    },

    /// Page script raised or returned something unexpected
    #[error("Page script failed: {message}")]
    Script {
        /// Error message
        message: String,
    },

    /// Wait policy violates its invariants
    #[error("Invalid wait policy: {message}")]
    InvalidPolicy {
        /// Error message
        message: String,
    },

    /// Element role violates its invariants
    #[error("Invalid element role: {message}")]
    InvalidRole {
        /// Error message
        message: String,
    },

    /// Configuration error
    #[error("Configuration error: {message}")]
    Config {
        /// Error message
        message: String,
    },

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// YAML serialization error
    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml_ng::Error),
}

impl VitrineError {
    /// Faults that end the session; waits must not poll past them
    #[must_use]
    pub const fn is_fatal(&self) -> bool {
        matches!(self, Self::SessionLost { .. } | Self::BrowserLaunch { .. })
    }

    /// Expected "not there yet" outcomes
    #[must_use]
    pub const fn is_absence(&self) -> bool {
        matches!(
            self,
            Self::Timeout { .. } | Self::NotFound { .. } | Self::StaleElement { .. }
        )
    }

    /// Create a timeout error from a duration
    #[must_use]
    pub fn timeout(condition: impl Into<String>, timeout: std::time::Duration) -> Self {
        Self::Timeout {
            condition: condition.into(),
            timeout_ms: timeout.as_millis() as u64,
        }
    }

    /// Create a configuration error
    #[must_use]
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config {
            message: message.into(),
        }
    }

    /// Create a script error
    #[must_use]
    pub fn script(message: impl Into<String>) -> Self {
        Self::Script {
            message: message.into(),
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[test]
    fn test_timeout_message_carries_condition_and_budget() {
        let err = VitrineError::timeout("url contains '/admin/home'", Duration::from_secs(2));
        let msg = err.to_string();
        assert!(msg.contains("2000ms"));
        assert!(msg.contains("/admin/home"));
    }

    #[test]
    fn test_fatal_classification() {
        assert!(VitrineError::SessionLost {
            message: "gone".into()
        }
        .is_fatal());
        assert!(!VitrineError::StaleElement { id: "x".into() }.is_fatal());
        assert!(!VitrineError::config("bad").is_fatal());
    }

    #[test]
    fn test_absence_classification() {
        assert!(VitrineError::NotFound {
            role: "title".into(),
            strategies: 2
        }
        .is_absence());
        assert!(VitrineError::timeout("x", Duration::from_millis(5)).is_absence());
        assert!(!VitrineError::Interaction {
            role: "r".into(),
            native: "a".into(),
            programmatic: "b".into()
        }
        .is_absence());
    }

    #[test]
    fn test_io_conversion() {
        let io = std::io::Error::new(std::io::ErrorKind::NotFound, "missing");
        let err: VitrineError = io.into();
        assert!(matches!(err, VitrineError::Io(_)));
    }
}
