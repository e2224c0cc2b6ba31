//! Test Data Generator: unique identifiers for registration scenarios.

use std::sync::atomic::{AtomicU64, Ordering};
use uuid::Uuid;

/// Source of identifiers that are unique per call within a run
pub trait TestDataGenerator: Send + Sync {
    /// Fresh customer login id
    fn unique_customer_id(&self) -> String;

    /// Fresh display name
    fn unique_fullname(&self) -> String;

    /// Fresh email address
    fn unique_email(&self) -> String;
}

/// Run-scoped random prefix plus a monotonic counter
#[derive(Debug)]
pub struct UniqueDataGenerator {
    run: String,
    counter: AtomicU64,
}

impl Default for UniqueDataGenerator {
    fn default() -> Self {
        Self::new()
    }
}

impl UniqueDataGenerator {
    /// Create a generator with a random run prefix
    #[must_use]
    pub fn new() -> Self {
        let run = Uuid::new_v4().simple().to_string();
        Self::with_prefix(&run[..8])
    }

    /// Create a generator with a fixed run prefix
    #[must_use]
    pub fn with_prefix(run: &str) -> Self {
        Self {
            run: run.to_string(),
            counter: AtomicU64::new(0),
        }
    }

    fn suffix(&self) -> String {
        let n = self.counter.fetch_add(1, Ordering::Relaxed);
        format!("{}{n:04}", self.run)
    }
}

impl TestDataGenerator for UniqueDataGenerator {
    fn unique_customer_id(&self) -> String {
        format!("user{}", self.suffix())
    }

    fn unique_fullname(&self) -> String {
        format!("Test User {}", self.suffix())
    }

    fn unique_email(&self) -> String {
        format!("test.{}@example.com", self.suffix())
    }
}
