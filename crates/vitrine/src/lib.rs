//! Vitrine: resilient page-object harness for storefront browser tests
//!
//! Vitrine drives a real browser through a web storefront and its admin
//! back-office, and turns what it observes into PASS / FAIL / SKIP / ERROR
//! outcomes for a catalog of business workflows.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────┐
//! │                    VITRINE Architecture                          │
//! ├─────────────────────────────────────────────────────────────────┤
//! │   ┌────────────┐    ┌────────────┐    ┌────────────┐            │
//! │   │ Scenario   │    │ Page       │    │ Locator +  │            │
//! │   │ Orchestr.  │───►│ Abstraction│───►│ Wait Engine│            │
//! │   └─────┬──────┘    └────────────┘    └─────┬──────┘            │
//! │         │                                   ▼                   │
//! │   ┌─────▼──────┐                      ┌────────────┐            │
//! │   │ Report     │                      │ Browser    │            │
//! │   │ Sink       │                      │ Session    │            │
//! │   └────────────┘                      └────────────┘            │
//! └─────────────────────────────────────────────────────────────────┘
//! ```
//!
//! # Example
//!
//! ```ignore
//! use vitrine::prelude::*;
//!
//! let config = TestConfig::load(Path::new("vitrine.yaml"))?.apply_env();
//! let factory = Arc::new(ChromiumFactory::new(config.browser.clone()));
//! let report = Orchestrator::new(factory, config)
//!     .with_jobs(2)
//!     .run("admin", &scenarios::catalog(Suite::Admin))
//!     .await;
//! println!("{}", report.summary());
//! ```

#![warn(missing_docs)]
#![cfg_attr(test, allow(clippy::large_stack_arrays, clippy::large_stack_frames))]

pub mod assertion;
pub mod browser;
pub mod config;
pub mod data;
pub mod driver;
pub mod harness;
pub mod locator;
pub mod mock;
pub mod page_object;
pub mod pages;
pub mod reporter;
pub mod result;
pub mod scenario;
pub mod scenarios;
pub mod wait;

pub use assertion::{Assertion, AssertionResult};
pub use browser::ChromiumFactory;
pub use config::{BrowserSettings, ConfigProvider, TestConfig, Timeouts};
pub use data::{TestDataGenerator, UniqueDataGenerator};
pub use driver::{BrowserSession, ElementHandle, SessionFactory};
pub use harness::Orchestrator;
pub use locator::{ElementRole, LocatorResolver, Resolution, Selector};
pub use page_object::{PageContext, PageObject};
pub use reporter::{
    FailureMode, MemorySink, OutcomeStatus, ReportLevel, ReportSink, ScenarioRecord, SuiteReport,
    TracingSink,
};
pub use result::{VitrineError, VitrineResult};
pub use scenario::{
    Scenario, ScenarioContext, ScenarioError, ScenarioOutcome, ScenarioResult, Suite,
};
pub use wait::{ConditionKind, WaitCondition, WaitOutcome, WaitPolicy, Waiter};

/// Prelude for convenient imports
pub mod prelude {
    pub use super::assertion::*;
    pub use super::browser::*;
    pub use super::config::*;
    pub use super::data::*;
    pub use super::driver::*;
    pub use super::harness::*;
    pub use super::locator::*;
    pub use super::page_object::*;
    pub use super::pages::admin::{
        DashboardPage, OrdersPage, ProductForm, ProductsPage, ResourceKind, ResourceTable,
    };
    pub use super::pages::{CartPage, CheckoutPage, LoginPage, ProductDetailPage, ShopPage};
    pub use super::reporter::*;
    pub use super::result::*;
    pub use super::scenario::*;
    pub use super::scenarios;
    pub use super::wait::*;
    pub use std::path::Path;
    pub use std::sync::Arc;
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::prelude::*;

    mod prelude_tests {
        use super::*;

        #[test]
        fn test_prelude_exposes_catalogs() {
            assert!(!scenarios::catalog(Suite::User).is_empty());
            assert!(!scenarios::catalog(Suite::Admin).is_empty());
        }

        #[test]
        fn test_default_config_is_valid() {
            let config = TestConfig::default();
            assert!(config.validate().is_ok());
            assert_eq!(config.base_url(), "http://localhost:8080");
        }
    }
}
