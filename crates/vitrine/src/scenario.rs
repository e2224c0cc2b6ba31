//! Scenario model.
//!
//! A [`Scenario`] is a tagged async function over a [`ScenarioContext`]. The
//! context owns the session acquired for this one scenario and hands out
//! page abstractions borrowing it, so nothing outlives the scenario.
//!
//! Outcomes:
//!
//! | result                            | outcome   |
//! |-----------------------------------|-----------|
//! | `Ok(())`                          | PASS      |
//! | `ScenarioError::Assertion`        | FAIL      |
//! | `ScenarioError::Skipped`          | SKIP      |
//! | `ScenarioError::Harness`          | ERROR     |
//!
//! `?` on a [`VitrineError`] maps timeouts, missing elements and failed
//! navigations to FAIL (the page did not reach the awaited state) and every
//! other fault to ERROR (the harness could not complete the step).

use crate::config::{keys, ConfigProvider, TestConfig};
use crate::data::TestDataGenerator;
use crate::driver::BrowserSession;
use crate::page_object::PageContext;
use crate::pages::admin::{DashboardPage, OrdersPage, ProductsPage, ResourceTable};
use crate::pages::{CartPage, CheckoutPage, LoginPage, ProductDetailPage, ShopPage};
use crate::reporter::{ReportLevel, ReportSink};
use crate::result::VitrineError;
use futures::future::BoxFuture;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use thiserror::Error;

/// Back-office identity
pub const ADMIN_ID: &str = "admin";
/// Back-office password
pub const ADMIN_PASSWORD: &str = "123123";

// =============================================================================
// OUTCOMES
// =============================================================================

/// Scenario catalog
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Suite {
    /// Storefront: registration, login, shop, cart, checkout
    User,
    /// Back-office: authentication, dashboard, resource management
    Admin,
}

impl Suite {
    /// Both catalogs
    pub const ALL: [Self; 2] = [Self::User, Self::Admin];

    /// Lowercase name
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::User => "user",
            Self::Admin => "admin",
        }
    }
}

impl std::fmt::Display for Suite {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Early exit of a scenario
#[derive(Debug, Error)]
pub enum ScenarioError {
    /// Observed state did not match the expectation
    #[error("{message}")]
    Assertion {
        /// Literal assertion message with expected/observed values
        message: String,
    },

    /// Required fixture data is absent
    #[error("skipped: {reason}")]
    Skipped {
        /// Why the scenario could not apply
        reason: String,
    },

    /// The harness could not complete a step
    #[error("{0}")]
    Harness(#[source] VitrineError),
}

impl ScenarioError {
    /// Skip with a reason
    #[must_use]
    pub fn skip(reason: impl Into<String>) -> Self {
        Self::Skipped {
            reason: reason.into(),
        }
    }
}

impl From<VitrineError> for ScenarioError {
    fn from(e: VitrineError) -> Self {
        if e.is_absence() || matches!(e, VitrineError::Navigation { .. }) {
            Self::Assertion {
                message: e.to_string(),
            }
        } else {
            Self::Harness(e)
        }
    }
}

/// Result of a scenario body
pub type ScenarioResult<T = ()> = Result<T, ScenarioError>;

/// Classified result of one scenario
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum ScenarioOutcome {
    /// Every assertion held
    Passed,
    /// An assertion failed
    Failed(String),
    /// Preconditions were not met
    Skipped(String),
    /// The harness could not complete the scenario
    Errored(String),
}

impl ScenarioOutcome {
    /// Message carried by non-passing outcomes
    #[must_use]
    pub fn message(&self) -> Option<&str> {
        match self {
            Self::Passed => None,
            Self::Failed(m) | Self::Skipped(m) | Self::Errored(m) => Some(m),
        }
    }
}

impl From<ScenarioResult> for ScenarioOutcome {
    fn from(result: ScenarioResult) -> Self {
        match result {
            Ok(()) => Self::Passed,
            Err(ScenarioError::Assertion { message }) => Self::Failed(message),
            Err(ScenarioError::Skipped { reason }) => Self::Skipped(reason),
            Err(ScenarioError::Harness(e)) => Self::Errored(e.to_string()),
        }
    }
}

// =============================================================================
// CONTEXT
// =============================================================================

/// Everything one scenario may touch
pub struct ScenarioContext {
    session: Box<dyn BrowserSession>,
    config: Arc<TestConfig>,
    data: Arc<dyn TestDataGenerator>,
    sink: Arc<dyn ReportSink>,
}

impl std::fmt::Debug for ScenarioContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ScenarioContext")
            .field("base_url", &self.config.base_url())
            .finish_non_exhaustive()
    }
}

impl ScenarioContext {
    /// Create a context around an acquired session
    #[must_use]
    pub fn new(
        session: Box<dyn BrowserSession>,
        config: Arc<TestConfig>,
        data: Arc<dyn TestDataGenerator>,
        sink: Arc<dyn ReportSink>,
    ) -> Self {
        Self {
            session,
            config,
            data,
            sink,
        }
    }

    /// Give the session back for release
    #[must_use]
    pub fn into_session(self) -> Box<dyn BrowserSession> {
        self.session
    }

    /// The scenario's session
    #[must_use]
    pub fn session(&self) -> &dyn BrowserSession {
        self.session.as_ref()
    }

    /// Run configuration
    #[must_use]
    pub fn config(&self) -> &TestConfig {
        &self.config
    }

    /// Unique value generator
    #[must_use]
    pub fn data(&self) -> &dyn TestDataGenerator {
        self.data.as_ref()
    }

    /// Log an INFO line to the report sink
    pub fn info(&self, message: &str) {
        self.sink.log(ReportLevel::Info, message);
    }

    /// Page context over this scenario's session
    #[must_use]
    pub fn page(&self) -> PageContext<'_> {
        PageContext::new(self.session.as_ref(), &self.config)
    }

    /// Login / Register page
    #[must_use]
    pub fn login_page(&self) -> LoginPage<'_> {
        LoginPage::new(self.page())
    }

    /// Shop listing
    #[must_use]
    pub fn shop(&self) -> ShopPage<'_> {
        ShopPage::new(self.page())
    }

    /// Product detail page
    #[must_use]
    pub fn product_detail(&self) -> ProductDetailPage<'_> {
        ProductDetailPage::new(self.page())
    }

    /// Shopping cart
    #[must_use]
    pub fn cart(&self) -> CartPage<'_> {
        CartPage::new(self.page())
    }

    /// Checkout form
    #[must_use]
    pub fn checkout(&self) -> CheckoutPage<'_> {
        CheckoutPage::new(self.page())
    }

    /// Admin dashboard
    #[must_use]
    pub fn dashboard(&self) -> DashboardPage<'_> {
        DashboardPage::new(self.page())
    }

    /// Admin products
    #[must_use]
    pub fn products(&self) -> ProductsPage<'_> {
        ProductsPage::new(self.page())
    }

    /// Admin orders
    #[must_use]
    pub fn orders(&self) -> OrdersPage<'_> {
        OrdersPage::new(self.page())
    }

    /// Admin customers
    #[must_use]
    pub fn customers(&self) -> ResourceTable<'_> {
        ResourceTable::customers(self.page())
    }

    /// Admin categories
    #[must_use]
    pub fn categories(&self) -> ResourceTable<'_> {
        ResourceTable::categories(self.page())
    }

    /// Admin suppliers
    #[must_use]
    pub fn suppliers(&self) -> ResourceTable<'_> {
        ResourceTable::suppliers(self.page())
    }

    /// Open `/login` and sign in
    pub async fn login_as(&self, customer_id: &str, password: &str) -> ScenarioResult {
        let login = self.login_page();
        login.navigate().await?;
        login.login(customer_id, password).await?;
        Ok(())
    }

    /// Sign in with the back-office identity
    pub async fn login_as_admin(&self) -> ScenarioResult {
        self.login_as(ADMIN_ID, ADMIN_PASSWORD).await
    }

    /// Sign in with the configured storefront user
    pub async fn login_as_user(&self) -> ScenarioResult {
        let (id, password) = self.user_credentials()?;
        self.login_as(id, password).await
    }

    /// Configured storefront user; missing properties are a harness error
    pub fn user_credentials(&self) -> ScenarioResult<(&str, &str)> {
        let id = self.config.require(keys::USER_ID).map_err(ScenarioError::Harness)?;
        let password = self
            .config
            .require(keys::USER_PASSWORD)
            .map_err(ScenarioError::Harness)?;
        Ok((id, password))
    }

    /// Skip unless a collection has at least one member
    pub fn require_rows(&self, count: usize, reason: &str) -> ScenarioResult {
        if count == 0 {
            return Err(ScenarioError::skip(reason));
        }
        Ok(())
    }
}

// =============================================================================
// SCENARIO
// =============================================================================

/// Body of a scenario
pub type ScenarioFn = for<'a> fn(&'a ScenarioContext) -> BoxFuture<'a, ScenarioResult>;

/// One end-to-end workflow
#[derive(Clone, Copy)]
pub struct Scenario {
    /// Catalog
    pub suite: Suite,
    /// Order within the catalog
    pub priority: u32,
    /// Stable identifier
    pub id: &'static str,
    /// Human description
    pub description: &'static str,
    run: ScenarioFn,
}

impl std::fmt::Debug for Scenario {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Scenario")
            .field("suite", &self.suite)
            .field("priority", &self.priority)
            .field("id", &self.id)
            .field("description", &self.description)
            .finish_non_exhaustive()
    }
}

impl Scenario {
    /// Create a scenario
    #[must_use]
    pub const fn new(
        suite: Suite,
        priority: u32,
        id: &'static str,
        description: &'static str,
        run: ScenarioFn,
    ) -> Self {
        Self {
            suite,
            priority,
            id,
            description,
            run,
        }
    }

    /// Ordering key
    #[must_use]
    pub const fn key(&self) -> (Suite, u32, &'static str) {
        (self.suite, self.priority, self.id)
    }

    /// Whether `filter` occurs in the id or the description
    #[must_use]
    pub fn matches(&self, filter: &str) -> bool {
        let filter = filter.to_lowercase();
        self.id.to_lowercase().contains(&filter) || self.description.to_lowercase().contains(&filter)
    }

    /// Run the body
    pub fn run<'a>(&self, ctx: &'a ScenarioContext) -> BoxFuture<'a, ScenarioResult> {
        (self.run)(ctx)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use crate::data::UniqueDataGenerator;
    use crate::mock::MockSession;
    use crate::reporter::MemorySink;
    use futures::FutureExt;
    use std::time::Duration;

    fn context(config: TestConfig, sink: Arc<MemorySink>) -> ScenarioContext {
        ScenarioContext::new(
            Box::new(MockSession::new()),
            Arc::new(config),
            Arc::new(UniqueDataGenerator::with_prefix("t")),
            sink,
        )
    }

    mod classification_tests {
        use super::*;

        #[test]
        fn test_timeout_is_failure() {
            let e: ScenarioError = VitrineError::timeout("login/error alert to be visible", Duration::from_millis(2000)).into();
            let outcome = ScenarioOutcome::from(Err(e));
            match outcome {
                ScenarioOutcome::Failed(m) => {
                    assert!(m.contains("2000ms"));
                    assert!(m.contains("login/error alert"));
                }
                other => panic!("unexpected {other:?}"),
            }
        }

        #[test]
        fn test_navigation_is_failure() {
            let e: ScenarioError = VitrineError::Navigation {
                url: "http://shop.test/admin/products".into(),
                message: "title never showed".into(),
            }
            .into();
            assert!(matches!(e, ScenarioError::Assertion { .. }));
        }

        #[test]
        fn test_session_and_interaction_faults_are_errors() {
            let lost: ScenarioError = VitrineError::SessionLost {
                message: "gone".into(),
            }
            .into();
            assert!(matches!(ScenarioOutcome::from(Err(lost)), ScenarioOutcome::Errored(_)));

            let stuck: ScenarioError = VitrineError::Interaction {
                role: "cart/quantity input".into(),
                native: "intercepted".into(),
                programmatic: "ignored".into(),
            }
            .into();
            assert!(matches!(stuck, ScenarioError::Harness(_)));
        }

        #[test]
        fn test_skip_and_pass() {
            assert_eq!(ScenarioOutcome::from(Ok(())), ScenarioOutcome::Passed);
            let skipped = ScenarioOutcome::from(Err(ScenarioError::skip("no orders")));
            assert_eq!(skipped.message(), Some("no orders"));
        }
    }

    mod context_tests {
        use super::*;

        #[test]
        fn test_missing_user_credentials_is_harness_error() {
            let ctx = context(TestConfig::default(), Arc::new(MemorySink::new()));
            assert!(matches!(ctx.user_credentials(), Err(ScenarioError::Harness(_))));

            let ctx = context(
                TestConfig::default()
                    .with_property(keys::USER_ID, "alice")
                    .with_property(keys::USER_PASSWORD, "pw"),
                Arc::new(MemorySink::new()),
            );
            assert_eq!(ctx.user_credentials().unwrap(), ("alice", "pw"));
        }

        #[test]
        fn test_require_rows_skips_on_empty() {
            let sink = Arc::new(MemorySink::new());
            let ctx = context(TestConfig::default(), Arc::clone(&sink));
            assert!(ctx.require_rows(3, "no rows").is_ok());
            assert!(matches!(ctx.require_rows(0, "no rows"), Err(ScenarioError::Skipped { .. })));
            ctx.info("checked");
            assert_eq!(sink.at(ReportLevel::Info), vec!["checked".to_string()]);
        }
    }

    mod scenario_tests {
        use super::*;

        async fn noop_body(_: &ScenarioContext) -> ScenarioResult {
            Ok(())
        }

        fn noop(ctx: &ScenarioContext) -> BoxFuture<'_, ScenarioResult> {
            noop_body(ctx).boxed()
        }

        #[test]
        fn test_filter_matches_id_and_description() {
            let s = Scenario::new(Suite::Admin, 35, "admin-search-by-name", "Products - search by name", noop);
            assert!(s.matches("SEARCH"));
            assert!(s.matches("by name"));
            assert!(!s.matches("checkout"));
            assert_eq!(s.key(), (Suite::Admin, 35, "admin-search-by-name"));
        }

        #[tokio::test]
        async fn test_run_invokes_body() {
            let s = Scenario::new(Suite::User, 1, "noop", "noop", noop);
            let ctx = context(TestConfig::default(), Arc::new(MemorySink::new()));
            assert!(s.run(&ctx).await.is_ok());
        }

        #[test]
        fn test_suite_order() {
            assert!(Suite::User < Suite::Admin);
            assert_eq!(Suite::Admin.to_string(), "admin");
        }
    }
}
