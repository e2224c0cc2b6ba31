//! Page Object support.
//!
//! Every page abstraction wraps a [`PageContext`]: a borrowed session plus
//! the run configuration. The context owns the three operation classes the
//! pages are built from:
//!
//! - **Navigation**: [`PageContext::open`] joins the path onto the base URL
//!   and waits for a page-identifying role.
//! - **Query**: [`PageContext::is_displayed`] and [`PageContext::count`]
//!   absorb absence (timeout, not found, detached) into `false` / `0`; only
//!   fatal session faults come back as `Err`.
//! - **Mutation**: [`PageContext::click`], [`PageContext::fill`] and
//!   [`PageContext::submit`] wait for the target to be clickable, try the
//!   native input path, then the programmatic one, and only then fail with
//!   [`VitrineError::Interaction`].
//!
//! Handles are never kept across a mutation. Table pages take a
//! [`TableSnapshot`] before mutating and wait for the rows to be replaced.

use crate::config::{ConfigProvider, TestConfig};
use crate::driver::{BrowserSession, ElementHandle};
use crate::locator::{ElementRole, LocatorResolver};
use crate::result::{VitrineError, VitrineResult};
use crate::wait::{
    ConditionKind, WaitCondition, WaitOutcome, WaitPolicy, Waiter, DEFAULT_WAIT_TIMEOUT_MS,
};
use std::time::Duration;
use tracing::{debug, info};

/// A page or component of the storefront
pub trait PageObject {
    /// URL substring that identifies the page (e.g. "/admin/products")
    fn url_pattern(&self) -> &str;

    /// Page name for logs
    fn page_name(&self) -> &str {
        std::any::type_name::<Self>()
    }
}

// =============================================================================
// INTERACTION
// =============================================================================

/// Which input path an attempt used
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InteractionPath {
    /// Real pointer / keyboard events
    Native,
    /// Page-script trigger
    Programmatic,
}

impl std::fmt::Display for InteractionPath {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Native => write!(f, "native"),
            Self::Programmatic => write!(f, "programmatic"),
        }
    }
}

/// Result of one interaction attempt
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InteractAttempt {
    /// The session performed the action
    Done,
    /// The session refused; carries the reason
    Rejected(String),
}

#[derive(Debug, Clone, Copy)]
enum Action<'t> {
    Click,
    Fill(&'t str),
    Submit,
}

impl std::fmt::Display for Action<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Click => write!(f, "click"),
            Self::Fill(_) => write!(f, "fill"),
            Self::Submit => write!(f, "submit"),
        }
    }
}

// =============================================================================
// TABLE SNAPSHOT
// =============================================================================

/// Row state captured before a mutation
#[derive(Debug, Clone, PartialEq)]
pub struct TableSnapshot {
    first: Option<ElementHandle>,
    fingerprint: Vec<String>,
}

impl TableSnapshot {
    /// Rows seen when the snapshot was taken
    #[must_use]
    pub fn row_count(&self) -> usize {
        self.fingerprint.len()
    }
}

fn fingerprint(rows: &[ElementHandle]) -> Vec<String> {
    rows.iter().map(|r| r.text().to_string()).collect()
}

// =============================================================================
// PAGE CONTEXT
// =============================================================================

/// Borrowed session plus configuration, shared by every page of a scenario
#[derive(Clone, Copy)]
pub struct PageContext<'a> {
    session: &'a dyn BrowserSession,
    config: &'a TestConfig,
    waiter: Waiter,
}

impl std::fmt::Debug for PageContext<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PageContext")
            .field("base_url", &self.config.base_url())
            .field("waiter", &self.waiter)
            .finish_non_exhaustive()
    }
}

impl<'a> PageContext<'a> {
    /// Create a context over a session
    #[must_use]
    pub fn new(session: &'a dyn BrowserSession, config: &'a TestConfig) -> Self {
        Self {
            session,
            config,
            waiter: Waiter::new().with_poll_interval(config.timeouts.poll()),
        }
    }

    /// The borrowed session
    #[must_use]
    pub fn session(&self) -> &'a dyn BrowserSession {
        self.session
    }

    /// Run configuration
    #[must_use]
    pub const fn config(&self) -> &'a TestConfig {
        self.config
    }

    /// Waiter configured with the run's poll interval
    #[must_use]
    pub const fn waiter(&self) -> Waiter {
        self.waiter
    }

    /// Resolver over the session
    #[must_use]
    pub fn resolver(&self) -> LocatorResolver<'a> {
        LocatorResolver::new(self.session)
    }

    /// Absolute URL for an application path
    #[must_use]
    pub fn url(&self, path: &str) -> String {
        self.config.url_for(path)
    }

    /// Budget for a role: roles on the default budget follow the configured
    /// element timeout, explicit budgets are kept
    #[must_use]
    pub fn budget(&self, policy: &WaitPolicy) -> Duration {
        if policy.timeout() == Duration::from_millis(DEFAULT_WAIT_TIMEOUT_MS) {
            self.config.timeouts.element()
        } else {
            policy.timeout()
        }
    }

    // ---- navigation -------------------------------------------------------

    /// Load a path without waiting for any element
    pub async fn goto(&self, path: &str) -> VitrineResult<()> {
        let url = self.url(path);
        info!(%url, "navigating");
        self.session.navigate(&url).await.map_err(|e| {
            if e.is_fatal() {
                e
            } else {
                VitrineError::Navigation {
                    url: url.clone(),
                    message: e.to_string(),
                }
            }
        })
    }

    /// Load a path and wait for its title role
    pub async fn open(&self, path: &str, title: &ElementRole) -> VitrineResult<()> {
        self.goto(path).await?;
        let budget = self.config.timeouts.navigation();
        match self.locate_for(title, budget).await? {
            WaitOutcome::Satisfied { .. } => Ok(()),
            WaitOutcome::TimedOut { condition, timeout } => Err(VitrineError::Navigation {
                url: self.url(path),
                message: VitrineError::timeout(condition, timeout).to_string(),
            }),
        }
    }

    /// Whether the current location matches a page
    pub async fn is_on(&self, page: &impl PageObject) -> VitrineResult<bool> {
        self.url_contains(page.url_pattern()).await
    }

    // ---- observation ------------------------------------------------------

    /// Current location
    pub async fn current_url(&self) -> VitrineResult<String> {
        self.session.current_url().await
    }

    /// Whether the current location contains a substring
    pub async fn url_contains(&self, needle: &str) -> VitrineResult<bool> {
        Ok(self.current_url().await?.contains(needle))
    }

    /// Wait (post-action budget) for the location to contain a substring
    pub async fn wait_for_url(&self, needle: &str) -> VitrineResult<bool> {
        let condition = WaitCondition::UrlContains(needle.to_string());
        let outcome = self
            .waiter
            .await_condition(self.session, &condition, self.config.timeouts.settle())
            .await?;
        Ok(outcome.is_satisfied())
    }

    /// Wait (post-action budget) for the location to stop containing a substring
    pub async fn wait_for_url_change(&self, from: &str) -> VitrineResult<bool> {
        let condition = WaitCondition::UrlLacks(from.to_string());
        let outcome = self
            .waiter
            .await_condition(self.session, &condition, self.config.timeouts.settle())
            .await?;
        Ok(outcome.is_satisfied())
    }

    /// Poll a role until it resolves in the state its policy requires
    pub async fn locate(&self, role: &ElementRole) -> VitrineResult<WaitOutcome<ElementHandle>> {
        self.locate_for(role, self.budget(role.policy())).await
    }

    async fn locate_for(
        &self,
        role: &ElementRole,
        budget: Duration,
    ) -> VitrineResult<WaitOutcome<ElementHandle>> {
        let resolver = self.resolver();
        let label = format!("{} to be {}", role.label(), role.policy().kind());
        self.waiter
            .until(&label, budget, move || async move {
                Ok(resolver.resolve(role).await?.found())
            })
            .await
    }

    /// Resolve a role or fail with the awaited condition and budget
    pub async fn require(&self, role: &ElementRole) -> VitrineResult<ElementHandle> {
        self.locate(role).await?.into_result()
    }

    /// `true` once the role is visible; absence is `false`
    pub async fn is_displayed(&self, role: &ElementRole) -> VitrineResult<bool> {
        match self.locate(role).await {
            Ok(outcome) => Ok(outcome.is_satisfied()),
            Err(e) if e.is_fatal() => Err(e),
            Err(e) => {
                debug!(role = %role.label(), error = %e, "treating as not displayed");
                Ok(false)
            }
        }
    }

    /// `true` if the role is visible right now, without waiting
    pub async fn is_present_now(&self, role: &ElementRole) -> VitrineResult<bool> {
        match self.resolver().resolve(role).await {
            Ok(resolution) => Ok(resolution.found().is_some()),
            Err(e) if e.is_fatal() => Err(e),
            Err(_) => Ok(false),
        }
    }

    /// Items of a collection once its container is visible; `0` when the
    /// container never shows
    pub async fn count(&self, container: &ElementRole, items: &ElementRole) -> VitrineResult<usize> {
        if !self.is_displayed(container).await? {
            return Ok(0);
        }
        Ok(self.items(items).await?.len())
    }

    /// Current members of a collection, without waiting
    pub async fn items(&self, items: &ElementRole) -> VitrineResult<Vec<ElementHandle>> {
        match self.resolver().resolve_all(items).await {
            Ok(found) => Ok(found),
            Err(e) if e.is_fatal() => Err(e),
            Err(e) => {
                debug!(role = %items.label(), error = %e, "treating collection as empty");
                Ok(Vec::new())
            }
        }
    }

    /// Trimmed text of a role; absence is an error
    pub async fn text(&self, role: &ElementRole) -> VitrineResult<String> {
        Ok(self.require(role).await?.text().to_string())
    }

    /// Trimmed text of a role inside `parent`
    pub async fn text_within(&self, parent: &ElementHandle, role: &ElementRole) -> VitrineResult<String> {
        Ok(self.require_within(parent, role).await?.text().to_string())
    }

    /// Current value of a form control
    pub async fn value(&self, role: &ElementRole) -> VitrineResult<String> {
        Ok(self.require(role).await?.value.unwrap_or_default())
    }

    // ---- mutation ---------------------------------------------------------

    /// Click a role
    pub async fn click(&self, role: &ElementRole) -> VitrineResult<()> {
        let handle = self.require_clickable(role).await?;
        self.interact(role, &handle, Action::Click).await
    }

    /// Click an already-resolved element (e.g. a button inside a row)
    pub async fn click_handle(&self, role: &ElementRole, handle: &ElementHandle) -> VitrineResult<()> {
        self.interact(role, handle, Action::Click).await
    }

    /// Replace a control's value
    pub async fn fill(&self, role: &ElementRole, text: &str) -> VitrineResult<()> {
        let handle = self.require_clickable(role).await?;
        self.interact(role, &handle, Action::Fill(text)).await
    }

    /// Replace the value of an already-resolved control
    pub async fn fill_handle(
        &self,
        role: &ElementRole,
        handle: &ElementHandle,
        text: &str,
    ) -> VitrineResult<()> {
        self.interact(role, handle, Action::Fill(text)).await
    }

    /// Submit the form owning a control
    pub async fn submit(&self, role: &ElementRole) -> VitrineResult<()> {
        let handle = self.require(role).await?;
        self.interact(role, &handle, Action::Submit).await
    }

    /// Submit the form owning an already-resolved control
    pub async fn submit_handle(&self, role: &ElementRole, handle: &ElementHandle) -> VitrineResult<()> {
        self.interact(role, handle, Action::Submit).await
    }

    /// Resolve a role inside `parent` (single pass; the parent is already live)
    pub async fn require_within(
        &self,
        parent: &ElementHandle,
        role: &ElementRole,
    ) -> VitrineResult<ElementHandle> {
        self.resolver().resolve_within(parent, role).await?.into_handle(role)
    }

    /// Pick the option whose label contains `text`
    pub async fn select(&self, role: &ElementRole, text: &str) -> VitrineResult<()> {
        let handle = self.require_clickable(role).await?;
        self.select_handle(role, &handle, text).await
    }

    /// Pick an option of an already-resolved select
    pub async fn select_handle(
        &self,
        role: &ElementRole,
        handle: &ElementHandle,
        text: &str,
    ) -> VitrineResult<()> {
        match self.session.select_by_text(handle, text).await {
            Ok(()) => Ok(()),
            Err(e) if e.is_fatal() => Err(e),
            Err(e) => Err(VitrineError::Interaction {
                role: role.label(),
                native: e.to_string(),
                programmatic: "selection has no script fallback".to_string(),
            }),
        }
    }

    async fn require_clickable(&self, role: &ElementRole) -> VitrineResult<ElementHandle> {
        if role.policy().kind() == ConditionKind::Clickable {
            return self.require(role).await;
        }
        let policy = WaitPolicy::new(ConditionKind::Clickable, self.budget(role.policy()))?;
        self.require(&role.clone().with_policy(policy)).await
    }

    async fn interact(
        &self,
        role: &ElementRole,
        handle: &ElementHandle,
        action: Action<'_>,
    ) -> VitrineResult<()> {
        let native = match self.attempt(InteractionPath::Native, handle, action).await? {
            InteractAttempt::Done => return Ok(()),
            InteractAttempt::Rejected(reason) => reason,
        };
        debug!(role = %role.label(), %action, reason = %native, "native path rejected, trying script");
        match self.attempt(InteractionPath::Programmatic, handle, action).await? {
            InteractAttempt::Done => Ok(()),
            InteractAttempt::Rejected(programmatic) => Err(VitrineError::Interaction {
                role: role.label(),
                native,
                programmatic,
            }),
        }
    }

    async fn attempt(
        &self,
        path: InteractionPath,
        handle: &ElementHandle,
        action: Action<'_>,
    ) -> VitrineResult<InteractAttempt> {
        let s = self.session;
        let result = match (path, action) {
            (InteractionPath::Native, Action::Click) => s.native_click(handle).await,
            (InteractionPath::Native, Action::Fill(text)) => s.native_fill(handle, text).await,
            (InteractionPath::Native, Action::Submit) => s.native_submit(handle).await,
            (InteractionPath::Programmatic, Action::Click) => s.programmatic_click(handle).await,
            (InteractionPath::Programmatic, Action::Fill(text)) => {
                s.programmatic_fill(handle, text).await
            }
            (InteractionPath::Programmatic, Action::Submit) => s.programmatic_submit(handle).await,
        };
        match result {
            Ok(()) => Ok(InteractAttempt::Done),
            Err(e) if e.is_fatal() => Err(e),
            Err(e) => Ok(InteractAttempt::Rejected(e.to_string())),
        }
    }

    // ---- post-mutation ----------------------------------------------------

    /// Capture the rows of a table before mutating it
    pub async fn snapshot(&self, rows: &ElementRole) -> VitrineResult<TableSnapshot> {
        let found = self.items(rows).await?;
        Ok(TableSnapshot {
            fingerprint: fingerprint(&found),
            first: found.into_iter().next(),
        })
    }

    /// Wait (post-action budget) until the rows differ from `before`: the
    /// first row detached or the row texts changed. A table that legitimately
    /// stays the same ends the wait as `false`.
    pub async fn await_refresh(&self, rows: &ElementRole, before: &TableSnapshot) -> VitrineResult<bool> {
        let session = self.session;
        let outcome = self
            .waiter
            .until(
                &format!("{} to refresh", rows.label()),
                self.config.timeouts.settle(),
                move || async move {
                    if let Some(first) = &before.first {
                        match session.refresh(first).await {
                            Err(e) if e.is_fatal() => return Err(e),
                            Err(_) => return Ok(Some(())),
                            Ok(_) => {}
                        }
                    }
                    let now = self.items(rows).await?;
                    Ok((fingerprint(&now) != before.fingerprint).then_some(()))
                },
            )
            .await?;
        if !outcome.is_satisfied() {
            debug!(role = %rows.label(), "rows unchanged after mutation");
        }
        Ok(outcome.is_satisfied())
    }

    /// Wait (post-action budget) until a collection has exactly `expected` items
    pub async fn await_count(&self, items: &ElementRole, expected: usize) -> VitrineResult<bool> {
        let outcome = self
            .waiter
            .until(
                &format!("{} to count {expected}", items.label()),
                self.config.timeouts.settle(),
                move || async move { Ok((self.items(items).await?.len() == expected).then_some(())) },
            )
            .await?;
        Ok(outcome.is_satisfied())
    }
}
