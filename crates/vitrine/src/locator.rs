//! Locators and the fallback-chain resolver.
//!
//! An [`ElementRole`] names a UI target ("add-product button", "error alert")
//! and carries an ordered list of [`Selector`] strategies: one primary, then
//! zero or more fallbacks. [`LocatorResolver::resolve`] is the logical OR over
//! that list in priority order: the first strategy that yields an element in
//! the state the role's [`WaitPolicy`] asks for wins.
//!
//! Resolution is a single pass. Retrying is the Wait Engine's job.
//!
//! ```ignore
//! let add = ElementRole::new("products", "add-product button",
//!         Selector::xpath("//button[@data-target='#addRowModal']"))
//!     .or(Selector::xpath("//button[contains(@class,'btn-primary') and contains(.,'Add Product')]"))
//!     .with_policy(WaitPolicy::clickable());
//! ```

use crate::driver::{BrowserSession, ElementHandle};
use crate::result::{VitrineError, VitrineResult};
use crate::wait::{ConditionKind, WaitPolicy};
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Attribute the session writes onto every element it hands out
pub const HANDLE_ATTRIBUTE: &str = "data-vitrine-handle";

// =============================================================================
// SELECTOR
// =============================================================================

/// One location strategy
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Selector {
    /// CSS selector
    Css(String),
    /// XPath expression (relative paths are evaluated against the scope)
    XPath(String),
    /// Innermost elements whose text contains the string
    Text(String),
    /// CSS selector narrowed by contained text
    CssWithText {
        /// CSS selector
        css: String,
        /// Text the element must contain
        text: String,
    },
}

impl Selector {
    /// Create a CSS selector
    #[must_use]
    pub fn css(selector: impl Into<String>) -> Self {
        Self::Css(selector.into())
    }

    /// Create an XPath selector
    #[must_use]
    pub fn xpath(expr: impl Into<String>) -> Self {
        Self::XPath(expr.into())
    }

    /// Create a text selector
    #[must_use]
    pub fn text(text: impl Into<String>) -> Self {
        Self::Text(text.into())
    }

    /// Create a CSS + text selector
    #[must_use]
    pub fn css_with_text(css: impl Into<String>, text: impl Into<String>) -> Self {
        Self::CssWithText {
            css: css.into(),
            text: text.into(),
        }
    }

    /// Script expression that evaluates to an `Array` of matching DOM nodes.
    ///
    /// `root` is a script expression for the search scope (`document` or a
    /// previously handed-out element).
    #[must_use]
    pub fn to_collect_query(&self, root: &str) -> String {
        match self {
            Self::Css(s) => format!("Array.from({root}.querySelectorAll({s:?}))"),
            Self::XPath(s) => format!(
                "(() => {{ const r = document.evaluate({s:?}, {root}, null, XPathResult.ORDERED_NODE_SNAPSHOT_TYPE, null); \
                 const out = []; for (let i = 0; i < r.snapshotLength; i++) out.push(r.snapshotItem(i)); return out; }})()"
            ),
            Self::Text(t) => format!(
                "Array.from({root}.querySelectorAll('*')).filter(el => el.textContent.includes({t:?}) \
                 && !Array.from(el.children).some(c => c.textContent.includes({t:?})))"
            ),
            Self::CssWithText { css, text } => format!(
                "Array.from({root}.querySelectorAll({css:?})).filter(el => el.textContent.includes({text:?}))"
            ),
        }
    }

    /// Script expression counting matches in the whole document
    #[must_use]
    pub fn to_count_query(&self) -> String {
        match self {
            Self::Css(s) => format!("document.querySelectorAll({s:?}).length"),
            Self::XPath(s) => {
                format!("document.evaluate({s:?}, document, null, XPathResult.ORDERED_NODE_SNAPSHOT_TYPE, null).snapshotLength")
            }
            other => format!("{}.length", other.to_collect_query("document")),
        }
    }
}

impl std::fmt::Display for Selector {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Css(s) => write!(f, "css={s}"),
            Self::XPath(s) => write!(f, "xpath={s}"),
            Self::Text(t) => write!(f, "text={t}"),
            Self::CssWithText { css, text } => write!(f, "css={css} text={text}"),
        }
    }
}

/// Script expression addressing a handed-out element by its handle id
#[must_use]
pub fn handle_query(id: &str) -> String {
    format!(
        "document.querySelector({:?})",
        format!("[{HANDLE_ATTRIBUTE}=\"{id}\"]")
    )
}

// =============================================================================
// BOUNDING BOX
// =============================================================================

/// Element box in viewport coordinates
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BoundingBox {
    /// X position
    pub x: f32,
    /// Y position
    pub y: f32,
    /// Width
    pub width: f32,
    /// Height
    pub height: f32,
}

impl BoundingBox {
    /// Create a new bounding box
    #[must_use]
    pub const fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Get the center point
    #[must_use]
    pub fn center(&self) -> (f32, f32) {
        (self.x + self.width / 2.0, self.y + self.height / 2.0)
    }

    /// Zero-area boxes are not rendered
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.width <= 0.0 || self.height <= 0.0
    }
}

// =============================================================================
// ELEMENT ROLE
// =============================================================================

/// A named UI target with a primary strategy and ordered fallbacks
#[derive(Debug, Clone, PartialEq)]
pub struct ElementRole {
    page: &'static str,
    name: &'static str,
    primary: Selector,
    fallbacks: Vec<Selector>,
    policy: WaitPolicy,
}

impl ElementRole {
    /// Create a role from its primary strategy
    #[must_use]
    pub fn new(page: &'static str, name: &'static str, primary: Selector) -> Self {
        Self {
            page,
            name,
            primary,
            fallbacks: Vec::new(),
            policy: WaitPolicy::visible(),
        }
    }

    /// Create a role from an ordered strategy list; the list must not be empty
    pub fn from_strategies(
        page: &'static str,
        name: &'static str,
        strategies: Vec<Selector>,
    ) -> VitrineResult<Self> {
        let mut iter = strategies.into_iter();
        let primary = iter.next().ok_or_else(|| VitrineError::InvalidRole {
            message: format!("{page}/{name} needs at least one locator"),
        })?;
        Ok(Self {
            page,
            name,
            primary,
            fallbacks: iter.collect(),
            policy: WaitPolicy::visible(),
        })
    }

    /// Append a fallback strategy
    #[must_use]
    pub fn or(mut self, fallback: Selector) -> Self {
        self.fallbacks.push(fallback);
        self
    }

    /// Set the wait policy
    #[must_use]
    pub const fn with_policy(mut self, policy: WaitPolicy) -> Self {
        self.policy = policy;
        self
    }

    /// Owning page
    #[must_use]
    pub const fn page(&self) -> &'static str {
        self.page
    }

    /// Role name
    #[must_use]
    pub const fn name(&self) -> &'static str {
        self.name
    }

    /// Wait policy
    #[must_use]
    pub const fn policy(&self) -> &WaitPolicy {
        &self.policy
    }

    /// Primary strategy
    #[must_use]
    pub const fn primary(&self) -> &Selector {
        &self.primary
    }

    /// All strategies, primary first
    pub fn strategies(&self) -> impl Iterator<Item = &Selector> {
        std::iter::once(&self.primary).chain(self.fallbacks.iter())
    }

    /// Number of strategies
    #[must_use]
    pub fn strategy_count(&self) -> usize {
        1 + self.fallbacks.len()
    }

    /// Whether a handle is in the state this role's policy requires
    #[must_use]
    pub fn accepts(&self, handle: &ElementHandle) -> bool {
        match self.policy.kind() {
            ConditionKind::Clickable => handle.is_clickable(),
            ConditionKind::Visible | ConditionKind::UrlContains => handle.is_visible(),
        }
    }

    /// "page/name" label
    #[must_use]
    pub fn label(&self) -> String {
        format!("{}/{}", self.page, self.name)
    }
}

// =============================================================================
// RESOLVER
// =============================================================================

/// Result of one resolution pass
#[derive(Debug, Clone, PartialEq)]
pub enum Resolution {
    /// A strategy produced a usable element
    Found {
        /// The element
        handle: ElementHandle,
        /// Index of the winning strategy (0 = primary)
        strategy: usize,
    },
    /// Every strategy came up empty
    NotFound,
}

impl Resolution {
    /// The handle, if found
    #[must_use]
    pub fn found(self) -> Option<ElementHandle> {
        match self {
            Self::Found { handle, .. } => Some(handle),
            Self::NotFound => None,
        }
    }

    /// The handle, or [`VitrineError::NotFound`] naming the role
    pub fn into_handle(self, role: &ElementRole) -> VitrineResult<ElementHandle> {
        self.found().ok_or_else(|| VitrineError::NotFound {
            role: role.label(),
            strategies: role.strategy_count(),
        })
    }
}

/// Resolves roles against a borrowed session
#[derive(Clone, Copy)]
pub struct LocatorResolver<'a> {
    session: &'a dyn BrowserSession,
}

impl std::fmt::Debug for LocatorResolver<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LocatorResolver").finish_non_exhaustive()
    }
}

impl<'a> LocatorResolver<'a> {
    /// Create a resolver over a session
    #[must_use]
    pub const fn new(session: &'a dyn BrowserSession) -> Self {
        Self { session }
    }

    /// Resolve a role against the whole document
    pub async fn resolve(&self, role: &ElementRole) -> VitrineResult<Resolution> {
        self.resolve_in(None, role).await
    }

    /// Resolve a role inside a parent element (e.g. a table row)
    pub async fn resolve_within(
        &self,
        parent: &ElementHandle,
        role: &ElementRole,
    ) -> VitrineResult<Resolution> {
        self.resolve_in(Some(parent), role).await
    }

    /// All elements of the first strategy that matches anything.
    ///
    /// Collections are counted on presence, not visibility.
    pub async fn resolve_all(&self, role: &ElementRole) -> VitrineResult<Vec<ElementHandle>> {
        for (index, selector) in role.strategies().enumerate() {
            match self.session.query_all(selector).await {
                Ok(found) if !found.is_empty() => {
                    if index > 0 {
                        debug!(role = %role.label(), strategy = index, "collection resolved through fallback");
                    }
                    return Ok(found);
                }
                Ok(_) => {}
                Err(e) if e.is_fatal() => return Err(e),
                Err(e) => debug!(role = %role.label(), %selector, error = %e, "strategy failed"),
            }
        }
        Ok(Vec::new())
    }

    async fn resolve_in(
        &self,
        scope: Option<&ElementHandle>,
        role: &ElementRole,
    ) -> VitrineResult<Resolution> {
        for (index, selector) in role.strategies().enumerate() {
            let matches = match scope {
                Some(parent) => self.session.query_within(parent, selector).await,
                None => self.session.query_all(selector).await,
            };
            let matches = match matches {
                Ok(m) => m,
                Err(e) if e.is_fatal() => return Err(e),
                Err(e) => {
                    debug!(role = %role.label(), %selector, error = %e, "strategy failed");
                    continue;
                }
            };
            if let Some(handle) = matches.into_iter().find(|h| role.accepts(h)) {
                if index > 0 {
                    debug!(role = %role.label(), strategy = index, "resolved through fallback");
                }
                return Ok(Resolution::Found {
                    handle,
                    strategy: index,
                });
            }
        }
        Ok(Resolution::NotFound)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use crate::mock::{MockElement, MockSession};
    use proptest::prelude::*;

    fn add_button() -> ElementRole {
        ElementRole::new(
            "products",
            "add-product button",
            Selector::xpath("//button[@data-target='#addRowModal']"),
        )
        .or(Selector::xpath(
            "//button[contains(@class,'btn-primary') and contains(.,'Add Product')]",
        ))
    }

    mod selector_tests {
        use super::*;

        #[test]
        fn test_css_collect_query() {
            let q = Selector::css("table#add-row tbody tr").to_collect_query("document");
            assert!(q.starts_with("Array.from(document.querySelectorAll("));
            assert!(q.contains("table#add-row tbody tr"));
        }

        #[test]
        fn test_xpath_collect_query_uses_scope() {
            let q = Selector::xpath("./td[2]").to_collect_query("row");
            assert!(q.contains("document.evaluate(\"./td[2]\", row"));
            assert!(q.contains("ORDERED_NODE_SNAPSHOT_TYPE"));
        }

        #[test]
        fn test_text_queries_escape_quotes() {
            let q = Selector::text("Add \"Product\"").to_count_query();
            assert!(q.contains("\\\"Product\\\""));
            assert!(q.ends_with(".length"));
        }

        #[test]
        fn test_display() {
            assert_eq!(Selector::css("#a").to_string(), "css=#a");
            assert_eq!(
                Selector::css_with_text("a", "Export").to_string(),
                "css=a text=Export"
            );
        }

        #[test]
        fn test_handle_query() {
            let q = handle_query("h-1");
            assert!(q.contains("data-vitrine-handle"));
            assert!(q.contains("h-1"));
        }
    }

    mod role_tests {
        use super::*;

        #[test]
        fn test_strategy_order() {
            let role = add_button();
            let all: Vec<_> = role.strategies().collect();
            assert_eq!(all.len(), 2);
            assert_eq!(all[0], role.primary());
            assert_eq!(role.strategy_count(), 2);
            assert_eq!(role.label(), "products/add-product button");
        }

        #[test]
        fn test_empty_strategy_list_rejected() {
            let err = ElementRole::from_strategies("p", "r", vec![]).unwrap_err();
            assert!(matches!(err, VitrineError::InvalidRole { .. }));
            let ok = ElementRole::from_strategies("p", "r", vec![Selector::css("a")]).unwrap();
            assert_eq!(ok.strategy_count(), 1);
        }

        #[test]
        fn test_clickable_policy_rejects_disabled() {
            let role = add_button().with_policy(WaitPolicy::clickable());
            let mut handle = ElementHandle::new("h", "button");
            handle.bounding_box = Some(BoundingBox::new(0.0, 0.0, 10.0, 10.0));
            handle.enabled = false;
            assert!(!role.accepts(&handle));
            handle.enabled = true;
            assert!(role.accepts(&handle));
        }
    }

    mod resolver_tests {
        use super::*;

        #[tokio::test]
        async fn test_primary_wins_when_present() {
            let session = MockSession::at("http://shop.test/admin/products");
            let role = add_button();
            for selector in role.strategies() {
                session
                    .dom()
                    .add(selector.clone(), MockElement::new("button").text("Add Product"));
            }
            let resolution = LocatorResolver::new(&session).resolve(&role).await.unwrap();
            assert!(matches!(resolution, Resolution::Found { strategy: 0, .. }));
        }

        #[tokio::test]
        async fn test_fallback_used_when_primary_absent() {
            let session = MockSession::at("http://shop.test/admin/products");
            let role = add_button();
            let fallback = role.strategies().nth(1).unwrap().clone();
            session
                .dom()
                .add(fallback, MockElement::new("button").text("Add Product"));
            let resolution = LocatorResolver::new(&session).resolve(&role).await.unwrap();
            assert!(matches!(resolution, Resolution::Found { strategy: 1, .. }));
        }

        #[tokio::test]
        async fn test_hidden_primary_falls_through() {
            let session = MockSession::at("http://shop.test/admin/products");
            let role = add_button();
            let mut strategies = role.strategies().cloned();
            session
                .dom()
                .add(strategies.next().unwrap(), MockElement::new("button").hidden());
            session
                .dom()
                .add(strategies.next().unwrap(), MockElement::new("button"));
            let resolution = LocatorResolver::new(&session).resolve(&role).await.unwrap();
            assert!(matches!(resolution, Resolution::Found { strategy: 1, .. }));
        }

        #[tokio::test]
        async fn test_not_found_maps_to_error() {
            let session = MockSession::at("http://shop.test/");
            let role = add_button();
            let resolution = LocatorResolver::new(&session).resolve(&role).await.unwrap();
            assert_eq!(resolution, Resolution::NotFound);
            let err = resolution.into_handle(&role).unwrap_err();
            assert!(matches!(err, VitrineError::NotFound { strategies: 2, .. }));
        }

        #[tokio::test]
        async fn test_fatal_session_error_propagates() {
            let session = MockSession::at("http://shop.test/");
            session.lose_session();
            let err = LocatorResolver::new(&session)
                .resolve(&add_button())
                .await
                .unwrap_err();
            assert!(err.is_fatal());
        }

        #[tokio::test]
        async fn test_resolve_all_counts_hidden_rows() {
            let session = MockSession::at("http://shop.test/admin/products");
            let rows = ElementRole::new("products", "rows", Selector::css("#add-row tbody tr"));
            session
                .dom()
                .add(rows.primary().clone(), MockElement::new("tr"));
            session
                .dom()
                .add(rows.primary().clone(), MockElement::new("tr").hidden());
            let all = LocatorResolver::new(&session).resolve_all(&rows).await.unwrap();
            assert_eq!(all.len(), 2);
        }

        #[tokio::test]
        async fn test_resolve_within_row() {
            let session = MockSession::at("http://shop.test/admin/products");
            let row_sel = Selector::css("#add-row tbody tr");
            let edit = ElementRole::new("products", "edit button", Selector::xpath(".//button[contains(@title,'Edit')]"));
            let row_id = session.dom().add(row_sel.clone(), MockElement::new("tr"));
            session
                .dom()
                .add_child(&row_id, edit.primary().clone(), MockElement::new("button"));
            session.dom().add(edit.primary().clone(), MockElement::new("button"));

            let resolver = LocatorResolver::new(&session);
            let row = session.query_all(&row_sel).await.unwrap().remove(0);
            let found = resolver.resolve_within(&row, &edit).await.unwrap();
            let handle = found.found().unwrap();
            assert_eq!(session.dom().parent_of(&handle.id), Some(row_id));
        }
    }

    proptest! {
        #[test]
        fn prop_resolve_is_ordered_or(present in proptest::collection::vec(any::<bool>(), 1..6)) {
            let session = MockSession::at("http://shop.test/");
            let selectors: Vec<Selector> = (0..present.len())
                .map(|i| Selector::css(format!(".strategy-{i}")))
                .collect();
            for (selector, here) in selectors.iter().zip(&present) {
                if *here {
                    session.dom().add(selector.clone(), MockElement::new("div"));
                }
            }
            let role = ElementRole::from_strategies("page", "role", selectors).unwrap();
            let resolution = futures::executor::block_on(LocatorResolver::new(&session).resolve(&role)).unwrap();
            match present.iter().position(|p| *p) {
                Some(first) => {
                    let found_first = matches!(resolution, Resolution::Found { strategy, .. } if strategy == first);
                    prop_assert!(found_first);
                }
                None => prop_assert_eq!(resolution, Resolution::NotFound),
            }
        }
    }
}
