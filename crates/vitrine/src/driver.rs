//! Browser session seam.
//!
//! The page layer never talks to a browser directly. It borrows a
//! [`BrowserSession`] for the lifetime of one scenario; the session is
//! acquired and released by a [`SessionFactory`] owned by the orchestrator.
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────────┐
//! │  BrowserSession (async trait)                                │
//! ├──────────────────────────────────────────────────────────────┤
//! │  ┌──────────────────────┐        ┌────────────────────────┐  │
//! │  │  ChromiumSession     │        │  MockSession           │  │
//! │  │  (feature "browser") │        │  (unit + flow tests)   │  │
//! │  │  CDP via chromiumoxide│       │  scripted in-memory DOM│  │
//! │  └──────────────────────┘        └────────────────────────┘  │
//! └──────────────────────────────────────────────────────────────┘
//! ```
//!
//! Interactions come in two tiers. `native_*` methods go through the real
//! input pipeline (pointer, keyboard) and can be refused by overlays or
//! animation; `programmatic_*` methods trigger the same behaviour from page
//! script. The page layer tries them in that order.

use crate::locator::{BoundingBox, Selector};
use crate::result::VitrineResult;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// Element handle for DOM interactions
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ElementHandle {
    /// Unique identifier for the element within its session
    pub id: String,
    /// Element tag name
    pub tag_name: String,
    /// Rendered text content
    pub text_content: Option<String>,
    /// Current value for form controls
    pub value: Option<String>,
    /// Whether the control accepts input
    pub enabled: bool,
    /// Bounding box if rendered
    pub bounding_box: Option<BoundingBox>,
}

impl ElementHandle {
    /// Create a new element handle
    #[must_use]
    pub fn new(id: impl Into<String>, tag_name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            tag_name: tag_name.into(),
            text_content: None,
            value: None,
            enabled: true,
            bounding_box: None,
        }
    }

    /// Check if element is visible
    #[must_use]
    pub fn is_visible(&self) -> bool {
        self.bounding_box.is_some_and(|b| !b.is_empty())
    }

    /// Visible and enabled
    #[must_use]
    pub fn is_clickable(&self) -> bool {
        self.is_visible() && self.enabled
    }

    /// Trimmed text, empty when the element has none
    #[must_use]
    pub fn text(&self) -> &str {
        self.text_content.as_deref().map_or("", str::trim)
    }
}

/// A live browser tab driven by the harness
#[async_trait]
pub trait BrowserSession: Send + Sync {
    /// Navigate to URL and wait for the document to load
    async fn navigate(&self, url: &str) -> VitrineResult<()>;

    /// Current location
    async fn current_url(&self) -> VitrineResult<String>;

    /// All elements matching a selector, in document order
    async fn query_all(&self, selector: &Selector) -> VitrineResult<Vec<ElementHandle>>;

    /// Elements matching a selector inside `parent`
    async fn query_within(
        &self,
        parent: &ElementHandle,
        selector: &Selector,
    ) -> VitrineResult<Vec<ElementHandle>>;

    /// Re-read a handle's state; `StaleElement` once it left the document
    async fn refresh(&self, handle: &ElementHandle) -> VitrineResult<ElementHandle>;

    /// Real pointer click
    async fn native_click(&self, handle: &ElementHandle) -> VitrineResult<()>;

    /// Script-level `click()`
    async fn programmatic_click(&self, handle: &ElementHandle) -> VitrineResult<()>;

    /// Focus, clear and type through the keyboard pipeline
    async fn native_fill(&self, handle: &ElementHandle, text: &str) -> VitrineResult<()>;

    /// Assign `value` and dispatch `input`/`change`
    async fn programmatic_fill(&self, handle: &ElementHandle, text: &str) -> VitrineResult<()>;

    /// Press Enter in the control
    async fn native_submit(&self, handle: &ElementHandle) -> VitrineResult<()>;

    /// Submit the owning form from script
    async fn programmatic_submit(&self, handle: &ElementHandle) -> VitrineResult<()>;

    /// Pick the `<option>` whose label contains `text`
    async fn select_by_text(&self, handle: &ElementHandle, text: &str) -> VitrineResult<()>;

    /// Close the tab
    async fn close(&self) -> VitrineResult<()>;
}

/// Hands out one exclusively-owned session per scenario
#[async_trait]
pub trait SessionFactory: Send + Sync {
    /// Acquire a fresh session
    async fn acquire(&self) -> VitrineResult<Box<dyn BrowserSession>>;

    /// Release a session; called exactly once per acquired session
    async fn release(&self, session: Box<dyn BrowserSession>) -> VitrineResult<()> {
        session.close().await
    }
}
