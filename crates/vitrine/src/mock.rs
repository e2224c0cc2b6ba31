//! In-memory browser session for unit and flow tests.
//!
//! [`MockSession`] keeps a flat list of elements, each registered under the
//! [`Selector`] that should find it. Routes rebuild the element list on
//! navigation, and click/submit actions mutate it, so whole page flows can
//! run without a browser. Elements can be scripted to render late, to have
//! their native click intercepted by an overlay, or to ignore script events.

use crate::driver::{BrowserSession, ElementHandle, SessionFactory};
use crate::locator::{BoundingBox, Selector};
use crate::result::{VitrineError, VitrineResult};
use async_trait::async_trait;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

/// Mutation run against the DOM on click, submit or navigation
pub type MockAction = Arc<dyn Fn(&mut MockDom) + Send + Sync>;

const MAX_REDIRECTS: u32 = 8;

// =============================================================================
// ELEMENT
// =============================================================================

/// One scripted element
#[derive(Clone)]
pub struct MockElement {
    id: String,
    selector: Option<Selector>,
    parent: Option<String>,
    tag: String,
    text: String,
    value: Option<String>,
    visible: bool,
    enabled: bool,
    reveal_after: u32,
    intercept_native: bool,
    inert: bool,
    options: Vec<String>,
    on_click: Option<MockAction>,
    on_submit: Option<MockAction>,
}

impl std::fmt::Debug for MockElement {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MockElement")
            .field("id", &self.id)
            .field("tag", &self.tag)
            .field("text", &self.text)
            .field("value", &self.value)
            .field("visible", &self.visible)
            .field("enabled", &self.enabled)
            .finish_non_exhaustive()
    }
}

impl MockElement {
    /// Visible, enabled element with the given tag
    #[must_use]
    pub fn new(tag: impl Into<String>) -> Self {
        Self {
            id: String::new(),
            selector: None,
            parent: None,
            tag: tag.into(),
            text: String::new(),
            value: None,
            visible: true,
            enabled: true,
            reveal_after: 0,
            intercept_native: false,
            inert: false,
            options: Vec::new(),
            on_click: None,
            on_submit: None,
        }
    }

    /// Set text content
    #[must_use]
    pub fn text(mut self, text: impl Into<String>) -> Self {
        self.text = text.into();
        self
    }

    /// Set form value
    #[must_use]
    pub fn value(mut self, value: impl Into<String>) -> Self {
        self.value = Some(value.into());
        self
    }

    /// Not rendered
    #[must_use]
    pub fn hidden(mut self) -> Self {
        self.visible = false;
        self
    }

    /// Rendered but disabled
    #[must_use]
    pub fn disabled(mut self) -> Self {
        self.enabled = false;
        self
    }

    /// Stays invisible for the first `queries` lookups
    #[must_use]
    pub fn reveal_after(mut self, queries: u32) -> Self {
        self.reveal_after = queries;
        self
    }

    /// Native pointer events land on an overlay instead
    #[must_use]
    pub fn intercepted(mut self) -> Self {
        self.intercept_native = true;
        self
    }

    /// Script events are ignored too
    #[must_use]
    pub fn inert(mut self) -> Self {
        self.inert = true;
        self
    }

    /// `<option>` labels for a select
    #[must_use]
    pub fn options(mut self, labels: &[&str]) -> Self {
        self.options = labels.iter().map(|l| (*l).to_string()).collect();
        self
    }

    /// Action run on click
    #[must_use]
    pub fn on_click(mut self, action: impl Fn(&mut MockDom) + Send + Sync + 'static) -> Self {
        self.on_click = Some(Arc::new(action));
        self
    }

    /// Action run on submit (inherited by descendants)
    #[must_use]
    pub fn on_submit(mut self, action: impl Fn(&mut MockDom) + Send + Sync + 'static) -> Self {
        self.on_submit = Some(Arc::new(action));
        self
    }

    fn rendered(&self) -> bool {
        self.visible && self.reveal_after == 0
    }
}

// =============================================================================
// DOM
// =============================================================================

/// Scripted document state
pub struct MockDom {
    url: String,
    elements: Vec<MockElement>,
    routes: Vec<(String, MockAction)>,
    next_id: u64,
    depth: u32,
}

impl std::fmt::Debug for MockDom {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MockDom")
            .field("url", &self.url)
            .field("elements", &self.elements)
            .field("routes", &self.routes.iter().map(|(k, _)| k).collect::<Vec<_>>())
            .finish_non_exhaustive()
    }
}

impl MockDom {
    fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            elements: Vec::new(),
            routes: Vec::new(),
            next_id: 0,
            depth: 0,
        }
    }

    /// Register an element under a selector
    pub fn add(&mut self, selector: Selector, element: MockElement) -> String {
        self.insert(None, selector, element)
    }

    /// Register an element as a child of `parent`
    pub fn add_child(&mut self, parent: &str, selector: Selector, element: MockElement) -> String {
        self.insert(Some(parent.to_string()), selector, element)
    }

    fn insert(&mut self, parent: Option<String>, selector: Selector, mut element: MockElement) -> String {
        self.next_id += 1;
        element.id = format!("mock-{}", self.next_id);
        element.selector = Some(selector);
        element.parent = parent;
        let id = element.id.clone();
        self.elements.push(element);
        id
    }

    /// Remove an element and its descendants
    pub fn remove(&mut self, id: &str) {
        let doomed: Vec<String> = self
            .elements
            .iter()
            .filter(|e| e.id == id || self.is_descendant(&e.id, id))
            .map(|e| e.id.clone())
            .collect();
        self.elements.retain(|e| !doomed.contains(&e.id));
    }

    /// Drop every element
    pub fn clear(&mut self) {
        self.elements.clear();
    }

    /// Current URL
    #[must_use]
    pub fn url(&self) -> &str {
        &self.url
    }

    /// Change the URL without touching the elements
    pub fn set_url(&mut self, url: impl Into<String>) {
        self.url = url.into();
    }

    /// Register a route builder for a path prefix (`"/"` matches only the root)
    pub fn route(&mut self, path: impl Into<String>, build: impl Fn(&mut MockDom) + Send + Sync + 'static) {
        self.routes.push((path.into(), Arc::new(build)));
    }

    /// Load a URL: replace the document with whatever its route builds
    pub fn navigate(&mut self, url: &str) {
        self.url = url.to_string();
        self.elements.clear();
        if self.depth >= MAX_REDIRECTS {
            return;
        }
        let path = path_of(url);
        let route = self
            .routes
            .iter()
            .filter(|(key, _)| route_matches(key, &path))
            .max_by_key(|(key, _)| key.len())
            .map(|(_, action)| Arc::clone(action));
        if let Some(build) = route {
            self.depth += 1;
            build(self);
            self.depth -= 1;
        }
    }

    /// Ids of elements registered under a selector
    #[must_use]
    pub fn find_ids(&self, selector: &Selector) -> Vec<String> {
        self.elements
            .iter()
            .filter(|e| e.selector.as_ref() == Some(selector))
            .map(|e| e.id.clone())
            .collect()
    }

    /// Number of elements registered under a selector
    #[must_use]
    pub fn count(&self, selector: &Selector) -> usize {
        self.find_ids(selector).len()
    }

    /// Value of the first element under a selector
    #[must_use]
    pub fn value_of(&self, selector: &Selector) -> Option<String> {
        self.elements
            .iter()
            .find(|e| e.selector.as_ref() == Some(selector))
            .and_then(|e| e.value.clone())
    }

    /// Value of the first element under a selector inside `ancestor`
    #[must_use]
    pub fn value_within(&self, ancestor: &str, selector: &Selector) -> Option<String> {
        self.elements
            .iter()
            .find(|e| e.selector.as_ref() == Some(selector) && self.is_descendant(&e.id, ancestor))
            .and_then(|e| e.value.clone())
    }

    /// Parent id of an element
    #[must_use]
    pub fn parent_of(&self, id: &str) -> Option<String> {
        self.element(id).and_then(|e| e.parent.clone())
    }

    /// Look up an element
    #[must_use]
    pub fn element(&self, id: &str) -> Option<&MockElement> {
        self.elements.iter().find(|e| e.id == id)
    }

    /// Mutable lookup
    pub fn element_mut(&mut self, id: &str) -> Option<&mut MockElement> {
        self.elements.iter_mut().find(|e| e.id == id)
    }

    /// Overwrite an element's text
    pub fn set_text(&mut self, id: &str, text: impl Into<String>) {
        if let Some(e) = self.element_mut(id) {
            e.text = text.into();
        }
    }

    fn is_descendant(&self, id: &str, ancestor: &str) -> bool {
        let mut current = self.parent_of(id);
        while let Some(p) = current {
            if p == ancestor {
                return true;
            }
            current = self.parent_of(&p);
        }
        false
    }

    fn handle(element: &MockElement) -> ElementHandle {
        ElementHandle {
            id: element.id.clone(),
            tag_name: element.tag.clone(),
            text_content: Some(element.text.clone()),
            value: element.value.clone(),
            enabled: element.enabled,
            bounding_box: element
                .rendered()
                .then(|| BoundingBox::new(0.0, 0.0, 120.0, 24.0)),
        }
    }

    fn collect(&mut self, scope: Option<&str>, selector: &Selector) -> Vec<ElementHandle> {
        let ids: Vec<String> = self
            .elements
            .iter()
            .filter(|e| e.selector.as_ref() == Some(selector))
            .filter(|e| scope.map_or(true, |p| self.is_descendant(&e.id, p)))
            .map(|e| e.id.clone())
            .collect();
        let mut out = Vec::with_capacity(ids.len());
        for id in ids {
            if let Some(e) = self.element_mut(&id) {
                out.push(Self::handle(e));
                e.reveal_after = e.reveal_after.saturating_sub(1);
            }
        }
        out
    }

    fn live(&self, handle: &ElementHandle) -> VitrineResult<&MockElement> {
        self.element(&handle.id)
            .ok_or_else(|| VitrineError::StaleElement {
                id: handle.id.clone(),
            })
    }

    fn submit_action(&self, id: &str) -> Option<MockAction> {
        let mut current = Some(id.to_string());
        while let Some(cid) = current {
            let e = self.element(&cid)?;
            if let Some(action) = &e.on_submit {
                return Some(Arc::clone(action));
            }
            current = e.parent.clone();
        }
        None
    }
}

fn refuse(id: &str, reason: &str) -> VitrineError {
    VitrineError::NotInteractable {
        id: id.to_string(),
        reason: reason.to_string(),
    }
}

fn path_of(url: &str) -> String {
    let rest = url.split_once("://").map_or(url, |(_, r)| r);
    rest.find('/').map_or_else(|| "/".to_string(), |i| rest[i..].to_string())
}

fn route_matches(key: &str, path: &str) -> bool {
    let bare = path.split(['?', '#']).next().unwrap_or(path);
    if key == "/" {
        return bare == "/" || bare.is_empty();
    }
    bare == key || bare.starts_with(&format!("{}/", key.trim_end_matches('/')))
}

// =============================================================================
// SESSION
// =============================================================================

/// Scripted [`BrowserSession`]
pub struct MockSession {
    dom: Mutex<MockDom>,
    history: Mutex<Vec<String>>,
    lost: AtomicBool,
    rerender_pending: AtomicBool,
}

impl std::fmt::Debug for MockSession {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MockSession")
            .field("dom", &*self.dom())
            .finish_non_exhaustive()
    }
}

impl Default for MockSession {
    fn default() -> Self {
        Self::new()
    }
}

impl MockSession {
    /// Blank session
    #[must_use]
    pub fn new() -> Self {
        Self::at("about:blank")
    }

    /// Session already sitting at `url` with an empty document
    #[must_use]
    pub fn at(url: impl Into<String>) -> Self {
        Self {
            dom: Mutex::new(MockDom::new(url)),
            history: Mutex::new(Vec::new()),
            lost: AtomicBool::new(false),
            rerender_pending: AtomicBool::new(false),
        }
    }

    /// Add a route builder
    #[must_use]
    pub fn with_route(self, path: &str, build: impl Fn(&mut MockDom) + Send + Sync + 'static) -> Self {
        self.dom().route(path, build);
        self
    }

    /// Direct access to the document
    pub fn dom(&self) -> MutexGuard<'_, MockDom> {
        self.dom.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Recorded calls, e.g. `native_click:mock-3`
    #[must_use]
    pub fn history(&self) -> Vec<String> {
        self.history
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Whether any recorded call starts with `prefix`
    #[must_use]
    pub fn was_called(&self, prefix: &str) -> bool {
        self.history().iter().any(|c| c.starts_with(prefix))
    }

    /// Every later call fails with `SessionLost`
    pub fn lose_session(&self) {
        self.lost.store(true, Ordering::SeqCst);
    }

    /// Rebuild the current page right before the next scoped query, so
    /// handles read earlier go stale mid-read
    pub fn rerender_before_next_scoped_query(&self) {
        self.rerender_pending.store(true, Ordering::SeqCst);
    }

    fn record(&self, call: String) -> VitrineResult<()> {
        if self.lost.load(Ordering::SeqCst) {
            return Err(VitrineError::SessionLost {
                message: "mock session closed".to_string(),
            });
        }
        self.history
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(call);
        Ok(())
    }

    fn check_native(element: &MockElement) -> VitrineResult<()> {
        if !element.rendered() {
            return Err(refuse(&element.id, "element is not visible"));
        }
        if element.intercept_native {
            return Err(refuse(&element.id, "click intercepted by overlay"));
        }
        if !element.enabled {
            return Err(refuse(&element.id, "element is disabled"));
        }
        Ok(())
    }

    fn check_script(element: &MockElement) -> VitrineResult<()> {
        if element.inert {
            return Err(refuse(&element.id, "script event ignored"));
        }
        Ok(())
    }

    fn run_click(&self, handle: &ElementHandle, native: bool) -> VitrineResult<()> {
        let mut dom = self.dom();
        let element = dom.live(handle)?;
        if native {
            Self::check_native(element)?;
        } else {
            Self::check_script(element)?;
        }
        if let Some(action) = element.on_click.clone() {
            action(&mut *dom);
        }
        Ok(())
    }

    fn run_fill(&self, handle: &ElementHandle, text: &str, native: bool) -> VitrineResult<()> {
        let mut dom = self.dom();
        let element = dom.live(handle)?;
        if native {
            Self::check_native(element)?;
        } else {
            Self::check_script(element)?;
        }
        if let Some(e) = dom.element_mut(&handle.id) {
            e.value = Some(text.to_string());
        }
        Ok(())
    }

    fn run_submit(&self, handle: &ElementHandle, native: bool) -> VitrineResult<()> {
        let mut dom = self.dom();
        let element = dom.live(handle)?;
        if native {
            if !element.rendered() {
                return Err(refuse(&element.id, "element is not visible"));
            }
        } else {
            Self::check_script(element)?;
        }
        if let Some(action) = dom.submit_action(&handle.id) {
            action(&mut *dom);
        }
        Ok(())
    }
}

#[async_trait]
impl BrowserSession for MockSession {
    async fn navigate(&self, url: &str) -> VitrineResult<()> {
        self.record(format!("navigate:{url}"))?;
        self.dom().navigate(url);
        Ok(())
    }

    async fn current_url(&self) -> VitrineResult<String> {
        self.record("current_url".to_string())?;
        Ok(self.dom().url().to_string())
    }

    async fn query_all(&self, selector: &Selector) -> VitrineResult<Vec<ElementHandle>> {
        self.record(format!("query_all:{selector}"))?;
        Ok(self.dom().collect(None, selector))
    }

    async fn query_within(
        &self,
        parent: &ElementHandle,
        selector: &Selector,
    ) -> VitrineResult<Vec<ElementHandle>> {
        self.record(format!("query_within:{}:{selector}", parent.id))?;
        let mut dom = self.dom();
        if self.rerender_pending.swap(false, Ordering::SeqCst) {
            let url = dom.url().to_string();
            dom.navigate(&url);
        }
        dom.live(parent)?;
        Ok(dom.collect(Some(&parent.id), selector))
    }

    async fn refresh(&self, handle: &ElementHandle) -> VitrineResult<ElementHandle> {
        self.record(format!("refresh:{}", handle.id))?;
        let dom = self.dom();
        let refreshed = dom.live(handle).map(MockDom::handle);
        refreshed
    }

    async fn native_click(&self, handle: &ElementHandle) -> VitrineResult<()> {
        self.record(format!("native_click:{}", handle.id))?;
        self.run_click(handle, true)
    }

    async fn programmatic_click(&self, handle: &ElementHandle) -> VitrineResult<()> {
        self.record(format!("programmatic_click:{}", handle.id))?;
        self.run_click(handle, false)
    }

    async fn native_fill(&self, handle: &ElementHandle, text: &str) -> VitrineResult<()> {
        self.record(format!("native_fill:{}", handle.id))?;
        self.run_fill(handle, text, true)
    }

    async fn programmatic_fill(&self, handle: &ElementHandle, text: &str) -> VitrineResult<()> {
        self.record(format!("programmatic_fill:{}", handle.id))?;
        self.run_fill(handle, text, false)
    }

    async fn native_submit(&self, handle: &ElementHandle) -> VitrineResult<()> {
        self.record(format!("native_submit:{}", handle.id))?;
        self.run_submit(handle, true)
    }

    async fn programmatic_submit(&self, handle: &ElementHandle) -> VitrineResult<()> {
        self.record(format!("programmatic_submit:{}", handle.id))?;
        self.run_submit(handle, false)
    }

    async fn select_by_text(&self, handle: &ElementHandle, text: &str) -> VitrineResult<()> {
        self.record(format!("select:{}:{text}", handle.id))?;
        let mut dom = self.dom();
        let element = dom.live(handle)?;
        let label = element
            .options
            .iter()
            .find(|o| o.contains(text))
            .cloned()
            .ok_or_else(|| refuse(&handle.id, &format!("no option labelled '{text}'")))?;
        if let Some(e) = dom.element_mut(&handle.id) {
            e.value = Some(label);
        }
        Ok(())
    }

    async fn close(&self) -> VitrineResult<()> {
        self.record("close".to_string())
    }
}

// =============================================================================
// FACTORY
// =============================================================================

/// Builds a fresh [`MockSession`] per acquisition and counts the lifecycle
pub struct MockSessionFactory {
    build: Arc<dyn Fn() -> MockSession + Send + Sync>,
    acquired: AtomicUsize,
    released: AtomicUsize,
}

impl std::fmt::Debug for MockSessionFactory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MockSessionFactory")
            .field("acquired", &self.acquired())
            .field("released", &self.released())
            .finish_non_exhaustive()
    }
}

impl MockSessionFactory {
    /// Create a factory from a session builder
    #[must_use]
    pub fn new(build: impl Fn() -> MockSession + Send + Sync + 'static) -> Self {
        Self {
            build: Arc::new(build),
            acquired: AtomicUsize::new(0),
            released: AtomicUsize::new(0),
        }
    }

    /// Sessions handed out so far
    #[must_use]
    pub fn acquired(&self) -> usize {
        self.acquired.load(Ordering::SeqCst)
    }

    /// Sessions returned so far
    #[must_use]
    pub fn released(&self) -> usize {
        self.released.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl SessionFactory for MockSessionFactory {
    async fn acquire(&self) -> VitrineResult<Box<dyn BrowserSession>> {
        self.acquired.fetch_add(1, Ordering::SeqCst);
        Ok(Box::new((self.build)()))
    }

    async fn release(&self, session: Box<dyn BrowserSession>) -> VitrineResult<()> {
        self.released.fetch_add(1, Ordering::SeqCst);
        // a session lost mid-scenario still counts as released
        let _ = session.close().await;
        Ok(())
    }
}
