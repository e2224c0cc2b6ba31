//! Chromium sessions over the Chrome `DevTools` Protocol.
//!
//! With the `browser` feature, [`ChromiumFactory`] launches one Chromium per
//! scenario with its own throwaway profile directory, so cookies and carts
//! never leak between scenarios. Without the feature the factory still
//! exists but every acquisition fails with [`VitrineError::BrowserLaunch`].
//!
//! Element handles are DOM markers: the query script stamps each matched node
//! with a [`HANDLE_ATTRIBUTE`](crate::locator::HANDLE_ATTRIBUTE) value that is
//! unique per document, and later calls address the node through it. A handle
//! whose node has left the document is reported as `StaleElement`.

use crate::config::BrowserSettings;
use crate::driver::SessionFactory;
#[cfg(feature = "browser")]
use crate::driver::{BrowserSession, ElementHandle};
use crate::result::{VitrineError, VitrineResult};

// ============================================================================
// Page scripts
// ============================================================================

#[cfg_attr(not(feature = "browser"), allow(dead_code))]
mod scripts {
    use crate::locator::{handle_query, BoundingBox, Selector, HANDLE_ATTRIBUTE};
    use serde::Deserialize;

    /// Element description returned by [`describe`]
    #[derive(Debug, Clone, Deserialize)]
    pub(super) struct RawElement {
        pub id: String,
        pub tag: String,
        pub text: Option<String>,
        pub value: Option<String>,
        pub enabled: bool,
        pub rect: Option<BoundingBox>,
    }

    /// Outcome of an action script
    #[derive(Debug, Clone, Deserialize)]
    pub(super) struct Status {
        pub status: String,
        #[serde(default)]
        pub x: f64,
        #[serde(default)]
        pub y: f64,
    }

    /// Function expression stamping and describing one node
    pub(super) fn describe() -> String {
        format!(
            "(el) => {{ \
             if (!window.__vitrineDoc) {{ window.__vitrineDoc = Math.random().toString(36).slice(2); window.__vitrineSeq = 0; }} \
             if (!el.hasAttribute('{HANDLE_ATTRIBUTE}')) {{ \
               window.__vitrineSeq += 1; \
               el.setAttribute('{HANDLE_ATTRIBUTE}', window.__vitrineDoc + '-' + window.__vitrineSeq); }} \
             const r = el.getBoundingClientRect(); \
             const s = window.getComputedStyle(el); \
             const shown = s.visibility !== 'hidden' && s.display !== 'none' && r.width > 0 && r.height > 0; \
             return {{ id: el.getAttribute('{HANDLE_ATTRIBUTE}'), tag: el.tagName.toLowerCase(), \
               text: el.innerText ?? el.textContent, \
               value: ('value' in el && typeof el.value === 'string') ? el.value : null, \
               enabled: !el.disabled, \
               rect: shown ? {{ x: r.x, y: r.y, width: r.width, height: r.height }} : null }}; }}"
        )
    }

    /// Describe every match of `selector` under `root`
    pub(super) fn collect(selector: &Selector, root: &str) -> String {
        format!(
            "(() => {{ const d = {}; return {}.map(d); }})()",
            describe(),
            selector.to_collect_query(root)
        )
    }

    /// Describe every match of `selector` inside the node behind `parent`.
    /// Returns `null` when the parent is gone.
    pub(super) fn collect_within(selector: &Selector, parent: &str) -> String {
        format!(
            "(() => {{ const root = {}; if (!root) return null; const d = {}; return {}.map(d); }})()",
            handle_query(parent),
            describe(),
            selector.to_collect_query("root")
        )
    }

    /// Zero or one descriptions of the node behind `id`
    pub(super) fn refresh(id: &str) -> String {
        format!(
            "(() => {{ const el = {}; return el ? [({})(el)] : []; }})()",
            handle_query(id),
            describe()
        )
    }

    /// Wrap `body` so it runs with `el` bound, reporting `stale` when unbound
    fn with_element(id: &str, body: &str) -> String {
        format!(
            "(() => {{ const el = {}; if (!el) return {{ status: 'stale' }}; {body} }})()",
            handle_query(id)
        )
    }

    /// Scroll into view and hit-test the centre point
    pub(super) fn hit_test(id: &str) -> String {
        with_element(
            id,
            "el.scrollIntoView({ block: 'center', inline: 'center' }); \
             const r = el.getBoundingClientRect(); \
             const x = r.x + r.width / 2; const y = r.y + r.height / 2; \
             const top = document.elementFromPoint(x, y); \
             if (!top || !(top === el || el.contains(top))) \
               return { status: 'click intercepted by ' + (top ? top.tagName.toLowerCase() : 'nothing') }; \
             return { status: 'ok', x, y };",
        )
    }

    pub(super) fn click(id: &str) -> String {
        with_element(id, "el.click(); return { status: 'ok' };")
    }

    pub(super) fn clear(id: &str) -> String {
        with_element(id, "el.focus(); el.value = ''; return { status: 'ok' };")
    }

    pub(super) fn fill(id: &str, text: &str) -> String {
        with_element(
            id,
            &format!(
                "el.focus(); el.value = {text:?}; \
                 el.dispatchEvent(new Event('input', {{ bubbles: true }})); \
                 el.dispatchEvent(new Event('change', {{ bubbles: true }})); \
                 return {{ status: 'ok' }};"
            ),
        )
    }

    pub(super) fn submit(id: &str) -> String {
        with_element(
            id,
            "const f = el.form || el.closest('form'); \
             if (!f) return { status: 'no owning form' }; \
             if (typeof f.requestSubmit === 'function') f.requestSubmit(); else f.submit(); \
             return { status: 'ok' };",
        )
    }

    pub(super) fn select(id: &str, text: &str) -> String {
        with_element(
            id,
            &format!(
                "const opt = Array.from(el.options || []).find(o => o.text.includes({text:?})); \
                 if (!opt) return {{ status: 'no option containing ' + {text:?} }}; \
                 el.value = opt.value; opt.selected = true; \
                 el.dispatchEvent(new Event('change', {{ bubbles: true }})); \
                 return {{ status: 'ok' }};"
            ),
        )
    }

    /// CSS selector addressing a stamped node
    pub(super) fn handle_css(id: &str) -> String {
        format!("[{HANDLE_ATTRIBUTE}=\"{id}\"]")
    }
}

// ============================================================================
// Real CDP Implementation (when `browser` feature is enabled)
// ============================================================================

#[cfg(feature = "browser")]
mod cdp {
    use super::scripts::{self, RawElement, Status};
    use super::{BrowserSession, BrowserSettings, ElementHandle, SessionFactory};
    use super::{VitrineError, VitrineResult};
    use crate::locator::Selector;
    use async_trait::async_trait;
    use chromiumoxide::browser::{Browser as CdpBrowser, BrowserConfig as CdpConfig};
    use chromiumoxide::element::Element;
    use chromiumoxide::error::CdpError;
    use chromiumoxide::layout::Point;
    use chromiumoxide::page::Page as CdpPage;
    use futures::StreamExt;
    use serde::de::DeserializeOwned;
    use tempfile::TempDir;
    use tokio::sync::Mutex;
    use tracing::{debug, info};

    fn lost(e: impl std::fmt::Display) -> VitrineError {
        VitrineError::SessionLost {
            message: e.to_string(),
        }
    }

    /// Protocol replies sent once the tab or its debugging session is gone
    const CLOSED_TARGET_MARKERS: [&str; 4] = [
        "target closed",
        "no target with given id",
        "session with given id not found",
        "inspected target navigated or closed",
    ];

    fn closed_target(message: &str) -> bool {
        let message = message.to_lowercase();
        CLOSED_TARGET_MARKERS.iter().any(|m| message.contains(m))
    }

    /// Whether the error means the browser connection itself is gone
    fn is_transport(e: &CdpError) -> bool {
        match e {
            CdpError::Ws(_) | CdpError::ChannelSendError(_) | CdpError::NoResponse => true,
            CdpError::ChromeMessage(message) => closed_target(message),
            CdpError::Chrome(err) => closed_target(&err.message),
            _ => false,
        }
    }

    /// Page script failures stay local to the call; transport failures end the session
    fn script_error(e: CdpError) -> VitrineError {
        if is_transport(&e) {
            lost(e)
        } else {
            VitrineError::script(e.to_string())
        }
    }

    /// A native input that did not land leaves room for the programmatic fallback
    fn input_error(handle: &ElementHandle, e: CdpError) -> VitrineError {
        if is_transport(&e) {
            lost(e)
        } else {
            VitrineError::NotInteractable {
                id: handle.id.clone(),
                reason: e.to_string(),
            }
        }
    }

    /// One Chromium process with a single tab and its own profile
    #[derive(Debug)]
    pub struct ChromiumSession {
        browser: Mutex<CdpBrowser>,
        page: CdpPage,
        handler: tokio::task::JoinHandle<()>,
        // Removed on drop, after the browser has exited
        _profile: TempDir,
    }

    impl ChromiumSession {
        /// Launch Chromium with a fresh profile directory and open a blank tab
        pub async fn launch(settings: &BrowserSettings) -> VitrineResult<Self> {
            let profile = tempfile::Builder::new().prefix("vitrine-profile-").tempdir()?;

            let mut builder = CdpConfig::builder()
                .user_data_dir(profile.path())
                .window_size(settings.window_width, settings.window_height);
            if !settings.headless {
                builder = builder.with_head();
            }
            if settings.no_sandbox {
                builder = builder.no_sandbox();
            }
            if let Some(ref path) = settings.executable {
                builder = builder.chrome_executable(path);
            }
            let config = builder
                .build()
                .map_err(|message| VitrineError::BrowserLaunch { message })?;

            let (browser, mut handler) =
                CdpBrowser::launch(config)
                    .await
                    .map_err(|e| VitrineError::BrowserLaunch {
                        message: e.to_string(),
                    })?;

            let handle = tokio::spawn(async move {
                while let Some(h) = handler.next().await {
                    if h.is_err() {
                        break;
                    }
                }
            });

            let page = browser
                .new_page("about:blank")
                .await
                .map_err(|e| VitrineError::BrowserLaunch {
                    message: e.to_string(),
                })?;

            debug!(profile = %profile.path().display(), "chromium session launched");
            Ok(Self {
                browser: Mutex::new(browser),
                page,
                handler: handle,
                _profile: profile,
            })
        }

        async fn eval<T: DeserializeOwned>(&self, script: String) -> VitrineResult<T> {
            let result = self
                .page
                .evaluate(script)
                .await
                .map_err(script_error)?;
            result
                .into_value()
                .map_err(|e| VitrineError::script(e.to_string()))
        }

        async fn describe_all(&self, script: String) -> VitrineResult<Vec<ElementHandle>> {
            let raw: Vec<RawElement> = self.eval(script).await?;
            Ok(raw.into_iter().map(into_handle).collect())
        }

        /// Run an action script and translate its status
        async fn act(&self, handle: &ElementHandle, script: String) -> VitrineResult<Status> {
            let status: Status = self.eval(script).await?;
            match status.status.as_str() {
                "ok" => Ok(status),
                "stale" => Err(VitrineError::StaleElement {
                    id: handle.id.clone(),
                }),
                reason => Err(VitrineError::NotInteractable {
                    id: handle.id.clone(),
                    reason: reason.to_string(),
                }),
            }
        }

        async fn element(&self, handle: &ElementHandle) -> VitrineResult<Element> {
            self.page
                .find_element(scripts::handle_css(&handle.id))
                .await
                .map_err(|e| {
                    if is_transport(&e) {
                        lost(e)
                    } else {
                        VitrineError::StaleElement {
                            id: handle.id.clone(),
                        }
                    }
                })
        }
    }

    fn into_handle(raw: RawElement) -> ElementHandle {
        let mut handle = ElementHandle::new(raw.id, raw.tag);
        handle.text_content = raw.text;
        handle.value = raw.value;
        handle.enabled = raw.enabled;
        handle.bounding_box = raw.rect;
        handle
    }

    #[async_trait]
    impl BrowserSession for ChromiumSession {
        async fn navigate(&self, url: &str) -> VitrineResult<()> {
            self.page
                .goto(url)
                .await
                .map_err(|e| VitrineError::Navigation {
                    url: url.to_string(),
                    message: e.to_string(),
                })?;
            Ok(())
        }

        async fn current_url(&self) -> VitrineResult<String> {
            let url = self.page.url().await.map_err(lost)?;
            Ok(url.unwrap_or_default())
        }

        async fn query_all(&self, selector: &Selector) -> VitrineResult<Vec<ElementHandle>> {
            self.describe_all(scripts::collect(selector, "document")).await
        }

        async fn query_within(
            &self,
            parent: &ElementHandle,
            selector: &Selector,
        ) -> VitrineResult<Vec<ElementHandle>> {
            let found: Option<Vec<RawElement>> =
                self.eval(scripts::collect_within(selector, &parent.id)).await?;
            found
                .map(|raw| raw.into_iter().map(into_handle).collect())
                .ok_or_else(|| VitrineError::StaleElement {
                    id: parent.id.clone(),
                })
        }

        async fn refresh(&self, handle: &ElementHandle) -> VitrineResult<ElementHandle> {
            self.describe_all(scripts::refresh(&handle.id))
                .await?
                .into_iter()
                .next()
                .ok_or_else(|| VitrineError::StaleElement {
                    id: handle.id.clone(),
                })
        }

        async fn native_click(&self, handle: &ElementHandle) -> VitrineResult<()> {
            let target = self.act(handle, scripts::hit_test(&handle.id)).await?;
            self.page
                .click(Point {
                    x: target.x,
                    y: target.y,
                })
                .await
                .map_err(|e| input_error(handle, e))?;
            Ok(())
        }

        async fn programmatic_click(&self, handle: &ElementHandle) -> VitrineResult<()> {
            self.act(handle, scripts::click(&handle.id)).await?;
            Ok(())
        }

        async fn native_fill(&self, handle: &ElementHandle, text: &str) -> VitrineResult<()> {
            self.act(handle, scripts::clear(&handle.id)).await?;
            let element = self.element(handle).await?;
            element
                .type_str(text)
                .await
                .map_err(|e| input_error(handle, e))?;
            Ok(())
        }

        async fn programmatic_fill(&self, handle: &ElementHandle, text: &str) -> VitrineResult<()> {
            self.act(handle, scripts::fill(&handle.id, text)).await?;
            Ok(())
        }

        async fn native_submit(&self, handle: &ElementHandle) -> VitrineResult<()> {
            let element = self.element(handle).await?;
            element
                .press_key("Enter")
                .await
                .map_err(|e| input_error(handle, e))?;
            Ok(())
        }

        async fn programmatic_submit(&self, handle: &ElementHandle) -> VitrineResult<()> {
            self.act(handle, scripts::submit(&handle.id)).await?;
            Ok(())
        }

        async fn select_by_text(&self, handle: &ElementHandle, text: &str) -> VitrineResult<()> {
            self.act(handle, scripts::select(&handle.id, text)).await?;
            Ok(())
        }

        async fn close(&self) -> VitrineResult<()> {
            let mut browser = self.browser.lock().await;
            browser.close().await.map_err(lost)?;
            browser.wait().await?;
            self.handler.abort();
            info!("chromium session closed");
            Ok(())
        }
    }

    /// Launches one [`ChromiumSession`] per acquisition
    #[derive(Debug, Clone, Default)]
    pub struct ChromiumFactory {
        settings: BrowserSettings,
    }

    impl ChromiumFactory {
        /// Factory launching with the given settings
        #[must_use]
        pub const fn new(settings: BrowserSettings) -> Self {
            Self { settings }
        }
    }

    #[async_trait]
    impl SessionFactory for ChromiumFactory {
        async fn acquire(&self) -> VitrineResult<Box<dyn BrowserSession>> {
            Ok(Box::new(ChromiumSession::launch(&self.settings).await?))
        }
    }

    #[cfg(test)]
    #[allow(clippy::unwrap_used, clippy::expect_used)]
    mod tests {
        use super::*;

        fn handle() -> ElementHandle {
            ElementHandle::new("abc-1", "button")
        }

        #[test]
        fn test_closed_target_messages() {
            assert!(closed_target("Target closed"));
            assert!(closed_target("No target with given id found"));
            assert!(closed_target("Session with given id not found."));
            assert!(!closed_target("Uncaught ReferenceError: x is not defined"));
        }

        #[test]
        fn test_transport_errors_lose_the_session() {
            let err = script_error(CdpError::NoResponse);
            assert!(matches!(err, VitrineError::SessionLost { .. }));
            assert!(err.is_fatal());

            let err = script_error(CdpError::ChromeMessage("Target closed".to_string()));
            assert!(err.is_fatal());
        }

        #[test]
        fn test_page_errors_stay_script_errors() {
            let err = script_error(CdpError::ChromeMessage(
                "Uncaught TypeError: cannot read properties of null".to_string(),
            ));
            assert!(matches!(err, VitrineError::Script { .. }));
            assert!(!err.is_fatal());
            assert!(!err.is_absence());
        }

        #[test]
        fn test_failed_native_input_allows_fallback() {
            let err = input_error(
                &handle(),
                CdpError::ChromeMessage("Node is not visible".to_string()),
            );
            match err {
                VitrineError::NotInteractable { id, reason } => {
                    assert_eq!(id, "abc-1");
                    assert!(reason.contains("not visible"));
                }
                other => panic!("unexpected {other:?}"),
            }
        }

        #[test]
        fn test_native_input_on_dead_browser_is_fatal() {
            let err = input_error(&handle(), CdpError::NoResponse);
            assert!(matches!(err, VitrineError::SessionLost { .. }));
        }
    }
}

// ============================================================================
// Stand-in when the `browser` feature is disabled
// ============================================================================

#[cfg(not(feature = "browser"))]
mod unavailable {
    use super::{BrowserSettings, SessionFactory, VitrineError, VitrineResult};
    use crate::driver::BrowserSession;
    use async_trait::async_trait;

    /// Factory that cannot launch anything in this build
    #[derive(Debug, Clone, Default)]
    pub struct ChromiumFactory {
        settings: BrowserSettings,
    }

    impl ChromiumFactory {
        /// Factory launching with the given settings
        #[must_use]
        pub const fn new(settings: BrowserSettings) -> Self {
            Self { settings }
        }
    }

    #[async_trait]
    impl SessionFactory for ChromiumFactory {
        async fn acquire(&self) -> VitrineResult<Box<dyn BrowserSession>> {
            Err(VitrineError::BrowserLaunch {
                message: format!(
                    "browser feature not enabled; cannot launch chromium ({}x{})",
                    self.settings.window_width, self.settings.window_height
                ),
            })
        }
    }
}

#[cfg(feature = "browser")]
pub use cdp::{ChromiumFactory, ChromiumSession};

#[cfg(not(feature = "browser"))]
pub use unavailable::ChromiumFactory;

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use crate::locator::{Selector, HANDLE_ATTRIBUTE};

    mod script_tests {
        use super::*;

        #[test]
        fn test_collect_stamps_handles() {
            let js = scripts::collect(&Selector::css("table tbody tr"), "document");
            assert!(js.contains(HANDLE_ATTRIBUTE));
            assert!(js.contains("querySelectorAll(\"table tbody tr\")"));
            assert!(js.contains(".map(d)"));
        }

        #[test]
        fn test_collect_within_reports_missing_parent() {
            let js = scripts::collect_within(&Selector::xpath("./td"), "abc-3");
            assert!(js.contains("if (!root) return null"));
            assert!(js.contains("abc-3"));
        }

        #[test]
        fn test_hit_test_reports_interceptor() {
            let js = scripts::hit_test("abc-1");
            assert!(js.contains("elementFromPoint"));
            assert!(js.contains("click intercepted by"));
            assert!(js.contains("status: 'stale'"));
        }

        #[test]
        fn test_submit_prefers_request_submit() {
            let js = scripts::submit("abc-1");
            assert!(js.contains("requestSubmit"));
        }

        #[test]
        fn test_fill_and_select_escape_text() {
            let js = scripts::fill("abc-1", "a\"b");
            assert!(js.contains(r#""a\"b""#));
            let js = scripts::select("abc-1", "Category B");
            assert!(js.contains("\"Category B\""));
        }

        #[test]
        fn test_handle_css() {
            assert_eq!(
                scripts::handle_css("abc-1"),
                format!("[{HANDLE_ATTRIBUTE}=\"abc-1\"]")
            );
        }

        #[test]
        fn test_status_defaults_coordinates() {
            let s: scripts::Status = serde_json::from_str(r#"{"status":"stale"}"#).unwrap();
            assert_eq!(s.status, "stale");
            assert_eq!(s.x, 0.0);
        }
    }

    #[cfg(not(feature = "browser"))]
    mod unavailable_tests {
        use super::*;

        #[tokio::test]
        async fn test_acquire_fails_without_feature() {
            let factory = ChromiumFactory::new(BrowserSettings::default());
            let err = factory.acquire().await.err().unwrap();
            assert!(matches!(err, VitrineError::BrowserLaunch { .. }));
            assert!(err.is_fatal());
        }
    }
}
