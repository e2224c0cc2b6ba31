//! Run configuration and the Config Provider seam.
//!
//! Configuration is read-only once a run starts. Sources, lowest priority
//! first: built-in defaults, a YAML file, `VITRINE_*` environment variables,
//! then whatever the CLI layers on top.

use crate::result::{VitrineError, VitrineResult};
use crate::wait::{DEFAULT_NAVIGATION_TIMEOUT_MS, DEFAULT_POLL_INTERVAL_MS, DEFAULT_WAIT_TIMEOUT_MS};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Well-known property keys
pub mod keys {
    /// Customer id of the regular test user
    pub const USER_ID: &str = "test.user.id";
    /// Password of the regular test user
    pub const USER_PASSWORD: &str = "test.user.password";
    /// Email registered for the regular test user
    pub const USER_EMAIL: &str = "test.user.email";
}

/// Read-only access to base URL and named properties
pub trait ConfigProvider: Send + Sync {
    /// Storefront base URL
    fn base_url(&self) -> &str;

    /// Named property
    fn property(&self, key: &str) -> Option<&str>;

    /// Named property that must be present
    fn require(&self, key: &str) -> VitrineResult<&str> {
        self.property(key)
            .ok_or_else(|| VitrineError::config(format!("missing property '{key}'")))
    }

    /// Absolute URL for an application path, with exactly one slash between
    fn url_for(&self, path: &str) -> String {
        join_url(self.base_url(), path)
    }
}

/// Join a base URL and a path, normalising the slash between them
#[must_use]
pub fn join_url(base: &str, path: &str) -> String {
    let base = base.trim_end_matches('/');
    if path.is_empty() {
        return base.to_string();
    }
    format!("{base}/{}", path.trim_start_matches('/'))
}

/// Path part of a URL, without query or fragment ("/" when there is none)
#[must_use]
pub fn url_path(url: &str) -> &str {
    let rest = url.split_once("://").map_or(url, |(_, r)| r);
    match rest.find('/') {
        Some(i) => rest[i..].split(['?', '#']).next().unwrap_or("/"),
        None => "/",
    }
}

/// Wait budgets in milliseconds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Timeouts {
    /// Budget for element waits
    pub element_ms: u64,
    /// Budget for page loads
    pub navigation_ms: u64,
    /// Budget for post-mutation waits (table refresh, redirects)
    pub settle_ms: u64,
    /// Polling interval
    pub poll_ms: u64,
}

impl Default for Timeouts {
    fn default() -> Self {
        Self {
            element_ms: DEFAULT_WAIT_TIMEOUT_MS,
            navigation_ms: DEFAULT_NAVIGATION_TIMEOUT_MS,
            settle_ms: 3_000,
            poll_ms: DEFAULT_POLL_INTERVAL_MS,
        }
    }
}

impl Timeouts {
    /// Element wait budget
    #[must_use]
    pub const fn element(&self) -> Duration {
        Duration::from_millis(self.element_ms)
    }

    /// Navigation wait budget
    #[must_use]
    pub const fn navigation(&self) -> Duration {
        Duration::from_millis(self.navigation_ms)
    }

    /// Post-mutation wait budget
    #[must_use]
    pub const fn settle(&self) -> Duration {
        Duration::from_millis(self.settle_ms)
    }

    /// Polling interval
    #[must_use]
    pub const fn poll(&self) -> Duration {
        Duration::from_millis(self.poll_ms)
    }
}

/// Browser launch settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BrowserSettings {
    /// Run without a window
    pub headless: bool,
    /// Chromium executable (auto-detected when unset)
    pub executable: Option<PathBuf>,
    /// Pass `--no-sandbox` (containers)
    pub no_sandbox: bool,
    /// Viewport width
    pub window_width: u32,
    /// Viewport height
    pub window_height: u32,
}

impl Default for BrowserSettings {
    fn default() -> Self {
        Self {
            headless: true,
            executable: None,
            no_sandbox: false,
            window_width: 1366,
            window_height: 768,
        }
    }
}

/// Complete run configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TestConfig {
    /// Storefront base URL
    pub base_url: String,
    /// Named properties (credentials, fixture ids)
    pub properties: BTreeMap<String, String>,
    /// Wait budgets
    pub timeouts: Timeouts,
    /// Browser launch settings
    pub browser: BrowserSettings,
}

impl Default for TestConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:8080".to_string(),
            properties: BTreeMap::new(),
            timeouts: Timeouts::default(),
            browser: BrowserSettings::default(),
        }
    }
}

impl TestConfig {
    /// Create a config pointing at `base_url`
    #[must_use]
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            ..Self::default()
        }
    }

    /// Set a property
    #[must_use]
    pub fn with_property(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.properties.insert(key.into(), value.into());
        self
    }

    /// Replace the wait budgets
    #[must_use]
    pub const fn with_timeouts(mut self, timeouts: Timeouts) -> Self {
        self.timeouts = timeouts;
        self
    }

    /// Parse and validate YAML
    pub fn from_yaml(yaml: &str) -> VitrineResult<Self> {
        let config: Self = serde_yaml_ng::from_str(yaml)?;
        config.validate()?;
        Ok(config)
    }

    /// Load and validate a YAML file
    pub fn load(path: &Path) -> VitrineResult<Self> {
        let yaml = std::fs::read_to_string(path).map_err(|e| {
            VitrineError::config(format!("cannot read {}: {e}", path.display()))
        })?;
        Self::from_yaml(&yaml)
    }

    /// Serialize to YAML
    pub fn to_yaml(&self) -> VitrineResult<String> {
        Ok(serde_yaml_ng::to_string(self)?)
    }

    /// Apply `VITRINE_*` overrides from the process environment
    #[must_use]
    pub fn apply_env(self) -> Self {
        self.apply_vars(|name| std::env::var(name).ok())
    }

    /// Apply `VITRINE_*` overrides from an arbitrary lookup
    #[must_use]
    pub fn apply_vars(mut self, lookup: impl Fn(&str) -> Option<String>) -> Self {
        if let Some(url) = lookup("VITRINE_BASE_URL") {
            self.base_url = url;
        }
        for (var, key) in [
            ("VITRINE_USER_ID", keys::USER_ID),
            ("VITRINE_USER_PASSWORD", keys::USER_PASSWORD),
            ("VITRINE_USER_EMAIL", keys::USER_EMAIL),
        ] {
            if let Some(value) = lookup(var) {
                self.properties.insert(key.to_string(), value);
            }
        }
        if let Some(flag) = lookup("VITRINE_HEADLESS") {
            self.browser.headless = !matches!(flag.as_str(), "0" | "false" | "no");
        }
        self
    }

    /// Check invariants
    pub fn validate(&self) -> VitrineResult<()> {
        if !(self.base_url.starts_with("http://") || self.base_url.starts_with("https://")) {
            return Err(VitrineError::config(format!(
                "base_url must be an http(s) URL, got '{}'",
                self.base_url
            )));
        }
        let t = &self.timeouts;
        if t.element_ms == 0 || t.navigation_ms == 0 || t.settle_ms == 0 || t.poll_ms == 0 {
            return Err(VitrineError::config("timeouts must be greater than zero"));
        }
        Ok(())
    }
}

impl ConfigProvider for TestConfig {
    fn base_url(&self) -> &str {
        &self.base_url
    }

    fn property(&self, key: &str) -> Option<&str> {
        self.properties.get(key).map(String::as_str)
    }
}
