//! Configuration parsing for smoke-test runs
//!
//! This module provides TOML-based configuration for defining a run: the
//! target application, interaction steps executed before any assertion, and
//! the ordered list of checks to evaluate.
//!
//! Expected UI copy ("Help", "Settings", ...) is deliberately configuration
//! data rather than code: menu labels churn independently of harness logic,
//! so they live in the check list.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use std::time::Duration;

use crate::error::{HarnessError, Result};

/// Main configuration structure loaded from TOML files
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Harness configuration
    pub harness: HarnessConfig,
    /// Wait and polling budgets
    #[serde(default)]
    pub timeouts: TimeoutsConfig,
    /// Interaction steps executed once, before any check
    #[serde(default)]
    pub setup: Vec<SetupStep>,
    /// Checks to evaluate, in declaration order
    pub checks: Vec<Check>,
}

impl Config {
    /// Load configuration from a TOML file
    ///
    /// # Errors
    ///
    /// Returns [`HarnessError::Config`] if the file cannot be read, the TOML
    /// is malformed, or the configuration is invalid.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).map_err(|e| {
            HarnessError::Config(format!("Failed to read config file {}: {}", path.display(), e))
        })?;
        Self::from_str(&content)
    }

    /// Parse configuration from a TOML string
    ///
    /// # Example
    ///
    /// ```
    /// use smoke_harness::config::Config;
    ///
    /// # fn example() -> smoke_harness::error::Result<()> {
    /// let toml = r#"
    ///     [harness]
    ///     name = "Nav rail smoke"
    ///     base_url = "http://localhost:4173"
    ///
    ///     [[checks]]
    ///     name = "Help visible"
    ///     expect = "text_visible"
    ///     text = "Help"
    /// "#;
    /// let config = Config::from_str(toml)?;
    /// # Ok(())
    /// # }
    /// ```
    pub fn from_str(s: &str) -> Result<Self> {
        let config: Config = toml::from_str(s)
            .map_err(|e| HarnessError::Config(format!("Failed to parse TOML configuration: {}", e)))?;
        config.validate()?;
        Ok(config)
    }

    /// Validate semantic constraints that serde cannot express
    fn validate(&self) -> Result<()> {
        if self.checks.is_empty() {
            return Err(HarnessError::Config(
                "At least one [[checks]] entry is required".to_string(),
            ));
        }
        for (i, check) in self.checks.iter().enumerate() {
            if check.name.trim().is_empty() {
                return Err(HarnessError::Config(format!(
                    "Check {} has an empty name",
                    i + 1
                )));
            }
        }
        if !self.harness.base_url.starts_with("http://")
            && !self.harness.base_url.starts_with("https://")
        {
            return Err(HarnessError::Config(format!(
                "base_url must be an http(s) URL, got '{}'",
                self.harness.base_url
            )));
        }
        Ok(())
    }
}

/// Core harness configuration parameters
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HarnessConfig {
    /// Name of the check suite
    pub name: String,
    /// Base URL for the application under test
    pub base_url: String,
    /// Where the screenshot artifact is written, overwritten each run
    /// (default: "smoke_screenshot.png")
    #[serde(default = "default_screenshot_path")]
    pub screenshot_path: String,
}

impl HarnessConfig {
    /// Resolve a possibly relative URL against the configured base URL
    pub fn resolve_url(&self, url: &str) -> String {
        if url.starts_with("http://") || url.starts_with("https://") {
            url.to_string()
        } else {
            format!(
                "{}{}",
                self.base_url.trim_end_matches('/'),
                if url.starts_with('/') {
                    url.to_string()
                } else {
                    format!("/{}", url)
                }
            )
        }
    }
}

fn default_screenshot_path() -> String {
    "smoke_screenshot.png".to_string()
}

/// Wait budgets for condition polling and navigation
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TimeoutsConfig {
    /// Budget for any single condition wait in milliseconds (default: 5000)
    #[serde(default = "default_wait_ms")]
    pub wait_ms: u64,
    /// Interval between condition polls in milliseconds (default: 100)
    #[serde(default = "default_poll_ms")]
    pub poll_ms: u64,
    /// Budget for the initial navigation in milliseconds (default: 15000)
    #[serde(default = "default_navigation_ms")]
    pub navigation_ms: u64,
}

impl Default for TimeoutsConfig {
    fn default() -> Self {
        Self {
            wait_ms: default_wait_ms(),
            poll_ms: default_poll_ms(),
            navigation_ms: default_navigation_ms(),
        }
    }
}

impl TimeoutsConfig {
    /// Per-condition wait budget
    pub fn wait(&self) -> Duration {
        Duration::from_millis(self.wait_ms)
    }

    /// Poll interval
    pub fn poll(&self) -> Duration {
        Duration::from_millis(self.poll_ms)
    }

    /// Initial navigation budget
    pub fn navigation(&self) -> Duration {
        Duration::from_millis(self.navigation_ms)
    }
}

fn default_wait_ms() -> u64 {
    5000
}

fn default_poll_ms() -> u64 {
    100
}

fn default_navigation_ms() -> u64 {
    15000
}

/// Interaction step executed before the checks
///
/// Setup steps mutate page state (expanding a collapsed navigation rail,
/// switching modes) so that the checks observe the UI they target. A failed
/// setup step is recorded on the report and the run continues.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum SetupStep {
    /// Navigate to a URL (relative to base_url or absolute)
    Navigate {
        /// URL to navigate to
        url: String,
    },
    /// Wait for a CSS selector to become visible
    Wait {
        /// CSS selector to wait for
        selector: String,
    },
    /// Click an element, optionally waiting for a post-condition
    Click {
        /// CSS selector for the element
        selector: String,
        /// Selector that must become visible after the click, replacing
        /// fixed animation sleeps with a bounded condition wait
        #[serde(default)]
        wait_for: Option<String>,
    },
}

impl SetupStep {
    /// Human-readable description used in setup-failure diagnostics
    pub fn describe(&self) -> String {
        match self {
            SetupStep::Navigate { url } => format!("navigate to '{}'", url),
            SetupStep::Wait { selector } => format!("wait for '{}'", selector),
            SetupStep::Click { selector, wait_for: None } => format!("click '{}'", selector),
            SetupStep::Click { selector, wait_for: Some(post) } => {
                format!("click '{}' then wait for '{}'", selector, post)
            }
        }
    }
}

/// A single named UI assertion, evaluated once per run
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Check {
    /// Human-readable label reported with the outcome
    pub name: String,
    /// The condition expected to hold
    #[serde(flatten)]
    pub expect: Expectation,
}

/// Expected condition for a check
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "expect", rename_all = "snake_case")]
pub enum Expectation {
    /// An element matching the selector exists and is rendered
    Visible {
        /// CSS selector
        selector: String,
    },
    /// Some visible element's text contains the given string
    TextVisible {
        /// Expected visible text
        text: String,
    },
    /// An element's attribute has an exact value
    AttributeEquals {
        /// CSS selector
        selector: String,
        /// Attribute name (e.g. "aria-label")
        attribute: String,
        /// Expected attribute value
        value: String,
    },
    /// Every element matching the selector has this tag name
    /// (case-insensitive)
    TagNameEquals {
        /// CSS selector
        selector: String,
        /// Expected tag name (e.g. "button")
        tag: String,
    },
    /// At least `count` elements match the selector
    CountAtLeast {
        /// CSS selector
        selector: String,
        /// Minimum number of matches
        count: usize,
    },
}

impl Expectation {
    /// Name the awaited condition for timeout diagnostics
    pub fn describe(&self) -> String {
        match self {
            Expectation::Visible { selector } => format!("'{}' visible", selector),
            Expectation::TextVisible { text } => format!("text '{}' visible", text),
            Expectation::AttributeEquals { selector, attribute, value } => {
                format!("'{}' attribute {}='{}'", selector, attribute, value)
            }
            Expectation::TagNameEquals { selector, tag } => {
                format!("every '{}' is a <{}>", selector, tag)
            }
            Expectation::CountAtLeast { selector, count } => {
                format!("at least {} elements match '{}'", count, selector)
            }
        }
    }
}
