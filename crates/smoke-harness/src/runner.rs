//! Check execution orchestration
//!
//! This module coordinates a single smoke-test run: acquire a session,
//! navigate once, perform setup interactions, evaluate every check in
//! declaration order, capture the screenshot artifact, and finalize the
//! report.
//!
//! # Failure policy
//!
//! The goal is maximum information per run, not fail-fast. Only session
//! launch and the initial navigation are fatal; a failed setup step or check
//! is recorded with a diagnostic and execution continues. The session is
//! closed on every exit path.
//!
//! ```text
//! NotStarted → SessionAcquired → NavigatedOnce
//!     → per-check (Evaluating → Recorded)
//!     → ReportFinalized → SessionClosed
//! ```
//!
//! # Example
//!
//! ```no_run
//! use smoke_harness::config::Config;
//! use smoke_harness::runner::CheckRunner;
//!
//! # async fn example() -> smoke_harness::error::Result<()> {
//! let config = Config::from_file("checks/navrail.toml")?;
//! let report = CheckRunner::new().run(&config).await?;
//!
//! for outcome in &report.outcomes {
//!     println!("{}: {}", outcome.name, if outcome.passed { "ok" } else { "FAIL" });
//! }
//! # Ok(())
//! # }
//! ```

use chromiumoxide::Page;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::time::Instant;
use tracing::{debug, info, instrument, warn};

use crate::config::{Check, Config, Expectation, SetupStep, TimeoutsConfig};
use crate::error::Result;
use crate::session::Session;

/// The ordered record of one run
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunReport {
    /// Name of the check suite
    pub harness_name: String,
    /// Base URL that was tested
    pub base_url: String,
    /// RFC3339 timestamp when the run started
    pub started_at: String,
    /// Total wall-clock duration of the run
    pub duration_ms: u64,
    /// Where the screenshot artifact was written
    pub screenshot_path: String,
    /// Setup steps (and artifact captures) that failed; never check outcomes
    pub setup_failures: Vec<String>,
    /// One outcome per declared check, in declaration order
    pub outcomes: Vec<CheckOutcome>,
    /// True iff every check passed and no setup step failed
    pub passed: bool,
}

impl RunReport {
    /// Number of checks that passed
    pub fn passed_count(&self) -> usize {
        self.outcomes.iter().filter(|o| o.passed).count()
    }

    /// Number of checks that failed
    pub fn failed_count(&self) -> usize {
        self.outcomes.iter().filter(|o| !o.passed).count()
    }
}

/// Outcome of a single check
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CheckOutcome {
    /// The check's configured name
    pub name: String,
    /// Whether the expected condition held within the wait budget
    pub passed: bool,
    /// Expected-vs-observed diagnostic for failures
    pub detail: Option<String>,
    /// How long this check took, including condition polling
    pub duration_ms: u64,
}

/// What a single condition probe saw on the page
struct Observation {
    satisfied: bool,
    observed: String,
}

/// The check runner
///
/// Owns nothing between runs; each [`run`](CheckRunner::run) acquires and
/// releases its own [`Session`].
#[derive(Debug, Default)]
pub struct CheckRunner {
    _private: (),
}

impl CheckRunner {
    /// Create a new check runner
    pub fn new() -> Self {
        Self::default()
    }

    /// Execute one run against the configured target
    ///
    /// # Errors
    ///
    /// Returns a harness-fatal error if the browser cannot be launched or
    /// the initial navigation fails; in that case no screenshot is taken and
    /// no partial outcomes exist. Everything else is recorded in the report.
    #[instrument(skip(self, config), fields(suite = %config.harness.name))]
    pub async fn run(&self, config: &Config) -> Result<RunReport> {
        let start_time = Instant::now();
        let started_at = chrono::Utc::now().to_rfc3339();

        info!(
            "Starting run '{}' against {} with {} checks",
            config.harness.name,
            config.harness.base_url,
            config.checks.len()
        );

        let session = Session::launch().await?;

        if let Err(e) = session
            .navigate(&config.harness.base_url, config.timeouts.navigation())
            .await
        {
            session.close().await;
            return Err(e);
        }

        // From here on nothing aborts the run; the session always closes.
        let (setup_failures, outcomes) = self.execute(config, &session).await;
        session.close().await;

        let passed = setup_failures.is_empty() && outcomes.iter().all(|o| o.passed);
        let report = RunReport {
            harness_name: config.harness.name.clone(),
            base_url: config.harness.base_url.clone(),
            started_at,
            duration_ms: start_time.elapsed().as_millis() as u64,
            screenshot_path: config.harness.screenshot_path.clone(),
            setup_failures,
            outcomes,
            passed,
        };

        if report.passed {
            info!(
                "Run '{}' passed ({} checks in {}ms)",
                report.harness_name,
                report.outcomes.len(),
                report.duration_ms
            );
        } else {
            warn!(
                "Run '{}' finished with {} failed checks and {} setup failures",
                report.harness_name,
                report.failed_count(),
                report.setup_failures.len()
            );
        }

        Ok(report)
    }

    /// Run setup steps, checks, and the screenshot capture
    async fn execute(&self, config: &Config, session: &Session) -> (Vec<String>, Vec<CheckOutcome>) {
        let mut setup_failures = Vec::new();

        for (i, step) in config.setup.iter().enumerate() {
            if let Err(reason) = self.run_setup_step(config, session, step).await {
                warn!("Setup step {} failed: {}", i + 1, reason);
                setup_failures.push(format!("setup step {} ({}): {}", i + 1, step.describe(), reason));
            }
        }

        let mut outcomes = Vec::with_capacity(config.checks.len());
        for check in &config.checks {
            outcomes.push(self.evaluate_check(session.page(), check, &config.timeouts).await);
        }

        // One screenshot per run, pass or fail
        if let Err(e) = session.screenshot(&config.harness.screenshot_path).await {
            warn!("Screenshot capture failed: {}", e);
            setup_failures.push(format!("screenshot: {}", e));
        }

        (setup_failures, outcomes)
    }

    /// Execute a single setup step
    #[instrument(skip(self, config, session))]
    async fn run_setup_step(
        &self,
        config: &Config,
        session: &Session,
        step: &SetupStep,
    ) -> std::result::Result<(), String> {
        let page = session.page();
        let timeouts = &config.timeouts;

        match step {
            SetupStep::Navigate { url } => {
                let full_url = config.harness.resolve_url(url);
                debug!("Navigating to {}", full_url);
                tokio::time::timeout(timeouts.navigation(), page.goto(&full_url))
                    .await
                    .map_err(|_| format!("navigation timed out after {:?}", timeouts.navigation()))?
                    .map_err(|e| format!("navigation failed: {}", e))?;
                Ok(())
            }

            SetupStep::Wait { selector } => {
                self.wait_visible(page, selector, timeouts).await
            }

            SetupStep::Click { selector, wait_for } => {
                // The element must be rendered before a click can land
                self.wait_visible(page, selector, timeouts).await?;

                let element = page
                    .find_element(selector.as_str())
                    .await
                    .map_err(|e| format!("element not found: {}", e))?;
                element.click().await.map_err(|e| format!("click failed: {}", e))?;

                if let Some(post) = wait_for {
                    self.wait_visible(page, post, timeouts)
                        .await
                        .map_err(|reason| format!("post-condition '{}' not met: {}", post, reason))?;
                }
                Ok(())
            }
        }
    }

    /// Poll until a selector is visible, bounded by the wait budget
    async fn wait_visible(
        &self,
        page: &Page,
        selector: &str,
        timeouts: &TimeoutsConfig,
    ) -> std::result::Result<(), String> {
        let expect = Expectation::Visible {
            selector: selector.to_string(),
        };
        let deadline = Instant::now() + timeouts.wait();
        let mut last_observed = String::from("not yet probed");

        loop {
            match probe(page, &expect).await {
                Ok(obs) if obs.satisfied => return Ok(()),
                Ok(obs) => last_observed = obs.observed,
                Err(e) => last_observed = e,
            }
            if Instant::now() >= deadline {
                return Err(format!(
                    "'{}' not visible within {:?} ({})",
                    selector,
                    timeouts.wait(),
                    last_observed
                ));
            }
            tokio::time::sleep(timeouts.poll()).await;
        }
    }

    /// Evaluate one check, never propagating failure
    ///
    /// The condition is polled until it holds or the wait budget elapses; a
    /// timeout is a recorded failure naming the awaited condition.
    #[instrument(skip(self, page, timeouts), fields(check = %check.name))]
    async fn evaluate_check(
        &self,
        page: &Page,
        check: &Check,
        timeouts: &TimeoutsConfig,
    ) -> CheckOutcome {
        let start = Instant::now();
        let deadline = start + timeouts.wait();
        let mut last_observed = String::from("not yet probed");

        loop {
            match probe(page, &check.expect).await {
                Ok(obs) if obs.satisfied => {
                    debug!("Check '{}' passed", check.name);
                    return CheckOutcome {
                        name: check.name.clone(),
                        passed: true,
                        detail: None,
                        duration_ms: start.elapsed().as_millis() as u64,
                    };
                }
                Ok(obs) => last_observed = obs.observed,
                Err(e) => last_observed = e,
            }

            if Instant::now() >= deadline {
                debug!("Check '{}' failed: {}", check.name, last_observed);
                return CheckOutcome {
                    name: check.name.clone(),
                    passed: false,
                    detail: Some(format!(
                        "expected {}; observed {} (within {:?})",
                        check.expect.describe(),
                        last_observed,
                        timeouts.wait()
                    )),
                    duration_ms: start.elapsed().as_millis() as u64,
                };
            }

            tokio::time::sleep(timeouts.poll()).await;
        }
    }
}

/// Evaluate an expectation against current page state
///
/// Conditions are probed with JavaScript so that visibility means what it
/// means to the page: the element has layout boxes.
async fn probe(page: &Page, expect: &Expectation) -> std::result::Result<Observation, String> {
    // The script serializes its own result so the probe always receives a
    // plain string over CDP, never a remote object reference.
    let js = format!("JSON.stringify({})", probe_script(expect));
    let raw: String = page
        .evaluate(js)
        .await
        .map_err(|e| format!("evaluation error: {}", e))?
        .into_value()
        .map_err(|e| format!("probe returned malformed result: {}", e))?;
    let value: Value = serde_json::from_str(&raw)
        .map_err(|e| format!("probe returned malformed JSON: {}", e))?;

    Ok(interpret(expect, &value))
}

/// Build the JavaScript probe for an expectation
///
/// Configured strings are embedded as JSON literals so selectors and label
/// text cannot escape into the script.
fn probe_script(expect: &Expectation) -> String {
    let lit = |s: &str| serde_json::to_string(s).unwrap_or_else(|_| "\"\"".to_string());

    match expect {
        Expectation::Visible { selector } => format!(
            r#"(() => {{
                const el = document.querySelector({sel});
                if (!el) return {{ found: false, visible: false }};
                return {{ found: true, visible: el.getClientRects().length > 0 }};
            }})()"#,
            sel = lit(selector)
        ),

        Expectation::TextVisible { text } => format!(
            r#"(() => {{
                const needle = {needle};
                for (const el of document.querySelectorAll('*')) {{
                    if (el.getClientRects().length === 0) continue;
                    let own = '';
                    for (const node of el.childNodes) {{
                        if (node.nodeType === Node.TEXT_NODE) own += node.textContent;
                    }}
                    if (own.includes(needle)) return true;
                }}
                return false;
            }})()"#,
            needle = lit(text)
        ),

        Expectation::AttributeEquals { selector, attribute, .. } => format!(
            r#"(() => {{
                const el = document.querySelector({sel});
                if (!el) return {{ found: false, value: null }};
                return {{ found: true, value: el.getAttribute({attr}) }};
            }})()"#,
            sel = lit(selector),
            attr = lit(attribute)
        ),

        Expectation::TagNameEquals { selector, .. } => format!(
            r#"Array.from(document.querySelectorAll({sel}), el => el.tagName.toLowerCase())"#,
            sel = lit(selector)
        ),

        Expectation::CountAtLeast { selector, .. } => format!(
            "document.querySelectorAll({sel}).length",
            sel = lit(selector)
        ),
    }
}

/// Turn the probe's JSON result into a pass/fail observation
fn interpret(expect: &Expectation, value: &Value) -> Observation {
    match expect {
        Expectation::Visible { selector } => {
            let found = value["found"].as_bool().unwrap_or(false);
            let visible = value["visible"].as_bool().unwrap_or(false);
            Observation {
                satisfied: found && visible,
                observed: if !found {
                    format!("no element matches '{}'", selector)
                } else {
                    format!("'{}' present but has no layout", selector)
                },
            }
        }

        Expectation::TextVisible { text } => Observation {
            satisfied: value.as_bool().unwrap_or(false),
            observed: format!("no visible element contains '{}'", text),
        },

        Expectation::AttributeEquals { selector, attribute, value: expected } => {
            let found = value["found"].as_bool().unwrap_or(false);
            let actual = value["value"].as_str();
            Observation {
                satisfied: found && actual == Some(expected.as_str()),
                observed: if !found {
                    format!("no element matches '{}'", selector)
                } else {
                    match actual {
                        Some(actual) => format!("{}='{}'", attribute, actual),
                        None => format!("{} attribute missing", attribute),
                    }
                },
            }
        }

        Expectation::TagNameEquals { selector, tag } => {
            // Every match must carry the tag; one stray <div> among the
            // buttons is a failure.
            let want = tag.to_lowercase();
            let tags: Vec<&str> = value
                .as_array()
                .map(|a| a.iter().filter_map(|v| v.as_str()).collect())
                .unwrap_or_default();

            if tags.is_empty() {
                Observation {
                    satisfied: false,
                    observed: format!("no element matches '{}'", selector),
                }
            } else if let Some((i, actual)) =
                tags.iter().enumerate().find(|(_, t)| **t != want)
            {
                Observation {
                    satisfied: false,
                    observed: format!("element {} of {} is <{}>", i + 1, tags.len(), actual),
                }
            } else {
                Observation {
                    satisfied: true,
                    observed: format!("all {} elements are <{}>", tags.len(), want),
                }
            }
        }

        Expectation::CountAtLeast { selector, count } => {
            let actual = value.as_u64().unwrap_or(0) as usize;
            Observation {
                satisfied: actual >= *count,
                observed: format!("{} elements match '{}'", actual, selector),
            }
        }
    }
}
