//! Smoke-test harness for live web UIs
//!
//! This crate consolidates ad hoc "navigate, click, assert, screenshot"
//! verification scripts into a single declarative runner: one browser
//! session per run, an ordered TOML-configured list of checks evaluated
//! against a live page, and one screenshot artifact plus one report per run.
//!
//! # Features
//!
//! - **Declarative checks**: visibility, text, attribute, tag-name, and
//!   element-count assertions defined in TOML, including the expected UI
//!   copy (which churns independently of harness logic)
//! - **Independent failures**: a failing check never aborts the remaining
//!   checks; the run reports every outcome
//! - **Condition-based waits**: bounded polling instead of fixed sleeps
//! - **Scoped sessions**: the browser is acquired and released within one
//!   run, on every exit path
//! - **Multiple output formats**: JSON, Console, and Markdown reports
//!
//! # Example
//!
//! ```no_run
//! use smoke_harness::{Config, runner::CheckRunner, reporter::{Reporter, OutputFormat}};
//!
//! # async fn example() -> smoke_harness::error::Result<()> {
//! // Load the check list
//! let config = Config::from_file("checks/navrail.toml")?;
//!
//! // Execute the run
//! let report = CheckRunner::new().run(&config).await?;
//!
//! // Report results
//! let reporter = Reporter::new(OutputFormat::Console);
//! reporter.report(&report)?;
//!
//! // Or save to file
//! Reporter::new(OutputFormat::Json).write_to_file(&report, "report.json")?;
//! # Ok(())
//! # }
//! ```
//!
//! # Configuration
//!
//! Runs are configured using TOML files:
//!
//! ```toml
//! [harness]
//! name = "Nav rail smoke"
//! base_url = "http://localhost:4173"
//! screenshot_path = "smoke_screenshot.png"
//!
//! [[setup]]
//! type = "click"
//! selector = ".az-nav-rail .header"
//! wait_for = ".menu-item"
//!
//! [[checks]]
//! name = "Help visible"
//! expect = "text_visible"
//! text = "Help"
//! ```

pub mod config;
pub mod error;
pub mod reporter;
pub mod runner;
pub mod session;

// Re-export main types for convenience
pub use config::Config;
pub use error::{HarnessError, Result};
pub use reporter::{OutputFormat, Reporter};
pub use runner::{CheckOutcome, CheckRunner, RunReport};
pub use session::Session;
