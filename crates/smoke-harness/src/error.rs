//! Error taxonomy for the smoke-test harness
//!
//! Only harness-fatal conditions are modeled as errors: situations where no
//! check can be evaluated at all. An individual check that fails is not an
//! error; it is recorded in the [`RunReport`](crate::runner::RunReport) and
//! the run continues.

use thiserror::Error;

/// Convenience alias used throughout the crate
pub type Result<T> = std::result::Result<T, HarnessError>;

/// Fatal harness errors that abort a run before or during session setup
#[derive(Error, Debug)]
pub enum HarnessError {
    #[error("Failed to launch browser: {0}")]
    Launch(String),

    #[error("Target unreachable at {url}: {reason}")]
    Unreachable { url: String, reason: String },

    #[error("Initial navigation to {url} failed: {reason}")]
    Navigation { url: String, reason: String },

    #[error("Invalid configuration: {0}")]
    Config(String),

    #[error("Failed to capture screenshot: {0}")]
    Screenshot(String),

    #[error("Browser protocol error: {0}")]
    Cdp(#[from] chromiumoxide::error::CdpError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Report formatting error: {0}")]
    Fmt(#[from] std::fmt::Error),

    #[error("Report serialization error: {0}")]
    Serialize(#[from] serde_json::Error),
}
