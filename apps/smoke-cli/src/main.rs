//! Smoke-check CLI
//!
//! Runs a declarative check list against a live web application and reports
//! per-check pass/fail with a screenshot artifact.
//!
//! Exit codes: 0 when every check passed, 1 when any check or setup step
//! failed, 2 when the harness itself could not run (bad config, browser
//! launch or initial navigation failure).

use clap::Parser;
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use smoke_harness::reporter::{OutputFormat, Reporter};
use smoke_harness::runner::CheckRunner;
use smoke_harness::{Config, HarnessError};

/// Exit code when one or more checks failed
const EXIT_CHECKS_FAILED: i32 = 1;
/// Exit code when the harness could not run at all
const EXIT_HARNESS_FATAL: i32 = 2;

#[derive(Parser, Debug)]
#[command(name = "smoke-cli")]
#[command(version, about = "UI smoke-check runner for live web applications")]
struct Args {
    /// Path to the TOML check list
    #[arg(short, long)]
    config: PathBuf,

    /// Override the configured base URL (dev vs preview server)
    #[arg(long, env = "SMOKE_BASE_URL")]
    base_url: Option<String>,

    /// Override the configured screenshot path
    #[arg(long)]
    screenshot: Option<String>,

    /// Report format: console, json, json-pretty, or markdown
    #[arg(long, default_value = "console")]
    format: String,

    /// Also write the report to this file
    #[arg(long)]
    output: Option<PathBuf>,
}

#[tokio::main]
async fn main() {
    let args = Args::parse();

    tracing_subscriber::registry()
        .with(EnvFilter::from_default_env())
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let format = match parse_format(&args.format) {
        Some(format) => format,
        None => {
            eprintln!(
                "Unknown format: {}. Use 'console', 'json', 'json-pretty' or 'markdown'",
                args.format
            );
            std::process::exit(EXIT_HARNESS_FATAL);
        }
    };

    let mut config = match Config::from_file(&args.config) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("{}", e);
            std::process::exit(EXIT_HARNESS_FATAL);
        }
    };

    if let Some(base_url) = args.base_url {
        config.harness.base_url = base_url;
    }
    if let Some(screenshot) = args.screenshot {
        config.harness.screenshot_path = screenshot;
    }

    tracing::info!(
        "Running '{}' against {}",
        config.harness.name,
        config.harness.base_url
    );

    let report = match CheckRunner::new().run(&config).await {
        Ok(report) => report,
        Err(e @ (HarnessError::Launch(_)
        | HarnessError::Unreachable { .. }
        | HarnessError::Navigation { .. })) => {
            eprintln!("Harness-fatal: {}", e);
            std::process::exit(EXIT_HARNESS_FATAL);
        }
        Err(e) => {
            eprintln!("{}", e);
            std::process::exit(EXIT_HARNESS_FATAL);
        }
    };

    let reporter = Reporter::new(format);
    if let Err(e) = reporter.report(&report) {
        eprintln!("Failed to print report: {}", e);
        std::process::exit(EXIT_HARNESS_FATAL);
    }

    if let Some(output) = &args.output {
        if let Err(e) = reporter.write_to_file(&report, output) {
            eprintln!("Failed to write report to {}: {}", output.display(), e);
            std::process::exit(EXIT_HARNESS_FATAL);
        }
    }

    if !report.passed {
        std::process::exit(EXIT_CHECKS_FAILED);
    }
}

fn parse_format(s: &str) -> Option<OutputFormat> {
    match s {
        "console" => Some(OutputFormat::Console),
        "json" => Some(OutputFormat::Json),
        "json-pretty" => Some(OutputFormat::JsonPretty),
        "markdown" => Some(OutputFormat::Markdown),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_format() {
        assert_eq!(parse_format("console"), Some(OutputFormat::Console));
        assert_eq!(parse_format("json"), Some(OutputFormat::Json));
        assert_eq!(parse_format("json-pretty"), Some(OutputFormat::JsonPretty));
        assert_eq!(parse_format("markdown"), Some(OutputFormat::Markdown));
        assert_eq!(parse_format("yaml"), None);
    }
}
