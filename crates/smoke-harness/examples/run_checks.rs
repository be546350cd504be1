//! Run a check list from a TOML config file
//!
//! Usage: cargo run -p smoke-harness --example run_checks -- <checks.toml>

use anyhow::Result;
use smoke_harness::config::Config;
use smoke_harness::reporter::{OutputFormat, Reporter};
use smoke_harness::runner::CheckRunner;
use std::env;

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt::init();

    let args: Vec<String> = env::args().collect();
    let config_path = args.get(1).expect("Usage: run_checks <checks.toml>");

    println!("Loading config from: {}", config_path);
    let config = Config::from_file(config_path)?;

    println!("Starting run: {}", config.harness.name);
    println!("  Base URL: {}", config.harness.base_url);
    println!("  Setup steps: {}", config.setup.len());
    println!("  Checks: {}", config.checks.len());
    println!();

    let report = CheckRunner::new().run(&config).await?;

    let reporter = Reporter::new(OutputFormat::Console);
    reporter.report(&report)?;

    Ok(())
}
