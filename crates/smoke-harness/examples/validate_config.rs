use smoke_harness::config::Config;
use std::env;
use std::path::PathBuf;

fn main() -> anyhow::Result<()> {
    let args: Vec<String> = env::args().collect();
    let config_path = if args.len() > 1 {
        PathBuf::from(&args[1])
    } else {
        PathBuf::from("checks/navrail.toml")
    };

    println!("Validating config file: {}", config_path.display());

    let config = Config::from_file(&config_path)?;

    println!("\n✓ Successfully parsed configuration!");
    println!("\nSuite: {}", config.harness.name);
    println!("Base URL: {}", config.harness.base_url);
    println!("Screenshot: {}", config.harness.screenshot_path);

    println!("\nTimeouts:");
    println!("  Wait: {}ms", config.timeouts.wait_ms);
    println!("  Poll: {}ms", config.timeouts.poll_ms);
    println!("  Navigation: {}ms", config.timeouts.navigation_ms);

    println!("\nSetup steps ({}):", config.setup.len());
    for (i, step) in config.setup.iter().enumerate() {
        println!("  {}. {}", i + 1, step.describe());
    }

    println!("\nChecks ({}):", config.checks.len());
    for (i, check) in config.checks.iter().enumerate() {
        println!("  {}. {}: {}", i + 1, check.name, check.expect.describe());
    }

    println!("\n✓ All validations passed!");

    Ok(())
}
