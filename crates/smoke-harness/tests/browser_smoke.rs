//! End-to-end smoke runs against a local fixture page
//!
//! These tests require Chrome/Chromium to be installed.
//!
//! To skip these tests locally when Chrome isn't installed:
//!   SKIP_BROWSER_TESTS=1 cargo test -p smoke-harness --test browser_smoke

#[path = "common/browser.rs"]
mod browser;
#[path = "common/server.rs"]
mod server;

use smoke_harness::config::Config;
use smoke_harness::runner::CheckRunner;

/// A collapsed navigation rail that expands on header click, like the UI the
/// original verification scripts were written against. The Help label shares
/// its button with an icon span, so text matching cannot assume leaf-only
/// elements.
const NAV_RAIL_FIXTURE: &str = r#"<!DOCTYPE html>
<html>
<head>
<title>fixture</title>
<style>
  .menu-item { display: none; }
  .az-nav-rail.expanded .menu-item { display: block; }
</style>
</head>
<body>
<nav class="az-nav-rail collapsed">
  <div class="header" role="button" tabindex="0" aria-label="Toggle navigation"
       onclick="this.parentElement.classList.remove('collapsed'); this.parentElement.classList.add('expanded')">☰</div>
  <button class="menu-item"><span class="icon">?</span>Help</button>
  <button class="menu-item">Settings</button>
  <button class="menu-item">Save</button>
</nav>
</body>
</html>"#;

fn fixture_config(base_url: &str, screenshot_path: &str) -> Config {
    let toml = format!(
        r#"
        [harness]
        name = "Fixture smoke"
        base_url = "{base_url}"
        screenshot_path = "{screenshot_path}"

        [timeouts]
        wait_ms = 2000
        poll_ms = 50

        [[setup]]
        type = "wait"
        selector = ".az-nav-rail"

        [[setup]]
        type = "click"
        selector = ".az-nav-rail .header"
        wait_for = ".menu-item"

        [[checks]]
        name = "Rail visible"
        expect = "visible"
        selector = ".az-nav-rail"

        [[checks]]
        name = "Header labeled for screen readers"
        expect = "attribute_equals"
        selector = ".az-nav-rail .header"
        attribute = "aria-label"
        value = "Toggle navigation"

        [[checks]]
        name = "Menu items are buttons"
        expect = "tag_name_equals"
        selector = ".menu-item"
        tag = "button"

        [[checks]]
        name = "All menu entries rendered"
        expect = "count_at_least"
        selector = ".menu-item"
        count = 3

        [[checks]]
        name = "Help visible"
        expect = "text_visible"
        text = "Help"

        [[checks]]
        name = "Phantom entry visible"
        expect = "text_visible"
        text = "No Such Label"
        "#
    );
    Config::from_str(&toml).expect("fixture config must parse")
}

fn temp_screenshot(tag: &str) -> std::path::PathBuf {
    std::env::temp_dir().join(format!("smoke-e2e-{}-{}.png", tag, std::process::id()))
}

#[tokio::test]
async fn test_full_run_records_every_outcome() {
    skip_if_no_chrome!();
    if !browser::chrome_available().await {
        return;
    }

    let addr = server::spawn_static_server(NAV_RAIL_FIXTURE).await;
    let base_url = format!("http://{}", addr);
    let screenshot = temp_screenshot("outcomes");
    let _ = std::fs::remove_file(&screenshot);

    let config = fixture_config(&base_url, &screenshot.display().to_string());
    let report = CheckRunner::new().run(&config).await.expect("run must complete");

    // Exactly one outcome per declared check, in order
    assert_eq!(report.outcomes.len(), config.checks.len());
    assert!(report.setup_failures.is_empty(), "{:?}", report.setup_failures);

    // The phantom label fails; everything before and after it still ran
    assert!(report.outcomes[0].passed, "{:?}", report.outcomes[0]);
    assert!(report.outcomes[1].passed, "{:?}", report.outcomes[1]);
    assert!(report.outcomes[2].passed, "{:?}", report.outcomes[2]);
    assert!(report.outcomes[3].passed, "{:?}", report.outcomes[3]);
    assert!(report.outcomes[4].passed, "{:?}", report.outcomes[4]);
    assert!(!report.outcomes[5].passed);
    let detail = report.outcomes[5].detail.as_deref().unwrap();
    assert!(detail.contains("No Such Label"), "diagnostic was: {}", detail);

    assert!(!report.passed);

    // One screenshot regardless of check outcomes
    assert!(screenshot.exists(), "screenshot missing at {}", screenshot.display());
    let _ = std::fs::remove_file(&screenshot);
}

#[tokio::test]
async fn test_expand_interaction_reveals_labels() {
    skip_if_no_chrome!();
    if !browser::chrome_available().await {
        return;
    }

    let addr = server::spawn_static_server(NAV_RAIL_FIXTURE).await;
    let base_url = format!("http://{}", addr);
    let screenshot = temp_screenshot("expand");

    let toml = format!(
        r#"
        [harness]
        name = "Expand smoke"
        base_url = "{base_url}"
        screenshot_path = "{}"

        [timeouts]
        wait_ms = 2000
        poll_ms = 50

        [[setup]]
        type = "click"
        selector = ".az-nav-rail .header"
        wait_for = ".menu-item"

        [[checks]]
        name = "Rail expanded"
        expect = "attribute_equals"
        selector = ".az-nav-rail"
        attribute = "class"
        value = "az-nav-rail expanded"

        [[checks]]
        name = "Settings visible after expand"
        expect = "text_visible"
        text = "Settings"
        "#,
        screenshot.display()
    );
    let config = Config::from_str(&toml).unwrap();

    let report = CheckRunner::new().run(&config).await.expect("run must complete");
    assert!(report.passed, "{:#?}", report);
    let _ = std::fs::remove_file(&screenshot);
}

#[tokio::test]
async fn test_stray_non_button_menu_item_fails_tag_check() {
    skip_if_no_chrome!();
    if !browser::chrome_available().await {
        return;
    }

    // One menu entry regressed to a <div>; the tag check must catch it even
    // though the first matches are proper buttons.
    const FIXTURE: &str = r#"<!DOCTYPE html>
<html><body>
<nav class="az-nav-rail expanded">
  <button class="menu-item">Help</button>
  <div class="menu-item">Load</div>
  <button class="menu-item">Save</button>
</nav>
</body></html>"#;

    let addr = server::spawn_static_server(FIXTURE).await;
    let screenshot = temp_screenshot("straydiv");

    let toml = format!(
        r#"
        [harness]
        name = "Stray div smoke"
        base_url = "http://{addr}"
        screenshot_path = "{}"

        [timeouts]
        wait_ms = 2000
        poll_ms = 50

        [[checks]]
        name = "Menu items are buttons"
        expect = "tag_name_equals"
        selector = ".menu-item"
        tag = "button"
        "#,
        screenshot.display()
    );
    let config = Config::from_str(&toml).unwrap();

    let report = CheckRunner::new().run(&config).await.expect("run must complete");
    assert!(!report.outcomes[0].passed);
    let detail = report.outcomes[0].detail.as_deref().unwrap();
    assert!(detail.contains("element 2 of 3 is <div>"), "diagnostic was: {}", detail);
    let _ = std::fs::remove_file(&screenshot);
}

#[tokio::test]
async fn test_runs_are_idempotent_against_unchanged_target() {
    skip_if_no_chrome!();
    if !browser::chrome_available().await {
        return;
    }

    let addr = server::spawn_static_server(NAV_RAIL_FIXTURE).await;
    let base_url = format!("http://{}", addr);
    let screenshot = temp_screenshot("idempotent");

    let config = fixture_config(&base_url, &screenshot.display().to_string());
    let runner = CheckRunner::new();

    let first = runner.run(&config).await.expect("first run must complete");
    let second = runner.run(&config).await.expect("second run must complete");

    let verdicts = |r: &smoke_harness::RunReport| {
        r.outcomes.iter().map(|o| o.passed).collect::<Vec<_>>()
    };
    assert_eq!(verdicts(&first), verdicts(&second));
    assert_eq!(first.passed, second.passed);

    let _ = std::fs::remove_file(&screenshot);
}
