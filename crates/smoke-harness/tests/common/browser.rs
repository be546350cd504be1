//! Browser automation helpers

use smoke_harness::Session;

/// Check if browser tests should be skipped (when Chrome isn't available)
pub fn should_skip() -> bool {
    std::env::var("SKIP_BROWSER_TESTS").is_ok()
}

/// Macro to skip test if Chrome isn't available
#[macro_export]
macro_rules! skip_if_no_chrome {
    () => {
        if browser::should_skip() {
            eprintln!("Skipping test: SKIP_BROWSER_TESTS is set");
            return;
        }
    };
}

/// Try to launch a session, skip test if Chrome not found
#[allow(dead_code)]
pub async fn require_session() -> Option<Session> {
    match Session::launch().await {
        Ok(session) => Some(session),
        Err(e) => {
            if e.to_string().contains("Could not auto detect") {
                eprintln!("Skipping: Chrome not installed ({})", e);
                None
            } else {
                panic!("Unexpected browser error: {}", e);
            }
        }
    }
}

/// True when a Chrome binary can be launched at all
#[allow(dead_code)]
pub async fn chrome_available() -> bool {
    match Session::launch().await {
        Ok(session) => {
            session.close().await;
            true
        }
        Err(e) => {
            if e.to_string().contains("Could not auto detect") {
                false
            } else {
                panic!("Unexpected browser error: {}", e);
            }
        }
    }
}
