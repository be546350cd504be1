//! Owned browser session
//!
//! A [`Session`] is the single shared mutable resource of a run: one browser
//! process, one CDP handler task, one page. It is exclusively owned by the
//! check runner and torn down unconditionally at the end of the run, whether
//! the checks passed or a fault occurred.
//!
//! The ad hoc scripts this harness replaces kept one ambient driver instance
//! alive across files; scoping the session to a single run removes that
//! shared state.

use chromiumoxide::browser::{Browser, BrowserConfig};
use chromiumoxide::page::ScreenshotParams;
use chromiumoxide::Page;
use futures::StreamExt;
use std::path::Path;
use std::time::Duration;
use tokio::net::TcpStream;
use tracing::{debug, info, warn};

use crate::error::{HarnessError, Result};

/// An owned browser process and page context for one run
pub struct Session {
    browser: Browser,
    page: Page,
    handler_task: tokio::task::JoinHandle<()>,
}

impl Session {
    /// Launch a headless browser session with default configuration
    ///
    /// Uses Chrome for Testing from the Puppeteer cache when present (same
    /// binary CI installs) and a unique user data directory so concurrent
    /// sessions never fight over a profile.
    pub async fn launch() -> Result<Self> {
        let mut builder = BrowserConfig::builder();

        if let Some(chrome_path) = find_chrome_for_testing() {
            debug!("Using Chrome for Testing: {}", chrome_path.display());
            builder = builder.chrome_executable(chrome_path);
        }

        builder = builder.user_data_dir(unique_user_data_dir());

        let config = builder
            .build()
            .map_err(HarnessError::Launch)?;

        Self::with_config(config).await
    }

    /// Launch a session with custom browser configuration
    pub async fn with_config(config: BrowserConfig) -> Result<Self> {
        info!("Launching browser session");
        let (browser, mut handler) = Browser::launch(config)
            .await
            .map_err(|e| HarnessError::Launch(e.to_string()))?;

        // Drive CDP events until the browser goes away
        let handler_task = tokio::spawn(async move {
            while let Some(event) = handler.next().await {
                if event.is_err() {
                    break;
                }
            }
        });

        let page = match browser.new_page("about:blank").await {
            Ok(page) => page,
            Err(e) => {
                handler_task.abort();
                return Err(HarnessError::Launch(format!("Failed to open page: {}", e)));
            }
        };

        info!("Browser session ready");
        Ok(Self {
            browser,
            page,
            handler_task,
        })
    }

    /// The page this session drives
    pub fn page(&self) -> &Page {
        &self.page
    }

    /// Navigate the page to `url` within the given budget
    ///
    /// The target is probed over TCP first so that a dead endpoint surfaces
    /// as [`HarnessError::Unreachable`] with a network-level reason instead
    /// of whatever error page the browser renders. Both probe and
    /// navigation failures are harness-fatal.
    pub async fn navigate(&self, url: &str, budget: Duration) -> Result<()> {
        probe_reachable(url, budget).await?;

        debug!("Navigating to {}", url);
        match tokio::time::timeout(budget, self.page.goto(url)).await {
            Ok(Ok(_)) => Ok(()),
            Ok(Err(e)) => Err(HarnessError::Navigation {
                url: url.to_string(),
                reason: e.to_string(),
            }),
            Err(_) => Err(HarnessError::Navigation {
                url: url.to_string(),
                reason: format!("timed out after {:?}", budget),
            }),
        }
    }

    /// Capture a full-page screenshot, overwriting `path`
    pub async fn screenshot<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let path = path.as_ref();
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }

        self.page
            .save_screenshot(
                ScreenshotParams::builder().full_page(true).build(),
                path,
            )
            .await
            .map_err(|e| HarnessError::Screenshot(e.to_string()))?;

        info!("Screenshot written to {}", path.display());
        Ok(())
    }

    /// Tear the session down: page, browser, handler task
    ///
    /// Errors during teardown are logged and swallowed so that close can sit
    /// on every exit path of a run.
    pub async fn close(mut self) {
        if let Err(e) = self.page.close().await {
            warn!("Failed to close page: {}", e);
        }
        if let Err(e) = self.browser.close().await {
            warn!("Failed to close browser: {}", e);
        }
        self.handler_task.abort();
        debug!("Browser session closed");
    }
}

/// Unique user data directory for this session
fn unique_user_data_dir() -> std::path::PathBuf {
    use std::sync::atomic::{AtomicU64, Ordering};
    static SESSION_ID: AtomicU64 = AtomicU64::new(0);

    let session_id = SESSION_ID.fetch_add(1, Ordering::SeqCst);
    let pid = std::process::id();
    let timestamp = std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .unwrap_or_default()
        .as_nanos();
    std::env::temp_dir().join(format!("smoke-harness-{}-{}-{}", pid, session_id, timestamp))
}

/// Find Chrome for Testing installed by Puppeteer
pub fn find_chrome_for_testing() -> Option<std::path::PathBuf> {
    let home = std::env::var("HOME").ok()?;
    let puppeteer_cache = std::path::Path::new(&home).join(".cache/puppeteer/chrome");

    if puppeteer_cache.exists() {
        if let Ok(entries) = std::fs::read_dir(&puppeteer_cache) {
            let mut versions: Vec<_> = entries
                .filter_map(|e| e.ok())
                .filter(|e| e.path().is_dir())
                .collect();
            versions.sort_by_key(|v| std::cmp::Reverse(v.path()));

            for version_dir in versions {
                // macOS arm64
                let chrome_app = version_dir.path().join(
                    "chrome-mac-arm64/Google Chrome for Testing.app/Contents/MacOS/Google Chrome for Testing",
                );
                if chrome_app.exists() {
                    return Some(chrome_app);
                }
                // macOS x64
                let chrome_app_x64 = version_dir.path().join(
                    "chrome-mac-x64/Google Chrome for Testing.app/Contents/MacOS/Google Chrome for Testing",
                );
                if chrome_app_x64.exists() {
                    return Some(chrome_app_x64);
                }
                // Linux
                let chrome_linux = version_dir.path().join("chrome-linux64/chrome");
                if chrome_linux.exists() {
                    return Some(chrome_linux);
                }
            }
        }
    }
    None
}

/// Check that the target URL's host accepts TCP connections
///
/// Connection refused and DNS failures become [`HarnessError::Unreachable`]
/// before the browser ever loads the page.
pub async fn probe_reachable(url: &str, budget: Duration) -> Result<()> {
    let (host, port) = host_and_port(url)?;
    // IPv6 literals need brackets back for socket-address parsing
    let addr = if host.contains(':') {
        format!("[{}]:{}", host, port)
    } else {
        format!("{}:{}", host, port)
    };

    debug!("Probing {}", addr);
    match tokio::time::timeout(budget, TcpStream::connect(&addr)).await {
        Ok(Ok(_)) => Ok(()),
        Ok(Err(e)) => Err(HarnessError::Unreachable {
            url: url.to_string(),
            reason: e.to_string(),
        }),
        Err(_) => Err(HarnessError::Unreachable {
            url: url.to_string(),
            reason: format!("connect timed out after {:?}", budget),
        }),
    }
}

/// Extract host and port from an http(s) URL
fn host_and_port(url: &str) -> Result<(String, u16)> {
    let (default_port, rest) = if let Some(rest) = url.strip_prefix("http://") {
        (80u16, rest)
    } else if let Some(rest) = url.strip_prefix("https://") {
        (443u16, rest)
    } else {
        return Err(HarnessError::Unreachable {
            url: url.to_string(),
            reason: "unsupported URL scheme".to_string(),
        });
    };

    let authority = rest.split(['/', '?', '#']).next().unwrap_or("");
    if authority.is_empty() {
        return Err(HarnessError::Unreachable {
            url: url.to_string(),
            reason: "missing host".to_string(),
        });
    }

    // Bracketed IPv6 literal; the colons inside the brackets are not a
    // port separator.
    if let Some(rest) = authority.strip_prefix('[') {
        let (host, after) = rest.split_once(']').ok_or_else(|| HarnessError::Unreachable {
            url: url.to_string(),
            reason: "unclosed '[' in host".to_string(),
        })?;
        return match after.strip_prefix(':') {
            Some(port) => Ok((host.to_string(), parse_port(url, port)?)),
            None if after.is_empty() => Ok((host.to_string(), default_port)),
            None => Err(HarnessError::Unreachable {
                url: url.to_string(),
                reason: format!("unexpected '{}' after host", after),
            }),
        };
    }

    match authority.rsplit_once(':') {
        Some((host, port)) => Ok((host.to_string(), parse_port(url, port)?)),
        None => Ok((authority.to_string(), default_port)),
    }
}

fn parse_port(url: &str, port: &str) -> Result<u16> {
    port.parse::<u16>().map_err(|_| HarnessError::Unreachable {
        url: url.to_string(),
        reason: format!("invalid port '{}'", port),
    })
}
