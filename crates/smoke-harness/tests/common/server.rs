//! Local server helpers

use std::net::SocketAddr;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpListener;

/// Check if a local server is available
#[allow(dead_code)]
pub async fn is_server_available(url: &str) -> bool {
    match reqwest::get(url).await {
        Ok(resp) => resp.status().is_success(),
        Err(_) => false,
    }
}

/// Macro to skip test if local server isn't running
#[macro_export]
macro_rules! require_local_server {
    ($url:expr) => {{
        if !server::is_server_available($url).await {
            eprintln!("Skipping: Local server not running at {}", $url);
            return;
        }
    }};
}

/// Serve a fixed HTML document on an ephemeral port
///
/// Every request gets the same document, which is all a smoke run needs.
/// The listener task lives until the test process exits.
pub async fn spawn_static_server(html: &'static str) -> SocketAddr {
    let listener = TcpListener::bind("127.0.0.1:0")
        .await
        .expect("Failed to bind fixture server");
    let addr = listener.local_addr().expect("Fixture server has no address");

    tokio::spawn(async move {
        loop {
            let Ok((mut stream, _)) = listener.accept().await else {
                break;
            };
            tokio::spawn(async move {
                let mut buf = [0u8; 4096];
                let _ = stream.read(&mut buf).await;
                let response = format!(
                    "HTTP/1.1 200 OK\r\nContent-Type: text/html\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
                    html.len(),
                    html
                );
                let _ = stream.write_all(response.as_bytes()).await;
                let _ = stream.shutdown().await;
            });
        }
    });

    addr
}
