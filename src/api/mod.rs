//! API module
//!
//! HTTP route assembly and the serve loop

pub mod hello;

use axum::Router;
use tokio::net::TcpListener;
use tower_http::trace::TraceLayer;
use tracing::info;

/// Build the full route table
///
/// Only the greeting route is registered; anything else falls through
/// to axum's default 404 handling.
pub fn router() -> Router {
    Router::new()
        .merge(hello::router())
        // Middleware
        .layer(TraceLayer::new_for_http())
}

/// Serve the API on the given listener until shutdown
pub async fn serve(listener: TcpListener) -> std::io::Result<()> {
    let addr = listener.local_addr()?;
    info!(%addr, "Listening");

    axum::serve(listener, router())
        .with_graceful_shutdown(shutdown_signal())
        .await
}

/// Wait for SIGTERM or Ctrl+C
///
/// Cloud Run sends SIGTERM before stopping an instance.
async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("Failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            info!("Received Ctrl+C, shutting down");
        }
        _ = terminate => {
            info!("Received SIGTERM, shutting down");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Spin up a real server on an ephemeral port
    async fn spawn_server() -> String {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, router()).await.unwrap();
        });
        format!("http://{}", addr)
    }

    #[tokio::test]
    async fn test_root_returns_exact_greeting() {
        let base = spawn_server().await;

        let resp = reqwest::get(format!("{}/", base)).await.unwrap();
        assert_eq!(resp.status(), reqwest::StatusCode::OK);

        let content_type = resp
            .headers()
            .get("content-type")
            .and_then(|v| v.to_str().ok())
            .unwrap_or_default()
            .to_string();
        assert!(content_type.starts_with("text/plain"));

        let body = resp.text().await.unwrap();
        assert_eq!(body, hello::GREETING);
    }

    #[tokio::test]
    async fn test_request_headers_do_not_change_the_response() {
        let base = spawn_server().await;

        let client = reqwest::Client::new();
        let resp = client
            .get(format!("{}/", base))
            .header("X-Request-Id", "abc-123")
            .header("Accept", "application/json")
            .header("User-Agent", "uptime-probe/1.0")
            .send()
            .await
            .unwrap();

        assert_eq!(resp.status(), reqwest::StatusCode::OK);
        assert_eq!(resp.text().await.unwrap(), hello::GREETING);
    }

    #[tokio::test]
    async fn test_unknown_paths_return_404() {
        let base = spawn_server().await;
        let client = reqwest::Client::new();

        for path in ["/health", "/hello", "/deploy", "/favicon.ico"] {
            let resp = client
                .get(format!("{}{}", base, path))
                .send()
                .await
                .unwrap();
            assert_eq!(
                resp.status(),
                reqwest::StatusCode::NOT_FOUND,
                "expected 404 for {}",
                path
            );
        }
    }
}
