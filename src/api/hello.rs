//! Root greeting endpoint
//!
//! The single route this service exposes

use axum::{routing::get, Router};

/// Fixed response body
///
/// Changing this string is what an end-to-end redeploy is verified with,
/// so it must match the tests character for character.
pub const GREETING: &str = "Hello, This service is deploy using GitHub Actions on Cloud Run_v3!";

/// Create the greeting route
pub fn router() -> Router {
    Router::new().route("/", get(hello))
}

/// GET /
///
/// Returns the greeting as plain text. No input, no state, no failure
/// path.
async fn hello() -> &'static str {
    GREETING
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_hello_returns_exact_greeting() {
        let body = hello().await;
        assert_eq!(body, "Hello, This service is deploy using GitHub Actions on Cloud Run_v3!");
    }
}
