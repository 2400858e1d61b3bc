//! Environment configuration
//!
//! All runtime settings come from environment variables

use std::env;

use thiserror::Error;

/// Configuration error
#[derive(Debug, Error)]
pub enum ConfigError {
    /// A required variable is missing or empty
    #[error("missing required environment variable: {0}")]
    MissingVar(&'static str),
}

/// HTTP server configuration
#[derive(Clone, Debug)]
pub struct ServerConfig {
    /// Listening port
    pub port: u16,
}

impl ServerConfig {
    /// Load from environment variables
    pub fn from_env() -> Self {
        let port = env::var("PORT")
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(constants::DEFAULT_PORT);

        Self { port }
    }
}

/// Release pipeline configuration
///
/// The (project, region, service, repository) tuple identifies the deploy
/// target; the key file authenticates it.
#[derive(Clone, Debug)]
pub struct DeployConfig {
    /// Target project id
    pub project_id: String,
    /// Deployment region (e.g., "us-central1")
    pub region: String,
    /// Service name on the run platform
    pub service: String,
    /// Artifact Registry repository name
    pub repository: String,
    /// Path to the service account key file
    pub key_file: String,
    /// Image tag
    pub tag: String,
}

impl DeployConfig {
    /// Load from environment variables
    ///
    /// Fails before anything is built or pushed when a required variable
    /// is absent.
    pub fn from_env() -> Result<Self, ConfigError> {
        let project_id = require("PROJECT_ID")?;
        let region = require("REGION")?;
        let service = require("SERVICE")?;
        let repository = require("REPOSITORY")?;
        let key_file = require("GOOGLE_APPLICATION_CREDENTIALS")?;

        // Explicit IMAGE_TAG wins, then the CI commit hash
        let tag = load_with_fallback("IMAGE_TAG", "GITHUB_SHA")
            .unwrap_or_else(|| constants::DEFAULT_TAG.to_string());

        Ok(Self {
            project_id,
            region,
            service,
            repository,
            key_file,
            tag,
        })
    }

    /// Full image reference in the Artifact Registry
    pub fn image(&self) -> String {
        format!(
            "{}-docker.pkg.dev/{}/{}/{}:{}",
            self.region, self.project_id, self.repository, self.service, self.tag
        )
    }

    /// Registry host for docker credential configuration
    pub fn registry_host(&self) -> String {
        format!("{}-docker.pkg.dev", self.region)
    }
}

/// Read a required environment variable, treating empty as missing
fn require(name: &'static str) -> Result<String, ConfigError> {
    env::var(name)
        .ok()
        .filter(|v| !v.is_empty())
        .ok_or(ConfigError::MissingVar(name))
}

/// Load an environment variable, with a fallback name
fn load_with_fallback(primary: &str, fallback: &str) -> Option<String> {
    env::var(primary).ok().or_else(|| env::var(fallback).ok())
}

/// Constants
pub mod constants {
    /// Default listening port (the container contract port)
    pub const DEFAULT_PORT: u16 = 8080;

    /// Default image tag when neither IMAGE_TAG nor GITHUB_SHA is set
    pub const DEFAULT_TAG: &str = "latest";

    /// Default log filter when RUST_LOG is unset
    pub const DEFAULT_LOG_FILTER: &str = "hellorun=info,tower_http=info";

    /// Version
    pub const VERSION: &str = env!("CARGO_PKG_VERSION");
}
