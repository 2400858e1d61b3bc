//! hellorun - minimal Cloud Run service and its release pipeline
//!
//! Library entry: module layout plus the two run modes

pub mod api;
pub mod config;
pub mod domain;
pub mod infra;
pub mod pipeline;

use std::net::SocketAddr;
use std::path::PathBuf;

use tokio::net::TcpListener;
use tracing::{error, info};
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

use config::env::constants::{DEFAULT_LOG_FILTER, VERSION};
use config::env::{DeployConfig, ServerConfig};
use domain::release::PipelineStatus;

/// Runtime options parsed from the command line
#[derive(Clone, Debug, Default)]
pub struct RuntimeConfig {
    /// Override for the listening port
    pub port_override: Option<u16>,
    /// Where to write the JSON run report (deploy mode)
    pub report_path: Option<PathBuf>,
}

/// Initialize tracing
///
/// RUST_LOG wins when set, otherwise the crate default filter is used.
pub fn init_tracing() {
    let filter = std::env::var("RUST_LOG").unwrap_or_else(|_| DEFAULT_LOG_FILTER.to_string());

    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(&filter))
        .with(tracing_subscriber::fmt::layer())
        .init();
}

/// Start the HTTP service and block until shutdown
///
/// Binds 0.0.0.0 so the container port mapping works; port resolution
/// is CLI override, then PORT, then 8080.
pub async fn init_and_serve(runtime: RuntimeConfig) -> std::io::Result<()> {
    let config = ServerConfig::from_env();
    let port = runtime.port_override.unwrap_or(config.port);
    let addr = SocketAddr::from(([0, 0, 0, 0], port));

    info!(version = VERSION, %addr, "Starting hellorun");

    let listener = TcpListener::bind(addr).await?;
    api::serve(listener).await
}

/// Run the release pipeline and return the process exit code
pub async fn run_release(runtime: RuntimeConfig) -> i32 {
    let config = match DeployConfig::from_env() {
        Ok(config) => config,
        Err(e) => {
            error!(error = %e, "Deploy configuration incomplete");
            return 1;
        }
    };

    let report = pipeline::execute(&config).await;

    if let Some(path) = runtime.report_path.as_deref() {
        if let Err(e) = pipeline::write_report(&report, path).await {
            error!(path = %path.display(), error = %e, "Failed to write pipeline report");
        }
    }

    match report.status {
        PipelineStatus::Failed => report.exit_code.filter(|c| *c > 0).unwrap_or(1),
        _ => 0,
    }
}
