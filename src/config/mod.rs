//! Configuration module
//!
//! Environment variable parsing and constants

pub mod env;

pub use env::{ConfigError, DeployConfig, ServerConfig};
