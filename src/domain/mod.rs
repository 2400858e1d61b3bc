//! Domain models
//!
//! Pure data structures, no axum/tokio dependencies

pub mod release;

// Re-exports for convenience
pub use release::{PipelineReport, PipelineStatus, StepReport, StepStatus};
