//! Release pipeline domain model
//!
//! Pure data: one run, its ordered steps, and their status transitions

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Overall status of a pipeline run
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "snake_case")]
pub enum PipelineStatus {
    Pending,
    Running,
    Success,
    Failed,
}

impl PipelineStatus {
    /// String form used in logs and reports
    pub fn as_str(&self) -> &'static str {
        match self {
            PipelineStatus::Pending => "pending",
            PipelineStatus::Running => "running",
            PipelineStatus::Success => "success",
            PipelineStatus::Failed => "failed",
        }
    }

    /// Whether the run has reached a final state
    pub fn is_terminal(&self) -> bool {
        matches!(self, PipelineStatus::Success | PipelineStatus::Failed)
    }
}

/// Status of a single step
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "snake_case")]
pub enum StepStatus {
    Pending,
    Running,
    Success,
    Failed,
    Skipped,
}

/// Execution record for one step
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct StepReport {
    /// Step identifier (e.g., "docker_build", "docker_push")
    pub name: String,
    /// Display name (e.g., "Build image", "Push image")
    pub display_name: String,
    /// Start time
    pub started_at: Option<DateTime<Utc>>,
    /// Finish time
    pub finished_at: Option<DateTime<Utc>>,
    /// Duration in milliseconds
    pub duration_ms: Option<i64>,
    /// Step status
    pub status: StepStatus,
    /// Failure reason or extra detail
    pub message: Option<String>,
    /// Captured stdout, for steps that record a result
    pub output: Option<String>,
}

impl StepReport {
    /// Create a new pending step record
    pub fn new(name: &str, display_name: &str) -> Self {
        Self {
            name: name.to_string(),
            display_name: display_name.to_string(),
            started_at: None,
            finished_at: None,
            duration_ms: None,
            status: StepStatus::Pending,
            message: None,
            output: None,
        }
    }

    /// Mark the step as running
    pub fn start(&mut self) {
        self.started_at = Some(Utc::now());
        self.status = StepStatus::Running;
    }

    /// Finish the step
    pub fn finish(&mut self, success: bool, message: Option<String>) {
        let now = Utc::now();
        self.finished_at = Some(now);
        self.status = if success {
            StepStatus::Success
        } else {
            StepStatus::Failed
        };
        self.message = message;
        if let Some(started) = self.started_at {
            self.duration_ms = Some((now - started).num_milliseconds());
        }
    }

    /// Skip the step
    pub fn skip(&mut self, reason: Option<String>) {
        self.status = StepStatus::Skipped;
        self.message = reason;
    }
}

/// One full pipeline run
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct PipelineReport {
    pub id: String,
    pub status: PipelineStatus,
    pub started_at: DateTime<Utc>,
    pub finished_at: Option<DateTime<Utc>>,
    pub exit_code: Option<i32>,
    /// Per-step records, in execution order
    #[serde(default)]
    pub steps: Vec<StepReport>,
}

impl PipelineReport {
    /// Create a new triggered run
    pub fn new() -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            status: PipelineStatus::Pending,
            started_at: Utc::now(),
            finished_at: None,
            exit_code: None,
            steps: Vec::new(),
        }
    }

    /// Mark the run as executing
    pub fn start(&mut self) {
        self.status = PipelineStatus::Running;
        self.started_at = Utc::now();
    }

    /// Seal the run
    pub fn complete(&mut self, status: PipelineStatus, exit_code: Option<i32>) {
        self.status = status;
        self.finished_at = Some(Utc::now());
        self.exit_code = exit_code;
    }

    /// Endpoint captured by the describe step, when the run got that far
    ///
    /// Returns the most recent non-empty captured output.
    pub fn service_url(&self) -> Option<&str> {
        self.steps
            .iter()
            .rev()
            .find_map(|s| s.output.as_deref())
            .map(str::trim)
            .filter(|s| !s.is_empty())
    }
}

impl Default for PipelineReport {
    fn default() -> Self {
        Self::new()
    }
}
