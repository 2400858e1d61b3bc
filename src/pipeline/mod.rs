//! Release pipeline execution
//!
//! Runs the deploy sequence strictly in order, aborting on the first
//! failed step. No retries, no rollback.

pub mod steps;

use std::path::Path;

use tokio::fs;
use tracing::{error, info};

use crate::config::env::DeployConfig;
use crate::domain::release::{PipelineReport, PipelineStatus, StepReport, StepStatus};
use crate::infra::command::CommandRunner;

use self::steps::Step;

/// Execute the full release sequence for the given target
pub async fn execute(config: &DeployConfig) -> PipelineReport {
    info!(
        project = %config.project_id,
        region = %config.region,
        service = %config.service,
        image = %config.image(),
        "Starting release pipeline"
    );

    run(steps::release_steps(config)).await
}

/// Run an ordered step list, fail-fast
///
/// Each step runs only if every step before it succeeded; once one
/// fails, the rest are marked skipped and the run is failed with that
/// step's exit code.
pub async fn run(steps: Vec<Step>) -> PipelineReport {
    let mut report = PipelineReport::new();
    let mut records: Vec<StepReport> = steps
        .iter()
        .map(|s| StepReport::new(s.name, s.display_name))
        .collect();

    report.start();

    let total = steps.len();
    let mut exit_code = 0;

    for (i, step) in steps.iter().enumerate() {
        if exit_code != 0 {
            records[i].skip(Some("previous step failed".to_string()));
            continue;
        }

        records[i].start();
        println!("[{}/{}] {}...", i + 1, total, step.display_name);
        println!(">>> {}", step.command_line());

        let args: Vec<&str> = step.args.iter().map(String::as_str).collect();

        if step.capture {
            match CommandRunner::run_captured(step.program, &args).await {
                Ok(output) => {
                    if !output.stderr.is_empty() {
                        eprint!("{}", String::from_utf8_lossy(&output.stderr));
                    }
                    if output.status.success() {
                        let captured = String::from_utf8_lossy(&output.stdout).trim().to_string();
                        records[i].output = Some(captured);
                        records[i].finish(true, None);
                    } else {
                        records[i].finish(false, Some(format!("{} failed", step.name)));
                        exit_code = output.status.code().unwrap_or(-1);
                    }
                }
                Err(e) => {
                    error!(step = step.name, error = %e, "Step could not run");
                    records[i].finish(false, Some(e.to_string()));
                    exit_code = -1;
                }
            }
        } else {
            match CommandRunner::run_streamed(step.program, &args).await {
                Ok(status) => {
                    if status.success() {
                        records[i].finish(true, None);
                    } else {
                        records[i].finish(false, Some(format!("{} failed", step.name)));
                        exit_code = status.code().unwrap_or(-1);
                    }
                }
                Err(e) => {
                    error!(step = step.name, error = %e, "Step could not run");
                    records[i].finish(false, Some(e.to_string()));
                    exit_code = -1;
                }
            }
        }
    }

    let status = if exit_code == 0 {
        PipelineStatus::Success
    } else {
        PipelineStatus::Failed
    };

    // Print step summary
    println!();
    println!("=== Step Summary ===");
    for record in &records {
        let duration = record
            .duration_ms
            .map(|d| format!("{}ms", d))
            .unwrap_or_else(|| "-".to_string());
        let status_icon = match record.status {
            StepStatus::Success => "✓",
            StepStatus::Failed => "✗",
            StepStatus::Skipped => "⊘",
            StepStatus::Running => "⟳",
            StepStatus::Pending => "○",
        };
        println!("{} {} ({})", status_icon, record.display_name, duration);
    }

    report.steps = records;
    report.complete(status, Some(exit_code));

    if let Some(url) = report.service_url() {
        println!("Service URL: {}", url);
    }

    info!(
        run_id = %report.id,
        status = report.status.as_str(),
        exit_code = exit_code,
        "Release pipeline finished"
    );

    report
}

/// Write the run report as pretty JSON
pub async fn write_report(report: &PipelineReport, path: &Path) -> anyhow::Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent).await?;
        }
    }

    let content = serde_json::to_string_pretty(report)?;
    fs::write(path, &content).await?;

    info!(path = %path.display(), "Wrote pipeline report");

    Ok(())
}
