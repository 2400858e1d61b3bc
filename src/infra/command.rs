//! Command execution
//!
//! Thin wrapper over tokio's process API, supporting:
//! - Live passthrough of child stdout/stderr for CI logs
//! - Captured output for steps that read a result

use std::process::{ExitStatus, Output, Stdio};
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::process::Command;

/// Command runner
pub struct CommandRunner;

/// Command execution error
#[derive(Debug)]
pub enum CommandError {
    /// The command could not be started
    SpawnFailed(std::io::Error),
    /// Waiting for the command to finish failed
    WaitFailed(std::io::Error),
}

impl std::fmt::Display for CommandError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CommandError::SpawnFailed(e) => write!(f, "Failed to spawn command: {}", e),
            CommandError::WaitFailed(e) => write!(f, "Failed to wait for command: {}", e),
        }
    }
}

impl std::error::Error for CommandError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            CommandError::SpawnFailed(e) | CommandError::WaitFailed(e) => Some(e),
        }
    }
}

impl CommandRunner {
    /// Run a command, forwarding its output line by line
    ///
    /// Child stdout/stderr lines are written to our own stdout/stderr as
    /// they arrive, so long builds stay visible in CI logs.
    pub async fn run_streamed(program: &str, args: &[&str]) -> Result<ExitStatus, CommandError> {
        let mut child = Command::new(program)
            .args(args)
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()
            .map_err(CommandError::SpawnFailed)?;

        let stdout = child.stdout.take();
        let stderr = child.stderr.take();

        let stdout_task = tokio::spawn(async move {
            if let Some(stdout) = stdout {
                let reader = BufReader::new(stdout);
                let mut lines = reader.lines();
                while let Ok(Some(line)) = lines.next_line().await {
                    println!("{}", line);
                }
            }
        });

        let stderr_task = tokio::spawn(async move {
            if let Some(stderr) = stderr {
                let reader = BufReader::new(stderr);
                let mut lines = reader.lines();
                while let Ok(Some(line)) = lines.next_line().await {
                    eprintln!("{}", line);
                }
            }
        });

        let status = child.wait().await.map_err(CommandError::WaitFailed)?;

        // Drain remaining output before reporting the status
        let _ = stdout_task.await;
        let _ = stderr_task.await;

        Ok(status)
    }

    /// Run a command to completion and capture its output
    ///
    /// Used by steps whose stdout is a value (e.g., the service URL).
    pub async fn run_captured(program: &str, args: &[&str]) -> Result<Output, CommandError> {
        Command::new(program)
            .args(args)
            .output()
            .await
            .map_err(CommandError::SpawnFailed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_run_captured_success() {
        let result = CommandRunner::run_captured("echo", &["hello"]).await;

        assert!(result.is_ok());
        let output = result.unwrap();
        assert!(output.status.success());
        assert!(String::from_utf8_lossy(&output.stdout).contains("hello"));
    }

    #[tokio::test]
    async fn test_run_captured_not_found() {
        let result = CommandRunner::run_captured("nonexistent_command_12345", &[]).await;

        assert!(matches!(result, Err(CommandError::SpawnFailed(_))));
    }

    #[tokio::test]
    async fn test_run_streamed_success() {
        let status = CommandRunner::run_streamed("true", &[]).await.unwrap();
        assert!(status.success());
    }

    #[tokio::test]
    async fn test_run_streamed_exit_code() {
        let status = CommandRunner::run_streamed("sh", &["-c", "exit 7"])
            .await
            .unwrap();
        assert!(!status.success());
        assert_eq!(status.code(), Some(7));
    }

    #[tokio::test]
    async fn test_run_streamed_not_found() {
        let result = CommandRunner::run_streamed("nonexistent_command_12345", &[]).await;

        assert!(matches!(result, Err(CommandError::SpawnFailed(_))));
    }
}
