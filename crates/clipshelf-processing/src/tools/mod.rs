//! External media-tool invocation.
//!
//! Tools run as blocking out-of-process calls behind the narrow
//! `CommandRunner` seam so tests can substitute a scripted runner for the
//! real binaries. Both output streams are fully captured before a run
//! returns; a child whose stderr fills its pipe buffer can never deadlock
//! the invocation.

pub mod probe;
pub mod remux;

use async_trait::async_trait;
use clipshelf_core::AppError;
use std::process::Stdio;
use tokio::process::Command;

/// Captured result of one tool invocation.
#[derive(Debug, Clone)]
pub struct ToolOutput {
    pub exit_code: Option<i32>,
    pub success: bool,
    pub stdout: Vec<u8>,
    pub stderr: Vec<u8>,
}

impl ToolOutput {
    pub fn stderr_text(&self) -> String {
        String::from_utf8_lossy(&self.stderr).into_owned()
    }
}

/// Errors from tool invocation and output handling.
#[derive(Debug, thiserror::Error)]
pub enum ToolError {
    #[error("Failed to launch {tool}: {source}")]
    Launch {
        tool: &'static str,
        #[source]
        source: std::io::Error,
    },

    #[error("{tool} exited with an error: {stderr}")]
    Failed { tool: &'static str, stderr: String },

    #[error("Could not parse {tool} output: {detail}")]
    Unparseable { tool: &'static str, detail: String },
}

impl From<ToolError> for AppError {
    fn from(err: ToolError) -> Self {
        match err {
            ToolError::Launch { tool, source } => AppError::ExternalTool {
                tool,
                detail: format!("failed to launch: {}", source),
            },
            ToolError::Failed { tool, stderr } => AppError::ExternalTool {
                tool,
                detail: stderr,
            },
            ToolError::Unparseable { tool, detail } => AppError::ExternalTool { tool, detail },
        }
    }
}

/// Narrow subprocess seam: spawn, wait for exit, capture both streams.
#[async_trait]
pub trait CommandRunner: Send + Sync {
    async fn run(&self, program: &str, args: &[String]) -> std::io::Result<ToolOutput>;
}

/// `CommandRunner` backed by real subprocesses.
#[derive(Debug, Default, Clone)]
pub struct SystemRunner;

#[async_trait]
impl CommandRunner for SystemRunner {
    async fn run(&self, program: &str, args: &[String]) -> std::io::Result<ToolOutput> {
        let start = std::time::Instant::now();

        let output = Command::new(program)
            .args(args)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .output()
            .await?;

        tracing::debug!(
            program = %program,
            exit_code = ?output.status.code(),
            duration_ms = start.elapsed().as_secs_f64() * 1000.0,
            "External tool finished"
        );

        Ok(ToolOutput {
            exit_code: output.status.code(),
            success: output.status.success(),
            stdout: output.stdout,
            stderr: output.stderr,
        })
    }
}
