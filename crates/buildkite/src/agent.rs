//! `buildkite-agent` invocation

use std::process::Stdio;
use tokio::io::AsyncWriteExt;
use tokio::process::Command;
use tracing::debug;

/// Default agent executable
pub const DEFAULT_AGENT: &str = "buildkite-agent";

/// Runs `buildkite-agent` subcommands
#[derive(Debug, Clone)]
pub struct AgentCli {
    program: String,
}

impl Default for AgentCli {
    fn default() -> Self {
        Self::new(DEFAULT_AGENT)
    }
}

impl AgentCli {
    /// Use `program` as the agent executable
    #[must_use]
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
        }
    }

    /// The agent executable
    #[must_use]
    pub fn program(&self) -> &str {
        &self.program
    }

    /// Run the agent with `args`, feeding `stdin` if given.
    ///
    /// Returns a message describing the failure when the agent cannot be
    /// started or exits non-zero.
    pub(crate) async fn run(&self, args: &[&str], stdin: Option<&str>) -> Result<(), String> {
        debug!(program = %self.program, ?args, "Running buildkite-agent");

        let mut child = Command::new(&self.program)
            .args(args)
            .stdin(if stdin.is_some() {
                Stdio::piped()
            } else {
                Stdio::null()
            })
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()
            .map_err(|e| format!("Failed to execute {}: {e}", self.program))?;

        // Feed stdin while waiting so an agent that exits early is still
        // reaped and its stderr kept.
        let pipe = child.stdin.take();
        let feed = async move {
            match (stdin, pipe) {
                (Some(input), Some(mut pipe)) => pipe.write_all(input.as_bytes()).await,
                _ => Ok(()),
            }
        };
        let (written, output) = tokio::join!(feed, child.wait_with_output());

        let output =
            output.map_err(|e| format!("Failed to wait for {}: {e}", self.program))?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(format!("{}: {}", output.status, stderr.trim()));
        }
        written.map_err(|e| format!("Failed to write to {}: {e}", self.program))
    }
}
