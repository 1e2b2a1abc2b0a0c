//! Buildkite CI platform
//!
//! Submits each task's steps as a dynamic pipeline through
//! `buildkite-agent pipeline upload`, reading the YAML from stdin.

use crate::agent::AgentCli;
use crate::artifact::BuildkiteArtifactStore;
use crate::schema::Pipeline;
use async_trait::async_trait;
use buildprint_ci::{ArtifactStore, CiPlatform, StepDescriptor};
use buildprint_core::{Error, Result};
use std::io::Write;
use tracing::{debug, info};

/// Platform name used on the command line
pub const PLATFORM_NAME: &str = "buildkite";

/// Buildkite platform.
///
/// In dry-run mode the rendered pipeline is written to stdout instead of
/// being uploaded.
#[derive(Debug, Clone, Default)]
pub struct BuildkitePlatform {
    agent: AgentCli,
    artifacts: BuildkiteArtifactStore,
}

impl BuildkitePlatform {
    /// Create a platform using the default `buildkite-agent`
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Use `program` as the agent executable
    #[must_use]
    pub fn with_agent(mut self, program: impl Into<String>) -> Self {
        self.agent = AgentCli::new(program);
        self.artifacts = BuildkiteArtifactStore::new(self.agent.clone());
        self
    }

    /// Render `steps` as pipeline YAML
    ///
    /// # Errors
    /// Returns [`Error::Submission`] if the pipeline cannot be serialized.
    pub fn render(&self, steps: &[StepDescriptor]) -> Result<String> {
        Pipeline::from_steps(steps)
            .to_yaml()
            .map_err(|e| Error::submission(PLATFORM_NAME, e.to_string()))
    }
}

#[async_trait]
impl CiPlatform for BuildkitePlatform {
    fn name(&self) -> &'static str {
        PLATFORM_NAME
    }

    fn description(&self) -> &'static str {
        "Buildkite dynamic pipelines via buildkite-agent"
    }

    fn artifacts(&self) -> &dyn ArtifactStore {
        &self.artifacts
    }

    async fn submit(&self, steps: &[StepDescriptor], dry_run: bool) -> Result<()> {
        let yaml = self.render(steps)?;

        if dry_run {
            info!(steps = steps.len(), "Would have uploaded pipeline:");
            let mut stdout = std::io::stdout().lock();
            stdout.write_all(yaml.as_bytes())?;
            stdout.flush()?;
            return Ok(());
        }

        debug!("Pipeline YAML:\n{yaml}");
        self.agent
            .run(&["pipeline", "upload"], Some(&yaml))
            .await
            .map_err(|message| Error::submission(PLATFORM_NAME, message))
    }
}
