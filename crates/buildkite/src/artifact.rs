//! Buildkite artifact store

use crate::agent::AgentCli;
use async_trait::async_trait;
use buildprint_ci::ArtifactStore;
use buildprint_core::{Error, Result};
use std::path::Path;
use tracing::info;

/// Ships files through `buildkite-agent artifact upload`.
///
/// Buildkite stores an uploaded absolute path under the same path minus its
/// leading `/`, which is the reference the download command uses.
#[derive(Debug, Clone, Default)]
pub struct BuildkiteArtifactStore {
    agent: AgentCli,
}

impl BuildkiteArtifactStore {
    /// Create a store using the given agent
    #[must_use]
    pub const fn new(agent: AgentCli) -> Self {
        Self { agent }
    }
}

#[async_trait]
impl ArtifactStore for BuildkiteArtifactStore {
    fn reference(&self, path: &Path) -> String {
        path.to_string_lossy().trim_start_matches('/').to_string()
    }

    async fn upload(&self, path: &Path) -> Result<String> {
        let display = path.to_string_lossy();
        self.agent
            .run(&["artifact", "upload", &*display], None)
            .await
            .map_err(|message| Error::artifact_upload(path, message))?;

        let reference = self.reference(path);
        info!(artifact = %reference, "Uploaded target file");
        Ok(reference)
    }

    fn download_command(&self, reference: &str) -> String {
        format!("{} artifact download {reference} .", self.agent.program())
    }
}
