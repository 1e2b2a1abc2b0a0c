//! Step translation
//!
//! Turns a [`ResolvedTask`] into the shell commands a CI step runs.
//!
//! - `run`: a single `bazel run` with the targets inline.
//! - `build`/`test`: the targets are written one per line to a file, the file
//!   goes through the [`ArtifactStore`], and the step downloads it before
//!   running Bazel with `--target_pattern_file`. Command lines have length
//!   limits that large target lists would exceed.

use crate::artifact::ArtifactStore;
use crate::resolve::ResolvedTask;
use buildprint_core::{CommandKind, Error, Result};
use serde::Serialize;
use std::io::Write;
use std::path::PathBuf;
use tracing::{debug, info};

/// Default Bazel executable
pub const DEFAULT_BAZEL: &str = "bazel";

/// The commands one CI step runs, in order
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StepDescriptor {
    /// Shell commands
    pub commands: Vec<String>,
}

/// Translates resolved tasks into step descriptors
#[derive(Debug, Clone)]
pub struct StepTranslator {
    bazel: String,
    dry_run: bool,
    inline_threshold: usize,
    artifact_dir: PathBuf,
}

impl Default for StepTranslator {
    fn default() -> Self {
        Self {
            bazel: DEFAULT_BAZEL.to_string(),
            dry_run: false,
            inline_threshold: 0,
            artifact_dir: std::env::temp_dir(),
        }
    }
}

impl StepTranslator {
    /// Create a translator with default settings
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Bazel executable used in generated commands
    #[must_use]
    pub fn with_bazel(mut self, bazel: impl Into<String>) -> Self {
        self.bazel = bazel.into();
        self
    }

    /// Skip uploads and only log what would be uploaded
    #[must_use]
    pub const fn with_dry_run(mut self, dry_run: bool) -> Self {
        self.dry_run = dry_run;
        self
    }

    /// Inline build/test target lists up to this many bytes (0 disables)
    #[must_use]
    pub const fn with_inline_threshold(mut self, bytes: usize) -> Self {
        self.inline_threshold = bytes;
        self
    }

    /// Directory target files are written to
    #[must_use]
    pub fn with_artifact_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.artifact_dir = dir.into();
        self
    }

    /// Translate `resolved` into a step, or `None` when it has no targets
    ///
    /// # Errors
    /// Returns an IO error if the target file cannot be written, or the
    /// artifact store's error if the upload fails.
    pub async fn translate(
        &self,
        resolved: &ResolvedTask,
        artifacts: &dyn ArtifactStore,
    ) -> Result<Option<StepDescriptor>> {
        if resolved.is_empty() {
            debug!(query = %resolved.unit.query, "No targets, skipping step");
            return Ok(None);
        }

        let unit = &resolved.unit;
        let names: Vec<&str> = resolved.targets.iter().map(|t| t.name()).collect();

        if unit.kind == CommandKind::Run {
            return Ok(Some(StepDescriptor {
                commands: vec![self.bazel_command(resolved, &names.join(" "))],
            }));
        }

        let contents = names.join("\n");
        if self.inline_threshold > 0 && contents.len() <= self.inline_threshold {
            debug!(bytes = contents.len(), "Inlining target list");
            return Ok(Some(StepDescriptor {
                commands: vec![self.bazel_command(resolved, &names.join(" "))],
            }));
        }

        let path = self.write_targets(&contents).await?;
        let reference = if self.dry_run {
            info!("Would have uploaded file: {}", path.display());
            debug!("Target file contained:\n{contents}");
            artifacts.reference(&path)
        } else {
            artifacts.upload(&path).await?
        };

        Ok(Some(StepDescriptor {
            commands: vec![
                artifacts.download_command(&reference),
                self.bazel_command(resolved, &format!("--target_pattern_file {reference}")),
            ],
        }))
    }

    fn bazel_command(&self, resolved: &ResolvedTask, targets: &str) -> String {
        let unit = &resolved.unit;
        join_fields(&[
            self.bazel.as_str(),
            unit.kind.as_str(),
            unit.options.as_str(),
            unit.config_flag.as_str(),
            targets,
        ])
    }

    /// Persist `contents` to a fresh file in the artifact directory.
    ///
    /// The file outlives the process; the CI agent uploads it by path.
    async fn write_targets(&self, contents: &str) -> Result<PathBuf> {
        let dir = self.artifact_dir.clone();
        let contents = contents.to_string();
        tokio::task::spawn_blocking(move || -> Result<PathBuf> {
            let mut file = tempfile::Builder::new()
                .prefix("buildprint-targets-")
                .suffix(".txt")
                .tempfile_in(&dir)?;
            file.write_all(contents.as_bytes())?;
            file.flush()?;
            let (_, path) = file.keep().map_err(|e| e.error)?;
            Ok(path)
        })
        .await
        .map_err(|e| Error::Io(std::io::Error::other(e)))?
    }
}

fn join_fields(fields: &[&str]) -> String {
    fields
        .iter()
        .filter(|f| !f.is_empty())
        .copied()
        .collect::<Vec<_>>()
        .join(" ")
}
