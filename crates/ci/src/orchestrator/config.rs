//! Orchestrator configuration

use crate::translate::DEFAULT_BAZEL;
use buildprint_core::{DEFAULT_MAX_WORKERS, MANUAL_TAG};
use std::path::PathBuf;

/// Immutable settings for a [`super::PipelineOrchestrator`] run
#[derive(Debug, Clone)]
pub struct OrchestratorConfig {
    /// Log uploads and submissions instead of performing them
    pub dry_run: bool,

    /// Maximum tasks expanded and resolved at once (0 = one per task)
    pub max_workers: usize,

    /// Tag excluded from every query unless requested explicitly
    pub manual_tag: String,

    /// Bazel executable used in generated step commands
    pub bazel: String,

    /// Inline build/test target lists up to this many bytes (0 = never)
    pub inline_threshold: usize,

    /// Directory target files are written to (default: system temp)
    pub artifact_dir: Option<PathBuf>,
}

impl Default for OrchestratorConfig {
    fn default() -> Self {
        Self {
            dry_run: false,
            max_workers: DEFAULT_MAX_WORKERS,
            manual_tag: MANUAL_TAG.to_string(),
            bazel: DEFAULT_BAZEL.to_string(),
            inline_threshold: 0,
            artifact_dir: None,
        }
    }
}

impl OrchestratorConfig {
    /// Create a config with default settings
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Enable or disable dry run mode
    #[must_use]
    pub const fn with_dry_run(mut self, dry_run: bool) -> Self {
        self.dry_run = dry_run;
        self
    }

    /// Set the worker count
    #[must_use]
    pub const fn with_max_workers(mut self, max_workers: usize) -> Self {
        self.max_workers = max_workers;
        self
    }

    /// Set the reserved manual tag
    #[must_use]
    pub fn with_manual_tag(mut self, tag: impl Into<String>) -> Self {
        self.manual_tag = tag.into();
        self
    }

    /// Set the Bazel executable for generated commands
    #[must_use]
    pub fn with_bazel(mut self, bazel: impl Into<String>) -> Self {
        self.bazel = bazel.into();
        self
    }

    /// Set the inline threshold in bytes
    #[must_use]
    pub const fn with_inline_threshold(mut self, bytes: usize) -> Self {
        self.inline_threshold = bytes;
        self
    }

    /// Set the target file directory
    #[must_use]
    pub fn with_artifact_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.artifact_dir = Some(dir.into());
        self
    }

    /// Worker count actually used for `tasks` tasks
    #[must_use]
    pub fn effective_workers(&self, tasks: usize) -> usize {
        if self.max_workers == 0 {
            tasks.max(1)
        } else {
            self.max_workers
        }
    }

    /// Target file directory actually used
    #[must_use]
    pub fn effective_artifact_dir(&self) -> PathBuf {
        self.artifact_dir.clone().unwrap_or_else(std::env::temp_dir)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_default() {
        let config = OrchestratorConfig::default();
        assert!(!config.dry_run);
        assert_eq!(config.max_workers, 10);
        assert_eq!(config.manual_tag, "manual");
        assert_eq!(config.bazel, "bazel");
        assert_eq!(config.inline_threshold, 0);
        assert!(config.artifact_dir.is_none());
    }

    #[test]
    fn test_config_builder() {
        let config = OrchestratorConfig::new()
            .with_dry_run(true)
            .with_max_workers(3)
            .with_manual_tag("local")
            .with_bazel("bazelisk")
            .with_inline_threshold(512)
            .with_artifact_dir("/tmp/targets");

        assert!(config.dry_run);
        assert_eq!(config.max_workers, 3);
        assert_eq!(config.manual_tag, "local");
        assert_eq!(config.bazel, "bazelisk");
        assert_eq!(config.inline_threshold, 512);
        assert_eq!(config.effective_artifact_dir(), PathBuf::from("/tmp/targets"));
    }

    #[test]
    fn test_effective_workers() {
        let config = OrchestratorConfig::new().with_max_workers(0);
        assert_eq!(config.effective_workers(7), 7);
        assert_eq!(config.effective_workers(0), 1);

        let config = OrchestratorConfig::new().with_max_workers(4);
        assert_eq!(config.effective_workers(100), 4);
    }
}
