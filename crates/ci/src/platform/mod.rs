//! CI Platform Trait
//!
//! A platform is where compiled steps end up: it owns the artifact store
//! that target files are shipped through and the ingestion endpoint that
//! receives step descriptors. Implementations live in their own crates
//! (e.g. `buildprint-buildkite`).
//!
//! ## Platform Registry
//!
//! The [`PlatformRegistry`] maps platform names (the `--platform` flag
//! values) to implementations so the orchestrator never matches on a
//! concrete platform.

mod registry;

pub use registry::PlatformRegistry;

use crate::artifact::ArtifactStore;
use crate::translate::StepDescriptor;
use async_trait::async_trait;
use buildprint_core::Result;

/// A CI platform that accepts compiled steps
#[async_trait]
pub trait CiPlatform: Send + Sync {
    /// Platform name (CLI flag value)
    fn name(&self) -> &'static str;

    /// Human-readable description
    fn description(&self) -> &'static str {
        ""
    }

    /// Artifact store used for externalized target lists
    fn artifacts(&self) -> &dyn ArtifactStore;

    /// Submit `steps` as one pipeline unit, in order.
    ///
    /// In dry-run mode nothing is sent; the platform reports what it would
    /// have submitted instead.
    ///
    /// # Errors
    /// Returns [`buildprint_core::Error::Submission`] if the platform rejects
    /// the steps.
    async fn submit(&self, steps: &[StepDescriptor], dry_run: bool) -> Result<()>;
}
