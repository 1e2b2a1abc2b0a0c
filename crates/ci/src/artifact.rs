//! Artifact store boundary
//!
//! Target lists for `build` and `test` steps are written to a file and
//! shipped through the CI platform's artifact store; the generated step
//! downloads the file again before invoking Bazel.

use async_trait::async_trait;
use buildprint_core::Result;
use std::path::Path;

/// Storage for files that generated steps fetch at CI time
#[async_trait]
pub trait ArtifactStore: Send + Sync {
    /// Reference under which `path` is (or would be) stored
    fn reference(&self, path: &Path) -> String;

    /// Upload `path` and return its reference
    ///
    /// # Errors
    /// Returns [`buildprint_core::Error::ArtifactUpload`] if the upload fails.
    async fn upload(&self, path: &Path) -> Result<String>;

    /// Shell command that fetches `reference` into the step's working directory
    fn download_command(&self, reference: &str) -> String;
}
