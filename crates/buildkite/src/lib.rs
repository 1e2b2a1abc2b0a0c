//! Buildkite platform for buildprint
//!
//! Compiled steps reach Buildkite through the agent CLI:
//!
//! | Concern | Agent command |
//! |---------|---------------|
//! | target file upload | `buildkite-agent artifact upload <path>` |
//! | target file download (in the step) | `buildkite-agent artifact download <ref> .` |
//! | step submission | `buildkite-agent pipeline upload` (YAML on stdin) |
//!
//! # Example
//!
//! ```ignore
//! use buildprint_buildkite::BuildkitePlatform;
//! use buildprint_ci::PlatformRegistry;
//!
//! let mut registry = PlatformRegistry::new();
//! registry.register(BuildkitePlatform::new());
//! ```

pub mod agent;
pub mod artifact;
pub mod platform;
pub mod schema;

pub use agent::AgentCli;
pub use artifact::BuildkiteArtifactStore;
pub use platform::{BuildkitePlatform, PLATFORM_NAME};
