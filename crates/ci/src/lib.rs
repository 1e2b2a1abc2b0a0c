//! Blueprint compilation for buildprint
//!
//! Turns blueprint tasks into CI steps:
//!
//! 1. [`filters`] classifies raw tag filters into include/exclude sets.
//! 2. [`query`] renders a Bazel query expression for a scope.
//! 3. [`matrix`] expands a task into one unit per scope and configuration.
//! 4. [`resolve`] runs each unit's query through a [`resolve::QueryTool`].
//! 5. [`translate`] renders resolved units into step commands.
//! 6. [`orchestrator`] runs the above for a whole blueprint and submits the
//!    results to a [`platform::CiPlatform`].

pub mod artifact;
pub mod filters;
pub mod matrix;
pub mod orchestrator;
pub mod platform;
pub mod query;
pub mod report;
pub mod resolve;
pub mod translate;

pub use artifact::ArtifactStore;
pub use filters::{TagFilterParser, TagFilterSet};
pub use matrix::{ExpansionUnit, MatrixExpander};
pub use orchestrator::{OrchestratorConfig, Phase, PipelineOrchestrator};
pub use platform::{CiPlatform, PlatformRegistry};
pub use query::build_query_expression;
pub use report::{RunReport, TaskOutcome, TaskReport};
pub use resolve::{QueryTool, ResolvedTask, TargetResolver};
pub use translate::{StepDescriptor, StepTranslator};
