//! Core types and utilities for buildprint
//!
//! This crate holds the pieces shared by every other buildprint crate:
//!
//! - [`Error`] and the [`Result`] alias used across the workspace
//! - The [`blueprint`] data model read from the blueprint document
//! - [`Label`], the opaque build-graph target identifier

pub mod blueprint;
pub mod error;
pub mod label;

pub use blueprint::{Adjustment, Blueprint, CommandKind, Matrix, Task};
pub use error::{Error, Result};
pub use label::Label;

/// Tag that opts a target out of automatic inclusion unless requested.
pub const MANUAL_TAG: &str = "manual";

/// Placeholder substituted with the scope in a `filter_query` template.
pub const UNIVERSE_PLACEHOLDER: &str = "{UNIVERSE}";

/// Default number of tasks expanded and resolved concurrently.
pub const DEFAULT_MAX_WORKERS: usize = 10;

/// Version of the buildprint crates.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
