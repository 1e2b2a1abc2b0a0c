//! Bazel integration for buildprint
//!
//! [`BazelClient`] shells out to the Bazel executable and implements
//! [`buildprint_ci::QueryTool`], so the orchestrator can resolve matrix
//! cells against a real build graph.

mod client;
mod info;

pub use client::{BazelClient, DEFAULT_BAZEL, WORKSPACE_ENV};
pub use info::InfoKey;
