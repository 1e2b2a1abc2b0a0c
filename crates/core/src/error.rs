//! Error types for buildprint operations

use crate::blueprint::CommandKind;
use miette::Diagnostic;
use std::path::PathBuf;
use thiserror::Error;

/// Main error type for buildprint operations
#[derive(Error, Debug, Diagnostic)]
pub enum Error {
    #[error("Configuration error: {0}")]
    #[diagnostic(code(buildprint::config))]
    Configuration(String),

    #[error("Failed to parse blueprint")]
    #[diagnostic(
        code(buildprint::blueprint::parse),
        help("A blueprint is a YAML document with a top-level `tasks` list")
    )]
    Blueprint {
        #[source]
        source: serde_yaml::Error,
    },

    #[error("Unknown task: none of test_matrix, build_matrix or run_matrix is set (keys: {})", .keys.join(", "))]
    #[diagnostic(
        code(buildprint::task::unknown),
        help("Each task needs exactly one of `test_matrix`, `build_matrix` or `run_matrix`")
    )]
    UnknownTask { keys: Vec<String> },

    #[error("{kind} matrix has no `{field}` list")]
    #[diagnostic(code(buildprint::task::missing_scopes))]
    MissingScopes {
        kind: CommandKind,
        field: &'static str,
    },

    #[error("Query failed for `{expression}`: {message}")]
    #[diagnostic(code(buildprint::query::failed))]
    QueryResolution { expression: String, message: String },

    #[error("`{command}` failed: {message}")]
    #[diagnostic(code(buildprint::tool::failed))]
    Tool { command: String, message: String },

    #[error("Failed to upload artifact {}: {message}", .path.display())]
    #[diagnostic(code(buildprint::artifact::upload))]
    ArtifactUpload { path: PathBuf, message: String },

    #[error("Failed to submit steps to {platform}: {message}")]
    #[diagnostic(code(buildprint::platform::submit))]
    Submission { platform: String, message: String },

    #[error("Unsupported platform '{name}' (supported: {})", .supported.join(", "))]
    #[diagnostic(code(buildprint::platform::unsupported))]
    UnsupportedPlatform {
        name: String,
        supported: Vec<String>,
    },

    #[error("Worker for task #{task} panicked: {message}")]
    #[diagnostic(code(buildprint::worker::panicked))]
    WorkerPanicked { task: usize, message: String },

    #[error("No result was collected for task #{task}")]
    #[diagnostic(code(buildprint::worker::missing))]
    MissingResult { task: usize },

    #[error("IO error: {0}")]
    #[diagnostic(code(buildprint::io))]
    Io(#[from] std::io::Error),
}

impl Error {
    pub fn configuration(msg: impl Into<String>) -> Self {
        Self::Configuration(msg.into())
    }

    pub fn query_resolution(expression: impl Into<String>, message: impl Into<String>) -> Self {
        Self::QueryResolution {
            expression: expression.into(),
            message: message.into(),
        }
    }

    pub fn tool(command: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Tool {
            command: command.into(),
            message: message.into(),
        }
    }

    pub fn artifact_upload(path: impl Into<PathBuf>, message: impl Into<String>) -> Self {
        Self::ArtifactUpload {
            path: path.into(),
            message: message.into(),
        }
    }

    pub fn submission(platform: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Submission {
            platform: platform.into(),
            message: message.into(),
        }
    }
}

impl From<serde_yaml::Error> for Error {
    fn from(source: serde_yaml::Error) -> Self {
        Self::Blueprint { source }
    }
}

/// Result type alias for buildprint operations
pub type Result<T> = std::result::Result<T, Error>;
