//! Buildkite Pipeline Schema Types
//!
//! Defines the data structures for the pipeline YAML handed to
//! `buildkite-agent pipeline upload`.
//! See: <https://buildkite.com/docs/pipelines/configure/defining-steps>

use buildprint_ci::StepDescriptor;
use serde::Serialize;

/// A Buildkite pipeline definition
#[derive(Debug, Clone, Default, Serialize)]
pub struct Pipeline {
    /// Pipeline steps
    pub steps: Vec<CommandStep>,
}

impl Pipeline {
    /// Build a pipeline with one command step per descriptor, in order
    #[must_use]
    pub fn from_steps(steps: &[StepDescriptor]) -> Self {
        Self {
            steps: steps.iter().map(CommandStep::from).collect(),
        }
    }

    /// Render the pipeline as YAML
    ///
    /// # Errors
    /// Returns the serializer's error if the pipeline cannot be rendered.
    pub fn to_yaml(&self) -> Result<String, serde_yaml::Error> {
        serde_yaml::to_string(self)
    }
}

/// A command step that executes commands
#[derive(Debug, Clone, Serialize)]
pub struct CommandStep {
    /// Commands to execute (can be single string or array)
    pub command: CommandValue,
}

impl From<&StepDescriptor> for CommandStep {
    fn from(step: &StepDescriptor) -> Self {
        let command = match step.commands.as_slice() {
            [single] => CommandValue::Single(single.clone()),
            commands => CommandValue::Array(commands.to_vec()),
        };
        Self { command }
    }
}

/// Command value can be a single string or an array
#[derive(Debug, Clone, Serialize)]
#[serde(untagged)]
pub enum CommandValue {
    /// Single command string
    Single(String),
    /// Array of commands
    Array(Vec<String>),
}
