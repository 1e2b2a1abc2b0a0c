//! Run reporting
//!
//! A [`RunReport`] records what happened to every blueprint task, in
//! blueprint order, so the caller can decide the exit status and optionally
//! emit a machine-readable summary.

use serde::Serialize;

/// What happened to one task
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case", tag = "status")]
pub enum TaskOutcome {
    /// Steps were handed to the platform
    Submitted {
        /// Number of step descriptors submitted
        steps: usize,
    },
    /// Every expansion unit resolved to zero targets
    Empty,
    /// The task failed during expansion, resolution or submission
    Failed {
        /// Rendered error message
        error: String,
    },
}

/// Report for a single task
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TaskReport {
    /// Position of the task in the blueprint
    pub index: usize,
    /// Final outcome
    #[serde(flatten)]
    pub outcome: TaskOutcome,
}

/// Report for a whole orchestrator run.
#[derive(Debug, Clone, Default, Serialize)]
pub struct RunReport {
    /// Report format version.
    pub version: String,
    /// Whether this was a dry run.
    pub dry_run: bool,
    /// Total duration in milliseconds.
    pub duration_ms: u64,
    /// Per-task reports in blueprint order.
    pub tasks: Vec<TaskReport>,
}

impl RunReport {
    /// Whether any task failed.
    #[must_use]
    pub fn any_failed(&self) -> bool {
        self.tasks
            .iter()
            .any(|t| matches!(t.outcome, TaskOutcome::Failed { .. }))
    }

    /// Number of tasks that submitted steps.
    #[must_use]
    pub fn submitted(&self) -> usize {
        self.tasks
            .iter()
            .filter(|t| matches!(t.outcome, TaskOutcome::Submitted { .. }))
            .count()
    }

    /// Number of tasks that failed.
    #[must_use]
    pub fn failed(&self) -> usize {
        self.tasks
            .iter()
            .filter(|t| matches!(t.outcome, TaskOutcome::Failed { .. }))
            .count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn report(outcomes: Vec<TaskOutcome>) -> RunReport {
        RunReport {
            tasks: outcomes
                .into_iter()
                .enumerate()
                .map(|(index, outcome)| TaskReport { index, outcome })
                .collect(),
            ..Default::default()
        }
    }

    #[test]
    fn test_any_failed() {
        let ok = report(vec![TaskOutcome::Submitted { steps: 2 }, TaskOutcome::Empty]);
        assert!(!ok.any_failed());
        assert_eq!(ok.submitted(), 1);

        let bad = report(vec![
            TaskOutcome::Empty,
            TaskOutcome::Failed {
                error: "boom".to_string(),
            },
        ]);
        assert!(bad.any_failed());
        assert_eq!(bad.failed(), 1);
    }

    #[test]
    fn test_empty_report_has_no_failures() {
        assert!(!RunReport::default().any_failed());
    }
}
