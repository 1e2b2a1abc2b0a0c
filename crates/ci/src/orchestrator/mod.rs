//! Pipeline orchestration
//!
//! Runs matrix expansion and target resolution for every blueprint task on a
//! bounded worker pool, then translates and submits the results one task at a
//! time in blueprint order.
//!
//! ## Phases
//!
//! ```text
//! Idle -> Dispatching -> Collecting -> Submitting -> Done
//!                             \
//!                              -> Failed
//! ```
//!
//! Query latency varies wildly between tasks, so workers finish out of order.
//! Each spawned worker is tied to its task index and results land in a slot
//! per index; submission walks the slots in order.

mod config;

pub use config::OrchestratorConfig;

use crate::filters::TagFilterParser;
use crate::matrix::MatrixExpander;
use crate::platform::CiPlatform;
use crate::report::{RunReport, TaskOutcome, TaskReport};
use crate::resolve::{QueryTool, ResolvedTask, TargetResolver};
use crate::translate::StepTranslator;
use buildprint_core::{Error, Result, Task};
use serde::Serialize;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Instant;
use tokio::sync::Semaphore;
use tokio::task::{Id, JoinSet};
use tracing::{Instrument, debug, error, info, info_span, warn};

/// Orchestrator lifecycle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Phase {
    /// Not started
    Idle,
    /// Spawning expansion and resolution workers
    Dispatching,
    /// Waiting for workers
    Collecting,
    /// Translating and submitting in blueprint order
    Submitting,
    /// Every task has an outcome
    Done,
    /// A result slot was left unfilled
    Failed,
}

type TaskResult = Result<Vec<ResolvedTask>>;

/// Drives a blueprint from tasks to submitted CI steps
pub struct PipelineOrchestrator {
    config: OrchestratorConfig,
    platform: Arc<dyn CiPlatform>,
    expander: MatrixExpander,
    resolver: TargetResolver,
    translator: StepTranslator,
    phase: Phase,
}

impl PipelineOrchestrator {
    /// Create an orchestrator submitting to `platform` and resolving through `tool`
    #[must_use]
    pub fn new(
        config: OrchestratorConfig,
        platform: Arc<dyn CiPlatform>,
        tool: Arc<dyn QueryTool>,
    ) -> Self {
        let expander = MatrixExpander::new(TagFilterParser::new(config.manual_tag.clone()));
        let translator = StepTranslator::new()
            .with_bazel(config.bazel.clone())
            .with_dry_run(config.dry_run)
            .with_inline_threshold(config.inline_threshold)
            .with_artifact_dir(config.effective_artifact_dir());

        Self {
            config,
            platform,
            expander,
            resolver: TargetResolver::new(tool),
            translator,
            phase: Phase::Idle,
        }
    }

    /// Current lifecycle phase
    #[must_use]
    pub const fn phase(&self) -> Phase {
        self.phase
    }

    /// Configuration this orchestrator was built with
    #[must_use]
    pub const fn config(&self) -> &OrchestratorConfig {
        &self.config
    }

    /// Expand, resolve and submit every task.
    ///
    /// Task-level failures are recorded in the report and never stop the
    /// run; sibling tasks are still submitted.
    ///
    /// # Errors
    /// Returns [`Error::MissingResult`] if a worker's result could not be
    /// matched to its task. The orchestrator is then in [`Phase::Failed`].
    #[tracing::instrument(
        name = "orchestrator_run",
        skip(self, tasks),
        fields(
            platform = self.platform.name(),
            tasks = tasks.len(),
            dry_run = self.config.dry_run
        )
    )]
    pub async fn run(&mut self, tasks: Vec<Task>) -> Result<RunReport> {
        let start = Instant::now();
        let count = tasks.len();

        self.phase = Phase::Dispatching;
        let workers = self.config.effective_workers(count);
        info!(workers, "Dispatching matrix generation");
        let (join_set, ids) = self.dispatch(tasks, workers);

        self.phase = Phase::Collecting;
        let slots = match collect(join_set, &ids, count).await {
            Ok(slots) => slots,
            Err(e) => {
                self.phase = Phase::Failed;
                error!(error = %e, "Matrix generation left a task without a result");
                return Err(e);
            }
        };

        self.phase = Phase::Submitting;
        let mut reports = Vec::with_capacity(count);
        for (index, slot) in slots.into_iter().enumerate() {
            let outcome = match slot {
                Ok(resolved) => self.submit_task(index, &resolved).await,
                Err(e) => Err(e),
            };

            let outcome = match outcome {
                Ok(0) => TaskOutcome::Empty,
                Ok(steps) => TaskOutcome::Submitted { steps },
                Err(e) => {
                    error!(task = index, error = %e, "Task failed");
                    TaskOutcome::Failed {
                        error: e.to_string(),
                    }
                }
            };
            reports.push(TaskReport { index, outcome });
        }

        self.phase = Phase::Done;
        let report = RunReport {
            version: buildprint_core::VERSION.to_string(),
            dry_run: self.config.dry_run,
            duration_ms: u64::try_from(start.elapsed().as_millis()).unwrap_or(u64::MAX),
            tasks: reports,
        };
        info!(
            submitted = report.submitted(),
            failed = report.failed(),
            duration_ms = report.duration_ms,
            "Run complete"
        );
        Ok(report)
    }

    fn dispatch(&self, tasks: Vec<Task>, workers: usize) -> (JoinSet<TaskResult>, HashMap<Id, usize>) {
        let semaphore = Arc::new(Semaphore::new(workers));
        let mut join_set = JoinSet::new();
        let mut ids = HashMap::with_capacity(tasks.len());

        for (index, task) in tasks.into_iter().enumerate() {
            let semaphore = Arc::clone(&semaphore);
            let expander = self.expander.clone();
            let resolver = self.resolver.clone();

            let handle = join_set.spawn(
                async move {
                    let _permit = semaphore.acquire().await;
                    generate(&expander, &resolver, &task).await
                }
                .instrument(info_span!("task", index)),
            );
            ids.insert(handle.id(), index);
        }

        (join_set, ids)
    }

    async fn submit_task(&self, index: usize, resolved: &[ResolvedTask]) -> Result<usize> {
        let artifacts = self.platform.artifacts();
        let mut steps = Vec::with_capacity(resolved.len());
        for task in resolved {
            if let Some(step) = self.translator.translate(task, artifacts).await? {
                steps.push(step);
            }
        }

        if steps.is_empty() {
            info!(task = index, "No targets matched, nothing to submit");
            return Ok(0);
        }

        debug!(task = index, steps = steps.len(), "Submitting steps");
        self.platform.submit(&steps, self.config.dry_run).await?;
        info!(
            task = index,
            steps = steps.len(),
            platform = self.platform.name(),
            "Submitted steps"
        );
        Ok(steps.len())
    }
}

async fn generate(
    expander: &MatrixExpander,
    resolver: &TargetResolver,
    task: &Task,
) -> TaskResult {
    let units = expander.expand(task)?;
    debug!(units = units.len(), "Expanded task");
    resolver.resolve_all(units).await
}

async fn collect(
    mut join_set: JoinSet<TaskResult>,
    ids: &HashMap<Id, usize>,
    count: usize,
) -> Result<Vec<TaskResult>> {
    let mut slots: Vec<Option<TaskResult>> = (0..count).map(|_| None).collect();

    while let Some(joined) = join_set.join_next_with_id().await {
        let (id, result) = match joined {
            Ok((id, result)) => (id, result),
            Err(e) => {
                let id = e.id();
                let Some(&index) = ids.get(&id) else {
                    warn!(error = %e, "Worker failed with an unknown id");
                    continue;
                };
                (
                    id,
                    Err(Error::WorkerPanicked {
                        task: index,
                        message: e.to_string(),
                    }),
                )
            }
        };

        match ids.get(&id) {
            Some(&index) => slots[index] = Some(result),
            None => warn!("Worker finished with an unknown id"),
        }
    }

    slots
        .into_iter()
        .enumerate()
        .map(|(task, slot)| slot.ok_or(Error::MissingResult { task }))
        .collect()
}
