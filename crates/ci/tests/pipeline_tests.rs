//! End-to-end tests: blueprint text in, submitted steps out.

use async_trait::async_trait;
use buildprint_ci::{
    ArtifactStore, CiPlatform, OrchestratorConfig, PipelineOrchestrator, QueryTool,
    StepDescriptor, TaskOutcome,
};
use buildprint_core::{Blueprint, Label, Result};
use std::path::Path;
use std::sync::{Arc, Mutex};

/// Records every query and answers with one label per query
#[derive(Default)]
struct EchoTool {
    queries: Mutex<Vec<String>>,
}

#[async_trait]
impl QueryTool for EchoTool {
    async fn query(&self, expression: &str) -> Result<Vec<Label>> {
        let mut queries = self.queries.lock().unwrap();
        queries.push(expression.to_string());
        Ok(vec![Label::new(format!("//q{}:t", queries.len()))])
    }
}

struct LocalStore;

#[async_trait]
impl ArtifactStore for LocalStore {
    fn reference(&self, path: &Path) -> String {
        path.display().to_string()
    }

    async fn upload(&self, path: &Path) -> Result<String> {
        Ok(self.reference(path))
    }

    fn download_command(&self, reference: &str) -> String {
        format!("cp {reference} .")
    }
}

struct CollectingPlatform {
    store: LocalStore,
    submitted: Mutex<Vec<Vec<StepDescriptor>>>,
}

#[async_trait]
impl CiPlatform for CollectingPlatform {
    fn name(&self) -> &'static str {
        "collect"
    }

    fn artifacts(&self) -> &dyn ArtifactStore {
        &self.store
    }

    async fn submit(&self, steps: &[StepDescriptor], _dry_run: bool) -> Result<()> {
        self.submitted.lock().unwrap().push(steps.to_vec());
        Ok(())
    }
}

fn platform() -> Arc<CollectingPlatform> {
    Arc::new(CollectingPlatform {
        store: LocalStore,
        submitted: Mutex::new(Vec::new()),
    })
}

#[tokio::test]
async fn test_explicit_manual_scope_query() {
    let blueprint: Blueprint = r#"
tasks:
  - test_matrix:
      universes: ["//foo/..."]
      tag_filters: ["manual"]
"#
    .parse()
    .unwrap();

    let tool = Arc::new(EchoTool::default());
    let platform = platform();
    let config = OrchestratorConfig::new().with_inline_threshold(1024);

    let report = PipelineOrchestrator::new(config, platform.clone(), tool.clone())
        .run(blueprint.tasks)
        .await
        .unwrap();

    assert_eq!(
        *tool.queries.lock().unwrap(),
        vec![r"//foo/... intersect attr(tags, '\b(manual)\b', //foo/...)"]
    );
    assert_eq!(report.tasks[0].outcome, TaskOutcome::Submitted { steps: 1 });
    assert_eq!(
        platform.submitted.lock().unwrap()[0][0].commands,
        vec!["bazel test //q1:t"]
    );
}

#[tokio::test]
async fn test_matrix_task_submits_once_with_scope_major_steps() {
    let blueprint: Blueprint = r#"
tasks:
  - bazel_build_matrix:
      universes: ["//a/...", "//b/..."]
      configs: ["opt", "dbg"]
      options: ["--keep_going"]
      tag_filters: ["-slow"]
      adjustments:
        - config: dbg
          tag_filters: ["-no-dbg"]
"#
    .parse()
    .unwrap();

    let tool = Arc::new(EchoTool::default());
    let platform = platform();
    let config = OrchestratorConfig::new().with_inline_threshold(1024);

    PipelineOrchestrator::new(config, platform.clone(), tool.clone())
        .run(blueprint.tasks)
        .await
        .unwrap();

    let queries = tool.queries.lock().unwrap().clone();
    assert_eq!(
        queries,
        vec![
            r"//a/... except attr(tags, '\b(slow|manual)\b', //a/...)",
            r"//a/... except attr(tags, '\b(slow|manual|no-dbg)\b', //a/...)",
            r"//b/... except attr(tags, '\b(slow|manual)\b', //b/...)",
            r"//b/... except attr(tags, '\b(slow|manual|no-dbg)\b', //b/...)",
        ]
    );

    let submitted = platform.submitted.lock().unwrap();
    assert_eq!(submitted.len(), 1);
    let commands: Vec<&str> = submitted[0]
        .iter()
        .map(|s| s.commands[0].as_str())
        .collect();
    assert_eq!(
        commands,
        vec![
            "bazel build --keep_going --config=opt //q1:t",
            "bazel build --keep_going --config=dbg //q2:t",
            "bazel build --keep_going --config=opt //q3:t",
            "bazel build --keep_going --config=dbg //q4:t",
        ]
    );
}
