//! buildprint: compile a Bazel blueprint into CI pipeline steps.

mod cli;
mod logging;

use crate::cli::{Cli, parse, platforms};
use crate::logging::{TracingConfig, TracingFormat, correlation_id};
use buildprint_bazel::BazelClient;
use buildprint_ci::{PipelineOrchestrator, RunReport};
use buildprint_core::{Blueprint, Error};
use std::fs::File;
use std::io::BufReader;
use std::sync::Arc;
use tracing::{info, instrument};

#[tokio::main]
#[allow(clippy::print_stderr)]
async fn main() {
    if let Err(error) = run().await {
        eprintln!("{error:?}");
        std::process::exit(1);
    }
}

async fn run() -> miette::Result<()> {
    let cli = parse();

    let tracing_config = TracingConfig {
        format: if cli.json {
            TracingFormat::Json
        } else {
            TracingFormat::Compact
        },
        level: cli.level.into(),
        ..Default::default()
    };
    crate::logging::init_tracing(&tracing_config)?;

    let report = compile(&cli).await?;

    if cli.json {
        let rendered = serde_json::to_string(&report)
            .map_err(|e| miette::miette!("Failed to serialize run report: {e}"))?;
        info!(report = %rendered, "Run report");
    }

    if report.any_failed() {
        return Err(miette::miette!(
            "{} of {} tasks failed",
            report.failed(),
            report.tasks.len()
        ));
    }
    Ok(())
}

#[instrument(name = "buildprint", skip_all, fields(correlation_id = %correlation_id()))]
async fn compile(cli: &Cli) -> miette::Result<RunReport> {
    let blueprint = load_blueprint(&cli.blueprint)?;
    info!(tasks = blueprint.tasks.len(), "Loaded blueprint");

    let registry = platforms();
    let platform = registry.resolve(&cli.platform)?;

    let bazel = BazelClient::discover(cli.bazel.clone(), cli.bazel_startup_options.clone())
        .await?
        .with_query_options(cli.query_options.clone());

    let mut orchestrator =
        PipelineOrchestrator::new(cli.orchestrator_config(), platform, Arc::new(bazel));
    Ok(orchestrator.run(blueprint.tasks).await?)
}

fn load_blueprint(source: &str) -> Result<Blueprint, Error> {
    if source == "-" {
        return Blueprint::from_reader(std::io::stdin().lock());
    }

    let file = File::open(source)
        .map_err(|e| Error::configuration(format!("Failed to open blueprint {source}: {e}")))?;
    Blueprint::from_reader(BufReader::new(file))
}
