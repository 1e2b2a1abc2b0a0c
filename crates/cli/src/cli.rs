use crate::logging::LogLevel;
use buildprint_buildkite::BuildkitePlatform;
use buildprint_ci::{OrchestratorConfig, PlatformRegistry};
use buildprint_core::DEFAULT_MAX_WORKERS;
use clap::Parser;
use clap::builder::{PossibleValue, PossibleValuesParser};
use std::path::PathBuf;

/// Every platform steps can be submitted to
pub fn platforms() -> PlatformRegistry {
    let mut registry = PlatformRegistry::new();
    registry.register(BuildkitePlatform::new());
    registry
}

fn platform_names() -> PossibleValuesParser {
    let registry = platforms();
    let values: Vec<PossibleValue> = registry
        .platforms()
        .map(|p| PossibleValue::new(p.name()).help(p.description()))
        .collect();
    PossibleValuesParser::new(values)
}

#[derive(Parser, Debug)]
#[command(name = "buildprint")]
#[command(about = "Compile a Bazel blueprint into CI pipeline steps")]
#[command(long_about = None)]
#[command(version)]
pub struct Cli {
    #[arg(help = "Blueprint file, or - to read from stdin", value_name = "BLUEPRINT")]
    pub blueprint: String,

    #[arg(
        long,
        help = "CI platform to submit steps to",
        default_value = "buildkite",
        value_parser = platform_names()
    )]
    pub platform: String,

    #[arg(long, help = "Log uploads and print the pipeline instead of submitting it")]
    pub dry_run: bool,

    #[arg(
        short = 'j',
        long,
        help = "Number of tasks resolved concurrently (0 = all at once)",
        env = "BUILDPRINT_JOBS",
        default_value_t = DEFAULT_MAX_WORKERS
    )]
    pub jobs: usize,

    #[arg(
        long,
        help = "Bazel executable",
        env = "BUILDPRINT_BAZEL",
        default_value = "bazel"
    )]
    pub bazel: String,

    #[arg(
        long = "bazel-startup-option",
        help = "Bazel startup option for buildprint's own bazel calls (repeatable)",
        value_name = "OPTION",
        allow_hyphen_values = true
    )]
    pub bazel_startup_options: Vec<String>,

    #[arg(
        long = "query-option",
        help = "Option passed to every bazel query (repeatable)",
        value_name = "OPTION",
        allow_hyphen_values = true
    )]
    pub query_options: Vec<String>,

    #[arg(
        long,
        help = "Inline build/test target lists up to this many bytes",
        value_name = "BYTES",
        default_value_t = 0
    )]
    pub inline_threshold: usize,

    #[arg(long, help = "Directory target files are written to", value_name = "DIR")]
    pub artifact_dir: Option<PathBuf>,

    #[arg(
        short = 'l',
        long,
        help = "Set logging level",
        env = "LOGLEVEL",
        default_value = "info",
        ignore_case = true,
        value_enum
    )]
    pub level: LogLevel,

    #[arg(long, help = "Output logs in JSON format")]
    pub json: bool,
}

impl Cli {
    /// Orchestrator settings selected on the command line
    pub fn orchestrator_config(&self) -> OrchestratorConfig {
        let config = OrchestratorConfig::new()
            .with_dry_run(self.dry_run)
            .with_max_workers(self.jobs)
            .with_bazel(self.bazel.clone())
            .with_inline_threshold(self.inline_threshold);

        match &self.artifact_dir {
            Some(dir) => config.with_artifact_dir(dir),
            None => config,
        }
    }
}

pub fn parse() -> Cli {
    Cli::parse()
}
