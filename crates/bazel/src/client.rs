//! Subprocess-backed Bazel client

use crate::info::InfoKey;
use async_trait::async_trait;
use buildprint_ci::QueryTool;
use buildprint_core::{Error, Label, Result};
use std::path::{Path, PathBuf};
use std::process::Stdio;
use tokio::process::Command;
use tracing::{debug, info};

/// Environment variable `bazel run` sets to the workspace root
pub const WORKSPACE_ENV: &str = "BUILD_WORKSPACE_DIRECTORY";

/// Default Bazel executable
pub const DEFAULT_BAZEL: &str = "bazel";

/// Runs `bazel query` and `bazel info` in a workspace
#[derive(Debug, Clone)]
pub struct BazelClient {
    bazel: String,
    startup_options: Vec<String>,
    query_options: Vec<String>,
    workspace: PathBuf,
}

impl BazelClient {
    /// Create a client rooted at `workspace`
    #[must_use]
    pub fn new(workspace: impl Into<PathBuf>) -> Self {
        Self {
            bazel: DEFAULT_BAZEL.to_string(),
            startup_options: Vec::new(),
            query_options: Vec::new(),
            workspace: workspace.into(),
        }
    }

    /// Locate the workspace and create a client for it.
    ///
    /// Uses `BUILD_WORKSPACE_DIRECTORY` when set, otherwise asks
    /// `bazel info workspace` from the current directory.
    ///
    /// `startup_options` apply to the discovery call as well as to every
    /// later invocation.
    ///
    /// # Errors
    /// Returns an error if `bazel info` fails or reports no workspace.
    pub async fn discover(bazel: impl Into<String>, startup_options: Vec<String>) -> Result<Self> {
        let bazel = bazel.into();
        if let Some(workspace) = workspace_from_env() {
            debug!(workspace = %workspace.display(), "Using workspace from {WORKSPACE_ENV}");
            return Ok(Self::new(workspace)
                .with_bazel(bazel)
                .with_startup_options(startup_options));
        }

        let cwd = std::env::current_dir()?;
        let locator = Self::new(cwd)
            .with_bazel(bazel)
            .with_startup_options(startup_options);
        let workspace = locator.info(Some(InfoKey::Workspace), &[]).await?;
        if workspace.is_empty() {
            return Err(Error::configuration("Unable to infer the Bazel workspace"));
        }

        info!(workspace = %workspace, "Discovered Bazel workspace");
        Ok(Self {
            workspace: PathBuf::from(workspace),
            ..locator
        })
    }

    /// Bazel executable to run
    #[must_use]
    pub fn with_bazel(mut self, bazel: impl Into<String>) -> Self {
        self.bazel = bazel.into();
        self
    }

    /// Options placed before the Bazel command
    #[must_use]
    pub fn with_startup_options(mut self, options: Vec<String>) -> Self {
        self.startup_options = options;
        self
    }

    /// Options placed after `query`
    #[must_use]
    pub fn with_query_options(mut self, options: Vec<String>) -> Self {
        self.query_options = options;
        self
    }

    /// Workspace root commands run in
    #[must_use]
    pub fn workspace(&self) -> &Path {
        &self.workspace
    }

    /// Run `bazel info [key] [configuration options]` and return its trimmed output
    ///
    /// # Errors
    /// Returns [`Error::Tool`] if Bazel cannot be started or exits non-zero.
    pub async fn info(&self, key: Option<InfoKey>, configuration_options: &[String]) -> Result<String> {
        let mut args = vec!["info".to_string()];
        args.extend(key.map(|k| k.as_str().to_string()));
        args.extend(configuration_options.iter().cloned());

        let stdout = self
            .run(&args)
            .await
            .map_err(|message| Error::tool(self.describe(&args), message))?;
        Ok(stdout.trim_end().to_string())
    }

    /// Run `bazel query <expression>` and return the labels it prints
    ///
    /// # Errors
    /// Returns [`Error::QueryResolution`] if Bazel cannot be started or exits
    /// non-zero.
    pub async fn run_query(&self, expression: &str) -> Result<Vec<Label>> {
        let mut args = vec!["query".to_string()];
        args.extend(self.query_options.iter().cloned());
        args.push(expression.to_string());

        let stdout = self
            .run(&args)
            .await
            .map_err(|message| Error::query_resolution(expression, message))?;
        Ok(parse_labels(&stdout))
    }

    async fn run(&self, args: &[String]) -> std::result::Result<String, String> {
        debug!(command = %self.describe(args), cwd = %self.workspace.display(), "Running bazel");

        let output = Command::new(&self.bazel)
            .args(&self.startup_options)
            .args(args)
            .current_dir(&self.workspace)
            .stdin(Stdio::null())
            .output()
            .await
            .map_err(|e| format!("Failed to execute {}: {e}", self.bazel))?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(format!("{}: {}", output.status, stderr.trim()));
        }

        Ok(String::from_utf8_lossy(&output.stdout).into_owned())
    }

    fn describe(&self, args: &[String]) -> String {
        std::iter::once(self.bazel.as_str())
            .chain(self.startup_options.iter().map(String::as_str))
            .chain(args.iter().map(String::as_str))
            .collect::<Vec<_>>()
            .join(" ")
    }
}

#[async_trait]
impl QueryTool for BazelClient {
    async fn query(&self, expression: &str) -> Result<Vec<Label>> {
        self.run_query(expression).await
    }
}

fn workspace_from_env() -> Option<PathBuf> {
    std::env::var_os(WORKSPACE_ENV)
        .filter(|v| !v.is_empty())
        .map(PathBuf::from)
}

fn parse_labels(stdout: &str) -> Vec<Label> {
    stdout
        .lines()
        .map(str::trim_end)
        .filter(|line| !line.is_empty())
        .map(Label::from)
        .collect()
}
