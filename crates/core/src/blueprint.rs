//! Blueprint data model
//!
//! A blueprint is a YAML document with a top-level `tasks` list. Each task
//! carries one matrix (`test_matrix`, `build_matrix` or `run_matrix`) that
//! describes which scopes to query, under which configurations, and with
//! which tag filters.
//!
//! ```yaml
//! tasks:
//!   - test_matrix:
//!       universes: ["//foo/...", "//bar/..."]
//!       configs: ["linux", "asan"]
//!       options: ["--keep_going"]
//!       tag_filters: ["-flaky"]
//!       adjustments:
//!         - config: asan
//!           tag_filters: ["-no-asan"]
//!   - run_matrix:
//!       commands: ["//tools:deploy"]
//! ```
//!
//! Only the fields consumed by the compiler are modelled; everything else
//! is kept in [`Task::extra`] for diagnostics.

use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::io::Read;
use std::str::FromStr;

/// The Bazel subcommand a matrix expands to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CommandKind {
    /// `bazel test`
    Test,
    /// `bazel build`
    Build,
    /// `bazel run`
    Run,
}

impl CommandKind {
    /// Subcommand name as passed to Bazel
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Test => "test",
            Self::Build => "build",
            Self::Run => "run",
        }
    }

    /// Name of the matrix field listing the scopes for this kind
    #[must_use]
    pub const fn scope_field(self) -> &'static str {
        match self {
            Self::Run => "commands",
            Self::Test | Self::Build => "universes",
        }
    }
}

impl fmt::Display for CommandKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Root blueprint document
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct Blueprint {
    /// Tasks in declaration order
    #[serde(default)]
    pub tasks: Vec<Task>,
}

impl Blueprint {
    /// Parse a blueprint from a reader (file or stdin)
    ///
    /// # Errors
    /// Returns [`Error::Blueprint`] if the document is not a valid blueprint.
    pub fn from_reader(reader: impl Read) -> Result<Self> {
        Ok(serde_yaml::from_reader(reader)?)
    }
}

impl FromStr for Blueprint {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Ok(serde_yaml::from_str(s)?)
    }
}

/// One blueprint entry
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct Task {
    /// `bazel test` matrix
    #[serde(default, alias = "bazel_test_matrix")]
    pub test_matrix: Option<Matrix>,

    /// `bazel build` matrix
    #[serde(default, alias = "bazel_build_matrix")]
    pub build_matrix: Option<Matrix>,

    /// `bazel run` matrix
    #[serde(default, alias = "bazel_run_matrix")]
    pub run_matrix: Option<Matrix>,

    /// Keys not consumed by the compiler
    #[serde(flatten)]
    pub extra: BTreeMap<String, serde_yaml::Value>,
}

impl Task {
    /// The matrix this task expands, checked in test, build, run order.
    ///
    /// Additional matrices on the same task are ignored.
    #[must_use]
    pub fn matrix(&self) -> Option<(CommandKind, &Matrix)> {
        self.matrices().into_iter().next()
    }

    /// Every non-empty matrix on this task, in precedence order.
    ///
    /// A matrix key with nothing under it (`test_matrix: {}`) does not count.
    #[must_use]
    pub fn matrices(&self) -> Vec<(CommandKind, &Matrix)> {
        self.declared()
            .filter(|(_, matrix)| !matrix.is_empty())
            .collect()
    }

    fn declared(&self) -> impl Iterator<Item = (CommandKind, &Matrix)> {
        [
            (CommandKind::Test, self.test_matrix.as_ref()),
            (CommandKind::Build, self.build_matrix.as_ref()),
            (CommandKind::Run, self.run_matrix.as_ref()),
        ]
        .into_iter()
        .filter_map(|(kind, matrix)| matrix.map(|m| (kind, m)))
    }

    /// Keys present on this task, for error reporting
    #[must_use]
    pub fn keys(&self) -> Vec<String> {
        let mut keys: Vec<String> = self
            .declared()
            .map(|(kind, _)| format!("{kind}_matrix"))
            .collect();
        keys.extend(self.extra.keys().cloned());
        keys
    }
}

/// A build/test/run matrix
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct Matrix {
    /// Query scopes for `test` and `build`
    #[serde(default)]
    pub universes: Option<Vec<String>>,

    /// Run targets for `run`
    #[serde(default)]
    pub commands: Option<Vec<String>>,

    /// Configuration names, passed as `--config=<name>`
    #[serde(default)]
    pub configs: Vec<String>,

    /// Extra Bazel options
    #[serde(default)]
    pub options: Vec<String>,

    /// Raw tag filters (`tag` includes, `-tag` excludes)
    #[serde(default)]
    pub tag_filters: Vec<String>,

    /// Per-configuration tag filter additions
    #[serde(default)]
    pub adjustments: Vec<Adjustment>,

    /// Query template with a `{UNIVERSE}` placeholder
    #[serde(default)]
    pub filter_query: Option<String>,
}

impl Matrix {
    /// Whether the matrix declares nothing at all
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.universes.as_ref().is_none_or(Vec::is_empty)
            && self.commands.as_ref().is_none_or(Vec::is_empty)
            && self.configs.is_empty()
            && self.options.is_empty()
            && self.tag_filters.is_empty()
            && self.adjustments.is_empty()
            && self.filter_query().is_none()
    }

    /// Scopes for the given command kind
    ///
    /// # Errors
    /// Returns [`Error::MissingScopes`] if the kind's scope field is absent.
    pub fn scopes(&self, kind: CommandKind) -> Result<&[String]> {
        let scopes = match kind {
            CommandKind::Run => self.commands.as_deref(),
            CommandKind::Test | CommandKind::Build => self.universes.as_deref(),
        };
        scopes.ok_or(Error::MissingScopes {
            kind,
            field: kind.scope_field(),
        })
    }

    /// Configurations to expand over; a single empty configuration if none
    #[must_use]
    pub fn configs(&self) -> Vec<&str> {
        if self.configs.is_empty() {
            vec![""]
        } else {
            self.configs.iter().map(String::as_str).collect()
        }
    }

    /// Options joined into a single string
    #[must_use]
    pub fn options_string(&self) -> String {
        self.options.join(" ")
    }

    /// The filter query template, ignoring an empty string
    #[must_use]
    pub fn filter_query(&self) -> Option<&str> {
        self.filter_query.as_deref().filter(|q| !q.is_empty())
    }

    /// Adjustments targeting `config`, in declaration order
    pub fn adjustments_for<'a>(&'a self, config: &'a str) -> impl Iterator<Item = &'a Adjustment> {
        self.adjustments.iter().filter(move |a| a.config == config)
    }
}

/// Tag filters applied on top of the matrix filters for one configuration
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct Adjustment {
    /// Configuration name this adjustment applies to
    pub config: String,

    /// Raw tag filters to add
    #[serde(default)]
    pub tag_filters: Vec<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    const BLUEPRINT: &str = r#"
tasks:
  - test_matrix:
      universes: ["//foo/...", "//bar/..."]
      configs: ["linux", "asan"]
      options: ["--keep_going", "--jobs=8"]
      tag_filters: ["-flaky"]
      adjustments:
        - config: asan
          tag_filters: ["-no-asan"]
  - build_matrix:
      universes: ["//..."]
      filter_query: "kind(cc_binary, {UNIVERSE})"
  - run_matrix:
      commands: ["//tools:deploy"]
"#;

    #[test]
    fn test_parse_blueprint() {
        let blueprint: Blueprint = BLUEPRINT.parse().unwrap();
        assert_eq!(blueprint.tasks.len(), 3);

        let (kind, matrix) = blueprint.tasks[0].matrix().unwrap();
        assert_eq!(kind, CommandKind::Test);
        assert_eq!(
            matrix.scopes(kind).unwrap(),
            ["//foo/...".to_string(), "//bar/...".to_string()]
        );
        assert_eq!(matrix.configs(), vec!["linux", "asan"]);
        assert_eq!(matrix.options_string(), "--keep_going --jobs=8");
        assert_eq!(matrix.adjustments_for("asan").count(), 1);
        assert_eq!(matrix.adjustments_for("linux").count(), 0);

        let (kind, matrix) = blueprint.tasks[1].matrix().unwrap();
        assert_eq!(kind, CommandKind::Build);
        assert_eq!(matrix.filter_query(), Some("kind(cc_binary, {UNIVERSE})"));

        let (kind, matrix) = blueprint.tasks[2].matrix().unwrap();
        assert_eq!(kind, CommandKind::Run);
        assert_eq!(matrix.scopes(kind).unwrap(), ["//tools:deploy".to_string()]);
    }

    #[test]
    fn test_legacy_bazel_keys() {
        let blueprint: Blueprint = r#"
tasks:
  - bazel_build_matrix:
      universes: ["//..."]
"#
        .parse()
        .unwrap();
        let (kind, _) = blueprint.tasks[0].matrix().unwrap();
        assert_eq!(kind, CommandKind::Build);
    }

    #[test]
    fn test_configs_default_to_empty() {
        let matrix = Matrix::default();
        assert_eq!(matrix.configs(), vec![""]);
    }

    #[test]
    fn test_empty_filter_query_is_absent() {
        let matrix = Matrix {
            filter_query: Some(String::new()),
            ..Default::default()
        };
        assert_eq!(matrix.filter_query(), None);
    }

    #[test]
    fn test_missing_scopes() {
        let matrix = Matrix {
            universes: Some(vec!["//...".to_string()]),
            ..Default::default()
        };
        assert!(matrix.scopes(CommandKind::Test).is_ok());
        let err = matrix.scopes(CommandKind::Run).unwrap_err();
        assert!(matches!(
            err,
            Error::MissingScopes {
                kind: CommandKind::Run,
                field: "commands"
            }
        ));
    }

    #[test]
    fn test_first_matrix_wins() {
        let blueprint: Blueprint = r#"
tasks:
  - run_matrix:
      commands: ["//tools:deploy"]
    build_matrix:
      universes: ["//..."]
"#
        .parse()
        .unwrap();
        let task = &blueprint.tasks[0];
        assert_eq!(task.matrices().len(), 2);
        assert_eq!(task.matrix().map(|(kind, _)| kind), Some(CommandKind::Build));
    }

    #[test]
    fn test_empty_matrix_is_skipped() {
        let blueprint: Blueprint = r#"
tasks:
  - test_matrix: {}
    build_matrix:
      universes: ["//..."]
  - test_matrix: {}
"#
        .parse()
        .unwrap();

        let first = &blueprint.tasks[0];
        assert_eq!(first.matrices().len(), 1);
        assert_eq!(first.matrix().map(|(kind, _)| kind), Some(CommandKind::Build));

        let second = &blueprint.tasks[1];
        assert!(second.matrix().is_none());
        assert_eq!(second.keys(), vec!["test_matrix".to_string()]);
    }

    #[test]
    fn test_matrix_is_empty() {
        assert!(Matrix::default().is_empty());
        assert!(
            Matrix {
                universes: Some(Vec::new()),
                filter_query: Some(String::new()),
                ..Default::default()
            }
            .is_empty()
        );
        assert!(
            !Matrix {
                options: vec!["--keep_going".to_string()],
                ..Default::default()
            }
            .is_empty()
        );
    }

    #[test]
    fn test_unknown_task_keys() {
        let blueprint: Blueprint = r#"
tasks:
  - lint_matrix:
      universes: ["//..."]
    label: lint
"#
        .parse()
        .unwrap();
        let task = &blueprint.tasks[0];
        assert!(task.matrix().is_none());
        assert_eq!(task.keys(), vec!["label".to_string(), "lint_matrix".to_string()]);
    }

    #[test]
    fn test_invalid_blueprint() {
        let err = "tasks: 42".parse::<Blueprint>().unwrap_err();
        assert!(matches!(err, Error::Blueprint { .. }));
    }

    #[test]
    fn test_from_reader() {
        let blueprint = Blueprint::from_reader(BLUEPRINT.as_bytes()).unwrap();
        assert_eq!(blueprint.tasks.len(), 3);
    }
}
