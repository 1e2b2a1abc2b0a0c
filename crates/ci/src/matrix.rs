//! Matrix expansion
//!
//! Expands a blueprint task into one [`ExpansionUnit`] per
//! (scope, configuration) cell. Scopes form the outer loop and
//! configurations the inner loop, so the output is scope-major.

use crate::filters::{TagFilterParser, TagFilterSet};
use crate::query::build_query_expression;
use buildprint_core::{CommandKind, Error, Result, Task};
use serde::Serialize;
use tracing::{debug, warn};

/// One cell of a task's scope × configuration matrix
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ExpansionUnit {
    /// Bazel subcommand
    pub kind: CommandKind,
    /// Scope this cell queries
    pub scope: String,
    /// Configuration name, empty when the matrix has none
    pub config: String,
    /// Effective tag filters after adjustments
    pub filters: TagFilterSet,
    /// Expression passed to `bazel query`
    pub query: String,
    /// Options joined with spaces
    pub options: String,
    /// `--config=<name>` or empty
    pub config_flag: String,
}

/// Expands tasks into expansion units
#[derive(Debug, Clone, Default)]
pub struct MatrixExpander {
    parser: TagFilterParser,
}

impl MatrixExpander {
    /// Create an expander using `parser` for tag filters
    #[must_use]
    pub fn new(parser: TagFilterParser) -> Self {
        Self { parser }
    }

    /// Expand `task` into its matrix cells.
    ///
    /// The first non-empty matrix wins (test, build, run). Adjustments matching
    /// a cell's configuration are applied cumulatively in declaration order on
    /// top of the matrix filters.
    ///
    /// # Errors
    /// Returns [`Error::UnknownTask`] if the task declares no matrix, and
    /// [`Error::MissingScopes`] if the matrix lacks its scope list.
    pub fn expand(&self, task: &Task) -> Result<Vec<ExpansionUnit>> {
        let Some((kind, matrix)) = task.matrix() else {
            return Err(Error::UnknownTask { keys: task.keys() });
        };

        let declared = task.matrices();
        if declared.len() > 1 {
            let ignored: Vec<String> = declared[1..]
                .iter()
                .map(|(k, _)| format!("{k}_matrix"))
                .collect();
            warn!(
                used = %kind,
                ignored = ?ignored,
                "Task declares more than one matrix, only the first is expanded"
            );
        }

        let scopes = matrix.scopes(kind)?;
        let configs = matrix.configs();
        let options = matrix.options_string();
        let base = self.parser.parse(&matrix.tag_filters, None);

        let mut units = Vec::with_capacity(scopes.len() * configs.len());
        for scope in scopes {
            for config in &configs {
                let filters = matrix
                    .adjustments_for(config)
                    .fold(base.clone(), |acc, adjustment| {
                        self.parser.parse(&adjustment.tag_filters, Some(&acc))
                    });

                let query = build_query_expression(scope, matrix.filter_query(), &filters);
                debug!(%kind, %scope, config = %config, %query, "Expanded matrix cell");

                units.push(ExpansionUnit {
                    kind,
                    scope: scope.clone(),
                    config: (*config).to_string(),
                    filters,
                    query,
                    options: options.clone(),
                    config_flag: config_flag(config),
                });
            }
        }

        Ok(units)
    }
}

fn config_flag(config: &str) -> String {
    if config.is_empty() {
        String::new()
    } else {
        format!("--config={config}")
    }
}
