//! Target resolution
//!
//! Runs each expansion unit's query against the build graph and attaches the
//! resulting labels. This is the only place matrix generation touches the
//! outside world.

use crate::matrix::ExpansionUnit;
use async_trait::async_trait;
use buildprint_core::{Label, Result};
use serde::Serialize;
use std::sync::Arc;
use tracing::{debug, info};

/// A build graph that can answer query expressions
#[async_trait]
pub trait QueryTool: Send + Sync {
    /// Evaluate `expression` and return matching labels in tool order
    ///
    /// # Errors
    /// Returns [`buildprint_core::Error::QueryResolution`] if the tool fails.
    async fn query(&self, expression: &str) -> Result<Vec<Label>>;
}

/// An expansion unit together with its resolved targets
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ResolvedTask {
    /// The cell that was resolved
    pub unit: ExpansionUnit,
    /// Labels exactly as returned by the query tool
    pub targets: Vec<Label>,
}

impl ResolvedTask {
    /// Whether the query matched nothing
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.targets.is_empty()
    }
}

/// Resolves expansion units through a [`QueryTool`]
#[derive(Clone)]
pub struct TargetResolver {
    tool: Arc<dyn QueryTool>,
}

impl TargetResolver {
    /// Create a resolver backed by `tool`
    #[must_use]
    pub fn new(tool: Arc<dyn QueryTool>) -> Self {
        Self { tool }
    }

    /// Resolve a single unit
    ///
    /// # Errors
    /// Propagates the query tool's failure unchanged.
    pub async fn resolve(&self, unit: ExpansionUnit) -> Result<ResolvedTask> {
        debug!(query = %unit.query, "Resolving targets");
        let targets = self.tool.query(&unit.query).await?;
        info!(
            kind = %unit.kind,
            scope = %unit.scope,
            config = %unit.config,
            targets = targets.len(),
            "Resolved matrix cell"
        );
        Ok(ResolvedTask { unit, targets })
    }

    /// Resolve every unit in order, stopping at the first failure
    ///
    /// # Errors
    /// Returns the first query failure; no partial result is produced.
    pub async fn resolve_all(&self, units: Vec<ExpansionUnit>) -> Result<Vec<ResolvedTask>> {
        let mut resolved = Vec::with_capacity(units.len());
        for unit in units {
            resolved.push(self.resolve(unit).await?);
        }
        Ok(resolved)
    }
}
