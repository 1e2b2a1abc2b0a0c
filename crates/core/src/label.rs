use serde::{Deserialize, Serialize};
use std::fmt;

/// A Bazel target label as returned by `bazel query`
///
/// The compiler treats labels as opaque strings: they are never parsed,
/// reordered or deduplicated.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Label(String);

impl Label {
    /// Create a label from its textual form
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    /// The label text
    #[must_use]
    pub fn name(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Label {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for Label {
    fn from(name: &str) -> Self {
        Self::new(name)
    }
}

impl From<String> for Label {
    fn from(name: String) -> Self {
        Self(name)
    }
}
