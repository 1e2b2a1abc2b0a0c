//! Tag filter parsing
//!
//! Turns the raw `tag_filters` of a matrix into positive and negative filter
//! lists. A leading `-` marks an exclusion. The reserved manual tag is
//! excluded unless a raw tag asks for it explicitly.

use buildprint_core::MANUAL_TAG;
use serde::Serialize;

/// Positive and negative tag filters, in declaration order
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct TagFilterSet {
    /// Tags a target must carry
    pub positive: Vec<String>,
    /// Tags a target must not carry
    pub negative: Vec<String>,
}

impl TagFilterSet {
    /// Whether both lists are empty
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.positive.is_empty() && self.negative.is_empty()
    }
}

/// Parses raw tag filters against a reserved manual tag
#[derive(Debug, Clone)]
pub struct TagFilterParser {
    manual_tag: String,
}

impl Default for TagFilterParser {
    fn default() -> Self {
        Self::new(MANUAL_TAG)
    }
}

impl TagFilterParser {
    /// Create a parser with a custom reserved tag
    pub fn new(manual_tag: impl Into<String>) -> Self {
        Self {
            manual_tag: manual_tag.into(),
        }
    }

    /// The reserved tag excluded by default
    #[must_use]
    pub fn manual_tag(&self) -> &str {
        &self.manual_tag
    }

    /// Parse `tags`, appending to a copy of `seed` when given.
    ///
    /// The seed is left untouched. The manual tag counts as requested when it
    /// appears unprefixed in `tags` or is already positive in the seed; when
    /// it is not requested it is appended to the negative list unless already
    /// present there.
    #[must_use]
    pub fn parse<S: AsRef<str>>(&self, tags: &[S], seed: Option<&TagFilterSet>) -> TagFilterSet {
        let mut filters = seed.cloned().unwrap_or_default();
        let mut manual_requested = filters.positive.iter().any(|t| *t == self.manual_tag);

        for tag in tags {
            let tag = tag.as_ref();
            if let Some(excluded) = tag.strip_prefix('-') {
                filters.negative.push(excluded.to_string());
            } else {
                if tag == self.manual_tag {
                    manual_requested = true;
                }
                filters.positive.push(tag.to_string());
            }
        }

        if !manual_requested && !filters.negative.contains(&self.manual_tag) {
            filters.negative.push(self.manual_tag.clone());
        }

        filters
    }
}
