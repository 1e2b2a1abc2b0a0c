//! Bazel query expression construction

use crate::filters::TagFilterSet;
use buildprint_core::UNIVERSE_PLACEHOLDER;

/// Build the `bazel query` expression for one scope.
///
/// The base expression is `filter_query` with [`UNIVERSE_PLACEHOLDER`]
/// replaced by `scope` and `{{` / `}}` collapsed to `{` / `}`, or `scope`
/// itself. Any other brace is kept as written. Positive tags add an `intersect`
/// clause and negative tags an `except` clause, in that order. Tags are
/// joined as a regex alternation without escaping.
#[must_use]
pub fn build_query_expression(
    scope: &str,
    filter_query: Option<&str>,
    filters: &TagFilterSet,
) -> String {
    let mut query = filter_query.map_or_else(
        || scope.to_string(),
        |template| fill_template(template, scope),
    );

    if !filters.positive.is_empty() {
        query.push_str(&format!(
            " intersect {}",
            tag_attr(&filters.positive, scope)
        ));
    }
    if !filters.negative.is_empty() {
        query.push_str(&format!(" except {}", tag_attr(&filters.negative, scope)));
    }

    query
}

fn fill_template(template: &str, scope: &str) -> String {
    let mut out = String::with_capacity(template.len() + scope.len());
    let mut rest = template;
    while let Some(c) = rest.chars().next() {
        if let Some(tail) = rest.strip_prefix(UNIVERSE_PLACEHOLDER) {
            out.push_str(scope);
            rest = tail;
        } else if let Some(tail) = rest.strip_prefix("{{").or_else(|| rest.strip_prefix("}}")) {
            out.push(c);
            rest = tail;
        } else {
            out.push(c);
            rest = &rest[c.len_utf8()..];
        }
    }
    out
}

fn tag_attr(tags: &[String], scope: &str) -> String {
    format!("attr(tags, '\\b({})\\b', {scope})", tags.join("|"))
}
