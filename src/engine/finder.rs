//! Match enumeration with surrounding context for review.

use serde::Serialize;
use tracing::debug;

use crate::engine::{CompiledMatcher, build_matcher};
use crate::error::PriceResult;
use crate::rule::ReplacementRule;

/// Characters of context kept on each side of a match.
pub const CONTEXT_CHARS: usize = 50;

/// One occurrence of a rule's pattern in a body of text.
///
/// `start_pos`/`end_pos` are byte offsets into the searched text and are
/// only meaningful until that text changes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MatchRecord {
    pub index: usize,
    #[serde(rename = "match")]
    pub matched: String,
    pub context: String,
    pub start_pos: usize,
    pub end_pos: usize,
}

/// Find every non-overlapping match of `rule` in `content`, left to right.
///
/// An empty result is not an error.
pub fn find_matches(content: &str, rule: &ReplacementRule) -> PriceResult<Vec<MatchRecord>> {
    let matcher = build_matcher(rule)?;
    let records = find_with(&matcher, content);
    debug!(count = records.len(), "matches found");
    Ok(records)
}

/// Enumerate matches of an already-built matcher.
pub fn find_with(matcher: &CompiledMatcher, content: &str) -> Vec<MatchRecord> {
    matcher
        .regex()
        .find_iter(content)
        .enumerate()
        .map(|(index, m)| {
            let (from, to) = context_bounds(content, m.start(), m.end());
            MatchRecord {
                index,
                matched: m.as_str().to_owned(),
                context: content[from..to].to_owned(),
                start_pos: m.start(),
                end_pos: m.end(),
            }
        })
        .collect()
}

/// Byte range of `content` spanning the match plus up to [`CONTEXT_CHARS`]
/// characters on either side, clamped to the text boundaries.
pub(crate) fn context_bounds(content: &str, start: usize, end: usize) -> (usize, usize) {
    let from = content[..start]
        .char_indices()
        .rev()
        .nth(CONTEXT_CHARS - 1)
        .map_or(0, |(i, _)| i);
    let to = content[end..]
        .char_indices()
        .nth(CONTEXT_CHARS)
        .map_or(content.len(), |(i, _)| end + i);
    (from, to)
}
