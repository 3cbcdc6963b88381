//! Matching and replacement engine.
//!
//! A [`ReplacementRule`] is compiled into a [`CompiledMatcher`] fresh for
//! every operation; rules are edited between calls so nothing is cached.
//!
//! # Pipeline
//!
//! ```text
//! rule ─→ build_matcher ─→ finder::find_matches ─→ gate::evaluate
//!                    └────→ replace::apply_replacement ←── price::format_price
//! ```
//!
//! The compiled pattern has the shape
//! `(?P<anchor_before>B)(?:P)(?P<anchor_after>A)` where `B` and `A` are
//! escaped literals and `P` is either the escaped literal or the user's
//! regex. Named groups keep the anchors addressable even when the user's
//! regex brings capture groups of its own.

pub mod finder;
pub mod gate;
pub mod preview;
pub mod replace;

use regex::{Captures, Regex};
use tracing::debug;

use crate::error::{PriceError, PriceResult};
use crate::rule::{PatternSpec, ReplacementRule};

pub use finder::{MatchRecord, find_matches};
pub use gate::{GateVerdict, can_apply};
pub use preview::{PreviewResult, preview};
pub use replace::apply_replacement;

const ANCHOR_BEFORE_GROUP: &str = "anchor_before";
const ANCHOR_AFTER_GROUP: &str = "anchor_after";

/// An executable matcher built from one rule. Scans globally.
#[derive(Debug, Clone)]
pub struct CompiledMatcher {
    regex: Regex,
}

impl CompiledMatcher {
    /// The underlying regex, for iteration.
    pub const fn regex(&self) -> &Regex {
        &self.regex
    }

    /// The pattern text the matcher was compiled from.
    pub fn as_str(&self) -> &str {
        self.regex.as_str()
    }

    /// Anchor-before text captured by a match, if the rule has one.
    pub fn anchor_before<'h>(&self, caps: &Captures<'h>) -> Option<&'h str> {
        caps.name(ANCHOR_BEFORE_GROUP).map(|m| m.as_str())
    }

    /// Anchor-after text captured by a match, if the rule has one.
    pub fn anchor_after<'h>(&self, caps: &Captures<'h>) -> Option<&'h str> {
        caps.name(ANCHOR_AFTER_GROUP).map(|m| m.as_str())
    }
}

/// Compile `rule` into a matcher.
///
/// Literal patterns and anchors are escaped. A regex pattern is validated on
/// its own before being combined with the anchors, so a malformed expression
/// is always reported as [`PriceError::InvalidPattern`].
pub fn build_matcher(rule: &ReplacementRule) -> PriceResult<CompiledMatcher> {
    let body = match rule.pattern() {
        PatternSpec::Literal("") | PatternSpec::Regex("") => return Err(PriceError::EmptyPattern),
        PatternSpec::Literal(text) => regex::escape(text),
        PatternSpec::Regex(expr) => {
            Regex::new(expr).map_err(|e| invalid(expr, &e))?;
            expr.to_owned()
        }
    };

    let mut pattern = String::with_capacity(body.len() + 64);
    if let Some(before) = rule.anchor_before() {
        pattern.push_str(&format!("(?P<{ANCHOR_BEFORE_GROUP}>{})", regex::escape(before)));
    }
    pattern.push_str(&format!("(?:{body})"));
    if let Some(after) = rule.anchor_after() {
        pattern.push_str(&format!("(?P<{ANCHOR_AFTER_GROUP}>{})", regex::escape(after)));
    }

    let regex = Regex::new(&pattern).map_err(|e| invalid(&rule.old_price_pattern, &e))?;
    debug!(pattern = regex.as_str(), "matcher built");
    Ok(CompiledMatcher { regex })
}

fn invalid(pattern: &str, err: &regex::Error) -> PriceError {
    PriceError::InvalidPattern {
        pattern: pattern.to_owned(),
        reason: err.to_string(),
    }
}
