//! Dry-run of a replacement for human review.
//!
//! A preview carries the match list, the content as it would look after the
//! apply, a unified diff between the two, and before/after renderings of the
//! first few matches in their context.

use regex::Captures;
use serde::Serialize;
use similar::{Algorithm, TextDiff};

use crate::engine::finder::{context_bounds, find_with};
use crate::engine::replace::replace_with;
use crate::engine::{CompiledMatcher, GateVerdict, MatchRecord, build_matcher};
use crate::error::PriceResult;
use crate::price::{FormatOptions, format_price};
use crate::rule::ReplacementRule;

/// Matches rendered side by side in a preview; the rest are only counted.
pub const MAX_SAMPLES: usize = 5;

/// One match shown in context before and after replacement.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MatchSample {
    pub index: usize,
    pub before: String,
    pub after: String,
}

/// Everything a reviewer needs to decide on an apply.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PreviewResult {
    pub matches: Vec<MatchRecord>,
    pub original_content: String,
    pub new_content: String,
    pub verdict: GateVerdict,
    pub samples: Vec<MatchSample>,
    pub diff: String,
}

impl PreviewResult {
    pub fn match_count(&self) -> usize {
        self.matches.len()
    }

    /// Plain-text report: count, gate status, samples, and a "more" tail.
    pub fn render(&self) -> String {
        let count = self.match_count();
        let mut out = format!(
            "{count} match{} found ({})\n",
            if count == 1 { "" } else { "es" },
            self.verdict.message()
        );
        for sample in &self.samples {
            out.push_str(&format!(
                "\nMatch {}\n- {}\n+ {}\n",
                sample.index + 1,
                sample.before,
                sample.after
            ));
        }
        if count > self.samples.len() {
            out.push_str(&format!("\n... and {} more matches\n", count - self.samples.len()));
        }
        out
    }
}

/// Run `rule` over `content` without changing anything.
///
/// Without a new price only the matches and verdict are meaningful: the
/// proposed content equals the original and samples show no change.
pub fn preview(
    content: &str,
    rule: &ReplacementRule,
    new_price: Option<&str>,
    threshold: usize,
    label: &str,
) -> PriceResult<PreviewResult> {
    let matcher = build_matcher(rule)?;
    let formatted = new_price.map(|p| format_price(p, &FormatOptions::from_rule(rule)));

    let matches = find_with(&matcher, content);
    let new_content = match &formatted {
        Some(value) => replace_with(&matcher, content, value).into_owned(),
        None => content.to_owned(),
    };

    Ok(PreviewResult {
        verdict: GateVerdict::evaluate(matches.len(), threshold),
        samples: samples(&matcher, content, formatted.as_deref()),
        diff: unified_diff(label, content, &new_content),
        matches,
        original_content: content.to_owned(),
        new_content,
    })
}

fn samples(matcher: &CompiledMatcher, content: &str, formatted: Option<&str>) -> Vec<MatchSample> {
    matcher
        .regex()
        .captures_iter(content)
        .take(MAX_SAMPLES)
        .enumerate()
        .filter_map(|(index, caps): (usize, Captures<'_>)| {
            let whole = caps.get(0)?;
            let (from, to) = context_bounds(content, whole.start(), whole.end());
            let replacement = match formatted {
                Some(value) => format!(
                    "{}{value}{}",
                    matcher.anchor_before(&caps).unwrap_or_default(),
                    matcher.anchor_after(&caps).unwrap_or_default()
                ),
                None => whole.as_str().to_owned(),
            };
            Some(MatchSample {
                index,
                before: content[from..to].to_owned(),
                after: format!(
                    "{}{replacement}{}",
                    &content[from..whole.start()],
                    &content[whole.end()..to]
                ),
            })
        })
        .collect()
}

/// Unified diff between the current and proposed content.
///
/// Patience keeps markup structure readable when only a value changes.
pub fn unified_diff(label: &str, old: &str, new: &str) -> String {
    let diff = TextDiff::configure()
        .algorithm(Algorithm::Patience)
        .diff_lines(old, new);

    diff.unified_diff()
        .header(&format!("a/{label}"), &format!("b/{label}"))
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_preview_does_not_touch_content() {
        let content = "<b>12.90</b>\nother 12.90\n";
        let rule = ReplacementRule::literal("12.90").with_anchors(Some("<b>"), Some("</b>"));
        let result = preview(content, &rule, Some("14.50"), 10, "page").expect("preview");
        assert_eq!(result.original_content, content);
        assert_eq!(result.new_content, "<b>14.50</b>\nother 12.90\n");
        assert_eq!(result.match_count(), 1);
        assert!(result.verdict.is_safe());
        assert!(result.diff.contains("-<b>12.90</b>"));
        assert!(result.diff.contains("+<b>14.50</b>"));
    }

    #[test]
    fn test_samples_capped_with_tail() {
        let content = "1.00 ".repeat(8);
        let result = preview(&content, &ReplacementRule::literal("1.00"), Some("2.00"), 5, "page").expect("preview");
        assert_eq!(result.samples.len(), MAX_SAMPLES);
        assert_eq!(result.verdict, GateVerdict::OverThreshold { count: 8, threshold: 5 });
        let report = result.render();
        assert!(report.starts_with("8 matches found (Above threshold (5))"));
        assert!(report.contains("... and 3 more matches"));
    }

    #[test]
    fn test_sample_after_keeps_context() {
        let result = preview("cost: 12,90 EUR", &ReplacementRule::literal("12,90"), Some("13.10"), 10, "page")
            .expect("preview");
        assert_eq!(result.samples[0].before, "cost: 12,90 EUR");
        assert_eq!(result.samples[0].after, "cost: 13.10 EUR");
    }

    #[test]
    fn test_empty_preview() {
        let result = preview("nothing", &ReplacementRule::literal("1.00"), Some("2.00"), 10, "page").expect("preview");
        assert_eq!(result.verdict, GateVerdict::Empty);
        assert!(result.samples.is_empty());
        assert!(result.render().starts_with("0 matches found (No matches)"));
    }

    #[test]
    fn test_preview_without_price_changes_nothing() {
        let result = preview("a 1,00 b", &ReplacementRule::literal("1,00"), None, 10, "page").expect("preview");
        assert_eq!(result.match_count(), 1);
        assert_eq!(result.new_content, "a 1,00 b");
        assert_eq!(result.samples[0].before, result.samples[0].after);
    }

    #[test]
    fn test_no_diff_when_unchanged() {
        let result = unified_diff("page", "hello\n", "hello\n");
        assert!(!result.contains("-hello"));
    }
}
