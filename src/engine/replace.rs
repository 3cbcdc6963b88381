//! Global find/replace that keeps context anchors intact.

use std::borrow::Cow;

use regex::Captures;
use tracing::debug;

use crate::engine::{CompiledMatcher, build_matcher};
use crate::error::PriceResult;
use crate::price::{FormatOptions, format_price};
use crate::rule::ReplacementRule;

/// Replace every match of `rule` in `content` with the formatted new price.
///
/// Captured anchors are written back around the new value, so only the
/// price between them changes. `content` is never modified; when nothing
/// matches the returned text equals the input.
pub fn apply_replacement(
    content: &str,
    rule: &ReplacementRule,
    new_price: &str,
    options: &FormatOptions,
) -> PriceResult<String> {
    let formatted = format_price(new_price, options);
    let matcher = build_matcher(rule)?;
    Ok(replace_with(&matcher, content, &formatted).into_owned())
}

/// Substitute `formatted` for every match of an already-built matcher.
pub fn replace_with<'c>(matcher: &CompiledMatcher, content: &'c str, formatted: &str) -> Cow<'c, str> {
    let mut replaced = 0usize;
    let result = matcher.regex().replace_all(content, |caps: &Captures<'_>| {
        replaced += 1;
        let before = matcher.anchor_before(caps).unwrap_or_default();
        let after = matcher.anchor_after(caps).unwrap_or_default();
        format!("{before}{formatted}{after}")
    });
    debug!(replaced, "replacement applied");
    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::find_matches;
    use crate::rule::{CurrencyPosition, FormatOption};

    #[test]
    fn test_anchors_preserved() {
        let rule = ReplacementRule::literal("12.90")
            .with_anchors(Some(r#"<span class="price">"#), Some("</span>"));
        let out = apply_replacement(
            r#"<span class="price">12.90</span>"#,
            &rule,
            "14.50",
            &FormatOptions::default(),
        )
        .expect("apply");
        assert_eq!(out, r#"<span class="price">14.50</span>"#);
    }

    #[test]
    fn test_regex_interior_replaced_with_anchors() {
        let rule = ReplacementRule::regex(r"[\d.,]+")
            .with_anchors(Some(r#"<span class="price">"#), Some("</span>"));
        let content = r#"<p>12,90</p><span class="price">12,90</span>"#;
        let options = FormatOptions {
            separator: FormatOption::Comma,
            currency_symbol: Some("€".to_owned()),
            currency_position: Some(CurrencyPosition::After),
        };
        let out = apply_replacement(content, &rule, "14.50", &options).expect("apply");
        assert_eq!(out, r#"<p>12,90</p><span class="price">14,50€</span>"#);
    }

    #[test]
    fn test_no_match_returns_content_unchanged() {
        let rule = ReplacementRule::literal("99.99");
        let content = "price: 12.90";
        assert!(find_matches(content, &rule).expect("find").is_empty());
        let out = apply_replacement(content, &rule, "14.50", &FormatOptions::default()).expect("apply");
        assert_eq!(out, content);
    }

    #[test]
    fn test_replaces_every_occurrence() {
        let rule = ReplacementRule::literal("12.90");
        let out = apply_replacement("a 12.90 b 12.90", &rule, "13.00", &FormatOptions::default())
            .expect("apply");
        assert_eq!(out, "a 13.00 b 13.00");
    }

    #[test]
    fn test_reapply_finds_nothing_new() {
        let rule = ReplacementRule::literal("12.90");
        let once = apply_replacement("x 12.90 y", &rule, "14.50", &FormatOptions::default()).expect("apply");
        let twice = apply_replacement(&once, &rule, "14.50", &FormatOptions::default()).expect("apply");
        assert_eq!(once, twice);
    }

    #[test]
    fn test_replacement_text_is_not_expanded() {
        let rule = ReplacementRule::literal("5.00");
        let options = FormatOptions {
            currency_symbol: Some("$1".to_owned()),
            currency_position: Some(CurrencyPosition::Before),
            ..FormatOptions::default()
        };
        let out = apply_replacement("cost 5.00", &rule, "6.00", &options).expect("apply");
        assert_eq!(out, "cost $16.00");
    }
}
