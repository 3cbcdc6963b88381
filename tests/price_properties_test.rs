//! End-to-end behaviour of the pure price pipeline through the public API.

use price_updater::engine::{GateVerdict, apply_replacement, build_matcher, can_apply, find_matches};
use price_updater::price::{FormatOptions, format_price, normalize_price};
use price_updater::rule::FormatOption;
use price_updater::source::MemorySource;
use price_updater::store::MemoryStore;
use price_updater::workflow::Status;
use price_updater::{PriceError, ReplacementRule, Session};

fn dot() -> FormatOptions {
    FormatOptions {
        separator: FormatOption::Dot,
        ..FormatOptions::default()
    }
}

#[test]
fn test_canonical_prices_are_fixed_points() {
    for p in ["0.00", "0.05", "12.90", "1234.56", "999999.99"] {
        assert_eq!(normalize_price(p), p);
    }
}

#[test]
fn test_separator_disambiguation() {
    assert_eq!(normalize_price("12,90"), "12.90");
    assert_eq!(normalize_price("1.234,56"), "1234.56");
    assert_eq!(normalize_price("1,234.56"), "1234.56");
    assert_eq!(normalize_price("1,234"), "1234.00");
    assert_eq!(normalize_price("  N/A "), "N/A");
}

#[test]
fn test_dot_format_has_two_decimals() {
    for raw in ["12,90", "€ 1.234,56", "$1,234.56", "7", "0,5"] {
        let formatted = format_price(&normalize_price(raw), &dot());
        assert_eq!(formatted.matches('.').count(), 1, "{raw} -> {formatted}");
        let (_, fraction) = formatted.split_once('.').expect("decimal point");
        assert_eq!(fraction.len(), 2, "{raw} -> {formatted}");
        assert!(fraction.chars().all(|c| c.is_ascii_digit()));
    }
}

#[test]
fn test_comma_format() {
    let options = FormatOptions {
        separator: FormatOption::Comma,
        ..FormatOptions::default()
    };
    assert_eq!(format_price("12.90", &options), "12,90");
}

#[test]
fn test_literal_rule_finds_every_occurrence() {
    let rule = ReplacementRule::literal("12.90");
    let matches = find_matches("a 12.90 b 12.90 c", &rule).expect("find");

    assert_eq!(matches.len(), 2);
    assert!(matches[0].start_pos < matches[1].start_pos);
    assert_eq!(matches[0].index, 0);
    assert_eq!(matches[1].index, 1);
}

#[test]
fn test_anchors_survive_replacement() {
    let rule = ReplacementRule::literal("12.90").with_anchors(Some(r#"<span class="price">"#), Some("</span>"));
    let out = apply_replacement(r#"<span class="price">12.90</span>"#, &rule, "14.50", &dot()).expect("apply");
    assert_eq!(out, r#"<span class="price">14.50</span>"#);
}

#[test]
fn test_gate_boundaries() {
    assert!(can_apply(10, 10));
    assert!(!can_apply(11, 10));
    assert!(!can_apply(0, 10));
    assert!(!GateVerdict::evaluate(11, 10).is_safe());
}

#[test]
fn test_absent_pattern_leaves_content_unchanged() {
    let content = "nothing priced here";
    let rule = ReplacementRule::literal("12.90");
    assert!(find_matches(content, &rule).expect("find").is_empty());
    assert_eq!(apply_replacement(content, &rule, "14.50", &dot()).expect("apply"), content);
}

#[test]
fn test_invalid_regex_is_reported() {
    let rule = ReplacementRule::regex("(");
    assert!(matches!(build_matcher(&rule), Err(PriceError::InvalidPattern { .. })));
    assert!(matches!(find_matches("((", &rule), Err(PriceError::InvalidPattern { .. })));
}

#[test]
fn test_session_cycle_preview_apply_undo() {
    let mut session = Session::start(Box::new(MemoryStore::new())).expect("session");
    let mut page = MemorySource::new("tab-1", "http://localhost/shop", "Price: 12,90 € / Old: 12,90");
    let rule = ReplacementRule::literal("12,90");

    session.load_price("14.50", None).expect("price");
    let preview = session.find(&page, &rule).expect("preview");
    assert_eq!(preview.match_count(), 2);
    assert!(preview.verdict.is_safe());
    assert_eq!(session.workflow().status(), Status::Ready);

    let report = session.apply(&mut page, &rule).expect("apply");
    assert_eq!(report.match_count, 2);
    assert_eq!(page.content(), "Price: 14.50 € / Old: 14.50");
    assert_eq!(session.workflow().status(), Status::Success);

    assert!(session.undo(&mut page).expect("undo"));
    assert_eq!(page.content(), "Price: 12,90 € / Old: 12,90");
    assert_eq!(session.workflow().status(), Status::Idle);
    assert!(!session.undo(&mut page).expect("second undo is a no-op"));
}
