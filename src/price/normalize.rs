//! Canonicalization of heterogeneous price text.

use rust_decimal::{Decimal, RoundingStrategy};
use tracing::debug;

/// Currency glyphs stripped before parsing.
const CURRENCY_GLYPHS: &[char] = &['€', '$', '£', '¥', '₹'];

/// Canonicalize a raw price string to a two-decimal, dot-separated form.
///
/// Handles `"12,90"`, `"12.90"`, `"12 €"`, `"€12.90"`, `"1.234,56"` and
/// `"1,234.56"`. When no number can be read, returns the input trimmed.
pub fn normalize_price(raw: &str) -> String {
    let cleaned: String = raw
        .replace("&nbsp;", " ")
        .chars()
        .filter(|c| !CURRENCY_GLYPHS.contains(c) && !c.is_whitespace())
        .collect();

    let decimal = disambiguate_separators(&cleaned);

    let parsed = numeric_prefix(&decimal)
        .and_then(|n| n.parse::<f64>().ok())
        .filter(|v| v.is_finite());

    match parsed {
        Some(value) => two_decimals(value),
        None => {
            debug!(raw, "price text is not numeric, keeping as-is");
            raw.trim().to_owned()
        }
    }
}

/// Render with two fraction digits, rounding exact midpoints up.
///
/// The parsed binary value is kept exactly, so `12.125` (a true tie) becomes
/// `12.13` while `2.675` (stored just below the tie) stays `2.67`.
fn two_decimals(value: f64) -> String {
    match Decimal::from_f64_retain(value) {
        Some(exact) => {
            let mut rounded = exact.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero);
            rounded.rescale(2);
            rounded.to_string()
        }
        None => format!("{value:.2}"),
    }
}

/// Whether `s` is already in canonical form (`\d+\.\d{2}`).
pub fn is_canonical(s: &str) -> bool {
    let Some((int, frac)) = s.split_once('.') else {
        return false;
    };
    !int.is_empty()
        && int.bytes().all(|b| b.is_ascii_digit())
        && frac.len() == 2
        && frac.bytes().all(|b| b.is_ascii_digit())
}

/// Rewrite `,`/`.` so that the decimal point (if any) is a single `.`.
///
/// With both marks present the later one is the decimal point. A lone comma
/// is decimal only when it splits the text in two with at most two fraction
/// digits; otherwise every comma is a thousands mark.
fn disambiguate_separators(cleaned: &str) -> String {
    match (cleaned.rfind(','), cleaned.rfind('.')) {
        (Some(comma), Some(dot)) if comma > dot => cleaned.replace('.', "").replacen(',', ".", 1),
        (Some(_), Some(_)) => cleaned.replace(',', ""),
        (Some(_), None) => {
            let parts: Vec<&str> = cleaned.split(',').collect();
            if parts.len() == 2 && parts[1].chars().count() <= 2 {
                cleaned.replacen(',', ".", 1)
            } else {
                cleaned.replace(',', "")
            }
        }
        _ => cleaned.to_owned(),
    }
}

/// The longest leading slice that reads as an unsigned decimal number,
/// optionally with an exponent. Trailing text after the number is ignored.
fn numeric_prefix(s: &str) -> Option<&str> {
    let bytes = s.as_bytes();
    let mut end = usize::from(bytes.first() == Some(&b'+'));

    let int_start = end;
    while bytes.get(end).is_some_and(u8::is_ascii_digit) {
        end += 1;
    }
    let mut digits = end - int_start;

    if bytes.get(end) == Some(&b'.') {
        let frac_start = end + 1;
        let mut frac_end = frac_start;
        while bytes.get(frac_end).is_some_and(u8::is_ascii_digit) {
            frac_end += 1;
        }
        digits += frac_end - frac_start;
        end = frac_end;
    }

    if digits == 0 {
        return None;
    }

    if matches!(bytes.get(end), Some(b'e' | b'E')) {
        let mut exp_end = end + 1;
        if matches!(bytes.get(exp_end), Some(b'+' | b'-')) {
            exp_end += 1;
        }
        let exp_digits_start = exp_end;
        while bytes.get(exp_end).is_some_and(u8::is_ascii_digit) {
            exp_end += 1;
        }
        if exp_end > exp_digits_start {
            end = exp_end;
        }
    }

    Some(&s[..end])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_separator_disambiguation() {
        assert_eq!(normalize_price("12,90"), "12.90");
        assert_eq!(normalize_price("1.234,56"), "1234.56");
        assert_eq!(normalize_price("1,234.56"), "1234.56");
        assert_eq!(normalize_price("1,234"), "1234.00");
        assert_eq!(normalize_price("1,234,567"), "1234567.00");
    }

    #[test]
    fn test_currency_and_whitespace_stripped() {
        assert_eq!(normalize_price("12 €"), "12.00");
        assert_eq!(normalize_price("€12.90"), "12.90");
        assert_eq!(normalize_price("12.90€"), "12.90");
        assert_eq!(normalize_price("$ 1 299.5"), "1299.50");
        assert_eq!(normalize_price("12&nbsp;€"), "12.00");
        assert_eq!(normalize_price("12\u{00A0}90,5"), "1290.50");
        assert_eq!(normalize_price("£7"), "7.00");
        assert_eq!(normalize_price("₹ 99,9"), "99.90");
    }

    #[test]
    fn test_unparsable_returned_trimmed() {
        assert_eq!(normalize_price("  N/A "), "N/A");
        assert_eq!(normalize_price(""), "");
        assert_eq!(normalize_price("-5"), "-5");
    }

    #[test]
    fn test_exact_midpoints_round_up() {
        let cases = [
            ("12.125", "12.13"),
            ("0.125", "0.13"),
            ("0.625", "0.63"),
            ("1.234,125", "1234.13"),
            ("7,375", "7375.00"),
            ("0.375 €", "0.38"),
            // stored just below the midpoint
            ("2.675", "2.67"),
            ("1.005", "1.00"),
        ];
        for (raw, expected) in cases {
            assert_eq!(normalize_price(raw), expected, "{raw}");
        }
    }

    #[test]
    fn test_trailing_text_ignored() {
        assert_eq!(normalize_price("12.90 EUR"), "12.90");
        assert_eq!(normalize_price("3.5kg"), "3.50");
    }

    #[test]
    fn test_canonical_is_fixed_point() {
        for p in ["0.00", "12.90", "1234.56", "99999.99"] {
            assert!(is_canonical(p));
            assert_eq!(normalize_price(p), p);
        }
    }

    #[test]
    fn test_is_canonical_rejects_other_shapes() {
        assert!(!is_canonical("12.9"));
        assert!(!is_canonical("12,90"));
        assert!(!is_canonical(".90"));
        assert!(!is_canonical("€12.90"));
    }

    #[test]
    fn test_numeric_prefix() {
        assert_eq!(numeric_prefix("12.5abc"), Some("12.5"));
        assert_eq!(numeric_prefix(".5"), Some(".5"));
        assert_eq!(numeric_prefix("1e3x"), Some("1e3"));
        assert_eq!(numeric_prefix("2e"), Some("2"));
        assert_eq!(numeric_prefix("abc"), None);
        assert_eq!(numeric_prefix("."), None);
    }
}
