//! Regex cleanup of scraped price text before normalization.

use regex::Regex;

use crate::error::{PriceError, PriceResult};
use crate::price::normalize_price;

/// Remove every match of `pattern` from `value`. An empty pattern is a no-op.
pub fn apply_regex_cleanup(value: &str, pattern: &str) -> PriceResult<String> {
    if pattern.is_empty() {
        return Ok(value.to_owned());
    }
    let re = Regex::new(pattern).map_err(|e| PriceError::InvalidPattern {
        pattern: pattern.to_owned(),
        reason: e.to_string(),
    })?;
    Ok(re.replace_all(value, "").into_owned())
}

/// Clean `text` with the optional cleanup regex, then normalize it.
pub fn extract_price(text: &str, cleanup: Option<&str>) -> PriceResult<String> {
    let cleaned = match cleanup {
        Some(pattern) => apply_regex_cleanup(text, pattern)?,
        None => text.to_owned(),
    };
    Ok(normalize_price(&cleaned))
}
