//! Replacement rules: what to look for and how to render the new price.
//!
//! Rules are plain serde records so they round-trip through the template
//! import/export format unchanged. Unknown fields are ignored on import and
//! missing optional fields come back as `None`.

use serde::{Deserialize, Serialize};

/// Decimal separator used when rendering the new price.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FormatOption {
    /// Leave the canonical dot separator. Same as `Dot` once normalized.
    #[default]
    Keep,
    Comma,
    Dot,
}

/// Where the currency symbol goes relative to the number.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CurrencyPosition {
    Before,
    After,
    None,
}

/// A declarative find/replace rule as the user edits it.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReplacementRule {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub name: String,
    pub old_price_pattern: String,
    #[serde(default)]
    pub is_regex: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub context_anchor_before: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub context_anchor_after: Option<String>,
    #[serde(default)]
    pub format_option: FormatOption,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub currency_symbol: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub currency_position: Option<CurrencyPosition>,
}

/// The pattern half of a rule, tagged by how it is interpreted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PatternSpec<'a> {
    Literal(&'a str),
    Regex(&'a str),
}

impl ReplacementRule {
    /// A literal rule with no anchors and default formatting.
    pub fn literal(pattern: impl Into<String>) -> Self {
        Self {
            old_price_pattern: pattern.into(),
            ..Self::default()
        }
    }

    /// A regex rule with no anchors and default formatting.
    pub fn regex(pattern: impl Into<String>) -> Self {
        Self {
            old_price_pattern: pattern.into(),
            is_regex: true,
            ..Self::default()
        }
    }

    #[must_use]
    pub fn with_anchors(mut self, before: Option<&str>, after: Option<&str>) -> Self {
        self.context_anchor_before = before.map(str::to_owned);
        self.context_anchor_after = after.map(str::to_owned);
        self
    }

    pub fn pattern(&self) -> PatternSpec<'_> {
        if self.is_regex {
            PatternSpec::Regex(&self.old_price_pattern)
        } else {
            PatternSpec::Literal(&self.old_price_pattern)
        }
    }

    /// Anchor before the price, ignoring an empty string.
    pub fn anchor_before(&self) -> Option<&str> {
        self.context_anchor_before.as_deref().filter(|a| !a.is_empty())
    }

    /// Anchor after the price, ignoring an empty string.
    pub fn anchor_after(&self) -> Option<&str> {
        self.context_anchor_after.as_deref().filter(|a| !a.is_empty())
    }
}
