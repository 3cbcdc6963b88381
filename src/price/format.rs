//! Rendering a canonical price back to display form.

use serde::{Deserialize, Serialize};

use crate::rule::{CurrencyPosition, FormatOption, ReplacementRule};

/// How a canonical price is rendered into the target text.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FormatOptions {
    #[serde(default)]
    pub separator: FormatOption,
    #[serde(default)]
    pub currency_symbol: Option<String>,
    #[serde(default)]
    pub currency_position: Option<CurrencyPosition>,
}

impl FormatOptions {
    /// The formatting half of a rule.
    pub fn from_rule(rule: &ReplacementRule) -> Self {
        Self {
            separator: rule.format_option,
            currency_symbol: rule.currency_symbol.clone(),
            currency_position: rule.currency_position,
        }
    }
}

/// Render `canonical` with the requested separator and currency symbol.
///
/// `Keep` and `Dot` leave the canonical dot in place. A symbol with no
/// position goes after the number; `CurrencyPosition::None` drops it.
pub fn format_price(canonical: &str, options: &FormatOptions) -> String {
    let number = match options.separator {
        FormatOption::Comma => canonical.replacen('.', ",", 1),
        FormatOption::Dot | FormatOption::Keep => canonical.to_owned(),
    };

    match (options.currency_symbol.as_deref(), options.currency_position) {
        (None | Some(""), _) | (_, Some(CurrencyPosition::None)) => number,
        (Some(symbol), Some(CurrencyPosition::Before)) => format!("{symbol}{number}"),
        (Some(symbol), Some(CurrencyPosition::After) | None) => format!("{number}{symbol}"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::price::normalize_price;

    fn opts(separator: FormatOption, symbol: Option<&str>, pos: Option<CurrencyPosition>) -> FormatOptions {
        FormatOptions {
            separator,
            currency_symbol: symbol.map(str::to_owned),
            currency_position: pos,
        }
    }

    #[test]
    fn test_comma_separator() {
        assert_eq!(format_price("12.90", &opts(FormatOption::Comma, None, None)), "12,90");
    }

    #[test]
    fn test_dot_and_keep_are_identity() {
        for sep in [FormatOption::Dot, FormatOption::Keep] {
            let rendered = format_price(&normalize_price("1.234,5"), &opts(sep, None, None));
            assert_eq!(rendered, "1234.50");
            assert_eq!(rendered.matches('.').count(), 1);
            assert_eq!(rendered.rsplit('.').next().map(str::len), Some(2));
        }
    }

    #[test]
    fn test_currency_positions() {
        let before = opts(FormatOption::Comma, Some("€"), Some(CurrencyPosition::Before));
        assert_eq!(format_price("14.50", &before), "€14,50");

        let after = opts(FormatOption::Dot, Some("€"), Some(CurrencyPosition::After));
        assert_eq!(format_price("14.50", &after), "14.50€");

        let none = opts(FormatOption::Dot, Some("€"), Some(CurrencyPosition::None));
        assert_eq!(format_price("14.50", &none), "14.50");

        let unset = opts(FormatOption::Dot, Some("$"), None);
        assert_eq!(format_price("14.50", &unset), "14.50$");
    }

    #[test]
    fn test_from_rule() {
        let rule = ReplacementRule {
            format_option: FormatOption::Comma,
            currency_symbol: Some("£".to_owned()),
            currency_position: Some(CurrencyPosition::Before),
            ..ReplacementRule::literal("1")
        };
        assert_eq!(format_price("3.00", &FormatOptions::from_rule(&rule)), "£3,00");
    }
}
