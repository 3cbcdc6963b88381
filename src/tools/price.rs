//! Price tools: normalize, format, and load the new price into the session.

use anyhow::{Context, Result};
use serde::Deserialize;

use crate::error::Outcome;
use crate::price::{FormatOptions, extract_price, format_price};
use crate::server::{ToolCallResult, ToolDefinition};
use crate::session::Session;
use crate::tools::outcome_result;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NormalizeParams {
    pub raw: String,
    /// Regex whose matches are removed before normalizing.
    #[serde(default)]
    pub regex_cleanup: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FormatParams {
    pub price: String,
    #[serde(flatten)]
    pub options: FormatOptions,
}

pub fn normalize_definition() -> ToolDefinition {
    ToolDefinition {
        name: "normalize_price".to_owned(),
        description: "Normalize a price string (\"12,90 €\", \"1.234,56\", \"$1,234.56\") to a \
            two-decimal, dot-separated value. Unparsable input is returned trimmed."
            .to_owned(),
        input_schema: serde_json::json!({
            "type": "object",
            "properties": {
                "raw": { "type": "string", "description": "Raw price text" },
                "regexCleanup": { "type": "string", "description": "Regex removed before normalizing" }
            },
            "required": ["raw"]
        }),
    }
}

pub fn format_definition() -> ToolDefinition {
    ToolDefinition {
        name: "format_price".to_owned(),
        description: "Render a normalized price with a decimal separator and optional currency symbol.".to_owned(),
        input_schema: serde_json::json!({
            "type": "object",
            "properties": {
                "price": { "type": "string", "description": "Normalized price, e.g. \"12.90\"" },
                "separator": { "type": "string", "enum": ["keep", "comma", "dot"], "default": "keep" },
                "currencySymbol": { "type": "string" },
                "currencyPosition": { "type": "string", "enum": ["before", "after", "none"] }
            },
            "required": ["price"]
        }),
    }
}

pub fn set_price_definition() -> ToolDefinition {
    ToolDefinition {
        name: "set_price".to_owned(),
        description: "Load the new price used by apply_replacement. The text is cleaned with the \
            configured cleanup regex (or regexCleanup) and normalized."
            .to_owned(),
        input_schema: serde_json::json!({
            "type": "object",
            "properties": {
                "raw": { "type": "string", "description": "New price text" },
                "regexCleanup": { "type": "string", "description": "Overrides the default cleanup regex" }
            },
            "required": ["raw"]
        }),
    }
}

pub fn execute_normalize(arguments: serde_json::Value) -> Result<ToolCallResult> {
    let params: NormalizeParams =
        serde_json::from_value(arguments).context("invalid normalize_price parameters")?;
    let outcome = Outcome::from(extract_price(&params.raw, params.regex_cleanup.as_deref()));
    outcome_result(&outcome)
}

pub fn execute_format(arguments: serde_json::Value) -> Result<ToolCallResult> {
    let params: FormatParams =
        serde_json::from_value(arguments).context("invalid format_price parameters")?;
    outcome_result(&Outcome::ok(format_price(&params.price, &params.options)))
}

pub fn execute_set_price(session: &mut Session, arguments: serde_json::Value) -> Result<ToolCallResult> {
    let params: NormalizeParams =
        serde_json::from_value(arguments).context("invalid set_price parameters")?;
    let outcome = Outcome::from(session.load_price(&params.raw, params.regex_cleanup.as_deref()));
    outcome_result(&outcome)
}
