//! History tool: list or clear the replacement audit log.

use anyhow::{Context, Result};
use serde::Deserialize;

use crate::error::Outcome;
use crate::server::{ToolCallResult, ToolDefinition};
use crate::session::Session;
use crate::tools::outcome_result;

#[derive(Debug, Deserialize)]
#[serde(tag = "action", rename_all = "lowercase")]
pub enum HistoryParams {
    List,
    Clear,
}

pub fn tool_definition() -> ToolDefinition {
    ToolDefinition {
        name: "history".to_owned(),
        description: "List completed replacements (newest first, at most 100) or clear the log.".to_owned(),
        input_schema: serde_json::json!({
            "type": "object",
            "properties": {
                "action": { "type": "string", "enum": ["list", "clear"] }
            },
            "required": ["action"]
        }),
    }
}

pub fn execute(session: &mut Session, arguments: serde_json::Value) -> Result<ToolCallResult> {
    let params: HistoryParams =
        serde_json::from_value(arguments).context("invalid history parameters")?;

    match params {
        HistoryParams::List => outcome_result(&Outcome::from(session.history())),
        HistoryParams::Clear => outcome_result(&Outcome::from(session.clear_history())),
    }
}
