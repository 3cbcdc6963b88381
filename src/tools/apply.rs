//! Apply tool: gated replacement with undo snapshot and history entry.

use std::path::Path;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::error::{Outcome, PriceResult};
use crate::server::{ToolCallResult, ToolDefinition};
use crate::session::{ApplyReport, Session};
use crate::tools::{RuleArgs, SourceArgs, outcome_result, resolve_rule, resolve_source};

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApplyParams {
    #[serde(flatten)]
    pub source: SourceArgs,
    #[serde(flatten)]
    pub rule: RuleArgs,
    /// Load this price first instead of using the one set earlier.
    #[serde(default)]
    pub new_price: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct ApplyResponse {
    #[serde(flatten)]
    report: ApplyReport,
    #[serde(skip_serializing_if = "Option::is_none")]
    content: Option<String>,
}

pub fn tool_definition() -> ToolDefinition {
    ToolDefinition {
        name: "apply_replacement".to_owned(),
        description: "Replace every match of a rule with the new price, keeping context anchors. \
            Refused when there are no matches or more than the safety threshold. Saves an undo \
            snapshot and a history entry."
            .to_owned(),
        input_schema: serde_json::json!({
            "type": "object",
            "properties": {
                "filePath": { "type": "string", "description": "Workspace file to rewrite" },
                "content": { "type": "string", "description": "Inline content (when no filePath); the result is returned" },
                "tabId": { "type": "string", "description": "Undo slot key for inline content" },
                "url": { "type": "string", "description": "URL of inline content, checked against allowed domains" },
                "rule": { "type": "object", "description": "Replacement rule" },
                "templateId": { "type": "string", "description": "Use a saved template instead of rule" },
                "newPrice": { "type": "string", "description": "New price (otherwise the one from set_price)" }
            }
        }),
    }
}

pub fn execute(workspace: &Path, session: &mut Session, arguments: serde_json::Value) -> Result<ToolCallResult> {
    let params: ApplyParams =
        serde_json::from_value(arguments).context("invalid apply_replacement parameters")?;

    let result = (|| -> PriceResult<ApplyResponse> {
        let rule = resolve_rule(session, &params.rule)?;
        let mut source = resolve_source(workspace, &params.source)?;
        if let Some(raw) = &params.new_price {
            session.load_price(raw, None)?;
        }
        let report = session.apply(source.as_source_mut(), &rule)?;
        Ok(ApplyResponse {
            report,
            content: source.inline_content().map(str::to_owned),
        })
    })();

    outcome_result(&Outcome::from(result))
}
