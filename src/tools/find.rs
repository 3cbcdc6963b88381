//! Find tool: preview a rule's matches without changing the content.

use std::path::Path;

use anyhow::{Context, Result};
use serde::Deserialize;

use crate::error::{Outcome, PriceResult};
use crate::server::{ContentItem, ToolCallResult, ToolDefinition};
use crate::session::Session;
use crate::tools::{RuleArgs, SourceArgs, outcome_result, resolve_rule, resolve_source};

#[derive(Debug, Deserialize)]
pub struct FindParams {
    #[serde(flatten)]
    pub source: SourceArgs,
    #[serde(flatten)]
    pub rule: RuleArgs,
}

pub fn tool_definition() -> ToolDefinition {
    ToolDefinition {
        name: "find_matches".to_owned(),
        description: "Preview a replacement rule: every match with 50 characters of context, the \
            safety-gate verdict, before/after samples and a unified diff. Nothing is written."
            .to_owned(),
        input_schema: serde_json::json!({
            "type": "object",
            "properties": {
                "filePath": { "type": "string", "description": "Workspace file to search" },
                "content": { "type": "string", "description": "Inline content (when no filePath)" },
                "tabId": { "type": "string", "description": "Key for inline content" },
                "url": { "type": "string", "description": "URL of inline content" },
                "rule": {
                    "type": "object",
                    "description": "Replacement rule (oldPricePattern, isRegex, contextAnchorBefore, contextAnchorAfter, formatOption, currencySymbol, currencyPosition)"
                },
                "templateId": { "type": "string", "description": "Use a saved template instead of rule" }
            }
        }),
    }
}

pub fn execute(workspace: &Path, session: &mut Session, arguments: serde_json::Value) -> Result<ToolCallResult> {
    let params: FindParams =
        serde_json::from_value(arguments).context("invalid find_matches parameters")?;

    let preview = (|| -> PriceResult<_> {
        let rule = resolve_rule(session, &params.rule)?;
        let source = resolve_source(workspace, &params.source)?;
        session.find(source.as_source(), &rule)
    })();

    match preview {
        Ok(preview) => {
            let mut outcome = Outcome::ok(&preview);
            if preview.matches.is_empty() {
                outcome = outcome.with_message("No matches");
            }
            let mut result = outcome_result(&outcome)?;
            result.content.insert(
                0,
                ContentItem {
                    content_type: "text".to_owned(),
                    text: preview.render(),
                },
            );
            Ok(result)
        }
        Err(e) => outcome_result(&Outcome::<()>::failed(e.to_string())),
    }
}
