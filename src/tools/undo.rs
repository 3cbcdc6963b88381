//! Undo tool: restore the content saved before the last apply.

use std::path::Path;

use anyhow::{Context, Result};
use serde::Serialize;

use crate::error::{Outcome, PriceResult};
use crate::server::{ToolCallResult, ToolDefinition};
use crate::session::Session;
use crate::tools::{SourceArgs, outcome_result, resolve_source};

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct UndoResponse {
    restored: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    content: Option<String>,
}

pub fn tool_definition() -> ToolDefinition {
    ToolDefinition {
        name: "undo".to_owned(),
        description: "Restore the snapshot taken before the last apply on this file or tab. \
            Single level: the slot is cleared once restored."
            .to_owned(),
        input_schema: serde_json::json!({
            "type": "object",
            "properties": {
                "filePath": { "type": "string", "description": "Workspace file to restore" },
                "tabId": { "type": "string", "description": "Undo slot key for inline content" },
                "content": { "type": "string", "description": "Current inline content" }
            }
        }),
    }
}

pub fn execute(workspace: &Path, session: &mut Session, arguments: serde_json::Value) -> Result<ToolCallResult> {
    let mut params: SourceArgs =
        serde_json::from_value(arguments).context("invalid undo parameters")?;
    if params.file_path.is_none() && params.content.is_none() && params.tab_id.is_some() {
        params.content = Some(String::new());
    }

    let result = (|| -> PriceResult<UndoResponse> {
        let mut source = resolve_source(workspace, &params)?;
        let restored = session.undo(source.as_source_mut())?;
        Ok(UndoResponse {
            restored,
            content: if restored {
                source.inline_content().map(str::to_owned)
            } else {
                None
            },
        })
    })();

    let outcome = match result {
        Ok(response) if !response.restored => Outcome::ok(response).with_message("Nothing to undo"),
        other => Outcome::from(other),
    };
    outcome_result(&outcome)
}
