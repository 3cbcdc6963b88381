//! Templates tool: list, save, delete, export and import saved rules.

use anyhow::{Context, Result};
use serde::Deserialize;

use crate::error::{Outcome, PriceError};
use crate::rule::ReplacementRule;
use crate::server::{ToolCallResult, ToolDefinition};
use crate::session::Session;
use crate::tools::{outcome_result, text_result};

#[derive(Debug, Deserialize)]
#[serde(tag = "action", rename_all = "lowercase")]
pub enum TemplatesParams {
    List,
    Save { template: ReplacementRule },
    Delete { id: String },
    Export,
    Import { json: String },
}

pub fn tool_definition() -> ToolDefinition {
    ToolDefinition {
        name: "templates".to_owned(),
        description: "Manage saved replacement rules. Export yields a JSON array; import replaces \
            the whole list with one."
            .to_owned(),
        input_schema: serde_json::json!({
            "type": "object",
            "properties": {
                "action": { "type": "string", "enum": ["list", "save", "delete", "export", "import"] },
                "template": { "type": "object", "description": "Rule to save (upserted by id)" },
                "id": { "type": "string", "description": "Template id to delete" },
                "json": { "type": "string", "description": "JSON array of rules to import" }
            },
            "required": ["action"]
        }),
    }
}

pub fn execute(session: &mut Session, arguments: serde_json::Value) -> Result<ToolCallResult> {
    let params: TemplatesParams =
        serde_json::from_value(arguments).context("invalid templates parameters")?;

    match params {
        TemplatesParams::List => outcome_result(&Outcome::ok(&session.settings().templates)),
        TemplatesParams::Export => match session.settings().export_templates() {
            Ok(json) => Ok(text_result(json, false)),
            Err(e) => outcome_result(&Outcome::<()>::failed(e.to_string())),
        },
        TemplatesParams::Save { mut template } => {
            if template.id.is_empty() {
                template.id = uuid::Uuid::new_v4().to_string();
            }
            let id = template.id.clone();
            let result = session.update_settings(|settings| {
                settings.save_template(template);
                Ok(id)
            });
            outcome_result(&Outcome::from(result))
        }
        TemplatesParams::Delete { id } => {
            let result = session.update_settings(|settings| {
                if settings.delete_template(&id) {
                    Ok(true)
                } else {
                    Err(PriceError::TemplateNotFound { id: id.clone() })
                }
            });
            outcome_result(&Outcome::from(result))
        }
        TemplatesParams::Import { json } => {
            let result = session.update_settings(|settings| settings.import_templates(&json));
            outcome_result(&Outcome::from(result))
        }
    }
}
