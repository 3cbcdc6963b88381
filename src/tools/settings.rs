//! Settings tool: read and update session settings.

use anyhow::{Context, Result};
use serde::Deserialize;

use crate::error::Outcome;
use crate::server::{ToolCallResult, ToolDefinition};
use crate::session::Session;
use crate::store::Settings;
use crate::tools::outcome_result;

#[derive(Debug, Deserialize)]
#[serde(tag = "action", rename_all = "camelCase")]
pub enum SettingsParams {
    Get,
    /// Replace the settings wholesale; omitted fields take their defaults.
    Save { settings: Settings },
    AddDomain { domain: String },
    RemoveDomain { domain: String },
    SetThreshold { threshold: usize },
}

pub fn tool_definition() -> ToolDefinition {
    ToolDefinition {
        name: "settings".to_owned(),
        description: "Read or change settings: allowed domains, default selector and cleanup regex, \
            safety threshold and templates. Every change is saved immediately."
            .to_owned(),
        input_schema: serde_json::json!({
            "type": "object",
            "properties": {
                "action": {
                    "type": "string",
                    "enum": ["get", "save", "addDomain", "removeDomain", "setThreshold"]
                },
                "settings": { "type": "object", "description": "Full settings object for save" },
                "domain": { "type": "string" },
                "threshold": { "type": "integer", "minimum": 0 }
            },
            "required": ["action"]
        }),
    }
}

pub fn execute(session: &mut Session, arguments: serde_json::Value) -> Result<ToolCallResult> {
    let params: SettingsParams =
        serde_json::from_value(arguments).context("invalid settings parameters")?;

    if matches!(params, SettingsParams::Get) {
        return outcome_result(&Outcome::ok(session.settings()));
    }

    let result = session.update_settings(|current| {
        Ok(match params {
            SettingsParams::Get => false,
            SettingsParams::Save { settings } => {
                *current = settings;
                true
            }
            SettingsParams::AddDomain { domain } => current.add_domain(&domain),
            SettingsParams::RemoveDomain { domain } => current.remove_domain(&domain),
            SettingsParams::SetThreshold { threshold } => {
                current.safety_threshold = threshold;
                true
            }
        })
    });

    outcome_result(&Outcome::from(result))
}
