//! Tool router: registers and dispatches MCP tool calls.
//!
//! Each tool takes JSON arguments and returns a [`ToolCallResult`]. Engine
//! and session failures come back as `is_error` results carrying a message,
//! never as protocol errors.

pub mod apply;
pub mod find;
pub mod history;
pub mod price;
pub mod settings;
pub mod templates;
pub mod undo;

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{Outcome, PriceError, PriceResult};
use crate::rule::ReplacementRule;
use crate::server::{ContentItem, ToolCallResult, ToolDefinition};
use crate::session::Session;
use crate::source::{FileSource, MemorySource, TextSource};

/// Where a tool reads and writes content: a workspace file, or text passed
/// inline by the caller.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SourceArgs {
    #[serde(default)]
    pub file_path: Option<String>,
    #[serde(default)]
    pub content: Option<String>,
    #[serde(default)]
    pub tab_id: Option<String>,
    #[serde(default)]
    pub url: Option<String>,
}

/// Either an inline rule or the id of a saved template.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RuleArgs {
    #[serde(default)]
    pub rule: Option<ReplacementRule>,
    #[serde(default)]
    pub template_id: Option<String>,
}

/// A resolved text source.
pub enum ResolvedSource {
    File(FileSource),
    Memory(MemorySource),
}

impl ResolvedSource {
    pub fn as_source(&self) -> &dyn TextSource {
        match self {
            Self::File(s) => s,
            Self::Memory(s) => s,
        }
    }

    pub fn as_source_mut(&mut self) -> &mut dyn TextSource {
        match self {
            Self::File(s) => s,
            Self::Memory(s) => s,
        }
    }

    /// The current text of an inline source, returned to the caller after
    /// a write since there is nowhere else for it to go.
    pub fn inline_content(&self) -> Option<&str> {
        match self {
            Self::File(_) => None,
            Self::Memory(s) => Some(s.content()),
        }
    }
}

/// Resolve the source named by `args`.
pub fn resolve_source(workspace: &Path, args: &SourceArgs) -> PriceResult<ResolvedSource> {
    if let Some(path) = &args.file_path {
        return FileSource::open(workspace, path).map(ResolvedSource::File);
    }
    if let Some(content) = &args.content {
        return Ok(ResolvedSource::Memory(MemorySource::new(
            args.tab_id.clone().unwrap_or_else(|| "inline".to_owned()),
            args.url.clone().unwrap_or_else(|| "http://localhost/".to_owned()),
            content.clone(),
        )));
    }
    Err(PriceError::TextSourceUnavailable {
        reason: "no filePath or content given".to_owned(),
    })
}

/// The rule named by `args`, looked up in the session's templates if needed.
pub fn resolve_rule(session: &Session, args: &RuleArgs) -> PriceResult<ReplacementRule> {
    match (&args.rule, &args.template_id) {
        (Some(rule), _) => Ok(rule.clone()),
        (None, Some(id)) => session.settings().template(id).cloned(),
        (None, None) => Err(PriceError::MissingRule),
    }
}

/// A single text item result.
pub fn text_result(text: impl Into<String>, is_error: bool) -> ToolCallResult {
    ToolCallResult {
        content: vec![ContentItem {
            content_type: "text".to_owned(),
            text: text.into(),
        }],
        is_error,
    }
}

/// Render an [`Outcome`] as pretty JSON, flagged as an error when it failed.
pub fn outcome_result<T: Serialize>(outcome: &Outcome<T>) -> Result<ToolCallResult> {
    let json = serde_json::to_string_pretty(outcome).context("failed to serialize outcome")?;
    Ok(text_result(json, !outcome.success))
}

/// Tool router that dispatches MCP tool calls to implementations.
pub struct ToolRouter {
    /// Directory file sources must stay inside.
    workspace: PathBuf,
    session: Session,
}

impl ToolRouter {
    pub fn new(workspace: PathBuf, session: Session) -> Self {
        Self { workspace, session }
    }

    pub const fn session(&self) -> &Session {
        &self.session
    }

    /// List all available tools with their JSON Schema definitions.
    pub fn list_tools(&self) -> Vec<ToolDefinition> {
        vec![
            price::normalize_definition(),
            price::format_definition(),
            price::set_price_definition(),
            find::tool_definition(),
            apply::tool_definition(),
            undo::tool_definition(),
            templates::tool_definition(),
            settings::tool_definition(),
            history::tool_definition(),
        ]
    }

    /// Call a tool by name with the given JSON arguments.
    ///
    /// # Errors
    ///
    /// Returns an error only when the arguments cannot be parsed or a
    /// result cannot be serialized.
    pub fn call_tool(&mut self, name: &str, arguments: serde_json::Value) -> Result<ToolCallResult> {
        debug!(tool = name, "dispatching tool call");

        match name {
            "normalize_price" => price::execute_normalize(arguments),
            "format_price" => price::execute_format(arguments),
            "set_price" => price::execute_set_price(&mut self.session, arguments),
            "find_matches" => find::execute(&self.workspace, &mut self.session, arguments),
            "apply_replacement" => apply::execute(&self.workspace, &mut self.session, arguments),
            "undo" => undo::execute(&self.workspace, &mut self.session, arguments),
            "templates" => templates::execute(&mut self.session, arguments),
            "settings" => settings::execute(&mut self.session, arguments),
            "history" => history::execute(&mut self.session, arguments),
            _ => Ok(text_result(format!("Unknown tool: {name}"), true)),
        }
    }
}
