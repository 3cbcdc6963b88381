//! Error types for the price-updater crate.

use std::path::PathBuf;

use serde::Serialize;

/// Price-updater error types.
#[derive(Debug, thiserror::Error)]
pub enum PriceError {
    /// The rule has no old-price pattern to match against.
    #[error("old price pattern is empty")]
    EmptyPattern,

    /// A user-supplied regular expression failed to compile.
    #[error("invalid pattern `{pattern}`: {reason}")]
    InvalidPattern { pattern: String, reason: String },

    /// A request named neither an inline rule nor a saved template.
    #[error("no rule given: pass `rule` or `templateId`")]
    MissingRule,

    /// The rule matched nothing in the content.
    #[error("no matches found")]
    NoMatches,

    /// More matches than the safety threshold allows for an unreviewed apply.
    #[error("{count} matches exceed the safety threshold of {threshold}; narrow the rule or add context anchors")]
    ThresholdExceeded { count: usize, threshold: usize },

    /// No text source could be read or written (missing file, no editor).
    #[error("text source unavailable: {reason}")]
    TextSourceUnavailable { reason: String },

    /// The source's host is not in the allowed domain list.
    #[error("domain not allowed: {domain}")]
    DomainNotAllowed { domain: String },

    /// The workflow cannot take `action` from its current status.
    #[error("cannot {action} while {from}")]
    InvalidTransition { from: String, action: String },

    /// An apply was requested before a new price was loaded.
    #[error("no new price loaded")]
    NoPrice,

    /// No saved template carries the requested id.
    #[error("template not found: {id}")]
    TemplateNotFound { id: String },

    /// JSON serialization/deserialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// I/O error with context.
    #[error("I/O error on {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl PriceError {
    /// Whether the caller can recover by editing the rule and retrying,
    /// as opposed to a failure of the environment.
    pub const fn is_recoverable(&self) -> bool {
        matches!(
            self,
            Self::EmptyPattern
                | Self::MissingRule
                | Self::InvalidPattern { .. }
                | Self::NoMatches
                | Self::ThresholdExceeded { .. }
                | Self::NoPrice
        )
    }
}

/// Convenience result type for price-updater operations.
pub type PriceResult<T> = Result<T, PriceError>;

/// A result flattened into a success flag and a message, the shape every
/// operation takes when it crosses over to a caller.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Outcome<T> {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub value: Option<T>,
}

impl<T> Outcome<T> {
    pub const fn ok(value: T) -> Self {
        Self {
            success: true,
            message: None,
            value: Some(value),
        }
    }

    pub fn failed(message: impl Into<String>) -> Self {
        Self {
            success: false,
            message: Some(message.into()),
            value: None,
        }
    }

    /// Attach an informational message without changing the success flag.
    #[must_use]
    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = Some(message.into());
        self
    }
}

impl<T> From<PriceResult<T>> for Outcome<T> {
    fn from(result: PriceResult<T>) -> Self {
        match result {
            Ok(value) => Self::ok(value),
            Err(e) => Self::failed(e.to_string()),
        }
    }
}
