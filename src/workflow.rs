//! Status machine driving a find → preview → apply → undo cycle.
//!
//! ```text
//! idle ─→ fetching ─→ ready ─find─→ previewing ─→ ready(preview)
//!                       │                              │
//!                       └───────────── apply ──────────┴─→ applying ─→ success
//! any ─fail─→ error          success ─undo─→ idle
//! ```
//!
//! A refused apply (gate or missing price) leaves the status at `ready`.
//! `error` is left by re-initiating the action that failed.

use std::fmt;

use serde::Serialize;
use tracing::debug;

use crate::error::{PriceError, PriceResult};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Status {
    #[default]
    Idle,
    Fetching,
    Ready,
    Previewing,
    Applying,
    Success,
    Error,
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Idle => "idle",
            Self::Fetching => "fetching",
            Self::Ready => "ready",
            Self::Previewing => "previewing",
            Self::Applying => "applying",
            Self::Success => "success",
            Self::Error => "error",
        };
        f.write_str(name)
    }
}

/// Current status plus the message of the last failure.
#[derive(Debug, Clone, Default, Serialize)]
pub struct Workflow {
    status: Status,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<String>,
}

impl Workflow {
    pub fn new() -> Self {
        Self::default()
    }

    pub const fn status(&self) -> Status {
        self.status
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn begin_fetch(&mut self) -> PriceResult<()> {
        self.require(&[Status::Idle, Status::Ready, Status::Success, Status::Error], "fetch")?;
        self.move_to(Status::Fetching);
        Ok(())
    }

    /// A new price is in hand.
    pub fn price_loaded(&mut self) -> PriceResult<()> {
        self.require(&[Status::Fetching], "load a price")?;
        self.move_to(Status::Ready);
        Ok(())
    }

    pub fn begin_find(&mut self) -> PriceResult<()> {
        self.require(&[Status::Idle, Status::Ready, Status::Success, Status::Error], "find")?;
        self.move_to(Status::Previewing);
        Ok(())
    }

    pub fn find_completed(&mut self) -> PriceResult<()> {
        self.require(&[Status::Previewing], "complete a find")?;
        self.move_to(Status::Ready);
        Ok(())
    }

    pub fn begin_apply(&mut self) -> PriceResult<()> {
        self.require(&[Status::Ready, Status::Error], "apply")?;
        self.move_to(Status::Applying);
        Ok(())
    }

    pub fn apply_completed(&mut self) -> PriceResult<()> {
        self.require(&[Status::Applying], "complete an apply")?;
        self.move_to(Status::Success);
        Ok(())
    }

    /// The apply was refused before anything changed; back to `ready`.
    pub fn apply_refused(&mut self) -> PriceResult<()> {
        self.require(&[Status::Applying], "refuse an apply")?;
        self.move_to(Status::Ready);
        Ok(())
    }

    pub fn undo_completed(&mut self) {
        self.move_to(Status::Idle);
    }

    /// Any step may fail; the message is kept until the next transition.
    pub fn fail(&mut self, message: impl Into<String>) {
        let message = message.into();
        debug!(from = %self.status, reason = %message, "workflow failed");
        self.status = Status::Error;
        self.error = Some(message);
    }

    fn require(&self, allowed: &[Status], action: &str) -> PriceResult<()> {
        if allowed.contains(&self.status) {
            Ok(())
        } else {
            Err(PriceError::InvalidTransition {
                from: self.status.to_string(),
                action: action.to_owned(),
            })
        }
    }

    fn move_to(&mut self, next: Status) {
        debug!(from = %self.status, to = %next, "workflow transition");
        self.status = next;
        self.error = None;
    }
}
