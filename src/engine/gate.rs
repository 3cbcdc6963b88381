//! Safety gate for unreviewed bulk applies.

use serde::Serialize;

use crate::error::{PriceError, PriceResult};

/// Whether `match_count` matches may be applied without further review.
pub const fn can_apply(match_count: usize, threshold: usize) -> bool {
    match_count > 0 && match_count <= threshold
}

/// The gate's decision for a preview.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "verdict", rename_all = "camelCase")]
pub enum GateVerdict {
    Empty,
    Safe,
    OverThreshold { count: usize, threshold: usize },
}

impl GateVerdict {
    pub const fn evaluate(match_count: usize, threshold: usize) -> Self {
        if match_count == 0 {
            Self::Empty
        } else if can_apply(match_count, threshold) {
            Self::Safe
        } else {
            Self::OverThreshold {
                count: match_count,
                threshold,
            }
        }
    }

    pub const fn is_safe(self) -> bool {
        matches!(self, Self::Safe)
    }

    /// Short status line shown next to a preview.
    pub fn message(self) -> String {
        match self {
            Self::Empty => "No matches".to_owned(),
            Self::Safe => "Safe to apply".to_owned(),
            Self::OverThreshold { threshold, .. } => format!("Above threshold ({threshold})"),
        }
    }

    /// Turn a refusal into the error that blocks an apply.
    pub fn check(self) -> PriceResult<()> {
        match self {
            Self::Safe => Ok(()),
            Self::Empty => Err(PriceError::NoMatches),
            Self::OverThreshold { count, threshold } => {
                Err(PriceError::ThresholdExceeded { count, threshold })
            }
        }
    }
}
