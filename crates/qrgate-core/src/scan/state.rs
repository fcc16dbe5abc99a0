// Scan session state machine.
//
//   Closed ──open──▶ Requesting ──stream ok──▶ Streaming ──code──▶ Decoded
//     ▲                  │                         │                 │
//     └──── denied ──────┘◀──── close / failure ───┘◀──── close ─────┘
//
// `Decoded` may also go straight back to `Requesting` when the scanner is
// reopened.

use std::fmt;

use serde::Serialize;

use crate::error::CoreError;

/// Observable state of a [`Scanner`](super::Scanner).
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "state", content = "code", rename_all = "snake_case")]
pub enum ScanState {
    Closed,
    Requesting,
    Streaming,
    Decoded(String),
}

impl ScanState {
    /// A camera stream is held (or being acquired) in this state.
    pub fn is_active(&self) -> bool {
        matches!(self, Self::Requesting | Self::Streaming)
    }

    pub fn can_transition_to(&self, next: &ScanState) -> bool {
        matches!(
            (self, next),
            (Self::Closed | Self::Decoded(_), Self::Requesting)
                | (Self::Requesting, Self::Streaming)
                | (
                    Self::Requesting | Self::Streaming | Self::Decoded(_),
                    Self::Closed
                )
                | (Self::Streaming, Self::Decoded(_))
        )
    }

    /// Move to `next`, rejecting transitions the diagram does not allow.
    pub fn transition(&mut self, next: ScanState) -> Result<(), CoreError> {
        if !self.can_transition_to(&next) {
            return Err(CoreError::IllegalTransition {
                from: self.to_string(),
                to: next.to_string(),
            });
        }
        *self = next;
        Ok(())
    }
}

impl fmt::Display for ScanState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Closed => f.write_str("closed"),
            Self::Requesting => f.write_str("requesting"),
            Self::Streaming => f.write_str("streaming"),
            Self::Decoded(_) => f.write_str("decoded"),
        }
    }
}
