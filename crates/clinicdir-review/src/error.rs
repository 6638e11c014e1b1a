use thiserror::Error;

use crate::normalize::SourceKind;

#[derive(Debug, Error)]
pub enum ReviewError {
    /// The raw payload is not a JSON object at all; nothing can be defaulted.
    #[error("malformed {kind} payload: {reason}")]
    MalformedInput { kind: SourceKind, reason: String },

    #[error("cannot {action} while the review is {state}")]
    InvalidTransition {
        action: &'static str,
        state: &'static str,
    },
}
