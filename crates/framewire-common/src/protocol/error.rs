use thiserror::Error;

use crate::protocol::messages::CallId;

/// Errors surfaced by the bridge core.
///
/// Two expected conditions deliberately have no variant here: a stale
/// `CallResult` (its call already settled or torn down) and an operation on
/// a context whose native backing is gone. Both are absorbed silently by
/// the dispatcher and lifecycle code; they are normal under concurrent
/// teardown, not failures.
#[derive(Error, Debug)]
pub enum FramewireError {
    /// A call was attempted with no resolvable script frame. The call is
    /// not dispatched and no pending entry is created.
    #[error("no active script frame for call to {object}.{method}")]
    NoActiveFrame { object: String, method: String },

    /// The pending-call table already held an entry for a freshly allocated
    /// id. Only a broken id counter can produce this; the existing entry is
    /// left untouched and callers must treat the error as fatal.
    #[error("duplicate call id {0} in pending-call table")]
    DuplicateCallId(CallId),

    /// The outbound message channel is closed; the peer process is gone.
    #[error("message channel closed")]
    ChannelClosed,

    #[error("transport error: {0}")]
    Transport(String),

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl FramewireError {
    /// Whether this error signals a broken internal invariant rather than a
    /// recoverable condition. Invariant violations must abort the embedding
    /// operation loudly instead of being retried or swallowed.
    pub fn is_invariant_violation(&self) -> bool {
        matches!(self, FramewireError::DuplicateCallId(_))
    }
}

pub type Result<T> = std::result::Result<T, FramewireError>;
