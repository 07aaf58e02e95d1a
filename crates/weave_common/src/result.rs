//! Internal error type for violated object-graph invariants.

/// The result type for operations that can only fail through an internal error.
pub type WeaveResult<T> = Result<T, InternalError>;

/// An internal error: the object graph contradicts its own invariants.
///
/// Typical causes are a handle that points at an object of the wrong kind
/// (a port where an instance was expected) or a hierarchy walk that never
/// reaches a root. Valid input never produces one. User mistakes such as
/// duplicate names are reported through typed errors or diagnostics instead;
/// a front end receiving an `InternalError` should stop, since continuing
/// risks generating wrong connectivity.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("internal error: {message}")]
pub struct InternalError {
    /// Description of the violated invariant.
    pub message: String,
}

impl InternalError {
    /// Creates a new internal error with the given message.
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

impl From<String> for InternalError {
    fn from(message: String) -> Self {
        Self { message }
    }
}
