//! Request-level failures of `connection` and `parameter`.

use thiserror::Error;
use weave_common::InternalError;
use weave_db::DbError;

/// A failure that aborts a whole resolution request.
///
/// Nothing is created in the database when one of these is returned.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ResolveError {
    /// An endpoint handle is unknown or not a module/instance.
    #[error("{request}: invalid endpoint '{endpoint}' (expected a module or an instance)")]
    InvalidEndpoint {
        /// The request, e.g. `connection data`.
        request: String,
        /// The offending endpoint.
        endpoint: String,
    },
    /// The signal already names a net.
    #[error("connection {0}: net already exists")]
    NetExists(String),
    /// The endpoints do not share a hierarchy root.
    #[error("{request}: no common start between '{first}' and '{other}'")]
    NoCommonStart {
        /// The request, e.g. `connection data`.
        request: String,
        /// The root of the first endpoint's hierarchy.
        first: String,
        /// A root that differs from it.
        other: String,
    },
    /// The request names no endpoints, or an empty signal/parameter.
    #[error("{0}: nothing to connect")]
    EmptyRequest(String),
    /// The object store rejected a mutation.
    #[error(transparent)]
    Db(#[from] DbError),
    /// Corrupted object graph.
    #[error(transparent)]
    Internal(#[from] InternalError),
}
