// src/error.rs
use thiserror::Error;

/// Failure surfaced by either external service client.
///
/// A non-success HTTP status carries the response body verbatim; that body is
/// what the operator sees. Transport failures get a generic prefix.
#[derive(Error, Debug)]
pub enum ServiceError {
    #[error("{0}")]
    Rejected(String),
    #[error("request failed: {0}")]
    Transport(#[from] reqwest::Error),
}

/// Any failure a workflow action can surface to the operator.
///
/// Every variant renders to a displayable string; none of them crash the
/// controller or destroy previously valid state.
#[derive(Error, Debug)]
pub enum WorkflowError {
    /// The editable document failed to parse before any network call.
    #[error("invalid input document: {0}")]
    MalformedDocument(#[from] serde_json::Error),
    /// An insertion names a b-roll id that is not in the document.
    #[error("insertion references unknown b-roll '{broll_id}'")]
    MissingBRoll { broll_id: String },
    #[error(transparent)]
    Service(#[from] ServiceError),
}
