use thiserror::Error;

/// Failures at the relay's per-message boundary.
#[derive(Debug, Error)]
pub enum RelayError {
    #[error("command handling failed: {0}")]
    Command(#[source] anyhow::Error),

    #[error("transport error ({transport}): {message}")]
    Transport { transport: String, message: String },
}

/// Failure modes of a single completion call.
///
/// Kept distinct so callers can tell a failed service apart from one that
/// answered with nothing.
#[derive(Debug, Error)]
pub enum CompletionError {
    #[error("completion credential is not configured")]
    MissingCredentials,

    #[error("completion request failed: {0}")]
    Http(String),

    #[error("completion service returned {status}: {body}")]
    Status { status: u16, body: String },

    #[error("malformed completion response: {0}")]
    Malformed(String),

    #[error("completion service returned an empty reply")]
    EmptyReply,
}
