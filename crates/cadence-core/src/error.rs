//! Error types for Cadence.

/// Crate-wide result alias.
pub type Result<T> = std::result::Result<T, CadenceError>;

/// Errors surfaced synchronously to callers of the task registry and config layer.
#[derive(Debug, thiserror::Error)]
pub enum CadenceError {
    /// Bad caller input: empty credential/message list, missing form field.
    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// Unknown task id.
    #[error("task not found: {0}")]
    NotFound(String),

    #[error("configuration error: {0}")]
    Config(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl CadenceError {
    pub fn invalid_input(msg: impl Into<String>) -> Self {
        Self::InvalidInput(msg.into())
    }

    pub fn not_found(id: impl Into<String>) -> Self {
        Self::NotFound(id.into())
    }
}

/// Failures reported by a [`RemoteActionClient`](crate::traits::RemoteActionClient).
///
/// These never escape a running task: the worker loop records them in the
/// task's event log and carries on.
#[derive(Debug, Clone, thiserror::Error)]
pub enum RemoteError {
    /// Connection, DNS, TLS or timeout failure.
    #[error("transport error: {0}")]
    Transport(String),

    /// The remote answered with a non-success status.
    #[error("HTTP {status}: {body}")]
    Status { status: u16, body: String },

    /// The response body could not be decoded.
    #[error("decode error: {0}")]
    Decode(String),
}
