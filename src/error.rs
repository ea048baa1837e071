//! Error types for the licensing core.

use thiserror::Error;

/// Result type for licensing operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Failure classes surfaced by the core.
///
/// The classes matter more than the messages: the UI retries a `Transport`
/// failure on user request, never retries `Configuration` or `Protocol`, and
/// reports `Storage` even though the remote exchange succeeded.
#[derive(Debug, Error)]
pub enum Error {
    /// A required endpoint or setting is absent. Not retryable without a
    /// redeploy.
    #[error("configuration error: {0}")]
    Configuration(String),

    /// The network call failed, or the service answered with a non-2xx
    /// status. User-retryable.
    #[error("transport error: {message}")]
    Transport {
        /// HTTP status, when a response was received at all.
        status: Option<u16>,
        message: String,
    },

    /// The response was well-formed HTTP but missing a required field.
    /// Surfaced distinctly from `Transport` so it is not retried into a loop.
    #[error("protocol violation: {0}")]
    Protocol(String),

    /// Local persistence failed after a successful exchange.
    #[error("storage error: {0}")]
    Storage(String),

    /// One of several independent reads failed; the rest of the data stands.
    #[error("partial data: {0}")]
    PartialData(String),
}

impl Error {
    pub fn transport(message: impl Into<String>) -> Self {
        Error::Transport {
            status: None,
            message: message.into(),
        }
    }

    pub fn transport_status(status: u16, message: impl Into<String>) -> Self {
        Error::Transport {
            status: Some(status),
            message: message.into(),
        }
    }

    /// Whether the UI may offer the user a manual retry.
    pub fn user_retryable(&self) -> bool {
        matches!(self, Error::Transport { .. })
    }
}
