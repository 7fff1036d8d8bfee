//! Error types for the Poradock client.

use thiserror::Error;

/// Errors that can occur when using the Poradock client.
///
/// Non-2xx responses from the API are not errors; they come back as an
/// ordinary [`ApiResponse`](crate::ApiResponse) for the caller to inspect.
#[derive(Debug, Error)]
pub enum ClientError {
    /// The request could not be completed (connection refused, DNS failure,
    /// timeout, unreadable response).
    #[error("HTTP request failed: {0}")]
    Transport(#[from] reqwest::Error),

    /// Invalid URL provided.
    #[error("Invalid URL: {0}")]
    InvalidUrl(String),

    /// The auth token cannot be sent as a header value.
    #[error("Invalid auth token: {0}")]
    InvalidToken(String),

    /// A configuration value could not be parsed.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// Failed to deserialize a response body.
    #[error("Failed to deserialize response: {0}")]
    Deserialize(#[from] serde_json::Error),
}

impl ClientError {
    /// Returns `true` if this is a transport-level failure.
    pub fn is_transport(&self) -> bool {
        matches!(self, Self::Transport(_))
    }
}

/// Result type for client operations.
pub type Result<T> = std::result::Result<T, ClientError>;
