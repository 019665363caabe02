//! Failure taxonomy for remote completion calls.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum CompletionError {
    /// The transport could not complete the request.
    #[error("failed to reach {url}: {message}")]
    Network { url: String, message: String },

    /// The service answered with a non-success status.
    #[error("request failed with status {status}: {body}")]
    Protocol { status: u16, body: String },

    /// A success response did not carry the expected reply field.
    #[error("unexpected response format: {0}")]
    Format(String),
}

impl CompletionError {
    pub(crate) fn network(url: &str, err: &reqwest::Error) -> Self {
        Self::Network {
            url: url.to_string(),
            message: err.to_string(),
        }
    }

    /// Short label used in logs.
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::Network { .. } => "network",
            Self::Protocol { .. } => "protocol",
            Self::Format(_) => "format",
        }
    }
}
