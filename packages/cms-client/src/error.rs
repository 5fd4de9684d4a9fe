//! Error types for the CMS client.

use thiserror::Error;

/// Result type for CMS client operations.
pub type Result<T> = std::result::Result<T, ClientError>;

#[derive(Debug, Error)]
pub enum ClientError {
    /// Network error (connection failed, timeout)
    #[error("Network error: {0}")]
    Http(#[from] reqwest::Error),

    /// Server answered with a failed envelope or non-2xx status
    #[error("API error ({status}): {message}")]
    Api { status: u16, message: String },

    /// Response body did not have the expected shape
    #[error("Parse error: {0}")]
    Parse(String),
}

impl ClientError {
    pub fn status(&self) -> Option<u16> {
        match self {
            ClientError::Api { status, .. } => Some(*status),
            ClientError::Http(e) => e.status().map(|s| s.as_u16()),
            ClientError::Parse(_) => None,
        }
    }
}
