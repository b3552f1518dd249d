//! API error taxonomy

use thiserror::Error;

#[derive(Debug, Clone, Error, PartialEq)]
pub enum ApiError {
    /// DNS, connection, TLS or timeout failure; no response was received
    #[error("{0}")]
    Transport(String),

    /// Non-success HTTP status; `message` is the body's `detail` or `HTTP <status>`
    #[error("{message}")]
    Status { status: u16, message: String },

    /// The body did not match the endpoint schema
    #[error("Unexpected response from {endpoint}: {reason}")]
    Decode { endpoint: String, reason: String },

    /// The configured base does not form an absolute URL
    #[error("No usable API base URL ({url}); set --api-url or TMA_API_URL")]
    InvalidUrl { url: String },

    /// Reading a local file for upload failed
    #[error("Cannot read {path}: {reason}")]
    Io { path: String, reason: String },

    /// The owning screen went away before the call finished
    #[error("Request cancelled")]
    Cancelled,
}

impl ApiError {
    pub fn is_cancelled(&self) -> bool {
        matches!(self, ApiError::Cancelled)
    }

    pub fn status(&self) -> Option<u16> {
        match self {
            ApiError::Status { status, .. } => Some(*status),
            _ => None,
        }
    }
}

impl From<reqwest::Error> for ApiError {
    fn from(e: reqwest::Error) -> Self {
        let msg = if e.is_timeout() {
            "Request timed out".to_string()
        } else if e.is_connect() {
            format!("Connection failed: {}", e)
        } else if e.is_decode() || e.is_body() {
            format!("Error reading body: {}", e)
        } else {
            format!("Request failed: {}", e)
        };
        ApiError::Transport(msg)
    }
}
