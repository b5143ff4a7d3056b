//! Error types for the Hike client.

use thiserror::Error;

/// Result type for Hike client operations.
pub type Result<T> = std::result::Result<T, HikeApiError>;

/// Hike client errors.
#[derive(Debug, Error)]
pub enum HikeApiError {
    /// Network error (connection failed, body could not be read)
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    /// Non-2xx response from the backend or storage
    #[error("API error ({status}): {message}")]
    Api { status: u16, message: String },

    /// 2xx response, but not the one the endpoint acknowledges with
    #[error("Unexpected status: {0}")]
    UnexpectedStatus(u16),

    /// Response body did not have the expected shape
    #[error("Parse error: {0}")]
    Parse(String),

    /// Backend answered 2xx but flagged the request as failed in the body
    #[error("Request rejected: {0}")]
    Rejected(String),

    /// Configuration error (invalid base URL)
    #[error("Configuration error: {0}")]
    Config(String),
}

impl HikeApiError {
    /// HTTP status attached to the error, if any.
    pub fn status(&self) -> Option<u16> {
        match self {
            HikeApiError::Api { status, .. } => Some(*status),
            HikeApiError::UnexpectedStatus(status) => Some(*status),
            HikeApiError::Network(e) => e.status().map(|s| s.as_u16()),
            _ => None,
        }
    }

    /// The message the backend gave for the failure, if it gave one: the
    /// `message` field of a JSON error body, or a rejection message.
    pub fn backend_message(&self) -> Option<String> {
        match self {
            HikeApiError::Api { message, .. } => serde_json::from_str::<serde_json::Value>(message)
                .ok()
                .and_then(|v| v.get("message").and_then(|m| m.as_str()).map(String::from)),
            HikeApiError::Rejected(message) => Some(message.clone()),
            _ => None,
        }
    }

    /// Message suitable for a notification body.
    pub fn user_message(&self) -> String {
        match self.backend_message() {
            Some(message) => message,
            None => match self {
                HikeApiError::Api { message, .. } if !message.is_empty() => message.clone(),
                other => other.to_string(),
            },
        }
    }
}
