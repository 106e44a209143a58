//! Board error types
//!
//! Every failure a board action can hit, from local validation to the
//! remote card API. The `Display` text is what the user sees inline.

use thiserror::Error;

/// Generic message shown when the API gives no usable reason
pub const GENERIC_FAILURE: &str = "Request failed";

/// Errors that can occur while driving the board
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum BoardError {
    /// Input rejected before any network call
    #[error("{0}")]
    Validation(String),

    /// The API answered with a non-success status
    #[error("{message}")]
    Api { status: u16, message: String },

    /// The request never completed
    #[error("Request failed")]
    Network { detail: String },

    /// A success response whose card payload could not be decoded
    #[error("Invalid response from card API: {0}")]
    InvalidResponse(String),

    /// Local storage read or write failed
    #[error("Storage error: {0}")]
    Storage(String),
}

impl BoardError {
    /// Build a validation error
    pub fn validation(message: impl Into<String>) -> Self {
        BoardError::Validation(message.into())
    }

    /// Build an API error, falling back to the generic message
    pub fn api(status: u16, message: Option<String>) -> Self {
        BoardError::Api {
            status,
            message: message
                .filter(|m| !m.is_empty())
                .unwrap_or_else(|| GENERIC_FAILURE.to_string()),
        }
    }

    /// Whether the error was raised locally without touching the network
    pub fn is_validation(&self) -> bool {
        matches!(self, BoardError::Validation(_))
    }
}

impl From<reqwest::Error> for BoardError {
    fn from(err: reqwest::Error) -> Self {
        BoardError::Network {
            detail: err.to_string(),
        }
    }
}

/// Result type alias for board operations
pub type BoardResult<T> = Result<T, BoardError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = BoardError::validation("Message cannot be empty.");
        assert_eq!(err.to_string(), "Message cannot be empty.");

        let err = BoardError::Network {
            detail: "connection refused".to_string(),
        };
        assert_eq!(err.to_string(), "Request failed");
    }

    #[test]
    fn test_api_error_fallback_message() {
        let err = BoardError::api(500, None);
        assert_eq!(err.to_string(), GENERIC_FAILURE);

        let err = BoardError::api(400, Some(String::new()));
        assert_eq!(err.to_string(), GENERIC_FAILURE);

        let err = BoardError::api(429, Some("Slow down".to_string()));
        assert_eq!(err.to_string(), "Slow down");
        assert!(!err.is_validation());
    }
}
