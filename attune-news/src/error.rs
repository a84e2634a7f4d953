//! Error types for the article search boundary

use thiserror::Error;

/// Errors that can occur while searching for articles
#[derive(Debug, Error)]
pub enum NewsError {
    /// Malformed request construction; indicates a programming or
    /// configuration error, not a runtime condition
    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    /// Network-level failure (connect, timeout); retryable
    #[error("Request failed: {0}")]
    Transport(String),

    /// The API answered with a non-200 status or an in-body error message
    #[error("API error (status {status}): {message}")]
    Api {
        /// HTTP status code (200 for in-body errors)
        status: u16,
        /// Error message from the API, passed through verbatim
        message: String,
    },

    /// The response body did not match the expected shape
    #[error("Failed to decode search response: {0}")]
    Parse(String),
}

impl NewsError {
    /// The message shown to the user for this failure
    ///
    /// Remote error messages pass through verbatim; everything else uses
    /// the display form.
    pub fn user_message(&self) -> String {
        match self {
            NewsError::Api { message, .. } => message.clone(),
            other => other.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_api_message_passes_through_verbatim() {
        let err = NewsError::Api {
            status: 429,
            message: "API quota exceeded".to_string(),
        };
        assert_eq!(err.user_message(), "API quota exceeded");
    }

    #[test]
    fn test_transport_message_uses_display_form() {
        let err = NewsError::Transport("connection reset".to_string());
        assert_eq!(err.user_message(), "Request failed: connection reset");
    }
}
