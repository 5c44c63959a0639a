//! Blog API errors.

use thiserror::Error;

/// Errors that can occur when talking to the blog API.
///
/// Callers that follow the dashboard's log-and-continue policy only need to
/// tell a network failure from a server rejection; see
/// [`ApiError::is_network_failure`] and [`ApiError::server_message`].
#[derive(Debug, Error)]
pub enum ApiError {
    /// The request never produced a response (connection refused, reset, timeout).
    #[error("Blog API request failed: {0}")]
    Network(String),

    /// The API answered with a non-success status.
    #[error("Blog API rejected request ({status}): {message}")]
    Rejected { status: u16, message: String },

    /// The response body could not be read or parsed.
    #[error("Blog API response error: {0}")]
    Decode(String),

    /// An endpoint URL could not be built from the configured base URL.
    #[error("Invalid blog API URL: {0}")]
    InvalidUrl(String),
}

impl ApiError {
    /// Whether the failure happened before the server could reject the request.
    #[must_use]
    pub const fn is_network_failure(&self) -> bool {
        !matches!(self, Self::Rejected { .. })
    }

    /// Message sent back by the server, if it rejected the request.
    #[must_use]
    pub fn server_message(&self) -> Option<&str> {
        match self {
            Self::Rejected { message, .. } => Some(message),
            _ => None,
        }
    }
}

impl From<reqwest::Error> for ApiError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            Self::Decode(err.to_string())
        } else {
            Self::Network(err.to_string())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rejected_exposes_message() {
        let err = ApiError::Rejected {
            status: 403,
            message: "You are not allowed to delete this post".to_string(),
        };
        assert!(!err.is_network_failure());
        assert_eq!(
            err.server_message(),
            Some("You are not allowed to delete this post")
        );
        assert_eq!(
            err.to_string(),
            "Blog API rejected request (403): You are not allowed to delete this post"
        );
    }

    #[test]
    fn test_network_has_no_message() {
        let err = ApiError::Network("connection refused".to_string());
        assert!(err.is_network_failure());
        assert!(err.server_message().is_none());
    }
}
