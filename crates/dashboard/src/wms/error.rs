//! Error types for the WMS API client.

use thiserror::Error;

/// Errors from talking to the warehouse management API.
///
/// The API treats every non-2xx status uniformly as "operation failed"; the
/// status and the server's `message` field (when present) are carried along
/// so the UI can surface them.
#[derive(Debug, Error)]
pub enum WmsError {
    /// Network or transport failure.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The API answered with a non-2xx status.
    #[error("{message}")]
    Api {
        /// HTTP status returned by the API.
        status: reqwest::StatusCode,
        /// Server-provided message, or the status reason phrase.
        message: String,
    },

    /// The API returned a body that could not be decoded.
    #[error("Failed to parse API response: {0}")]
    Parse(#[from] serde_json::Error),

    /// A successful login response carried no session cookie.
    #[error("Login response did not include a session cookie")]
    MissingSessionCookie,
}

impl WmsError {
    /// Whether the API rejected the session (expired or missing cookie).
    #[must_use]
    pub fn is_unauthorized(&self) -> bool {
        matches!(self, Self::Api { status, .. } if *status == reqwest::StatusCode::UNAUTHORIZED)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_api_error_display_uses_server_message() {
        let err = WmsError::Api {
            status: reqwest::StatusCode::UNAUTHORIZED,
            message: "Invalid credentials".to_string(),
        };
        assert_eq!(err.to_string(), "Invalid credentials");
        assert!(err.is_unauthorized());
    }

    #[test]
    fn test_non_auth_status_is_not_unauthorized() {
        let err = WmsError::Api {
            status: reqwest::StatusCode::INTERNAL_SERVER_ERROR,
            message: "boom".to_string(),
        };
        assert!(!err.is_unauthorized());
    }
}
