//! Client error types.

use thiserror::Error;

/// Errors from session persistence.
#[derive(Debug, Error)]
pub enum SessionError {
    /// The session file could not be read or written.
    #[error("session storage failed: {0}")]
    Io(#[from] std::io::Error),

    /// The session file is not valid JSON.
    #[error("stored session is corrupt: {0}")]
    Corrupt(#[from] serde_json::Error),
}

/// Errors from API calls.
#[derive(Debug, Error)]
pub enum ClientError {
    /// The request did not reach the server or the connection failed.
    #[error("network error: {0}")]
    Network(String),

    /// The request did not complete in time.
    #[error("request timed out")]
    Timeout,

    /// The server answered with a non-success status.
    #[error("server returned {status}: {message}")]
    Status {
        /// HTTP status code.
        status: u16,
        /// `message` from the error body, or the status reason.
        message: String,
    },

    /// The response body had an unexpected shape.
    #[error("malformed response: {0}")]
    Malformed(String),

    /// The session could not be stored.
    #[error(transparent)]
    Session(#[from] SessionError),
}

impl ClientError {
    /// Returns true for a 401 response.
    #[must_use]
    pub const fn is_unauthorized(&self) -> bool {
        matches!(self, Self::Status { status: 401, .. })
    }
}

impl From<reqwest::Error> for ClientError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            Self::Timeout
        } else if err.is_decode() {
            Self::Malformed(err.to_string())
        } else {
            Self::Network(err.to_string())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn status(code: u16) -> ClientError {
        ClientError::Status {
            status: code,
            message: "nope".into(),
        }
    }

    #[rstest]
    #[case(status(401), true)]
    #[case(status(403), false)]
    #[case(status(500), false)]
    #[case(ClientError::Timeout, false)]
    #[case(ClientError::Network("refused".into()), false)]
    fn test_is_unauthorized(#[case] err: ClientError, #[case] expected: bool) {
        assert_eq!(err.is_unauthorized(), expected);
    }

    #[test]
    fn test_status_display() {
        assert_eq!(status(404).to_string(), "server returned 404: nope");
    }

    #[test]
    fn test_corrupt_session_converts() {
        let err = serde_json::from_str::<serde_json::Value>("{").unwrap_err();
        let client: ClientError = SessionError::from(err).into();
        assert!(client.to_string().starts_with("stored session is corrupt"));
    }
}
