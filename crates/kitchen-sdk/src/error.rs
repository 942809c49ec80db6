//! SDK error types.
//!
//! [`SdkError`] is the single error type returned by every fallible
//! operation in the SDK. It separates "could not reach the server"
//! ([`SdkError::Network`], status `0`) from "the server answered with an
//! error" ([`SdkError::Http`], carrying the status and parsed body).
//!
//! [`RefreshError`] describes why a token refresh failed. It is `Clone`
//! because a single refresh outcome is handed to every caller waiting on it.

use kitchen_models::ModelError;
use serde_json::Value;

/// Error type for all SDK operations.
#[derive(Debug, thiserror::Error)]
pub enum SdkError {
    /// The request never produced a response (DNS, refused connection,
    /// TLS, interrupted body).
    #[error("could not reach {url}: {source}")]
    Network {
        /// Absolute URL of the failed request.
        url: String,
        /// Underlying transport error.
        #[source]
        source: reqwest::Error,
    },

    /// The server answered with a non-success status.
    #[error("{message}")]
    Http {
        /// HTTP status code.
        status: u16,
        /// Human-readable message extracted from the body.
        message: String,
        /// Parsed response body (`{}` when empty or malformed).
        body: Value,
    },

    /// Obtaining a new access token failed.
    #[error("token refresh failed: {0}")]
    Refresh(#[from] RefreshError),

    /// The credential store could not be read or written.
    #[error("credential storage error: {0}")]
    Storage(String),

    /// A header value could not be encoded.
    #[error("invalid header value: {0}")]
    Header(String),

    /// Invalid or missing configuration (e.g. bad base URL).
    #[error("configuration error: {0}")]
    Config(String),

    /// A payload did not match the expected model.
    #[error("invalid model: {0}")]
    Model(#[from] ModelError),

    /// JSON serialization / deserialization error.
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Generic I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl SdkError {
    /// HTTP status associated with this error.
    ///
    /// `0` when no HTTP response was involved, `401` for refresh failures.
    pub fn status(&self) -> u16 {
        match self {
            Self::Http { status, .. } => *status,
            Self::Refresh(_) => 401,
            _ => 0,
        }
    }

    /// Parsed backend payload, for errors that carry one.
    pub fn body(&self) -> Option<&Value> {
        match self {
            Self::Http { body, .. } => Some(body),
            _ => None,
        }
    }

    /// Whether the error means the user has to sign in again.
    pub fn is_unauthorized(&self) -> bool {
        self.status() == 401
    }
}

/// Why a token refresh failed.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RefreshError {
    /// No refresh token is stored; the refresh endpoint was not called.
    #[error("no refresh token")]
    MissingRefreshToken,

    /// The backend rejected the refresh token.
    #[error("refresh rejected ({status}): {message}")]
    Rejected {
        /// HTTP status returned by the refresh endpoint.
        status: u16,
        /// Message extracted from the body.
        message: String,
    },

    /// The backend answered 2xx without an `access` token.
    #[error("no access token returned")]
    MissingAccessToken,

    /// The refresh endpoint could not be reached.
    #[error("network error: {0}")]
    Network(String),

    /// The new token could not be persisted, or the request could not be
    /// built.
    #[error("{0}")]
    Internal(String),
}

impl From<SdkError> for RefreshError {
    fn from(err: SdkError) -> Self {
        match err {
            SdkError::Http {
                status, message, ..
            } => Self::Rejected { status, message },
            SdkError::Network { .. } => Self::Network(err.to_string()),
            SdkError::Refresh(inner) => inner,
            other => Self::Internal(other.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn http_error_exposes_status_and_body() {
        let err = SdkError::Http {
            status: 400,
            message: "Name is required".into(),
            body: json!({"detail": "Name is required"}),
        };
        assert_eq!(err.status(), 400);
        assert_eq!(err.to_string(), "Name is required");
        assert_eq!(err.body().unwrap()["detail"], "Name is required");
        assert!(!err.is_unauthorized());
    }

    #[test]
    fn non_http_errors_have_status_zero() {
        let err = SdkError::Storage("disk full".into());
        assert_eq!(err.status(), 0);
        assert!(err.body().is_none());
    }

    #[test]
    fn refresh_errors_count_as_unauthorized() {
        let err = SdkError::from(RefreshError::MissingRefreshToken);
        assert!(err.is_unauthorized());
        assert_eq!(err.to_string(), "token refresh failed: no refresh token");
    }

    #[test]
    fn http_error_converts_to_rejected_refresh() {
        let err = SdkError::Http {
            status: 401,
            message: "Token is invalid or expired".into(),
            body: json!({}),
        };
        assert_eq!(
            RefreshError::from(err),
            RefreshError::Rejected {
                status: 401,
                message: "Token is invalid or expired".into()
            }
        );
    }
}
