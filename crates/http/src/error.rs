//! HTTP error types and implementations

#[cfg(feature = "server")]
use axum::{
    Json,
    http::{HeaderValue, StatusCode, header},
    response::{IntoResponse, Response},
};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// HTTP-specific errors
#[derive(Error, Debug)]
pub enum HttpError {
    /// Missing, malformed, expired or untrusted bearer token
    #[error("Authentication failed: {0}")]
    AuthenticationFailed(String),

    /// Valid token without the scope the route needs
    #[error("Authorization failed: {0}")]
    AuthorizationFailed(String),

    #[error("Internal server error: {0}")]
    InternalServerError(String),

    /// The identity provider could not be reached to verify a token
    #[error("Service unavailable: {0}")]
    ServiceUnavailable(String),
}

/// JSON body of every error response
///
/// `error` is a stable machine-readable code, `message` the human-readable detail.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
    pub message: String,
}

#[cfg(feature = "server")]
impl IntoResponse for HttpError {
    fn into_response(self) -> Response {
        let (status, error_type) = match &self {
            HttpError::AuthenticationFailed(_) => {
                (StatusCode::UNAUTHORIZED, "authentication_failed")
            }
            HttpError::AuthorizationFailed(_) => (StatusCode::FORBIDDEN, "authorization_failed"),
            HttpError::InternalServerError(_) => {
                (StatusCode::INTERNAL_SERVER_ERROR, "internal_server_error")
            }
            HttpError::ServiceUnavailable(_) => {
                (StatusCode::SERVICE_UNAVAILABLE, "service_unavailable")
            }
        };

        let body = ErrorResponse {
            error: error_type.to_string(),
            message: self.to_string(),
        };

        let mut response = (status, Json(body)).into_response();
        if status == StatusCode::UNAUTHORIZED {
            response
                .headers_mut()
                .insert(header::WWW_AUTHENTICATE, HeaderValue::from_static("Bearer"));
        }
        response
    }
}

#[cfg(feature = "server")]
impl From<taproom_core::AuthError> for HttpError {
    fn from(e: taproom_core::AuthError) -> Self {
        use taproom_core::AuthError;

        match e {
            AuthError::Request(_) | AuthError::Status { .. } | AuthError::Discovery(_) => {
                Self::ServiceUnavailable(e.to_string())
            }
            AuthError::Configuration(_) | AuthError::IssuerMismatch { .. } => {
                Self::InternalServerError(e.to_string())
            }
            other => Self::AuthenticationFailed(other.to_string()),
        }
    }
}

/// Result type alias using HttpError
pub type Result<T> = std::result::Result<T, HttpError>;
