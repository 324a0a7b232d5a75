//! Bearer-token authentication middleware

use crate::error::HttpError;
use crate::services::{AuthenticatedUser, TokenProvider};
use crate::state::AppState;
use async_trait::async_trait;
use axum::{
    extract::{Request, State},
    http::{header, request::Parts},
    middleware::Next,
    response::Response,
};

/// Trait for authentication providers
#[async_trait]
pub trait AuthProvider: Send + Sync {
    /// Authenticate a request and return the caller if successful
    async fn authenticate(&self, parts: &Parts) -> Result<AuthenticatedUser, HttpError>;

    /// Check if authentication should be skipped for a given path
    fn should_skip_auth(&self, path: &str) -> bool {
        path == "/health"
    }
}

#[async_trait]
impl AuthProvider for TokenProvider {
    async fn authenticate(&self, parts: &Parts) -> Result<AuthenticatedUser, HttpError> {
        let auth_header = parts
            .headers
            .get(header::AUTHORIZATION)
            .and_then(|value| value.to_str().ok())
            .ok_or_else(|| {
                HttpError::AuthenticationFailed("Missing authorization header".to_string())
            })?;

        let token = Self::extract_bearer_token(auth_header)?;
        self.authenticate_token(token).await
    }
}

/// Middleware function for authentication
pub async fn auth_middleware(
    State(state): State<AppState>,
    req: Request,
    next: Next,
) -> Result<Response, HttpError> {
    if state.auth.should_skip_auth(req.uri().path()) {
        return Ok(next.run(req).await);
    }

    let (mut parts, body) = req.into_parts();

    match state.auth.authenticate(&parts).await {
        Ok(user) => {
            parts.extensions.insert(user);
            Ok(next.run(Request::from_parts(parts, body)).await)
        }
        Err(e) => {
            debug!(path = %parts.uri.path(), "Rejected request: {}", e);
            Err(e)
        }
    }
}
