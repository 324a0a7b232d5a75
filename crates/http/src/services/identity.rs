//! The caller identity established by bearer-token authentication

use crate::error::HttpError;
use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use serde::{Deserialize, Serialize};

/// Access-token claims the API relies on
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AccessTokenClaims {
    pub sub: String,
    /// Granted scopes
    #[serde(default)]
    pub scp: Vec<String>,
    /// Client the token was issued to
    #[serde(default)]
    pub cid: Option<String>,
    pub exp: i64,
}

/// Authenticated caller, inserted into request extensions by the auth middleware
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthenticatedUser {
    pub subject: String,
    /// Scopes of the presented token
    pub authorities: Vec<String>,
    pub client_id: Option<String>,
}

impl AuthenticatedUser {
    pub fn has_authority(&self, authority: &str) -> bool {
        self.authorities.iter().any(|granted| granted == authority)
    }
}

impl From<AccessTokenClaims> for AuthenticatedUser {
    fn from(claims: AccessTokenClaims) -> Self {
        Self {
            subject: claims.sub,
            authorities: claims.scp,
            client_id: claims.cid,
        }
    }
}

impl<S> FromRequestParts<S> for AuthenticatedUser
where
    S: Send + Sync,
{
    type Rejection = HttpError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<AuthenticatedUser>()
            .cloned()
            .ok_or_else(|| HttpError::AuthenticationFailed("User not authenticated".to_string()))
    }
}
