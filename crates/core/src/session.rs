//! Session state and the explicit context handle that owns it

use crate::claims::IdentityClaims;
use arc_swap::ArcSwapOption;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;

/// Tokens and identity of the signed-in user
#[derive(Clone, PartialEq, Serialize, Deserialize)]
pub struct Session {
    pub access_token: String,
    #[serde(default)]
    pub id_token: Option<String>,
    #[serde(default)]
    pub claims: Option<IdentityClaims>,
    #[serde(default)]
    pub expires_at: Option<DateTime<Utc>>,
}

impl Session {
    pub fn new(access_token: impl Into<String>) -> Self {
        Self {
            access_token: access_token.into(),
            id_token: None,
            claims: None,
            expires_at: None,
        }
    }

    pub fn with_id_token(mut self, id_token: impl Into<String>) -> Self {
        self.id_token = Some(id_token.into());
        self
    }

    pub fn with_claims(mut self, claims: IdentityClaims) -> Self {
        self.claims = Some(claims);
        self
    }

    pub fn with_expiry(mut self, expires_at: DateTime<Utc>) -> Self {
        self.expires_at = Some(expires_at);
        self
    }

    /// Whether the session had expired at `now`; sessions without an expiry never do
    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        self.expires_at.is_some_and(|expires_at| now >= expires_at)
    }

    pub fn is_expired(&self) -> bool {
        self.is_expired_at(Utc::now())
    }

    /// A session is usable when it carries a non-empty token that has not expired
    pub fn is_valid(&self) -> bool {
        !self.access_token.trim().is_empty() && !self.is_expired()
    }

    /// `Bearer <access_token>`
    pub fn authorization_header(&self) -> String {
        format!("Bearer {}", self.access_token)
    }
}

// Tokens stay out of logs.
impl fmt::Debug for Session {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Session")
            .field("access_token", &"<redacted>")
            .field("id_token", &self.id_token.as_ref().map(|_| "<redacted>"))
            .field("claims", &self.claims)
            .field("expires_at", &self.expires_at)
            .finish()
    }
}

/// Shared handle to the current session
///
/// Cloning the context shares the session: every clone observes `establish` and `clear` made
/// through any other. Readers never see an expired session; it reads as absent.
#[derive(Clone)]
pub struct SessionContext {
    current: Arc<ArcSwapOption<Session>>,
}

impl SessionContext {
    /// Create an empty (signed-out) context
    pub fn new() -> Self {
        Self {
            current: Arc::new(ArcSwapOption::empty()),
        }
    }

    /// Replace the current session after a successful login
    pub fn establish(&self, session: Session) {
        tracing::debug!(
            subject = session.claims.as_ref().map(|c| c.sub.as_str()),
            "Session established"
        );
        self.current.store(Some(Arc::new(session)));
    }

    /// Drop the current session, returning it if there was one
    pub fn clear(&self) -> Option<Arc<Session>> {
        let previous = self.current.swap(None);
        if previous.is_some() {
            tracing::debug!("Session cleared");
        }
        previous
    }

    /// The current session, if one exists and is still valid
    pub fn current(&self) -> Option<Arc<Session>> {
        self.current.load_full().filter(|session| session.is_valid())
    }

    pub fn identity_claims(&self) -> Option<IdentityClaims> {
        self.current().and_then(|session| session.claims.clone())
    }

    pub fn access_token(&self) -> Option<String> {
        self.current().map(|session| session.access_token.clone())
    }

    pub fn id_token(&self) -> Option<String> {
        self.current().and_then(|session| session.id_token.clone())
    }

    pub fn has_valid_token(&self) -> bool {
        self.current().is_some()
    }

    /// Header value for an outbound request, computed from the session at call time
    pub fn authorization_header(&self) -> Option<String> {
        self.current().map(|session| session.authorization_header())
    }
}

impl Default for SessionContext {
    fn default() -> Self {
        Self::new()
    }
}

impl PartialEq for SessionContext {
    fn eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.current, &other.current)
    }
}

impl fmt::Debug for SessionContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SessionContext")
            .field("session", &self.current.load_full())
            .finish()
    }
}
