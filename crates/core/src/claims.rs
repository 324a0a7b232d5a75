//! Identity claims carried by the ID token

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Profile attributes the provider asserts about the signed-in user
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IdentityClaims {
    /// Subject (user ID)
    pub sub: String,
    /// Full display name
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub given_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub family_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub preferred_username: Option<String>,
    /// Everything else the token carried (`iss`, `aud`, `exp`, `nonce`, ...)
    #[serde(flatten)]
    pub extra: HashMap<String, serde_json::Value>,
}

impl IdentityClaims {
    pub fn new(sub: impl Into<String>) -> Self {
        Self {
            sub: sub.into(),
            name: None,
            given_name: None,
            family_name: None,
            email: None,
            preferred_username: None,
            extra: HashMap::new(),
        }
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn with_email(mut self, email: impl Into<String>) -> Self {
        self.email = Some(email.into());
        self
    }

    /// Name to greet the user with
    ///
    /// Falls back from `name` to `given_name`, `preferred_username`, `email` and finally `sub`,
    /// so a signed-in user always has something to be welcomed by.
    pub fn display_name(&self) -> &str {
        [
            &self.name,
            &self.given_name,
            &self.preferred_username,
            &self.email,
        ]
            .into_iter()
            .flatten()
            .map(String::as_str)
            .find(|value| !value.trim().is_empty())
            .unwrap_or(&self.sub)
    }

    /// Expiry of the token these claims came from, as a Unix timestamp
    pub fn expires_at(&self) -> Option<i64> {
        self.extra.get("exp").and_then(serde_json::Value::as_i64)
    }

    /// The `nonce` claim, echoed back by the provider
    pub fn nonce(&self) -> Option<&str> {
        self.extra.get("nonce").and_then(serde_json::Value::as_str)
    }

    /// The `at_hash` claim binding the ID token to its access token
    pub fn access_token_hash(&self) -> Option<&str> {
        self.extra.get("at_hash").and_then(serde_json::Value::as_str)
    }
}
