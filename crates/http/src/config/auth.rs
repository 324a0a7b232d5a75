//! Bearer-token validation settings

use serde::{Deserialize, Serialize};

/// How the API checks incoming access tokens
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResourceServerConfig {
    /// Authorization server whose tokens are accepted
    pub issuer: String,
    /// Required `aud` claim
    #[serde(default = "default_audience")]
    pub audience: String,
    /// Allowed clock skew in seconds
    #[serde(default = "default_leeway_seconds")]
    pub leeway_seconds: u64,
    /// Scopes a token must carry, any one of them; empty accepts every scope
    #[serde(default)]
    pub required_scopes: Vec<String>,
}

fn default_audience() -> String {
    ResourceServerConfig::DEFAULT_AUDIENCE.to_string()
}

fn default_leeway_seconds() -> u64 {
    taproom_core::TokenValidator::DEFAULT_LEEWAY_SECS
}

impl ResourceServerConfig {
    pub const DEFAULT_AUDIENCE: &'static str = "api://default";

    pub fn new(issuer: impl Into<String>) -> Self {
        Self {
            issuer: issuer.into(),
            audience: default_audience(),
            leeway_seconds: default_leeway_seconds(),
            required_scopes: Vec::new(),
        }
    }

    pub fn with_audience(mut self, audience: impl Into<String>) -> Self {
        self.audience = audience.into();
        self
    }

    pub fn with_required_scopes<I, S>(mut self, scopes: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.required_scopes = scopes.into_iter().map(Into::into).collect();
        self
    }
}

impl Default for ResourceServerConfig {
    fn default() -> Self {
        Self::new(taproom_core::OidcConfig::DEFAULT_ISSUER)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_fill_missing_fields() {
        let config: ResourceServerConfig =
            serde_json::from_str(r#"{"issuer":"https://idp.test/oauth2/default"}"#).unwrap();
        assert_eq!(config.audience, "api://default");
        assert_eq!(config.leeway_seconds, 30);
        assert!(config.required_scopes.is_empty());
    }
}
