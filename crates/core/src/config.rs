//! Identity provider configuration

use crate::error::{AuthError, AuthResult};
use serde::{Deserialize, Serialize};
use url::Url;

/// Fixed parameters handed to the OIDC client at startup
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OidcConfig {
    /// Authorization server issuer, e.g. `https://dev-158606.oktapreview.com/oauth2/default`
    pub issuer: String,
    /// Public client identifier registered with the provider
    pub client_id: String,
    /// Space-separated scopes requested at login
    pub scope: String,
    /// Where the provider sends the browser back to; the app's own origin
    pub redirect_uri: String,
    /// Base URL of the provider's authn API (`/api/v1/authn`), used for direct login
    pub authn_url: String,
}

impl OidcConfig {
    pub const DEFAULT_ISSUER: &'static str = "https://dev-158606.oktapreview.com/oauth2/default";
    pub const DEFAULT_CLIENT_ID: &'static str = "0oae4cbu73nJo8r5X0h7";
    pub const DEFAULT_SCOPE: &'static str = "openid profile email";
    pub const DEFAULT_AUTHN_URL: &'static str = "https://dev-158606.oktapreview.com";

    /// Configuration for the default provider with the given redirect URI
    pub fn new(redirect_uri: impl Into<String>) -> Self {
        Self {
            issuer: Self::DEFAULT_ISSUER.to_string(),
            client_id: Self::DEFAULT_CLIENT_ID.to_string(),
            scope: Self::DEFAULT_SCOPE.to_string(),
            redirect_uri: redirect_uri.into(),
            authn_url: Self::DEFAULT_AUTHN_URL.to_string(),
        }
    }

    pub fn with_issuer(mut self, issuer: impl Into<String>) -> Self {
        self.issuer = issuer.into();
        self
    }

    pub fn with_client_id(mut self, client_id: impl Into<String>) -> Self {
        self.client_id = client_id.into();
        self
    }

    pub fn with_scope(mut self, scope: impl Into<String>) -> Self {
        self.scope = scope.into();
        self
    }

    pub fn with_authn_url(mut self, authn_url: impl Into<String>) -> Self {
        self.authn_url = authn_url.into();
        self
    }

    /// Scopes as individual values
    pub fn scopes(&self) -> Vec<String> {
        self.scope.split_whitespace().map(str::to_string).collect()
    }

    /// Issuer without a trailing slash, the form used for comparisons and URL building
    pub fn normalized_issuer(&self) -> &str {
        self.issuer.trim_end_matches('/')
    }

    /// `{issuer}/.well-known/openid-configuration`
    pub fn discovery_url(&self) -> AuthResult<Url> {
        Ok(Url::parse(&format!(
            "{}/.well-known/openid-configuration",
            self.normalized_issuer()
        ))?)
    }

    /// Check the values the flows rely on
    pub fn validate(&self) -> AuthResult<()> {
        if self.client_id.trim().is_empty() {
            return Err(AuthError::Configuration("client_id is required".into()));
        }
        if !self.scopes().iter().any(|s| s == "openid") {
            return Err(AuthError::Configuration("scope must include openid".into()));
        }
        Url::parse(&self.issuer)?;
        Url::parse(&self.redirect_uri)?;
        Url::parse(&self.authn_url)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_match_provider_registration() {
        let config = OidcConfig::new("http://localhost:4200");
        assert_eq!(config.scopes(), vec!["openid", "profile", "email"]);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_discovery_url_ignores_trailing_slash() {
        let config = OidcConfig::new("http://localhost:4200")
            .with_issuer("https://idp.test/oauth2/default/");
        assert_eq!(
            config.discovery_url().unwrap().as_str(),
            "https://idp.test/oauth2/default/.well-known/openid-configuration"
        );
    }

    #[test]
    fn test_validate_requires_openid_scope() {
        let config = OidcConfig::new("http://localhost:4200").with_scope("profile email");
        assert!(matches!(config.validate(), Err(AuthError::Configuration(_))));
    }

    #[test]
    fn test_validate_requires_client_id() {
        let config = OidcConfig::new("http://localhost:4200").with_client_id("  ");
        assert!(matches!(config.validate(), Err(AuthError::Configuration(_))));
    }
}
