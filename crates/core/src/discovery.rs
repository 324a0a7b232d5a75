//! OpenID provider metadata and signing keys

use crate::config::OidcConfig;
use crate::error::{AuthError, AuthResult};
use jsonwebtoken::jwk::JwkSet;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

/// Provider metadata published at `{issuer}/.well-known/openid-configuration`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DiscoveryDocument {
    pub issuer: String,
    pub authorization_endpoint: String,
    pub jwks_uri: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub token_endpoint: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub userinfo_endpoint: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end_session_endpoint: Option<String>,
    #[serde(default)]
    pub scopes_supported: Vec<String>,
    #[serde(default)]
    pub response_types_supported: Vec<String>,
    #[serde(default)]
    pub id_token_signing_alg_values_supported: Vec<String>,
}

impl DiscoveryDocument {
    /// Fetch the document for the configured issuer and check it describes that issuer
    pub async fn fetch(http: &reqwest::Client, config: &OidcConfig) -> AuthResult<Self> {
        Self::fetch_for_issuer(http, config.normalized_issuer()).await
    }

    /// Fetch `{issuer}/.well-known/openid-configuration` and check its `issuer`
    pub async fn fetch_for_issuer(http: &reqwest::Client, issuer: &str) -> AuthResult<Self> {
        let issuer = issuer.trim_end_matches('/');
        let url = format!("{issuer}/.well-known/openid-configuration");
        tracing::debug!("Loading discovery document from {}", url);

        let document: Self = get_json(http, &url).await.map_err(|e| match e {
            AuthError::Serialization(e) => {
                AuthError::Discovery(format!("Malformed discovery document: {e}"))
            }
            other => other,
        })?;
        document.verify_issuer(issuer)?;
        Ok(document)
    }

    /// The provider must describe the issuer it was discovered from
    pub fn verify_issuer(&self, expected: &str) -> AuthResult<()> {
        let found = self.issuer.trim_end_matches('/');
        let expected = expected.trim_end_matches('/');
        if found == expected {
            Ok(())
        } else {
            Err(AuthError::IssuerMismatch {
                expected: expected.to_string(),
                found: found.to_string(),
            })
        }
    }

    /// Fetch the signing keys advertised by `jwks_uri`
    pub async fn fetch_jwks(&self, http: &reqwest::Client) -> AuthResult<JwkSet> {
        tracing::debug!("Loading signing keys from {}", self.jwks_uri);
        let keys: JwkSet = get_json(http, &self.jwks_uri).await?;
        if keys.keys.is_empty() {
            return Err(AuthError::Discovery(format!(
                "No signing keys published at {}",
                self.jwks_uri
            )));
        }
        Ok(keys)
    }
}

/// GET a JSON document, mapping error statuses
pub(crate) async fn get_json<T: DeserializeOwned>(
    http: &reqwest::Client,
    url: &str,
) -> AuthResult<T> {
    let response = http
        .get(url)
        .header(reqwest::header::ACCEPT, "application/json")
        .send()
        .await?;
    let status = response.status();

    if !status.is_success() {
        let message = response.text().await.unwrap_or_else(|_| status.to_string());
        return Err(AuthError::from_status(status, message));
    }

    let body = response.bytes().await?;
    Ok(serde_json::from_slice(&body)?)
}
