//! Direct-credential authentication against the provider's authn API
//!
//! A username/password pair is exchanged for a short-lived session token, which is then
//! traded for ID and access tokens without showing the provider's login page.

use crate::error::{AuthError, AuthResult};
use crate::fragment::TokenFragment;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::fmt;
use url::Url;

/// Response of `POST /api/v1/authn`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SignInResponse {
    /// Transaction status; only `SUCCESS` yields a session token
    pub status: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub session_token: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expires_at: Option<String>,
}

impl SignInResponse {
    pub const SUCCESS: &'static str = "SUCCESS";

    pub fn is_success(&self) -> bool {
        self.status == Self::SUCCESS
    }
}

/// Parameters for retrieving tokens with a session token and no prompt
#[derive(Clone)]
pub struct TokenRequest {
    pub client_id: String,
    pub response_types: Vec<String>,
    pub scopes: Vec<String>,
    pub session_token: String,
    pub nonce: String,
    pub state: String,
    pub redirect_uri: String,
}

impl TokenRequest {
    /// Authorization URL carrying the session token, with `prompt=none`
    pub fn authorize_url(&self, authorization_endpoint: &str, response_mode: &str) -> AuthResult<Url> {
        let mut url = Url::parse(authorization_endpoint)?;
        url.query_pairs_mut()
            .append_pair("client_id", &self.client_id)
            .append_pair("response_type", &self.response_types.join(" "))
            .append_pair("scope", &self.scopes.join(" "))
            .append_pair("redirect_uri", &self.redirect_uri)
            .append_pair("nonce", &self.nonce)
            .append_pair("state", &self.state)
            .append_pair("prompt", "none")
            .append_pair("response_mode", response_mode)
            .append_pair("sessionToken", &self.session_token);
        Ok(url)
    }
}

impl fmt::Debug for TokenRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TokenRequest")
            .field("client_id", &self.client_id)
            .field("response_types", &self.response_types)
            .field("scopes", &self.scopes)
            .field("session_token", &"<redacted>")
            .field("redirect_uri", &self.redirect_uri)
            .finish_non_exhaustive()
    }
}

/// ID and access token returned by the authorization endpoint
#[derive(Clone, PartialEq, Eq)]
pub struct ProviderTokens {
    pub id_token: String,
    pub access_token: String,
    pub expires_in: Option<i64>,
}

impl ProviderTokens {
    /// Extract both tokens from a parsed redirect fragment
    pub fn from_fragment(fragment: TokenFragment) -> AuthResult<Self> {
        if let Some(message) = fragment.error_message() {
            return Err(AuthError::Provider(message));
        }
        Ok(Self {
            id_token: fragment.id_token.ok_or(AuthError::MissingToken("id_token"))?,
            access_token: fragment
                .access_token
                .ok_or(AuthError::MissingToken("access_token"))?,
            expires_in: fragment.expires_in,
        })
    }

    /// Fragment form accepted by [`OidcClient::try_login`](crate::OidcClient::try_login)
    pub fn to_fragment(&self) -> String {
        TokenFragment::encode(&self.id_token, &self.access_token, self.expires_in)
    }
}

impl fmt::Debug for ProviderTokens {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ProviderTokens")
            .field("expires_in", &self.expires_in)
            .finish_non_exhaustive()
    }
}

/// The provider's authn API
#[cfg_attr(target_arch = "wasm32", async_trait(?Send))]
#[cfg_attr(not(target_arch = "wasm32"), async_trait)]
pub trait AuthnClient {
    /// Exchange credentials for a transaction status and, on success, a session token
    async fn sign_in(&self, username: &str, password: &str) -> AuthResult<SignInResponse>;

    /// Trade a session token for ID and access tokens without prompting
    async fn get_without_prompt(
        &self,
        authorization_endpoint: &str,
        request: &TokenRequest,
    ) -> AuthResult<ProviderTokens>;
}

#[derive(Serialize)]
struct SignInRequest<'a> {
    username: &'a str,
    password: &'a str,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct AuthnErrorBody {
    error_summary: Option<String>,
}

/// [`AuthnClient`] over HTTP
///
/// Token retrieval reads the fragment of the authorization endpoint's redirect, so redirects
/// are not followed.
#[derive(Clone)]
pub struct HttpAuthnClient {
    http: reqwest::Client,
    base_url: String,
}

impl HttpAuthnClient {
    const USER_AGENT: &'static str = concat!("taproom/", env!("CARGO_PKG_VERSION"));

    /// Create a client for the org at `base_url`
    pub fn new(base_url: impl Into<String>) -> AuthResult<Self> {
        let base_url = base_url.into().trim_end_matches('/').to_string();

        #[cfg(not(target_arch = "wasm32"))]
        let http = reqwest::Client::builder()
            .user_agent(Self::USER_AGENT)
            .redirect(reqwest::redirect::Policy::none())
            .build()?;

        #[cfg(target_arch = "wasm32")]
        let http = reqwest::Client::builder()
            .user_agent(Self::USER_AGENT)
            .build()?;

        Ok(Self { http, base_url })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }
}

#[cfg_attr(target_arch = "wasm32", async_trait(?Send))]
#[cfg_attr(not(target_arch = "wasm32"), async_trait)]
impl AuthnClient for HttpAuthnClient {
    async fn sign_in(&self, username: &str, password: &str) -> AuthResult<SignInResponse> {
        let url = format!("{}/api/v1/authn", self.base_url);
        tracing::debug!("Signing in at {}", url);

        let response = self
            .http
            .post(url)
            .json(&SignInRequest { username, password })
            .send()
            .await?;
        let status = response.status();

        if status.is_success() {
            return Ok(response.json().await?);
        }

        let body = response.text().await.unwrap_or_default();
        let message = serde_json::from_str::<AuthnErrorBody>(&body)
            .ok()
            .and_then(|error| error.error_summary)
            .unwrap_or_else(|| status.to_string());
        Err(AuthError::from_status(status, message))
    }

    async fn get_without_prompt(
        &self,
        authorization_endpoint: &str,
        request: &TokenRequest,
    ) -> AuthResult<ProviderTokens> {
        let url = request.authorize_url(authorization_endpoint, "fragment")?;
        let response = self.http.get(url).send().await?;
        let status = response.status();

        let redirect = match response.headers().get(reqwest::header::LOCATION) {
            Some(location) => {
                let location = location
                    .to_str()
                    .map_err(|_| AuthError::Provider("Unreadable redirect location".into()))?;
                response.url().join(location)?
            }
            None if status.is_success() => response.url().clone(),
            None => {
                let message = response.text().await.unwrap_or_else(|_| status.to_string());
                return Err(AuthError::from_status(status, message));
            }
        };

        let fragment =
            TokenFragment::from_url(&redirect).ok_or(AuthError::MissingToken("token fragment"))?;
        if fragment.state.as_deref().is_some_and(|state| state != request.state) {
            return Err(AuthError::StateMismatch);
        }
        ProviderTokens::from_fragment(fragment)
    }
}
