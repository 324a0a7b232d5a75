//! Type-safe API clients that enforce authentication requirements at compile time

use super::ClientError;
use crate::types::HealthResponse;
use reqwest::{Client, ClientBuilder, header};
use std::time::Duration;
use taproom_core::SessionContext;

const USER_AGENT: &str = concat!("taproom-client/", env!("CARGO_PKG_VERSION"));

/// Client for public endpoints that don't require authentication
#[derive(Clone)]
pub struct PublicApiClient {
    client: Client,
    base_url: String,
}

/// Client for endpoints that require the signed-in user's access token
///
/// The token is read from the [`SessionContext`] when each request is built, so a logout or
/// a fresh login is reflected on the very next call.
#[derive(Clone)]
pub struct AuthenticatedApiClient {
    client: Client,
    base_url: String,
    session: SessionContext,
}

fn build_http_client(timeout: Option<Duration>) -> Result<Client, ClientError> {
    #[cfg(not(target_arch = "wasm32"))]
    let client = {
        let mut builder = ClientBuilder::new().user_agent(USER_AGENT);
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }
        builder.build()?
    };

    #[cfg(target_arch = "wasm32")]
    let client = {
        let _ = timeout; // Timeouts not supported on WASM
        ClientBuilder::new().user_agent(USER_AGENT).build()?
    };

    Ok(client)
}

/// Send a request, decoding a success body as JSON and mapping error statuses
async fn execute<T: serde::de::DeserializeOwned>(
    request: reqwest::RequestBuilder,
) -> Result<T, ClientError> {
    let response = request.send().await?;
    let status = response.status();

    if status.is_success() {
        Ok(response.json().await?)
    } else {
        let message = response.text().await.unwrap_or_else(|_| status.to_string());
        Err(ClientError::from_status(status, message))
    }
}

impl PublicApiClient {
    /// Create a new public client
    pub fn new(base_url: impl Into<String>) -> Result<Self, ClientError> {
        Self::new_with_timeout(base_url, None)
    }

    fn new_with_timeout(
        base_url: impl Into<String>,
        timeout: Option<Duration>,
    ) -> Result<Self, ClientError> {
        Ok(Self {
            client: build_http_client(timeout)?,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Create a request builder without authentication
    pub fn request(&self, method: reqwest::Method, path: &str) -> reqwest::RequestBuilder {
        let url = format!("{}{}", self.base_url, path);
        self.client.request(method, url)
    }

    /// Execute a request and handle common errors
    pub async fn execute<T: serde::de::DeserializeOwned>(
        &self,
        request: reqwest::RequestBuilder,
    ) -> Result<T, ClientError> {
        execute(request).await
    }

    /// `GET /health`
    pub async fn health(&self) -> Result<HealthResponse, ClientError> {
        self.execute(self.request(reqwest::Method::GET, "/health"))
            .await
    }

    /// Bind this client to a session to reach protected endpoints
    pub fn authenticate(self, session: SessionContext) -> AuthenticatedApiClient {
        AuthenticatedApiClient {
            client: self.client,
            base_url: self.base_url,
            session,
        }
    }
}

impl AuthenticatedApiClient {
    /// Create a new authenticated client
    pub fn new(base_url: impl Into<String>, session: SessionContext) -> Result<Self, ClientError> {
        Self::new_with_timeout(base_url, session, None)
    }

    fn new_with_timeout(
        base_url: impl Into<String>,
        session: SessionContext,
        timeout: Option<Duration>,
    ) -> Result<Self, ClientError> {
        Ok(Self {
            client: build_http_client(timeout)?,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            session,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn session(&self) -> &SessionContext {
        &self.session
    }

    /// Create a request builder carrying `Authorization: Bearer <token>`
    ///
    /// Fails with [`ClientError::MissingSession`] when no valid session exists; nothing is
    /// sent in that case.
    pub fn request(
        &self,
        method: reqwest::Method,
        path: &str,
    ) -> Result<reqwest::RequestBuilder, ClientError> {
        let authorization = self
            .session
            .authorization_header()
            .ok_or(ClientError::MissingSession)?;
        let url = format!("{}{}", self.base_url, path);
        Ok(self
            .client
            .request(method, url)
            .header(header::AUTHORIZATION, authorization))
    }

    /// Execute a request and handle common errors
    pub async fn execute<T: serde::de::DeserializeOwned>(
        &self,
        request: reqwest::RequestBuilder,
    ) -> Result<T, ClientError> {
        execute(request).await
    }
}

/// Type-safe builder that creates the appropriate client type
pub struct TypedClientBuilder {
    base_url: Option<String>,
    timeout: Option<Duration>,
}

impl TypedClientBuilder {
    pub fn new() -> Self {
        Self {
            base_url: None,
            timeout: None,
        }
    }

    pub fn base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = Some(url.into());
        self
    }

    /// Set the request timeout
    #[cfg(not(target_arch = "wasm32"))]
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    pub fn build_public(self) -> Result<PublicApiClient, ClientError> {
        let base_url = self
            .base_url
            .ok_or_else(|| ClientError::Configuration("base_url is required".into()))?;

        PublicApiClient::new_with_timeout(base_url, self.timeout)
    }

    pub fn build_authenticated(
        self,
        session: SessionContext,
    ) -> Result<AuthenticatedApiClient, ClientError> {
        let base_url = self
            .base_url
            .ok_or_else(|| ClientError::Configuration("base_url is required".into()))?;

        AuthenticatedApiClient::new_with_timeout(base_url, session, self.timeout)
    }
}

impl Default for TypedClientBuilder {
    fn default() -> Self {
        Self::new()
    }
}
