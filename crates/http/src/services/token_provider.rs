//! Access-token verification against the identity provider's published keys

use crate::config::ResourceServerConfig;
use crate::error::HttpError;
use crate::services::identity::{AccessTokenClaims, AuthenticatedUser};
use std::sync::Arc;
use std::time::Duration;
use taproom_core::{DiscoveryDocument, TokenValidator};
use tokio::sync::RwLock;
use tokio::time::Instant;

/// Minimum time between refetches triggered by an unknown key id
pub const KEY_REFRESH_COOLDOWN: Duration = Duration::from_secs(60);

#[derive(Debug)]
struct CachedKeys {
    document: DiscoveryDocument,
    validator: Arc<TokenValidator>,
    /// When an unknown key id last caused a refetch; `None` until the first rotation
    rotated_at: Option<Instant>,
}

impl CachedKeys {
    fn rotation_allowed(&self) -> bool {
        self.rotated_at
            .is_none_or(|at| at.elapsed() >= KEY_REFRESH_COOLDOWN)
    }
}

/// Verifies bearer tokens issued by the configured authorization server
///
/// The discovery document and JWKS are fetched on first use and cached. A token signed with
/// a key id the cache does not know triggers a JWKS refetch, which picks up key rotation. At
/// most one such refetch happens per [`KEY_REFRESH_COOLDOWN`]; other unknown key ids are
/// rejected without contacting the provider.
pub struct TokenProvider {
    config: ResourceServerConfig,
    http: reqwest::Client,
    cache: RwLock<Option<CachedKeys>>,
}

impl TokenProvider {
    pub fn new(config: ResourceServerConfig) -> Self {
        Self::with_http_client(config, reqwest::Client::new())
    }

    pub fn with_http_client(config: ResourceServerConfig, http: reqwest::Client) -> Self {
        Self {
            config,
            http,
            cache: RwLock::new(None),
        }
    }

    pub fn config(&self) -> &ResourceServerConfig {
        &self.config
    }

    /// Validate a token and return the caller it identifies
    #[tracing::instrument(name = "auth.validate_token", skip_all)]
    pub async fn authenticate_token(&self, token: &str) -> Result<AuthenticatedUser, HttpError> {
        let header = jsonwebtoken::decode_header(token)
            .map_err(|e| HttpError::AuthenticationFailed(format!("Malformed token: {e}")))?;

        let validator = self.validator_for(header.kid.as_deref()).await?;
        let claims: AccessTokenClaims = validator.validate(token)?;
        let user = AuthenticatedUser::from(claims);

        if !self.config.required_scopes.is_empty()
            && !self
                .config
                .required_scopes
                .iter()
                .any(|scope| user.has_authority(scope))
        {
            return Err(HttpError::AuthorizationFailed(format!(
                "Token lacks a required scope: {}",
                self.config.required_scopes.join(", ")
            )));
        }

        debug!(subject = %user.subject, "Token accepted");
        Ok(user)
    }

    /// Strip `Bearer ` from an `Authorization` header value
    pub fn extract_bearer_token(auth_header: &str) -> Result<&str, HttpError> {
        match auth_header.split_once(' ') {
            Some((scheme, token)) if scheme.eq_ignore_ascii_case("bearer") && !token.is_empty() => {
                Ok(token.trim())
            }
            _ => Err(HttpError::AuthenticationFailed(
                "Invalid authorization header format".to_string(),
            )),
        }
    }

    async fn validator_for(&self, kid: Option<&str>) -> Result<Arc<TokenValidator>, HttpError> {
        {
            let cache = self.cache.read().await;
            if let Some(cached) = cache.as_ref() {
                if kid.is_none_or(|kid| cached.validator.has_key(kid)) {
                    return Ok(cached.validator.clone());
                }
                if !cached.rotation_allowed() {
                    return Err(unknown_signing_key());
                }
            }
        }

        self.refresh(kid).await
    }

    /// Reload the JWKS, fetching the discovery document first if it is not cached
    ///
    /// Callers queue on the write lock, so the cache is checked again once it is held: a
    /// concurrent refresh may already have loaded the key or started the cooldown.
    async fn refresh(&self, kid: Option<&str>) -> Result<Arc<TokenValidator>, HttpError> {
        let mut cache = self.cache.write().await;

        let (document, rotated_at) = match cache.as_mut() {
            Some(cached) => {
                if kid.is_none_or(|kid| cached.validator.has_key(kid)) {
                    return Ok(cached.validator.clone());
                }
                if !cached.rotation_allowed() {
                    return Err(unknown_signing_key());
                }
                if let Some(kid) = kid {
                    debug!("Signing key {} not cached, refreshing keys", kid);
                }
                // Counted even if the fetch below fails
                cached.rotated_at = Some(Instant::now());
                (cached.document.clone(), cached.rotated_at)
            }
            None => (
                DiscoveryDocument::fetch_for_issuer(&self.http, &self.config.issuer).await?,
                None,
            ),
        };
        let keys = document.fetch_jwks(&self.http).await?;

        let validator = Arc::new(
            TokenValidator::new(keys, self.config.issuer.as_str())
                .with_audience(self.config.audience.clone())
                .with_leeway(self.config.leeway_seconds),
        );
        *cache = Some(CachedKeys {
            document,
            validator: validator.clone(),
            rotated_at,
        });

        info!("Loaded signing keys for {}", self.config.issuer);
        Ok(validator)
    }
}

fn unknown_signing_key() -> HttpError {
    HttpError::AuthenticationFailed("Unknown signing key".to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extract_bearer_token() {
        assert_eq!(
            TokenProvider::extract_bearer_token("Bearer abc123").unwrap(),
            "abc123"
        );
        assert_eq!(
            TokenProvider::extract_bearer_token("bearer abc123").unwrap(),
            "abc123"
        );
        assert!(TokenProvider::extract_bearer_token("Basic abc123").is_err());
        assert!(TokenProvider::extract_bearer_token("abc123").is_err());
        assert!(TokenProvider::extract_bearer_token("Bearer ").is_err());
    }
}
