//! OpenID Connect client: discovery, login from a token fragment, redirect login and logout
//!
//! The client never owns the session; it writes to the [`SessionContext`] it was given and
//! mirrors the session into a [`SessionStore`] so a reload can resume it.

use crate::claims::IdentityClaims;
use crate::config::OidcConfig;
use crate::discovery::DiscoveryDocument;
use crate::error::{AuthError, AuthResult};
use crate::fragment::TokenFragment;
use crate::session::{Session, SessionContext};
use crate::storage::{SessionStore, keys};
use crate::validation::TokenValidator;
use arc_swap::ArcSwapOption;
use chrono::{DateTime, Duration, Utc};
use std::sync::Arc;
use url::Url;
use uuid::Uuid;

/// Options for [`OidcClient::try_login`]
#[derive(Debug, Clone, Copy, Default)]
pub struct TryLoginOptions<'a> {
    /// Fragment to log in from instead of the browser's location
    pub custom_hash_fragment: Option<&'a str>,
    /// Skip the `state` comparison; used when the tokens did not come from a redirect
    pub disable_state_check: bool,
}

impl<'a> TryLoginOptions<'a> {
    pub fn from_fragment(fragment: &'a str) -> Self {
        Self {
            custom_hash_fragment: Some(fragment),
            disable_state_check: false,
        }
    }
}

/// What discovery produced: provider metadata and a validator bound to its keys
#[derive(Debug)]
struct Discovered {
    document: DiscoveryDocument,
    validator: TokenValidator,
}

/// OIDC client bound to one provider and one session
pub struct OidcClient {
    config: OidcConfig,
    http: reqwest::Client,
    store: Arc<dyn SessionStore>,
    session: SessionContext,
    discovered: ArcSwapOption<Discovered>,
}

impl OidcClient {
    /// Create a client; the configuration is checked up front
    pub fn new(
        config: OidcConfig,
        store: Arc<dyn SessionStore>,
        session: SessionContext,
    ) -> AuthResult<Self> {
        config.validate()?;
        Ok(Self {
            config,
            http: reqwest::Client::new(),
            store,
            session,
            discovered: ArcSwapOption::empty(),
        })
    }

    /// Use a preconfigured HTTP client for discovery requests
    pub fn with_http_client(mut self, http: reqwest::Client) -> Self {
        self.http = http;
        self
    }

    pub fn config(&self) -> &OidcConfig {
        &self.config
    }

    pub fn session(&self) -> &SessionContext {
        &self.session
    }

    /// The loaded discovery document, if discovery has completed
    pub fn discovery_document(&self) -> Option<DiscoveryDocument> {
        self.discovered
            .load()
            .as_ref()
            .map(|discovered| discovered.document.clone())
    }

    fn discovered(&self) -> AuthResult<Arc<Discovered>> {
        self.discovered.load_full().ok_or(AuthError::NotDiscovered)
    }

    /// Load the discovery document and the signing keys it points at
    #[tracing::instrument(name = "oidc.discovery", skip_all, fields(issuer = %self.config.issuer))]
    pub async fn load_discovery_document(&self) -> AuthResult<DiscoveryDocument> {
        let document = DiscoveryDocument::fetch(&self.http, &self.config).await?;
        let keys = document.fetch_jwks(&self.http).await?;
        let validator = TokenValidator::new(keys, self.config.normalized_issuer())
            .with_audience(self.config.client_id.clone());

        self.discovered.store(Some(Arc::new(Discovered {
            document: document.clone(),
            validator,
        })));
        tracing::debug!("Discovery document loaded");
        Ok(document)
    }

    /// Discovery, then a login check against `fragment` or the stored session
    ///
    /// Returns whether a session is established afterwards.
    pub async fn load_discovery_document_and_try_login(
        &self,
        fragment: Option<&str>,
    ) -> AuthResult<bool> {
        self.load_discovery_document().await?;

        let options = TryLoginOptions {
            custom_hash_fragment: fragment,
            disable_state_check: false,
        };
        if self.try_login(options)? {
            return Ok(true);
        }
        self.restore_session()
    }

    /// Startup sequence; failures are logged and leave the user signed out
    pub async fn bootstrap(&self, fragment: Option<&str>) -> bool {
        match self.load_discovery_document_and_try_login(fragment).await {
            Ok(authenticated) => authenticated,
            Err(e) => {
                tracing::warn!("Login check failed, continuing signed out: {}", e);
                false
            }
        }
    }

    /// Establish a session from the tokens in a fragment
    ///
    /// Returns `Ok(false)` when there is no fragment or it carries no tokens. The ID token is
    /// validated against the provider's keys and the nonce saved before the login started.
    pub fn try_login(&self, options: TryLoginOptions<'_>) -> AuthResult<bool> {
        let Some(raw) = options.custom_hash_fragment else {
            return Ok(false);
        };
        let fragment = TokenFragment::parse(raw);

        if let Some(message) = fragment.error_message() {
            return Err(AuthError::Provider(message));
        }
        if !fragment.has_tokens() {
            return Ok(false);
        }

        if !options.disable_state_check {
            let saved = self.store.get_item(keys::STATE)?;
            if saved.is_none() || fragment.state != saved {
                return Err(AuthError::StateMismatch);
            }
        }

        let id_token = fragment.id_token.ok_or(AuthError::MissingToken("id_token"))?;
        let access_token = fragment
            .access_token
            .ok_or(AuthError::MissingToken("access_token"))?;
        let nonce = self
            .store
            .get_item(keys::NONCE)?
            .ok_or(AuthError::MissingToken("nonce"))?;

        let claims = self
            .discovered()?
            .validator
            .validate_id_token(&id_token, &nonce, Some(&access_token))?;

        let expires_at = match fragment.expires_in {
            Some(expires_in) => Some(expiry_after(expires_in)?),
            None => claims
                .expires_at()
                .and_then(|exp| DateTime::from_timestamp(exp, 0)),
        };

        let mut session = Session::new(access_token)
            .with_id_token(id_token)
            .with_claims(claims);
        session.expires_at = expires_at;

        self.store.save_session(&session)?;
        self.store.set_item(keys::ACCESS_TOKEN, &session.access_token)?;
        self.store.remove_item(keys::NONCE)?;
        self.store.remove_item(keys::STATE)?;
        self.session.establish(session);

        Ok(true)
    }

    /// Resume a stored session whose ID token still validates against the provider's keys
    pub fn restore_session(&self) -> AuthResult<bool> {
        let Some(session) = self.store.load_session()? else {
            return Ok(false);
        };

        let revalidated = match session.id_token.as_deref() {
            Some(id_token) if session.is_valid() => {
                let discovered = self.discovered()?;
                match discovered.validator.validate::<IdentityClaims>(id_token) {
                    Ok(_) => true,
                    Err(e) => {
                        tracing::debug!("Stored session rejected: {}", e);
                        false
                    }
                }
            }
            _ => false,
        };

        if !revalidated {
            self.forget_stored_session()?;
            return Ok(false);
        }

        self.session.establish(session);
        Ok(true)
    }

    /// Generate a nonce and save it for the upcoming ID token check
    pub fn create_and_save_nonce(&self) -> AuthResult<String> {
        let nonce = random_token();
        self.store.set_item(keys::NONCE, &nonce)?;
        Ok(nonce)
    }

    /// Build the provider's authorization URL for a redirect login
    ///
    /// Saves a fresh nonce and `state`; the caller navigates the browser to the returned URL
    /// and the return trip is handled by [`load_discovery_document_and_try_login`].
    ///
    /// [`load_discovery_document_and_try_login`]: Self::load_discovery_document_and_try_login
    pub fn init_implicit_flow(&self) -> AuthResult<Url> {
        let discovered = self.discovered()?;
        let nonce = self.create_and_save_nonce()?;
        let state = random_token();
        self.store.set_item(keys::STATE, &state)?;

        let mut url = Url::parse(&discovered.document.authorization_endpoint)?;
        url.query_pairs_mut()
            .append_pair("response_type", "id_token token")
            .append_pair("client_id", &self.config.client_id)
            .append_pair("state", &state)
            .append_pair("redirect_uri", &self.config.redirect_uri)
            .append_pair("scope", &self.config.scope)
            .append_pair("nonce", &nonce);
        Ok(url)
    }

    /// Sign out locally, returning the provider's end-session URL when it has one
    pub fn logout(&self) -> AuthResult<Option<Url>> {
        let id_token = self
            .session
            .clear()
            .and_then(|session| session.id_token.clone());
        self.forget_stored_session()?;
        self.store.remove_item(keys::NONCE)?;
        self.store.remove_item(keys::STATE)?;

        let Some(endpoint) = self
            .discovery_document()
            .and_then(|document| document.end_session_endpoint)
        else {
            return Ok(None);
        };

        let mut url = Url::parse(&endpoint)?;
        {
            let mut query = url.query_pairs_mut();
            if let Some(id_token) = &id_token {
                query.append_pair("id_token_hint", id_token);
            }
            query.append_pair("post_logout_redirect_uri", &self.config.redirect_uri);
        }
        Ok(Some(url))
    }

    pub fn identity_claims(&self) -> Option<IdentityClaims> {
        self.session.identity_claims()
    }

    pub fn authorization_header(&self) -> Option<String> {
        self.session.authorization_header()
    }

    fn forget_stored_session(&self) -> AuthResult<()> {
        self.store.remove_item(keys::SESSION)?;
        self.store.remove_item(keys::ACCESS_TOKEN)
    }
}

/// Absolute expiry for an `expires_in` lifetime; zero, negative and unrepresentable values are
/// rejected
fn expiry_after(expires_in: i64) -> AuthResult<DateTime<Utc>> {
    if expires_in <= 0 {
        return Err(AuthError::InvalidToken(format!(
            "expires_in must be positive, got {expires_in}"
        )));
    }
    Duration::try_seconds(expires_in)
        .and_then(|lifetime| Utc::now().checked_add_signed(lifetime))
        .ok_or_else(|| AuthError::InvalidToken(format!("expires_in out of range: {expires_in}")))
}

/// Unguessable value for `nonce` and `state`
pub(crate) fn random_token() -> String {
    format!("{}{}", Uuid::new_v4().simple(), Uuid::new_v4().simple())
}
