//! Frontend configuration, fixed at build time
//!
//! `TAPROOM_API_BASE`, `TAPROOM_OIDC_ISSUER`, `TAPROOM_OIDC_CLIENT_ID` and
//! `TAPROOM_AUTHN_URL` override the defaults when set during `trunk build`.

use taproom_core::OidcConfig;
use taproom_http::client::DEFAULT_API_BASE;

/// Application configuration
pub struct AppConfig;

impl AppConfig {
    /// Base URL of the beer API
    pub const API_BASE: &'static str = match option_env!("TAPROOM_API_BASE") {
        Some(base) => base,
        None => DEFAULT_API_BASE,
    };

    /// How long a no-prompt token request may take, in milliseconds
    pub const TOKEN_REQUEST_TIMEOUT_MS: u32 = 120_000;

    /// Identity provider settings; the redirect URI is the page's own origin
    pub fn oidc() -> OidcConfig {
        let origin = gloo_utils::window()
            .location()
            .origin()
            .unwrap_or_default();

        let mut config = OidcConfig::new(origin);
        if let Some(issuer) = option_env!("TAPROOM_OIDC_ISSUER") {
            config = config.with_issuer(issuer);
        }
        if let Some(client_id) = option_env!("TAPROOM_OIDC_CLIENT_ID") {
            config = config.with_client_id(client_id);
        }
        if let Some(authn_url) = option_env!("TAPROOM_AUTHN_URL") {
            config = config.with_authn_url(authn_url);
        }
        config
    }
}
