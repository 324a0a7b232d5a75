pub mod context;
pub mod error_messages;
#[cfg(target_arch = "wasm32")]
mod iframe;

pub use context::{AuthAction, AuthProvider, use_auth};
pub use error_messages::{login_error, user_friendly_error};

use taproom_core::AuthResult;

/// Direct-login client used in the browser
///
/// A page cannot read the authorization endpoint's redirect, so token retrieval goes through
/// a hidden iframe that posts the tokens back.
#[cfg(target_arch = "wasm32")]
pub type BrowserAuthnClient = iframe::IframeAuthnClient;

#[cfg(not(target_arch = "wasm32"))]
pub type BrowserAuthnClient = taproom_core::HttpAuthnClient;

#[cfg(target_arch = "wasm32")]
pub fn browser_authn_client(base_url: &str) -> AuthResult<BrowserAuthnClient> {
    iframe::IframeAuthnClient::new(base_url, crate::config::AppConfig::TOKEN_REQUEST_TIMEOUT_MS)
}

#[cfg(not(target_arch = "wasm32"))]
pub fn browser_authn_client(base_url: &str) -> AuthResult<BrowserAuthnClient> {
    taproom_core::HttpAuthnClient::new(base_url)
}
