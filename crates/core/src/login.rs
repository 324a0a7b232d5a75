//! Direct-credential login: username/password to an established session

use crate::authn::{AuthnClient, TokenRequest};
use crate::claims::IdentityClaims;
use crate::error::{AuthError, AuthResult};
use crate::oidc::{OidcClient, TryLoginOptions, random_token};
use std::fmt;

/// Username and password for one login attempt
#[derive(Clone)]
pub struct Credentials {
    username: String,
    password: String,
}

impl Credentials {
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            password: password.into(),
        }
    }

    pub fn username(&self) -> &str {
        &self.username
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .finish()
    }
}

/// Sign in with credentials and establish a session without leaving the page
///
/// Steps, each short-circuiting on error: save a nonce, exchange the credentials for a
/// session token, trade the session token for ID and access tokens with no prompt, and log
/// in from those tokens with the `state` check disabled. The session is only touched by the
/// final step, so any failure leaves it as it was.
#[tracing::instrument(name = "login.direct", skip_all, fields(username = %credentials.username))]
pub async fn login_with_password<A>(
    oidc: &OidcClient,
    authn: &A,
    credentials: Credentials,
) -> AuthResult<IdentityClaims>
where
    A: AuthnClient + ?Sized,
{
    let nonce = oidc.create_and_save_nonce()?;

    let Credentials { username, password } = credentials;
    let response = authn.sign_in(&username, &password).await?;
    drop(password);

    if !response.is_success() {
        tracing::debug!(status = %response.status, "Sign-in did not succeed");
        return Err(AuthError::UnsupportedStatus(response.status));
    }
    let session_token = response
        .session_token
        .ok_or(AuthError::MissingToken("session token"))?;

    let document = match oidc.discovery_document() {
        Some(document) => document,
        None => oidc.load_discovery_document().await?,
    };

    let config = oidc.config();
    let request = TokenRequest {
        client_id: config.client_id.clone(),
        response_types: vec!["id_token".to_string(), "token".to_string()],
        scopes: config.scopes(),
        session_token,
        nonce,
        state: random_token(),
        redirect_uri: config.redirect_uri.clone(),
    };
    let tokens = authn
        .get_without_prompt(&document.authorization_endpoint, &request)
        .await?;

    let fragment = tokens.to_fragment();
    let established = oidc.try_login(TryLoginOptions {
        custom_hash_fragment: Some(&fragment),
        disable_state_check: true,
    })?;
    if !established {
        return Err(AuthError::MissingToken("id_token"));
    }

    tracing::debug!("Direct login complete");
    oidc.identity_claims()
        .ok_or(AuthError::MissingToken("identity claims"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_debug_redacts_password() {
        let credentials = Credentials::new("alice", "hunter2");
        let rendered = format!("{credentials:?}");
        assert!(rendered.contains("alice"));
        assert!(!rendered.contains("hunter2"));
    }
}
