//! Token validation against the provider's published signing keys

use crate::claims::IdentityClaims;
use crate::error::{AuthError, AuthResult};
use base64::Engine;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use jsonwebtoken::jwk::{Jwk, JwkSet};
use jsonwebtoken::{Algorithm, DecodingKey, Header, Validation, decode, decode_header};
use serde::de::DeserializeOwned;
use sha2::{Digest, Sha256};

/// Algorithms accepted from the provider; symmetric algorithms are never valid for public keys
const ALLOWED_ALGORITHMS: &[Algorithm] = &[
    Algorithm::RS256,
    Algorithm::RS384,
    Algorithm::RS512,
    Algorithm::PS256,
    Algorithm::PS384,
    Algorithm::PS512,
    Algorithm::ES256,
    Algorithm::ES384,
];

/// Validates JWTs issued by one issuer and signed by one key set
#[derive(Debug, Clone)]
pub struct TokenValidator {
    keys: JwkSet,
    issuer: String,
    audience: Option<String>,
    leeway: u64,
}

impl TokenValidator {
    /// Allowed clock skew between this host and the provider
    pub const DEFAULT_LEEWAY_SECS: u64 = 30;

    pub fn new(keys: JwkSet, issuer: impl Into<String>) -> Self {
        Self {
            keys,
            issuer: issuer.into().trim_end_matches('/').to_string(),
            audience: None,
            leeway: Self::DEFAULT_LEEWAY_SECS,
        }
    }

    /// Require the `aud` claim to contain this value
    pub fn with_audience(mut self, audience: impl Into<String>) -> Self {
        self.audience = Some(audience.into());
        self
    }

    pub fn with_leeway(mut self, leeway_secs: u64) -> Self {
        self.leeway = leeway_secs;
        self
    }

    pub fn issuer(&self) -> &str {
        &self.issuer
    }

    /// Whether a key with this id is in the set
    pub fn has_key(&self, kid: &str) -> bool {
        self.keys.find(kid).is_some()
    }

    /// Verify signature, issuer, audience and expiry, and return the token's claims
    pub fn validate<T: DeserializeOwned>(&self, token: &str) -> AuthResult<T> {
        let header = decode_header(token)?;
        if !ALLOWED_ALGORITHMS.contains(&header.alg) {
            return Err(AuthError::InvalidToken(format!(
                "Unsupported signing algorithm {:?}",
                header.alg
            )));
        }

        let key = DecodingKey::from_jwk(self.find_key(&header)?)?;

        let mut validation = Validation::new(header.alg);
        validation.leeway = self.leeway;
        validation.set_issuer(&[&self.issuer]);
        validation.set_required_spec_claims(&["exp", "iss", "sub"]);
        match &self.audience {
            Some(audience) => validation.set_audience(&[audience]),
            None => validation.validate_aud = false,
        }

        Ok(decode::<T>(token, &key, &validation)?.claims)
    }

    /// Validate an ID token received at login
    ///
    /// On top of [`validate`](Self::validate), the `nonce` claim must match the nonce saved
    /// before the login started and, when the token carries `at_hash`, it must match the
    /// access token delivered alongside it.
    pub fn validate_id_token(
        &self,
        id_token: &str,
        expected_nonce: &str,
        access_token: Option<&str>,
    ) -> AuthResult<IdentityClaims> {
        let claims: IdentityClaims = self.validate(id_token)?;

        if claims.nonce() != Some(expected_nonce) {
            return Err(AuthError::NonceMismatch);
        }

        if let (Some(expected), Some(access_token)) = (claims.access_token_hash(), access_token)
            && expected != access_token_hash(access_token)
        {
            return Err(AuthError::InvalidToken(
                "Access token does not match at_hash".to_string(),
            ));
        }

        Ok(claims)
    }

    fn find_key(&self, header: &Header) -> AuthResult<&Jwk> {
        match &header.kid {
            Some(kid) => self
                .keys
                .find(kid)
                .ok_or_else(|| AuthError::InvalidToken(format!("Unknown signing key {kid}"))),
            None if self.keys.keys.len() == 1 => Ok(&self.keys.keys[0]),
            None => Err(AuthError::InvalidToken(
                "Token header has no key id".to_string(),
            )),
        }
    }
}

/// `at_hash` for an access token: left half of its SHA-256 digest, base64url without padding
pub fn access_token_hash(access_token: &str) -> String {
    let digest = Sha256::digest(access_token.as_bytes());
    URL_SAFE_NO_PAD.encode(&digest[..digest.len() / 2])
}
