//! Test support: a signing key, its JWKS and a mock identity provider

use crate::config::OidcConfig;
use crate::validation::access_token_hash;
use chrono::Utc;
use jsonwebtoken::jwk::JwkSet;
use jsonwebtoken::{Algorithm, EncodingKey, Header};
use serde_json::{Value, json};
use std::collections::HashMap;
use url::form_urlencoded;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, Request, Respond, ResponseTemplate};

/// Key id of the fixture signing key
pub const TEST_KEY_ID: &str = "taproom-test-key";

/// Client id the mock provider issues tokens for
pub const TEST_CLIENT_ID: &str = "0oatestclient";

const SIGNING_KEY_PEM: &[u8] = include_bytes!("fixtures/signing_key.pem");
const JWKS_JSON: &str = include_str!("fixtures/jwks.json");

/// The public half of the fixture key, as published by the mock provider
pub fn test_jwks() -> JwkSet {
    serde_json::from_str(JWKS_JSON).expect("fixture JWKS should parse")
}

/// Sign arbitrary claims with the fixture key (RS256, `kid` set)
pub fn sign_token(claims: &Value) -> String {
    let mut header = Header::new(Algorithm::RS256);
    header.kid = Some(TEST_KEY_ID.to_string());
    let key = EncodingKey::from_rsa_pem(SIGNING_KEY_PEM).expect("fixture key should parse");
    jsonwebtoken::encode(&header, claims, &key).expect("fixture token should sign")
}

/// Subject of every token the mock provider issues
pub const TEST_SUBJECT: &str = "00u-test-user";

/// Audience of access tokens, as configured on the resource server
pub const TEST_API_AUDIENCE: &str = "api://default";

fn id_token_claims_for(issuer: &str, name: &str, nonce: &str) -> Value {
    let now = Utc::now().timestamp();
    json!({
        "sub": TEST_SUBJECT,
        "name": name,
        "email": format!("{}@example.com", name.to_lowercase()),
        "iss": issuer,
        "aud": TEST_CLIENT_ID,
        "iat": now,
        "exp": now + 3600,
        "nonce": nonce,
    })
}

fn access_token_for(issuer: &str, subject: &str, scopes: &[&str]) -> String {
    let now = Utc::now().timestamp();
    sign_token(&json!({
        "sub": subject,
        "iss": issuer,
        "aud": TEST_API_AUDIENCE,
        "cid": TEST_CLIENT_ID,
        "scp": scopes,
        "iat": now,
        "exp": now + 3600,
    }))
}

/// Authorization endpoint answering a `prompt=none` request with a token redirect
///
/// Echoes the request's `nonce` into the ID token and its `state` into the fragment, as the
/// provider does for a valid session token.
struct AuthorizeResponder {
    issuer: String,
    name: String,
}

impl Respond for AuthorizeResponder {
    fn respond(&self, request: &Request) -> ResponseTemplate {
        let query: HashMap<String, String> = request.url.query_pairs().into_owned().collect();
        let param = |key: &str| query.get(key).cloned().unwrap_or_default();

        let access_token = access_token_for(&self.issuer, TEST_SUBJECT, &["openid", "profile"]);
        let mut claims = id_token_claims_for(&self.issuer, &self.name, &param("nonce"));
        claims["at_hash"] = json!(access_token_hash(&access_token));

        let fragment = form_urlencoded::Serializer::new(String::new())
            .append_pair("id_token", &sign_token(&claims))
            .append_pair("access_token", &access_token)
            .append_pair("token_type", "Bearer")
            .append_pair("expires_in", "3600")
            .append_pair("scope", &param("scope"))
            .append_pair("state", &param("state"))
            .finish();

        ResponseTemplate::new(302)
            .insert_header("Location", format!("{}#{fragment}", param("redirect_uri")))
    }
}

/// A wiremock-backed OpenID provider serving discovery and keys
pub struct TestIssuer {
    server: MockServer,
}

impl TestIssuer {
    /// Start the provider with discovery and JWKS mounted
    pub async fn start() -> Self {
        let issuer = Self {
            server: MockServer::start().await,
        };

        Mock::given(method("GET"))
            .and(path("/oauth2/default/.well-known/openid-configuration"))
            .respond_with(ResponseTemplate::new(200).set_body_json(issuer.discovery_document()))
            .mount(&issuer.server)
            .await;

        Mock::given(method("GET"))
            .and(path("/oauth2/default/v1/keys"))
            .respond_with(ResponseTemplate::new(200).set_body_string(JWKS_JSON))
            .mount(&issuer.server)
            .await;

        issuer
    }

    pub fn server(&self) -> &MockServer {
        &self.server
    }

    /// Org base URL (authn API lives here)
    pub fn org_url(&self) -> String {
        self.server.uri()
    }

    /// Authorization server issuer
    pub fn issuer(&self) -> String {
        format!("{}/oauth2/default", self.server.uri())
    }

    pub fn authorization_endpoint(&self) -> String {
        format!("{}/v1/authorize", self.issuer())
    }

    pub fn discovery_document(&self) -> Value {
        let issuer = self.issuer();
        json!({
            "issuer": issuer,
            "authorization_endpoint": format!("{issuer}/v1/authorize"),
            "token_endpoint": format!("{issuer}/v1/token"),
            "userinfo_endpoint": format!("{issuer}/v1/userinfo"),
            "end_session_endpoint": format!("{issuer}/v1/logout"),
            "jwks_uri": format!("{issuer}/v1/keys"),
            "scopes_supported": ["openid", "profile", "email"],
            "response_types_supported": ["code", "id_token", "token", "id_token token"],
            "id_token_signing_alg_values_supported": ["RS256"]
        })
    }

    /// Client configuration pointing at this provider
    pub fn config(&self) -> OidcConfig {
        OidcConfig::new("http://localhost:4200")
            .with_issuer(self.issuer())
            .with_client_id(TEST_CLIENT_ID)
            .with_authn_url(self.org_url())
    }

    /// Claims of an ID token for `name`, valid for an hour
    pub fn id_token_claims(&self, name: &str, nonce: &str) -> Value {
        id_token_claims_for(&self.issuer(), name, nonce)
    }

    pub fn id_token(&self, name: &str, nonce: &str) -> String {
        sign_token(&self.id_token_claims(name, nonce))
    }

    /// An access token as the resource server would receive it
    pub fn access_token(&self, subject: &str, scopes: &[&str]) -> String {
        access_token_for(&self.issuer(), subject, scopes)
    }

    /// Accept any credentials at the authn API, issuing `session_token`
    pub async fn mount_sign_in_success(&self, session_token: &str) {
        Mock::given(method("POST"))
            .and(path("/api/v1/authn"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "status": "SUCCESS",
                "sessionToken": session_token,
                "expiresAt": "2030-01-01T00:00:00.000Z",
            })))
            .mount(&self.server)
            .await;
    }

    /// Answer sign-in with a non-`SUCCESS` transaction status
    pub async fn mount_sign_in_status(&self, status: &str) {
        Mock::given(method("POST"))
            .and(path("/api/v1/authn"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "status": status })))
            .mount(&self.server)
            .await;
    }

    /// Reject sign-in the way the authn API does for bad credentials
    pub async fn mount_sign_in_rejected(&self) {
        Mock::given(method("POST"))
            .and(path("/api/v1/authn"))
            .respond_with(ResponseTemplate::new(401).set_body_json(json!({
                "errorCode": "E0000004",
                "errorSummary": "Authentication failed",
            })))
            .mount(&self.server)
            .await;
    }

    /// Serve token redirects from the authorization endpoint for user `name`
    pub async fn mount_authorize(&self, name: &str) {
        Mock::given(method("GET"))
            .and(path("/oauth2/default/v1/authorize"))
            .respond_with(AuthorizeResponder {
                issuer: self.issuer(),
                name: name.to_string(),
            })
            .mount(&self.server)
            .await;
    }
}
