//! Integration tests for bootstrap, redirect login and logout against a mock provider

use std::sync::Arc;
use taproom_core::storage::keys;
use taproom_core::tests::TestIssuer;
use taproom_core::validation::access_token_hash;
use taproom_core::{
    AuthError, MemoryStore, OidcClient, SessionContext, SessionStore, TryLoginOptions, ViewState,
};
use url::form_urlencoded;

fn client(issuer: &TestIssuer) -> (OidcClient, Arc<MemoryStore>, SessionContext) {
    let store = Arc::new(MemoryStore::new());
    let session = SessionContext::new();
    let client = OidcClient::new(issuer.config(), store.clone(), session.clone()).unwrap();
    (client, store, session)
}

/// Fragment the provider would redirect back with
fn redirect_fragment(issuer: &TestIssuer, name: &str, nonce: &str, state: &str) -> String {
    redirect_fragment_expiring(issuer, name, nonce, state, "3600")
}

fn redirect_fragment_expiring(
    issuer: &TestIssuer,
    name: &str,
    nonce: &str,
    state: &str,
    expires_in: &str,
) -> String {
    let access_token = issuer.access_token("00u-test-user", &["openid"]);
    let mut claims = issuer.id_token_claims(name, nonce);
    claims["at_hash"] = serde_json::json!(access_token_hash(&access_token));

    let encoded = form_urlencoded::Serializer::new(String::new())
        .append_pair("id_token", &taproom_core::tests::sign_token(&claims))
        .append_pair("access_token", &access_token)
        .append_pair("token_type", "Bearer")
        .append_pair("expires_in", expires_in)
        .append_pair("state", state)
        .finish();
    format!("#{encoded}")
}

#[tokio::test]
async fn test_bootstrap_without_fragment_stays_anonymous() {
    let issuer = TestIssuer::start().await;
    let (client, _, session) = client(&issuer);

    assert!(!client.bootstrap(None).await);
    assert!(client.discovery_document().is_some());
    assert_eq!(ViewState::from_session(&session), ViewState::Anonymous);
}

#[tokio::test]
async fn test_bootstrap_with_unreachable_provider_is_logged_not_fatal() {
    let store = Arc::new(MemoryStore::new());
    let session = SessionContext::new();
    let config = taproom_core::OidcConfig::new("http://localhost:4200")
        .with_issuer("http://127.0.0.1:9/oauth2/default");
    let client = OidcClient::new(config, store, session.clone()).unwrap();

    assert!(!client.bootstrap(None).await);
    assert!(!session.has_valid_token());
}

#[tokio::test]
async fn test_redirect_login_round_trip() {
    let issuer = TestIssuer::start().await;
    let (client, store, session) = client(&issuer);
    client.load_discovery_document().await.unwrap();

    let url = client.init_implicit_flow().unwrap();
    assert!(url.as_str().starts_with(&issuer.authorization_endpoint()));
    let params: std::collections::HashMap<_, _> = url.query_pairs().into_owned().collect();
    assert_eq!(params["response_type"], "id_token token");
    assert_eq!(params["redirect_uri"], "http://localhost:4200");

    let fragment = redirect_fragment(&issuer, "Alice", &params["nonce"], &params["state"]);
    assert!(
        client
            .load_discovery_document_and_try_login(Some(&fragment))
            .await
            .unwrap()
    );

    assert_eq!(
        ViewState::from_session(&session).welcome_message().as_deref(),
        Some("Welcome, Alice!")
    );
    assert!(session.authorization_header().unwrap().starts_with("Bearer "));
    assert!(store.get_item(keys::NONCE).unwrap().is_none());
    assert!(store.get_item(keys::STATE).unwrap().is_none());
    assert!(store.get_item(keys::ACCESS_TOKEN).unwrap().is_some());
}

#[tokio::test]
async fn test_fragment_with_wrong_state_is_rejected() {
    let issuer = TestIssuer::start().await;
    let (client, _, session) = client(&issuer);
    client.load_discovery_document().await.unwrap();

    let url = client.init_implicit_flow().unwrap();
    let nonce = url
        .query_pairs()
        .find(|(key, _)| key == "nonce")
        .map(|(_, value)| value.into_owned())
        .unwrap();

    let fragment = redirect_fragment(&issuer, "Alice", &nonce, "forged-state");
    let result = client.try_login(TryLoginOptions::from_fragment(&fragment));

    assert!(matches!(result, Err(AuthError::StateMismatch)));
    assert!(!session.has_valid_token());
}

#[tokio::test]
async fn test_fragment_with_wrong_nonce_is_rejected() {
    let issuer = TestIssuer::start().await;
    let (client, store, session) = client(&issuer);
    client.load_discovery_document().await.unwrap();
    client.create_and_save_nonce().unwrap();
    store.set_item(keys::STATE, "s-1").unwrap();

    let fragment = redirect_fragment(&issuer, "Alice", "replayed-nonce", "s-1");
    let result = client.try_login(TryLoginOptions::from_fragment(&fragment));

    assert!(matches!(result, Err(AuthError::NonceMismatch)));
    assert!(!session.has_valid_token());
}

#[tokio::test]
async fn test_unrepresentable_expires_in_is_rejected() {
    let issuer = TestIssuer::start().await;
    let (client, store, session) = client(&issuer);
    client.load_discovery_document().await.unwrap();

    for expires_in in ["9223372036854775807", "0", "-60"] {
        let nonce = client.create_and_save_nonce().unwrap();
        store.set_item(keys::STATE, "s-1").unwrap();
        let fragment = redirect_fragment_expiring(&issuer, "Alice", &nonce, "s-1", expires_in);

        let result = client.try_login(TryLoginOptions::from_fragment(&fragment));

        assert!(
            matches!(result, Err(AuthError::InvalidToken(_))),
            "expires_in={expires_in} gave {result:?}"
        );
        assert!(!session.has_valid_token());
        assert!(store.get_item(keys::SESSION).unwrap().is_none());
    }
}

#[tokio::test]
async fn test_provider_error_fragment() {
    let issuer = TestIssuer::start().await;
    let (client, _, _) = client(&issuer);
    client.load_discovery_document().await.unwrap();

    let result = client.try_login(TryLoginOptions::from_fragment(
        "#error=access_denied&error_description=User+is+not+assigned",
    ));
    match result {
        Err(AuthError::Provider(message)) => assert!(message.contains("not assigned")),
        other => panic!("Expected provider error, got {other:?}"),
    }
}

#[tokio::test]
async fn test_stored_session_is_restored_on_reload() {
    let issuer = TestIssuer::start().await;
    let (first, store, _) = client(&issuer);
    first.load_discovery_document().await.unwrap();
    let nonce = first.create_and_save_nonce().unwrap();
    store.set_item(keys::STATE, "s-1").unwrap();
    let fragment = redirect_fragment(&issuer, "Alice", &nonce, "s-1");
    assert!(first.try_login(TryLoginOptions::from_fragment(&fragment)).unwrap());

    // A fresh page load shares storage but not memory.
    let session = SessionContext::new();
    let second = OidcClient::new(issuer.config(), store.clone(), session.clone()).unwrap();
    assert!(second.bootstrap(None).await);
    assert_eq!(
        session.identity_claims().map(|claims| claims.display_name().to_string()),
        Some("Alice".to_string())
    );
}

#[tokio::test]
async fn test_tampered_stored_session_is_discarded() {
    let issuer = TestIssuer::start().await;
    let (client, store, session) = client(&issuer);
    store
        .set_item(
            keys::SESSION,
            r#"{"access_token":"a","id_token":"not.a.jwt","claims":{"sub":"x"}}"#,
        )
        .unwrap();

    assert!(!client.bootstrap(None).await);
    assert!(!session.has_valid_token());
    assert!(store.get_item(keys::SESSION).unwrap().is_none());
}

#[tokio::test]
async fn test_logout_clears_everything_and_returns_end_session_url() {
    let issuer = TestIssuer::start().await;
    let (client, store, session) = client(&issuer);
    client.load_discovery_document().await.unwrap();
    let nonce = client.create_and_save_nonce().unwrap();
    store.set_item(keys::STATE, "s-1").unwrap();
    let fragment = redirect_fragment(&issuer, "Alice", &nonce, "s-1");
    client.try_login(TryLoginOptions::from_fragment(&fragment)).unwrap();
    let id_token = session.id_token().unwrap();

    let url = client.logout().unwrap().unwrap();

    assert!(url.as_str().starts_with(&format!("{}/v1/logout", issuer.issuer())));
    let params: std::collections::HashMap<_, _> = url.query_pairs().into_owned().collect();
    assert_eq!(params["id_token_hint"], id_token);
    assert_eq!(params["post_logout_redirect_uri"], "http://localhost:4200");

    assert!(!session.has_valid_token());
    assert!(store.is_empty());
    assert_eq!(ViewState::from_session(&session), ViewState::Anonymous);
}
