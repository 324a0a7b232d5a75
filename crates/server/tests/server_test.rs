//! Integration tests for server startup

use std::time::Duration;
use taproom_core::tests::TestIssuer;
use taproom_http::config::ResourceServerConfig;
use taproom_server::config::{ServerConfig, Settings};
use taproom_server::server;
use tokio::net::TcpListener;
use tokio::sync::oneshot;

fn test_settings(issuer: &TestIssuer) -> Settings {
    Settings {
        server: ServerConfig {
            host: "127.0.0.1".to_string(),
            port: 0,
            cors_origins: vec!["http://localhost:4200".to_string()],
        },
        auth: ResourceServerConfig::new(issuer.issuer()),
    }
}

#[tokio::test]
async fn test_server_serves_and_shuts_down() {
    let issuer = TestIssuer::start().await;
    let settings = test_settings(&issuer);

    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let (stop, stopped) = oneshot::channel::<()>();

    let handle = tokio::spawn(async move {
        server::serve_on(listener, &settings, async {
            stopped.await.ok();
        })
        .await
    });

    let base = format!("http://{addr}");
    let client = reqwest::Client::new();

    let health = client.get(format!("{base}/health")).send().await.unwrap();
    assert_eq!(health.status(), 200);

    let unauthorized = client.get(format!("{base}/good-beers")).send().await.unwrap();
    assert_eq!(unauthorized.status(), 401);

    let token = issuer.access_token("00u-test-user", &["openid"]);
    let beers: serde_json::Value = client
        .get(format!("{base}/good-beers"))
        .bearer_auth(token)
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(beers.as_array().unwrap().len(), 4);

    stop.send(()).unwrap();
    let result = tokio::time::timeout(Duration::from_secs(5), handle)
        .await
        .unwrap()
        .unwrap();
    assert!(result.is_ok());
}
