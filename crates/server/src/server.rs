//! Listener setup and graceful shutdown

use crate::config::Settings;
use crate::error::Result;
use axum::Router;
use std::future::Future;
use std::sync::Arc;
use taproom_http::AppState;
use taproom_http::routes;
use taproom_http::services::TokenProvider;
use tokio::net::TcpListener;
use tracing::info;

/// The application router for these settings
pub fn build_app(settings: &Settings) -> Router {
    let provider = TokenProvider::new(settings.auth.clone());
    let state = AppState::new(Arc::new(provider));
    routes::app(state, &settings.server.cors_origins)
}

/// Bind the configured address and serve until `shutdown` resolves
pub async fn serve<F>(settings: Settings, shutdown: F) -> Result<()>
where
    F: Future<Output = ()> + Send + 'static,
{
    let addr = settings.server.listen_addr()?;
    let listener = TcpListener::bind(addr).await?;
    serve_on(listener, &settings, shutdown).await
}

/// Serve on an already bound listener
pub async fn serve_on<F>(listener: TcpListener, settings: &Settings, shutdown: F) -> Result<()>
where
    F: Future<Output = ()> + Send + 'static,
{
    let app = build_app(settings);
    info!(
        "Serving on http://{} (tokens from {})",
        listener.local_addr()?,
        settings.auth.issuer
    );

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown)
        .await?;
    Ok(())
}
