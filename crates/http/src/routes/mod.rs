//! API route definitions

use crate::middleware::auth_middleware;
use crate::state::AppState;
use axum::http::{HeaderValue, Method, header};
use axum::{Router, middleware, routing::get};
use tower_http::cors::{AllowOrigin, CorsLayer};
use tower_http::trace::TraceLayer;

pub mod beers;
pub mod health;

/// Routes behind the auth middleware, without cross-cutting layers
///
/// The middleware only wraps matched routes; unknown paths fall through to a plain 404.
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health_check))
        .route("/good-beers", get(beers::good_beers))
        .route_layer(middleware::from_fn_with_state(state.clone(), auth_middleware))
        .with_state(state)
}

/// CORS for the browser app's origins; preflight requests are answered before authentication
pub fn cors_layer(origins: &[String]) -> CorsLayer {
    let origins: Vec<HeaderValue> = origins
        .iter()
        .filter_map(|origin| match HeaderValue::from_str(origin) {
            Ok(value) => Some(value),
            Err(_) => {
                warn!("Ignoring invalid CORS origin {:?}", origin);
                None
            }
        })
        .collect();

    CorsLayer::new()
        .allow_origin(AllowOrigin::list(origins))
        .allow_methods([Method::GET, Method::OPTIONS])
        .allow_headers([header::AUTHORIZATION, header::CONTENT_TYPE, header::ACCEPT])
}

/// The complete application: routes, request tracing and CORS
pub fn app(state: AppState, cors_origins: &[String]) -> Router {
    router(state)
        .layer(TraceLayer::new_for_http())
        .layer(cors_layer(cors_origins))
}
