//! Beer list for the signed-in user

use crate::auth::user_friendly_error;
use crate::config::AppConfig;
use taproom_core::SessionContext;
use taproom_http::Beer;
use taproom_http::client::BeerService;

/// Fetch the good beers with the current session's access token
pub async fn fetch_good_beers(session: SessionContext) -> Result<Vec<Beer>, String> {
    let service = BeerService::for_session(AppConfig::API_BASE, session)
        .map_err(|e| user_friendly_error(&e))?;

    service.get_all().await.map_err(|e| {
        tracing::warn!("Beer list request failed: {}", e);
        user_friendly_error(&e)
    })
}
