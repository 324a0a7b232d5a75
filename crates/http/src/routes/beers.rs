//! Beer endpoints

use crate::services::AuthenticatedUser;
use crate::state::AppState;
use crate::types::Beer;
use axum::{extract::State, response::Json};

/// The catalog without the bad beers
pub async fn good_beers(
    State(state): State<AppState>,
    user: AuthenticatedUser,
) -> Json<Vec<Beer>> {
    let beers = state.catalog.good_beers();
    debug!(subject = %user.subject, count = beers.len(), "Serving good beers");
    Json(beers)
}
