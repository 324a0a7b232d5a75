//! The one authenticated call the app makes

use super::{AuthenticatedApiClient, ClientError};
use crate::types::Beer;
use taproom_core::SessionContext;

/// Path of the filtered beer list
pub const GOOD_BEERS_PATH: &str = "/good-beers";

/// Fetches the beer list on behalf of the signed-in user
#[derive(Clone)]
pub struct BeerService {
    client: AuthenticatedApiClient,
}

impl BeerService {
    pub fn new(client: AuthenticatedApiClient) -> Self {
        Self { client }
    }

    /// Service against `base_url` using the bearer token of `session`
    pub fn for_session(
        base_url: impl Into<String>,
        session: SessionContext,
    ) -> Result<Self, ClientError> {
        Ok(Self::new(AuthenticatedApiClient::new(base_url, session)?))
    }

    /// `GET /good-beers`
    ///
    /// No retries and no caching; every call reads the session afresh.
    pub async fn get_all(&self) -> Result<Vec<Beer>, ClientError> {
        let request = self.client.request(reqwest::Method::GET, GOOD_BEERS_PATH)?;
        let beers: Vec<Beer> = self.client.execute(request).await?;
        tracing::debug!("Fetched {} beers", beers.len());
        Ok(beers)
    }
}
