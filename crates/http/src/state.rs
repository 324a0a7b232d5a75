//! Application state management

use crate::middleware::AuthProvider;
use crate::services::BeerCatalog;
use std::sync::Arc;

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    /// Verifies the bearer token of each protected request
    pub auth: Arc<dyn AuthProvider>,
    pub catalog: Arc<BeerCatalog>,
}

impl AppState {
    pub fn new(auth: Arc<dyn AuthProvider>) -> Self {
        Self {
            auth,
            catalog: Arc::new(BeerCatalog::default()),
        }
    }

    pub fn with_catalog(mut self, catalog: BeerCatalog) -> Self {
        self.catalog = Arc::new(catalog);
        self
    }
}
