//! Taproom API clients

pub mod beer;
pub mod error;
pub mod typed;

pub use beer::BeerService;
pub use error::ClientError;
pub use typed::{AuthenticatedApiClient, PublicApiClient, TypedClientBuilder};

/// Where the beer API listens in development
pub const DEFAULT_API_BASE: &str = "http://localhost:8080";
