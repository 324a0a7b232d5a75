//! Service layer for business logic

pub mod beers;
pub mod identity;
pub mod token_provider;

pub use beers::BeerCatalog;
pub use identity::{AccessTokenClaims, AuthenticatedUser};
pub use token_provider::TokenProvider;
