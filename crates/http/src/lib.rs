//! Taproom HTTP: the beer API on both sides of the wire
//!
//! With `server`, an axum router serving `/good-beers` to callers holding an access token from
//! the identity provider. With `client`, typed clients that attach the current session's
//! bearer token to each call.

#[cfg(feature = "server")]
#[macro_use]
extern crate tracing;

pub mod error;
pub mod types;

#[cfg(feature = "server")]
pub mod config;
#[cfg(feature = "server")]
pub mod middleware;
#[cfg(feature = "server")]
pub mod routes;
#[cfg(feature = "server")]
pub mod services;
#[cfg(feature = "server")]
pub mod state;

#[cfg(feature = "client")]
pub mod client;

pub use error::{ErrorResponse, HttpError, Result};
pub use types::{Beer, HealthResponse};

#[cfg(feature = "server")]
pub use state::AppState;

#[cfg(feature = "server")]
pub use axum::{Json, extract, response};
