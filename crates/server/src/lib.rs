//! Taproom API server: configuration and startup around the `taproom-http` router

pub mod config;
pub mod error;
pub mod server;

pub use config::Settings;
pub use error::{Result, ServerError};
