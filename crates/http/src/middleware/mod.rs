//! Middleware components for HTTP request processing

pub mod auth;

pub use auth::{AuthProvider, auth_middleware};
