//! Server-side configuration types

pub mod auth;

pub use auth::ResourceServerConfig;
