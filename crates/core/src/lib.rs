//! Taproom core: the OpenID Connect session glue shared by the browser app and the API server
//!
//! The identity provider issues tokens; this crate discovers it, validates what it hands back,
//! keeps the resulting [`Session`] in an explicit [`SessionContext`], and answers the two
//! questions the rest of the application asks: "who is signed in?" and "may this request or
//! navigation proceed?".

pub mod authn;
pub mod claims;
pub mod config;
pub mod discovery;
pub mod error;
pub mod fragment;
pub mod guard;
pub mod login;
pub mod oidc;
pub mod session;
pub mod storage;
pub mod validation;
pub mod view;

#[cfg(all(feature = "tracing-init", not(target_arch = "wasm32")))]
pub mod telemetry;

#[cfg(all(feature = "tests", not(target_arch = "wasm32")))]
pub mod tests;

pub use authn::{AuthnClient, HttpAuthnClient, ProviderTokens, SignInResponse, TokenRequest};
pub use claims::IdentityClaims;
pub use config::OidcConfig;
pub use discovery::DiscoveryDocument;
pub use error::{AuthError, AuthResult};
pub use guard::{Navigation, Route, RouteGuard};
pub use login::{Credentials, login_with_password};
pub use oidc::{OidcClient, TryLoginOptions};
pub use session::{Session, SessionContext};
pub use storage::{MemoryStore, SessionStore};
pub use validation::TokenValidator;
pub use view::{LoginForm, ViewState};
