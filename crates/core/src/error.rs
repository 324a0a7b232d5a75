//! Error types for the authentication flows

use thiserror::Error;

/// Standard result type for core operations
pub type AuthResult<T> = std::result::Result<T, AuthError>;

/// Errors raised while discovering the provider, exchanging credentials or validating tokens
#[derive(Debug, Error)]
pub enum AuthError {
    /// Network or request error
    #[error("Request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// The provider answered with a non-success status
    #[error("Provider error {status}: {message}")]
    Status { status: u16, message: String },

    /// The provider redirected back with an OAuth error
    #[error("Provider rejected the login: {0}")]
    Provider(String),

    /// The discovery document could not be used
    #[error("Discovery failed: {0}")]
    Discovery(String),

    /// The discovery document names a different issuer than the one configured
    #[error("Issuer mismatch: expected {expected}, found {found}")]
    IssuerMismatch { expected: String, found: String },

    /// Signature, claim or format validation failed
    #[error("Invalid token: {0}")]
    InvalidToken(String),

    /// The `nonce` claim does not match the one saved before login
    #[error("Nonce mismatch")]
    NonceMismatch,

    /// The `state` parameter does not match the one saved before login
    #[error("State mismatch")]
    StateMismatch,

    /// The authn API returned a status other than `SUCCESS`
    #[error("We cannot handle the {0} status")]
    UnsupportedStatus(String),

    /// A token the flow depends on is absent
    #[error("Missing {0}")]
    MissingToken(&'static str),

    /// The operation needs the discovery document but none has been loaded
    #[error("Discovery document has not been loaded")]
    NotDiscovered,

    /// Browser or in-memory storage failed
    #[error("Storage error: {0}")]
    Storage(String),

    /// Invalid configuration
    #[error("Invalid configuration: {0}")]
    Configuration(String),

    /// A URL could not be parsed or joined
    #[error("Invalid URL: {0}")]
    Url(#[from] url::ParseError),

    /// Serialization/deserialization error
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl AuthError {
    /// Create error from an HTTP status code and response body
    pub fn from_status(status: reqwest::StatusCode, message: String) -> Self {
        Self::Status {
            status: status.as_u16(),
            message,
        }
    }
}

impl From<jsonwebtoken::errors::Error> for AuthError {
    fn from(e: jsonwebtoken::errors::Error) -> Self {
        use jsonwebtoken::errors::ErrorKind;

        match e.kind() {
            ErrorKind::ExpiredSignature => Self::InvalidToken("Token has expired".to_string()),
            ErrorKind::InvalidIssuer => Self::InvalidToken("Unexpected issuer".to_string()),
            ErrorKind::InvalidAudience => Self::InvalidToken("Unexpected audience".to_string()),
            ErrorKind::InvalidSignature => Self::InvalidToken("Invalid signature".to_string()),
            ErrorKind::MissingRequiredClaim(claim) => {
                Self::InvalidToken(format!("Missing required claim: {claim}"))
            }
            _ => Self::InvalidToken(format!("Token validation failed: {e}")),
        }
    }
}
