//! User-friendly error message mappings

use taproom_core::AuthError;
use taproom_http::client::ClientError;

/// Convert a beer API failure to something a user can act on
pub fn user_friendly_error(error: &ClientError) -> String {
    if error.requires_login() {
        return "Your session has expired. Please sign in again.".to_string();
    }
    match error {
        ClientError::Forbidden(_) => {
            "You don't have permission to access this resource.".to_string()
        }
        ClientError::NotFound(_) => "The requested resource was not found.".to_string(),
        other => from_message(&other.to_string()),
    }
}

/// Message for a failed direct login
///
/// Provider statuses and rejected credentials are shown as they are; transport and token
/// failures are translated.
pub fn login_error(error: &AuthError) -> String {
    match error {
        AuthError::UnsupportedStatus(_) => error.to_string(),
        AuthError::Status { message, .. } => message.clone(),
        other => from_message(&other.to_string()),
    }
}

fn from_message(error: &str) -> String {
    let lower = error.to_lowercase();

    if lower.contains("network") || lower.contains("failed to fetch") {
        "Connection error. Please check your internet connection and try again.".to_string()
    } else if lower.contains("timed out") || lower.contains("timeout") {
        "The request timed out. Please try again.".to_string()
    } else if lower.contains("invalid token") || lower.contains("mismatch") {
        "The sign-in response could not be verified. Please try again.".to_string()
    } else if lower.contains("server") || lower.contains("500") || lower.contains("internal") {
        "Something went wrong on our end. Please try again later.".to_string()
    } else {
        "An unexpected error occurred. Please try again.".to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_session_errors_ask_for_login() {
        assert_eq!(
            user_friendly_error(&ClientError::MissingSession),
            "Your session has expired. Please sign in again."
        );
        assert_eq!(
            user_friendly_error(&ClientError::AuthenticationFailed("401".into())),
            "Your session has expired. Please sign in again."
        );
    }

    #[test]
    fn test_server_error_is_generic() {
        let error = ClientError::ServerError {
            status: 500,
            message: "boom".into(),
        };
        assert_eq!(
            user_friendly_error(&error),
            "Something went wrong on our end. Please try again later."
        );
    }

    #[test]
    fn test_unsupported_status_is_shown_verbatim() {
        let error = AuthError::UnsupportedStatus("LOCKED_OUT".into());
        assert_eq!(login_error(&error), "We cannot handle the LOCKED_OUT status");
    }

    #[test]
    fn test_rejected_credentials_show_provider_summary() {
        let error = AuthError::Status {
            status: 401,
            message: "Authentication failed".into(),
        };
        assert_eq!(login_error(&error), "Authentication failed");
    }

    #[test]
    fn test_nonce_mismatch_is_translated() {
        assert_eq!(
            login_error(&AuthError::NonceMismatch),
            "The sign-in response could not be verified. Please try again."
        );
    }
}
