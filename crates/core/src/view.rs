//! What the login/logout view shows, derived from the session

use crate::login::Credentials;
use crate::session::SessionContext;

/// The two states of the home view
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ViewState {
    Anonymous,
    Authenticated { name: String },
}

impl ViewState {
    /// Authenticated whenever the session exposes identity claims
    pub fn from_session(session: &SessionContext) -> Self {
        match session.identity_claims() {
            Some(claims) => Self::Authenticated {
                name: claims.display_name().to_string(),
            },
            None => Self::Anonymous,
        }
    }

    pub fn is_authenticated(&self) -> bool {
        matches!(self, Self::Authenticated { .. })
    }

    /// `Welcome, {name}!` once signed in
    pub fn welcome_message(&self) -> Option<String> {
        match self {
            Self::Authenticated { name } => Some(format!("Welcome, {name}!")),
            Self::Anonymous => None,
        }
    }

    /// Login buttons and the credential form are shown only while anonymous
    pub fn shows_login_controls(&self) -> bool {
        !self.is_authenticated()
    }
}

/// Local state of the direct-login form
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LoginForm {
    pub username: String,
    pub password: String,
    pub error: Option<String>,
    pub submitting: bool,
}

impl LoginForm {
    /// Move the entered credentials out for a login attempt
    ///
    /// The password field is emptied; the username stays so a failed attempt can be retried.
    /// Returns `None` while an attempt is already running.
    pub fn take_credentials(&mut self) -> Option<Credentials> {
        if self.submitting {
            return None;
        }
        self.submitting = true;
        self.error = None;
        Some(Credentials::new(
            self.username.clone(),
            std::mem::take(&mut self.password),
        ))
    }

    pub fn fail(&mut self, message: impl Into<String>) {
        self.submitting = false;
        self.error = Some(message.into());
    }

    pub fn succeed(&mut self) {
        *self = Self::default();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::claims::IdentityClaims;
    use crate::session::Session;

    #[test]
    fn test_authenticated_view_greets_by_name() {
        let session = SessionContext::new();
        session.establish(
            Session::new("access").with_claims(IdentityClaims::new("00u1").with_name("Alice")),
        );

        let state = ViewState::from_session(&session);
        assert_eq!(state.welcome_message().as_deref(), Some("Welcome, Alice!"));
        assert!(!state.shows_login_controls());
    }

    #[test]
    fn test_anonymous_view_shows_login_controls() {
        let state = ViewState::from_session(&SessionContext::new());
        assert_eq!(state, ViewState::Anonymous);
        assert!(state.welcome_message().is_none());
        assert!(state.shows_login_controls());
    }

    #[test]
    fn test_claims_without_name_fall_back() {
        let session = SessionContext::new();
        session.establish(
            Session::new("access")
                .with_claims(IdentityClaims::new("00u1").with_email("bob@example.com")),
        );
        assert_eq!(
            ViewState::from_session(&session),
            ViewState::Authenticated {
                name: "bob@example.com".to_string()
            }
        );
    }

    #[test]
    fn test_session_without_claims_is_anonymous() {
        let session = SessionContext::new();
        session.establish(Session::new("access"));
        assert_eq!(ViewState::from_session(&session), ViewState::Anonymous);
    }

    #[test]
    fn test_login_form_lifecycle() {
        let mut form = LoginForm {
            username: "alice".into(),
            password: "hunter2".into(),
            ..LoginForm::default()
        };

        let credentials = form.take_credentials().unwrap();
        assert_eq!(credentials.username(), "alice");
        assert!(form.password.is_empty());
        assert!(form.take_credentials().is_none());

        form.fail("We cannot handle the LOCKED_OUT status");
        assert!(!form.submitting);
        assert_eq!(form.username, "alice");
        assert!(form.error.is_some());

        form.succeed();
        assert_eq!(form, LoginForm::default());
    }
}
