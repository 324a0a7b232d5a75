//! Route table and the guard in front of the protected view

use crate::session::SessionContext;

/// Application routes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Route {
    Home,
    Login,
    BeerList,
    /// `/` and unknown paths; always sent to [`Route::Home`]
    NotFound,
}

impl Route {
    pub fn path(self) -> &'static str {
        match self {
            Self::Home => "/home",
            Self::Login => "/login",
            Self::BeerList => "/beer-list",
            Self::NotFound => "/",
        }
    }

    pub fn from_path(path: &str) -> Self {
        let path = path.split(['?', '#']).next().unwrap_or_default();
        match path.trim_end_matches('/') {
            "/home" => Self::Home,
            "/login" => Self::Login,
            "/beer-list" => Self::BeerList,
            _ => Self::NotFound,
        }
    }

    pub fn requires_auth(self) -> bool {
        matches!(self, Self::BeerList)
    }
}

/// Outcome of a navigation check
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Navigation {
    Allow,
    Redirect(Route),
}

impl Navigation {
    pub fn is_allowed(self) -> bool {
        matches!(self, Self::Allow)
    }
}

/// Admits navigation to protected routes only while the session holds a valid token
#[derive(Debug, Clone)]
pub struct RouteGuard {
    session: SessionContext,
}

impl RouteGuard {
    pub fn new(session: SessionContext) -> Self {
        Self { session }
    }

    pub fn can_activate(&self, route: Route) -> Navigation {
        match route {
            Route::NotFound => Navigation::Redirect(Route::Home),
            route if route.requires_auth() && !self.session.has_valid_token() => {
                tracing::debug!("Blocked navigation to {}", route.path());
                Navigation::Redirect(Route::Login)
            }
            _ => Navigation::Allow,
        }
    }
}
