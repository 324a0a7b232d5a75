//! Session provider: bootstraps the OIDC client and shares the session with components

use super::{BrowserAuthnClient, browser_authn_client};
use crate::components::LoadingSpinner;
use crate::config::AppConfig;
use crate::storage::BrowserStore;
use std::rc::Rc;
use std::sync::Arc;
use taproom_core::{AuthResult, OidcClient, SessionContext, ViewState};
use wasm_bindgen::JsValue;
use yew::prelude::*;

/// Clients that act on the session
pub struct AuthServices {
    pub oidc: OidcClient,
    pub authn: BrowserAuthnClient,
}

impl AuthServices {
    fn new(session: SessionContext) -> AuthResult<Self> {
        let config = AppConfig::oidc();
        let authn = browser_authn_client(&config.authn_url)?;
        let oidc = OidcClient::new(config, Arc::new(BrowserStore), session)?;
        Ok(Self { oidc, authn })
    }
}

/// Authentication context data
#[derive(Clone)]
pub struct AuthContextData {
    pub session: SessionContext,
    /// `None` when the provider configuration is unusable
    pub services: Option<Rc<AuthServices>>,
    pub is_loading: bool,
    pub view: ViewState,
}

impl AuthContextData {
    fn new() -> Self {
        let session = SessionContext::new();
        let services = match AuthServices::new(session.clone()) {
            Ok(services) => Some(Rc::new(services)),
            Err(e) => {
                tracing::error!("Sign-in is unavailable: {}", e);
                None
            }
        };

        Self {
            view: ViewState::from_session(&session),
            session,
            services,
            is_loading: true,
        }
    }
}

impl PartialEq for AuthContextData {
    fn eq(&self, other: &Self) -> bool {
        let same_services = match (&self.services, &other.services) {
            (Some(a), Some(b)) => Rc::ptr_eq(a, b),
            (None, None) => true,
            _ => false,
        };
        same_services
            && self.session == other.session
            && self.is_loading == other.is_loading
            && self.view == other.view
    }
}

/// Authentication context actions
pub enum AuthAction {
    /// Bootstrap has finished, successfully or not
    Ready,
    /// A login or logout replaced the session
    SessionChanged,
}

/// Authentication context
pub type AuthContext = UseReducerHandle<AuthContextData>;

impl Reducible for AuthContextData {
    type Action = AuthAction;

    fn reduce(self: Rc<Self>, action: Self::Action) -> Rc<Self> {
        let view = ViewState::from_session(&self.session);
        match action {
            AuthAction::Ready => Rc::new(Self {
                is_loading: false,
                view,
                ..(*self).clone()
            }),
            AuthAction::SessionChanged => Rc::new(Self {
                view,
                ..(*self).clone()
            }),
        }
    }
}

/// The fragment the provider redirected back with, if any
fn current_fragment() -> Option<String> {
    gloo_utils::window()
        .location()
        .hash()
        .ok()
        .filter(|hash| !hash.is_empty())
}

/// Drop the consumed tokens from the address bar
fn clear_fragment() {
    let window = gloo_utils::window();
    let location = window.location();
    let path = format!(
        "{}{}",
        location.pathname().unwrap_or_default(),
        location.search().unwrap_or_default()
    );
    if let Ok(history) = window.history() {
        let _ = history.replace_state_with_url(&JsValue::NULL, "", Some(&path));
    }
}

/// Auth provider props
#[derive(Properties, PartialEq)]
pub struct AuthProviderProps {
    pub children: Children,
}

/// Auth provider component
#[function_component(AuthProvider)]
pub fn auth_provider(props: &AuthProviderProps) -> Html {
    // Captured on first render, before routing can rewrite the location
    let fragment = use_memo((), |_| current_fragment());
    let auth = use_reducer(AuthContextData::new);

    {
        let auth = auth.clone();
        use_effect_with((), move |_| {
            let Some(services) = auth.services.clone() else {
                auth.dispatch(AuthAction::Ready);
                return;
            };
            let fragment = (*fragment).clone();

            wasm_bindgen_futures::spawn_local(async move {
                let authenticated = services.oidc.bootstrap(fragment.as_deref()).await;
                if fragment.is_some() {
                    clear_fragment();
                }
                tracing::debug!(authenticated, "Session bootstrap finished");
                auth.dispatch(AuthAction::Ready);
            });
        });
    }

    if auth.is_loading {
        return html! {
            <div class="flex items-center justify-center min-h-screen">
                <LoadingSpinner text={Some("Checking your session...".to_string())} />
            </div>
        };
    }

    html! {
        <ContextProvider<AuthContext> context={auth}>
            {props.children.clone()}
        </ContextProvider<AuthContext>>
    }
}

/// Hook to use auth context
#[hook]
pub fn use_auth() -> AuthContext {
    use_context::<AuthContext>()
        .expect("AuthContext not found. Make sure to wrap your component with AuthProvider")
}
