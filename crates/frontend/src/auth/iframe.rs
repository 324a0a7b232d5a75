//! No-prompt token retrieval through a hidden iframe
//!
//! The authorization endpoint is loaded with `response_mode=okta_post_message`; once the
//! provider has a session for the session token it posts the tokens to this window.

use async_trait::async_trait;
use futures::channel::oneshot;
use futures::future::{Either, select};
use gloo_events::EventListener;
use gloo_timers::future::TimeoutFuture;
use serde::Deserialize;
use taproom_core::{
    AuthError, AuthResult, AuthnClient, HttpAuthnClient, ProviderTokens, SignInResponse,
    TokenRequest,
};
use wasm_bindgen::{JsCast, JsValue};
use web_sys::{HtmlIFrameElement, MessageEvent};

const RESPONSE_MODE: &str = "okta_post_message";

/// Message the provider posts from the iframe
#[derive(Debug, Deserialize)]
struct AuthorizeMessage {
    state: Option<String>,
    id_token: Option<String>,
    access_token: Option<String>,
    expires_in: Option<i64>,
    error: Option<String>,
    error_description: Option<String>,
}

impl AuthorizeMessage {
    fn into_tokens(self) -> AuthResult<ProviderTokens> {
        if let Some(error) = self.error {
            let message = match self.error_description {
                Some(description) => format!("{error}: {description}"),
                None => error,
            };
            return Err(AuthError::Provider(message));
        }
        Ok(ProviderTokens {
            id_token: self.id_token.ok_or(AuthError::MissingToken("id_token"))?,
            access_token: self
                .access_token
                .ok_or(AuthError::MissingToken("access_token"))?,
            expires_in: self.expires_in,
        })
    }
}

/// [`AuthnClient`] for the browser: credentials over HTTP, tokens through an iframe
#[derive(Clone)]
pub struct IframeAuthnClient {
    authn: HttpAuthnClient,
    timeout_ms: u32,
}

impl IframeAuthnClient {
    pub fn new(base_url: &str, timeout_ms: u32) -> AuthResult<Self> {
        Ok(Self {
            authn: HttpAuthnClient::new(base_url)?,
            timeout_ms,
        })
    }
}

fn js_error(e: JsValue) -> AuthError {
    AuthError::Provider(format!("{e:?}"))
}

fn hidden_frame(src: &str) -> AuthResult<HtmlIFrameElement> {
    let frame: HtmlIFrameElement = gloo_utils::document()
        .create_element("iframe")
        .map_err(js_error)?
        .dyn_into()
        .map_err(|_| AuthError::Provider("Could not create iframe".to_string()))?;
    frame.set_src(src);
    frame
        .style()
        .set_property("display", "none")
        .map_err(js_error)?;
    gloo_utils::body().append_child(&frame).map_err(js_error)?;
    Ok(frame)
}

#[async_trait(?Send)]
impl AuthnClient for IframeAuthnClient {
    async fn sign_in(&self, username: &str, password: &str) -> AuthResult<SignInResponse> {
        self.authn.sign_in(username, password).await
    }

    async fn get_without_prompt(
        &self,
        authorization_endpoint: &str,
        request: &TokenRequest,
    ) -> AuthResult<ProviderTokens> {
        let url = request.authorize_url(authorization_endpoint, RESPONSE_MODE)?;
        let provider_origin = url.origin().ascii_serialization();
        let state = request.state.clone();

        let (sender, receiver) = oneshot::channel();
        let mut sender = Some(sender);
        let listener = EventListener::new(&gloo_utils::window(), "message", move |event| {
            let Some(event) = event.dyn_ref::<MessageEvent>() else {
                return;
            };
            if event.origin() != provider_origin {
                return;
            }
            let Ok(message) = serde_wasm_bindgen::from_value::<AuthorizeMessage>(event.data())
            else {
                return;
            };
            if message.state.as_deref() != Some(state.as_str()) {
                tracing::debug!("Ignoring token message for another request");
                return;
            }
            if let Some(sender) = sender.take() {
                let _ = sender.send(message.into_tokens());
            }
        });

        let frame = hidden_frame(url.as_str())?;
        let outcome = select(receiver, Box::pin(TimeoutFuture::new(self.timeout_ms))).await;
        frame.remove();
        drop(listener);

        match outcome {
            Either::Left((Ok(tokens), _)) => tokens,
            Either::Left((Err(_), _)) => Err(AuthError::Provider(
                "Token request was abandoned".to_string(),
            )),
            Either::Right(_) => Err(AuthError::Provider(
                "Timed out waiting for tokens".to_string(),
            )),
        }
    }
}
