//! Home view: redirect login, direct login, welcome and logout

use crate::app::AppRoute;
use crate::auth::{AuthAction, login_error, use_auth};
use taproom_core::{LoginForm, login_with_password};
use web_sys::HtmlInputElement;
use yew::prelude::*;
use yew_router::prelude::*;

const CARD: &str = "bg-white dark:bg-gray-800 rounded-lg shadow-md p-6 mb-6";
const PRIMARY_BUTTON: &str = "px-4 py-2 bg-blue-500 hover:bg-blue-600 text-white rounded-md transition-colors disabled:bg-gray-300 dark:disabled:bg-gray-600 disabled:cursor-not-allowed";
const INPUT: &str = "w-full px-3 py-2 border border-gray-300 dark:border-gray-600 dark:bg-gray-700 dark:text-gray-200 rounded-md focus:outline-none focus:ring-2 focus:ring-blue-500";

fn navigate_to(url: &str) {
    if let Err(e) = gloo_utils::window().location().set_href(url) {
        tracing::error!("Navigation to the identity provider failed: {:?}", e);
    }
}

#[function_component(Home)]
pub fn home() -> Html {
    let auth = use_auth();
    let navigator = use_navigator();
    let form = use_state(LoginForm::default);

    let on_login_redirect = {
        let auth = auth.clone();
        let form = form.clone();
        Callback::from(move |_: MouseEvent| {
            let Some(services) = auth.services.as_ref() else {
                return;
            };
            match services.oidc.init_implicit_flow() {
                Ok(url) => navigate_to(url.as_str()),
                Err(e) => {
                    let mut failed = (*form).clone();
                    failed.fail(login_error(&e));
                    form.set(failed);
                }
            }
        })
    };

    let on_logout = {
        let auth = auth.clone();
        Callback::from(move |_: MouseEvent| {
            let Some(services) = auth.services.clone() else {
                return;
            };
            match services.oidc.logout() {
                Ok(Some(end_session)) => navigate_to(end_session.as_str()),
                Ok(None) => {
                    auth.dispatch(AuthAction::SessionChanged);
                    if let Some(navigator) = &navigator {
                        navigator.push(&AppRoute::Home);
                    }
                }
                Err(e) => {
                    tracing::warn!("Logout did not complete: {}", e);
                    auth.dispatch(AuthAction::SessionChanged);
                }
            }
        })
    };

    let on_username = {
        let form = form.clone();
        Callback::from(move |e: InputEvent| {
            let input: HtmlInputElement = e.target_unchecked_into();
            let mut next = (*form).clone();
            next.username = input.value();
            form.set(next);
        })
    };

    let on_password = {
        let form = form.clone();
        Callback::from(move |e: InputEvent| {
            let input: HtmlInputElement = e.target_unchecked_into();
            let mut next = (*form).clone();
            next.password = input.value();
            form.set(next);
        })
    };

    let on_submit = {
        let auth = auth.clone();
        let form = form.clone();
        Callback::from(move |e: SubmitEvent| {
            e.prevent_default();
            let Some(services) = auth.services.clone() else {
                return;
            };

            let mut pending = (*form).clone();
            let Some(credentials) = pending.take_credentials() else {
                return;
            };
            form.set(pending.clone());

            let auth = auth.clone();
            let form = form.clone();
            wasm_bindgen_futures::spawn_local(async move {
                match login_with_password(&services.oidc, &services.authn, credentials).await {
                    Ok(_) => {
                        pending.succeed();
                        form.set(pending);
                        auth.dispatch(AuthAction::SessionChanged);
                    }
                    Err(e) => {
                        tracing::error!("Direct login failed: {}", e);
                        pending.fail(login_error(&e));
                        form.set(pending);
                    }
                }
            });
        })
    };

    if let Some(welcome) = auth.view.welcome_message() {
        return html! {
            <div class={CARD}>
                <h2 class="text-xl font-semibold text-gray-800 dark:text-gray-100 mb-4">{welcome}</h2>
                <div class="flex gap-3 items-center">
                    <button class={PRIMARY_BUTTON} onclick={on_logout}>{"Logout"}</button>
                    <Link<AppRoute> to={AppRoute::BeerList} classes="text-blue-600 dark:text-blue-400 hover:underline">
                        {"Beer List"}
                    </Link<AppRoute>>
                </div>
            </div>
        };
    }

    let unavailable = auth.services.is_none();

    html! {
        <>
            <div class={CARD}>
                <h3 class="text-lg font-semibold text-gray-800 dark:text-gray-100 mb-4">{"Login with Redirect"}</h3>
                <button class={PRIMARY_BUTTON} onclick={on_login_redirect} disabled={unavailable}>{"Login"}</button>
            </div>

            <div class={CARD}>
                <h3 class="text-lg font-semibold text-gray-800 dark:text-gray-100 mb-4">{"Login Directly"}</h3>
                <form onsubmit={on_submit}>
                    if let Some(error) = &form.error {
                        <p class="text-red-600 dark:text-red-400 font-bold mb-4">{error}</p>
                    }
                    <p class="mb-4">
                        <input
                            type="text"
                            name="username"
                            class={INPUT}
                            placeholder="Name"
                            required=true
                            value={form.username.clone()}
                            oninput={on_username}
                        />
                    </p>
                    <p class="mb-4">
                        <input
                            type="password"
                            name="password"
                            class={INPUT}
                            placeholder="Password"
                            required=true
                            value={form.password.clone()}
                            oninput={on_password}
                        />
                    </p>
                    <button type="submit" class={PRIMARY_BUTTON} disabled={unavailable || form.submitting}>
                        {"Login"}
                    </button>
                </form>
            </div>
        </>
    }
}
