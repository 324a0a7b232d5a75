//! Authentication guard component for protected routes

use crate::app::AppRoute;
use crate::auth::use_auth;
use taproom_core::{Navigation, Route, RouteGuard};
use yew::prelude::*;
use yew_router::prelude::Redirect;

#[derive(Properties, PartialEq)]
pub struct RequireAuthProps {
    /// Route being entered
    pub route: Route,
    #[prop_or_default]
    pub children: Children,
}

/// Renders its children only when the guard admits the route
#[function_component(RequireAuth)]
pub fn require_auth(props: &RequireAuthProps) -> Html {
    let auth = use_auth();

    match RouteGuard::new(auth.session.clone()).can_activate(props.route) {
        Navigation::Allow => html! { <>{ props.children.clone() }</> },
        Navigation::Redirect(target) => html! {
            <Redirect<AppRoute> to={AppRoute::from(target)} />
        },
    }
}
