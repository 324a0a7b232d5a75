use crate::auth::AuthProvider;
use crate::auth_guard::RequireAuth;
use crate::components::{BeerList, Home};
use taproom_core::Route;
use yew::prelude::*;
use yew_router::prelude::*;

/// Browser routes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Routable)]
pub enum AppRoute {
    #[at("/home")]
    Home,
    #[at("/login")]
    Login,
    #[at("/beer-list")]
    BeerList,
    #[at("/")]
    Root,
    #[not_found]
    #[at("/404")]
    NotFound,
}

impl From<AppRoute> for Route {
    fn from(route: AppRoute) -> Self {
        match route {
            AppRoute::Home => Self::Home,
            AppRoute::Login => Self::Login,
            AppRoute::BeerList => Self::BeerList,
            AppRoute::Root | AppRoute::NotFound => Self::NotFound,
        }
    }
}

impl From<Route> for AppRoute {
    fn from(route: Route) -> Self {
        match route {
            Route::Home => Self::Home,
            Route::Login => Self::Login,
            Route::BeerList => Self::BeerList,
            Route::NotFound => Self::Root,
        }
    }
}

fn switch(route: AppRoute) -> Html {
    let content = match route {
        AppRoute::Home | AppRoute::Login => html! { <Home /> },
        AppRoute::BeerList => html! { <BeerList /> },
        AppRoute::Root | AppRoute::NotFound => Html::default(),
    };

    html! {
        <RequireAuth route={Route::from(route)}>
            {content}
        </RequireAuth>
    }
}

#[function_component(App)]
pub fn app() -> Html {
    html! {
        <BrowserRouter>
            <AuthProvider>
                <div class="min-h-screen bg-gray-50 dark:bg-gray-900">
                    <header class="p-4 bg-white dark:bg-gray-800 border-b border-gray-200 dark:border-gray-700">
                        <h1 class="text-2xl font-bold text-gray-800 dark:text-gray-100">{"Taproom"}</h1>
                    </header>
                    <main class="max-w-2xl mx-auto p-6">
                        <Switch<AppRoute> render={switch} />
                    </main>
                </div>
            </AuthProvider>
        </BrowserRouter>
    }
}
