use crate::app::AppRoute;
use crate::auth::use_auth;
use crate::components::LoadingSpinner;
use crate::services::beer::fetch_good_beers;
use taproom_http::Beer;
use yew::prelude::*;
use yew_router::prelude::*;

#[function_component(BeerList)]
pub fn beer_list() -> Html {
    let auth = use_auth();
    let beers = use_state(|| None::<Result<Vec<Beer>, String>>);

    {
        let beers = beers.clone();
        let session = auth.session.clone();
        use_effect_with((), move |_| {
            wasm_bindgen_futures::spawn_local(async move {
                beers.set(Some(fetch_good_beers(session).await));
            });
        });
    }

    let content = match &*beers {
        None => html! { <LoadingSpinner text={Some("Loading beers...".to_string())} /> },
        Some(Err(error)) => html! {
            <p class="text-red-600 dark:text-red-400">{error}</p>
        },
        Some(Ok(beers)) => html! {
            <ul class="divide-y divide-gray-200 dark:divide-gray-700">
                { for beers.iter().map(|beer| html! {
                    <li key={beer.id} class="py-2 text-gray-800 dark:text-gray-200">{&beer.name}</li>
                }) }
            </ul>
        },
    };

    html! {
        <div class="bg-white dark:bg-gray-800 rounded-lg shadow-md p-6">
            <h2 class="text-xl font-semibold text-gray-800 dark:text-gray-100 mb-4">{"Beer List"}</h2>
            {content}
            <Link<AppRoute> to={AppRoute::Home} classes="inline-block mt-4 text-blue-600 dark:text-blue-400 hover:underline">
                {"Back"}
            </Link<AppRoute>>
        </div>
    }
}
