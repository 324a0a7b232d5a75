use yew::prelude::*;

#[derive(Properties, Clone, PartialEq)]
pub struct LoadingSpinnerProps {
    /// Caption under the spinner
    #[prop_or_default]
    pub text: Option<String>,
}

/// Spinner shown while the session is checked or the beer list loads
#[function_component(LoadingSpinner)]
pub fn loading_spinner(props: &LoadingSpinnerProps) -> Html {
    let caption = props.text.as_deref().unwrap_or("Loading...");

    html! {
        <div class="flex flex-col items-center py-8" role="status" aria-live="polite">
            <span class="block w-8 h-8 mb-3 rounded-full border-4 border-blue-200 border-t-blue-500 animate-spin"></span>
            <span class="text-sm text-gray-500 dark:text-gray-400">{caption}</span>
        </div>
    }
}
