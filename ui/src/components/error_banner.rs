use yew::prelude::*;

#[derive(Properties, PartialEq)]
pub struct Props {
    pub message: Option<String>,
    pub on_dismiss: Callback<()>,
}

/// Error from a mutation. Dismissing it resets the mutation to idle.
#[function_component]
pub fn ErrorBanner(props: &Props) -> Html {
    let Some(message) = &props.message else {
        return html! {};
    };

    let on_dismiss = {
        let on_dismiss = props.on_dismiss.clone();
        Callback::from(move |_: MouseEvent| on_dismiss.emit(()))
    };

    html! {
        <div class="p-3 mb-4 rounded-md bg-red-50 dark:bg-red-900/20 \
                    border border-red-200 dark:border-red-800 \
                    flex items-center justify-between" role="alert">
            <p class="text-sm text-red-700 dark:text-red-400">{message.clone()}</p>
            <button
                onclick={on_dismiss}
                aria-label="Dismiss"
                class="text-red-700 dark:text-red-400"
            >
                {"×"}
            </button>
        </div>
    }
}
