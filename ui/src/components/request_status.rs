use payloads::ClientError;
use yew::prelude::*;

#[derive(Properties, PartialEq)]
pub struct Props {
    /// Name of what is being loaded, e.g. "products".
    pub context: AttrValue,
    pub loading: bool,
    /// Only the page changed: show a small indicator instead of covering
    /// the content.
    #[prop_or(false)]
    pub is_page_pending: bool,
    #[prop_or_default]
    pub error: Option<ClientError>,
    pub on_retry: Callback<()>,
    #[prop_or_default]
    pub children: Html,
}

/// Wraps list or detail content with its request state.
///
/// Content from the last successful fetch stays visible while a new one is
/// in flight.
#[function_component]
pub fn RequestStatus(props: &Props) -> Html {
    let on_retry = {
        let on_retry = props.on_retry.clone();
        Callback::from(move |_: MouseEvent| on_retry.emit(()))
    };

    let error = props.error.as_ref().map(|error| {
        let message = if error.is_unauthorized() {
            "Your session has expired. Please log in again.".to_string()
        } else {
            format!("Error loading {}: {}", props.context, error.user_message())
        };
        html! {
            <div class="p-4 mb-4 rounded-md bg-red-50 dark:bg-red-900/20 \
                        border border-red-200 dark:border-red-800 \
                        flex items-center justify-between">
                <p class="text-sm text-red-700 dark:text-red-400">{message}</p>
                <button
                    onclick={on_retry}
                    class="text-sm font-medium text-red-700 dark:text-red-400 underline"
                >
                    {"Try again"}
                </button>
            </div>
        }
    });

    let overlay = props.loading && !props.is_page_pending;

    html! {
        <div class="relative">
            {error}
            if props.loading && props.is_page_pending {
                <p class="text-xs text-neutral-500 dark:text-neutral-400 mb-2">
                    {"Loading page..."}
                </p>
            }
            <div class={classes!(overlay.then_some("opacity-50 pointer-events-none"))}>
                {props.children.clone()}
            </div>
            if overlay {
                <div class="absolute inset-0 flex items-center justify-center">
                    <p class="text-neutral-600 dark:text-neutral-400">
                        {format!("Loading {}...", props.context)}
                    </p>
                </div>
            }
        </div>
    }
}
