use yew::prelude::*;

#[derive(Properties, PartialEq)]
pub struct Props {
    /// Current page (0-indexed)
    pub current_page: u32,
    pub total_pages: u32,
    pub total_items: u64,
    pub has_next: bool,
    pub has_previous: bool,
    pub on_previous: Callback<MouseEvent>,
    pub on_next: Callback<MouseEvent>,
    /// Whether currently loading (to disable buttons)
    #[prop_or(false)]
    pub is_loading: bool,
}

#[function_component]
pub fn PaginationControls(props: &Props) -> Html {
    let Props {
        current_page,
        total_pages,
        total_items,
        has_next,
        has_previous,
        is_loading,
        ..
    } = *props;

    if total_items == 0 {
        return html! {};
    }

    let prev_disabled = !has_previous || is_loading;
    let next_disabled = !has_next || is_loading;

    let button_class = |disabled: bool| {
        if disabled {
            "px-4 py-2 border border-neutral-300 dark:border-neutral-600 \
             rounded-md text-sm font-medium text-neutral-400 \
             dark:text-neutral-500 bg-neutral-100 dark:bg-neutral-800 \
             cursor-not-allowed"
        } else {
            "px-4 py-2 border border-neutral-300 dark:border-neutral-600 \
             rounded-md text-sm font-medium text-neutral-700 \
             dark:text-neutral-300 bg-white dark:bg-neutral-700 \
             hover:bg-neutral-50 dark:hover:bg-neutral-600 \
             transition-colors duration-200"
        }
    };

    html! {
        <div class="flex items-center justify-between mt-4 pt-4 \
                    border-t border-neutral-200 dark:border-neutral-700">
            <button
                onclick={props.on_previous.clone()}
                disabled={prev_disabled}
                class={button_class(prev_disabled)}
            >
                {"Previous"}
            </button>

            <span class="text-sm text-neutral-600 dark:text-neutral-400">
                {format!(
                    "Page {} of {} ({} items)",
                    current_page + 1,
                    total_pages.max(1),
                    total_items
                )}
            </span>

            <button
                onclick={props.on_next.clone()}
                disabled={next_disabled}
                class={button_class(next_disabled)}
            >
                {"Next"}
            </button>
        </div>
    }
}
