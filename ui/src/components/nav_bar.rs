use yew::prelude::*;
use yew_router::prelude::*;
use yewdux::prelude::*;

use crate::hooks::use_logout;
use crate::{Route, State};

#[function_component]
pub fn NavBar() -> Html {
    let (state, _) = use_store::<State>();
    let logout = use_logout();

    let Some(user) = state.current_user() else {
        return html! {};
    };

    html! {
        <nav class="border-b border-neutral-200 dark:border-neutral-700">
            <div class="max-w-7xl mx-auto px-4 py-3 flex items-center gap-6">
                <span class="font-semibold">{"FoodShare Manager"}</span>
                <Link<Route> to={Route::Products}>{"Products"}</Link<Route>>
                <Link<Route> to={Route::Orders}>{"Orders"}</Link<Route>>
                <span class="ml-auto text-sm text-neutral-600 dark:text-neutral-400">
                    {user.name.clone()}
                </span>
                <button onclick={logout} class="text-sm underline">{"Log out"}</button>
            </div>
        </nav>
    }
}
