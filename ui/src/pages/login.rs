use payloads::requests::LoginCredentials;
use web_sys::HtmlInputElement;
use yew::prelude::*;
use yew_router::prelude::*;
use yewdux::prelude::*;

use crate::{AuthState, Route, State, get_api_client};

#[function_component]
pub fn LoginPage() -> Html {
    let navigator = use_navigator();
    let (state, dispatch) = use_store::<State>();

    let email_ref = use_node_ref();
    let password_ref = use_node_ref();
    let error_message = use_state(|| None::<String>);
    let is_loading = use_state(|| false);

    // Redirect if already logged in
    {
        let navigator = navigator.clone();
        use_effect_with(state.is_authenticated(), move |is_auth| {
            if let (true, Some(navigator)) = (*is_auth, navigator) {
                navigator.push(&Route::Products);
            }
        });
    }

    let on_submit = {
        let email_ref = email_ref.clone();
        let password_ref = password_ref.clone();
        let error_message = error_message.clone();
        let is_loading = is_loading.clone();

        Callback::from(move |e: SubmitEvent| {
            e.prevent_default();

            let value = |node: &NodeRef| {
                node.cast::<HtmlInputElement>()
                    .map(|input| input.value())
                    .unwrap_or_default()
            };
            let credentials = LoginCredentials {
                email: value(&email_ref).trim().to_string(),
                password: value(&password_ref),
            };

            if credentials.email.is_empty() || credentials.password.is_empty() {
                error_message
                    .set(Some("Please enter both email and password".to_string()));
                return;
            }

            let error_message = error_message.clone();
            let is_loading = is_loading.clone();
            let dispatch = dispatch.clone();
            let navigator = navigator.clone();

            yew::platform::spawn_local(async move {
                is_loading.set(true);
                error_message.set(None);

                match get_api_client().login(&credentials).await.into_result() {
                    Ok(login) => {
                        dispatch.reduce_mut(|state| {
                            state.auth_state = AuthState::LoggedIn(login.user);
                        });
                        if let Some(navigator) = navigator {
                            navigator.push(&Route::Products);
                        }
                    }
                    Err(e) => {
                        tracing::debug!("Login failed: {e}");
                        dispatch.reduce_mut(|state| state.logout());
                        error_message.set(Some(e.to_string()));
                    }
                }

                is_loading.set(false);
            });
        })
    };

    let input_class = "w-full px-3 py-2 border border-neutral-300 \
                       dark:border-neutral-600 rounded-md bg-white \
                       dark:bg-neutral-800";

    html! {
        <main class="max-w-md mx-auto px-4 py-16">
            <h1 class="text-2xl font-bold mb-6">{"Sign in to FoodShare Manager"}</h1>
            <form onsubmit={on_submit} class="space-y-4">
                <div>
                    <label for="email" class="block text-sm font-medium mb-1">{"Email"}</label>
                    <input ref={email_ref} id="email" type="email"
                        autocomplete="username" class={input_class} />
                </div>
                <div>
                    <label for="password" class="block text-sm font-medium mb-1">{"Password"}</label>
                    <input ref={password_ref} id="password" type="password"
                        autocomplete="current-password" class={input_class} />
                </div>
                if let Some(error) = (*error_message).clone() {
                    <p class="text-sm text-red-700 dark:text-red-400">{error}</p>
                }
                <button
                    type="submit"
                    disabled={*is_loading}
                    class="w-full px-4 py-2 rounded-md bg-neutral-900 text-white \
                           dark:bg-white dark:text-neutral-900 disabled:opacity-50"
                >
                    {if *is_loading { "Signing in..." } else { "Sign in" }}
                </button>
            </form>
        </main>
    }
}
