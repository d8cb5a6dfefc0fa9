use std::rc::Rc;
use std::sync::Arc;

use payloads::{APIClient, ClientConfig};
use yew::prelude::*;
use yew_router::prelude::*;

mod auth;
mod components;
mod hooks;
mod logs;
mod pages;
mod state;

pub use auth::LocalStorageStore;
pub use state::{AuthState, State};

use components::NavBar;
use pages::{LoginPage, OrdersPage, ProductsPage};

/// The API client for the backend. Configurable at build time through
/// `BACKEND_URL`, falling back to the page's own origin.
///
/// Clients are cheap to build and share nothing but the token storage, so
/// every view makes its own.
pub fn get_api_client() -> Rc<APIClient> {
    let address = option_env!("BACKEND_URL")
        .map(|url| url.to_string())
        .or_else(|| web_sys::window()?.location().origin().ok())
        .unwrap_or_default();

    Rc::new(APIClient::new(
        ClientConfig::new(address),
        Arc::new(LocalStorageStore),
    ))
}

#[function_component]
pub fn App() -> Html {
    use_memo((), |_| logs::init_logging());
    hooks::use_authentication();

    html! {
        <BrowserRouter>
            <div class="min-h-screen bg-white dark:bg-gray-900 text-gray-900 dark:text-gray-100">
                <NavBar />
                <Switch<Route> render={switch} />
            </div>
        </BrowserRouter>
    }
}

#[derive(Clone, Routable, PartialEq)]
pub enum Route {
    #[at("/")]
    Home,
    #[at("/login")]
    Login,
    #[at("/products")]
    Products,
    #[at("/orders")]
    Orders,
    #[not_found]
    #[at("/404")]
    NotFound,
}

fn switch(routes: Route) -> Html {
    match routes {
        Route::Home => html! { <Redirect<Route> to={Route::Products} /> },
        Route::Login => html! { <LoginPage /> },
        Route::Products => html! { <ProductsPage /> },
        Route::Orders => html! { <OrdersPage /> },
        Route::NotFound => html! {
            <main class="max-w-7xl mx-auto px-4 sm:px-6 lg:px-8 py-8">
                <div class="text-center">
                    <h1 class="text-4xl font-bold text-gray-900 dark:text-white">{"404"}</h1>
                    <p class="text-gray-600 dark:text-gray-300">{"Page not found"}</p>
                </div>
            </main>
        },
    }
}
