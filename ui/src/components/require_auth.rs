use yew::prelude::*;
use yew_router::prelude::*;
use yewdux::prelude::*;

use crate::{AuthState, Route, State};

#[derive(Properties, PartialEq)]
pub struct Props {
    pub children: Html,
}

/// Render `children` only for a signed-in user; everyone else goes to the
/// login page.
#[function_component]
pub fn RequireAuth(props: &Props) -> Html {
    let (state, _) = use_store::<State>();

    match state.auth_state {
        AuthState::Unknown => html! {},
        AuthState::LoggedOut => html! { <Redirect<Route> to={Route::Login} /> },
        AuthState::LoggedIn(_) => props.children.clone(),
    }
}
