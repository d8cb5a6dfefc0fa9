use crate::{Route, State};
use yew::prelude::*;
use yew_router::prelude::*;
use yewdux::prelude::*;

#[hook]
pub fn use_logout() -> Callback<MouseEvent> {
    let (_, dispatch) = use_store::<State>();
    let navigator = use_navigator();

    Callback::from(move |_| {
        crate::get_api_client().logout();
        dispatch.reduce_mut(|state| state.logout());
        if let Some(navigator) = &navigator {
            navigator.push(&Route::Login);
        }
    })
}
