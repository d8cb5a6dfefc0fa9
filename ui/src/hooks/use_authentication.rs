use yew::prelude::*;
use yewdux::prelude::*;

use crate::{AuthState, State, get_api_client};

/// Restore the signed-in user from the secret store on startup.
#[hook]
pub fn use_authentication() {
    let (_state, dispatch) = use_store::<State>();

    use_effect_with((), move |_| {
        let auth_state = match get_api_client().current_user() {
            Some(user) => {
                tracing::debug!("Restored session for {}", user.email);
                AuthState::LoggedIn(user)
            }
            None => AuthState::LoggedOut,
        };
        dispatch.reduce_mut(|state| state.auth_state = auth_state);
    });
}
