use payloads::AuthenticatedUser;
use yewdux::prelude::*;

#[derive(Clone, PartialEq, Default)]
pub enum AuthState {
    /// Before the stored session has been read.
    #[default]
    Unknown,
    LoggedOut,
    LoggedIn(AuthenticatedUser),
}

#[derive(Default, Clone, PartialEq, Store)]
pub struct State {
    pub auth_state: AuthState,
}

impl State {
    pub fn is_authenticated(&self) -> bool {
        matches!(self.auth_state, AuthState::LoggedIn(_))
    }

    pub fn current_user(&self) -> Option<&AuthenticatedUser> {
        match &self.auth_state {
            AuthState::LoggedIn(user) => Some(user),
            _ => None,
        }
    }

    pub fn logout(&mut self) {
        self.auth_state = AuthState::LoggedOut;
    }
}
