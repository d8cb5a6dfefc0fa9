//! Where the bearer token and the signed-in user live between requests.

use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard, PoisonError};

use secrecy::SecretString;

use crate::AuthenticatedUser;
use crate::responses::LoginResponse;

pub const TOKEN_KEY: &str = "token";
pub const USER_KEY: &str = "user";
/// Every key a session writes. Signing out removes these and nothing else.
pub const SESSION_KEYS: [&str; 2] = [TOKEN_KEY, USER_KEY];

/// A small key/value store for credentials.
///
/// The browser build binds this to `localStorage`; tests use
/// [`MemoryStore`]. The transport reads the token on every request, so a
/// write here is visible to the very next call.
pub trait SecretStore: Send + Sync {
    fn get(&self, key: &str) -> Option<String>;
    fn set(&self, key: &str, value: &str);
    fn remove(&self, key: &str);
    fn clear(&self);
}

#[derive(Debug, Default)]
pub struct MemoryStore {
    values: Mutex<HashMap<String, String>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    // A panic elsewhere while holding the lock leaves the map intact.
    fn values(&self) -> MutexGuard<'_, HashMap<String, String>> {
        self.values.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl SecretStore for MemoryStore {
    fn get(&self, key: &str) -> Option<String> {
        self.values().get(key).cloned()
    }

    fn set(&self, key: &str, value: &str) {
        self.values().insert(key.to_string(), value.to_string());
    }

    fn remove(&self, key: &str) {
        self.values().remove(key);
    }

    fn clear(&self) {
        self.values().clear();
    }
}

/// Session bookkeeping on top of a [`SecretStore`]. A session exists only
/// when both the token and the user are present.
pub struct Session;

impl Session {
    /// Persist the result of a successful login.
    pub fn save(
        store: &dyn SecretStore,
        login: &LoginResponse,
    ) -> Result<(), serde_json::Error> {
        let user = serde_json::to_string(&login.user)?;
        store.set(TOKEN_KEY, &login.access_token);
        store.set(USER_KEY, &user);
        Ok(())
    }

    pub fn clear(store: &dyn SecretStore) {
        for key in SESSION_KEYS {
            store.remove(key);
        }
    }

    pub fn token(store: &dyn SecretStore) -> Option<SecretString> {
        store
            .get(TOKEN_KEY)
            .filter(|token| !token.is_empty())
            .map(SecretString::from)
    }

    pub fn current_user(store: &dyn SecretStore) -> Option<AuthenticatedUser> {
        Self::token(store)?;
        let user = store.get(USER_KEY)?;
        match serde_json::from_str(&user) {
            Ok(user) => Some(user),
            Err(e) => {
                tracing::warn!("Ignoring unreadable stored user: {e}");
                None
            }
        }
    }

    pub fn is_authenticated(store: &dyn SecretStore) -> bool {
        Self::current_user(store).is_some()
    }
}
