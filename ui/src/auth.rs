//! Token storage in the browser.

use payloads::SecretStore;
use payloads::secrets::SESSION_KEYS;

/// [`SecretStore`] backed by `window.localStorage`.
///
/// The storage handle is looked up on every access rather than held, since
/// browser handles can't cross threads and the store must be `Send + Sync`.
/// Storage being unavailable (private mode, sandboxed iframes) reads as
/// empty and drops writes.
#[derive(Debug, Default, Clone, Copy)]
pub struct LocalStorageStore;

impl LocalStorageStore {
    fn storage() -> Option<web_sys::Storage> {
        web_sys::window()?.local_storage().ok().flatten()
    }
}

impl SecretStore for LocalStorageStore {
    fn get(&self, key: &str) -> Option<String> {
        Self::storage()?.get_item(key).ok().flatten()
    }

    fn set(&self, key: &str, value: &str) {
        if let Some(storage) = Self::storage() {
            if let Err(e) = storage.set_item(key, value) {
                tracing::warn!("Could not store {key}: {e:?}");
            }
        }
    }

    fn remove(&self, key: &str) {
        if let Some(storage) = Self::storage() {
            if let Err(e) = storage.remove_item(key) {
                tracing::warn!("Could not remove {key}: {e:?}");
            }
        }
    }

    /// Remove the session keys only; the rest of the origin's storage stays.
    fn clear(&self) {
        for key in SESSION_KEYS {
            self.remove(key);
        }
    }
}
