//! Key/value persistence for the session and the values a login round-trip needs

use crate::error::{AuthError, AuthResult};
use crate::session::Session;
use std::collections::HashMap;
use std::sync::RwLock;

/// Storage keys
pub mod keys {
    /// Serialized [`Session`](crate::Session)
    pub const SESSION: &str = "taproom.session";
    /// Nonce saved before a login, checked against the ID token
    pub const NONCE: &str = "taproom.nonce";
    /// OAuth `state` saved before a redirect login
    pub const STATE: &str = "taproom.state";
    /// Plain access token copy kept for code that reads it directly
    pub const ACCESS_TOKEN: &str = "access_token";
}

/// Browser-storage-shaped persistence
///
/// The browser app implements this over `sessionStorage`/`localStorage`; tests and native
/// callers use [`MemoryStore`].
pub trait SessionStore {
    fn get_item(&self, key: &str) -> AuthResult<Option<String>>;

    fn set_item(&self, key: &str, value: &str) -> AuthResult<()>;

    fn remove_item(&self, key: &str) -> AuthResult<()>;

    /// Load a previously saved session, ignoring entries that no longer parse
    fn load_session(&self) -> AuthResult<Option<Session>> {
        let Some(raw) = self.get_item(keys::SESSION)? else {
            return Ok(None);
        };
        match serde_json::from_str(&raw) {
            Ok(session) => Ok(Some(session)),
            Err(e) => {
                tracing::warn!("Discarding unreadable stored session: {}", e);
                self.remove_item(keys::SESSION)?;
                Ok(None)
            }
        }
    }

    fn save_session(&self, session: &Session) -> AuthResult<()> {
        let serialized = serde_json::to_string(session)?;
        self.set_item(keys::SESSION, &serialized)
    }
}

/// In-memory store
#[derive(Debug, Default)]
pub struct MemoryStore {
    items: RwLock<HashMap<String, String>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.items.read().map(|items| items.len()).unwrap_or_default()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

fn poisoned<T>(_: T) -> AuthError {
    AuthError::Storage("memory store lock poisoned".to_string())
}

impl SessionStore for MemoryStore {
    fn get_item(&self, key: &str) -> AuthResult<Option<String>> {
        Ok(self.items.read().map_err(poisoned)?.get(key).cloned())
    }

    fn set_item(&self, key: &str, value: &str) -> AuthResult<()> {
        self.items
            .write()
            .map_err(poisoned)?
            .insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove_item(&self, key: &str) -> AuthResult<()> {
        self.items.write().map_err(poisoned)?.remove(key);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_session_round_trip() {
        let store = MemoryStore::new();
        assert!(store.load_session().unwrap().is_none());

        let session = Session::new("abc").with_id_token("id");
        store.save_session(&session).unwrap();
        assert_eq!(store.load_session().unwrap(), Some(session));
    }

    #[test]
    fn test_unreadable_session_is_discarded() {
        let store = MemoryStore::new();
        store.set_item(keys::SESSION, "{not json").unwrap();

        assert!(store.load_session().unwrap().is_none());
        assert!(store.get_item(keys::SESSION).unwrap().is_none());
    }
}
