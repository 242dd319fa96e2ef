use std::cell::RefCell;
use std::collections::HashMap;

use log::warn;
use thiserror::Error;
use web_sys::Storage;

use crate::describe_js_error;

#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum StorageError {
    #[error("local storage is unavailable: {0}")]
    Unavailable(String),
    #[error("local storage operation failed: {0}")]
    Operation(String),
}

/// Durable key/value storage the session token lives in.
pub trait TokenStore {
    fn read(&self, key: &str) -> Result<Option<String>, StorageError>;
    fn write(&self, key: &str, value: &str) -> Result<(), StorageError>;
    fn remove(&self, key: &str) -> Result<(), StorageError>;
}

/// The browser's per-origin `localStorage`.
pub struct BrowserStorage {
    storage: Storage,
}

impl BrowserStorage {
    pub fn from_window() -> Result<Self, StorageError> {
        let window = web_sys::window()
            .ok_or_else(|| StorageError::Unavailable("no window".to_owned()))?;

        let storage = window
            .local_storage()
            .map_err(|err| StorageError::Unavailable(describe_js_error(&err)))?
            .ok_or_else(|| StorageError::Unavailable("storage disabled".to_owned()))?;

        Ok(BrowserStorage { storage })
    }
}

impl TokenStore for BrowserStorage {
    fn read(&self, key: &str) -> Result<Option<String>, StorageError> {
        self.storage
            .get_item(key)
            .map_err(|err| StorageError::Operation(describe_js_error(&err)))
    }

    fn write(&self, key: &str, value: &str) -> Result<(), StorageError> {
        self.storage
            .set_item(key, value)
            .map_err(|err| StorageError::Operation(describe_js_error(&err)))
    }

    fn remove(&self, key: &str) -> Result<(), StorageError> {
        self.storage
            .remove_item(key)
            .map_err(|err| StorageError::Operation(describe_js_error(&err)))
    }
}

#[derive(Default)]
pub struct MemoryStore {
    items: RefCell<HashMap<String, String>>,
}

impl TokenStore for MemoryStore {
    fn read(&self, key: &str) -> Result<Option<String>, StorageError> {
        Ok(self.items.borrow().get(key).cloned())
    }

    fn write(&self, key: &str, value: &str) -> Result<(), StorageError> {
        self.items
            .borrow_mut()
            .insert(key.to_owned(), value.to_owned());
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<(), StorageError> {
        self.items.borrow_mut().remove(key);
        Ok(())
    }
}

/// Owns the bearer token for the lifetime of the page. The token is opaque:
/// it is stored, handed back and dropped, never inspected.
pub struct Session<S> {
    store: S,
    key: String,
}

impl<S: TokenStore> Session<S> {
    pub fn new(store: S, key: impl Into<String>) -> Self {
        Session {
            store,
            key: key.into(),
        }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// An unreadable store counts as signed out.
    pub fn get_token(&self) -> Option<String> {
        match self.store.read(&self.key) {
            Ok(token) => token.filter(|token| !token.is_empty()),
            Err(err) => {
                warn!("could not read session token: {}", err);
                None
            }
        }
    }

    pub fn set_token(&self, token: &str) -> Result<(), StorageError> {
        self.store.write(&self.key, token)
    }

    pub fn clear_token(&self) {
        if let Err(err) = self.store.remove(&self.key) {
            warn!("could not clear session token: {}", err);
        }
    }

    pub fn is_signed_in(&self) -> bool {
        self.get_token().is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct BrokenStore;

    impl TokenStore for BrokenStore {
        fn read(&self, _key: &str) -> Result<Option<String>, StorageError> {
            Err(StorageError::Operation("SecurityError".to_owned()))
        }

        fn write(&self, _key: &str, _value: &str) -> Result<(), StorageError> {
            Err(StorageError::Operation("QuotaExceededError".to_owned()))
        }

        fn remove(&self, _key: &str) -> Result<(), StorageError> {
            Err(StorageError::Operation("SecurityError".to_owned()))
        }
    }

    #[test]
    fn token_lifecycle() {
        let session = Session::new(MemoryStore::default(), "token");
        assert_eq!(session.get_token(), None);
        assert!(!session.is_signed_in());

        session.set_token("tok123").unwrap();
        assert_eq!(session.get_token().as_deref(), Some("tok123"));
        assert!(session.is_signed_in());

        session.set_token("tok456").unwrap();
        assert_eq!(session.get_token().as_deref(), Some("tok456"));

        session.clear_token();
        assert_eq!(session.get_token(), None);
    }

    #[test]
    fn empty_token_counts_as_absent() {
        let session = Session::new(MemoryStore::default(), "token");
        session.set_token("").unwrap();

        assert!(!session.is_signed_in());
    }

    #[test]
    fn sessions_under_different_keys_are_separate() {
        let store = MemoryStore::default();
        store.write("other", "x").unwrap();
        let session = Session::new(store, "token");

        assert_eq!(session.get_token(), None);
        session.clear_token();
        assert_eq!(session.store().read("other").unwrap().as_deref(), Some("x"));
    }

    #[test]
    fn broken_storage_reads_as_signed_out() {
        let session = Session::new(BrokenStore, "token");

        assert_eq!(session.get_token(), None);
        assert!(session.set_token("tok").is_err());
        session.clear_token();
    }
}
