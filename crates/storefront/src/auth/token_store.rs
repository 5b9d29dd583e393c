//! Token store capability.
//!
//! The gate, the networked cart and the account flows all read the bearer
//! token through [`TokenStore`], so the backend (session-scoped or durable)
//! is picked once per call site and shared by everything downstream.

use super::credential::Credential;
use crate::storage::{Storage, StorageError};

/// Storage key for the bearer token.
pub const TOKEN_KEY: &str = "token";

/// Read/write access to the persisted bearer token.
pub trait TokenStore: Send + Sync {
    /// Read the current credential, if any.
    ///
    /// # Errors
    ///
    /// Returns an error if the backend cannot be read.
    fn get(&self) -> Result<Option<Credential>, StorageError>;

    /// Replace the stored credential.
    ///
    /// # Errors
    ///
    /// Returns an error if the backend cannot be written.
    fn set(&self, credential: &Credential) -> Result<(), StorageError>;

    /// Remove the stored credential (sign-out).
    ///
    /// # Errors
    ///
    /// Returns an error if the backend cannot be written.
    fn clear(&self) -> Result<(), StorageError>;
}

/// A [`TokenStore`] over any [`Storage`] backend, keyed by [`TOKEN_KEY`].
#[derive(Debug, Clone)]
pub struct StorageTokenStore<S> {
    storage: S,
}

impl<S: Storage> StorageTokenStore<S> {
    /// Create a token store over `storage`.
    pub const fn new(storage: S) -> Self {
        Self { storage }
    }

    /// The underlying storage backend.
    pub const fn storage(&self) -> &S {
        &self.storage
    }
}

impl<S: Storage> TokenStore for StorageTokenStore<S> {
    fn get(&self) -> Result<Option<Credential>, StorageError> {
        Ok(self
            .storage
            .get_item(TOKEN_KEY)?
            .filter(|token| !token.is_empty())
            .map(Credential::new))
    }

    fn set(&self, credential: &Credential) -> Result<(), StorageError> {
        self.storage.set_item(TOKEN_KEY, credential.expose())
    }

    fn clear(&self) -> Result<(), StorageError> {
        self.storage.remove_item(TOKEN_KEY)
    }
}

impl<T: TokenStore + ?Sized> TokenStore for std::sync::Arc<T> {
    fn get(&self) -> Result<Option<Credential>, StorageError> {
        (**self).get()
    }

    fn set(&self, credential: &Credential) -> Result<(), StorageError> {
        (**self).set(credential)
    }

    fn clear(&self) -> Result<(), StorageError> {
        (**self).clear()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::storage::MemoryStorage;

    #[test]
    fn test_set_get_clear() {
        let store = StorageTokenStore::new(MemoryStorage::new());
        assert!(store.get().unwrap().is_none());

        store.set(&Credential::new("a.b.c")).unwrap();
        assert_eq!(store.get().unwrap().unwrap().expose(), "a.b.c");
        assert_eq!(
            store.storage().get_item(TOKEN_KEY).unwrap().as_deref(),
            Some("a.b.c")
        );

        store.clear().unwrap();
        assert!(store.get().unwrap().is_none());
    }

    #[test]
    fn test_empty_value_reads_as_absent() {
        let storage = MemoryStorage::new();
        storage.set_item(TOKEN_KEY, "").unwrap();
        assert!(StorageTokenStore::new(storage).get().unwrap().is_none());
    }

    #[test]
    fn test_backends_do_not_share_tokens() {
        let session = StorageTokenStore::new(MemoryStorage::new());
        let durable = StorageTokenStore::new(MemoryStorage::new());

        session.set(&Credential::new("a.b.c")).unwrap();
        assert!(durable.get().unwrap().is_none());
    }
}
