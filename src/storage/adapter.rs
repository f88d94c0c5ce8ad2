//! Persistence of the whole book list as a single JSON value.

use crate::{
    domain::Book,
    storage::store::{KeyValueStore, StoreError},
};

/// The key the book list is stored under unless configured otherwise.
pub const DEFAULT_KEY: &str = "books";

/// An error raised while saving the book list.
#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    /// The key-value store rejected the write.
    #[error(transparent)]
    Store(#[from] StoreError),

    /// The list could not be encoded.
    #[error("failed to serialize books: {0}")]
    Serialize(#[from] serde_json::Error),
}

/// Reads and writes the book list under one key of a [`KeyValueStore`].
///
/// The list is always written whole. There is no version field and no
/// migration: anything that does not parse as a list of books is treated as
/// an empty library.
#[derive(Debug, Clone)]
pub struct BookStorage<S> {
    store: S,
    key: String,
}

impl<S: KeyValueStore> BookStorage<S> {
    /// Stores the list under [`DEFAULT_KEY`].
    #[must_use]
    pub fn new(store: S) -> Self {
        Self::with_key(store, DEFAULT_KEY)
    }

    /// Stores the list under `key`.
    #[must_use]
    pub fn with_key(store: S, key: impl Into<String>) -> Self {
        Self {
            store,
            key: key.into(),
        }
    }

    /// The key the list is stored under.
    #[must_use]
    pub fn key(&self) -> &str {
        &self.key
    }

    /// The underlying store.
    #[must_use]
    pub const fn store(&self) -> &S {
        &self.store
    }

    /// Loads the stored list.
    ///
    /// Returns an empty list if nothing is stored, if the store cannot be
    /// read, or if the stored value is malformed.
    #[must_use]
    pub fn load(&self) -> Vec<Book> {
        let raw = match self.store.get(&self.key) {
            Ok(Some(raw)) => raw,
            Ok(None) => {
                tracing::debug!(key = %self.key, "no stored books");
                return Vec::new();
            }
            Err(e) => {
                tracing::warn!(key = %self.key, "failed to read stored books: {e}");
                return Vec::new();
            }
        };

        match serde_json::from_str::<Vec<Book>>(&raw) {
            Ok(books) => {
                tracing::debug!(key = %self.key, count = books.len(), "loaded books");
                books
            }
            Err(e) => {
                tracing::warn!(key = %self.key, "ignoring malformed stored books: {e}");
                Vec::new()
            }
        }
    }

    /// Saves `books`, replacing whatever was stored before.
    ///
    /// # Errors
    ///
    /// Returns an error if the list cannot be encoded or the store cannot be
    /// written.
    pub fn save(&mut self, books: &[Book]) -> Result<(), StorageError> {
        let raw = serde_json::to_string(books)?;
        self.store.set(&self.key, &raw)?;
        tracing::debug!(key = %self.key, count = books.len(), "saved books");
        Ok(())
    }
}
