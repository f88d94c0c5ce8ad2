//! Whole-value key-value stores.
//!
//! A [`KeyValueStore`] holds string values under string keys. Values are
//! always read and written whole; there are no partial updates and no
//! transactions.

use std::{
    collections::HashMap,
    fs, io,
    path::{Path, PathBuf},
};

/// An error raised by a [`KeyValueStore`].
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// The key cannot be used to name a value.
    #[error("invalid storage key {0:?}")]
    InvalidKey(String),

    /// The backing storage could not be read or written.
    #[error("failed to access {path}: {source}")]
    Io {
        /// The file being accessed.
        path: PathBuf,
        /// The underlying error.
        source: io::Error,
    },
}

/// A persistent map from keys to whole string values.
pub trait KeyValueStore {
    /// Returns the value stored under `key`, or `None` if there is none.
    ///
    /// # Errors
    ///
    /// Returns an error if the backing storage cannot be read.
    fn get(&self, key: &str) -> Result<Option<String>, StoreError>;

    /// Stores `value` under `key`, replacing any previous value.
    ///
    /// # Errors
    ///
    /// Returns an error if the backing storage cannot be written.
    fn set(&mut self, key: &str, value: &str) -> Result<(), StoreError>;
}

/// A store that lives only as long as the process.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MemoryStore {
    values: HashMap<String, String>,
}

impl MemoryStore {
    /// Creates an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        Ok(self.values.get(key).cloned())
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), StoreError> {
        self.values.insert(key.to_string(), value.to_string());
        Ok(())
    }
}

/// A store keeping each value in its own file inside a directory.
///
/// The key `books` is stored in `<dir>/books.json`. The directory is created
/// on the first write.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileStore {
    dir: PathBuf,
}

impl FileStore {
    /// Opens a store rooted at `dir`.
    #[must_use]
    pub const fn new(dir: PathBuf) -> Self {
        Self { dir }
    }

    /// The directory values are stored in.
    #[must_use]
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn path_for(&self, key: &str) -> Result<PathBuf, StoreError> {
        let valid = !key.is_empty()
            && key
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '.'))
            && !key.starts_with('.');
        if valid {
            Ok(self.dir.join(format!("{key}.json")))
        } else {
            Err(StoreError::InvalidKey(key.to_string()))
        }
    }
}

impl KeyValueStore for FileStore {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        let path = self.path_for(key)?;
        match fs::read_to_string(&path) {
            Ok(value) => Ok(Some(value)),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(source) => Err(StoreError::Io { path, source }),
        }
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), StoreError> {
        let path = self.path_for(key)?;
        fs::create_dir_all(&self.dir).map_err(|source| StoreError::Io {
            path: self.dir.clone(),
            source,
        })?;

        // Written beside the target and renamed over it, so readers see either
        // the old value or the new one.
        let tmp = path.with_extension("json.tmp");
        fs::write(&tmp, value).map_err(|source| StoreError::Io {
            path: tmp.clone(),
            source,
        })?;
        fs::rename(&tmp, &path).map_err(|source| StoreError::Io { path, source })?;

        tracing::trace!(key, dir = %self.dir.display(), "stored value");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use test_case::test_case;

    use super::*;

    #[test]
    fn memory_store_overwrites() {
        let mut store = MemoryStore::new();
        assert_eq!(store.get("books").unwrap(), None);

        store.set("books", "[1]").unwrap();
        store.set("books", "[2]").unwrap();

        assert_eq!(store.get("books").unwrap().as_deref(), Some("[2]"));
    }

    #[test]
    fn file_store_missing_key_is_none() {
        let tmp = tempfile::tempdir().unwrap();
        let store = FileStore::new(tmp.path().join("storage"));

        assert!(store.get("books").unwrap().is_none());
    }

    #[test]
    fn file_store_creates_directory_and_round_trips() {
        let tmp = tempfile::tempdir().unwrap();
        let dir = tmp.path().join("nested").join("storage");
        let mut store = FileStore::new(dir.clone());

        store.set("books", "[]").unwrap();
        store.set("books", "[\"again\"]").unwrap();

        assert_eq!(store.get("books").unwrap().as_deref(), Some("[\"again\"]"));
        assert!(dir.join("books.json").exists());
        assert!(!dir.join("books.json.tmp").exists());
    }

    #[test]
    fn file_store_keys_are_independent() {
        let tmp = tempfile::tempdir().unwrap();
        let mut store = FileStore::new(tmp.path().to_path_buf());

        store.set("books", "a").unwrap();
        store.set("archive", "b").unwrap();

        assert_eq!(store.get("books").unwrap().as_deref(), Some("a"));
        assert_eq!(store.get("archive").unwrap().as_deref(), Some("b"));
    }

    #[test_case(""; "empty")]
    #[test_case("../escape"; "parent directory")]
    #[test_case("a/b"; "separator")]
    #[test_case(".hidden"; "leading dot")]
    fn file_store_rejects_unsafe_keys(key: &str) {
        let tmp = tempfile::tempdir().unwrap();
        let mut store = FileStore::new(tmp.path().to_path_buf());

        assert!(matches!(store.get(key), Err(StoreError::InvalidKey(_))));
        assert!(matches!(store.set(key, "x"), Err(StoreError::InvalidKey(_))));
    }
}
