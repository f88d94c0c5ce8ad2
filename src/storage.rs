/// Persistence of the book list under a single key.
pub mod adapter;
/// The in-memory, persistent book list.
pub mod repository;
/// Key-value stores the list can be persisted to.
pub mod store;

pub use adapter::{BookStorage, DEFAULT_KEY, StorageError};
pub use repository::{AddError, Repository};
pub use store::{FileStore, KeyValueStore, MemoryStore, StoreError};
