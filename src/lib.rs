//! Personal Book-Library Tracking
//!
//! Books are kept in an ordered list, persisted whole to a local key-value
//! store, and shown through filtered and sorted views.

pub mod domain;
pub use domain::{Book, BookId, BookInput, Config, Criteria, GenreFilter, SortKey};

/// Key-value storage, persistence and the book repository.
pub mod storage;
pub use storage::{BookStorage, FileStore, MemoryStore, Repository};

pub mod view;
pub use view::{View, render};

pub mod controller;
pub use controller::{Controller, CriteriaChange, Event, Outcome, Response};
