//! Domain models for the book library.
//!
//! This module contains the book record, the input validation applied when a
//! book is added, the query layer that derives filtered and sorted views, and
//! configuration.

/// The book record and input coercion.
pub mod book;
pub use book::{Book, BookId, BookInput, Field, NewBook, ValidationError, parse_pages};

mod config;
pub use config::Config;

/// Filtering and sorting of book lists.
pub mod query;
pub use query::{Criteria, GenreFilter, SortKey};
