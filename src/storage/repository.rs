//! The in-memory book list and its persistence.
//!
//! The [`Repository`] owns the ordered list of books. Every successful
//! mutation writes the whole list back through its [`BookStorage`].

use chrono::Utc;

use crate::{
    domain::{Book, BookId, BookInput, ValidationError},
    storage::{
        adapter::{BookStorage, StorageError},
        store::KeyValueStore,
    },
};

/// An error returned by [`Repository::add`].
#[derive(Debug, thiserror::Error)]
pub enum AddError {
    /// The input was rejected; nothing was created.
    #[error(transparent)]
    Invalid(#[from] ValidationError),

    /// The new list could not be saved; nothing was created.
    #[error(transparent)]
    Storage(#[from] StorageError),
}

/// An ordered, persistent list of books.
///
/// Books are kept in insertion order. If a save fails, the in-memory change
/// is undone, so the list always matches what was last stored.
#[derive(Debug)]
pub struct Repository<S> {
    books: Vec<Book>,
    storage: BookStorage<S>,
}

impl<S: KeyValueStore> Repository<S> {
    /// Opens a repository, loading whatever list is currently stored.
    #[must_use]
    pub fn open(storage: BookStorage<S>) -> Self {
        let books = storage.load();
        Self { books, storage }
    }

    /// All books, in insertion order.
    #[must_use]
    pub fn books(&self) -> &[Book] {
        &self.books
    }

    /// The number of books.
    #[must_use]
    pub fn len(&self) -> usize {
        self.books.len()
    }

    /// Whether the library is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.books.is_empty()
    }

    /// Finds a book by id.
    #[must_use]
    pub fn get(&self, id: &BookId) -> Option<&Book> {
        self.books.iter().find(|book| book.id() == id)
    }

    /// The distinct genres in the library, in the order first seen.
    #[must_use]
    pub fn genres(&self) -> Vec<&str> {
        let mut genres: Vec<&str> = Vec::new();
        for book in &self.books {
            if !genres.contains(&book.genre()) {
                genres.push(book.genre());
            }
        }
        genres
    }

    /// The storage the list is persisted through.
    #[must_use]
    pub const fn storage(&self) -> &BookStorage<S> {
        &self.storage
    }

    /// Validates `input`, appends a new book and saves the list.
    ///
    /// The new book gets an id distinct from every book already in the list
    /// and the current time as its date added.
    ///
    /// # Errors
    ///
    /// Returns [`AddError::Invalid`] if a required field is empty and
    /// [`AddError::Storage`] if the list cannot be saved. In both cases the
    /// list is unchanged.
    pub fn add(&mut self, input: BookInput) -> Result<Book, AddError> {
        let new_book = input.validate()?;

        let mut id = BookId::generate();
        while self.get(&id).is_some() {
            id = BookId::generate();
        }

        let book = Book::new_with_id(id, new_book, Utc::now());
        self.books.push(book.clone());

        if let Err(e) = self.storage.save(&self.books) {
            self.books.pop();
            return Err(e.into());
        }

        tracing::debug!(id = %book.id(), title = book.title(), "added book");
        Ok(book)
    }

    /// Removes the book with the given id.
    ///
    /// Returns `false`, without saving, if there is no such book.
    ///
    /// # Errors
    ///
    /// Returns an error if the list cannot be saved, in which case the book is
    /// kept.
    pub fn remove(&mut self, id: &BookId) -> Result<bool, StorageError> {
        if self.get(id).is_none() {
            tracing::debug!(%id, "no book to remove");
            return Ok(false);
        }

        let remaining: Vec<Book> = self
            .books
            .iter()
            .filter(|book| book.id() != id)
            .cloned()
            .collect();
        self.storage.save(&remaining)?;
        self.books = remaining;

        tracing::debug!(%id, "removed book");
        Ok(true)
    }

    /// Flips the reading flag of the book with the given id.
    ///
    /// Returns the new flag, or `None`, without saving, if there is no such
    /// book.
    ///
    /// # Errors
    ///
    /// Returns an error if the list cannot be saved, in which case the flag is
    /// left as it was.
    pub fn toggle_reading(&mut self, id: &BookId) -> Result<Option<bool>, StorageError> {
        let Some(index) = self.books.iter().position(|book| book.id() == id) else {
            tracing::debug!(%id, "no book to toggle");
            return Ok(None);
        };

        let reading = self.books[index].toggle_reading();
        if let Err(e) = self.storage.save(&self.books) {
            self.books[index].toggle_reading();
            return Err(e);
        }

        tracing::debug!(%id, reading, "toggled reading");
        Ok(Some(reading))
    }
}
