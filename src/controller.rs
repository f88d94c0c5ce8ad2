//! Event handling for a library session.
//!
//! The [`Controller`] owns the [`Repository`] and the session's [`Criteria`].
//! Each [`Event`] updates one or the other and yields a [`Response`] carrying
//! the freshly derived list, ready to be rendered.

use crate::{
    domain::{Book, BookId, BookInput, Criteria, GenreFilter, SortKey, ValidationError},
    storage::{AddError, KeyValueStore, Repository, StorageError},
    view::{View, render},
};

/// Something the user did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Event {
    /// The add-book form was submitted.
    Submit(BookInput),
    /// The reading toggle of a book was activated.
    ToggleReading(BookId),
    /// Deletion of a book was requested and, if needed, confirmed.
    Delete(BookId),
    /// The filter or sort selection changed.
    CriteriaChanged(CriteriaChange),
}

/// A change to the session criteria.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CriteriaChange {
    /// Show a different genre.
    Genre(GenreFilter),
    /// Order by a different field.
    Sort(SortKey),
}

/// What handling an event did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    /// A book was added.
    Added(Book),
    /// The submitted form was invalid; nothing was added.
    Rejected(ValidationError),
    /// A book's reading flag was flipped.
    Toggled {
        /// The book.
        id: BookId,
        /// The new flag.
        reading: bool,
    },
    /// A book was removed.
    Removed(BookId),
    /// No book has the given id; nothing changed.
    NotFound(BookId),
    /// The criteria were updated.
    CriteriaUpdated(Criteria),
}

/// The result of handling an event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Response {
    /// What happened.
    pub outcome: Outcome,
    /// The books to display after the event, filtered and sorted.
    pub visible: Vec<Book>,
}

impl Response {
    /// Renders the visible books.
    #[must_use]
    pub fn view(&self) -> View<'_> {
        render(&self.visible)
    }
}

/// An error that prevented an event from being handled.
#[derive(Debug, thiserror::Error)]
pub enum ControllerError {
    /// The book list could not be saved. The library is unchanged.
    #[error(transparent)]
    Storage(#[from] StorageError),
}

/// Drives a library session.
#[derive(Debug)]
pub struct Controller<S> {
    repository: Repository<S>,
    criteria: Criteria,
}

impl<S: KeyValueStore> Controller<S> {
    /// Starts a session over `repository` with the given initial criteria.
    #[must_use]
    pub const fn new(repository: Repository<S>, criteria: Criteria) -> Self {
        Self {
            repository,
            criteria,
        }
    }

    /// The library.
    #[must_use]
    pub const fn repository(&self) -> &Repository<S> {
        &self.repository
    }

    /// The current criteria.
    #[must_use]
    pub const fn criteria(&self) -> &Criteria {
        &self.criteria
    }

    /// The books to display under the current criteria.
    #[must_use]
    pub fn visible(&self) -> Vec<Book> {
        self.criteria.apply(self.repository.books())
    }

    /// Handles one event.
    ///
    /// Invalid input and unknown ids are reported through the [`Outcome`];
    /// only storage failures are errors.
    ///
    /// # Errors
    ///
    /// Returns an error if the book list cannot be saved.
    pub fn handle(&mut self, event: Event) -> Result<Response, ControllerError> {
        tracing::trace!(?event, "handling event");

        let outcome = match event {
            Event::Submit(input) => match self.repository.add(input) {
                Ok(book) => Outcome::Added(book),
                Err(AddError::Invalid(e)) => Outcome::Rejected(e),
                Err(AddError::Storage(e)) => return Err(e.into()),
            },
            Event::ToggleReading(id) => match self.repository.toggle_reading(&id)? {
                Some(reading) => Outcome::Toggled { id, reading },
                None => Outcome::NotFound(id),
            },
            Event::Delete(id) => {
                if self.repository.remove(&id)? {
                    Outcome::Removed(id)
                } else {
                    Outcome::NotFound(id)
                }
            }
            Event::CriteriaChanged(change) => {
                match change {
                    CriteriaChange::Genre(genre) => self.criteria.genre = genre,
                    CriteriaChange::Sort(sort) => self.criteria.sort = sort,
                }
                Outcome::CriteriaUpdated(self.criteria.clone())
            }
        };

        Ok(Response {
            outcome,
            visible: self.visible(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        domain::Field,
        storage::{BookStorage, MemoryStore},
        view::{ActionKind, READING_BADGE},
    };

    fn controller() -> Controller<MemoryStore> {
        Controller::new(
            Repository::open(BookStorage::new(MemoryStore::new())),
            Criteria::default(),
        )
    }

    fn submit(
        controller: &mut Controller<MemoryStore>,
        title: &str,
        genre: &str,
        pages: &str,
    ) -> Book {
        let response = controller
            .handle(Event::Submit(BookInput {
                title: title.to_string(),
                author: "Someone".to_string(),
                genre: genre.to_string(),
                pages: Some(pages.to_string()),
                reading: false,
            }))
            .unwrap();
        match response.outcome {
            Outcome::Added(book) => book,
            other => panic!("expected a book to be added, got {other:?}"),
        }
    }

    fn titles(response: &Response) -> Vec<&str> {
        response.visible.iter().map(Book::title).collect()
    }

    #[test]
    fn submitting_dune_renders_a_reading_card() {
        let mut controller = controller();

        let response = controller
            .handle(Event::Submit(BookInput {
                title: "Dune".to_string(),
                author: "Herbert".to_string(),
                genre: "SciFi".to_string(),
                pages: Some("412".to_string()),
                reading: true,
            }))
            .unwrap();

        let view = response.view();
        let card = &view.cards()[0];
        assert_eq!(card.title, "Dune");
        assert!(card.badges.iter().any(|badge| badge.label() == READING_BADGE));
        assert_eq!(
            card.action(ActionKind::ToggleReading).label,
            "Mark as Read"
        );
    }

    #[test]
    fn invalid_submission_is_rejected() {
        let mut controller = controller();

        let response = controller
            .handle(Event::Submit(BookInput {
                title: "Dune".to_string(),
                ..BookInput::default()
            }))
            .unwrap();

        assert_eq!(
            response.outcome,
            Outcome::Rejected(ValidationError::MissingField(Field::Author))
        );
        assert!(response.view().is_empty());
        assert!(controller.repository().is_empty());
    }

    #[test]
    fn toggle_and_delete_report_unknown_ids() {
        let mut controller = controller();
        let missing = BookId::from("missing");

        let toggled = controller
            .handle(Event::ToggleReading(missing.clone()))
            .unwrap();
        let deleted = controller.handle(Event::Delete(missing.clone())).unwrap();

        assert_eq!(toggled.outcome, Outcome::NotFound(missing.clone()));
        assert_eq!(deleted.outcome, Outcome::NotFound(missing));
    }

    #[test]
    fn toggle_then_delete() {
        let mut controller = controller();
        let dune = submit(&mut controller, "Dune", "SciFi", "412");

        let toggled = controller
            .handle(Event::ToggleReading(dune.id().clone()))
            .unwrap();
        assert_eq!(
            toggled.outcome,
            Outcome::Toggled {
                id: dune.id().clone(),
                reading: true
            }
        );
        assert!(toggled.visible[0].is_reading());

        let deleted = controller.handle(Event::Delete(dune.id().clone())).unwrap();
        assert_eq!(deleted.outcome, Outcome::Removed(dune.id().clone()));
        assert!(deleted.view().is_empty());
    }

    #[test]
    fn criteria_changes_shape_the_view_but_not_the_library() {
        let mut controller = controller();
        submit(&mut controller, "Dune", "SciFi", "412");
        submit(&mut controller, "Emma", "Classic", "474");
        submit(&mut controller, "Anathem", "SciFi", "937");

        let sorted = controller
            .handle(Event::CriteriaChanged(CriteriaChange::Sort(SortKey::Pages)))
            .unwrap();
        assert_eq!(titles(&sorted), ["Dune", "Emma", "Anathem"]);

        let filtered = controller
            .handle(Event::CriteriaChanged(CriteriaChange::Genre(
                GenreFilter::parse("SciFi"),
            )))
            .unwrap();
        assert_eq!(titles(&filtered), ["Dune", "Anathem"]);
        assert_eq!(
            filtered.outcome,
            Outcome::CriteriaUpdated(Criteria {
                genre: GenreFilter::Genre("SciFi".to_string()),
                sort: SortKey::Pages,
            })
        );

        let stored: Vec<_> = controller
            .repository()
            .books()
            .iter()
            .map(Book::title)
            .collect();
        assert_eq!(stored, ["Dune", "Emma", "Anathem"]);
    }

    #[test]
    fn new_books_respect_current_criteria() {
        let mut controller = controller();
        controller
            .handle(Event::CriteriaChanged(CriteriaChange::Genre(
                GenreFilter::parse("Classic"),
            )))
            .unwrap();

        submit(&mut controller, "Dune", "SciFi", "412");

        assert!(controller.visible().is_empty());
        assert_eq!(controller.repository().len(), 1);
    }
}
