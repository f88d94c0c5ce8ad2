//! Declarative rendering of a book list.
//!
//! [`render`] turns a derived list into a [`View`]: plain data describing what
//! to show and which actions each card offers. Binding actions to input is
//! left to whatever displays the view.

use serde::Serialize;

use crate::domain::{Book, BookId};

/// Shown in place of the card list when there is nothing to display.
pub const EMPTY_MESSAGE: &str = "No books found. Add some books to your library!";

/// Badge text for books being read.
pub const READING_BADGE: &str = "Currently Reading";

/// What to display for a list of books.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum View<'a> {
    /// There are no books to show.
    Empty {
        /// The placeholder text.
        message: &'static str,
    },
    /// One card per book, in display order.
    Cards {
        /// The cards.
        cards: Vec<Card<'a>>,
    },
}

impl View<'_> {
    /// The cards in this view, empty for [`View::Empty`].
    #[must_use]
    pub fn cards(&self) -> &[Card<'_>] {
        match self {
            Self::Empty { .. } => &[],
            Self::Cards { cards } => cards,
        }
    }

    /// Whether this is the empty placeholder.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        matches!(self, Self::Empty { .. })
    }
}

/// The display unit for one book.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Card<'a> {
    /// The book's id.
    pub id: &'a BookId,
    /// The title.
    pub title: &'a str,
    /// The author line, e.g. `by Frank Herbert`.
    pub byline: String,
    /// The genre.
    pub genre: &'a str,
    /// The page count, omitted when unknown.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pages: Option<u32>,
    /// Whether the book is being read.
    pub reading: bool,
    /// Status badges, in display order.
    pub badges: Vec<Badge<'a>>,
    /// The actions offered on the card.
    pub actions: [Action<'a>; 2],
}

/// A status badge on a card.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", content = "label", rename_all = "snake_case")]
pub enum Badge<'a> {
    /// The book is currently being read.
    Reading,
    /// The book's genre.
    Genre(&'a str),
}

impl Badge<'_> {
    /// The text shown on the badge.
    #[must_use]
    pub const fn label(&self) -> &str {
        match self {
            Self::Reading => READING_BADGE,
            Self::Genre(genre) => genre,
        }
    }
}

/// Something the user can do to a book.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ActionKind {
    /// Flip the reading flag.
    ToggleReading,
    /// Remove the book.
    Delete,
}

/// An action affordance, tagged with the book it applies to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Action<'a> {
    /// What the action does.
    pub kind: ActionKind,
    /// The text shown for the action.
    pub label: &'static str,
    /// The book the action applies to.
    pub id: &'a BookId,
}

impl<'a> Card<'a> {
    /// Builds the card for a single book.
    #[must_use]
    pub fn new(book: &'a Book) -> Self {
        let mut badges = Vec::with_capacity(2);
        if book.is_reading() {
            badges.push(Badge::Reading);
        }
        badges.push(Badge::Genre(book.genre()));

        let toggle_label = if book.is_reading() {
            "Mark as Read"
        } else {
            "Mark as Reading"
        };

        Self {
            id: book.id(),
            title: book.title(),
            byline: format!("by {}", book.author()),
            genre: book.genre(),
            pages: (book.pages() > 0).then_some(book.pages()),
            reading: book.is_reading(),
            badges,
            actions: [
                Action {
                    kind: ActionKind::ToggleReading,
                    label: toggle_label,
                    id: book.id(),
                },
                Action {
                    kind: ActionKind::Delete,
                    label: "Delete",
                    id: book.id(),
                },
            ],
        }
    }

    /// Finds the action of the given kind.
    #[must_use]
    pub fn action(&self, kind: ActionKind) -> &Action<'a> {
        match kind {
            ActionKind::ToggleReading => &self.actions[0],
            ActionKind::Delete => &self.actions[1],
        }
    }
}

/// Renders books, in the order given.
#[must_use]
pub fn render(books: &[Book]) -> View<'_> {
    if books.is_empty() {
        View::Empty {
            message: EMPTY_MESSAGE,
        }
    } else {
        View::Cards {
            cards: books.iter().map(Card::new).collect(),
        }
    }
}
