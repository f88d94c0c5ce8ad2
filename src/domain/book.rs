//! The book record and the coercions applied to user-supplied input.

use std::fmt;

use chrono::{DateTime, Utc};
use non_empty_string::NonEmptyString;
use serde::{Deserialize, Deserializer, Serialize};
use uuid::Uuid;

/// Opaque, stable identifier of a [`Book`].
///
/// Newly created books get the textual form of a random UUID, but any string
/// read back from storage is accepted as-is.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct BookId(String);

impl BookId {
    /// Generates a fresh random identifier.
    #[must_use]
    pub fn generate() -> Self {
        Self(Uuid::new_v4().to_string())
    }

    /// Returns the identifier as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<String> for BookId {
    fn from(value: String) -> Self {
        Self(value)
    }
}

impl From<&str> for BookId {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

impl AsRef<str> for BookId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for BookId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A single book in the library.
///
/// Field names are persisted in camelCase (`dateAdded`), so lists written by
/// earlier versions of the tracker load unchanged.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Book {
    pub(crate) id: BookId,
    pub(crate) title: String,
    pub(crate) author: String,
    pub(crate) genre: String,
    #[serde(default, deserialize_with = "lenient_pages")]
    pub(crate) pages: u32,
    #[serde(default, deserialize_with = "lenient_reading")]
    pub(crate) reading: bool,
    pub(crate) date_added: DateTime<Utc>,
}

impl Book {
    /// Creates a book from validated input.
    ///
    /// A new random id is generated and the current time is recorded as the
    /// date the book was added.
    #[must_use]
    pub fn new(book: NewBook) -> Self {
        Self::new_with_id(BookId::generate(), book, Utc::now())
    }

    pub(crate) fn new_with_id(id: BookId, book: NewBook, date_added: DateTime<Utc>) -> Self {
        Self {
            id,
            title: book.title.as_str().to_owned(),
            author: book.author.as_str().to_owned(),
            genre: book.genre.as_str().to_owned(),
            pages: book.pages,
            reading: book.reading,
            date_added,
        }
    }

    /// The unique, stable identifier of this book.
    #[must_use]
    pub const fn id(&self) -> &BookId {
        &self.id
    }

    /// The title of the book.
    #[must_use]
    pub fn title(&self) -> &str {
        &self.title
    }

    /// The author of the book.
    #[must_use]
    pub fn author(&self) -> &str {
        &self.author
    }

    /// The genre of the book.
    #[must_use]
    pub fn genre(&self) -> &str {
        &self.genre
    }

    /// The page count, `0` when unknown.
    #[must_use]
    pub const fn pages(&self) -> u32 {
        self.pages
    }

    /// Whether the book is currently being read.
    #[must_use]
    pub const fn is_reading(&self) -> bool {
        self.reading
    }

    /// When the book was added to the library.
    #[must_use]
    pub const fn date_added(&self) -> DateTime<Utc> {
        self.date_added
    }

    /// Flips the reading flag, returning the new value.
    pub(crate) const fn toggle_reading(&mut self) -> bool {
        self.reading = !self.reading;
        self.reading
    }
}

/// A required field of [`BookInput`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Field {
    /// The book title.
    Title,
    /// The book author.
    Author,
    /// The book genre.
    Genre,
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Title => "title",
            Self::Author => "author",
            Self::Genre => "genre",
        };
        f.write_str(name)
    }
}

/// Input rejected by [`BookInput::validate`].
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    /// A required field was empty or contained only whitespace.
    #[error("the {0} is required")]
    MissingField(Field),
}

/// Raw, unvalidated form input for a new book.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BookInput {
    /// The title, required.
    pub title: String,
    /// The author, required.
    pub author: String,
    /// The genre, required.
    pub genre: String,
    /// The page count as typed, if any. See [`parse_pages`].
    pub pages: Option<String>,
    /// Whether the book is being read right now.
    pub reading: bool,
}

impl BookInput {
    /// Checks the required fields and coerces the optional ones.
    ///
    /// Required fields are trimmed. They are checked in the order title,
    /// author, genre and the first empty one is reported.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::MissingField`] if the title, author or genre
    /// is empty after trimming.
    pub fn validate(self) -> Result<NewBook, ValidationError> {
        let title = required(Field::Title, &self.title)?;
        let author = required(Field::Author, &self.author)?;
        let genre = required(Field::Genre, &self.genre)?;

        Ok(NewBook {
            title,
            author,
            genre,
            pages: parse_pages(self.pages.as_deref()),
            reading: self.reading,
        })
    }
}

fn required(field: Field, value: &str) -> Result<NonEmptyString, ValidationError> {
    NonEmptyString::new(value.trim().to_string()).map_err(|_| ValidationError::MissingField(field))
}

/// Validated input for a new book.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewBook {
    title: NonEmptyString,
    author: NonEmptyString,
    genre: NonEmptyString,
    pages: u32,
    reading: bool,
}

/// Coerces a typed page count into a number.
///
/// Leading and trailing whitespace is ignored, as is a leading `+`. The
/// longest run of leading ASCII digits is used, so `"320 pages"` is `320`.
/// Missing input, input without leading digits, and negative numbers all
/// become `0`. Values too large for a `u32` saturate.
#[must_use]
pub fn parse_pages(input: Option<&str>) -> u32 {
    let Some(input) = input else {
        return 0;
    };
    let input = input.trim();
    let input = input.strip_prefix('+').unwrap_or(input);

    input
        .bytes()
        .take_while(u8::is_ascii_digit)
        .fold(0_u32, |acc, digit| {
            acc.saturating_mul(10).saturating_add(u32::from(digit - b'0'))
        })
}

/// Reads a stored page count without failing the whole list.
///
/// Numbers are truncated and clamped to `0..=u32::MAX`, numeric strings go
/// through [`parse_pages`], and anything else is `0`.
fn lenient_pages<'de, D>(deserializer: D) -> Result<u32, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<serde_json::Value>::deserialize(deserializer)?;
    Ok(value.as_ref().map_or(0, coerce_pages))
}

#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn coerce_pages(value: &serde_json::Value) -> u32 {
    use serde_json::Value;

    match value {
        Value::Number(number) => number.as_u64().map_or_else(
            || number.as_f64().filter(|n| *n > 0.0).map_or(0, |n| n as u32),
            |n| u32::try_from(n).unwrap_or(u32::MAX),
        ),
        Value::String(text) => parse_pages(Some(text)),
        _ => 0,
    }
}

/// Reads a stored `reading` flag the way a loosely typed writer meant it:
/// `null` is false, and other values count by their truthiness.
fn lenient_reading<'de, D>(deserializer: D) -> Result<bool, D::Error>
where
    D: Deserializer<'de>,
{
    use serde_json::Value;

    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(match value {
        None | Some(Value::Null) => false,
        Some(Value::Bool(flag)) => flag,
        Some(Value::Number(number)) => number.as_f64().is_some_and(|n| n != 0.0),
        Some(Value::String(text)) => !text.is_empty(),
        Some(Value::Array(_) | Value::Object(_)) => true,
    })
}

#[cfg(test)]
pub(crate) fn sample(id: &str, title: &str, author: &str, genre: &str, pages: u32) -> Book {
    let input = BookInput {
        title: title.to_string(),
        author: author.to_string(),
        genre: genre.to_string(),
        pages: Some(pages.to_string()),
        reading: false,
    };
    Book::new_with_id(
        BookId::from(id),
        input.validate().unwrap(),
        DateTime::from_timestamp(1_700_000_000, 0).unwrap(),
    )
}
