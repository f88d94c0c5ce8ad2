//! Derived views over the book list.
//!
//! Everything here is pure: the stored list is never reordered or mutated,
//! callers always get back a new sequence.

use std::{cmp::Ordering, fmt, str::FromStr};

use serde::{Deserialize, Serialize};

use crate::domain::Book;

/// Which genre to show.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum GenreFilter {
    /// Show every book.
    #[default]
    All,
    /// Show only books whose genre matches exactly.
    Genre(String),
}

impl GenreFilter {
    /// The sentinel accepted in place of a genre name.
    pub const ALL: &'static str = "all";

    /// Parses a filter value, treating exactly `"all"` as
    /// [`GenreFilter::All`].
    ///
    /// Genres are an open set, so `"All"` is an ordinary genre name.
    #[must_use]
    pub fn parse(value: &str) -> Self {
        let value = value.trim();
        if value == Self::ALL {
            Self::All
        } else {
            Self::Genre(value.to_string())
        }
    }

    /// Whether the given book passes this filter.
    #[must_use]
    pub fn matches(&self, book: &Book) -> bool {
        match self {
            Self::All => true,
            Self::Genre(genre) => book.genre() == genre,
        }
    }
}

impl FromStr for GenreFilter {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self::parse(s))
    }
}

impl fmt::Display for GenreFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::All => f.write_str(Self::ALL),
            Self::Genre(genre) => f.write_str(genre),
        }
    }
}

impl Serialize for GenreFilter {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for GenreFilter {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let value = String::deserialize(deserializer)?;
        Ok(Self::parse(&value))
    }
}

/// The field a view is ordered by.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum,
)]
#[serde(rename_all = "lowercase")]
pub enum SortKey {
    /// Case-insensitive title.
    #[default]
    Title,
    /// Case-insensitive author.
    Author,
    /// Case-insensitive genre.
    Genre,
    /// Page count, ascending.
    Pages,
}

impl SortKey {
    /// Parses a sort key, falling back to [`SortKey::Title`] for anything
    /// unrecognised.
    #[must_use]
    pub fn parse_lenient(value: &str) -> Self {
        match value.trim().to_ascii_lowercase().as_str() {
            "author" => Self::Author,
            "genre" => Self::Genre,
            "pages" => Self::Pages,
            _ => Self::Title,
        }
    }

    fn compare(self, a: &Book, b: &Book) -> Ordering {
        match self {
            Self::Title => compare_text(a.title(), b.title()),
            Self::Author => compare_text(a.author(), b.author()),
            Self::Genre => compare_text(a.genre(), b.genre()),
            Self::Pages => a.pages().cmp(&b.pages()),
        }
    }
}

impl fmt::Display for SortKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Title => "title",
            Self::Author => "author",
            Self::Genre => "genre",
            Self::Pages => "pages",
        };
        f.write_str(name)
    }
}

fn compare_text(a: &str, b: &str) -> Ordering {
    a.to_lowercase().cmp(&b.to_lowercase())
}

/// Returns the books that pass `filter`, in their original order.
#[must_use]
pub fn filter(books: &[Book], filter: &GenreFilter) -> Vec<Book> {
    books
        .iter()
        .filter(|book| filter.matches(book))
        .cloned()
        .collect()
}

/// Orders books by `key`.
///
/// The sort is stable: books with equal keys keep their relative order.
#[must_use]
pub fn sort(mut books: Vec<Book>, key: SortKey) -> Vec<Book> {
    books.sort_by(|a, b| key.compare(a, b));
    books
}

/// The session's view settings: which genre to show and how to order it.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Criteria {
    /// The genre filter.
    pub genre: GenreFilter,
    /// The sort key.
    pub sort: SortKey,
}

impl Criteria {
    /// Filters, then sorts, a copy of `books`.
    #[must_use]
    pub fn apply(&self, books: &[Book]) -> Vec<Book> {
        sort(filter(books, &self.genre), self.sort)
    }
}

#[cfg(test)]
mod tests {
    use test_case::test_case;

    use super::*;
    use crate::domain::book::sample;

    fn ids(books: &[Book]) -> Vec<&str> {
        books.iter().map(|book| book.id().as_str()).collect()
    }

    fn library() -> Vec<Book> {
        vec![
            sample("1", "dune", "Herbert", "SciFi", 412),
            sample("2", "Emma", "austen", "Classic", 0),
            sample("3", "Anathem", "Stephenson", "SciFi", 937),
            sample("4", "beloved", "Morrison", "Literary", 324),
        ]
    }

    #[test]
    fn filter_all_is_identity() {
        let books = library();
        assert_eq!(filter(&books, &GenreFilter::All), books);
    }

    #[test]
    fn filter_by_genre_preserves_order() {
        let books = library();
        let filtered = filter(&books, &GenreFilter::Genre("SciFi".to_string()));
        assert_eq!(ids(&filtered), ["1", "3"]);
    }

    #[test]
    fn filter_genre_is_exact() {
        let books = library();
        assert!(filter(&books, &GenreFilter::Genre("scifi".to_string())).is_empty());
    }

    #[test]
    fn genre_named_all_can_be_filtered() {
        let books = vec![
            sample("1", "Omnibus", "Various", "All", 900),
            sample("2", "Dune", "Herbert", "SciFi", 412),
        ];

        let filtered = filter(&books, &GenreFilter::parse("All"));

        assert_eq!(ids(&filtered), ["1"]);
        assert_eq!(filter(&books, &GenreFilter::parse("all")).len(), 2);
    }

    #[test_case("all", GenreFilter::All; "sentinel")]
    #[test_case(" all ", GenreFilter::All; "sentinel with padding")]
    #[test_case(" ALL ", GenreFilter::Genre("ALL".to_string()); "other case is a genre")]
    #[test_case("SciFi", GenreFilter::Genre("SciFi".to_string()); "genre")]
    fn genre_filter_parse(value: &str, expected: GenreFilter) {
        assert_eq!(GenreFilter::parse(value), expected);
    }

    #[test_case(SortKey::Title, &["3", "4", "1", "2"]; "title ignores case")]
    #[test_case(SortKey::Author, &["2", "1", "4", "3"]; "author ignores case")]
    #[test_case(SortKey::Genre, &["2", "4", "1", "3"]; "genre keeps ties stable")]
    #[test_case(SortKey::Pages, &["2", "4", "1", "3"]; "pages numeric")]
    fn sort_orders_by_key(key: SortKey, expected: &[&str]) {
        assert_eq!(ids(&sort(library(), key)), expected);
    }

    #[test]
    fn sort_by_pages_is_stable_on_ties() {
        let books = vec![
            sample("a", "Same", "X", "G", 3),
            sample("b", "Same", "X", "G", 1),
            sample("c", "Same", "X", "G", 2),
            sample("d", "Same", "X", "G", 1),
        ];

        let sorted = sort(books, SortKey::Pages);

        assert_eq!(ids(&sorted), ["b", "d", "c", "a"]);
    }

    #[test_case("title", SortKey::Title)]
    #[test_case("Author", SortKey::Author)]
    #[test_case("genre", SortKey::Genre)]
    #[test_case("pages", SortKey::Pages)]
    #[test_case("rating", SortKey::Title; "unknown falls back to title")]
    fn sort_key_parse_lenient(value: &str, expected: SortKey) {
        assert_eq!(SortKey::parse_lenient(value), expected);
    }

    #[test]
    fn criteria_apply_does_not_touch_input() {
        let books = library();
        let criteria = Criteria {
            genre: GenreFilter::Genre("SciFi".to_string()),
            sort: SortKey::Pages,
        };

        let view = criteria.apply(&books);

        assert_eq!(ids(&view), ["1", "3"]);
        assert_eq!(ids(&books), ["1", "2", "3", "4"]);
    }
}
