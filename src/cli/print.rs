//! Printing of rendered views.

use std::fmt::Write as _;

use clap::ValueEnum;
use shelf::{
    Book, BookId, View,
    view::{ActionKind, Badge, Card},
};

use super::terminal::{Palette, Tone, is_narrow};

/// The fewest characters of an id shown in listings.
const SHORT_ID_LEN: usize = 8;

/// Supported output formats.
#[derive(Copy, Clone, Debug, Eq, PartialEq, ValueEnum, Default)]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}

/// Writes views and book ids for one library.
///
/// Ids are shortened to the shortest prefix, of at least eight characters,
/// that names a single book in the whole library, so any id shown can be
/// typed back into `toggle` or `delete`.
#[derive(Debug)]
pub struct Printer<'a> {
    library: Vec<&'a str>,
    palette: Palette,
    narrow: bool,
}

impl<'a> Printer<'a> {
    pub fn new(library: &'a [Book], palette: Palette, narrow: bool) -> Self {
        Self {
            library: library.iter().map(|book| book.id().as_str()).collect(),
            palette,
            narrow,
        }
    }

    /// A printer styled for the terminal on stdout.
    pub fn for_terminal(library: &'a [Book]) -> Self {
        Self::new(library, Palette::detect(), is_narrow())
    }

    pub const fn palette(&self) -> Palette {
        self.palette
    }

    /// The shortest prefix of `id` shared with no other book, or the whole
    /// id when there is none.
    pub fn short_id<'b>(&self, id: &'b BookId) -> &'b str {
        let id = id.as_str();
        id.char_indices()
            .skip(SHORT_ID_LEN)
            .map(|(end, _)| &id[..end])
            .find(|prefix| self.names_one_book(prefix))
            .unwrap_or(id)
    }

    fn names_one_book(&self, prefix: &str) -> bool {
        self.library
            .iter()
            .filter(|id| id.starts_with(prefix))
            .count()
            == 1
    }

    /// Prints `view` to stdout in the given format.
    pub fn print(&self, view: &View<'_>, format: OutputFormat) -> anyhow::Result<()> {
        match format {
            OutputFormat::Json => println!("{}", serde_json::to_string_pretty(view)?),
            OutputFormat::Text => print!("{}", self.format_view(view)),
        }
        Ok(())
    }

    /// Formats a view as text, one block per card, or one line per card on a
    /// narrow terminal.
    pub fn format_view(&self, view: &View<'_>) -> String {
        let cards = match view {
            View::Empty { message } => {
                return format!("{}\n", self.palette.paint(message, Tone::Muted));
            }
            View::Cards { cards } => cards,
        };

        let mut out = String::new();
        for card in cards {
            if self.narrow {
                self.format_line(&mut out, card);
            } else {
                self.format_card(&mut out, card);
            }
        }
        out
    }

    fn format_line(&self, out: &mut String, card: &Card<'_>) {
        let marker = if card.reading { "*" } else { " " };
        let _ = writeln!(
            out,
            "{marker} {} {} {}",
            self.palette.paint(self.short_id(card.id), Tone::Muted),
            self.palette.paint(card.title, Tone::Title),
            self.palette.paint(&card.byline, Tone::Muted)
        );
    }

    fn format_card(&self, out: &mut String, card: &Card<'_>) {
        let paint = |text: &str, tone| self.palette.paint(text, tone);

        let _ = writeln!(out, "{}", paint(card.title, Tone::Title));
        let _ = writeln!(out, "  {}", card.byline);
        let _ = writeln!(out, "  Genre: {}", card.genre);
        if let Some(pages) = card.pages {
            let _ = writeln!(out, "  Pages: {pages}");
        }

        let badges: Vec<String> = card
            .badges
            .iter()
            .map(|badge| {
                let tone = match badge {
                    Badge::Reading => Tone::Success,
                    Badge::Genre(_) => Tone::Badge,
                };
                paint(&format!("[{}]", badge.label()), tone)
            })
            .collect();
        let _ = writeln!(out, "  {}", badges.join(" "));

        let id = self.short_id(card.id);
        let toggle = card.action(ActionKind::ToggleReading);
        let delete = card.action(ActionKind::Delete);
        let hint = format!(
            "{}: shelf toggle {id}   {}: shelf delete {id}",
            toggle.label, delete.label
        );
        let _ = writeln!(out, "  {}", paint(&hint, Tone::Muted));
        out.push('\n');
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;
    use shelf::render;

    use super::*;
    use crate::cli::resolve_id;

    /// A book as stored by the browser tracker, which uses timestamp ids.
    fn book(id: &str, title: &str, genre: &str) -> Book {
        serde_json::from_value(json!({
            "id": id,
            "title": title,
            "author": "Herbert",
            "genre": genre,
            "pages": 412,
            "reading": true,
            "dateAdded": "2023-11-14T22:13:20Z",
        }))
        .unwrap()
    }

    /// The ids offered in the `shelf toggle ID` hints of a wide listing.
    fn hinted_ids(text: &str) -> Vec<&str> {
        text.split("shelf toggle ")
            .skip(1)
            .filter_map(|rest| rest.split_whitespace().next())
            .collect()
    }

    #[test]
    fn empty_view_prints_placeholder() {
        let printer = Printer::new(&[], Palette::PLAIN, false);
        assert!(printer.format_view(&render(&[])).contains("No books found"));
    }

    #[test]
    fn card_shows_details_and_actions() {
        let books = [book("0123456789abcdef", "Dune", "SciFi")];
        let printer = Printer::new(&books, Palette::PLAIN, false);

        let text = printer.format_view(&render(&books));

        assert!(text.contains("Dune"));
        assert!(text.contains("by Herbert"));
        assert!(text.contains("Pages: 412"));
        assert!(text.contains("Currently Reading"));
        assert!(text.contains("Mark as Read: shelf toggle 01234567 "));
    }

    #[test]
    fn narrow_view_is_one_line_per_book() {
        let books = [book("a1", "Dune", "SciFi"), book("a2", "Emma", "Classic")];
        let printer = Printer::new(&books, Palette::PLAIN, true);

        let text = printer.format_view(&render(&books));

        assert_eq!(text.lines().count(), 2);
        assert!(text.starts_with("* a1 Dune"));
    }

    #[test]
    fn short_id_keeps_eight_characters_when_unique() {
        let books = [book("0123456789abcdef", "Dune", "SciFi"), book("123", "Emma", "Classic")];
        let printer = Printer::new(&books, Palette::PLAIN, false);

        assert_eq!(printer.short_id(books[0].id()), "01234567");
        assert_eq!(printer.short_id(books[1].id()), "123");
    }

    #[test]
    fn timestamp_ids_are_shown_long_enough_to_type_back() {
        let books = [
            book("1700000000000", "Dune", "SciFi"),
            book("1700000042000", "Emma", "Classic"),
            book("1700000042500", "Anathem", "SciFi"),
        ];
        let printer = Printer::new(&books, Palette::PLAIN, false);

        let text = printer.format_view(&render(&books));
        let shown = hinted_ids(&text);

        assert_eq!(shown, ["170000000", "17000000420", "17000000425"]);
        for (shown, book) in shown.iter().zip(&books) {
            let ids = books.iter().map(Book::id);
            assert_eq!(&resolve_id(ids, shown).unwrap(), book.id());
        }
    }

    #[test]
    fn ids_are_unique_across_the_library_not_just_the_view() {
        let books = [
            book("1700000000000", "Dune", "SciFi"),
            book("1700000000900", "Emma", "Classic"),
        ];
        let printer = Printer::new(&books, Palette::PLAIN, false);

        let text = printer.format_view(&render(&books[..1]));

        assert_eq!(hinted_ids(&text), ["17000000000"]);
    }

    #[test]
    fn duplicate_ids_are_shown_in_full() {
        let books = [
            book("1700000000000", "Dune", "SciFi"),
            book("1700000000000", "Emma", "Classic"),
        ];
        let printer = Printer::new(&books, Palette::PLAIN, false);

        assert_eq!(printer.short_id(books[0].id()), "1700000000000");
    }
}
