use std::path::Path;

use clap::Parser;
use shelf::{Book, Event, Outcome};
use tracing::instrument;

use super::{
    Library, resolve_id,
    terminal::{Palette, Tone},
};

/// Command arguments for `shelf toggle`.
#[derive(Debug, Parser)]
pub struct Toggle {
    /// The id of the book, or a unique prefix of it
    id: String,
}

impl Toggle {
    #[instrument(skip(root))]
    pub fn run(self, root: &Path) -> anyhow::Result<()> {
        let mut controller = Library::open(root).controller;
        let id = resolve_id(controller.repository().books().iter().map(Book::id), &self.id)
            .map_err(anyhow::Error::msg)?;

        let response = controller.handle(Event::ToggleReading(id))?;
        match &response.outcome {
            Outcome::Toggled { id, reading } => {
                let title = controller
                    .repository()
                    .get(id)
                    .map_or_else(|| id.to_string(), |book| book.title().to_string());
                let status = if *reading {
                    "now reading"
                } else {
                    "marked as read"
                };
                println!(
                    "{}",
                    Palette::detect().paint(format!("✅ '{title}' {status}"), Tone::Success)
                );
            }
            Outcome::NotFound(id) => anyhow::bail!("Book {id} not found"),
            other => unreachable!("toggling cannot produce {other:?}"),
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use shelf::BookInput;

    use super::*;

    #[test]
    fn toggle_by_prefix_flips_status() {
        let tmp = tempfile::tempdir().unwrap();
        let mut controller = Library::open(tmp.path()).controller;
        let Outcome::Added(book) = controller
            .handle(Event::Submit(BookInput {
                title: "Dune".to_string(),
                author: "Herbert".to_string(),
                genre: "SciFi".to_string(),
                ..BookInput::default()
            }))
            .unwrap()
            .outcome
        else {
            panic!("book was not added");
        };

        Toggle {
            id: book.id().as_str()[..8].to_string(),
        }
        .run(tmp.path())
        .unwrap();

        let library = Library::open(tmp.path());
        assert!(library.controller.repository().books()[0].is_reading());
    }

    #[test]
    fn toggle_unknown_id_fails() {
        let tmp = tempfile::tempdir().unwrap();
        let toggle = Toggle {
            id: "missing".to_string(),
        };
        assert!(toggle.run(tmp.path()).is_err());
    }
}
