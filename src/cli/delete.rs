use std::path::Path;

use clap::Parser;
use dialoguer::Confirm;
use shelf::{Book, Event, Outcome};
use tracing::instrument;

use super::{
    Library, resolve_id,
    terminal::{Palette, Tone},
};

/// Command arguments for `shelf delete`.
#[derive(Debug, Parser)]
pub struct Delete {
    /// The id of the book, or a unique prefix of it
    id: String,

    /// Skip the confirmation prompt
    #[arg(long, short)]
    yes: bool,
}

impl Delete {
    #[instrument(skip(root))]
    pub fn run(self, root: &Path) -> anyhow::Result<()> {
        let library = Library::open(root);
        let mut controller = library.controller;
        let id = resolve_id(controller.repository().books().iter().map(Book::id), &self.id)
            .map_err(anyhow::Error::msg)?;

        if !self.yes && library.config.confirm_delete {
            let title = controller
                .repository()
                .get(&id)
                .map_or_else(|| id.to_string(), |book| book.title().to_string());
            if !confirm_delete(&title)? {
                println!("Cancelled");
                return Ok(());
            }
        }

        match controller.handle(Event::Delete(id))?.outcome {
            Outcome::Removed(_) => println!(
                "{}",
                Palette::detect().paint("✅ Deleted 1 book", Tone::Success)
            ),
            Outcome::NotFound(id) => anyhow::bail!("Book {id} not found"),
            other => unreachable!("deleting cannot produce {other:?}"),
        }
        Ok(())
    }
}

/// Asks whether the named book should really be deleted.
pub fn confirm_delete(title: &str) -> anyhow::Result<bool> {
    Ok(Confirm::new()
        .with_prompt(format!("Are you sure you want to delete '{title}'?"))
        .default(false)
        .interact()?)
}

#[cfg(test)]
mod tests {
    use shelf::BookInput;

    use super::*;

    #[test]
    fn delete_with_yes_skips_confirmation() {
        let tmp = tempfile::tempdir().unwrap();
        let mut controller = Library::open(tmp.path()).controller;
        for title in ["Dune", "Emma"] {
            controller
                .handle(Event::Submit(BookInput {
                    title: title.to_string(),
                    author: "Someone".to_string(),
                    genre: "Fiction".to_string(),
                    ..BookInput::default()
                }))
                .unwrap();
        }
        let dune = controller.repository().books()[0].id().clone();

        Delete {
            id: dune.to_string(),
            yes: true,
        }
        .run(tmp.path())
        .unwrap();

        let library = Library::open(tmp.path());
        let titles: Vec<_> = library
            .controller
            .repository()
            .books()
            .iter()
            .map(Book::title)
            .collect();
        assert_eq!(titles, ["Emma"]);
    }
}
