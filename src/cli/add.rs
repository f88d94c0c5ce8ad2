use std::path::Path;

use clap::Parser;
use dialoguer::{Confirm, Input};
use shelf::{BookInput, Event, Outcome};
use tracing::instrument;

use super::{Library, print::Printer, terminal::Tone};

/// Command arguments for `shelf add`.
#[derive(Debug, Parser)]
pub struct Add {
    /// The title of the book.
    #[arg(long, short)]
    title: Option<String>,

    /// The author of the book.
    #[arg(long, short)]
    author: Option<String>,

    /// The genre of the book.
    #[arg(long, short)]
    genre: Option<String>,

    /// The number of pages.
    #[arg(long, short)]
    pages: Option<String>,

    /// Mark the book as currently being read.
    #[arg(long)]
    reading: bool,

    /// Never prompt; fail if a required field is missing.
    #[arg(long)]
    no_input: bool,
}

impl Add {
    #[instrument(skip(root))]
    pub fn run(self, root: &Path) -> anyhow::Result<()> {
        let input = if self.no_input {
            self.into_input()
        } else {
            self.prompt_missing()?
        };

        let mut controller = Library::open(root).controller;
        match controller.handle(Event::Submit(input))?.outcome {
            Outcome::Added(book) => {
                let printer = Printer::for_terminal(controller.repository().books());
                let message = format!(
                    "✅ Added '{}' by {} ({})",
                    book.title(),
                    book.author(),
                    printer.short_id(book.id())
                );
                println!("{}", printer.palette().paint(message, Tone::Success));
                Ok(())
            }
            Outcome::Rejected(e) => anyhow::bail!("Book not added: {e}"),
            other => unreachable!("submitting a book cannot produce {other:?}"),
        }
    }

    fn into_input(self) -> BookInput {
        BookInput {
            title: self.title.unwrap_or_default(),
            author: self.author.unwrap_or_default(),
            genre: self.genre.unwrap_or_default(),
            pages: self.pages,
            reading: self.reading,
        }
    }

    /// Asks for every required field not given on the command line.
    ///
    /// Optional fields are only asked for when the form is being filled in
    /// interactively anyway.
    fn prompt_missing(self) -> anyhow::Result<BookInput> {
        let interactive = self.title.is_none() || self.author.is_none() || self.genre.is_none();

        let title = required(self.title, "Title")?;
        let author = required(self.author, "Author")?;
        let genre = required(self.genre, "Genre")?;

        let (pages, reading) = if interactive && self.pages.is_none() && !self.reading {
            let pages = Input::<String>::new()
                .with_prompt("Pages (optional)")
                .allow_empty(true)
                .interact_text()?;
            let reading = Confirm::new()
                .with_prompt("Currently reading?")
                .default(false)
                .interact()?;
            (Some(pages), reading)
        } else {
            (self.pages, self.reading)
        };

        Ok(BookInput {
            title,
            author,
            genre,
            pages,
            reading,
        })
    }
}

fn required(value: Option<String>, prompt: &str) -> anyhow::Result<String> {
    match value {
        Some(value) => Ok(value),
        None => Ok(Input::<String>::new().with_prompt(prompt).interact_text()?),
    }
}

/// Prompts for every field of a new book.
pub fn prompt_form() -> anyhow::Result<BookInput> {
    Add {
        title: None,
        author: None,
        genre: None,
        pages: None,
        reading: false,
        no_input: false,
    }
    .prompt_missing()
}
