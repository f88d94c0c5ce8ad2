//! An interactive library session.
//!
//! Each line typed is one command. Filter and sort changes are held by the
//! session's controller and forgotten when the session ends.

use std::{
    io::{self, BufRead, Write},
    path::Path,
};

use clap::Parser;
use shelf::{
    Book, BookInput, Controller, CriteriaChange, Event, GenreFilter, Outcome, SortKey,
    storage::KeyValueStore,
};
use tracing::instrument;

use super::{
    Library, add, delete,
    print::Printer,
    resolve_id,
    terminal::{Palette, Tone, is_narrow},
};

const HELP: &str = "\
Commands:
  add                                   fill in a new book interactively
  add TITLE | AUTHOR | GENRE [| PAGES] [| reading]
  toggle ID                             flip reading status
  delete ID                             delete a book
  genre GENRE|all                       show one genre, or all
  sort title|author|genre|pages         change the sort order
  list                                  show the books again
  genres                                list the genres in the library
  help                                  show this message
  quit                                  end the session
";

/// Command arguments for `shelf shell`.
#[derive(Debug, Parser)]
pub struct Shell {
    /// Delete without asking for confirmation
    #[arg(long)]
    no_confirm: bool,
}

impl Shell {
    #[instrument(skip(root))]
    pub fn run(self, root: &Path) -> anyhow::Result<()> {
        let Library { config, controller } = Library::open(root);
        let mut session = Session {
            controller,
            confirm_delete: config.confirm_delete && !self.no_confirm,
            palette: Palette::detect(),
            narrow: is_narrow(),
        };

        let mut stdout = io::stdout();
        writeln!(
            stdout,
            "{}",
            session
                .palette
                .paint("Type 'help' for commands, 'quit' to leave.", Tone::Muted)
        )?;
        session.show(&mut stdout)?;

        let mut lines = io::stdin().lock().lines();
        loop {
            write!(stdout, "shelf> ")?;
            stdout.flush()?;

            let Some(line) = lines.next() else {
                writeln!(stdout)?;
                break;
            };

            let command = match parse_line(&line?) {
                Ok(Some(command)) => command,
                Ok(None) => continue,
                Err(e) => {
                    writeln!(stdout, "{}", session.palette.paint(e, Tone::Warning))?;
                    continue;
                }
            };

            if session.execute(command, &mut stdout, &mut Terminal)? == Flow::Quit {
                break;
            }
        }

        Ok(())
    }
}

/// One line of input.
#[derive(Debug, Clone, PartialEq, Eq)]
enum ShellCommand {
    /// Add a book; `None` asks for the fields.
    Add(Option<BookInput>),
    Toggle(String),
    Delete(String),
    Criteria(CriteriaChange),
    List,
    Genres,
    Help,
    Quit,
}

/// Parses one line, returning `None` for blank lines.
fn parse_line(line: &str) -> Result<Option<ShellCommand>, String> {
    let line = line.trim();
    if line.is_empty() {
        return Ok(None);
    }

    let (word, rest) = line
        .split_once(char::is_whitespace)
        .map_or((line, ""), |(word, rest)| (word, rest.trim()));

    let command = match word.to_ascii_lowercase().as_str() {
        "add" if rest.is_empty() => ShellCommand::Add(None),
        "add" => ShellCommand::Add(Some(parse_inline_book(rest)?)),
        "toggle" => ShellCommand::Toggle(argument(word, rest)?),
        "delete" | "rm" => ShellCommand::Delete(argument(word, rest)?),
        "genre" | "filter" => {
            ShellCommand::Criteria(CriteriaChange::Genre(GenreFilter::parse(&argument(word, rest)?)))
        }
        "sort" => {
            ShellCommand::Criteria(CriteriaChange::Sort(SortKey::parse_lenient(&argument(word, rest)?)))
        }
        "list" | "ls" => ShellCommand::List,
        "genres" => ShellCommand::Genres,
        "help" | "?" => ShellCommand::Help,
        "quit" | "exit" | "q" => ShellCommand::Quit,
        other => return Err(format!("unknown command '{other}', type 'help' for commands")),
    };
    Ok(Some(command))
}

fn argument(command: &str, rest: &str) -> Result<String, String> {
    if rest.is_empty() {
        Err(format!("'{command}' needs an argument"))
    } else {
        Ok(rest.to_string())
    }
}

/// Parses `TITLE | AUTHOR | GENRE [| PAGES] [| reading]`.
///
/// Required fields are passed through untouched so the usual validation
/// applies to them.
fn parse_inline_book(rest: &str) -> Result<BookInput, String> {
    let fields: Vec<&str> = rest.split('|').map(str::trim).collect();
    let [title, author, genre, optional @ ..] = fields.as_slice() else {
        return Err("expected TITLE | AUTHOR | GENRE [| PAGES] [| reading]".to_string());
    };

    let mut input = BookInput {
        title: (*title).to_string(),
        author: (*author).to_string(),
        genre: (*genre).to_string(),
        ..BookInput::default()
    };
    for field in optional {
        if field.eq_ignore_ascii_case("reading") {
            input.reading = true;
        } else if input.pages.is_none() {
            input.pages = Some((*field).to_string());
        } else {
            return Err(format!("unexpected field '{field}'"));
        }
    }
    Ok(input)
}

/// Whether the session should keep going.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Flow {
    Continue,
    Quit,
}

/// The interactive parts of a session.
trait Prompter {
    /// Asks for every field of a new book.
    fn book_form(&mut self) -> anyhow::Result<BookInput>;

    /// Asks whether a book should really be deleted.
    fn confirm_delete(&mut self, title: &str) -> anyhow::Result<bool>;
}

/// Prompts on the terminal.
struct Terminal;

impl Prompter for Terminal {
    fn book_form(&mut self) -> anyhow::Result<BookInput> {
        add::prompt_form()
    }

    fn confirm_delete(&mut self, title: &str) -> anyhow::Result<bool> {
        delete::confirm_delete(title)
    }
}

struct Session<S> {
    controller: Controller<S>,
    confirm_delete: bool,
    palette: Palette,
    narrow: bool,
}

impl<S: KeyValueStore> Session<S> {
    fn execute(
        &mut self,
        command: ShellCommand,
        out: &mut impl Write,
        prompter: &mut impl Prompter,
    ) -> anyhow::Result<Flow> {
        let event = match command {
            ShellCommand::Add(input) => {
                let input = match input {
                    Some(input) => input,
                    None => prompter.book_form()?,
                };
                Event::Submit(input)
            }
            ShellCommand::Toggle(id) => match self.resolve(&id) {
                Ok(id) => Event::ToggleReading(id),
                Err(e) => return self.warn(out, &e),
            },
            ShellCommand::Delete(id) => {
                let id = match self.resolve(&id) {
                    Ok(id) => id,
                    Err(e) => return self.warn(out, &e),
                };
                if self.confirm_delete {
                    let title = self
                        .controller
                        .repository()
                        .get(&id)
                        .map_or_else(|| id.to_string(), |book| book.title().to_string());
                    if !prompter.confirm_delete(&title)? {
                        writeln!(out, "Cancelled")?;
                        return Ok(Flow::Continue);
                    }
                }
                Event::Delete(id)
            }
            ShellCommand::Criteria(change) => Event::CriteriaChanged(change),
            ShellCommand::List => {
                self.show(out)?;
                return Ok(Flow::Continue);
            }
            ShellCommand::Genres => {
                let genres = self.controller.repository().genres();
                if genres.is_empty() {
                    writeln!(out, "No genres yet")?;
                } else {
                    writeln!(out, "{}", genres.join(", "))?;
                }
                return Ok(Flow::Continue);
            }
            ShellCommand::Help => {
                write!(out, "{HELP}")?;
                return Ok(Flow::Continue);
            }
            ShellCommand::Quit => return Ok(Flow::Quit),
        };

        let response = self.controller.handle(event)?;
        let printer = self.printer();
        let (message, tone) = match &response.outcome {
            Outcome::Added(book) => (
                format!("Added '{}' ({})", book.title(), printer.short_id(book.id())),
                Tone::Success,
            ),
            Outcome::Rejected(e) => (format!("Not added: {e}"), Tone::Warning),
            Outcome::Toggled { reading: true, .. } => {
                ("Marked as reading".to_string(), Tone::Success)
            }
            Outcome::Toggled { reading: false, .. } => ("Marked as read".to_string(), Tone::Success),
            Outcome::Removed(_) => ("Deleted".to_string(), Tone::Success),
            Outcome::NotFound(id) => (format!("No book {id}"), Tone::Warning),
            Outcome::CriteriaUpdated(criteria) => (
                format!("Showing {} sorted by {}", criteria.genre, criteria.sort),
                Tone::Muted,
            ),
        };
        writeln!(out, "{}", self.palette.paint(message, tone))?;
        write!(out, "{}", printer.format_view(&response.view()))?;

        Ok(Flow::Continue)
    }

    /// A printer naming books by prefixes unique in the current library.
    fn printer(&self) -> Printer<'_> {
        Printer::new(self.controller.repository().books(), self.palette, self.narrow)
    }

    fn show(&self, out: &mut impl Write) -> io::Result<()> {
        let visible = self.controller.visible();
        write!(out, "{}", self.printer().format_view(&shelf::render(&visible)))
    }

    fn warn(&self, out: &mut impl Write, message: &str) -> anyhow::Result<Flow> {
        writeln!(out, "{}", self.palette.paint(message, Tone::Warning))?;
        Ok(Flow::Continue)
    }

    fn resolve(&self, input: &str) -> Result<shelf::BookId, String> {
        resolve_id(
            self.controller.repository().books().iter().map(Book::id),
            input,
        )
    }
}
