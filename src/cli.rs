use std::path::{Path, PathBuf};

mod add;
mod delete;
mod list;
mod print;
mod shell;
mod terminal;
mod toggle;

use add::Add;
use clap::ArgAction;
use delete::Delete;
use list::List;
use shelf::{BookId, BookStorage, Config, Controller, Criteria, FileStore, Repository};
use shell::Shell;
use tracing::instrument;
use toggle::Toggle;

/// The directory, under the library root, holding configuration and storage.
const SHELF_DIR: &str = ".shelf";

#[derive(Debug, clap::Parser)]
#[command(version, about)]
pub struct Cli {
    /// Verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    verbose: u8,

    /// The path to the root of the library
    #[arg(short, long, default_value = ".", global = true)]
    root: PathBuf,

    #[command(subcommand)]
    command: Option<Command>,
}

impl Cli {
    pub fn run(self) -> anyhow::Result<()> {
        Self::setup_logging(self.verbose);

        self.command
            .unwrap_or_else(|| Command::List(List::default()))
            .run(&self.root)
    }

    fn setup_logging(verbosity: u8) {
        use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

        let level = match verbosity {
            0 => tracing::Level::WARN,
            1 => tracing::Level::INFO,
            2 => tracing::Level::DEBUG,
            _ => tracing::Level::TRACE,
        };

        let filter = tracing_subscriber::EnvFilter::from_default_env().add_directive(level.into());

        let fmt_layer = tracing_subscriber::fmt::layer()
            .with_writer(std::io::stderr)
            .with_target(false)
            .with_thread_names(false)
            .with_line_number(false);

        tracing_subscriber::registry()
            .with(filter)
            .with(fmt_layer)
            .init();
    }
}

#[derive(Debug, clap::Parser)]
pub enum Command {
    /// Initialize a new library
    Init,

    /// Add a book
    ///
    /// Any required field not given as a flag is prompted for.
    Add(Add),

    /// List books, filtered and sorted (default)
    List(List),

    /// Flip the reading status of a book
    Toggle(Toggle),

    /// Delete a book
    Delete(Delete),

    /// List the genres in the library
    Genres,

    /// Start an interactive session
    ///
    /// Filter and sort settings changed during the session last until it
    /// ends.
    Shell(Shell),
}

impl Command {
    fn run(self, root: &Path) -> anyhow::Result<()> {
        match self {
            Self::Init => Init::run(root)?,
            Self::Add(command) => command.run(root)?,
            Self::List(command) => command.run(root)?,
            Self::Toggle(command) => command.run(root)?,
            Self::Delete(command) => command.run(root)?,
            Self::Genres => Genres::run(root),
            Self::Shell(command) => command.run(root)?,
        }
        Ok(())
    }
}

struct Init;

impl Init {
    #[instrument]
    fn run(root: &Path) -> anyhow::Result<()> {
        use std::fs;

        let shelf_dir = root.join(SHELF_DIR);
        if shelf_dir.exists() {
            anyhow::bail!("Library already initialized (found existing {SHELF_DIR} directory)");
        }

        fs::create_dir_all(shelf_dir.join("storage"))
            .map_err(|e| anyhow::anyhow!("Failed to create {SHELF_DIR} directory: {e}"))?;

        Config::default()
            .save(&shelf_dir.join("config.toml"))
            .map_err(|e| anyhow::anyhow!("Failed to create config.toml: {e}"))?;

        println!("Initialized library in {}", root.display());
        println!("  Created: {SHELF_DIR}/config.toml");
        println!("  Created: {SHELF_DIR}/storage/");
        println!();
        println!("Next steps:");
        println!("  shelf add --title \"Dune\" --author \"Frank Herbert\" --genre SciFi");

        Ok(())
    }
}

struct Genres;

impl Genres {
    #[instrument]
    fn run(root: &Path) {
        let library = Library::open(root);
        let repository = library.controller.repository();
        let genres = repository.genres();

        if genres.is_empty() {
            println!("No books yet. Add one with 'shelf add'.");
            return;
        }

        for genre in genres {
            let count = repository
                .books()
                .iter()
                .filter(|book| book.genre() == genre)
                .count();
            println!("{genre} ({count})");
        }
    }
}

/// A library opened from disk, with the session it starts.
pub struct Library {
    pub config: Config,
    pub controller: Controller<FileStore>,
}

impl Library {
    /// Opens the library under `root`.
    ///
    /// The book list is loaded from `root/.shelf/storage`; a missing or
    /// unreadable configuration falls back to the defaults.
    pub fn open(root: &Path) -> Self {
        let shelf_dir = root.join(SHELF_DIR);
        let config = load_config(&shelf_dir);

        let store = FileStore::new(shelf_dir.join("storage"));
        let storage = BookStorage::with_key(store, config.storage_key());
        let criteria = Criteria {
            genre: config.default_genre.clone(),
            sort: config.default_sort,
        };
        let controller = Controller::new(Repository::open(storage), criteria);

        Self { config, controller }
    }
}

fn load_config(shelf_dir: &Path) -> Config {
    let path = shelf_dir.join("config.toml");
    Config::load(&path).unwrap_or_else(|e| {
        tracing::debug!("Failed to load config: {e}");
        Config::default()
    })
}

/// Resolves a book id typed by the user.
///
/// An exact match wins; otherwise the input may be any prefix shared by
/// exactly one book, so the short ids shown in listings can be typed back.
fn resolve_id<'a>(
    ids: impl IntoIterator<Item = &'a BookId>,
    input: &str,
) -> Result<BookId, String> {
    let input = input.trim();
    if input.is_empty() {
        return Err("a book id is required".to_string());
    }

    let mut matches = Vec::new();
    for id in ids {
        if id.as_str() == input {
            return Ok(id.clone());
        }
        if id.as_str().starts_with(input) {
            matches.push(id);
        }
    }

    match matches.as_slice() {
        [] => Err(format!("no book with id '{input}'")),
        [id] => Ok((*id).clone()),
        _ => Err(format!(
            "'{input}' matches {} books, use more characters",
            matches.len()
        )),
    }
}
