use std::path::Path;

use clap::Parser;
use shelf::{CriteriaChange, Event, GenreFilter, SortKey};
use tracing::instrument;

use super::{
    Library,
    print::{OutputFormat, Printer},
};

/// Command arguments for `shelf list`.
#[derive(Debug, Parser, Default)]
#[command(about = "List books, filtered and sorted")]
pub struct List {
    /// Show only this genre ('all' for every genre; default from config).
    #[arg(long, value_name = "GENRE")]
    genre: Option<GenreFilter>,

    /// Sort field (default from config).
    #[arg(long, value_enum)]
    sort: Option<SortKey>,

    /// Output format (default: text).
    #[arg(long, value_enum, default_value_t)]
    output: OutputFormat,
}

impl List {
    #[instrument(level = "debug", skip_all)]
    pub fn run(self, root: &Path) -> anyhow::Result<()> {
        let mut controller = Library::open(root).controller;

        let mut changes = Vec::new();
        if let Some(genre) = self.genre {
            changes.push(CriteriaChange::Genre(genre));
        }
        if let Some(sort) = self.sort {
            changes.push(CriteriaChange::Sort(sort));
        }

        let mut visible = controller.visible();
        for change in changes {
            visible = controller.handle(Event::CriteriaChanged(change))?.visible;
        }

        Printer::for_terminal(controller.repository().books())
            .print(&shelf::render(&visible), self.output)
    }
}
