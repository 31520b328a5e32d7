//! `cm board` — launch the interactive assignment board.

use crate::config;
use crate::store::SqliteStore;
use crate::tui::board::BoardView;
use anyhow::Result;
use clap::Args;
use std::path::Path;

#[derive(Args, Debug)]
pub struct BoardArgs {
    /// Preselect a target category (defaults to the first in the catalog).
    #[arg(long, short)]
    pub target: Option<String>,
}

/// Execute `cm board`: full-screen board until the user quits.
///
/// # Errors
///
/// Returns database or terminal failures.
pub fn run_board(args: &BoardArgs, project_root: &Path) -> Result<()> {
    let db_path = config::resolve_db_path(project_root)?;
    let store = SqliteStore::open(&db_path)?;
    let mut view = BoardView::new(store, args.target.clone())?;

    let mut terminal = ratatui::init();
    let result = view.run(&mut terminal);
    ratatui::restore();
    result
}
