//! `cm assign` — non-interactive quick-assign: link raw categories to a
//! target without opening the board.
//!
//! Drives the same engine path the board's one-click shortcut uses, so the
//! resulting store state is indistinguishable from a drag-and-save session.

use crate::config;
use crate::output::{CliError, OutputMode, TerminalSink, render_error};
use crate::store::SqliteStore;
use anyhow::Result;
use catmap_core::{BoardSession, reload_board, save_board};
use clap::Args;
use std::path::Path;

#[derive(Args, Debug)]
pub struct AssignArgs {
    /// Raw categories to assign.
    #[arg(required = true)]
    pub categories: Vec<String>,

    /// Target category to link them to.
    #[arg(long, short)]
    pub target: String,
}

/// Execute `cm assign`.
///
/// # Errors
///
/// Returns an error for unknown raw categories, load failures, or a failed
/// save.
pub fn run_assign(args: &AssignArgs, output: OutputMode, project_root: &Path) -> Result<()> {
    let db_path = config::resolve_db_path(project_root)?;
    let mut store = SqliteStore::open(&db_path)?;
    let mut sink = TerminalSink::new(output);

    let mut session = BoardSession::with_default_groups();
    session.set_target(Some(args.target.clone()));
    if !reload_board(&mut session, &mut store, &mut sink) {
        anyhow::bail!("failed to load the board");
    }

    let unknown: Vec<&str> = args
        .categories
        .iter()
        .map(String::as_str)
        .filter(|name| !session.registry().contains(name))
        .collect();
    if !unknown.is_empty() {
        render_error(
            output,
            &CliError::with_details(
                format!("unknown raw categories: {}", unknown.join(", ")),
                "import them first, or free them from another target via `cm status`",
                "unknown_raw_category",
            ),
        )?;
        anyhow::bail!("unknown raw categories");
    }

    for name in &args.categories {
        // `false` here means the item already sits in the assigned group —
        // idempotent, same as quick-assigning an already-mapped card.
        let _ = session.quick_assign(name)?;
    }

    if !save_board(&mut session, &mut store, &mut sink) {
        anyhow::bail!("save failed");
    }
    Ok(())
}
