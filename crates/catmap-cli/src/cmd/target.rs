//! `cm target` — manage the catalog of target categories.

use crate::config;
use crate::output::{CliError, OutputMode, render, render_error};
use crate::store::SqliteStore;
use anyhow::Result;
use clap::{Args, Subcommand};
use serde::Serialize;
use std::io::Write;
use std::path::Path;

#[derive(Args, Debug)]
pub struct TargetArgs {
    #[command(subcommand)]
    pub command: TargetCommand,
}

#[derive(Subcommand, Debug)]
pub enum TargetCommand {
    /// Add a target category to the catalog.
    Add {
        /// Label of the new target category.
        name: String,
    },
    /// List target categories with their mapped counts.
    List,
    /// Remove a target category and its mapping group.
    Remove {
        /// Label of the target category to delete.
        name: String,
    },
}

#[derive(Debug, Serialize)]
struct TargetRow {
    name: String,
    mapped: u64,
}

/// Execute `cm target`.
///
/// # Errors
///
/// Returns database failures, or an error when removing an unknown target.
pub fn run_target(args: &TargetArgs, output: OutputMode, project_root: &Path) -> Result<()> {
    let db_path = config::resolve_db_path(project_root)?;
    let mut store = SqliteStore::open(&db_path)?;

    match &args.command {
        TargetCommand::Add { name } => {
            if store.add_target(name)? {
                println!("Added target category {name}.");
            } else {
                println!("Target category {name} already exists.");
            }
            Ok(())
        }
        TargetCommand::List => {
            let rows: Vec<TargetRow> = store
                .mapping_counts()?
                .into_iter()
                .map(|(name, mapped)| TargetRow { name, mapped })
                .collect();
            render(output, &rows, |rows, w| {
                for row in rows {
                    writeln!(w, "{:<32} {:>4} mapped", row.name, row.mapped)?;
                }
                Ok(())
            })
        }
        TargetCommand::Remove { name } => {
            if store.remove_target(name)? {
                println!("Removed target category {name} and its mappings.");
                Ok(())
            } else {
                render_error(
                    output,
                    &CliError::with_details(
                        format!("no target category named '{name}'"),
                        "see `cm target list` for the catalog",
                        "unknown_target",
                    ),
                )?;
                anyhow::bail!("unknown target category");
            }
        }
    }
}
