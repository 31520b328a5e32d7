//! `cm status` — quick orientation: target catalog with mapped counts and
//! the raw categories still needing attention.

use crate::config;
use crate::output::{OutputMode, pretty_section, render};
use crate::store::SqliteStore;
use anyhow::Result;
use clap::Args;
use serde::Serialize;
use std::io::Write;
use std::path::Path;

#[derive(Args, Debug, Default)]
pub struct StatusArgs {}

#[derive(Debug, Serialize)]
struct TargetCount {
    name: String,
    mapped: u64,
}

#[derive(Debug, Serialize)]
struct StatusOutput {
    targets: Vec<TargetCount>,
    unmapped: Vec<String>,
}

/// Execute `cm status`.
///
/// # Errors
///
/// Returns database failures.
pub fn run_status(_args: &StatusArgs, output: OutputMode, project_root: &Path) -> Result<()> {
    let db_path = config::resolve_db_path(project_root)?;
    let store = SqliteStore::open(&db_path)?;

    let payload = StatusOutput {
        targets: store
            .mapping_counts()?
            .into_iter()
            .map(|(name, mapped)| TargetCount { name, mapped })
            .collect(),
        unmapped: store.unmapped()?,
    };

    render(output, &payload, |v, w| {
        pretty_section(w, "Target categories")?;
        if v.targets.is_empty() {
            writeln!(w, "  (none — add one with `cm target add <name>`)")?;
        }
        for target in &v.targets {
            writeln!(w, "  {:<32} {:>4} mapped", target.name, target.mapped)?;
        }
        writeln!(w)?;
        pretty_section(w, "Unmapped raw categories")?;
        if v.unmapped.is_empty() {
            writeln!(w, "  (none — everything is mapped)")?;
        }
        for name in &v.unmapped {
            writeln!(w, "  {name}")?;
        }
        Ok(())
    })
}
