//! `cm import` — load raw category names into the store.

use crate::config;
use crate::output::{OutputMode, render};
use crate::store::SqliteStore;
use anyhow::{Context as _, Result};
use clap::Args;
use serde::Serialize;
use std::io::{Read, Write};
use std::path::{Path, PathBuf};

#[derive(Args, Debug)]
pub struct ImportArgs {
    /// File with one raw category name per line (`-` reads stdin).
    pub file: PathBuf,
}

#[derive(Debug, Serialize)]
struct ImportOutput {
    added: usize,
    skipped: usize,
    total: usize,
}

/// Execute `cm import`. Blank lines are ignored; names already in the
/// store are skipped, not errors — re-importing an export is safe.
///
/// # Errors
///
/// Returns read or database failures.
pub fn run_import(args: &ImportArgs, output: OutputMode, project_root: &Path) -> Result<()> {
    let raw = if args.file.as_os_str() == "-" {
        let mut buf = String::new();
        std::io::stdin()
            .read_to_string(&mut buf)
            .context("failed to read stdin")?;
        buf
    } else {
        std::fs::read_to_string(&args.file)
            .with_context(|| format!("failed to read {}", args.file.display()))?
    };

    let mut names: Vec<String> = Vec::new();
    for line in raw.lines() {
        let name = line.trim();
        if name.is_empty() || names.iter().any(|seen| seen == name) {
            continue;
        }
        names.push(name.to_string());
    }

    let db_path = config::resolve_db_path(project_root)?;
    let mut store = SqliteStore::open(&db_path)?;
    let added = store.add_raw_categories(&names)?;

    let payload = ImportOutput {
        added,
        skipped: names.len() - added,
        total: names.len(),
    };
    render(output, &payload, |v, w| {
        writeln!(
            w,
            "Imported {} new raw categories ({} already present).",
            v.added, v.skipped
        )
    })
}
