//! `cm init` — create the project skeleton.

use crate::config;
use crate::store::SqliteStore;
use anyhow::{Context as _, Result};
use clap::Args;
use std::path::Path;

#[derive(Args, Debug)]
pub struct InitArgs {
    /// Force re-initialization even if `.catmap/` already exists.
    #[arg(long)]
    pub force: bool,
}

const CONFIG_TOML: &str = "[store]\n\
    # Path to the SQLite database, relative to the project root.\n\
    # db_path = \".catmap/catmap.db\"\n";

/// Execute `cm init`. Creates the project skeleton:
///
/// ```text
/// .catmap/
///   config.toml     (commented default config)
///   catmap.db       (empty SQLite store with schema applied)
/// ```
///
/// # Errors
///
/// Returns an error if `.catmap/` already exists and `--force` is not set,
/// or if any filesystem or database operation fails.
pub fn run_init(args: &InitArgs, project_root: &Path) -> Result<()> {
    let catmap_dir = project_root.join(".catmap");

    if catmap_dir.exists() && !args.force {
        anyhow::bail!(".catmap/ already exists. Use `cm init --force` to reinitialize.");
    }

    std::fs::create_dir_all(&catmap_dir)
        .with_context(|| format!("failed to create {}", catmap_dir.display()))?;

    let config_path = catmap_dir.join("config.toml");
    if !config_path.exists() || args.force {
        std::fs::write(&config_path, CONFIG_TOML)
            .with_context(|| format!("failed to write {}", config_path.display()))?;
    }

    let db_path = config::resolve_db_path(project_root)?;
    let _store = SqliteStore::open(&db_path)?;

    println!("Initialized catmap project in {}", catmap_dir.display());
    println!("Next: `cm import <file>` to load raw categories, `cm target add <name>`.");
    Ok(())
}
