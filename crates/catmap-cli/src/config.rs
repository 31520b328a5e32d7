//! CLI configuration: where the catmap database lives and how output is
//! formatted by default.
//!
//! Project config lives at `.catmap/config.toml` under the project root;
//! user config at the platform config dir (`catmap/config.toml`). The
//! `CATMAP_DB` environment variable overrides both for the database path.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::env;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ProjectConfig {
    #[serde(default)]
    pub store: StoreConfig,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct StoreConfig {
    /// Path to the SQLite database. Relative paths resolve against the
    /// project root.
    #[serde(default)]
    pub db_path: Option<PathBuf>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UserConfig {
    /// Default output format when no flag or env var is given:
    /// `pretty` | `text` | `json`.
    #[serde(default)]
    pub output: Option<String>,
}

/// Load `.catmap/config.toml` from the project root. A missing file is an
/// empty config, not an error.
///
/// # Errors
///
/// Returns read or TOML parse failures for an existing file.
pub fn load_project_config(project_root: &Path) -> Result<ProjectConfig> {
    let path = project_root.join(".catmap/config.toml");
    if !path.exists() {
        return Ok(ProjectConfig::default());
    }
    let raw = std::fs::read_to_string(&path)
        .with_context(|| format!("failed to read {}", path.display()))?;
    toml::from_str(&raw).with_context(|| format!("failed to parse {}", path.display()))
}

/// Load the user-level config, if any.
#[must_use]
pub fn load_user_config() -> UserConfig {
    let Some(path) = dirs::config_dir().map(|dir| dir.join("catmap/config.toml")) else {
        return UserConfig::default();
    };
    let Ok(raw) = std::fs::read_to_string(&path) else {
        return UserConfig::default();
    };
    toml::from_str(&raw).unwrap_or_else(|err| {
        tracing::warn!(path = %path.display(), %err, "ignoring unparsable user config");
        UserConfig::default()
    })
}

fn resolve_db_path_inner(
    env_override: Option<&str>,
    config: &ProjectConfig,
    project_root: &Path,
) -> PathBuf {
    if let Some(path) = env_override {
        return PathBuf::from(path);
    }
    match &config.store.db_path {
        Some(path) if path.is_absolute() => path.clone(),
        Some(path) => project_root.join(path),
        None => project_root.join(".catmap/catmap.db"),
    }
}

/// Resolve the database path: `CATMAP_DB` wins, then the project config,
/// then `.catmap/catmap.db` under the project root.
///
/// # Errors
///
/// Returns config read/parse failures.
pub fn resolve_db_path(project_root: &Path) -> Result<PathBuf> {
    let env_override = env::var("CATMAP_DB").ok();
    let config = load_project_config(project_root)?;
    Ok(resolve_db_path_inner(
        env_override.as_deref(),
        &config,
        project_root,
    ))
}
