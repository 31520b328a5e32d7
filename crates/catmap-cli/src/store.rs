//! SQLite-backed category store.
//!
//! Three normalized tables: the raw category inventory, the curated target
//! catalog, and the mapping edges between them. A raw category maps to at
//! most one target (`raw_name` is the primary key of `mappings`), matching
//! the board model where an item sits in exactly one group.
//!
//! `link` replaces a target's mapping set wholesale in one transaction —
//! the saved payload *is* the assigned column, so partial updates would
//! leave ghost rows behind.

use anyhow::{Context, Result};
use catmap_core::{BoardFetch, CategorySource, MappingPayload, MappingStore};
use rusqlite::{Connection, params};
use std::path::Path;
use tracing::{debug, info};

const SCHEMA_SQL: &str = r"
CREATE TABLE IF NOT EXISTS raw_categories (
    name TEXT PRIMARY KEY CHECK (length(trim(name)) > 0),
    created_at_us INTEGER NOT NULL
);

CREATE TABLE IF NOT EXISTS target_categories (
    name TEXT PRIMARY KEY CHECK (length(trim(name)) > 0),
    created_at_us INTEGER NOT NULL
);

CREATE TABLE IF NOT EXISTS mappings (
    raw_name TEXT PRIMARY KEY REFERENCES raw_categories(name) ON DELETE CASCADE,
    target_name TEXT NOT NULL REFERENCES target_categories(name) ON DELETE CASCADE,
    linked_at_us INTEGER NOT NULL
);

CREATE INDEX IF NOT EXISTS idx_mappings_target ON mappings(target_name);
";

pub struct SqliteStore {
    conn: Connection,
}

impl SqliteStore {
    /// Open (and if needed create) the store at `path`.
    ///
    /// # Errors
    ///
    /// Returns filesystem or SQLite failures.
    pub fn open(path: &Path) -> Result<Self> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("failed to create {}", parent.display()))?;
        }
        let conn = Connection::open(path)
            .with_context(|| format!("failed to open database {}", path.display()))?;
        Self::from_connection(conn)
    }

    /// In-memory store for tests.
    ///
    /// # Errors
    ///
    /// Returns SQLite failures.
    #[cfg(test)]
    pub fn open_in_memory() -> Result<Self> {
        Self::from_connection(Connection::open_in_memory()?)
    }

    fn from_connection(conn: Connection) -> Result<Self> {
        conn.pragma_update(None, "foreign_keys", true)
            .context("enable foreign keys")?;
        conn.execute_batch(SCHEMA_SQL).context("apply schema")?;
        Ok(Self { conn })
    }

    fn now_us() -> i64 {
        chrono::Utc::now().timestamp_micros()
    }

    /// Insert raw category names, skipping ones already present. Returns
    /// how many were actually added.
    ///
    /// # Errors
    ///
    /// Returns SQLite failures.
    pub fn add_raw_categories(&mut self, names: &[String]) -> Result<usize> {
        let tx = self.conn.transaction()?;
        let mut added = 0;
        {
            let mut stmt = tx.prepare(
                "INSERT OR IGNORE INTO raw_categories (name, created_at_us) VALUES (?1, ?2)",
            )?;
            for name in names {
                added += stmt.execute(params![name, Self::now_us()])?;
            }
        }
        tx.commit()?;
        debug!(added, total = names.len(), "imported raw categories");
        Ok(added)
    }

    /// Add a target category. Returns `false` when it already existed.
    ///
    /// # Errors
    ///
    /// Returns SQLite failures.
    pub fn add_target(&mut self, name: &str) -> Result<bool> {
        let changed = self.conn.execute(
            "INSERT OR IGNORE INTO target_categories (name, created_at_us) VALUES (?1, ?2)",
            params![name, Self::now_us()],
        )?;
        Ok(changed > 0)
    }

    /// Delete a target category and, via cascade, its mappings. Returns
    /// `false` when no such target existed.
    ///
    /// # Errors
    ///
    /// Returns SQLite failures.
    pub fn remove_target(&mut self, name: &str) -> Result<bool> {
        let changed = self
            .conn
            .execute("DELETE FROM target_categories WHERE name = ?1", params![name])?;
        Ok(changed > 0)
    }

    /// Target labels in catalog order (alphabetical).
    ///
    /// # Errors
    ///
    /// Returns SQLite failures.
    pub fn list_targets(&self) -> Result<Vec<String>> {
        let mut stmt = self
            .conn
            .prepare("SELECT name FROM target_categories ORDER BY name")?;
        let rows = stmt.query_map([], |row| row.get::<_, String>(0))?;
        rows.collect::<rusqlite::Result<Vec<_>>>()
            .context("list targets")
    }

    /// Per-target mapped-category counts, including empty targets.
    ///
    /// # Errors
    ///
    /// Returns SQLite failures.
    pub fn mapping_counts(&self) -> Result<Vec<(String, u64)>> {
        let mut stmt = self.conn.prepare(
            "SELECT t.name, COUNT(m.raw_name)
             FROM target_categories t
             LEFT JOIN mappings m ON m.target_name = t.name
             GROUP BY t.name
             ORDER BY t.name",
        )?;
        let rows = stmt.query_map([], |row| Ok((row.get::<_, String>(0)?, row.get::<_, u64>(1)?)))?;
        rows.collect::<rusqlite::Result<Vec<_>>>()
            .context("count mappings")
    }

    /// Raw categories with no mapping at all.
    ///
    /// # Errors
    ///
    /// Returns SQLite failures.
    pub fn unmapped(&self) -> Result<Vec<String>> {
        let mut stmt = self.conn.prepare(
            "SELECT r.name FROM raw_categories r
             LEFT JOIN mappings m ON m.raw_name = r.name
             WHERE m.raw_name IS NULL
             ORDER BY r.name",
        )?;
        let rows = stmt.query_map([], |row| row.get::<_, String>(0))?;
        rows.collect::<rusqlite::Result<Vec<_>>>()
            .context("list unmapped")
    }
}

impl CategorySource for SqliteStore {
    fn fetch(&mut self, target: Option<&str>) -> Result<BoardFetch> {
        let unassigned = self.unmapped()?;
        let assigned = match target {
            Some(target) => {
                let mut stmt = self.conn.prepare(
                    "SELECT raw_name FROM mappings WHERE target_name = ?1 ORDER BY raw_name",
                )?;
                let rows = stmt.query_map(params![target], |row| row.get::<_, String>(0))?;
                rows.collect::<rusqlite::Result<Vec<_>>>()
                    .context("list mapped")?
            }
            None => Vec::new(),
        };
        let targets = self.list_targets()?;
        Ok(BoardFetch {
            unassigned,
            assigned,
            targets,
        })
    }
}

impl MappingStore for SqliteStore {
    fn link(&mut self, payload: &MappingPayload) -> Result<()> {
        let tx = self.conn.transaction()?;
        let now = Self::now_us();
        // A save against a target added through the board's "add new" flow
        // creates the catalog row on the way through.
        tx.execute(
            "INSERT OR IGNORE INTO target_categories (name, created_at_us) VALUES (?1, ?2)",
            params![payload.target_label, now],
        )?;
        tx.execute(
            "DELETE FROM mappings WHERE target_name = ?1",
            params![payload.target_label],
        )?;
        {
            let mut stmt = tx.prepare(
                "INSERT OR REPLACE INTO mappings (raw_name, target_name, linked_at_us)
                 VALUES (?1, ?2, ?3)",
            )?;
            for id in &payload.item_ids {
                stmt.execute(params![id, payload.target_label, now])?;
            }
        }
        tx.commit()?;
        info!(
            target = %payload.target_label,
            count = payload.item_ids.len(),
            "mapping saved"
        );
        Ok(())
    }

    fn unlink(&mut self, target: &str) -> Result<()> {
        let removed = self.remove_target(target)?;
        if removed {
            info!(target = %target, "mapping group deleted");
        } else {
            debug!(target = %target, "delete of unknown mapping group");
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::SqliteStore;
    use catmap_core::{CategorySource, MappingPayload, MappingStore};

    fn names(values: &[&str]) -> Vec<String> {
        values.iter().map(ToString::to_string).collect()
    }

    fn seeded() -> SqliteStore {
        let mut store = SqliteStore::open_in_memory().unwrap();
        store
            .add_raw_categories(&names(&["Bakery", "Coffee", "Rent"]))
            .unwrap();
        store.add_target("Food").unwrap();
        store
    }

    #[test]
    fn import_skips_duplicates() {
        let mut store = seeded();
        let added = store
            .add_raw_categories(&names(&["Coffee", "Utilities"]))
            .unwrap();
        assert_eq!(added, 1);
        assert_eq!(
            store.unmapped().unwrap(),
            vec!["Bakery", "Coffee", "Rent", "Utilities"]
        );
    }

    #[test]
    fn fetch_splits_unmapped_and_mapped() {
        let mut store = seeded();
        store
            .link(&MappingPayload {
                item_ids: names(&["Coffee", "Bakery"]),
                target_label: "Food".to_string(),
            })
            .unwrap();

        let fetch = store.fetch(Some("Food")).unwrap();
        assert_eq!(fetch.unassigned, vec!["Rent"]);
        assert_eq!(fetch.assigned, vec!["Bakery", "Coffee"]);
        assert_eq!(fetch.targets, vec!["Food"]);

        // A different target sees the mapped raws as taken, not available.
        store.add_target("Housing").unwrap();
        let fetch = store.fetch(Some("Housing")).unwrap();
        assert_eq!(fetch.unassigned, vec!["Rent"]);
        assert!(fetch.assigned.is_empty());
    }

    #[test]
    fn link_replaces_the_mapping_set() {
        let mut store = seeded();
        store
            .link(&MappingPayload {
                item_ids: names(&["Coffee", "Bakery"]),
                target_label: "Food".to_string(),
            })
            .unwrap();
        store
            .link(&MappingPayload {
                item_ids: names(&["Coffee"]),
                target_label: "Food".to_string(),
            })
            .unwrap();

        let fetch = store.fetch(Some("Food")).unwrap();
        assert_eq!(fetch.assigned, vec!["Coffee"]);
        // Bakery went back to the unmapped pool.
        assert!(fetch.unassigned.contains(&"Bakery".to_string()));
    }

    #[test]
    fn link_creates_missing_target() {
        let mut store = seeded();
        store
            .link(&MappingPayload {
                item_ids: names(&["Rent"]),
                target_label: "Housing".to_string(),
            })
            .unwrap();
        assert_eq!(store.list_targets().unwrap(), vec!["Food", "Housing"]);
    }

    #[test]
    fn unlink_cascades_mappings() {
        let mut store = seeded();
        store
            .link(&MappingPayload {
                item_ids: names(&["Coffee"]),
                target_label: "Food".to_string(),
            })
            .unwrap();
        store.unlink("Food").unwrap();

        assert!(store.list_targets().unwrap().is_empty());
        assert_eq!(store.unmapped().unwrap(), vec!["Bakery", "Coffee", "Rent"]);

        // Deleting a target that never existed is quiet.
        store.unlink("Ghost").unwrap();
    }

    #[test]
    fn mapping_counts_include_empty_targets() {
        let mut store = seeded();
        store.add_target("Housing").unwrap();
        store
            .link(&MappingPayload {
                item_ids: names(&["Coffee", "Bakery"]),
                target_label: "Food".to_string(),
            })
            .unwrap();
        assert_eq!(
            store.mapping_counts().unwrap(),
            vec![("Food".to_string(), 2), ("Housing".to_string(), 0)]
        );
    }
}
