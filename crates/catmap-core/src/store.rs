//! Collaborator ports: where the board's data comes from and where
//! confirmed mappings go.
//!
//! The engine never performs I/O itself. The CLI wires these traits to a
//! SQLite store; tests wire them to in-memory fakes. Calls are blocking and
//! race with the interaction loop only between events, which is why the
//! session defers mid-drag reloads and guards in-flight saves.

use crate::snapshot::MappingPayload;
use anyhow::Result;

/// Everything needed to (re)populate a board for a selected target.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BoardFetch {
    /// Raw categories with no mapping at all, in display order.
    pub unassigned: Vec<String>,
    /// Raw categories already mapped to the selected target, in display order.
    pub assigned: Vec<String>,
    /// The catalog of target category labels.
    pub targets: Vec<String>,
}

/// Source of the unassigned/assigned lists and the target catalog.
pub trait CategorySource {
    /// Fetch board data. `target` selects which mapping group populates the
    /// assigned side; `None` fetches with an empty assigned side.
    ///
    /// # Errors
    ///
    /// Returns any error from the underlying source; the caller surfaces it
    /// as a notice and keeps the current board.
    fn fetch(&mut self, target: Option<&str>) -> Result<BoardFetch>;
}

/// Persistence for confirmed mappings.
pub trait MappingStore {
    /// Replace the mapping set for `payload.target_label` with
    /// `payload.item_ids`.
    ///
    /// # Errors
    ///
    /// Returns any error from the underlying store; the session does *not*
    /// roll back local edits, so the user can retry without re-dragging.
    fn link(&mut self, payload: &MappingPayload) -> Result<()>;

    /// Delete the mapping group for `target` entirely.
    ///
    /// # Errors
    ///
    /// Returns any error from the underlying store.
    fn unlink(&mut self, target: &str) -> Result<()>;
}
