//! Board data model: groups and the draggable category items they hold.
//!
//! Group membership is a tagged field on each item, so "every item belongs
//! to exactly one group" holds structurally — there is no per-group list to
//! drift out of sync.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Stable key identifying a logical group on the board.
///
/// The board ships with two well-known groups ([`GroupId::unassigned`] and
/// [`GroupId::assigned`]), but nothing in the engine assumes the group count
/// is two — registries are built over an ordered list of arbitrary groups.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct GroupId(String);

impl GroupId {
    #[must_use]
    pub fn new(key: impl Into<String>) -> Self {
        Self(key.into())
    }

    /// The well-known key for the unassigned (raw) side of the board.
    #[must_use]
    pub fn unassigned() -> Self {
        Self("unassigned".to_string())
    }

    /// The well-known key for the assigned (mapped) side of the board.
    #[must_use]
    pub fn assigned() -> Self {
        Self("assigned".to_string())
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for GroupId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for GroupId {
    fn from(key: &str) -> Self {
        Self(key.to_string())
    }
}

impl From<String> for GroupId {
    fn from(key: String) -> Self {
        Self(key)
    }
}

/// A logical bucket on the board. Order of groups is the display order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Group {
    pub id: GroupId,
    pub title: String,
}

impl Group {
    #[must_use]
    pub fn new(id: impl Into<GroupId>, title: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
        }
    }

    /// The canonical "Unassigned" group holding raw categories awaiting a
    /// mapping.
    #[must_use]
    pub fn unassigned() -> Self {
        Self {
            id: GroupId::unassigned(),
            title: "Unassigned".to_string(),
        }
    }

    /// The canonical "Assigned" group holding categories staged for the
    /// selected target.
    #[must_use]
    pub fn assigned() -> Self {
        Self {
            id: GroupId::assigned(),
            title: "Assigned".to_string(),
        }
    }
}

/// One draggable unit: a raw category name and the group it currently sits
/// in. Identity (`id`) is preserved across every reorder and reassignment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryItem {
    pub id: String,
    pub content: String,
    pub group: GroupId,
}

impl CategoryItem {
    #[must_use]
    pub fn new(id: impl Into<String>, content: impl Into<String>, group: GroupId) -> Self {
        Self {
            id: id.into(),
            content: content.into(),
            group,
        }
    }

    /// Build an item whose id and display content are both the raw category
    /// name — the common case when loading from the category source.
    #[must_use]
    pub fn named(name: impl Into<String>, group: GroupId) -> Self {
        let name = name.into();
        Self {
            id: name.clone(),
            content: name,
            group,
        }
    }
}
