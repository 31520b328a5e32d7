//! Ordered item collection and the reorder/reassign primitives behind the
//! board's live drag preview.
//!
//! The registry owns one flat, ordered `Vec` of items spanning all groups
//! (per-group views are derived by filtering), mirroring how the board
//! renders columns out of a single sortable list. All move primitives are
//! O(n) in the item count — they run on every hover event, so there is no
//! room for anything slower.
//!
//! Operations referencing an id the registry does not know are silent
//! no-ops: drag events race with upstream data refreshes, and a stale hover
//! must never be an error.

use crate::model::{CategoryItem, Group, GroupId};
use tracing::{trace, warn};

/// Ordered collection of items plus the ordered group list they belong to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ItemRegistry {
    groups: Vec<Group>,
    items: Vec<CategoryItem>,
}

impl ItemRegistry {
    /// Build an empty registry over the given ordered groups.
    ///
    /// Groups with a duplicate id are dropped (first occurrence wins).
    #[must_use]
    pub fn new(groups: Vec<Group>) -> Self {
        let mut seen: Vec<GroupId> = Vec::with_capacity(groups.len());
        let mut kept = Vec::with_capacity(groups.len());
        for group in groups {
            if seen.contains(&group.id) {
                warn!(group = %group.id, "dropping duplicate group");
                continue;
            }
            seen.push(group.id.clone());
            kept.push(group);
        }
        Self {
            groups: kept,
            items: Vec::new(),
        }
    }

    /// Replace the item collection wholesale.
    ///
    /// Items with a duplicate id (first wins) or an unknown group are
    /// dropped with a warning, so the registry invariants hold no matter
    /// what the upstream source sent.
    pub fn replace_items(&mut self, items: Vec<CategoryItem>) {
        let mut kept: Vec<CategoryItem> = Vec::with_capacity(items.len());
        for item in items {
            if kept.iter().any(|existing| existing.id == item.id) {
                warn!(id = %item.id, "dropping duplicate item id");
                continue;
            }
            if !self.has_group(&item.group) {
                warn!(id = %item.id, group = %item.group, "dropping item with unknown group");
                continue;
            }
            kept.push(item);
        }
        self.items = kept;
    }

    #[must_use]
    pub fn items(&self) -> &[CategoryItem] {
        &self.items
    }

    #[must_use]
    pub fn groups(&self) -> &[Group] {
        &self.groups
    }

    #[must_use]
    pub fn group(&self, id: &GroupId) -> Option<&Group> {
        self.groups.iter().find(|g| g.id == *id)
    }

    #[must_use]
    pub fn has_group(&self, id: &GroupId) -> bool {
        self.group(id).is_some()
    }

    /// Items currently in `group`, in board order.
    pub fn items_in<'a>(&'a self, group: &'a GroupId) -> impl Iterator<Item = &'a CategoryItem> {
        self.items.iter().filter(move |item| item.group == *group)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    #[must_use]
    pub fn contains(&self, id: &str) -> bool {
        self.index_of(id).is_some()
    }

    #[must_use]
    pub fn get(&self, id: &str) -> Option<&CategoryItem> {
        self.index_of(id).map(|idx| &self.items[idx])
    }

    /// Zero-based position of `id` within its own group, the group's size,
    /// and the group id. Drives narration ("at position 2 of 5").
    #[must_use]
    pub fn position_in_group(&self, id: &str) -> Option<(usize, usize, GroupId)> {
        let group = self.get(id)?.group.clone();
        let mut position = 0;
        let mut size = 0;
        for item in self.items_in(&group) {
            if item.id == id {
                position = size;
            }
            size += 1;
        }
        Some((position, size, group))
    }

    /// Zero-based position of a group in the group order, plus the count.
    #[must_use]
    pub fn group_position(&self, id: &GroupId) -> Option<(usize, usize)> {
        self.groups
            .iter()
            .position(|g| g.id == *id)
            .map(|idx| (idx, self.groups.len()))
    }

    fn index_of(&self, id: &str) -> Option<usize> {
        self.items.iter().position(|item| item.id == id)
    }

    /// Drag an item over another item.
    ///
    /// Same group: a plain array move, preserving the relative order of all
    /// other items. Different groups: the active item takes the hovered
    /// item's group and lands at the slot just *before* it (clamped at the
    /// front), so the dragged card does not visually overshoot its target.
    ///
    /// Returns `true` if the registry changed.
    pub fn move_item_over_item(&mut self, active_id: &str, over_id: &str) -> bool {
        if active_id == over_id {
            return false;
        }
        let Some(from) = self.index_of(active_id) else {
            trace!(id = active_id, "move over item: active id unknown");
            return false;
        };
        let Some(over) = self.index_of(over_id) else {
            trace!(id = over_id, "move over item: over id unknown");
            return false;
        };

        let over_group = self.items[over].group.clone();
        if self.items[from].group == over_group {
            array_move(&mut self.items, from, over);
        } else {
            self.items[from].group = over_group;
            array_move(&mut self.items, from, over.saturating_sub(1));
        }
        true
    }

    /// Drag an item over a group (e.g. an empty column body).
    ///
    /// Retags the item, preserving its current position in the flat order.
    /// A no-op when the item already sits in that group — hover events
    /// repeat at pointer-move frequency and must not churn the registry.
    ///
    /// Returns `true` if the registry changed.
    pub fn move_item_over_group(&mut self, active_id: &str, group: &GroupId) -> bool {
        let Some(from) = self.index_of(active_id) else {
            trace!(id = active_id, "move over group: active id unknown");
            return false;
        };
        if !self.has_group(group) {
            trace!(group = %group, "move over group: group unknown");
            return false;
        }
        if self.items[from].group == *group {
            return false;
        }
        self.items[from].group = group.clone();
        true
    }

    /// Reorder the group list itself (a completed group drag). Same
    /// array-move semantics as a same-group item reorder.
    ///
    /// Returns `true` if the registry changed.
    pub fn move_group(&mut self, active: &GroupId, over: &GroupId) -> bool {
        if active == over {
            return false;
        }
        let Some(from) = self.groups.iter().position(|g| g.id == *active) else {
            trace!(group = %active, "move group: active group unknown");
            return false;
        };
        let Some(to) = self.groups.iter().position(|g| g.id == *over) else {
            trace!(group = %over, "move group: over group unknown");
            return false;
        };
        array_move(&mut self.groups, from, to);
        true
    }
}

/// Move `v[from]` so it ends up at index `to` (computed against the vec
/// *after* removal, clamped to the tail). Everything else keeps its
/// relative order.
fn array_move<T>(v: &mut Vec<T>, from: usize, to: usize) {
    if from >= v.len() {
        return;
    }
    let item = v.remove(from);
    let to = to.min(v.len());
    v.insert(to, item);
}
