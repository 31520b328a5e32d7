//! Assignment snapshots, dirtiness, and the save payload.
//!
//! A snapshot is the minimal view dirtiness is measured over: item id →
//! group id. Ordering changes inside a group do not count as dirty — only
//! membership changes do, because only membership is persisted.

use crate::model::{CategoryItem, GroupId};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Point-in-time mapping from item id to the group it sits in.
pub type AssignmentSnapshot = BTreeMap<String, GroupId>;

/// Build a snapshot of the current assignment state. O(n).
#[must_use]
pub fn build_snapshot(items: &[CategoryItem]) -> AssignmentSnapshot {
    items
        .iter()
        .map(|item| (item.id.clone(), item.group.clone()))
        .collect()
}

/// `true` when the two snapshots disagree — any item in a different group,
/// or a different item population (upstream refresh added/removed items).
#[must_use]
pub fn is_dirty(baseline: &AssignmentSnapshot, current: &AssignmentSnapshot) -> bool {
    baseline != current
}

/// Items currently sitting in the unassigned group, in board order. Drives
/// the "needs attention" affordance.
#[must_use]
pub fn list_unassigned<'a>(items: &'a [CategoryItem], unassigned: &GroupId) -> Vec<&'a str> {
    items
        .iter()
        .filter(|item| item.group == *unassigned)
        .map(|item| item.id.as_str())
        .collect()
}

/// The data handed to the persistence collaborator to link a set of raw
/// categories to a target. Built only at save time, discarded after.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MappingPayload {
    pub item_ids: Vec<String>,
    pub target_label: String,
}

/// Collect the ids currently in the assigned group. Returns `None` when the
/// group is empty — a mapping with no members is not worth saving.
#[must_use]
pub fn derive_payload(
    items: &[CategoryItem],
    assigned: &GroupId,
    target_label: &str,
) -> Option<MappingPayload> {
    let item_ids: Vec<String> = items
        .iter()
        .filter(|item| item.group == *assigned)
        .map(|item| item.id.clone())
        .collect();
    if item_ids.is_empty() {
        return None;
    }
    Some(MappingPayload {
        item_ids,
        target_label: target_label.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::{build_snapshot, derive_payload, is_dirty, list_unassigned};
    use crate::model::{CategoryItem, GroupId};

    fn items() -> Vec<CategoryItem> {
        vec![
            CategoryItem::named("A", GroupId::unassigned()),
            CategoryItem::named("B", GroupId::unassigned()),
            CategoryItem::named("C", GroupId::assigned()),
        ]
    }

    #[test]
    fn identical_snapshots_are_clean() {
        let items = items();
        let baseline = build_snapshot(&items);
        let current = build_snapshot(&items);
        assert!(!is_dirty(&baseline, &current));
    }

    #[test]
    fn single_group_change_is_dirty() {
        let mut items = items();
        let baseline = build_snapshot(&items);
        items[1].group = GroupId::assigned();
        assert!(is_dirty(&baseline, &build_snapshot(&items)));
    }

    #[test]
    fn reorder_within_group_is_not_dirty() {
        let mut items = items();
        let baseline = build_snapshot(&items);
        items.swap(0, 1);
        assert!(!is_dirty(&baseline, &build_snapshot(&items)));
    }

    #[test]
    fn population_change_is_dirty() {
        let mut items = items();
        let baseline = build_snapshot(&items);
        items.pop();
        assert!(is_dirty(&baseline, &build_snapshot(&items)));
    }

    #[test]
    fn payload_is_none_when_assigned_empty() {
        let items = vec![
            CategoryItem::named("A", GroupId::unassigned()),
            CategoryItem::named("B", GroupId::unassigned()),
        ];
        assert_eq!(derive_payload(&items, &GroupId::assigned(), "Food"), None);
    }

    #[test]
    fn payload_collects_assigned_ids_in_order() {
        let items = items();
        let payload = derive_payload(&items, &GroupId::assigned(), "Food").unwrap();
        assert_eq!(payload.item_ids, vec!["C"]);
        assert_eq!(payload.target_label, "Food");

        let json = serde_json::to_string(&payload).unwrap();
        assert_eq!(json, r#"{"item_ids":["C"],"target_label":"Food"}"#);
    }

    #[test]
    fn payload_size_matches_assigned_group() {
        let mut items = items();
        items.push(CategoryItem::named("D", GroupId::assigned()));
        let payload = derive_payload(&items, &GroupId::assigned(), "Food").unwrap();
        let assigned = items
            .iter()
            .filter(|item| item.group == GroupId::assigned())
            .count();
        assert_eq!(payload.item_ids.len(), assigned);
    }

    #[test]
    fn unassigned_listing_keeps_board_order() {
        let items = items();
        assert_eq!(list_unassigned(&items, &GroupId::unassigned()), vec!["A", "B"]);
        assert!(list_unassigned(&items, &GroupId::new("ghost")).is_empty());
    }
}
