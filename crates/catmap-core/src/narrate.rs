//! Screen-reader narration for drag lifecycle events.
//!
//! Every function here is a pure read of the registry after the event's
//! mutation has been applied; narration can never affect committed state.
//! Positions are 1-based and counted within the item's group, matching what
//! a sighted user sees in a column.

use crate::drag::{DragKind, Over};
use crate::model::GroupId;
use crate::registry::ItemRegistry;
use std::cell::RefCell;
use std::rc::Rc;

/// Sink for narration lines. Optional collaborator: a session without one
/// simply drops the strings.
pub trait Narrator {
    fn announce(&mut self, line: &str);
}

/// Narrator that records every line behind a shared handle. Keep a clone
/// before handing it to the session to read announcements back out — the
/// board view uses this for its status line, tests for assertions.
#[derive(Debug, Clone, Default)]
pub struct RecordingNarrator {
    lines: Rc<RefCell<Vec<String>>>,
}

impl RecordingNarrator {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn lines(&self) -> Vec<String> {
        self.lines.borrow().clone()
    }

    #[must_use]
    pub fn last(&self) -> Option<String> {
        self.lines.borrow().last().cloned()
    }
}

impl Narrator for RecordingNarrator {
    fn announce(&mut self, line: &str) {
        self.lines.borrow_mut().push(line.to_string());
    }
}

fn group_title<'a>(reg: &'a ItemRegistry, id: &GroupId) -> &'a str {
    reg.group(id).map_or("?", |g| g.title.as_str())
}

/// Narrate a drag start. `None` when the dragged entity is unknown (the
/// gesture raced with a refresh).
#[must_use]
pub fn drag_started(reg: &ItemRegistry, kind: DragKind, active_id: &str) -> Option<String> {
    match kind {
        DragKind::Item => {
            let item = reg.get(active_id)?;
            let (pos, of, group) = reg.position_in_group(active_id)?;
            Some(format!(
                "Picked up category {} at position {} of {} in group {}",
                item.content,
                pos + 1,
                of,
                group_title(reg, &group)
            ))
        }
        DragKind::Group => {
            let gid = GroupId::new(active_id);
            let (pos, of) = reg.group_position(&gid)?;
            Some(format!(
                "Picked up group {} at position {} of {}",
                group_title(reg, &gid),
                pos + 1,
                of
            ))
        }
    }
}

/// Narrate a hover step, after its live-preview mutation has been applied.
#[must_use]
pub fn drag_moved(
    reg: &ItemRegistry,
    kind: DragKind,
    active_id: &str,
    over: Over<'_>,
    origin: Option<&GroupId>,
) -> Option<String> {
    match (kind, over) {
        (DragKind::Group, Over::Group(over_id)) => {
            let over_gid = GroupId::new(over_id);
            let (pos, of) = reg.group_position(&over_gid)?;
            Some(format!(
                "Group {} was moved over {} at position {} of {}",
                group_title(reg, &GroupId::new(active_id)),
                group_title(reg, &over_gid),
                pos + 1,
                of
            ))
        }
        (DragKind::Item, Over::Item(over_id)) => {
            let active = reg.get(active_id)?;
            let (pos, of, group) = reg.position_in_group(over_id)?;
            if origin.is_some_and(|origin| *origin != group) {
                Some(format!(
                    "Category {} was moved over group {} in position {} of {}",
                    active.content,
                    group_title(reg, &group),
                    pos + 1,
                    of
                ))
            } else {
                Some(format!(
                    "Category was moved over position {} of {} in group {}",
                    pos + 1,
                    of,
                    group_title(reg, &group)
                ))
            }
        }
        _ => None,
    }
}

/// Narrate a completed drop, after any final mutation has been applied.
#[must_use]
pub fn drag_ended(
    reg: &ItemRegistry,
    kind: DragKind,
    active_id: &str,
    over: Option<Over<'_>>,
    origin: Option<&GroupId>,
) -> Option<String> {
    match (kind, over?) {
        (DragKind::Group, Over::Group(_)) => {
            let gid = GroupId::new(active_id);
            let (pos, of) = reg.group_position(&gid)?;
            Some(format!(
                "Group {} was dropped into position {} of {}",
                group_title(reg, &gid),
                pos + 1,
                of
            ))
        }
        (DragKind::Item, Over::Item(over_id)) => {
            let (pos, of, group) = reg.position_in_group(over_id)?;
            if origin.is_some_and(|origin| *origin != group) {
                Some(format!(
                    "Category was dropped into group {} in position {} of {}",
                    group_title(reg, &group),
                    pos + 1,
                    of
                ))
            } else {
                Some(format!(
                    "Category was dropped into position {} of {} in group {}",
                    pos + 1,
                    of,
                    group_title(reg, &group)
                ))
            }
        }
        _ => None,
    }
}

/// Narrate an aborted gesture.
#[must_use]
pub const fn drag_cancelled(kind: DragKind) -> &'static str {
    match kind {
        DragKind::Item => "Dragging category cancelled.",
        DragKind::Group => "Dragging group cancelled.",
    }
}
