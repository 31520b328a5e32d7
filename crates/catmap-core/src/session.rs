//! The board session: one owner for the registry, the baseline, the
//! selected target, and the in-progress drag gesture.
//!
//! External callers never touch the registry directly — they read derived
//! views (`dirty`, `can_save`, `can_undo`, per-group item lists) and drive
//! mutations through the entry points here: the drag lifecycle handlers,
//! `quick_assign`, the two-phase save, and `reset`.
//!
//! Policy decisions this module owns:
//!
//! - **Drag cancel retains the live preview.** Cancelling clears the drag
//!   session but keeps whatever hover mutations already landed; `reset()`
//!   is the road back to the baseline.
//! - **Reloads are deferred while a drag is active.** An upstream refresh
//!   must not yank items out from under an in-flight gesture; callers
//!   re-fetch once the gesture ends.
//! - **Saves are single-flight.** `begin_save` marks the target in flight
//!   and a second `begin_save` is rejected until `finish_save` runs. The
//!   baseline advances only on `finish_save(true)` — a failed persistence
//!   call leaves both registry and baseline alone so the edits stay
//!   retryable.

use crate::drag::{DragKind, DragSession, Over};
use crate::error::BoardError;
use crate::model::{CategoryItem, Group, GroupId};
use crate::narrate::{self, Narrator};
use crate::notice::{Notice, NotificationSink};
use crate::registry::ItemRegistry;
use crate::snapshot::{self, AssignmentSnapshot, MappingPayload};
use crate::store::{CategorySource, MappingStore};
use tracing::{debug, info, warn};

pub struct BoardSession {
    registry: ItemRegistry,
    baseline_items: Vec<CategoryItem>,
    baseline: AssignmentSnapshot,
    unassigned: GroupId,
    assigned: GroupId,
    selected_target: Option<String>,
    drag: Option<DragSession>,
    save_in_flight: Option<String>,
    narrator: Option<Box<dyn Narrator>>,
}

impl BoardSession {
    /// Build a session over `groups`, binding which group plays the
    /// unassigned role and which the assigned role. The registry itself
    /// stays group-count agnostic; only the roles are fixed here.
    ///
    /// # Errors
    ///
    /// Returns [`BoardError::UnknownGroup`] when a role id is not in
    /// `groups`.
    pub fn new(
        groups: Vec<Group>,
        unassigned: GroupId,
        assigned: GroupId,
    ) -> Result<Self, BoardError> {
        let registry = ItemRegistry::new(groups);
        for role in [&unassigned, &assigned] {
            if !registry.has_group(role) {
                return Err(BoardError::UnknownGroup(role.to_string()));
            }
        }
        Ok(Self {
            registry,
            baseline_items: Vec::new(),
            baseline: AssignmentSnapshot::new(),
            unassigned,
            assigned,
            selected_target: None,
            drag: None,
            save_in_flight: None,
            narrator: None,
        })
    }

    /// Session over the canonical two-group board.
    #[must_use]
    pub fn with_default_groups() -> Self {
        Self {
            registry: ItemRegistry::new(vec![Group::unassigned(), Group::assigned()]),
            baseline_items: Vec::new(),
            baseline: AssignmentSnapshot::new(),
            unassigned: GroupId::unassigned(),
            assigned: GroupId::assigned(),
            selected_target: None,
            drag: None,
            save_in_flight: None,
            narrator: None,
        }
    }

    /// Attach a narration sink for drag lifecycle announcements.
    pub fn set_narrator(&mut self, narrator: Box<dyn Narrator>) {
        self.narrator = Some(narrator);
    }

    // -----------------------------------------------------------------
    // Loading
    // -----------------------------------------------------------------

    /// Replace the board wholesale from upstream lists and reset the
    /// baseline to the loaded state.
    ///
    /// Returns `false` without mutating anything when a drag is active —
    /// the refresh is deferred, not merged, so the gesture cannot be
    /// corrupted mid-flight.
    pub fn load(&mut self, unassigned: &[String], assigned: &[String]) -> bool {
        if self.drag.is_some() {
            warn!("deferring board reload during an active drag");
            return false;
        }
        let mut items = Vec::with_capacity(unassigned.len() + assigned.len());
        items.extend(
            unassigned
                .iter()
                .map(|name| CategoryItem::named(name.clone(), self.unassigned.clone())),
        );
        items.extend(
            assigned
                .iter()
                .map(|name| CategoryItem::named(name.clone(), self.assigned.clone())),
        );
        self.registry.replace_items(items);
        self.baseline_items = self.registry.items().to_vec();
        self.baseline = snapshot::build_snapshot(self.registry.items());
        debug!(items = self.registry.len(), "board loaded");
        true
    }

    // -----------------------------------------------------------------
    // Read-only views
    // -----------------------------------------------------------------

    #[must_use]
    pub fn registry(&self) -> &ItemRegistry {
        &self.registry
    }

    #[must_use]
    pub fn items(&self) -> &[CategoryItem] {
        self.registry.items()
    }

    pub fn items_in<'a>(&'a self, group: &'a GroupId) -> impl Iterator<Item = &'a CategoryItem> {
        self.registry.items_in(group)
    }

    #[must_use]
    pub fn groups(&self) -> &[Group] {
        self.registry.groups()
    }

    #[must_use]
    pub fn unassigned_group(&self) -> &GroupId {
        &self.unassigned
    }

    #[must_use]
    pub fn assigned_group(&self) -> &GroupId {
        &self.assigned
    }

    /// The "needs attention" list: ids still sitting in the unassigned
    /// group.
    #[must_use]
    pub fn unassigned_items(&self) -> Vec<&str> {
        snapshot::list_unassigned(self.registry.items(), &self.unassigned)
    }

    #[must_use]
    pub fn snapshot(&self) -> AssignmentSnapshot {
        snapshot::build_snapshot(self.registry.items())
    }

    /// `true` when the current assignment differs from the baseline.
    #[must_use]
    pub fn dirty(&self) -> bool {
        snapshot::is_dirty(&self.baseline, &self.snapshot())
    }

    /// Save needs both a selected target and unsaved changes.
    #[must_use]
    pub fn can_save(&self) -> bool {
        self.selected_target.is_some() && self.dirty()
    }

    /// Undo tracks dirtiness alone, independent of target selection.
    #[must_use]
    pub fn can_undo(&self) -> bool {
        self.dirty()
    }

    #[must_use]
    pub fn selected_target(&self) -> Option<&str> {
        self.selected_target.as_deref()
    }

    pub fn set_target(&mut self, target: Option<String>) {
        self.selected_target = target;
    }

    #[must_use]
    pub fn drag_session(&self) -> Option<&DragSession> {
        self.drag.as_ref()
    }

    #[must_use]
    pub fn save_in_flight(&self) -> bool {
        self.save_in_flight.is_some()
    }

    // -----------------------------------------------------------------
    // Drag lifecycle
    // -----------------------------------------------------------------

    /// Record the start of a gesture. No registry mutation happens here;
    /// the origin group is remembered for narration only.
    pub fn on_drag_start(&mut self, kind: DragKind, active_id: &str) {
        let origin_group = match kind {
            DragKind::Item => self.registry.get(active_id).map(|item| item.group.clone()),
            DragKind::Group => None,
        };
        debug!(id = active_id, ?kind, "drag start");
        self.drag = Some(DragSession {
            kind,
            active_id: active_id.to_string(),
            origin_group,
        });
        let line = narrate::drag_started(&self.registry, kind, active_id);
        self.announce(line.as_deref());
    }

    /// A hover step: apply the move immediately as live preview. Fires at
    /// pointer-move frequency, so the work stays linear in item count and
    /// repeated hovers over the same group are no-ops at the registry.
    pub fn on_drag_over(&mut self, active_id: &str, over: Over<'_>) {
        let Some(drag) = self.drag.clone() else {
            return;
        };
        if drag.kind == DragKind::Item {
            match over {
                Over::Item(over_id) => {
                    self.registry.move_item_over_item(active_id, over_id);
                }
                Over::Group(group_id) => {
                    self.registry
                        .move_item_over_group(active_id, &GroupId::new(group_id));
                }
            }
        }
        let line = narrate::drag_moved(
            &self.registry,
            drag.kind,
            active_id,
            over,
            drag.origin_group.as_ref(),
        );
        self.announce(line.as_deref());
    }

    /// Complete the gesture. Group drags commit their reorder here; item
    /// drags need no further mutation because the live preview already is
    /// the final state. Clears the drag session unconditionally.
    pub fn on_drag_end(&mut self, active_id: &str, over: Option<Over<'_>>) {
        let Some(drag) = self.drag.take() else {
            return;
        };
        if drag.kind == DragKind::Group {
            if let Some(Over::Group(over_id)) = over {
                self.registry
                    .move_group(&GroupId::new(active_id), &GroupId::new(over_id));
            }
        }
        debug!(id = active_id, kind = ?drag.kind, "drag end");
        let line = narrate::drag_ended(
            &self.registry,
            drag.kind,
            active_id,
            over,
            drag.origin_group.as_ref(),
        );
        self.announce(line.as_deref());
    }

    /// Abort the gesture. The drag session is cleared; preview mutations
    /// already applied are retained and `reset()` remains the way back.
    pub fn on_drag_cancel(&mut self) {
        if let Some(drag) = self.drag.take() {
            debug!(id = %drag.active_id, kind = ?drag.kind, "drag cancel");
            self.announce(Some(narrate::drag_cancelled(drag.kind)));
        }
    }

    // -----------------------------------------------------------------
    // Quick-assign
    // -----------------------------------------------------------------

    /// One-click shortcut: retag `item_id` into the assigned group, exactly
    /// as a completed single-item drag would. Rejected when no target is
    /// selected; unknown ids are a quiet `Ok(false)` like any stale event.
    ///
    /// # Errors
    ///
    /// Returns [`BoardError::NoTargetSelected`] when no target category is
    /// selected; the registry is left untouched.
    pub fn quick_assign(&mut self, item_id: &str) -> Result<bool, BoardError> {
        if self.selected_target.is_none() {
            return Err(BoardError::NoTargetSelected);
        }
        Ok(self.registry.move_item_over_group(item_id, &self.assigned))
    }

    // -----------------------------------------------------------------
    // Baseline lifecycle
    // -----------------------------------------------------------------

    /// Advance the baseline to the current state. Called after a
    /// successful persistence call; the registry is unchanged.
    pub fn commit(&mut self) {
        self.baseline_items = self.registry.items().to_vec();
        self.baseline = snapshot::build_snapshot(self.registry.items());
        info!(items = self.baseline_items.len(), "baseline committed");
    }

    /// Restore the registry to a deep copy of the baseline item list —
    /// ordering and grouping both. Idempotent.
    pub fn reset(&mut self) {
        self.registry.replace_items(self.baseline_items.clone());
    }

    // -----------------------------------------------------------------
    // Two-phase save
    // -----------------------------------------------------------------

    /// Validate and derive the payload for a save, marking the target as
    /// in flight. Call [`Self::finish_save`] with the persistence outcome.
    ///
    /// # Errors
    ///
    /// - [`BoardError::SaveInFlight`] — a save is already in flight.
    /// - [`BoardError::NoTargetSelected`] — no target category selected.
    /// - [`BoardError::EmptyAssignment`] — the assigned group is empty.
    pub fn begin_save(&mut self) -> Result<MappingPayload, BoardError> {
        if let Some(target) = &self.save_in_flight {
            return Err(BoardError::SaveInFlight(target.clone()));
        }
        let target = self
            .selected_target
            .clone()
            .ok_or(BoardError::NoTargetSelected)?;
        let payload = snapshot::derive_payload(self.registry.items(), &self.assigned, &target)
            .ok_or(BoardError::EmptyAssignment)?;
        info!(target = %target, count = payload.item_ids.len(), "save started");
        self.save_in_flight = Some(target);
        Ok(payload)
    }

    /// Record the persistence outcome for the in-flight save. On success
    /// the baseline advances; on failure registry and baseline are both
    /// left alone so the user can retry without re-dragging.
    pub fn finish_save(&mut self, succeeded: bool) {
        let target = self.save_in_flight.take();
        if succeeded {
            self.commit();
        } else {
            warn!(target = ?target, "save failed; keeping local edits for retry");
        }
    }

    fn announce(&mut self, line: Option<&str>) {
        if let (Some(line), Some(narrator)) = (line, self.narrator.as_mut()) {
            narrator.announce(line);
        }
    }
}

// ---------------------------------------------------------------------
// Collaborator glue
// ---------------------------------------------------------------------

/// Run a full save against the store: validation failures and persistence
/// failures both surface through the sink; only a confirmed success
/// advances the baseline. Returns `true` on a committed save.
pub fn save_board(
    session: &mut BoardSession,
    store: &mut dyn MappingStore,
    sink: &mut dyn NotificationSink,
) -> bool {
    let payload = match session.begin_save() {
        Ok(payload) => payload,
        Err(err) => {
            sink.notify(&Notice::from(&err));
            return false;
        }
    };
    match store.link(&payload) {
        Ok(()) => {
            session.finish_save(true);
            sink.notify(&Notice::success(
                "Grouping saved",
                format!(
                    "{} categories linked to {}.",
                    payload.item_ids.len(),
                    payload.target_label
                ),
            ));
            true
        }
        Err(err) => {
            session.finish_save(false);
            sink.notify(&Notice::error("Save failed", err.to_string()));
            false
        }
    }
}

/// Delete the mapping group for the selected target. Requires a selection;
/// board state is untouched either way (the caller reloads afterwards).
pub fn delete_mapping(
    session: &BoardSession,
    store: &mut dyn MappingStore,
    sink: &mut dyn NotificationSink,
) -> bool {
    let Some(target) = session.selected_target() else {
        sink.notify(&Notice::from(&BoardError::NoTargetSelected));
        return false;
    };
    match store.unlink(target) {
        Ok(()) => {
            sink.notify(&Notice::success(
                "Mapping deleted",
                format!("Removed the mapping group for {target}."),
            ));
            true
        }
        Err(err) => {
            sink.notify(&Notice::error("Delete failed", err.to_string()));
            false
        }
    }
}

/// Re-fetch board data for the current selection and load it. A fetch
/// failure surfaces through the sink; a load deferred by an active drag
/// returns `false` quietly.
pub fn reload_board(
    session: &mut BoardSession,
    source: &mut dyn CategorySource,
    sink: &mut dyn NotificationSink,
) -> bool {
    match source.fetch(session.selected_target()) {
        Ok(fetch) => session.load(&fetch.unassigned, &fetch.assigned),
        Err(err) => {
            sink.notify(&Notice::error("Load failed", err.to_string()));
            false
        }
    }
}
