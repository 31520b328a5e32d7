//! Drag gesture state.
//!
//! The machine is deliberately tiny: `Idle → Dragging(Item|Group) → Idle`,
//! leaving via drag end or drag cancel, both of which clear the session
//! unconditionally. The session object records only what later narration
//! needs — all live mutation happens in the registry as the gesture moves.

use crate::model::GroupId;

/// What kind of entity is being dragged.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DragKind {
    Item,
    Group,
}

/// An in-progress drag gesture. Exists only between drag start and drag
/// end/cancel; the board session holds `Option<DragSession>`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DragSession {
    pub kind: DragKind,
    pub active_id: String,
    /// Group the dragged item started in. Narration compares it against the
    /// hovered group to phrase "moved over group …" vs "moved over
    /// position …"; committed state never depends on it.
    pub origin_group: Option<GroupId>,
}

/// What the pointer is currently over.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Over<'a> {
    Item(&'a str),
    Group(&'a str),
}
