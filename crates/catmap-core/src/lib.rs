//! catmap-core: the category-assignment board's reconciliation engine.
//!
//! Tracks draggable raw-category items across logical groups (canonically
//! Unassigned / Assigned), applies drag gestures and quick-assigns as live
//! registry mutations, and diffs the result against a baseline snapshot to
//! drive save/undo and the persistence payload.
//!
//! # Conventions
//!
//! - **Errors**: validation rejections are [`error::BoardError`]; collaborator
//!   ports return `anyhow::Result`; stale drag ids are silent no-ops.
//! - **Logging**: `tracing` macros (`info!`, `warn!`, `debug!`, `trace!`).

pub mod drag;
pub mod error;
pub mod model;
pub mod narrate;
pub mod notice;
pub mod registry;
pub mod session;
pub mod snapshot;
pub mod store;

pub use drag::{DragKind, DragSession, Over};
pub use error::BoardError;
pub use model::{CategoryItem, Group, GroupId};
pub use notice::{Notice, NoticeKind, NotificationSink};
pub use registry::ItemRegistry;
pub use session::{BoardSession, delete_mapping, reload_board, save_board};
pub use snapshot::{AssignmentSnapshot, MappingPayload};
pub use store::{BoardFetch, CategorySource, MappingStore};
