//! Validation errors raised by board entry points.
//!
//! Nothing here is fatal: every variant is a local, recoverable rejection
//! that leaves the registry and baseline untouched. Stale-id drag events
//! are deliberately *not* errors — they are silent no-ops at the registry
//! layer. Persistence failures travel as `anyhow::Error` from the store
//! and are surfaced through the notification sink, never through this type.

use thiserror::Error;

/// Why a board operation was rejected.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum BoardError {
    /// Save, quick-assign, or delete was attempted with no target category
    /// selected.
    #[error("no target category selected")]
    NoTargetSelected,

    /// Save was attempted with an empty assigned group; a vacuous mapping
    /// is not worth persisting.
    #[error("no categories assigned; drag categories into the assigned group first")]
    EmptyAssignment,

    /// A second save was started while one is already in flight.
    #[error("a save for '{0}' is already in flight")]
    SaveInFlight(String),

    /// A session was built over groups that do not contain a role group.
    #[error("group '{0}' is not part of this board")]
    UnknownGroup(String),
}

impl BoardError {
    /// Stable machine-readable code for agent-friendly output.
    #[must_use]
    pub const fn code(&self) -> &'static str {
        match self {
            Self::NoTargetSelected => "no_target_selected",
            Self::EmptyAssignment => "empty_assignment",
            Self::SaveInFlight(_) => "save_in_flight",
            Self::UnknownGroup(_) => "unknown_group",
        }
    }

    /// Optional remediation hint surfaced alongside the message.
    #[must_use]
    pub const fn hint(&self) -> Option<&'static str> {
        match self {
            Self::NoTargetSelected => Some("Select a target category first."),
            Self::EmptyAssignment => Some("Drag or quick-assign at least one category."),
            Self::SaveInFlight(_) => Some("Wait for the in-flight save to finish."),
            Self::UnknownGroup(_) => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::BoardError;
    use std::collections::HashSet;

    #[test]
    fn codes_are_unique_and_stable() {
        let all = [
            BoardError::NoTargetSelected,
            BoardError::EmptyAssignment,
            BoardError::SaveInFlight("Food".to_string()),
            BoardError::UnknownGroup("ghost".to_string()),
        ];
        let mut seen = HashSet::new();
        for err in &all {
            assert!(seen.insert(err.code()), "duplicate code {}", err.code());
        }
    }

    #[test]
    fn display_names_the_target() {
        let err = BoardError::SaveInFlight("Food".to_string());
        assert_eq!(err.to_string(), "a save for 'Food' is already in flight");
    }
}
