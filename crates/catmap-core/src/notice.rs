//! Human-readable notices and the fire-and-forget sink they go to.

use crate::error::BoardError;
use serde::{Deserialize, Serialize};

/// Severity of a notice. Drives styling at the presentation layer only.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NoticeKind {
    Success,
    Error,
}

/// A human-readable success/error message surfaced to the user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Notice {
    pub kind: NoticeKind,
    pub title: String,
    pub body: String,
}

impl Notice {
    #[must_use]
    pub fn success(title: impl Into<String>, body: impl Into<String>) -> Self {
        Self {
            kind: NoticeKind::Success,
            title: title.into(),
            body: body.into(),
        }
    }

    #[must_use]
    pub fn error(title: impl Into<String>, body: impl Into<String>) -> Self {
        Self {
            kind: NoticeKind::Error,
            title: title.into(),
            body: body.into(),
        }
    }
}

impl From<&BoardError> for Notice {
    fn from(err: &BoardError) -> Self {
        let body = err.hint().map_or_else(
            || err.to_string(),
            |hint| format!("{err}. {hint}"),
        );
        Self::error("Error", body)
    }
}

/// Fire-and-forget sink for notices. Implementations must not fail; a
/// notice that cannot be delivered is dropped, not an error.
pub trait NotificationSink {
    fn notify(&mut self, notice: &Notice);
}

/// Sink that remembers every notice. Handy in tests and for views that
/// render the most recent notice themselves.
#[derive(Debug, Default)]
pub struct RecordingSink {
    pub notices: Vec<Notice>,
}

impl NotificationSink for RecordingSink {
    fn notify(&mut self, notice: &Notice) {
        self.notices.push(notice.clone());
    }
}
