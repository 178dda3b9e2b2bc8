//! One-shot notices returned alongside admin outcomes.

use serde::{Deserialize, Serialize};

/// Whether the acting user should see a success or a failure message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NoticeKind {
    Success,
    Failure,
}

/// A message to display once on the next rendered view.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Notice {
    pub kind: NoticeKind,
    pub message: String,
}

impl Notice {
    pub fn success(message: impl Into<String>) -> Self {
        Self {
            kind: NoticeKind::Success,
            message: message.into(),
        }
    }

    pub fn failure(message: impl Into<String>) -> Self {
        Self {
            kind: NoticeKind::Failure,
            message: message.into(),
        }
    }

    pub fn is_success(&self) -> bool {
        self.kind == NoticeKind::Success
    }
}

pub const CREATED: &str = "Changelog was successfully created.";
pub const CREATE_FAILED: &str = "Failed to create changelog.";
pub const UPDATED: &str = "Changelog was successfully updated.";
pub const UPDATE_FAILED: &str = "Failed to update changelog.";
pub const DELETED: &str = "Changelog was successfully deleted.";
pub const DELETE_FAILED: &str = "Failed to delete changelog.";
