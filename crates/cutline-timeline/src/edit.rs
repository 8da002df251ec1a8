//! Multi-clip edit operations.

use serde::{Deserialize, Serialize};

/// An edit applied to every clip of a selection as one undoable step.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum BulkEdit {
    /// Move each clip by `offset` seconds, keeping durations.
    Shift { offset: f64 },
    Delete,
    /// Add a copy of each clip, `offset` seconds later. Copies get fresh ids.
    Duplicate { offset: f64 },
    Mute,
    Unmute,
}

impl BulkEdit {
    /// History label.
    pub fn label(self) -> &'static str {
        match self {
            Self::Shift { .. } => "Move clips",
            Self::Delete => "Delete clips",
            Self::Duplicate { .. } => "Duplicate clips",
            Self::Mute => "Mute clips",
            Self::Unmute => "Unmute clips",
        }
    }
}
