//! On-disk form of the local timeline.
//!
//! A timeline file is a JSON document tagged with a format name and version.
//! Reading one checks the tag and validates the snapshot, so the result can
//! go straight into [`TimelineStore::open`].

use cutline_core::{CutlineError, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::debug;

use crate::store::{TimelineSnapshot, TimelineStore};

/// Format tag written into every timeline file.
pub const FORMAT_NAME: &str = "cutline.timeline";
/// Highest format version this build reads and the one it writes.
pub const FORMAT_VERSION: u32 = 1;

/// Envelope around a saved [`TimelineSnapshot`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TimelineFile {
    pub format: String,
    pub format_version: u32,
    /// Crate version that wrote the file
    pub saved_by: String,
    pub timeline: TimelineSnapshot,
}

impl TimelineFile {
    pub fn new(timeline: TimelineSnapshot) -> Self {
        Self {
            format: FORMAT_NAME.to_string(),
            format_version: FORMAT_VERSION,
            saved_by: env!("CARGO_PKG_VERSION").to_string(),
            timeline,
        }
    }

    pub fn encode(&self) -> Result<String> {
        serde_json::to_string_pretty(self)
            .map_err(|e| CutlineError::Serialization(format!("encoding timeline: {e}")))
    }

    /// Parse and check a timeline file, returning its snapshot.
    pub fn decode(text: &str) -> Result<TimelineSnapshot> {
        let file: TimelineFile = serde_json::from_str(text)
            .map_err(|e| CutlineError::Serialization(format!("decoding timeline: {e}")))?;

        if file.format != FORMAT_NAME {
            return Err(CutlineError::Serialization(format!(
                "not a timeline file (format '{}')",
                file.format
            )));
        }
        if file.format_version > FORMAT_VERSION {
            return Err(CutlineError::Serialization(format!(
                "timeline format {} is newer than {FORMAT_VERSION}",
                file.format_version
            )));
        }
        file.timeline.validate()?;
        Ok(file.timeline)
    }

    /// Write the store's current state to `path`. The file is replaced
    /// whole; a failed write leaves the previous file in place.
    pub fn save(store: &TimelineStore, path: &Path) -> Result<()> {
        let text = Self::new(store.snapshot()).encode()?;
        let staging = path.with_extension("json.partial");
        std::fs::write(&staging, text)?;
        std::fs::rename(&staging, path)?;
        debug!(path = %path.display(), clips = store.clip_count(), "Timeline saved");
        Ok(())
    }

    /// Read a snapshot from `path`.
    pub fn load(path: &Path) -> Result<TimelineSnapshot> {
        let text = std::fs::read_to_string(path)?;
        Self::decode(&text)
    }
}
