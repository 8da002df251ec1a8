//! Engine-backed project types.

use cutline_core::{CutlineError, FrameRate, Result};
use cutline_timeline::{Clip, ClipId};
use indexmap::map::Entry;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::engine::ProjectSnapshot;

/// Longest accepted project name.
pub const MAX_NAME_LEN: usize = 200;

/// Identifier assigned by the engine.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ProjectId(String);

impl ProjectId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ProjectId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for ProjectId {
    fn from(id: &str) -> Self {
        Self::new(id)
    }
}

/// Playback status reported by the engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProjectStatus {
    #[default]
    Idle,
    Playing,
    Paused,
}

/// Output format of a project. `duration` is reported by the engine.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProjectMetadata {
    pub width: u32,
    pub height: u32,
    pub framerate: FrameRate,
    /// Timeline length in seconds as last reported by the engine
    pub duration: f64,
}

/// Settings requested when creating a project.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProjectSettings {
    pub width: u32,
    pub height: u32,
    pub framerate: FrameRate,
}

impl ProjectSettings {
    /// Accepted width range.
    pub const WIDTH_RANGE: std::ops::RangeInclusive<u32> = 480..=7680;
    /// Accepted height range.
    pub const HEIGHT_RANGE: std::ops::RangeInclusive<u32> = 270..=4320;

    pub fn new(width: u32, height: u32, framerate: FrameRate) -> Self {
        Self {
            width,
            height,
            framerate,
        }
    }

    /// Check resolution bounds and frame rate.
    pub fn validate(&self) -> Result<()> {
        if !Self::WIDTH_RANGE.contains(&self.width) {
            return Err(CutlineError::validation(format!(
                "width {} outside {}..={}",
                self.width,
                Self::WIDTH_RANGE.start(),
                Self::WIDTH_RANGE.end()
            )));
        }
        if !Self::HEIGHT_RANGE.contains(&self.height) {
            return Err(CutlineError::validation(format!(
                "height {} outside {}..={}",
                self.height,
                Self::HEIGHT_RANGE.start(),
                Self::HEIGHT_RANGE.end()
            )));
        }
        if self.framerate.numerator == 0 || self.framerate.denominator == 0 {
            return Err(CutlineError::validation("framerate must be positive"));
        }
        Ok(())
    }
}

impl Default for ProjectSettings {
    fn default() -> Self {
        Self::new(1920, 1080, FrameRate::FPS_30)
    }
}

/// Check a project name for creation. Returns the trimmed name.
pub fn validate_name(name: &str) -> Result<&str> {
    let trimmed = name.trim();
    if trimmed.is_empty() {
        return Err(CutlineError::validation("project name must not be empty"));
    }
    if trimmed.chars().count() > MAX_NAME_LEN {
        return Err(CutlineError::validation(format!(
            "project name longer than {MAX_NAME_LEN} characters"
        )));
    }
    Ok(trimmed)
}

/// A remote editing session as known locally.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GesProject {
    pub id: ProjectId,
    pub name: String,
    pub status: ProjectStatus,
    pub metadata: ProjectMetadata,
    /// Remote clip namespace, in engine order
    pub clips: IndexMap<ClipId, Clip>,
    /// Whether the session has been materialized by a load
    pub loaded: bool,
}

impl GesProject {
    /// Fresh, idle project as inserted after a successful create.
    pub fn new(id: ProjectId, name: impl Into<String>, settings: ProjectSettings) -> Self {
        Self {
            id,
            name: name.into(),
            status: ProjectStatus::Idle,
            metadata: ProjectMetadata {
                width: settings.width,
                height: settings.height,
                framerate: settings.framerate,
                duration: 0.0,
            },
            clips: IndexMap::new(),
            loaded: false,
        }
    }

    /// Replace engine-owned fields with the engine's authoritative copy.
    /// Invalid clips are skipped; of clips sharing an id the first is kept.
    pub fn refresh_from(&mut self, snapshot: ProjectSnapshot) -> SkippedClips {
        if !snapshot.name.trim().is_empty() {
            self.name = snapshot.name;
        }
        self.status = snapshot.status;
        self.metadata = snapshot.metadata;

        let mut skipped = SkippedClips::default();
        let mut clips = IndexMap::with_capacity(snapshot.clips.len());
        for clip in snapshot.clips {
            if clip.validate().is_err() {
                skipped.invalid += 1;
                continue;
            }
            match clips.entry(clip.id) {
                Entry::Occupied(_) => skipped.duplicate += 1,
                Entry::Vacant(slot) => {
                    slot.insert(clip);
                }
            }
        }
        self.clips = clips;
        self.loaded = true;
        skipped
    }

    /// Summary row for listings.
    pub fn summary(&self) -> ProjectSummary {
        ProjectSummary {
            id: self.id.clone(),
            name: self.name.clone(),
            status: self.status,
            metadata: self.metadata.clone(),
            clip_count: self.clips.len(),
        }
    }
}

/// Engine clips left out by [`GesProject::refresh_from`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SkippedClips {
    pub invalid: usize,
    pub duplicate: usize,
}

/// Listing entry for a project.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProjectSummary {
    pub id: ProjectId,
    pub name: String,
    pub status: ProjectStatus,
    pub metadata: ProjectMetadata,
    pub clip_count: usize,
}
