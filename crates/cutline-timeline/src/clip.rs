//! Clip types for the timeline.

use cutline_core::{CutlineError, Result};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::layer::Layer;

/// Stable clip identifier.
pub type ClipId = Uuid;

/// Default font for title clips.
pub const DEFAULT_TITLE_FONT: &str = "Sans Bold 36";

/// What a clip renders, with type-specific metadata.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ClipKind {
    Video,
    Audio,
    Image,
    /// Text overlay.
    Title { text: String, font_desc: String },
    /// Engine-generated test pattern or solid color.
    TestPattern,
    Transition,
}

impl ClipKind {
    /// Title clip with the default font.
    pub fn title(text: impl Into<String>) -> Self {
        Self::Title {
            text: text.into(),
            font_desc: DEFAULT_TITLE_FONT.to_string(),
        }
    }

    /// Short type tag (`"video"`, `"title"`, ...).
    pub fn tag(&self) -> &'static str {
        match self {
            Self::Video => "video",
            Self::Audio => "audio",
            Self::Image => "image",
            Self::Title { .. } => "title",
            Self::TestPattern => "test",
            Self::Transition => "transition",
        }
    }
}

/// A clip on the timeline. Times are in seconds.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Clip {
    /// Unique clip ID
    pub id: ClipId,
    /// Clip name (displayed in UI)
    pub name: String,
    /// Layer the clip is placed on
    pub layer: Layer,
    /// Type tag and metadata
    pub kind: ClipKind,
    /// Timeline start
    pub start: f64,
    /// Timeline end (exclusive, always after `start`)
    pub end: f64,
    /// Offset into the source media
    #[serde(default)]
    pub in_point: f64,
    /// Path or URI of the source media, if any
    #[serde(default)]
    pub source: Option<String>,
    /// Clip audio is silenced
    #[serde(default)]
    pub muted: bool,
}

impl Clip {
    /// Create a new clip with a fresh id.
    pub fn new(name: impl Into<String>, layer: Layer, kind: ClipKind, start: f64, end: f64) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: name.into(),
            layer,
            kind,
            start,
            end,
            in_point: 0.0,
            source: None,
            muted: false,
        }
    }

    /// Create a title clip on the text layer.
    pub fn title(text: impl Into<String>, start: f64, end: f64) -> Self {
        let text = text.into();
        Self::new(text.clone(), Layer::Text, ClipKind::title(text), start, end)
    }

    /// Attach a media source.
    pub fn with_source(mut self, source: impl Into<String>) -> Self {
        self.source = Some(source.into());
        self
    }

    /// Timeline duration.
    pub fn duration(&self) -> f64 {
        self.end - self.start
    }

    /// Check structural validity: finite times, `0 <= start < end`,
    /// non-negative in point, non-empty title text.
    pub fn validate(&self) -> Result<()> {
        if !self.start.is_finite() || !self.end.is_finite() || !self.in_point.is_finite() {
            return Err(CutlineError::validation(format!(
                "clip {} has non-finite timing",
                self.id
            )));
        }
        if self.start < 0.0 {
            return Err(CutlineError::validation(format!(
                "clip {} starts before zero ({})",
                self.id, self.start
            )));
        }
        if self.end <= self.start {
            return Err(CutlineError::validation(format!(
                "clip {} must end after it starts (start {}, end {})",
                self.id, self.start, self.end
            )));
        }
        if self.in_point < 0.0 {
            return Err(CutlineError::validation(format!(
                "clip {} has negative in point",
                self.id
            )));
        }
        if let ClipKind::Title { text, .. } = &self.kind {
            if text.trim().is_empty() {
                return Err(CutlineError::validation("title clip text must not be empty"));
            }
        }
        Ok(())
    }
}

/// Partial update for [`Clip`]. `None` fields are left unchanged.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ClipPatch {
    pub name: Option<String>,
    pub layer: Option<Layer>,
    pub kind: Option<ClipKind>,
    pub start: Option<f64>,
    pub end: Option<f64>,
    pub in_point: Option<f64>,
    /// `Some(None)` clears the source.
    pub source: Option<Option<String>>,
    pub muted: Option<bool>,
}

impl ClipPatch {
    /// Patch that only moves timing.
    pub fn timing(start: f64, end: f64) -> Self {
        Self {
            start: Some(start),
            end: Some(end),
            ..Self::default()
        }
    }

    /// Return a copy of `clip` with this patch applied. The id never changes.
    pub fn apply_to(&self, clip: &Clip) -> Clip {
        let mut patched = clip.clone();
        if let Some(name) = &self.name {
            patched.name = name.clone();
        }
        if let Some(layer) = self.layer {
            patched.layer = layer;
        }
        if let Some(kind) = &self.kind {
            patched.kind = kind.clone();
        }
        if let Some(start) = self.start {
            patched.start = start;
        }
        if let Some(end) = self.end {
            patched.end = end;
        }
        if let Some(in_point) = self.in_point {
            patched.in_point = in_point;
        }
        if let Some(source) = &self.source {
            patched.source = source.clone();
        }
        if let Some(muted) = self.muted {
            patched.muted = muted;
        }
        patched
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_duration() {
        let clip = Clip::new("a", Layer::Main, ClipKind::Video, 1.5, 4.0);
        assert_eq!(clip.duration(), 2.5);
    }

    #[test]
    fn test_validate_rejects_inverted_timing() {
        let clip = Clip::new("a", Layer::Main, ClipKind::Video, 5.0, 5.0);
        assert!(matches!(clip.validate(), Err(CutlineError::Validation(_))));

        let clip = Clip::new("a", Layer::Main, ClipKind::Video, 5.0, 2.0);
        assert!(clip.validate().is_err());
    }

    #[test]
    fn test_validate_rejects_nan_and_negative() {
        assert!(Clip::new("a", Layer::Main, ClipKind::Video, f64::NAN, 2.0)
            .validate()
            .is_err());
        assert!(Clip::new("a", Layer::Main, ClipKind::Video, -1.0, 2.0)
            .validate()
            .is_err());
    }

    #[test]
    fn test_blank_title_rejected() {
        assert!(Clip::title("   ", 0.0, 1.0).validate().is_err());
        assert!(Clip::title("Hello", 0.0, 1.0).validate().is_ok());
    }

    #[test]
    fn test_patch_keeps_id_and_unset_fields() {
        let clip = Clip::new("a", Layer::Main, ClipKind::Video, 0.0, 3.0).with_source("a.mp4");
        let patched = ClipPatch {
            layer: Some(Layer::Overlay),
            end: Some(6.0),
            ..ClipPatch::default()
        }
        .apply_to(&clip);

        assert_eq!(patched.id, clip.id);
        assert_eq!(patched.layer, Layer::Overlay);
        assert_eq!(patched.start, 0.0);
        assert_eq!(patched.end, 6.0);
        assert_eq!(patched.source.as_deref(), Some("a.mp4"));
    }

    #[test]
    fn test_title_kind_serializes_with_tag() {
        let json = serde_json::to_value(ClipKind::title("Intro")).unwrap();
        assert_eq!(json["type"], "title");
        assert_eq!(json["font_desc"], DEFAULT_TITLE_FONT);
    }
}
