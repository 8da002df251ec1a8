//! Layer types for the timeline.

use cutline_core::CutlineError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// The fixed set of layers a clip may belong to, in priority order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Layer {
    /// Primary video content
    Main,
    /// Video overlays, picture-in-picture
    Overlay,
    /// Text overlays, titles, captions
    Text,
    /// Effects and transitions
    Effects,
    /// Audio-only content
    Audio,
}

impl Layer {
    /// All layers, lowest priority value first.
    pub const ALL: [Layer; 5] = [
        Layer::Main,
        Layer::Overlay,
        Layer::Text,
        Layer::Effects,
        Layer::Audio,
    ];

    /// Engine layer priority (0 = bottom of the stack).
    pub fn priority(self) -> u32 {
        match self {
            Self::Main => 0,
            Self::Overlay => 1,
            Self::Text => 2,
            Self::Effects => 3,
            Self::Audio => 4,
        }
    }

    /// Wire name (`"MAIN"`, `"OVERLAY"`, ...).
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Main => "MAIN",
            Self::Overlay => "OVERLAY",
            Self::Text => "TEXT",
            Self::Effects => "EFFECTS",
            Self::Audio => "AUDIO",
        }
    }

    /// Display name for the layer.
    pub fn display_name(self) -> &'static str {
        match self {
            Self::Main => "Main Video",
            Self::Overlay => "Overlay",
            Self::Text => "Text & Titles",
            Self::Effects => "Effects",
            Self::Audio => "Audio",
        }
    }

    /// Presentation color as a hex string.
    pub fn color(self) -> &'static str {
        match self {
            Self::Main => "#3b82f6",
            Self::Overlay => "#8b5cf6",
            Self::Text => "#f59e0b",
            Self::Effects => "#ec4899",
            Self::Audio => "#10b981",
        }
    }
}

impl fmt::Display for Layer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Layer {
    type Err = CutlineError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|layer| layer.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| {
                CutlineError::validation(format!(
                    "invalid layer type '{s}', valid types: MAIN, OVERLAY, TEXT, EFFECTS, AUDIO"
                ))
            })
    }
}

/// UI-local per-layer toggles. Never recorded in history.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct LayerFlags {
    /// Layer is shown in the viewer
    pub visible: bool,
    /// Layer rejects edits
    pub locked: bool,
    /// Layer audio is muted
    pub muted: bool,
}

impl Default for LayerFlags {
    fn default() -> Self {
        Self {
            visible: true,
            locked: false,
            muted: false,
        }
    }
}
