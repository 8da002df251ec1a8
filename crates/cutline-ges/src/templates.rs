//! Preset project formats.

use cutline_core::{CutlineError, FrameRate};
use cutline_timeline::Layer;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

use crate::project::ProjectSettings;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProjectTemplate {
    Youtube1080p,
    InstagramStory,
    Podcast,
    Documentary,
    MusicVideo,
}

impl ProjectTemplate {
    pub const ALL: [ProjectTemplate; 5] = [
        Self::Youtube1080p,
        Self::InstagramStory,
        Self::Podcast,
        Self::Documentary,
        Self::MusicVideo,
    ];

    /// Template key (`"youtube_1080p"`, ...).
    pub fn key(self) -> &'static str {
        match self {
            Self::Youtube1080p => "youtube_1080p",
            Self::InstagramStory => "instagram_story",
            Self::Podcast => "podcast",
            Self::Documentary => "documentary",
            Self::MusicVideo => "music_video",
        }
    }

    pub fn display_name(self) -> &'static str {
        match self {
            Self::Youtube1080p => "YouTube 1080p",
            Self::InstagramStory => "Instagram Story",
            Self::Podcast => "Podcast",
            Self::Documentary => "Documentary",
            Self::MusicVideo => "Music Video",
        }
    }

    /// Output settings.
    pub fn settings(self) -> ProjectSettings {
        match self {
            Self::Youtube1080p | Self::MusicVideo => {
                ProjectSettings::new(1920, 1080, FrameRate::FPS_30)
            }
            Self::InstagramStory => ProjectSettings::new(1080, 1920, FrameRate::FPS_30),
            Self::Podcast => ProjectSettings::new(1280, 720, FrameRate::FPS_25),
            Self::Documentary => ProjectSettings::new(1920, 1080, FrameRate::FPS_24),
        }
    }

    /// Layers the template expects to use.
    pub fn preset_layers(self) -> &'static [Layer] {
        match self {
            Self::Youtube1080p | Self::Podcast => &[Layer::Main, Layer::Text, Layer::Audio],
            Self::InstagramStory => &[Layer::Main, Layer::Overlay, Layer::Text],
            Self::Documentary => &Layer::ALL,
            Self::MusicVideo => &[Layer::Main, Layer::Overlay, Layer::Effects, Layer::Audio],
        }
    }
}

impl FromStr for ProjectTemplate {
    type Err = CutlineError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|t| t.key() == s)
            .ok_or_else(|| CutlineError::validation(format!("unknown template '{s}'")))
    }
}
