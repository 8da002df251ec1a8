//! Timeline markers for navigation and annotation.

use cutline_core::{CutlineError, Result};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

pub type MarkerId = Uuid;

/// Color given to markers created without one.
pub const DEFAULT_MARKER_COLOR: &str = "#ff0000";
/// Longest accepted marker name, in characters.
pub const MAX_MARKER_NAME_LEN: usize = 100;
/// Longest accepted marker note, in characters.
pub const MAX_MARKER_NOTE_LEN: usize = 500;

/// A named point on the timeline.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Marker {
    pub id: MarkerId,
    /// Seconds from timeline start
    pub position: f64,
    pub name: String,
    /// `#RRGGBB`
    pub color: String,
    #[serde(default)]
    pub note: String,
}

impl Marker {
    /// Create a marker with the default color and no note.
    pub fn new(name: impl Into<String>, position: f64) -> Self {
        Self {
            id: Uuid::new_v4(),
            position,
            name: name.into(),
            color: DEFAULT_MARKER_COLOR.to_string(),
            note: String::new(),
        }
    }

    pub fn with_color(mut self, color: impl Into<String>) -> Self {
        self.color = color.into();
        self
    }

    pub fn with_note(mut self, note: impl Into<String>) -> Self {
        self.note = note.into();
        self
    }

    pub fn validate(&self) -> Result<()> {
        if !self.position.is_finite() || self.position < 0.0 {
            return Err(CutlineError::validation(format!(
                "marker position must be a non-negative number, got {}",
                self.position
            )));
        }
        let name_len = self.name.chars().count();
        if name_len == 0 || name_len > MAX_MARKER_NAME_LEN {
            return Err(CutlineError::validation(format!(
                "marker name must be 1 to {MAX_MARKER_NAME_LEN} characters"
            )));
        }
        if !is_hex_color(&self.color) {
            return Err(CutlineError::validation(format!(
                "marker color '{}' is not #RRGGBB",
                self.color
            )));
        }
        if self.note.chars().count() > MAX_MARKER_NOTE_LEN {
            return Err(CutlineError::validation(format!(
                "marker note longer than {MAX_MARKER_NOTE_LEN} characters"
            )));
        }
        Ok(())
    }
}

fn is_hex_color(color: &str) -> bool {
    color.len() == 7
        && color.starts_with('#')
        && color[1..].chars().all(|c| c.is_ascii_hexdigit())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_valid() {
        let marker = Marker::new("Cue", 0.0);
        assert_eq!(marker.color, DEFAULT_MARKER_COLOR);
        assert!(marker.validate().is_ok());
    }

    #[test]
    fn test_rejects_bad_fields() {
        assert!(Marker::new("Cue", -0.5).validate().is_err());
        assert!(Marker::new("Cue", f64::NAN).validate().is_err());
        assert!(Marker::new("", 1.0).validate().is_err());
        assert!(Marker::new("x".repeat(101), 1.0).validate().is_err());
        assert!(Marker::new("x".repeat(100), 1.0).validate().is_ok());
        assert!(Marker::new("Cue", 1.0).with_note("n".repeat(501)).validate().is_err());
    }

    #[test]
    fn test_color_format() {
        for ok in ["#00ff00", "#ABCDEF", "#123abc"] {
            assert!(Marker::new("c", 1.0).with_color(ok).validate().is_ok(), "{ok}");
        }
        for bad in ["00ff00", "#0f0", "#00ff0g", "#00ff00ff", "#ééé"] {
            assert!(Marker::new("c", 1.0).with_color(bad).validate().is_err(), "{bad}");
        }
    }
}
