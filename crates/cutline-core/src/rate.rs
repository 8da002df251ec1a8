//! Frame rate representation.
//!
//! The external engine expresses frame rates as rational strings
//! (`"30/1"`, `"30000/1001"`), so the type parses and prints that form.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::CutlineError;

/// Frame rate as a rational number (e.g., 30000/1001 for 29.97 fps).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct FrameRate {
    /// Numerator (e.g., 30000)
    pub numerator: u32,
    /// Denominator (e.g., 1001)
    pub denominator: u32,
}

impl FrameRate {
    /// Create a new frame rate.
    #[inline]
    pub const fn new(numerator: u32, denominator: u32) -> Self {
        Self {
            numerator,
            denominator,
        }
    }

    /// Whole frames per second, as sent to the engine (`"numerator/1"`).
    #[inline]
    pub const fn whole(fps: u32) -> Self {
        Self::new(fps, 1)
    }

    /// Convert to frames per second as f64.
    #[inline]
    pub fn to_fps_f64(self) -> f64 {
        self.numerator as f64 / self.denominator as f64
    }

    /// Common frame rates
    pub const FPS_24: Self = Self::new(24, 1);
    pub const FPS_25: Self = Self::new(25, 1);
    pub const FPS_29_97: Self = Self::new(30000, 1001);
    pub const FPS_30: Self = Self::new(30, 1);
    pub const FPS_60: Self = Self::new(60, 1);
}

impl Default for FrameRate {
    fn default() -> Self {
        Self::FPS_30
    }
}

impl fmt::Display for FrameRate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.numerator, self.denominator)
    }
}

impl FromStr for FrameRate {
    type Err = CutlineError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || CutlineError::validation(format!("invalid framerate '{s}', expected N/D"));

        let (num, den) = s.trim().split_once('/').ok_or_else(invalid)?;
        let numerator: u32 = num.parse().map_err(|_| invalid())?;
        let denominator: u32 = den.parse().map_err(|_| invalid())?;
        if numerator == 0 || denominator == 0 {
            return Err(invalid());
        }
        Ok(Self::new(numerator, denominator))
    }
}

impl TryFrom<String> for FrameRate {
    type Error = CutlineError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<FrameRate> for String {
    fn from(rate: FrameRate) -> Self {
        rate.to_string()
    }
}
