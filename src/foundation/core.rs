use std::fmt;
use std::str::FromStr;

use crate::foundation::error::{NarrataError, NarrataResult};

/// Output aspect ratio. Only the two presets below are supported.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub enum AspectRatio {
    /// Landscape, 1280x720.
    #[serde(rename = "16:9")]
    Landscape,
    /// Portrait, 720x1280.
    #[serde(rename = "9:16")]
    Portrait,
}

impl AspectRatio {
    /// Output resolution for this preset.
    pub fn resolution(self) -> Resolution {
        match self {
            Self::Landscape => Resolution {
                width: 1280,
                height: 720,
            },
            Self::Portrait => Resolution {
                width: 720,
                height: 1280,
            },
        }
    }

    /// Canonical `W:H` spelling.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Landscape => "16:9",
            Self::Portrait => "9:16",
        }
    }
}

impl FromStr for AspectRatio {
    type Err = NarrataError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "16:9" => Ok(Self::Landscape),
            "9:16" => Ok(Self::Portrait),
            other => Err(NarrataError::input(format!(
                "unsupported aspect ratio \"{other}\" (expected \"16:9\" or \"9:16\")"
            ))),
        }
    }
}

impl fmt::Display for AspectRatio {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Output frame size in pixels.
///
/// Every overlay image and the prepared background share this exact size.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub struct Resolution {
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
}

impl Resolution {
    /// `true` when the frame is taller than it is wide.
    pub fn is_portrait(self) -> bool {
        self.height > self.width
    }
}

impl fmt::Display for Resolution {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}x{}", self.width, self.height)
    }
}

/// Closed time window `[start, end]` in seconds.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct TimeInterval {
    /// Window start (seconds).
    pub start: f64,
    /// Window end (seconds), `>= start`.
    pub end: f64,
}

impl TimeInterval {
    /// Create a validated interval with finite bounds and `start <= end`.
    pub fn new(start: f64, end: f64) -> NarrataResult<Self> {
        if !start.is_finite() || !end.is_finite() {
            return Err(NarrataError::scheduling("interval bounds must be finite"));
        }
        if start > end {
            return Err(NarrataError::scheduling(format!(
                "interval start {start} must be <= end {end}"
            )));
        }
        Ok(Self { start, end })
    }

    /// Length of the window in seconds.
    pub fn duration(self) -> f64 {
        self.end - self.start
    }

    /// Return `true` when `t` is inside `[start, end]`.
    pub fn contains(self, t: f64) -> bool {
        self.start <= t && t <= self.end
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/core.rs"]
mod tests;
