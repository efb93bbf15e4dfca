use std::path::{Path, PathBuf};
use std::str::FromStr;

use crate::assets::color::ColorValue;
use crate::foundation::error::{NarrataError, NarrataResult};

/// Background kind as named by callers.
///
/// `Generate` refers to an image produced upstream; by the time it reaches the pipeline it is
/// just a local image path.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BackgroundKind {
    /// Solid color.
    Color,
    /// Static image on disk.
    Image,
    /// Generated image, already saved to disk.
    Generate,
}

impl FromStr for BackgroundKind {
    type Err = NarrataError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "color" => Ok(Self::Color),
            "image" => Ok(Self::Image),
            "generate" => Ok(Self::Generate),
            other => Err(NarrataError::input(format!(
                "unsupported background type \"{other}\" (expected color, image or generate)"
            ))),
        }
    }
}

/// Resolved background for a render.
#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(tag = "kind", content = "value", rename_all = "snake_case")]
pub enum BackgroundDescriptor {
    /// Generated solid color frames.
    SolidColor(ColorValue),
    /// A still image, fitted into the frame.
    StaticImage(PathBuf),
}

impl BackgroundDescriptor {
    /// Resolve a `(kind, value)` pair.
    ///
    /// Image existence is not checked here; see [`Self::ensure_available`].
    pub fn resolve(kind: BackgroundKind, value: &str) -> NarrataResult<Self> {
        match kind {
            BackgroundKind::Color => Ok(Self::SolidColor(ColorValue::parse(value)?)),
            BackgroundKind::Image | BackgroundKind::Generate => {
                let value = value.trim();
                if value.is_empty() {
                    return Err(NarrataError::input("background image path must be non-empty"));
                }
                Ok(Self::StaticImage(PathBuf::from(value)))
            }
        }
    }

    /// Image path for image backgrounds.
    pub fn image_path(&self) -> Option<&Path> {
        match self {
            Self::StaticImage(p) => Some(p),
            Self::SolidColor(_) => None,
        }
    }

    /// Fail with an input error when an image background is missing on disk.
    pub fn ensure_available(&self) -> NarrataResult<()> {
        let Some(path) = self.image_path() else {
            return Ok(());
        };
        if !path.is_file() {
            return Err(NarrataError::input(format!(
                "background image not found: '{}'",
                path.display()
            )));
        }
        match image::image_dimensions(path) {
            Ok((w, h)) => {
                tracing::debug!(path = %path.display(), width = w, height = h, "background image");
            }
            Err(e) => {
                tracing::debug!(path = %path.display(), error = %e, "background image header not readable");
            }
        }
        Ok(())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/assets/background.rs"]
mod tests;
