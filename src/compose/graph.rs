use std::path::{Path, PathBuf};

use crate::assets::background::BackgroundDescriptor;
use crate::assets::color::ColorValue;
use crate::foundation::core::{Resolution, TimeInterval};
use crate::foundation::error::{NarrataError, NarrataResult};

/// Label of the prepared background stream.
pub const BASE_LABEL: &str = "base";
/// Label of the final composed video stream.
pub const VIDEO_OUT_LABEL: &str = "v";

/// Where an engine input comes from.
#[derive(Clone, Debug, PartialEq, serde::Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum InputSource {
    /// Engine-generated solid color frames.
    Color {
        /// Fill color.
        color: ColorValue,
        /// Frame size.
        resolution: Resolution,
    },
    /// A still image repeated for the whole render.
    StillImage {
        /// Image file.
        path: PathBuf,
    },
    /// A media file read once (audio or a single overlay frame).
    File {
        /// Media file.
        path: PathBuf,
    },
}

impl InputSource {
    /// Backing file, if any.
    pub fn path(&self) -> Option<&Path> {
        match self {
            Self::Color { .. } => None,
            Self::StillImage { path } | Self::File { path } => Some(path),
        }
    }
}

/// What an input is used for.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize)]
#[serde(tag = "role", content = "index", rename_all = "snake_case")]
pub enum InputRole {
    /// Background video source.
    Background,
    /// Narration audio track.
    Audio,
    /// Subtitle overlay for the chunk at this index.
    Subtitle(usize),
}

/// One engine input, in manifest order.
#[derive(Clone, Debug, PartialEq, serde::Serialize)]
pub struct InputEntry {
    /// Source of the stream.
    pub source: InputSource,
    /// Purpose of the stream.
    pub role: InputRole,
}

/// Ordered engine inputs. Indices into this list are the engine's input indices.
#[derive(Clone, Debug, Default, PartialEq, serde::Serialize)]
pub struct InputManifest {
    entries: Vec<InputEntry>,
}

impl InputManifest {
    fn push(&mut self, source: InputSource, role: InputRole) -> usize {
        self.entries.push(InputEntry { source, role });
        self.entries.len() - 1
    }

    /// All inputs in order.
    pub fn entries(&self) -> &[InputEntry] {
        &self.entries
    }

    /// Number of inputs.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// `true` when the manifest has no inputs.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Index of the first input with `role`.
    pub fn index_of(&self, role: InputRole) -> Option<usize> {
        self.entries.iter().position(|e| e.role == role)
    }

    /// Files the engine reads; they must outlive the engine call.
    pub fn file_paths(&self) -> impl Iterator<Item = &Path> {
        self.entries.iter().filter_map(|e| e.source.path())
    }
}

/// A stream endpoint inside the graph.
#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize)]
#[serde(rename_all = "snake_case")]
pub enum StreamRef {
    /// Video stream of manifest input `n`.
    InputVideo(usize),
    /// Output of an earlier stage.
    Label(String),
}

impl StreamRef {
    fn label(name: impl Into<String>) -> Self {
        Self::Label(name.into())
    }
}

/// One operation of the composition graph.
#[derive(Clone, Debug, PartialEq, serde::Serialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum Stage {
    /// Forward a stream unchanged under a new label.
    Passthrough {
        /// Source stream.
        input: StreamRef,
        /// Output label.
        output: String,
    },
    /// Scale down preserving aspect to fit `resolution`, pad centered to exactly
    /// `resolution`, square pixels.
    FitPad {
        /// Source stream.
        input: StreamRef,
        /// Target frame size.
        resolution: Resolution,
        /// Output label.
        output: String,
    },
    /// Composite `overlay` on `base` only while `gate` contains the stream time.
    Overlay {
        /// Stream drawn under.
        base: StreamRef,
        /// Stream drawn over.
        overlay: StreamRef,
        /// Closed visibility window.
        gate: TimeInterval,
        /// Output label.
        output: String,
    },
}

impl Stage {
    /// Label this stage produces.
    pub fn output(&self) -> &str {
        match self {
            Self::Passthrough { output, .. }
            | Self::FitPad { output, .. }
            | Self::Overlay { output, .. } => output,
        }
    }
}

/// Typed stream graph: background preparation, then one overlay stage per subtitle, chained.
#[derive(Clone, Debug, PartialEq, serde::Serialize)]
pub struct CompositionGraph {
    /// Stages in evaluation order.
    pub stages: Vec<Stage>,
    /// Label of the composed video stream.
    pub video_out: String,
    /// Manifest index of the audio input, mapped through unmodified.
    pub audio_input: usize,
    /// Bind the output length to the shortest stream (the audio).
    pub shortest: bool,
}

/// A subtitle overlay image and its display window.
#[derive(Clone, Debug, PartialEq, serde::Serialize)]
pub struct TimedOverlay {
    /// Overlay image file (frame-sized, transparent).
    pub path: PathBuf,
    /// Closed display window.
    pub interval: TimeInterval,
}

/// Immutable description of one render, handed to the render driver.
#[derive(Clone, Debug, PartialEq, serde::Serialize)]
pub struct RenderSpec {
    /// Background as requested.
    pub background: BackgroundDescriptor,
    /// Output frame size.
    pub resolution: Resolution,
    /// Narration audio file.
    pub audio_path: PathBuf,
    /// Overlays in chunk order.
    pub overlays: Vec<TimedOverlay>,
    /// Where the finished video is written.
    pub output_path: PathBuf,
    /// Engine inputs.
    pub manifest: InputManifest,
    /// Stream graph over `manifest`.
    pub graph: CompositionGraph,
}

/// Assemble the render description for a background, overlays and their windows.
///
/// Inputs are ordered background, audio, then overlays in chunk order. Image backgrounds must
/// exist on disk; otherwise this fails with an input error before anything is rendered.
#[tracing::instrument(skip(overlay_paths, intervals), fields(overlays = overlay_paths.len()))]
pub fn build(
    background: &BackgroundDescriptor,
    resolution: Resolution,
    overlay_paths: &[PathBuf],
    intervals: &[TimeInterval],
    audio_path: &Path,
    output_path: &Path,
) -> NarrataResult<RenderSpec> {
    if overlay_paths.len() != intervals.len() {
        return Err(NarrataError::input(format!(
            "overlay count ({}) does not match interval count ({})",
            overlay_paths.len(),
            intervals.len()
        )));
    }
    if resolution.width == 0 || resolution.height == 0 {
        return Err(NarrataError::input("resolution must be non-zero"));
    }
    background.ensure_available()?;

    let mut manifest = InputManifest::default();
    let mut stages = Vec::with_capacity(overlay_paths.len() + 1);

    let bg_index = match background {
        BackgroundDescriptor::SolidColor(color) => {
            let idx = manifest.push(
                InputSource::Color {
                    color: color.clone(),
                    resolution,
                },
                InputRole::Background,
            );
            stages.push(Stage::Passthrough {
                input: StreamRef::InputVideo(idx),
                output: BASE_LABEL.to_owned(),
            });
            idx
        }
        BackgroundDescriptor::StaticImage(path) => {
            let idx = manifest.push(
                InputSource::StillImage { path: path.clone() },
                InputRole::Background,
            );
            stages.push(Stage::FitPad {
                input: StreamRef::InputVideo(idx),
                resolution,
                output: BASE_LABEL.to_owned(),
            });
            idx
        }
    };
    let audio_input = manifest.push(
        InputSource::File {
            path: audio_path.to_path_buf(),
        },
        InputRole::Audio,
    );

    let mut overlays = Vec::with_capacity(overlay_paths.len());
    let mut current = StreamRef::label(BASE_LABEL);
    let last = overlay_paths.len().saturating_sub(1);
    for (i, (path, interval)) in overlay_paths.iter().zip(intervals).enumerate() {
        let idx = manifest.push(InputSource::File { path: path.clone() }, InputRole::Subtitle(i));
        let output = if i == last {
            VIDEO_OUT_LABEL.to_owned()
        } else {
            format!("v{i}")
        };
        stages.push(Stage::Overlay {
            base: current,
            overlay: StreamRef::InputVideo(idx),
            gate: *interval,
            output: output.clone(),
        });
        current = StreamRef::Label(output);
        overlays.push(TimedOverlay {
            path: path.clone(),
            interval: *interval,
        });
    }

    let video_out = match current {
        StreamRef::Label(l) => l,
        StreamRef::InputVideo(_) => BASE_LABEL.to_owned(),
    };
    tracing::debug!(bg_index, audio_input, stages = stages.len(), "built composition graph");

    Ok(RenderSpec {
        background: background.clone(),
        resolution,
        audio_path: audio_path.to_path_buf(),
        overlays,
        output_path: output_path.to_path_buf(),
        manifest,
        graph: CompositionGraph {
            stages,
            video_out,
            audio_input,
            shortest: true,
        },
    })
}

#[cfg(test)]
#[path = "../../tests/unit/compose/graph.rs"]
mod tests;
