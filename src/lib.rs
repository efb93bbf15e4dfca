//! Narrata turns narration text plus synthesized audio into an MP4 with timed subtitles.
//!
//! The pipeline:
//!
//! - Split the text into [`SubtitleChunk`]s under a character budget
//! - [`schedule`] each chunk a window proportional to its word count
//! - Rasterize each chunk into a frame-sized transparent PNG with [`SubtitleRasterizer`]
//! - [`build`](compose_graph) a typed [`RenderSpec`] (inputs plus overlay graph)
//! - Hand it to a [`MediaEngine`] through [`render`], normally [`FfmpegEngine`]
//!
//! [`NarrationSession`] runs all of it for one [`RenderRequest`].
#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod foundation;

/// Background and audio inputs.
pub mod assets;
/// Composition graph construction.
pub mod compose;
pub mod encode;
pub mod pipeline;
pub mod subtitle;
/// Subtitle timing.
pub mod timing;

pub use crate::foundation::core::{AspectRatio, Resolution, TimeInterval};
pub use crate::foundation::error::{NarrataError, NarrataResult};

pub use crate::assets::background::{BackgroundDescriptor, BackgroundKind};
pub use crate::assets::color::ColorValue;
pub use crate::assets::media::{AudioProbe, FfprobeProbe, KnownDuration};
pub use crate::compose::graph::{
    CompositionGraph, InputEntry, InputManifest, InputRole, InputSource, RenderSpec, Stage,
    StreamRef, TimedOverlay, build as compose_graph,
};
pub use crate::encode::driver::render;
pub use crate::encode::engine::{
    CancelToken, ComposeCall, MediaEngine, RecordingEngine, RenderControl,
};
pub use crate::encode::ffmpeg::{
    FfmpegEngine, FfmpegEngineOpts, ffmpeg_args, filter_complex, is_ffmpeg_on_path,
    is_tool_available,
};
pub use crate::pipeline::config::{PipelineConfig, RenderRequest};
pub use crate::pipeline::session::{NarrationSession, PreparedRender};
pub use crate::subtitle::chunk::{DEFAULT_MAX_CHARS, SubtitleChunk, chunk_text};
pub use crate::subtitle::layout::{PlacedLine, SubtitleLayout, TextMeasure, layout_subtitle};
pub use crate::subtitle::raster::{SubtitleFont, SubtitleImage, SubtitleRasterizer};
pub use crate::subtitle::style::SubtitleStyle;
pub use crate::timing::schedule::schedule;
