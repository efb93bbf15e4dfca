use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{Duration, SystemTime, UNIX_EPOCH};

use xxhash_rust::xxh3::Xxh3;

use crate::assets::background::{BackgroundDescriptor, BackgroundKind};
use crate::assets::media::FfprobeProbe;
use crate::encode::engine::RenderControl;
use crate::encode::ffmpeg::{FfmpegEngine, FfmpegEngineOpts};
use crate::foundation::core::AspectRatio;
use crate::foundation::error::{NarrataError, NarrataResult};
use crate::subtitle::chunk::DEFAULT_MAX_CHARS;
use crate::subtitle::style::SubtitleStyle;

static RENDER_SEQ: AtomicU64 = AtomicU64::new(0);

/// Pipeline-wide settings. Every field has a default, so `{}` is a valid config file.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct PipelineConfig {
    /// Subtitle chunk character budget.
    pub max_chars: usize,
    /// Subtitle typography.
    pub style: SubtitleStyle,
    /// Subtitle font file; `None` probes well-known system fonts.
    pub font_path: Option<PathBuf>,
    /// Directory for overlays and default outputs.
    pub work_dir: PathBuf,
    /// `ffmpeg` executable.
    pub ffmpeg_bin: PathBuf,
    /// `ffprobe` executable.
    pub ffprobe_bin: PathBuf,
    /// Abort the engine after this many seconds.
    pub timeout_secs: Option<u64>,
    /// Rasterization worker threads; `None` uses rayon defaults.
    pub threads: Option<usize>,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            max_chars: DEFAULT_MAX_CHARS,
            style: SubtitleStyle::default(),
            font_path: None,
            work_dir: PathBuf::from("tmp"),
            ffmpeg_bin: PathBuf::from("ffmpeg"),
            ffprobe_bin: PathBuf::from("ffprobe"),
            timeout_secs: None,
            threads: None,
        }
    }
}

impl PipelineConfig {
    /// Parse a config from a JSON reader.
    pub fn from_reader<R: std::io::Read>(r: R) -> NarrataResult<Self> {
        let cfg: Self = serde_json::from_reader(r)
            .map_err(|e| NarrataError::serde(format!("parse pipeline config JSON: {e}")))?;
        cfg.validate()?;
        Ok(cfg)
    }

    /// Parse a config from a JSON file on disk.
    pub fn from_path(path: impl AsRef<Path>) -> NarrataResult<Self> {
        let path = path.as_ref();
        let f = File::open(path).map_err(|e| {
            NarrataError::serde(format!("open pipeline config '{}': {e}", path.display()))
        })?;
        Self::from_reader(BufReader::new(f))
    }

    /// Reject settings the pipeline cannot run with.
    pub fn validate(&self) -> NarrataResult<()> {
        if self.max_chars == 0 {
            return Err(NarrataError::input("max_chars must be >= 1"));
        }
        if self.threads == Some(0) {
            return Err(NarrataError::input("threads must be >= 1 when set"));
        }
        if self.timeout_secs == Some(0) {
            return Err(NarrataError::input("timeout_secs must be >= 1 when set"));
        }
        Ok(())
    }

    /// Engine controls derived from this config.
    pub fn render_control(&self) -> RenderControl {
        RenderControl {
            timeout: self.timeout_secs.map(Duration::from_secs),
            ..RenderControl::default()
        }
    }

    /// `ffmpeg` engine using the configured executable.
    pub fn ffmpeg_engine(&self) -> FfmpegEngine {
        FfmpegEngine::new(FfmpegEngineOpts {
            bin: self.ffmpeg_bin.clone(),
            ..FfmpegEngineOpts::default()
        })
    }

    /// Duration probe using the configured executable.
    pub fn ffprobe(&self) -> FfprobeProbe {
        FfprobeProbe::new(self.ffprobe_bin.clone())
    }
}

/// One render job: narration, its audio, and how the video should look.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct RenderRequest {
    /// Narration text; also the subtitle source.
    pub text: String,
    /// Synthesized narration audio.
    pub audio_path: PathBuf,
    /// Output aspect ratio.
    pub aspect_ratio: AspectRatio,
    /// Background kind.
    pub background_type: BackgroundKind,
    /// Color for `color`, image path for `image` / `generate`.
    pub background_value: String,
    /// Output file; defaults to `<work_dir>/<request id>.mp4`.
    #[serde(default)]
    pub output_path: Option<PathBuf>,
}

impl RenderRequest {
    /// Parse a request from a JSON file on disk.
    pub fn from_path(path: impl AsRef<Path>) -> NarrataResult<Self> {
        let path = path.as_ref();
        let f = File::open(path).map_err(|e| {
            NarrataError::serde(format!("open render request '{}': {e}", path.display()))
        })?;
        serde_json::from_reader(BufReader::new(f))
            .map_err(|e| NarrataError::serde(format!("parse render request JSON: {e}")))
    }

    /// Check text and audio, and resolve the background.
    pub fn validate(&self) -> NarrataResult<BackgroundDescriptor> {
        if self.text.trim().is_empty() {
            return Err(NarrataError::input("narration text is required"));
        }
        if !self.audio_path.is_file() {
            return Err(NarrataError::input(format!(
                "audio file not found: '{}'",
                self.audio_path.display()
            )));
        }
        let background = BackgroundDescriptor::resolve(self.background_type, &self.background_value)?;
        background.ensure_available()?;
        Ok(background)
    }

    /// Stable hash of the request contents.
    pub fn content_hash(&self) -> String {
        let mut h = Xxh3::new();
        for part in [
            self.text.as_bytes(),
            self.audio_path.to_string_lossy().as_bytes(),
            self.aspect_ratio.as_str().as_bytes(),
            self.background_value.as_bytes(),
        ] {
            h.update(&(part.len() as u64).to_le_bytes());
            h.update(part);
        }
        h.update(&[self.background_type as u8]);
        format!("{:016x}", h.digest())
    }

    /// Fresh identifier for one render of this request.
    ///
    /// `<content hash>-<suffix>`; the suffix mixes process id, wall clock and a process-wide
    /// sequence number, so repeated or concurrent renders of the same request never share a
    /// storage location.
    pub fn new_render_id(&self) -> String {
        let seq = RENDER_SEQ.fetch_add(1, Ordering::Relaxed);
        let nanos = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_nanos())
            .unwrap_or(0);
        let mut h = Xxh3::new();
        h.update(&std::process::id().to_le_bytes());
        h.update(&nanos.to_le_bytes());
        h.update(&seq.to_le_bytes());
        format!("{}-{:016x}", self.content_hash(), h.digest())
    }

    /// Output path for the render `render_id` under `work_dir`.
    pub fn resolve_output_path(&self, work_dir: &Path, render_id: &str) -> PathBuf {
        self.output_path
            .clone()
            .unwrap_or_else(|| work_dir.join(format!("{render_id}.mp4")))
    }
}

#[cfg(test)]
#[path = "../../tests/unit/pipeline/config.rs"]
mod tests;
