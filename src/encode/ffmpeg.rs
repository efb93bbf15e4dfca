use std::ffi::OsString;
use std::io::Read;
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};
use std::time::{Duration, Instant};

use crate::assets::color::ColorValue;
use crate::compose::graph::{CompositionGraph, InputManifest, InputSource, Stage, StreamRef};
use crate::encode::engine::{MediaEngine, RenderControl};
use crate::foundation::core::TimeInterval;
use crate::foundation::error::{NarrataError, NarrataResult};

/// Options for [`FfmpegEngine`].
#[derive(Clone, Debug)]
pub struct FfmpegEngineOpts {
    /// `ffmpeg` executable; a bare name is looked up on `PATH`.
    pub bin: PathBuf,
    /// Overwrite the output file if it already exists.
    pub overwrite: bool,
    /// How often the child is polled for exit, cancellation and timeout.
    pub poll_interval: Duration,
}

impl Default for FfmpegEngineOpts {
    fn default() -> Self {
        Self {
            bin: PathBuf::from("ffmpeg"),
            overwrite: true,
            poll_interval: Duration::from_millis(50),
        }
    }
}

/// [`MediaEngine`] that runs the system `ffmpeg` as a child process.
#[derive(Clone, Debug, Default)]
pub struct FfmpegEngine {
    opts: FfmpegEngineOpts,
}

impl FfmpegEngine {
    /// Create an engine with `opts`.
    pub fn new(opts: FfmpegEngineOpts) -> Self {
        Self { opts }
    }
}

impl MediaEngine for FfmpegEngine {
    fn compose(
        &mut self,
        manifest: &InputManifest,
        graph: &CompositionGraph,
        out_path: &Path,
        control: &RenderControl,
    ) -> NarrataResult<PathBuf> {
        ensure_parent_dir(out_path)?;
        if !self.opts.overwrite && out_path.exists() {
            return Err(NarrataError::input(format!(
                "output file '{}' already exists",
                out_path.display()
            )));
        }

        let args = ffmpeg_args(manifest, graph, out_path, self.opts.overwrite);
        tracing::debug!(bin = %self.opts.bin.display(), ?args, "spawning ffmpeg");

        let mut child = Command::new(&self.opts.bin)
            .args(&args)
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::piped())
            .spawn()
            .map_err(|e| {
                NarrataError::Other(anyhow::anyhow!(
                    "failed to spawn {} (is it installed and on PATH?): {e}",
                    self.opts.bin.display()
                ))
            })?;

        let mut stderr = child.stderr.take().ok_or_else(|| {
            NarrataError::Other(anyhow::anyhow!("failed to open ffmpeg stderr (unexpected)"))
        })?;
        let stderr_drain = std::thread::spawn(move || {
            let mut stderr_bytes = Vec::new();
            stderr.read_to_end(&mut stderr_bytes)?;
            Ok::<_, std::io::Error>(stderr_bytes)
        });

        let started = Instant::now();
        let status = loop {
            let polled = child.try_wait().map_err(|e| {
                NarrataError::Other(anyhow::anyhow!("failed to poll ffmpeg: {e}"))
            })?;
            if let Some(status) = polled {
                break status;
            }

            let abort = if control.cancel.is_cancelled() {
                Some("cancelled by caller".to_owned())
            } else {
                control
                    .timeout
                    .filter(|limit| started.elapsed() >= *limit)
                    .map(|limit| format!("ffmpeg timed out after {limit:?}"))
            };
            if let Some(reason) = abort {
                let _ = child.kill();
                let _ = child.wait();
                let _ = stderr_drain.join();
                discard_partial_output(out_path);
                return Err(NarrataError::cancelled(reason));
            }

            std::thread::sleep(self.opts.poll_interval);
        };

        let stderr_bytes = stderr_drain
            .join()
            .map_err(|_| NarrataError::Other(anyhow::anyhow!("ffmpeg stderr drain thread panicked")))?
            .map_err(|e| NarrataError::Other(anyhow::anyhow!("ffmpeg stderr read failed: {e}")))?;

        if !status.success() {
            let stderr = String::from_utf8_lossy(&stderr_bytes);
            return Err(NarrataError::render(status.to_string(), stderr.trim()));
        }

        Ok(out_path.to_path_buf())
    }
}

/// Serialize `graph` into an ffmpeg `-filter_complex` description.
pub fn filter_complex(graph: &CompositionGraph) -> String {
    graph
        .stages
        .iter()
        .map(stage_filter)
        .collect::<Vec<_>>()
        .join(";")
}

fn stage_filter(stage: &Stage) -> String {
    match stage {
        Stage::Passthrough { input, output } => {
            format!("{}null[{output}]", stream_ref(input))
        }
        Stage::FitPad {
            input,
            resolution,
            output,
        } => {
            let (w, h) = (resolution.width, resolution.height);
            format!(
                "{}scale={w}:{h}:force_original_aspect_ratio=decrease,\
                 pad={w}:{h}:(ow-iw)/2:(oh-ih)/2,setsar=1[{output}]",
                stream_ref(input)
            )
        }
        Stage::Overlay {
            base,
            overlay,
            gate,
            output,
        } => format!(
            "{}{}overlay=enable='{}'[{output}]",
            stream_ref(base),
            stream_ref(overlay),
            gate_expr(*gate)
        ),
    }
}

fn stream_ref(r: &StreamRef) -> String {
    match r {
        StreamRef::InputVideo(i) => format!("[{i}:v]"),
        StreamRef::Label(l) => format!("[{l}]"),
    }
}

/// ffmpeg timeline expression for a closed window, millisecond precision.
fn gate_expr(gate: TimeInterval) -> String {
    format!("between(t,{:.3},{:.3})", gate.start, gate.end)
}

/// ffmpeg color syntax for `c`.
pub fn ffmpeg_color(c: &ColorValue) -> String {
    match c {
        ColorValue::Rgba([r, g, b, 255]) => format!("0x{r:02x}{g:02x}{b:02x}"),
        ColorValue::Rgba([r, g, b, a]) => format!("0x{r:02x}{g:02x}{b:02x}{a:02x}"),
        ColorValue::Named(name) => name.clone(),
    }
}

/// Full ffmpeg argument vector (without the executable) for one render.
///
/// Output is MP4: H.264 in yuv420p, AAC at 44.1 kHz stereo, bounded by the shortest stream.
pub fn ffmpeg_args(
    manifest: &InputManifest,
    graph: &CompositionGraph,
    out_path: &Path,
    overwrite: bool,
) -> Vec<OsString> {
    let mut args: Vec<OsString> = Vec::new();
    args.extend(
        [if overwrite { "-y" } else { "-n" }, "-hide_banner", "-loglevel", "error"]
            .map(OsString::from),
    );

    for entry in manifest.entries() {
        match &entry.source {
            InputSource::Color { color, resolution } => {
                args.extend(["-f", "lavfi", "-i"].map(OsString::from));
                args.push(OsString::from(format!(
                    "color=c={}:s={resolution}",
                    ffmpeg_color(color)
                )));
            }
            InputSource::StillImage { path } => {
                args.extend(["-loop", "1", "-i"].map(OsString::from));
                args.push(path.as_os_str().to_owned());
            }
            InputSource::File { path } => {
                args.push(OsString::from("-i"));
                args.push(path.as_os_str().to_owned());
            }
        }
    }

    args.push(OsString::from("-filter_complex"));
    args.push(OsString::from(filter_complex(graph)));
    args.push(OsString::from("-map"));
    args.push(OsString::from(format!("[{}]", graph.video_out)));
    args.push(OsString::from("-map"));
    args.push(OsString::from(format!("{}:a:0", graph.audio_input)));
    args.extend(
        [
            "-c:v", "libx264", "-pix_fmt", "yuv420p", "-c:a", "aac", "-ar", "44100", "-ac", "2",
        ]
        .map(OsString::from),
    );
    if graph.shortest {
        args.push(OsString::from("-shortest"));
    }
    args.extend(["-movflags", "+faststart"].map(OsString::from));
    args.push(out_path.as_os_str().to_owned());
    args
}

fn discard_partial_output(path: &Path) {
    if path.exists() {
        match std::fs::remove_file(path) {
            Ok(()) => tracing::warn!(path = %path.display(), "removed partial output"),
            Err(e) => {
                tracing::warn!(path = %path.display(), error = %e, "failed to remove partial output")
            }
        }
    }
}

/// Ensure the parent directory of `path` exists.
pub fn ensure_parent_dir(path: &Path) -> NarrataResult<()> {
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        use anyhow::Context as _;
        std::fs::create_dir_all(parent)
            .with_context(|| format!("failed to create output directory '{}'", parent.display()))?;
    }
    Ok(())
}

/// Return `true` when `ffmpeg` can be invoked from `PATH`.
pub fn is_ffmpeg_on_path() -> bool {
    is_tool_available("ffmpeg")
}

/// Return `true` when `bin -version` runs successfully.
pub fn is_tool_available(bin: impl AsRef<std::ffi::OsStr>) -> bool {
    Command::new(bin)
        .arg("-version")
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .status()
        .map(|s| s.success())
        .unwrap_or(false)
}

#[cfg(test)]
#[path = "../../tests/unit/encode/ffmpeg.rs"]
mod tests;
