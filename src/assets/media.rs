use std::path::{Path, PathBuf};
use std::process::Command;

use crate::foundation::error::{NarrataError, NarrataResult};

/// Source of an audio track's duration.
pub trait AudioProbe: Send + Sync {
    /// Duration of the audio at `path`, in seconds.
    fn duration_secs(&self, path: &Path) -> NarrataResult<f64>;
}

/// Probe durations with the system `ffprobe`.
#[derive(Clone, Debug)]
pub struct FfprobeProbe {
    bin: PathBuf,
}

impl Default for FfprobeProbe {
    fn default() -> Self {
        Self::new("ffprobe")
    }
}

impl FfprobeProbe {
    /// Use the `ffprobe` executable at `bin` (a bare name is looked up on `PATH`).
    pub fn new(bin: impl Into<PathBuf>) -> Self {
        Self { bin: bin.into() }
    }
}

impl AudioProbe for FfprobeProbe {
    fn duration_secs(&self, path: &Path) -> NarrataResult<f64> {
        if !path.is_file() {
            return Err(NarrataError::input(format!(
                "audio file not found: '{}'",
                path.display()
            )));
        }

        let out = Command::new(&self.bin)
            .args([
                "-v",
                "error",
                "-show_entries",
                "format=duration",
                "-of",
                "default=noprint_wrappers=1:nokey=1",
            ])
            .arg(path)
            .output()
            .map_err(|e| {
                NarrataError::Other(anyhow::anyhow!(
                    "failed to run {} (is it installed and on PATH?): {e}",
                    self.bin.display()
                ))
            })?;
        if !out.status.success() {
            return Err(NarrataError::input(format!(
                "ffprobe failed for '{}': {}",
                path.display(),
                String::from_utf8_lossy(&out.stderr).trim()
            )));
        }

        let secs = parse_duration_output(&String::from_utf8_lossy(&out.stdout))?;
        tracing::debug!(path = %path.display(), secs, "probed audio duration");
        Ok(secs)
    }
}

/// A probe that reports a fixed, already-known duration.
#[derive(Clone, Copy, Debug)]
pub struct KnownDuration(pub f64);

impl AudioProbe for KnownDuration {
    fn duration_secs(&self, _path: &Path) -> NarrataResult<f64> {
        Ok(self.0)
    }
}

/// Parse `ffprobe`'s bare `format=duration` output.
pub fn parse_duration_output(stdout: &str) -> NarrataResult<f64> {
    let raw = stdout.lines().map(str::trim).find(|l| !l.is_empty()).unwrap_or("");
    let secs: f64 = raw.parse().map_err(|_| {
        NarrataError::scheduling(format!("could not parse audio duration from \"{raw}\""))
    })?;
    if !secs.is_finite() || secs <= 0.0 {
        return Err(NarrataError::scheduling(format!(
            "audio duration must be finite and > 0 (got {secs})"
        )));
    }
    Ok(secs)
}

#[cfg(test)]
#[path = "../../tests/unit/assets/media.rs"]
mod tests;
