use std::path::PathBuf;
use std::time::Instant;

use crate::compose::graph::RenderSpec;
use crate::encode::engine::{MediaEngine, RenderControl};
use crate::encode::ffmpeg::ensure_parent_dir;
use crate::foundation::error::{NarrataError, NarrataResult};

/// Run `spec` through `engine` and return the finished video path.
///
/// Every input file is checked before the engine is invoked. Failures are not retried. After a
/// [`NarrataError::Render`] any file at the output path is invalid and left for the caller to
/// discard.
#[tracing::instrument(skip(spec, engine, control), fields(out = %spec.output_path.display()))]
pub fn render(
    spec: &RenderSpec,
    engine: &mut dyn MediaEngine,
    control: &RenderControl,
) -> NarrataResult<PathBuf> {
    for path in spec.manifest.file_paths() {
        if !path.is_file() {
            return Err(NarrataError::input(format!(
                "render input not found: '{}'",
                path.display()
            )));
        }
    }
    if control.cancel.is_cancelled() {
        return Err(NarrataError::cancelled("cancelled before render started"));
    }
    ensure_parent_dir(&spec.output_path)?;

    tracing::info!(
        resolution = %spec.resolution,
        overlays = spec.overlays.len(),
        inputs = spec.manifest.len(),
        "render started"
    );
    let started = Instant::now();

    let out = match engine.compose(&spec.manifest, &spec.graph, &spec.output_path, control) {
        Ok(out) => out,
        Err(NarrataError::Render {
            status,
            diagnostics,
        }) => {
            tracing::error!(%status, %diagnostics, "media engine failed");
            if spec.output_path.exists() {
                tracing::warn!(
                    path = %spec.output_path.display(),
                    "partial output left behind; treat as invalid"
                );
            }
            return Err(NarrataError::Render {
                status,
                diagnostics,
            });
        }
        Err(e) => return Err(e),
    };

    if !out.is_file() {
        return Err(NarrataError::render(
            "success",
            format!("engine reported success but '{}' was not written", out.display()),
        ));
    }

    tracing::info!(
        path = %out.display(),
        elapsed_ms = started.elapsed().as_millis() as u64,
        "render finished"
    );
    Ok(out)
}

#[cfg(test)]
#[path = "../../tests/unit/encode/driver.rs"]
mod tests;
