use std::path::{Path, PathBuf};
use std::time::Instant;

use rayon::prelude::*;

use crate::assets::media::AudioProbe;
use crate::compose::graph::{RenderSpec, build};
use crate::encode::driver;
use crate::encode::engine::{MediaEngine, RenderControl};
use crate::foundation::core::{Resolution, TimeInterval};
use crate::foundation::error::{NarrataError, NarrataResult};
use crate::pipeline::config::{PipelineConfig, RenderRequest};
use crate::subtitle::chunk::{SubtitleChunk, chunk_text};
use crate::subtitle::raster::{SubtitleFont, SubtitleRasterizer};
use crate::timing::schedule::schedule;

/// Everything computed for a request before the engine runs.
#[derive(Clone, Debug, serde::Serialize)]
pub struct PreparedRender {
    /// Identifier of this render; unique per [`NarrationSession::prepare`] call.
    pub render_id: String,
    /// Directory holding this render's overlay PNGs.
    pub overlay_dir: PathBuf,
    /// Subtitle chunks in narration order.
    pub chunks: Vec<SubtitleChunk>,
    /// Probed narration length.
    pub audio_duration_secs: f64,
    /// Display window per chunk.
    pub intervals: Vec<TimeInterval>,
    /// Render description handed to the driver.
    pub spec: RenderSpec,
}

/// Long-lived pipeline state: config, loaded font and the rasterization pool.
pub struct NarrationSession {
    config: PipelineConfig,
    font: SubtitleFont,
    pool: rayon::ThreadPool,
}

impl NarrationSession {
    /// Validate `config`, load the subtitle font and build the worker pool.
    pub fn new(config: PipelineConfig) -> NarrataResult<Self> {
        config.validate()?;
        let font = SubtitleFont::discover(config.font_path.as_deref())?;
        let pool = build_thread_pool(config.threads)?;
        tracing::debug!(
            font = %font.source().display(),
            threads = pool.current_num_threads(),
            "narration session ready"
        );
        Ok(Self { config, font, pool })
    }

    /// Session configuration.
    pub fn config(&self) -> &PipelineConfig {
        &self.config
    }

    /// Chunk, schedule and rasterize `request`, and describe the render.
    ///
    /// Nothing is handed to a media engine. Overlay PNGs are written under
    /// `<work_dir>/<render id>/` and stay there until the caller removes them. Every call gets a
    /// fresh render id, so identical requests never share overlay or default output files.
    #[tracing::instrument(skip(self, request, probe))]
    pub fn prepare(
        &self,
        request: &RenderRequest,
        probe: &dyn AudioProbe,
    ) -> NarrataResult<PreparedRender> {
        let background = request.validate()?;
        let render_id = request.new_render_id();

        let chunks = chunk_text(&request.text, self.config.max_chars);
        if chunks.is_empty() {
            return Err(NarrataError::input("narration text has no words"));
        }

        let audio_duration_secs = probe.duration_secs(&request.audio_path)?;
        let intervals = schedule(&chunks, audio_duration_secs)?;
        tracing::debug!(
            chunks = chunks.len(),
            audio_duration_secs,
            "subtitles scheduled"
        );

        let resolution = request.aspect_ratio.resolution();
        let overlay_dir = self.config.work_dir.join(&render_id);
        let started = Instant::now();
        let overlay_paths = self.rasterize_all(&chunks, resolution, &overlay_dir)?;
        tracing::info!(
            overlays = overlay_paths.len(),
            dir = %overlay_dir.display(),
            elapsed_ms = started.elapsed().as_millis() as u64,
            "subtitle overlays rasterized"
        );

        let output_path = request.resolve_output_path(&self.config.work_dir, &render_id);
        let spec = build(
            &background,
            resolution,
            &overlay_paths,
            &intervals,
            &request.audio_path,
            &output_path,
        )?;

        Ok(PreparedRender {
            render_id,
            overlay_dir,
            chunks,
            audio_duration_secs,
            intervals,
            spec,
        })
    }

    /// Prepare `request` and render it through `engine`.
    pub fn render(
        &self,
        request: &RenderRequest,
        probe: &dyn AudioProbe,
        engine: &mut dyn MediaEngine,
        control: &RenderControl,
    ) -> NarrataResult<PathBuf> {
        let prepared = self.prepare(request, probe)?;
        driver::render(&prepared.spec, engine, control)
    }

    fn rasterize_all(
        &self,
        chunks: &[SubtitleChunk],
        resolution: Resolution,
        dir: &Path,
    ) -> NarrataResult<Vec<PathBuf>> {
        std::fs::create_dir_all(dir).map_err(|e| {
            NarrataError::input(format!("create overlay dir '{}': {e}", dir.display()))
        })?;
        let font = &self.font;
        let style = &self.config.style;

        self.pool.install(|| {
            chunks
                .par_iter()
                .enumerate()
                // Init runs once per rayon split, not per thread; rasterizers share the font bytes.
                .map_init(
                    || SubtitleRasterizer::new(font, style.clone()),
                    |worker, (idx, chunk)| {
                        let raster = match worker {
                            Ok(r) => r,
                            Err(e) => {
                                return Err(anyhow::anyhow!("{e}")
                                    .context("initialize subtitle rasterizer")
                                    .into());
                            }
                        };
                        let image =
                            raster.rasterize(chunk.text(), resolution.width, resolution.height)?;
                        let path = dir.join(overlay_file_name(idx));
                        image.save_png(&path)?;
                        Ok(path)
                    },
                )
                .collect::<NarrataResult<Vec<_>>>()
        })
    }
}

/// Overlay file name for chunk `idx`; sorts in chunk order.
pub fn overlay_file_name(idx: usize) -> String {
    format!("subtitle_{idx:03}.png")
}

fn build_thread_pool(threads: Option<usize>) -> NarrataResult<rayon::ThreadPool> {
    let mut builder = rayon::ThreadPoolBuilder::new();
    if let Some(n) = threads {
        builder = builder.num_threads(n);
    }
    builder
        .build()
        .map_err(|e| NarrataError::Other(anyhow::anyhow!("failed to build rayon thread pool: {e}")))
}

#[cfg(test)]
#[path = "../../tests/unit/pipeline/session.rs"]
mod tests;
