use std::path::{Path, PathBuf};

use anyhow::Context as _;
use clap::{Parser, Subcommand};
use tracing_subscriber::{layer::SubscriberExt as _, util::SubscriberInitExt as _};

#[derive(Parser, Debug)]
#[command(name = "narrata", version)]
struct Cli {
    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Render a narrated MP4 (requires `ffmpeg` and `ffprobe`).
    Render(RenderArgs),
    /// Prepare a request and print the render description and ffmpeg arguments as JSON.
    Plan(PlanArgs),
    /// Rasterize one subtitle overlay as a PNG.
    Subtitle(SubtitleArgs),
}

#[derive(Parser, Debug)]
struct CommonArgs {
    /// Render request JSON; when omitted the request is built from the flags below.
    #[arg(long = "request", conflicts_with_all = ["text", "audio"])]
    request_path: Option<PathBuf>,

    /// Narration text.
    #[arg(long)]
    text: Option<String>,

    /// Narration audio file.
    #[arg(long)]
    audio: Option<PathBuf>,

    /// Frame aspect ratio ("16:9" or "9:16").
    #[arg(long, default_value = "16:9")]
    aspect_ratio: String,

    /// Background kind ("color", "image" or "generate").
    #[arg(long, default_value = "color")]
    background_type: String,

    /// Background color or image path.
    #[arg(long, default_value = "black")]
    background_value: String,

    /// Pipeline config JSON; defaults apply when omitted.
    #[arg(long = "config")]
    config_path: Option<PathBuf>,

    /// Override the working directory for overlays and default outputs.
    #[arg(long)]
    work_dir: Option<PathBuf>,

    /// Override the subtitle font file.
    #[arg(long)]
    font: Option<PathBuf>,

    /// Rasterization worker threads.
    #[arg(long)]
    threads: Option<usize>,
}

#[derive(Parser, Debug)]
struct RenderArgs {
    #[command(flatten)]
    common: CommonArgs,

    /// Output MP4 path; overrides the request.
    #[arg(long)]
    out: Option<PathBuf>,

    /// Abort ffmpeg after this many seconds.
    #[arg(long)]
    timeout_secs: Option<u64>,

    /// Remove the overlay PNGs once the render returns.
    #[arg(long)]
    cleanup: bool,
}

#[derive(Parser, Debug)]
struct PlanArgs {
    #[command(flatten)]
    common: CommonArgs,

    /// Use this audio duration instead of probing with ffprobe.
    #[arg(long)]
    duration: Option<f64>,
}

#[derive(Parser, Debug)]
struct SubtitleArgs {
    /// Subtitle text.
    #[arg(long)]
    text: String,

    /// Frame aspect ratio ("16:9" or "9:16").
    #[arg(long, default_value = "16:9")]
    aspect_ratio: String,

    /// Output PNG path.
    #[arg(long)]
    out: PathBuf,

    /// Subtitle font file.
    #[arg(long)]
    font: Option<PathBuf>,
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();
    match cli.cmd {
        Command::Render(args) => cmd_render(args),
        Command::Plan(args) => cmd_plan(args),
        Command::Subtitle(args) => cmd_subtitle(args),
    }
}

fn load(common: &CommonArgs) -> anyhow::Result<(narrata::PipelineConfig, narrata::RenderRequest)> {
    let mut config = match &common.config_path {
        Some(p) => narrata::PipelineConfig::from_path(p)?,
        None => narrata::PipelineConfig::default(),
    };
    if let Some(dir) = &common.work_dir {
        config.work_dir = dir.clone();
    }
    if let Some(font) = &common.font {
        config.font_path = Some(font.clone());
    }
    if common.threads.is_some() {
        config.threads = common.threads;
    }
    let request = match &common.request_path {
        Some(p) => narrata::RenderRequest::from_path(p)?,
        None => request_from_flags(common)?,
    };
    Ok((config, request))
}

fn request_from_flags(common: &CommonArgs) -> anyhow::Result<narrata::RenderRequest> {
    let text = common
        .text
        .clone()
        .context("either --request or --text/--audio is required")?;
    let audio_path = common
        .audio
        .clone()
        .context("either --request or --text/--audio is required")?;
    Ok(narrata::RenderRequest {
        text,
        audio_path,
        aspect_ratio: common.aspect_ratio.parse()?,
        background_type: common.background_type.parse()?,
        background_value: common.background_value.clone(),
        output_path: None,
    })
}

fn cmd_render(args: RenderArgs) -> anyhow::Result<()> {
    let (mut config, mut request) = load(&args.common)?;
    if args.timeout_secs.is_some() {
        config.timeout_secs = args.timeout_secs;
    }
    if let Some(out) = args.out {
        request.output_path = Some(out);
    }

    for bin in [&config.ffmpeg_bin, &config.ffprobe_bin] {
        if !narrata::is_tool_available(bin) {
            anyhow::bail!("'{}' is not available; install ffmpeg", bin.display());
        }
    }

    let session = narrata::NarrationSession::new(config)?;
    let probe = session.config().ffprobe();
    let mut engine = session.config().ffmpeg_engine();
    let control = session.config().render_control();

    let prepared = session.prepare(&request, &probe)?;
    let result = narrata::render(&prepared.spec, &mut engine, &control);
    if args.cleanup {
        remove_overlays(&prepared.overlay_dir);
    }
    let out = result?;

    println!("{}", out.display());
    Ok(())
}

fn cmd_plan(args: PlanArgs) -> anyhow::Result<()> {
    let (config, request) = load(&args.common)?;
    let session = narrata::NarrationSession::new(config)?;
    let prepared = match args.duration {
        Some(secs) => session.prepare(&request, &narrata::KnownDuration(secs))?,
        None => session.prepare(&request, &session.config().ffprobe())?,
    };

    let ffmpeg_args: Vec<String> = narrata::ffmpeg_args(
        &prepared.spec.manifest,
        &prepared.spec.graph,
        &prepared.spec.output_path,
        true,
    )
    .into_iter()
    .map(|a| a.to_string_lossy().into_owned())
    .collect();

    let plan = serde_json::json!({
        "prepared": prepared,
        "filter_complex": narrata::filter_complex(&prepared.spec.graph),
        "ffmpeg_args": ffmpeg_args,
    });
    println!(
        "{}",
        serde_json::to_string_pretty(&plan).context("serialize plan")?
    );
    Ok(())
}

fn cmd_subtitle(args: SubtitleArgs) -> anyhow::Result<()> {
    let aspect: narrata::AspectRatio = args.aspect_ratio.parse()?;
    let res = aspect.resolution();
    let font = narrata::SubtitleFont::discover(args.font.as_deref())?;
    let mut raster = narrata::SubtitleRasterizer::new(&font, narrata::SubtitleStyle::default())?;
    let image = raster.rasterize(&args.text, res.width, res.height)?;
    image.save_png(&args.out)?;
    eprintln!("wrote {} ({res})", args.out.display());
    Ok(())
}

fn remove_overlays(dir: &Path) {
    if let Err(e) = std::fs::remove_dir_all(dir) {
        tracing::warn!(dir = %dir.display(), error = %e, "failed to remove overlay dir");
    }
}
