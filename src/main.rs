use anyhow::Context;
use clap::{Args, Parser, Subcommand};
use std::path::{Path, PathBuf};
use tokio::sync::broadcast::error::RecvError;
use tokio::time::MissedTickBehavior;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use halftone::ShapeKind;
use reticulate::models::{StyleConfig, StyleOverrides, CONFIG_ENV};
use reticulate::services::encoder::FFMPEG_ENV;
use reticulate::services::{
    FileWatcher, FrameExporter, FramePlan, PreviewCadence, RenderService, VideoEncoder,
};

#[derive(Parser)]
#[command(name = "reticulate")]
#[command(about = "Halftone and pointillism stylizer for images and frame sequences")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Stylize a single PNG image
    Render {
        /// Input PNG file
        #[arg(short, long)]
        input: PathBuf,

        /// Output PNG file
        #[arg(short, long)]
        output: PathBuf,

        #[command(flatten)]
        style: StyleArgs,
    },
    /// Stylize a directory of PNG frames, optionally encoding a video
    Frames {
        /// Directory of source frames (sorted by file name)
        #[arg(short, long)]
        input: PathBuf,

        /// Directory for the rendered frame_NNNNN.png sequence
        #[arg(short, long)]
        output: PathBuf,

        /// Frame rate of the source sequence
        #[arg(long)]
        source_fps: f64,

        /// Export frame rate (defaults to the configured preview rate)
        #[arg(long)]
        fps: Option<u32>,

        /// Encode the rendered frames to this video file with ffmpeg
        #[arg(long)]
        encode: Option<PathBuf>,

        /// Frames rendered concurrently (defaults to the number of CPUs)
        #[arg(short, long)]
        jobs: Option<usize>,

        #[command(flatten)]
        style: StyleArgs,
    },
    /// Re-render whenever the input image or config file changes
    Watch {
        /// Input PNG file
        #[arg(short, long)]
        input: PathBuf,

        /// Output PNG file
        #[arg(short, long)]
        output: PathBuf,

        /// Style config file to watch
        #[arg(short, long)]
        config: PathBuf,

        #[command(flatten)]
        overrides: OverrideArgs,
    },
    /// Print the resolved style settings as YAML
    Settings {
        #[command(flatten)]
        style: StyleArgs,
    },
    /// List available shapes
    Shapes,
}

/// Config file plus per-invocation overrides
#[derive(Args, Debug, Clone)]
struct StyleArgs {
    /// Style config file (YAML); falls back to RETICULATE_CONFIG
    #[arg(short, long)]
    config: Option<PathBuf>,

    #[command(flatten)]
    overrides: OverrideArgs,
}

#[derive(Args, Debug, Clone, Default)]
struct OverrideArgs {
    /// Grid cell size in pixels
    #[arg(long)]
    cell_size: Option<u32>,

    /// Contrast exponent (1.0 = linear)
    #[arg(long)]
    contrast: Option<f64>,

    /// Shape color, e.g. "#ffffff" or "transparent"
    #[arg(long = "fg")]
    foreground: Option<String>,

    /// Background color, e.g. "#1a1a1a" or "transparent"
    #[arg(long = "bg")]
    background: Option<String>,

    /// Shape name (see `reticulate shapes`)
    #[arg(long)]
    shape: Option<String>,

    /// Invert brightness before sizing
    #[arg(long, overrides_with = "no_invert")]
    invert: bool,

    /// Keep brightness as is
    #[arg(long, overrides_with = "invert")]
    no_invert: bool,

    /// Binary on/off shapes instead of continuous sizing
    #[arg(long, overrides_with = "no_threshold")]
    threshold: bool,

    /// Continuous shape sizing
    #[arg(long, overrides_with = "threshold")]
    no_threshold: bool,

    /// Size multiplier is 1 + overlap
    #[arg(long, allow_hyphen_values = true)]
    overlap: Option<f64>,

    /// Enable the edge boost
    #[arg(long, overrides_with = "no_edges")]
    edges: bool,

    /// Disable the edge boost
    #[arg(long, overrides_with = "edges")]
    no_edges: bool,

    /// Edge boost sensitivity
    #[arg(long)]
    sensitivity: Option<f64>,

    /// Longest side of the input after loading (0 = uncapped)
    #[arg(long)]
    max_dimension: Option<u32>,

    /// Preview rate for watch mode, also the default export rate
    #[arg(long)]
    preview_fps: Option<u32>,

    /// Re-compress output PNGs with oxipng
    #[arg(long)]
    optimize: bool,

    /// Exchange foreground and background colors
    #[arg(long)]
    swap_colors: bool,
}

/// An `--x`/`--no-x` pair; neither flag keeps the configured value
fn flag_pair(on: bool, off: bool) -> Option<bool> {
    match (on, off) {
        (true, _) => Some(true),
        (_, true) => Some(false),
        _ => None,
    }
}

impl OverrideArgs {
    fn to_overrides(&self) -> StyleOverrides {
        StyleOverrides {
            cell_size: self.cell_size,
            contrast: self.contrast,
            foreground: self.foreground.clone(),
            background: self.background.clone(),
            shape: self.shape.clone(),
            invert: flag_pair(self.invert, self.no_invert),
            threshold: flag_pair(self.threshold, self.no_threshold),
            overlap: self.overlap,
            edge_detection: flag_pair(self.edges, self.no_edges),
            edge_sensitivity: self.sensitivity,
            max_dimension: self.max_dimension,
            preview_fps: self.preview_fps,
            optimize_png: self.optimize,
            swap_colors: self.swap_colors,
        }
    }
}

impl StyleArgs {
    fn resolve(&self) -> anyhow::Result<StyleConfig> {
        let mut config = StyleConfig::resolve(self.config.as_deref())?;
        config.apply(&self.overrides.to_overrides());
        Ok(config)
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "reticulate=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().without_time())
        .init();

    match cli.command {
        Some(Commands::Render {
            input,
            output,
            style,
        }) => run_render_command(&input, &output, &style).await,
        Some(Commands::Frames {
            input,
            output,
            source_fps,
            fps,
            encode,
            jobs,
            style,
        }) => {
            run_frames_command(
                &input,
                &output,
                source_fps,
                fps,
                encode.as_deref(),
                jobs,
                &style,
            )
            .await
        }
        Some(Commands::Watch {
            input,
            output,
            config,
            overrides,
        }) => run_watch_command(&input, &output, &config, &overrides).await,
        Some(Commands::Settings { style }) => run_settings_command(&style),
        Some(Commands::Shapes) => {
            run_shapes_command();
            Ok(())
        }
        None => {
            run_status_command();
            Ok(())
        }
    }
}

/// Stylize one image file
async fn run_render_command(input: &Path, output: &Path, style: &StyleArgs) -> anyhow::Result<()> {
    let config = style.resolve()?;
    let service = RenderService::from_config(&config)?;
    let outcome = service
        .render_file(input, output)
        .await
        .with_context(|| format!("Failed to render {}", input.display()))?;

    println!(
        "Rendered {} ({}x{}, {} bytes)",
        output.display(),
        outcome.width,
        outcome.height,
        outcome.bytes
    );
    Ok(())
}

/// Stylize a frame directory and optionally encode it
async fn run_frames_command(
    input: &Path,
    output: &Path,
    source_fps: f64,
    fps: Option<u32>,
    encode: Option<&Path>,
    jobs: Option<usize>,
    style: &StyleArgs,
) -> anyhow::Result<()> {
    let config = style.resolve()?;
    let plan = FramePlan::new(fps.unwrap_or(config.preview_fps));

    let mut exporter = FrameExporter::new(RenderService::from_config(&config)?);
    if let Some(jobs) = jobs {
        exporter = exporter.concurrency(jobs);
    }
    let summary = exporter.export(input, output, source_fps, plan).await?;
    println!(
        "Rendered {} of {} frames at {} fps into {}",
        summary.frames,
        summary.source_frames,
        summary.fps,
        summary.output_dir.display()
    );

    if let Some(video) = encode {
        let encoder = VideoEncoder::new();
        match encoder.encode(output, summary.fps, video).await {
            Ok(()) => println!("Encoded {}", video.display()),
            Err(e) => {
                // The PNG sequence is still usable
                tracing::warn!(error = %e, "Video encoding failed");
                eprintln!(
                    "Video encoding failed ({e}); rendered frames kept in {}",
                    output.display()
                );
            }
        }
    }
    Ok(())
}

/// Render once, then again after changes to the input or config, at most
/// once per preview frame
async fn run_watch_command(
    input: &Path,
    output: &Path,
    config: &Path,
    overrides: &OverrideArgs,
) -> anyhow::Result<()> {
    let overrides = overrides.to_overrides();
    let watcher = FileWatcher::new(&[input.to_path_buf(), config.to_path_buf()]);
    if !watcher.is_active() {
        anyhow::bail!(
            "Could not watch {} and {}",
            input.display(),
            config.display()
        );
    }
    let mut changes = watcher.subscribe();

    let mut preview_fps = watch_render(input, output, config, &overrides)
        .await
        .unwrap_or_else(|| StyleConfig::default().preview_fps);
    let mut cadence = PreviewCadence::new(FramePlan::new(preview_fps));
    let mut ticker = tokio::time::interval(cadence.tick_interval());
    ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);
    println!("Watching for changes (Ctrl-C to stop)");

    loop {
        tokio::select! {
            event = changes.recv() => match event {
                Ok(event) => {
                    tracing::info!(paths = ?event.paths, "Change detected");
                    cadence.request();
                }
                Err(RecvError::Lagged(skipped)) => {
                    tracing::debug!(skipped, "Change events lagged");
                    cadence.request();
                }
                Err(RecvError::Closed) => break,
            },
            _ = ticker.tick() => {
                if !cadence.tick() {
                    continue;
                }
                if let Some(fps) = watch_render(input, output, config, &overrides).await {
                    if fps != preview_fps {
                        tracing::info!(fps, "Preview rate changed");
                        preview_fps = fps;
                        cadence = PreviewCadence::new(FramePlan::new(fps));
                    }
                }
            }
            _ = tokio::signal::ctrl_c() => {
                tracing::info!("Stopping watch");
                break;
            }
        }
    }
    Ok(())
}

/// One watch-mode render, returning the style's preview rate; failures are
/// logged so the loop keeps running
async fn watch_render(
    input: &Path,
    output: &Path,
    config: &Path,
    overrides: &StyleOverrides,
) -> Option<u32> {
    let result = async {
        let mut style = StyleConfig::load(config)?;
        style.apply(overrides);
        let service = RenderService::from_config(&style)?;
        let outcome = service.render_file(input, output).await?;
        anyhow::Ok((outcome, style.preview_fps))
    }
    .await;

    match result {
        Ok((outcome, preview_fps)) => {
            println!(
                "Rendered {} ({}x{})",
                output.display(),
                outcome.width,
                outcome.height
            );
            Some(preview_fps)
        }
        Err(e) => {
            tracing::error!(error = %e, "Render failed");
            None
        }
    }
}

/// Print the resolved style as a YAML snapshot
fn run_settings_command(style: &StyleArgs) -> anyhow::Result<()> {
    let config = style.resolve()?;
    // Reject values the renderer would refuse
    config.to_settings()?;
    print!("{}", config.to_yaml()?);
    Ok(())
}

fn run_shapes_command() {
    for kind in ShapeKind::ALL {
        println!("{kind}");
    }
}

/// Show version, environment and available commands
fn run_status_command() {
    const VERSION: &str = env!("CARGO_PKG_VERSION");

    let config_file = std::env::var(CONFIG_ENV).ok();
    let ffmpeg = std::env::var(FFMPEG_ENV).ok();
    let rust_log = std::env::var("RUST_LOG").ok();

    println!("Reticulate v{VERSION}");
    println!("Halftone and pointillism stylizer\n");

    println!("Environment Variables:");
    println!(
        "  {CONFIG_ENV}  = {}",
        config_file.as_deref().unwrap_or("(not set)")
    );
    println!(
        "  {FFMPEG_ENV}  = {}",
        ffmpeg.as_deref().unwrap_or("ffmpeg (default)")
    );
    println!(
        "  RUST_LOG           = {}",
        rust_log.as_deref().unwrap_or("reticulate=info (default)")
    );

    let config_source = match &config_file {
        Some(path) if Path::new(path).exists() => path.to_string(),
        Some(_) => "defaults (file not found)".to_string(),
        None => "defaults".to_string(),
    };
    println!("\nStyle config: {config_source}");

    println!("\nCommands:");
    println!("  render     Stylize a single PNG image");
    println!("  frames     Stylize a directory of PNG frames (optionally encode)");
    println!("  watch      Re-render on input or config changes");
    println!("  settings   Print resolved settings as YAML");
    println!("  shapes     List available shapes");
    println!("\nRun 'reticulate --help' for more options.");
}
