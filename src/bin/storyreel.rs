use std::path::{Path, PathBuf};

use anyhow::Context as _;
use clap::{Parser, Subcommand, ValueEnum};
use storyreel::{
    Compositor, CompositorConfig, EncoderCapability, Format, ReelError, RenderRequest,
    probe_encoder_capability,
};

#[derive(Parser, Debug)]
#[command(name = "storyreel", version)]
struct Cli {
    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Render a captioned MP4 (requires `ffmpeg` on PATH).
    Render(RenderArgs),
    /// Print the derived timeline as JSON without encoding.
    Plan(JobArgs),
    /// Print the encoder capability of this host.
    Probe,
}

#[derive(Parser, Debug)]
struct JobArgs {
    /// Narration audio file.
    #[arg(long)]
    narration: PathBuf,

    /// Plain-text script file.
    #[arg(long)]
    script: PathBuf,

    /// Background images, in display order.
    #[arg(long = "image", num_args = 1..)]
    images: Vec<PathBuf>,

    /// Directory holding numbered images (`<index>.png` or `<index>.jpg`).
    #[arg(long, requires = "index")]
    image_dir: Option<PathBuf>,

    /// Image number to start from inside `--image-dir`; also used as the job index.
    #[arg(long)]
    index: Option<u32>,

    /// How many numbered images to pick from `--image-dir`.
    #[arg(long, default_value_t = 10)]
    image_count: u32,

    /// Output format preset.
    #[arg(long, value_enum, default_value_t = FormatChoice::Shorts)]
    format: FormatChoice,

    /// JSON config whose fields override the format preset.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Ambient bed looped under the narration.
    #[arg(long)]
    ambient: Option<PathBuf>,

    /// Override the duration cap in seconds.
    #[arg(long)]
    max_secs: Option<f64>,

    /// Output video path.
    #[arg(long, default_value = "out/video.mp4")]
    out: PathBuf,
}

#[derive(Parser, Debug)]
struct RenderArgs {
    #[command(flatten)]
    job: JobArgs,

    /// Skip the NVENC probe and encode in software.
    #[arg(long)]
    software: bool,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum FormatChoice {
    Shorts,
    Longform,
}

impl From<FormatChoice> for Format {
    fn from(value: FormatChoice) -> Self {
        match value {
            FormatChoice::Shorts => Format::Shorts,
            FormatChoice::Longform => Format::Longform,
        }
    }
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    match cli.cmd {
        Command::Render(args) => cmd_render(args),
        Command::Plan(args) => cmd_plan(args),
        Command::Probe => cmd_probe(),
    }
}

fn load_config(args: &JobArgs) -> anyhow::Result<CompositorConfig> {
    let preset = CompositorConfig::for_format(args.format.into());
    let mut cfg = match &args.config {
        Some(path) => CompositorConfig::from_path_over(&preset, path)?,
        None => preset,
    };
    if let Some(ambient) = &args.ambient {
        cfg.ambient_bed_path = Some(ambient.clone());
    }
    cfg.validate()?;
    Ok(cfg)
}

fn build_request(args: &JobArgs) -> anyhow::Result<RenderRequest> {
    let format: Format = args.format.into();
    let script_text = std::fs::read_to_string(&args.script)
        .with_context(|| format!("read script '{}'", args.script.display()))?;

    let mut image_paths = args.images.clone();
    if let (Some(dir), Some(index)) = (&args.image_dir, args.index) {
        image_paths.extend(numbered_images(dir, index, args.image_count));
    }

    Ok(RenderRequest {
        narration_audio_path: args.narration.clone(),
        script_text,
        image_paths,
        canvas: format.canvas(),
        max_total_secs: args.max_secs.unwrap_or_else(|| format.max_total_secs()),
        output_path: args.out.clone(),
        job_index: args.index,
    })
}

/// `<dir>/<n>.png`, falling back to `<dir>/<n>.jpg`, for `n` in `start..start + count`.
///
/// Missing numbers keep their slot so the timeline still renders a fallback segment for them.
fn numbered_images(dir: &Path, start: u32, count: u32) -> Vec<PathBuf> {
    (start..start.saturating_add(count))
        .map(|n| {
            let png = dir.join(format!("{n}.png"));
            if png.exists() {
                return png;
            }
            let jpg = dir.join(format!("{n}.jpg"));
            if jpg.exists() { jpg } else { png }
        })
        .collect()
}

fn cmd_render(args: RenderArgs) -> anyhow::Result<()> {
    let cfg = load_config(&args.job)?;
    let request = build_request(&args.job)?;
    let capability = if args.software {
        EncoderCapability::Software
    } else {
        probe_encoder_capability()
    };

    let compositor = Compositor::new(cfg, capability)?;
    match compositor.compose(&request) {
        Ok(result) if result.success => {
            eprintln!("wrote {} ({} bytes)", result.output_path.display(), result.byte_size);
            Ok(())
        }
        Ok(result) => {
            eprintln!(
                "render failed: exhausted retries after {} attempts: {}",
                result.attempts,
                result.failure.as_deref().unwrap_or("unknown")
            );
            std::process::exit(3);
        }
        Err(ReelError::FatalInput(msg)) => {
            eprintln!("render failed: fatal input: {msg}");
            std::process::exit(2);
        }
        Err(e) => Err(e.into()),
    }
}

fn cmd_plan(args: JobArgs) -> anyhow::Result<()> {
    let cfg = load_config(&args)?;
    let request = build_request(&args)?;
    let compositor = Compositor::new(cfg, EncoderCapability::Software)?;
    let plan = compositor.plan(&request)?;
    println!(
        "{}",
        serde_json::to_string_pretty(&plan).context("serialize timeline")?
    );
    Ok(())
}

fn cmd_probe() -> anyhow::Result<()> {
    let capability = probe_encoder_capability();
    println!(
        "{}",
        serde_json::to_string(&capability).context("serialize capability")?
    );
    Ok(())
}
