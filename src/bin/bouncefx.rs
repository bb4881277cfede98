use std::path::PathBuf;

use anyhow::Context as _;
use clap::{Args, Parser, Subcommand, ValueEnum};

#[derive(Parser, Debug)]
#[command(name = "bouncefx", version)]
struct Cli {
    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Render a video by streaming raw frames into the encoder (requires `ffmpeg` on PATH).
    Render(RenderArgs),
    /// Render a single frame as a PNG.
    Frame(FrameArgs),
}

#[derive(Args, Debug)]
struct SceneArgs {
    /// Scene config JSON; flags below override its fields.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Canvas width in pixels.
    #[arg(long)]
    width: Option<u32>,

    /// Canvas height in pixels.
    #[arg(long)]
    height: Option<u32>,

    /// Frames per second.
    #[arg(long)]
    fps: Option<u32>,

    /// Duration in whole seconds.
    #[arg(long)]
    duration: Option<u32>,

    /// Shape kind.
    #[arg(long, value_enum)]
    shape: Option<ShapeChoice>,

    /// Number of shapes.
    #[arg(long)]
    count: Option<usize>,

    /// Whether shapes persist or respawn every tick.
    #[arg(long, value_enum)]
    mode: Option<ModeChoice>,

    /// Enable pairwise velocity exchange between overlapping shapes.
    #[arg(long)]
    pairwise: bool,

    /// Background color as `RRGGBB` or `RRGGBBAA` hex, cleared every frame.
    #[arg(long, value_parser = parse_hex_color, conflicts_with = "trails")]
    background: Option<bouncefx::Color>,

    /// Never clear the canvas, leaving trails.
    #[arg(long)]
    trails: bool,

    /// Seed for shape placement and respawns.
    #[arg(long)]
    seed: Option<u64>,
}

#[derive(Args, Debug)]
struct RenderArgs {
    #[command(flatten)]
    scene: SceneArgs,

    /// Output video path.
    #[arg(long, default_value = "output.mp4")]
    out: PathBuf,

    /// Refuse to replace an existing output file.
    #[arg(long)]
    no_overwrite: bool,

    /// Encoder executable.
    #[arg(long, default_value = "ffmpeg")]
    encoder: String,

    /// Video codec passed to the encoder.
    #[arg(long, default_value = "libx264")]
    codec: String,
}

#[derive(Args, Debug)]
struct FrameArgs {
    #[command(flatten)]
    scene: SceneArgs,

    /// Frame index (0-based).
    #[arg(long)]
    frame: u64,

    /// Output PNG path.
    #[arg(long)]
    out: PathBuf,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum ShapeChoice {
    Square,
    Disc,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum ModeChoice {
    Persistent,
    Respawn,
}

fn main() -> anyhow::Result<()> {
    init_tracing();
    let cli = Cli::parse();
    match cli.cmd {
        Command::Render(args) => cmd_render(args),
        Command::Frame(args) => cmd_frame(args),
    }
}

fn init_tracing() {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();
}

fn load_scene(args: &SceneArgs) -> anyhow::Result<bouncefx::SceneConfig> {
    let mut cfg = match &args.config {
        Some(path) => bouncefx::SceneConfig::from_path(path)?,
        None => bouncefx::SceneConfig::default(),
    };

    if let Some(width) = args.width {
        cfg.canvas.width = width;
    }
    if let Some(height) = args.height {
        cfg.canvas.height = height;
    }
    if let Some(fps) = args.fps {
        cfg.fps = bouncefx::Fps::integer(fps)?;
    }
    if let Some(duration) = args.duration {
        cfg.duration_secs = duration;
    }
    if let Some(shape) = args.shape {
        cfg.shape = match shape {
            ShapeChoice::Square => bouncefx::ShapeKind::Square,
            ShapeChoice::Disc => bouncefx::ShapeKind::Disc,
        };
    }
    if let Some(count) = args.count {
        cfg.shape_count = count;
    }
    if let Some(mode) = args.mode {
        cfg.spawn = match mode {
            ModeChoice::Persistent => bouncefx::SpawnMode::Persistent,
            ModeChoice::Respawn => bouncefx::SpawnMode::Respawn,
        };
    }
    if args.pairwise {
        cfg.pairwise_collisions = true;
    }
    if args.background.is_some() {
        cfg.background = args.background;
    }
    if args.trails {
        cfg.background = None;
    }
    if let Some(seed) = args.seed {
        cfg.seed = seed;
    }

    cfg.validate()?;
    Ok(cfg)
}

fn cmd_render(args: RenderArgs) -> anyhow::Result<()> {
    let cfg = load_scene(&args.scene)?;
    let mut sim = bouncefx::Simulation::new(cfg)?;

    let opts = bouncefx::EncoderOpts {
        program: args.encoder,
        overwrite: !args.no_overwrite,
        codec: args.codec,
        ..bouncefx::EncoderOpts::new(&args.out)
    };
    let mut sink = bouncefx::EncoderSink::new(opts);
    let stats = sim.run(&mut sink)?;

    eprintln!("wrote {} ({} frames)", args.out.display(), stats.frames);
    Ok(())
}

fn cmd_frame(args: FrameArgs) -> anyhow::Result<()> {
    let cfg = load_scene(&args.scene)?;
    let mut sim = bouncefx::Simulation::new(cfg)?;
    let raster = sim.advance_to(bouncefx::FrameIndex(args.frame))?;
    let canvas = raster.canvas();

    bouncefx::ensure_parent_dir(&args.out)?;
    image::save_buffer_with_format(
        &args.out,
        &raster.to_rgba8(),
        canvas.width,
        canvas.height,
        image::ColorType::Rgba8,
        image::ImageFormat::Png,
    )
    .with_context(|| format!("write png '{}'", args.out.display()))?;

    eprintln!("wrote {}", args.out.display());
    Ok(())
}

fn parse_hex_color(s: &str) -> Result<bouncefx::Color, String> {
    let hex = s.trim_start_matches('#');
    if !matches!(hex.len(), 6 | 8) || !hex.bytes().all(|b| b.is_ascii_hexdigit()) {
        return Err(format!("expected RRGGBB or RRGGBBAA hex, got '{s}'"));
    }
    let byte = |i: usize| u8::from_str_radix(&hex[i..i + 2], 16).map_err(|e| e.to_string());
    let a = if hex.len() == 8 { byte(6)? } else { 255 };
    Ok(bouncefx::Color::from_rgba(byte(0)?, byte(2)?, byte(4)?, a))
}
