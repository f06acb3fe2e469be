use anyhow::{Context, Result};
use caption_core::{MaxWidth, OutputFormat, RenderConfig, Theme, FONT_SIZE_RANGE};
use caption_synth::{ClockSeed, FixedSeed, SeedSource};
use clap::{Args, Parser, Subcommand};
use compositor::GlyphSource;
use converters::{image_to_profile, Session, TransformOpts};
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// framecap – analyze a picture, write it a line, print the line under it.
/// Commands:
///   - analyze --input img            (profile JSON on STDOUT)
///   - caption --input img [--style]  (one caption on STDOUT)
///   - render  --input img [...]      (writes <name>_subtitle.<ext>)
#[derive(Parser, Debug)]
#[command(name = "framecap", version, about = "Mood-aware captions burned under your pictures")]
struct Cli {
    /// Directory for rendered files
    #[arg(long, global = true, default_value = "outputs")]
    out_dir: PathBuf,

    /// TrueType/OpenType font for caption text; built-in bitmap glyphs otherwise
    #[arg(long, global = true, env = "FRAMECAP_FONT")]
    font: Option<PathBuf>,

    #[command(subcommand)]
    cmd: Commands,
}

#[derive(Args, Debug)]
struct CaptionArgs {
    /// Caption style: cinematic, noir, youth, suspense, sciFi
    #[arg(long, default_value = "cinematic")]
    style: String,

    /// Keywords separated by commas, slashes, pipes, semicolons or spaces
    #[arg(long, default_value = "")]
    keywords: String,

    /// Fixed seed for reproducible captions
    #[arg(long)]
    seed: Option<u32>,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Print the perceptual profile of an image
    Analyze {
        #[arg(long)]
        input: PathBuf,
    },

    /// Print a caption for an image
    Caption {
        #[arg(long)]
        input: PathBuf,
        #[command(flatten)]
        caption: CaptionArgs,
    },

    /// Compose the image with its caption band
    Render {
        #[arg(long)]
        input: PathBuf,
        #[command(flatten)]
        caption: CaptionArgs,
        /// Use this text instead of a generated caption
        #[arg(long)]
        text: Option<String>,
        /// dark | light | cinema
        #[arg(long, default_value = "dark", value_parser = parse_theme)]
        theme: Theme,
        #[arg(long, default_value_t = 36, value_parser = font_size_parser())]
        font_size: u32,
        /// Pixel width cap, or "original"
        #[arg(long, default_value = "original", value_parser = parse_max_width)]
        max_width: MaxWidth,
        /// png | jpeg | webp
        #[arg(long, default_value = "png", value_parser = parse_format)]
        format: OutputFormat,
        /// 0..1, jpeg/webp only
        #[arg(long, default_value_t = 0.92)]
        quality: f32,
        /// Device pixel ratio, clamped to 1..2
        #[arg(long, default_value_t = 1.0)]
        dpr: f32,
    },
}

fn parse_theme(s: &str) -> Result<Theme, String> {
    Theme::parse(s).ok_or_else(|| format!("unknown theme: {s}"))
}

fn parse_format(s: &str) -> Result<OutputFormat, String> {
    OutputFormat::parse(s).ok_or_else(|| format!("unsupported output format: {s}"))
}

fn parse_max_width(s: &str) -> Result<MaxWidth, String> {
    MaxWidth::parse(s).ok_or_else(|| format!("expected a positive width or \"original\", got {s}"))
}

fn font_size_parser() -> clap::builder::RangedI64ValueParser<u32> {
    clap::value_parser!(u32).range(i64::from(*FONT_SIZE_RANGE.start())..=i64::from(*FONT_SIZE_RANGE.end()))
}

fn load_glyphs(font: Option<&Path>) -> Result<Arc<GlyphSource>> {
    let glyphs = match font {
        Some(p) => GlyphSource::from_file(p).with_context(|| format!("failed loading font: {}", p.display()))?,
        None => GlyphSource::system(),
    };
    Ok(Arc::new(glyphs))
}

fn open_session(input: &Path, args: &CaptionArgs, glyphs: Arc<GlyphSource>) -> Result<Session> {
    let seeds: Box<dyn SeedSource> = match args.seed {
        Some(s) => Box::new(FixedSeed(s)),
        None => Box::new(ClockSeed),
    };
    let mut session = Session::with_seed_source(seeds, glyphs);
    session.set_style(&args.style);
    session.set_keywords(&args.keywords);

    let bytes = fs::read(input).with_context(|| format!("failed reading image: {}", input.display()))?;
    let name = input.file_name().map(|n| n.to_string_lossy().into_owned());
    session.load(name.as_deref(), &bytes).with_context(|| format!("failed analyzing image: {}", input.display()))?;
    Ok(session)
}

fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();

    match cli.cmd {
        Commands::Analyze { input } => {
            let bytes = fs::read(&input).with_context(|| format!("failed reading image: {}", input.display()))?;
            let opts = TransformOpts { source_name: input.file_name().map(|n| n.to_string_lossy().into_owned()), ..TransformOpts::default() };
            let out = image_to_profile(&bytes, &opts, Arc::new(GlyphSource::Bitmap))?;
            println!("{}", serde_json::to_string_pretty(&out)?);
        }

        Commands::Caption { input, caption } => {
            let session = open_session(&input, &caption, Arc::new(GlyphSource::Bitmap))?;
            println!("{}", session.caption());
        }

        Commands::Render { input, caption, text, theme, font_size, max_width, format, quality, dpr } => {
            let glyphs = load_glyphs(cli.font.as_deref())?;
            let mut session = open_session(&input, &caption, glyphs)?;
            if let Some(t) = text {
                session.set_caption(t);
            }
            let config = RenderConfig { theme, font_size, max_width, format, quality, device_pixel_ratio: dpr };
            match session.render(config).context("render failed")? {
                Some(out) => {
                    fs::create_dir_all(&cli.out_dir)
                        .with_context(|| format!("failed creating {}", cli.out_dir.display()))?;
                    let p = cli.out_dir.join(&out.filename);
                    fs::write(&p, &out.bytes)?;
                    eprintln!("✓ wrote {} ({}x{})", p.display(), out.width, out.height);
                }
                None => eprintln!("caption is empty, nothing rendered"),
            }
        }
    }

    Ok(())
}
