use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::Context as _;
use clap::{Parser, Subcommand};

#[derive(Parser, Debug)]
#[command(name = "twibbon", version)]
struct Cli {
    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Place a photo under the frame and export a PNG.
    Compose(ComposeArgs),
    /// Validate a photo the way an upload is validated.
    Check(CheckArgs),
    /// List frames in the catalog.
    Frames(FramesArgs),
}

#[derive(Parser, Debug)]
struct ComposeArgs {
    /// Photo to place beneath the frame.
    #[arg(long)]
    photo: PathBuf,

    /// Frame overlay (PNG/JPEG/WebP/GIF or SVG). Defaults to the configured frame asset.
    #[arg(long)]
    frame: Option<PathBuf>,

    /// Editor config JSON.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Declared MIME type of the photo. Inferred when omitted.
    #[arg(long)]
    mime: Option<String>,

    /// Horizontal offset in canvas pixels.
    #[arg(long, default_value_t = 0.0, allow_hyphen_values = true)]
    offset_x: f64,

    /// Vertical offset in canvas pixels.
    #[arg(long, default_value_t = 0.0, allow_hyphen_values = true)]
    offset_y: f64,

    /// Zoom factor.
    #[arg(long, default_value_t = 1.0)]
    scale: f64,

    /// Clockwise rotation in degrees.
    #[arg(long, default_value_t = 0.0, allow_hyphen_values = true)]
    rotation: f64,

    /// Directory the PNG is written to.
    #[arg(long, default_value = ".")]
    out_dir: PathBuf,
}

#[derive(Parser, Debug)]
struct CheckArgs {
    /// Photo to validate.
    #[arg(long)]
    photo: PathBuf,

    /// Editor config JSON (for upload limits).
    #[arg(long)]
    config: Option<PathBuf>,

    /// Declared MIME type. Inferred when omitted.
    #[arg(long)]
    mime: Option<String>,
}

#[derive(Parser, Debug)]
struct FramesArgs {
    /// Editor config JSON.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Only list this category (`all` lists everything).
    #[arg(long)]
    category: Option<String>,
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    match cli.cmd {
        Command::Compose(args) => cmd_compose(args).await,
        Command::Check(args) => cmd_check(args),
        Command::Frames(args) => cmd_frames(args),
    }
}

fn load_config(path: Option<&Path>) -> anyhow::Result<twibbon::EditorConfig> {
    match path {
        Some(p) => twibbon::EditorConfig::from_path(p)
            .with_context(|| format!("load config '{}'", p.display())),
        None => Ok(twibbon::EditorConfig::default()),
    }
}

fn read_file(path: &Path) -> anyhow::Result<Vec<u8>> {
    std::fs::read(path).with_context(|| format!("read '{}'", path.display()))
}

fn file_name(path: &Path) -> Option<&str> {
    path.file_name().and_then(|n| n.to_str())
}

async fn cmd_compose(args: ComposeArgs) -> anyhow::Result<()> {
    let cfg = load_config(args.config.as_deref())?;
    let mut editor = twibbon::Editor::new(cfg)?;

    let photo = read_file(&args.photo)?;
    let candidate = twibbon::UploadCandidate {
        file_name: file_name(&args.photo),
        declared_type: args.mime.as_deref(),
        bytes: &photo,
    };
    let frame: Arc<[u8]> = match &args.frame {
        Some(p) => Arc::from(read_file(p)?),
        None => editor.read_frame_asset()?,
    };
    editor.load(&candidate, frame).await?;

    editor.set_scale(args.scale);
    editor.set_rotation(args.rotation);
    editor.set_offset_x(args.offset_x);
    editor.set_offset_y(args.offset_y);

    let mut sink = twibbon::DirSink::new(&args.out_dir);
    let artifact = editor.export(&mut sink)?;

    eprintln!("wrote {}", sink.dir().join(&artifact.file_name).display());
    Ok(())
}

fn cmd_check(args: CheckArgs) -> anyhow::Result<()> {
    let cfg = load_config(args.config.as_deref())?;
    let photo = read_file(&args.photo)?;
    let candidate = twibbon::UploadCandidate {
        file_name: file_name(&args.photo),
        declared_type: args.mime.as_deref(),
        bytes: &photo,
    };
    let mime = cfg.upload.validate(&candidate)?;
    println!("ok {mime} {} bytes", photo.len());
    Ok(())
}

fn cmd_frames(args: FramesArgs) -> anyhow::Result<()> {
    let cfg = load_config(args.config.as_deref())?;
    for f in cfg.catalog.list_frames(args.category.as_deref()) {
        println!("{}\t{}\t{}\t{}", f.id, f.category, f.display_name, f.source);
    }
    Ok(())
}
