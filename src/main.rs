use std::fs;
use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use moodboard::archive::{self, ArchiveError};
use moodboard::board::{Board, ImageCrateDecoder};
use moodboard::geom::Point;
use moodboard::settings::{ConfigError, Settings};
use moodboard::viewport::Viewport;

#[derive(Debug, thiserror::Error)]
enum CliError {
    #[error("{path}: {source}")]
    Io { path: PathBuf, source: std::io::Error },
    #[error("archive error: {0}")]
    Archive(#[from] ArchiveError),
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),
    #[error("none of the {0} file(s) could be decoded as an image")]
    UnreadableImages(usize),
}

#[derive(Parser, Debug)]
#[command(name = "moodboard", about = "Inspect and edit moodboard project archives")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Print the manifest summary and every archive entry.
    Inspect { archive: PathBuf },
    /// Pack every image into a compact layout and re-save.
    Tidy {
        archive: PathBuf,
        /// Write here instead of overwriting the input.
        #[arg(short, long)]
        out: Option<PathBuf>,
        #[arg(long, default_value_t = 0.0)]
        x: f64,
        #[arg(long, default_value_t = 0.0)]
        y: f64,
    },
    /// Import image files into an archive, creating it if needed.
    Add {
        archive: PathBuf,
        #[arg(required = true)]
        images: Vec<PathBuf>,
        /// Drop point of the first image; later ones are staggered.
        #[arg(long, default_value_t = 100.0)]
        x: f64,
        #[arg(long, default_value_t = 100.0)]
        y: f64,
    },
}

fn main() -> Result<(), CliError> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt().with_env_filter(filter).with_writer(std::io::stderr).init();

    let cli = Cli::parse();
    let settings = Settings::from_env()?;

    match cli.command {
        Command::Inspect { archive } => run_inspect(&archive),
        Command::Tidy { archive, out, x, y } => run_tidy(settings, &archive, out.as_deref(), Point::new(x, y)),
        Command::Add { archive, images, x, y } => run_add(settings, &archive, &images, Point::new(x, y)),
    }
}

fn read(path: &Path) -> Result<Vec<u8>, CliError> {
    fs::read(path).map_err(|source| CliError::Io { path: path.to_owned(), source })
}

fn write(path: &Path, bytes: &[u8]) -> Result<(), CliError> {
    fs::write(path, bytes).map_err(|source| CliError::Io { path: path.to_owned(), source })
}

fn run_inspect(path: &Path) -> Result<(), CliError> {
    let project = archive::load_project(&read(path)?)?;
    let m = &project.manifest;
    println!("format     {}", m.version);
    println!("created    {}", m.metadata.created);
    println!("modified   {}", m.metadata.modified);
    println!("canvas     {} x {}", m.canvas.width, m.canvas.height);
    let vp = m.canvas.viewport;
    println!("viewport   x={} y={} zoom={}", vp.x, vp.y, vp.zoom);
    println!("images     {}", m.images.len());
    for item in &m.images {
        println!(
            "  {:<32} {:>6} x {:<6} at ({}, {})  z={}  {}  {} bytes",
            item.filename,
            item.size.width,
            item.size.height,
            item.position.x,
            item.position.y,
            item.z_index,
            archive::mime_type(&item.filename),
            item.data.len(),
        );
    }
    for (label, containers) in [("groups", &m.groups), ("artboards", &m.artboards)] {
        println!("{label:<10} {}", containers.len());
        for c in containers {
            println!("  {:<32} {} children", c.name, c.children.len());
        }
    }
    for filename in &project.missing {
        println!("missing    {filename}");
    }
    Ok(())
}

fn run_tidy(settings: Settings, path: &Path, out: Option<&Path>, start: Point) -> Result<(), CliError> {
    let mut board = Board::new(settings);
    let viewport = board.load(&read(path)?)?;
    board.tidy_all(Some(start));
    let target = out.unwrap_or(path);
    write(target, &board.save(viewport)?)?;
    println!("tidied {} image(s) into {}", board.items.len(), target.display());
    Ok(())
}

fn run_add(settings: Settings, path: &Path, images: &[PathBuf], base: Point) -> Result<(), CliError> {
    let mut board = Board::new(settings);
    let viewport = if path.exists() { board.load(&read(path)?)? } else { Viewport::default() };

    let mut files = Vec::with_capacity(images.len());
    for image in images {
        let name = image.file_name().map_or_else(|| "image".to_owned(), |n| n.to_string_lossy().into_owned());
        files.push((name, read(image)?));
    }
    let added = board.import_many(&ImageCrateDecoder, files, Some(base));
    if added.is_empty() {
        return Err(CliError::UnreadableImages(images.len()));
    }

    write(path, &board.save(viewport)?)?;
    println!("added {} of {} image(s) to {}", added.len(), images.len(), path.display());
    Ok(())
}
