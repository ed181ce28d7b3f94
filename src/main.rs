//! Diagnostic snapshots of visibility, light, and overlay composition.
#![forbid(unsafe_code)]

mod scene;
mod snapshot;

use std::error::Error;
use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use umbra_tiles::TileSet;

use scene::Scene;
use snapshot::{Snapshot, SnapshotOptions};

#[derive(Parser, Debug)]
#[command(name = "umbra", version, about = "Visibility, lighting and overlay snapshots for legacy tile maps")]
struct Cli {
    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Compute one frame for a scene file and print it
    Snapshot(SnapshotArgs),
}

#[derive(Args, Debug)]
struct SnapshotArgs {
    /// Scene TOML (view, ambient, map, objects, tiles)
    scene: PathBuf,
    /// Tile flags TOML; replaces the scene's own tiles
    #[arg(long)]
    tiles: Option<PathBuf>,
    /// Ignore the object layer's window stream and scan per cell
    #[arg(long)]
    no_stream: bool,
    /// Debug logging, including perf timings
    #[arg(short, long)]
    verbose: bool,
    /// Inject the magic lens overlay
    #[arg(long)]
    lens: bool,
    /// Inject darkness glyphs over dim cells
    #[arg(long)]
    obscurity: bool,
}

fn main() -> Result<(), Box<dyn Error>> {
    let cli = Cli::parse();
    match cli.cmd {
        Command::Snapshot(args) => run_snapshot(args),
    }
}

fn run_snapshot(args: SnapshotArgs) -> Result<(), Box<dyn Error>> {
    let level = if args.verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level)).init();

    let mut scene = Scene::load_from_path(&args.scene)?;
    if let Some(path) = &args.tiles {
        scene.tiles = TileSet::load_from_path(path)?;
        log::info!("tiles: {}", path.display());
    }
    if args.no_stream {
        scene.disable_stream();
    }
    let opts = SnapshotOptions {
        lens: args.lens,
        obscurity: args.obscurity,
    };
    let snap = Snapshot::capture(&scene, opts);
    print!("{}", snap);
    Ok(())
}
