use clap::Parser;
use log::{error, info};
use modeller::app::{run_gui, run_snapshot};
use modeller::io::config::Config;
use std::path::PathBuf;
use std::process;

/// Interactive viewer for a small scene of cubes and spheres.
#[derive(Parser, Debug)]
#[command(name = "modeller")]
#[command(about = "Pick and drag primitives in a small 3D scene")]
struct Cli {
    /// Config file path (TOML)
    #[arg(short, long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Render one frame to this image file instead of opening a window
    #[arg(long, value_name = "PNG")]
    snapshot: Option<PathBuf>,
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .format_timestamp(None)
        .init();

    let cli = Cli::parse();

    let config = match &cli.config {
        Some(path) => {
            info!("Loading config from '{}'", path.display());
            Config::load(path)
        }
        None => {
            info!("Using default config");
            Ok(Config::default())
        }
    };

    let result = config.and_then(|config| match &cli.snapshot {
        Some(output) => run_snapshot(config, output),
        None => run_gui(config),
    });

    if let Err(e) = result {
        error!("{}", e);
        process::exit(1);
    }
}
