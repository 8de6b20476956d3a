use anyhow::{Context, Result};
use spectrum_player::app::{event_loop, state::AppState};
use spectrum_player::data::{config::Config, playlist::Playlist};
use std::path::PathBuf;

fn main() -> Result<()> {
    env_logger::init();

    let paths: Vec<PathBuf> = std::env::args_os().skip(1).map(PathBuf::from).collect();
    if paths.is_empty() {
        eprintln!("Usage: spectrum-player <file>...");
        std::process::exit(2);
    }

    let config = Config::load_or_default();
    config.analysis.validate().context("invalid analysis config")?;
    let mut app = AppState::new(config, Playlist::from_paths(paths));
    event_loop::run(&mut app)
}
