use std::path::PathBuf;

use anyhow::{Context, Result};
use surface_correlation::config::Config;
use surface_correlation::pipeline;

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    // Optional single argument: JSON config file.
    let config = match std::env::args_os().nth(1).map(PathBuf::from) {
        Some(path) => Config::load(&path).context("loading configuration")?,
        None => Config::default(),
    };

    let summary = pipeline::run(&config)?;
    log::info!(
        "Done: {} panels, {}x{} px -> {}",
        summary.panels,
        summary.canvas.0,
        summary.canvas.1,
        summary.output.display()
    );
    Ok(())
}
