mod app;
mod capture;
mod cli;
mod playlist;

use anyhow::{Context, Result};
use clap::Parser;
use cuboid_core::{LoaderConfig, ViewerConfig};
use cuboid_engine::logging::{LoggingConfig, init_logging};
use cuboid_engine::window::{Runtime, RuntimeConfig};
use winit::dpi::LogicalSize;

use crate::app::ViewerApp;
use crate::cli::Cli;
use crate::playlist::Playlist;

fn main() -> Result<()> {
    let cli = Cli::parse();

    init_logging(LoggingConfig {
        env_filter: cli.log.clone(),
        ..Default::default()
    });

    let captures = if cli.images.is_empty() {
        log::info!("no images given; showing built-in test patterns");
        capture::test_patterns()?
    } else {
        cli.images
            .iter()
            .map(|arg| capture::from_arg(arg))
            .collect::<Result<Vec<_>>>()?
    };
    let playlist = Playlist::new(captures).context("nothing to show")?;

    let config = ViewerConfig {
        loader: LoaderConfig {
            max_dimension: cli.max_dimension,
            ..Default::default()
        },
        ..Default::default()
    };

    let runtime = RuntimeConfig {
        title: "cuboid studio".to_string(),
        initial_size: LogicalSize::new(cli.width, cli.height),
    };

    Runtime::run(runtime, ViewerApp::new(config, !cli.no_spin, playlist))
}
