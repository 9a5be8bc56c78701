use std::path::PathBuf;

use clap::Parser;

#[derive(Parser, Debug, Clone)]
#[command(name = "cuboid-studio")]
#[command(about = "Shows images texture-mapped onto a rotating cuboid", long_about = None)]
pub struct Cli {
    /// Image files or `data:` URLs to cycle through (Space/N: next, P: previous, R: reload).
    /// Built-in test patterns are shown when none are given.
    pub images: Vec<PathBuf>,

    /// Initial window width in logical pixels
    #[arg(long, default_value_t = 960.0)]
    pub width: f64,

    /// Initial window height in logical pixels
    #[arg(long, default_value_t = 720.0)]
    pub height: f64,

    /// Disable the automatic spin; the cuboid still rotates by dragging
    #[arg(long = "no-spin", default_value = "false")]
    pub no_spin: bool,

    /// Largest accepted image width or height, in pixels
    #[arg(long = "max-dimension", default_value_t = 8192)]
    pub max_dimension: u32,

    /// Log filter in env_logger syntax (overrides RUST_LOG)
    #[arg(long)]
    pub log: Option<String>,
}
