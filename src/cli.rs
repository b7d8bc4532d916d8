// cli.rs - Command-line interface configuration
use std::path::PathBuf;

use clap::Parser;

#[derive(Parser, Debug, Clone)]
#[command(name = "apology-scene")]
#[command(about = "Animated apology with a rose, particles and hearts", long_about = None)]
pub struct Cli {
    /// Skip the login overlay and mount the scene immediately
    #[arg(long = "no-ui", default_value = "false")]
    pub no_ui: bool,

    /// Run without a window on a recording backend
    #[arg(long, default_value = "false")]
    pub headless: bool,

    /// Frames to run in headless mode
    #[arg(long, default_value_t = 600)]
    pub frames: u64,

    /// Seed for particle and heart placement
    #[arg(long)]
    pub seed: Option<u64>,

    #[arg(long)]
    pub width: Option<u32>,

    #[arg(long)]
    pub height: Option<u32>,

    /// JSON config file
    #[arg(long)]
    pub config: Option<PathBuf>,
}
