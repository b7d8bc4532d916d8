use anyhow::{Context, Result};
use clap::Parser;
use log::info;
use winit::event_loop::EventLoop;

use apology_scene::app::App;
use apology_scene::cli::Cli;
use apology_scene::config::AppConfig;
use apology_scene::core::SurfaceSize;
use apology_scene::headless::{run_headless, HeadlessConfig};
use apology_scene::shell::{ShellUi, Transport};

fn main() -> Result<()> {
    env_logger::init();

    let cli = Cli::parse();
    let config = AppConfig::resolve(&cli)?;

    if cli.headless {
        let report = run_headless(HeadlessConfig {
            size: SurfaceSize::new(config.window.width, config.window.height),
            frames: cli.frames,
            seed: config.seed,
        })?;
        info!(
            "{} buds, {} stems, petals {:?}, {} particles, {} hearts",
            report.counts.buds,
            report.counts.stems,
            report.counts.petals_per_layer,
            report.counts.particles,
            report.counts.hearts
        );
        println!(
            "Rendered {} frames, {} resources left after unmount",
            report.renders, report.live_after_unmount
        );
        return Ok(());
    }

    let transport = Transport::new(config.playlist.clone()).context("Playlist is empty")?;
    let shell = ShellUi::new(config.credentials.clone(), transport);
    let mut app = App::new(config, shell, cli.no_ui);

    let event_loop = EventLoop::new()?;
    event_loop.run_app(&mut app)?;
    Ok(())
}
