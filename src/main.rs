//! Headless driver: runs the engine on scripted wandering input.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use rand::rngs::StdRng;
use rand::SeedableRng;

use blockwalker::assets::AssetCatalog;
use blockwalker::config::GameConfig;
use blockwalker::engine::GameEngine;
use blockwalker::input::WanderScript;
use blockwalker::render::NullCanvas;

#[derive(Debug, Parser)]
#[command(version, about = "Run the block world simulation headlessly")]
struct Cli {
    /// TOML config file
    #[arg(long)]
    config: Option<PathBuf>,

    /// World seed, overriding the config
    #[arg(long)]
    seed: Option<u64>,

    /// Frames to simulate
    #[arg(long, default_value_t = 600)]
    frames: u64,

    /// Save file to start from
    #[arg(long)]
    load: Option<PathBuf>,

    /// Write a save when the run ends
    #[arg(long)]
    save: bool,

    /// Serve puffin profiling data while running
    #[arg(long)]
    profile: bool,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    let mut config = match &cli.config {
        Some(path) => GameConfig::load_or_default(path),
        None => GameConfig::default(),
    };

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&config.log_filter)),
        )
        .init();

    if cli.seed.is_some() {
        config.seed = cli.seed;
    }

    let _profiler = if cli.profile {
        let addr = format!("127.0.0.1:{}", puffin_http::DEFAULT_PORT);
        let server = puffin_http::Server::new(&addr).context("starting puffin server")?;
        puffin::set_scopes_on(true);
        tracing::info!("Serving profile data on {}", addr);
        Some(server)
    } else {
        None
    };

    let assets = AssetCatalog::load(&config.asset_dir);
    if assets.placeholder_count() > 0 {
        tracing::info!("{} sprite sheets replaced by placeholders", assets.placeholder_count());
    }

    let mut engine = GameEngine::with_assets(config, assets);
    if let Some(path) = &cli.load {
        anyhow::ensure!(engine.load(path), "could not load {}", path.display());
    }

    let mut script_rng = StdRng::seed_from_u64(engine.state.seed);
    let mut script = WanderScript::new();
    let mut canvas = NullCanvas::default();
    let mut transitions = 0;
    let mut deaths = 0;
    let mut frames_run = 0;

    for _ in 0..cli.frames {
        puffin::GlobalProfiler::lock().new_frame();
        for event in script.next_events(&mut script_rng) {
            engine.handle_input(event);
        }
        let result = engine.tick();
        engine.render(&mut canvas);
        frames_run += 1;
        transitions += result.report.transition.is_some() as u32;
        deaths += result.report.player_died as u32;
        if result.quit {
            break;
        }
    }

    if cli.save {
        let path = engine.save().context("saving at exit")?;
        tracing::info!("Wrote {}", path.display());
    }

    let player = &engine.state.player;
    tracing::info!(
        "Ran {} frames ({} ms game time): block ({}, {}), {} blocks known, {} transitions, {} deaths, level {} with {} xp, {} draw calls",
        frames_run,
        engine.now_ms(),
        engine.state.world.current_block_coords.0,
        engine.state.world.current_block_coords.1,
        engine.state.world.blocks.len(),
        transitions,
        deaths,
        player.attributes.level,
        player.attributes.xp,
        canvas.calls
    );
    Ok(())
}
