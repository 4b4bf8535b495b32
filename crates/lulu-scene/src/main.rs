//! Headless runner for Legend of Lulu.
//!
//! Loads a scene, feeds it scripted input for a number of ticks and prints
//! the final state of the live scene as JSON.
//!
//! ```text
//! lulu [SCENE] [--inputs FILE] [--ticks N] [--config FILE]
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![deny(clippy::unwrap_used)]

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use lulu_core::ActorView;
use lulu_scene::{GameConfig, InputScript, SceneLoader, Stage, CONFIG_FILE};
use serde::Serialize;
use tracing::{debug, info};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// Runs a Legend of Lulu scene headlessly and prints the final state as JSON.
#[derive(Parser, Debug)]
#[command(name = "lulu", version, about, long_about = None)]
struct Args {
    /// Scene file to start in (default: the config's start scene)
    scene: Option<String>,

    /// Input script with one line of held keys per tick
    #[arg(long, value_name = "FILE")]
    inputs: Option<PathBuf>,

    /// Number of ticks to run (default: script length, capped by max_ticks)
    #[arg(long, value_name = "N")]
    ticks: Option<u64>,

    /// Game configuration file
    #[arg(long, value_name = "FILE", default_value = CONFIG_FILE)]
    config: PathBuf,
}

/// Final state printed on exit.
#[derive(Debug, Serialize)]
struct Summary {
    scene: String,
    ticks: u64,
    hits: usize,
    despawned: usize,
    actors: Vec<ActorView>,
}

/// Main entry point.
fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(EnvFilter::from_default_env().add_directive("lulu=info".parse()?))
        .init();

    info!("Legend of Lulu {}", env!("CARGO_PKG_VERSION"));

    let args = Args::parse();
    let config = GameConfig::load_from(&args.config);

    let start = match &args.scene {
        Some(scene) => std::env::current_dir()?.join(scene).to_string_lossy().into_owned(),
        None => config.simulation.start_scene.clone(),
    };

    let script = match &args.inputs {
        Some(path) => InputScript::from_file(path)
            .with_context(|| format!("reading {}", path.display()))?,
        None => InputScript::default(),
    };

    let ticks = args
        .ticks
        .or_else(|| (!script.is_empty()).then_some(script.len() as u64))
        .unwrap_or(config.simulation.max_ticks)
        .min(config.simulation.max_ticks);

    let loader = SceneLoader::from_config(&config);
    let mut stage = Stage::new(loader, &start)
        .with_context(|| format!("loading scene {start}"))?
        .with_tick_rate(config.window.target_fps);

    let mut hits = 0;
    let mut despawned = 0;
    for tick in 0..ticks {
        let keys = usize::try_from(tick).map_or(&[][..], |i| script.keys_at(i));
        let outcome = stage.tick(keys)?;

        hits += outcome.report.damage.len();
        despawned += outcome.report.despawned.len();
        debug!(
            "tick {}: {} moved, {} contacts, {} hits",
            outcome.report.tick,
            outcome.report.moved,
            outcome.report.collisions,
            outcome.report.damage.len()
        );
        if let Some(transition) = &outcome.transition {
            info!("Entered {} from {}", transition.to, transition.from);
        }
        if let Some(name) = &outcome.dialogue_started {
            info!("Dialogue with {name}");
        }
        if config.debug.log_collisions {
            for (id, list) in stage.arena().collisions() {
                if !list.is_empty() {
                    debug!("{id}: {list:?}");
                }
            }
        }
    }

    let summary = Summary {
        scene: stage.scene().path.clone(),
        ticks,
        hits,
        despawned,
        actors: stage.arena().snapshot(),
    };
    println!("{}", serde_json::to_string_pretty(&summary)?);

    info!("Finished after {} ticks", ticks);
    Ok(())
}
