//! Headless runner: load a configuration, advance the model and log how the
//! populations evolve.

mod telemetry;

use anyhow::{Context, Result};
use symbiosis_core::SimulationConfig;
use symbiosis_world::{PopulationRecorder, Simulation};
use tracing::info;

fn main() -> Result<()> {
    telemetry::init_telemetry()?;

    // Load configuration
    let config = match std::env::args().nth(1) {
        Some(path) => SimulationConfig::from_json_file(&path)
            .with_context(|| format!("failed to load configuration from {path}"))?,
        None => {
            info!("No configuration file given, using defaults");
            SimulationConfig::default()
        }
    };

    info!(
        seed = config.seed,
        num_ticks = config.num_ticks,
        width = config.world.width,
        height = config.world.height,
        "Starting Symbiosis runner"
    );

    let num_ticks = config.num_ticks;
    let mut simulation = Simulation::new(config)?;
    let mut recorder = PopulationRecorder::new();
    simulation.run(num_ticks, &mut recorder);

    if let Some(last) = recorder.latest() {
        info!(
            tick = last.tick,
            ants = last.ants,
            snakes = last.snakes,
            frogs = last.frogs,
            spiders = last.spiders,
            eggs = last.eggs,
            frog_mean_trait = last.frog_mean_trait,
            spider_mean_trait = last.spider_mean_trait,
            "Final populations"
        );
        println!("{}", serde_json::to_string(last)?);
    }

    Ok(())
}
