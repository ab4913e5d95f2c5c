#![deny(clippy::pedantic)]
#![allow(clippy::needless_pass_by_value)]
#![allow(clippy::inline_always)]
#![allow(clippy::module_name_repetitions)]

pub mod actors;
pub mod error;
pub mod instance;
pub mod particle_system {
    pub mod collection;
    pub mod controller;
    pub mod emitter;
    pub mod particles;
    pub mod presets;
    pub mod systems;
}
pub mod state;
pub mod stats;
pub mod systems;
pub mod time;
mod util;
pub mod vector;

use log::info;

use crate::{
    error::EmitterError,
    state::{Simulation, SimulationConfig},
};

/// The main entrypoint to the engine.
///
/// The run function takes an initializer function which has one-time mutable access to the
/// simulation after it's been set up, but before the first tick. This allows the caller to spawn
/// emitters and add [`bevy_ecs::world::World`] resources and [`bevy_ecs::schedule::Schedule`]
/// systems.
///
/// The simulation then ticks until every emitter has been reaped, or until
/// [`SimulationConfig::max_ticks`] is reached. Returns the number of ticks run.
///
/// # Errors
/// Fails if `config` is invalid.
pub fn run<F>(config: SimulationConfig, initializer: F) -> Result<u64, EmitterError>
where
    F: FnOnce(&mut Simulation),
{
    // A host application may already have installed a logger.
    let _ = env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .try_init();

    let mut simulation = Simulation::new(config)?;
    initializer(&mut simulation);

    info!(
        "Starting simulation with {} emitters at {} Hz",
        simulation.emitter_count(),
        config.tick_rate_hz
    );
    let mut ticks = 0;
    while !simulation.is_idle() && config.max_ticks.map_or(true, |max| ticks < max) {
        simulation.update();
        ticks += 1;
    }
    info!("Simulation stopped after {} ticks", ticks);
    Ok(ticks)
}
