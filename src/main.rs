use glam::Vec2;
use libsparks::{
    particle_system::presets::gallery,
    state::{Simulation, SimulationConfig},
};
use log::{error, info};

const TIMEOUT_TICKS: u64 = 5 * 60;

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let effects = match gallery(Vec2::new(400.0, 300.0)) {
        Ok(effects) => effects,
        Err(err) => {
            error!("Error building gallery: {}", err);
            return;
        }
    };

    for (label, emitter) in effects {
        let mut simulation = match Simulation::new(SimulationConfig::default()) {
            Ok(simulation) => simulation,
            Err(err) => {
                error!("Error creating simulation: {}", err);
                return;
            }
        };
        simulation.spawn_emitter(emitter);

        let mut ticks = 0;
        while !simulation.is_idle() && ticks < TIMEOUT_TICKS {
            simulation.update();
            ticks += 1;
        }

        let peak = simulation.stats().peak_particles();
        if simulation.is_idle() {
            info!("{}: finished in {} ticks, peak {} particles", label, ticks, peak);
        } else {
            info!(
                "{}: still running after {} ticks, peak {} particles",
                label, ticks, peak
            );
        }
    }
}
