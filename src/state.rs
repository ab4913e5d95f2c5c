use bevy_ecs::{
    entity::Entity,
    schedule::{Schedule, Stage, SystemStage},
    world::World,
};

use crate::{
    error::EmitterError,
    instance::InstanceBatch,
    particle_system::{
        collection::DrawableCollection,
        emitter::Emitter,
        systems::{render_system_set, system_set},
    },
    stats::CoreStats,
    time::Time,
};

/// Settings for a [`Simulation`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SimulationConfig {
    /// Fixed ticks per simulated second.
    pub tick_rate_hz: u32,
    /// Stop [`crate::run`] after this many ticks even if emitters are still alive.
    pub max_ticks: Option<u64>,
    /// How often [`CoreStats`] logs its averages when the `stats` feature is on.
    pub stats_interval_ticks: u64,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            tick_rate_hz: 60,
            max_ticks: None,
            stats_interval_ticks: 300,
        }
    }
}

/// An ECS world of emitters stepped at a fixed rate.
///
/// The schedule has four stages, `pre_update`, `update`, `post_update` and `render`, in that
/// order. Emitter systems live in `update` and `render`; the others are free for callers.
pub struct Simulation {
    config: SimulationConfig,
    world: World,
    schedule: Schedule,
    stats: CoreStats,
}

impl Simulation {
    /// # Errors
    /// Fails if the configured tick rate is zero.
    #[allow(clippy::cast_precision_loss)]
    pub fn new(config: SimulationConfig) -> Result<Self, EmitterError> {
        if config.tick_rate_hz == 0 {
            return Err(EmitterError::InvalidTickRate(config.tick_rate_hz));
        }

        let mut world = World::new();
        world.insert_resource(Time::fixed(1.0 / config.tick_rate_hz as f32));
        world.insert_resource(InstanceBatch::new());

        let mut schedule = Schedule::default();
        schedule.add_stage("pre_update", SystemStage::parallel());
        schedule.add_stage_after("pre_update", "update", SystemStage::parallel());
        schedule.add_stage_after("update", "post_update", SystemStage::parallel());
        schedule.add_stage_after("post_update", "render", SystemStage::parallel());
        schedule.add_system_set_to_stage("update", system_set());
        schedule.add_system_set_to_stage("render", render_system_set());

        Ok(Self {
            config,
            world,
            schedule,
            stats: CoreStats::new(config.stats_interval_ticks),
        })
    }

    /// Runs the schedule once and advances the clock by one tick.
    pub fn update(&mut self) {
        self.stats.tick_start();
        self.schedule.run(&mut self.world);
        self.world.resource_mut::<Time>().tick();
        let particles = self.particle_count();
        self.stats.tick_end(particles);
    }

    pub fn spawn_emitter(&mut self, emitter: Emitter) -> Entity {
        self.world.spawn().insert(emitter).id()
    }

    #[must_use]
    pub fn emitter_count(&mut self) -> usize {
        self.world.query::<&Emitter>().iter(&self.world).count()
    }

    /// Live particles across every emitter.
    #[must_use]
    pub fn particle_count(&mut self) -> usize {
        self.world
            .query::<&Emitter>()
            .iter(&self.world)
            .map(|emitter| emitter.particles().len())
            .sum()
    }

    /// True once every emitter has been reaped.
    #[must_use]
    pub fn is_idle(&mut self) -> bool {
        self.emitter_count() == 0
    }

    /// What the last `render` stage drew, sorted by shape.
    #[must_use]
    pub fn instances(&self) -> &InstanceBatch {
        self.world.resource::<InstanceBatch>()
    }

    #[must_use]
    pub fn time(&self) -> Time {
        *self.world.resource::<Time>()
    }

    #[inline(always)]
    #[must_use]
    pub fn config(&self) -> &SimulationConfig {
        &self.config
    }

    #[inline(always)]
    #[must_use]
    pub fn stats(&self) -> &CoreStats {
        &self.stats
    }

    #[inline(always)]
    pub fn borrow_world(&mut self) -> &mut World {
        &mut self.world
    }

    #[inline(always)]
    pub fn borrow_schedule(&mut self) -> &mut Schedule {
        &mut self.schedule
    }
}

#[cfg(test)]
mod tests {
    use bevy_ecs::system::ResMut;
    use glam::Vec2;

    use super::{Simulation, SimulationConfig};
    use crate::{
        error::EmitterError,
        particle_system::{controller::EmitterController, emitter::Emitter, particles::Particle},
    };

    struct PreUpdateRuns(u32);

    fn count_pre_update(mut runs: ResMut<PreUpdateRuns>) {
        runs.0 += 1;
    }

    fn burst(count: u32, lifetime: f32) -> Emitter {
        Emitter::new(Vec2::new(5.0, 5.0), EmitterController::burst(count), move |_| {
            Particle::timed(lifetime)
        })
        .unwrap()
    }

    #[test]
    fn test_zero_tick_rate_is_rejected() {
        let config = SimulationConfig {
            tick_rate_hz: 0,
            ..SimulationConfig::default()
        };
        assert!(matches!(
            Simulation::new(config),
            Err(EmitterError::InvalidTickRate(0))
        ));
    }

    #[test]
    fn test_burst_runs_until_idle() {
        let mut simulation = Simulation::new(SimulationConfig::default()).unwrap();
        simulation.spawn_emitter(burst(10, 0.1));
        assert_eq!(simulation.emitter_count(), 1);
        assert!(!simulation.is_idle());

        simulation.update();
        assert_eq!(simulation.particle_count(), 10);
        assert_eq!(simulation.instances().len(), 10);
        assert_eq!(simulation.time().ticks(), 1);

        for _ in 0..10 {
            simulation.update();
        }
        assert!(simulation.is_idle());
        assert_eq!(simulation.particle_count(), 0);
        assert_eq!(simulation.stats().peak_particles(), 10);
    }

    #[test]
    fn test_tick_rate_sets_delta() {
        let config = SimulationConfig {
            tick_rate_hz: 30,
            ..SimulationConfig::default()
        };
        let mut simulation = Simulation::new(config).unwrap();
        simulation.spawn_emitter(burst(1, 0.05));

        simulation.update();
        simulation.update();
        assert_eq!(simulation.particle_count(), 1);
        simulation.update();
        assert!(simulation.is_idle());
        assert!((simulation.time().total_seconds() - 0.1).abs() < 1e-6);
    }

    #[test]
    fn test_callers_can_add_systems() {
        let mut simulation = Simulation::new(SimulationConfig::default()).unwrap();
        simulation.borrow_world().insert_resource(PreUpdateRuns(0));
        simulation
            .borrow_schedule()
            .add_system_to_stage("pre_update", count_pre_update);

        simulation.update();
        simulation.update();

        assert_eq!(simulation.borrow_world().resource::<PreUpdateRuns>().0, 2);
    }
}
