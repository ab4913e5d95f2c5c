use bevy_ecs::component::{Component, TableStorage};
use glam::Vec2;
use log::trace;

use crate::{
    error::{EmitterError, FactoryError},
    instance::InstanceBatch,
    particle_system::{
        collection::{DrawableCollection, ParticleList},
        controller::EmitterController,
        particles::Particle,
    },
    systems::Actor,
    time::FIXED_TICK_SECONDS,
};

/// What a particle factory may know about the emitter calling it.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EmitterView {
    /// The emitter's position. Factory output is already translated by this.
    pub origin: Vec2,
    /// Particles alive before this tick's batch.
    pub live_particles: usize,
    /// Ticks the emitter has completed.
    pub ticks: u64,
}

type ParticleFactory =
    Box<dyn FnMut(&EmitterView) -> Result<Particle, FactoryError> + Send + Sync>;

/// Spawns particles according to an [`EmitterController`], ages them, and reaps them.
///
/// Factories build particles in local coordinates around `(0, 0)`; the emitter moves each new
/// particle by its origin before adding it. Once added, a particle no longer follows the emitter.
pub struct Emitter<C = ParticleList> {
    origin: Vec2,
    controller: EmitterController,
    factory: ParticleFactory,
    particles: C,
    ticks: u64,
    killed: bool,
}

impl Emitter {
    /// Creates an emitter backed by a plain [`ParticleList`].
    ///
    /// # Errors
    /// Fails if the controller is misconfigured or the origin is not finite.
    pub fn new<F>(
        origin: Vec2,
        controller: EmitterController,
        mut factory: F,
    ) -> Result<Self, EmitterError>
    where
        F: FnMut(&EmitterView) -> Particle + Send + Sync + 'static,
    {
        Self::with_collection(
            origin,
            controller,
            move |view: &EmitterView| Ok(factory(view)),
            ParticleList::new(),
        )
    }

    /// Creates an emitter whose factory may fail.
    ///
    /// A factory error aborts the tick it happens on and is returned from [`Emitter::update`].
    ///
    /// # Errors
    /// Fails if the controller is misconfigured or the origin is not finite.
    pub fn try_new<F>(
        origin: Vec2,
        controller: EmitterController,
        factory: F,
    ) -> Result<Self, EmitterError>
    where
        F: FnMut(&EmitterView) -> Result<Particle, FactoryError> + Send + Sync + 'static,
    {
        Self::with_collection(origin, controller, factory, ParticleList::new())
    }
}

impl<C> Emitter<C>
where
    C: DrawableCollection<Particle>,
{
    /// Creates an emitter that keeps its particles in `particles`.
    ///
    /// # Errors
    /// Fails if the controller is misconfigured or the origin is not finite.
    pub fn with_collection<F>(
        origin: Vec2,
        controller: EmitterController,
        factory: F,
        particles: C,
    ) -> Result<Self, EmitterError>
    where
        F: FnMut(&EmitterView) -> Result<Particle, FactoryError> + Send + Sync + 'static,
    {
        if !origin.is_finite() {
            return Err(EmitterError::InvalidOrigin(origin));
        }
        controller.validate()?;

        Ok(Self {
            origin,
            controller,
            factory: Box::new(factory),
            particles,
            ticks: 0,
            killed: false,
        })
    }

    #[inline(always)]
    #[must_use]
    pub fn origin(&self) -> Vec2 {
        self.origin
    }

    /// Moves the emitter. Particles that already exist stay where they are.
    pub fn set_origin(&mut self, origin: Vec2) {
        self.origin = origin;
    }

    #[must_use]
    pub fn controller(&self) -> &EmitterController {
        &self.controller
    }

    #[must_use]
    pub fn particles(&self) -> &C {
        &self.particles
    }

    #[must_use]
    pub fn particle_count(&self) -> usize {
        self.particles.len()
    }

    #[must_use]
    pub fn view(&self) -> EmitterView {
        EmitterView {
            origin: self.origin,
            live_particles: self.particles.len(),
            ticks: self.ticks,
        }
    }

    /// Advances by one nominal tick of [`FIXED_TICK_SECONDS`].
    ///
    /// # Errors
    /// Returns the first error the particle factory raises.
    pub fn update(&mut self) -> Result<(), EmitterError> {
        self.advance(FIXED_TICK_SECONDS)
    }

    /// Runs one tick lasting `delta_seconds`.
    ///
    /// The controller decides how many particles to create, the whole batch is built, the
    /// particles already alive are aged, the batch is appended, and everything now reapable is
    /// removed. Freshly emitted particles start aging on the following tick.
    ///
    /// # Errors
    /// Returns the first error the particle factory raises. Nothing from the failed batch is
    /// added, and the controller's emission for this tick is not refunded.
    pub fn advance(&mut self, delta_seconds: f32) -> Result<(), EmitterError> {
        let count = if self.killed {
            0
        } else {
            self.controller.how_many(delta_seconds)
        };
        let batch = self.emit_batch(count)?;

        self.particles.update(delta_seconds);
        self.particles.append_batch(batch);

        let reap = self.particles.reapable();
        if !reap.is_empty() {
            trace!("Reaping {} of {} particles", reap.len(), self.particles.len());
            self.particles.remove_batch(&reap);
        }

        self.ticks += 1;
        Ok(())
    }

    fn emit_batch(&mut self, count: usize) -> Result<Vec<Particle>, EmitterError> {
        let view = self.view();
        let origin = self.origin;
        let factory = &mut self.factory;
        (0..count)
            .map(|_| {
                let mut particle = factory(&view).map_err(EmitterError::Factory)?;
                particle.position += origin;
                Ok(particle)
            })
            .collect()
    }

    /// Draws every live particle into `batch`. Does not change the emitter.
    pub fn draw(&self, batch: &mut InstanceBatch) {
        self.particles.draw(batch);
    }

    /// True once the controller is complete and no particles remain.
    #[must_use]
    pub fn can_reap(&self) -> bool {
        (self.killed || self.controller.is_complete()) && self.particles.is_empty()
    }

    /// Drops every particle and stops emitting, so the emitter can be reaped immediately.
    pub fn kill(&mut self) {
        self.killed = true;
        self.particles.clear();
    }
}

impl<C> Component for Emitter<C>
where
    C: DrawableCollection<Particle> + 'static,
{
    type Storage = TableStorage;
}

impl<C> Actor for Emitter<C>
where
    C: DrawableCollection<Particle>,
{
    fn update(&mut self, delta_seconds: f32) -> Result<(), EmitterError> {
        self.advance(delta_seconds)
    }

    fn draw(&self, batch: &mut InstanceBatch) {
        Emitter::draw(self, batch);
    }

    fn can_reap(&self) -> bool {
        Emitter::can_reap(self)
    }

    fn kill(&mut self) {
        Emitter::kill(self);
    }
}

impl<C> std::fmt::Debug for Emitter<C>
where
    C: DrawableCollection<Particle>,
{
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Emitter")
            .field("origin", &self.origin)
            .field("controller", &self.controller)
            .field("particles", &self.particles.len())
            .field("ticks", &self.ticks)
            .field("killed", &self.killed)
            .finish_non_exhaustive()
    }
}
