use log::trace;

use crate::{error::EmitterError, instance::InstanceBatch, systems::Actor};

/// Owns a heterogeneous set of actors and retires them once they can be reaped.
///
/// This is the non-ECS way to drive emitters: push them in, call [`ActorList::update`] once per
/// tick and [`ActorList::draw`] once per frame.
#[derive(Default)]
pub struct ActorList {
    actors: Vec<Box<dyn Actor>>,
}

impl ActorList {
    #[must_use]
    pub fn new() -> Self {
        Self {
            actors: Vec::with_capacity(64),
        }
    }

    pub fn push<A>(&mut self, actor: A)
    where
        A: Actor + 'static,
    {
        self.actors.push(Box::new(actor));
    }

    /// Updates every actor, then removes every actor that can be reaped in a single pass.
    ///
    /// # Errors
    /// Returns the first actor error. Actors after the failing one are not updated this tick
    /// and nothing is reaped.
    pub fn update(&mut self, delta_seconds: f32) -> Result<(), EmitterError> {
        for actor in &mut self.actors {
            actor.update(delta_seconds)?;
        }

        let before = self.actors.len();
        self.actors.retain(|actor| !actor.can_reap());
        if self.actors.len() != before {
            trace!("Reaped {} actors", before - self.actors.len());
        }
        Ok(())
    }

    pub fn draw(&self, batch: &mut InstanceBatch) {
        for actor in &self.actors {
            actor.draw(batch);
        }
    }

    /// True when every actor can be reaped, including when there are none.
    #[must_use]
    pub fn can_reap(&self) -> bool {
        self.actors.iter().all(|actor| actor.can_reap())
    }

    /// Kills every actor and drops them all.
    pub fn kill(&mut self) {
        for actor in &mut self.actors {
            actor.kill();
        }
        self.actors.clear();
    }

    #[inline(always)]
    #[must_use]
    pub fn len(&self) -> usize {
        self.actors.len()
    }

    #[inline(always)]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.actors.is_empty()
    }
}

impl Actor for ActorList {
    fn update(&mut self, delta_seconds: f32) -> Result<(), EmitterError> {
        ActorList::update(self, delta_seconds)
    }

    fn draw(&self, batch: &mut InstanceBatch) {
        ActorList::draw(self, batch);
    }

    fn can_reap(&self) -> bool {
        ActorList::can_reap(self)
    }

    fn kill(&mut self) {
        ActorList::kill(self);
    }
}

#[cfg(test)]
mod tests {
    use glam::Vec2;

    use super::ActorList;
    use crate::{
        error::{EmitterError, FactoryError},
        instance::InstanceBatch,
        particle_system::{
            collection::{DrawableCollection, ParticleList},
            controller::EmitterController,
            emitter::Emitter,
            particles::Particle,
        },
        time::FIXED_TICK_SECONDS,
    };

    #[test]
    fn test_mixed_actors_update_draw_and_reap() {
        let mut actors = ActorList::new();
        actors.push(Particle::timed(0.05).with_position(Vec2::new(1.0, 1.0)));
        let mut list: ParticleList = ParticleList::new();
        list.append(Particle::eternal());
        actors.push(list);
        actors.push(
            Emitter::new(Vec2::ZERO, EmitterController::burst(2), |_| {
                Particle::timed(0.05)
            })
            .unwrap(),
        );

        actors.update(FIXED_TICK_SECONDS).unwrap();
        assert_eq!(actors.len(), 3);

        let mut batch = InstanceBatch::new();
        actors.draw(&mut batch);
        assert_eq!(batch.len(), 4);

        for _ in 0..10 {
            actors.update(FIXED_TICK_SECONDS).unwrap();
        }
        // Only the list holding an eternal particle is left.
        assert_eq!(actors.len(), 1);
        assert!(!actors.can_reap());
    }

    #[test]
    fn test_kill_empties_list() {
        let mut actors = ActorList::new();
        actors.push(Particle::eternal());
        actors.push(
            Emitter::new(Vec2::ZERO, EmitterController::interval(0.01), |_| {
                Particle::eternal()
            })
            .unwrap(),
        );
        actors.update(FIXED_TICK_SECONDS).unwrap();

        actors.kill();

        assert!(actors.is_empty());
        assert!(actors.can_reap());
    }

    #[test]
    fn test_nested_lists() {
        let mut inner = ActorList::new();
        inner.push(Particle::timed(0.02));
        let mut outer = ActorList::new();
        outer.push(inner);

        outer.update(FIXED_TICK_SECONDS).unwrap();
        assert_eq!(outer.len(), 1);

        outer.update(FIXED_TICK_SECONDS).unwrap();
        outer.update(FIXED_TICK_SECONDS).unwrap();
        assert!(outer.is_empty());
    }

    #[test]
    fn test_factory_error_propagates() {
        let mut actors = ActorList::new();
        actors.push(
            Emitter::try_new(Vec2::ZERO, EmitterController::burst(1), |_| {
                Err::<Particle, FactoryError>("broken".into())
            })
            .unwrap(),
        );

        assert!(matches!(
            actors.update(FIXED_TICK_SECONDS),
            Err(EmitterError::Factory(_))
        ));
        assert_eq!(actors.len(), 1);
    }
}
