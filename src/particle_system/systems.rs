use bevy_ecs::{
    prelude::{Commands, Entity, Query, Res, ResMut},
    schedule::{ParallelSystemDescriptorCoercion, SystemSet},
};
use log::{debug, error};

use crate::{instance::InstanceBatch, particle_system::emitter::Emitter, time::Time};

/// Advances every emitter by one tick.
///
/// An emitter whose factory fails is despawned along with its particles.
pub fn emitter_update(
    mut emitters: Query<(Entity, &mut Emitter)>,
    time: Res<Time>,
    mut commands: Commands,
) {
    for (entity, mut emitter) in emitters.iter_mut() {
        if let Err(err) = emitter.advance(time.delta_seconds()) {
            error!("Despawning emitter {:?}: {}", entity, err);
            commands.entity(entity).despawn();
        }
    }
}

pub(crate) fn emitter_cleanup(emitters: Query<(Entity, &Emitter)>, mut commands: Commands) {
    for (entity, emitter) in emitters.iter() {
        if emitter.can_reap() {
            debug!("Emitter {:?} finished after {} ticks", entity, emitter.view().ticks);
            commands.entity(entity).despawn();
        }
    }
}

pub(crate) fn emitter_draw(emitters: Query<&Emitter>, mut batch: ResMut<InstanceBatch>) {
    batch.clear();
    for emitter in emitters.iter() {
        emitter.draw(&mut batch);
    }
    batch.sort_by_shape();
}

/// Emitter ticking and reaping, for the `update` stage.
#[must_use]
pub fn system_set() -> SystemSet {
    SystemSet::new()
        .with_system(emitter_update.label("emitter_update"))
        .with_system(emitter_cleanup.after("emitter_update"))
}

/// Collects every emitter's particles into the [`InstanceBatch`] resource, for the `render` stage.
#[must_use]
pub fn render_system_set() -> SystemSet {
    SystemSet::new().with_system(emitter_draw)
}
