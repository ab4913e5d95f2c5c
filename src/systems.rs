use crate::{
    error::EmitterError,
    instance::{Instance2D, InstanceBatch},
};

/// Something that advances by one simulation tick.
pub trait Updateable {
    fn update(&mut self, delta_seconds: f32);
}

/// Something that can tell its owner it is finished.
///
/// Implementations must be monotone: once `can_reap` returns true it keeps returning true.
pub trait Reapable {
    fn can_reap(&self) -> bool;
}

/// Something that renders as a single shape instance.
pub trait Renderable {
    fn get_instance(&self) -> Instance2D;
}

/// The capability an [`crate::actors::ActorList`] needs from its members.
///
/// Containers implement this directly rather than being wrapped, so a particle collection, an
/// emitter and a nested actor list can all live side by side.
pub trait Actor: Send + Sync {
    /// Advances the actor by one tick.
    ///
    /// # Errors
    /// Emitters propagate particle factory failures; other actors never fail.
    fn update(&mut self, delta_seconds: f32) -> Result<(), EmitterError>;

    fn draw(&self, batch: &mut InstanceBatch);

    fn can_reap(&self) -> bool;

    /// Marks the actor as finished so it is reaped at the next opportunity.
    fn kill(&mut self);
}
