//! Error types for emitters and the simulation that drives them.

use glam::Vec2;
use thiserror::Error;

/// The error a fallible particle factory may return.
pub type FactoryError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Errors raised while configuring or advancing emitters.
///
/// Configuration problems are reported when an [`crate::particle_system::emitter::Emitter`] or
/// [`crate::state::Simulation`] is built, never deferred to the first tick. A controller that
/// asks for a negative number of particles is not an error; the count is clamped to zero.
#[derive(Debug, Error)]
pub enum EmitterError {
    /// An interval controller was given a period that is not finite or too short to emit from.
    #[error("emit interval must be a finite number of seconds no shorter than the minimum period, got {0}")]
    InvalidInterval(f32),
    /// A time-bounded controller was given a lifetime that is not finite.
    #[error("emitter lifetime must be a finite number of seconds, got {0}")]
    InvalidLifetime(f32),
    /// A burst asks for more particles than one tick may emit.
    #[error("burst of {0} particles exceeds the per-tick emission limit")]
    InvalidCount(u32),
    /// The emitter origin contains a NaN or infinite component.
    #[error("emitter origin must be finite, got {0}")]
    InvalidOrigin(Vec2),
    /// The simulation tick rate is zero.
    #[error("tick rate must be at least 1 Hz, got {0}")]
    InvalidTickRate(u32),
    /// The particle factory failed while building this tick's batch.
    #[error("particle factory failed: {0}")]
    Factory(#[source] FactoryError),
}
