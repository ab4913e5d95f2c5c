use glam::{Vec2, Vec3};

use crate::{
    error::EmitterError,
    instance::{Instance2D, InstanceBatch},
    systems::{Actor, Reapable, Renderable, Updateable},
    time::FIXED_TICK_SECONDS,
};

/// How a particle ages.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ParticleKind {
    /// Never expires on its own.
    Eternal,
    /// Expires once `remaining` seconds have run out.
    Timed { remaining: f32 },
    /// Expires like [`ParticleKind::Timed`] while fading from fully opaque to invisible.
    Fading { remaining: f32, original: f32 },
}

/// A single short-lived visual entity.
///
/// `velocity` and `angular_velocity` are applied once per update, whatever the tick length.
/// Particles do not know which emitter created them.
#[derive(Debug, Clone, PartialEq)]
pub struct Particle {
    pub position: Vec2,
    pub velocity: Vec2,
    /// Rotation in radians.
    pub angle: f32,
    pub angular_velocity: f32,
    pub scale: f32,
    pub tint: Vec3,
    /// The shape or texture handle handed through to the renderer.
    pub shape: u32,
    alpha: u8,
    kind: ParticleKind,
    killed: bool,
}

impl Particle {
    fn with_kind(kind: ParticleKind) -> Self {
        Self {
            position: Vec2::ZERO,
            velocity: Vec2::ZERO,
            angle: 0.0,
            angular_velocity: 0.0,
            scale: 1.0,
            tint: Vec3::ONE,
            shape: 0,
            alpha: u8::MAX,
            kind,
            killed: false,
        }
    }

    /// A particle that lives until its owner removes it.
    #[must_use]
    pub fn eternal() -> Self {
        Self::with_kind(ParticleKind::Eternal)
    }

    /// A particle reaped once `lifetime` seconds have elapsed.
    #[must_use]
    pub fn timed(lifetime: f32) -> Self {
        Self::with_kind(ParticleKind::Timed {
            remaining: lifetime,
        })
    }

    /// A timed particle whose opacity falls linearly from 255 to 0 over `lifetime` seconds.
    ///
    /// The opacity is recomputed on every update, so [`Particle::with_alpha`] only affects the
    /// frame the particle is created on.
    #[must_use]
    pub fn fading(lifetime: f32) -> Self {
        Self::with_kind(ParticleKind::Fading {
            remaining: lifetime,
            original: lifetime,
        })
    }

    #[must_use]
    pub fn with_position(mut self, position: Vec2) -> Self {
        self.position = position;
        self
    }

    #[must_use]
    pub fn with_velocity(mut self, velocity: Vec2) -> Self {
        self.velocity = velocity;
        self
    }

    #[must_use]
    pub fn with_angle(mut self, angle: f32, angular_velocity: f32) -> Self {
        self.angle = angle;
        self.angular_velocity = angular_velocity;
        self
    }

    #[must_use]
    pub fn with_scale(mut self, scale: f32) -> Self {
        self.scale = scale;
        self
    }

    #[must_use]
    pub fn with_tint(mut self, tint: Vec3) -> Self {
        self.tint = tint;
        self
    }

    #[must_use]
    pub fn with_shape(mut self, shape: u32) -> Self {
        self.shape = shape;
        self
    }

    #[must_use]
    pub fn with_alpha(mut self, alpha: u8) -> Self {
        self.alpha = alpha;
        self
    }

    #[inline(always)]
    #[must_use]
    pub fn alpha(&self) -> u8 {
        self.alpha
    }

    #[inline(always)]
    #[must_use]
    pub fn kind(&self) -> ParticleKind {
        self.kind
    }

    /// Seconds left before the particle can be reaped, or `None` for eternal particles.
    #[must_use]
    pub fn remaining(&self) -> Option<f32> {
        match self.kind {
            ParticleKind::Eternal => None,
            ParticleKind::Timed { remaining } | ParticleKind::Fading { remaining, .. } => {
                Some(remaining)
            }
        }
    }

    /// Advances by one nominal tick of [`FIXED_TICK_SECONDS`].
    pub fn update(&mut self) {
        self.advance(FIXED_TICK_SECONDS);
    }

    /// Moves the particle one step and ages it by `delta_seconds`.
    pub fn advance(&mut self, delta_seconds: f32) {
        self.position += self.velocity;
        self.angle += self.angular_velocity;

        let elapsed = delta_seconds.max(0.0);
        match &mut self.kind {
            ParticleKind::Eternal => {}
            ParticleKind::Timed { remaining } => *remaining -= elapsed,
            ParticleKind::Fading {
                remaining,
                original,
            } => {
                *remaining -= elapsed;
                self.alpha = fade_alpha(*remaining, *original);
            }
        }
    }

    /// Makes the particle reapable immediately.
    pub fn kill(&mut self) {
        self.killed = true;
    }

    #[must_use]
    pub fn can_reap(&self) -> bool {
        if self.killed {
            return true;
        }
        match self.kind {
            ParticleKind::Eternal => false,
            ParticleKind::Timed { remaining } | ParticleKind::Fading { remaining, .. } => {
                remaining < 0.0
            }
        }
    }
}

#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn fade_alpha(remaining: f32, original: f32) -> u8 {
    if original <= 0.0 || original.is_nan() {
        return 0;
    }
    (255.0 * (remaining / original).clamp(0.0, 1.0)) as u8
}

impl Updateable for Particle {
    fn update(&mut self, delta_seconds: f32) {
        self.advance(delta_seconds);
    }
}

impl Reapable for Particle {
    fn can_reap(&self) -> bool {
        Particle::can_reap(self)
    }
}

impl Renderable for Particle {
    fn get_instance(&self) -> Instance2D {
        Instance2D {
            position: self.position,
            rotation: self.angle,
            scale: Vec2::splat(self.scale),
            color: self.tint.extend(f32::from(self.alpha) / 255.0),
            shape: self.shape,
        }
    }
}

impl Actor for Particle {
    fn update(&mut self, delta_seconds: f32) -> Result<(), EmitterError> {
        self.advance(delta_seconds);
        Ok(())
    }

    fn draw(&self, batch: &mut InstanceBatch) {
        batch.push(self.get_instance());
    }

    fn can_reap(&self) -> bool {
        Particle::can_reap(self)
    }

    fn kill(&mut self) {
        Particle::kill(self);
    }
}

#[cfg(test)]
mod tests {
    use glam::Vec2;
    use proptest::prelude::*;

    use super::{Particle, ParticleKind};
    use crate::systems::Renderable;

    #[test]
    fn test_motion_is_per_tick() {
        let mut particle = Particle::eternal()
            .with_position(Vec2::new(10.0, 10.0))
            .with_velocity(Vec2::new(1.0, -2.0))
            .with_angle(0.5, 0.25);

        particle.update();
        particle.advance(5.0);

        assert_eq!(particle.position, Vec2::new(12.0, 6.0));
        assert!((particle.angle - 1.0).abs() < f32::EPSILON);
    }

    #[test]
    fn test_eternal_never_reaps() {
        let mut particle = Particle::eternal();
        for _ in 0..10_000 {
            particle.update();
            assert!(!particle.can_reap());
        }
        assert_eq!(particle.remaining(), None);
        assert_eq!(particle.alpha(), 255);
    }

    #[test]
    fn test_timed_boundary_is_strictly_negative() {
        let mut particle = Particle::timed(0.5);
        particle.advance(0.25);
        particle.advance(0.25);
        assert_eq!(particle.remaining(), Some(0.0));
        assert!(!particle.can_reap());

        particle.advance(0.25);
        assert!(particle.can_reap());
    }

    #[test]
    fn test_timed_reaps_after_lifetime_in_fixed_ticks() {
        let mut particle = Particle::timed(0.5);
        for _ in 0..29 {
            particle.update();
            assert!(!particle.can_reap());
        }
        // Thirty f32 steps of 1/60 overshoot 0.5 slightly, so this lifetime reaps on the dot.
        particle.update();
        assert!(particle.can_reap());

        // No resurrection.
        for _ in 0..100 {
            particle.update();
            assert!(particle.can_reap());
        }
    }

    #[test]
    fn test_fading_reaches_zero_at_expiry() {
        let mut particle = Particle::fading(1.0);
        assert_eq!(particle.alpha(), 255);

        particle.advance(0.5);
        assert_eq!(particle.alpha(), 127);

        particle.advance(0.5);
        assert_eq!(particle.alpha(), 0);
        assert!(!particle.can_reap());

        particle.advance(0.5);
        assert_eq!(particle.alpha(), 0);
        assert!(particle.can_reap());
        assert!(matches!(
            particle.kind(),
            ParticleKind::Fading { original, .. } if (original - 1.0).abs() < f32::EPSILON
        ));
    }

    #[test]
    fn test_zero_lifetime_fading_is_invisible_and_reaps() {
        let mut particle = Particle::fading(0.0);
        particle.update();
        assert_eq!(particle.alpha(), 0);
        assert!(particle.can_reap());
    }

    #[test]
    fn test_kill_is_permanent() {
        let mut particle = Particle::eternal();
        particle.kill();
        assert!(particle.can_reap());
        particle.update();
        assert!(particle.can_reap());
    }

    #[test]
    fn test_instance_carries_opacity() {
        let particle = Particle::timed(1.0)
            .with_alpha(51)
            .with_scale(0.3)
            .with_shape(4)
            .with_position(Vec2::new(1.0, 2.0));
        let instance = particle.get_instance();

        assert_eq!(instance.position, Vec2::new(1.0, 2.0));
        assert_eq!(instance.scale, Vec2::splat(0.3));
        assert_eq!(instance.shape, 4);
        assert!((instance.color.w - 0.2).abs() < 1e-6);
    }

    proptest! {
        #[test]
        fn fading_opacity_never_increases(
            lifetime in 0.05f32..5.0,
            steps in proptest::collection::vec(0.0f32..0.1, 1..300)
        ) {
            let mut particle = Particle::fading(lifetime);
            let mut previous = particle.alpha();
            prop_assert_eq!(previous, 255);
            let mut reaped = false;
            for dt in steps {
                particle.advance(dt);
                prop_assert!(particle.alpha() <= previous);
                previous = particle.alpha();
                if reaped {
                    prop_assert!(particle.can_reap());
                }
                reaped = particle.can_reap();
            }
        }
    }
}
