//! Ready-made emitters for common effects.

use glam::{Vec2, Vec3};
use rand::{thread_rng, Rng};

use crate::{
    error::EmitterError,
    particle_system::{
        controller::{EmissionPolicy, EmitterController},
        emitter::Emitter,
        particles::Particle,
    },
    vector::{
        lerp, rand_angle_360_deg, rand_angle_spread_deg, rand_in_circle, rand_in_rect,
        rand_on_circle, rand_on_line, rand_vec_magnitude, rand_vec_spread_deg, Lerp,
    },
};

/// A one-shot explosion of `count` fading particles.
///
/// Each particle gets a velocity drawn from a disc of radius `speed`, so some drift slowly and a
/// few race out to the edge.
///
/// # Errors
/// Fails if `origin` is not finite.
pub fn make_burst_emitter(
    origin: Vec2,
    shape: u32,
    count: u32,
    speed: f32,
    lifetime: f32,
    scale: f32,
) -> Result<Emitter, EmitterError> {
    Emitter::new(origin, EmitterController::burst(count), move |_| {
        let mut rng = thread_rng();
        Particle::fading(lifetime)
            .with_velocity(rand_in_circle(&mut rng, Vec2::ZERO, speed))
            .with_scale(scale)
            .with_shape(shape)
    })
}

/// A steady stream of fading particles for `duration` seconds, one every `interval` seconds.
///
/// Every particle moves at exactly `speed` in a random direction, so the stream forms an
/// expanding ring.
///
/// # Errors
/// Fails if `interval` is not a positive number of seconds, `duration` is not finite, or
/// `origin` is not finite.
pub fn make_interval_emitter(
    origin: Vec2,
    shape: u32,
    interval: f32,
    duration: f32,
    speed: f32,
    lifetime: f32,
    scale: f32,
) -> Result<Emitter, EmitterError> {
    Emitter::new(
        origin,
        EmitterController::interval_with_time(interval, duration),
        move |_| {
            let mut rng = thread_rng();
            Particle::fading(lifetime)
                .with_velocity(rand_on_circle(&mut rng, Vec2::ZERO, speed))
                .with_scale(scale)
                .with_shape(shape)
        },
    )
}

/// Emits `count` particles every `every_ticks` ticks, `pulses` times.
#[derive(Debug, Clone)]
pub struct Pulse {
    count: u32,
    every_ticks: u32,
    pulses_left: u32,
    ticks: u32,
}

impl Pulse {
    /// An `every_ticks` of zero is treated as one.
    #[must_use]
    pub fn new(count: u32, every_ticks: u32, pulses: u32) -> Self {
        Self {
            count,
            every_ticks: every_ticks.max(1),
            pulses_left: pulses,
            ticks: 0,
        }
    }
}

impl EmissionPolicy for Pulse {
    fn how_many(&mut self, _delta_seconds: f32) -> i64 {
        if self.pulses_left == 0 {
            return 0;
        }
        let fire = self.ticks % self.every_ticks == 0;
        self.ticks += 1;
        if fire {
            self.pulses_left -= 1;
            i64::from(self.count)
        } else {
            0
        }
    }

    fn is_complete(&self) -> bool {
        self.pulses_left == 0
    }
}

/// One emitter per effect, all centered on `center`, labelled for display.
///
/// Between them they use every controller, every particle lifetime model and every sampling
/// helper in [`crate::vector`]. `snow` and `constellation` never finish on their own.
///
/// # Errors
/// Fails if `center` is not finite.
pub fn gallery(center: Vec2) -> Result<Vec<(&'static str, Emitter)>, EmitterError> {
    Ok(vec![
        ("burst", make_burst_emitter(center, 0, 64, 4.0, 0.75, 6.0)?),
        (
            "ring",
            make_interval_emitter(center, 0, 0.02, 1.5, 3.0, 0.6, 4.0)?,
        ),
        ("fountain", fountain(center)?),
        ("snow", snow(center)?),
        ("line", line(center)?),
        ("constellation", constellation(center)?),
        ("pulse", pulse(center)?),
    ])
}

fn fountain(center: Vec2) -> Result<Emitter, EmitterError> {
    let base = Vec3::new(0.2, 0.4, 1.0);
    let crest = Vec3::new(0.8, 0.9, 1.0);
    Emitter::new(
        center,
        EmitterController::interval_with_count(1.0 / 120.0, 240),
        move |_| {
            let mut rng = thread_rng();
            let t = rng.gen::<f32>();
            Particle::timed(1.2)
                .with_velocity(rand_vec_spread_deg(&mut rng, 90.0, 20.0, 6.0))
                .with_tint(base.lerp_to(crest, t))
                .with_scale(lerp(2.0, 5.0, t))
        },
    )
}

fn snow(center: Vec2) -> Result<Emitter, EmitterError> {
    Emitter::new(center, EmitterController::interval(0.05), |_| {
        let mut rng = thread_rng();
        let spin = rng.gen::<f32>() * 0.1 - 0.05;
        Particle::timed(4.0)
            .with_position(rand_in_rect(&mut rng, Vec2::new(-200.0, 150.0), 400.0, 10.0))
            .with_velocity(rand_vec_magnitude(&mut rng, 270.0, 0.5, 1.5))
            .with_angle(rand_angle_360_deg(&mut rng).to_radians(), spin)
            .with_scale(3.0)
            .with_shape(1)
    })
}

fn line(center: Vec2) -> Result<Emitter, EmitterError> {
    Emitter::new(
        center,
        EmitterController::interval_with_time(0.01, 1.0),
        |_| {
            let mut rng = thread_rng();
            Particle::fading(0.3)
                .with_position(rand_on_line(
                    &mut rng,
                    Vec2::new(-150.0, 0.0),
                    Vec2::new(150.0, 0.0),
                ))
                .with_velocity(Vec2::new(0.0, 0.5))
                .with_shape(1)
                .with_scale(2.0)
        },
    )
}

fn constellation(center: Vec2) -> Result<Emitter, EmitterError> {
    Emitter::new(center, EmitterController::burst(40), |_| {
        let mut rng = thread_rng();
        Particle::eternal()
            .with_position(rand_in_circle(&mut rng, Vec2::ZERO, 150.0))
            .with_angle(rand_angle_spread_deg(&mut rng, 0.0, 15.0).to_radians(), 0.0)
            .with_tint(Vec3::new(1.0, 1.0, 0.7))
            .with_scale(2.0)
    })
}

fn pulse(center: Vec2) -> Result<Emitter, EmitterError> {
    Emitter::new(
        center,
        EmitterController::custom(Pulse::new(16, 30, 4)),
        |_| {
            let mut rng = thread_rng();
            Particle::fading(0.5)
                .with_velocity(rand_on_circle(&mut rng, Vec2::ZERO, 2.5))
                .with_tint(Vec3::new(1.0, 0.4, 0.2))
                .with_scale(3.0)
        },
    )
}

#[cfg(test)]
mod tests {
    use glam::Vec2;

    use super::{gallery, make_burst_emitter, make_interval_emitter, Pulse};
    use crate::particle_system::{collection::DrawableCollection, controller::EmissionPolicy};

    #[test]
    fn test_burst_preset_emits_and_fades_out() {
        let mut emitter = make_burst_emitter(Vec2::new(10.0, 10.0), 2, 25, 3.0, 0.5, 4.0).unwrap();

        emitter.update().unwrap();
        assert_eq!(emitter.particle_count(), 25);
        for particle in emitter.particles().iter() {
            assert_eq!(particle.shape, 2);
            assert!(particle.velocity.length() <= 3.0 + 1e-4);
        }

        for _ in 0..40 {
            emitter.update().unwrap();
        }
        assert!(emitter.can_reap());
    }

    #[test]
    fn test_interval_preset_stops_after_duration() {
        let mut emitter = make_interval_emitter(Vec2::ZERO, 0, 0.1, 1.0, 2.0, 0.5, 1.0).unwrap();

        let mut peak = 0;
        for _ in 0..61 {
            emitter.update().unwrap();
            peak = peak.max(emitter.particle_count());
            for particle in emitter.particles().iter() {
                assert!((particle.velocity.length() - 2.0).abs() < 1e-4);
            }
        }
        assert!(emitter.controller().is_complete());
        assert!(peak > 0);

        for _ in 0..40 {
            emitter.update().unwrap();
        }
        assert!(emitter.can_reap());
    }

    #[test]
    fn test_interval_preset_rejects_bad_interval() {
        assert!(make_interval_emitter(Vec2::ZERO, 0, 0.0, 1.0, 1.0, 1.0, 1.0).is_err());
    }

    #[test]
    fn test_pulse_fires_on_schedule() {
        let mut pulse = Pulse::new(5, 3, 2);
        let counts: Vec<i64> = (0..8).map(|_| pulse.how_many(1.0 / 60.0)).collect();
        assert_eq!(counts, vec![5, 0, 0, 5, 0, 0, 0, 0]);
        assert!(pulse.is_complete());
    }

    #[test]
    fn test_gallery_emitters_share_center_and_run() {
        let center = Vec2::new(400.0, 300.0);
        let mut emitters = gallery(center).unwrap();

        let labels: Vec<&str> = emitters.iter().map(|(label, _)| *label).collect();
        assert_eq!(
            labels,
            vec!["burst", "ring", "fountain", "snow", "line", "constellation", "pulse"]
        );

        for (label, emitter) in &mut emitters {
            assert_eq!(emitter.origin(), center);
            for _ in 0..10 {
                emitter.update().unwrap();
            }
            assert!(emitter.particle_count() > 0, "{} emitted nothing", label);
        }
    }

    #[test]
    fn test_gallery_rejects_non_finite_center() {
        assert!(gallery(Vec2::new(f32::NAN, 0.0)).is_err());
    }
}
