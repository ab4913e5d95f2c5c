//! Sampling helpers for placing and launching particles.
//!
//! Every function takes the random source explicitly so callers can use a seeded generator
//! for reproducible effects or `rand::thread_rng()` for everything else. Angles passed to the
//! `_deg` functions are in degrees, measured counter-clockwise from the positive x axis.

use std::f32::consts::TAU;

use glam::{Vec2, Vec3, Vec4};
use rand::Rng;

/// Defines a type which can be linearly interpolated between two values.
pub trait Lerp {
    /// Lerp between `self` and another value by the specified percentage.
    #[must_use]
    fn lerp_to(&self, rhs: Self, pct: f32) -> Self;
}

impl Lerp for f32 {
    fn lerp_to(&self, rhs: Self, pct: f32) -> Self {
        self * (1.0 - pct) + (rhs * pct)
    }
}

impl Lerp for Vec2 {
    fn lerp_to(&self, rhs: Self, pct: f32) -> Self {
        self.lerp(rhs, pct)
    }
}

impl Lerp for Vec3 {
    fn lerp_to(&self, rhs: Self, pct: f32) -> Self {
        self.lerp(rhs, pct)
    }
}

impl Lerp for Vec4 {
    fn lerp_to(&self, rhs: Self, pct: f32) -> Self {
        self.lerp(rhs, pct)
    }
}

#[inline]
#[must_use]
pub fn lerp(a: f32, b: f32, t: f32) -> f32 {
    a.lerp_to(b, t)
}

#[inline]
#[must_use]
pub fn lerp_vec(a: Vec2, b: Vec2, t: f32) -> Vec2 {
    a.lerp_to(b, t)
}

/// Uniform sample in `[lo, hi)`. Unlike `gen_range` this tolerates `lo == hi`.
fn uniform<R: Rng + ?Sized>(rng: &mut R, lo: f32, hi: f32) -> f32 {
    lo + (hi - lo) * rng.gen::<f32>()
}

fn unit_from_radians(radians: f32) -> Vec2 {
    Vec2::new(radians.cos(), radians.sin())
}

/// A point uniformly distributed inside the axis-aligned rectangle starting at `bottom_left`.
pub fn rand_in_rect<R: Rng + ?Sized>(
    rng: &mut R,
    bottom_left: Vec2,
    width: f32,
    height: f32,
) -> Vec2 {
    Vec2::new(
        uniform(rng, bottom_left.x, bottom_left.x + width),
        uniform(rng, bottom_left.y, bottom_left.y + height),
    )
}

/// A point uniformly distributed over the area of a disc.
pub fn rand_in_circle<R: Rng + ?Sized>(rng: &mut R, center: Vec2, radius: f32) -> Vec2 {
    let angle = uniform(rng, 0.0, TAU);
    // sqrt keeps the density even; a linear radius would bunch points at the center
    let distance = radius * rng.gen::<f32>().sqrt();
    center + unit_from_radians(angle) * distance
}

/// A point uniformly distributed on the circumference of a circle.
pub fn rand_on_circle<R: Rng + ?Sized>(rng: &mut R, center: Vec2, radius: f32) -> Vec2 {
    center + unit_from_radians(uniform(rng, 0.0, TAU)) * radius
}

/// A point uniformly distributed on the segment between `a` and `b`.
pub fn rand_on_line<R: Rng + ?Sized>(rng: &mut R, a: Vec2, b: Vec2) -> Vec2 {
    lerp_vec(a, b, rng.gen::<f32>())
}

/// An angle in `[0, 360)` degrees.
pub fn rand_angle_360_deg<R: Rng + ?Sized>(rng: &mut R) -> f32 {
    uniform(rng, 0.0, 360.0)
}

/// An angle within `half_spread` degrees either side of `angle`.
pub fn rand_angle_spread_deg<R: Rng + ?Sized>(rng: &mut R, angle: f32, half_spread: f32) -> f32 {
    angle + uniform(rng, -half_spread, half_spread)
}

/// A vector of the given length pointing within `half_spread` degrees of `angle`.
pub fn rand_vec_spread_deg<R: Rng + ?Sized>(
    rng: &mut R,
    angle: f32,
    half_spread: f32,
    length: f32,
) -> Vec2 {
    let angle = rand_angle_spread_deg(rng, angle, half_spread);
    unit_from_radians(angle.to_radians()) * length
}

/// A vector pointing exactly along `angle` degrees with a length in `[lo, hi)`.
pub fn rand_vec_magnitude<R: Rng + ?Sized>(rng: &mut R, angle: f32, lo: f32, hi: f32) -> Vec2 {
    unit_from_radians(angle.to_radians()) * uniform(rng, lo, hi)
}

#[cfg(test)]
mod tests {
    use glam::{Vec2, Vec3};
    use rand::{rngs::StdRng, SeedableRng};

    use super::*;

    const SAMPLES: usize = 2000;
    const EPS: f32 = 1e-4;

    #[test]
    fn test_in_rect_stays_inside() {
        let mut rng = StdRng::seed_from_u64(7);
        let origin = Vec2::new(-100.0, 50.0);
        for _ in 0..SAMPLES {
            let p = rand_in_rect(&mut rng, origin, 200.0, 100.0);
            assert!(p.x >= -100.0 && p.x <= 100.0);
            assert!(p.y >= 50.0 && p.y <= 150.0);
        }
    }

    #[test]
    fn test_zero_sized_shapes_do_not_panic() {
        let mut rng = StdRng::seed_from_u64(1);
        let center = Vec2::new(3.0, 4.0);
        assert_eq!(rand_in_rect(&mut rng, center, 0.0, 0.0), center);
        assert!(rand_in_circle(&mut rng, center, 0.0).distance(center) < EPS);
        assert!(rand_on_circle(&mut rng, center, 0.0).distance(center) < EPS);
        let v = rand_vec_magnitude(&mut rng, 0.0, 2.0, 2.0);
        assert!((v.length() - 2.0).abs() < EPS);
    }

    #[test]
    fn test_in_circle_is_area_uniform() {
        let mut rng = StdRng::seed_from_u64(42);
        let center = Vec2::new(10.0, -10.0);
        let mut inner = 0;
        for _ in 0..SAMPLES {
            let p = rand_in_circle(&mut rng, center, 100.0);
            let d = p.distance(center);
            assert!(d <= 100.0 + EPS);
            if d < 50.0 {
                inner += 1;
            }
        }
        // The inner half-radius disc holds a quarter of the area.
        let ratio = inner as f32 / SAMPLES as f32;
        assert!((ratio - 0.25).abs() < 0.05, "inner ratio was {}", ratio);
    }

    #[test]
    fn test_on_circle_is_on_circumference() {
        let mut rng = StdRng::seed_from_u64(3);
        for _ in 0..SAMPLES {
            let p = rand_on_circle(&mut rng, Vec2::ZERO, 5.0);
            assert!((p.length() - 5.0).abs() < EPS);
        }
    }

    #[test]
    fn test_on_line_is_on_segment() {
        let mut rng = StdRng::seed_from_u64(9);
        let a = Vec2::new(0.0, 0.0);
        let b = Vec2::new(800.0, 600.0);
        for _ in 0..SAMPLES {
            let p = rand_on_line(&mut rng, a, b);
            assert!((p.distance(a) + p.distance(b) - a.distance(b)).abs() < 0.01);
        }
    }

    #[test]
    fn test_spread_and_magnitude() {
        let mut rng = StdRng::seed_from_u64(11);
        for _ in 0..SAMPLES {
            let angle = rand_angle_spread_deg(&mut rng, 90.0, 45.0);
            assert!((45.0..=135.0).contains(&angle));

            let full = rand_angle_360_deg(&mut rng);
            assert!((0.0..=360.0).contains(&full));

            let v = rand_vec_spread_deg(&mut rng, 90.0, 45.0, 2.0);
            assert!((v.length() - 2.0).abs() < EPS);
            assert!(v.y >= 2.0 * 45f32.to_radians().sin() - EPS);

            let m = rand_vec_magnitude(&mut rng, 45.0, 1.0, 4.0);
            assert!(m.length() >= 1.0 - EPS && m.length() <= 4.0 + EPS);
            assert!((m.x - m.y).abs() < EPS);
        }
    }

    #[test]
    fn test_lerp_colors() {
        let mid = Vec3::new(0.2, 0.4, 1.0).lerp_to(Vec3::new(0.8, 0.9, 1.0), 0.5);
        assert!(mid.abs_diff_eq(Vec3::new(0.5, 0.65, 1.0), EPS));
    }

    #[test]
    fn test_lerp() {
        assert!((lerp(2.0, 4.0, 0.5) - 3.0).abs() < EPS);
        assert_eq!(lerp_vec(Vec2::ZERO, Vec2::new(10.0, 20.0), 0.25), Vec2::new(2.5, 5.0));
        assert!((lerp(1.0, 5.0, 0.0) - 1.0).abs() < EPS);
        assert!((lerp(1.0, 5.0, 1.0) - 5.0).abs() < EPS);
    }
}
