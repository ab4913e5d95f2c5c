/// The nominal duration of one simulation tick in seconds.
///
/// Particle lifetimes and emitter controllers assume the engine steps at this fixed rate.
///
/// Lifetimes are counted down in `f32`, and 1/60 is not exact in binary. Whether a lifetime of
/// `R` seconds reaps on tick `R * 60` or one tick later depends on rounding: 0.5 reaps on tick
/// 30, while 1.0 and 0.25 reap on ticks 61 and 16.
pub const FIXED_TICK_SECONDS: f32 = 1.0 / 60.0;

/// Fixed-step simulation clock.
///
/// Unlike a wall clock, every call to [`Time::tick`] advances by exactly the same amount, so a
/// run is reproducible regardless of how long each frame actually took.
#[derive(Debug, Clone, Copy)]
pub struct Time {
    delta_seconds: f32,
    total_seconds: f64,
    ticks: u64,
}

impl Time {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a clock that steps by `delta_seconds` each tick.
    #[must_use]
    pub fn fixed(delta_seconds: f32) -> Self {
        Self {
            delta_seconds,
            total_seconds: 0.0,
            ticks: 0,
        }
    }

    pub fn tick(&mut self) {
        self.ticks += 1;
        self.total_seconds += f64::from(self.delta_seconds);
    }

    #[inline(always)]
    #[must_use]
    pub fn delta_seconds(&self) -> f32 {
        self.delta_seconds
    }

    #[must_use]
    pub fn total_seconds(&self) -> f64 {
        self.total_seconds
    }

    #[inline(always)]
    #[must_use]
    pub fn ticks(&self) -> u64 {
        self.ticks
    }
}

impl Default for Time {
    fn default() -> Self {
        Self::fixed(FIXED_TICK_SECONDS)
    }
}
