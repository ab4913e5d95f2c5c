use cfg_if::cfg_if;
#[cfg(feature = "stats")]
use log::info;

/// Tick timing and particle totals, logged periodically when the `stats` feature is enabled.
///
/// Without the feature every method is a no-op apart from the peak particle count.
#[allow(dead_code)]
pub struct CoreStats {
    tick_start: instant::Instant,
    log_interval_ticks: u64,
    ticks: u64,
    total_tick_time: f32,
    total_particles: usize,
    peak_particles: usize,
}

impl CoreStats {
    #[must_use]
    pub fn new(log_interval_ticks: u64) -> Self {
        let now = instant::Instant::now();
        Self {
            tick_start: now,
            log_interval_ticks: log_interval_ticks.max(1),
            ticks: 0,
            total_tick_time: 0.0,
            total_particles: 0,
            peak_particles: 0,
        }
    }

    /// The most particles alive at the end of any tick so far.
    #[inline(always)]
    #[must_use]
    pub fn peak_particles(&self) -> usize {
        self.peak_particles
    }

    #[inline(always)]
    pub fn tick_start(&mut self) {
        cfg_if! {
            if #[cfg(feature = "stats")] {
                self.tick_start = instant::Instant::now();
            }
        }
    }

    #[inline(always)]
    #[allow(clippy::cast_precision_loss)]
    pub fn tick_end(&mut self, particles: usize) {
        self.peak_particles = self.peak_particles.max(particles);
        cfg_if! {
            if #[cfg(feature = "stats")] {
                self.ticks += 1;
                self.total_particles += particles;
                self.total_tick_time += instant::Instant::now()
                    .duration_since(self.tick_start)
                    .as_secs_f32();

                if self.ticks >= self.log_interval_ticks {
                    let ticks = self.ticks as f32;
                    info!("-------------");
                    info!("Avg tick: {:.3}ms", self.total_tick_time / ticks * 1000.0);
                    info!("Avg particles: {:.1}", self.total_particles as f32 / ticks);
                    info!("Peak particles: {}", self.peak_particles);
                    info!("-------------");
                    self.ticks = 0;
                    self.total_tick_time = 0.0;
                    self.total_particles = 0;
                }
            }
        }
    }
}
