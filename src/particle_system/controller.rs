use std::fmt;

use crate::{error::EmitterError, time::FIXED_TICK_SECONDS};

/// The most particles a controller authorizes in a single tick.
///
/// Interval controllers keep any excess in their carryover and release it on later ticks.
/// Custom policies are clamped to this value.
pub const MAX_EMISSIONS_PER_TICK: usize = 1 << 20;

/// The shortest accepted period: one that emits [`MAX_EMISSIONS_PER_TICK`] per nominal tick.
#[allow(clippy::cast_precision_loss)]
pub const MIN_PERIOD_SECONDS: f32 = FIXED_TICK_SECONDS / MAX_EMISSIONS_PER_TICK as f32;

/// A user supplied emission policy for [`EmitterController::Custom`].
///
/// Implementations may return any count. The controller clamps the result to
/// `0..=MAX_EMISSIONS_PER_TICK`.
pub trait EmissionPolicy: Send + Sync {
    /// How many particles to emit for a tick lasting `delta_seconds`.
    fn how_many(&mut self, delta_seconds: f32) -> i64;

    /// Whether this policy will ever authorize another emission.
    fn is_complete(&self) -> bool;
}

/// Decides how many particles an emitter creates each tick and when it is done emitting.
///
/// Interval-family controllers carry leftover time between ticks, so the total emitted over a
/// span of time does not depend on how that span was divided into ticks.
pub enum EmitterController {
    /// Emits `count` particles on the first tick and nothing afterwards.
    ///
    /// A burst reports itself complete from the moment it is created, before the particles
    /// have been emitted. An emitter holding a fresh burst with no live particles can therefore
    /// be reaped before its first update.
    Burst { count: u32, fired: bool },
    /// Emits one particle every `period` seconds, forever.
    Interval { period: f32, carryover: f64 },
    /// Emits one particle every `period` seconds until `remaining` particles have been emitted.
    IntervalWithCount {
        period: f32,
        remaining: u32,
        carryover: f64,
    },
    /// Emits one particle every `period` seconds until `remaining_seconds` have elapsed.
    IntervalWithTime {
        period: f32,
        remaining_seconds: f32,
        carryover: f64,
    },
    /// Defers to an external [`EmissionPolicy`].
    Custom(Box<dyn EmissionPolicy>),
}

impl EmitterController {
    #[must_use]
    pub fn burst(count: u32) -> Self {
        Self::Burst {
            count,
            fired: false,
        }
    }

    #[must_use]
    pub fn interval(period: f32) -> Self {
        Self::Interval {
            period,
            carryover: 0.0,
        }
    }

    #[must_use]
    pub fn interval_with_count(period: f32, count: u32) -> Self {
        Self::IntervalWithCount {
            period,
            remaining: count,
            carryover: 0.0,
        }
    }

    #[must_use]
    pub fn interval_with_time(period: f32, lifetime_seconds: f32) -> Self {
        Self::IntervalWithTime {
            period,
            remaining_seconds: lifetime_seconds,
            carryover: 0.0,
        }
    }

    #[must_use]
    pub fn custom<P>(policy: P) -> Self
    where
        P: EmissionPolicy + 'static,
    {
        Self::Custom(Box::new(policy))
    }

    /// Checks that the controller can run without stalling or spinning.
    ///
    /// # Errors
    /// Returns [`EmitterError::InvalidInterval`] for a non-finite period or one shorter than
    /// [`MIN_PERIOD_SECONDS`], [`EmitterError::InvalidLifetime`] for a non-finite time budget,
    /// and [`EmitterError::InvalidCount`] for a burst larger than [`MAX_EMISSIONS_PER_TICK`].
    pub fn validate(&self) -> Result<(), EmitterError> {
        match self {
            Self::Burst { count, .. } => {
                if *count as usize > MAX_EMISSIONS_PER_TICK {
                    Err(EmitterError::InvalidCount(*count))
                } else {
                    Ok(())
                }
            }
            Self::Custom(_) => Ok(()),
            Self::Interval { period, .. } | Self::IntervalWithCount { period, .. } => {
                check_period(*period)
            }
            Self::IntervalWithTime {
                period,
                remaining_seconds,
                ..
            } => {
                check_period(*period)?;
                if remaining_seconds.is_finite() {
                    Ok(())
                } else {
                    Err(EmitterError::InvalidLifetime(*remaining_seconds))
                }
            }
        }
    }

    /// Returns how many particles to emit for a tick lasting `delta_seconds`.
    ///
    /// Call at most once per tick. Negative or non-finite `delta_seconds` count as zero, and the
    /// result never exceeds [`MAX_EMISSIONS_PER_TICK`].
    pub fn how_many(&mut self, delta_seconds: f32) -> usize {
        let delta = if delta_seconds.is_finite() {
            f64::from(delta_seconds.max(0.0))
        } else {
            0.0
        };

        match self {
            Self::Burst { count, fired } => {
                if *fired {
                    0
                } else {
                    *fired = true;
                    (*count as usize).min(MAX_EMISSIONS_PER_TICK)
                }
            }
            Self::Interval { period, carryover } => {
                *carryover += delta;
                drain(carryover, *period, MAX_EMISSIONS_PER_TICK)
            }
            Self::IntervalWithCount {
                period,
                remaining,
                carryover,
            } => {
                *carryover += delta;
                let emitted = drain(
                    carryover,
                    *period,
                    (*remaining as usize).min(MAX_EMISSIONS_PER_TICK),
                );
                #[allow(clippy::cast_possible_truncation)]
                {
                    *remaining -= emitted as u32;
                }
                emitted
            }
            Self::IntervalWithTime {
                period,
                remaining_seconds,
                carryover,
            } => {
                if *remaining_seconds <= 0.0 {
                    return 0;
                }
                // Time past the end of the budget never turns into particles.
                *carryover += delta.min(f64::from(*remaining_seconds));
                #[allow(clippy::cast_possible_truncation)]
                {
                    *remaining_seconds -= delta as f32;
                }
                drain(carryover, *period, MAX_EMISSIONS_PER_TICK)
            }
            Self::Custom(policy) => {
                #[allow(clippy::cast_possible_truncation)]
                let requested = policy.how_many(delta as f32);
                usize::try_from(requested)
                    .unwrap_or(0)
                    .min(MAX_EMISSIONS_PER_TICK)
            }
        }
    }

    /// Whether the controller will ever authorize another emission.
    #[must_use]
    pub fn is_complete(&self) -> bool {
        match self {
            Self::Burst { .. } => true,
            Self::Interval { .. } => false,
            Self::IntervalWithCount { remaining, .. } => *remaining == 0,
            Self::IntervalWithTime {
                remaining_seconds, ..
            } => *remaining_seconds <= 0.0,
            Self::Custom(policy) => policy.is_complete(),
        }
    }
}

fn check_period(period: f32) -> Result<(), EmitterError> {
    if period.is_finite() && period >= MIN_PERIOD_SECONDS {
        Ok(())
    } else {
        Err(EmitterError::InvalidInterval(period))
    }
}

/// Removes as many whole periods from `carryover` as fit, up to `limit`, returning the count.
///
/// Whatever is left over past `limit` stays in `carryover` for later ticks.
#[allow(
    clippy::cast_possible_truncation,
    clippy::cast_sign_loss,
    clippy::cast_precision_loss
)]
fn drain(carryover: &mut f64, period: f32, limit: usize) -> usize {
    let period = f64::from(period);
    if period <= 0.0 || !period.is_finite() {
        return 0;
    }

    let whole = (*carryover / period).floor().max(0.0).min(limit as f64);
    *carryover = (*carryover - whole * period).max(0.0);
    whole as usize
}

impl fmt::Debug for EmitterController {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Burst { count, fired } => f
                .debug_struct("Burst")
                .field("count", count)
                .field("fired", fired)
                .finish(),
            Self::Interval { period, carryover } => f
                .debug_struct("Interval")
                .field("period", period)
                .field("carryover", carryover)
                .finish(),
            Self::IntervalWithCount {
                period,
                remaining,
                carryover,
            } => f
                .debug_struct("IntervalWithCount")
                .field("period", period)
                .field("remaining", remaining)
                .field("carryover", carryover)
                .finish(),
            Self::IntervalWithTime {
                period,
                remaining_seconds,
                carryover,
            } => f
                .debug_struct("IntervalWithTime")
                .field("period", period)
                .field("remaining_seconds", remaining_seconds)
                .field("carryover", carryover)
                .finish(),
            Self::Custom(policy) => f
                .debug_struct("Custom")
                .field("complete", &policy.is_complete())
                .finish(),
        }
    }
}
