//! Tick clocks that drive the scheduler
//!
//! The scheduler never reads time on its own. A loop asks a clock for the
//! elapsed seconds since the previous tick and hands that delta to the
//! scheduler. Tests inject [`FixedStepClock`]; live loops use
//! [`MonotonicClock`].

use std::time::{Duration, Instant};

/// Default frame rate of the presentation loop
pub const DEFAULT_TICK_RATE_HZ: f64 = 30.0;

/// Largest step a live clock will ever report
pub const DEFAULT_MAX_STEP: Duration = Duration::from_millis(100);

/// A source of per-tick time deltas
pub trait TickClock {
    /// Seconds elapsed since the previous tick
    fn tick(&mut self) -> f64;

    /// Total seconds reported so far
    fn elapsed(&self) -> f64;
}

/// Deterministic clock: every tick reports the same step
#[derive(Clone, Debug)]
pub struct FixedStepClock {
    step: f64,
    elapsed: f64,
}

impl FixedStepClock {
    pub fn new(step: Duration) -> Self {
        Self::from_secs_f64(step.as_secs_f64())
    }

    pub fn from_secs_f64(step: f64) -> Self {
        FixedStepClock {
            step,
            elapsed: 0.0,
        }
    }

    /// Clock matching a frame rate, e.g. 30 Hz → 1/30 s per tick
    pub fn from_rate(hz: f64) -> Self {
        Self::from_secs_f64(1.0 / hz)
    }

    pub fn step(&self) -> f64 {
        self.step
    }
}

impl Default for FixedStepClock {
    fn default() -> Self {
        Self::from_rate(DEFAULT_TICK_RATE_HZ)
    }
}

impl TickClock for FixedStepClock {
    fn tick(&mut self) -> f64 {
        self.elapsed += self.step;
        self.step
    }

    fn elapsed(&self) -> f64 {
        self.elapsed
    }
}

/// Wall clock backed by [`Instant`]
///
/// INVARIANT: never reports more than `max_step` per tick, so a loop that
/// stalls (debugger, system sleep) cannot skip a phase.
pub struct MonotonicClock {
    last_update: Instant,
    max_step: Duration,
    elapsed: f64,
}

impl MonotonicClock {
    pub fn new() -> Self {
        Self::with_max_step(DEFAULT_MAX_STEP)
    }

    pub fn with_max_step(max_step: Duration) -> Self {
        MonotonicClock {
            last_update: Instant::now(),
            max_step,
            elapsed: 0.0,
        }
    }

    pub fn max_step(&self) -> Duration {
        self.max_step
    }
}

impl Default for MonotonicClock {
    fn default() -> Self {
        Self::new()
    }
}

impl TickClock for MonotonicClock {
    fn tick(&mut self) -> f64 {
        let now = Instant::now();
        let raw = now.duration_since(self.last_update);
        let clamped = raw.min(self.max_step);

        if clamped < raw {
            tracing::trace!(?raw, ?clamped, "clock step clamped");
        }

        self.last_update = now;
        let dt = clamped.as_secs_f64();
        self.elapsed += dt;
        dt
    }

    fn elapsed(&self) -> f64 {
        self.elapsed
    }
}

/// Wraps another clock and multiplies its deltas (fast-forward)
pub struct ScaledClock<C> {
    inner: C,
    rate: f64,
    elapsed: f64,
}

impl<C: TickClock> ScaledClock<C> {
    pub const MIN_RATE: f64 = 0.5;
    pub const MAX_RATE: f64 = 8.0;

    /// Rate is clamped to [0.5, 8.0]
    pub fn new(inner: C, rate: f64) -> Self {
        let mut clock = ScaledClock {
            inner,
            rate: 1.0,
            elapsed: 0.0,
        };
        clock.set_rate(rate);
        clock
    }

    pub fn set_rate(&mut self, rate: f64) {
        if rate.is_finite() {
            self.rate = rate.clamp(Self::MIN_RATE, Self::MAX_RATE);
        }
    }

    pub fn rate(&self) -> f64 {
        self.rate
    }

    pub fn inner(&self) -> &C {
        &self.inner
    }
}

impl<C: TickClock> TickClock for ScaledClock<C> {
    fn tick(&mut self) -> f64 {
        let dt = self.inner.tick() * self.rate;
        self.elapsed += dt;
        dt
    }

    fn elapsed(&self) -> f64 {
        self.elapsed
    }
}
