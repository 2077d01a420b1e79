//! Signal scheduler - owns the durations and drives the state machine
//!
//! ```text
//!   ┌──────┐  exhausted  ┌──────┐  exhausted  ┌──────┐  exhausted  ┌──────┐
//!   │North │────────────▶│ East │────────────▶│South │────────────▶│ West │
//!   └──────┘             └──────┘             └──────┘             └──────┘
//!      ▲  ↺ countdown                                                  │
//!      └─────────────────────── exhausted (cycle += 1) ────────────────┘
//! ```

use junction_core::{GreenDurations, SignalError, SignalResult, VehicleCounts};
use junction_timing::TimingPolicy;

use crate::{PhaseChange, SignalSnapshot, SignalState};

/// Cyclic four-phase scheduler
#[derive(Clone, Debug)]
pub struct SignalScheduler {
    durations: GreenDurations,
    state: SignalState,
}

impl SignalScheduler {
    /// Start a session from precomputed durations.
    ///
    /// An all-zero count vector is rejected: upstream uses it to signal an
    /// aborted capture, never a real measurement.
    pub fn initialize(durations: GreenDurations, counts: &VehicleCounts) -> SignalResult<Self> {
        if counts.is_degenerate() {
            return Err(SignalError::DegenerateCounts);
        }

        let state = SignalState::initial(&durations, counts);
        tracing::info!(
            total_vehicles = state.total_vehicles,
            cycle_length = durations.cycle_length(),
            "signal scheduler initialized"
        );

        Ok(SignalScheduler { durations, state })
    }

    /// Start a session from unvalidated collaborator vectors
    pub fn from_raw(durations: &[f64], counts: &[i64]) -> SignalResult<Self> {
        let counts = VehicleCounts::from_slice(counts)?;
        let durations = GreenDurations::from_slice(durations)?;
        Self::initialize(durations, &counts)
    }

    /// Compute durations with `policy` and start a session
    pub fn from_counts(counts: &VehicleCounts, policy: &TimingPolicy) -> SignalResult<Self> {
        if counts.is_degenerate() {
            return Err(SignalError::DegenerateCounts);
        }
        let durations = policy.allocate(counts)?;
        Self::initialize(durations, counts)
    }

    /// Advance by `delta` seconds.
    ///
    /// Precondition: `delta < durations.min()`. Larger steps still perform
    /// exactly one transition, so skipped phases go unaccounted.
    pub fn advance(&mut self, delta: f64) -> Option<PhaseChange> {
        if delta >= self.durations.min() {
            tracing::warn!(
                delta,
                shortest_phase = self.durations.min(),
                "tick delta spans a whole phase"
            );
        }

        let (next, change) = self.state.advanced(&self.durations, delta);
        self.state = next;

        if let Some(change) = &change {
            tracing::debug!(
                from = %change.from,
                to = %change.to,
                overshoot = change.overshoot,
                "phase change"
            );
            if change.cycle_completed {
                tracing::info!(cycles = self.state.cycles_completed, "cycle completed");
            }
        }

        change
    }

    /// Current view, countdown clamped at zero
    pub fn query(&self) -> SignalSnapshot {
        self.state.snapshot()
    }

    pub fn state(&self) -> &SignalState {
        &self.state
    }

    pub fn durations(&self) -> &GreenDurations {
        &self.durations
    }

    /// Whether `delta` satisfies the single-transition precondition
    pub fn accepts_step(&self, delta: f64) -> bool {
        delta < self.durations.min()
    }
}
