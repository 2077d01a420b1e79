//! Signal state and its transition rule

use junction_core::{Direction, GreenDurations, VehicleCounts};

/// Remaining time at or below this is an exhausted phase.
///
/// Repeated subtraction of frame deltas such as 1/30 s leaves residue in the
/// last bits; without a tolerance a 15 s phase at 30 Hz would need 451 ticks.
pub const PHASE_EPSILON: f64 = 1e-9;

/// State carried by the scheduler between ticks
///
/// INVARIANT: `remaining <= durations[active]`. It may dip below zero
/// between the subtraction and the transition, never after `advanced` returns.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SignalState {
    /// Direction currently holding priority
    pub active: Direction,
    /// Seconds left in the active phase
    pub remaining: f64,
    /// Full traversals completed (incremented on return to North)
    pub cycles_completed: u64,
    /// Sum of all counts, fixed at session start
    pub total_vehicles: u64,
}

/// Record of one direction handover
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PhaseChange {
    pub from: Direction,
    pub to: Direction,
    /// True when `to` is North, i.e. a cycle just completed
    pub cycle_completed: bool,
    /// Time by which the tick overran the old phase. Discarded, not carried.
    pub overshoot: f64,
}

/// Read-only view handed to presentation
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SignalSnapshot {
    pub active_direction: Direction,
    /// `max(0, remaining)`
    pub display_remaining: f64,
    pub cycles_completed: u64,
    pub total_vehicles: u64,
}

impl SignalState {
    /// Session-start state: North active with its full green time
    pub fn initial(durations: &GreenDurations, counts: &VehicleCounts) -> Self {
        SignalState {
            active: Direction::North,
            remaining: durations.get(Direction::North),
            cycles_completed: 0,
            total_vehicles: counts.total(),
        }
    }

    /// Apply one tick and return the successor state.
    ///
    /// At most one transition happens per call. Non-positive and NaN deltas
    /// return `self` unchanged.
    pub fn advanced(
        &self,
        durations: &GreenDurations,
        delta: f64,
    ) -> (SignalState, Option<PhaseChange>) {
        if delta.is_nan() || delta <= 0.0 {
            return (*self, None);
        }

        let remaining = self.remaining - delta;
        if remaining > PHASE_EPSILON {
            let next = SignalState {
                remaining,
                ..*self
            };
            return (next, None);
        }

        let to = self.active.next();
        let cycle_completed = to.starts_cycle();
        let next = SignalState {
            active: to,
            remaining: durations.get(to),
            cycles_completed: self.cycles_completed + u64::from(cycle_completed),
            total_vehicles: self.total_vehicles,
        };
        let change = PhaseChange {
            from: self.active,
            to,
            cycle_completed,
            overshoot: (-remaining).max(0.0),
        };

        (next, Some(change))
    }

    /// Side-effect-free view with the countdown clamped at zero
    pub fn snapshot(&self) -> SignalSnapshot {
        SignalSnapshot {
            active_direction: self.active,
            display_remaining: self.remaining.max(0.0),
            cycles_completed: self.cycles_completed,
            total_vehicles: self.total_vehicles,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn durations() -> GreenDurations {
        GreenDurations::new([15.0, 5.0, 15.0, 5.0]).unwrap()
    }

    fn initial() -> SignalState {
        SignalState::initial(&durations(), &VehicleCounts::new([10, 2, 10, 2]))
    }

    #[test]
    fn test_initial_state() {
        let state = initial();
        assert_eq!(state.active, Direction::North);
        assert_eq!(state.remaining, 15.0);
        assert_eq!(state.cycles_completed, 0);
        assert_eq!(state.total_vehicles, 24);
    }

    #[test]
    fn test_countdown_without_transition() {
        let (next, change) = initial().advanced(&durations(), 1.0);
        assert!(change.is_none());
        assert_eq!(next.active, Direction::North);
        assert_eq!(next.remaining, 14.0);
    }

    #[test]
    fn test_non_positive_delta_is_identity() {
        let state = initial();
        for delta in [0.0, -0.0, -1.0, f64::NAN, f64::NEG_INFINITY] {
            let (next, change) = state.advanced(&durations(), delta);
            assert!(change.is_none());
            assert_eq!(next.remaining.to_bits(), state.remaining.to_bits());
            assert_eq!(next, state);
        }
    }

    #[test]
    fn test_overshoot_is_discarded() {
        let state = SignalState {
            remaining: 0.5,
            ..initial()
        };
        let (next, change) = state.advanced(&durations(), 2.0);

        assert_eq!(next.active, Direction::East);
        assert_eq!(next.remaining, 5.0);
        let change = change.unwrap();
        assert_eq!(change.overshoot, 1.5);
        assert!(!change.cycle_completed);
    }

    #[test]
    fn test_huge_delta_makes_single_transition() {
        let (next, change) = initial().advanced(&durations(), 1_000.0);
        assert_eq!(next.active, Direction::East);
        assert_eq!(next.cycles_completed, 0);
        assert_eq!(change.map(|c| c.to), Some(Direction::East));
    }

    #[test]
    fn test_cycle_completes_on_return_to_north() {
        let state = SignalState {
            active: Direction::West,
            remaining: 0.01,
            ..initial()
        };
        let (next, change) = state.advanced(&durations(), 1.0 / 30.0);

        assert_eq!(next.active, Direction::North);
        assert_eq!(next.remaining, 15.0);
        assert_eq!(next.cycles_completed, 1);
        assert!(change.unwrap().cycle_completed);
    }

    #[test]
    fn test_snapshot_clamps() {
        let state = SignalState {
            remaining: -0.25,
            ..initial()
        };
        let snap = state.snapshot();
        assert_eq!(snap.display_remaining, 0.0);
        assert_eq!(snap.active_direction, Direction::North);
    }
}
