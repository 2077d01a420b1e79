//! Per-direction vehicle counts and green durations
//!
//! Both vectors are fixed for the life of a session. They are validated once
//! at construction and read-only afterwards.

use std::ops::Index;

use crate::{Direction, SignalError, SignalResult, DIRECTION_COUNT};

/// Vehicle counts indexed [North, East, South, West]
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default)]
pub struct VehicleCounts([u64; DIRECTION_COUNT]);

impl VehicleCounts {
    pub fn new(counts: [u64; DIRECTION_COUNT]) -> Self {
        VehicleCounts(counts)
    }

    /// Build from a collaborator-supplied vector.
    /// Rejects wrong lengths and negative entries.
    pub fn from_slice(raw: &[i64]) -> SignalResult<Self> {
        if raw.len() != DIRECTION_COUNT {
            return Err(SignalError::WrongLength {
                expected: DIRECTION_COUNT,
                actual: raw.len(),
            });
        }

        let mut counts = [0u64; DIRECTION_COUNT];
        for (direction, (slot, &value)) in Direction::ALL.iter().zip(counts.iter_mut().zip(raw)) {
            *slot = u64::try_from(value).map_err(|_| SignalError::NegativeCount {
                direction: *direction,
                value,
            })?;
        }

        Ok(VehicleCounts(counts))
    }

    /// Count for one direction
    #[inline]
    pub fn get(&self, direction: Direction) -> u64 {
        self.0[direction.index()]
    }

    /// Sum over all four approaches
    pub fn total(&self) -> u64 {
        self.0.iter().fold(0u64, |acc, &c| acc.saturating_add(c))
    }

    /// All-zero vectors are what upstream emits on an aborted capture
    pub fn is_degenerate(&self) -> bool {
        self.0.iter().all(|&c| c == 0)
    }

    pub fn as_array(&self) -> &[u64; DIRECTION_COUNT] {
        &self.0
    }

    /// Iterate (direction, count) pairs in service order
    pub fn iter(&self) -> impl Iterator<Item = (Direction, u64)> + '_ {
        Direction::ALL.iter().map(move |&d| (d, self.get(d)))
    }
}

impl Index<Direction> for VehicleCounts {
    type Output = u64;

    fn index(&self, direction: Direction) -> &u64 {
        &self.0[direction.index()]
    }
}

/// Green-time allocation in seconds, indexed like [`VehicleCounts`]
///
/// INVARIANT: every entry is finite and non-negative. A zero entry is a phase
/// that ends on the first positive tick.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct GreenDurations([f64; DIRECTION_COUNT]);

impl GreenDurations {
    /// Validate and wrap a duration vector
    pub fn new(durations: [f64; DIRECTION_COUNT]) -> SignalResult<Self> {
        for (direction, &value) in Direction::ALL.iter().zip(durations.iter()) {
            let direction = *direction;
            if !value.is_finite() {
                return Err(SignalError::NonFiniteDuration { direction });
            }
            if value < 0.0 {
                return Err(SignalError::NegativeDuration { direction, value });
            }
        }

        Ok(GreenDurations(durations))
    }

    /// Build from a collaborator-supplied vector
    pub fn from_slice(raw: &[f64]) -> SignalResult<Self> {
        let durations: [f64; DIRECTION_COUNT] =
            raw.try_into().map_err(|_| SignalError::WrongLength {
                expected: DIRECTION_COUNT,
                actual: raw.len(),
            })?;
        Self::new(durations)
    }

    /// Green seconds for one direction
    #[inline]
    pub fn get(&self, direction: Direction) -> f64 {
        self.0[direction.index()]
    }

    /// Shortest phase. Tick deltas must stay below this.
    pub fn min(&self) -> f64 {
        self.0.iter().copied().fold(f64::INFINITY, f64::min)
    }

    /// Length of one full cycle in seconds
    pub fn cycle_length(&self) -> f64 {
        self.0.iter().sum()
    }

    pub fn as_array(&self) -> &[f64; DIRECTION_COUNT] {
        &self.0
    }

    /// Iterate (direction, seconds) pairs in service order
    pub fn iter(&self) -> impl Iterator<Item = (Direction, f64)> + '_ {
        Direction::ALL.iter().map(move |&d| (d, self.get(d)))
    }
}

impl Index<Direction> for GreenDurations {
    type Output = f64;

    fn index(&self, direction: Direction) -> &f64 {
        &self.0[direction.index()]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_counts_from_slice() {
        let counts = VehicleCounts::from_slice(&[10, 2, 10, 2]).unwrap();
        assert_eq!(counts.get(Direction::North), 10);
        assert_eq!(counts[Direction::East], 2);
        assert_eq!(counts.total(), 24);
        assert!(!counts.is_degenerate());
    }

    #[test]
    fn test_counts_wrong_length() {
        let err = VehicleCounts::from_slice(&[1, 2, 3]).unwrap_err();
        assert_eq!(
            err,
            SignalError::WrongLength {
                expected: 4,
                actual: 3
            }
        );

        assert!(VehicleCounts::from_slice(&[1, 2, 3, 4, 5]).is_err());
    }

    #[test]
    fn test_counts_negative() {
        let err = VehicleCounts::from_slice(&[1, 2, -3, 4]).unwrap_err();
        assert_eq!(
            err,
            SignalError::NegativeCount {
                direction: Direction::South,
                value: -3
            }
        );
    }

    #[test]
    fn test_zero_counts_are_degenerate() {
        let counts = VehicleCounts::from_slice(&[0, 0, 0, 0]).unwrap();
        assert!(counts.is_degenerate());
        assert_eq!(counts.total(), 0);
    }

    #[test]
    fn test_durations_validation() {
        assert!(GreenDurations::new([15.0, 5.0, 15.0, 5.0]).is_ok());

        assert_eq!(
            GreenDurations::new([15.0, -1.0, 15.0, 5.0]).unwrap_err(),
            SignalError::NegativeDuration {
                direction: Direction::East,
                value: -1.0
            }
        );
        assert_eq!(
            GreenDurations::new([15.0, 5.0, f64::NAN, 5.0]).unwrap_err(),
            SignalError::NonFiniteDuration {
                direction: Direction::South
            }
        );
        assert!(GreenDurations::from_slice(&[5.0; 3]).is_err());
    }

    #[test]
    fn test_zero_duration_accepted() {
        let durations = GreenDurations::new([15.0, 5.0, 15.0, 0.0]).unwrap();
        assert_eq!(durations.min(), 0.0);
        assert_eq!(durations.cycle_length(), 35.0);
    }

    #[test]
    fn test_durations_aggregates() {
        let durations = GreenDurations::new([15.0, 5.0, 15.0, 6.0]).unwrap();
        assert_eq!(durations.min(), 5.0);
        assert_eq!(durations.cycle_length(), 41.0);
        assert_eq!(durations[Direction::West], 6.0);
    }

    mod properties {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            #[test]
            fn non_negative_vectors_are_accepted(raw in prop::array::uniform4(0i64..1_000_000)) {
                let counts = VehicleCounts::from_slice(&raw).unwrap();
                let expected: i64 = raw.iter().sum();
                prop_assert_eq!(counts.total(), expected as u64);
            }

            #[test]
            fn any_negative_entry_is_rejected(
                raw in prop::array::uniform4(0i64..100),
                slot in 0usize..4,
                neg in i64::MIN..0,
            ) {
                let mut raw = raw;
                raw[slot] = neg;
                let is_negative_count = matches!(
                    VehicleCounts::from_slice(&raw),
                    Err(SignalError::NegativeCount { .. })
                );
                prop_assert!(is_negative_count);
            }
        }
    }
}
