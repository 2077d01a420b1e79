//! Results handed over by the vehicle-counting collaborator
//!
//! Upstream capture either produces a full set of counts or gives up. The two
//! outcomes are kept apart here so an aborted capture can never be mistaken
//! for a measurement of empty roads.

use std::fmt;

use crate::{Direction, SignalResult, VehicleCounts};

/// Why the collaborator could not produce counts
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum AbortReason {
    /// The operator supplied a number of images other than four
    WrongImageCount { expected: usize, actual: usize },
    /// Capture or decoding failed for one approach
    CaptureFailed { direction: Direction },
    /// The operator quit before all four approaches were captured
    Cancelled,
    /// A raw all-zero vector, the sentinel older capture code uses on failure
    LegacyZeroSentinel,
}

impl fmt::Display for AbortReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AbortReason::WrongImageCount { expected, actual } => {
                write!(f, "expected {} images, got {}", expected, actual)
            }
            AbortReason::CaptureFailed { direction } => {
                write!(f, "capture failed for {} approach", direction)
            }
            AbortReason::Cancelled => f.write_str("capture cancelled"),
            AbortReason::LegacyZeroSentinel => f.write_str("all-zero sentinel vector"),
        }
    }
}

/// Outcome of one acquisition run
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Acquisition {
    Counts(VehicleCounts),
    Aborted(AbortReason),
}

impl Acquisition {
    /// Interpret a raw count vector.
    ///
    /// Malformed vectors are errors; an all-zero vector is read as the
    /// legacy abort sentinel rather than as real traffic.
    pub fn from_raw(raw: &[i64]) -> SignalResult<Self> {
        VehicleCounts::from_slice(raw).map(Self::classify)
    }

    /// Wrap counts reported by any source. All-zero counts become
    /// `Aborted(LegacyZeroSentinel)`.
    pub fn classify(counts: VehicleCounts) -> Self {
        if counts.is_degenerate() {
            return Acquisition::Aborted(AbortReason::LegacyZeroSentinel);
        }
        Acquisition::Counts(counts)
    }

    pub fn counts(&self) -> Option<&VehicleCounts> {
        match self {
            Acquisition::Counts(counts) => Some(counts),
            Acquisition::Aborted(_) => None,
        }
    }

    pub fn is_aborted(&self) -> bool {
        matches!(self, Acquisition::Aborted(_))
    }
}

impl From<VehicleCounts> for Acquisition {
    fn from(counts: VehicleCounts) -> Self {
        Self::classify(counts)
    }
}
