//! Count sources - the boundary to the vehicle-counting collaborator
//!
//! Image capture and object detection live outside this workspace. A source
//! only reports what the collaborator concluded: four counts, or an abort.
//! Every source reads an all-zero result as an abort, never as empty roads.

use junction_core::{AbortReason, Acquisition, Direction, VehicleCounts, DIRECTION_COUNT};

/// Produces the session's vehicle counts, once
pub trait CountSource {
    fn acquire(&mut self) -> Acquisition;
}

/// Counts known up front (config, tests, replays)
#[derive(Clone, Debug)]
pub struct StaticCounts {
    counts: VehicleCounts,
}

impl StaticCounts {
    pub fn new(counts: [u64; DIRECTION_COUNT]) -> Self {
        StaticCounts {
            counts: VehicleCounts::new(counts),
        }
    }
}

impl CountSource for StaticCounts {
    fn acquire(&mut self) -> Acquisition {
        Acquisition::classify(self.counts)
    }
}

/// Per-image counts from a batch the operator picked.
///
/// `None` entries are images that could not be loaded or analysed.
#[derive(Clone, Debug, Default)]
pub struct BatchSource {
    results: Vec<Option<u64>>,
}

impl BatchSource {
    pub fn new(results: Vec<Option<u64>>) -> Self {
        BatchSource { results }
    }
}

impl CountSource for BatchSource {
    fn acquire(&mut self) -> Acquisition {
        if self.results.len() != DIRECTION_COUNT {
            tracing::warn!(images = self.results.len(), "batch must hold exactly four images");
            return Acquisition::Aborted(AbortReason::WrongImageCount {
                expected: DIRECTION_COUNT,
                actual: self.results.len(),
            });
        }

        let mut counts = [0u64; DIRECTION_COUNT];
        for (direction, result) in Direction::ALL.iter().zip(&self.results) {
            match result {
                Some(count) => counts[direction.index()] = *count,
                None => {
                    tracing::warn!(%direction, "image could not be analysed");
                    return Acquisition::Aborted(AbortReason::CaptureFailed {
                        direction: *direction,
                    });
                }
            }
        }

        Acquisition::classify(VehicleCounts::new(counts))
    }
}

/// What a live capture step reports for one approach
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CaptureOutcome {
    Counted(u64),
    Failed,
    /// The operator quit the capture
    Quit,
}

/// Anything that can count vehicles for one approach on request
pub trait VehicleCounter {
    fn capture(&mut self, direction: Direction) -> CaptureOutcome;
}

impl<F> VehicleCounter for F
where
    F: FnMut(Direction) -> CaptureOutcome,
{
    fn capture(&mut self, direction: Direction) -> CaptureOutcome {
        self(direction)
    }
}

/// Captures the approaches one by one in service order
pub struct SequentialCapture<V> {
    counter: V,
}

impl<V: VehicleCounter> SequentialCapture<V> {
    pub fn new(counter: V) -> Self {
        SequentialCapture { counter }
    }
}

impl<V: VehicleCounter> CountSource for SequentialCapture<V> {
    fn acquire(&mut self) -> Acquisition {
        let mut counts = [0u64; DIRECTION_COUNT];

        for direction in Direction::ALL {
            match self.counter.capture(direction) {
                CaptureOutcome::Counted(n) => {
                    tracing::info!(%direction, vehicles = n, "approach captured");
                    counts[direction.index()] = n;
                }
                CaptureOutcome::Failed => {
                    return Acquisition::Aborted(AbortReason::CaptureFailed { direction });
                }
                CaptureOutcome::Quit => return Acquisition::Aborted(AbortReason::Cancelled),
            }
        }

        Acquisition::classify(VehicleCounts::new(counts))
    }
}
