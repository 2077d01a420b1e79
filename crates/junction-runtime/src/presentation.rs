//! Light-board presentation mapping
//!
//! Turns a scheduler snapshot into what a renderer draws each frame: one
//! signal head per approach plus the statistics panel. The amber threshold
//! is a display rule; the scheduler knows nothing about amber.

use std::fmt;

use junction_core::{Direction, GreenDurations, VehicleCounts, DIRECTION_COUNT};
use junction_scheduler::SignalSnapshot;

/// Default amber window at the end of each green phase (seconds)
pub const DEFAULT_AMBER_THRESHOLD: f64 = 3.0;

/// Lit lamp of a signal head
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum LightColor {
    Red,
    Amber,
    Green,
}

impl LightColor {
    /// Color for one approach given the current snapshot
    pub fn for_direction(
        direction: Direction,
        snapshot: &SignalSnapshot,
        amber_threshold: f64,
    ) -> Self {
        if direction != snapshot.active_direction {
            LightColor::Red
        } else if snapshot.display_remaining > amber_threshold {
            LightColor::Green
        } else {
            LightColor::Amber
        }
    }

    pub fn symbol(self) -> char {
        match self {
            LightColor::Red => 'R',
            LightColor::Amber => 'A',
            LightColor::Green => 'G',
        }
    }
}

/// One signal head as drawn
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SignalAspect {
    pub direction: Direction,
    pub color: LightColor,
    /// Live countdown when active, the full allocation otherwise
    pub countdown: f64,
    pub active: bool,
    pub vehicles: u64,
}

impl SignalAspect {
    /// "12.3s" for the active head, "15.0s" for waiting heads
    pub fn countdown_label(&self) -> String {
        format!("{:.1}s", self.countdown)
    }
}

/// Cumulative statistics panel
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct StatsPanel {
    pub cycles_completed: u64,
    pub total_vehicles: u64,
}

/// Everything a renderer needs for one frame
#[derive(Clone, Debug, PartialEq)]
pub struct IntersectionView {
    pub aspects: [SignalAspect; DIRECTION_COUNT],
    pub stats: StatsPanel,
}

impl IntersectionView {
    pub fn build(
        snapshot: &SignalSnapshot,
        durations: &GreenDurations,
        counts: &VehicleCounts,
        amber_threshold: f64,
    ) -> Self {
        let aspects = Direction::ALL.map(|direction| {
            let active = direction == snapshot.active_direction;
            SignalAspect {
                direction,
                color: LightColor::for_direction(direction, snapshot, amber_threshold),
                countdown: if active {
                    snapshot.display_remaining
                } else {
                    durations.get(direction)
                },
                active,
                vehicles: counts.get(direction),
            }
        });

        IntersectionView {
            aspects,
            stats: StatsPanel {
                cycles_completed: snapshot.cycles_completed,
                total_vehicles: snapshot.total_vehicles,
            },
        }
    }

    pub fn aspect(&self, direction: Direction) -> &SignalAspect {
        &self.aspects[direction.index()]
    }
}

impl fmt::Display for IntersectionView {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for aspect in &self.aspects {
            write!(
                f,
                "{:<5} [{}] {:>3} cars {:>7} | ",
                aspect.direction.name(),
                aspect.color.symbol(),
                aspect.vehicles,
                aspect.countdown_label(),
            )?;
        }
        write!(
            f,
            "cycles {} vehicles {}",
            self.stats.cycles_completed, self.stats.total_vehicles
        )
    }
}
