//! Intersection approach directions
//!
//! The controller serves four approaches in a fixed cyclic order:
//! North → East → South → West → North.
//! Index 0–3 matches the position in the collaborator-supplied count vector.

use std::fmt;

/// Number of approaches served by the controller
pub const DIRECTION_COUNT: usize = 4;

/// One of the four cardinal approaches to the intersection
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
#[repr(u8)]
pub enum Direction {
    /// Index 0, start of every cycle
    #[default]
    North = 0,
    East = 1,
    South = 2,
    West = 3,
}

impl Direction {
    /// All directions in service order
    pub const ALL: [Direction; DIRECTION_COUNT] = [
        Direction::North,
        Direction::East,
        Direction::South,
        Direction::West,
    ];

    /// Look up a direction by its position in the count vector
    pub fn from_index(index: usize) -> Option<Self> {
        match index {
            0 => Some(Direction::North),
            1 => Some(Direction::East),
            2 => Some(Direction::South),
            3 => Some(Direction::West),
            _ => None,
        }
    }

    /// Position in the count vector
    #[inline]
    pub fn index(self) -> usize {
        self as usize
    }

    /// Next direction in service order (wraps West → North)
    #[inline]
    pub fn next(self) -> Self {
        match self {
            Direction::North => Direction::East,
            Direction::East => Direction::South,
            Direction::South => Direction::West,
            Direction::West => Direction::North,
        }
    }

    /// Is this the direction a cycle starts (and completes) on?
    #[inline]
    pub fn starts_cycle(self) -> bool {
        self == Direction::North
    }

    /// Human-readable name
    pub fn name(self) -> &'static str {
        match self {
            Direction::North => "North",
            Direction::East => "East",
            Direction::South => "South",
            Direction::West => "West",
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
