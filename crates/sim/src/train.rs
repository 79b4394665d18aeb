//! Train descriptors shared by the roster loader and the scheduling core.

use std::fmt;

/// Travel direction over the shared main track.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Direction {
    East,
    West,
}

impl Direction {
    /// The direction trains on the other side travel.
    pub fn opposite(self) -> Direction {
        match self {
            Direction::East => Direction::West,
            Direction::West => Direction::East,
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // pad() so log format widths apply.
        match self {
            Direction::East => f.pad("East"),
            Direction::West => f.pad("West"),
        }
    }
}

/// Dispatch priority class of a train.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Priority {
    High,
    Low,
}

/// Immutable description of one train, as read from the roster.
///
/// Ids follow input order starting at 0 and never change. Loading and
/// crossing times are in simulation time units (see `SimConfig`).
#[derive(Debug, Clone)]
pub struct TrainSpec {
    pub id: u32,
    pub direction: Direction,
    pub priority: Priority,
    /// Time spent loading before the train becomes ready, in units.
    pub loading_time: u32,
    /// Time the train occupies the track once granted, in units.
    pub crossing_time: u32,
}
