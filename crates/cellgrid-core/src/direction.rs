//! Travel directions for keyboard navigation

use crate::cell::CellAddress;

/// Grid axis
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum Axis {
    /// Travel changes the row index
    Row,
    /// Travel changes the column index
    Col,
}

/// Sign of travel along an axis
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum Step {
    /// Towards lower indices (-1)
    Backward,
    /// Towards higher indices (+1)
    Forward,
}

impl Step {
    pub fn delta(self) -> i64 {
        match self {
            Step::Backward => -1,
            Step::Forward => 1,
        }
    }
}

/// Arrow-key direction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum Direction {
    Up,
    Down,
    Left,
    Right,
}

impl Direction {
    pub fn axis(self) -> Axis {
        match self {
            Direction::Up | Direction::Down => Axis::Row,
            Direction::Left | Direction::Right => Axis::Col,
        }
    }

    pub fn step(self) -> Step {
        match self {
            Direction::Up | Direction::Left => Step::Backward,
            Direction::Down | Direction::Right => Step::Forward,
        }
    }

    pub fn from_parts(axis: Axis, step: Step) -> Self {
        match (axis, step) {
            (Axis::Row, Step::Backward) => Direction::Up,
            (Axis::Row, Step::Forward) => Direction::Down,
            (Axis::Col, Step::Backward) => Direction::Left,
            (Axis::Col, Step::Forward) => Direction::Right,
        }
    }

    /// Neighbouring address one cell away, `None` below zero
    pub fn advance(self, addr: CellAddress) -> Option<CellAddress> {
        match self {
            Direction::Up => addr.offset(0, -1),
            Direction::Down => addr.offset(0, 1),
            Direction::Left => addr.offset(-1, 0),
            Direction::Right => addr.offset(1, 0),
        }
    }
}

impl Axis {
    /// Coordinate of `addr` on this axis
    pub fn of(self, addr: CellAddress) -> u32 {
        match self {
            Axis::Row => addr.row,
            Axis::Col => addr.col,
        }
    }

    /// Copy of `addr` with this axis set to `value`
    pub fn with(self, addr: CellAddress, value: u32) -> CellAddress {
        match self {
            Axis::Row => CellAddress::new(addr.col, value),
            Axis::Col => CellAddress::new(value, addr.row),
        }
    }
}
