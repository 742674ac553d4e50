use serde::{Deserialize, Serialize};
use std::fmt;

/// A `(row, col)` lattice coordinate. `row` indexes the width, `col` the height.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Site {
    pub row: usize,
    pub col: usize,
}

impl Site {
    pub const fn new(row: usize, col: usize) -> Self {
        Self { row, col }
    }

    /// Coordinate along `axis`.
    pub fn coord(self, axis: Axis) -> usize {
        match axis {
            Axis::Row => self.row,
            Axis::Col => self.col,
        }
    }

    /// Replace the coordinate along `axis`.
    pub fn with_coord(self, axis: Axis, value: usize) -> Self {
        match axis {
            Axis::Row => Self::new(value, self.col),
            Axis::Col => Self::new(self.row, value),
        }
    }

    /// True when the sites differ by exactly one in exactly one coordinate.
    pub fn is_adjacent(self, other: Site) -> bool {
        self.row.abs_diff(other.row) + self.col.abs_diff(other.col) == 1
    }
}

impl From<(usize, usize)> for Site {
    fn from((row, col): (usize, usize)) -> Self {
        Self::new(row, col)
    }
}

impl fmt::Display for Site {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.row, self.col)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Axis {
    Row,
    Col,
}

/// Unit step along an axis: `Forward` is +1, `Backward` is -1.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Direction {
    Forward,
    Backward,
}

impl Direction {
    pub fn reversed(self) -> Self {
        match self {
            Direction::Forward => Direction::Backward,
            Direction::Backward => Direction::Forward,
        }
    }

    /// Apply the step to `coord` on an axis of length `len`.
    /// Returns `None` when the step would leave `[0, len)`.
    pub fn step(self, coord: usize, len: usize) -> Option<usize> {
        match self {
            Direction::Forward => coord.checked_add(1).filter(|&c| c < len),
            Direction::Backward => coord.checked_sub(1),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn step_stays_inside_axis() {
        assert_eq!(Direction::Forward.step(0, 3), Some(1));
        assert_eq!(Direction::Forward.step(2, 3), None);
        assert_eq!(Direction::Backward.step(0, 3), None);
        assert_eq!(Direction::Backward.step(2, 3), Some(1));
        assert_eq!(Direction::Forward.step(0, 1), None);
    }

    #[test]
    fn adjacency_is_four_connected() {
        let s = Site::new(1, 1);
        assert!(s.is_adjacent(Site::new(0, 1)));
        assert!(s.is_adjacent(Site::new(1, 2)));
        assert!(!s.is_adjacent(Site::new(2, 2)), "diagonal is not adjacent");
        assert!(!s.is_adjacent(s));
        assert!(!s.is_adjacent(Site::new(1, 3)));
    }

    #[test]
    fn with_coord_replaces_only_the_chosen_axis() {
        let s = Site::new(4, 7);
        assert_eq!(s.with_coord(Axis::Row, 5), Site::new(5, 7));
        assert_eq!(s.with_coord(Axis::Col, 6), Site::new(4, 6));
        assert_eq!(s.coord(Axis::Col), 7);
    }
}
