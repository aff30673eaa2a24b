//! Grid Positions
//!
//! Cell coordinates on the letter grid. A path traced by the player is an
//! ordered sequence of these.

use serde::{Serialize, Deserialize};

/// A `(row, col)` cell coordinate.
///
/// Signed so that coordinates arriving from the wire can be range-checked
/// by the engine instead of failing at deserialization.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Position {
    /// Row index, `0` is the top row.
    pub row: i32,
    /// Column index, `0` is the left column.
    pub col: i32,
}

impl Position {
    /// Create a position.
    pub const fn new(row: i32, col: i32) -> Self {
        Self { row, col }
    }

    /// Check whether two positions touch (8-directional, diagonals included).
    ///
    /// A position is not adjacent to itself.
    #[inline]
    pub fn is_adjacent(&self, other: &Position) -> bool {
        let dr = (self.row as i64 - other.row as i64).abs();
        let dc = (self.col as i64 - other.col as i64).abs();
        dr <= 1 && dc <= 1 && self != other
    }

    /// Check whether the position lies on a `size x size` grid.
    #[inline]
    pub fn in_bounds(&self, size: usize) -> bool {
        let size = size as i64;
        (0..size).contains(&(self.row as i64)) && (0..size).contains(&(self.col as i64))
    }

    /// Row-major index into a `size x size` grid, if in bounds.
    pub fn to_index(&self, size: usize) -> Option<usize> {
        if self.in_bounds(size) {
            Some(self.row as usize * size + self.col as usize)
        } else {
            None
        }
    }
}

impl From<(i32, i32)> for Position {
    fn from((row, col): (i32, i32)) -> Self {
        Self::new(row, col)
    }
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_adjacency_all_directions() {
        let center = Position::new(1, 1);
        for dr in -1..=1 {
            for dc in -1..=1 {
                let other = Position::new(1 + dr, 1 + dc);
                assert_eq!(center.is_adjacent(&other), (dr, dc) != (0, 0));
            }
        }
    }

    #[test]
    fn test_not_adjacent_when_two_apart() {
        assert!(!Position::new(0, 0).is_adjacent(&Position::new(0, 2)));
        assert!(!Position::new(0, 0).is_adjacent(&Position::new(2, 2)));
        assert!(!Position::new(3, 1).is_adjacent(&Position::new(1, 1)));
    }

    #[test]
    fn test_bounds() {
        assert!(Position::new(0, 0).in_bounds(4));
        assert!(Position::new(3, 3).in_bounds(4));
        assert!(!Position::new(4, 0).in_bounds(4));
        assert!(!Position::new(0, -1).in_bounds(4));
        assert!(!Position::new(i32::MIN, i32::MAX).in_bounds(4));
    }

    #[test]
    fn test_to_index() {
        assert_eq!(Position::new(0, 0).to_index(4), Some(0));
        assert_eq!(Position::new(2, 1).to_index(4), Some(9));
        assert_eq!(Position::new(3, 3).to_index(4), Some(15));
        assert_eq!(Position::new(-1, 0).to_index(4), None);
    }

    #[test]
    fn test_json_shape() {
        let json = serde_json::to_string(&Position::new(2, 3)).unwrap();
        assert_eq!(json, r#"{"row":2,"col":3}"#);
    }
}
