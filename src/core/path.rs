//! Path Validation
//!
//! Structural legality of a traced path: every step moves to a touching
//! cell and no cell is visited twice. Grid bounds are not checked here;
//! spelling a path against a board does that.

use std::collections::BTreeSet;

use super::position::Position;

/// Check whether `path` is a legal trace.
///
/// Empty and single-cell paths are valid.
pub fn is_valid_path(path: &[Position]) -> bool {
    has_no_repeated_positions(path) && is_connected(path)
}

/// Every cell appears at most once.
pub fn has_no_repeated_positions(path: &[Position]) -> bool {
    let mut seen = BTreeSet::new();
    path.iter().all(|pos| seen.insert(*pos))
}

/// Every consecutive pair of cells is adjacent.
pub fn is_connected(path: &[Position]) -> bool {
    path.windows(2).all(|pair| pair[0].is_adjacent(&pair[1]))
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn path(cells: &[(i32, i32)]) -> Vec<Position> {
        cells.iter().copied().map(Position::from).collect()
    }

    #[test]
    fn test_trivial_paths() {
        assert!(is_valid_path(&[]));
        assert!(is_valid_path(&path(&[(2, 2)])));
    }

    #[test]
    fn test_connected_path() {
        assert!(is_valid_path(&path(&[(0, 0), (0, 1), (1, 1)])));
        assert!(is_valid_path(&path(&[(0, 0), (1, 1), (2, 2), (3, 3), (3, 2)])));
    }

    #[test]
    fn test_gap_rejected() {
        assert!(!is_valid_path(&path(&[(0, 0), (0, 2)])));
        assert!(!is_connected(&path(&[(0, 0), (0, 2)])));
    }

    #[test]
    fn test_revisit_rejected() {
        let p = path(&[(0, 0), (0, 1), (0, 0)]);
        assert!(is_connected(&p));
        assert!(!has_no_repeated_positions(&p));
        assert!(!is_valid_path(&p));
    }

    #[test]
    fn test_non_consecutive_revisit_rejected() {
        // Square loop back to the start cell.
        let p = path(&[(0, 0), (0, 1), (1, 1), (1, 0), (0, 0)]);
        assert!(!is_valid_path(&p));
    }

    #[test]
    fn test_stationary_step_rejected() {
        assert!(!is_valid_path(&path(&[(1, 1), (1, 1)])));
    }

    fn naive_is_valid(p: &[Position]) -> bool {
        for i in 0..p.len() {
            for j in (i + 1)..p.len() {
                if p[i] == p[j] {
                    return false;
                }
            }
        }
        for i in 1..p.len() {
            let dr = (p[i].row as i64 - p[i - 1].row as i64).abs();
            let dc = (p[i].col as i64 - p[i - 1].col as i64).abs();
            if dr > 1 || dc > 1 {
                return false;
            }
        }
        true
    }

    proptest! {
        #[test]
        fn prop_matches_pairwise_definition(
            cells in prop::collection::vec((0i32..4, 0i32..4), 0..10)
        ) {
            let p = path(&cells);
            prop_assert_eq!(is_valid_path(&p), naive_is_valid(&p));
        }

        #[test]
        fn prop_extreme_coordinates_do_not_panic(
            cells in prop::collection::vec((any::<i32>(), any::<i32>()), 0..6)
        ) {
            let p = path(&cells);
            prop_assert_eq!(is_valid_path(&p), naive_is_valid(&p));
        }

        #[test]
        fn prop_prefix_of_valid_path_is_valid(
            cells in prop::collection::vec((0i32..4, 0i32..4), 0..10),
            cut in 0usize..10
        ) {
            let p = path(&cells);
            if is_valid_path(&p) {
                let cut = cut.min(p.len());
                prop_assert!(is_valid_path(&p[..cut]));
            }
        }
    }
}
