//! Board Generation
//!
//! A board is a square grid of letter tiles rolled from a fixed pool of
//! sixteen dice. One face is the two-letter "Qu" tile.

use rand::Rng;
use serde::{Serialize, Deserialize};
use thiserror::Error;

use super::position::Position;
use crate::GRID_SIZE;

// =============================================================================
// DICE
// =============================================================================

/// Number of faces on each die.
pub const DIE_FACES: usize = 6;

/// The sixteen dice of the classic 4x4 game.
pub const DICE: [[&str; DIE_FACES]; GRID_SIZE * GRID_SIZE] = [
    ["A", "A", "F", "K", "P", "S"],
    ["A", "A", "E", "E", "G", "N"],
    ["A", "V", "I", "D", "Y", "N"],
    ["C", "M", "P", "F", "E", "D"],
    ["I", "C", "N", "S", "S", "P"],
    ["D", "R", "L", "G", "E", "U"],
    ["P", "C", "K", "H", "D", "Qu"],
    ["B", "U", "E", "C", "L", "S"],
    ["E", "M", "N", "I", "Q", "Z"],
    ["B", "G", "L", "E", "N", "Y"],
    ["O", "U", "T", "E", "S", "P"],
    ["A", "H", "M", "O", "C", "S"],
    ["T", "I", "I", "L", "Z", "R"],
    ["R", "D", "E", "L", "L", "O"],
    ["H", "N", "I", "R", "T", "L"],
    ["I", "D", "R", "T", "Y", "L"],
];

/// Roll one die.
fn roll<R: Rng + ?Sized>(die: &[&'static str; DIE_FACES], rng: &mut R) -> &'static str {
    die[rng.gen_range(0..DIE_FACES)]
}

/// Shuffle a slice in place using Fisher-Yates.
fn shuffle<T, R: Rng + ?Sized>(slice: &mut [T], rng: &mut R) {
    for i in (1..slice.len()).rev() {
        let j = rng.gen_range(0..=i);
        slice.swap(i, j);
    }
}

// =============================================================================
// BOARD
// =============================================================================

/// Board construction and lookup errors.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BoardError {
    /// Rows do not form a non-empty square grid.
    #[error("board must be a non-empty square grid")]
    NotSquare,

    /// A path position does not exist on the board.
    #[error("position ({row}, {col}) is outside the board")]
    PositionOutOfRange {
        /// Offending row.
        row: i32,
        /// Offending column.
        col: i32,
    },
}

/// Square grid of tiles, stored row-major.
///
/// Serializes as a nested array of strings.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(into = "Vec<Vec<String>>", try_from = "Vec<Vec<String>>")]
pub struct Board {
    size: usize,
    tiles: Vec<String>,
}

impl Board {
    /// Build a board from explicit rows.
    pub fn from_rows<S: Into<String>>(rows: Vec<Vec<S>>) -> Result<Self, BoardError> {
        let size = rows.len();
        if size == 0 || rows.iter().any(|row| row.len() != size) {
            return Err(BoardError::NotSquare);
        }
        let tiles = rows.into_iter().flatten().map(Into::into).collect();
        Ok(Self { size, tiles })
    }

    /// Side length of the grid.
    pub fn size(&self) -> usize {
        self.size
    }

    /// Tile at a position, or `None` if off the board.
    pub fn tile(&self, pos: Position) -> Option<&str> {
        pos.to_index(self.size).map(|idx| self.tiles[idx].as_str())
    }

    /// Iterate over rows.
    pub fn rows(&self) -> impl Iterator<Item = &[String]> {
        self.tiles.chunks(self.size)
    }

    /// All tiles in row-major order.
    pub fn tiles(&self) -> &[String] {
        &self.tiles
    }

    /// Spell the word traced by `path`, upper-cased.
    ///
    /// Fails on the first position that is off the board.
    pub fn spell(&self, path: &[Position]) -> Result<String, BoardError> {
        path.iter()
            .map(|pos| {
                self.tile(*pos).ok_or(BoardError::PositionOutOfRange {
                    row: pos.row,
                    col: pos.col,
                })
            })
            .collect::<Result<String, _>>()
            .map(|word| word.to_uppercase())
    }
}

impl From<Board> for Vec<Vec<String>> {
    fn from(board: Board) -> Self {
        board.rows().map(<[String]>::to_vec).collect()
    }
}

impl TryFrom<Vec<Vec<String>>> for Board {
    type Error = BoardError;

    fn try_from(rows: Vec<Vec<String>>) -> Result<Self, Self::Error> {
        Self::from_rows(rows)
    }
}

// =============================================================================
// GENERATION
// =============================================================================

/// Roll a fresh board using the thread-local RNG.
pub fn generate() -> Board {
    generate_with(&mut rand::thread_rng())
}

/// Roll a fresh board from a caller-supplied RNG.
///
/// Each die is rolled once, then the sixteen faces are shuffled across the grid.
pub fn generate_with<R: Rng + ?Sized>(rng: &mut R) -> Board {
    let mut faces: Vec<&'static str> = DICE.iter().map(|die| roll(die, rng)).collect();
    shuffle(&mut faces, rng);

    Board {
        size: GRID_SIZE,
        tiles: faces.into_iter().map(str::to_string).collect(),
    }
}

/// Source of boards for new sessions.
pub trait BoardGenerator: Send + Sync {
    /// Produce the board for a new session.
    fn generate(&self) -> Board;
}

/// Rolls the standard dice pool.
#[derive(Clone, Copy, Debug, Default)]
pub struct DiceBoardGenerator;

impl BoardGenerator for DiceBoardGenerator {
    fn generate(&self) -> Board {
        generate()
    }
}

/// A fixed board replays itself for every session.
impl BoardGenerator for Board {
    fn generate(&self) -> Board {
        self.clone()
    }
}

// =============================================================================
// TESTS
// =============================================================================
