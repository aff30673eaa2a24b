//! Core game primitives.
//!
//! Pure, synchronous building blocks: grid positions, board generation
//! and path validation. Nothing here touches time or I/O.

pub mod position;
pub mod board;
pub mod path;

// Re-export core types
pub use position::Position;
pub use board::{Board, BoardError, BoardGenerator, DiceBoardGenerator, DICE};
pub use path::is_valid_path;
