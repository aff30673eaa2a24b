//! # Word Grid Game Server
//!
//! Timed letter-grid word finding: a 4x4 board is rolled from sixteen dice,
//! the player traces paths of touching cells, and each path is checked
//! against the board, the dictionary and the words already found.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                    WORD GRID SERVER                          │
//! ├─────────────────────────────────────────────────────────────┤
//! │  core/           - Pure game primitives                      │
//! │  ├── position.rs - Grid coordinates and adjacency            │
//! │  ├── board.rs    - Dice pool, board rolling, spelling        │
//! │  └── path.rs     - Traced path legality                      │
//! │                                                              │
//! │  game/           - Session logic                             │
//! │  ├── dictionary.rs - Word list membership                    │
//! │  ├── session.rs  - Session, status, accepted words           │
//! │  ├── submission.rs - Submission outcomes                     │
//! │  └── engine.rs   - Start / submit / state / timed expiry     │
//! │                                                              │
//! │  network/        - WebSocket adapter                         │
//! │  ├── server.rs   - WebSocket server                          │
//! │  └── protocol.rs - Message types                             │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Session Lifecycle
//!
//! `Waiting -> InProgress -> Finished`. A session finishes only when its
//! clock runs out; a new `start` replaces the current session outright and
//! cancels its timer.

#![warn(missing_docs)]
#![warn(clippy::all)]
#![deny(unsafe_code)]

pub mod core;
pub mod game;
pub mod network;

// Re-export commonly used types
pub use core::position::Position;
pub use core::board::{Board, BoardGenerator, DiceBoardGenerator};
pub use core::path::is_valid_path;
pub use game::dictionary::Dictionary;
pub use game::engine::{EngineError, GameState, SessionEngine};
pub use game::session::{Session, SessionEnded, Status, Word};
pub use game::submission::{RejectReason, SubmissionResult};

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Board side length.
pub const GRID_SIZE: usize = 4;

/// Minimum letters in an acceptable word. "Qu" counts as two.
pub const MIN_WORD_LENGTH: usize = 3;

/// Session length used when a start request does not name one (seconds).
pub const DEFAULT_DURATION_SECS: i64 = 180;

/// Longest allowed session (seconds).
pub const MAX_DURATION_SECS: u32 = 3600;
