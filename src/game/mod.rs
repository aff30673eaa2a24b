//! Game Logic Module
//!
//! Session lifecycle and word checking.
//!
//! ## Module Structure
//!
//! - `dictionary`: Word list membership
//! - `session`: Session, status and accepted words
//! - `submission`: Submission outcomes and rejection reasons
//! - `engine`: The arena engine (start / submit / state / expiry)

pub mod dictionary;
pub mod session;
pub mod submission;
pub mod engine;

// Re-export key types
pub use dictionary::{Dictionary, DictionaryError};
pub use session::{Session, SessionEnded, Status, Word};
pub use submission::{RejectReason, SubmissionResult};
pub use engine::{EngineError, GameState, SessionEndHook, SessionEngine};
