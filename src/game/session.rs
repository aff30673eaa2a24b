//! Session State
//!
//! One timed round of play: the board, the clock, and the words found so far.

use std::time::Duration;

use chrono::{DateTime, Utc};
use serde::{Serialize, Deserialize};
use tokio::time::Instant;
use uuid::Uuid;

use crate::core::board::Board;
use crate::core::position::Position;

// =============================================================================
// STATUS
// =============================================================================

/// Lifecycle status of the arena.
///
/// A created session starts `InProgress`; the only transition is to
/// `Finished`, driven by the clock.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Status {
    /// No session has been started.
    #[default]
    Waiting,
    /// Round running, submissions accepted.
    InProgress,
    /// Time is up.
    Finished,
}

// =============================================================================
// WORD
// =============================================================================

/// An accepted submission. Never modified once recorded.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Word {
    /// Upper-cased spelling.
    pub text: String,
    /// Path that spelled it.
    pub path: Vec<Position>,
    /// When it was accepted.
    pub submitted_at: DateTime<Utc>,
}

// =============================================================================
// SESSION
// =============================================================================

/// A single round.
#[derive(Clone, Debug)]
pub struct Session {
    /// Wire identity of the round.
    pub id: Uuid,
    /// Engine generation that created this session.
    pub generation: u64,
    /// The letter grid.
    pub board: Board,
    /// Wall-clock start time.
    pub started_at: DateTime<Utc>,
    /// Round length in seconds.
    pub duration_secs: u32,
    /// Current status.
    pub status: Status,
    /// Accepted words in discovery order.
    pub accepted_words: Vec<Word>,
    /// Monotonic deadline (tokio clock).
    deadline: Instant,
}

impl Session {
    /// Create an in-progress session whose clock starts at `now`.
    pub(crate) fn new(generation: u64, board: Board, duration_secs: u32, now: Instant) -> Self {
        Self {
            id: Uuid::new_v4(),
            generation,
            board,
            started_at: Utc::now(),
            duration_secs,
            status: Status::InProgress,
            accepted_words: Vec::new(),
            deadline: now + Duration::from_secs(duration_secs as u64),
        }
    }

    /// Whether submissions are accepted.
    pub fn is_in_progress(&self) -> bool {
        self.status == Status::InProgress
    }

    /// When the round ends.
    pub fn deadline(&self) -> Instant {
        self.deadline
    }

    /// Whether the deadline has been reached at `now`.
    pub fn is_due(&self, now: Instant) -> bool {
        now >= self.deadline
    }

    /// Play time left at `now`; zero once finished.
    pub fn time_remaining(&self, now: Instant) -> Duration {
        match self.status {
            Status::InProgress => self.deadline.saturating_duration_since(now),
            _ => Duration::ZERO,
        }
    }

    /// Number of words found.
    pub fn word_count(&self) -> usize {
        self.accepted_words.len()
    }

    /// Check whether a word was already accepted, ignoring case.
    pub fn has_word(&self, text: &str) -> bool {
        let needle = text.to_lowercase();
        self.accepted_words.iter().any(|w| w.text.to_lowercase() == needle)
    }

    /// Append an accepted word.
    pub(crate) fn record(&mut self, word: Word) {
        debug_assert!(!self.has_word(&word.text));
        self.accepted_words.push(word);
    }

    /// Transition `InProgress -> Finished`.
    ///
    /// Returns the end record only on the transition itself, so callers
    /// can notify exactly once.
    pub(crate) fn finish(&mut self) -> Option<SessionEnded> {
        if self.status != Status::InProgress {
            return None;
        }
        self.status = Status::Finished;

        Some(SessionEnded {
            session_id: self.id,
            generation: self.generation,
            word_count: self.word_count(),
            words: self.accepted_words.iter().map(|w| w.text.clone()).collect(),
        })
    }
}

/// Emitted once when a session runs out of time.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionEnded {
    /// Session that finished.
    pub session_id: Uuid,
    /// Its engine generation.
    pub generation: u64,
    /// Words found (the score).
    pub word_count: usize,
    /// Found words in discovery order.
    pub words: Vec<String>,
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn test_session(duration_secs: u32) -> Session {
        let board = Board::from_rows(vec![vec!["C", "A"], vec!["T", "S"]]).unwrap();
        Session::new(1, board, duration_secs, Instant::now())
    }

    fn word(text: &str) -> Word {
        Word {
            text: text.to_string(),
            path: vec![Position::new(0, 0)],
            submitted_at: Utc::now(),
        }
    }

    #[test]
    fn test_new_session_in_progress() {
        let session = test_session(60);
        assert_eq!(session.status, Status::InProgress);
        assert!(session.is_in_progress());
        assert!(session.accepted_words.is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn test_deadline_and_remaining() {
        let session = test_session(10);
        let start = Instant::now();

        assert!(!session.is_due(start));
        assert_eq!(session.time_remaining(start), Duration::from_secs(10));
        assert_eq!(session.time_remaining(start + Duration::from_secs(4)), Duration::from_secs(6));
        assert!(session.is_due(start + Duration::from_secs(10)));
        assert_eq!(session.time_remaining(start + Duration::from_secs(30)), Duration::ZERO);
    }

    #[test]
    fn test_has_word_ignores_case() {
        let mut session = test_session(60);
        session.record(word("CAT"));
        assert!(session.has_word("cat"));
        assert!(session.has_word("Cat"));
        assert!(!session.has_word("cats"));
    }

    #[test]
    fn test_finish_only_once() {
        let mut session = test_session(60);
        session.record(word("CAT"));

        let ended = session.finish().expect("first finish transitions");
        assert_eq!(ended.word_count, 1);
        assert_eq!(ended.words, vec!["CAT".to_string()]);
        assert_eq!(ended.session_id, session.id);
        assert_eq!(session.status, Status::Finished);

        assert!(session.finish().is_none());
        assert_eq!(session.time_remaining(Instant::now()), Duration::ZERO);
    }

    #[test]
    fn test_status_json() {
        assert_eq!(serde_json::to_string(&Status::InProgress).unwrap(), r#""in_progress""#);
        assert_eq!(Status::default(), Status::Waiting);
    }
}
