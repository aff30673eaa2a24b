//! Submission Outcomes
//!
//! Result of checking a traced path. Rejections are ordinary outcomes, not errors.

use std::fmt;

use serde::{Serialize, Deserialize};

/// Why a submission was turned down.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RejectReason {
    /// No session, or the session has finished.
    NoActiveGame,
    /// Path revisits a cell or jumps between non-adjacent cells.
    InvalidPath,
    /// Fewer letters than the minimum word length.
    TooShort,
    /// Word is not in the dictionary.
    NotInDictionary,
    /// Word was already found this session.
    AlreadySubmitted,
}

impl RejectReason {
    /// Human-readable reason.
    pub fn as_str(self) -> &'static str {
        match self {
            RejectReason::NoActiveGame => "no active game",
            RejectReason::InvalidPath => "invalid path",
            RejectReason::TooShort => "too short",
            RejectReason::NotInDictionary => "not in dictionary",
            RejectReason::AlreadySubmitted => "already submitted",
        }
    }
}

impl fmt::Display for RejectReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Outcome of a submission.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubmissionResult {
    /// Whether the word was accepted.
    pub valid: bool,
    /// Spelled word; absent only when there was no board to spell from.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub word: Option<String>,
    /// Rejection reason when `valid` is false.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reason: Option<RejectReason>,
}

impl SubmissionResult {
    /// Accepted word.
    pub fn accepted(word: String) -> Self {
        Self { valid: true, word: Some(word), reason: None }
    }

    /// Rejected submission.
    pub fn rejected(reason: RejectReason, word: Option<String>) -> Self {
        Self { valid: false, word, reason: Some(reason) }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reason_text() {
        assert_eq!(RejectReason::NoActiveGame.to_string(), "no active game");
        assert_eq!(RejectReason::AlreadySubmitted.to_string(), "already submitted");
    }

    #[test]
    fn test_no_active_game_omits_word() {
        let result = SubmissionResult::rejected(RejectReason::NoActiveGame, None);
        let json = serde_json::to_string(&result).unwrap();
        assert_eq!(json, r#"{"valid":false,"reason":"no_active_game"}"#);
    }

    #[test]
    fn test_accepted_json() {
        let json = serde_json::to_string(&SubmissionResult::accepted("CAT".into())).unwrap();
        assert_eq!(json, r#"{"valid":true,"word":"CAT"}"#);
    }
}
