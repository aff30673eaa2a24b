//! Protocol Messages
//!
//! Wire format for client-server communication over WebSocket.
//! All messages are JSON objects tagged by a `type` field.

use chrono::{DateTime, Utc};
use serde::{Serialize, Deserialize};
use tokio::time::Instant;
use uuid::Uuid;

use crate::core::board::{Board, BoardError};
use crate::core::position::Position;
use crate::game::engine::{EngineError, GameState};
use crate::game::session::{Session, SessionEnded, Status, Word};
use crate::game::submission::SubmissionResult;

// =============================================================================
// CLIENT -> SERVER MESSAGES
// =============================================================================

/// Messages sent from client to server.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ClientMessage {
    /// Start a new round, replacing any current one.
    Start(StartRequest),

    /// Submit a traced path.
    Submit(SubmitRequest),

    /// Request the current session and found words.
    GetState,

    /// Ping for latency measurement.
    Ping {
        /// Client timestamp, echoed back.
        timestamp: u64,
    },
}

/// Start request.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct StartRequest {
    /// Round length; the server default applies when absent.
    #[serde(default)]
    pub duration_seconds: Option<i64>,
}

/// Path submission.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SubmitRequest {
    /// Cells in trace order.
    pub path: Vec<Position>,
}

// =============================================================================
// SERVER -> CLIENT MESSAGES
// =============================================================================

/// Messages sent from server to client.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ServerMessage {
    /// A round has started.
    Started(SessionInfo),

    /// Outcome of a submission.
    Submission(SubmissionResult),

    /// Current state snapshot.
    State(GameStateUpdate),

    /// The round ran out of time. Pushed to every connected client.
    SessionEnded(SessionEnded),

    /// Pong response.
    Pong {
        /// Echoed client timestamp.
        timestamp: u64,
        /// Server time (Unix millis).
        server_time: u64,
    },

    /// Error message.
    Error(ServerError),

    /// Server is shutting down.
    Shutdown {
        /// Why.
        reason: String,
    },
}

/// Public view of a session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionInfo {
    /// Session identifier.
    pub session_id: Uuid,
    /// Letter grid as rows.
    pub board: Board,
    /// Wall-clock start.
    pub started_at: DateTime<Utc>,
    /// Round length in seconds.
    pub duration_seconds: u32,
    /// Current status.
    pub status: Status,
    /// Play time left in milliseconds.
    pub time_remaining_ms: u64,
    /// Words found so far.
    pub word_count: usize,
}

impl SessionInfo {
    /// Build the public view of `session` as of `now`.
    pub fn from_session(session: &Session, now: Instant) -> Self {
        Self {
            session_id: session.id,
            board: session.board.clone(),
            started_at: session.started_at,
            duration_seconds: session.duration_secs,
            status: session.status,
            time_remaining_ms: session.time_remaining(now).as_millis() as u64,
            word_count: session.word_count(),
        }
    }
}

/// State snapshot sent in reply to `get_state`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameStateUpdate {
    /// Current session, absent before the first start.
    pub session: Option<SessionInfo>,
    /// Accepted words in discovery order.
    pub words: Vec<Word>,
}

impl GameStateUpdate {
    /// Convert an engine snapshot.
    pub fn from_state(state: GameState, now: Instant) -> Self {
        Self {
            session: state.session.as_ref().map(|s| SessionInfo::from_session(s, now)),
            words: state.words,
        }
    }
}

/// Error details.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerError {
    /// Error code.
    pub code: ErrorCode,
    /// Human-readable message.
    pub message: String,
}

impl From<&EngineError> for ServerError {
    fn from(err: &EngineError) -> Self {
        let code = match err {
            EngineError::InvalidDuration(_) => ErrorCode::InvalidDuration,
            EngineError::Board(BoardError::PositionOutOfRange { .. }) => ErrorCode::InvalidPosition,
            EngineError::Board(BoardError::NotSquare) => ErrorCode::InternalError,
        };
        Self { code, message: err.to_string() }
    }
}

/// Error codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorCode {
    /// Message could not be parsed.
    InvalidInput,
    /// Start duration out of range.
    InvalidDuration,
    /// Submitted path leaves the board.
    InvalidPosition,
    /// Internal error.
    InternalError,
}

// =============================================================================
// SERIALIZATION HELPERS
// =============================================================================

impl ClientMessage {
    /// Serialize to JSON string.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }

    /// Deserialize from JSON string.
    pub fn from_json(s: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(s)
    }
}

impl ServerMessage {
    /// Serialize to JSON string.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }

    /// Deserialize from JSON string.
    pub fn from_json(s: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(s)
    }

    /// Error message helper.
    pub fn error(code: ErrorCode, message: impl Into<String>) -> Self {
        ServerMessage::Error(ServerError { code, message: message.into() })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::submission::RejectReason;

    #[test]
    fn test_parse_submit() {
        let msg = ClientMessage::from_json(
            r#"{"type":"submit","path":[{"row":0,"col":0},{"row":1,"col":1}]}"#,
        )
        .unwrap();

        if let ClientMessage::Submit(req) = msg {
            assert_eq!(req.path, vec![Position::new(0, 0), Position::new(1, 1)]);
        } else {
            panic!("Wrong message type");
        }
    }

    #[test]
    fn test_parse_start_without_duration() {
        let msg = ClientMessage::from_json(r#"{"type":"start"}"#).unwrap();
        assert!(matches!(msg, ClientMessage::Start(StartRequest { duration_seconds: None })));

        let msg = ClientMessage::from_json(r#"{"type":"start","duration_seconds":-3}"#).unwrap();
        assert!(matches!(msg, ClientMessage::Start(StartRequest { duration_seconds: Some(-3) })));
    }

    #[test]
    fn test_parse_get_state_and_ping() {
        assert!(matches!(
            ClientMessage::from_json(r#"{"type":"get_state"}"#).unwrap(),
            ClientMessage::GetState
        ));
        assert!(matches!(
            ClientMessage::from_json(r#"{"type":"ping","timestamp":42}"#).unwrap(),
            ClientMessage::Ping { timestamp: 42 }
        ));
    }

    #[test]
    fn test_unknown_message_rejected() {
        assert!(ClientMessage::from_json(r#"{"type":"join_room"}"#).is_err());
        assert!(ClientMessage::from_json("not json").is_err());
    }

    #[test]
    fn test_submission_message_json() {
        let msg = ServerMessage::Submission(SubmissionResult::rejected(
            RejectReason::TooShort,
            Some("AB".to_string()),
        ));
        let json = msg.to_json().unwrap();
        assert!(json.contains(r#""type":"submission""#));
        assert!(json.contains(r#""reason":"too_short""#));

        if let ServerMessage::Submission(result) = ServerMessage::from_json(&json).unwrap() {
            assert_eq!(result.reason, Some(RejectReason::TooShort));
        } else {
            panic!("Wrong message type");
        }
    }

    #[test]
    fn test_session_ended_json() {
        let msg = ServerMessage::SessionEnded(SessionEnded {
            session_id: Uuid::nil(),
            generation: 3,
            word_count: 1,
            words: vec!["CAT".to_string()],
        });
        let json = msg.to_json().unwrap();
        assert!(json.contains(r#""type":"session_ended""#));
        assert!(json.contains(r#""word_count":1"#));
    }

    #[test]
    fn test_engine_error_codes() {
        let err = ServerError::from(&EngineError::InvalidDuration(0));
        assert_eq!(err.code, ErrorCode::InvalidDuration);

        let err = ServerError::from(&EngineError::Board(BoardError::PositionOutOfRange {
            row: 5,
            col: 0,
        }));
        assert_eq!(err.code, ErrorCode::InvalidPosition);
        assert!(err.message.contains("(5, 0)"));

        let json = ServerMessage::Error(err).to_json().unwrap();
        assert!(json.contains("invalid_position"));
    }

    #[tokio::test(start_paused = true)]
    async fn test_state_update_from_engine_snapshot() {
        let now = Instant::now();
        let empty = GameStateUpdate::from_state(GameState::default(), now);
        assert!(empty.session.is_none());
        assert!(empty.words.is_empty());

        let json = ServerMessage::State(empty).to_json().unwrap();
        assert!(json.contains(r#""session":null"#));
    }
}
