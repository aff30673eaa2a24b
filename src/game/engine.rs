//! Session Engine
//!
//! Owns the arena's single session and serializes every mutation behind one
//! lock: `start`, `submit`, and the expiry timer.
//!
//! ## Expiry
//!
//! Each `start` bumps a generation counter and arms a one-shot timer tagged
//! with it. A timer whose generation no longer matches is stale and does
//! nothing. `submit` and `state` also check the deadline under the lock, so
//! a submission at or after the deadline is always rejected even if the
//! timer task has not run yet. Whichever observer performs the transition
//! delivers the end-of-session notice, so it fires once per session.

use std::sync::{Arc, Weak};

use chrono::Utc;
use thiserror::Error;
use tokio::sync::Mutex;
use tokio::task::JoinHandle;
use tokio::time::{sleep_until, Instant};
use tracing::{debug, info, instrument, warn};

use crate::core::board::{BoardError, BoardGenerator, DiceBoardGenerator};
use crate::core::path::is_valid_path;
use crate::core::position::Position;
use crate::game::dictionary::Dictionary;
use crate::game::session::{Session, SessionEnded, Status, Word};
use crate::game::submission::{RejectReason, SubmissionResult};
use crate::{MAX_DURATION_SECS, MIN_WORD_LENGTH};

/// Callback invoked when a session runs out of time.
pub type SessionEndHook = Arc<dyn Fn(&SessionEnded) + Send + Sync>;

/// Caller errors. Engine state is left untouched.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EngineError {
    /// Duration outside `1..=MAX_DURATION_SECS`.
    #[error("duration must be between 1 and {} seconds, got {0}", MAX_DURATION_SECS)]
    InvalidDuration(i64),

    /// Path references a cell that is not on the board.
    #[error(transparent)]
    Board(#[from] BoardError),
}

/// Read-only snapshot returned by [`SessionEngine::state`].
#[derive(Clone, Debug, Default)]
pub struct GameState {
    /// Current session, `None` before the first start.
    pub session: Option<Session>,
    /// Copy of the accepted words.
    pub words: Vec<Word>,
}

impl GameState {
    /// Arena status.
    pub fn status(&self) -> Status {
        self.session.as_ref().map(|s| s.status).unwrap_or(Status::Waiting)
    }
}

// =============================================================================
// ENGINE STATE
// =============================================================================

/// A finished session waiting to be announced outside the lock.
struct EndNotice {
    ended: SessionEnded,
    hook: Option<SessionEndHook>,
}

impl EndNotice {
    fn deliver(self) {
        info!(
            session = %self.ended.session_id,
            words = self.ended.word_count,
            "Session finished"
        );
        if let Some(hook) = self.hook {
            hook(&self.ended);
        }
    }
}

#[derive(Default)]
struct EngineState {
    session: Option<Session>,
    generation: u64,
    timer: Option<JoinHandle<()>>,
    on_session_end: Option<SessionEndHook>,
}

impl EngineState {
    fn notice(&self, ended: Option<SessionEnded>) -> Option<EndNotice> {
        ended.map(|ended| EndNotice {
            ended,
            hook: self.on_session_end.clone(),
        })
    }

    /// Finish the current session if its deadline has passed.
    fn expire_if_due(&mut self, now: Instant) -> Option<EndNotice> {
        let session = self.session.as_mut()?;
        if !session.is_due(now) {
            return None;
        }
        let ended = session.finish()?;
        if let Some(timer) = self.timer.take() {
            timer.abort();
        }
        self.notice(Some(ended))
    }
}

struct EngineInner {
    dictionary: Dictionary,
    generator: Box<dyn BoardGenerator>,
    state: Mutex<EngineState>,
}

impl Drop for EngineInner {
    fn drop(&mut self) {
        if let Some(timer) = self.state.get_mut().timer.take() {
            timer.abort();
        }
    }
}

// =============================================================================
// ENGINE
// =============================================================================

/// Single-arena game engine. Cheap to clone; clones share the arena.
#[derive(Clone)]
pub struct SessionEngine {
    inner: Arc<EngineInner>,
}

impl SessionEngine {
    /// Create an engine that rolls boards from the standard dice.
    pub fn new(dictionary: Dictionary) -> Self {
        Self::with_generator(dictionary, DiceBoardGenerator)
    }

    /// Create an engine with a custom board source.
    pub fn with_generator(dictionary: Dictionary, generator: impl BoardGenerator + 'static) -> Self {
        Self {
            inner: Arc::new(EngineInner {
                dictionary,
                generator: Box::new(generator),
                state: Mutex::new(EngineState::default()),
            }),
        }
    }

    /// The word oracle in use.
    pub fn dictionary(&self) -> &Dictionary {
        &self.inner.dictionary
    }

    /// Register the end-of-session callback, replacing any previous one.
    pub async fn set_on_session_end<F>(&self, hook: F)
    where
        F: Fn(&SessionEnded) + Send + Sync + 'static,
    {
        self.inner.state.lock().await.on_session_end = Some(Arc::new(hook));
    }

    /// Remove the end-of-session callback.
    pub async fn clear_on_session_end(&self) {
        self.inner.state.lock().await.on_session_end = None;
    }

    /// Start a new session, superseding any current one.
    ///
    /// The superseded session's timer is cancelled and it never reports an end.
    #[instrument(skip(self))]
    pub async fn start(&self, duration_secs: i64) -> Result<Session, EngineError> {
        let duration = u32::try_from(duration_secs)
            .ok()
            .filter(|secs| (1..=MAX_DURATION_SECS).contains(secs))
            .ok_or_else(|| {
                warn!("Rejected session duration {}", duration_secs);
                EngineError::InvalidDuration(duration_secs)
            })?;

        let board = self.inner.generator.generate();

        let mut state = self.inner.state.lock().await;
        if let Some(timer) = state.timer.take() {
            timer.abort();
        }
        if let Some(previous) = state.session.as_ref().filter(|s| s.is_in_progress()) {
            debug!(session = %previous.id, "Superseding running session");
        }

        state.generation += 1;
        let session = Session::new(state.generation, board, duration, Instant::now());
        state.timer = Some(self.arm_timer(session.generation, session.deadline()));
        state.session = Some(session.clone());

        info!(
            session = %session.id,
            generation = session.generation,
            "Session started for {}s",
            duration
        );
        Ok(session)
    }

    /// Check a traced path and record the word if it is acceptable.
    ///
    /// Checks run in order: active session, path on board, path shape,
    /// length, dictionary, duplicate. Only acceptance mutates state.
    pub async fn submit(&self, path: &[Position]) -> Result<SubmissionResult, EngineError> {
        let (outcome, notice) = {
            let mut state = self.inner.state.lock().await;
            let notice = state.expire_if_due(Instant::now());
            let outcome = evaluate(&self.inner.dictionary, state.session.as_mut(), path);
            (outcome, notice)
        };

        if let Some(notice) = notice {
            notice.deliver();
        }

        match &outcome {
            Ok(result) if result.valid => debug!(word = ?result.word, "Word accepted"),
            Ok(result) => debug!(word = ?result.word, reason = ?result.reason, "Word rejected"),
            Err(e) => warn!("Submission error: {}", e),
        }
        outcome
    }

    /// Snapshot of the session and a copy of its words.
    pub async fn state(&self) -> GameState {
        let (snapshot, notice) = {
            let mut state = self.inner.state.lock().await;
            let notice = state.expire_if_due(Instant::now());
            let snapshot = GameState {
                session: state.session.clone(),
                words: state
                    .session
                    .as_ref()
                    .map(|s| s.accepted_words.clone())
                    .unwrap_or_default(),
            };
            (snapshot, notice)
        };

        if let Some(notice) = notice {
            notice.deliver();
        }
        snapshot
    }

    /// Spawn the expiry task for `generation`.
    ///
    /// The task holds a weak reference so a dropped engine is not kept alive.
    fn arm_timer(&self, generation: u64, deadline: Instant) -> JoinHandle<()> {
        let engine: Weak<EngineInner> = Arc::downgrade(&self.inner);
        tokio::spawn(async move {
            sleep_until(deadline).await;
            if let Some(inner) = engine.upgrade() {
                SessionEngine { inner }.expire(generation).await;
            }
        })
    }

    async fn expire(&self, generation: u64) {
        let notice = {
            let mut state = self.inner.state.lock().await;
            if state.generation != generation {
                debug!(generation, current = state.generation, "Ignoring stale session timer");
                return;
            }
            state.timer = None;
            let ended = state.session.as_mut().and_then(Session::finish);
            state.notice(ended)
        };

        if let Some(notice) = notice {
            notice.deliver();
        }
    }
}

/// Run the submission checks against the current session.
fn evaluate(
    dictionary: &Dictionary,
    session: Option<&mut Session>,
    path: &[Position],
) -> Result<SubmissionResult, EngineError> {
    let Some(session) = session.filter(|s| s.is_in_progress()) else {
        return Ok(SubmissionResult::rejected(RejectReason::NoActiveGame, None));
    };

    let word = session.board.spell(path)?;

    let rejection = if !is_valid_path(path) {
        Some(RejectReason::InvalidPath)
    } else if word.chars().count() < MIN_WORD_LENGTH {
        Some(RejectReason::TooShort)
    } else if !dictionary.contains(&word) {
        Some(RejectReason::NotInDictionary)
    } else if session.has_word(&word) {
        Some(RejectReason::AlreadySubmitted)
    } else {
        None
    };

    if let Some(reason) = rejection {
        return Ok(SubmissionResult::rejected(reason, Some(word)));
    }

    session.record(Word {
        text: word.clone(),
        path: path.to_vec(),
        submitted_at: Utc::now(),
    });
    Ok(SubmissionResult::accepted(word))
}

// =============================================================================
// TESTS
// =============================================================================
