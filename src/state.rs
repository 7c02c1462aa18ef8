//! Application state: the question catalog, live quiz sessions, assistant, profile.
//!
//! This module owns:
//!   - the immutable catalog (shared read-only)
//!   - the registry of HTTP quiz sessions, keyed by session id
//!   - the seed sources for per-session shuffles and ad-hoc question draws
//!   - assistant replies and profile data (from TOML or defaults)
//!
//! Every session transition runs under the registry write lock, so transitions
//! on one session never interleave. Sessions idle for longer than the
//! configured TTL are dropped whenever a new session is registered.

use std::{
    collections::HashMap,
    sync::atomic::{AtomicI64, Ordering},
    sync::{Arc, Mutex},
};

use chrono::{DateTime, Duration, Utc};
use rand::rngs::StdRng;
use rand::{RngCore, SeedableRng};
use tokio::sync::RwLock;
use tracing::{debug, error, info, instrument};
use uuid::Uuid;

use crate::assistant::Assistant;
use crate::clock::{Clock, SystemClock};
use crate::config::{load_config_from_env, static_dir_from_env, QuizConfig};
use crate::error::{QuizError, Result};
use crate::profile::Profile;
use crate::session::{QuizSession, SessionSnapshot};
use crate::store::{Catalog, QuestionStore, DEFAULT_QUESTION_LIMIT};

/// Idle time after which an unfinished HTTP session is dropped.
pub const DEFAULT_SESSION_TTL_SECS: u64 = 30 * 60;
/// Upper bound that still fits a `chrono::Duration`.
const MAX_SESSION_TTL_SECS: u64 = (i64::MAX / 1000) as u64;

/// Registered session plus the last time a client touched it.
pub struct SessionEntry {
    pub session: QuizSession,
    /// Milliseconds since the epoch; atomic so reads can refresh it under the read lock.
    last_touched_ms: AtomicI64,
}

impl SessionEntry {
    fn new(session: QuizSession, now: DateTime<Utc>) -> Self {
        Self { session, last_touched_ms: AtomicI64::new(now.timestamp_millis()) }
    }

    fn touch(&self, now: DateTime<Utc>) {
        self.last_touched_ms.store(now.timestamp_millis(), Ordering::Relaxed);
    }

    fn idle_for(&self, now: DateTime<Utc>) -> Duration {
        Duration::milliseconds(now.timestamp_millis() - self.last_touched_ms.load(Ordering::Relaxed))
    }
}

pub struct AppState {
    pub catalog: Arc<Catalog>,
    pub sessions: RwLock<HashMap<Uuid, SessionEntry>>,
    pub assistant: Assistant,
    pub profile: Profile,
    pub question_limit: usize,
    pub session_ttl: Duration,
    pub static_dir: String,
    clock: Arc<dyn Clock>,
    /// Present when a shuffle seed is configured; hands out per-session seeds.
    seed_source: Option<Mutex<StdRng>>,
    /// Separate stream for question retrieval so it never shifts session orderings.
    retrieval_seed_source: Option<Mutex<StdRng>>,
}

fn next_rng(source: &Option<Mutex<StdRng>>) -> StdRng {
    match source {
        Some(source) => {
            let seed = match source.lock() {
                Ok(mut rng) => rng.next_u64(),
                Err(poisoned) => poisoned.into_inner().next_u64(),
            };
            StdRng::seed_from_u64(seed)
        }
        None => StdRng::from_entropy(),
    }
}

impl AppState {
    /// Build state from env: load config, pick the catalog, set up assistant and profile.
    #[instrument(level = "info", skip_all)]
    pub fn new() -> Self {
        let cfg = load_config_from_env().unwrap_or_default();
        let mut state = Self::from_config(&cfg);
        state.static_dir = static_dir_from_env();
        state
    }

    /// Build state from an already parsed config. An invalid custom bank is
    /// logged and replaced by the built-in catalog.
    pub fn from_config(cfg: &QuizConfig) -> Self {
        Self::from_config_with_clock(cfg, Arc::new(SystemClock))
    }

    pub fn from_config_with_clock(cfg: &QuizConfig, clock: Arc<dyn Clock>) -> Self {
        let catalog = match cfg.catalog() {
            Ok(Some(c)) => {
                info!(target: "avto_quiz", categories = c.list_categories().len(), questions = c.question_count(), "Using custom question bank");
                c
            }
            Ok(None) => Catalog::builtin(),
            Err(e) => {
                error!(target: "avto_quiz", error = %e, "Invalid custom question bank; using built-in catalog");
                Catalog::builtin()
            }
        };

        let mut state = Self::with_catalog(catalog, cfg.quiz.shuffle_seed, clock);
        state.question_limit = cfg.quiz.question_limit;
        state.session_ttl = Duration::seconds(cfg.quiz.session_ttl_secs.min(MAX_SESSION_TTL_SECS) as i64);
        state.assistant = cfg.assistant.to_assistant();
        state.profile = cfg.profile.clone().into_profile();
        state
    }

    /// Minimal state around an explicit catalog; defaults everywhere else.
    pub fn with_catalog(catalog: Catalog, shuffle_seed: Option<u64>, clock: Arc<dyn Clock>) -> Self {
        if shuffle_seed.is_some() {
            info!(target: "avto_quiz", "Shuffle seed configured; question order is reproducible");
        }
        Self {
            catalog: Arc::new(catalog),
            sessions: RwLock::new(HashMap::new()),
            assistant: Assistant::default(),
            profile: Profile::default(),
            question_limit: DEFAULT_QUESTION_LIMIT,
            session_ttl: Duration::seconds(DEFAULT_SESSION_TTL_SECS as i64),
            static_dir: "./static".into(),
            clock,
            seed_source: shuffle_seed.map(|s| Mutex::new(StdRng::seed_from_u64(s))),
            retrieval_seed_source: shuffle_seed.map(|s| Mutex::new(StdRng::seed_from_u64(s ^ 0x5151_5151_5151_5151))),
        }
    }

    /// Random source for one new session.
    pub fn session_rng(&self) -> StdRng {
        next_rng(&self.seed_source)
    }

    /// Random source for one question retrieval outside a session.
    pub fn retrieval_rng(&self) -> StdRng {
        next_rng(&self.retrieval_seed_source)
    }

    /// Start a standalone session (not registered); used by WebSocket connections.
    pub fn new_session(&self, category_id: u32) -> Result<QuizSession> {
        QuizSession::start(
            self.catalog.as_ref(),
            category_id,
            self.question_limit,
            self.session_rng(),
            self.clock.clone(),
        )
    }

    /// Start and register a session; returns its id and first snapshot.
    #[instrument(level = "info", skip(self))]
    pub async fn start_session(&self, category_id: u32) -> Result<(Uuid, SessionSnapshot)> {
        let session = self.new_session(category_id)?;
        let snapshot = session.snapshot();
        let id = Uuid::new_v4();
        let now = self.clock.now();
        let mut sessions = self.sessions.write().await;
        self.purge_idle(&mut sessions, now);
        sessions.insert(id, SessionEntry::new(session, now));
        info!(target: "quiz", %id, category_id, live = sessions.len(), "Session registered");
        Ok((id, snapshot))
    }

    fn purge_idle(&self, sessions: &mut HashMap<Uuid, SessionEntry>, now: DateTime<Utc>) {
        let before = sessions.len();
        sessions.retain(|_, entry| entry.idle_for(now) <= self.session_ttl);
        let dropped = before - sessions.len();
        if dropped > 0 {
            debug!(target: "quiz", dropped, "Dropped idle sessions");
        }
    }

    /// Current snapshot of a registered session, taken under the read lock.
    pub async fn session_snapshot(&self, id: Uuid) -> Result<SessionSnapshot> {
        let sessions = self.sessions.read().await;
        let entry = sessions.get(&id).ok_or(QuizError::SessionNotFound(id))?;
        entry.touch(self.clock.now());
        Ok(entry.session.snapshot())
    }

    /// Run one transition on a registered session under the write lock.
    pub async fn with_session<T>(
        &self,
        id: Uuid,
        op: impl FnOnce(&mut QuizSession) -> Result<T>,
    ) -> Result<T> {
        let mut sessions = self.sessions.write().await;
        let entry = sessions.get_mut(&id).ok_or(QuizError::SessionNotFound(id))?;
        entry.touch(self.clock.now());
        op(&mut entry.session)
    }

    #[instrument(level = "debug", skip(self))]
    pub async fn end_session(&self, id: Uuid) -> Result<()> {
        match self.sessions.write().await.remove(&id) {
            Some(_) => {
                info!(target: "quiz", %id, "Session ended");
                Ok(())
            }
            None => Err(QuizError::SessionNotFound(id)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::testing::ManualClock;
    use crate::config::parse_config;

    fn question_ids(session: &QuizSession) -> Vec<u32> {
        session.questions().iter().map(|q| q.id).collect()
    }

    fn manual_state(clock: Arc<ManualClock>) -> AppState {
        AppState::with_catalog(Catalog::builtin(), Some(3), clock)
    }

    #[tokio::test]
    async fn idle_session_is_dropped_on_next_start() {
        let clock = Arc::new(ManualClock::new());
        let state = manual_state(clock.clone());

        let (stale, _) = state.start_session(1).await.unwrap();
        clock.advance(Duration::seconds(DEFAULT_SESSION_TTL_SECS as i64 + 1));
        let (fresh, _) = state.start_session(2).await.unwrap();

        let sessions = state.sessions.read().await;
        assert_eq!(sessions.len(), 1);
        assert!(sessions.contains_key(&fresh));
        drop(sessions);
        assert!(matches!(state.session_snapshot(stale).await, Err(QuizError::SessionNotFound(_))));
    }

    #[tokio::test]
    async fn activity_keeps_a_session_alive() {
        let clock = Arc::new(ManualClock::new());
        let state = manual_state(clock.clone());
        let half_ttl = Duration::seconds(DEFAULT_SESSION_TTL_SECS as i64 / 2 + 1);

        let (polled, _) = state.start_session(1).await.unwrap();
        let (answered, _) = state.start_session(1).await.unwrap();
        clock.advance(half_ttl);
        state.session_snapshot(polled).await.unwrap();
        state.with_session(answered, |s| s.select_answer(0)).await.unwrap();
        clock.advance(half_ttl);
        state.start_session(3).await.unwrap();

        let sessions = state.sessions.read().await;
        assert_eq!(sessions.len(), 3);
        assert!(sessions.contains_key(&polled));
        assert!(sessions.contains_key(&answered));
    }

    #[tokio::test]
    async fn configured_ttl_is_used() {
        let cfg = parse_config("[quiz]\nsession_ttl_secs = 60").unwrap();
        let clock = Arc::new(ManualClock::new());
        let state = AppState::from_config_with_clock(&cfg, clock.clone());
        assert_eq!(state.session_ttl, Duration::seconds(60));

        state.start_session(1).await.unwrap();
        clock.advance(Duration::seconds(61));
        state.start_session(1).await.unwrap();
        assert_eq!(state.sessions.read().await.len(), 1);
    }

    #[tokio::test]
    async fn snapshot_of_unknown_session_is_not_found() {
        let state = manual_state(Arc::new(ManualClock::new()));
        let id = Uuid::new_v4();
        assert!(matches!(state.session_snapshot(id).await, Err(QuizError::SessionNotFound(got)) if got == id));
    }

    #[test]
    fn invalid_bank_falls_back_to_builtin_catalog() {
        let cfg = parse_config(
            r#"
              [[categories]]
              id = 1
              name = "Only"

              [[questions]]
              id = 1
              category_id = 7
              text = "Orphan?"
              options = ["a", "b"]
              correct_answer_index = 0
            "#,
        )
        .unwrap();
        let state = AppState::from_config(&cfg);
        assert_eq!(state.catalog.question_count(), 30);
        assert_eq!(state.catalog.list_categories().len(), 6);
    }

    #[test]
    fn same_shuffle_seed_gives_same_session_orders() {
        let a = AppState::with_catalog(Catalog::builtin(), Some(42), Arc::new(SystemClock));
        let b = AppState::with_catalog(Catalog::builtin(), Some(42), Arc::new(SystemClock));
        for category_id in [1, 1, 4] {
            let left = a.new_session(category_id).unwrap();
            let right = b.new_session(category_id).unwrap();
            assert_eq!(question_ids(&left), question_ids(&right));
        }
    }

    #[test]
    fn question_retrieval_does_not_shift_session_orders() {
        let a = AppState::with_catalog(Catalog::builtin(), Some(42), Arc::new(SystemClock));
        let b = AppState::with_catalog(Catalog::builtin(), Some(42), Arc::new(SystemClock));

        let mut rng = a.retrieval_rng();
        a.catalog.questions_for_category(1, 10, &mut rng).unwrap();

        let left = a.new_session(1).unwrap();
        let right = b.new_session(1).unwrap();
        assert_eq!(question_ids(&left), question_ids(&right));
    }
}
