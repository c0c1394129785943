//! Chat session storage with sliding-window expiry.
//!
//! Sessions live in a HashMap behind a tokio RwLock. Every successful read
//! refreshes the activity timestamp, so the TTL is measured from last access
//! rather than creation. A periodic sweeper removes entries that have gone
//! idle; correctness never depends on it, since reads re-check the timestamp.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::{Duration, Instant};

use serde::{Deserialize, Serialize};
use tokio::sync::{Mutex, RwLock};
use tokio::task::JoinHandle;
use uuid::Uuid;

pub mod provider;

/// Speaker of one conversation turn.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Assistant,
}

/// One query or answer in a conversation. Immutable once appended.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatTurn {
    pub role: Role,
    pub content: String,
}

/// One ongoing conversation, identified by an opaque token.
///
/// Handlers receive clones and commit changes back through
/// [`SessionStore::update`]; the store remains the single owner of the
/// canonical record.
#[derive(Debug, Clone)]
pub struct Session {
    pub id: String,
    /// Provider chosen through the explicit selection action.
    pub selected_provider: Option<String>,
    /// Provider last detected in a user query.
    pub last_mentioned_provider: Option<String>,
    history: Vec<ChatTurn>,
    last_activity: Instant,
}

impl Session {
    /// Fresh session with a random id and no history.
    pub fn new() -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            selected_provider: None,
            last_mentioned_provider: None,
            history: Vec::new(),
            last_activity: Instant::now(),
        }
    }

    /// Full turn history, oldest first.
    pub fn history(&self) -> &[ChatTurn] {
        &self.history
    }

    /// Append one turn to the conversation.
    pub fn append_turn(&mut self, role: Role, content: impl Into<String>) {
        self.history.push(ChatTurn { role, content: content.into() });
    }

    /// Last `n` turns, oldest first.
    pub fn recent_turns(&self, n: usize) -> &[ChatTurn] {
        let start = self.history.len().saturating_sub(n);
        &self.history[start..]
    }

    /// Apply an explicit provider selection.
    ///
    /// A changed selection clears the turn history and the inferred
    /// last-mentioned provider, so one conversation never mixes answers
    /// scoped to different providers. Selecting the current value again
    /// changes nothing. Returns whether the selection changed.
    pub fn set_provider(&mut self, provider: Option<String>) -> bool {
        if self.selected_provider == provider {
            return false;
        }
        self.history.clear();
        self.last_mentioned_provider = None;
        self.selected_provider = provider;
        true
    }
}

impl Default for Session {
    fn default() -> Self {
        Self::new()
    }
}

/// Concurrency-safe map of chat sessions with TTL-based expiry.
pub struct SessionStore {
    sessions: Arc<RwLock<HashMap<String, Session>>>,
    ttl: Duration,
    sweeper: Mutex<Option<JoinHandle<()>>>,
}

impl SessionStore {
    /// Create a store with the given idle TTL. Spawns nothing; call
    /// [`start_sweeper`](Self::start_sweeper) to begin housekeeping.
    pub fn new(ttl: Duration) -> Self {
        Self { sessions: Arc::new(RwLock::new(HashMap::new())), ttl, sweeper: Mutex::new(None) }
    }

    /// Create, insert, and return a fresh session. Always succeeds.
    pub async fn create(&self) -> Session {
        let session = Session::new();
        self.sessions.write().await.insert(session.id.clone(), session.clone());
        tracing::debug!(session = %session.id, "session created");
        session
    }

    /// Look up a live session, refreshing its activity timestamp.
    ///
    /// An entry idle past the TTL is treated as absent even when the sweeper
    /// has not removed it yet. The timestamp refresh is a write, so the
    /// lookup takes the write lock.
    pub async fn get(&self, id: &str) -> Option<Session> {
        let mut sessions = self.sessions.write().await;
        let session = sessions.get_mut(id)?;
        if session.last_activity.elapsed() > self.ttl {
            return None;
        }
        session.last_activity = Instant::now();
        Some(session.clone())
    }

    /// Overwrite the stored entry and refresh its activity timestamp.
    /// Last-writer-wins; there is no optimistic concurrency check.
    pub async fn update(&self, mut session: Session) {
        session.last_activity = Instant::now();
        self.sessions.write().await.insert(session.id.clone(), session);
    }

    /// Number of entries currently in the map, expired ones included.
    pub async fn session_count(&self) -> usize {
        self.sessions.read().await.len()
    }

    /// Remove every entry idle past the TTL. Returns how many were removed.
    pub async fn sweep_expired(&self) -> usize {
        sweep(&self.sessions, self.ttl).await
    }

    /// Spawn the periodic sweep task. A no-op if one is already running.
    pub async fn start_sweeper(&self, every: Duration) {
        let mut slot = self.sweeper.lock().await;
        if slot.is_some() {
            tracing::warn!("session sweeper already running");
            return;
        }

        let sessions = Arc::clone(&self.sessions);
        let ttl = self.ttl;
        let handle = tokio::spawn(async move {
            let mut ticker = tokio::time::interval(every);
            // The first tick completes immediately; skip it so the initial
            // sweep happens one full interval after startup.
            ticker.tick().await;
            loop {
                ticker.tick().await;
                let removed = sweep(&sessions, ttl).await;
                if removed > 0 {
                    tracing::debug!(removed, "swept expired sessions");
                }
            }
        });

        *slot = Some(handle);
        tracing::info!(interval_secs = every.as_secs(), "session sweeper started");
    }

    /// Abort the sweep task, if running.
    pub async fn stop_sweeper(&self) {
        if let Some(handle) = self.sweeper.lock().await.take() {
            handle.abort();
            tracing::info!("session sweeper stopped");
        }
    }
}

async fn sweep(sessions: &RwLock<HashMap<String, Session>>, ttl: Duration) -> usize {
    let mut sessions = sessions.write().await;
    let before = sessions.len();
    sessions.retain(|_, session| session.last_activity.elapsed() <= ttl);
    before - sessions.len()
}
