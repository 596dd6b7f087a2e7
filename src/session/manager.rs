//! Cook session store implementation

use super::{Advance, CookSession, SessionId};
use crate::config::SessionConfig;
use crate::cook::{CookRequest, TimelineStep};
use crate::error::{Error, Result};
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::RwLock;
use tokio::task::JoinHandle;
use tokio::time::Instant;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info};

/// Trait for storing cook sessions
#[async_trait]
pub trait CookSessionStore: Send + Sync {
    /// Store a new session with its cursor on the first step
    async fn create(&self, timeline: Vec<TimelineStep>, request: CookRequest) -> SessionId;

    /// Snapshot of a session
    async fn get(&self, id: &SessionId) -> Option<CookSession>;

    /// First step without moving the cursor
    async fn peek_first(&self, id: &SessionId) -> Option<TimelineStep>;

    /// Step forward; fails only when the session does not exist
    async fn advance(&self, id: &SessionId) -> Result<Advance>;

    /// Drop sessions idle for at least `ttl`, returning how many went
    async fn purge_expired(&self, ttl: Duration) -> usize;

    async fn session_count(&self) -> usize;
}

/// Session data
struct SessionEntry {
    session: CookSession,
    last_touched: Instant,
}

/// In-memory session store implementation
#[derive(Default)]
pub struct InMemoryCookSessionStore {
    sessions: RwLock<HashMap<SessionId, SessionEntry>>,
}

impl InMemoryCookSessionStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl CookSessionStore for InMemoryCookSessionStore {
    async fn create(&self, timeline: Vec<TimelineStep>, request: CookRequest) -> SessionId {
        let id = SessionId::new();
        let steps = timeline.len();
        let entry = SessionEntry {
            session: CookSession::new(id.clone(), timeline, request),
            last_touched: Instant::now(),
        };

        self.sessions.write().await.insert(id.clone(), entry);
        debug!("Created cook session {} with {} steps", id, steps);
        id
    }

    async fn get(&self, id: &SessionId) -> Option<CookSession> {
        self.sessions
            .read()
            .await
            .get(id)
            .map(|entry| entry.session.clone())
    }

    async fn peek_first(&self, id: &SessionId) -> Option<TimelineStep> {
        self.sessions
            .read()
            .await
            .get(id)
            .and_then(|entry| entry.session.first_step().cloned())
    }

    async fn advance(&self, id: &SessionId) -> Result<Advance> {
        // Write lock for the whole step so advances on one session serialise
        let mut sessions = self.sessions.write().await;
        let entry = sessions
            .get_mut(id)
            .ok_or_else(|| Error::SessionNotFound(id.to_string()))?;

        entry.last_touched = Instant::now();
        let outcome = entry.session.advance();
        debug!(
            "Advanced session {} to cursor {}",
            id, entry.session.cursor
        );
        Ok(outcome)
    }

    async fn purge_expired(&self, ttl: Duration) -> usize {
        let mut sessions = self.sessions.write().await;
        let before = sessions.len();
        sessions.retain(|_, entry| entry.last_touched.elapsed() < ttl);
        before - sessions.len()
    }

    async fn session_count(&self) -> usize {
        self.sessions.read().await.len()
    }
}

/// Periodically evict idle sessions until `shutdown` is cancelled
pub fn spawn_sweeper(
    store: Arc<dyn CookSessionStore>,
    config: SessionConfig,
    shutdown: CancellationToken,
) -> JoinHandle<()> {
    tokio::spawn(async move {
        let mut interval = tokio::time::interval(config.sweep_interval());
        loop {
            tokio::select! {
                _ = shutdown.cancelled() => break,
                _ = interval.tick() => {
                    let purged = store.purge_expired(config.idle_ttl()).await;
                    if purged > 0 {
                        info!("Evicted {} idle cook sessions", purged);
                    }
                }
            }
        }
        debug!("Session sweeper stopped");
    })
}
