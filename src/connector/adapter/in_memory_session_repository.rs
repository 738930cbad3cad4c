use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use tokio::sync::Mutex;
use tracing::{debug, info, warn};

use crate::application::{SessionHandle, SessionRepository};
use crate::domain::{current_timestamp_millis, DomainError, Session};

pub const DEFAULT_SESSION_IDLE: Duration = Duration::from_secs(30 * 60);
pub const DEFAULT_MAX_SESSIONS: usize = 1024;

/// Sessions kept in process memory, keyed by id. Lost on restart.
///
/// A session ends once it has been idle for the configured time; expired
/// entries are dropped whenever the map is locked by `create` or `find`.
/// When the map is full, `create` evicts the least recently used idle
/// session. Sessions whose lock is held are in use and never evicted.
pub struct InMemorySessionRepository {
    sessions: Arc<Mutex<HashMap<String, SessionHandle>>>,
    idle_ttl_ms: i64,
    max_sessions: usize,
}

impl InMemorySessionRepository {
    pub fn new(idle_ttl: Duration, max_sessions: usize) -> Self {
        Self {
            sessions: Arc::new(Mutex::new(HashMap::new())),
            idle_ttl_ms: i64::try_from(idle_ttl.as_millis()).unwrap_or(i64::MAX),
            max_sessions: max_sessions.max(1),
        }
    }

    fn prune_expired(&self, sessions: &mut HashMap<String, SessionHandle>) {
        let now = current_timestamp_millis();
        let before = sessions.len();
        sessions.retain(|_, handle| match handle.try_lock() {
            Ok(session) => !session.is_idle_since(now, self.idle_ttl_ms),
            Err(_) => true,
        });
        let expired = before - sessions.len();
        if expired > 0 {
            debug!("Expired {} idle sessions", expired);
        }
    }

    fn evict_least_recent(sessions: &mut HashMap<String, SessionHandle>) -> bool {
        let oldest = sessions
            .iter()
            .filter_map(|(id, handle)| {
                handle
                    .try_lock()
                    .ok()
                    .map(|session| (session.updated_at(), id.clone()))
            })
            .min();

        match oldest {
            Some((_, id)) => {
                sessions.remove(&id);
                debug!("Evicted session {} to stay under the limit", id);
                true
            }
            None => false,
        }
    }
}

impl Default for InMemorySessionRepository {
    fn default() -> Self {
        Self::new(DEFAULT_SESSION_IDLE, DEFAULT_MAX_SESSIONS)
    }
}

#[async_trait]
impl SessionRepository for InMemorySessionRepository {
    async fn create(&self) -> Result<SessionHandle, DomainError> {
        let mut sessions = self.sessions.lock().await;
        self.prune_expired(&mut sessions);

        while sessions.len() >= self.max_sessions {
            if !Self::evict_least_recent(&mut sessions) {
                warn!("Session limit of {} reached", self.max_sessions);
                return Err(DomainError::internal("too many active sessions"));
            }
        }

        let session = Session::new();
        let id = session.id().to_string();
        let handle = Arc::new(Mutex::new(session));
        sessions.insert(id.clone(), Arc::clone(&handle));
        info!("Started session {} ({} active)", id, sessions.len());

        Ok(handle)
    }

    async fn find(&self, id: &str) -> Result<Option<SessionHandle>, DomainError> {
        let mut sessions = self.sessions.lock().await;
        self.prune_expired(&mut sessions);

        let handle = sessions.get(id).cloned();
        // A locked session is mid-interaction and gets touched by it.
        if let Some(mut session) = handle.as_ref().and_then(|h| h.try_lock().ok()) {
            session.touch();
        }
        Ok(handle)
    }

    async fn delete(&self, id: &str) -> Result<(), DomainError> {
        let mut sessions = self.sessions.lock().await;
        sessions.remove(id);
        Ok(())
    }
}
