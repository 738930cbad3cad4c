use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::Mutex;

use crate::domain::{DomainError, Session};

/// Shared handle to one session. Holding the lock serializes interactions
/// for that session without blocking any other.
pub type SessionHandle = Arc<Mutex<Session>>;

/// Process-local storage for live sessions.
#[async_trait]
pub trait SessionRepository: Send + Sync {
    async fn create(&self) -> Result<SessionHandle, DomainError>;

    async fn find(&self, id: &str) -> Result<Option<SessionHandle>, DomainError>;

    async fn delete(&self, id: &str) -> Result<(), DomainError>;

    /// Resume the session named by `id`, or start a fresh one when `id` is
    /// absent or unknown.
    async fn open_or_create(&self, id: Option<&str>) -> Result<SessionHandle, DomainError> {
        if let Some(id) = id.filter(|id| !id.is_empty()) {
            if let Some(handle) = self.find(id).await? {
                return Ok(handle);
            }
        }
        self.create().await
    }
}
