use uuid::Uuid;

use super::{ApiKey, Turn};

/// Conversation state owned by one UI connection.
///
/// Turns are append-only and kept in send order; nothing is persisted once
/// the session is dropped.
#[derive(Debug, Clone)]
pub struct Session {
    id: String,
    turns: Vec<Turn>,
    api_key: Option<ApiKey>,
    /// Milliseconds since the Unix epoch of the last interaction.
    updated_at: i64,
}

impl Session {
    pub fn new() -> Self {
        Self::with_id(Uuid::new_v4().to_string())
    }

    pub fn with_id(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            turns: Vec::new(),
            api_key: None,
            updated_at: current_timestamp_millis(),
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn turns(&self) -> &[Turn] {
        &self.turns
    }

    pub fn len(&self) -> usize {
        self.turns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.turns.is_empty()
    }

    pub fn api_key(&self) -> Option<&ApiKey> {
        self.api_key.as_ref()
    }

    pub fn set_api_key(&mut self, key: ApiKey) {
        self.api_key = Some(key);
        self.touch();
    }

    pub fn push_turn(&mut self, turn: Turn) {
        self.turns.push(turn);
        self.touch();
    }

    /// Mark the session as used now, without changing its contents.
    pub fn touch(&mut self) {
        self.updated_at = current_timestamp_millis();
    }

    pub fn updated_at(&self) -> i64 {
        self.updated_at
    }

    /// True when nothing has touched the session for at least `ttl_ms`.
    pub fn is_idle_since(&self, now_ms: i64, ttl_ms: i64) -> bool {
        now_ms.saturating_sub(self.updated_at) >= ttl_ms
    }
}

impl Default for Session {
    fn default() -> Self {
        Self::new()
    }
}

pub fn current_timestamp_millis() -> i64 {
    std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .map(|d| d.as_millis() as i64)
        .unwrap_or(0)
}
