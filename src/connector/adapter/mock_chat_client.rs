use std::collections::VecDeque;
use std::sync::{Arc, Mutex, PoisonError};

use async_trait::async_trait;
use tracing::debug;

use crate::application::{ChatClient, ChatClientFactory};
use crate::domain::{ApiKey, DomainError, SystemPrompt, Turn};

/// What the mock saw on its most recent call.
#[derive(Debug, Clone)]
pub struct RecordedRequest {
    pub api_key: String,
    pub system: String,
    pub history: Vec<Turn>,
    pub message: String,
}

#[derive(Default)]
struct MockState {
    script: VecDeque<Result<String, String>>,
    calls: usize,
    last_request: Option<RecordedRequest>,
}

/// Offline [`ChatClient`] that echoes the message back unless replies or
/// failures have been scripted.
///
/// Clones share their script and call log, so a test can keep one handle
/// while the application holds another.
#[derive(Clone, Default)]
pub struct MockChatClient {
    state: Arc<Mutex<MockState>>,
    api_key: Option<String>,
}

impl MockChatClient {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_replies<I, S>(replies: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let client = Self::new();
        {
            let mut state = client.lock();
            state
                .script
                .extend(replies.into_iter().map(|r| Ok(r.into())));
        }
        client
    }

    pub fn push_reply(&self, reply: impl Into<String>) {
        self.lock().script.push_back(Ok(reply.into()));
    }

    /// Make the next call fail with `reason`, ahead of any queued replies.
    pub fn fail_next(&self, reason: impl Into<String>) {
        self.lock().script.push_front(Err(reason.into()));
    }

    pub fn call_count(&self) -> usize {
        self.lock().calls
    }

    pub fn last_request(&self) -> Option<RecordedRequest> {
        self.lock().last_request.clone()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, MockState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

#[async_trait]
impl ChatClient for MockChatClient {
    async fn send_message(
        &self,
        system: &SystemPrompt,
        history: &[Turn],
        message: &str,
    ) -> Result<String, DomainError> {
        let mut state = self.lock();
        state.calls += 1;
        state.last_request = Some(RecordedRequest {
            api_key: self.api_key.clone().unwrap_or_default(),
            system: system.as_str().to_string(),
            history: history.to_vec(),
            message: message.to_string(),
        });

        let outcome = state
            .script
            .pop_front()
            .unwrap_or_else(|| Ok(format!("Echo: {}", message)));

        debug!("Mock chat client call #{}", state.calls);
        outcome.map_err(DomainError::model_call)
    }
}

impl ChatClientFactory for MockChatClient {
    fn connect(&self, api_key: &ApiKey) -> Arc<dyn ChatClient> {
        Arc::new(Self {
            state: Arc::clone(&self.state),
            api_key: Some(api_key.expose().to_string()),
        })
    }

    fn model(&self) -> &str {
        "mock"
    }
}
