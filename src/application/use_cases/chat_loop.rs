use serde::Serialize;
use tracing::debug;

use crate::application::{PromptLoad, SendMessageUseCase};
use crate::domain::{ApiKey, DomainError, Session, Turn};

/// Render-ready snapshot of a session after one interaction.
#[derive(Debug, Clone, Serialize)]
pub struct ChatFrame {
    pub session_id: String,
    pub turns: Vec<Turn>,
    /// User-facing messages: prompt load problems first, then the outcome of
    /// this interaction.
    pub notices: Vec<String>,
    /// No API key is available, so only the key field should be offered.
    pub credential_missing: bool,
}

impl ChatFrame {
    pub fn last_turn(&self) -> Option<&Turn> {
        self.turns.last()
    }

    pub fn has_notices(&self) -> bool {
        !self.notices.is_empty()
    }
}

/// The UI loop: one `step` per user interaction.
///
/// Each step resolves the credential, forwards non-blank input to the model,
/// and returns every turn in order. Model failures become notices; the
/// session only grows on success.
pub struct ChatLoop {
    send_message: SendMessageUseCase,
    prompt: PromptLoad,
    fallback_key: Option<ApiKey>,
}

impl ChatLoop {
    pub fn new(send_message: SendMessageUseCase, prompt: PromptLoad) -> Self {
        Self {
            send_message,
            prompt,
            fallback_key: None,
        }
    }

    /// Key used when the session has none of its own (e.g. from the environment).
    pub fn with_fallback_key(mut self, key: Option<ApiKey>) -> Self {
        self.fallback_key = key;
        self
    }

    pub fn prompt(&self) -> &PromptLoad {
        &self.prompt
    }

    pub async fn step(&self, session: &mut Session, input: Option<&str>) -> ChatFrame {
        let mut notices = Vec::new();
        if let Some(err) = self.prompt.error() {
            notices.push(err.to_string());
        }

        let api_key = match session.api_key().or(self.fallback_key.as_ref()) {
            Some(key) => key.clone(),
            None => {
                notices.push(DomainError::MissingCredential.to_string());
                return Self::frame(session, notices, true);
            }
        };

        if let Some(message) = input.filter(|m| !m.trim().is_empty()) {
            match self
                .send_message
                .execute(&api_key, self.prompt.prompt(), session, message)
                .await
            {
                Ok(_) => debug!("Session {} now has {} turns", session.id(), session.len()),
                Err(e) => notices.push(format!("An error occurred: {}", e)),
            }
        }

        Self::frame(session, notices, false)
    }

    fn frame(session: &Session, notices: Vec<String>, credential_missing: bool) -> ChatFrame {
        ChatFrame {
            session_id: session.id().to_string(),
            turns: session.turns().to_vec(),
            notices,
            credential_missing,
        }
    }
}
