use std::sync::Arc;

use tracing::{debug, warn};

use crate::application::ChatClientFactory;
use crate::domain::{ApiKey, DomainError, Session, SystemPrompt, Turn};

/// Exchanges one user message with the model and records the resulting turn.
pub struct SendMessageUseCase {
    client_factory: Arc<dyn ChatClientFactory>,
}

impl SendMessageUseCase {
    pub fn new(client_factory: Arc<dyn ChatClientFactory>) -> Self {
        Self { client_factory }
    }

    /// On success the new turn is appended to `session` and returned.
    /// On failure the session is left untouched.
    pub async fn execute(
        &self,
        api_key: &ApiKey,
        system: &SystemPrompt,
        session: &mut Session,
        message: &str,
    ) -> Result<Turn, DomainError> {
        if message.trim().is_empty() {
            return Err(DomainError::invalid_input("message is empty"));
        }

        let client = self.client_factory.connect(api_key);
        debug!(
            "Sending turn {} of session {} to {}",
            session.len() + 1,
            session.id(),
            self.client_factory.model()
        );

        let reply = client
            .send_message(system, session.turns(), message)
            .await
            .inspect_err(|e| warn!("Session {}: {}", session.id(), e))?;

        let turn = Turn::new(message, reply);
        session.push_turn(turn.clone());
        Ok(turn)
    }
}
