use std::sync::Arc;

use async_trait::async_trait;

use crate::domain::{ApiKey, DomainError, SystemPrompt, Turn};

/// An interface for exchanging one conversational message with a hosted model.
///
/// Implementors encapsulate transport, serialization, and vendor-specific API
/// details, including the generation and safety configuration they were built
/// with. Consumers (e.g. [`crate::application::SendMessageUseCase`]) remain
/// decoupled from any particular provider or HTTP client library.
#[async_trait]
pub trait ChatClient: Send + Sync {
    /// Send `message` after the system prompt and the prior turns, and return
    /// the model's reply text.
    async fn send_message(
        &self,
        system: &SystemPrompt,
        history: &[Turn],
        message: &str,
    ) -> Result<String, DomainError>;
}

/// Builds a [`ChatClient`] bound to one API key.
///
/// The key is an explicit constructor argument; no client reads process-wide
/// credentials on its own.
pub trait ChatClientFactory: Send + Sync {
    fn connect(&self, api_key: &ApiKey) -> Arc<dyn ChatClient>;

    /// Model identifier, for display.
    fn model(&self) -> &str;
}
