use async_trait::async_trait;

use crate::domain::{DomainError, SystemPrompt};

/// Source of the system prompt text.
#[async_trait]
pub trait PromptRepository: Send + Sync {
    /// Return the prompt exactly as stored.
    ///
    /// Fails with [`DomainError::PromptFileMissing`] when nothing is stored at
    /// the location and [`DomainError::PromptFileRead`] for any other failure.
    async fn load(&self) -> Result<SystemPrompt, DomainError>;

    /// Human-readable location (file path) used in messages.
    fn location(&self) -> &str;
}
