use std::sync::Arc;

use tracing::{info, warn};

use crate::application::PromptRepository;
use crate::domain::{DomainError, SystemPrompt};

/// Outcome of loading the system prompt.
///
/// A failed load still yields a usable (empty) prompt; the error is kept so
/// shells can show it next to the conversation.
#[derive(Debug)]
pub struct PromptLoad {
    prompt: SystemPrompt,
    error: Option<DomainError>,
}

impl PromptLoad {
    pub fn loaded(prompt: SystemPrompt) -> Self {
        Self {
            prompt,
            error: None,
        }
    }

    pub fn degraded(error: DomainError) -> Self {
        Self {
            prompt: SystemPrompt::empty(),
            error: Some(error),
        }
    }

    pub fn prompt(&self) -> &SystemPrompt {
        &self.prompt
    }

    pub fn error(&self) -> Option<&DomainError> {
        self.error.as_ref()
    }

    pub fn is_degraded(&self) -> bool {
        self.error.is_some()
    }
}

pub struct LoadSystemPromptUseCase {
    prompt_repo: Arc<dyn PromptRepository>,
}

impl LoadSystemPromptUseCase {
    pub fn new(prompt_repo: Arc<dyn PromptRepository>) -> Self {
        Self { prompt_repo }
    }

    /// Load the prompt, substituting an empty one on any failure.
    pub async fn execute(&self) -> PromptLoad {
        match self.prompt_repo.load().await {
            Ok(prompt) => {
                info!(
                    "Loaded system prompt from {} ({} bytes)",
                    self.prompt_repo.location(),
                    prompt.as_str().len()
                );
                PromptLoad::loaded(prompt)
            }
            Err(e) => {
                warn!("{}. Continuing with an empty system prompt.", e);
                PromptLoad::degraded(e)
            }
        }
    }
}
