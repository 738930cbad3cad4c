use thiserror::Error;

#[derive(Debug, Error)]
pub enum DomainError {
    #[error("No API key provided. Enter one in the form or set GEMINI_API_KEY.")]
    MissingCredential,

    #[error("System prompt file not found: {0}")]
    PromptFileMissing(String),

    #[error("Could not read system prompt file {path}: {reason}")]
    PromptFileRead { path: String, reason: String },

    #[error("Model call failed: {0}")]
    ModelCall(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl DomainError {
    pub fn prompt_missing(path: impl Into<String>) -> Self {
        Self::PromptFileMissing(path.into())
    }

    pub fn prompt_read(path: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::PromptFileRead {
            path: path.into(),
            reason: reason.into(),
        }
    }

    pub fn model_call(msg: impl Into<String>) -> Self {
        Self::ModelCall(msg.into())
    }

    pub fn invalid_input(msg: impl Into<String>) -> Self {
        Self::InvalidInput(msg.into())
    }

    pub fn internal(msg: impl Into<String>) -> Self {
        Self::Internal(msg.into())
    }

    pub fn is_missing_credential(&self) -> bool {
        matches!(self, Self::MissingCredential)
    }

    pub fn is_prompt_error(&self) -> bool {
        matches!(self, Self::PromptFileMissing(_) | Self::PromptFileRead { .. })
    }

    pub fn is_model_call(&self) -> bool {
        matches!(self, Self::ModelCall(_))
    }
}
