use serde::{Deserialize, Serialize};

/// Default location of the instruction text, relative to the working directory.
pub const DEFAULT_PROMPT_FILE: &str = "system_prompt.txt";

/// Fixed instruction text sent with every exchange.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SystemPrompt(String);

impl SystemPrompt {
    pub fn new(text: impl Into<String>) -> Self {
        Self(text.into())
    }

    pub fn empty() -> Self {
        Self::default()
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}
