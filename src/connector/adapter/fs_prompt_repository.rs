use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use async_trait::async_trait;

use crate::application::PromptRepository;
use crate::domain::{DomainError, SystemPrompt};

/// Reads the system prompt from a UTF-8 text file.
pub struct FsPromptRepository {
    path: PathBuf,
    display: String,
}

impl FsPromptRepository {
    pub fn new(path: impl AsRef<Path>) -> Self {
        let path = path.as_ref().to_path_buf();
        let display = path.display().to_string();
        Self { path, display }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

#[async_trait]
impl PromptRepository for FsPromptRepository {
    async fn load(&self) -> Result<SystemPrompt, DomainError> {
        match tokio::fs::read_to_string(&self.path).await {
            Ok(text) => Ok(SystemPrompt::new(text)),
            Err(e) if e.kind() == ErrorKind::NotFound => {
                Err(DomainError::prompt_missing(&self.display))
            }
            Err(e) => Err(DomainError::prompt_read(&self.display, e.to_string())),
        }
    }

    fn location(&self) -> &str {
        &self.display
    }
}
