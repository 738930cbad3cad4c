use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use tracing::{debug, info};

use crate::application::{
    ChatClientFactory, ChatLoop, LoadSystemPromptUseCase, PromptLoad, PromptRepository,
    SendMessageUseCase, SessionRepository,
};
use crate::connector::{
    FsPromptRepository, GeminiClientFactory, InMemorySessionRepository, MockChatClient,
    DEFAULT_MAX_SESSIONS, DEFAULT_SESSION_IDLE, DEFAULT_TIMEOUT,
};
use crate::domain::{ApiKey, GenerationConfig, SafetySettings, DEFAULT_PROMPT_FILE};

pub struct ContainerConfig {
    pub prompt_file: String,
    /// Model identifier; `None` falls back to `GEMINI_MODEL` or the built-in default.
    pub model: Option<String>,
    /// Use the offline echo client instead of the Gemini API.
    pub mock: bool,
    pub timeout: Duration,
    pub generation: GenerationConfig,
    pub safety: SafetySettings,
    /// Key used by sessions that have not entered one themselves.
    pub fallback_api_key: Option<ApiKey>,
    /// Sessions untouched for this long are dropped.
    pub session_idle: Duration,
    pub max_sessions: usize,
}

impl Default for ContainerConfig {
    fn default() -> Self {
        Self {
            prompt_file: DEFAULT_PROMPT_FILE.to_string(),
            model: None,
            mock: false,
            timeout: DEFAULT_TIMEOUT,
            generation: GenerationConfig::default(),
            safety: SafetySettings::default(),
            fallback_api_key: None,
            session_idle: DEFAULT_SESSION_IDLE,
            max_sessions: DEFAULT_MAX_SESSIONS,
        }
    }
}

pub struct Container {
    chat_loop: Arc<ChatLoop>,
    session_repo: Arc<dyn SessionRepository>,
    model: String,
    prompt_location: String,
    config: ContainerConfig,
}

impl Container {
    pub async fn new(config: ContainerConfig) -> Result<Self> {
        let prompt_repo: Arc<dyn PromptRepository> =
            Arc::new(FsPromptRepository::new(&config.prompt_file));

        let client_factory: Arc<dyn ChatClientFactory> = if config.mock {
            info!("Using mock chat client");
            Arc::new(MockChatClient::new())
        } else {
            let factory = GeminiClientFactory::from_env(
                config.model.clone(),
                config.generation.clone(),
                config.safety.clone(),
                config.timeout,
            );
            debug!("Gemini endpoint: {}", factory.endpoint());
            Arc::new(factory)
        };

        Self::from_parts(config, prompt_repo, client_factory).await
    }

    /// Wire the container around caller-supplied adapters.
    pub async fn from_parts(
        config: ContainerConfig,
        prompt_repo: Arc<dyn PromptRepository>,
        client_factory: Arc<dyn ChatClientFactory>,
    ) -> Result<Self> {
        let prompt_location = prompt_repo.location().to_string();
        let prompt = LoadSystemPromptUseCase::new(prompt_repo).execute().await;
        let model = client_factory.model().to_string();

        let chat_loop = ChatLoop::new(SendMessageUseCase::new(client_factory), prompt)
            .with_fallback_key(config.fallback_api_key.clone());
        let session_repo =
            InMemorySessionRepository::new(config.session_idle, config.max_sessions);

        Ok(Self {
            chat_loop: Arc::new(chat_loop),
            session_repo: Arc::new(session_repo),
            model,
            prompt_location,
            config,
        })
    }

    pub fn chat_loop(&self) -> Arc<ChatLoop> {
        self.chat_loop.clone()
    }

    pub fn session_repository(&self) -> Arc<dyn SessionRepository> {
        self.session_repo.clone()
    }

    pub fn prompt(&self) -> &PromptLoad {
        self.chat_loop.prompt()
    }

    pub fn prompt_location(&self) -> &str {
        &self.prompt_location
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    pub fn generation(&self) -> &GenerationConfig {
        &self.config.generation
    }

    pub fn safety(&self) -> &SafetySettings {
        &self.config.safety
    }

    pub fn has_fallback_key(&self) -> bool {
        self.config.fallback_api_key.is_some()
    }
}
