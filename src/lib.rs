pub mod application;
pub mod cli;
pub mod connector;
pub mod domain;

pub use cli::Commands;

pub use application::{
    ChatClient, ChatClientFactory, ChatFrame, ChatLoop, LoadSystemPromptUseCase, PromptLoad,
    PromptRepository, SendMessageUseCase, SessionHandle, SessionRepository,
};

pub use connector::{
    Container, ContainerConfig, FsPromptRepository, GeminiClientFactory,
    InMemorySessionRepository, MockChatClient, Router,
};

pub use domain::{
    ApiKey, DomainError, GenerationConfig, HarmBlockThreshold, HarmCategory, SafetySetting,
    SafetySettings, Session, SystemPrompt, Turn,
};
