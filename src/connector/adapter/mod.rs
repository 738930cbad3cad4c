mod fs_prompt_repository;
mod gemini_client;
mod in_memory_session_repository;
mod mock_chat_client;

pub use fs_prompt_repository::*;
pub use gemini_client::*;
pub use in_memory_session_repository::*;
pub use mock_chat_client::*;
