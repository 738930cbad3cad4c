mod chat_client;
mod prompt_repository;
mod session_repository;

pub use chat_client::*;
pub use prompt_repository::*;
pub use session_repository::*;
