mod chat_loop;
mod load_system_prompt;
mod send_message;

pub use chat_loop::*;
pub use load_system_prompt::*;
pub use send_message::*;
