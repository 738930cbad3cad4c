mod api_key;
mod generation_config;
mod session;
mod system_prompt;
mod turn;

pub use api_key::*;
pub use generation_config::*;
pub use session::*;
pub use system_prompt::*;
pub use turn::*;
