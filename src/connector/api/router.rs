use anyhow::{bail, Result};
use tokio::io::{self, BufReader};

use crate::Commands;

use super::container::Container;
use super::controller::{AskController, ChatController, PromptController};

pub struct Router<'a> {
    ask_controller: AskController<'a>,
    chat_controller: ChatController<'a>,
    prompt_controller: PromptController<'a>,
}

impl<'a> Router<'a> {
    pub fn new(container: &'a Container) -> Self {
        Self {
            ask_controller: AskController::new(container),
            chat_controller: ChatController::new(container),
            prompt_controller: PromptController::new(container),
        }
    }

    pub async fn route(&self, command: Commands) -> Result<String> {
        match command {
            Commands::Ask { message } => self.ask_controller.ask(message).await,
            Commands::Chat => {
                let stdin = BufReader::new(io::stdin());
                let stdout = io::stdout();
                self.chat_controller.run(stdin, stdout).await
            }
            Commands::Prompt => Ok(self.prompt_controller.show()),
            Commands::Serve { .. } => bail!("serve is handled by the web server"),
        }
    }
}
