use anyhow::{bail, Result};

use crate::application::ChatFrame;

use super::super::Container;

pub struct AskController<'a> {
    container: &'a Container,
}

impl<'a> AskController<'a> {
    pub fn new(container: &'a Container) -> Self {
        Self { container }
    }

    /// One turn in a throwaway session. Fails when no reply was recorded.
    pub async fn ask(&self, message: String) -> Result<String> {
        let repo = self.container.session_repository();
        let handle = repo.create().await?;
        let mut session = handle.lock().await;

        let frame = self
            .container
            .chat_loop()
            .step(&mut session, Some(message.as_str()))
            .await;

        let id = session.id().to_string();
        drop(session);
        repo.delete(&id).await?;

        Self::format_answer(&frame)
    }

    fn format_answer(frame: &ChatFrame) -> Result<String> {
        let Some(turn) = frame.last_turn() else {
            if frame.notices.is_empty() {
                bail!("Nothing to send: the message is empty.");
            }
            bail!("{}", frame.notices.join("\n"));
        };

        let mut output = String::new();
        for notice in &frame.notices {
            output.push_str(&format!("warning: {}\n", notice));
        }
        output.push_str(turn.bot_text());
        Ok(output)
    }
}
