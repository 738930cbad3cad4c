use anyhow::Result;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt};

use crate::application::ChatFrame;

use super::super::Container;

const QUIT_COMMAND: &str = "/quit";

/// Terminal host for the chat loop: each input line is one interaction.
pub struct ChatController<'a> {
    container: &'a Container,
}

impl<'a> ChatController<'a> {
    pub fn new(container: &'a Container) -> Self {
        Self { container }
    }

    pub async fn run<R, W>(&self, reader: R, mut writer: W) -> Result<String>
    where
        R: AsyncBufRead + Unpin,
        W: AsyncWrite + Unpin,
    {
        let chat_loop = self.container.chat_loop();
        let handle = self.container.session_repository().create().await?;
        let mut session = handle.lock().await;

        let frame = chat_loop.step(&mut session, None).await;
        let mut shown = 0;
        writer
            .write_all(Self::render(&frame, &mut shown).as_bytes())
            .await?;
        if frame.credential_missing {
            writer.flush().await?;
            return Ok("Chat unavailable until an API key is configured.".to_string());
        }

        let mut lines = reader.lines();
        loop {
            writer.write_all(b"You: ").await?;
            writer.flush().await?;

            let Some(line) = lines.next_line().await? else {
                break;
            };
            if line.trim() == QUIT_COMMAND {
                break;
            }

            let frame = chat_loop.step(&mut session, Some(line.as_str())).await;
            writer
                .write_all(Self::render(&frame, &mut shown).as_bytes())
                .await?;
        }
        writer.write_all(b"\n").await?;
        writer.flush().await?;

        Ok(format!("Session ended after {} turns.", session.len()))
    }

    /// Turns not yet printed, then this frame's notices.
    fn render(frame: &ChatFrame, shown: &mut usize) -> String {
        let mut output = String::new();
        for turn in frame.turns.iter().skip(*shown) {
            output.push_str(&format!("Bot: {}\n", turn.bot_text()));
        }
        *shown = frame.turns.len();

        for notice in &frame.notices {
            output.push_str(&format!("! {}\n", notice));
        }
        output
    }
}
