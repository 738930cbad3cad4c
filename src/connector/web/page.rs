use minijinja::{context, Environment};

use crate::application::ChatFrame;
use crate::domain::DomainError;

const CHAT_TEMPLATE: &str = "chat.html";

/// Renders chat frames as the single-page form. Output is HTML-escaped.
pub struct PageRenderer {
    env: Environment<'static>,
}

impl PageRenderer {
    pub fn new() -> Result<Self, DomainError> {
        let mut env = Environment::new();
        env.add_template(CHAT_TEMPLATE, include_str!("templates/chat.html"))
            .map_err(|e| DomainError::internal(format!("invalid page template: {e}")))?;
        Ok(Self { env })
    }

    pub fn render(
        &self,
        frame: &ChatFrame,
        model: &str,
        key_stored: bool,
    ) -> Result<String, DomainError> {
        let template = self
            .env
            .get_template(CHAT_TEMPLATE)
            .map_err(|e| DomainError::internal(e.to_string()))?;
        template
            .render(context! { frame => frame, model => model, key_stored => key_stored })
            .map_err(|e| DomainError::internal(format!("failed to render page: {e}")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::Turn;

    fn frame(turns: Vec<Turn>, credential_missing: bool) -> ChatFrame {
        ChatFrame {
            session_id: "abc".to_string(),
            turns,
            notices: vec![],
            credential_missing,
        }
    }

    #[test]
    fn escapes_conversation_text() {
        let renderer = PageRenderer::new().unwrap();
        let html = renderer
            .render(
                &frame(vec![Turn::new("<b>hi</b>", "a & b")], false),
                "gemini-1.5-flash",
                false,
            )
            .unwrap();

        assert!(html.contains("&lt;b&gt;hi&lt;"));
        assert!(html.contains("a &amp; b"));
        assert!(!html.contains("<b>hi</b>"));
    }

    #[test]
    fn missing_credential_hides_message_field() {
        let renderer = PageRenderer::new().unwrap();
        let html = renderer.render(&frame(vec![], true), "m", false).unwrap();

        assert!(html.contains("name=\"api_key\""));
        assert!(!html.contains("name=\"message\""));
    }

    #[test]
    fn message_field_accepts_multiple_lines() {
        let renderer = PageRenderer::new().unwrap();
        let html = renderer.render(&frame(vec![], false), "m", false).unwrap();

        assert!(html.contains("<textarea id=\"message\" name=\"message\""));
    }
}
