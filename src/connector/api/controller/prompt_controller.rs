use super::super::Container;

pub struct PromptController<'a> {
    container: &'a Container,
}

impl<'a> PromptController<'a> {
    pub fn new(container: &'a Container) -> Self {
        Self { container }
    }

    pub fn show(&self) -> String {
        let prompt = self.container.prompt();
        let generation = self.container.generation();

        let mut output = format!(
            "GeminiChat Configuration\n========================\nModel:             {}\nTemperature:       {}\nTop P:             {}\nTop K:             {}\nMax Output Tokens: {}\nAPI Key (env):     {}\n",
            self.container.model(),
            generation.temperature(),
            generation.top_p(),
            generation.top_k(),
            generation.max_output_tokens(),
            if self.container.has_fallback_key() { "set" } else { "not set" },
        );

        output.push_str("\nSafety Settings\n---------------\n");
        for setting in self.container.safety().settings() {
            output.push_str(&format!(
                "{:<32} {}\n",
                setting.category.as_str(),
                setting.threshold.as_str()
            ));
        }

        output.push_str(&format!(
            "\nSystem Prompt ({})\n-------------\n",
            self.container.prompt_location()
        ));
        match prompt.error() {
            Some(err) => output.push_str(&format!("(empty) {}", err)),
            None => output.push_str(prompt.prompt().as_str()),
        }

        output
    }
}
