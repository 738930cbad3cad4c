use serde::{Deserialize, Serialize};

/// Sampling parameters sent with every request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GenerationConfig {
    temperature: f32,
    top_p: f32,
    top_k: u32,
    max_output_tokens: u32,
    response_mime_type: String,
}

impl GenerationConfig {
    pub fn new(temperature: f32, top_p: f32, top_k: u32, max_output_tokens: u32) -> Self {
        Self {
            temperature,
            top_p,
            top_k,
            max_output_tokens,
            response_mime_type: "text/plain".to_string(),
        }
    }

    pub fn with_temperature(mut self, temperature: f32) -> Self {
        self.temperature = temperature;
        self
    }

    pub fn with_top_p(mut self, top_p: f32) -> Self {
        self.top_p = top_p;
        self
    }

    pub fn with_top_k(mut self, top_k: u32) -> Self {
        self.top_k = top_k;
        self
    }

    pub fn with_max_output_tokens(mut self, max_output_tokens: u32) -> Self {
        self.max_output_tokens = max_output_tokens;
        self
    }

    pub fn temperature(&self) -> f32 {
        self.temperature
    }

    pub fn top_p(&self) -> f32 {
        self.top_p
    }

    pub fn top_k(&self) -> u32 {
        self.top_k
    }

    pub fn max_output_tokens(&self) -> u32 {
        self.max_output_tokens
    }

    pub fn response_mime_type(&self) -> &str {
        &self.response_mime_type
    }
}

impl Default for GenerationConfig {
    fn default() -> Self {
        Self::new(1.0, 0.95, 40, 8192)
    }
}

/// Content categories the service can filter on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum HarmCategory {
    #[serde(rename = "HARM_CATEGORY_HARASSMENT")]
    Harassment,
    #[serde(rename = "HARM_CATEGORY_HATE_SPEECH")]
    HateSpeech,
    #[serde(rename = "HARM_CATEGORY_SEXUALLY_EXPLICIT")]
    SexuallyExplicit,
    #[serde(rename = "HARM_CATEGORY_DANGEROUS_CONTENT")]
    DangerousContent,
}

impl HarmCategory {
    pub const ALL: [HarmCategory; 4] = [
        HarmCategory::Harassment,
        HarmCategory::HateSpeech,
        HarmCategory::SexuallyExplicit,
        HarmCategory::DangerousContent,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            HarmCategory::Harassment => "HARM_CATEGORY_HARASSMENT",
            HarmCategory::HateSpeech => "HARM_CATEGORY_HATE_SPEECH",
            HarmCategory::SexuallyExplicit => "HARM_CATEGORY_SEXUALLY_EXPLICIT",
            HarmCategory::DangerousContent => "HARM_CATEGORY_DANGEROUS_CONTENT",
        }
    }
}

/// Blocking sensitivity, from most to least restrictive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum HarmBlockThreshold {
    BlockLowAndAbove,
    BlockMediumAndAbove,
    BlockOnlyHigh,
    BlockNone,
}

impl HarmBlockThreshold {
    pub fn as_str(&self) -> &'static str {
        match self {
            HarmBlockThreshold::BlockLowAndAbove => "BLOCK_LOW_AND_ABOVE",
            HarmBlockThreshold::BlockMediumAndAbove => "BLOCK_MEDIUM_AND_ABOVE",
            HarmBlockThreshold::BlockOnlyHigh => "BLOCK_ONLY_HIGH",
            HarmBlockThreshold::BlockNone => "BLOCK_NONE",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SafetySetting {
    pub category: HarmCategory,
    pub threshold: HarmBlockThreshold,
}

/// Per-category threshold overrides, one entry per category.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SafetySettings {
    settings: Vec<SafetySetting>,
}

impl SafetySettings {
    /// Every known category set to the least restrictive threshold.
    pub fn block_none() -> Self {
        Self {
            settings: HarmCategory::ALL
                .iter()
                .map(|&category| SafetySetting {
                    category,
                    threshold: HarmBlockThreshold::BlockNone,
                })
                .collect(),
        }
    }

    pub fn settings(&self) -> &[SafetySetting] {
        &self.settings
    }

    pub fn threshold_for(&self, category: HarmCategory) -> Option<HarmBlockThreshold> {
        self.settings
            .iter()
            .find(|s| s.category == category)
            .map(|s| s.threshold)
    }

    pub fn len(&self) -> usize {
        self.settings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.settings.is_empty()
    }
}

impl Default for SafetySettings {
    fn default() -> Self {
        Self::block_none()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_generation_config_matches_service_defaults() {
        let config = GenerationConfig::default();
        assert_eq!(config.temperature(), 1.0);
        assert_eq!(config.top_p(), 0.95);
        assert_eq!(config.top_k(), 40);
        assert_eq!(config.max_output_tokens(), 8192);
        assert_eq!(config.response_mime_type(), "text/plain");
    }

    #[test]
    fn overrides_replace_single_fields() {
        let config = GenerationConfig::default()
            .with_temperature(0.2)
            .with_max_output_tokens(256);
        assert_eq!(config.temperature(), 0.2);
        assert_eq!(config.max_output_tokens(), 256);
        assert_eq!(config.top_k(), 40);
    }

    #[test]
    fn default_safety_settings_unblock_all_four_categories() {
        let safety = SafetySettings::default();
        assert_eq!(safety.len(), 4);
        for category in HarmCategory::ALL {
            assert_eq!(
                safety.threshold_for(category),
                Some(HarmBlockThreshold::BlockNone),
                "{} should be unblocked",
                category.as_str()
            );
        }
    }

    #[test]
    fn safety_setting_serializes_to_wire_names() {
        let setting = SafetySetting {
            category: HarmCategory::HateSpeech,
            threshold: HarmBlockThreshold::BlockNone,
        };
        let json = serde_json::to_value(setting).unwrap();
        assert_eq!(
            json,
            serde_json::json!({"category": "HARM_CATEGORY_HATE_SPEECH", "threshold": "BLOCK_NONE"})
        );
    }
}
