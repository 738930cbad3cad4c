use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::application::{ChatClient, ChatClientFactory};
use crate::domain::{
    ApiKey, DomainError, GenerationConfig, SafetySetting, SafetySettings, SystemPrompt, Turn,
};

pub const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com";
pub const DEFAULT_MODEL: &str = "gemini-1.5-flash";
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(60);
const API_VERSION_PATH: &str = "/v1beta/models";
const API_KEY_HEADER: &str = "x-goog-api-key";

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct ApiRequest<'a> {
    contents: Vec<ApiContent<'a>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    system_instruction: Option<ApiSystemInstruction<'a>>,
    generation_config: ApiGenerationConfig<'a>,
    safety_settings: &'a [SafetySetting],
}

#[derive(Serialize)]
struct ApiContent<'a> {
    role: &'a str,
    parts: [ApiPart<'a>; 1],
}

#[derive(Serialize)]
struct ApiSystemInstruction<'a> {
    parts: [ApiPart<'a>; 1],
}

#[derive(Serialize)]
struct ApiPart<'a> {
    text: &'a str,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct ApiGenerationConfig<'a> {
    temperature: f32,
    top_p: f32,
    top_k: u32,
    max_output_tokens: u32,
    response_mime_type: &'a str,
}

impl<'a> From<&'a GenerationConfig> for ApiGenerationConfig<'a> {
    fn from(config: &'a GenerationConfig) -> Self {
        Self {
            temperature: config.temperature(),
            top_p: config.top_p(),
            top_k: config.top_k(),
            max_output_tokens: config.max_output_tokens(),
            response_mime_type: config.response_mime_type(),
        }
    }
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct ApiResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
    prompt_feedback: Option<PromptFeedback>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct Candidate {
    content: Option<CandidateContent>,
    finish_reason: Option<String>,
}

#[derive(Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<ResponsePart>,
}

#[derive(Deserialize)]
struct ResponsePart {
    #[serde(default)]
    text: String,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct PromptFeedback {
    block_reason: Option<String>,
}

#[derive(Deserialize)]
struct ApiErrorEnvelope {
    error: ApiErrorBody,
}

#[derive(Deserialize)]
struct ApiErrorBody {
    message: String,
}

/// Settings shared by every client a [`GeminiClientFactory`] hands out.
struct GeminiSettings {
    url: String,
    model: String,
    generation: GenerationConfig,
    safety: SafetySettings,
}

/// Builds [`GeminiClient`]s for the `generateContent` endpoint.
///
/// One HTTP connection pool is shared by all clients; each client only adds
/// the API key it was constructed with.
///
/// Environment overrides (see [`GeminiClientFactory::from_env`]):
///
/// | Variable          | Default                                     |
/// |-------------------|---------------------------------------------|
/// | `GEMINI_BASE_URL` | `https://generativelanguage.googleapis.com` |
/// | `GEMINI_MODEL`    | `gemini-1.5-flash`                          |
pub struct GeminiClientFactory {
    http: reqwest::Client,
    settings: Arc<GeminiSettings>,
}

impl GeminiClientFactory {
    pub fn new(
        base_url: impl Into<String>,
        model: impl Into<String>,
        generation: GenerationConfig,
        safety: SafetySettings,
        timeout: Duration,
    ) -> Self {
        let base: String = base_url.into();
        let model: String = model.into();
        let url = format!(
            "{}{}/{}:generateContent",
            base.trim_end_matches('/'),
            API_VERSION_PATH,
            model
        );
        Self {
            http: reqwest::Client::builder()
                .timeout(timeout)
                .build()
                .unwrap_or_default(),
            settings: Arc::new(GeminiSettings {
                url,
                model,
                generation,
                safety,
            }),
        }
    }

    /// Construct with `GEMINI_BASE_URL` and, unless `model` is given,
    /// `GEMINI_MODEL` taken from the environment.
    pub fn from_env(
        model: Option<String>,
        generation: GenerationConfig,
        safety: SafetySettings,
        timeout: Duration,
    ) -> Self {
        let base =
            std::env::var("GEMINI_BASE_URL").unwrap_or_else(|_| DEFAULT_BASE_URL.to_string());
        let model = model
            .or_else(|| std::env::var("GEMINI_MODEL").ok())
            .unwrap_or_else(|| DEFAULT_MODEL.to_string());
        Self::new(base, model, generation, safety, timeout)
    }

    pub fn endpoint(&self) -> &str {
        &self.settings.url
    }
}

impl ChatClientFactory for GeminiClientFactory {
    fn connect(&self, api_key: &ApiKey) -> Arc<dyn ChatClient> {
        Arc::new(GeminiClient {
            http: self.http.clone(),
            settings: Arc::clone(&self.settings),
            api_key: api_key.clone(),
        })
    }

    fn model(&self) -> &str {
        &self.settings.model
    }
}

/// [`ChatClient`] for one API key. No retries: every failure is returned as
/// [`DomainError::ModelCall`].
pub struct GeminiClient {
    http: reqwest::Client,
    settings: Arc<GeminiSettings>,
    api_key: ApiKey,
}

impl GeminiClient {
    fn build_request<'a>(
        &'a self,
        system: &'a SystemPrompt,
        history: &'a [Turn],
        message: &'a str,
    ) -> ApiRequest<'a> {
        let mut contents = Vec::with_capacity(history.len() * 2 + 1);
        for turn in history {
            contents.push(ApiContent {
                role: "user",
                parts: [ApiPart {
                    text: turn.user_text(),
                }],
            });
            contents.push(ApiContent {
                role: "model",
                parts: [ApiPart {
                    text: turn.bot_text(),
                }],
            });
        }
        contents.push(ApiContent {
            role: "user",
            parts: [ApiPart { text: message }],
        });

        let system_instruction = (!system.is_empty()).then(|| ApiSystemInstruction {
            parts: [ApiPart {
                text: system.as_str(),
            }],
        });

        ApiRequest {
            contents,
            system_instruction,
            generation_config: ApiGenerationConfig::from(&self.settings.generation),
            safety_settings: self.settings.safety.settings(),
        }
    }

    /// Concatenate the text parts of the first candidate.
    fn extract_text(response: ApiResponse) -> Result<String, DomainError> {
        let Some(candidate) = response.candidates.into_iter().next() else {
            let reason = response
                .prompt_feedback
                .and_then(|f| f.block_reason)
                .unwrap_or_else(|| "no candidates returned".to_string());
            return Err(DomainError::model_call(format!(
                "response was blocked: {reason}"
            )));
        };

        let text: String = candidate
            .content
            .map(|c| c.parts.into_iter().map(|p| p.text).collect())
            .unwrap_or_default();

        if text.is_empty() {
            let reason = candidate
                .finish_reason
                .unwrap_or_else(|| "UNKNOWN".to_string());
            return Err(DomainError::model_call(format!(
                "empty response (finish reason: {reason})"
            )));
        }

        Ok(text)
    }

    fn error_message(body: &str) -> Option<String> {
        serde_json::from_str::<ApiErrorEnvelope>(body)
            .ok()
            .map(|e| e.error.message)
    }
}

#[async_trait]
impl ChatClient for GeminiClient {
    async fn send_message(
        &self,
        system: &SystemPrompt,
        history: &[Turn],
        message: &str,
    ) -> Result<String, DomainError> {
        let request = self.build_request(system, history, message);

        let response = self
            .http
            .post(&self.settings.url)
            .header(API_KEY_HEADER, self.api_key.expose())
            .json(&request)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    DomainError::model_call("request timed out")
                } else {
                    DomainError::model_call(format!("request failed: {e}"))
                }
            })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            warn!("Gemini API returned {status}");
            let detail = Self::error_message(&body).unwrap_or(body);
            return Err(DomainError::model_call(format!(
                "API returned {status}: {detail}"
            )));
        }

        let api_response: ApiResponse = response
            .json()
            .await
            .map_err(|e| DomainError::model_call(format!("failed to parse response: {e}")))?;

        let text = Self::extract_text(api_response)?;
        debug!("Gemini reply: {} bytes", text.len());
        Ok(text)
    }
}
