use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use super::{GeneratorError, GeneratorResult, ResponseGenerator};
use crate::modules::prompt::Directive;
use crate::session::Speaker;

const DEFAULT_BASE_URL: &str = "https://api.openai.com/v1";
const DEFAULT_MODEL: &str = "gpt-3.5-turbo";
const DEFAULT_MAX_TOKENS: u32 = 200;
const DEFAULT_TEMPERATURE: f32 = 0.7;

// Per-call jitter around the base temperature, so replies don't settle into
// one register over a long session.
const TEMPERATURE_JITTER: f32 = 0.3;

/// Chat-completions client for OpenAI-compatible endpoints.
pub struct OpenAiGenerator {
    client: reqwest::Client,
    api_key: String,
    model: String,
    base_url: String,
    max_tokens: u32,
    base_temperature: f32,
}

impl OpenAiGenerator {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            api_key: api_key.into(),
            model: DEFAULT_MODEL.to_string(),
            base_url: DEFAULT_BASE_URL.to_string(),
            max_tokens: DEFAULT_MAX_TOKENS,
            base_temperature: DEFAULT_TEMPERATURE,
        }
    }

    /// Reads the API key from `OPENAI_API_KEY`.
    pub fn from_env() -> GeneratorResult<Self> {
        let api_key = std::env::var("OPENAI_API_KEY").map_err(|_| GeneratorError::MissingApiKey)?;
        Ok(Self::new(api_key))
    }

    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    pub fn with_max_tokens(mut self, max_tokens: u32) -> Self {
        self.max_tokens = max_tokens;
        self
    }

    pub fn with_temperature(mut self, temperature: f32) -> Self {
        self.base_temperature = temperature.clamp(0.0, 2.0);
        self
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    fn sampled_temperature(&self) -> f32 {
        let jitter = (rand::random::<f32>() - 0.5) * TEMPERATURE_JITTER;
        (self.base_temperature + jitter).clamp(0.0, 2.0)
    }

    fn messages_for(directive: &Directive) -> Vec<ChatMessage> {
        let mut messages = Vec::with_capacity(directive.history.len() + 1);
        messages.push(ChatMessage {
            role: "system".to_string(),
            content: directive.instructions.clone(),
        });
        for utterance in &directive.history {
            let role = match utterance.speaker {
                Speaker::Patient => "assistant",
                Speaker::Therapist => "user",
            };
            messages.push(ChatMessage {
                role: role.to_string(),
                content: utterance.text.clone(),
            });
        }
        messages
    }
}

#[derive(Serialize)]
struct ChatRequest {
    model: String,
    messages: Vec<ChatMessage>,
    max_tokens: u32,
    temperature: f32,
}

#[derive(Serialize)]
struct ChatMessage {
    role: String,
    content: String,
}

#[derive(Deserialize)]
struct ChatResponse {
    choices: Vec<ChatChoice>,
}

#[derive(Deserialize)]
struct ChatChoice {
    message: ChatChoiceMessage,
}

#[derive(Deserialize)]
struct ChatChoiceMessage {
    #[serde(default)]
    content: Option<String>,
}

#[async_trait]
impl ResponseGenerator for OpenAiGenerator {
    async fn generate(&self, directive: &Directive) -> GeneratorResult<String> {
        let request = ChatRequest {
            model: self.model.clone(),
            messages: Self::messages_for(directive),
            max_tokens: self.max_tokens,
            temperature: self.sampled_temperature(),
        };

        let response = self
            .client
            .post(format!("{}/chat/completions", self.base_url))
            .bearer_auth(&self.api_key)
            .json(&request)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(GeneratorError::Api {
                status: status.as_u16(),
                message: response.text().await.unwrap_or_else(|_| "unknown error".to_string()),
            });
        }

        let body: ChatResponse = response.json().await?;
        body.choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content)
            .filter(|content| !content.trim().is_empty())
            .ok_or(GeneratorError::EmptyCompletion)
    }
}
