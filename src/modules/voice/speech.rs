use async_trait::async_trait;
use serde::Serialize;

use super::{SpeechSynthesizer, VoiceError, VoiceResult};

const DEFAULT_BASE_URL: &str = "https://api.openai.com/v1";
const DEFAULT_MODEL: &str = "tts-1";

/// Text-to-speech client for OpenAI-compatible endpoints.
pub struct OpenAiSpeech {
    client: reqwest::Client,
    api_key: String,
    model: String,
    base_url: String,
}

impl OpenAiSpeech {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            api_key: api_key.into(),
            model: DEFAULT_MODEL.to_string(),
            base_url: DEFAULT_BASE_URL.to_string(),
        }
    }

    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }
}

#[derive(Serialize)]
struct SpeechRequest<'a> {
    model: &'a str,
    input: &'a str,
    voice: &'a str,
}

#[async_trait]
impl SpeechSynthesizer for OpenAiSpeech {
    async fn synthesize(&self, text: &str, voice: &str) -> VoiceResult<Vec<u8>> {
        let request = SpeechRequest {
            model: &self.model,
            input: text,
            voice,
        };

        let response = self
            .client
            .post(format!("{}/audio/speech", self.base_url))
            .bearer_auth(&self.api_key)
            .json(&request)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(VoiceError::Api {
                status: status.as_u16(),
                message: response.text().await.unwrap_or_else(|_| "unknown error".to_string()),
            });
        }

        Ok(response.bytes().await?.to_vec())
    }
}
