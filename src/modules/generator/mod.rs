use async_trait::async_trait;
use thiserror::Error;

use crate::modules::prompt::Directive;

pub mod openai;

pub use openai::OpenAiGenerator;

#[derive(Error, Debug)]
pub enum GeneratorError {
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("generator returned HTTP {status}: {message}")]
    Api { status: u16, message: String },

    #[error("generator returned an empty completion")]
    EmptyCompletion,

    #[error("OPENAI_API_KEY is not set")]
    MissingApiKey,
}

pub type GeneratorResult<T> = Result<T, GeneratorError>;

/// External text generator producing the patient's next utterance.
///
/// Implementations may block, may be non-deterministic, and are never assumed
/// idempotent. The session bounds each call with a timeout and substitutes a
/// fixed fallback reply on failure.
#[async_trait]
pub trait ResponseGenerator: Send + Sync {
    async fn generate(&self, directive: &Directive) -> GeneratorResult<String>;
}

#[async_trait]
impl<T: ResponseGenerator + ?Sized> ResponseGenerator for std::sync::Arc<T> {
    async fn generate(&self, directive: &Directive) -> GeneratorResult<String> {
        (**self).generate(directive).await
    }
}
