use async_trait::async_trait;
use thiserror::Error;

use crate::config::DiagnosisCategory;

pub mod speech;

pub use speech::OpenAiSpeech;

#[derive(Error, Debug)]
pub enum VoiceError {
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("speech endpoint returned HTTP {status}: {message}")]
    Api { status: u16, message: String },
}

pub type VoiceResult<T> = Result<T, VoiceError>;

/// Optional audio collaborator. Receives text with stage-direction markup
/// already stripped plus a voice name from [`voice_for`]; returns opaque
/// audio bytes.
#[async_trait]
pub trait SpeechSynthesizer: Send + Sync {
    async fn synthesize(&self, text: &str, voice: &str) -> VoiceResult<Vec<u8>>;
}

/// Deterministic voice selection from patient identity. Same inputs always
/// yield the same voice.
pub fn voice_for(gender: &str, age: u32, category: DiagnosisCategory) -> &'static str {
    let gender = gender.trim().to_lowercase();
    let young = age < 30;

    match (gender.as_str(), young, category) {
        ("female", true, DiagnosisCategory::Borderline) => "shimmer",
        ("female", true, _) => "nova",
        ("female", false, _) => "nova",
        ("male", true, _) => "echo",
        ("male", false, DiagnosisCategory::Depression) => "onyx",
        ("male", false, _) => "fable",
        _ => "alloy",
    }
}
