pub mod config;
pub mod modules;
pub mod session;
pub mod utils;

pub use config::{ConfigError, CoreTraits, DiagnosisCategory, DisorderTraits, PatientConfig};
pub use modules::generator::{GeneratorError, OpenAiGenerator, ResponseGenerator};
pub use modules::prompt::{Directive, PromptComposer, HISTORY_WINDOW};
pub use modules::rapport::{EmotionalState, RapportEngine, StateUpdate};
pub use modules::technique::{Technique, TechniqueClassifier, TechniqueScores};
pub use modules::voice::{voice_for, OpenAiSpeech, SpeechSynthesizer, VoiceError};
pub use session::{
    Session, SessionError, SessionOptions, SessionPhase, SessionSnapshot, Speaker, TurnOutcome,
    Utterance, FALLBACK_REPLY,
};
