pub mod state;
pub mod transcript;

pub use state::{
    Session, SessionError, SessionOptions, SessionPhase, SessionSnapshot, TurnOutcome,
    FALLBACK_REPLY,
};
pub use transcript::{Speaker, Transcript, Utterance};
