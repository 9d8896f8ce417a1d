use chrono::{DateTime, Utc};
use serde::Serialize;
use std::time::Duration;
use thiserror::Error;
use uuid::Uuid;

use crate::config::{ConfigError, PatientConfig};
use crate::modules::generator::ResponseGenerator;
use crate::modules::prompt::{Directive, PromptComposer};
use crate::modules::rapport::{EmotionalState, RapportEngine};
use crate::modules::technique::{TechniqueClassifier, TechniqueScores};
use crate::modules::voice::{voice_for, SpeechSynthesizer};
use crate::session::transcript::{Speaker, Transcript, Utterance};
use crate::utils::markup;

/// Substituted for the patient's reply when the generator fails or times out.
pub const FALLBACK_REPLY: &str = "I'm having trouble responding right now. Please try again.";

const DEFAULT_RESPONSE_TIMEOUT: Duration = Duration::from_secs(30);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SessionPhase {
    Idle,
    Active,
    Ended,
}

#[derive(Error, Debug)]
pub enum SessionError {
    #[error("operation '{operation}' is not allowed while the session is {phase:?}")]
    InvalidState {
        operation: &'static str,
        phase: SessionPhase,
    },

    #[error("no patient is loaded")]
    NoPatientLoaded,

    #[error(transparent)]
    Config(#[from] ConfigError),
}

#[derive(Debug, Clone)]
pub struct SessionOptions {
    /// Upper bound on a single generator call. No automatic retry; on expiry
    /// the fallback reply is substituted.
    pub response_timeout: Duration,
}

impl Default for SessionOptions {
    fn default() -> Self {
        Self {
            response_timeout: DEFAULT_RESPONSE_TIMEOUT,
        }
    }
}

/// Everything a completed turn produced. `fallback` distinguishes a reply
/// substituted after a generator failure from a generated one; such turns are
/// ordinary conversation state, not errors.
#[derive(Debug, Clone, Serialize)]
pub struct TurnOutcome {
    pub reply: String,
    pub scores: TechniqueScores,
    pub rapport_delta: f32,
    pub openness_delta: f32,
    pub state: EmotionalState,
    pub fallback: bool,
    #[serde(skip)]
    pub audio: Option<Vec<u8>>,
}

/// Read-only view of a session for transcript export and UI rendering.
#[derive(Debug, Clone, Serialize)]
pub struct SessionSnapshot<'a> {
    pub id: Uuid,
    pub phase: SessionPhase,
    pub patient_name: Option<&'a str>,
    pub started_at: Option<DateTime<Utc>>,
    pub history: &'a [Utterance],
    pub state: EmotionalState,
}

/// A single practice session: owns the loaded profile, the emotional state,
/// the history, and the injected collaborators, and drives the per-turn
/// pipeline. Single-writer; every operation fully resolves before the next.
pub struct Session {
    id: Uuid,
    phase: SessionPhase,
    config: Option<PatientConfig>,
    state: EmotionalState,
    history: Transcript,
    started_at: Option<DateTime<Utc>>,
    classifier: TechniqueClassifier,
    engine: RapportEngine,
    composer: PromptComposer,
    generator: Box<dyn ResponseGenerator>,
    voice: Option<Box<dyn SpeechSynthesizer>>,
    options: SessionOptions,
}

impl Session {
    pub fn new(generator: Box<dyn ResponseGenerator>) -> Self {
        Self {
            id: Uuid::new_v4(),
            phase: SessionPhase::Idle,
            config: None,
            state: EmotionalState::default(),
            history: Transcript::new(),
            started_at: None,
            classifier: TechniqueClassifier::new(),
            engine: RapportEngine::new(),
            composer: PromptComposer::new(),
            generator,
            voice: None,
            options: SessionOptions::default(),
        }
    }

    pub fn with_voice(mut self, voice: Box<dyn SpeechSynthesizer>) -> Self {
        self.voice = Some(voice);
        self
    }

    pub fn with_options(mut self, options: SessionOptions) -> Self {
        self.options = options;
        self
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn phase(&self) -> SessionPhase {
        self.phase
    }

    pub fn state(&self) -> EmotionalState {
        self.state
    }

    pub fn patient(&self) -> Option<&PatientConfig> {
        self.config.as_ref()
    }

    /// Load a persona. Valid from `Idle` or `Ended`; the profile is validated
    /// at this seam so an invalid one never enters a session. Clears history
    /// and emotional state.
    pub fn load(&mut self, config: PatientConfig) -> Result<(), SessionError> {
        if self.phase == SessionPhase::Active {
            return Err(SessionError::InvalidState {
                operation: "load",
                phase: self.phase,
            });
        }

        config.validate()?;

        self.config = Some(config);
        self.history.clear();
        self.state = EmotionalState::default();
        self.started_at = None;
        self.phase = SessionPhase::Idle;

        Ok(())
    }

    /// Begin the session. The patient opens: an initial generation turn runs
    /// against an empty history and its reply is appended as the patient's.
    pub async fn start(&mut self) -> Result<TurnOutcome, SessionError> {
        if self.phase != SessionPhase::Idle {
            return Err(SessionError::InvalidState {
                operation: "start",
                phase: self.phase,
            });
        }
        if self.config.is_none() {
            return Err(SessionError::NoPatientLoaded);
        }

        self.history.clear();
        self.state = EmotionalState::default();
        self.started_at = Some(Utc::now());
        self.phase = SessionPhase::Active;

        let directive = self.compose_directive()?;
        let (reply, fallback) = self.generate_with_fallback(&directive).await;
        self.history.push(Speaker::Patient, reply.clone());
        let audio = self.synthesize_reply(&reply).await;

        Ok(TurnOutcome {
            reply,
            scores: TechniqueScores::default(),
            rapport_delta: 0.0,
            openness_delta: 0.0,
            state: self.state,
            fallback,
            audio,
        })
    }

    /// Run one full turn: classify the therapist's utterance, advance the
    /// emotional state, append both utterances, and return the patient reply.
    ///
    /// Generator failure is absorbed here: the fixed fallback reply is
    /// recorded as ordinary conversation state and flagged on the outcome,
    /// while the classifier and rapport updates stand.
    pub async fn submit_therapist_turn(&mut self, text: &str) -> Result<TurnOutcome, SessionError> {
        if self.phase != SessionPhase::Active {
            return Err(SessionError::InvalidState {
                operation: "submit_therapist_turn",
                phase: self.phase,
            });
        }

        let scores = self.classifier.score(text);
        let update = {
            let config = self.config.as_ref().ok_or(SessionError::NoPatientLoaded)?;
            self.engine.update(&scores, &config.core_traits, &self.state)
        };
        self.state = update.state;
        tracing::debug!(
            rapport = self.state.rapport,
            openness = self.state.openness,
            rapport_delta = update.rapport_delta,
            "advanced emotional state"
        );

        self.history.push(Speaker::Therapist, text.to_string());

        let directive = self.compose_directive()?;
        let (reply, fallback) = self.generate_with_fallback(&directive).await;
        self.history.push(Speaker::Patient, reply.clone());
        let audio = self.synthesize_reply(&reply).await;

        Ok(TurnOutcome {
            reply,
            scores,
            rapport_delta: update.rapport_delta,
            openness_delta: update.openness_delta,
            state: self.state,
            fallback,
            audio,
        })
    }

    pub fn end(&mut self) -> Result<(), SessionError> {
        if self.phase != SessionPhase::Active {
            return Err(SessionError::InvalidState {
                operation: "end",
                phase: self.phase,
            });
        }
        self.phase = SessionPhase::Ended;
        Ok(())
    }

    /// Return to `Idle`, clearing history and emotional state but keeping the
    /// loaded profile. Valid from any phase.
    pub fn reset(&mut self) {
        self.phase = SessionPhase::Idle;
        self.history.clear();
        self.state = EmotionalState::default();
        self.started_at = None;
    }

    pub fn snapshot(&self) -> SessionSnapshot<'_> {
        SessionSnapshot {
            id: self.id,
            phase: self.phase,
            patient_name: self.config.as_ref().map(|config| config.name.as_str()),
            started_at: self.started_at,
            history: self.history.entries(),
            state: self.state,
        }
    }

    fn compose_directive(&self) -> Result<Directive, SessionError> {
        let config = self.config.as_ref().ok_or(SessionError::NoPatientLoaded)?;
        Ok(self
            .composer
            .compose(config, &self.state, self.history.entries()))
    }

    async fn generate_with_fallback(&self, directive: &Directive) -> (String, bool) {
        match tokio::time::timeout(
            self.options.response_timeout,
            self.generator.generate(directive),
        )
        .await
        {
            Ok(Ok(reply)) => (reply, false),
            Ok(Err(error)) => {
                tracing::warn!(%error, "generator call failed, substituting fallback reply");
                (FALLBACK_REPLY.to_string(), true)
            }
            Err(_) => {
                tracing::warn!(
                    timeout_secs = self.options.response_timeout.as_secs_f64(),
                    "generator call timed out, substituting fallback reply"
                );
                (FALLBACK_REPLY.to_string(), true)
            }
        }
    }

    async fn synthesize_reply(&self, reply: &str) -> Option<Vec<u8>> {
        let voice_client = self.voice.as_ref()?;
        let config = self.config.as_ref()?;

        let spoken = markup::strip(reply);
        if spoken.is_empty() {
            return None;
        }

        let voice = voice_for(&config.gender, config.age, config.diagnosis_category());
        match voice_client.synthesize(&spoken, voice).await {
            Ok(bytes) => Some(bytes),
            Err(error) => {
                tracing::warn!(%error, "speech synthesis failed, continuing without audio");
                None
            }
        }
    }
}
