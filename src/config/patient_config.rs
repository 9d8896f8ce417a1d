use serde::{Deserialize, Serialize};
use std::path::Path;
use thiserror::Error;

pub type TraitValue = f32;

pub const TRAIT_MIN: TraitValue = 0.0;
pub const TRAIT_MAX: TraitValue = 10.0;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("trait '{name}' has value {value}, but must be between 0.0 and 10.0")]
    TraitOutOfRange { name: &'static str, value: TraitValue },

    #[error("required field '{0}' is empty")]
    EmptyField(&'static str),

    #[error("failed to read persona file: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to parse persona file: {0}")]
    Parse(#[from] toml::de::Error),
}

/// Diagnosis family a free-text diagnosis label falls into. Disorder-trait
/// rendering is conditional on this; unknown labels degrade to `Unspecified`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DiagnosisCategory {
    Borderline,
    Depression,
    Anxiety,
    Unspecified,
}

impl DiagnosisCategory {
    pub fn from_label(label: &str) -> Self {
        if label.contains("Borderline") {
            DiagnosisCategory::Borderline
        } else if label.contains("Depression") || label.contains("Depressive") {
            DiagnosisCategory::Depression
        } else if label.contains("Anxiety") {
            DiagnosisCategory::Anxiety
        } else {
            DiagnosisCategory::Unspecified
        }
    }
}

/// Continuous personality attributes shared by every patient, each in [0, 10].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CoreTraits {
    pub emotional_intensity: TraitValue,
    pub mood_stability: TraitValue,
    pub anger_reactivity: TraitValue,
    pub emotional_awareness: TraitValue,
    pub trust_level: TraitValue,
    pub attachment_anxiety: TraitValue,
    pub boundary_awareness: TraitValue,
    pub social_withdrawal: TraitValue,
    pub catastrophic_thinking: TraitValue,
    pub black_white_thinking: TraitValue,
    pub self_criticism: TraitValue,
    pub concentration_ability: TraitValue,
    pub verbal_expressiveness: TraitValue,
    pub emotional_openness: TraitValue,
    pub defensiveness: TraitValue,
    pub response_detail_level: TraitValue,
}

impl CoreTraits {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        validate_traits(&self.named_values())
    }

    fn named_values(&self) -> [(&'static str, TraitValue); 16] {
        [
            ("emotional_intensity", self.emotional_intensity),
            ("mood_stability", self.mood_stability),
            ("anger_reactivity", self.anger_reactivity),
            ("emotional_awareness", self.emotional_awareness),
            ("trust_level", self.trust_level),
            ("attachment_anxiety", self.attachment_anxiety),
            ("boundary_awareness", self.boundary_awareness),
            ("social_withdrawal", self.social_withdrawal),
            ("catastrophic_thinking", self.catastrophic_thinking),
            ("black_white_thinking", self.black_white_thinking),
            ("self_criticism", self.self_criticism),
            ("concentration_ability", self.concentration_ability),
            ("verbal_expressiveness", self.verbal_expressiveness),
            ("emotional_openness", self.emotional_openness),
            ("defensiveness", self.defensiveness),
            ("response_detail_level", self.response_detail_level),
        ]
    }
}

impl Default for CoreTraits {
    fn default() -> Self {
        Self {
            emotional_intensity: 5.0,
            mood_stability: 5.0,
            anger_reactivity: 5.0,
            emotional_awareness: 5.0,
            trust_level: 5.0,
            attachment_anxiety: 5.0,
            boundary_awareness: 5.0,
            social_withdrawal: 5.0,
            catastrophic_thinking: 5.0,
            black_white_thinking: 5.0,
            self_criticism: 5.0,
            concentration_ability: 5.0,
            verbal_expressiveness: 5.0,
            emotional_openness: 5.0,
            defensiveness: 5.0,
            response_detail_level: 5.0,
        }
    }
}

/// Disorder-specific symptom attributes, each in [0, 10]. Only the subset
/// matching the patient's diagnosis category feeds prompt rendering.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DisorderTraits {
    pub abandonment_sensitivity: TraitValue,
    pub identity_instability: TraitValue,
    pub impulsivity: TraitValue,
    pub self_harm_risk: TraitValue,
    pub dissociation_frequency: TraitValue,
    pub worry_intensity: TraitValue,
    pub physical_anxiety: TraitValue,
    pub avoidance_behaviors: TraitValue,
    pub perfectionism: TraitValue,
    pub control_need: TraitValue,
    pub hopelessness: TraitValue,
    pub energy_level: TraitValue,
    pub anhedonia: TraitValue,
    pub guilt_shame: TraitValue,
    pub suicidal_ideation: TraitValue,
}

impl DisorderTraits {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        validate_traits(&self.named_values())
    }

    fn named_values(&self) -> [(&'static str, TraitValue); 15] {
        [
            ("abandonment_sensitivity", self.abandonment_sensitivity),
            ("identity_instability", self.identity_instability),
            ("impulsivity", self.impulsivity),
            ("self_harm_risk", self.self_harm_risk),
            ("dissociation_frequency", self.dissociation_frequency),
            ("worry_intensity", self.worry_intensity),
            ("physical_anxiety", self.physical_anxiety),
            ("avoidance_behaviors", self.avoidance_behaviors),
            ("perfectionism", self.perfectionism),
            ("control_need", self.control_need),
            ("hopelessness", self.hopelessness),
            ("energy_level", self.energy_level),
            ("anhedonia", self.anhedonia),
            ("guilt_shame", self.guilt_shame),
            ("suicidal_ideation", self.suicidal_ideation),
        ]
    }
}

impl Default for DisorderTraits {
    fn default() -> Self {
        Self {
            abandonment_sensitivity: 0.0,
            identity_instability: 0.0,
            impulsivity: 0.0,
            self_harm_risk: 0.0,
            dissociation_frequency: 0.0,
            worry_intensity: 0.0,
            physical_anxiety: 0.0,
            avoidance_behaviors: 0.0,
            perfectionism: 0.0,
            control_need: 0.0,
            hopelessness: 0.0,
            energy_level: 10.0,
            anhedonia: 0.0,
            guilt_shame: 0.0,
            suicidal_ideation: 0.0,
        }
    }
}

fn validate_traits(traits: &[(&'static str, TraitValue)]) -> Result<(), ConfigError> {
    for &(name, value) in traits {
        if !(TRAIT_MIN..=TRAIT_MAX).contains(&value) {
            return Err(ConfigError::TraitOutOfRange { name, value });
        }
    }
    Ok(())
}

/// Static configuration for a simulated patient. Immutable for the lifetime
/// of a session; replaced wholesale when a new persona is loaded.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PatientConfig {
    pub name: String,
    pub age: u32,
    pub gender: String,
    pub diagnosis: String,
    pub background_story: String,
    #[serde(default)]
    pub session_context: String,
    #[serde(default)]
    pub core_traits: CoreTraits,
    #[serde(default)]
    pub disorder_traits: DisorderTraits,
}

impl PatientConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        let required = [
            ("name", &self.name),
            ("gender", &self.gender),
            ("diagnosis", &self.diagnosis),
            ("background_story", &self.background_story),
        ];
        for (field, value) in required {
            if value.trim().is_empty() {
                return Err(ConfigError::EmptyField(field));
            }
        }

        self.core_traits.validate()?;
        self.disorder_traits.validate()?;

        Ok(())
    }

    pub fn diagnosis_category(&self) -> DiagnosisCategory {
        DiagnosisCategory::from_label(&self.diagnosis)
    }

    /// Parse and validate a persona authored as TOML. Trait fields omitted in
    /// the file keep their defaults.
    pub fn from_toml_str(raw: &str) -> Result<Self, ConfigError> {
        let config: PatientConfig = toml::from_str(raw)?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_toml_path<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let raw = std::fs::read_to_string(path)?;
        Self::from_toml_str(&raw)
    }
}
