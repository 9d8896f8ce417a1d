use serde::{Deserialize, Serialize};

use crate::config::CoreTraits;
use crate::modules::technique::{Technique, TechniqueScores};

pub const RAPPORT_DEFAULT: f32 = 5.0;
pub const OPENNESS_DEFAULT: f32 = 3.0;

const VALIDATION_WEIGHT: f32 = 0.3;
const EMPATHY_WEIGHT: f32 = 0.3;
const ACCEPTANCE_WEIGHT: f32 = 0.2;
const ACKNOWLEDGMENT_WEIGHT: f32 = 0.1;

/// The patient's evolving relational state, both values bounded to [0, 10].
/// Advanced exactly once per completed turn by [`RapportEngine::update`].
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct EmotionalState {
    pub rapport: f32,
    pub openness: f32,
}

impl EmotionalState {
    pub fn new(rapport: f32, openness: f32) -> Self {
        Self { rapport, openness }
    }

    pub fn values(&self) -> (f32, f32) {
        (self.rapport, self.openness)
    }
}

impl Default for EmotionalState {
    fn default() -> Self {
        Self {
            rapport: RAPPORT_DEFAULT,
            openness: OPENNESS_DEFAULT,
        }
    }
}

/// Result of advancing the emotional state by one turn.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct StateUpdate {
    pub state: EmotionalState,
    pub rapport_delta: f32,
    pub openness_delta: f32,
}

/// Combines technique scores and trait modifiers into a bounded state delta.
///
/// Supportive categories (validation, empathy, acceptance, acknowledgment)
/// pull rapport up; confrontational categories (structured challenge,
/// reframing) pull it down, scaled by how defensive and how trusting the
/// patient is. The delta is clamped to [-1, 1] and the resulting state to
/// [0, 10], so a single turn can never swing the relationship by more than
/// one point.
pub struct RapportEngine;

impl RapportEngine {
    pub fn new() -> Self {
        RapportEngine
    }

    pub fn update(
        &self,
        scores: &TechniqueScores,
        traits: &CoreTraits,
        state: &EmotionalState,
    ) -> StateUpdate {
        let positive_impact = scores.get(Technique::Validation) * VALIDATION_WEIGHT
            + scores.get(Technique::Empathy) * EMPATHY_WEIGHT
            + scores.get(Technique::Acceptance) * ACCEPTANCE_WEIGHT
            + scores.get(Technique::Acknowledgment) * ACKNOWLEDGMENT_WEIGHT;

        let challenging_impact =
            scores.get(Technique::StructuredChallenge) + scores.get(Technique::Reframing);

        let defensiveness_modifier = (10.0 - traits.defensiveness) / 10.0;
        let trust_modifier = traits.trust_level / 10.0;

        let raw_delta = (positive_impact * 2.0 - challenging_impact * 0.5)
            * defensiveness_modifier
            * trust_modifier;

        let rapport_delta = raw_delta.clamp(-1.0, 1.0);
        let openness_delta = rapport_delta * 0.5;

        StateUpdate {
            state: EmotionalState {
                rapport: (state.rapport + rapport_delta).clamp(0.0, 10.0),
                openness: (state.openness + openness_delta).clamp(0.0, 10.0),
            },
            rapport_delta,
            openness_delta,
        }
    }
}

impl Default for RapportEngine {
    fn default() -> Self {
        Self::new()
    }
}
