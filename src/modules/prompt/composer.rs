use serde::Serialize;

use crate::config::{CoreTraits, DiagnosisCategory, DisorderTraits, PatientConfig};
use crate::modules::rapport::EmotionalState;
use crate::session::Utterance;

/// How many trailing history entries enter the generation context.
pub const HISTORY_WINDOW: usize = 6;

/// The fully rendered input handed to the external generator: the in-character
/// instruction text plus the trimmed conversation window.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Directive {
    pub instructions: String,
    pub history: Vec<Utterance>,
}

/// Renders a patient profile and emotional state into a generation directive.
///
/// Pure: identical inputs always produce an identical directive.
pub struct PromptComposer;

impl PromptComposer {
    pub fn new() -> Self {
        PromptComposer
    }

    pub fn compose(
        &self,
        profile: &PatientConfig,
        state: &EmotionalState,
        history: &[Utterance],
    ) -> Directive {
        let start = history.len().saturating_sub(HISTORY_WINDOW);
        Directive {
            instructions: self.render_instructions(profile, state),
            history: history[start..].to_vec(),
        }
    }

    fn render_instructions(&self, profile: &PatientConfig, state: &EmotionalState) -> String {
        let core_descriptions = core_trait_descriptions(&profile.core_traits);
        let disorder_descriptions =
            disorder_trait_descriptions(&profile.disorder_traits, profile.diagnosis_category());
        let rapport_desc = rapport_description(state.rapport);
        let openness_desc = openness_description(state.openness);

        format!(
            "You are {name}, a {age}-year-old {gender} patient in therapy.\n\
             \n\
             DIAGNOSIS: {diagnosis}\n\
             BACKGROUND: {background}\n\
             SESSION CONTEXT: {context}\n\
             \n\
             PERSONALITY TRAITS:\n\
             {core}\n\
             \n\
             DISORDER-SPECIFIC SYMPTOMS:\n\
             {disorder}\n\
             \n\
             CURRENT EMOTIONAL STATE:\n\
             - Rapport with therapist: {rapport}\n\
             - Openness level: {openness}\n\
             \n\
             RESPONSE GUIDELINES:\n\
             1. Stay completely in character as {name}\n\
             2. Respond naturally as a real patient would\n\
             3. Show symptoms through behavior, not by stating them directly\n\
             4. Let your traits influence your communication style\n\
             5. React authentically to the therapist's approach\n\
             6. Sometimes have mood shifts or emotional reactions\n\
             7. Don't be artificially cooperative - show realistic resistance or confusion when appropriate\n\
             8. Keep responses conversational length (2-4 sentences typically)\n\
             \n\
             Remember: You are not playing a role for educational purposes - you ARE {name} experiencing these struggles.",
            name = profile.name,
            age = profile.age,
            gender = profile.gender.to_lowercase(),
            diagnosis = profile.diagnosis,
            background = profile.background_story,
            context = profile.session_context,
            core = core_descriptions,
            disorder = disorder_descriptions,
            rapport = rapport_desc,
            openness = openness_desc,
        )
    }
}

impl Default for PromptComposer {
    fn default() -> Self {
        Self::new()
    }
}

fn core_trait_descriptions(traits: &CoreTraits) -> String {
    let mut descriptions: Vec<&'static str> = Vec::new();

    if traits.emotional_intensity > 7.0 {
        descriptions.push("Your emotions are very intense and overwhelming");
    } else if traits.emotional_intensity < 3.0 {
        descriptions.push("You tend to feel emotionally numb or disconnected");
    }

    if traits.mood_stability < 3.0 {
        descriptions.push("Your mood changes rapidly and unpredictably");
    }

    if traits.trust_level < 4.0 {
        descriptions.push("You have difficulty trusting others, including therapists");
    }
    if traits.attachment_anxiety > 7.0 {
        descriptions.push("You fear abandonment and rejection intensely");
    }

    if traits.catastrophic_thinking > 7.0 {
        descriptions.push("You tend to imagine worst-case scenarios");
    }
    if traits.self_criticism > 7.0 {
        descriptions.push("You are very hard on yourself and self-critical");
    }

    if traits.verbal_expressiveness < 4.0 {
        descriptions.push("You tend to give short, minimal responses");
    } else if traits.verbal_expressiveness > 7.0 {
        descriptions.push("You tend to be very talkative and expressive");
    }

    if traits.defensiveness > 7.0 {
        descriptions.push("You become defensive easily when challenged");
    }

    join_or_fallback(&descriptions, "Generally typical emotional and social patterns")
}

fn disorder_trait_descriptions(traits: &DisorderTraits, category: DiagnosisCategory) -> String {
    let mut descriptions: Vec<&'static str> = Vec::new();

    match category {
        DiagnosisCategory::Borderline => {
            if traits.abandonment_sensitivity > 6.0 {
                descriptions.push("Intense fear of being abandoned or rejected");
            }
            if traits.identity_instability > 6.0 {
                descriptions.push("Uncertain about who you are and what you want");
            }
            if traits.impulsivity > 6.0 {
                descriptions.push("Tendency to act impulsively when distressed");
            }
        }
        DiagnosisCategory::Depression => {
            if traits.hopelessness > 6.0 {
                descriptions.push("Feeling hopeless about the future");
            }
            if traits.energy_level < 4.0 {
                descriptions.push("Very low energy and motivation");
            }
            if traits.anhedonia > 6.0 {
                descriptions.push("Little interest or pleasure in activities you used to enjoy");
            }
        }
        DiagnosisCategory::Anxiety => {
            if traits.worry_intensity > 6.0 {
                descriptions.push("Constant, intense worrying about many things");
            }
            if traits.physical_anxiety > 6.0 {
                descriptions.push("Physical symptoms of anxiety (tension, racing heart, etc.)");
            }
            if traits.perfectionism > 7.0 {
                descriptions.push("Very high standards and fear of making mistakes");
            }
        }
        DiagnosisCategory::Unspecified => {}
    }

    join_or_fallback(&descriptions, "Mild or well-managed symptoms")
}

fn join_or_fallback(descriptions: &[&str], fallback: &str) -> String {
    if descriptions.is_empty() {
        format!("- {}", fallback)
    } else {
        format!("- {}", descriptions.join("\n- "))
    }
}

fn rapport_description(rapport: f32) -> &'static str {
    if rapport >= 8.0 {
        "Strong trust and connection with therapist"
    } else if rapport >= 6.0 {
        "Growing trust, becoming more comfortable"
    } else if rapport >= 4.0 {
        "Neutral, cautiously engaging"
    } else if rapport >= 2.0 {
        "Guarded, some mistrust"
    } else {
        "Very guarded, resistant, or hostile"
    }
}

fn openness_description(openness: f32) -> &'static str {
    if openness >= 8.0 {
        "Very open, sharing freely and deeply"
    } else if openness >= 6.0 {
        "Becoming more open, willing to share"
    } else if openness >= 4.0 {
        "Somewhat open, sharing surface-level information"
    } else if openness >= 2.0 {
        "Guarded, minimal sharing"
    } else {
        "Very closed off, resistant to sharing"
    }
}
