use super::patient_config::{CoreTraits, DisorderTraits, PatientConfig};

/// Pre-built personas for quick session setup. Each returns a fresh,
/// already-valid configuration.
pub fn emma_bpd() -> PatientConfig {
    PatientConfig {
        name: "Emma".to_string(),
        age: 19,
        gender: "Female".to_string(),
        diagnosis: "Borderline Personality Disorder".to_string(),
        background_story: "College student, recent painful breakup, history of unstable relationships, struggles with self-image".to_string(),
        session_context: "Emma comes in distressed after her boyfriend broke up with her yesterday. She's oscillating between anger and despair.".to_string(),
        core_traits: CoreTraits {
            emotional_intensity: 9.0,
            mood_stability: 2.0,
            anger_reactivity: 8.0,
            trust_level: 3.0,
            attachment_anxiety: 9.0,
            boundary_awareness: 2.0,
            black_white_thinking: 8.0,
            self_criticism: 9.0,
            emotional_openness: 7.0,
            defensiveness: 8.0,
            ..CoreTraits::default()
        },
        disorder_traits: DisorderTraits {
            abandonment_sensitivity: 9.0,
            identity_instability: 8.0,
            impulsivity: 7.0,
            self_harm_risk: 6.0,
            dissociation_frequency: 5.0,
            ..DisorderTraits::default()
        },
    }
}

pub fn david_mdd() -> PatientConfig {
    PatientConfig {
        name: "David".to_string(),
        age: 45,
        gender: "Male".to_string(),
        diagnosis: "Major Depressive Disorder".to_string(),
        background_story: "Recently unemployed executive, financial stress, feels like a failure, withdrawn from family".to_string(),
        session_context: "David lost his job 3 months ago. He speaks slowly, avoids eye contact, and gives minimal responses.".to_string(),
        core_traits: CoreTraits {
            mood_stability: 2.0,
            emotional_awareness: 3.0,
            trust_level: 4.0,
            social_withdrawal: 8.0,
            catastrophic_thinking: 8.0,
            self_criticism: 9.0,
            concentration_ability: 3.0,
            verbal_expressiveness: 3.0,
            emotional_openness: 2.0,
            response_detail_level: 2.0,
            ..CoreTraits::default()
        },
        disorder_traits: DisorderTraits {
            hopelessness: 8.0,
            energy_level: 2.0,
            anhedonia: 8.0,
            guilt_shame: 9.0,
            suicidal_ideation: 4.0,
            ..DisorderTraits::default()
        },
    }
}

pub fn sarah_gad() -> PatientConfig {
    PatientConfig {
        name: "Sarah".to_string(),
        age: 28,
        gender: "Female".to_string(),
        diagnosis: "Generalized Anxiety Disorder".to_string(),
        background_story: "New mother, perfectionist tendencies, overwhelmed by responsibilities, constant worrying".to_string(),
        session_context: "Sarah is a new mother who can't stop worrying about everything that could go wrong. She speaks rapidly and seeks constant reassurance.".to_string(),
        core_traits: CoreTraits {
            emotional_intensity: 7.0,
            mood_stability: 4.0,
            trust_level: 6.0,
            attachment_anxiety: 7.0,
            catastrophic_thinking: 9.0,
            concentration_ability: 3.0,
            verbal_expressiveness: 8.0,
            emotional_openness: 6.0,
            defensiveness: 5.0,
            ..CoreTraits::default()
        },
        disorder_traits: DisorderTraits {
            worry_intensity: 9.0,
            physical_anxiety: 8.0,
            avoidance_behaviors: 6.0,
            perfectionism: 9.0,
            control_need: 8.0,
            ..DisorderTraits::default()
        },
    }
}

/// Look up a template by short name, as used by the CLI.
pub fn by_name(name: &str) -> Option<PatientConfig> {
    match name.to_lowercase().as_str() {
        "emma" | "emma_bpd" => Some(emma_bpd()),
        "david" | "david_mdd" => Some(david_mdd()),
        "sarah" | "sarah_gad" => Some(sarah_gad()),
        _ => None,
    }
}

pub fn template_names() -> [&'static str; 3] {
    ["emma", "david", "sarah"]
}
