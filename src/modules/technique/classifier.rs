use lazy_static::lazy_static;
use serde::Serialize;

/// Conversational technique categories detected in therapist utterances.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum Technique {
    Validation,
    Empathy,
    Clarification,
    Reflection,
    RapportBuilding,
    StructuredChallenge,
    Acceptance,
    Acknowledgment,
    Reframing,
}

impl Technique {
    pub const COUNT: usize = 9;

    pub const ALL: [Technique; Technique::COUNT] = [
        Technique::Validation,
        Technique::Empathy,
        Technique::Clarification,
        Technique::Reflection,
        Technique::RapportBuilding,
        Technique::StructuredChallenge,
        Technique::Acceptance,
        Technique::Acknowledgment,
        Technique::Reframing,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            Technique::Validation => "validation",
            Technique::Empathy => "empathy",
            Technique::Clarification => "clarification",
            Technique::Reflection => "reflection",
            Technique::RapportBuilding => "rapport-building",
            Technique::StructuredChallenge => "structured-challenge",
            Technique::Acceptance => "acceptance",
            Technique::Acknowledgment => "acknowledgment",
            Technique::Reframing => "reframing",
        }
    }

    fn index(&self) -> usize {
        *self as usize
    }
}

lazy_static! {
    // Keyword phrases are stored lowercase; matching lowercases the utterance.
    static ref TECHNIQUE_LEXICON: Vec<(Technique, Vec<&'static str>)> = vec![
        (
            Technique::Validation,
            vec!["understand", "makes sense", "hear you", "valid", "difficult"],
        ),
        (
            Technique::Empathy,
            vec!["feel", "sounds", "imagine", "must be", "experiencing"],
        ),
        (
            Technique::Clarification,
            vec!["what do you mean", "can you tell me more", "help me understand", "clarify"],
        ),
        (
            Technique::Reflection,
            vec!["you're saying", "sounds like", "it seems", "you feel", "you're experiencing"],
        ),
        (
            Technique::RapportBuilding,
            vec!["thank you for sharing", "appreciate", "brave", "strength", "trust"],
        ),
        (
            Technique::StructuredChallenge,
            vec!["thought", "thinking", "evidence", "alternative", "realistic", "challenge"],
        ),
        (
            Technique::Acceptance,
            vec!["okay", "that's alright", "understandable", "human", "normal"],
        ),
        (
            Technique::Acknowledgment,
            vec!["i see", "i notice", "i hear", "yes", "right"],
        ),
        (
            Technique::Reframing,
            vec!["different way", "perspective", "reframe", "consider", "another view"],
        ),
    ];
}

/// Per-category scores in [0, 1], recomputed fresh for each utterance.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
pub struct TechniqueScores {
    values: [f32; Technique::COUNT],
}

impl TechniqueScores {
    pub fn get(&self, technique: Technique) -> f32 {
        self.values[technique.index()]
    }

    /// Builder for synthetic score vectors, mainly for tests and tooling.
    pub fn with(mut self, technique: Technique, score: f32) -> Self {
        self.set(technique, score);
        self
    }

    fn set(&mut self, technique: Technique, score: f32) {
        self.values[technique.index()] = score;
    }

    pub fn iter(&self) -> impl Iterator<Item = (Technique, f32)> + '_ {
        Technique::ALL.iter().map(|&technique| (technique, self.get(technique)))
    }

    /// Categories with a non-zero score, in fixed category order.
    pub fn detected(&self) -> Vec<Technique> {
        Technique::ALL
            .iter()
            .copied()
            .filter(|&technique| self.get(technique) > 0.0)
            .collect()
    }
}

/// Scores therapist utterances against a fixed keyword lexicon.
///
/// Each category's score is the fraction of its distinct keywords that occur
/// as case-insensitive substrings of the utterance, capped at 1.0. A keyword
/// matched multiple times still counts once.
pub struct TechniqueClassifier;

impl TechniqueClassifier {
    pub fn new() -> Self {
        TechniqueClassifier
    }

    pub fn score(&self, utterance: &str) -> TechniqueScores {
        let lowered = utterance.to_lowercase();
        let mut scores = TechniqueScores::default();

        for (technique, keywords) in TECHNIQUE_LEXICON.iter() {
            let matched = keywords.iter().filter(|keyword| lowered.contains(*keyword)).count();
            let score = (matched as f32 / keywords.len() as f32).min(1.0);
            scores.set(*technique, score);
        }

        scores
    }
}

impl Default for TechniqueClassifier {
    fn default() -> Self {
        Self::new()
    }
}
