use serde::{Deserialize, Serialize};

/// Who produced an utterance. Stored explicitly rather than inferred from
/// turn parity so a trimmed history window can never mislabel speakers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Speaker {
    Patient,
    Therapist,
}

/// One conversation entry. Text is stored verbatim, including any `*...*`
/// stage-direction markup; stripping is a presentation concern.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Utterance {
    pub speaker: Speaker,
    pub text: String,
    pub index: usize,
}

/// Append-only, ordered conversation history.
#[derive(Debug, Clone, Default)]
pub struct Transcript {
    entries: Vec<Utterance>,
}

impl Transcript {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, speaker: Speaker, text: impl Into<String>) -> &Utterance {
        let index = self.entries.len();
        self.entries.push(Utterance {
            speaker,
            text: text.into(),
            index,
        });
        &self.entries[index]
    }

    pub fn entries(&self) -> &[Utterance] {
        &self.entries
    }

    /// The most recent `n` entries, oldest first.
    pub fn recent(&self, n: usize) -> &[Utterance] {
        let start = self.entries.len().saturating_sub(n);
        &self.entries[start..]
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }
}
