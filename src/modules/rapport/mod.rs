pub mod engine;

pub use engine::{EmotionalState, RapportEngine, StateUpdate, OPENNESS_DEFAULT, RAPPORT_DEFAULT};
