pub mod classifier;

pub use classifier::{Technique, TechniqueClassifier, TechniqueScores};
