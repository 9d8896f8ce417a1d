pub mod generator;
pub mod prompt;
pub mod rapport;
pub mod technique;
pub mod voice;
