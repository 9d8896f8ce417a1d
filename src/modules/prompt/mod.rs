pub mod composer;

pub use composer::{Directive, PromptComposer, HISTORY_WINDOW};
