pub mod generator_mock;

pub use generator_mock::ScriptedGenerator;
