pub mod patient_config;
pub mod templates;

pub use patient_config::{
    ConfigError, CoreTraits, DiagnosisCategory, DisorderTraits, PatientConfig, TraitValue,
    TRAIT_MAX, TRAIT_MIN,
};
