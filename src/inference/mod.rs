//! Inference layer.
//!
//! The belief update is a pure function of the priors, the full evidence
//! history, the evidence model and the parameter set. It is recomputed from
//! scratch on every answer rather than carried forward incrementally.

mod model;
mod params;
mod update;

pub use model::{CriticalSymptoms, EvidenceModel, LikelihoodTable};
pub use params::InferenceParams;
pub use update::{match_ratio, update};
