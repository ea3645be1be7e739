//! # Health Fair - differential diagnosis training
//!
//! Health Fair simulates a diagnostic exercise. A virtual patient is given a
//! concealed disease; the player asks about symptoms and the engine keeps a
//! posterior distribution over candidate diseases, recomputed after every
//! answer.
//!
//! ## Core Concepts
//!
//! - **Catalogue**: the diseases, their priors and symptom likelihoods
//! - **EvidenceSet**: symptoms confirmed or negated so far
//! - **BeliefState**: the posterior, always normalized over surviving diseases
//! - **Inference**: log-space naive Bayes, a match-ratio boost and a
//!   critical-symptom penalty
//! - **Case**: one patient, from arrival to diagnosis
//!
//! ## Usage
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use healthfair::{Case, Catalogue, GameConfig};
//!
//! let catalogue = Arc::new(Catalogue::demo()?);
//! let config = GameConfig::default().with_seed(7);
//! let mut case = Case::from_config(catalogue, &config)?;
//!
//! let options = case.suggest();
//! case.ask(options[0].clone());
//! println!("{}", case.belief());
//! let outcome = case.diagnose("FLU");
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

// Data
pub mod belief;
pub mod catalogue;
pub mod disease;
pub mod error;
pub mod evidence;

// Engine
pub mod inference;
pub mod outcome;
pub mod selection;

// Game
pub mod config;
pub mod patient;
pub mod session;

// Re-export primary types at crate root for convenience
pub use belief::{eliminate, BeliefState};
pub use catalogue::{Catalogue, DiseaseRecord};
pub use config::GameConfig;
pub use disease::{Disease, DiseaseId, SymptomId, SymptomLikelihoods, DEFAULT_LIKELIHOOD};
pub use error::{ConfigError, DatasetError, HealthFairError, HealthFairResult, ValidationError};
pub use evidence::{record_answer, EvidenceSet};
pub use inference::{update, CriticalSymptoms, EvidenceModel, InferenceParams, LikelihoodTable};
pub use outcome::{diagnose, Outcome};
pub use patient::{Answer, Diet, Patient, Profile};
pub use selection::suggest;
pub use session::{new_case, AnsweredQuestion, Case, CaseId};
