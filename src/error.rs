//! Error types for Health Fair.
//!
//! The inference core is total and never fails; errors only exist at the
//! edges, where a dataset or configuration file is read and validated.
//! All errors are strongly typed using thiserror.

use std::path::PathBuf;

use thiserror::Error;

use crate::disease::{DiseaseId, SymptomId};

/// Validation errors raised while building a catalogue or parameter set.
#[derive(Debug, Error)]
pub enum ValidationError {
    #[error("Likelihood {value} for symptom '{symptom}' of disease '{disease}' is out of range [0.0, 1.0]")]
    LikelihoodOutOfRange {
        disease: DiseaseId,
        symptom: SymptomId,
        value: f64,
    },

    #[error("Prior weight {value} for disease '{disease}' must be finite and non-negative")]
    InvalidPrior {
        disease: DiseaseId,
        value: f64,
    },

    #[error("Disease identifier cannot be empty")]
    EmptyDiseaseId,

    #[error("Symptom identifier cannot be empty (disease '{disease}')")]
    EmptySymptomId {
        disease: DiseaseId,
    },

    #[error("Duplicate disease identifier: {id}")]
    DuplicateDisease {
        id: DiseaseId,
    },

    #[error("Catalogue contains no diseases")]
    EmptyCatalogue,

    #[error("Unknown disease: {id}")]
    UnknownDisease {
        id: DiseaseId,
    },

    #[error("Critical symptom '{symptom}' is not listed for disease '{disease}'")]
    UnknownCriticalSymptom {
        disease: DiseaseId,
        symptom: SymptomId,
    },

    #[error("Parameter '{name}' has invalid value {value}: {reason}")]
    InvalidParameter {
        name: &'static str,
        value: f64,
        reason: &'static str,
    },
}

/// Errors raised while reading a disease dataset.
#[derive(Debug, Error)]
pub enum DatasetError {
    #[error("Failed to read dataset {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Malformed dataset: {0}")]
    Parse(#[from] serde_json::Error),
}

/// Errors raised while reading a configuration file.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Malformed config: {0}")]
    Parse(#[from] toml::de::Error),
}

/// Top-level error type for Health Fair.
#[derive(Debug, Error)]
pub enum HealthFairError {
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),

    #[error("Dataset error: {0}")]
    Dataset(#[from] DatasetError),

    #[error("Config error: {0}")]
    Config(#[from] ConfigError),
}

impl HealthFairError {
    /// Returns true if this is a validation error.
    #[must_use]
    pub const fn is_validation(&self) -> bool {
        matches!(self, Self::Validation(_))
    }

    /// Returns true if this is a dataset error.
    #[must_use]
    pub const fn is_dataset(&self) -> bool {
        matches!(self, Self::Dataset(_))
    }

    /// Returns true if this is a config error.
    #[must_use]
    pub const fn is_config(&self) -> bool {
        matches!(self, Self::Config(_))
    }
}

/// Result type alias for Health Fair operations.
pub type HealthFairResult<T> = Result<T, HealthFairError>;
