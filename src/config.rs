//! Game configuration.
//!
//! Configuration is read from a TOML file. Every field is optional:
//!
//! ```toml
//! dataset = "data/diseases.json"
//! suggestions = 3
//! seed = 42
//!
//! [inference]
//! alpha = 5.0
//! smoother = 0.08
//! critical_penalty = 0.2
//! ```

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{ConfigError, HealthFairResult};
use crate::inference::InferenceParams;
use crate::selection::DEFAULT_SUGGESTIONS;

/// Settings for a playing session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct GameConfig {
    /// Dataset to load; the bundled demo catalogue is used when absent.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dataset: Option<PathBuf>,

    /// Number of symptoms offered per question.
    pub suggestions: usize,

    /// Seed for reproducible sessions; entropy is used when absent.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub seed: Option<u64>,

    /// Belief-update parameters.
    pub inference: InferenceParams,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            dataset: None,
            suggestions: DEFAULT_SUGGESTIONS,
            seed: None,
            inference: InferenceParams::default(),
        }
    }
}

impl GameConfig {
    /// Parses and validates a TOML document.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Parse` for malformed TOML and a
    /// `ValidationError` for out-of-range inference parameters.
    pub fn from_toml_str(toml: &str) -> HealthFairResult<Self> {
        let config: Self = toml::from_str(toml).map_err(ConfigError::from)?;
        config.validate()?;
        Ok(config)
    }

    /// Reads and validates a TOML file.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Io` if the file cannot be read, otherwise as
    /// [`from_toml_str`](Self::from_toml_str).
    pub fn load(path: impl AsRef<Path>) -> HealthFairResult<Self> {
        let path = path.as_ref();
        let toml = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&toml)
    }

    /// Checks the inference parameters.
    ///
    /// # Errors
    ///
    /// Returns the first invalid parameter.
    pub fn validate(&self) -> HealthFairResult<()> {
        self.inference.validate()?;
        Ok(())
    }

    /// Sets the seed.
    #[must_use]
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Sets the number of suggestions.
    #[must_use]
    pub fn with_suggestions(mut self, suggestions: usize) -> Self {
        self.suggestions = suggestions;
        self
    }
}
