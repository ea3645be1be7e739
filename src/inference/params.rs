use serde::{Deserialize, Serialize};

use crate::disease::DEFAULT_LIKELIHOOD;
use crate::error::ValidationError;

/// Tunable constants for the belief update.
///
/// Parameters are pure data so an update can be reproduced exactly from
/// the same priors, evidence and parameter set.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct InferenceParams {
    /// Weight of the match-ratio boost.
    pub alpha: f64,

    /// Constant added to every disease's boost factor.
    pub smoother: f64,

    /// Smallest value any intermediate probability may take.
    pub floor: f64,

    /// Likelihoods are clamped into `[min_likelihood, 1 - min_likelihood]`.
    pub min_likelihood: f64,

    /// Multiplier applied when none of a disease's critical symptoms is confirmed.
    pub critical_penalty: f64,

    /// Likelihood used for symptoms a disease does not list.
    pub default_likelihood: f64,
}

impl Default for InferenceParams {
    fn default() -> Self {
        Self {
            alpha: 5.0,
            smoother: 0.08,
            floor: 1e-10,
            min_likelihood: 1e-4,
            critical_penalty: 0.2,
            default_likelihood: DEFAULT_LIKELIHOOD,
        }
    }
}

impl InferenceParams {
    /// Plain Bayesian update: no boost and no critical penalty.
    #[must_use]
    pub fn bayes_only() -> Self {
        Self {
            alpha: 0.0,
            smoother: 0.0,
            critical_penalty: 1.0,
            ..Self::default()
        }
    }

    /// Sets the match-ratio weight.
    #[must_use]
    pub fn with_alpha(mut self, alpha: f64) -> Self {
        self.alpha = alpha;
        self
    }

    /// Sets the smoothing constant.
    #[must_use]
    pub fn with_smoother(mut self, smoother: f64) -> Self {
        self.smoother = smoother;
        self
    }

    /// Sets the critical-symptom penalty.
    #[must_use]
    pub fn with_critical_penalty(mut self, penalty: f64) -> Self {
        self.critical_penalty = penalty;
        self
    }

    /// Checks every parameter against its valid range.
    ///
    /// # Errors
    ///
    /// Returns `ValidationError::InvalidParameter` naming the first bad value.
    pub fn validate(&self) -> Result<(), ValidationError> {
        check("alpha", self.alpha, |v| v >= 0.0, "must be non-negative")?;
        check("smoother", self.smoother, |v| v >= 0.0, "must be non-negative")?;
        check("floor", self.floor, |v| v > 0.0 && v < 1.0, "must be in (0, 1)")?;
        check(
            "min_likelihood",
            self.min_likelihood,
            |v| (0.0..0.5).contains(&v),
            "must be in [0, 0.5)",
        )?;
        check(
            "critical_penalty",
            self.critical_penalty,
            |v| (0.0..=1.0).contains(&v),
            "must be in [0, 1]",
        )?;
        check(
            "default_likelihood",
            self.default_likelihood,
            |v| (0.0..=1.0).contains(&v),
            "must be in [0, 1]",
        )
    }
}

fn check(
    name: &'static str,
    value: f64,
    ok: impl Fn(f64) -> bool,
    reason: &'static str,
) -> Result<(), ValidationError> {
    if value.is_finite() && ok(value) {
        Ok(())
    } else {
        Err(ValidationError::InvalidParameter { name, value, reason })
    }
}
