//! Disease and symptom types.
//!
//! A disease is an immutable record loaded once from the dataset: an
//! identifier, a display name, a prior weight and a table of
//! `P(symptom present | disease)` values.

use std::borrow::Borrow;
use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::ValidationError;

/// Likelihood assumed for a symptom the disease record does not list.
pub const DEFAULT_LIKELIHOOD: f64 = 0.01;

macro_rules! string_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(String);

        impl $name {
            /// Creates an identifier from any string-like value.
            #[must_use]
            pub fn new(id: impl Into<String>) -> Self {
                Self(id.into())
            }

            /// Returns the identifier as a string slice.
            #[must_use]
            pub fn as_str(&self) -> &str {
                &self.0
            }

            /// Returns true if the identifier is empty or whitespace.
            #[must_use]
            pub fn is_blank(&self) -> bool {
                self.0.trim().is_empty()
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(&self.0)
            }
        }

        impl From<&str> for $name {
            fn from(id: &str) -> Self {
                Self(id.to_string())
            }
        }

        impl From<String> for $name {
            fn from(id: String) -> Self {
                Self(id)
            }
        }

        impl AsRef<str> for $name {
            fn as_ref(&self) -> &str {
                &self.0
            }
        }

        impl Borrow<str> for $name {
            fn borrow(&self) -> &str {
                &self.0
            }
        }
    };
}

string_id! {
    /// Unique identifier for a disease (e.g. `"FLU"`).
    DiseaseId
}

string_id! {
    /// Unique identifier for a symptom (e.g. `"fever"`).
    SymptomId
}

/// Per-disease table of `P(symptom present | disease)`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SymptomLikelihoods(BTreeMap<SymptomId, f64>);

impl SymptomLikelihoods {
    /// Creates an empty table.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds or replaces a likelihood.
    #[must_use]
    pub fn with(mut self, symptom: impl Into<SymptomId>, likelihood: f64) -> Self {
        self.0.insert(symptom.into(), likelihood);
        self
    }

    /// Returns the listed likelihood for a symptom, if any.
    #[must_use]
    pub fn get(&self, symptom: &str) -> Option<f64> {
        self.0.get(symptom).copied()
    }

    /// Returns true if the symptom is listed.
    #[must_use]
    pub fn contains(&self, symptom: &str) -> bool {
        self.0.contains_key(symptom)
    }

    /// Number of listed symptoms.
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Returns true if no symptom is listed.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Iterates listed symptoms in identifier order.
    pub fn iter(&self) -> impl Iterator<Item = (&SymptomId, f64)> {
        self.0.iter().map(|(s, p)| (s, *p))
    }

    /// Iterates listed symptom identifiers.
    pub fn symptoms(&self) -> impl Iterator<Item = &SymptomId> {
        self.0.keys()
    }

    /// The most likely listed symptom.
    ///
    /// Ties go to the smallest identifier.
    #[must_use]
    pub fn top(&self) -> Option<(&SymptomId, f64)> {
        let mut best: Option<(&SymptomId, f64)> = None;
        for (symptom, p) in self.iter() {
            match best {
                Some((_, best_p)) if p <= best_p => {}
                _ => best = Some((symptom, p)),
            }
        }
        best
    }

    fn validate(&self, disease: &DiseaseId) -> Result<(), ValidationError> {
        for (symptom, p) in self.iter() {
            if symptom.is_blank() {
                return Err(ValidationError::EmptySymptomId {
                    disease: disease.clone(),
                });
            }
            if !(0.0..=1.0).contains(&p) {
                return Err(ValidationError::LikelihoodOutOfRange {
                    disease: disease.clone(),
                    symptom: symptom.clone(),
                    value: p,
                });
            }
        }
        Ok(())
    }
}

impl FromIterator<(SymptomId, f64)> for SymptomLikelihoods {
    fn from_iter<I: IntoIterator<Item = (SymptomId, f64)>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

/// A candidate diagnosis.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "DiseaseFields")]
pub struct Disease {
    /// Unique identifier.
    pub id: DiseaseId,

    /// Display name.
    pub name: String,

    /// Raw prior weight (renormalized across the catalogue).
    prior: f64,

    /// `P(symptom present | this disease)`.
    pub symptom_likelihood: SymptomLikelihoods,

    /// Free-form risk factor weights carried from the dataset.
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub risk_factors: BTreeMap<String, f64>,
}

/// Unvalidated serde shape of [`Disease`].
#[derive(Deserialize)]
struct DiseaseFields {
    id: DiseaseId,
    name: String,
    prior: f64,
    #[serde(default)]
    symptom_likelihood: SymptomLikelihoods,
    #[serde(default)]
    risk_factors: BTreeMap<String, f64>,
}

impl TryFrom<DiseaseFields> for Disease {
    type Error = ValidationError;

    fn try_from(raw: DiseaseFields) -> Result<Self, Self::Error> {
        Ok(Self::new(raw.id, raw.name, raw.prior, raw.symptom_likelihood)?.with_risk_factors(raw.risk_factors))
    }
}

impl Disease {
    /// Creates a validated disease.
    ///
    /// # Errors
    ///
    /// Returns a `ValidationError` if the id is blank, the prior is negative or
    /// non-finite, or a likelihood falls outside [0.0, 1.0].
    pub fn new(
        id: impl Into<DiseaseId>,
        name: impl Into<String>,
        prior: f64,
        symptom_likelihood: SymptomLikelihoods,
    ) -> Result<Self, ValidationError> {
        let id = id.into();
        if id.is_blank() {
            return Err(ValidationError::EmptyDiseaseId);
        }
        if !prior.is_finite() || prior < 0.0 {
            return Err(ValidationError::InvalidPrior { disease: id, value: prior });
        }
        symptom_likelihood.validate(&id)?;
        Ok(Self {
            id,
            name: name.into(),
            prior,
            symptom_likelihood,
            risk_factors: BTreeMap::new(),
        })
    }

    /// Attaches risk factor weights.
    #[must_use]
    pub fn with_risk_factors(mut self, risk_factors: BTreeMap<String, f64>) -> Self {
        self.risk_factors = risk_factors;
        self
    }

    /// Raw (unnormalized) prior weight.
    #[must_use]
    pub const fn prior(&self) -> f64 {
        self.prior
    }

    /// `P(symptom | disease)`, or `fallback` for an unlisted symptom.
    #[must_use]
    pub fn likelihood(&self, symptom: &str, fallback: f64) -> f64 {
        self.symptom_likelihood.get(symptom).unwrap_or(fallback)
    }
}

impl fmt::Display for Disease {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}) {}", self.id, self.name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn flu_table() -> SymptomLikelihoods {
        SymptomLikelihoods::new()
            .with("fever", 0.9)
            .with("cough", 0.7)
            .with("headache", 0.9)
    }

    #[test]
    fn test_disease_valid() {
        let d = Disease::new("FLU", "Influenza", 0.3, flu_table()).unwrap();
        assert_eq!(d.id.as_str(), "FLU");
        assert_eq!(d.prior(), 0.3);
        assert_eq!(d.symptom_likelihood.len(), 3);
    }

    #[test]
    fn test_disease_rejects_bad_prior() {
        assert!(Disease::new("FLU", "Influenza", -0.1, flu_table()).is_err());
        assert!(Disease::new("FLU", "Influenza", f64::NAN, flu_table()).is_err());
        assert!(Disease::new("FLU", "Influenza", f64::INFINITY, flu_table()).is_err());
    }

    #[test]
    fn test_disease_rejects_bad_likelihood() {
        let table = SymptomLikelihoods::new().with("fever", 1.2);
        let err = Disease::new("FLU", "Influenza", 0.3, table).unwrap_err();
        assert!(matches!(err, ValidationError::LikelihoodOutOfRange { .. }));
    }

    #[test]
    fn test_disease_rejects_blank_ids() {
        assert!(matches!(
            Disease::new("  ", "Nothing", 0.1, SymptomLikelihoods::new()),
            Err(ValidationError::EmptyDiseaseId)
        ));
        let table = SymptomLikelihoods::new().with("", 0.5);
        assert!(matches!(
            Disease::new("X", "X", 0.1, table),
            Err(ValidationError::EmptySymptomId { .. })
        ));
    }

    #[test]
    fn test_unlisted_symptom_uses_fallback() {
        let d = Disease::new("FLU", "Influenza", 0.3, flu_table()).unwrap();
        let params = crate::inference::InferenceParams::default();
        assert_eq!(d.likelihood("fever", params.default_likelihood), 0.9);
        assert_eq!(d.likelihood("rash", params.default_likelihood), DEFAULT_LIKELIHOOD);
        assert_eq!(d.likelihood("rash", 0.25), 0.25);
    }

    #[test]
    fn test_top_symptom_breaks_ties_by_id() {
        let table = flu_table();
        let (top, p) = table.top().unwrap();
        assert_eq!(top.as_str(), "fever");
        assert_eq!(p, 0.9);
        assert!(SymptomLikelihoods::new().top().is_none());
    }

    #[test]
    fn test_ids_borrow_as_str() {
        let mut map = BTreeMap::new();
        map.insert(SymptomId::from("fever"), 1);
        assert_eq!(map.get("fever"), Some(&1));
        assert_eq!(format!("{}", DiseaseId::from("CC")), "CC");
    }

    #[test]
    fn test_disease_serialization() {
        let d = Disease::new("FLU", "Influenza", 0.3, flu_table()).unwrap();
        let json = serde_json::to_string(&d).unwrap();
        assert!(json.contains("\"id\":\"FLU\""));
        let back: Disease = serde_json::from_str(&json).unwrap();
        assert_eq!(back, d);
    }

    #[test]
    fn test_deserialize_validates() {
        let negative = r#"{"id":"FLU","name":"Influenza","prior":-1.0,"symptom_likelihood":{}}"#;
        assert!(serde_json::from_str::<Disease>(negative).is_err());

        let blank = r#"{"id":" ","name":"Nothing","prior":0.1}"#;
        assert!(serde_json::from_str::<Disease>(blank).is_err());

        let out_of_range = r#"{"id":"FLU","name":"Influenza","prior":0.1,"symptom_likelihood":{"fever":1.5}}"#;
        let err = serde_json::from_str::<Disease>(out_of_range).unwrap_err();
        assert!(err.to_string().contains("fever"));

        let ok = r#"{"id":"FLU","name":"Influenza","prior":0.1,"risk_factors":{"smoker":0.3}}"#;
        let d: Disease = serde_json::from_str(ok).unwrap();
        assert_eq!(d.risk_factors.get("smoker"), Some(&0.3));
    }
}
