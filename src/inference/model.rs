use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};

use crate::disease::{DiseaseId, SymptomId, SymptomLikelihoods};

/// Read-only source of per-disease symptom likelihoods.
pub trait EvidenceModel {
    /// Likelihood table for a disease, or `None` if the disease is unknown.
    fn likelihoods(&self, disease: &str) -> Option<&SymptomLikelihoods>;

    /// Listed `P(symptom | disease)`, if any.
    fn likelihood(&self, disease: &str, symptom: &str) -> Option<f64> {
        self.likelihoods(disease).and_then(|t| t.get(symptom))
    }

    /// Number of symptoms listed for a disease.
    fn listed_count(&self, disease: &str) -> usize {
        self.likelihoods(disease).map_or(0, SymptomLikelihoods::len)
    }

    /// The disease's most likely listed symptom.
    fn top_symptom(&self, disease: &str) -> Option<&SymptomId> {
        self.likelihoods(disease).and_then(|t| t.top()).map(|(s, _)| s)
    }
}

/// In-memory evidence model keyed by disease.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LikelihoodTable(BTreeMap<DiseaseId, SymptomLikelihoods>);

impl LikelihoodTable {
    /// Creates an empty table.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds or replaces a disease's table.
    #[must_use]
    pub fn with(mut self, disease: impl Into<DiseaseId>, likelihoods: SymptomLikelihoods) -> Self {
        self.0.insert(disease.into(), likelihoods);
        self
    }
}

impl EvidenceModel for LikelihoodTable {
    fn likelihoods(&self, disease: &str) -> Option<&SymptomLikelihoods> {
        self.0.get(disease)
    }
}

/// Diagnostically decisive symptoms per disease.
///
/// Diseases without an entry, or with an empty set, are never penalized.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CriticalSymptoms(BTreeMap<DiseaseId, BTreeSet<SymptomId>>);

impl CriticalSymptoms {
    /// Creates an empty table.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds critical symptoms for a disease.
    #[must_use]
    pub fn with<I, S>(mut self, disease: impl Into<DiseaseId>, symptoms: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<SymptomId>,
    {
        self.insert(disease, symptoms);
        self
    }

    /// Adds critical symptoms for a disease.
    pub fn insert<I, S>(&mut self, disease: impl Into<DiseaseId>, symptoms: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<SymptomId>,
    {
        self.0
            .entry(disease.into())
            .or_default()
            .extend(symptoms.into_iter().map(Into::into));
    }

    /// Critical symptoms of a disease, if any are registered.
    #[must_use]
    pub fn get(&self, disease: &str) -> Option<&BTreeSet<SymptomId>> {
        self.0.get(disease).filter(|s| !s.is_empty())
    }

    /// Returns true if the disease should be penalized given the confirmed symptoms.
    #[must_use]
    pub fn is_unmet(&self, disease: &str, confirmed: &BTreeSet<&str>) -> bool {
        self.get(disease)
            .is_some_and(|critical| !critical.iter().any(|s| confirmed.contains(s.as_str())))
    }

    /// Returns true if no disease has critical symptoms.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.values().all(BTreeSet::is_empty)
    }

    /// Iterates registered diseases and their critical symptoms.
    pub fn iter(&self) -> impl Iterator<Item = (&DiseaseId, &BTreeSet<SymptomId>)> {
        self.0.iter()
    }
}
