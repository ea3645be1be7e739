//! Disease catalogue and dataset loading.
//!
//! The catalogue is loaded once per process and shared read-only by every
//! case. It doubles as the evidence model for inference and carries the
//! per-disease critical-symptom table.
//!
//! Dataset format (JSON):
//!
//! ```json
//! {
//!   "diseases": [
//!     {
//!       "id": "FLU",
//!       "name": "Influenza",
//!       "prior": 0.2,
//!       "symptom_likelihood": { "fever": 0.9, "cough": 0.6 },
//!       "risk_factors": { "smoker": 0.3 },
//!       "critical_symptoms": ["fever"]
//!     }
//!   ]
//! }
//! ```
//!
//! `name` defaults to the id, `prior` to 0, and the remaining tables to empty.

use std::collections::{BTreeMap, BTreeSet};
use std::path::Path;

use blake3::Hasher;
use serde::{Deserialize, Serialize};

use crate::belief::BeliefState;
use crate::disease::{Disease, DiseaseId, SymptomId, SymptomLikelihoods};
use crate::error::{DatasetError, HealthFairResult, ValidationError};
use crate::inference::{CriticalSymptoms, EvidenceModel};

const DEMO_DATASET: &str = include_str!("../data/diseases.json");

/// One disease entry as stored in the dataset file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DiseaseRecord {
    /// Unique identifier.
    pub id: DiseaseId,
    /// Display name; the id is used when absent.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// Raw prior weight.
    #[serde(default)]
    pub prior: f64,
    /// `P(symptom | disease)`.
    #[serde(default)]
    pub symptom_likelihood: SymptomLikelihoods,
    /// Risk factor weights.
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub risk_factors: BTreeMap<String, f64>,
    /// Diagnostically decisive symptoms.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub critical_symptoms: Vec<SymptomId>,
}

#[derive(Debug, Deserialize)]
struct DatasetFile {
    #[serde(default)]
    diseases: Vec<DiseaseRecord>,
}

/// Immutable set of candidate diseases.
#[derive(Debug, Clone, PartialEq)]
pub struct Catalogue {
    diseases: Vec<Disease>,
    index: BTreeMap<DiseaseId, usize>,
    critical: CriticalSymptoms,
}

impl Catalogue {
    /// Builds a catalogue with no critical symptoms.
    ///
    /// # Errors
    ///
    /// Returns `ValidationError::EmptyCatalogue` for an empty list and
    /// `ValidationError::DuplicateDisease` if an id repeats.
    pub fn new(diseases: Vec<Disease>) -> Result<Self, ValidationError> {
        if diseases.is_empty() {
            return Err(ValidationError::EmptyCatalogue);
        }
        let mut index = BTreeMap::new();
        for (i, disease) in diseases.iter().enumerate() {
            if index.insert(disease.id.clone(), i).is_some() {
                return Err(ValidationError::DuplicateDisease {
                    id: disease.id.clone(),
                });
            }
        }
        Ok(Self {
            diseases,
            index,
            critical: CriticalSymptoms::new(),
        })
    }

    /// Replaces the critical-symptom table.
    ///
    /// # Errors
    ///
    /// Every disease in the table must exist and every critical symptom must
    /// be listed in that disease's likelihood table.
    pub fn with_critical_symptoms(mut self, critical: CriticalSymptoms) -> Result<Self, ValidationError> {
        for (disease, symptoms) in critical.iter() {
            let Some(d) = self.get(disease.as_str()) else {
                return Err(ValidationError::UnknownDisease { id: disease.clone() });
            };
            if let Some(missing) = symptoms.iter().find(|s| !d.symptom_likelihood.contains(s.as_str())) {
                return Err(ValidationError::UnknownCriticalSymptom {
                    disease: disease.clone(),
                    symptom: missing.clone(),
                });
            }
        }
        self.critical = critical;
        Ok(self)
    }

    /// Builds a catalogue from dataset records.
    ///
    /// # Errors
    ///
    /// Returns a `ValidationError` for any invalid record.
    pub fn from_records(records: Vec<DiseaseRecord>) -> Result<Self, ValidationError> {
        let mut critical = CriticalSymptoms::new();
        let mut diseases = Vec::with_capacity(records.len());
        for record in records {
            let name = record.name.unwrap_or_else(|| record.id.to_string());
            if !record.critical_symptoms.is_empty() {
                critical.insert(record.id.clone(), record.critical_symptoms);
            }
            let disease = Disease::new(record.id, name, record.prior, record.symptom_likelihood)?
                .with_risk_factors(record.risk_factors);
            diseases.push(disease);
        }
        Self::new(diseases)?.with_critical_symptoms(critical)
    }

    /// Parses a JSON dataset.
    ///
    /// # Errors
    ///
    /// Returns `DatasetError::Parse` for malformed JSON and a
    /// `ValidationError` for invalid content.
    pub fn from_json_str(json: &str) -> HealthFairResult<Self> {
        let file: DatasetFile = serde_json::from_str(json).map_err(DatasetError::from)?;
        Ok(Self::from_records(file.diseases)?)
    }

    /// Reads a JSON dataset from disk.
    ///
    /// # Errors
    ///
    /// Returns `DatasetError::Io` if the file cannot be read, otherwise as
    /// [`from_json_str`](Self::from_json_str).
    pub fn load(path: impl AsRef<Path>) -> HealthFairResult<Self> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path).map_err(|source| DatasetError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json_str(&json)
    }

    /// The bundled demonstration catalogue.
    ///
    /// # Errors
    ///
    /// Only fails if the bundled dataset is corrupt.
    pub fn demo() -> HealthFairResult<Self> {
        Self::from_json_str(DEMO_DATASET)
    }

    /// Looks up a disease.
    #[must_use]
    pub fn get(&self, id: &str) -> Option<&Disease> {
        self.index.get(id).map(|&i| &self.diseases[i])
    }

    /// Resolves a player-typed code: exact id first, then ignoring ASCII case.
    #[must_use]
    pub fn resolve(&self, code: &str) -> Option<&Disease> {
        let code = code.trim();
        self.get(code).or_else(|| {
            self.diseases
                .iter()
                .find(|d| d.id.as_str().eq_ignore_ascii_case(code))
        })
    }

    /// All diseases in dataset order.
    #[must_use]
    pub fn diseases(&self) -> &[Disease] {
        &self.diseases
    }

    /// Number of diseases.
    #[must_use]
    pub fn len(&self) -> usize {
        self.diseases.len()
    }

    /// Always false for a validated catalogue.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.diseases.is_empty()
    }

    /// Priors renormalized to sum to one.
    #[must_use]
    pub fn priors(&self) -> BeliefState {
        BeliefState::from_weights(self.diseases.iter().map(|d| (d.id.clone(), d.prior())))
    }

    /// Every symptom listed by any disease.
    #[must_use]
    pub fn all_symptoms(&self) -> BTreeSet<SymptomId> {
        self.diseases
            .iter()
            .flat_map(|d| d.symptom_likelihood.symptoms().cloned())
            .collect()
    }

    /// Critical-symptom table.
    #[must_use]
    pub fn critical_symptoms(&self) -> &CriticalSymptoms {
        &self.critical
    }

    /// Stable content hash of the catalogue, hex encoded.
    #[must_use]
    pub fn fingerprint(&self) -> String {
        let mut h = Hasher::new();
        for disease in &self.diseases {
            h.update(disease.id.as_str().as_bytes());
            h.update(&[0]);
            h.update(disease.name.as_bytes());
            h.update(&[0]);
            h.update(&disease.prior().to_le_bytes());
            for (symptom, p) in disease.symptom_likelihood.iter() {
                h.update(symptom.as_str().as_bytes());
                h.update(&p.to_le_bytes());
            }
            if let Some(critical) = self.critical.get(disease.id.as_str()) {
                for symptom in critical {
                    h.update(b"!");
                    h.update(symptom.as_str().as_bytes());
                }
            }
            h.update(&[0xff]);
        }
        h.finalize().to_hex().to_string()
    }
}

impl EvidenceModel for Catalogue {
    fn likelihoods(&self, disease: &str) -> Option<&SymptomLikelihoods> {
        self.get(disease).map(|d| &d.symptom_likelihood)
    }
}
