//! Cases: one simulated patient from arrival to diagnosis.
//!
//! A `Case` owns the only mutable state in the game: the evidence set, the
//! belief state and the random source. The catalogue is shared read-only.
//! Every answer triggers a full recomputation of the posterior from the
//! priors and the complete evidence history; eliminated diseases are
//! re-applied afterwards so a discarded disease stays at zero.

use std::collections::BTreeSet;
use std::fmt;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::belief::BeliefState;
use crate::catalogue::Catalogue;
use crate::config::GameConfig;
use crate::disease::{DiseaseId, SymptomId};
use crate::error::{HealthFairResult, ValidationError};
use crate::evidence::EvidenceSet;
use crate::inference::{self, InferenceParams};
use crate::outcome::Outcome;
use crate::patient::Patient;
use crate::selection;

/// Unique identifier for a case.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CaseId(uuid::Uuid);

impl CaseId {
    /// Creates a new random case ID.
    #[must_use]
    pub fn new() -> Self {
        Self(uuid::Uuid::new_v4())
    }
}

impl Default for CaseId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for CaseId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// One asked question and the reported answer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnsweredQuestion {
    /// The symptom asked about.
    pub symptom: SymptomId,
    /// Whether the patient reported having it.
    pub reported: bool,
    /// When the question was asked.
    pub asked_at: DateTime<Utc>,
}

/// Starting point of a case: normalized priors and no evidence.
#[must_use]
pub fn new_case(priors: &BeliefState) -> (BeliefState, EvidenceSet) {
    (priors.normalized_or_uniform(), EvidenceSet::new())
}

/// A single diagnostic exercise.
#[derive(Debug)]
pub struct Case<R = StdRng> {
    id: CaseId,
    started_at: DateTime<Utc>,
    catalogue: Arc<Catalogue>,
    params: InferenceParams,
    suggestions: usize,
    patient: Patient,
    priors: BeliefState,
    belief: BeliefState,
    evidence: EvidenceSet,
    bank: BTreeSet<SymptomId>,
    eliminated: BTreeSet<DiseaseId>,
    history: Vec<AnsweredQuestion>,
    rng: R,
}

impl Case<StdRng> {
    /// Starts a case with a `StdRng` seeded from the config, or from entropy.
    ///
    /// # Errors
    ///
    /// Fails only if the catalogue has no diseases.
    pub fn from_config(catalogue: Arc<Catalogue>, config: &GameConfig) -> HealthFairResult<Self> {
        let rng = match config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        Self::new(catalogue, config, rng)
    }
}

impl<R: Rng> Case<R> {
    /// Starts a case with a freshly generated patient.
    ///
    /// # Errors
    ///
    /// Fails only if the catalogue has no diseases.
    pub fn new(catalogue: Arc<Catalogue>, config: &GameConfig, mut rng: R) -> HealthFairResult<Self> {
        let patient = Patient::generate(&catalogue, &mut rng).ok_or(ValidationError::EmptyCatalogue)?;
        Ok(Self::with_patient(catalogue, config, patient, rng))
    }

    /// Starts a case for a given patient.
    pub fn with_patient(catalogue: Arc<Catalogue>, config: &GameConfig, patient: Patient, rng: R) -> Self {
        let (priors, evidence) = new_case(&catalogue.priors());
        let bank: BTreeSet<SymptomId> = catalogue
            .all_symptoms()
            .into_iter()
            .filter(|s| !patient.symptoms().contains(s))
            .collect();
        let id = CaseId::new();
        info!(
            case = %id,
            catalogue = %catalogue.fingerprint(),
            diseases = catalogue.len(),
            symptoms = bank.len(),
            "case started"
        );
        Self {
            id,
            started_at: Utc::now(),
            catalogue,
            params: config.inference,
            suggestions: config.suggestions,
            patient,
            belief: priors.clone(),
            priors,
            evidence,
            bank,
            eliminated: BTreeSet::new(),
            history: Vec::new(),
            rng,
        }
    }

    /// Case identifier.
    #[must_use]
    pub fn id(&self) -> CaseId {
        self.id
    }

    /// When the case started.
    #[must_use]
    pub fn started_at(&self) -> DateTime<Utc> {
        self.started_at
    }

    /// The catalogue this case is played against.
    #[must_use]
    pub fn catalogue(&self) -> &Catalogue {
        &self.catalogue
    }

    /// The simulated patient.
    #[must_use]
    pub fn patient(&self) -> &Patient {
        &self.patient
    }

    /// Symptoms the patient mentions on arrival.
    #[must_use]
    pub fn presenting_symptoms(&self) -> &BTreeSet<SymptomId> {
        self.patient.symptoms()
    }

    /// Normalized catalogue priors.
    #[must_use]
    pub fn priors(&self) -> &BeliefState {
        &self.priors
    }

    /// Current posterior.
    #[must_use]
    pub fn belief(&self) -> &BeliefState {
        &self.belief
    }

    /// Evidence gathered so far.
    #[must_use]
    pub fn evidence(&self) -> &EvidenceSet {
        &self.evidence
    }

    /// Symptoms that can still be asked about.
    #[must_use]
    pub fn symptom_bank(&self) -> &BTreeSet<SymptomId> {
        &self.bank
    }

    /// Diseases discarded by the player.
    #[must_use]
    pub fn eliminated(&self) -> &BTreeSet<DiseaseId> {
        &self.eliminated
    }

    /// Questions asked so far, in order.
    #[must_use]
    pub fn history(&self) -> &[AnsweredQuestion] {
        &self.history
    }

    /// Returns true if every disease has been discarded.
    #[must_use]
    pub fn is_exhausted(&self) -> bool {
        self.belief.is_exhausted()
    }

    /// Symptoms to offer the player next.
    pub fn suggest(&mut self) -> Vec<SymptomId> {
        selection::suggest(
            &self.belief,
            self.catalogue.as_ref(),
            &self.bank,
            self.suggestions,
            &mut self.rng,
        )
    }

    /// Asks the patient about a symptom and updates the belief.
    pub fn ask(&mut self, symptom: impl Into<SymptomId>) -> &AnsweredQuestion {
        let symptom = symptom.into();
        let answer = self.patient.answer(symptom.as_str(), &mut self.rng);
        debug!(
            case = %self.id,
            symptom = %symptom,
            reported = answer.reported,
            actual = answer.actual,
            "patient answered"
        );
        self.record_answer(symptom, answer.reported)
    }

    /// Records an answer obtained elsewhere and updates the belief.
    pub fn record_answer(&mut self, symptom: impl Into<SymptomId>, present: bool) -> &AnsweredQuestion {
        let symptom = symptom.into();
        self.bank.remove(&symptom);
        self.evidence.record(symptom.clone(), present);
        self.refresh();
        self.history.push(AnsweredQuestion {
            symptom,
            reported: present,
            asked_at: Utc::now(),
        });
        &self.history[self.history.len() - 1]
    }

    /// Discards a disease. Unknown ids are ignored and return false.
    pub fn eliminate(&mut self, disease: &str) -> bool {
        if !self.belief.eliminate(disease) {
            return false;
        }
        self.eliminated.insert(DiseaseId::from(disease));
        info!(
            case = %self.id,
            disease,
            remaining = self.belief.active().count(),
            "disease eliminated"
        );
        true
    }

    /// Ends the case with a guess.
    #[must_use]
    pub fn diagnose(&self, guess: &str) -> Outcome {
        let outcome = Outcome::new(guess, self.patient.disease().clone(), self.history.len());
        info!(
            case = %self.id,
            guess,
            correct = outcome.correct,
            questions = outcome.questions,
            "diagnosis made"
        );
        outcome
    }

    fn refresh(&mut self) {
        let mut belief = inference::update(
            &self.priors,
            self.evidence.confirmed(),
            self.evidence.negated(),
            self.catalogue.as_ref(),
            self.catalogue.critical_symptoms(),
            &self.params,
        );
        for disease in &self.eliminated {
            belief.eliminate(disease.as_str());
        }
        self.belief = belief;
    }
}
