//! Virtual patients.
//!
//! A patient is generated from the catalogue at the start of each case. The
//! concealed disease is drawn according to the priors, and the patient's
//! actual symptoms are sampled from that disease's likelihood table. Answers
//! are noisy: a patient may misreport a symptom depending on how truthful
//! they are.

use std::collections::BTreeSet;
use std::fmt;

use rand::distributions::WeightedIndex;
use rand::prelude::*;
use serde::{Deserialize, Serialize};

use crate::catalogue::Catalogue;
use crate::disease::{Disease, DiseaseId, SymptomId};
use crate::error::ValidationError;

const FATHER_HISTORY: [&str; 4] = ["none", "lung cancer", "asthma", "anemia"];
const MOTHER_HISTORY: [&str; 4] = ["none", "allergy", "anemia", "bronchitis"];

/// Probability that a patient presents exactly one symptom.
const SINGLE_SYMPTOM_RATE: f64 = 0.7;

/// Upper bound on presenting symptoms.
const MAX_PRESENTING: usize = 3;

/// Probability that an untruthful answer is actually flipped.
const FLIP_RATE: f64 = 0.9;

/// Dietary habit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Diet {
    /// Eats everything.
    Omnivore,
    /// No meat.
    Vegetarian,
    /// No animal products.
    Vegan,
}

impl fmt::Display for Diet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Omnivore => write!(f, "omnivore"),
            Self::Vegetarian => write!(f, "vegetarian"),
            Self::Vegan => write!(f, "vegan"),
        }
    }
}

/// Background information shown to the player on request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Profile {
    /// Father's medical history.
    pub father: String,
    /// Mother's medical history.
    pub mother: String,
    /// Diet.
    pub diet: Diet,
    /// Whether the patient smokes.
    pub smoker: bool,
}

impl Profile {
    /// Draws a random profile.
    pub fn random<R: Rng + ?Sized>(rng: &mut R) -> Self {
        let pick = |rng: &mut R, options: &[&str]| -> String {
            options.choose(rng).copied().unwrap_or("none").to_string()
        };
        let father = pick(rng, &FATHER_HISTORY);
        let mother = pick(rng, &MOTHER_HISTORY);
        let diet = [Diet::Omnivore, Diet::Vegetarian, Diet::Vegan]
            .choose(rng)
            .copied()
            .unwrap_or(Diet::Omnivore);
        Self {
            father,
            mother,
            diet,
            smoker: rng.gen_bool(0.5),
        }
    }

    /// Label/value pairs for display.
    #[must_use]
    pub fn entries(&self) -> Vec<(&'static str, String)> {
        vec![
            ("Father", self.father.clone()),
            ("Mother", self.mother.clone()),
            ("Diet", self.diet.to_string()),
            ("Smoker", if self.smoker { "yes" } else { "no" }.to_string()),
        ]
    }
}

/// What the patient said about a symptom.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Answer {
    /// Whether the patient actually has the symptom.
    pub actual: bool,
    /// What the patient reported.
    pub reported: bool,
}

/// A simulated patient with a concealed disease.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "PatientFields")]
pub struct Patient {
    disease: DiseaseId,
    profile: Profile,
    symptoms: BTreeSet<SymptomId>,
    truthfulness: f64,
}

/// Unvalidated serde shape of [`Patient`].
#[derive(Deserialize)]
struct PatientFields {
    disease: DiseaseId,
    profile: Profile,
    #[serde(default)]
    symptoms: BTreeSet<SymptomId>,
    truthfulness: f64,
}

impl TryFrom<PatientFields> for Patient {
    type Error = ValidationError;

    fn try_from(raw: PatientFields) -> Result<Self, Self::Error> {
        if !(0.0..=1.0).contains(&raw.truthfulness) {
            return Err(ValidationError::InvalidParameter {
                name: "truthfulness",
                value: raw.truthfulness,
                reason: "must be in [0, 1]",
            });
        }
        Ok(Self {
            disease: raw.disease,
            profile: raw.profile,
            symptoms: raw.symptoms,
            truthfulness: raw.truthfulness,
        })
    }
}

impl Patient {
    /// Generates a patient whose disease is drawn by prior weight.
    ///
    /// Returns `None` only for an empty catalogue.
    pub fn generate<R: Rng + ?Sized>(catalogue: &Catalogue, rng: &mut R) -> Option<Self> {
        let disease = draw_disease(catalogue, rng)?;
        Some(Self::with_disease(disease, rng))
    }

    /// Generates a patient with a known disease.
    pub fn with_disease<R: Rng + ?Sized>(disease: &Disease, rng: &mut R) -> Self {
        let profile = Profile::random(rng);
        let symptoms = sample_symptoms(disease, rng);
        let truthfulness = (rng.gen_range(0.6..=0.95_f64) * 100.0).round() / 100.0;
        Self {
            disease: disease.id.clone(),
            profile,
            symptoms,
            truthfulness,
        }
    }

    /// Overrides how often the patient tells the truth.
    ///
    /// Values are clamped to [0, 1]; NaN leaves the current level unchanged.
    #[must_use]
    pub fn with_truthfulness(mut self, truthfulness: f64) -> Self {
        if !truthfulness.is_nan() {
            self.truthfulness = truthfulness.clamp(0.0, 1.0);
        }
        self
    }

    /// The concealed disease.
    #[must_use]
    pub fn disease(&self) -> &DiseaseId {
        &self.disease
    }

    /// Background profile.
    #[must_use]
    pub fn profile(&self) -> &Profile {
        &self.profile
    }

    /// Symptoms the patient actually has; shown as presenting complaints.
    #[must_use]
    pub fn symptoms(&self) -> &BTreeSet<SymptomId> {
        &self.symptoms
    }

    /// Probability of answering truthfully.
    #[must_use]
    pub fn truthfulness(&self) -> f64 {
        self.truthfulness
    }

    /// Answers a question about a symptom.
    pub fn answer<R: Rng + ?Sized>(&self, symptom: &str, rng: &mut R) -> Answer {
        let actual = self.symptoms.contains(symptom);
        let reported = if rng.gen_bool(self.truthfulness) {
            actual
        } else if rng.gen_bool(FLIP_RATE) {
            !actual
        } else {
            actual
        };
        Answer { actual, reported }
    }
}

fn draw_disease<'a, R: Rng + ?Sized>(catalogue: &'a Catalogue, rng: &mut R) -> Option<&'a Disease> {
    let diseases = catalogue.diseases();
    match WeightedIndex::new(diseases.iter().map(Disease::prior)) {
        Ok(dist) => diseases.get(dist.sample(rng)),
        // All-zero priors: every disease is equally likely.
        Err(_) => diseases.choose(rng),
    }
}

fn sample_symptoms<R: Rng + ?Sized>(disease: &Disease, rng: &mut R) -> BTreeSet<SymptomId> {
    let listed: Vec<(&SymptomId, f64)> = disease.symptom_likelihood.iter().collect();
    if listed.is_empty() {
        return BTreeSet::new();
    }
    let draws = if rng.gen_bool(SINGLE_SYMPTOM_RATE) {
        1
    } else {
        rng.gen_range(1..=MAX_PRESENTING.min(listed.len()))
    };
    match WeightedIndex::new(listed.iter().map(|(_, p)| *p)) {
        Ok(dist) => (0..draws)
            .map(|_| listed[dist.sample(rng)].0.clone())
            .collect(),
        Err(_) => listed
            .choose_multiple(rng, draws)
            .map(|(s, _)| (*s).clone())
            .collect(),
    }
}
