//! Evidence collected during a case.
//!
//! Symptoms are either *confirmed* (observed present) or *negated*
//! (observed absent), never both. Insertion order is preserved.

use serde::{Deserialize, Serialize};

use crate::disease::SymptomId;

/// Confirmed and negated symptoms for one case.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EvidenceSet {
    confirmed: Vec<SymptomId>,
    negated: Vec<SymptomId>,
}

impl EvidenceSet {
    /// Creates an empty evidence set.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Records an answer.
    ///
    /// A symptom recorded with the opposite answer moves between the two
    /// lists. Repeating the same answer changes nothing.
    pub fn record(&mut self, symptom: impl Into<SymptomId>, present: bool) {
        let symptom = symptom.into();
        let (target, other) = if present {
            (&mut self.confirmed, &mut self.negated)
        } else {
            (&mut self.negated, &mut self.confirmed)
        };
        other.retain(|s| *s != symptom);
        if !target.contains(&symptom) {
            target.push(symptom);
        }
    }

    /// Builder-style [`record`](Self::record).
    #[must_use]
    pub fn with(mut self, symptom: impl Into<SymptomId>, present: bool) -> Self {
        self.record(symptom, present);
        self
    }

    /// Symptoms observed present, in recording order.
    #[must_use]
    pub fn confirmed(&self) -> &[SymptomId] {
        &self.confirmed
    }

    /// Symptoms observed absent, in recording order.
    #[must_use]
    pub fn negated(&self) -> &[SymptomId] {
        &self.negated
    }

    /// Returns true if the symptom has been answered either way.
    #[must_use]
    pub fn is_answered(&self, symptom: &str) -> bool {
        self.is_confirmed(symptom) || self.negated.iter().any(|s| s.as_str() == symptom)
    }

    /// Returns true if the symptom was observed present.
    #[must_use]
    pub fn is_confirmed(&self, symptom: &str) -> bool {
        self.confirmed.iter().any(|s| s.as_str() == symptom)
    }

    /// Total number of answered symptoms.
    #[must_use]
    pub fn len(&self) -> usize {
        self.confirmed.len() + self.negated.len()
    }

    /// Returns true if nothing has been recorded.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.confirmed.is_empty() && self.negated.is_empty()
    }
}

/// Records an answer on a copy of the evidence set.
#[must_use]
pub fn record_answer(evidence: &EvidenceSet, symptom: impl Into<SymptomId>, present: bool) -> EvidenceSet {
    evidence.clone().with(symptom, present)
}
