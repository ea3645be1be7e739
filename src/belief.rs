//! Belief state: the posterior distribution over candidate diseases.
//!
//! A `BeliefState` maps every disease in the case to a probability mass.
//! Masses are non-negative and sum to 1 across diseases that have not been
//! eliminated; eliminated diseases hold exactly 0.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::disease::DiseaseId;

/// Tolerance used when checking that a distribution sums to one.
pub const NORMALIZATION_TOLERANCE: f64 = 1e-9;

/// Probability mass per disease.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct BeliefState(BTreeMap<DiseaseId, f64>);

impl BeliefState {
    /// Uniform distribution over `keys`.
    #[must_use]
    pub fn uniform<I>(keys: I) -> Self
    where
        I: IntoIterator,
        I::Item: Into<DiseaseId>,
    {
        let mut map: BTreeMap<DiseaseId, f64> = keys.into_iter().map(|k| (k.into(), 0.0)).collect();
        if map.is_empty() {
            return Self(map);
        }
        #[allow(clippy::cast_precision_loss)]
        let share = 1.0 / map.len() as f64;
        for p in map.values_mut() {
            *p = share;
        }
        Self(map)
    }

    /// Normalizes raw weights into a distribution.
    ///
    /// Negative and non-finite weights count as zero. If nothing positive
    /// remains the result is uniform over the supplied keys.
    #[must_use]
    pub fn from_weights<I, K>(weights: I) -> Self
    where
        I: IntoIterator<Item = (K, f64)>,
        K: Into<DiseaseId>,
    {
        let map: BTreeMap<DiseaseId, f64> = weights
            .into_iter()
            .map(|(k, w)| (k.into(), sanitize(w)))
            .collect();
        Self(map).normalized_or_uniform()
    }

    pub(crate) fn from_raw(map: BTreeMap<DiseaseId, f64>) -> Self {
        Self(map)
    }

    /// Probability of a disease; unknown ids have probability 0.
    #[must_use]
    pub fn get(&self, disease: &str) -> f64 {
        self.0.get(disease).copied().unwrap_or(0.0)
    }

    /// Returns true if the disease is part of this distribution.
    #[must_use]
    pub fn contains(&self, disease: &str) -> bool {
        self.0.contains_key(disease)
    }

    /// Number of diseases tracked (eliminated ones included).
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Returns true if no disease is tracked.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Sum of all masses.
    #[must_use]
    pub fn total(&self) -> f64 {
        self.0.values().sum()
    }

    /// Returns true if the masses sum to one within tolerance.
    #[must_use]
    pub fn is_normalized(&self) -> bool {
        (self.total() - 1.0).abs() <= NORMALIZATION_TOLERANCE
    }

    /// Returns true if every disease has been eliminated.
    #[must_use]
    pub fn is_exhausted(&self) -> bool {
        self.0.values().all(|p| *p <= 0.0)
    }

    /// Iterates diseases in identifier order.
    pub fn iter(&self) -> impl Iterator<Item = (&DiseaseId, f64)> {
        self.0.iter().map(|(d, p)| (d, *p))
    }

    /// Iterates disease identifiers in order.
    pub fn keys(&self) -> impl Iterator<Item = &DiseaseId> {
        self.0.keys()
    }

    /// Diseases that still carry probability mass.
    pub fn active(&self) -> impl Iterator<Item = &DiseaseId> {
        self.0.iter().filter(|(_, p)| **p > 0.0).map(|(d, _)| d)
    }

    /// Diseases sorted by probability, highest first.
    ///
    /// Ties are ordered by identifier so the ranking is deterministic.
    #[must_use]
    pub fn ranked(&self) -> Vec<(&DiseaseId, f64)> {
        let mut ranked: Vec<(&DiseaseId, f64)> = self.iter().collect();
        ranked.sort_by(|a, b| b.1.total_cmp(&a.1).then_with(|| a.0.cmp(b.0)));
        ranked
    }

    /// The highest-ranked disease, if any carries mass.
    #[must_use]
    pub fn most_likely(&self) -> Option<(&DiseaseId, f64)> {
        self.ranked().into_iter().next().filter(|(_, p)| *p > 0.0)
    }

    /// Zeroes a disease and renormalizes the survivors.
    ///
    /// Returns false for unknown ids, which leave the state untouched. If no
    /// mass remains the state stays all-zero.
    pub fn eliminate(&mut self, disease: &str) -> bool {
        let Some(p) = self.0.get_mut(disease) else {
            return false;
        };
        *p = 0.0;
        let total = self.total();
        if total > 0.0 {
            for p in self.0.values_mut() {
                *p /= total;
            }
        }
        true
    }

    /// Renormalized copy; uniform when nothing positive remains.
    #[must_use]
    pub fn normalized_or_uniform(&self) -> Self {
        let total: f64 = self.0.values().map(|p| sanitize(*p)).sum();
        if total > 0.0 && total.is_finite() {
            Self(
                self.0
                    .iter()
                    .map(|(d, p)| (d.clone(), sanitize(*p) / total))
                    .collect(),
            )
        } else {
            Self::uniform(self.0.keys().cloned())
        }
    }
}

/// Eliminates a disease from a belief state, returning the updated copy.
#[must_use]
pub fn eliminate(belief: &BeliefState, disease: &str) -> BeliefState {
    let mut next = belief.clone();
    next.eliminate(disease);
    next
}

fn sanitize(w: f64) -> f64 {
    if w.is_finite() && w > 0.0 {
        w
    } else {
        0.0
    }
}

impl fmt::Display for BeliefState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let parts: Vec<String> = self
            .ranked()
            .into_iter()
            .map(|(d, p)| format!("{d}: {p:.3}"))
            .collect();
        write!(f, "{{{}}}", parts.join(", "))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_uniform() {
        let b = BeliefState::uniform(["A", "B", "C", "D"]);
        assert_eq!(b.len(), 4);
        assert!((b.get("C") - 0.25).abs() < 1e-12);
        assert!(b.is_normalized());
        assert!(BeliefState::uniform(Vec::<&str>::new()).is_empty());
    }

    #[test]
    fn test_from_weights_normalizes() {
        let b = BeliefState::from_weights([("A", 3.0), ("B", 1.0)]);
        assert!((b.get("A") - 0.75).abs() < 1e-12);
        assert!((b.get("B") - 0.25).abs() < 1e-12);
    }

    #[test]
    fn test_from_weights_all_zero_is_uniform() {
        let b = BeliefState::from_weights([("A", 0.0), ("B", 0.0)]);
        assert!((b.get("A") - 0.5).abs() < 1e-12);
        assert!((b.get("B") - 0.5).abs() < 1e-12);
    }

    #[test]
    fn test_from_weights_ignores_garbage() {
        let b = BeliefState::from_weights([("A", -2.0), ("B", f64::NAN), ("C", 1.0)]);
        assert_eq!(b.get("A"), 0.0);
        assert_eq!(b.get("B"), 0.0);
        assert!((b.get("C") - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_eliminate_renormalizes() {
        let mut b = BeliefState::from_weights([("A", 0.5), ("B", 0.3), ("C", 0.2)]);
        assert!(b.eliminate("A"));
        assert_eq!(b.get("A"), 0.0);
        assert!(b.is_normalized());
        assert!((b.get("B") - 0.6).abs() < 1e-12);
        assert!((b.get("C") - 0.4).abs() < 1e-12);
    }

    #[test]
    fn test_eliminate_is_idempotent() {
        let b = BeliefState::from_weights([("A", 0.5), ("B", 0.5)]);
        let once = eliminate(&b, "A");
        let twice = eliminate(&once, "A");
        assert_eq!(once, twice);
    }

    #[test]
    fn test_eliminate_unknown_is_noop() {
        let mut b = BeliefState::from_weights([("A", 0.5), ("B", 0.5)]);
        let before = b.clone();
        assert!(!b.eliminate("Z"));
        assert_eq!(b, before);
        assert!(!b.contains("Z"));
    }

    #[test]
    fn test_eliminate_last_survivor_leaves_all_zero() {
        let b = BeliefState::from_raw(
            [(DiseaseId::from("A"), 0.0), (DiseaseId::from("B"), 1.0)]
                .into_iter()
                .collect(),
        );
        let after = eliminate(&b, "B");
        assert_eq!(after.get("A"), 0.0);
        assert_eq!(after.get("B"), 0.0);
        assert_eq!(after.total(), 0.0);
        assert!(after.is_exhausted());
        assert!(after.most_likely().is_none());
    }

    #[test]
    fn test_ranked_orders_by_mass_then_id() {
        let b = BeliefState::from_weights([("C", 0.25), ("A", 0.25), ("B", 0.5)]);
        let ids: Vec<&str> = b.ranked().into_iter().map(|(d, _)| d.as_str()).collect();
        assert_eq!(ids, vec!["B", "A", "C"]);
        assert_eq!(b.most_likely().unwrap().0.as_str(), "B");
    }

    #[test]
    fn test_active_skips_eliminated() {
        let mut b = BeliefState::uniform(["A", "B", "C"]);
        b.eliminate("B");
        let active: Vec<&str> = b.active().map(DiseaseId::as_str).collect();
        assert_eq!(active, vec!["A", "C"]);
    }

    #[test]
    fn test_display_lists_ranked() {
        let b = BeliefState::from_weights([("A", 1.0), ("B", 3.0)]);
        assert_eq!(format!("{b}"), "{B: 0.750, A: 0.250}");
    }
}
