//! Symptom selection heuristic.
//!
//! Suggestions sample the belief ranking at three points (most likely,
//! median, least likely) and offer each representative's most likely
//! symptom, so the player sees discriminating questions rather than only
//! the leading hypothesis. Remaining slots are filled at random from the
//! unused pool with the caller's random source.

use std::collections::BTreeSet;

use rand::seq::SliceRandom;
use rand::Rng;

use crate::belief::BeliefState;
use crate::disease::{DiseaseId, SymptomId};
use crate::inference::EvidenceModel;

/// Default number of symptoms offered per turn.
pub const DEFAULT_SUGGESTIONS: usize = 3;

/// Diseases at the top, middle and bottom of the ranking.
///
/// Fewer than three diseases yield repeated entries.
#[must_use]
pub fn representatives(belief: &BeliefState) -> Vec<&DiseaseId> {
    let ranked = belief.ranked();
    let Some(last) = ranked.len().checked_sub(1) else {
        return Vec::new();
    };
    let mid = (ranked.len() / 2).min(last);
    [0, mid, last].into_iter().map(|i| ranked[i].0).collect()
}

/// Picks up to `n` distinct symptoms from `pool`.
///
/// The representatives' top symptoms come first, in rank order, when they
/// are still in the pool. The rest is drawn uniformly without replacement.
/// The result has `min(n, pool.len())` entries.
#[must_use]
pub fn suggest<M, R>(
    belief: &BeliefState,
    model: &M,
    pool: &BTreeSet<SymptomId>,
    n: usize,
    rng: &mut R,
) -> Vec<SymptomId>
where
    M: EvidenceModel + ?Sized,
    R: Rng + ?Sized,
{
    let mut picks: Vec<SymptomId> = Vec::with_capacity(n.min(pool.len()));
    for disease in representatives(belief) {
        if picks.len() >= n {
            break;
        }
        if let Some(symptom) = model.top_symptom(disease.as_str()) {
            if pool.contains(symptom) && !picks.contains(symptom) {
                picks.push(symptom.clone());
            }
        }
    }

    let missing = n.saturating_sub(picks.len());
    if missing > 0 {
        let rest: Vec<&SymptomId> = pool.iter().filter(|s| !picks.contains(s)).collect();
        picks.extend(rest.choose_multiple(rng, missing).map(|s| (*s).clone()));
    }
    picks
}
