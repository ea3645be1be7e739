use std::collections::{BTreeMap, BTreeSet};

use tracing::{debug, warn};

use crate::belief::BeliefState;
use crate::disease::{DiseaseId, SymptomId};
use crate::inference::{CriticalSymptoms, EvidenceModel, InferenceParams};

/// Computes the posterior from priors and the full evidence history.
///
/// The update runs in three stages:
///
/// 1. naive-Bayes log-likelihood of the evidence plus the log prior,
///    normalized with log-sum-exp;
/// 2. a boost of `1 + alpha * match_ratio + smoother`, where the match ratio
///    is the share of the disease's listed symptoms that were confirmed;
/// 3. a `critical_penalty` factor for diseases whose critical symptoms were
///    never confirmed, followed by renormalization.
///
/// The result is keyed exactly like `priors`. All-zero priors are read as
/// uniform. If the blended values cannot be normalized the normalized priors
/// are returned instead, so the output always sums to 1 (or is empty).
#[must_use]
pub fn update<M>(
    priors: &BeliefState,
    confirmed: &[SymptomId],
    negated: &[SymptomId],
    model: &M,
    critical: &CriticalSymptoms,
    params: &InferenceParams,
) -> BeliefState
where
    M: EvidenceModel + ?Sized,
{
    if priors.is_empty() {
        return BeliefState::default();
    }
    let priors = priors.normalized_or_uniform();

    let confirmed_set: BTreeSet<&str> = confirmed.iter().map(SymptomId::as_str).collect();
    let confirmed = dedup(confirmed.iter().map(SymptomId::as_str));
    let negated = dedup(
        negated
            .iter()
            .map(SymptomId::as_str)
            .filter(|s| !confirmed_set.contains(s)),
    );

    let eps = params.min_likelihood;
    let clamp = |p: f64| p.clamp(eps, 1.0 - eps);

    // Stage 1: log-space naive Bayes.
    let log_posterior: Vec<(&DiseaseId, f64)> = priors
        .iter()
        .map(|(disease, prior)| {
            let id = disease.as_str();
            let lookup = |s: &str| clamp(model.likelihood(id, s).unwrap_or(params.default_likelihood));
            let mut ll = 0.0;
            for &s in &confirmed {
                ll += lookup(s).max(params.floor).ln();
            }
            for &s in &negated {
                ll += (1.0 - lookup(s)).max(params.floor).ln();
            }
            (disease, ll + prior.max(params.floor).ln())
        })
        .collect();

    let max = log_posterior
        .iter()
        .map(|(_, lp)| *lp)
        .fold(f64::NEG_INFINITY, f64::max);
    let exps: Vec<f64> = log_posterior.iter().map(|(_, lp)| (lp - max).exp()).collect();
    let z: f64 = exps.iter().sum();

    // Stages 2 and 3: match-ratio boost, critical penalty.
    let mut blended: BTreeMap<DiseaseId, f64> = BTreeMap::new();
    for ((disease, _), e) in log_posterior.iter().zip(&exps) {
        let id = disease.as_str();
        let bayes = e / z;
        let ratio = match_ratio(model, id, &confirmed);
        let mut value = (bayes * (1.0 + params.alpha * ratio + params.smoother)).max(params.floor);
        if critical.is_unmet(id, &confirmed_set) {
            value *= params.critical_penalty;
        }
        blended.insert((*disease).clone(), value);
    }

    let total: f64 = blended.values().sum();
    if !(total > 0.0) || !total.is_finite() || blended.values().any(|v| v.is_nan()) {
        warn!(
            total,
            confirmed = confirmed.len(),
            negated = negated.len(),
            "belief update degenerated, falling back to priors"
        );
        return priors;
    }
    for value in blended.values_mut() {
        *value /= total;
    }

    debug!(
        diseases = blended.len(),
        confirmed = confirmed.len(),
        negated = negated.len(),
        "belief updated"
    );
    BeliefState::from_raw(blended)
}

/// Share of a disease's listed symptoms that appear in `confirmed`.
#[must_use]
pub fn match_ratio<M>(model: &M, disease: &str, confirmed: &[&str]) -> f64
where
    M: EvidenceModel + ?Sized,
{
    let Some(table) = model.likelihoods(disease) else {
        return 0.0;
    };
    let hits = confirmed.iter().filter(|s| table.contains(s)).count();
    #[allow(clippy::cast_precision_loss)]
    let ratio = hits as f64 / table.len().max(1) as f64;
    ratio
}

fn dedup<'a>(symptoms: impl Iterator<Item = &'a str>) -> Vec<&'a str> {
    let mut seen = BTreeSet::new();
    symptoms.filter(|s| seen.insert(*s)).collect()
}
