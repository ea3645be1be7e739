use healthfair::{
    eliminate, update, BeliefState, Catalogue, CriticalSymptoms, DiseaseId, EvidenceModel,
    InferenceParams, LikelihoodTable, SymptomId, SymptomLikelihoods,
};
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};

fn ids(list: &[&str]) -> Vec<SymptomId> {
    list.iter().map(|s| SymptomId::from(*s)).collect()
}

fn assert_distribution(b: &BeliefState) {
    assert!(b.iter().all(|(_, p)| p.is_finite() && p >= 0.0), "{b:?}");
    assert!((b.total() - 1.0).abs() <= 1e-9, "sum = {}", b.total());
}

/// Random catalogue with `n` diseases over a shared symptom vocabulary.
fn random_model(rng: &mut StdRng, n: usize, vocab: &[SymptomId]) -> (LikelihoodTable, BeliefState) {
    let mut table = LikelihoodTable::new();
    let mut weights = Vec::new();
    for i in 0..n {
        let id = format!("D{i}");
        let mut likelihoods = SymptomLikelihoods::new();
        let listed = rng.gen_range(0..=vocab.len());
        for s in vocab.choose_multiple(rng, listed) {
            likelihoods = likelihoods.with(s.clone(), rng.gen_range(0.0..=1.0));
        }
        table = table.with(id.as_str(), likelihoods);
        weights.push((id, rng.gen_range(0.0..10.0)));
    }
    (table, BeliefState::from_weights(weights))
}

#[test]
fn posterior_is_always_a_distribution() {
    let mut rng = StdRng::seed_from_u64(2024);
    let vocab: Vec<SymptomId> = (0..12).map(|i| SymptomId::from(format!("s{i}"))).collect();

    for round in 0..200 {
        let n = rng.gen_range(1..8);
        let (model, priors) = random_model(&mut rng, n, &vocab);

        let mut shuffled = vocab.clone();
        shuffled.shuffle(&mut rng);
        let split = rng.gen_range(0..=shuffled.len());
        let (confirmed, rest) = shuffled.split_at(split);
        let negated = &rest[..rng.gen_range(0..=rest.len())];

        let mut critical = CriticalSymptoms::new();
        if round % 2 == 0 {
            critical.insert("D0", [vocab[0].clone()]);
        }
        let params = InferenceParams::default();

        let post = update(&priors, confirmed, negated, &model, &critical, &params);
        assert_eq!(post.len(), priors.len());
        assert_distribution(&post);

        // Pure: same inputs, same output.
        let again = update(&priors, confirmed, negated, &model, &critical, &params);
        assert_eq!(post, again);
    }
}

#[test]
fn extreme_likelihoods_stay_finite() {
    let model = LikelihoodTable::new()
        .with("A", SymptomLikelihoods::new().with("s1", 1.0).with("s2", 0.0))
        .with("B", SymptomLikelihoods::new().with("s1", 0.0).with("s2", 1.0));
    let priors = BeliefState::from_weights([("A", 1e-300), ("B", 1.0)]);
    let post = update(
        &priors,
        &ids(&["s1", "s2"]),
        &[],
        &model,
        &CriticalSymptoms::new(),
        &InferenceParams::default(),
    );
    assert_distribution(&post);
}

#[test]
fn two_disease_scenario_favors_a() {
    let model = LikelihoodTable::new()
        .with("A", SymptomLikelihoods::new().with("s1", 0.9))
        .with("B", SymptomLikelihoods::new().with("s1", 0.1));
    let priors = BeliefState::from_weights([("A", 0.5), ("B", 0.5)]);
    let post = update(
        &priors,
        &ids(&["s1"]),
        &[],
        &model,
        &CriticalSymptoms::new(),
        &InferenceParams::default(),
    );
    assert!(post.get("A") > post.get("B"));
    assert_eq!(post.most_likely().map(|(d, _)| d.as_str()), Some("A"));
}

#[test]
fn all_zero_priors_are_uniform() {
    let priors = BeliefState::from_weights([("A", 0.0), ("B", 0.0), ("C", 0.0), ("D", 0.0)]);
    let post = update(
        &priors,
        &[],
        &[],
        &LikelihoodTable::new(),
        &CriticalSymptoms::new(),
        &InferenceParams::default(),
    );
    for id in ["A", "B", "C", "D"] {
        assert!((post.get(id) - 0.25).abs() < 1e-12);
    }
}

#[test]
fn losing_the_only_critical_symptom_lowers_the_posterior() {
    let model = LikelihoodTable::new()
        .with("A", SymptomLikelihoods::new().with("hallmark", 0.8).with("s1", 0.6))
        .with("B", SymptomLikelihoods::new().with("s1", 0.6).with("s2", 0.5))
        .with("C", SymptomLikelihoods::new().with("s2", 0.7));
    let critical = CriticalSymptoms::new().with("A", ["hallmark"]);
    let priors = BeliefState::from_weights([("A", 0.4), ("B", 0.3), ("C", 0.3)]);
    let params = InferenceParams::default();

    let with_hallmark = update(&priors, &ids(&["s1", "hallmark"]), &[], &model, &critical, &params);
    let without = update(&priors, &ids(&["s1"]), &[], &model, &critical, &params);

    assert!(without.get("A") < with_hallmark.get("A"));
    assert!(without.get("B") > with_hallmark.get("B"));
    assert!(without.get("C") > with_hallmark.get("C"));
}

#[test]
fn penalty_alone_lowers_the_posterior() {
    // Holding the Bayes and match-ratio stages fixed, only the penalty differs.
    let model = LikelihoodTable::new()
        .with("A", SymptomLikelihoods::new().with("s1", 0.6))
        .with("B", SymptomLikelihoods::new().with("s1", 0.6));
    let priors = BeliefState::from_weights([("A", 0.5), ("B", 0.5)]);
    let params = InferenceParams::default();

    let no_table = update(&priors, &ids(&["s1"]), &[], &model, &CriticalSymptoms::new(), &params);
    let penalized = update(
        &priors,
        &ids(&["s1"]),
        &[],
        &model,
        &CriticalSymptoms::new().with("A", ["s9"]),
        &params,
    );
    assert!(penalized.get("A") < no_table.get("A"));
    assert!(penalized.get("B") > no_table.get("B"));
}

#[test]
fn elimination_invariants() {
    let mut rng = StdRng::seed_from_u64(77);
    let keys: Vec<DiseaseId> = (0..6).map(|i| DiseaseId::from(format!("D{i}"))).collect();
    let mut belief = BeliefState::from_weights(keys.iter().map(|k| (k.clone(), rng.gen_range(0.1..1.0))));

    let mut order = keys.clone();
    order.shuffle(&mut rng);
    for (i, id) in order.iter().enumerate() {
        belief = eliminate(&belief, id.as_str());
        assert_eq!(belief.get(id.as_str()), 0.0);
        if i + 1 < order.len() {
            assert!((belief.total() - 1.0).abs() <= 1e-9);
        } else {
            assert_eq!(belief.total(), 0.0);
        }
    }
}

#[test]
fn eliminating_the_last_survivor() {
    let belief = eliminate(&BeliefState::from_weights([("A", 1.0), ("B", 1.0)]), "A");
    assert_eq!(belief.get("B"), 1.0);
    let belief = eliminate(&belief, "B");
    assert_eq!(belief.get("A"), 0.0);
    assert_eq!(belief.get("B"), 0.0);
}

#[test]
fn demo_catalogue_converges_on_flu() {
    let catalogue = Catalogue::demo().unwrap();
    assert!(catalogue.listed_count("FLU") > 0);
    let post = update(
        &catalogue.priors(),
        &ids(&["fever", "muscle_aches", "chills"]),
        &ids(&["runny_nose", "sneezing"]),
        &catalogue,
        catalogue.critical_symptoms(),
        &InferenceParams::default(),
    );
    assert_distribution(&post);
    assert_eq!(post.most_likely().map(|(d, _)| d.as_str()), Some("FLU"));
}
