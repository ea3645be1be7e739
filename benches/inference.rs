use std::collections::BTreeSet;
use std::hint::black_box;

use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};

use healthfair::{
    selection, update, BeliefState, Catalogue, CriticalSymptoms, Disease, InferenceParams,
    SymptomId, SymptomLikelihoods,
};

/// Synthetic catalogue: `diseases` entries, each listing 20 of `vocab` symptoms.
fn synthetic(diseases: usize, vocab: usize) -> Catalogue {
    let mut rng = StdRng::seed_from_u64(0xC0FFEE);
    let symptoms: Vec<SymptomId> = (0..vocab).map(|i| SymptomId::from(format!("s{i}"))).collect();
    let list = (0..diseases)
        .map(|i| {
            let likelihoods = symptoms
                .choose_multiple(&mut rng, 20.min(vocab))
                .map(|s| (s.clone(), rng.gen_range(0.05..0.95)))
                .collect::<SymptomLikelihoods>();
            Disease::new(format!("D{i}"), format!("Disease {i}"), rng.gen_range(0.01..1.0), likelihoods)
                .unwrap()
        })
        .collect();
    Catalogue::new(list).unwrap()
}

fn bench_update_demo(c: &mut Criterion) {
    let catalogue = Catalogue::demo().unwrap();
    let priors = catalogue.priors();
    let confirmed: Vec<SymptomId> = ["fever", "cough", "fatigue"].into_iter().map(SymptomId::from).collect();
    let negated: Vec<SymptomId> = ["sneezing", "rash"].into_iter().map(SymptomId::from).collect();
    let params = InferenceParams::default();

    let mut group = c.benchmark_group("update");
    group.throughput(Throughput::Elements(1));
    group.bench_function("demo_catalogue", |b| {
        b.iter(|| {
            black_box(update(
                black_box(&priors),
                &confirmed,
                &negated,
                &catalogue,
                catalogue.critical_symptoms(),
                &params,
            ))
        });
    });
    group.finish();
}

fn bench_update_scaling(c: &mut Criterion) {
    let params = InferenceParams::default();
    let mut group = c.benchmark_group("update_scaling");

    for diseases in [10usize, 100, 1000] {
        let catalogue = synthetic(diseases, 200);
        let priors = catalogue.priors();
        let confirmed: Vec<SymptomId> = (0..10).map(|i| SymptomId::from(format!("s{i}"))).collect();
        let negated: Vec<SymptomId> = (10..20).map(|i| SymptomId::from(format!("s{i}"))).collect();
        let critical = CriticalSymptoms::new();

        group.throughput(Throughput::Elements(diseases as u64));
        group.bench_with_input(BenchmarkId::from_parameter(diseases), &diseases, |b, _| {
            b.iter(|| black_box(update(&priors, &confirmed, &negated, &catalogue, &critical, &params)));
        });
    }
    group.finish();
}

fn bench_suggest(c: &mut Criterion) {
    let catalogue = synthetic(500, 200);
    let belief: BeliefState = catalogue.priors();
    let pool: BTreeSet<SymptomId> = catalogue.all_symptoms();
    let mut rng = StdRng::seed_from_u64(7);

    c.bench_function("selection/suggest_500", |b| {
        b.iter(|| black_box(selection::suggest(&belief, &catalogue, &pool, 3, &mut rng)));
    });
}

criterion_group!(benches, bench_update_demo, bench_update_scaling, bench_suggest);
criterion_main!(benches);
