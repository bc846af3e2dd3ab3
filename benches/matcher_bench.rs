use std::hint::black_box;

use criterion::{criterion_group, criterion_main, Criterion, Throughput};
use vocalcheck::{
    normalize, Candidate, MatchConfig, MatchEngine, NGramScorer, OracleBackend, VocalConfig,
};

fn engine(backend: OracleBackend, parallel: bool) -> MatchEngine {
    let mut config = VocalConfig::default();
    config.oracle.backend = backend;
    config.matcher = MatchConfig {
        parallel,
        ..MatchConfig::default()
    };
    config.build_engine().expect("engine should build")
}

fn sample_candidates(count: usize) -> Vec<Candidate> {
    const NAMES: [&str; 8] = [
        "Paul Dupont",
        "Marie Durand",
        "Jean-Pierre Martin",
        "Salle trois",
        "Salle quatre",
        "Cholécystectomie laparoscopique",
        "Bloc opératoire B",
        "10:30",
    ];
    (0..count)
        .map(|i| Candidate::new(format!("field{i}"), format!("{} {}", NAMES[i % NAMES.len()], i)))
        .collect()
}

/// Benchmark one match call per oracle backend
fn bench_match_backends(c: &mut Criterion) {
    let mut group = c.benchmark_group("match_backends");
    let candidates = sample_candidates(8);
    let utterance = "oui c'est bien le patient paul dupont en salle trois";

    for backend in [OracleBackend::None, OracleBackend::Hashed] {
        let engine = engine(backend, false);
        group.bench_function(backend.as_str(), |b| {
            b.iter(|| {
                engine.match_utterance_to_candidates(
                    black_box(utterance),
                    black_box(&candidates),
                    false,
                )
            });
        });
    }

    group.finish();
}

/// Benchmark candidate-count scaling, sequential vs rayon
fn bench_match_scale(c: &mut Criterion) {
    let mut group = c.benchmark_group("match_scale");
    let utterance = "le patient est paul dupont";

    for &size in [10usize, 100, 1000].iter() {
        let candidates = sample_candidates(size);
        group.throughput(Throughput::Elements(size as u64));
        for parallel in [false, true] {
            let engine = engine(OracleBackend::Hashed, parallel);
            let name = if parallel { "parallel" } else { "sequential" };
            group.bench_function(format!("{name}_{size}"), |b| {
                b.iter(|| {
                    engine.match_utterance_to_candidates(
                        black_box(utterance),
                        black_box(&candidates),
                        true,
                    )
                });
            });
        }
    }

    group.finish();
}

/// Benchmark the building blocks in isolation
fn bench_stages(c: &mut Criterion) {
    let mut group = c.benchmark_group("stages");
    let text = "Le patient Jean-Pierre Martin, cholécystectomie à 10:30, salle trois";

    group.bench_function("normalize", |b| b.iter(|| normalize(black_box(text))));

    let scorer = NGramScorer::default();
    let a = normalize("cholecystectomie laparoscopique");
    let bb = normalize("cholecystectomie");
    group.bench_function("ngram_score", |b| {
        b.iter(|| scorer.score(black_box(&a), black_box(&bb)))
    });

    group.finish();
}

criterion_group!(benches, bench_match_backends, bench_match_scale, bench_stages);
criterion_main!(benches);
