use criterion::{black_box, criterion_group, criterion_main, Criterion};

use skillcheck_core::scoring::*;
use skillcheck_core::traits::cosine_similarity;

fn keywords() -> Vec<String> {
    [
        "index",
        "match",
        "flexible",
        "left lookup",
        "dynamic",
        "column reference",
        "row reference",
        "array",
    ]
    .iter()
    .map(|s| s.to_string())
    .collect()
}

fn bench_match_keywords(c: &mut Criterion) {
    let mut group = c.benchmark_group("match_keywords");
    let expected = keywords();

    group.bench_function("short_answer", |b| {
        let answer = "INDEX MATCH is more flexible than VLOOKUP.";
        b.iter(|| match_keywords(black_box(answer), black_box(&expected)))
    });

    group.bench_function("long_answer", |b| {
        let answer = "INDEX returns a value from a range by position and MATCH finds that \
                      position, so together they allow a left lookup, a dynamic column \
                      reference and a row reference that survive inserted columns. "
            .repeat(20);
        b.iter(|| match_keywords(black_box(&answer), black_box(&expected)))
    });

    group.finish();
}

fn bench_final_score(c: &mut Criterion) {
    let mut group = c.benchmark_group("final_score");

    group.bench_function("full", |b| {
        let outcome = ScoreOutcome::Full {
            keyword: 0.6,
            similarity: 0.8,
            quality: 0.9,
            length: 0.5,
        };
        b.iter(|| black_box(&outcome).final_score())
    });

    group.bench_function("degraded", |b| {
        let outcome = ScoreOutcome::Degraded {
            keyword: 0.6,
            reason: DegradeReason::Unavailable,
        };
        b.iter(|| black_box(&outcome).final_score())
    });

    group.finish();
}

fn bench_cosine(c: &mut Criterion) {
    let mut group = c.benchmark_group("cosine_similarity");
    let a: Vec<f32> = (0..384).map(|i| (i as f32 * 0.37).sin()).collect();
    let b_vec: Vec<f32> = (0..384).map(|i| (i as f32 * 0.11).cos()).collect();

    group.bench_function("dim=384", |b| {
        b.iter(|| cosine_similarity(black_box(&a), black_box(&b_vec)))
    });

    group.finish();
}

criterion_group!(benches, bench_match_keywords, bench_final_score, bench_cosine);
criterion_main!(benches);
