//! Benchmarks for the cubelet state engine
//!
//! Measures performance of:
//! - Single quarter turns
//! - Move sequences of increasing length
//! - Validation and view geometry
//! - Scramble generation

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use cubelet_core::{
    apply_sequence, cubies, is_valid_state, parse_sequence, scramble, FaceletState, Move,
    ScrambleConfig,
};
use rand::rngs::StdRng;
use rand::SeedableRng;

/// Benchmark each of the twelve moves on a solved state
fn bench_single_move(c: &mut Criterion) {
    let mut group = c.benchmark_group("single_move");
    let state = FaceletState::solved();

    for mv in Move::ALL {
        group.throughput(Throughput::Elements(1));
        group.bench_with_input(BenchmarkId::from_parameter(mv), &mv, |b, &m| {
            b.iter(|| black_box(m).apply(black_box(state)))
        });
    }
    group.finish();
}

/// Benchmark sequences of increasing length
fn bench_sequence(c: &mut Criterion) {
    let mut group = c.benchmark_group("apply_sequence");
    // (R U) repeated; order 105
    let base = parse_sequence("R U").unwrap_or_default();

    for &reps in &[1usize, 10, 105, 1000] {
        let moves: Vec<Move> = base.iter().copied().cycle().take(base.len() * reps).collect();
        group.throughput(Throughput::Elements(moves.len() as u64));
        group.bench_with_input(BenchmarkId::new("moves", moves.len()), &moves, |b, m| {
            b.iter(|| apply_sequence(black_box(FaceletState::solved()), black_box(m)))
        });
    }
    group.finish();
}

/// Benchmark the color-count check
fn bench_validation(c: &mut Criterion) {
    let mut group = c.benchmark_group("validation");
    let scrambled = scramble(&mut StdRng::seed_from_u64(42), &ScrambleConfig::default()).state;

    group.bench_function("solved", |b| {
        b.iter(|| is_valid_state(black_box(&FaceletState::solved())))
    });
    group.bench_function("scrambled", |b| b.iter(|| is_valid_state(black_box(&scrambled))));
    group.finish();
}

/// Benchmark building the 26-cubie view
fn bench_cubies(c: &mut Criterion) {
    let scrambled = scramble(&mut StdRng::seed_from_u64(42), &ScrambleConfig::default()).state;
    c.bench_function("cubies", |b| b.iter(|| cubies(black_box(&scrambled))));
}

/// Benchmark scramble generation at different lengths
fn bench_scramble(c: &mut Criterion) {
    let mut group = c.benchmark_group("scramble");

    for &length in &[15usize, 50, 200] {
        let config = ScrambleConfig {
            length,
            ..ScrambleConfig::default()
        };
        group.throughput(Throughput::Elements(length as u64));
        group.bench_with_input(BenchmarkId::new("length", length), &config, |b, cfg| {
            let mut rng = StdRng::seed_from_u64(7);
            b.iter(|| scramble(&mut rng, black_box(cfg)))
        });
    }
    group.finish();
}

criterion_group!(
    benches,
    bench_single_move,
    bench_sequence,
    bench_validation,
    bench_cubies,
    bench_scramble,
);

criterion_main!(benches);
