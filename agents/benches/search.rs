//! Search benchmarks.
//!
//! Run with: `cargo bench -p mancala-agents`

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use mancala_agents::{AlphaBeta, DeepeningSearch, MancalaEvaluator, Minimax};
use mancala_core::{positions, Board, Side};
use std::time::Duration;

fn bench_fixed_depth(c: &mut Criterion) {
    let evaluator = MancalaEvaluator::default();
    let board = Board::from_notation(positions::CAPTURE).unwrap();
    let mut group = c.benchmark_group("fixed_depth");

    for depth in [2u8, 4, 6] {
        group.bench_with_input(BenchmarkId::new("minimax", depth), &depth, |b, &depth| {
            b.iter(|| {
                let mut search = Minimax::new(&evaluator);
                search.choose_move(black_box(&board), Side::One, depth)
            })
        });
        group.bench_with_input(BenchmarkId::new("alphabeta", depth), &depth, |b, &depth| {
            b.iter(|| {
                let mut search = AlphaBeta::new(&evaluator);
                search.choose_move(black_box(&board), Side::One, depth)
            })
        });
    }
    group.finish();
}

fn bench_deepening(c: &mut Criterion) {
    let evaluator = MancalaEvaluator::default();
    let board = Board::new();

    c.bench_function("deepening_depth_6", |b| {
        b.iter(|| {
            DeepeningSearch::new(&evaluator, Duration::from_secs(60)).search(
                black_box(&board),
                Side::One,
                6,
            )
        })
    });
}

criterion_group!(benches, bench_fixed_depth, bench_deepening);
criterion_main!(benches);
