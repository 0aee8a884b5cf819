//! benches/order_book.rs
//! Run with:  cargo bench --bench order_book
//! HTML:      target/criterion/report/index.html

use criterion::{BatchSize, BenchmarkId, Criterion, Throughput, criterion_group, criterion_main};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::hint::black_box;
use stock_tutor::{Account, BookLevel, BuyRequest, OrderBook, Portfolio};

// ────────────────────────────────────────────────────────────────────────────
//  Parameter grids
// ────────────────────────────────────────────────────────────────────────────
const ASK_LEVELS: &[usize] = &[5, 50, 500, 5_000];
const SWEEP_VOLUMES: &[u64] = &[10, 1_000, 100_000];

/// Build an ask-only book with `n_levels` levels starting at 150.00.
/// Prices step one cent (with repeats); volumes random 10–100.
fn setup_book(n_levels: usize) -> OrderBook {
    let mut rng = StdRng::seed_from_u64(42);
    let asks = (0..n_levels as u64)
        .map(|i| BookLevel::ask(150_00 + i / 2, rng.gen_range(10..=100)))
        .collect();
    OrderBook::from_levels(Vec::new(), asks)
}

pub fn bench_execute_buy(c: &mut Criterion) {
    let mut group = c.benchmark_group("execute_buy_scaling");

    for &n in ASK_LEVELS {
        group.throughput(Throughput::Elements(n as u64));

        for &sweep in SWEEP_VOLUMES {
            let id = BenchmarkId::from_parameter(format!("levels_{}_sweep_{}", n, sweep));
            group.bench_function(id, |b| {
                b.iter_batched(
                    || (setup_book(n), Account::new("ISK-1000", u64::MAX / 2), Portfolio::new()),
                    |(mut book, mut account, mut portfolio)| {
                        let request = BuyRequest::new("AAPL", u64::MAX / 4, sweep);
                        let report = book.execute_buy(&mut account, &mut portfolio, black_box(&request));
                        let _ = black_box(report);
                    },
                    BatchSize::SmallInput,
                )
            });
        }
    }

    group.finish();
}

pub fn bench_generate(c: &mut Criterion) {
    let mut rng = StdRng::seed_from_u64(7);
    c.bench_function("generate_book_5_levels", |b| {
        b.iter(|| black_box(OrderBook::generate(black_box(187.35), 5, &mut rng)))
    });
}

criterion_group!(benches, bench_execute_buy, bench_generate);
criterion_main!(benches);
