use std::time::Duration;

use criterion::{black_box, criterion_group, criterion_main, BatchSize, Criterion, Throughput};
use or1k_decode::{or1k, DecodeTables, OR1K_OPCODES};

const WORDS: usize = 4096;

fn criterion_config() -> Criterion {
    match std::env::var("OR1K_BENCH_PROFILE").as_deref() {
        Ok("ci") => Criterion::default()
            .warm_up_time(Duration::from_millis(200))
            .measurement_time(Duration::from_secs(1))
            .sample_size(10),
        _ => Criterion::default()
            .warm_up_time(Duration::from_secs(1))
            .measurement_time(Duration::from_secs(2))
            .sample_size(30),
    }
}

/// Deterministic mix of valid and invalid words
fn words() -> Vec<u32> {
    let mut state = 0x2545_F491u32;
    (0..WORDS)
        .map(|_| {
            state ^= state << 13;
            state ^= state >> 17;
            state ^= state << 5;
            state
        })
        .collect()
}

fn bench_decode(c: &mut Criterion) {
    let tables = or1k();
    let words = words();
    let flat = tables.automaton().serialize();

    let mut group = c.benchmark_group("decode");
    group.throughput(Throughput::Elements(WORDS as u64));
    group.bench_function("arena", |b| {
        b.iter(|| {
            for &raw in &words {
                black_box(tables.decode(black_box(raw)));
            }
        })
    });
    group.bench_function("flat", |b| {
        b.iter(|| {
            for &raw in &words {
                black_box(or1k_decode::walk_flat(&flat, black_box(raw)));
            }
        })
    });
    group.bench_function("decode_extract", |b| {
        b.iter(|| {
            for &raw in &words {
                if let Some(index) = tables.decode(black_box(raw)) {
                    black_box(tables.extract(raw, index));
                }
            }
        })
    });
    group.finish();
}

fn bench_compile(c: &mut Criterion) {
    c.bench_function("compile_or1k", |b| {
        b.iter_batched(
            || OR1K_OPCODES,
            |specs| DecodeTables::compile(black_box(specs)).map(DecodeTables::destroy),
            BatchSize::SmallInput,
        )
    });
}

criterion_group! {
    name = benches;
    config = criterion_config();
    targets = bench_decode, bench_compile
}
criterion_main!(benches);
