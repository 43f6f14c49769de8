//! Criterion benchmarks for the table hot path. A search probes and saves
//! once per visited node, so these two operations dominate everything else
//! the table does.

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use tabia::{Bound, Move, TranspositionTable};

fn splitmix64(state: &mut u64) -> u64 {
    *state = state.wrapping_add(0x9E37_79B9_7F4A_7C15);
    let mut z = *state;
    z = (z ^ (z >> 30)).wrapping_mul(0xBF58_476D_1CE4_E5B9);
    z = (z ^ (z >> 27)).wrapping_mul(0x94D0_49BB_1331_11EB);
    z ^ (z >> 31)
}

fn probe_and_save(c: &mut Criterion) {
    let mut table = TranspositionTable::new(16);
    table.new_search();

    let mut state = 0x9D39_247E_3377_6D41;
    let keys: Vec<u64> = (0..100_000).map(|_| splitmix64(&mut state)).collect();

    let _ = c.bench_with_input(
        BenchmarkId::new("probe+save", format!("{} keys", keys.len())),
        &keys,
        |b, keys| {
            b.iter(|| {
                for &key in keys {
                    let (entry, found) = table.probe(key);
                    if !found {
                        entry.save(key, 42, Bound::LOWER, 8, Move::NONE, table.generation());
                    }
                    black_box(entry.depth());
                }
            });
        },
    );
}

criterion_group! {
    name = transposition;
    config = Criterion::default().sample_size(10);
    targets = probe_and_save
}
criterion_main!(transposition);
