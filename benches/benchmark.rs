//! Benchmarks for hyperforest

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use hyperforest::*;
use std::sync::Arc;

const WORDS: [&str; 5] = ["the", "cat", "sat", "on", "mat"];

/// Lattice of `n` states where each state has arcs to the next three.
fn lattice<W: CostWeight>(n: usize) -> MutableHypergraph<W> {
    let mut hg = MutableHypergraph::with_properties(Properties::ALL);
    for _ in 0..n {
        hg.add_state();
    }
    for src in 0..n - 1 {
        for step in 1..=3 {
            let dst = src + step;
            if dst >= n {
                break;
            }
            let cost = ((src * 7 + step * 3) % 11) as f64 / 10.0;
            hg.add_fsm_arc(
                src as StateId,
                dst as StateId,
                Some(WORDS[(src + step) % WORDS.len()]),
                W::from_cost(cost),
            );
        }
    }
    hg.set_start(0);
    hg.set_final((n - 1) as StateId);
    hg
}

/// Binary bracketed tree over `n` words; `vary` shifts the words and the
/// split points.
fn tree(n: usize, vary: usize) -> String {
    fn build(lo: usize, hi: usize, vary: usize) -> String {
        if hi - lo == 1 {
            return format!("({lo}-{hi} {})", WORDS[(lo + vary) % WORDS.len()]);
        }
        let mid = if (lo + vary) % 2 == 0 { lo + 1 } else { hi - 1 };
        format!("({lo}-{hi} {} {})", build(lo, mid, vary), build(mid, hi, vary))
    }
    build(0, n, vary)
}

fn benchmark_push_to_start(c: &mut Criterion) {
    let mut group = c.benchmark_group("push_costs_to_start_by_size");
    for size in [10, 100, 1000, 10000].iter() {
        let hg = lattice::<ViterbiWeight>(*size);
        group.throughput(Throughput::Elements(hg.num_arcs() as u64));
        group.bench_with_input(BenchmarkId::from_parameter(size), &hg, |b, hg| {
            b.iter(|| {
                let mut hg = hg.clone();
                push_costs_to_start(black_box(&mut hg)).unwrap()
            })
        });
    }
    group.finish();
}

fn benchmark_push_to_final(c: &mut Criterion) {
    let mut group = c.benchmark_group("push_weights_to_final_by_size");
    for size in [10, 100, 1000, 10000].iter() {
        let hg = lattice::<LogWeight>(*size);
        group.throughput(Throughput::Elements(hg.num_arcs() as u64));
        group.bench_with_input(BenchmarkId::from_parameter(size), &hg, |b, hg| {
            b.iter(|| {
                let mut hg = hg.clone();
                push_weights_to_final(black_box(&mut hg)).unwrap()
            })
        });
    }
    group.finish();
}

fn benchmark_sub_union(c: &mut Criterion) {
    let mut group = c.benchmark_group("sub_union_by_length");
    for len in [4, 16, 64].iter() {
        let a = MutableHypergraph::<ViterbiWeight>::from_tree(&tree(*len, 0)).unwrap();
        let b = MutableHypergraph::<ViterbiWeight>::from_tree(&tree(*len, 1)).unwrap();
        group.bench_with_input(BenchmarkId::from_parameter(len), &(a, b), |bench, (a, b)| {
            bench.iter(|| {
                let mut out = MutableHypergraph::<ViterbiWeight>::new();
                sub_union(black_box(a), black_box(b), &mut out, &SubUnionOptions::default())
                    .unwrap();
                out
            })
        });
    }
    group.finish();
}

fn benchmark_dispatch(c: &mut Criterion) {
    let hg: HypergraphPtr<ViterbiWeight> = Arc::new(lattice::<ViterbiWeight>(100));

    // not needed: same handle back
    c.bench_function("transformed_not_needed", |b| {
        b.iter(|| transformed(black_box(&hg), &IsolateStartState).unwrap())
    });

    c.bench_function("transformed_push_copy", |b| {
        b.iter(|| transformed(black_box(&hg), &PushWeights::to_start()).unwrap())
    });
}

fn benchmark_batch(c: &mut Criterion) {
    let graphs: Vec<MutableHypergraph<ViterbiWeight>> = (0..64).map(|_| lattice(500)).collect();
    let push = PushWeights::to_start();

    // Benchmark parallel vs sequential
    let mut group = c.benchmark_group("push_64_lattices");
    group.bench_function("sequential", |b| {
        b.iter(|| {
            let mut graphs = graphs.clone();
            for hg in &mut graphs {
                inplace(hg, &push).unwrap();
            }
            graphs
        })
    });
    group.bench_function("parallel", |b| {
        b.iter(|| {
            let mut graphs = graphs.clone();
            let results = transform::inplace_batch(&mut graphs, &push);
            black_box(results);
            graphs
        })
    });
    group.finish();
}

criterion_group!(
    benches,
    benchmark_push_to_start,
    benchmark_push_to_final,
    benchmark_sub_union,
    benchmark_dispatch,
    benchmark_batch,
);
criterion_main!(benches);
