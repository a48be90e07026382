use std::hint::black_box;

use c3_core::history::types::Label;
use c3_core::history::History;
use c3_core::specification::{MemoryArg, MemoryMethod, MemoryValue, RwMemory};
use c3_core::{check, Model};
use criterion::{criterion_group, criterion_main, Criterion};

const VARIABLES: [&str; 4] = ["x", "y", "z", "w"];

type MemHistory = History<MemoryMethod, MemoryArg<&'static str, u64>, MemoryValue<u64>>;

/// Build a history with given dimensions.
/// processes: number of processes
/// `ops_per_process`: operations per process, alternating write and read
///
/// Each process writes fresh values and reads back what it last wrote, so
/// every history here is consistent under all three models.
fn build_history(processes: usize, ops_per_process: usize) -> MemHistory {
    let mut next_value: u64 = 1;
    let mut result = Vec::new();

    for p in 0..processes {
        let mut ops = Vec::new();
        let mut last_written = 0;
        for i in 0..ops_per_process {
            let var = VARIABLES[(p + i / 2) % VARIABLES.len()];
            if i % 2 == 0 {
                last_written = next_value;
                next_value += 1;
                ops.push(Label::operation(
                    MemoryMethod::Wr,
                    MemoryArg::Entry(var, last_written),
                    MemoryValue::Bottom,
                ));
            } else {
                ops.push(Label::operation(
                    MemoryMethod::Rd,
                    MemoryArg::Key(var),
                    MemoryValue::Value(last_written),
                ));
            }
        }
        result.push(ops);
    }

    History::from_sessions(result)
}

fn bench_consistency(c: &mut Criterion) {
    let spec = RwMemory::<&'static str, u64>::new();
    let histories = [
        ("small", build_history(2, 2)),
        ("medium", build_history(2, 3)),
        ("large", build_history(3, 2)),
    ];

    for (_, history) in &histories {
        for model in [
            Model::CausalConsistency,
            Model::CausalMemory,
            Model::CausalConvergence,
        ] {
            assert!(
                check(history, &spec, model).is_ok(),
                "benchmark histories must be consistent under {model}",
            );
        }
    }

    let mut group = c.benchmark_group("consistency_check");

    for (size, history) in &histories {
        group.bench_function(format!("causal_consistency_{size}"), |b| {
            b.iter(|| c3_core::check_cc(black_box(history), black_box(&spec)));
        });
        group.bench_function(format!("causal_memory_{size}"), |b| {
            b.iter(|| c3_core::check_cm(black_box(history), black_box(&spec)));
        });
        group.bench_function(format!("causal_convergence_{size}"), |b| {
            b.iter(|| c3_core::check_ccv(black_box(history), black_box(&spec)));
        });
    }

    group.finish();
}

fn bench_refinements(c: &mut Criterion) {
    let mut group = c.benchmark_group("order_enumeration");

    for (size, history) in [("2x2", build_history(2, 2)), ("3x2", build_history(3, 2))] {
        group.bench_function(format!("refinements_{size}"), |b| {
            b.iter(|| black_box(history.poset()).refinements().count());
        });
        group.bench_function(format!("linear_extensions_{size}"), |b| {
            b.iter(|| black_box(history.poset()).all_topological_sorts().count());
        });
    }

    group.finish();
}

criterion_group!(benches, bench_consistency, bench_refinements);
criterion_main!(benches);
