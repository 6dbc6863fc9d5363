//! Criterion benchmarks for rulestream.
//!
//! Covers the two hot paths of the classifier:
//! - A single induction pass over a buffered batch
//! - Test-then-train throughput on a synthetic stream

use std::hint::black_box;
use std::sync::Arc;

use criterion::{Criterion, Throughput, criterion_group, criterion_main};
use rulestream::classifier::{ClassifierConfig, StreamClassifier, evaluate_prequential};
use rulestream::data::{Instance, InstanceHeader, SyntheticStream, SyntheticStreamConfig};
use rulestream::induction::RuleInductionEngine;

fn synthetic(count: usize, num_numeric: usize) -> (Arc<InstanceHeader>, Vec<Instance>) {
    let stream = SyntheticStream::new(SyntheticStreamConfig {
        num_categorical: 4,
        num_numeric,
        noise: 0.05,
        seed: 13,
    })
    .unwrap();
    let header = Arc::new(stream.header().clone());
    (header, stream.take(count).collect())
}

/// Benchmark one induction pass.
fn bench_induction(c: &mut Criterion) {
    let mut group = c.benchmark_group("induction");

    for num_numeric in [0, 2] {
        let (header, batch) = synthetic(500, num_numeric);
        let sequential = RuleInductionEngine::new(header.clone());
        let parallel = RuleInductionEngine::new(header).with_parallel_scoring(true);

        group.throughput(Throughput::Elements(batch.len() as u64));
        group.bench_function(format!("learn_sequential_{num_numeric}_numeric"), |b| {
            b.iter(|| black_box(sequential.learn(black_box(&batch), 0)))
        });
        group.bench_function(format!("learn_parallel_{num_numeric}_numeric"), |b| {
            b.iter(|| black_box(parallel.learn(black_box(&batch), 0)))
        });
    }

    group.finish();
}

/// Benchmark prequential evaluation over a stream.
fn bench_stream(c: &mut Criterion) {
    let mut group = c.benchmark_group("stream");
    group.sample_size(20);

    let (header, instances) = synthetic(5000, 1);
    group.throughput(Throughput::Elements(instances.len() as u64));
    group.bench_function("prequential_5000", |b| {
        b.iter(|| {
            let mut classifier = StreamClassifier::with_header(
                header.clone(),
                ClassifierConfig::default().with_window_size(250),
            )
            .unwrap();
            black_box(evaluate_prequential(&mut classifier, instances.iter().cloned()).unwrap())
        })
    });

    group.finish();
}

criterion_group!(benches, bench_induction, bench_stream);
criterion_main!(benches);
