//! Benchmark – `gqlmodem::scan`
#![allow(missing_docs)]

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};

/// Produce a deterministic document of at least `target_len` bytes by
/// repeating a representative selection block inside one operation.
fn make_document(target_len: usize) -> String {
    let mut s = String::with_capacity(target_len + 128);
    s.push_str("query Bench($id: ID!, $tags: [String!] = [\"a\", \"b\"]) {\n");
    while s.len() < target_len {
        s.push_str(
            "  node(id: $id) @include(if: true) {\n    name\n    alias: field(a: 1, b: -2.5, c: RED, d: {k: [1, 2]}) {\n      leaf\n    }\n    ...Frag\n  }\n",
        );
    }
    s.push_str("}\nfragment Frag on Node { id }\n");
    s
}

/// Scan the document, returning the emission count so Criterion can
/// black-box the work.
fn run_scan(input: &[u8]) -> usize {
    let mut produced = 0usize;
    gqlmodem::scan(input, |sc| {
        black_box(sc.token());
        produced += 1;
        false
    })
    .unwrap();
    produced
}

fn bench_scan(c: &mut Criterion) {
    let mut group = c.benchmark_group("scan");
    for &size in &[1_000usize, 10_000, 100_000] {
        let doc = make_document(size);
        group.throughput(Throughput::Bytes(doc.len() as u64));
        group.bench_with_input(BenchmarkId::from_parameter(size), &doc, |b, doc| {
            b.iter(|| run_scan(black_box(doc.as_bytes())));
        });
    }
    group.finish();
}

criterion_group!(benches, bench_scan);
criterion_main!(benches);
