use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use spicechat::core::segment::segment_text;
use std::hint::black_box;

fn make_transcript(blocks: usize) -> String {
    let mut text = String::new();
    for i in 0..blocks {
        text.push_str("Here is the explanation you asked for, step by step. ");
        text.push_str("```python\n");
        text.push_str(&format!("def step_{i}(x):\n    return x + {i}\n"));
        text.push_str("```\n");
    }
    text.push_str("And that is the whole procedure.");
    text
}

fn bench_segment(c: &mut Criterion) {
    for &blocks in &[8usize, 64usize] {
        let text = make_transcript(blocks);
        let mut group = c.benchmark_group("segment_mixed");
        group.throughput(Throughput::Bytes(text.len() as u64));
        group.bench_function(BenchmarkId::from_parameter(blocks), |b| {
            b.iter(|| segment_text(black_box(&text)))
        });
        group.finish();
    }

    // The common case: replies without any fence at all.
    let plain = "no fences in this reply, just prose ".repeat(400);
    let mut group = c.benchmark_group("segment_plain");
    group.throughput(Throughput::Bytes(plain.len() as u64));
    group.bench_function("prose_only", |b| b.iter(|| segment_text(black_box(&plain))));
    group.finish();
}

criterion_group!(benches, bench_segment);
criterion_main!(benches);
