use criterion::{BenchmarkId, Criterion, criterion_group, criterion_main};
use msort_rs::common::io::BufferLines;
use msort_rs::sort::{KeySpec, SortError, sort_sources};
use std::hint::black_box;

/// Pseudo-random fixed-width lines (xorshift, deterministic across runs).
fn generate_lines(count: usize) -> Vec<u8> {
    let mut data = Vec::with_capacity(count * 24);
    let mut state: u64 = 0x9E37_79B9_7F4A_7C15;
    for _ in 0..count {
        state ^= state << 13;
        state ^= state >> 7;
        state ^= state << 17;
        data.extend_from_slice(format!("{:016x} row\n", state).as_bytes());
    }
    data
}

fn run_sort(data: &[u8], spec: &KeySpec) -> usize {
    let mut sink = Vec::with_capacity(data.len());
    let source = Ok::<_, SortError>(BufferLines::new(data));
    sort_sources([source], spec, &mut sink).unwrap();
    sink.len()
}

fn bench_whole_line(c: &mut Criterion) {
    let mut group = c.benchmark_group("sort_whole_line");
    for lines in [1_000, 100_000] {
        let data = generate_lines(lines);
        group.bench_with_input(BenchmarkId::new("two_queue", lines), &data, |b, data| {
            b.iter(|| run_sort(black_box(data), &KeySpec::WHOLE_LINE))
        });
    }
    group.finish();
}

fn bench_substring_key(c: &mut Criterion) {
    let data = generate_lines(100_000);
    let spec = KeySpec::new(4, Some(6));
    c.bench_function("sort_key_4_6", |b| {
        b.iter(|| run_sort(black_box(&data), &spec))
    });
}

criterion_group!(benches, bench_whole_line, bench_substring_key);
criterion_main!(benches);
