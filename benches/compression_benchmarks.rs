use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use huff_tree::codes::CodeTable;
use huff_tree::frequency::FrequencyTable;
use huff_tree::tree::build_tree;
use huff_tree::{compress, decompress};

fn sample_text(len: usize) -> Vec<u8> {
    b"It was the best of times, it was the worst of times, it was the age of wisdom. "
        .iter()
        .copied()
        .cycle()
        .take(len)
        .collect()
}

fn bench_codec(c: &mut Criterion) {
    let mut group = c.benchmark_group("codec");
    for size in [1024usize, 64 * 1024, 1024 * 1024] {
        let data = sample_text(size);
        let packed = compress(&data).unwrap();
        group.throughput(Throughput::Bytes(size as u64));
        group.bench_with_input(BenchmarkId::new("compress", size), &data, |b, data| {
            b.iter(|| compress(black_box(data)).unwrap())
        });
        group.bench_with_input(BenchmarkId::new("decompress", size), &packed, |b, packed| {
            b.iter(|| decompress(black_box(packed)).unwrap())
        });
    }
    group.finish();
}

fn bench_tree(c: &mut Criterion) {
    let table = FrequencyTable::from_bytes(&sample_text(64 * 1024));
    c.bench_function("build_tree_and_codes", |b| {
        b.iter(|| CodeTable::derive(&build_tree(black_box(&table))))
    });
}

criterion_group!(benches, bench_codec, bench_tree);
criterion_main!(benches);
