//! Throughput benchmarks for twhuff
//!
//! This benchmark suite evaluates:
//! - One-shot compression/decompression across data patterns and sizes
//! - Streaming reader/writer overhead against the one-shot path
//! - Dictionary construction cost

use criterion::{BenchmarkId, Criterion, Throughput, criterion_group, criterion_main};
use std::hint::black_box;
use std::io::{Read, Write};
use twhuff::{Dictionary, FrequencyTable, HuffmanReader, HuffmanWriter, compress, decompress};

/// Type alias for pattern generator functions
type PatternGenerator = fn(usize) -> Vec<u8>;

mod test_data {
    /// Mostly zero bytes, the common case for game snapshots.
    pub fn snapshot_like(size: usize) -> Vec<u8> {
        let mut data = vec![0u8; size];
        let mut seed: u64 = 0x9E3779B97F4A7C15;
        for byte in data.iter_mut() {
            seed = seed.wrapping_mul(6364136223846793005).wrapping_add(1);
            if (seed >> 60) < 4 {
                *byte = (seed >> 32) as u8;
            }
        }
        data
    }

    /// Random data - every symbol, mostly long codes.
    pub fn random(size: usize) -> Vec<u8> {
        let mut data = Vec::with_capacity(size);
        let mut seed: u64 = 0x123456789ABCDEF0;
        for _ in 0..size {
            seed = seed.wrapping_mul(6364136223846793005).wrapping_add(1);
            data.push((seed >> 32) as u8);
        }
        data
    }

    /// Chat-like text.
    pub fn text_like(size: usize) -> Vec<u8> {
        let text = b"gg wp! nice hook. anyone up for another round on dm1? ";
        text.iter().copied().cycle().take(size).collect()
    }
}

const SIZES: [usize; 3] = [64, 1400, 64 * 1024];

fn patterns() -> [(&'static str, PatternGenerator); 3] {
    [
        ("snapshot", test_data::snapshot_like),
        ("random", test_data::random),
        ("text", test_data::text_like),
    ]
}

fn bench_compress(c: &mut Criterion) {
    let mut group = c.benchmark_group("compress");
    for (name, generate) in patterns() {
        for size in SIZES {
            let data = generate(size);
            group.throughput(Throughput::Bytes(size as u64));
            group.bench_with_input(BenchmarkId::new(name, size), &data, |b, data| {
                b.iter(|| compress(black_box(data)).unwrap())
            });
        }
    }
    group.finish();
}

fn bench_decompress(c: &mut Criterion) {
    let mut group = c.benchmark_group("decompress");
    for (name, generate) in patterns() {
        for size in SIZES {
            let compressed = compress(&generate(size)).unwrap();
            group.throughput(Throughput::Bytes(size as u64));
            group.bench_with_input(BenchmarkId::new(name, size), &compressed, |b, compressed| {
                b.iter(|| decompress(black_box(compressed)).unwrap())
            });
        }
    }
    group.finish();
}

fn bench_streaming(c: &mut Criterion) {
    let data = test_data::snapshot_like(64 * 1024);
    let compressed = compress(&data).unwrap();

    let mut group = c.benchmark_group("streaming");
    group.throughput(Throughput::Bytes(data.len() as u64));

    group.bench_function("writer", |b| {
        b.iter(|| {
            let mut writer = HuffmanWriter::new(Vec::with_capacity(compressed.len()));
            for chunk in data.chunks(1400) {
                writer.write_all(black_box(chunk)).unwrap();
            }
            writer.finish().unwrap();
            writer.into_inner()
        })
    });

    group.bench_function("reader", |b| {
        let mut buf = [0u8; 1400];
        b.iter(|| {
            let mut reader = HuffmanReader::new(black_box(&compressed[..]));
            let mut total = 0;
            loop {
                let n = reader.read(&mut buf).unwrap();
                if n == 0 {
                    break total;
                }
                total += n;
            }
        })
    });

    group.finish();
}

fn bench_dictionary(c: &mut Criterion) {
    c.bench_function("dictionary_build", |b| {
        b.iter(|| Dictionary::new(black_box(&FrequencyTable::DEFAULT)))
    });
}

criterion_group!(
    benches,
    bench_compress,
    bench_decompress,
    bench_streaming,
    bench_dictionary
);
criterion_main!(benches);
