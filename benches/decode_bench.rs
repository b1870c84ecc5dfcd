// Decode throughput benchmarks for pbfio

use std::hint::black_box;
use std::io::Cursor;

use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use rand::Rng;

use pbfio::model::{Degrees, Entity, Info, Node, Tags};
use pbfio::{Compression, Decoder, DecoderOptions, Encoder, EncoderOptions, Error};

/// Builds an in-memory PBF file with `count` nodes carrying a few tags.
fn synthetic_file(count: usize, compression: Compression) -> Vec<u8> {
    let mut rng = rand::rng();

    let mut file = Vec::new();
    let mut encoder =
        Encoder::new(&mut file, EncoderOptions::default().compression(compression)).unwrap();

    for chunk_start in (0..count).step_by(2000) {
        let batch: Vec<Entity> = (chunk_start..(chunk_start + 2000).min(count))
            .map(|i| {
                let mut tags = Tags::new();
                tags.insert("highway".to_string(), "residential".to_string());
                tags.insert("name".to_string(), format!("Street {}", i % 512));

                Entity::Node(Node {
                    id: i as i64,
                    tags,
                    info: Info::default(),
                    lat: Degrees(48.0 + rng.random_range(0.0..1.0)),
                    lon: Degrees(11.0 + rng.random_range(0.0..1.0)),
                })
            })
            .collect();
        encoder.encode_batch(batch).unwrap();
    }

    encoder.close().unwrap();
    file
}

fn drain(file: Vec<u8>, options: DecoderOptions) -> usize {
    let mut decoder = Decoder::new(Cursor::new(file), options).unwrap();
    let mut total = 0usize;
    loop {
        match decoder.decode() {
            Ok(batch) => total += batch.len(),
            Err(Error::Eof) => break,
            Err(err) => panic!("decode failed: {}", err),
        }
    }
    total
}

fn benchmark_decode_nodes(c: &mut Criterion) {
    let mut group = c.benchmark_group("decode_nodes");

    for size in [10_000usize, 100_000].iter() {
        let file = synthetic_file(*size, Compression::Zlib);

        group.throughput(Throughput::Elements(*size as u64));
        group.bench_with_input(BenchmarkId::from_parameter(size), size, |b, &size| {
            b.iter(|| {
                let total = drain(file.clone(), DecoderOptions::default());
                assert_eq!(total, size);
                black_box(total);
            });
        });
    }

    group.finish();
}

fn benchmark_decode_worker_counts(c: &mut Criterion) {
    let mut group = c.benchmark_group("decode_worker_counts");

    let file = synthetic_file(100_000, Compression::Zlib);
    for n_cpu in [1usize, 2, 4].iter() {
        group.bench_with_input(BenchmarkId::from_parameter(n_cpu), n_cpu, |b, &n_cpu| {
            b.iter(|| {
                let total = drain(file.clone(), DecoderOptions::default().n_cpu(n_cpu));
                black_box(total);
            });
        });
    }

    group.finish();
}

fn benchmark_decode_compressions(c: &mut Criterion) {
    let mut group = c.benchmark_group("decode_compressions");

    for (name, compression) in [
        ("raw", Compression::Raw),
        ("zlib", Compression::Zlib),
        ("lz4", Compression::Lz4),
        ("zstd", Compression::Zstd),
    ] {
        let file = synthetic_file(50_000, compression);
        group.bench_function(name, |b| {
            b.iter(|| {
                let total = drain(file.clone(), DecoderOptions::default());
                black_box(total);
            });
        });
    }

    group.finish();
}

criterion_group!(
    benches,
    benchmark_decode_nodes,
    benchmark_decode_worker_counts,
    benchmark_decode_compressions
);
criterion_main!(benches);
