// Encode throughput benchmarks for pbfio

use std::hint::black_box;

use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use rand::Rng;

use pbfio::model::{Degrees, Entity, Info, Member, MemberType, Node, Relation, Tags, Way};
use pbfio::{Compression, Encoder, EncoderOptions};

fn synthetic_nodes(count: usize) -> Vec<Entity> {
    let mut rng = rand::rng();

    (0..count)
        .map(|i| {
            let mut tags = Tags::new();
            tags.insert("amenity".to_string(), "bench".to_string());

            Entity::Node(Node {
                id: i as i64,
                tags,
                info: Info::default(),
                lat: Degrees(52.0 + rng.random_range(0.0..0.5)),
                lon: Degrees(13.0 + rng.random_range(0.0..0.5)),
            })
        })
        .collect()
}

fn synthetic_mixture(count: usize) -> Vec<Entity> {
    (0..count)
        .map(|i| match i % 3 {
            0 => Entity::Node(Node {
                id: i as i64,
                tags: Tags::new(),
                info: Info::default(),
                lat: Degrees(50.0),
                lon: Degrees(9.0),
            }),
            1 => Entity::Way(Way {
                id: i as i64,
                tags: Tags::new(),
                info: Info::default(),
                node_ids: vec![i as i64, i as i64 + 1, i as i64 + 2],
            }),
            _ => Entity::Relation(Relation {
                id: i as i64,
                tags: Tags::new(),
                info: Info::default(),
                members: vec![Member {
                    id: i as i64,
                    member_type: MemberType::Node,
                    role: "member".to_string(),
                }],
            }),
        })
        .collect()
}

fn encode_all(entities: &[Entity], compression: Compression) -> usize {
    let mut file = Vec::new();
    let mut encoder =
        Encoder::new(&mut file, EncoderOptions::default().compression(compression)).unwrap();
    for chunk in entities.chunks(2000) {
        encoder.encode_batch(chunk.to_vec()).unwrap();
    }
    encoder.close().unwrap();
    file.len()
}

fn benchmark_encode_nodes(c: &mut Criterion) {
    let mut group = c.benchmark_group("encode_nodes");

    for size in [10_000usize, 100_000].iter() {
        let entities = synthetic_nodes(*size);

        group.throughput(Throughput::Elements(*size as u64));
        group.bench_with_input(BenchmarkId::from_parameter(size), size, |b, _| {
            b.iter(|| {
                let written = encode_all(&entities, Compression::Zlib);
                black_box(written);
            });
        });
    }

    group.finish();
}

fn benchmark_encode_mixture(c: &mut Criterion) {
    let mut group = c.benchmark_group("encode_mixture");

    let entities = synthetic_mixture(30_000);
    group.throughput(Throughput::Elements(entities.len() as u64));
    group.bench_function("three_types", |b| {
        b.iter(|| {
            let written = encode_all(&entities, Compression::Zlib);
            black_box(written);
        });
    });

    group.finish();
}

fn benchmark_encode_compressions(c: &mut Criterion) {
    let mut group = c.benchmark_group("encode_compressions");

    let entities = synthetic_nodes(30_000);
    for (name, compression) in [
        ("raw", Compression::Raw),
        ("zlib", Compression::Zlib),
        ("lz4", Compression::Lz4),
        ("zstd", Compression::Zstd),
    ] {
        group.bench_function(name, |b| {
            b.iter(|| {
                let written = encode_all(&entities, compression);
                black_box(written);
            });
        });
    }

    group.finish();
}

criterion_group!(
    benches,
    benchmark_encode_nodes,
    benchmark_encode_mixture,
    benchmark_encode_compressions
);
criterion_main!(benches);
