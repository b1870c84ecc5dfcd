//! Pipeline behavior tests: ordering, cancellation, and error latching.

use std::io::Cursor;
use std::time::{Duration, Instant};

use pbfio::model::{Degrees, Entity, Info, Node, Tags};
use pbfio::{Decoder, DecoderOptions, Encoder, EncoderOptions, Error};

fn plain_node(id: i64) -> Entity {
    Entity::Node(Node {
        id,
        tags: Tags::new(),
        info: Info::default(),
        lat: Degrees(48.0 + (id % 500) as f64 * 1e-5),
        lon: Degrees(11.0 + (id % 500) as f64 * 1e-5),
    })
}

/// Builds an in-memory PBF file holding `count` nodes with monotone ids.
fn synthetic_file(count: i64) -> Vec<u8> {
    let mut file = Vec::new();
    let mut encoder = Encoder::new(&mut file, EncoderOptions::default()).unwrap();
    for chunk_start in (0..count).step_by(1000) {
        let batch: Vec<Entity> = (chunk_start..(chunk_start + 1000).min(count))
            .map(plain_node)
            .collect();
        encoder.encode_batch(batch).unwrap();
    }
    encoder.close().unwrap();
    file
}

#[test]
fn test_order_preserved_across_workers() {
    let count = 60_000i64;
    let file = synthetic_file(count);

    // Small batches and several workers make reordering bugs loud.
    let options = DecoderOptions::default().proto_batch_size(2).n_cpu(4);
    let mut decoder = Decoder::new(Cursor::new(file), options).unwrap();

    let mut previous = -1i64;
    let mut total = 0i64;
    loop {
        match decoder.decode() {
            Ok(batch) => {
                for entity in &batch {
                    assert!(
                        entity.id() > previous,
                        "id {} arrived after {}",
                        entity.id(),
                        previous
                    );
                    previous = entity.id();
                    total += 1;
                }
            }
            Err(Error::Eof) => break,
            Err(err) => panic!("decode failed: {}", err),
        }
    }

    assert_eq!(total, count);
}

#[test]
fn test_header_only_decode_then_close() {
    let file = synthetic_file(10_000);

    let mut decoder = Decoder::new(Cursor::new(file), DecoderOptions::default()).unwrap();
    assert!(decoder
        .header()
        .required_features
        .contains(&"OsmSchema-V0.6".to_string()));

    // A caller may inspect the header and walk away without touching a batch.
    decoder.close();
    assert!(matches!(decoder.decode(), Err(Error::PipelineCancelled)));
}

#[test]
fn test_cancellation_is_bounded() {
    let count = 200_000i64;
    let file = synthetic_file(count);

    let mut decoder =
        Decoder::new(Cursor::new(file), DecoderOptions::default().n_cpu(2)).unwrap();

    let mut seen = 0i64;
    while seen < 1000 {
        match decoder.decode() {
            Ok(batch) => seen += batch.len() as i64,
            Err(err) => panic!("decode failed early: {}", err),
        }
    }

    let start = Instant::now();
    decoder.close();
    decoder.close();
    assert!(
        start.elapsed() < Duration::from_secs(10),
        "close took {:?}",
        start.elapsed()
    );

    // Counting stops well short of the file's total.
    assert!(seen < count);
    assert!(matches!(decoder.decode(), Err(Error::PipelineCancelled)));
}

#[test]
fn test_drop_mid_stream_does_not_hang() {
    let file = synthetic_file(100_000);

    let start = Instant::now();
    {
        let mut decoder =
            Decoder::new(Cursor::new(file), DecoderOptions::default().n_cpu(2)).unwrap();
        let _ = decoder.decode().unwrap();
    }
    assert!(start.elapsed() < Duration::from_secs(10));
}

#[test]
fn test_first_error_wins_on_encode() {
    let mut out = Vec::new();
    let mut encoder = Encoder::new(&mut out, EncoderOptions::default()).unwrap();

    // Nodes carrying ~4 KiB of unique tag data each: by the time the node
    // lane reaches its 8000-entity flush, the block's uncompressed
    // encoding blows the 16 MiB cap. The pipeline latches that error and
    // shuts down, so some later send must start failing.
    let filler = "v".repeat(4096);
    let mut saw_send_failure = false;
    'outer: for round in 0..600i64 {
        let batch: Vec<Entity> = (0..20i64)
            .map(|offset| {
                let id = round * 20 + offset;
                let mut tags = Tags::new();
                tags.insert(format!("key-{}", id), format!("{}-{}", filler, id));
                Entity::Node(Node {
                    id,
                    tags,
                    info: Info::default(),
                    lat: Degrees(0.0),
                    lon: Degrees(0.0),
                })
            })
            .collect();

        if encoder.encode_batch(batch).is_err() {
            saw_send_failure = true;
            break 'outer;
        }
    }
    assert!(
        saw_send_failure,
        "pipeline kept accepting entities after a fatal block error"
    );

    // close() reports the first (and only) latched error.
    match encoder.close() {
        Err(Error::InvalidArgument(msg)) => assert!(msg.contains("16 MiB")),
        other => panic!("expected the latched block error, got {:?}", other),
    }
}

#[test]
fn test_decoder_resilient_to_tiny_batches() {
    let file = synthetic_file(5_000);

    let options = DecoderOptions::default()
        .proto_batch_size(1)
        .proto_buffer_size(1024)
        .n_cpu(1);
    let mut decoder = Decoder::new(Cursor::new(file), options).unwrap();

    let mut total = 0usize;
    loop {
        match decoder.decode() {
            Ok(batch) => total += batch.len(),
            Err(Error::Eof) => break,
            Err(err) => panic!("decode failed: {}", err),
        }
    }

    assert_eq!(total, 5_000);
}
