//! Encodes a handful of entities into an in-memory PBF file and decodes
//! them back.
//!
//! Usage: cargo run --example roundtrip

use std::io::Cursor;

use pbfio::model::{Degrees, Entity, Info, Node, Tags, Way};
use pbfio::{Decoder, DecoderOptions, Encoder, EncoderOptions, Error};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let mut file = Vec::new();

    let mut encoder = Encoder::new(
        &mut file,
        EncoderOptions::default().writing_program("pbfio roundtrip demo"),
    )?;

    let mut tags = Tags::new();
    tags.insert("name".to_string(), "Brandenburg Gate".to_string());
    tags.insert("tourism".to_string(), "attraction".to_string());

    encoder.encode(Entity::Node(Node {
        id: 1,
        tags,
        info: Info::default(),
        lat: Degrees(52.516275),
        lon: Degrees(13.377704),
    }))?;
    encoder.encode(Entity::Node(Node {
        id: 2,
        tags: Tags::new(),
        info: Info::default(),
        lat: Degrees(52.5170),
        lon: Degrees(13.3889),
    }))?;
    encoder.encode(Entity::Way(Way {
        id: 3,
        tags: Tags::new(),
        info: Info::default(),
        node_ids: vec![1, 2],
    }))?;
    encoder.close()?;

    println!("encoded {} bytes", file.len());

    let mut decoder = Decoder::new(Cursor::new(file), DecoderOptions::default())?;
    println!(
        "bbox: {}",
        decoder.header().bounding_box.as_ref().expect("bbox")
    );

    loop {
        match decoder.decode() {
            Ok(batch) => {
                for entity in &batch {
                    match entity {
                        Entity::Node(n) => {
                            println!("node {} at ({}, {})", n.id, n.lat.value(), n.lon.value())
                        }
                        Entity::Way(w) => println!("way {} with {} nodes", w.id, w.node_ids.len()),
                        Entity::Relation(r) => {
                            println!("relation {} with {} members", r.id, r.members.len())
                        }
                    }
                }
            }
            Err(Error::Eof) => break,
            Err(err) => return Err(err.into()),
        }
    }

    Ok(())
}
