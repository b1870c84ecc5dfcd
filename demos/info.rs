//! Prints header information and entity counts for a PBF file.
//!
//! Usage: cargo run --example info -- <file.osm.pbf>

use std::fs::File;
use std::io::BufReader;

use pbfio::{Decoder, DecoderOptions, Entity, Error};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let path = std::env::args()
        .nth(1)
        .ok_or("usage: info <file.osm.pbf>")?;

    let file = BufReader::new(File::open(&path)?);
    let mut decoder = Decoder::new(file, DecoderOptions::default())?;

    let header = decoder.header();
    if let Some(bbox) = &header.bounding_box {
        println!("BoundingBox: {}", bbox);
    }
    println!("RequiredFeatures: {}", header.required_features.join(", "));
    println!("OptionalFeatures: {}", header.optional_features.join(", "));
    println!("WritingProgram: {}", header.writing_program);
    println!("Source: {}", header.source);
    if let Some(ts) = header.osmosis_replication_timestamp {
        println!("OsmosisReplicationTimestamp: {}", ts.to_rfc3339());
    }
    println!(
        "OsmosisReplicationSequenceNumber: {}",
        header.osmosis_replication_sequence_number
    );
    println!(
        "OsmosisReplicationBaseURL: {}",
        header.osmosis_replication_base_url
    );

    let (mut nodes, mut ways, mut relations) = (0u64, 0u64, 0u64);
    loop {
        match decoder.decode() {
            Ok(batch) => {
                for entity in &batch {
                    match entity {
                        Entity::Node(_) => nodes += 1,
                        Entity::Way(_) => ways += 1,
                        Entity::Relation(_) => relations += 1,
                    }
                }
            }
            Err(Error::Eof) => break,
            Err(err) => return Err(err.into()),
        }
    }

    println!("NodeCount: {}", nodes);
    println!("WayCount: {}", ways);
    println!("RelationCount: {}", relations);

    Ok(())
}
