//! HeaderBlock parsing and construction.
//!
//! The header's bounding box is stored at a fixed granularity of one
//! nano-degree per unit with no offset, and its replication timestamp in
//! whole seconds since the epoch.

use chrono::DateTime;
use prost::Message;

use crate::error::Result;
use crate::model::{BoundingBox, Degrees, Header};
use crate::proto::osmformat::{HeaderBBox, HeaderBlock};

/// Parses the payload of an "OSMHeader" blob into a [`Header`].
pub fn parse_header_block(buf: &[u8]) -> Result<Header> {
    let hb = HeaderBlock::decode(buf)?;

    let bounding_box = hb.bbox.map(|bbox| BoundingBox {
        top: Degrees::from_coordinate(0, 1, bbox.top),
        left: Degrees::from_coordinate(0, 1, bbox.left),
        bottom: Degrees::from_coordinate(0, 1, bbox.bottom),
        right: Degrees::from_coordinate(0, 1, bbox.right),
    });

    Ok(Header {
        bounding_box,
        required_features: hb.required_features,
        optional_features: hb.optional_features,
        writing_program: hb.writingprogram.unwrap_or_default(),
        source: hb.source.unwrap_or_default(),
        osmosis_replication_timestamp: hb
            .osmosis_replication_timestamp
            .and_then(|secs| DateTime::from_timestamp(secs, 0)),
        osmosis_replication_sequence_number: hb
            .osmosis_replication_sequence_number
            .unwrap_or_default(),
        osmosis_replication_base_url: hb.osmosis_replication_base_url.unwrap_or_default(),
    })
}

/// Builds the wire form of a [`Header`], the inverse of
/// [`parse_header_block`].
pub fn build_header_block(header: &Header) -> HeaderBlock {
    HeaderBlock {
        bbox: header.bounding_box.as_ref().map(|bbox| HeaderBBox {
            left: bbox.left.coordinate(),
            right: bbox.right.coordinate(),
            top: bbox.top.coordinate(),
            bottom: bbox.bottom.coordinate(),
        }),
        required_features: header.required_features.clone(),
        optional_features: header.optional_features.clone(),
        writingprogram: Some(header.writing_program.clone()),
        source: Some(header.source.clone()),
        osmosis_replication_timestamp: header
            .osmosis_replication_timestamp
            .map(|ts| ts.timestamp()),
        osmosis_replication_sequence_number: Some(header.osmosis_replication_sequence_number),
        osmosis_replication_base_url: Some(header.osmosis_replication_base_url.clone()),
    }
}
