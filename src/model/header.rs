//! The OpenStreetMap PBF file header.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::bbox::BoundingBox;

/// The feature every conforming PBF file must advertise.
pub const FEATURE_OSM_SCHEMA: &str = "OsmSchema-V0.6";

/// The feature required of readers when nodes are stored in dense form.
pub const FEATURE_DENSE_NODES: &str = "DenseNodes";

/// The contents of the OpenStreetMap PBF file header.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Header {
    /// The bounding box covering the file's nodes, when recorded.
    pub bounding_box: Option<BoundingBox>,
    /// Features a reader must understand to process the file.
    pub required_features: Vec<String>,
    /// Features a reader may take advantage of.
    pub optional_features: Vec<String>,
    /// The program that wrote the file.
    pub writing_program: String,
    /// The upstream source of the data.
    pub source: String,
    /// When the Osmosis replication stream was last applied.
    pub osmosis_replication_timestamp: Option<DateTime<Utc>>,
    /// The Osmosis replication sequence number.
    pub osmosis_replication_sequence_number: i64,
    /// The Osmosis replication base URL.
    pub osmosis_replication_base_url: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Degrees;

    #[test]
    fn test_header_json() {
        let header = Header {
            bounding_box: Some(BoundingBox {
                top: Degrees(51.69344),
                left: Degrees(-0.511482),
                bottom: Degrees(51.28554),
                right: Degrees(0.335437),
            }),
            required_features: vec![
                FEATURE_OSM_SCHEMA.to_string(),
                FEATURE_DENSE_NODES.to_string(),
            ],
            optional_features: vec!["Sort.Type_then_ID".to_string()],
            writing_program: "osmium/1.14.0".to_string(),
            osmosis_replication_sequence_number: 4221,
            ..Default::default()
        };

        let value = serde_json::to_value(&header).unwrap();
        assert_eq!(value["bounding_box"]["top"], 51.69344);
        assert_eq!(value["required_features"][1], "DenseNodes");
        assert_eq!(value["writing_program"], "osmium/1.14.0");
        assert_eq!(value["osmosis_replication_sequence_number"], 4221);
    }
}
