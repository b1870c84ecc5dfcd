//! PrimitiveBlock construction: string table layout, delta encoding, and
//! dense node columns.

use chrono::{DateTime, Utc};
use prost::Message;

use crate::error::{Error, Result};
use crate::model::{BoundingBox, Entity, Info, Node, Relation, Way};
use crate::proto::osmformat as pb;

use super::strings::{StringSet, StringTableIndex};
use super::{DATE_GRANULARITY_MS, GRANULARITY, LAT_OFFSET, LON_OFFSET};

/// The most entities a single block may hold. Widespread consumers
/// (osmosis 0.38 among them) expect writers to cap blocks at this count.
pub const ENTITY_LIMIT: usize = 8000;

/// The most uncompressed bytes a single block may serialize to.
pub const MAX_BLOCK_BYTES: usize = 16 * 1024 * 1024;

/// A block ready for compression, plus the bounding box of any nodes it
/// carries for the encoder's global bounding box merge.
#[derive(Debug)]
pub struct EncodedBlock {
    /// The serialized `PrimitiveBlock` payload.
    pub payload: Vec<u8>,
    /// The bounding box covering the block's nodes, if it has any.
    pub bbox: Option<BoundingBox>,
}

/// Encodes one homogeneous batch of entities into a block payload.
///
/// The batch must hold entities of a single concrete type; the pipeline's
/// per-type partitioning guarantees that. Nodes are written in dense form.
pub fn encode_block(entities: &[Entity]) -> Result<EncodedBlock> {
    if entities.is_empty() {
        return Err(Error::invalid_argument("cannot encode an empty block"));
    }
    if entities.len() > ENTITY_LIMIT {
        return Err(Error::invalid_argument("block exceeds the entity limit"));
    }

    let table = collect_strings(entities);

    let mut bbox = None;
    let group = match &entities[0] {
        Entity::Node(_) => pb::PrimitiveGroup {
            dense: Some(encode_dense_nodes(entities, &table, &mut bbox)),
            ..Default::default()
        },
        Entity::Way(_) => pb::PrimitiveGroup {
            ways: encode_ways(entities, &table),
            ..Default::default()
        },
        Entity::Relation(_) => pb::PrimitiveGroup {
            relations: encode_relations(entities, &table),
            ..Default::default()
        },
    };

    let block = pb::PrimitiveBlock {
        stringtable: Some(pb::StringTable { s: table.into_strings() }),
        primitivegroup: vec![group],
        granularity: Some(GRANULARITY),
        lat_offset: Some(LAT_OFFSET),
        lon_offset: Some(LON_OFFSET),
        date_granularity: Some(DATE_GRANULARITY_MS),
    };

    let payload = block.encode_to_vec();
    if payload.len() > MAX_BLOCK_BYTES {
        return Err(Error::invalid_argument(
            "encoded block exceeds the 16 MiB uncompressed cap",
        ));
    }

    Ok(EncodedBlock { payload, bbox })
}

/// Gathers every string the batch references into a sorted intern table.
fn collect_strings(entities: &[Entity]) -> StringTableIndex {
    let mut strings = StringSet::new();

    for entity in entities {
        for (key, val) in entity.tags() {
            strings.add(key);
            strings.add(val);
        }
        strings.add(&entity.info().user);

        if let Entity::Relation(relation) = entity {
            for member in &relation.members {
                strings.add(&member.role);
            }
        }
    }

    strings.build()
}

fn encode_dense_nodes(
    entities: &[Entity],
    table: &StringTableIndex,
    bbox: &mut Option<BoundingBox>,
) -> pb::DenseNodes {
    let mut ids = Vec::with_capacity(entities.len());
    let mut lats = Vec::with_capacity(entities.len());
    let mut lons = Vec::with_capacity(entities.len());

    let mut versions = Vec::with_capacity(entities.len());
    let mut timestamps = Vec::with_capacity(entities.len());
    let mut changesets = Vec::with_capacity(entities.len());
    let mut uids = Vec::with_capacity(entities.len());
    let mut user_sids = Vec::with_capacity(entities.len());
    let mut visibles = Vec::with_capacity(entities.len());

    let mut keys_vals = Vec::new();
    let mut block_bbox = BoundingBox::initial();

    for entity in entities {
        let node = match entity {
            Entity::Node(node) => node,
            _ => continue,
        };

        ids.push(node.id);

        block_bbox.expand_with_lat_lon(node.lat, node.lon);
        lats.push(node.lat.to_coordinate(LAT_OFFSET, GRANULARITY));
        lons.push(node.lon.to_coordinate(LON_OFFSET, GRANULARITY));

        versions.push(node.info.version);
        timestamps.push(to_raw_timestamp(node.info.timestamp));
        changesets.push(node.info.changeset);
        uids.push(node.info.uid);
        user_sids.push(table.index_of(&node.info.user) as i32);
        visibles.push(node.info.visible);

        for (key, val) in &node.tags {
            keys_vals.push(table.index_of(key) as i32);
            keys_vals.push(table.index_of(val) as i32);
        }
        keys_vals.push(0);
    }

    *bbox = Some(block_bbox);

    pb::DenseNodes {
        id: delta_encode(&ids),
        denseinfo: Some(pb::DenseInfo {
            version: delta_encode(&versions),
            timestamp: delta_encode(&timestamps),
            changeset: delta_encode(&changesets),
            uid: delta_encode(&uids),
            user_sid: delta_encode(&user_sids),
            visible: visibles,
        }),
        lat: delta_encode(&lats),
        lon: delta_encode(&lons),
        keys_vals,
    }
}

fn encode_ways(entities: &[Entity], table: &StringTableIndex) -> Vec<pb::Way> {
    let mut ways = Vec::with_capacity(entities.len());

    for entity in entities {
        let way = match entity {
            Entity::Way(way) => way,
            _ => continue,
        };

        let (keys, vals) = tag_ids(way, table);
        ways.push(pb::Way {
            id: way.id,
            keys,
            vals,
            info: Some(encode_info(&way.info, table)),
            refs: delta_encode(&way.node_ids),
        });
    }

    ways
}

fn encode_relations(entities: &[Entity], table: &StringTableIndex) -> Vec<pb::Relation> {
    let mut relations = Vec::with_capacity(entities.len());

    for entity in entities {
        let relation = match entity {
            Entity::Relation(relation) => relation,
            _ => continue,
        };

        let mut memids = Vec::with_capacity(relation.members.len());
        let mut roles_sid = Vec::with_capacity(relation.members.len());
        let mut types = Vec::with_capacity(relation.members.len());
        for member in &relation.members {
            memids.push(member.id);
            roles_sid.push(table.index_of(&member.role) as i32);
            types.push(member.member_type.as_i32());
        }

        let (keys, vals) = tag_ids(relation, table);
        relations.push(pb::Relation {
            id: relation.id,
            keys,
            vals,
            info: Some(encode_info(&relation.info, table)),
            roles_sid,
            memids: delta_encode(&memids),
            types,
        });
    }

    relations
}

fn encode_info(info: &Info, table: &StringTableIndex) -> pb::Info {
    pb::Info {
        version: Some(info.version),
        timestamp: Some(to_raw_timestamp(info.timestamp)),
        changeset: Some(info.changeset),
        uid: Some(info.uid),
        user_sid: Some(table.index_of(&info.user)),
        visible: Some(info.visible),
    }
}

/// Tag columns in the entity's (sorted) tag order.
fn tag_ids(entity: &impl Tagged, table: &StringTableIndex) -> (Vec<u32>, Vec<u32>) {
    let tags = entity.tags();
    let mut keys = Vec::with_capacity(tags.len());
    let mut vals = Vec::with_capacity(tags.len());

    for (key, val) in tags {
        keys.push(table.index_of(key));
        vals.push(table.index_of(val));
    }

    (keys, vals)
}

trait Tagged {
    fn tags(&self) -> &crate::model::Tags;
}

impl Tagged for Node {
    fn tags(&self) -> &crate::model::Tags {
        &self.tags
    }
}

impl Tagged for Way {
    fn tags(&self) -> &crate::model::Tags {
        &self.tags
    }
}

impl Tagged for Relation {
    fn tags(&self) -> &crate::model::Tags {
        &self.tags
    }
}

/// Rewrites a sequence as successive differences, starting from zero.
fn delta_encode<T>(values: &[T]) -> Vec<T>
where
    T: Copy + Default + std::ops::Sub<Output = T>,
{
    let mut prev = T::default();
    let mut deltas = Vec::with_capacity(values.len());

    for value in values {
        deltas.push(*value - prev);
        prev = *value;
    }

    deltas
}

/// Converts a UTC timestamp to raw date-granularity units.
fn to_raw_timestamp(timestamp: DateTime<Utc>) -> i64 {
    timestamp.timestamp_millis() / DATE_GRANULARITY_MS as i64
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::block::parse_primitive_block;
    use crate::model::{Degrees, Member, MemberType, Tags, E6, E7};

    fn node(id: i64, lat: f64, lon: f64) -> Entity {
        Entity::Node(Node {
            id,
            tags: Tags::new(),
            info: Info::default(),
            lat: Degrees(lat),
            lon: Degrees(lon),
        })
    }

    #[test]
    fn test_delta_encode() {
        let values = vec![1i64, 1, 2, 3, 5, 7, 12];
        assert_eq!(delta_encode(&values), vec![1, 0, 1, 1, 2, 2, 5]);
    }

    #[test]
    fn test_delta_encode_first_element_is_value() {
        let values = vec![42i64, 43];
        assert_eq!(delta_encode(&values)[0], 42);
    }

    #[test]
    fn test_delta_roundtrip() {
        let values = vec![-5i64, 10, 10, -3, 1_000_000, 7];
        let deltas = delta_encode(&values);

        let mut sum = 0i64;
        let decoded: Vec<i64> = deltas
            .iter()
            .map(|d| {
                sum += d;
                sum
            })
            .collect();
        assert_eq!(decoded, values);
    }

    #[test]
    fn test_empty_block_rejected() {
        assert!(encode_block(&[]).is_err());
    }

    #[test]
    fn test_node_block_roundtrip() {
        let mut tags = Tags::new();
        tags.insert("amenity".to_string(), "cafe".to_string());

        let entities = vec![
            Entity::Node(Node {
                id: 100,
                tags,
                info: Info {
                    version: 3,
                    uid: 77,
                    timestamp: DateTime::from_timestamp(1_644_784_822, 0).unwrap(),
                    changeset: 900,
                    user: "mapper".to_string(),
                    visible: true,
                },
                lat: Degrees(51.5),
                lon: Degrees(-0.1),
            }),
            node(101, 51.6, -0.2),
        ];

        let encoded = encode_block(&entities).unwrap();
        let decoded = parse_primitive_block(&encoded.payload).unwrap();

        assert_eq!(decoded.len(), 2);
        assert_eq!(decoded[0].id(), 100);
        assert_eq!(decoded[0].tags().get("amenity").unwrap(), "cafe");
        assert_eq!(decoded[0].info().version, 3);
        assert_eq!(decoded[0].info().user, "mapper");
        assert_eq!(
            decoded[0].info().timestamp,
            DateTime::from_timestamp(1_644_784_822, 0).unwrap()
        );

        match &decoded[1] {
            Entity::Node(n) => {
                assert!(n.lat.equal_within(Degrees(51.6), E7));
                assert!(n.lon.equal_within(Degrees(-0.2), E7));
            }
            other => panic!("expected a node, got {:?}", other),
        }
    }

    #[test]
    fn test_node_block_bbox() {
        let entities = vec![node(1, 51.5, -0.1), node(2, 51.7, 0.3), node(3, 51.3, -0.5)];

        let encoded = encode_block(&entities).unwrap();
        let bbox = encoded.bbox.unwrap();

        assert!(bbox.top.equal_within(Degrees(51.7), E6));
        assert!(bbox.bottom.equal_within(Degrees(51.3), E6));
        assert!(bbox.left.equal_within(Degrees(-0.5), E6));
        assert!(bbox.right.equal_within(Degrees(0.3), E6));
    }

    #[test]
    fn test_way_block_roundtrip() {
        let mut tags = Tags::new();
        tags.insert("highway".to_string(), "residential".to_string());

        let entities = vec![Entity::Way(Way {
            id: 7,
            tags,
            info: Info::default(),
            node_ids: vec![100, 101, 102, 90],
        })];

        let encoded = encode_block(&entities).unwrap();
        assert!(encoded.bbox.is_none());

        let decoded = parse_primitive_block(&encoded.payload).unwrap();
        match &decoded[0] {
            Entity::Way(way) => {
                assert_eq!(way.id, 7);
                assert_eq!(way.node_ids, vec![100, 101, 102, 90]);
                assert_eq!(way.tags.get("highway").unwrap(), "residential");
            }
            other => panic!("expected a way, got {:?}", other),
        }
    }

    #[test]
    fn test_relation_block_roundtrip() {
        let entities = vec![Entity::Relation(Relation {
            id: 9,
            tags: Tags::new(),
            info: Info::default(),
            members: vec![
                Member { id: 4, member_type: MemberType::Node, role: "stop".to_string() },
                Member { id: 7, member_type: MemberType::Way, role: "".to_string() },
                Member { id: 2, member_type: MemberType::Relation, role: "outer".to_string() },
            ],
        })];

        let encoded = encode_block(&entities).unwrap();
        let decoded = parse_primitive_block(&encoded.payload).unwrap();

        match &decoded[0] {
            Entity::Relation(relation) => {
                assert_eq!(relation.members.len(), 3);
                assert_eq!(relation.members[0].role, "stop");
                assert_eq!(relation.members[1].member_type, MemberType::Way);
                assert_eq!(relation.members[2].id, 2);
            }
            other => panic!("expected a relation, got {:?}", other),
        }
    }

    #[test]
    fn test_string_table_never_references_reserved_index() {
        let mut tags = Tags::new();
        tags.insert("k".to_string(), "v".to_string());

        let entities = vec![Entity::Node(Node {
            id: 1,
            tags,
            info: Info { user: "someone".to_string(), ..Default::default() },
            lat: Degrees(0.0),
            lon: Degrees(0.0),
        })];

        let encoded = encode_block(&entities).unwrap();
        let block = pb::PrimitiveBlock::decode(&encoded.payload[..]).unwrap();
        let dense = block.primitivegroup[0].dense.as_ref().unwrap();

        // Tag indices are nonzero; zeros appear only as terminators.
        let mut pos = 0;
        while pos < dense.keys_vals.len() {
            if dense.keys_vals[pos] == 0 {
                pos += 1;
                continue;
            }
            assert!(dense.keys_vals[pos] > 0 && dense.keys_vals[pos + 1] > 0);
            pos += 2;
        }

        let table_len = block.stringtable.unwrap().s.len() as i32;
        for sid in &dense.keys_vals {
            assert!(*sid < table_len);
        }
    }

    #[test]
    fn test_oversized_block_rejected() {
        // A handful of nodes carrying ~1 MiB of unique tag data each.
        let entities: Vec<Entity> = (0..20)
            .map(|i| {
                let mut tags = Tags::new();
                tags.insert(format!("key-{}", i), "x".repeat(1024 * 1024));
                Entity::Node(Node {
                    id: i,
                    tags,
                    info: Info::default(),
                    lat: Degrees(0.0),
                    lon: Degrees(0.0),
                })
            })
            .collect();

        assert!(matches!(
            encode_block(&entities),
            Err(Error::InvalidArgument(_))
        ));
    }
}
