//! PrimitiveBlock parsing: delta reconstruction and string table fan-out.

use chrono::{DateTime, Utc};
use prost::Message;

use crate::error::{Error, Result};
use crate::model::{Degrees, Entity, Info, Member, MemberType, Node, Relation, Tags, Way};
use crate::proto::osmformat as pb;

use super::{DATE_GRANULARITY_MS, GRANULARITY};

/// Parses the decompressed payload of an "OSMData" blob into entities, in
/// the order the block stores them.
pub fn parse_primitive_block(buf: &[u8]) -> Result<Vec<Entity>> {
    let block = pb::PrimitiveBlock::decode(buf)?;
    let ctx = BlockContext::new(&block);

    let mut entities = Vec::new();
    for group in &block.primitivegroup {
        ctx.decode_nodes(&group.nodes, &mut entities)?;
        if let Some(dense) = &group.dense {
            ctx.decode_dense_nodes(dense, &mut entities)?;
        }
        ctx.decode_ways(&group.ways, &mut entities)?;
        ctx.decode_relations(&group.relations, &mut entities)?;
    }

    Ok(entities)
}

/// The per-block decoding parameters and string table.
struct BlockContext<'a> {
    strings: &'a [String],
    granularity: i32,
    lat_offset: i64,
    lon_offset: i64,
    date_granularity: i32,
}

impl<'a> BlockContext<'a> {
    fn new(block: &'a pb::PrimitiveBlock) -> Self {
        Self {
            strings: block
                .stringtable
                .as_ref()
                .map(|table| table.s.as_slice())
                .unwrap_or(&[]),
            granularity: block.granularity.unwrap_or(GRANULARITY),
            lat_offset: block.lat_offset.unwrap_or_default(),
            lon_offset: block.lon_offset.unwrap_or_default(),
            date_granularity: block.date_granularity.unwrap_or(DATE_GRANULARITY_MS),
        }
    }

    fn decode_nodes(&self, nodes: &[pb::Node], out: &mut Vec<Entity>) -> Result<()> {
        for node in nodes {
            out.push(Entity::Node(Node {
                id: node.id,
                tags: self.decode_tags(&node.keys, &node.vals)?,
                info: self.decode_info(node.info.as_ref())?,
                lat: Degrees::from_coordinate(self.lat_offset, self.granularity, node.lat),
                lon: Degrees::from_coordinate(self.lon_offset, self.granularity, node.lon),
            }));
        }

        Ok(())
    }

    fn decode_dense_nodes(&self, dense: &pb::DenseNodes, out: &mut Vec<Entity>) -> Result<()> {
        let n = dense.id.len();
        if dense.lat.len() != n || dense.lon.len() != n {
            return Err(Error::malformed("dense node columns have differing lengths"));
        }

        let mut tags = TagCursor::new(self.strings, &dense.keys_vals);
        let mut infos = DenseInfoCursor::new(self, dense.denseinfo.as_ref(), n)?;

        let (mut id, mut lat, mut lon) = (0i64, 0i64, 0i64);
        for i in 0..n {
            id += dense.id[i];
            lat += dense.lat[i];
            lon += dense.lon[i];

            out.push(Entity::Node(Node {
                id,
                tags: tags.next()?,
                info: infos.next(i)?,
                lat: Degrees::from_coordinate(self.lat_offset, self.granularity, lat),
                lon: Degrees::from_coordinate(self.lon_offset, self.granularity, lon),
            }));
        }

        Ok(())
    }

    fn decode_ways(&self, ways: &[pb::Way], out: &mut Vec<Entity>) -> Result<()> {
        for way in ways {
            let mut node_ids = Vec::with_capacity(way.refs.len());
            let mut node_id = 0i64;
            for delta in &way.refs {
                node_id += delta;
                node_ids.push(node_id);
            }

            out.push(Entity::Way(Way {
                id: way.id,
                tags: self.decode_tags(&way.keys, &way.vals)?,
                info: self.decode_info(way.info.as_ref())?,
                node_ids,
            }));
        }

        Ok(())
    }

    fn decode_relations(&self, relations: &[pb::Relation], out: &mut Vec<Entity>) -> Result<()> {
        for relation in relations {
            out.push(Entity::Relation(Relation {
                id: relation.id,
                tags: self.decode_tags(&relation.keys, &relation.vals)?,
                info: self.decode_info(relation.info.as_ref())?,
                members: self.decode_members(relation)?,
            }));
        }

        Ok(())
    }

    fn decode_members(&self, relation: &pb::Relation) -> Result<Vec<Member>> {
        let n = relation.memids.len();
        if relation.types.len() != n || relation.roles_sid.len() != n {
            return Err(Error::malformed("relation member columns have differing lengths"));
        }

        let mut members = Vec::with_capacity(n);
        let mut member_id = 0i64;
        for i in 0..n {
            member_id += relation.memids[i];
            members.push(Member {
                id: member_id,
                member_type: MemberType::from_i32(relation.types[i])?,
                role: string_at(self.strings, relation.roles_sid[i] as usize)?.to_string(),
            });
        }

        Ok(members)
    }

    fn decode_tags(&self, keys: &[u32], vals: &[u32]) -> Result<Tags> {
        if keys.len() != vals.len() {
            return Err(Error::malformed("tag key and value columns have differing lengths"));
        }

        let mut tags = Tags::new();
        for (key, val) in keys.iter().zip(vals) {
            tags.insert(
                string_at(self.strings, *key as usize)?.to_string(),
                string_at(self.strings, *val as usize)?.to_string(),
            );
        }

        Ok(tags)
    }

    fn decode_info(&self, info: Option<&pb::Info>) -> Result<Info> {
        let mut decoded = Info::default();

        if let Some(info) = info {
            decoded.version = info.version.unwrap_or_default();
            decoded.timestamp =
                to_timestamp(self.date_granularity, info.timestamp.unwrap_or_default());
            decoded.changeset = info.changeset.unwrap_or_default();
            decoded.uid = info.uid.unwrap_or_default();
            decoded.user =
                string_at(self.strings, info.user_sid.unwrap_or_default() as usize)?.to_string();
            if let Some(visible) = info.visible {
                decoded.visible = visible;
            }
        }

        Ok(decoded)
    }
}

/// Walks a dense node run's flattened `(key, val)* 0` tag stream.
struct TagCursor<'a> {
    strings: &'a [String],
    keys_vals: &'a [i32],
    pos: usize,
}

impl<'a> TagCursor<'a> {
    fn new(strings: &'a [String], keys_vals: &'a [i32]) -> Self {
        Self { strings, keys_vals, pos: 0 }
    }

    fn next(&mut self) -> Result<Tags> {
        let mut tags = Tags::new();

        // A block with only tag-less nodes omits the stream entirely.
        if self.keys_vals.is_empty() {
            return Ok(tags);
        }

        loop {
            let key = *self
                .keys_vals
                .get(self.pos)
                .ok_or_else(|| Error::malformed("dense tag stream truncated"))?;
            if key == 0 {
                self.pos += 1;
                return Ok(tags);
            }

            let val = *self
                .keys_vals
                .get(self.pos + 1)
                .ok_or_else(|| Error::malformed("dense tag stream truncated"))?;
            tags.insert(
                string_at(self.strings, key as usize)?.to_string(),
                string_at(self.strings, val as usize)?.to_string(),
            );
            self.pos += 2;
        }
    }
}

/// Reconstructs per-node provenance from a dense run's delta columns.
struct DenseInfoCursor<'a> {
    ctx: &'a BlockContext<'a>,
    info: Option<&'a pb::DenseInfo>,
    per_node_visibility: bool,

    version: i32,
    timestamp: i64,
    changeset: i64,
    uid: i32,
    user_sid: i32,
}

impl<'a> DenseInfoCursor<'a> {
    fn new(
        ctx: &'a BlockContext<'a>,
        info: Option<&'a pb::DenseInfo>,
        n: usize,
    ) -> Result<Self> {
        let mut per_node_visibility = false;

        if let Some(info) = info {
            for (name, len) in [
                ("version", info.version.len()),
                ("timestamp", info.timestamp.len()),
                ("changeset", info.changeset.len()),
                ("uid", info.uid.len()),
                ("user_sid", info.user_sid.len()),
            ] {
                if len != 0 && len != n {
                    return Err(Error::malformed(&format!(
                        "dense info {} column length differs from id column",
                        name
                    )));
                }
            }

            // Per-node visibility applies only when the column covers every
            // node; any other length means the nodes are all visible.
            per_node_visibility = info.visible.len() == n && n > 0;
        }

        Ok(Self {
            ctx,
            info,
            per_node_visibility,
            version: 0,
            timestamp: 0,
            changeset: 0,
            uid: 0,
            user_sid: 0,
        })
    }

    fn next(&mut self, i: usize) -> Result<Info> {
        let info = match self.info {
            Some(info) => info,
            None => return Ok(Info::default()),
        };

        if !info.version.is_empty() {
            self.version += info.version[i];
        }
        if !info.timestamp.is_empty() {
            self.timestamp += info.timestamp[i];
        }
        if !info.changeset.is_empty() {
            self.changeset += info.changeset[i];
        }
        if !info.uid.is_empty() {
            self.uid += info.uid[i];
        }
        if !info.user_sid.is_empty() {
            self.user_sid += info.user_sid[i];
        }

        Ok(Info {
            version: self.version,
            uid: self.uid,
            timestamp: to_timestamp(self.ctx.date_granularity, self.timestamp),
            changeset: self.changeset,
            user: string_at(self.ctx.strings, self.user_sid as usize)?.to_string(),
            visible: if self.per_node_visibility {
                info.visible[i]
            } else {
                true
            },
        })
    }
}

/// Looks up a string table entry. Index 0 is the reserved slot and always
/// yields the empty string, table or no table.
fn string_at(strings: &[String], index: usize) -> Result<&str> {
    if index == 0 {
        return Ok("");
    }

    strings
        .get(index)
        .map(String::as_str)
        .ok_or_else(|| Error::malformed("string table index out of range"))
}

/// Converts a raw timestamp in `granularity` millisecond units to UTC.
fn to_timestamp(granularity: i32, raw: i64) -> DateTime<Utc> {
    DateTime::from_timestamp_millis(raw * granularity as i64).unwrap_or(DateTime::UNIX_EPOCH)
}
