//! OSM entities: nodes, ways, and relations.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

use super::degrees::Degrees;

/// The key/value annotations attached to an entity.
///
/// An ordered map keeps tag iteration deterministic, which the encoder
/// relies on when laying out string table references.
pub type Tags = BTreeMap<String, String>;

/// Provenance common to nodes, ways, and relations.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Info {
    /// The edit version of the entity.
    pub version: i32,
    /// The id of the user who last touched the entity.
    pub uid: i32,
    /// When the entity was last touched.
    pub timestamp: DateTime<Utc>,
    /// The changeset the last edit belongs to.
    pub changeset: i64,
    /// The name of the user who last touched the entity.
    pub user: String,
    /// Whether the entity is visible; deleted entities in history files are not.
    pub visible: bool,
}

impl Default for Info {
    fn default() -> Self {
        Self {
            version: 0,
            uid: 0,
            timestamp: DateTime::UNIX_EPOCH,
            changeset: 0,
            user: String::new(),
            visible: true,
        }
    }
}

/// A specific point on the earth's surface defined by its latitude and
/// longitude.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Node {
    /// The entity's primary key.
    pub id: i64,
    /// The entity's annotations.
    pub tags: Tags,
    /// The entity's provenance.
    pub info: Info,
    /// The node's latitude.
    pub lat: Degrees,
    /// The node's longitude.
    pub lon: Degrees,
}

/// An ordered list of between 2 and 2,000 nodes that define a polyline.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Way {
    /// The entity's primary key.
    pub id: i64,
    /// The entity's annotations.
    pub tags: Tags,
    /// The entity's provenance.
    pub info: Info,
    /// The ids of the member nodes, in polyline order.
    pub node_ids: Vec<i64>,
}

/// The kind of entity a relation member references.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MemberType {
    /// The member is a node.
    Node,
    /// The member is a way.
    Way,
    /// The member is another relation.
    Relation,
}

impl MemberType {
    /// Converts from the wire enum value.
    pub fn from_i32(value: i32) -> Result<MemberType> {
        match value {
            0 => Ok(MemberType::Node),
            1 => Ok(MemberType::Way),
            2 => Ok(MemberType::Relation),
            other => Err(Error::UnknownMemberType(other)),
        }
    }

    /// The wire enum value.
    pub fn as_i32(self) -> i32 {
        match self {
            MemberType::Node => 0,
            MemberType::Way => 1,
            MemberType::Relation => 2,
        }
    }
}

/// A reference from a relation to another entity, by id.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Member {
    /// The id of the referenced entity.
    pub id: i64,
    /// The kind of the referenced entity.
    pub member_type: MemberType,
    /// The member's role within the relation.
    pub role: String,
}

/// A documented relationship between two or more entities.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Relation {
    /// The entity's primary key.
    pub id: i64,
    /// The entity's annotations.
    pub tags: Tags,
    /// The entity's provenance.
    pub info: Info,
    /// The relation's members.
    pub members: Vec<Member>,
}

/// An OSM entity: a node, a way, or a relation.
///
/// The variant set is sealed; the codec's framing and string table layout
/// assume no other entity kinds exist.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Entity {
    /// A point entity.
    Node(Node),
    /// A polyline entity.
    Way(Way),
    /// A relationship entity.
    Relation(Relation),
}

impl Entity {
    /// The entity's primary key.
    pub fn id(&self) -> i64 {
        match self {
            Entity::Node(n) => n.id,
            Entity::Way(w) => w.id,
            Entity::Relation(r) => r.id,
        }
    }

    /// The entity's annotations.
    pub fn tags(&self) -> &Tags {
        match self {
            Entity::Node(n) => &n.tags,
            Entity::Way(w) => &w.tags,
            Entity::Relation(r) => &r.tags,
        }
    }

    /// The entity's provenance.
    pub fn info(&self) -> &Info {
        match self {
            Entity::Node(n) => &n.info,
            Entity::Way(w) => &w.info,
            Entity::Relation(r) => &r.info,
        }
    }
}

impl From<Node> for Entity {
    fn from(node: Node) -> Self {
        Entity::Node(node)
    }
}

impl From<Way> for Entity {
    fn from(way: Way) -> Self {
        Entity::Way(way)
    }
}

impl From<Relation> for Entity {
    fn from(relation: Relation) -> Self {
        Entity::Relation(relation)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_info_default_visible() {
        assert!(Info::default().visible);
    }

    #[test]
    fn test_member_type_conversions() {
        for (value, member_type) in [
            (0, MemberType::Node),
            (1, MemberType::Way),
            (2, MemberType::Relation),
        ] {
            assert_eq!(MemberType::from_i32(value).unwrap(), member_type);
            assert_eq!(member_type.as_i32(), value);
        }

        assert!(matches!(
            MemberType::from_i32(3),
            Err(Error::UnknownMemberType(3))
        ));
    }

    #[test]
    fn test_entity_accessors() {
        let mut tags = Tags::new();
        tags.insert("name".to_string(), "Thames".to_string());

        let entity: Entity = Way {
            id: 42,
            tags,
            info: Info::default(),
            node_ids: vec![1, 2, 3],
        }
        .into();

        assert_eq!(entity.id(), 42);
        assert_eq!(entity.tags().get("name").unwrap(), "Thames");
        assert!(entity.info().visible);
    }
}
