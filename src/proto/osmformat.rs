//! Messages from `osmformat.proto`: the header block and primitive blocks.

/// The contents of an "OSMHeader" blob.
#[derive(Clone, PartialEq, ::prost::Message)]
pub struct HeaderBlock {
    /// The bounding box of the file, in nano-degrees.
    #[prost(message, optional, tag = "1")]
    pub bbox: ::core::option::Option<HeaderBBox>,
    /// Features a reader must understand.
    #[prost(string, repeated, tag = "4")]
    pub required_features: ::prost::alloc::vec::Vec<::prost::alloc::string::String>,
    /// Features a reader may take advantage of.
    #[prost(string, repeated, tag = "5")]
    pub optional_features: ::prost::alloc::vec::Vec<::prost::alloc::string::String>,
    /// The program that wrote the file.
    #[prost(string, optional, tag = "16")]
    pub writingprogram: ::core::option::Option<::prost::alloc::string::String>,
    /// The upstream source of the data.
    #[prost(string, optional, tag = "17")]
    pub source: ::core::option::Option<::prost::alloc::string::String>,
    /// Replication timestamp in seconds since the epoch.
    #[prost(int64, optional, tag = "32")]
    pub osmosis_replication_timestamp: ::core::option::Option<i64>,
    /// Replication sequence number.
    #[prost(int64, optional, tag = "33")]
    pub osmosis_replication_sequence_number: ::core::option::Option<i64>,
    /// Replication base URL.
    #[prost(string, optional, tag = "34")]
    pub osmosis_replication_base_url: ::core::option::Option<::prost::alloc::string::String>,
}

/// The file-level bounding box, fixed at a granularity of one nano-degree.
#[derive(Clone, PartialEq, ::prost::Message)]
pub struct HeaderBBox {
    /// The western edge in nano-degrees.
    #[prost(sint64, required, tag = "1")]
    pub left: i64,
    /// The eastern edge in nano-degrees.
    #[prost(sint64, required, tag = "2")]
    pub right: i64,
    /// The northern edge in nano-degrees.
    #[prost(sint64, required, tag = "3")]
    pub top: i64,
    /// The southern edge in nano-degrees.
    #[prost(sint64, required, tag = "4")]
    pub bottom: i64,
}

/// The contents of an "OSMData" blob.
#[derive(Clone, PartialEq, ::prost::Message)]
pub struct PrimitiveBlock {
    /// The block's interned strings; index 0 is reserved.
    #[prost(message, optional, tag = "1")]
    pub stringtable: ::core::option::Option<StringTable>,
    /// The block's entity groups.
    #[prost(message, repeated, tag = "2")]
    pub primitivegroup: ::prost::alloc::vec::Vec<PrimitiveGroup>,
    /// Nano-degrees per raw coordinate unit; defaults to 100.
    #[prost(int32, optional, tag = "17")]
    pub granularity: ::core::option::Option<i32>,
    /// Latitude offset in nano-degrees; defaults to 0.
    #[prost(int64, optional, tag = "19")]
    pub lat_offset: ::core::option::Option<i64>,
    /// Longitude offset in nano-degrees; defaults to 0.
    #[prost(int64, optional, tag = "20")]
    pub lon_offset: ::core::option::Option<i64>,
    /// Milliseconds per raw timestamp unit; defaults to 1000.
    #[prost(int32, optional, tag = "18")]
    pub date_granularity: ::core::option::Option<i32>,
}

/// The per-block string intern table.
#[derive(Clone, PartialEq, ::prost::Message)]
pub struct StringTable {
    /// The interned strings; index 0 is reserved as the dense tag terminator.
    #[prost(string, repeated, tag = "1")]
    pub s: ::prost::alloc::vec::Vec<::prost::alloc::string::String>,
}

/// One group of entities within a block; a conforming writer populates only
/// one of the fields, a reader must accept any mixture.
#[derive(Clone, PartialEq, ::prost::Message)]
pub struct PrimitiveGroup {
    /// Sparse nodes.
    #[prost(message, repeated, tag = "1")]
    pub nodes: ::prost::alloc::vec::Vec<Node>,
    /// Densely packed nodes.
    #[prost(message, optional, tag = "2")]
    pub dense: ::core::option::Option<DenseNodes>,
    /// Ways.
    #[prost(message, repeated, tag = "3")]
    pub ways: ::prost::alloc::vec::Vec<Way>,
    /// Relations.
    #[prost(message, repeated, tag = "4")]
    pub relations: ::prost::alloc::vec::Vec<Relation>,
    /// Changesets; carried by some historical files, never decoded here.
    #[prost(message, repeated, tag = "5")]
    pub changesets: ::prost::alloc::vec::Vec<ChangeSet>,
}

/// Per-entity provenance.
#[derive(Clone, PartialEq, ::prost::Message)]
pub struct Info {
    /// The edit version.
    #[prost(int32, optional, tag = "1")]
    pub version: ::core::option::Option<i32>,
    /// Timestamp in units of the block's date granularity.
    #[prost(int64, optional, tag = "2")]
    pub timestamp: ::core::option::Option<i64>,
    /// The changeset of the last edit.
    #[prost(int64, optional, tag = "3")]
    pub changeset: ::core::option::Option<i64>,
    /// The id of the last editing user.
    #[prost(int32, optional, tag = "4")]
    pub uid: ::core::option::Option<i32>,
    /// String table index of the last editing user's name.
    #[prost(uint32, optional, tag = "5")]
    pub user_sid: ::core::option::Option<u32>,
    /// Whether the entity is visible; absent means visible.
    #[prost(bool, optional, tag = "6")]
    pub visible: ::core::option::Option<bool>,
}

/// Provenance for a whole dense node run, as delta-encoded parallel columns.
#[derive(Clone, PartialEq, ::prost::Message)]
pub struct DenseInfo {
    /// Edit versions; not delta-encoded.
    #[prost(int32, repeated, tag = "1")]
    pub version: ::prost::alloc::vec::Vec<i32>,
    /// Delta-encoded timestamps in date granularity units.
    #[prost(sint64, repeated, tag = "2")]
    pub timestamp: ::prost::alloc::vec::Vec<i64>,
    /// Delta-encoded changesets.
    #[prost(sint64, repeated, tag = "3")]
    pub changeset: ::prost::alloc::vec::Vec<i64>,
    /// Delta-encoded user ids.
    #[prost(sint32, repeated, tag = "4")]
    pub uid: ::prost::alloc::vec::Vec<i32>,
    /// Delta-encoded string table indices of user names.
    #[prost(sint32, repeated, tag = "5")]
    pub user_sid: ::prost::alloc::vec::Vec<i32>,
    /// Per-node visibility; only meaningful when as long as the id column.
    #[prost(bool, repeated, tag = "6")]
    pub visible: ::prost::alloc::vec::Vec<bool>,
}

/// A sparse node.
#[derive(Clone, PartialEq, ::prost::Message)]
pub struct Node {
    /// The node's id.
    #[prost(sint64, required, tag = "1")]
    pub id: i64,
    /// String table indices of tag keys, parallel to `vals`.
    #[prost(uint32, repeated, tag = "2")]
    pub keys: ::prost::alloc::vec::Vec<u32>,
    /// String table indices of tag values, parallel to `keys`.
    #[prost(uint32, repeated, tag = "3")]
    pub vals: ::prost::alloc::vec::Vec<u32>,
    /// The node's provenance.
    #[prost(message, optional, tag = "4")]
    pub info: ::core::option::Option<Info>,
    /// Raw latitude in block coordinate units.
    #[prost(sint64, required, tag = "8")]
    pub lat: i64,
    /// Raw longitude in block coordinate units.
    #[prost(sint64, required, tag = "9")]
    pub lon: i64,
}

/// A run of nodes packed into delta-encoded parallel columns.
#[derive(Clone, PartialEq, ::prost::Message)]
pub struct DenseNodes {
    /// Delta-encoded node ids.
    #[prost(sint64, repeated, tag = "1")]
    pub id: ::prost::alloc::vec::Vec<i64>,
    /// Provenance columns, parallel to `id`.
    #[prost(message, optional, tag = "5")]
    pub denseinfo: ::core::option::Option<DenseInfo>,
    /// Delta-encoded raw latitudes.
    #[prost(sint64, repeated, tag = "8")]
    pub lat: ::prost::alloc::vec::Vec<i64>,
    /// Delta-encoded raw longitudes.
    #[prost(sint64, repeated, tag = "9")]
    pub lon: ::prost::alloc::vec::Vec<i64>,
    /// Flattened tag stream: `(key, val)*` pairs per node, each node's run
    /// terminated by a single 0. Absent when no node carries tags.
    #[prost(int32, repeated, tag = "10")]
    pub keys_vals: ::prost::alloc::vec::Vec<i32>,
}

/// A way.
#[derive(Clone, PartialEq, ::prost::Message)]
pub struct Way {
    /// The way's id.
    #[prost(int64, required, tag = "1")]
    pub id: i64,
    /// String table indices of tag keys, parallel to `vals`.
    #[prost(uint32, repeated, tag = "2")]
    pub keys: ::prost::alloc::vec::Vec<u32>,
    /// String table indices of tag values, parallel to `keys`.
    #[prost(uint32, repeated, tag = "3")]
    pub vals: ::prost::alloc::vec::Vec<u32>,
    /// The way's provenance.
    #[prost(message, optional, tag = "4")]
    pub info: ::core::option::Option<Info>,
    /// Delta-encoded ids of the member nodes.
    #[prost(sint64, repeated, tag = "8")]
    pub refs: ::prost::alloc::vec::Vec<i64>,
}

/// A relation.
#[derive(Clone, PartialEq, ::prost::Message)]
pub struct Relation {
    /// The relation's id.
    #[prost(int64, required, tag = "1")]
    pub id: i64,
    /// String table indices of tag keys, parallel to `vals`.
    #[prost(uint32, repeated, tag = "2")]
    pub keys: ::prost::alloc::vec::Vec<u32>,
    /// String table indices of tag values, parallel to `keys`.
    #[prost(uint32, repeated, tag = "3")]
    pub vals: ::prost::alloc::vec::Vec<u32>,
    /// The relation's provenance.
    #[prost(message, optional, tag = "4")]
    pub info: ::core::option::Option<Info>,
    /// String table indices of member roles, parallel to `memids`.
    #[prost(int32, repeated, tag = "8")]
    pub roles_sid: ::prost::alloc::vec::Vec<i32>,
    /// Delta-encoded member ids.
    #[prost(sint64, repeated, tag = "9")]
    pub memids: ::prost::alloc::vec::Vec<i64>,
    /// Member kinds, parallel to `memids`.
    #[prost(enumeration = "relation::MemberType", repeated, tag = "10")]
    pub types: ::prost::alloc::vec::Vec<i32>,
}

/// Nested message and enum types in `Relation`.
pub mod relation {
    /// The kind of entity a relation member references.
    #[derive(
        Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, ::prost::Enumeration,
    )]
    #[repr(i32)]
    pub enum MemberType {
        /// The member is a node.
        Node = 0,
        /// The member is a way.
        Way = 1,
        /// The member is another relation.
        Relation = 2,
    }
}

/// A changeset marker; retained for schema completeness.
#[derive(Clone, PartialEq, ::prost::Message)]
pub struct ChangeSet {
    /// The changeset's id.
    #[prost(int64, required, tag = "1")]
    pub id: i64,
}
