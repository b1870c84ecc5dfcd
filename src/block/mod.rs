//! PrimitiveBlock and HeaderBlock codecs.
//!
//! A primitive block interns every string its entities reference in a
//! per-block table and stores coordinates, ids, and provenance columns in
//! delta-encoded fixed-point form. The decode side reconstructs entities
//! with owned strings so nothing outlives its block's table.

mod decode;
mod encode;
mod header;
mod strings;

pub use decode::parse_primitive_block;
pub use encode::{encode_block, EncodedBlock, ENTITY_LIMIT, MAX_BLOCK_BYTES};
pub use header::{build_header_block, parse_header_block};
pub use strings::{StringSet, StringTableIndex};

/// Default nano-degrees per raw coordinate unit.
pub const GRANULARITY: i32 = 100;

/// Default milliseconds per raw timestamp unit.
pub const DATE_GRANULARITY_MS: i32 = 1000;

/// Default latitude offset in nano-degrees.
pub const LAT_OFFSET: i64 = 0;

/// Default longitude offset in nano-degrees.
pub const LON_OFFSET: i64 = 0;
