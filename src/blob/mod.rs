//! Blob framing: length-prefixed frames and their compressed payloads.
//!
//! A PBF stream is a sequence of frames, each a 4-byte big-endian length
//! prefix, a protobuf `BlobHeader`, and `datasize` bytes of protobuf
//! `Blob`. The first frame's type is "OSMHeader", every later frame's is
//! "OSMData".

mod compression;
mod reader;
mod writer;

pub use compression::{pack, unpack};
pub use reader::{BlobReader, Frame};
pub use writer::BlobWriter;

/// Frame type of the file header blob.
pub const BLOB_TYPE_HEADER: &str = "OSMHeader";

/// Frame type of every entity-carrying blob.
pub const BLOB_TYPE_DATA: &str = "OSMData";

/// Safety cap on the serialized `BlobHeader`; the format limits headers
/// to 64 KiB.
pub const MAX_BLOB_HEADER_SIZE: u32 = 64 * 1024;

/// Safety cap on the serialized `Blob`; the format limits blobs to 64 MiB.
pub const MAX_BLOB_SIZE: u32 = 64 * 1024 * 1024;
