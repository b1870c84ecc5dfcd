//! # pbfio - A Streaming OpenStreetMap PBF Codec
//!
//! pbfio reads and writes the OpenStreetMap PBF (Protocol-Buffer Binary
//! Format) file format: a length-prefixed framing of compressed protobuf
//! blobs carrying either the file header or a block of OSM entities.
//!
//! ## Architecture
//!
//! The codec is built from several layers:
//!
//! - **Blob framing**: length-prefixed `BlobHeader`/`Blob` frames on a byte stream
//! - **Compression adapters**: a uniform interface over RAW, ZLIB, LZMA, LZ4, and ZSTD
//! - **PrimitiveBlock codec**: string table indirection, delta-encoded dense
//!   node columns, way references and relation member ids
//! - **Decode pipeline**: a reader, a batcher, parallel decompress-and-parse
//!   workers, and an order-preserving merge
//! - **Encode pipeline**: per-type partitioning into size-bounded blocks,
//!   streaming compression to a scratch file, and a delayed header written
//!   first into the final file
//!
//! ## Example Usage
//!
//! ```rust
//! use pbfio::{Decoder, DecoderOptions, Encoder, EncoderOptions};
//! use pbfio::model::{Degrees, Entity, Info, Node, Tags};
//!
//! # fn main() -> Result<(), pbfio::Error> {
//! // Encode a single node into an in-memory PBF file.
//! let mut file = Vec::new();
//! let mut encoder = Encoder::new(&mut file, EncoderOptions::default())?;
//! encoder.encode(Entity::Node(Node {
//!     id: 1,
//!     tags: Tags::new(),
//!     info: Info::default(),
//!     lat: Degrees(51.5),
//!     lon: Degrees(-0.1),
//! }))?;
//! encoder.close()?;
//!
//! // Decode it back.
//! let mut decoder = Decoder::new(std::io::Cursor::new(file), DecoderOptions::default())?;
//! assert!(decoder.header().required_features.contains(&"DenseNodes".to_string()));
//!
//! loop {
//!     match decoder.decode() {
//!         Ok(batch) => {
//!             for entity in &batch {
//!                 println!("entity {}", entity.id());
//!             }
//!         }
//!         Err(pbfio::Error::Eof) => break,
//!         Err(err) => return Err(err),
//!     }
//! }
//! # Ok(())
//! # }
//! ```

#![warn(missing_docs)]
#![warn(rust_2018_idioms)]

pub mod blob;
pub mod block;
pub mod buffer;
pub mod config;
pub mod decoder;
pub mod encoder;
pub mod error;
pub mod model;
pub mod proto;

pub use config::{Compression, DecoderOptions, EncoderOptions};
pub use decoder::{Batch, Decoder};
pub use encoder::Encoder;
pub use error::{Error, Result};
pub use model::{
    BoundingBox, Degrees, Entity, Epsilon, Header, Info, Member, MemberType, Node, Relation,
    Tags, Way,
};
