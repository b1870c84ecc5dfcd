//! Configuration options for the decoder and encoder.

use std::path::PathBuf;
use std::thread;

use chrono::{DateTime, Utc};

use crate::model::{FEATURE_DENSE_NODES, FEATURE_OSM_SCHEMA};

/// Default scratch buffer capacity for protobuf un-marshaling.
/// Default: 1MB
pub const DEFAULT_PROTO_BUFFER_SIZE: usize = 1024 * 1024;

/// Default number of blobs handed to a decode worker as one batch.
/// Default: 16
pub const DEFAULT_PROTO_BATCH_SIZE: usize = 16;

/// Default worker count: all but one of the available CPUs, at least one.
pub fn default_n_cpu() -> usize {
    let cpus = thread::available_parallelism().map(|n| n.get()).unwrap_or(1);
    cpus.saturating_sub(1).max(1)
}

/// Compression algorithms for PBF blob payloads.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Compression {
    /// No compression, payload stored as-is.
    Raw,
    /// zlib/DEFLATE, the compression used by virtually all PBF files in the wild.
    Zlib,
    /// LZMA family compression.
    Lzma,
    /// LZ4 frame compression (very fast, lower compression ratio).
    Lz4,
    /// Zstandard compression.
    Zstd,
}

impl Default for Compression {
    fn default() -> Self {
        Compression::Zlib
    }
}

/// Configuration options for opening a [`Decoder`](crate::Decoder).
#[derive(Debug, Clone)]
pub struct DecoderOptions {
    /// Initial scratch buffer capacity for protobuf un-marshaling.
    /// Default: 1MB
    pub proto_buffer_size: usize,

    /// Number of blobs batched together before being handed to a worker.
    /// Default: 16
    pub proto_batch_size: usize,

    /// Number of background decode workers.
    /// Default: available CPUs minus one, at least one
    pub n_cpu: usize,
}

impl Default for DecoderOptions {
    fn default() -> Self {
        Self {
            proto_buffer_size: DEFAULT_PROTO_BUFFER_SIZE,
            proto_batch_size: DEFAULT_PROTO_BATCH_SIZE,
            n_cpu: default_n_cpu(),
        }
    }
}

impl DecoderOptions {
    /// Creates a new DecoderOptions with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the scratch buffer capacity for protobuf un-marshaling.
    pub fn proto_buffer_size(mut self, size: usize) -> Self {
        self.proto_buffer_size = size;
        self
    }

    /// Sets the number of blobs per worker batch.
    pub fn proto_batch_size(mut self, size: usize) -> Self {
        self.proto_batch_size = size;
        self
    }

    /// Sets the number of background decode workers.
    pub fn n_cpu(mut self, n: usize) -> Self {
        self.n_cpu = n;
        self
    }

    /// Validates the options and returns an error if any are invalid.
    pub fn validate(&self) -> crate::Result<()> {
        if self.proto_buffer_size == 0 {
            return Err(crate::Error::invalid_argument("proto_buffer_size must be > 0"));
        }
        if self.proto_batch_size == 0 {
            return Err(crate::Error::invalid_argument("proto_batch_size must be > 0"));
        }
        if self.n_cpu == 0 {
            return Err(crate::Error::invalid_argument("n_cpu must be > 0"));
        }
        Ok(())
    }
}

/// Configuration options for opening an [`Encoder`](crate::Encoder).
#[derive(Debug, Clone)]
pub struct EncoderOptions {
    /// Compression applied to every blob payload.
    /// Default: Zlib
    pub compression: Compression,

    /// Directory in which the temporary entity store is created.
    /// Default: the system temp directory
    pub store_path: Option<PathBuf>,

    /// Required features advertised in the file header.
    /// Default: `["OsmSchema-V0.6", "DenseNodes"]`
    pub required_features: Vec<String>,

    /// Optional features advertised in the file header.
    /// Default: empty
    pub optional_features: Vec<String>,

    /// The program recorded as the file's author.
    /// Default: empty
    pub writing_program: String,

    /// The upstream data source recorded in the header.
    /// Default: empty
    pub source: String,

    /// Osmosis replication timestamp recorded in the header.
    /// Default: none
    pub osmosis_replication_timestamp: Option<DateTime<Utc>>,

    /// Osmosis replication sequence number recorded in the header.
    /// Default: 0
    pub osmosis_replication_sequence_number: i64,

    /// Osmosis replication base URL recorded in the header.
    /// Default: empty
    pub osmosis_replication_base_url: String,
}

impl Default for EncoderOptions {
    fn default() -> Self {
        Self {
            compression: Compression::default(),
            store_path: None,
            required_features: vec![
                FEATURE_OSM_SCHEMA.to_string(),
                FEATURE_DENSE_NODES.to_string(),
            ],
            optional_features: Vec::new(),
            writing_program: String::new(),
            source: String::new(),
            osmosis_replication_timestamp: None,
            osmosis_replication_sequence_number: 0,
            osmosis_replication_base_url: String::new(),
        }
    }
}

impl EncoderOptions {
    /// Creates a new EncoderOptions with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the compression applied to every blob payload.
    pub fn compression(mut self, compression: Compression) -> Self {
        self.compression = compression;
        self
    }

    /// Sets the directory in which the temporary entity store is created.
    pub fn store_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.store_path = Some(path.into());
        self
    }

    /// Appends required features to the file header.
    pub fn required_features(mut self, features: &[&str]) -> Self {
        self.required_features
            .extend(features.iter().map(|s| s.to_string()));
        self
    }

    /// Appends optional features to the file header.
    pub fn optional_features(mut self, features: &[&str]) -> Self {
        self.optional_features
            .extend(features.iter().map(|s| s.to_string()));
        self
    }

    /// Sets the program recorded as the file's author.
    pub fn writing_program(mut self, program: impl Into<String>) -> Self {
        self.writing_program = program.into();
        self
    }

    /// Sets the upstream data source recorded in the header.
    pub fn source(mut self, source: impl Into<String>) -> Self {
        self.source = source.into();
        self
    }

    /// Sets the Osmosis replication timestamp recorded in the header.
    pub fn osmosis_replication_timestamp(mut self, timestamp: DateTime<Utc>) -> Self {
        self.osmosis_replication_timestamp = Some(timestamp);
        self
    }

    /// Sets the Osmosis replication sequence number recorded in the header.
    pub fn osmosis_replication_sequence_number(mut self, sequence_number: i64) -> Self {
        self.osmosis_replication_sequence_number = sequence_number;
        self
    }

    /// Sets the Osmosis replication base URL recorded in the header.
    pub fn osmosis_replication_base_url(mut self, url: impl Into<String>) -> Self {
        self.osmosis_replication_base_url = url.into();
        self
    }
}
