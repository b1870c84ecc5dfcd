//! Messages from `fileformat.proto`: the blob framing envelope.

/// The envelope around one compressed payload.
#[derive(Clone, PartialEq, ::prost::Message)]
pub struct Blob {
    /// The uncompressed payload size; set whenever the payload is compressed.
    #[prost(int32, optional, tag = "2")]
    pub raw_size: ::core::option::Option<i32>,
    /// Exactly one payload variant is set.
    #[prost(oneof = "blob::Data", tags = "1, 3, 4, 6, 7")]
    pub data: ::core::option::Option<blob::Data>,
}

/// Nested message and enum types in `Blob`.
pub mod blob {
    /// The payload variants, one per compression algorithm.
    #[derive(Clone, PartialEq, ::prost::Oneof)]
    pub enum Data {
        /// Uncompressed payload bytes.
        #[prost(bytes, tag = "1")]
        Raw(::prost::alloc::vec::Vec<u8>),
        /// zlib-compressed payload bytes.
        #[prost(bytes, tag = "3")]
        ZlibData(::prost::alloc::vec::Vec<u8>),
        /// LZMA-compressed payload bytes.
        #[prost(bytes, tag = "4")]
        LzmaData(::prost::alloc::vec::Vec<u8>),
        /// LZ4-compressed payload bytes.
        #[prost(bytes, tag = "6")]
        Lz4Data(::prost::alloc::vec::Vec<u8>),
        /// Zstandard-compressed payload bytes.
        #[prost(bytes, tag = "7")]
        ZstdData(::prost::alloc::vec::Vec<u8>),
    }
}

/// The length-prefixed header preceding every [`Blob`] in the stream.
#[derive(Clone, PartialEq, ::prost::Message)]
pub struct BlobHeader {
    /// "OSMHeader" or "OSMData".
    #[prost(string, required, tag = "1")]
    pub r#type: ::prost::alloc::string::String,
    /// Opaque index data some writers attach; ignored here.
    #[prost(bytes = "vec", optional, tag = "2")]
    pub indexdata: ::core::option::Option<::prost::alloc::vec::Vec<u8>>,
    /// The byte length of the serialized [`Blob`] that follows.
    #[prost(int32, required, tag = "3")]
    pub datasize: i32,
}
