//! Error types for the PBF codec.

use std::fmt;
use std::io;

/// The result type used throughout the crate.
pub type Result<T> = std::result::Result<T, Error>;

/// The error type for PBF decode and encode operations.
#[derive(Debug)]
pub enum Error {
    /// An I/O error occurred on the underlying reader or writer.
    Io(io::Error),

    /// The normal end of the decoded stream.
    Eof,

    /// A malformed protobuf message was encountered.
    ProtoDecode(prost::DecodeError),

    /// A blob carried an unrecognized or absent payload variant.
    UnknownCompression,

    /// The decompressed blob length differed from the recorded raw size.
    SizeMismatch {
        /// The raw size recorded in the blob.
        expected: usize,
        /// The number of bytes actually decompressed.
        actual: usize,
    },

    /// A blob header type other than "OSMHeader" or "OSMData".
    UnknownBlobType(String),

    /// The first frame of the stream was not an "OSMHeader" blob.
    MissingHeader(String),

    /// A relation member type enum value was out of range.
    UnknownMemberType(i32),

    /// A frame exceeded the safety cap.
    FrameTooLarge {
        /// The declared frame size.
        size: u64,
        /// The maximum size accepted.
        limit: u64,
    },

    /// The encoder could not create its temporary scratch store.
    TempStoreUnavailable(io::Error),

    /// The pipeline was shut down and in-flight work was discarded.
    PipelineCancelled,

    /// An invalid argument was provided.
    InvalidArgument(String),
}

impl Error {
    /// Creates a new invalid argument error.
    pub fn invalid_argument(msg: impl Into<String>) -> Self {
        Error::InvalidArgument(msg.into())
    }

    /// Creates a protobuf decode error from a description, for structural
    /// violations found after the message itself parsed.
    pub fn malformed(msg: &str) -> Self {
        Error::ProtoDecode(prost::DecodeError::new(msg.to_string()))
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::Io(e) => write!(f, "IO error: {}", e),
            Error::Eof => write!(f, "end of stream"),
            Error::ProtoDecode(e) => write!(f, "protobuf decode error: {}", e),
            Error::UnknownCompression => write!(f, "unknown blob compression type"),
            Error::SizeMismatch { expected, actual } => {
                write!(f, "raw blob data size {} but expected {}", actual, expected)
            }
            Error::UnknownBlobType(t) => write!(f, "unknown blob type: {}", t),
            Error::MissingHeader(t) => {
                write!(f, "expected OSMHeader as first blob but got {}", t)
            }
            Error::UnknownMemberType(v) => write!(f, "unknown relation member type: {}", v),
            Error::FrameTooLarge { size, limit } => {
                write!(f, "frame of {} bytes exceeds the {} byte cap", size, limit)
            }
            Error::TempStoreUnavailable(e) => {
                write!(f, "cannot create temporary store: {}", e)
            }
            Error::PipelineCancelled => write!(f, "pipeline cancelled"),
            Error::InvalidArgument(msg) => write!(f, "invalid argument: {}", msg),
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Error::Io(e) => Some(e),
            Error::ProtoDecode(e) => Some(e),
            Error::TempStoreUnavailable(e) => Some(e),
            _ => None,
        }
    }
}

impl From<io::Error> for Error {
    fn from(err: io::Error) -> Self {
        Error::Io(err)
    }
}

impl From<prost::DecodeError> for Error {
    fn from(err: prost::DecodeError) -> Self {
        Error::ProtoDecode(err)
    }
}
