//! Blob frame writing.

use std::io::Write;

use prost::Message;

use crate::error::Result;
use crate::proto::fileformat::{Blob, BlobHeader};

/// Writes length-prefixed blob frames onto a byte stream.
pub struct BlobWriter<W: Write> {
    writer: W,
}

impl<W: Write> BlobWriter<W> {
    /// Wraps a byte stream positioned at a frame boundary.
    pub fn new(writer: W) -> Self {
        Self { writer }
    }

    /// Writes one frame: length prefix, `BlobHeader`, then the blob bytes.
    pub fn write_frame(&mut self, blob_type: &str, blob: &Blob) -> Result<()> {
        let blob_bytes = blob.encode_to_vec();

        let header = BlobHeader {
            r#type: blob_type.to_string(),
            indexdata: None,
            datasize: blob_bytes.len() as i32,
        };
        let header_bytes = header.encode_to_vec();

        self.writer
            .write_all(&(header_bytes.len() as u32).to_be_bytes())?;
        self.writer.write_all(&header_bytes)?;
        self.writer.write_all(&blob_bytes)?;

        Ok(())
    }

    /// Flushes the underlying stream.
    pub fn flush(&mut self) -> Result<()> {
        self.writer.flush()?;
        Ok(())
    }

    /// Unwraps the underlying stream.
    pub fn into_inner(self) -> W {
        self.writer
    }
}
