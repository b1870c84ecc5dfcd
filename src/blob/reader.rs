//! Blob frame reading.

use std::io::{self, Read};

use prost::Message;

use crate::blob::{MAX_BLOB_HEADER_SIZE, MAX_BLOB_SIZE};
use crate::buffer::PooledBuffer;
use crate::error::{Error, Result};
use crate::proto::fileformat::{Blob, BlobHeader};

/// One frame read off the stream: the header's type plus the blob payload.
#[derive(Debug, Clone)]
pub struct Frame {
    /// The frame type, "OSMHeader" or "OSMData".
    pub blob_type: String,
    /// The frame's payload envelope.
    pub blob: Blob,
}

/// Reads length-prefixed blob frames off a byte stream.
pub struct BlobReader<R: Read> {
    reader: R,
}

impl<R: Read> BlobReader<R> {
    /// Wraps a byte stream positioned at a frame boundary.
    pub fn new(reader: R) -> Self {
        Self { reader }
    }

    /// Reads the next frame.
    ///
    /// A clean end of stream before the length prefix returns
    /// [`Error::Eof`]; running dry anywhere else is an I/O error.
    pub fn read_frame(&mut self) -> Result<Frame> {
        let header = self.read_blob_header()?;
        let blob = self.read_blob_data(header.datasize)?;

        Ok(Frame { blob_type: header.r#type, blob })
    }

    /// Reads the 4-byte length prefix and the `BlobHeader` it describes.
    fn read_blob_header(&mut self) -> Result<BlobHeader> {
        let size = match self.read_len_prefix()? {
            Some(size) => size,
            None => return Err(Error::Eof),
        };

        if size > MAX_BLOB_HEADER_SIZE {
            return Err(Error::FrameTooLarge {
                size: size as u64,
                limit: MAX_BLOB_HEADER_SIZE as u64,
            });
        }

        let mut buf = PooledBuffer::with_capacity(size as usize);
        buf.resize(size as usize, 0);
        self.reader.read_exact(&mut buf[..])?;

        Ok(BlobHeader::decode(&buf[..])?)
    }

    /// Reads `datasize` bytes and decodes them as a `Blob`.
    fn read_blob_data(&mut self, datasize: i32) -> Result<Blob> {
        if datasize < 0 || datasize as u32 > MAX_BLOB_SIZE {
            return Err(Error::FrameTooLarge {
                size: datasize as u64,
                limit: MAX_BLOB_SIZE as u64,
            });
        }

        let mut buf = PooledBuffer::with_capacity(datasize as usize);
        buf.resize(datasize as usize, 0);
        self.reader.read_exact(&mut buf[..])?;

        Ok(Blob::decode(&buf[..])?)
    }

    /// Reads the big-endian frame length, distinguishing a clean end of
    /// stream (`None`) from a short read inside the prefix (an error).
    fn read_len_prefix(&mut self) -> Result<Option<u32>> {
        let mut buf = [0u8; 4];
        let mut filled = 0;

        while filled < buf.len() {
            match self.reader.read(&mut buf[filled..]) {
                Ok(0) => {
                    if filled == 0 {
                        return Ok(None);
                    }
                    return Err(Error::Io(io::Error::new(
                        io::ErrorKind::UnexpectedEof,
                        "stream ended inside a frame length prefix",
                    )));
                }
                Ok(n) => filled += n,
                Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
                Err(e) => return Err(Error::Io(e)),
            }
        }

        Ok(Some(u32::from_be_bytes(buf)))
    }
}
