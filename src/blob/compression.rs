//! Compression adapters dispatching on the blob payload variant.

use std::io::{self, Read, Write};

use bytes::{BufMut, BytesMut};

use crate::config::Compression;
use crate::error::{Error, Result};
use crate::proto::fileformat::{blob::Data, Blob};

/// Compresses a serialized payload into a [`Blob`], filling `raw_size` and
/// the payload variant matching the chosen algorithm.
pub fn pack(payload: &[u8], compression: Compression) -> Result<Blob> {
    let data = match compression {
        Compression::Raw => Data::Raw(payload.to_vec()),
        Compression::Zlib => {
            let mut encoder =
                flate2::write::ZlibEncoder::new(Vec::new(), flate2::Compression::default());
            encoder.write_all(payload)?;
            Data::ZlibData(encoder.finish()?)
        }
        Compression::Lzma => {
            let mut encoder = xz2::write::XzEncoder::new(Vec::new(), 6);
            encoder.write_all(payload)?;
            Data::LzmaData(encoder.finish()?)
        }
        Compression::Lz4 => {
            let mut encoder = lz4_flex::frame::FrameEncoder::new(Vec::new());
            encoder.write_all(payload)?;
            Data::Lz4Data(encoder.finish().map_err(io::Error::other)?)
        }
        Compression::Zstd => Data::ZstdData(zstd::stream::encode_all(payload, 0)?),
    };

    Ok(Blob {
        raw_size: Some(payload.len() as i32),
        data: Some(data),
    })
}

/// Decompresses a blob's payload into `scratch` and returns the raw bytes.
///
/// Raw payloads are returned without copying. For compressed payloads the
/// decompressed length must equal the blob's `raw_size`.
pub fn unpack<'a>(blob: &'a Blob, scratch: &'a mut BytesMut) -> Result<&'a [u8]> {
    let expected = blob.raw_size.unwrap_or(0).max(0) as usize;

    match &blob.data {
        None => Err(Error::UnknownCompression),
        Some(Data::Raw(raw)) => Ok(&raw[..]),
        Some(Data::ZlibData(data)) => {
            let mut decoder = flate2::read::ZlibDecoder::new(&data[..]);
            decompress_into(scratch, &mut decoder, expected)?;
            Ok(&scratch[..])
        }
        Some(Data::LzmaData(data)) => {
            let mut decoder = xz2::read::XzDecoder::new(&data[..]);
            decompress_into(scratch, &mut decoder, expected)?;
            Ok(&scratch[..])
        }
        Some(Data::Lz4Data(data)) => {
            let mut decoder = lz4_flex::frame::FrameDecoder::new(&data[..]);
            decompress_into(scratch, &mut decoder, expected)?;
            Ok(&scratch[..])
        }
        Some(Data::ZstdData(data)) => {
            let mut decoder = zstd::stream::read::Decoder::new(&data[..])?;
            decompress_into(scratch, &mut decoder, expected)?;
            Ok(&scratch[..])
        }
    }
}

/// Streams a decompressor into `scratch`, verifying the final length.
fn decompress_into(
    scratch: &mut BytesMut,
    decoder: &mut impl Read,
    expected: usize,
) -> Result<()> {
    scratch.clear();
    scratch.reserve(expected);

    let mut writer = scratch.writer();
    let actual = io::copy(decoder, &mut writer)? as usize;

    if actual != expected {
        return Err(Error::SizeMismatch { expected, actual });
    }

    Ok(())
}
