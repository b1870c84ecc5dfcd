//! The two-pass encode pipeline.
//!
//! Entities stream into per-type lanes, each lane batching up to
//! [`ENTITY_LIMIT`] entities per block. Blocks are compressed and appended
//! to a scratch file as they fill, while the bounding box of every node
//! batch widens the future header's box. The header depends on the whole
//! body, so the final file is assembled last: header frame first, then the
//! scratch contents.

use std::fs::File;
use std::io::{self, Seek, SeekFrom, Write};
use std::path::PathBuf;
use std::sync::mpsc::{sync_channel, Receiver, SyncSender};
use std::thread::{self, JoinHandle};

use tempfile::TempDir;

use crate::blob::{pack, BlobWriter, BLOB_TYPE_DATA, BLOB_TYPE_HEADER};
use crate::block::{build_header_block, encode_block, ENTITY_LIMIT};
use crate::config::{Compression, EncoderOptions};
use crate::error::{Error, Result};
use crate::model::{BoundingBox, Entity, Header};

use prost::Message;

/// File name of the entity scratch store inside the temp directory.
const SCRATCH_FILE_NAME: &str = "entities.pbf";

/// What the pipeline thread hands back on completion: the merged bounding
/// box of every node written, and the first error if any stage failed.
struct PipelineOutcome {
    bbox: BoundingBox,
    result: Result<()>,
}

/// Encodes an unordered stream of entities into a valid PBF file.
///
/// Entities may arrive in any type mixture; the encoder partitions them by
/// concrete type into size-bounded blocks. The header is written on
/// [`close`](Encoder::close), once the body and its bounding box are known.
pub struct Encoder<W: Write> {
    writer: Option<W>,
    sender: Option<SyncSender<Vec<Entity>>>,
    pipeline: Option<JoinHandle<PipelineOutcome>>,
    options: EncoderOptions,
    scratch_path: PathBuf,
    // Held for its Drop: removing the directory removes the scratch file.
    _temp_dir: TempDir,
}

impl<W: Write> Encoder<W> {
    /// Creates an encoder writing the final file to `writer`.
    ///
    /// The scratch store is created eagerly; a directory that cannot be
    /// created or written fails construction with
    /// [`Error::TempStoreUnavailable`].
    pub fn new(writer: W, options: EncoderOptions) -> Result<Encoder<W>> {
        let temp_dir = match &options.store_path {
            Some(path) => TempDir::new_in(path),
            None => TempDir::new(),
        }
        .map_err(Error::TempStoreUnavailable)?;

        let scratch_path = temp_dir.path().join(SCRATCH_FILE_NAME);
        let scratch = File::create(&scratch_path).map_err(Error::TempStoreUnavailable)?;

        let (sender, receiver) = sync_channel::<Vec<Entity>>(0);
        let compression = options.compression;
        let pipeline = thread::spawn(move || run_pipeline(receiver, scratch, compression));

        Ok(Encoder {
            writer: Some(writer),
            sender: Some(sender),
            pipeline: Some(pipeline),
            options,
            scratch_path,
            _temp_dir: temp_dir,
        })
    }

    /// Queues one entity for encoding.
    pub fn encode(&mut self, entity: Entity) -> Result<()> {
        self.encode_batch(vec![entity])
    }

    /// Queues a batch of entities for encoding.
    ///
    /// Fails with [`Error::PipelineCancelled`] once the pipeline has shut
    /// down after an earlier error; that first error is what
    /// [`close`](Encoder::close) reports.
    pub fn encode_batch(&mut self, entities: Vec<Entity>) -> Result<()> {
        match &self.sender {
            Some(sender) => sender
                .send(entities)
                .map_err(|_| Error::PipelineCancelled),
            None => Err(Error::PipelineCancelled),
        }
    }

    /// Finishes the file: flushes partial blocks, writes the header frame,
    /// and copies the scratch body after it. Blocks until complete.
    ///
    /// Returns the first error any stage encountered, if one did.
    pub fn close(mut self) -> Result<()> {
        self.do_close()
    }

    fn do_close(&mut self) -> Result<()> {
        drop(self.sender.take());

        let pipeline = match self.pipeline.take() {
            Some(pipeline) => pipeline,
            None => return Ok(()),
        };
        let outcome = pipeline.join().map_err(|_| Error::PipelineCancelled)?;
        outcome.result?;

        let mut writer = match self.writer.take() {
            Some(writer) => writer,
            None => return Ok(()),
        };

        let header = Header {
            bounding_box: Some(outcome.bbox),
            required_features: self.options.required_features.clone(),
            optional_features: self.options.optional_features.clone(),
            writing_program: self.options.writing_program.clone(),
            source: self.options.source.clone(),
            osmosis_replication_timestamp: self.options.osmosis_replication_timestamp,
            osmosis_replication_sequence_number: self
                .options
                .osmosis_replication_sequence_number,
            osmosis_replication_base_url: self.options.osmosis_replication_base_url.clone(),
        };

        let header_payload = build_header_block(&header).encode_to_vec();
        let header_blob = pack(&header_payload, self.options.compression)?;

        let mut frame_writer = BlobWriter::new(&mut writer);
        frame_writer.write_frame(BLOB_TYPE_HEADER, &header_blob)?;

        let mut scratch = File::open(&self.scratch_path)?;
        scratch.seek(SeekFrom::Start(0))?;
        io::copy(&mut scratch, &mut writer)?;
        writer.flush()?;

        Ok(())
    }
}

impl<W: Write> Drop for Encoder<W> {
    fn drop(&mut self) {
        if self.pipeline.is_some() {
            if let Err(err) = self.do_close() {
                log::warn!("error closing encoder: {}", err);
            }
        }
    }
}

/// The single background stage: partitions entities into per-type lanes,
/// flushes full blocks to the scratch file, and latches the first error.
fn run_pipeline(
    receiver: Receiver<Vec<Entity>>,
    scratch: File,
    compression: Compression,
) -> PipelineOutcome {
    let mut writer = BlobWriter::new(scratch);
    let mut bbox = BoundingBox::initial();

    let mut nodes: Vec<Entity> = Vec::with_capacity(ENTITY_LIMIT);
    let mut ways: Vec<Entity> = Vec::with_capacity(ENTITY_LIMIT);
    let mut relations: Vec<Entity> = Vec::with_capacity(ENTITY_LIMIT);

    let mut result = Ok(());

    'receive: while let Ok(entities) = receiver.recv() {
        for entity in entities {
            let lane = match &entity {
                Entity::Node(_) => &mut nodes,
                Entity::Way(_) => &mut ways,
                Entity::Relation(_) => &mut relations,
            };
            lane.push(entity);

            if lane.len() >= ENTITY_LIMIT {
                let batch = std::mem::take(lane);
                if let Err(err) = write_block(&mut writer, &batch, compression, &mut bbox) {
                    log::warn!("unable to write block: {}", err);
                    result = Err(err);
                    break 'receive;
                }
            }
        }
    }

    if result.is_ok() {
        for lane in [&mut nodes, &mut ways, &mut relations] {
            if lane.is_empty() {
                continue;
            }
            let batch = std::mem::take(lane);
            if let Err(err) = write_block(&mut writer, &batch, compression, &mut bbox) {
                log::warn!("unable to write block: {}", err);
                result = Err(err);
                break;
            }
        }
    }

    if result.is_ok() {
        result = writer.flush();
    }

    PipelineOutcome { bbox, result }
}

/// Encodes, compresses, and appends one block, widening the global
/// bounding box when the block carries nodes.
fn write_block(
    writer: &mut BlobWriter<File>,
    entities: &[Entity],
    compression: Compression,
    bbox: &mut BoundingBox,
) -> Result<()> {
    let encoded = encode_block(entities)?;
    if let Some(block_bbox) = &encoded.bbox {
        bbox.expand_with_bounding_box(block_bbox);
    }

    let blob = pack(&encoded.payload, compression)?;
    writer.write_frame(BLOB_TYPE_DATA, &blob)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Degrees, Info, Node, Tags};

    #[test]
    fn test_invalid_store_path() {
        let missing = std::env::temp_dir().join("pbfio-missing").join("store");

        let result = Encoder::new(Vec::new(), EncoderOptions::default().store_path(missing));
        assert!(matches!(result, Err(Error::TempStoreUnavailable(_))));
    }

    #[test]
    fn test_close_without_entities_writes_header_only() {
        let mut out = Vec::new();
        let encoder = Encoder::new(&mut out, EncoderOptions::default()).unwrap();
        encoder.close().unwrap();

        assert!(!out.is_empty());

        let mut decoder = crate::Decoder::new(
            std::io::Cursor::new(out),
            crate::DecoderOptions::default().n_cpu(1),
        )
        .unwrap();
        assert!(matches!(decoder.decode(), Err(Error::Eof)));
    }

    #[test]
    fn test_encode_after_close_of_pipeline() {
        let mut out = Vec::new();
        let mut encoder = Encoder::new(&mut out, EncoderOptions::default()).unwrap();

        encoder
            .encode(Entity::Node(Node {
                id: 1,
                tags: Tags::new(),
                info: Info::default(),
                lat: Degrees(0.0),
                lon: Degrees(0.0),
            }))
            .unwrap();

        encoder.close().unwrap();
    }
}
