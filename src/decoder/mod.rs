//! The concurrent decode pipeline.
//!
//! A reader thread pulls frames off the stream, a batcher groups them, and
//! the batches fan out round-robin over a fixed set of decode workers. The
//! merger drains worker outputs in the same round-robin order, so the
//! consumer sees batches exactly as their source blobs appeared in the
//! file. Every stage is connected by a bounded channel; dropping the
//! consumer end tears the whole pipeline down through send failures.

use std::io::Read;
use std::sync::mpsc::{sync_channel, Receiver, RecvTimeoutError, SyncSender};
use std::thread;
use std::time::{Duration, Instant};

use crate::blob::{unpack, BlobReader, Frame, BLOB_TYPE_DATA, BLOB_TYPE_HEADER};
use crate::block::{parse_header_block, parse_primitive_block};
use crate::buffer::PooledBuffer;
use crate::config::DecoderOptions;
use crate::error::{Error, Result};
use crate::model::{Entity, Header};

/// How long the batcher waits for a batch to fill before dispatching it
/// partially filled.
const BATCH_TIMEOUT: Duration = Duration::from_millis(100);

/// Bound on the frame channel between the reader and the batcher.
const FRAME_CHANNEL_BOUND: usize = 16;

/// Bound on each worker's input and output channels, in batches.
const WORKER_CHANNEL_BOUND: usize = 4;

/// Bound on the merged output channel, in batches.
const OUTPUT_CHANNEL_BOUND: usize = 8;

/// One decoded batch: the entities of a single blob, in block order.
pub type Batch = Vec<Entity>;

/// Reads and decodes OpenStreetMap PBF data from an input stream.
///
/// Construction synchronously reads the file header; entity blocks are
/// then decompressed and parsed by background workers while the consumer
/// iterates. Batches arrive in file order.
pub struct Decoder {
    header: Header,
    output: Option<Receiver<Result<Batch>>>,
}

impl Decoder {
    /// Opens a PBF stream and reads its header.
    ///
    /// Fails with [`Error::MissingHeader`] if the first frame is not an
    /// "OSMHeader" blob.
    pub fn new<R: Read + Send + 'static>(reader: R, options: DecoderOptions) -> Result<Decoder> {
        options.validate()?;

        let mut blob_reader = BlobReader::new(reader);

        let first = blob_reader.read_frame()?;
        if first.blob_type != BLOB_TYPE_HEADER {
            return Err(Error::MissingHeader(first.blob_type));
        }

        let mut scratch = PooledBuffer::with_capacity(options.proto_buffer_size);
        let header = parse_header_block(unpack(&first.blob, &mut scratch)?)?;
        drop(scratch);

        let output = start_pipeline(blob_reader, &options);

        Ok(Decoder { header, output: Some(output) })
    }

    /// The file header, available before any entity batch.
    pub fn header(&self) -> &Header {
        &self.header
    }

    /// Returns the next batch of entities, in file order.
    ///
    /// The end of the stream is reported with [`Error::Eof`]; calling
    /// after [`close`](Decoder::close) reports [`Error::PipelineCancelled`].
    pub fn decode(&mut self) -> Result<Batch> {
        match &self.output {
            Some(output) => match output.recv() {
                Ok(result) => result,
                Err(_) => Err(Error::Eof),
            },
            None => Err(Error::PipelineCancelled),
        }
    }

    /// Shuts the pipeline down and discards in-flight work.
    ///
    /// Idempotent and non-blocking: pending batches are drained here and
    /// every background stage unwinds on its next channel operation.
    pub fn close(&mut self) {
        if let Some(output) = self.output.take() {
            while output.try_recv().is_ok() {}
        }
    }
}

impl Iterator for Decoder {
    type Item = Result<Batch>;

    /// Yields batches until the stream ends or the decoder is closed.
    fn next(&mut self) -> Option<Result<Batch>> {
        match self.decode() {
            Err(Error::Eof) | Err(Error::PipelineCancelled) => None,
            result => Some(result),
        }
    }
}

impl Drop for Decoder {
    fn drop(&mut self) {
        self.close();
    }
}

/// Spawns the reader, batcher, workers, and merger. Returns the merged
/// output channel.
fn start_pipeline<R: Read + Send + 'static>(
    blob_reader: BlobReader<R>,
    options: &DecoderOptions,
) -> Receiver<Result<Batch>> {
    let n_workers = options.n_cpu;
    let batch_size = options.proto_batch_size;
    let buffer_size = options.proto_buffer_size;

    let (frame_tx, frame_rx) = sync_channel::<Result<Frame>>(FRAME_CHANNEL_BOUND);
    let (output_tx, output_rx) = sync_channel::<Result<Batch>>(OUTPUT_CHANNEL_BOUND);

    let mut worker_txs = Vec::with_capacity(n_workers);
    let mut worker_rxs = Vec::with_capacity(n_workers);
    for _ in 0..n_workers {
        let (batch_tx, batch_rx) = sync_channel::<Vec<Result<Frame>>>(WORKER_CHANNEL_BOUND);
        let (result_tx, result_rx) = sync_channel::<Vec<Result<Batch>>>(WORKER_CHANNEL_BOUND);

        thread::spawn(move || run_worker(batch_rx, result_tx, buffer_size));

        worker_txs.push(batch_tx);
        worker_rxs.push(result_rx);
    }

    thread::spawn(move || run_reader(blob_reader, frame_tx));
    thread::spawn(move || run_batcher(frame_rx, worker_txs, batch_size));
    thread::spawn(move || run_merger(worker_rxs, output_tx));

    output_rx
}

/// Reads frames until EOF or error. Errors are forwarded down the channel
/// and terminate the reader.
fn run_reader<R: Read>(mut blob_reader: BlobReader<R>, frame_tx: SyncSender<Result<Frame>>) {
    loop {
        match blob_reader.read_frame() {
            Ok(frame) => {
                if frame_tx.send(Ok(frame)).is_err() {
                    return;
                }
            }
            Err(Error::Eof) => return,
            Err(err) => {
                log::warn!("unable to read blob: {}", err);
                let _ = frame_tx.send(Err(err));
                return;
            }
        }
    }
}

/// Groups frames into batches of `batch_size`, dispatching a partial batch
/// when the debounce timeout elapses or the stream ends. Batches go to
/// workers round-robin; the merger relies on that ordering.
fn run_batcher(
    frame_rx: Receiver<Result<Frame>>,
    worker_txs: Vec<SyncSender<Vec<Result<Frame>>>>,
    batch_size: usize,
) {
    let mut next_worker = 0usize;

    loop {
        let first = match frame_rx.recv() {
            Ok(frame) => frame,
            Err(_) => return,
        };

        let mut batch = Vec::with_capacity(batch_size);
        batch.push(first);

        let deadline = Instant::now() + BATCH_TIMEOUT;
        let mut disconnected = false;
        while batch.len() < batch_size {
            let now = Instant::now();
            if now >= deadline {
                break;
            }

            match frame_rx.recv_timeout(deadline - now) {
                Ok(frame) => batch.push(frame),
                Err(RecvTimeoutError::Timeout) => break,
                Err(RecvTimeoutError::Disconnected) => {
                    disconnected = true;
                    break;
                }
            }
        }

        if worker_txs[next_worker].send(batch).is_err() {
            return;
        }
        next_worker = (next_worker + 1) % worker_txs.len();

        if disconnected {
            return;
        }
    }
}

/// Decompresses and parses every blob of a batch, forwarding one result
/// per blob as a single message. Stops after the first failing blob.
fn run_worker(
    batch_rx: Receiver<Vec<Result<Frame>>>,
    result_tx: SyncSender<Vec<Result<Batch>>>,
    buffer_size: usize,
) {
    let mut scratch = PooledBuffer::with_capacity(buffer_size);

    while let Ok(batch) = batch_rx.recv() {
        let mut results = Vec::with_capacity(batch.len());
        let mut failed = false;

        for frame in batch {
            let result = frame.and_then(|frame| decode_frame(&frame, &mut scratch));
            failed = result.is_err();
            if failed {
                if let Err(err) = &result {
                    log::warn!("unable to decode blob: {}", err);
                }
            }

            results.push(result);
            if failed {
                break;
            }
        }

        if result_tx.send(results).is_err() || failed {
            return;
        }
    }
}

/// Decompresses and parses one frame into its entity batch.
fn decode_frame(frame: &Frame, scratch: &mut PooledBuffer) -> Result<Batch> {
    match frame.blob_type.as_str() {
        BLOB_TYPE_DATA => {
            let raw = unpack(&frame.blob, scratch)?;
            parse_primitive_block(raw)
        }
        // A stray extra header mid-stream carries no entities.
        BLOB_TYPE_HEADER => Ok(Vec::new()),
        other => Err(Error::UnknownBlobType(other.to_string())),
    }
}

/// Round-robins over worker outputs in dispatch order, flattening each
/// batch's per-blob results. Stops at the first error or when a worker's
/// channel closes, since round-robin dispatch means every later worker is
/// done too.
fn run_merger(
    worker_rxs: Vec<Receiver<Vec<Result<Batch>>>>,
    output_tx: SyncSender<Result<Batch>>,
) {
    let mut next_worker = 0usize;

    loop {
        let results = match worker_rxs[next_worker].recv() {
            Ok(results) => results,
            Err(_) => return,
        };
        next_worker = (next_worker + 1) % worker_rxs.len();

        for result in results {
            let stop = result.is_err();
            if output_tx.send(result).is_err() || stop {
                return;
            }
        }
    }
}
