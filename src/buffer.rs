//! Pooled scratch buffers shared by the decode and encode pipelines.
//!
//! Decompressing a blob needs a buffer roughly the size of the uncompressed
//! block. Those allocations dominate a naive decoder, so buffers are handed
//! out from a process-wide free list and returned on drop. A buffer is
//! owned by exactly one stage while in use and never retains references to
//! decoded data.

use std::ops::{Deref, DerefMut};
use std::sync::OnceLock;

use bytes::BytesMut;
use parking_lot::Mutex;

/// Capacity of a freshly allocated pool buffer.
const INITIAL_CAPACITY: usize = 1024;

/// Maximum number of idle buffers retained by the pool.
const MAX_POOLED: usize = 64;

static POOL: OnceLock<Mutex<Vec<BytesMut>>> = OnceLock::new();

fn pool() -> &'static Mutex<Vec<BytesMut>> {
    POOL.get_or_init(|| Mutex::new(Vec::new()))
}

/// A scratch buffer borrowed from the process-wide pool.
///
/// Dereferences to [`BytesMut`]; cleared and returned to the pool on drop.
pub struct PooledBuffer {
    buf: BytesMut,
}

impl PooledBuffer {
    /// Borrows a cleared buffer from the pool, allocating one if the pool
    /// is empty.
    pub fn acquire() -> PooledBuffer {
        let buf = pool()
            .lock()
            .pop()
            .unwrap_or_else(|| BytesMut::with_capacity(INITIAL_CAPACITY));

        PooledBuffer { buf }
    }

    /// Borrows a buffer guaranteed to hold at least `capacity` bytes
    /// without reallocating.
    pub fn with_capacity(capacity: usize) -> PooledBuffer {
        let mut pooled = Self::acquire();
        pooled.reserve_total(capacity);
        pooled
    }

    /// Grows the buffer so its total capacity is at least `capacity`.
    pub fn reserve_total(&mut self, capacity: usize) {
        if capacity > self.buf.capacity() {
            self.buf.reserve(capacity - self.buf.len());
        }
    }
}

impl Deref for PooledBuffer {
    type Target = BytesMut;

    fn deref(&self) -> &BytesMut {
        &self.buf
    }
}

impl DerefMut for PooledBuffer {
    fn deref_mut(&mut self) -> &mut BytesMut {
        &mut self.buf
    }
}

impl Drop for PooledBuffer {
    fn drop(&mut self) {
        let mut buf = std::mem::take(&mut self.buf);
        buf.clear();

        let mut pool = pool().lock();
        if pool.len() < MAX_POOLED {
            pool.push(buf);
        }
    }
}
