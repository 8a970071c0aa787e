//! Blocking chunked straw: reads park the calling thread until enough bytes
//! exist.

use std::sync::{Arc, Condvar, Mutex, MutexGuard, PoisonError};

use log::trace;

use crate::buffers::{Bytes, Chunk, ChunkedBuffer, StrawError};

/// A thread-safe, chunk-preserving straw whose reads wait for data.
///
/// This is the one variant with blocking-consumer semantics: an operation
/// that needs `size` bytes parks the calling thread on a condition variable
/// guarding "buffered bytes >= requested", re-checked after every wake, and
/// every write notifies the waiters. Writers never block. Exact-size
/// operations therefore never fail with
/// [`StrawError::InsufficientData`](crate::StrawError::InsufficientData) -
/// they return plain values once the data exists.
///
/// Max-size reads and whole-buffer drains stay best-effort: they return
/// whatever is buffered at the time of the call without waiting.
///
/// There is no cancellation and no timeout parameter; a caller that must
/// bound the wait has to do so externally (e.g. by reading from a dedicated
/// thread it can abandon).
///
/// `BlockingStraw` is cheaply cloneable; clones share the same buffer.
///
/// # Examples
///
/// ```
/// use std::{thread, time::Duration};
///
/// use straw::BlockingStraw;
///
/// let straw = BlockingStraw::new();
///
/// let producer = straw.clone();
/// thread::spawn(move || {
///     thread::sleep(Duration::from_millis(10));
///     producer.write(*b"te");
///     producer.write(*b"st");
/// });
///
/// // Blocks until both writes above have landed
/// let bytes = straw.read_exact(4);
/// assert_eq!(bytes.to_vec(), b"test");
/// ```
#[derive(Clone, Default)]
pub struct BlockingStraw {
    inner: Arc<Inner>,
}

#[derive(Default)]
struct Inner {
    buffer: Mutex<ChunkedBuffer>,
    available: Condvar,
}

impl BlockingStraw {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Locks the buffer, absorbing poison: a panicked writer must not wedge
    /// every other accessor.
    fn lock(&self) -> MutexGuard<'_, ChunkedBuffer> {
        self.inner.buffer.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Parks the calling thread until at least `needed` bytes are buffered,
    /// returning the guard that proved it.
    fn wait_for(&self, needed: usize) -> MutexGuard<'_, ChunkedBuffer> {
        trace!("waiting for {needed} bytes");
        self.inner
            .available
            .wait_while(self.lock(), |buffer| buffer.len() < needed)
            .unwrap_or_else(PoisonError::into_inner)
    }

    /// Appends a chunk to the tail of the straw and wakes waiting readers.
    pub fn write(&self, chunk: impl Into<Chunk>) {
        let mut buffer = self.lock();
        buffer.write(chunk.into());
        drop(buffer);
        // Waiters need different byte counts, so every one re-checks
        self.inner.available.notify_all();
    }

    /// Appends each chunk in order, under a single lock acquisition, then
    /// wakes waiting readers.
    pub fn write_all<I>(&self, chunks: I)
    where
        I: IntoIterator,
        I::Item: Into<Chunk>,
    {
        let mut buffer = self.lock();
        buffer.write_all(chunks.into_iter().map(Into::into));
        drop(buffer);
        self.inner.available.notify_all();
    }

    /// Removes and returns the single oldest chunk verbatim, waiting until
    /// at least one chunk exists.
    pub fn read(&self) -> Chunk {
        let mut buffer = self.wait_for(1);
        buffer.read()
    }

    /// Removes and returns exactly `size` bytes, waiting until they exist.
    ///
    /// The wait completes once writers have supplied at least `size` bytes
    /// in total, possibly across multiple writes.
    pub fn read_exact(&self, size: usize) -> Bytes {
        if size == 0 {
            return Bytes::new();
        }
        let mut buffer = self.wait_for(size);
        // Cannot fail: the wait released only once len() >= size
        buffer.read_exact(size).unwrap_or_default()
    }

    /// Removes and returns up to `max` bytes without waiting.
    pub fn read_up_to(&self, max: usize) -> Bytes {
        self.lock().read_up_to(max)
    }

    /// Returns exactly `size` bytes without consuming them, waiting until
    /// they exist.
    pub fn peek_exact(&self, size: usize) -> Bytes {
        if size == 0 {
            return Bytes::new();
        }
        let buffer = self.wait_for(size);
        buffer.peek_exact(size).unwrap_or_default()
    }

    /// Returns `size` bytes starting `offset` bytes in without consuming
    /// anything, waiting until `offset + size` bytes exist.
    pub fn peek_at(&self, offset: usize, size: usize) -> Bytes {
        if size == 0 {
            return Bytes::new();
        }
        let buffer = self.wait_for(offset.saturating_add(size));
        buffer.peek_at(offset, size).unwrap_or_default()
    }

    /// Returns up to `max` bytes without consuming them and without waiting.
    pub fn peek_up_to(&self, max: usize) -> Bytes {
        self.lock().peek_up_to(max)
    }

    /// Drains every currently buffered chunk without waiting, preserving
    /// original order and boundaries.
    pub fn read_all_chunks(&self) -> Vec<Chunk> {
        self.lock().read_all_chunks()
    }

    /// Drains whatever is currently buffered without waiting.
    pub fn read_all(&self) -> Bytes {
        self.lock().read_all()
    }

    /// Returns whatever is currently buffered without consuming it.
    pub fn peek_all(&self) -> Bytes {
        self.lock().peek_all()
    }

    /// Discards exactly `size` bytes from the front, waiting until they
    /// exist.
    pub fn clear(&self, size: usize) {
        let _ = self.read_exact(size);
    }

    /// Number of buffered bytes.
    pub fn len(&self) -> usize {
        self.lock().len()
    }

    /// Returns `true` if nothing is buffered.
    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }
}
