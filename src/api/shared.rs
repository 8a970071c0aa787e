//! Lock-based coalesced straw for multi-threaded callers.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use crate::buffers::{Bytes, Chunk, CoalescedBuffer, StrawError};

/// A thread-safe straw over a single coalesced buffer.
///
/// One mutex guards one contiguous byte sequence; chunk identity vanishes at
/// write time. Callers may block on the lock - every operation is a short
/// synchronous critical section - but never on data: exact-size reads on a
/// short buffer fail with [`StrawError::InsufficientData`] instead of
/// waiting.
///
/// `SharedStraw` is cheaply cloneable; clones share the same buffer. There
/// is no ordering guarantee between threads beyond mutual exclusion.
///
/// # Examples
///
/// ```
/// use straw::SharedStraw;
///
/// let straw = SharedStraw::new();
/// straw.write(b"te");
/// straw.write(b"st");
///
/// // Boundaries are gone: one read drains the coalesced bytes
/// assert_eq!(straw.read(), *b"test");
/// assert!(straw.is_empty());
/// ```
#[derive(Clone, Default)]
pub struct SharedStraw {
    inner: Arc<Mutex<CoalescedBuffer>>,
}

impl SharedStraw {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Locks the buffer, absorbing poison: a panicked writer must not wedge
    /// every other accessor.
    fn lock(&self) -> MutexGuard<'_, CoalescedBuffer> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Appends bytes to the tail of the straw.
    pub fn write(&self, bytes: impl AsRef<[u8]>) {
        self.lock().write(bytes.as_ref());
    }

    /// Appends each byte sequence in order, under a single lock acquisition.
    pub fn write_all<I>(&self, chunks: I)
    where
        I: IntoIterator,
        I::Item: AsRef<[u8]>,
    {
        let mut buffer = self.lock();
        for chunk in chunks {
            buffer.write(chunk.as_ref());
        }
    }

    /// Removes and returns everything buffered as one chunk.
    ///
    /// The coalesced representation has a single chunk boundary, so the
    /// oldest chunk is the whole buffer. Returns an empty chunk when nothing
    /// is buffered.
    pub fn read(&self) -> Chunk {
        self.lock().read().into()
    }

    /// Removes and returns exactly `size` bytes from the front.
    pub fn read_exact(&self, size: usize) -> Result<Bytes, StrawError> {
        self.lock().read_exact(size).map(Bytes::from)
    }

    /// Removes and returns up to `max` bytes; never fails on scarcity.
    pub fn read_up_to(&self, max: usize) -> Bytes {
        self.lock().read_up_to(max).into()
    }

    /// Returns exactly `size` bytes from the front without consuming them.
    pub fn peek_exact(&self, size: usize) -> Result<Bytes, StrawError> {
        self.lock().peek_exact(size).map(Bytes::from)
    }

    /// Returns `size` bytes starting `offset` bytes in, without consuming
    /// anything.
    pub fn peek_at(&self, offset: usize, size: usize) -> Result<Bytes, StrawError> {
        self.lock().peek_at(offset, size).map(Bytes::from)
    }

    /// Returns up to `max` bytes without consuming them.
    pub fn peek_up_to(&self, max: usize) -> Bytes {
        self.lock().peek_up_to(max).into()
    }

    /// Drains the straw; the coalesced buffer yields at most one chunk.
    pub fn read_all_chunks(&self) -> Vec<Chunk> {
        let bytes = self.lock().read_all();
        if bytes.is_empty() { Vec::new() } else { vec![bytes.into()] }
    }

    /// Drains the whole straw as one logical byte sequence.
    pub fn read_all(&self) -> Bytes {
        self.lock().read_all().into()
    }

    /// Returns the whole straw without consuming it.
    pub fn peek_all(&self) -> Bytes {
        self.lock().peek_all().into()
    }

    /// Discards exactly `size` bytes from the front.
    pub fn clear(&self, size: usize) -> Result<(), StrawError> {
        self.lock().clear(size)
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

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn coalesced_semantics() {
        let straw = SharedStraw::new();
        straw.write(b"te");
        straw.write(b"st");
        assert_eq!(straw.len(), 4);

        // 1. Exact reads split the contiguous front
        assert_eq!(straw.read_exact(3).unwrap().to_vec(), b"tes");
        assert_eq!(straw.read_all().to_vec(), b"t");

        // 2. Insufficient data is a typed failure, nothing consumed
        straw.write(b"test");
        assert_eq!(
            straw.read_exact(5).unwrap_err(),
            StrawError::InsufficientData {
                requested: 5,
                available: 4
            }
        );
        assert_eq!(straw.len(), 4);

        // 3. Peek/read coherence, exact length
        let peeked = straw.peek_exact(2).unwrap();
        assert_eq!(peeked.len(), 2);
        assert_eq!(peeked, straw.read_exact(2).unwrap());

        // 4. Drain yields at most one chunk
        let chunks = straw.read_all_chunks();
        assert_eq!(chunks.len(), 1);
        assert_eq!(chunks[0], *b"st");
        assert!(straw.read_all_chunks().is_empty());
    }

    #[test]
    fn shared_across_threads() {
        let straw = SharedStraw::new();

        // Writers on multiple threads; every written byte is read exactly once
        std::thread::scope(|scope| {
            for i in 0u8..4 {
                let straw = straw.clone();
                scope.spawn(move || {
                    straw.write_all([[i; 8]]);
                });
            }
        });

        assert_eq!(straw.len(), 32);
        let mut bytes = straw.read_all().to_vec();
        bytes.sort_unstable();
        let mut expected: Vec<u8> = (0u8..4).flat_map(|i| [i; 8]).collect();
        expected.sort_unstable();
        assert_eq!(bytes, expected);
    }
}
