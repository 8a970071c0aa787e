//! Unsynchronized straw for externally-serialized access.

use crate::buffers::{Bytes, Chunk, ChunkedBuffer, StrawError};

/// A chunk-preserving straw with no internal synchronization.
///
/// For callers that guarantee exclusive access themselves: every operation
/// takes `&mut self`, so the borrow checker enforces the single-accessor
/// discipline the other variants buy with locks or task isolation. No
/// operation blocks; exact-size reads on a short buffer fail with
/// [`StrawError::InsufficientData`].
///
/// # Examples
///
/// ```
/// use straw::LocalStraw;
///
/// let mut straw = LocalStraw::new();
/// straw.write(*b"te");
/// straw.write(*b"st");
///
/// // A read may end partway through a written chunk
/// assert_eq!(straw.read_exact(3)?.to_vec(), b"tes");
/// assert_eq!(straw.read(), *b"t");
/// # Ok::<(), straw::StrawError>(())
/// ```
#[derive(Debug, Default)]
pub struct LocalStraw {
    buffer: ChunkedBuffer,
}

impl LocalStraw {
    #[must_use]
    pub const fn new() -> Self {
        Self {
            buffer: ChunkedBuffer::new(),
        }
    }

    /// Appends a chunk to the tail of the straw.
    pub fn write(&mut self, chunk: impl Into<Chunk>) {
        self.buffer.write(chunk.into());
    }

    /// Appends each chunk in order.
    pub fn write_all<I>(&mut self, chunks: I)
    where
        I: IntoIterator,
        I::Item: Into<Chunk>,
    {
        self.buffer.write_all(chunks.into_iter().map(Into::into));
    }

    /// Removes and returns the single oldest chunk verbatim.
    ///
    /// Returns an empty chunk when the straw is empty.
    pub fn read(&mut self) -> Chunk {
        self.buffer.read()
    }

    /// Removes and returns exactly `size` bytes.
    pub fn read_exact(&mut self, size: usize) -> Result<Bytes, StrawError> {
        self.buffer.read_exact(size)
    }

    /// Removes and returns up to `max` bytes; never fails on scarcity.
    pub fn read_up_to(&mut self, max: usize) -> Bytes {
        self.buffer.read_up_to(max)
    }

    /// Returns exactly `size` bytes without consuming them.
    pub fn peek_exact(&self, size: usize) -> Result<Bytes, StrawError> {
        self.buffer.peek_exact(size)
    }

    /// Returns `size` bytes starting `offset` bytes in, without consuming
    /// anything.
    pub fn peek_at(&self, offset: usize, size: usize) -> Result<Bytes, StrawError> {
        self.buffer.peek_at(offset, size)
    }

    /// Returns up to `max` bytes without consuming them.
    pub fn peek_up_to(&self, max: usize) -> Bytes {
        self.buffer.peek_up_to(max)
    }

    /// Drains every chunk, preserving original order and boundaries.
    pub fn read_all_chunks(&mut self) -> Vec<Chunk> {
        self.buffer.read_all_chunks()
    }

    /// Drains the whole straw as one logical byte sequence.
    pub fn read_all(&mut self) -> Bytes {
        self.buffer.read_all()
    }

    /// Returns the whole straw as one logical byte sequence without
    /// consuming it.
    pub fn peek_all(&self) -> Bytes {
        self.buffer.peek_all()
    }

    /// Discards exactly `size` bytes from the front.
    pub fn clear(&mut self, size: usize) -> Result<(), StrawError> {
        self.buffer.clear(size)
    }

    /// Number of buffered bytes.
    pub fn len(&self) -> usize {
        self.buffer.len()
    }

    /// Returns `true` if nothing is buffered.
    pub fn is_empty(&self) -> bool {
        self.buffer.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn exclusive_access_semantics() {
        let mut straw = LocalStraw::new();
        assert!(straw.is_empty());
        assert!(straw.read().is_empty());

        straw.write_all([*b"te", *b"st"]);
        assert_eq!(straw.len(), 4);

        // Peek/read coherence without any wrapper in the way
        let peeked = straw.peek_exact(3).unwrap();
        assert_eq!(peeked, straw.read_exact(3).unwrap());
        assert_eq!(straw.read(), *b"t");

        straw.write(*b"test");
        assert_eq!(
            straw.read_exact(5).unwrap_err(),
            StrawError::InsufficientData {
                requested: 5,
                available: 4
            }
        );
        assert_eq!(straw.read_up_to(16).to_vec(), b"test");
    }
}
