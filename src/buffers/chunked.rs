use std::collections::VecDeque;

use log::trace;

use super::{Bytes, Chunk, StrawError};

/// The chunk-preserving buffer core.
///
/// An ordered sequence of [`Chunk`]s plus the chunk-splitting algorithm for
/// reading and peeking at arbitrary sizes. Concatenating the chunks in order
/// yields exactly the bytes written, in write order, minus the bytes already
/// consumed. The total byte count is recomputed on demand rather than cached,
/// so there is no second counter to keep in sync with the chunk sequence.
///
/// This type carries no concurrency concerns; the wrappers in `api` compose
/// it with a concurrency discipline.
#[derive(Debug, Default)]
pub(crate) struct ChunkedBuffer {
    chunks: VecDeque<Chunk>,
}

impl ChunkedBuffer {
    pub(crate) const fn new() -> Self {
        Self { chunks: VecDeque::new() }
    }

    /// Total number of buffered bytes across all chunks.
    pub(crate) fn len(&self) -> usize {
        self.chunks.iter().fold(0, |len, chunk| len + chunk.len())
    }

    pub(crate) fn is_empty(&self) -> bool {
        self.chunks.is_empty()
    }

    /// Appends a chunk to the tail of the chunk sequence.
    ///
    /// Empty chunks carry no bytes and are discarded.
    pub(crate) fn write(&mut self, chunk: Chunk) {
        if !chunk.is_empty() {
            trace!("write: {} bytes ({} chunks buffered)", chunk.len(), self.chunks.len() + 1);
            self.chunks.push_back(chunk);
        }
    }

    /// Appends each chunk in order.
    pub(crate) fn write_all(&mut self, chunks: impl IntoIterator<Item = Chunk>) {
        for chunk in chunks {
            self.write(chunk);
        }
    }

    /// Removes and returns the single oldest chunk verbatim.
    ///
    /// Returns an empty chunk on an empty buffer; never fails.
    pub(crate) fn read(&mut self) -> Chunk {
        self.chunks.pop_front().unwrap_or_else(Chunk::empty)
    }

    /// Removes and returns exactly `size` bytes from the front.
    ///
    /// A chunk that straddles the boundary is split: the front view joins the
    /// result, the back view is reinserted at the head of the sequence. Fails
    /// with [`StrawError::InsufficientData`] before removing anything if
    /// fewer than `size` bytes are buffered.
    pub(crate) fn read_exact(&mut self, size: usize) -> Result<Bytes, StrawError> {
        if size == 0 {
            return Ok(Bytes::new());
        }

        let available = self.len();
        if available < size {
            return Err(StrawError::InsufficientData {
                requested: size,
                available,
            });
        }

        trace!("read_exact: {size} of {available} bytes");

        let mut result = Bytes::new();
        let mut remaining = size;
        while remaining > 0 {
            let Some(chunk) = self.chunks.pop_front() else { break };
            if chunk.len() <= remaining {
                remaining -= chunk.len();
                result.push(chunk);
            } else {
                let (front, back) = chunk.split_at(remaining);
                remaining = 0;
                result.push(front);
                self.chunks.push_front(back);
            }
        }

        Ok(result)
    }

    /// Removes and returns up to `max` bytes from the front.
    ///
    /// Best-effort: returns `min(max, len())` bytes, possibly zero on an
    /// empty buffer; never fails.
    pub(crate) fn read_up_to(&mut self, max: usize) -> Bytes {
        trace!("read_up_to: at most {max} bytes");

        let mut result = Bytes::new();
        let mut remaining = max;
        while remaining > 0 {
            let Some(chunk) = self.chunks.pop_front() else { break };
            if chunk.len() <= remaining {
                remaining -= chunk.len();
                result.push(chunk);
            } else {
                let (front, back) = chunk.split_at(remaining);
                remaining = 0;
                result.push(front);
                self.chunks.push_front(back);
            }
        }

        result
    }

    /// Returns exactly `size` bytes from the front without consuming them.
    ///
    /// Same traversal as [`read_exact`](Self::read_exact) but scanning by
    /// index; the chunk sequence is left untouched. A peek followed by a read
    /// of the same size returns identical bytes.
    pub(crate) fn peek_exact(&self, size: usize) -> Result<Bytes, StrawError> {
        if size == 0 {
            return Ok(Bytes::new());
        }

        let available = self.len();
        if available < size {
            return Err(StrawError::InsufficientData {
                requested: size,
                available,
            });
        }

        Ok(self.peek_up_to(size))
    }

    /// Returns `size` bytes starting `offset` bytes into the buffer, without
    /// consuming anything.
    ///
    /// Equivalent to peeking `offset + size` bytes and discarding the first
    /// `offset` of them; insufficient-data accounting is based on
    /// `offset + size`.
    pub(crate) fn peek_at(&self, offset: usize, size: usize) -> Result<Bytes, StrawError> {
        if size == 0 {
            return Ok(Bytes::new());
        }

        let available = self.len();
        let requested = offset.saturating_add(size);
        if available < requested {
            return Err(StrawError::InsufficientData { requested, available });
        }

        let mut result = Bytes::new();
        let mut skip = offset;
        let mut remaining = size;
        for chunk in &self.chunks {
            if remaining == 0 {
                break;
            }
            if skip >= chunk.len() {
                skip -= chunk.len();
                continue;
            }
            let take = (chunk.len() - skip).min(remaining);
            if let Some(view) = chunk.view(skip..skip + take) {
                result.push(view);
            }
            skip = 0;
            remaining -= take;
        }

        Ok(result)
    }

    /// Returns up to `max` bytes from the front without consuming them.
    pub(crate) fn peek_up_to(&self, max: usize) -> Bytes {
        let mut result = Bytes::new();
        let mut remaining = max;
        for chunk in &self.chunks {
            if remaining == 0 {
                break;
            }
            if chunk.len() <= remaining {
                remaining -= chunk.len();
                result.push(chunk.clone());
            } else {
                let (front, _) = chunk.split_at(remaining);
                remaining = 0;
                result.push(front);
            }
        }

        result
    }

    /// Drains every chunk, preserving original order and boundaries.
    ///
    /// Returns an empty vec on an empty buffer.
    pub(crate) fn read_all_chunks(&mut self) -> Vec<Chunk> {
        self.chunks.drain(..).collect()
    }

    /// Drains the whole buffer as one logical byte sequence.
    pub(crate) fn read_all(&mut self) -> Bytes {
        self.chunks.drain(..).collect()
    }

    /// Returns the whole buffer as one logical byte sequence without
    /// consuming it.
    pub(crate) fn peek_all(&self) -> Bytes {
        self.chunks.iter().cloned().collect()
    }

    /// Discards exactly `size` bytes from the front.
    ///
    /// Same insufficient-data failure as [`read_exact`](Self::read_exact);
    /// on failure nothing is discarded.
    pub(crate) fn clear(&mut self, size: usize) -> Result<(), StrawError> {
        let _ = self.read_exact(size)?;
        Ok(())
    }
}
