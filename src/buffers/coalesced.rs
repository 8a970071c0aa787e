use log::trace;

use super::StrawError;

/// The coalesced buffer core.
///
/// A single contiguous byte sequence for implementations that don't need to
/// preserve chunk identity: every write is appended in place, so chunk
/// boundaries vanish at write time and reads are plain subslices. Operation
/// semantics and edge-case policy are byte-for-byte identical to the
/// chunk-preserving core.
#[derive(Debug, Default)]
pub(crate) struct CoalescedBuffer {
    buf: Vec<u8>,
}

impl CoalescedBuffer {
    pub(crate) const fn new() -> Self {
        Self { buf: Vec::new() }
    }

    pub(crate) fn len(&self) -> usize {
        self.buf.len()
    }

    pub(crate) fn is_empty(&self) -> bool {
        self.buf.is_empty()
    }

    /// Appends bytes to the tail of the buffer.
    pub(crate) fn write(&mut self, bytes: &[u8]) {
        if !bytes.is_empty() {
            trace!("write: {} bytes ({} buffered)", bytes.len(), self.buf.len() + bytes.len());
            self.buf.extend_from_slice(bytes);
        }
    }

    /// Removes and returns the whole buffer.
    ///
    /// With boundaries gone at write time, the entire buffer is the oldest
    /// (and only) chunk. Returns an empty vec on an empty buffer.
    pub(crate) fn read(&mut self) -> Vec<u8> {
        std::mem::take(&mut self.buf)
    }

    /// Removes and returns exactly `size` bytes from the front.
    pub(crate) fn read_exact(&mut self, size: usize) -> Result<Vec<u8>, StrawError> {
        if size == 0 {
            return Ok(Vec::new());
        }

        let available = self.buf.len();
        if available < size {
            return Err(StrawError::InsufficientData {
                requested: size,
                available,
            });
        }

        trace!("read_exact: {size} of {available} bytes");

        let back = self.buf.split_off(size);
        Ok(std::mem::replace(&mut self.buf, back))
    }

    /// Removes and returns up to `max` bytes from the front.
    pub(crate) fn read_up_to(&mut self, max: usize) -> Vec<u8> {
        let size = max.min(self.buf.len());
        // Cannot fail: size is capped by the available bytes
        self.read_exact(size).unwrap_or_default()
    }

    /// Returns exactly `size` bytes from the front without consuming them.
    ///
    /// The subslice upper bound is exclusive: a peek returns precisely `size`
    /// bytes, matching the exact-size read byte for byte.
    pub(crate) fn peek_exact(&self, size: usize) -> Result<Vec<u8>, StrawError> {
        if size == 0 {
            return Ok(Vec::new());
        }

        let available = self.buf.len();
        if available < size {
            return Err(StrawError::InsufficientData {
                requested: size,
                available,
            });
        }

        Ok(self.buf[..size].to_vec())
    }

    /// Returns `size` bytes starting `offset` bytes in, without consuming
    /// anything.
    pub(crate) fn peek_at(&self, offset: usize, size: usize) -> Result<Vec<u8>, StrawError> {
        if size == 0 {
            return Ok(Vec::new());
        }

        let available = self.buf.len();
        let requested = offset.saturating_add(size);
        if available < requested {
            return Err(StrawError::InsufficientData { requested, available });
        }

        Ok(self.buf[offset..offset + size].to_vec())
    }

    /// Returns up to `max` bytes from the front without consuming them.
    pub(crate) fn peek_up_to(&self, max: usize) -> Vec<u8> {
        self.buf[..max.min(self.buf.len())].to_vec()
    }

    /// Drains the whole buffer.
    pub(crate) fn read_all(&mut self) -> Vec<u8> {
        std::mem::take(&mut self.buf)
    }

    /// Returns the whole buffer without consuming it.
    pub(crate) fn peek_all(&self) -> Vec<u8> {
        self.buf.clone()
    }

    /// Discards exactly `size` bytes from the front.
    pub(crate) fn clear(&mut self, size: usize) -> Result<(), StrawError> {
        let _ = self.read_exact(size)?;
        Ok(())
    }
}
