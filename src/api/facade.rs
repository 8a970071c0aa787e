//! Blocking facade bridging thread-based callers into the cooperative straw.

use tokio::sync::{mpsc, oneshot};

use super::task::Op;
use crate::buffers::{Bytes, Chunk, StrawError};

/// Blocking facade over an [`AsyncStraw`](crate::AsyncStraw).
///
/// `Straw` exposes the same operation set as the cooperative handle it was
/// created from, as plain blocking functions for callers that live outside
/// the async runtime. Each call submits the operation to the owner task's
/// queue and parks the calling thread on a oneshot completion signal until
/// the operation has run to completion; a failure inside the operation is
/// re-raised to the caller, and the facade adds no buffering or reordering
/// of its own.
///
/// # Panics
///
/// Like every bridge built on tokio's blocking primitives, facade methods
/// panic when invoked from within the async runtime. Use the
/// [`AsyncStraw`](crate::AsyncStraw) handle there instead.
///
/// # Examples
///
/// ```
/// fn main() -> Result<(), straw::StrawError> {
///     let runtime = tokio::runtime::Runtime::new().unwrap();
///     let (straw, _task) = runtime.block_on(async { straw::straw() });
///
///     // A plain thread drives the straw without suspending
///     let blocking = straw.blocking();
///     blocking.write(*b"te")?;
///     blocking.write(*b"st")?;
///     assert_eq!(blocking.read_exact(3)?.to_vec(), b"tes");
///     Ok(())
/// }
/// ```
#[derive(Clone)]
pub struct Straw {
    ops: mpsc::Sender<Op>,
}

impl Straw {
    pub(super) fn new(ops: mpsc::Sender<Op>) -> Self {
        Self { ops }
    }

    /// Submits one operation and blocks until the owner task resolves it.
    fn submit<T>(&self, build: impl FnOnce(oneshot::Sender<T>) -> Op) -> Result<T, StrawError> {
        let (reply, response) = oneshot::channel();
        self.ops.blocking_send(build(reply)).map_err(|_| StrawError::Closed)?;
        response.blocking_recv().map_err(|_| StrawError::Closed)
    }

    /// Appends a chunk to the tail of the straw.
    pub fn write(&self, chunk: impl Into<Chunk>) -> Result<(), StrawError> {
        let chunk = chunk.into();
        self.submit(|reply| Op::Write(chunk, reply))
    }

    /// Appends each chunk in order, as a single serialized operation.
    pub fn write_all<I>(&self, chunks: I) -> Result<(), StrawError>
    where
        I: IntoIterator,
        I::Item: Into<Chunk>,
    {
        let chunks = chunks.into_iter().map(Into::into).collect();
        self.submit(|reply| Op::WriteAll(chunks, reply))
    }

    /// Removes and returns the single oldest chunk verbatim.
    pub fn read(&self) -> Result<Chunk, StrawError> {
        self.submit(Op::Read)
    }

    /// Removes and returns exactly `size` bytes.
    pub fn read_exact(&self, size: usize) -> Result<Bytes, StrawError> {
        self.submit(|reply| Op::ReadExact(size, reply))?
    }

    /// Removes and returns up to `max` bytes; never fails on scarcity.
    pub fn read_up_to(&self, max: usize) -> Result<Bytes, StrawError> {
        self.submit(|reply| Op::ReadUpTo(max, reply))
    }

    /// Returns exactly `size` bytes without consuming them.
    pub fn peek_exact(&self, size: usize) -> Result<Bytes, StrawError> {
        self.submit(|reply| Op::PeekExact(size, reply))?
    }

    /// Returns `size` bytes starting `offset` bytes in, without consuming
    /// anything.
    pub fn peek_at(&self, offset: usize, size: usize) -> Result<Bytes, StrawError> {
        self.submit(|reply| Op::PeekAt(offset, size, reply))?
    }

    /// Returns up to `max` bytes without consuming them.
    pub fn peek_up_to(&self, max: usize) -> Result<Bytes, StrawError> {
        self.submit(|reply| Op::PeekUpTo(max, reply))
    }

    /// Drains every chunk, preserving original order and boundaries.
    pub fn read_all_chunks(&self) -> Result<Vec<Chunk>, StrawError> {
        self.submit(Op::ReadAllChunks)
    }

    /// Drains the whole straw as one logical byte sequence.
    pub fn read_all(&self) -> Result<Bytes, StrawError> {
        self.submit(Op::ReadAll)
    }

    /// Returns the whole straw as one logical byte sequence without
    /// consuming it.
    pub fn peek_all(&self) -> Result<Bytes, StrawError> {
        self.submit(Op::PeekAll)
    }

    /// Discards exactly `size` bytes from the front.
    pub fn clear(&self, size: usize) -> Result<(), StrawError> {
        self.submit(|reply| Op::Clear(size, reply))?
    }

    /// Number of buffered bytes.
    pub fn len(&self) -> Result<usize, StrawError> {
        self.submit(Op::Len)
    }

    /// Returns `true` if nothing is buffered.
    pub fn is_empty(&self) -> Result<bool, StrawError> {
        Ok(self.len()? == 0)
    }
}

#[cfg(test)]
mod tests {
    use crate::{StrawError, straw};

    #[test]
    fn facade_runs_operations_to_completion() {
        let runtime = tokio::runtime::Runtime::new().unwrap();
        let (straw, _task) = runtime.block_on(async { straw() });
        let blocking = straw.blocking();

        // 1. The full operation set, from a plain thread
        blocking.write(*b"te").unwrap();
        blocking.write_all([*b"st", *b"!!"]).unwrap();
        assert_eq!(blocking.len().unwrap(), 6);

        assert_eq!(blocking.peek_exact(3).unwrap().to_vec(), b"tes");
        assert_eq!(blocking.peek_at(4, 2).unwrap().to_vec(), b"!!");
        assert_eq!(blocking.read_exact(3).unwrap().to_vec(), b"tes");
        assert_eq!(blocking.read().unwrap(), *b"t");
        assert_eq!(blocking.read_up_to(10).unwrap().to_vec(), b"!!");
        assert!(blocking.is_empty().unwrap());

        // 2. Failures inside the operation surface synchronously
        blocking.write(*b"test").unwrap();
        assert_eq!(
            blocking.read_exact(5).unwrap_err(),
            StrawError::InsufficientData {
                requested: 5,
                available: 4
            }
        );
        blocking.clear(4).unwrap();
        assert!(blocking.read_all_chunks().unwrap().is_empty());
    }

    #[test]
    fn facade_and_async_share_one_queue() {
        let runtime = tokio::runtime::Runtime::new().unwrap();
        let (straw, _task) = runtime.block_on(async { straw() });
        let blocking = straw.blocking();

        blocking.write(*b"from-thread ").unwrap();
        runtime.block_on(async { straw.write(*b"from-task").await }).unwrap();

        assert_eq!(blocking.read_all().unwrap().to_vec(), b"from-thread from-task");
    }

    #[test]
    fn facade_reports_closed() {
        let runtime = tokio::runtime::Runtime::new().unwrap();
        let (straw, task) = runtime.block_on(async { straw() });
        let blocking = straw.blocking();

        runtime.block_on(async { task.shutdown().await });
        assert_eq!(blocking.write(*b"late").unwrap_err(), StrawError::Closed);
        assert_eq!(blocking.read().unwrap_err(), StrawError::Closed);
    }
}
