//! Cooperative straw: a single-owner task serializing buffer operations.
//!
//! This module provides the async variant of the straw. A background task
//! exclusively owns the chunk sequence and drains an operation queue one
//! request at a time, so callers never observe interleaving inside the
//! buffer. The user-facing [`AsyncStraw`] handle submits operations over the
//! queue and awaits a oneshot reply per call.

use log::debug;
use tokio::{
    select,
    sync::{mpsc, oneshot},
    task::JoinHandle,
};
use tokio_util::sync::CancellationToken;

use super::facade::Straw;
use crate::buffers::{Bytes, Chunk, ChunkedBuffer, StrawError};

/// Depth of the operation queue between the handles and the owner task.
///
/// Each caller awaits the reply to its previous operation before submitting
/// the next one, so the queue only has to absorb concurrent submitters, not
/// bursts from a single caller.
const OP_QUEUE_DEPTH: usize = 16;

/// One buffer operation in flight from a handle to the owner task.
///
/// Every variant carries the oneshot reply the task resolves once the
/// operation has run; dropping the reply without sending signals a shutdown
/// to the caller.
pub(super) enum Op {
    Write(Chunk, oneshot::Sender<()>),
    WriteAll(Vec<Chunk>, oneshot::Sender<()>),
    Read(oneshot::Sender<Chunk>),
    ReadExact(usize, oneshot::Sender<Result<Bytes, StrawError>>),
    ReadUpTo(usize, oneshot::Sender<Bytes>),
    PeekExact(usize, oneshot::Sender<Result<Bytes, StrawError>>),
    PeekAt(usize, usize, oneshot::Sender<Result<Bytes, StrawError>>),
    PeekUpTo(usize, oneshot::Sender<Bytes>),
    ReadAllChunks(oneshot::Sender<Vec<Chunk>>),
    ReadAll(oneshot::Sender<Bytes>),
    PeekAll(oneshot::Sender<Bytes>),
    Clear(usize, oneshot::Sender<Result<(), StrawError>>),
    Len(oneshot::Sender<usize>),
}

/// Executes one operation against the task-owned buffer.
///
/// Reply sends are allowed to fail: a caller that dropped its future is
/// simply no longer listening, and the buffer mutation stands either way.
fn apply(buffer: &mut ChunkedBuffer, op: Op) {
    match op {
        Op::Write(chunk, reply) => {
            buffer.write(chunk);
            let _ = reply.send(());
        }
        Op::WriteAll(chunks, reply) => {
            buffer.write_all(chunks);
            let _ = reply.send(());
        }
        Op::Read(reply) => {
            let _ = reply.send(buffer.read());
        }
        Op::ReadExact(size, reply) => {
            let _ = reply.send(buffer.read_exact(size));
        }
        Op::ReadUpTo(max, reply) => {
            let _ = reply.send(buffer.read_up_to(max));
        }
        Op::PeekExact(size, reply) => {
            let _ = reply.send(buffer.peek_exact(size));
        }
        Op::PeekAt(offset, size, reply) => {
            let _ = reply.send(buffer.peek_at(offset, size));
        }
        Op::PeekUpTo(max, reply) => {
            let _ = reply.send(buffer.peek_up_to(max));
        }
        Op::ReadAllChunks(reply) => {
            let _ = reply.send(buffer.read_all_chunks());
        }
        Op::ReadAll(reply) => {
            let _ = reply.send(buffer.read_all());
        }
        Op::PeekAll(reply) => {
            let _ = reply.send(buffer.peek_all());
        }
        Op::Clear(size, reply) => {
            let _ = reply.send(buffer.clear(size));
        }
        Op::Len(reply) => {
            let _ = reply.send(buffer.len());
        }
    }
}

/// The owner task: drains the operation queue one request at a time.
///
/// Runs until every handle is dropped (the queue closes) or the task is
/// cancelled, and returns the buffer so residual bytes can be reclaimed.
async fn straw_task(mut ops: mpsc::Receiver<Op>, token: CancellationToken) -> ChunkedBuffer {
    let mut buffer = ChunkedBuffer::new();
    loop {
        select! {
            _ = token.cancelled() => break,
            op = ops.recv() => match op {
                Some(op) => apply(&mut buffer, op),
                None => break,
            },
        }
    }
    debug!("straw task stopping ({} bytes left buffered)", buffer.len());
    buffer
}

/// Handle to a straw owned by a background task.
///
/// Every operation is an `async fn`: the caller suspends while the operation
/// queues behind whatever else is in flight, and resumes once the owner task
/// has executed it and resolved the reply. Operations submitted through one
/// handle execute in submission order; the buffer's own logic never suspends
/// mid-operation.
///
/// `AsyncStraw` is cheaply cloneable; clones share the same buffer and
/// queue. The buffer lives until all handles are dropped or the
/// [`StrawTask`] is stopped, after which every operation fails with
/// [`StrawError::Closed`].
///
/// # Examples
///
/// ```
/// #[tokio::main]
/// async fn main() -> Result<(), straw::StrawError> {
///     let (straw, _task) = straw::straw();
///
///     straw.write(*b"te").await?;
///     straw.write(*b"st").await?;
///
///     // Reads may span the original write boundaries
///     let bytes = straw.read_exact(3).await?;
///     assert_eq!(bytes.to_vec(), b"tes");
///     assert_eq!(straw.len().await?, 1);
///     Ok(())
/// }
/// ```
#[derive(Clone)]
pub struct AsyncStraw {
    ops: mpsc::Sender<Op>,
}

impl AsyncStraw {
    /// Submits one operation and awaits its reply.
    async fn submit<T>(&self, build: impl FnOnce(oneshot::Sender<T>) -> Op) -> Result<T, StrawError> {
        let (reply, response) = oneshot::channel();
        self.ops.send(build(reply)).await.map_err(|_| StrawError::Closed)?;
        response.await.map_err(|_| StrawError::Closed)
    }

    /// Appends a chunk to the tail of the straw.
    pub async fn write(&self, chunk: impl Into<Chunk>) -> Result<(), StrawError> {
        let chunk = chunk.into();
        self.submit(|reply| Op::Write(chunk, reply)).await
    }

    /// Appends each chunk in order, as a single serialized operation.
    pub async fn write_all<I>(&self, chunks: I) -> Result<(), StrawError>
    where
        I: IntoIterator,
        I::Item: Into<Chunk>,
    {
        let chunks = chunks.into_iter().map(Into::into).collect();
        self.submit(|reply| Op::WriteAll(chunks, reply)).await
    }

    /// Removes and returns the single oldest chunk verbatim.
    ///
    /// Returns an empty chunk when the straw is empty; never waits for data.
    pub async fn read(&self) -> Result<Chunk, StrawError> {
        self.submit(Op::Read).await
    }

    /// Removes and returns exactly `size` bytes.
    ///
    /// Fails with [`StrawError::InsufficientData`] - without consuming
    /// anything - when fewer than `size` bytes are buffered.
    pub async fn read_exact(&self, size: usize) -> Result<Bytes, StrawError> {
        self.submit(|reply| Op::ReadExact(size, reply)).await?
    }

    /// Removes and returns up to `max` bytes; never fails on scarcity.
    pub async fn read_up_to(&self, max: usize) -> Result<Bytes, StrawError> {
        self.submit(|reply| Op::ReadUpTo(max, reply)).await
    }

    /// Returns exactly `size` bytes without consuming them.
    pub async fn peek_exact(&self, size: usize) -> Result<Bytes, StrawError> {
        self.submit(|reply| Op::PeekExact(size, reply)).await?
    }

    /// Returns `size` bytes starting `offset` bytes in, without consuming
    /// anything.
    pub async fn peek_at(&self, offset: usize, size: usize) -> Result<Bytes, StrawError> {
        self.submit(|reply| Op::PeekAt(offset, size, reply)).await?
    }

    /// Returns up to `max` bytes without consuming them.
    pub async fn peek_up_to(&self, max: usize) -> Result<Bytes, StrawError> {
        self.submit(|reply| Op::PeekUpTo(max, reply)).await
    }

    /// Drains every chunk, preserving original order and boundaries.
    pub async fn read_all_chunks(&self) -> Result<Vec<Chunk>, StrawError> {
        self.submit(Op::ReadAllChunks).await
    }

    /// Drains the whole straw as one logical byte sequence.
    pub async fn read_all(&self) -> Result<Bytes, StrawError> {
        self.submit(Op::ReadAll).await
    }

    /// Returns the whole straw as one logical byte sequence without
    /// consuming it.
    pub async fn peek_all(&self) -> Result<Bytes, StrawError> {
        self.submit(Op::PeekAll).await
    }

    /// Discards exactly `size` bytes from the front.
    pub async fn clear(&self, size: usize) -> Result<(), StrawError> {
        self.submit(|reply| Op::Clear(size, reply)).await?
    }

    /// Number of buffered bytes.
    pub async fn len(&self) -> Result<usize, StrawError> {
        self.submit(Op::Len).await
    }

    /// Returns `true` if nothing is buffered.
    pub async fn is_empty(&self) -> Result<bool, StrawError> {
        Ok(self.len().await? == 0)
    }

    /// Creates a blocking facade over this straw for thread-based callers.
    ///
    /// The facade shares this handle's queue, so facade calls and async
    /// calls interleave in submission order. See [`Straw`] for the blocking
    /// calling convention.
    #[must_use]
    pub fn blocking(&self) -> Straw {
        Straw::new(self.ops.clone())
    }
}

/// Owner task of an [`AsyncStraw`].
///
/// Dropping the task handle detaches the task (it keeps serving operations
/// until every [`AsyncStraw`] is dropped). Use [`stop`](StrawTask::stop) to
/// cancel it in place, or [`shutdown`](StrawTask::shutdown) to cancel it and
/// reclaim whatever is still buffered.
pub struct StrawTask {
    handle: JoinHandle<ChunkedBuffer>,
    token: CancellationToken,
}

impl StrawTask {
    /// Requests the owner task to stop.
    ///
    /// The operation executing at the moment of cancellation still runs to
    /// completion; operations left in the queue fail with
    /// [`StrawError::Closed`].
    pub fn stop(&self) {
        self.token.cancel();
    }

    /// Stops the owner task and returns the bytes still buffered.
    pub async fn shutdown(self) -> Bytes {
        self.token.cancel();
        match self.handle.await {
            Ok(mut buffer) => buffer.read_all(),
            Err(_) => Bytes::new(),
        }
    }
}

/// Creates a new cooperative straw: an [`AsyncStraw`] handle and the
/// [`StrawTask`] that owns its buffer.
///
/// Must be called from within a tokio runtime; the owner task is spawned on
/// the current runtime.
///
/// # Examples
///
/// ```
/// #[tokio::main]
/// async fn main() -> Result<(), straw::StrawError> {
///     let (straw, task) = straw::straw();
///
///     straw.write(*b"test").await?;
///     assert_eq!(straw.read().await?, *b"test");
///
///     // Reclaim residual bytes on shutdown
///     straw.write(*b"left over").await?;
///     let residue = task.shutdown().await;
///     assert_eq!(residue.to_vec(), b"left over");
///     Ok(())
/// }
/// ```
#[must_use]
pub fn straw() -> (AsyncStraw, StrawTask) {
    let (ops, queue) = mpsc::channel(OP_QUEUE_DEPTH);
    let token = CancellationToken::new();
    let handle = tokio::spawn(straw_task(queue, token.clone()));
    (AsyncStraw { ops }, StrawTask { handle, token })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn basic_ops() {
        let (straw, _task) = straw();

        // 1. Write then read the oldest chunk verbatim
        straw.write(*b"test").await.unwrap();
        assert_eq!(straw.read().await.unwrap(), *b"test");

        // 2. Reads spanning write boundaries
        straw.write(*b"te").await.unwrap();
        straw.write(*b"st").await.unwrap();
        let bytes = straw.read_exact(3).await.unwrap();
        assert_eq!(bytes.to_vec(), b"tes");
        assert_eq!(straw.len().await.unwrap(), 1);
        assert_eq!(straw.read().await.unwrap(), *b"t");

        // 3. Empty straw: total reads, typed failure for exact reads
        assert!(straw.is_empty().await.unwrap());
        assert!(straw.read().await.unwrap().is_empty());
        assert!(straw.read_up_to(10).await.unwrap().is_empty());
        assert_eq!(
            straw.read_exact(1).await.unwrap_err(),
            StrawError::InsufficientData {
                requested: 1,
                available: 0
            }
        );
    }

    #[tokio::test]
    async fn peeks_and_drains() {
        let (straw, _task) = straw();
        straw.write_all([*b"te", *b"st"]).await.unwrap();

        // Peek/read coherence through the queue
        let peeked = straw.peek_exact(3).await.unwrap();
        let read = straw.read_exact(3).await.unwrap();
        assert_eq!(peeked, read);

        straw.write(*b"es").await.unwrap();
        assert_eq!(straw.peek_at(1, 2).await.unwrap().to_vec(), b"es");
        assert_eq!(straw.peek_up_to(16).await.unwrap().to_vec(), b"tes");
        assert_eq!(straw.peek_all().await.unwrap().to_vec(), b"tes");

        let chunks = straw.read_all_chunks().await.unwrap();
        assert_eq!(chunks.len(), 2);
        assert_eq!(chunks[0], *b"t");
        assert_eq!(chunks[1], *b"es");
        assert!(straw.is_empty().await.unwrap());
    }

    #[tokio::test]
    async fn clear_discards() {
        let (straw, _task) = straw();
        straw.write(*b"test").await.unwrap();

        straw.clear(3).await.unwrap();
        assert_eq!(straw.read_all().await.unwrap().to_vec(), b"t");

        straw.write(*b"test").await.unwrap();
        assert!(straw.clear(5).await.is_err());
        assert_eq!(straw.len().await.unwrap(), 4);
    }

    #[tokio::test]
    async fn submission_order() {
        // Operations through one handle land in submission order even when
        // other handles interleave their own.
        let (straw, _task) = straw();

        let writer = straw.clone();
        let writes = tokio::spawn(async move {
            for i in 0u8..100 {
                writer.write(vec![i]).await.unwrap();
            }
        });
        writes.await.unwrap();

        let bytes = straw.read_all().await.unwrap().to_vec();
        assert_eq!(bytes, (0u8..100).collect::<Vec<_>>());
    }

    #[tokio::test]
    async fn closed_after_stop() {
        let (straw, task) = straw();
        straw.write(*b"going").await.unwrap();

        task.stop();
        // The task observes the cancellation and the queue dies with it
        loop {
            match straw.write(*b"more").await {
                Err(StrawError::Closed) => break,
                Ok(()) => tokio::task::yield_now().await,
                Err(e) => panic!("unexpected error: {e}"),
            }
        }
        assert_eq!(straw.read().await.unwrap_err(), StrawError::Closed);
    }

    #[tokio::test]
    async fn shutdown_reclaims_residue() {
        let (straw, task) = straw();
        straw.write(*b"resi").await.unwrap();
        straw.write(*b"due").await.unwrap();

        let residue = task.shutdown().await;
        assert_eq!(residue.to_vec(), b"residue");
    }

    #[tokio::test]
    async fn task_ends_when_handles_drop() {
        let (straw, task) = straw();
        straw.write(*b"bye").await.unwrap();
        drop(straw);

        // With every handle gone the queue closes and the task returns
        let residue = task.shutdown().await;
        assert_eq!(residue.to_vec(), b"bye");
    }
}
