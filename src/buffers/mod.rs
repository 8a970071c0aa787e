pub(crate) mod bytes;
pub(crate) mod chunk;
pub(crate) mod chunked;
pub(crate) mod coalesced;

pub(crate) use bytes::*;
pub(crate) use chunk::*;
pub(crate) use chunked::ChunkedBuffer;
pub(crate) use coalesced::CoalescedBuffer;

use thiserror::Error;

/// Error type shared by all straw variants.
///
/// Exact-size operations fail before mutating anything, so a failed read,
/// peek or clear always leaves the buffer exactly as it was. Max-size
/// operations and whole-buffer drains are total and never produce
/// [`InsufficientData`](StrawError::InsufficientData).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum StrawError {
    /// Fewer bytes than requested are currently buffered.
    ///
    /// Raised by exact-size read/peek/clear operations. The operation has not
    /// removed anything; the caller may wait for more writes and retry.
    #[error("insufficient data: requested {requested} bytes but only {available} are buffered")]
    InsufficientData {
        /// Number of bytes the operation required.
        requested: usize,
        /// Number of bytes actually buffered at the time of the call.
        available: usize,
    },

    /// The owner task behind an async straw has shut down.
    ///
    /// Raised by [`AsyncStraw`](crate::AsyncStraw) and its blocking facade
    /// when the task was cancelled or its queue closed before the operation
    /// could complete.
    #[error("straw task has shut down")]
    Closed,
}
