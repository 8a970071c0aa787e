//! Straw: an elastic, ordered byte buffer that decouples write boundaries
//! from read boundaries.
//!
//! A straw accumulates chunks of bytes written in N discrete pieces and
//! hands them back as a contiguous stream in M reads of arbitrary size -
//! including reads that span multiple original chunks or end partway through
//! one. It is the piece of plumbing stream and transport code reaches for
//! when "bytes arrived" and "bytes consumed" disagree about granularity.
//!
//! # Overview
//!
//! The diagram below shows three writes being consumed by two reads whose
//! sizes ignore the original chunk boundaries.
//!
//! ```text
//!  PRODUCER                                            User code  :
//! ┌──────┐      ┌──────────┐      ┌────┐                          :
//! │ W1   │      │ W2       │      │ W3 │                          :
//! └──┬───┘      └────┬─────┘      └─┬──┘                          :
//!   t0              t1             t2                             :
//!    ▼               ▼              ▼                             :
//! ~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~  :
//!  STRAW                                             Straw code   :
//! ┌────────────────────────────────────────────────────────────┐  :
//! │  Chunks:  [W1][W2        ][W3]                             │  :
//! │                                                            │  :
//! │  read_exact(6) ─► [W1][W2a]     (W2 split, W2b reinserted) │  :
//! │  read_exact(5) ─► [W2b][W3]                                │  :
//! └───────────┬────────────────────────────────────────────────┘  :
//! ~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~  :
//!  CONSUMER   ▼                                       User code   :
//! ┌────────────┐  ┌────────────┐                                  :
//! │ R1 (6 B)   │  │ R2 (5 B)   │                                  :
//! └────────────┘  └────────────┘                                  :
//! ```
//!
//! A read that ends partway through a chunk splits it: the front half leaves
//! the straw as part of the result, the back half is reinserted at the head
//! of the chunk sequence. Both halves are zero-copy views of the original
//! allocation.
//!
//! # Choosing a variant
//!
//! The same operation set is available under four concurrency disciplines;
//! all four produce byte-identical streams for the same writes:
//!
//! - [`AsyncStraw`]: cooperative isolation. A single-owner task serializes
//!   operations from an mpsc queue; every call is an `async fn` and executes
//!   in submission order. Built by [`straw()`], which also returns the
//!   [`StrawTask`] owning the buffer.
//! - [`Straw`]: blocking facade over an [`AsyncStraw`] for thread-based
//!   callers; each call parks on a oneshot completion signal until the
//!   cooperative operation has run.
//! - [`SharedStraw`]: a mutex around a coalesced (contiguous) buffer.
//!   Callers may block on the lock, never on data.
//! - [`BlockingStraw`]: a mutex plus condition variable around a chunked
//!   buffer. Exact-size reads park the calling thread until enough bytes
//!   exist; writers never block.
//! - [`LocalStraw`]: no synchronization at all; `&mut self` everywhere for
//!   callers that serialize access themselves.
//!
//! # Quick Start
//!
//! ```
//! #[tokio::main]
//! async fn main() -> Result<(), straw::StrawError> {
//!     let (straw, _task) = straw::straw();
//!
//!     // Bytes go in as three chunks...
//!     straw.write(*b"el").await?;
//!     straw.write(*b"astic ").await?;
//!     straw.write(*b"buffer").await?;
//!
//!     // ...and come out at whatever granularity the consumer wants
//!     assert_eq!(straw.read_exact(7).await?.to_vec(), b"elastic");
//!     assert_eq!(straw.read_all().await?.to_vec(), b" buffer");
//!     Ok(())
//! }
//! ```
//!
//! # Operation set
//!
//! Every variant exposes: `write` / `write_all`, `read` (oldest chunk),
//! `read_exact(size)`, `read_up_to(max)`, `peek_exact(size)`,
//! `peek_at(offset, size)`, `peek_up_to(max)`, `read_all_chunks`,
//! `read_all`, `peek_all`, `clear(size)`, `len` and `is_empty`.
//!
//! Edge cases are uniform across variants: a size of zero is a no-op
//! returning empty data; an exact-size operation short on data fails with
//! [`StrawError::InsufficientData`] before consuming anything (or, on
//! [`BlockingStraw`], waits instead); max-size operations and whole-buffer
//! drains are total and never fail on scarcity.
//!
//! # Buffer vocabulary
//!
//! Writes take anything convertible to a [`Chunk`] - `Vec<u8>`, boxed
//! slices, arrays, `String`s, static slices - and multi-chunk results come
//! back as [`Bytes`], which compares by content regardless of chunk
//! boundaries:
//!
//! ```
//! use straw::{Bytes, Chunk};
//!
//! let chunk: Chunk = vec![1, 2, 3, 4].into();
//! let (front, back) = chunk.split_at(2);
//!
//! let mut split = Bytes::new();
//! split.push(front);
//! split.push(back);
//! assert_eq!(split, Bytes::from(vec![1, 2, 3, 4]));
//! ```
//!
//! # Diagnostics
//!
//! Selected operations emit `trace`-level events through the [`log`] facade.
//! With no logger installed these are no-ops; installing one never changes
//! buffer behavior.
mod api;
mod buffers;

pub use api::*;
pub use buffers::{StrawError, bytes::*, chunk::*};
