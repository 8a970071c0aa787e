use core::{
    fmt,
    ops::{Bound, Deref, RangeBounds},
};
use std::{any::Any, sync::Arc};

/************************************ */
/* DYN BUFFER */
/************************************ */
/// A trait for types that can back a [`Chunk`] and provide a byte slice view.
///
/// This trait allows different buffer types (like [`Vec<u8>`], [`String`], and
/// fixed-size arrays) to be used as the backing storage for a [`Chunk`]. The
/// trait requires `Send + Sync` to ensure thread-safe sharing via [`Arc`].
///
/// # Examples
///
/// ```
/// use std::any::Any;
///
/// use straw::DynBuf;
///
/// struct FortyTwo;
///
/// impl DynBuf for FortyTwo {
///     fn as_slice(&self) -> &[u8] {
///         &[42]
///     }
///
///     fn as_any(&self) -> &dyn Any {
///         self // Returns the concrete type, not the trait object
///     }
/// }
/// ```
pub trait DynBuf: Send + Sync {
    /// Returns a byte slice view of the entire buffer.
    fn as_slice(&self) -> &[u8];

    /// Returns a reference to the concrete type as [`std::any::Any`] for
    /// downcasting.
    ///
    /// This method is essential for [`Chunk::downcast_ref`] to work correctly.
    /// Each implementation must return `self` directly (i.e. the concrete
    /// type). Without this method, it would be impossible to downcast from
    /// [`Arc<dyn DynBuf>`] back to the original concrete type like
    /// [`Vec<u8>`].
    ///
    /// Implementors should always return `self` directly.
    fn as_any(&self) -> &dyn Any;
}

impl DynBuf for Vec<u8> {
    fn as_slice(&self) -> &[u8] {
        self
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

impl DynBuf for Box<[u8]> {
    fn as_slice(&self) -> &[u8] {
        self
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

impl<const N: usize> DynBuf for [u8; N] {
    fn as_slice(&self) -> &[u8] {
        self
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

impl DynBuf for &'static [u8] {
    fn as_slice(&self) -> &[u8] {
        self
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

impl DynBuf for String {
    fn as_slice(&self) -> &[u8] {
        self.as_bytes()
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

impl DynBuf for &'static str {
    fn as_slice(&self) -> &[u8] {
        self.as_bytes()
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

/************************************ */
/* CHUNK */
/************************************ */
/// A cloneable wrapper to a contiguous, immutable-once-stored run of bytes.
///
/// [`Chunk`] is the unit of writing into a straw: every `write` appends one
/// chunk, and a read that ends partway through a chunk splits it into two
/// sub-views sharing the same backing allocation. It uses `Arc` internally,
/// so cloning and splitting never copy the underlying bytes.
///
/// The chunk maintains its own start and end offsets, allowing for efficient
/// subslicing via the [`view`](Chunk::view) and [`split_at`](Chunk::split_at)
/// methods without copying data.
///
/// # Examples
///
/// ## Basic Usage
///
/// ```
/// use straw::Chunk;
///
/// // Create from Vec<u8>
/// let data = vec![1, 2, 3, 4, 5];
/// let chunk: Chunk = data.into();
/// assert_eq!(chunk.len(), 5);
/// assert_eq!(chunk.as_slice(), &[1, 2, 3, 4, 5]);
///
/// // Create from static array
/// let arr_chunk: Chunk = [10, 20, 30].into();
/// assert_eq!(arr_chunk.as_slice(), &[10, 20, 30]);
///
/// // Create from String
/// let string_chunk: Chunk = "hello".to_string().into();
/// assert_eq!(string_chunk.as_slice(), b"hello");
/// ```
///
/// ## Creating Views
///
/// ```
/// use straw::Chunk;
///
/// let chunk: Chunk = vec![0, 1, 2, 3, 4, 5, 6, 7].into();
///
/// // Create a view of part of the buffer
/// let view = chunk.view(2..5).unwrap();
/// assert_eq!(view.as_slice(), &[2, 3, 4]);
///
/// // Views can be chained
/// let sub_view = view.view(1..3).unwrap();
/// assert_eq!(sub_view.as_slice(), &[3, 4]);
/// ```
///
/// ## Splitting
///
/// ```
/// use straw::Chunk;
///
/// let chunk: Chunk = vec![0, 1, 2, 3, 4].into();
/// let (front, back) = chunk.split_at(2);
/// assert_eq!(front.as_slice(), &[0, 1]);
/// assert_eq!(back.as_slice(), &[2, 3, 4]);
/// ```
///
/// ## Cheap Cloning
///
/// ```
/// use straw::Chunk;
///
/// let chunk: Chunk = vec![1, 2, 3, 4].into();
///
/// // Cloning is cheap - only increments Arc reference count
/// let clone1 = chunk.clone();
/// let clone2 = chunk.clone();
///
/// // All share the same underlying buffer
/// assert_eq!(chunk, clone1);
/// assert_eq!(clone1, clone2);
/// ```
#[derive(Clone)]
pub struct Chunk {
    buf: Arc<dyn DynBuf>,
    start: usize,
    end: usize,
}

impl Chunk {
    /// Creates a new [`Chunk`] with the specified start and end offsets.
    ///
    /// # Errors
    ///
    /// Returns the original buffer if `start > end` or `end >
    /// buf.as_slice().len()`.
    ///
    /// # Examples
    ///
    /// ```
    /// use std::sync::Arc;
    ///
    /// use straw::{Chunk, DynBuf};
    ///
    /// let data = vec![1, 2, 3, 4, 5];
    /// let buf = Chunk::new(Arc::new(data), 1, 4).unwrap_or_else(|_| panic!("Out of bound"));
    /// assert_eq!(buf.len(), 3);
    /// ```
    pub fn new(buf: Arc<dyn DynBuf>, start: usize, end: usize) -> Result<Chunk, Arc<dyn DynBuf>> {
        if start <= end && end <= buf.as_slice().len() {
            Ok(Self { buf, start, end })
        } else {
            Err(buf)
        }
    }

    /// Creates a new empty [`Chunk`].
    #[must_use]
    pub fn empty() -> Chunk {
        [].into()
    }

    /// Returns the length of the chunk in bytes.
    pub const fn len(&self) -> usize {
        self.end - self.start
    }

    /// Returns `true` if the chunk has a length of 0.
    pub const fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Returns a byte slice view of the chunk.
    pub fn as_slice(&self) -> &[u8] {
        // SAFETY: The slice indices self.start..self.end are guaranteed to be valid
        // because:
        // 1. When constructed via `Self::new()`, bounds are validated: start <= end <= buf.len()
        // 2. When constructed via `Self::view()` or `Self::split_at()`, the new indices are validated relative to the
        //    current view's range, maintaining: 0 <= start <= end <= self.len()
        // Therefore, get_unchecked is safe as the range is always within the buffer's
        // bounds.
        unsafe { self.buf.as_slice().get_unchecked(self.start..self.end) }
    }

    /// Attempts to downcast the underlying buffer to a concrete type reference.
    ///
    /// This method allows access to the original buffer type that was used to
    /// create the [`Chunk`]. Since [`Chunk`] stores buffers as [`Arc<dyn
    /// DynBuf>`], this provides a way to recover the concrete type if
    /// needed - e.g. to reclaim a `Vec<u8>` handed to a straw once it comes
    /// back out of a read.
    ///
    /// # Returns
    ///
    /// Returns `Some(&T)` if the underlying buffer is of type `T`, or `None` if
    /// it's a different type.
    ///
    /// # Examples
    ///
    /// ```
    /// use straw::Chunk;
    ///
    /// // Create a Chunk from a Vec
    /// let data = vec![1u8, 2, 3, 4];
    /// let chunk: Chunk = data.into();
    ///
    /// // Successfully downcast to Vec<u8>
    /// let vec_ref: &Vec<u8> = chunk.downcast_ref().unwrap();
    /// assert_eq!(vec_ref, &vec![1u8, 2, 3, 4]);
    ///
    /// // Fails to downcast to a different type
    /// let box_ref: Option<&Box<[u8]>> = chunk.downcast_ref();
    /// assert!(box_ref.is_none());
    /// ```
    #[must_use]
    pub fn downcast_ref<T: Any>(&self) -> Option<&T> {
        self.buf.as_any().downcast_ref()
    }

    /// Creates a view into a subrange of this chunk.
    ///
    /// This method creates a new [`Chunk`] that shares the same underlying
    /// buffer but with adjusted offsets. The range is relative to the
    /// current chunk's view.
    ///
    /// # Returns
    ///
    /// Returns `Some(Chunk)` if the range is valid, or `None` if the range is
    /// out of bounds.
    ///
    /// # Examples
    ///
    /// ```
    /// use straw::Chunk;
    ///
    /// let buf: Chunk = vec![1, 2, 3, 4, 5].into();
    /// let view = buf.view(1..4).unwrap();
    /// assert_eq!(&*view, &[2, 3, 4]);
    ///
    /// // Can create views of views
    /// let sub_view = view.view(1..2).unwrap();
    /// assert_eq!(&*sub_view, &[3]);
    /// ```
    #[must_use]
    pub fn view(&self, range: impl RangeBounds<usize>) -> Option<Self> {
        let start_delta = match range.start_bound() {
            Bound::Included(&n) => n,
            Bound::Excluded(&n) => n + 1,
            Bound::Unbounded => 0,
        };
        let end_delta = match range.end_bound() {
            Bound::Included(&n) => n + 1,
            Bound::Excluded(&n) => n,
            Bound::Unbounded => self.len(),
        };
        (start_delta <= end_delta && end_delta <= self.len()).then_some(Chunk {
            buf: Arc::clone(&self.buf),
            start: self.start + start_delta,
            end: self.start + end_delta,
        })
    }

    /// Splits the chunk into two views at `mid`.
    ///
    /// The front view covers `[0, mid)` and the back view covers
    /// `[mid, len)`. Both share the original backing allocation; no bytes are
    /// copied. This is the primitive behind partial reads: the front half
    /// leaves the straw as part of a read result while the back half is
    /// reinserted at the head of the chunk sequence.
    ///
    /// # Panics
    ///
    /// Panics if `mid > self.len()`, mirroring [`slice::split_at`].
    #[must_use]
    pub fn split_at(&self, mid: usize) -> (Chunk, Chunk) {
        let front = self.view(..mid);
        let back = self.view(mid..);
        match (front, back) {
            (Some(front), Some(back)) => (front, back),
            _ => panic!("split_at out of bounds: the mid is {mid} but the len is {}", self.len()),
        }
    }
}

impl Deref for Chunk {
    type Target = [u8];

    fn deref(&self) -> &Self::Target {
        self.as_slice()
    }
}

impl AsRef<[u8]> for Chunk {
    fn as_ref(&self) -> &[u8] {
        self
    }
}

impl<Rhs: AsRef<[u8]> + ?Sized> PartialEq<Rhs> for Chunk {
    fn eq(&self, other: &Rhs) -> bool {
        self.as_slice() == other.as_ref()
    }
}

impl Eq for Chunk {}

impl fmt::Display for Chunk {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{:02x?}", self.as_slice())
    }
}

impl fmt::Debug for Chunk {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{:02x?}", self.as_slice())
    }
}

// From impls
impl<T> From<Arc<T>> for Chunk
where
    T: DynBuf + 'static,
{
    fn from(buf: Arc<T>) -> Self {
        let end = buf.as_slice().len();
        Self { buf, start: 0, end }
    }
}

impl<T> From<T> for Chunk
where
    T: DynBuf + 'static,
{
    fn from(buf: T) -> Self {
        Self::from(Arc::new(buf))
    }
}

impl Chunk {
    #[cfg(test)]
    pub(crate) fn rand(len: usize) -> Self {
        use rand::Rng;
        let mut rng = rand::rng();
        (0..len).map(|_| rng.random()).collect::<Vec<u8>>().into()
    }
}
