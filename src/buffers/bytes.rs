use core::fmt;

use super::Chunk;

/// An ordered collection of non-contiguous byte chunks.
///
/// [`Bytes`] is the result type of the multi-chunk read and peek operations:
/// a read that spans several written chunks returns one [`Bytes`] whose
/// chunks are views of the original writes, in order, with no copying beyond
/// what chunk-slicing naturally provides.
///
/// Equality is defined over the logical byte stream, not over chunk
/// boundaries: two [`Bytes`] holding the same bytes cut differently compare
/// equal.
///
/// # Examples
///
/// ## Basic Usage
///
/// ```
/// use straw::Bytes;
///
/// // Create from a single chunk
/// let bytes: Bytes = vec![1, 2, 3, 4].into();
/// assert_eq!(bytes.len(), 4);
///
/// // Create empty and push chunks
/// let mut bytes = Bytes::new();
/// bytes.push(vec![1, 2].into());
/// bytes.push(vec![3, 4].into());
/// assert_eq!(bytes.len(), 4);
/// ```
///
/// ## Boundary-independent equality
///
/// ```
/// use straw::Bytes;
///
/// let mut split = Bytes::new();
/// split.push(vec![1, 2].into());
/// split.push(vec![3].into());
///
/// let whole: Bytes = vec![1, 2, 3].into();
/// assert_eq!(split, whole);
/// ```
///
/// ## Coalescing
///
/// ```
/// use straw::Bytes;
///
/// let mut bytes = Bytes::new();
/// bytes.push(b"Hello, ".to_vec().into());
/// bytes.push(b"World!".to_vec().into());
///
/// assert_eq!(bytes.to_vec(), b"Hello, World!");
/// ```
#[derive(Clone, Default, Eq)]
pub struct Bytes {
    chunks: Vec<Chunk>,
}

impl Bytes {
    /// Creates a new empty [`Bytes`] instance.
    #[must_use]
    pub const fn new() -> Self {
        Self { chunks: Vec::new() }
    }

    /// Creates a new [`Bytes`] instance containing a single chunk.
    ///
    /// Empty chunks are ignored, leaving the instance empty.
    #[must_use]
    pub fn single(chunk: Chunk) -> Self {
        let mut bytes = Self::new();
        bytes.push(chunk);
        bytes
    }

    /// Returns the total number of bytes across all chunks.
    ///
    /// # Examples
    ///
    /// ```
    /// use straw::Bytes;
    ///
    /// let mut bytes = Bytes::new();
    /// bytes.push(vec![1, 2, 3].into());
    /// bytes.push(vec![4, 5].into());
    /// assert_eq!(bytes.len(), 5);
    /// ```
    #[inline(always)]
    pub fn len(&self) -> usize {
        self.chunks.iter().fold(0, |len, chunk| len + chunk.len())
    }

    /// Returns `true` if the [`Bytes`] contains no data.
    pub fn is_empty(&self) -> bool {
        self.chunks.is_empty()
    }

    /// Appends a chunk to the end of the [`Bytes`].
    ///
    /// NOTE: Empty chunks are automatically ignored and not added.
    pub fn push(&mut self, chunk: Chunk) {
        if !chunk.is_empty() {
            self.chunks.push(chunk);
        }
    }

    /// Returns an iterator over references to the chunks.
    pub fn chunks(&self) -> impl Iterator<Item = &Chunk> + '_ {
        self.chunks.iter()
    }

    /// Returns an iterator over byte slices from all chunks.
    pub fn slices(&self) -> impl Iterator<Item = &[u8]> + '_ {
        self.chunks().map(Chunk::as_slice)
    }

    /// Consumes the [`Bytes`], returning its chunks in order.
    #[must_use]
    pub fn into_chunks(self) -> Vec<Chunk> {
        self.chunks
    }

    /// Converts the [`Bytes`] into a single [`Chunk`].
    ///
    /// If the [`Bytes`] is empty, returns an empty chunk. If it contains a
    /// single chunk, returns a clone of that chunk. Otherwise, copies all
    /// data into a new contiguous [`Vec<u8>`] and converts it to a
    /// [`Chunk`].
    ///
    /// # Examples
    ///
    /// ```
    /// use straw::Bytes;
    ///
    /// let mut bytes = Bytes::new();
    /// bytes.push(vec![1, 2].into());
    /// bytes.push(vec![3, 4].into());
    ///
    /// let chunk = bytes.to_chunk();
    /// assert_eq!(&*chunk, &[1, 2, 3, 4]);
    /// ```
    pub fn to_chunk(&self) -> Chunk {
        match self.chunks.as_slice() {
            [] => Chunk::empty(),
            [chunk] => chunk.clone(),
            _ => self.to_vec().into(),
        }
    }

    /// Copies all bytes into a contiguous [`Vec<u8>`].
    ///
    /// # Examples
    ///
    /// ```
    /// use straw::Bytes;
    ///
    /// let mut bytes = Bytes::new();
    /// bytes.push(vec![1, 2].into());
    /// bytes.push(vec![3, 4].into());
    ///
    /// let vec = bytes.to_vec();
    /// assert_eq!(vec, vec![1, 2, 3, 4]);
    /// ```
    pub fn to_vec(&self) -> Vec<u8> {
        self.slices().fold(Vec::with_capacity(self.len()), |mut acc, s| {
            acc.extend_from_slice(s);
            acc
        })
    }
}

impl PartialEq for Bytes {
    fn eq(&self, other: &Self) -> bool {
        let mut self_slices = self.slices();
        let mut other_slices = other.slices();
        let mut current_self: Option<&[u8]> = self_slices.next();
        let mut current_other: Option<&[u8]> = other_slices.next();
        loop {
            match (current_self, current_other) {
                (None, None) => return true,
                (None, _) | (_, None) => return false,
                (Some(l), Some(r)) => {
                    let cmp_len = l.len().min(r.len());
                    if l[..cmp_len] != r[..cmp_len] {
                        return false;
                    }
                    current_self = if cmp_len == l.len() {
                        self_slices.next()
                    } else {
                        Some(&l[cmp_len..])
                    };
                    current_other = if cmp_len == r.len() {
                        other_slices.next()
                    } else {
                        Some(&r[cmp_len..])
                    };
                }
            }
        }
    }
}

impl fmt::Debug for Bytes {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{:02x?}", self.to_vec())
    }
}

impl From<Chunk> for Bytes {
    fn from(chunk: Chunk) -> Self {
        Self::single(chunk)
    }
}

impl From<Vec<u8>> for Bytes {
    fn from(buf: Vec<u8>) -> Self {
        Self::single(buf.into())
    }
}

impl From<&'static [u8]> for Bytes {
    fn from(buf: &'static [u8]) -> Self {
        Self::single(buf.into())
    }
}

impl From<&'static str> for Bytes {
    fn from(buf: &'static str) -> Self {
        Self::single(buf.into())
    }
}

impl FromIterator<Chunk> for Bytes {
    fn from_iter<I: IntoIterator<Item = Chunk>>(iter: I) -> Self {
        let mut bytes = Self::new();
        for chunk in iter {
            bytes.push(chunk);
        }
        bytes
    }
}

impl IntoIterator for Bytes {
    type Item = Chunk;
    type IntoIter = std::vec::IntoIter<Chunk>;

    fn into_iter(self) -> Self::IntoIter {
        self.chunks.into_iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bytes_push_len() {
        // 1. Empty
        let bytes = Bytes::new();
        assert!(bytes.is_empty());
        assert_eq!(bytes.len(), 0);

        // 2. Push accumulates in order
        let mut bytes = Bytes::new();
        bytes.push(vec![1u8, 2].into());
        bytes.push(vec![3u8, 4, 5].into());
        assert_eq!(bytes.len(), 5);
        assert_eq!(bytes.chunks().count(), 2);
        assert_eq!(bytes.to_vec(), vec![1, 2, 3, 4, 5]);

        // 3. Empty chunks are ignored
        let mut bytes = Bytes::new();
        bytes.push(Chunk::empty());
        bytes.push(vec![].into());
        assert!(bytes.is_empty());
        assert_eq!(bytes.chunks().count(), 0);

        // 4. Single
        let bytes = Bytes::single(vec![7u8, 8].into());
        assert_eq!(bytes.len(), 2);
        let bytes = Bytes::single(Chunk::empty());
        assert!(bytes.is_empty());
    }

    #[test]
    fn bytes_eq_across_boundaries() {
        // 1. Same bytes, different chunking
        let mut a = Bytes::new();
        a.push(vec![1u8, 2].into());
        a.push(vec![3u8].into());
        a.push(vec![4u8, 5].into());

        let mut b = Bytes::new();
        b.push(vec![1u8].into());
        b.push(vec![2u8, 3, 4].into());
        b.push(vec![5u8].into());

        assert_eq!(a, b);

        // 2. Against a single contiguous chunk
        let c: Bytes = vec![1u8, 2, 3, 4, 5].into();
        assert_eq!(a, c);

        // 3. Different content
        let d: Bytes = vec![1u8, 2, 3, 4, 6].into();
        assert_ne!(a, d);

        // 4. Different length
        let e: Bytes = vec![1u8, 2, 3, 4].into();
        assert_ne!(a, e);

        // 5. Empty vs empty
        assert_eq!(Bytes::new(), Bytes::new());
        assert_ne!(Bytes::new(), c);
    }

    #[test]
    fn bytes_to_chunk() {
        // 1. Empty
        let bytes = Bytes::new();
        assert!(bytes.to_chunk().is_empty());

        // 2. Single chunk comes back without copying
        let chunk: Chunk = vec![1u8, 2, 3].into();
        let bytes = Bytes::single(chunk.clone());
        assert_eq!(bytes.to_chunk(), chunk);

        // 3. Multiple chunks are coalesced
        let mut bytes = Bytes::new();
        bytes.push(vec![1u8, 2].into());
        bytes.push(vec![3u8].into());
        assert_eq!(bytes.to_chunk().as_slice(), &[1, 2, 3]);
    }

    #[test]
    fn bytes_into_chunks() {
        let mut bytes = Bytes::new();
        bytes.push(vec![1u8, 2].into());
        bytes.push(vec![3u8, 4].into());

        let chunks = bytes.into_chunks();
        assert_eq!(chunks.len(), 2);
        assert_eq!(chunks[0].as_slice(), &[1, 2]);
        assert_eq!(chunks[1].as_slice(), &[3, 4]);
    }
}
