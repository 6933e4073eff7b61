use std::ops::Index;

use quiver_result::{Error, Result};

use crate::iter::ColumnIter;

/// A column accessor that provides zero-copy access to chunked column data.
///
/// Each chunk is one contiguous run of values, typically corresponding to one
/// row group of the source table. The accessor presents the chunks as a single
/// logical sequence: `len()` is the total element count, indexing is global,
/// and iteration crosses chunk boundaries without the caller noticing.
///
/// ```
/// use quiver_column::ColumnAccessor;
///
/// let (a, b) = ([1i64, 2, 3], [4i64, 5]);
/// let mut col = ColumnAccessor::new();
/// col.push_chunk(&a);
/// col.push_chunk(&b);
///
/// assert_eq!(col.len(), 5);
/// assert_eq!(col[3], 4);
/// let sum: i64 = col.iter().sum();
/// assert_eq!(sum, 15);
/// ```
#[derive(Debug, Clone)]
pub struct ColumnAccessor<'a, T> {
    chunks: Vec<&'a [T]>,
    /// Cumulative element counts through each chunk, for O(log k) index lookup.
    offsets: Vec<usize>,
    total: usize,
}

impl<'a, T> Default for ColumnAccessor<'a, T> {
    fn default() -> Self {
        Self {
            chunks: Vec::new(),
            offsets: Vec::new(),
            total: 0,
        }
    }
}

impl<'a, T> ColumnAccessor<'a, T> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append one contiguous run of values.
    ///
    /// Empty chunks are dropped so that `offsets` stays strictly increasing
    /// and binary search stays well-defined.
    pub fn push_chunk(&mut self, chunk: &'a [T]) {
        if chunk.is_empty() {
            return;
        }
        self.total += chunk.len();
        self.chunks.push(chunk);
        self.offsets.push(self.total);
    }

    /// Total number of elements across all chunks.
    #[inline]
    pub fn len(&self) -> usize {
        self.total
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.total == 0
    }

    /// Random access by global index.
    ///
    /// Binary-searches the cumulative offsets to find the owning chunk
    /// (O(log k) for k chunks), then fetches within it in O(1). Returns `None`
    /// past the end.
    #[inline]
    pub fn get(&self, index: usize) -> Option<&'a T> {
        if index >= self.total {
            return None;
        }
        let chunk_idx = self.offsets.partition_point(|&end| end <= index);
        let start = if chunk_idx == 0 {
            0
        } else {
            self.offsets[chunk_idx - 1]
        };
        Some(&self.chunks[chunk_idx][index - start])
    }

    /// Bounds-checked random access.
    ///
    /// Like [`get`](Self::get) but fails with [`Error::OutOfRange`] instead of
    /// returning `None`, for callers that treat overruns as errors.
    pub fn at(&self, index: usize) -> Result<&'a T> {
        self.get(index).ok_or(Error::OutOfRange {
            index,
            len: self.total,
        })
    }

    /// Forward iterator over all elements, crossing chunk boundaries.
    ///
    /// Each call yields an independent iterator starting from the first
    /// element, so traversal is restartable.
    pub fn iter(&self) -> ColumnIter<'_, 'a, T> {
        ColumnIter::new(&self.chunks, self.total)
    }

    /// Number of chunks (usually the number of source row groups).
    #[inline]
    pub fn num_chunks(&self) -> usize {
        self.chunks.len()
    }

    /// One chunk as a contiguous slice, for chunk-aware processing.
    ///
    /// Panics if `index >= num_chunks()`.
    #[inline]
    pub fn chunk(&self, index: usize) -> &'a [T] {
        self.chunks[index]
    }

    /// All chunks, in order.
    #[inline]
    pub fn chunks(&self) -> &[&'a [T]] {
        &self.chunks
    }
}

impl<'a, T> Index<usize> for ColumnAccessor<'a, T> {
    type Output = T;

    /// Global indexing. Panics past the end; use [`at`](Self::at) for a
    /// fallible variant.
    fn index(&self, index: usize) -> &T {
        match self.get(index) {
            Some(value) => value,
            None => panic!(
                "index {} out of range for column of length {}",
                index, self.total
            ),
        }
    }
}

impl<'s, 'a, T> IntoIterator for &'s ColumnAccessor<'a, T> {
    type Item = &'a T;
    type IntoIter = ColumnIter<'s, 'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}
