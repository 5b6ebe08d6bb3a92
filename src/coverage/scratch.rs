//! Scratch state shared by the coverage cores.

use std::collections::VecDeque;

/// A lazily recomputed value with explicit invalidation.
///
/// Cores keep derived coverage data (covered line counts, uncovered column
/// lists) here. Whenever a row or column flips between covered and uncovered
/// the dependent caches must be invalidated; the next read rebuilds them.
#[derive(Debug, Clone)]
pub struct LazyCache<T> {
    value: Option<T>,
}

impl<T> Default for LazyCache<T> {
    fn default() -> Self {
        Self { value: None }
    }
}

impl<T> LazyCache<T> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Drop the cached value.
    #[inline]
    pub fn invalidate(&mut self) {
        self.value = None;
    }

    #[inline]
    pub fn is_valid(&self) -> bool {
        self.value.is_some()
    }

    /// Return the cached value, computing it first if it was invalidated.
    #[inline]
    pub fn get_or_compute<F: FnOnce() -> T>(&mut self, compute: F) -> &T {
        self.value.get_or_insert_with(compute)
    }

    /// Mutable access to the cached value, if present.
    ///
    /// Used to patch a derived list in place instead of dropping it.
    #[inline]
    pub fn get_mut(&mut self) -> Option<&mut T> {
        self.value.as_mut()
    }
}

/// FIFO of (row, column) zero cells found as a side effect of other passes.
///
/// Entries may go stale (their row or column gets covered); consumers
/// re-check coverage when popping.
#[derive(Debug, Clone, Default)]
pub struct ZeroBuffer {
    cells: VecDeque<(usize, usize)>,
}

impl ZeroBuffer {
    #[inline]
    pub fn push(&mut self, row: usize, col: usize) {
        self.cells.push_back((row, col));
    }

    #[inline]
    pub fn pop(&mut self) -> Option<(usize, usize)> {
        self.cells.pop_front()
    }

    #[inline]
    pub fn clear(&mut self) {
        self.cells.clear();
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.cells.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }
}

/// Sorted insert into an ascending index list, ignoring duplicates.
#[inline]
pub(crate) fn insert_sorted(list: &mut Vec<usize>, value: usize) {
    if let Err(pos) = list.binary_search(&value) {
        list.insert(pos, value);
    }
}
