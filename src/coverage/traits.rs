//! Coverage core trait.

use std::ops::Range;

/// Outcome of a zero search over the uncovered cells.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ZeroSearch {
    /// An uncovered zero at (`row`, `col`); `next` is the row cursor to resume from.
    Found { row: usize, col: usize, next: usize },
    /// No uncovered zero remains; `vmin` is the smallest uncovered value
    /// (infinite when the uncovered region holds no valid cell).
    Exhausted { vmin: f64 },
}

/// Cover bookkeeping and zero search over one sparsity shape of cost matrix.
///
/// The driver always hands a core a matrix with `nrows <= ncols`, laid out
/// row-major. Stars are passed as `row_star[row] = col`, with `ncols` meaning
/// "no star".
///
/// Every implementation scans rows in ascending order and, within a row,
/// columns in ascending order, so that cores agree on tie-breaks.
///
/// Derived counts are cached and must be invalidated whenever any row or
/// column changes between covered and uncovered.
pub trait Core {
    /// Columns of `row` that can hold a valid cell.
    fn row_span(&self, row: usize, nrows: usize, ncols: usize) -> Range<usize>;

    /// Reset cover state. With `is_first` the core (re)allocates for the
    /// given dimensions; otherwise it only marks everything uncovered.
    fn clear_coverage(&mut self, nrows: usize, ncols: usize, is_first: bool);

    /// Cover every column holding a starred zero.
    ///
    /// # Returns
    /// Whether enough lines are covered for a complete assignment.
    fn count_coverage(&mut self, row_star: &[usize]) -> bool;

    /// Find the first uncovered zero, draining buffered zeroes first and then
    /// scanning uncovered rows from the cursor `from`.
    fn find_zero(&mut self, costs: &[f64], from: usize) -> ZeroSearch;

    /// Mark a row covered.
    fn cover_row(&mut self, row: usize);

    /// Mark a column uncovered. Zeroes it exposes in uncovered rows the
    /// cursor `from` has already passed are buffered for the next search.
    fn uncover_column(&mut self, costs: &[f64], col: usize, from: usize);

    /// Add `vmin` to every covered-row x covered-column cell.
    fn update_covered(&mut self, costs: &mut [f64], vmin: f64, yield_fn: &mut dyn FnMut());

    /// Subtract `vmin` from every uncovered-row x uncovered-column cell,
    /// buffering the zeroes this creates.
    fn update_uncovered(&mut self, costs: &mut [f64], vmin: f64, yield_fn: &mut dyn FnMut());

    fn is_row_covered(&self, row: usize) -> bool;

    fn is_column_covered(&self, col: usize) -> bool;

    /// Number of covered lines (rows plus columns).
    fn covered_count(&mut self) -> usize;
}
