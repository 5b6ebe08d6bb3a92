//! Basic core: plain boolean arrays, no bit-level acceleration.

use std::ops::Range;

use super::scratch::{insert_sorted, LazyCache, ZeroBuffer};
use super::traits::{Core, ZeroSearch};

/// Coverage core backed by `Vec<bool>` cover flags.
///
/// Same derivation rules as the dense core (lazy uncovered column list,
/// lazily counted lines) but counts by linear scans. Adjustment passes do
/// not yield.
#[derive(Debug, Clone, Default)]
pub struct BasicCore {
    nrows: usize,
    ncols: usize,
    row_covered: Vec<bool>,
    col_covered: Vec<bool>,
    uncovered_cols: LazyCache<Vec<usize>>,
    line_count: LazyCache<usize>,
    zeroes: ZeroBuffer,
}

impl BasicCore {
    pub fn new() -> Self {
        Self::default()
    }
}

fn uncovered_indices(covered: &[bool]) -> Vec<usize> {
    covered
        .iter()
        .enumerate()
        .filter(|&(_, &c)| !c)
        .map(|(i, _)| i)
        .collect()
}

impl Core for BasicCore {
    #[inline]
    fn row_span(&self, _row: usize, _nrows: usize, ncols: usize) -> Range<usize> {
        0..ncols
    }

    fn clear_coverage(&mut self, nrows: usize, ncols: usize, is_first: bool) {
        if is_first {
            self.nrows = nrows;
            self.ncols = ncols;
            self.row_covered = vec![false; nrows];
            self.col_covered = vec![false; ncols];
        } else {
            self.row_covered.fill(false);
            self.col_covered.fill(false);
        }
        self.uncovered_cols.invalidate();
        self.line_count.invalidate();
        self.zeroes.clear();
    }

    fn count_coverage(&mut self, row_star: &[usize]) -> bool {
        for &col in row_star {
            if col < self.ncols {
                self.col_covered[col] = true;
            }
        }
        self.uncovered_cols.invalidate();
        self.line_count.invalidate();

        self.covered_count() >= self.nrows.min(self.ncols)
    }

    fn find_zero(&mut self, costs: &[f64], from: usize) -> ZeroSearch {
        while let Some((row, col)) = self.zeroes.pop() {
            if !self.row_covered[row] && !self.col_covered[col] {
                return ZeroSearch::Found { row, col, next: from };
            }
        }

        let ncols = self.ncols;
        let col_covered = &self.col_covered;
        let uncovered = self
            .uncovered_cols
            .get_or_compute(|| uncovered_indices(col_covered));

        for row in from..self.nrows {
            if self.row_covered[row] {
                continue;
            }
            for &col in uncovered {
                if costs[row * ncols + col] == 0.0 {
                    return ZeroSearch::Found { row, col, next: row + 1 };
                }
            }
        }

        let mut vmin = f64::INFINITY;
        for row in 0..self.nrows {
            if self.row_covered[row] {
                continue;
            }
            for &col in uncovered {
                vmin = vmin.min(costs[row * ncols + col]);
            }
        }
        ZeroSearch::Exhausted { vmin }
    }

    fn cover_row(&mut self, row: usize) {
        self.row_covered[row] = true;
        self.line_count.invalidate();
    }

    fn uncover_column(&mut self, costs: &[f64], col: usize, from: usize) {
        self.col_covered[col] = false;
        if let Some(list) = self.uncovered_cols.get_mut() {
            insert_sorted(list, col);
        }
        self.line_count.invalidate();

        for row in 0..from.min(self.nrows) {
            if !self.row_covered[row] && costs[row * self.ncols + col] == 0.0 {
                self.zeroes.push(row, col);
            }
        }
    }

    fn update_covered(&mut self, costs: &mut [f64], vmin: f64, _yield_fn: &mut dyn FnMut()) {
        for row in 0..self.nrows {
            if !self.row_covered[row] {
                continue;
            }
            for col in 0..self.ncols {
                if self.col_covered[col] {
                    costs[row * self.ncols + col] += vmin;
                }
            }
        }
    }

    fn update_uncovered(&mut self, costs: &mut [f64], vmin: f64, _yield_fn: &mut dyn FnMut()) {
        for row in 0..self.nrows {
            if self.row_covered[row] {
                continue;
            }
            for col in 0..self.ncols {
                if self.col_covered[col] {
                    continue;
                }
                let cell = &mut costs[row * self.ncols + col];
                *cell -= vmin;
                if *cell == 0.0 {
                    self.zeroes.push(row, col);
                }
            }
        }
    }

    #[inline]
    fn is_row_covered(&self, row: usize) -> bool {
        self.row_covered[row]
    }

    #[inline]
    fn is_column_covered(&self, col: usize) -> bool {
        self.col_covered[col]
    }

    fn covered_count(&mut self) -> usize {
        let rows = &self.row_covered;
        let cols = &self.col_covered;
        *self.line_count.get_or_compute(|| {
            rows.iter().filter(|&&c| c).count() + cols.iter().filter(|&&c| c).count()
        })
    }
}
