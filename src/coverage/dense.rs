//! Dense core: every cell is valid, cover sets are bit-vectors.

use std::ops::Range;
use fixedbitset::FixedBitSet;

use super::scratch::{insert_sorted, LazyCache, ZeroBuffer};
use super::traits::{Core, ZeroSearch};

/// Coverage core for fully populated cost matrices.
///
/// Covered rows and columns live in `FixedBitSet`s. The ascending list of
/// uncovered columns is derived from the column bits on demand and patched
/// in place when a column is uncovered; the covered line count comes from a
/// popcount and is dropped on every flip.
#[derive(Debug, Clone, Default)]
pub struct DenseCore {
    nrows: usize,
    ncols: usize,
    covered_rows: FixedBitSet,
    covered_cols: FixedBitSet,
    uncovered_cols: LazyCache<Vec<usize>>,
    line_count: LazyCache<usize>,
    zeroes: ZeroBuffer,
}

impl DenseCore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Core for DenseCore {
    #[inline]
    fn row_span(&self, _row: usize, _nrows: usize, ncols: usize) -> Range<usize> {
        0..ncols
    }

    fn clear_coverage(&mut self, nrows: usize, ncols: usize, is_first: bool) {
        if is_first {
            self.nrows = nrows;
            self.ncols = ncols;
            self.covered_rows = FixedBitSet::with_capacity(nrows);
            self.covered_cols = FixedBitSet::with_capacity(ncols);
        } else {
            self.covered_rows.clear();
            self.covered_cols.clear();
        }
        self.uncovered_cols.invalidate();
        self.line_count.invalidate();
        self.zeroes.clear();
    }

    fn count_coverage(&mut self, row_star: &[usize]) -> bool {
        for &col in row_star.iter().filter(|&&col| col < self.ncols) {
            self.covered_cols.insert(col);
        }
        self.uncovered_cols.invalidate();
        self.line_count.invalidate();

        self.covered_count() >= self.nrows.min(self.ncols)
    }

    fn find_zero(&mut self, costs: &[f64], from: usize) -> ZeroSearch {
        while let Some((row, col)) = self.zeroes.pop() {
            if !self.covered_rows.contains(row) && !self.covered_cols.contains(col) {
                return ZeroSearch::Found { row, col, next: from };
            }
        }

        let ncols = self.ncols;
        let covered_cols = &self.covered_cols;
        let uncovered = self
            .uncovered_cols
            .get_or_compute(|| covered_cols.zeroes().collect());

        for row in from..self.nrows {
            if self.covered_rows.contains(row) {
                continue;
            }
            let cells = &costs[row * ncols..(row + 1) * ncols];
            if let Some(&col) = uncovered.iter().find(|&&col| cells[col] == 0.0) {
                return ZeroSearch::Found { row, col, next: row + 1 };
            }
        }

        let mut vmin = f64::INFINITY;
        for row in self.covered_rows.zeroes() {
            let cells = &costs[row * ncols..(row + 1) * ncols];
            for &col in uncovered {
                vmin = vmin.min(cells[col]);
            }
        }
        ZeroSearch::Exhausted { vmin }
    }

    fn cover_row(&mut self, row: usize) {
        self.covered_rows.insert(row);
        self.line_count.invalidate();
    }

    fn uncover_column(&mut self, costs: &[f64], col: usize, from: usize) {
        self.covered_cols.set(col, false);
        if let Some(list) = self.uncovered_cols.get_mut() {
            insert_sorted(list, col);
        }
        self.line_count.invalidate();

        for row in self.covered_rows.zeroes().take_while(|&row| row < from) {
            if costs[row * self.ncols + col] == 0.0 {
                self.zeroes.push(row, col);
            }
        }
    }

    fn update_covered(&mut self, costs: &mut [f64], vmin: f64, yield_fn: &mut dyn FnMut()) {
        let ncols = self.ncols;
        for row in self.covered_rows.ones() {
            let cells = &mut costs[row * ncols..(row + 1) * ncols];
            for col in self.covered_cols.ones() {
                cells[col] += vmin;
            }
        }
        yield_fn();
    }

    fn update_uncovered(&mut self, costs: &mut [f64], vmin: f64, yield_fn: &mut dyn FnMut()) {
        let ncols = self.ncols;
        let covered_cols = &self.covered_cols;
        let uncovered = self
            .uncovered_cols
            .get_or_compute(|| covered_cols.zeroes().collect());

        for row in self.covered_rows.zeroes() {
            let cells = &mut costs[row * ncols..(row + 1) * ncols];
            for &col in uncovered {
                cells[col] -= vmin;
                if cells[col] == 0.0 {
                    self.zeroes.push(row, col);
                }
            }
        }
        yield_fn();
    }

    #[inline]
    fn is_row_covered(&self, row: usize) -> bool {
        self.covered_rows.contains(row)
    }

    #[inline]
    fn is_column_covered(&self, col: usize) -> bool {
        self.covered_cols.contains(col)
    }

    fn covered_count(&mut self) -> usize {
        let rows = &self.covered_rows;
        let cols = &self.covered_cols;
        *self
            .line_count
            .get_or_compute(|| rows.count_ones(..) + cols.count_ones(..))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn no_yield() {}

    // Row-reduced 3x3 from the classic example:
    //   [[3, 0, 2],
    //    [2, 0, 5],
    //    [1, 0, 0]]
    fn reduced() -> Vec<f64> {
        vec![3.0, 0.0, 2.0, 2.0, 0.0, 5.0, 1.0, 0.0, 0.0]
    }

    #[test]
    fn test_clear_coverage_marks_everything_uncovered() {
        let mut core = DenseCore::new();
        core.clear_coverage(3, 3, true);
        core.cover_row(1);
        core.count_coverage(&[1, 3, 3]);
        assert!(core.is_row_covered(1));
        assert!(core.is_column_covered(1));

        core.clear_coverage(3, 3, false);
        for i in 0..3 {
            assert!(!core.is_row_covered(i));
            assert!(!core.is_column_covered(i));
        }
        assert_eq!(core.covered_count(), 0);
    }

    #[test]
    fn test_count_coverage() {
        let mut core = DenseCore::new();
        core.clear_coverage(3, 3, true);
        // Stars at (0,1) and (2,2); row 1 has none
        assert!(!core.count_coverage(&[1, 3, 2]));
        assert_eq!(core.covered_count(), 2);

        core.clear_coverage(3, 3, false);
        assert!(core.count_coverage(&[1, 0, 2]));
        assert_eq!(core.covered_count(), 3);
    }

    #[test]
    fn test_find_zero_skips_covered_columns() {
        let costs = reduced();
        let mut core = DenseCore::new();
        core.clear_coverage(3, 3, true);
        core.count_coverage(&[1, 3, 2]);

        // Column 1 and 2 covered: no zero in column 0
        match core.find_zero(&costs, 0) {
            ZeroSearch::Exhausted { vmin } => assert_eq!(vmin, 1.0),
            other => panic!("unexpected: {:?}", other),
        }
    }

    #[test]
    fn test_find_zero_resumes_from_cursor() {
        let costs = reduced();
        let mut core = DenseCore::new();
        core.clear_coverage(3, 3, true);

        assert_eq!(
            core.find_zero(&costs, 0),
            ZeroSearch::Found { row: 0, col: 1, next: 1 }
        );
        core.cover_row(0);
        assert_eq!(
            core.find_zero(&costs, 1),
            ZeroSearch::Found { row: 1, col: 1, next: 2 }
        );
    }

    #[test]
    fn test_uncover_column_buffers_passed_rows() {
        let costs = reduced();
        let mut core = DenseCore::new();
        core.clear_coverage(3, 3, true);
        core.count_coverage(&[1, 3, 3]);
        assert!(core.is_column_covered(1));
        // Derive the uncovered list before patching it
        assert!(matches!(core.find_zero(&costs, 3), ZeroSearch::Exhausted { .. }));

        core.uncover_column(&costs, 1, 2);
        assert!(!core.is_column_covered(1));
        assert_eq!(core.covered_count(), 0);
        // Rows 0 and 1 were behind the cursor and have a zero in column 1
        assert_eq!(
            core.find_zero(&costs, 2),
            ZeroSearch::Found { row: 0, col: 1, next: 2 }
        );
        assert_eq!(
            core.find_zero(&costs, 2),
            ZeroSearch::Found { row: 1, col: 1, next: 2 }
        );
    }

    #[test]
    fn test_update_passes() {
        let mut costs = vec![
            1.0, 2.0, //
            3.0, 4.0,
        ];
        let mut core = DenseCore::new();
        core.clear_coverage(2, 2, true);
        core.cover_row(0);
        core.count_coverage(&[2, 0]); // covers column 0

        let mut yields = 0;
        let mut count = || yields += 1;
        core.update_covered(&mut costs, 1.0, &mut count);
        core.update_uncovered(&mut costs, 4.0, &mut count);
        assert_eq!(yields, 2);

        // (0,0) covered twice, (1,1) uncovered twice, others untouched
        assert_eq!(costs, vec![2.0, 2.0, 3.0, 0.0]);
        assert_eq!(
            core.find_zero(&costs, 2),
            ZeroSearch::Found { row: 1, col: 1, next: 2 }
        );
    }

    #[test]
    fn test_cover_row_invalidates_count() {
        let mut core = DenseCore::new();
        core.clear_coverage(2, 2, true);
        assert_eq!(core.covered_count(), 0);
        core.cover_row(1);
        assert_eq!(core.covered_count(), 1);
        let mut noop = no_yield;
        core.update_covered(&mut [0.0; 4], 0.0, &mut noop);
        assert_eq!(core.covered_count(), 1);
    }
}
