//! Diagonal core: only cells within one column of the main diagonal are valid.
//!
//! For near-sequential assignment problems (item `i` can only go to slot
//! `i - 1`, `i` or `i + 1`) every scan shrinks to at most three cells per row
//! or column. Off-band cells are never read or written, so their contents are
//! irrelevant to this core.
//!
//! Bands are clipped at the matrix edges: row 0 spans columns `0..=1`, the
//! last row spans `nrows - 2..=nrows - 1` in a square matrix, and column `c`
//! is touched by rows `c - 1..=c + 1` that exist.

use std::ops::Range;

use super::scratch::{LazyCache, ZeroBuffer};
use super::traits::{Core, ZeroSearch};

/// Indices within one step of `center`, clipped to `0..len`.
#[inline]
pub fn band(center: usize, len: usize) -> Range<usize> {
    center.saturating_sub(1)..(center + 2).min(len)
}

/// Coverage core for banded (tridiagonal) cost matrices.
#[derive(Debug, Clone, Default)]
pub struct DiagonalCore {
    nrows: usize,
    ncols: usize,
    row_covered: Vec<bool>,
    col_covered: Vec<bool>,
    line_count: LazyCache<usize>,
    zeroes: ZeroBuffer,
}

impl DiagonalCore {
    pub fn new() -> Self {
        Self::default()
    }

    #[inline]
    fn is_open(&self, row: usize, col: usize) -> bool {
        !self.row_covered[row] && !self.col_covered[col]
    }
}

impl Core for DiagonalCore {
    #[inline]
    fn row_span(&self, row: usize, _nrows: usize, ncols: usize) -> Range<usize> {
        band(row, ncols)
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
        self.line_count.invalidate();
        self.zeroes.clear();
    }

    fn count_coverage(&mut self, row_star: &[usize]) -> bool {
        for &col in row_star {
            if col < self.ncols {
                self.col_covered[col] = true;
            }
        }
        self.line_count.invalidate();

        self.covered_count() >= self.nrows.min(self.ncols)
    }

    fn find_zero(&mut self, costs: &[f64], from: usize) -> ZeroSearch {
        while let Some((row, col)) = self.zeroes.pop() {
            if self.is_open(row, col) {
                return ZeroSearch::Found { row, col, next: from };
            }
        }

        let ncols = self.ncols;
        for row in from..self.nrows {
            if self.row_covered[row] {
                continue;
            }
            for col in band(row, ncols) {
                if !self.col_covered[col] && costs[row * ncols + col] == 0.0 {
                    return ZeroSearch::Found { row, col, next: row + 1 };
                }
            }
        }

        let mut vmin = f64::INFINITY;
        for row in 0..self.nrows {
            if self.row_covered[row] {
                continue;
            }
            for col in band(row, ncols) {
                if !self.col_covered[col] {
                    vmin = vmin.min(costs[row * ncols + col]);
                }
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
        self.line_count.invalidate();

        for row in band(col, self.nrows.min(from)) {
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
            for col in band(row, self.ncols) {
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
            for col in band(row, self.ncols) {
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

#[cfg(test)]
mod tests {
    use super::*;

    const FAR: f64 = 1.0e9;

    #[test]
    fn test_band_clipping() {
        assert_eq!(band(0, 4), 0..2);
        assert_eq!(band(1, 4), 0..3);
        assert_eq!(band(3, 4), 2..4);
        assert_eq!(band(0, 1), 0..1);
        // Center beyond the edge still yields the reachable neighbour
        assert_eq!(band(4, 4), 3..4);
        assert_eq!(band(5, 4), 4..4);
    }

    #[test]
    fn test_row_span_is_band() {
        let core = DiagonalCore::new();
        assert_eq!(core.row_span(0, 3, 3), 0..2);
        assert_eq!(core.row_span(2, 3, 3), 1..3);
        assert_eq!(core.row_span(2, 3, 5), 1..4);
    }

    #[test]
    fn test_find_zero_ignores_off_band_cells() {
        // Zeroes off the band must never be reported
        let costs = vec![
            5.0, 1.0, 0.0, //
            0.0, 3.0, 2.0, //
            0.0, 4.0, 6.0,
        ];
        let mut core = DiagonalCore::new();
        core.clear_coverage(3, 3, true);

        assert_eq!(
            core.find_zero(&costs, 0),
            ZeroSearch::Found { row: 1, col: 0, next: 2 }
        );
        core.cover_row(1);
        match core.find_zero(&costs, 2) {
            ZeroSearch::Exhausted { vmin } => assert_eq!(vmin, 1.0),
            other => panic!("unexpected: {:?}", other),
        }
    }

    #[test]
    fn test_update_uncovered_touches_band_only() {
        let mut costs = vec![
            2.0, 2.0, FAR, //
            2.0, 2.0, 2.0, //
            FAR, 2.0, 2.0,
        ];
        let mut core = DiagonalCore::new();
        core.clear_coverage(3, 3, true);
        let mut noop = || {};
        core.update_uncovered(&mut costs, 2.0, &mut noop);

        assert_eq!(costs[2], FAR);
        assert_eq!(costs[6], FAR);
        assert_eq!(costs.iter().filter(|&&v| v == 0.0).count(), 7);
        assert_eq!(
            core.find_zero(&costs, 3),
            ZeroSearch::Found { row: 0, col: 0, next: 3 }
        );
    }

    #[test]
    fn test_uncover_column_checks_neighbouring_rows() {
        let costs = vec![
            1.0, 0.0, FAR, FAR, //
            FAR, 0.0, 1.0, FAR, //
            FAR, 0.0, 1.0, 1.0, //
            FAR, FAR, 1.0, 1.0,
        ];
        let mut core = DiagonalCore::new();
        core.clear_coverage(4, 4, true);
        core.count_coverage(&[4, 1, 4, 4]);
        core.cover_row(1);

        // Cursor at row 2: rows 0 and 1 were passed, row 1 is covered
        core.uncover_column(&costs, 1, 2);
        assert_eq!(
            core.find_zero(&costs, 2),
            ZeroSearch::Found { row: 0, col: 1, next: 2 }
        );
        assert_eq!(
            core.find_zero(&costs, 2),
            ZeroSearch::Found { row: 2, col: 1, next: 3 }
        );
    }

    #[test]
    fn test_count_coverage_invalidates() {
        let mut core = DiagonalCore::new();
        core.clear_coverage(3, 3, true);
        assert_eq!(core.covered_count(), 0);
        assert!(!core.count_coverage(&[0, 3, 2]));
        assert_eq!(core.covered_count(), 2);
        core.uncover_column(&[0.0; 9], 2, 0);
        assert_eq!(core.covered_count(), 1);
    }
}
