//! Counters collected during one solve.

use std::fmt;

/// Statistics for the most recent `Solver` run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SolveStats {
    /// Rows in the working matrix (after any transposition).
    pub rows: usize,
    /// Columns in the working matrix (after any transposition).
    pub cols: usize,
    /// Whether the input was transposed because it had more rows than columns.
    pub transposed: bool,
    /// Stars placed by the greedy initial pass.
    pub initial_stars: usize,
    /// Outer iterations that had to build an augmenting path.
    pub phases: u64,
    /// Zeroes primed during augmenting-path searches.
    pub primes: u64,
    /// Stars placed while walking augmenting paths.
    pub path_steps: u64,
    /// Cost-matrix adjustments (no uncovered zero was left).
    pub adjustments: u64,
    /// Calls made to the cooperative yield callback.
    pub yields: u64,
}

impl SolveStats {
    pub(crate) fn reset(&mut self, rows: usize, cols: usize, transposed: bool) {
        *self = Self {
            rows,
            cols,
            transposed,
            ..Self::default()
        };
    }
}

impl fmt::Display for SolveStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}x{}{} initial_stars={} phases={} primes={} path_steps={} adjustments={} yields={}",
            self.rows,
            self.cols,
            if self.transposed { " (transposed)" } else { "" },
            self.initial_stars,
            self.phases,
            self.primes,
            self.path_steps,
            self.adjustments,
            self.yields,
        )
    }
}
