//! Munkres assignment driver.
//!
//! The driver owns every scratch buffer of a solve (working cost matrix,
//! star and prime tables, coverage core) and resets them on entry, so one
//! `Solver` can be reused across calls without reallocating. A `Solver` is
//! not shared between threads; build one per thread.
//!
//! Phases:
//! 1. Copy the costs into scratch, transposing when there are more rows
//!    than columns so the working matrix always has `nrows <= ncols`.
//! 2. Subtract each row's minimum from the row.
//! 3. Greedily star the first free zero in each row.
//! 4. Cover starred columns; stop once `nrows` columns are covered.
//! 5. Prime uncovered zeroes. A prime in a starred row covers the row and
//!    uncovers the star's column; a prime in an unstarred row starts an
//!    augmenting path, which flips primes to stars and goes back to 4.
//! 6. With no uncovered zero left, add the smallest uncovered value to
//!    doubly covered cells and subtract it from doubly uncovered cells.

use log::{debug, trace};
use serde::{Deserialize, Serialize};

use crate::coverage::{Core, CoreEnum, CoreKind, ZeroSearch};
use crate::matrix::{transpose_into, validate_finite, validate_shape, CostMatrix};
use crate::stats::SolveStats;
use crate::{Error, Result};

/// Configuration for the solver.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct SolverConfig {
    /// Coverage core used for cover bookkeeping and zero search.
    pub core: CoreKind,
}

impl SolverConfig {
    /// Create a configuration that uses the given core.
    pub fn new(core: CoreKind) -> Self {
        Self { core }
    }

    /// Create a configuration from a core name ("dense", "basic", "diagonal").
    pub fn from_core_name(name: &str) -> Result<Self> {
        Ok(Self::new(name.parse()?))
    }
}

/// Per-call options for `Solver::run_with`.
#[derive(Default)]
pub struct RunOptions<'a> {
    /// Output buffer to reuse. It is cleared and refilled with one entry per row.
    pub into: Option<Vec<Option<usize>>>,

    /// Cooperative yield callback, invoked once per outer iteration and, for
    /// the dense core, once per matrix-adjustment pass.
    pub yield_fn: Option<&'a mut dyn FnMut()>,
}

impl<'a> RunOptions<'a> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Reuse `out` for the result.
    pub fn with_into(mut self, out: Vec<Option<usize>>) -> Self {
        self.into = Some(out);
        self
    }

    /// Call `yield_fn` between algorithm steps.
    pub fn with_yield(mut self, yield_fn: &'a mut dyn FnMut()) -> Self {
        self.yield_fn = Some(yield_fn);
        self
    }
}

/// Hungarian-algorithm solver owning its scratch state.
///
/// # Example
///
/// ```rust
/// use munkres_rs::{Solver, SolverConfig, CoreKind};
///
/// let mut solver = Solver::new(SolverConfig::new(CoreKind::Basic));
/// // 2 rows, 3 columns
/// let assignment = solver.run(&[1.0, 2.0, 3.0, 4.0, 5.0, 6.0], 3).unwrap();
/// assert_eq!(assignment, vec![Some(0), Some(1)]);
/// ```
#[derive(Debug, Clone)]
pub struct Solver {
    config: SolverConfig,
    core: CoreEnum,

    // Working matrix, always nrows <= ncols
    costs: Vec<f64>,
    nrows: usize,
    ncols: usize,

    // row_star[row] = starred column, or ncols
    row_star: Vec<usize>,
    // col_star[col] = starred row, or nrows
    col_star: Vec<usize>,
    // primes[row] = primed column, or ncols; primed_rows lists the set entries
    primes: Vec<usize>,
    primed_rows: Vec<usize>,

    stats: SolveStats,
}

impl Default for Solver {
    fn default() -> Self {
        Self::new(SolverConfig::default())
    }
}

impl Solver {
    /// Create a solver with the given configuration.
    pub fn new(config: SolverConfig) -> Self {
        Self::with_core(config.core.create())
    }

    /// Create a solver around an already built core.
    pub fn with_core(core: CoreEnum) -> Self {
        Self {
            config: SolverConfig::new(core.kind()),
            core,
            costs: Vec::new(),
            nrows: 0,
            ncols: 0,
            row_star: Vec::new(),
            col_star: Vec::new(),
            primes: Vec::new(),
            primed_rows: Vec::new(),
            stats: SolveStats::default(),
        }
    }

    pub fn config(&self) -> &SolverConfig {
        &self.config
    }

    pub fn core_kind(&self) -> CoreKind {
        self.core.kind()
    }

    /// Statistics of the most recent run.
    pub fn last_stats(&self) -> &SolveStats {
        &self.stats
    }

    /// Solve a row-major cost matrix with `ncols` columns.
    ///
    /// # Returns
    /// One entry per row: `Some(col)` for the assigned column, `None` when the
    /// matrix has more rows than columns and the row was left out.
    pub fn run(&mut self, costs: &[f64], ncols: usize) -> Result<Vec<Option<usize>>> {
        self.run_with(costs, ncols, RunOptions::default())
    }

    /// Solve a `CostMatrix`.
    pub fn run_matrix(&mut self, matrix: &CostMatrix) -> Result<Vec<Option<usize>>> {
        self.run(matrix.as_slice(), matrix.ncols())
    }

    /// Solve with per-call options (output reuse, cooperative yield).
    ///
    /// The input slice is never modified; the solve runs on an internal copy.
    pub fn run_with(
        &mut self,
        costs: &[f64],
        ncols: usize,
        opts: RunOptions<'_>,
    ) -> Result<Vec<Option<usize>>> {
        let nrows = validate_shape(costs.len(), ncols)?;
        validate_finite(costs, ncols)?;

        let RunOptions { into, yield_fn } = opts;
        let mut out = into.unwrap_or_default();

        let mut no_yield = || {};
        let user_yield: &mut dyn FnMut() = match yield_fn {
            Some(f) => f,
            None => &mut no_yield,
        };
        let mut yields = 0u64;
        let mut counted_yield = || {
            yields += 1;
            user_yield();
        };

        let transposed = ncols < nrows;
        self.load(costs, nrows, ncols, transposed);
        debug!(
            "solving {}x{} cost matrix with {} core{}",
            nrows,
            ncols,
            self.core.kind(),
            if transposed { " (transposed)" } else { "" }
        );

        self.reduce_rows();
        self.star_zeroes();
        let solved = self.solve(&mut counted_yield);
        self.stats.yields = yields;
        solved?;

        self.extract(&mut out, transposed);
        debug!("solved: {}", self.stats);
        Ok(out)
    }

    /// Copy the input into scratch and reset the star/prime tables.
    fn load(&mut self, costs: &[f64], nrows: usize, ncols: usize, transposed: bool) {
        if transposed {
            transpose_into(costs, nrows, ncols, &mut self.costs);
            self.nrows = ncols;
            self.ncols = nrows;
        } else {
            self.costs.clear();
            self.costs.extend_from_slice(costs);
            self.nrows = nrows;
            self.ncols = ncols;
        }

        self.row_star.clear();
        self.row_star.resize(self.nrows, self.ncols);
        self.col_star.clear();
        self.col_star.resize(self.ncols, self.nrows);
        self.primes.clear();
        self.primes.resize(self.nrows, self.ncols);
        self.primed_rows.clear();

        self.stats.reset(self.nrows, self.ncols, transposed);
    }

    fn reduce_rows(&mut self) {
        let (nrows, ncols) = (self.nrows, self.ncols);
        for row in 0..nrows {
            let span = self.core.row_span(row, nrows, ncols);
            let base = row * ncols;
            let cells = &mut self.costs[base + span.start..base + span.end];
            let min = cells.iter().copied().fold(f64::INFINITY, f64::min);
            for cell in cells.iter_mut() {
                *cell -= min;
            }
        }
    }

    /// Star the first zero of each row whose column has no star yet.
    fn star_zeroes(&mut self) {
        let (nrows, ncols) = (self.nrows, self.ncols);
        for row in 0..nrows {
            let base = row * ncols;
            let free = self
                .core
                .row_span(row, nrows, ncols)
                .find(|&col| self.costs[base + col] == 0.0 && self.col_star[col] == nrows);
            if let Some(col) = free {
                self.star(row, col);
                self.stats.initial_stars += 1;
            }
        }
    }

    fn solve(&mut self, yield_fn: &mut dyn FnMut()) -> Result<()> {
        let mut is_first = true;
        loop {
            yield_fn();
            self.core.clear_coverage(self.nrows, self.ncols, is_first);
            is_first = false;

            if self.core.count_coverage(&self.row_star) {
                return Ok(());
            }

            self.stats.phases += 1;
            trace!(
                "phase {}: {} of {} columns covered",
                self.stats.phases,
                self.core.covered_count(),
                self.nrows
            );
            self.augment(yield_fn)?;
            debug_assert!(self.stars_consistent());
        }
    }

    /// Prime zeroes until one starts an augmenting path, then flip it.
    fn augment(&mut self, yield_fn: &mut dyn FnMut()) -> Result<()> {
        let (nrows, ncols) = (self.nrows, self.ncols);
        let mut from = 0;
        loop {
            match self.core.find_zero(&self.costs, from) {
                ZeroSearch::Found { row, col, next } => {
                    from = next;
                    self.prime(row, col);

                    let star_col = self.row_star[row];
                    if star_col < ncols {
                        self.core.cover_row(row);
                        self.core.uncover_column(&self.costs, star_col, from);
                    } else {
                        self.flip_path(row, col);
                        self.clear_primes();
                        return Ok(());
                    }
                }
                ZeroSearch::Exhausted { vmin } => {
                    if !vmin.is_finite() {
                        return Err(Error::Infeasible(format!(
                            "no uncovered cell left in {}x{} matrix with {} core",
                            nrows,
                            ncols,
                            self.core.kind()
                        )));
                    }

                    self.stats.adjustments += 1;
                    trace!("adjusting uncovered cells by {}", vmin);
                    self.core.update_covered(&mut self.costs, vmin, yield_fn);
                    self.core.update_uncovered(&mut self.costs, vmin, yield_fn);
                    // every new uncovered zero is buffered by the core
                    from = nrows;
                }
            }
        }
    }

    #[inline]
    fn star(&mut self, row: usize, col: usize) {
        self.row_star[row] = col;
        self.col_star[col] = row;
    }

    #[inline]
    fn prime(&mut self, row: usize, col: usize) {
        debug_assert_ne!(self.row_star[row], col);
        self.primes[row] = col;
        self.primed_rows.push(row);
        self.stats.primes += 1;
    }

    /// Walk the alternating path from the prime at (`row`, `col`): star each
    /// prime, and continue from the prime in the row whose star it displaced.
    fn flip_path(&mut self, mut row: usize, mut col: usize) {
        loop {
            let displaced = self.col_star[col];
            self.star(row, col);
            self.stats.path_steps += 1;
            if displaced == self.nrows {
                return;
            }
            row = displaced;
            col = self.primes[row];
            debug_assert!(col < self.ncols, "starred row {} on the path has no prime", row);
        }
    }

    fn clear_primes(&mut self) {
        for row in self.primed_rows.drain(..) {
            self.primes[row] = self.ncols;
        }
    }

    fn stars_consistent(&self) -> bool {
        let rows_ok = self
            .row_star
            .iter()
            .enumerate()
            .all(|(row, &col)| col == self.ncols || self.col_star[col] == row);
        let cols_ok = self
            .col_star
            .iter()
            .enumerate()
            .all(|(col, &row)| row == self.nrows || self.row_star[row] == col);
        rows_ok && cols_ok
    }

    /// Read the stars back in the caller's orientation.
    fn extract(&self, out: &mut Vec<Option<usize>>, transposed: bool) {
        out.clear();
        if transposed {
            // working rows are the caller's columns
            out.resize(self.ncols, None);
            for (col, &row) in self.row_star.iter().enumerate() {
                if row < self.ncols {
                    out[row] = Some(col);
                }
            }
        } else {
            out.extend(
                self.row_star
                    .iter()
                    .map(|&col| if col < self.ncols { Some(col) } else { None }),
            );
        }
    }
}

/// Solve with a default (dense core) solver.
pub fn run(costs: &[f64], ncols: usize) -> Result<Vec<Option<usize>>> {
    Solver::default().run(costs, ncols)
}

/// Solve with a default (dense core) solver and per-call options.
pub fn run_with(costs: &[f64], ncols: usize, opts: RunOptions<'_>) -> Result<Vec<Option<usize>>> {
    Solver::default().run_with(costs, ncols, opts)
}

/// Convert an assignment to 1-based column numbers, with 0 for unassigned rows.
pub fn to_one_based(assignment: &[Option<usize>]) -> Vec<usize> {
    assignment
        .iter()
        .map(|col| col.map_or(0, |col| col + 1))
        .collect()
}
