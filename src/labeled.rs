//! Assignment over label-keyed candidate graphs.
//!
//! Candidates map each "from" label to the "to" labels it may take, with a
//! non-negative cost per edge. The graph is encoded as a dense matrix with
//! one row per "from" label and one column per distinct "to" label; absent
//! edges get a sentinel cost of twice the largest observed cost (1 when all
//! costs are 0) so they are only taken when nothing else fits. Pairs that
//! land on a sentinel cell are left out of the result.
//!
//! With as many "from" as "to" labels the matrix is square. Otherwise it is
//! rectangular, and the solver's transposition of tall matrices gives the
//! same optimum as padding it square over the "to" labels.

use std::collections::BTreeMap;
use std::fmt::Debug;
use std::hash::Hash;

use log::{debug, warn};

use crate::labels::LabelGroup;
use crate::solver::{RunOptions, Solver, SolverConfig};
use crate::{Error, Result};

/// Solver for label-keyed candidate graphs, reusing its label groups and
/// matrix buffer across calls.
#[derive(Debug, Clone)]
pub struct LabeledSolver<L> {
    solver: Solver,
    rows: LabelGroup<L>,
    cols: LabelGroup<L>,
    matrix: Vec<f64>,
    assignment: Vec<Option<usize>>,
}

impl<L: Ord + Hash + Clone + Debug> Default for LabeledSolver<L> {
    fn default() -> Self {
        Self::new(SolverConfig::default())
    }
}

impl<L: Ord + Hash + Clone + Debug> LabeledSolver<L> {
    pub fn new(config: SolverConfig) -> Self {
        Self {
            solver: Solver::new(config),
            rows: LabelGroup::new(),
            cols: LabelGroup::new(),
            matrix: Vec::new(),
            assignment: Vec::new(),
        }
    }

    /// The underlying index-based solver (e.g. for `last_stats`).
    pub fn solver(&self) -> &Solver {
        &self.solver
    }

    /// Assign "from" labels to "to" labels at minimum total cost.
    ///
    /// # Returns
    /// A one-to-one map from "from" labels to "to" labels. Labels that could
    /// only be matched through an absent edge are omitted.
    pub fn run_labels(&mut self, candidates: &BTreeMap<L, BTreeMap<L, f64>>) -> Result<BTreeMap<L, L>> {
        self.run_labels_with(candidates, None)
    }

    /// Like `run_labels`, with a cooperative yield callback.
    pub fn run_labels_with(
        &mut self,
        candidates: &BTreeMap<L, BTreeMap<L, f64>>,
        yield_fn: Option<&mut dyn FnMut()>,
    ) -> Result<BTreeMap<L, L>> {
        // Both groups are cleared on every exit path
        let mut rows = self.rows.scope();
        let mut cols = self.cols.scope();

        let mut max_cost = 0.0f64;
        for (from, tos) in candidates {
            rows.get_or_insert(from);
            for (to, &cost) in tos {
                if !cost.is_finite() || cost < 0.0 {
                    return Err(Error::InvalidCandidate(format!(
                        "edge {:?} -> {:?} has cost {}; costs must be finite and non-negative",
                        from, to, cost
                    )));
                }
                cols.get_or_insert(to);
                max_cost = max_cost.max(cost);
            }
        }

        if rows.is_empty() || cols.is_empty() {
            return Err(Error::MissingEndpoints(format!(
                "{} from labels and {} to labels; need at least one of each",
                rows.len(),
                cols.len()
            )));
        }

        let sentinel = if max_cost > 0.0 { 2.0 * max_cost } else { 1.0 };
        let ncols = cols.len();
        self.matrix.clear();
        self.matrix.resize(rows.len() * ncols, sentinel);
        for (from, tos) in candidates {
            let base = rows.get_or_insert(from) * ncols;
            for (to, &cost) in tos {
                self.matrix[base + cols.get_or_insert(to)] = cost;
            }
        }

        let mut opts = RunOptions::new().with_into(std::mem::take(&mut self.assignment));
        if let Some(f) = yield_fn {
            opts = opts.with_yield(f);
        }
        let assignment = self.solver.run_with(&self.matrix, ncols, opts)?;

        let mut result = BTreeMap::new();
        for (row, col) in assignment.iter().enumerate() {
            let (Some(col), Some(from)) = (*col, rows.label(row)) else {
                continue;
            };
            let Some(to) = cols.label(col) else {
                continue;
            };
            let is_edge = candidates.get(from).is_some_and(|tos| tos.contains_key(to));
            if is_edge {
                result.insert(from.clone(), to.clone());
            } else {
                warn!("row {} was only reachable through an absent edge; leaving it unassigned", row);
            }
        }

        debug!(
            "assigned {} of {} from labels over {} to labels",
            result.len(),
            rows.len(),
            ncols
        );
        self.assignment = assignment;
        Ok(result)
    }
}

/// Solve a label-keyed candidate graph with a default (dense core) solver.
pub fn run_labels<L: Ord + Hash + Clone + Debug>(
    candidates: &BTreeMap<L, BTreeMap<L, f64>>,
) -> Result<BTreeMap<L, L>> {
    LabeledSolver::default().run_labels(candidates)
}
