//! Thresholded row-to-column matching over `nalgebra` matrices.

use log::debug;
use nalgebra::DMatrix;

use crate::matrix::CostMatrix;
use crate::solver::Solver;
use crate::{Error, Result};

/// Represents a match between a row index and column index.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Assignment {
    pub row_idx: usize,
    pub col_idx: usize,
}

/// Result of a thresholded assignment.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AssignmentResult {
    /// Kept (row, col) pairs in row order
    pub assignments: Vec<Assignment>,
    /// Indices of rows that were not matched
    pub unmatched_rows: Vec<usize>,
    /// Indices of columns that were not matched
    pub unmatched_cols: Vec<usize>,
}

impl AssignmentResult {
    fn unmatched(nrows: usize, ncols: usize) -> Self {
        Self {
            assignments: Vec::new(),
            unmatched_rows: (0..nrows).collect(),
            unmatched_cols: (0..ncols).collect(),
        }
    }
}

/// Validate a cost matrix for matching.
///
/// NaN and negative infinity are rejected. Positive infinity is allowed and
/// marks a pair that may never be matched.
pub fn validate_cost_matrix(matrix: &DMatrix<f64>) -> Result<()> {
    for row in 0..matrix.nrows() {
        for col in 0..matrix.ncols() {
            let value = matrix[(row, col)];
            if value.is_nan() || value == f64::NEG_INFINITY {
                return Err(Error::NonFiniteCost { row, col, value });
            }
        }
    }
    Ok(())
}

/// Match rows to columns at minimum total cost, keeping only pairs whose cost
/// is at most `max_cost`.
///
/// # Arguments
/// * `matrix` - Cost matrix (rows x columns), `+inf` for forbidden pairs
/// * `max_cost` - Largest cost a kept pair may have
///
/// # Returns
/// `AssignmentResult` with the kept pairs and the rows and columns left over.
pub fn linear_sum_assignment(matrix: &DMatrix<f64>, max_cost: f64) -> Result<AssignmentResult> {
    linear_sum_assignment_with(&mut Solver::default(), matrix, max_cost)
}

/// Like `linear_sum_assignment`, reusing `solver` and its configured core.
///
/// Cells above `max_cost` (and `+inf` cells) are replaced by one gate cost
/// larger than every admissible cell before solving, so a gated pair is only
/// chosen when a row or column has nothing admissible left. Gated pairs are
/// reported as unmatched.
pub fn linear_sum_assignment_with(
    solver: &mut Solver,
    matrix: &DMatrix<f64>,
    max_cost: f64,
) -> Result<AssignmentResult> {
    if max_cost.is_nan() {
        return Err(Error::InvalidConfig("max_cost must not be NaN".to_string()));
    }
    validate_cost_matrix(matrix)?;

    let (nrows, ncols) = matrix.shape();
    if nrows == 0 || ncols == 0 {
        return Ok(AssignmentResult::unmatched(nrows, ncols));
    }

    let admissible = |cost: f64| cost.is_finite() && cost <= max_cost;
    let Some(largest) = matrix
        .iter()
        .copied()
        .filter(|&cost| admissible(cost))
        .reduce(f64::max)
    else {
        return Ok(AssignmentResult::unmatched(nrows, ncols));
    };

    let gate = 2.0 * largest.abs() + 1.0;
    let gated = matrix.map(|cost| if admissible(cost) { cost } else { gate });
    let assignment = solver.run_matrix(&CostMatrix::from_dmatrix(&gated)?)?;

    let assignments: Vec<Assignment> = assignment
        .iter()
        .enumerate()
        .filter_map(|(row_idx, col)| {
            col.filter(|&col_idx| admissible(matrix[(row_idx, col_idx)]))
                .map(|col_idx| Assignment { row_idx, col_idx })
        })
        .collect();

    let matched_rows: Vec<usize> = assignments.iter().map(|a| a.row_idx).collect();
    let matched_cols: Vec<usize> = assignments.iter().map(|a| a.col_idx).collect();
    debug!(
        "matched {} pairs in {}x{} matrix (max_cost {})",
        assignments.len(),
        nrows,
        ncols,
        max_cost
    );

    Ok(AssignmentResult {
        unmatched_rows: get_unmatched(nrows, &matched_rows),
        unmatched_cols: get_unmatched(ncols, &matched_cols),
        assignments,
    })
}

/// Get unmatched indices from a match result.
pub fn get_unmatched(total: usize, matched: &[usize]) -> Vec<usize> {
    let mut is_matched = vec![false; total];
    for &idx in matched {
        is_matched[idx] = true;
    }
    (0..total).filter(|&i| !is_matched[i]).collect()
}
