//! Flat, row-major cost matrices.

use nalgebra::DMatrix;
use crate::{Error, Result};

/// Validate that `len` cells split evenly into rows of `ncols` columns.
///
/// # Returns
/// The number of rows.
pub fn validate_shape(len: usize, ncols: usize) -> Result<usize> {
    if ncols == 0 {
        return Err(Error::InvalidShape {
            expected: "ncols > 0".to_string(),
            got: "ncols = 0".to_string(),
        });
    }

    if len == 0 || len % ncols != 0 {
        return Err(Error::InvalidShape {
            expected: format!("a positive multiple of {} cells", ncols),
            got: format!("{} cells", len),
        });
    }

    Ok(len / ncols)
}

/// Reject NaN and infinite cells, reporting the first offender.
pub fn validate_finite(costs: &[f64], ncols: usize) -> Result<()> {
    match costs.iter().position(|v| !v.is_finite()) {
        Some(i) => Err(Error::NonFiniteCost {
            row: i / ncols,
            col: i % ncols,
            value: costs[i],
        }),
        None => Ok(()),
    }
}

/// Write the transpose of a `nrows x ncols` row-major buffer into `dst`.
///
/// `dst` is cleared first; its allocation is reused.
pub fn transpose_into(src: &[f64], nrows: usize, ncols: usize, dst: &mut Vec<f64>) {
    debug_assert_eq!(src.len(), nrows * ncols);
    dst.clear();
    dst.reserve(src.len());
    for col in 0..ncols {
        dst.extend((0..nrows).map(|row| src[row * ncols + col]));
    }
}

/// Total cost of an assignment over a row-major buffer.
///
/// Unassigned rows (`None`) contribute nothing.
pub fn assignment_cost(costs: &[f64], ncols: usize, assignment: &[Option<usize>]) -> f64 {
    assignment
        .iter()
        .enumerate()
        .filter_map(|(row, col)| col.map(|col| costs[row * ncols + col]))
        .sum()
}

/// Whether `assignment` is a complete one-to-one matching for a matrix with
/// `assignment.len()` rows and `ncols` columns: every column in range, no
/// column used twice, and `min(nrows, ncols)` rows assigned.
pub fn is_permutation(assignment: &[Option<usize>], ncols: usize) -> bool {
    let mut used = vec![false; ncols];
    let mut assigned = 0;
    for &col in assignment.iter().flatten() {
        if col >= ncols || used[col] {
            return false;
        }
        used[col] = true;
        assigned += 1;
    }
    assigned == assignment.len().min(ncols)
}

/// A rectangular table of assignment costs (rows = items, columns = slots).
#[derive(Debug, Clone, PartialEq)]
pub struct CostMatrix {
    data: Vec<f64>,
    ncols: usize,
}

impl CostMatrix {
    /// Create a cost matrix from a flat row-major buffer.
    ///
    /// # Arguments
    /// * `data` - Row-major cells, `nrows * ncols` of them
    /// * `ncols` - Number of columns
    pub fn new(data: Vec<f64>, ncols: usize) -> Result<Self> {
        validate_shape(data.len(), ncols)?;
        Ok(Self { data, ncols })
    }

    /// Create a cost matrix from nested rows, which must all have the same length.
    pub fn from_rows(rows: &[Vec<f64>]) -> Result<Self> {
        let ncols = rows.first().map_or(0, Vec::len);
        if let Some((i, row)) = rows.iter().enumerate().find(|(_, row)| row.len() != ncols) {
            return Err(Error::InvalidShape {
                expected: format!("rows of length {}", ncols),
                got: format!("row {} of length {}", i, row.len()),
            });
        }

        Self::new(rows.concat(), ncols)
    }

    /// Create a cost matrix from an nalgebra matrix (which is column-major).
    pub fn from_dmatrix(matrix: &DMatrix<f64>) -> Result<Self> {
        let (nrows, ncols) = matrix.shape();
        let data = (0..nrows)
            .flat_map(|row| (0..ncols).map(move |col| matrix[(row, col)]))
            .collect();
        Self::new(data, ncols)
    }

    /// Convert to an nalgebra matrix.
    pub fn to_dmatrix(&self) -> DMatrix<f64> {
        DMatrix::from_row_slice(self.nrows(), self.ncols, &self.data)
    }

    #[inline]
    pub fn nrows(&self) -> usize {
        self.data.len() / self.ncols
    }

    #[inline]
    pub fn ncols(&self) -> usize {
        self.ncols
    }

    #[inline]
    pub fn is_square(&self) -> bool {
        self.nrows() == self.ncols
    }

    /// Row-major view of all cells.
    #[inline]
    pub fn as_slice(&self) -> &[f64] {
        &self.data
    }

    /// Cell at (`row`, `col`).
    ///
    /// # Panics
    /// Panics if the cell lies outside the matrix.
    #[inline]
    pub fn get(&self, row: usize, col: usize) -> f64 {
        assert!(col < self.ncols, "column {} out of range", col);
        self.data[row * self.ncols + col]
    }

    /// One row as a slice.
    #[inline]
    pub fn row(&self, row: usize) -> &[f64] {
        let start = row * self.ncols;
        &self.data[start..start + self.ncols]
    }

    /// The transposed matrix (`ncols x nrows`).
    pub fn transposed(&self) -> Self {
        let mut data = Vec::new();
        transpose_into(&self.data, self.nrows(), self.ncols, &mut data);
        Self {
            data,
            ncols: self.nrows(),
        }
    }

    /// Total cost of `assignment`, where `assignment[row]` is the column given to `row`.
    pub fn assignment_cost(&self, assignment: &[Option<usize>]) -> f64 {
        assignment_cost(&self.data, self.ncols, assignment)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // ===== Shape Validation =====

    #[test]
    fn test_validate_shape_square() {
        assert_eq!(validate_shape(9, 3).unwrap(), 3);
    }

    #[test]
    fn test_validate_shape_rectangular() {
        assert_eq!(validate_shape(6, 3).unwrap(), 2);
        assert_eq!(validate_shape(6, 2).unwrap(), 3);
    }

    #[test]
    fn test_validate_shape_not_multiple() {
        let err = validate_shape(7, 3).unwrap_err();
        assert!(matches!(err, Error::InvalidShape { .. }));
        assert!(err.to_string().contains("7 cells"));
    }

    #[test]
    fn test_validate_shape_empty() {
        assert!(validate_shape(0, 3).is_err());
        assert!(validate_shape(3, 0).is_err());
    }

    #[test]
    fn test_validate_finite() {
        assert!(validate_finite(&[1.0, 2.0, -3.0, 0.0], 2).is_ok());

        let err = validate_finite(&[1.0, 2.0, f64::NAN, 0.0], 2).unwrap_err();
        match err {
            Error::NonFiniteCost { row, col, value } => {
                assert_eq!((row, col), (1, 0));
                assert!(value.is_nan());
            }
            other => panic!("unexpected error: {:?}", other),
        }

        assert!(validate_finite(&[f64::INFINITY], 1).is_err());
    }

    // ===== Transposition =====

    #[test]
    fn test_transpose_into() {
        // 2x3 -> 3x2
        let src = [1.0, 2.0, 3.0, 4.0, 5.0, 6.0];
        let mut dst = vec![99.0; 10];
        transpose_into(&src, 2, 3, &mut dst);
        assert_eq!(dst, vec![1.0, 4.0, 2.0, 5.0, 3.0, 6.0]);
    }

    #[test]
    fn test_transposed_matrix() {
        let m = CostMatrix::new(vec![1.0, 2.0, 3.0, 4.0, 5.0, 6.0], 3).unwrap();
        let t = m.transposed();
        assert_eq!(t.nrows(), 3);
        assert_eq!(t.ncols(), 2);
        for row in 0..2 {
            for col in 0..3 {
                assert_eq!(m.get(row, col), t.get(col, row));
            }
        }
    }

    // ===== Construction =====

    #[test]
    fn test_from_rows() {
        let m = CostMatrix::from_rows(&[vec![1.0, 2.0], vec![3.0, 4.0], vec![5.0, 6.0]]).unwrap();
        assert_eq!(m.nrows(), 3);
        assert_eq!(m.ncols(), 2);
        assert_eq!(m.row(1), &[3.0, 4.0]);
        assert!(!m.is_square());
    }

    #[test]
    fn test_from_rows_ragged() {
        let err = CostMatrix::from_rows(&[vec![1.0, 2.0], vec![3.0]]).unwrap_err();
        assert!(err.to_string().contains("row 1 of length 1"));
    }

    #[test]
    fn test_from_rows_empty() {
        assert!(CostMatrix::from_rows(&[]).is_err());
    }

    #[test]
    fn test_dmatrix_conversion() {
        let dm = DMatrix::from_row_slice(2, 3, &[1.0, 2.0, 3.0, 4.0, 5.0, 6.0]);
        let m = CostMatrix::from_dmatrix(&dm).unwrap();
        assert_eq!(m.as_slice(), &[1.0, 2.0, 3.0, 4.0, 5.0, 6.0]);
        assert_eq!(m.to_dmatrix(), dm);
    }

    // ===== Assignment Cost =====

    #[test]
    fn test_assignment_cost() {
        let m = CostMatrix::new(vec![4.0, 1.0, 3.0, 2.0, 0.0, 5.0, 3.0, 2.0, 2.0], 3).unwrap();
        assert_eq!(m.assignment_cost(&[Some(1), Some(0), Some(2)]), 5.0);
        assert_eq!(m.assignment_cost(&[Some(1), None, Some(2)]), 3.0);
    }

    #[test]
    fn test_is_permutation() {
        assert!(is_permutation(&[Some(1), Some(0), Some(2)], 3));
        assert!(is_permutation(&[Some(0), None, Some(1)], 2));
        assert!(is_permutation(&[Some(2), Some(0)], 3));
        assert!(!is_permutation(&[Some(1), Some(1)], 2));
        assert!(!is_permutation(&[Some(0), None], 2));
        assert!(!is_permutation(&[Some(3)], 3));
    }
}
