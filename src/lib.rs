//! # Munkres - Assignment Problem Solver
//!
//! Hungarian (Kuhn-Munkres) algorithm for the linear assignment problem,
//! with interchangeable coverage cores chosen by the sparsity shape of the
//! cost matrix.
//!
//! ## Features
//!
//! - Four-phase Munkres driver over a flat, row-major cost buffer
//! - Dense (bit-vector), Basic (plain arrays) and Diagonal (banded) cores
//! - Rectangular matrices in either orientation
//! - Cooperative yield callback for frame-stepped schedulers
//! - Label-keyed candidate graphs via `run_labels`
//! - Thresholded matching over `nalgebra` matrices
//!
//! ## Example
//!
//! ```rust
//! use munkres_rs::{Solver, SolverConfig, CoreKind};
//!
//! let costs = [
//!     4.0, 1.0, 3.0,
//!     2.0, 0.0, 5.0,
//!     3.0, 2.0, 2.0,
//! ];
//! let mut solver = Solver::new(SolverConfig::new(CoreKind::Dense));
//! let assignment = solver.run(&costs, 3).unwrap();
//! assert_eq!(assignment, vec![Some(1), Some(0), Some(2)]);
//! ```

// Public modules
pub mod coverage;
pub mod labeled;
pub mod labels;
pub mod matching;
pub mod matrix;
pub mod solver;
pub mod stats;

// Re-exports for convenience
pub use coverage::{core_by_name, try_core_by_name, Core, CoreEnum, CoreKind};
pub use labeled::{run_labels, LabeledSolver};
pub use labels::{LabelGroup, LabelScope};
pub use matrix::{assignment_cost, is_permutation, CostMatrix};
pub use solver::{run, run_with, to_one_based, RunOptions, Solver, SolverConfig};
pub use stats::SolveStats;

// Error types
pub use crate::error::{Error, Result};

mod error {
    use thiserror::Error;

    /// Errors that can occur while building or solving an assignment problem
    #[derive(Error, Debug, Clone, PartialEq)]
    pub enum Error {
        #[error("Invalid cost matrix shape: expected {expected}, got {got}")]
        InvalidShape { expected: String, got: String },

        #[error("Non-finite cost {value} at row {row}, column {col}")]
        NonFiniteCost { row: usize, col: usize, value: f64 },

        #[error("No feasible assignment: {0}")]
        Infeasible(String),

        #[error("Unknown coverage core: {0}")]
        UnknownCore(String),

        #[error("Missing graph endpoints: {0}")]
        MissingEndpoints(String),

        #[error("Invalid candidate: {0}")]
        InvalidCandidate(String),

        #[error("Invalid configuration: {0}")]
        InvalidConfig(String),
    }

    /// Result type for solver operations
    pub type Result<T> = std::result::Result<T, Error>;
}
