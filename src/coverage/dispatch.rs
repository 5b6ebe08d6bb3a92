//! Enum-based core dispatch for static (non-virtual) function calls.
//!
//! `CoreEnum` wraps every coverage core so the solver's hot loops dispatch
//! through a `match` instead of a vtable. `CoreKind` is the serialisable
//! selector used by configuration.

use std::fmt;
use std::ops::Range;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::basic::BasicCore;
use super::dense::DenseCore;
use super::diagonal::DiagonalCore;
use super::traits::{Core, ZeroSearch};
use crate::{Error, Result};

/// Which coverage core a solver uses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CoreKind {
    /// Every cell valid, bit-vector cover sets.
    #[default]
    Dense,
    /// Every cell valid, plain boolean cover arrays.
    Basic,
    /// Only the main diagonal and its two neighbours are valid.
    Diagonal,
}

impl CoreKind {
    pub const ALL: [CoreKind; 3] = [CoreKind::Dense, CoreKind::Basic, CoreKind::Diagonal];

    /// Build a fresh core of this kind.
    pub fn create(self) -> CoreEnum {
        match self {
            CoreKind::Dense => CoreEnum::Dense(DenseCore::new()),
            CoreKind::Basic => CoreEnum::Basic(BasicCore::new()),
            CoreKind::Diagonal => CoreEnum::Diagonal(DiagonalCore::new()),
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            CoreKind::Dense => "dense",
            CoreKind::Basic => "basic",
            CoreKind::Diagonal => "diagonal",
        }
    }
}

impl fmt::Display for CoreKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for CoreKind {
    type Err = Error;

    fn from_str(name: &str) -> Result<Self> {
        match name {
            "dense" | "bitvector" => Ok(CoreKind::Dense),
            "basic" => Ok(CoreKind::Basic),
            "diagonal" | "banded" => Ok(CoreKind::Diagonal),
            _ => Err(Error::UnknownCore(format!(
                "{}. Supported: dense, bitvector, basic, diagonal, banded",
                name
            ))),
        }
    }
}

/// Enum-based core for static dispatch.
#[derive(Debug, Clone)]
pub enum CoreEnum {
    Dense(DenseCore),
    Basic(BasicCore),
    Diagonal(DiagonalCore),
}

impl Default for CoreEnum {
    fn default() -> Self {
        CoreKind::default().create()
    }
}

impl CoreEnum {
    pub fn kind(&self) -> CoreKind {
        match self {
            CoreEnum::Dense(_) => CoreKind::Dense,
            CoreEnum::Basic(_) => CoreKind::Basic,
            CoreEnum::Diagonal(_) => CoreKind::Diagonal,
        }
    }
}

impl Core for CoreEnum {
    #[inline(always)]
    fn row_span(&self, row: usize, nrows: usize, ncols: usize) -> Range<usize> {
        match self {
            CoreEnum::Dense(c) => c.row_span(row, nrows, ncols),
            CoreEnum::Basic(c) => c.row_span(row, nrows, ncols),
            CoreEnum::Diagonal(c) => c.row_span(row, nrows, ncols),
        }
    }

    #[inline(always)]
    fn clear_coverage(&mut self, nrows: usize, ncols: usize, is_first: bool) {
        match self {
            CoreEnum::Dense(c) => c.clear_coverage(nrows, ncols, is_first),
            CoreEnum::Basic(c) => c.clear_coverage(nrows, ncols, is_first),
            CoreEnum::Diagonal(c) => c.clear_coverage(nrows, ncols, is_first),
        }
    }

    #[inline(always)]
    fn count_coverage(&mut self, row_star: &[usize]) -> bool {
        match self {
            CoreEnum::Dense(c) => c.count_coverage(row_star),
            CoreEnum::Basic(c) => c.count_coverage(row_star),
            CoreEnum::Diagonal(c) => c.count_coverage(row_star),
        }
    }

    #[inline(always)]
    fn find_zero(&mut self, costs: &[f64], from: usize) -> ZeroSearch {
        match self {
            CoreEnum::Dense(c) => c.find_zero(costs, from),
            CoreEnum::Basic(c) => c.find_zero(costs, from),
            CoreEnum::Diagonal(c) => c.find_zero(costs, from),
        }
    }

    #[inline(always)]
    fn cover_row(&mut self, row: usize) {
        match self {
            CoreEnum::Dense(c) => c.cover_row(row),
            CoreEnum::Basic(c) => c.cover_row(row),
            CoreEnum::Diagonal(c) => c.cover_row(row),
        }
    }

    #[inline(always)]
    fn uncover_column(&mut self, costs: &[f64], col: usize, from: usize) {
        match self {
            CoreEnum::Dense(c) => c.uncover_column(costs, col, from),
            CoreEnum::Basic(c) => c.uncover_column(costs, col, from),
            CoreEnum::Diagonal(c) => c.uncover_column(costs, col, from),
        }
    }

    #[inline(always)]
    fn update_covered(&mut self, costs: &mut [f64], vmin: f64, yield_fn: &mut dyn FnMut()) {
        match self {
            CoreEnum::Dense(c) => c.update_covered(costs, vmin, yield_fn),
            CoreEnum::Basic(c) => c.update_covered(costs, vmin, yield_fn),
            CoreEnum::Diagonal(c) => c.update_covered(costs, vmin, yield_fn),
        }
    }

    #[inline(always)]
    fn update_uncovered(&mut self, costs: &mut [f64], vmin: f64, yield_fn: &mut dyn FnMut()) {
        match self {
            CoreEnum::Dense(c) => c.update_uncovered(costs, vmin, yield_fn),
            CoreEnum::Basic(c) => c.update_uncovered(costs, vmin, yield_fn),
            CoreEnum::Diagonal(c) => c.update_uncovered(costs, vmin, yield_fn),
        }
    }

    #[inline(always)]
    fn is_row_covered(&self, row: usize) -> bool {
        match self {
            CoreEnum::Dense(c) => c.is_row_covered(row),
            CoreEnum::Basic(c) => c.is_row_covered(row),
            CoreEnum::Diagonal(c) => c.is_row_covered(row),
        }
    }

    #[inline(always)]
    fn is_column_covered(&self, col: usize) -> bool {
        match self {
            CoreEnum::Dense(c) => c.is_column_covered(col),
            CoreEnum::Basic(c) => c.is_column_covered(col),
            CoreEnum::Diagonal(c) => c.is_column_covered(col),
        }
    }

    #[inline(always)]
    fn covered_count(&mut self) -> usize {
        match self {
            CoreEnum::Dense(c) => c.covered_count(),
            CoreEnum::Basic(c) => c.covered_count(),
            CoreEnum::Diagonal(c) => c.covered_count(),
        }
    }
}

/// Create a core by name (static dispatch version).
///
/// # Panics
/// Panics if the core name is not recognized.
pub fn core_by_name(name: &str) -> CoreEnum {
    match try_core_by_name(name) {
        Ok(core) => core,
        Err(_) => panic!("Unknown coverage core: {}", name),
    }
}

/// Create a core by name, returning a Result instead of panicking.
pub fn try_core_by_name(name: &str) -> Result<CoreEnum> {
    name.parse::<CoreKind>().map(CoreKind::create)
}
