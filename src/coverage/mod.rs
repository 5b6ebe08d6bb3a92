//! Coverage cores for the Munkres driver.
//!
//! This module provides:
//! - `Core` trait - cover/uncover bookkeeping and resumable zero search
//! - `DenseCore` - every cell valid, bit-vector cover sets
//! - `BasicCore` - every cell valid, plain boolean arrays
//! - `DiagonalCore` - only the main diagonal +/- 1 column is valid
//! - `CoreEnum` / `CoreKind` - static dispatch and selection by name

mod traits;
mod scratch;
mod dense;
mod basic;
mod diagonal;
mod dispatch;

pub use traits::{Core, ZeroSearch};
pub use scratch::{LazyCache, ZeroBuffer};
pub use dense::DenseCore;
pub use basic::BasicCore;
pub use diagonal::{band, DiagonalCore};
pub use dispatch::{core_by_name, try_core_by_name, CoreEnum, CoreKind};
