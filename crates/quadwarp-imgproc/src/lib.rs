#![deny(missing_docs)]
#![doc = env!("CARGO_PKG_DESCRIPTION")]

/// Error types for the resampling operations.
pub mod error;

/// background fill policies.
pub mod fill;

/// utilities for interpolation.
pub mod interpolation;

/// module containing parallelization utilities.
pub mod parallel;

/// image geometric transformations module.
pub mod warp;

pub use crate::error::WarpError;
