//! Pixel interpolation kernels for perspective resampling.
//!
//! Every kernel reconstructs one 8-bit sample from the 2x2 cell surrounding an
//! inverse-mapped source coordinate.
//!
//! # Interpolation Modes
//!
//! - **Nearest**: picks the closest of the four samples (no blending)
//! - **Bilinear**: linear blend along x, then along y
//! - **Bicubic**: four-corner weighted sum, numerically the bilinear blend
//!
//! Custom kernels plug into the resampling loop by implementing
//! [`InterpolationKernel`].

mod bicubic;
mod bilinear;
mod interpolate;
mod nearest;

pub use interpolate::{Bicubic, Bilinear, InterpolationKernel, InterpolationMode, Nearest};
