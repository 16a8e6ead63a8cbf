//! Perspective resampling of rasters.
//!
//! Re-exports the workspace crates under short names:
//!
//! - [`geometry`]: projective matrices, affine transforms, quadrangle mapping
//! - [`image`]: rasters, color models, allocation and conversion capabilities
//! - [`imgproc`]: interpolation kernels, the resampling loop and `TransformOp`

#[doc(inline)]
pub use quadwarp_geometry as geometry;

#[doc(inline)]
pub use quadwarp_image as image;

#[doc(inline)]
pub use quadwarp_imgproc as imgproc;
