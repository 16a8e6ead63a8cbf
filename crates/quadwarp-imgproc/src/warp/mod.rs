//! Perspective resampling of rasters.
//!
//! - [`warp_perspective_u8`] and [`warp_perspective_with_kernel`] run the
//!   per-pixel inverse-mapping loop on typed images
//! - [`warp_buffer`] runs the same loop through the [`quadwarp_image::PixelBuffer`]
//!   accessor
//! - [`TransformOp`] validates, prepares and color-reconciles the destination
//!   around that loop
//! - [`OpRegistry`] dispatches configured [`ImagingOp`]s by kind
//!
//! # Examples
//!
//! Mapping a quadrangle onto a rectangle:
//!
//! ```no_run
//! use quadwarp_geometry::{quad_to_rect, DVec2, Quadrangle, Rect};
//! use quadwarp_imgproc::warp::TransformOp;
//!
//! let quad = Quadrangle::new(
//!     DVec2::new(10.0, 12.0),
//!     DVec2::new(200.0, 5.0),
//!     DVec2::new(220.0, 180.0),
//!     DVec2::new(0.0, 150.0),
//! );
//! let m = quad_to_rect(&quad, &Rect::new(0, 0, 256, 256)).unwrap();
//! let op = TransformOp::from_matrix(m);
//! ```

mod affine;
mod op;
mod perspective;
mod registry;

pub use affine::{get_rotation_matrix2d, AffineOp};
pub use op::TransformOp;
pub use perspective::{warp_buffer, warp_perspective_u8, warp_perspective_with_kernel};
pub use registry::{ImagingOp, OpKind, OpRegistry};
