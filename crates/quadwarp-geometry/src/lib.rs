#![deny(missing_docs)]
//! Planar projective geometry: 3x3 projective matrices, affine transforms and
//! the quadrilateral mappings used to set up perspective warps.

/// Affine transforms and their composition.
pub mod affine;

/// Error types for the geometry module.
pub mod error;

/// The 3x3 projective matrix.
pub mod projective;

/// Quadrangles and the square/quad mappings.
pub mod quad;

/// Integer rectangles.
pub mod rect;

/// The point-mapping capability shared by the transforms.
pub mod transform;

pub use crate::affine::AffineTransform;
pub use crate::error::GeometryError;
pub use crate::projective::{ProjectiveMatrix, PERSPECTIVE_DIVIDE_EPSILON};
pub use crate::quad::{
    quad_to_quad, quad_to_rect, quad_to_square, rect_to_quad, square_to_quad, Quadrangle,
};
pub use crate::rect::Rect;
pub use crate::transform::Transform2D;

pub use crate::quad::quad_to_quad as build_quad_to_quad;

pub use glam::DVec2;
