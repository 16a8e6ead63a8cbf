use quadwarp_geometry::GeometryError;
use quadwarp_image::ImageError;

use crate::parallel::ParallelError;

/// An error type for the resampling operations.
#[derive(thiserror::Error, Debug, Clone, PartialEq)]
pub enum WarpError {
    /// The transform, or the inverse mapping of one pixel, has no inverse.
    #[error("transform is not invertible (|w| = {0:e})")]
    NonInvertible(f64),

    /// A null, aliased or mismatched buffer was passed in.
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    /// The computed destination has no pixels.
    #[error("degenerate destination bounds: {width}x{height}")]
    DegenerateBounds {
        /// Computed width.
        width: i64,
        /// Computed height.
        height: i64,
    },

    /// No conversion or substitution exists for the color models involved.
    #[error("unsupported color model: {0}")]
    UnsupportedColorModel(String),

    /// The registry has no enabled implementation for the operation kind.
    #[error("operation {0} is not enabled in the registry")]
    UnsupportedOp(String),

    /// The operation was cancelled before it completed.
    #[error("operation cancelled")]
    Cancelled,

    /// Error from the geometry module.
    #[error(transparent)]
    Geometry(GeometryError),

    /// Error from the image module.
    #[error(transparent)]
    Image(ImageError),

    /// Error from the parallel execution helpers.
    #[error(transparent)]
    Parallel(ParallelError),
}

impl From<GeometryError> for WarpError {
    fn from(e: GeometryError) -> Self {
        match e {
            GeometryError::NonInvertible(w) => WarpError::NonInvertible(w),
            e => WarpError::Geometry(e),
        }
    }
}

impl From<ImageError> for WarpError {
    fn from(e: ImageError) -> Self {
        match e {
            ImageError::UnsupportedColorModel(msg) => WarpError::UnsupportedColorModel(msg),
            e => WarpError::Image(e),
        }
    }
}

impl From<ParallelError> for WarpError {
    fn from(e: ParallelError) -> Self {
        match e {
            ParallelError::Cancelled => WarpError::Cancelled,
            e => WarpError::Parallel(e),
        }
    }
}
