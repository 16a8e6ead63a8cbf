use quadwarp_geometry::{AffineTransform, ProjectiveMatrix};
use quadwarp_image::Image;

use crate::{error::WarpError, fill::FillPolicy, interpolation::InterpolationMode};

use super::op::TransformOp;

/// Returns the affine transform rotating about a center point.
///
/// The matrix is defined as:
///
/// | alpha  beta  tx |
/// | -beta  alpha ty |
///
/// where:
///
/// alpha = scale * cos(angle)
/// beta = scale * sin(angle)
/// tx = (1 - alpha) * center.x - beta * center.y
/// ty = beta * center.x + (1 - alpha) * center.y
///
/// # Arguments
///
/// * `center` - The center point of the rotation.
/// * `angle` - The angle of rotation in degrees.
/// * `scale` - The scale factor.
pub fn get_rotation_matrix2d(center: (f64, f64), angle: f64, scale: f64) -> AffineTransform {
    let angle = angle.to_radians();
    let alpha = scale * angle.cos();
    let beta = scale * angle.sin();

    let tx = (1.0 - alpha) * center.0 - beta * center.1;
    let ty = beta * center.0 + (1.0 - alpha) * center.1;

    AffineTransform::new(alpha, beta, tx, -beta, alpha, ty)
}

/// An affine resampling operation.
///
/// Runs through the same pipeline as [`TransformOp`] with the affine transform
/// lifted to a projective matrix.
#[derive(Debug, Clone)]
pub struct AffineOp {
    transform: AffineTransform,
    inner: TransformOp,
}

impl AffineOp {
    /// Creates an operation mapping source pixels through `transform`.
    pub fn new(transform: AffineTransform, interpolation: InterpolationMode, fill: FillPolicy) -> Self {
        Self {
            transform,
            inner: TransformOp::new(ProjectiveMatrix::from_affine(&transform), interpolation, fill),
        }
    }

    /// The affine transform.
    pub fn transform(&self) -> AffineTransform {
        self.transform
    }

    /// The projective operation doing the work.
    pub fn as_transform_op(&self) -> &TransformOp {
        &self.inner
    }

    /// Resamples `src`; see [`TransformOp::filter`].
    pub fn filter<const C: usize>(
        &self,
        src: &Image<u8, C>,
        dst: Option<Image<u8, C>>,
    ) -> Result<Image<u8, C>, WarpError> {
        self.inner.filter(src, dst)
    }
}
