use crate::{error::GeometryError, transform::Transform2D, PERSPECTIVE_DIVIDE_EPSILON};

/// A 2x3 affine transform.
///
/// ```text
/// | m00 m01 m02 |
/// | m10 m11 m12 |
/// |  0   0   1  |
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AffineTransform {
    /// x scale.
    pub m00: f64,
    /// x shear.
    pub m01: f64,
    /// x translation.
    pub m02: f64,
    /// y shear.
    pub m10: f64,
    /// y scale.
    pub m11: f64,
    /// y translation.
    pub m12: f64,
}

impl Default for AffineTransform {
    fn default() -> Self {
        Self::IDENTITY
    }
}

impl AffineTransform {
    /// The identity transform.
    pub const IDENTITY: Self = Self {
        m00: 1.0,
        m01: 0.0,
        m02: 0.0,
        m10: 0.0,
        m11: 1.0,
        m12: 0.0,
    };

    /// Creates a transform from its six coefficients in row-major order.
    pub fn new(m00: f64, m01: f64, m02: f64, m10: f64, m11: f64, m12: f64) -> Self {
        Self {
            m00,
            m01,
            m02,
            m10,
            m11,
            m12,
        }
    }

    /// The identity transform.
    pub fn identity() -> Self {
        Self::IDENTITY
    }

    /// Translation by `(tx, ty)`.
    pub fn translation(tx: f64, ty: f64) -> Self {
        Self::new(1.0, 0.0, tx, 0.0, 1.0, ty)
    }

    /// Anisotropic scaling about the origin.
    pub fn scaling(sx: f64, sy: f64) -> Self {
        Self::new(sx, 0.0, 0.0, 0.0, sy, 0.0)
    }

    /// Rotation about the origin by `theta` radians.
    ///
    /// With y growing downwards a positive angle turns clockwise on screen.
    pub fn rotation(theta: f64) -> Self {
        let (sin, cos) = theta.sin_cos();
        Self::new(cos, -sin, 0.0, sin, cos, 0.0)
    }

    /// Shearing by `shx` along x and `shy` along y.
    pub fn shearing(shx: f64, shy: f64) -> Self {
        Self::new(1.0, shx, 0.0, shy, 1.0, 0.0)
    }

    /// Determinant of the linear part.
    pub fn determinant(&self) -> f64 {
        self.m00 * self.m11 - self.m01 * self.m10
    }

    /// Composes so that `self` is applied first and `other` second.
    pub fn concatenate(&mut self, other: &AffineTransform) {
        *self = Self::product(other, self);
    }

    /// Composes so that `other` is applied first and `self` second.
    pub fn pre_concatenate(&mut self, other: &AffineTransform) {
        *self = Self::product(self, other);
    }

    /// Returns the inverse transform.
    ///
    /// # Errors
    ///
    /// Fails when the linear part is singular.
    pub fn create_inverse(&self) -> Result<AffineTransform, GeometryError> {
        let det = self.determinant();
        if det.abs() < PERSPECTIVE_DIVIDE_EPSILON {
            return Err(GeometryError::NonInvertible(det));
        }
        let inv_det = 1.0 / det;
        Ok(Self::new(
            self.m11 * inv_det,
            -self.m01 * inv_det,
            (self.m01 * self.m12 - self.m11 * self.m02) * inv_det,
            -self.m10 * inv_det,
            self.m00 * inv_det,
            (self.m10 * self.m02 - self.m00 * self.m12) * inv_det,
        ))
    }

    // a * b, i.e. b applied first
    fn product(a: &AffineTransform, b: &AffineTransform) -> AffineTransform {
        AffineTransform::new(
            a.m00 * b.m00 + a.m01 * b.m10,
            a.m00 * b.m01 + a.m01 * b.m11,
            a.m00 * b.m02 + a.m01 * b.m12 + a.m02,
            a.m10 * b.m00 + a.m11 * b.m10,
            a.m10 * b.m01 + a.m11 * b.m11,
            a.m10 * b.m02 + a.m11 * b.m12 + a.m12,
        )
    }
}

impl Transform2D for AffineTransform {
    fn transform_point(&self, x: f64, y: f64) -> (f64, f64) {
        (
            self.m00 * x + self.m01 * y + self.m02,
            self.m10 * x + self.m11 * y + self.m12,
        )
    }

    fn inverse_transform_point(&self, x: f64, y: f64) -> Result<(f64, f64), GeometryError> {
        Ok(self.create_inverse()?.transform_point(x, y))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn affine_concatenate_order() {
        // translate first, then scale: (1, 1) -> (2, 1) -> (4, 2)
        let mut t = AffineTransform::translation(1.0, 0.0);
        t.concatenate(&AffineTransform::scaling(2.0, 2.0));
        assert_eq!(t.transform_point(1.0, 1.0), (4.0, 2.0));

        // scale first, then translate: (1, 1) -> (2, 2) -> (3, 2)
        let mut t = AffineTransform::translation(1.0, 0.0);
        t.pre_concatenate(&AffineTransform::scaling(2.0, 2.0));
        assert_eq!(t.transform_point(1.0, 1.0), (3.0, 2.0));
    }

    #[test]
    fn affine_inverse_roundtrip() -> Result<(), GeometryError> {
        let mut t = AffineTransform::rotation(0.3);
        t.concatenate(&AffineTransform::translation(5.0, -2.0));
        t.concatenate(&AffineTransform::shearing(0.2, 0.1));

        let (x, y) = t.transform_point(3.5, 7.25);
        let (u, v) = t.inverse_transform_point(x, y)?;
        assert_relative_eq!(u, 3.5, epsilon = 1e-9);
        assert_relative_eq!(v, 7.25, epsilon = 1e-9);
        Ok(())
    }

    #[test]
    fn affine_singular() {
        let t = AffineTransform::scaling(0.0, 1.0);
        assert!(matches!(
            t.create_inverse(),
            Err(GeometryError::NonInvertible(_))
        ));
    }
}
