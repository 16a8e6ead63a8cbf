use std::fmt;
use std::ops::Mul;

use crate::{
    affine::AffineTransform,
    error::GeometryError,
    quad::{self, Quadrangle},
    transform::Transform2D,
};

/// Threshold below which a determinant or a perspective divisor counts as zero.
pub const PERSPECTIVE_DIVIDE_EPSILON: f64 = 1.0e-10;

/// A 3x3 projective transform acting on homogeneous coordinates `(x, y, 1)`.
///
/// The coefficients are stored row-major:
///
/// ```text
/// | m00 m01 m02 |
/// | m10 m11 m12 |
/// | m20 m21 m22 |
/// ```
///
/// A point is mapped with `w = m20*x + m21*y + m22` followed by the
/// perspective divide `((m00*x + m01*y + m02) / w, (m10*x + m11*y + m12) / w)`.
///
/// The matrix is a plain `Copy` value; it only changes through the `&mut self`
/// methods below.
///
/// # Example
///
/// ```
/// use quadwarp_geometry::ProjectiveMatrix;
///
/// let mut m = ProjectiveMatrix::identity();
/// m.translate(2.0, 3.0);
/// assert_eq!(m.transform_point(1.0, 1.0), (3.0, 4.0));
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ProjectiveMatrix {
    m: [f64; 9],
}

impl Default for ProjectiveMatrix {
    fn default() -> Self {
        Self::IDENTITY
    }
}

#[rustfmt::skip]
fn determinant3x3(m: &[f64; 9]) -> f64 {
    m[0] * (m[4] * m[8] - m[5] * m[7]) -
    m[1] * (m[3] * m[8] - m[5] * m[6]) +
    m[2] * (m[3] * m[7] - m[4] * m[6])
}

#[rustfmt::skip]
fn adjugate3x3(m: &[f64; 9]) -> [f64; 9] {
    [
        m[4] * m[8] - m[5] * m[7],  // [0, 0]
        m[2] * m[7] - m[1] * m[8],  // [0, 1]
        m[1] * m[5] - m[2] * m[4],  // [0, 2]
        m[5] * m[6] - m[3] * m[8],  // [1, 0]
        m[0] * m[8] - m[2] * m[6],  // [1, 1]
        m[2] * m[3] - m[0] * m[5],  // [1, 2]
        m[3] * m[7] - m[4] * m[6],  // [2, 0]
        m[1] * m[6] - m[0] * m[7],  // [2, 1]
        m[0] * m[4] - m[1] * m[3],  // [2, 2]
    ]
}

// a * b, i.e. b applied first
fn multiply3x3(a: &[f64; 9], b: &[f64; 9]) -> [f64; 9] {
    let mut out = [0.0; 9];
    for r in 0..3 {
        for c in 0..3 {
            out[r * 3 + c] = a[r * 3] * b[c] + a[r * 3 + 1] * b[3 + c] + a[r * 3 + 2] * b[6 + c];
        }
    }
    out
}

impl ProjectiveMatrix {
    /// The identity transform.
    pub const IDENTITY: Self = Self {
        m: [1.0, 0.0, 0.0, 0.0, 1.0, 0.0, 0.0, 0.0, 1.0],
    };

    /// Creates a matrix from its nine coefficients in row-major order.
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        m00: f64,
        m01: f64,
        m02: f64,
        m10: f64,
        m11: f64,
        m12: f64,
        m20: f64,
        m21: f64,
        m22: f64,
    ) -> Self {
        Self {
            m: [m00, m01, m02, m10, m11, m12, m20, m21, m22],
        }
    }

    /// The identity transform.
    pub fn identity() -> Self {
        Self::IDENTITY
    }

    /// Creates a matrix from a flat row-major array.
    pub fn from_array(m: [f64; 9]) -> Self {
        Self { m }
    }

    /// Creates a matrix from its three rows.
    pub fn from_rows(rows: [[f64; 3]; 3]) -> Self {
        let [r0, r1, r2] = rows;
        Self::from_array([
            r0[0], r0[1], r0[2], r1[0], r1[1], r1[2], r2[0], r2[1], r2[2],
        ])
    }

    /// Extends an affine transform with the projective row `(0, 0, 1)`.
    pub fn from_affine(a: &AffineTransform) -> Self {
        Self::new(a.m00, a.m01, a.m02, a.m10, a.m11, a.m12, 0.0, 0.0, 1.0)
    }

    /// Builds the transform mapping the corners of `src` onto the corners of `dst`.
    ///
    /// Shorthand for [`quad::quad_to_quad`].
    pub fn from_quad_to_quad(src: &Quadrangle, dst: &Quadrangle) -> Result<Self, GeometryError> {
        quad::quad_to_quad(src, dst)
    }

    /// The coefficients as a flat row-major array.
    pub fn to_array(&self) -> [f64; 9] {
        self.m
    }

    /// The coefficients as three rows.
    pub fn to_rows(&self) -> [[f64; 3]; 3] {
        let m = &self.m;
        [[m[0], m[1], m[2]], [m[3], m[4], m[5]], [m[6], m[7], m[8]]]
    }

    /// The coefficient at `row`, `col`.
    ///
    /// # Panics
    ///
    /// Panics if `row` or `col` is greater than 2.
    pub fn get(&self, row: usize, col: usize) -> f64 {
        assert!(row < 3 && col < 3, "index ({row}, {col}) out of a 3x3 matrix");
        self.m[row * 3 + col]
    }

    /// Replaces every coefficient with those of `other`.
    pub fn set_transform(&mut self, other: &ProjectiveMatrix) {
        self.m = other.m;
    }

    /// Composes so that `self` is applied first and `other` second.
    ///
    /// After the call `self` equals `other * self`.
    pub fn concatenate(&mut self, other: &ProjectiveMatrix) {
        self.m = multiply3x3(&other.m, &self.m);
    }

    /// Composes so that `other` is applied first and `self` second.
    ///
    /// After the call `self` equals `self * other`.
    pub fn pre_concatenate(&mut self, other: &ProjectiveMatrix) {
        self.m = multiply3x3(&self.m, &other.m);
    }

    /// [`concatenate`](Self::concatenate) with an affine transform.
    pub fn concatenate_affine(&mut self, other: &AffineTransform) {
        self.concatenate(&Self::from_affine(other));
    }

    /// [`pre_concatenate`](Self::pre_concatenate) with an affine transform.
    pub fn pre_concatenate_affine(&mut self, other: &AffineTransform) {
        self.pre_concatenate(&Self::from_affine(other));
    }

    /// Maps a point forward.
    ///
    /// A vanishing divisor `w` returns the point unchanged.
    pub fn transform_point(&self, x: f64, y: f64) -> (f64, f64) {
        let m = &self.m;
        let w = m[6] * x + m[7] * y + m[8];
        if w == 0.0 {
            return (x, y);
        }
        (
            (m[0] * x + m[1] * y + m[2]) / w,
            (m[3] * x + m[4] * y + m[5]) / w,
        )
    }

    /// Maps a point forward, failing when `|w|` is below
    /// [`PERSPECTIVE_DIVIDE_EPSILON`].
    ///
    /// Applied to an adjoint matrix this is the inverse mapping of the
    /// original matrix.
    pub fn try_transform_point(&self, x: f64, y: f64) -> Result<(f64, f64), GeometryError> {
        let m = &self.m;
        let w = m[6] * x + m[7] * y + m[8];
        if w.abs() < PERSPECTIVE_DIVIDE_EPSILON {
            return Err(GeometryError::NonInvertible(w));
        }
        Ok((
            (m[0] * x + m[1] * y + m[2]) / w,
            (m[3] * x + m[4] * y + m[5]) / w,
        ))
    }

    /// Maps a point backwards without forming the inverse matrix.
    ///
    /// The adjoint rows are expanded inline; the third one gives the divisor.
    ///
    /// # Errors
    ///
    /// [`GeometryError::NonInvertible`] when `|w|` is below
    /// [`PERSPECTIVE_DIVIDE_EPSILON`].
    pub fn inverse_transform_point(&self, x: f64, y: f64) -> Result<(f64, f64), GeometryError> {
        let [m00, m01, m02, m10, m11, m12, m20, m21, m22] = self.m;

        let tmp_x = (m11 * m22 - m12 * m21) * x + (m02 * m21 - m01 * m22) * y + (m01 * m12 - m02 * m11);
        let tmp_y = (m12 * m20 - m10 * m22) * x + (m00 * m22 - m02 * m20) * y + (m02 * m10 - m00 * m12);
        let w = (m10 * m21 - m11 * m20) * x + (m01 * m20 - m00 * m21) * y + (m00 * m11 - m01 * m10);

        if w.abs() < PERSPECTIVE_DIVIDE_EPSILON {
            return Err(GeometryError::NonInvertible(w));
        }

        Ok((tmp_x / w, tmp_y / w))
    }

    /// Replaces the matrix with its adjoint, the transposed cofactor matrix.
    ///
    /// The adjoint is `det * inverse`; homogeneous coordinates ignore the scale.
    pub fn adjoint(&mut self) {
        self.m = adjugate3x3(&self.m);
    }

    /// Returns the adjoint, leaving `self` untouched.
    pub fn create_adjoint(&self) -> ProjectiveMatrix {
        Self::from_array(adjugate3x3(&self.m))
    }

    /// Returns the true inverse, normalised by the determinant.
    ///
    /// # Errors
    ///
    /// [`GeometryError::NonInvertible`] when `|det|` is below
    /// [`PERSPECTIVE_DIVIDE_EPSILON`].
    pub fn create_inverse(&self) -> Result<ProjectiveMatrix, GeometryError> {
        let det = self.determinant();
        if det.abs() < PERSPECTIVE_DIVIDE_EPSILON {
            return Err(GeometryError::NonInvertible(det));
        }
        let inv_det = 1.0 / det;
        let mut m = adjugate3x3(&self.m);
        m.iter_mut().for_each(|v| *v *= inv_det);
        Ok(Self::from_array(m))
    }

    /// Determinant via cofactor expansion along the first row.
    pub fn determinant(&self) -> f64 {
        determinant3x3(&self.m)
    }

    /// Whether the determinant is clear of [`PERSPECTIVE_DIVIDE_EPSILON`].
    pub fn is_invertible(&self) -> bool {
        self.determinant().abs() >= PERSPECTIVE_DIVIDE_EPSILON
    }

    /// Whether the matrix is a (scaled) identity.
    pub fn is_identity(&self) -> bool {
        let [m00, m01, m02, m10, m11, m12, m20, m21, m22] = self.m;
        m01 == 0.0
            && m02 == 0.0
            && m10 == 0.0
            && m12 == 0.0
            && m20 == 0.0
            && m21 == 0.0
            && m22 != 0.0
            && m00 / m22 == 1.0
            && m11 / m22 == 1.0
    }

    /// Whether the projective row is `(0, 0, 1)`.
    pub fn is_affine(&self) -> bool {
        self.m[6] == 0.0 && self.m[7] == 0.0 && self.m[8] == 1.0
    }

    /// Resets to the identity.
    pub fn set_to_identity(&mut self) {
        *self = Self::IDENTITY;
    }

    /// Resets to a rotation about the origin by `theta` radians.
    pub fn set_to_rotation(&mut self, theta: f64) {
        *self = Self::from_affine(&AffineTransform::rotation(theta));
    }

    /// Resets to a rotation by `theta` radians about `(x, y)`.
    pub fn set_to_rotation_about(&mut self, theta: f64, x: f64, y: f64) {
        self.set_to_rotation(theta);
        let sin = self.m[3];
        let one_minus_cos = 1.0 - self.m[0];
        self.m[2] = x * one_minus_cos + y * sin;
        self.m[5] = y * one_minus_cos - x * sin;
    }

    /// Resets to an anisotropic scaling.
    pub fn set_to_scale(&mut self, sx: f64, sy: f64) {
        *self = Self::from_affine(&AffineTransform::scaling(sx, sy));
    }

    /// Resets to a shear.
    pub fn set_to_shear(&mut self, shx: f64, shy: f64) {
        *self = Self::from_affine(&AffineTransform::shearing(shx, shy));
    }

    /// Resets to a translation.
    pub fn set_to_translation(&mut self, tx: f64, ty: f64) {
        *self = Self::from_affine(&AffineTransform::translation(tx, ty));
    }

    /// Appends a rotation about the origin.
    pub fn rotate(&mut self, theta: f64) {
        self.concatenate_affine(&AffineTransform::rotation(theta));
    }

    /// Appends a rotation about `(x, y)`.
    pub fn rotate_about(&mut self, theta: f64, x: f64, y: f64) {
        let mut r = Self::IDENTITY;
        r.set_to_rotation_about(theta, x, y);
        self.concatenate(&r);
    }

    /// Appends a scaling.
    pub fn scale(&mut self, sx: f64, sy: f64) {
        self.concatenate_affine(&AffineTransform::scaling(sx, sy));
    }

    /// Appends a shear.
    pub fn shear(&mut self, shx: f64, shy: f64) {
        self.concatenate_affine(&AffineTransform::shearing(shx, shy));
    }

    /// Appends a translation.
    pub fn translate(&mut self, tx: f64, ty: f64) {
        self.concatenate_affine(&AffineTransform::translation(tx, ty));
    }
}

impl Transform2D for ProjectiveMatrix {
    fn transform_point(&self, x: f64, y: f64) -> (f64, f64) {
        ProjectiveMatrix::transform_point(self, x, y)
    }

    fn inverse_transform_point(&self, x: f64, y: f64) -> Result<(f64, f64), GeometryError> {
        ProjectiveMatrix::inverse_transform_point(self, x, y)
    }
}

/// Matrix product: `a * b` applies `b` first.
impl Mul for ProjectiveMatrix {
    type Output = ProjectiveMatrix;

    fn mul(self, rhs: ProjectiveMatrix) -> ProjectiveMatrix {
        ProjectiveMatrix::from_array(multiply3x3(&self.m, &rhs.m))
    }
}

impl From<AffineTransform> for ProjectiveMatrix {
    fn from(a: AffineTransform) -> Self {
        Self::from_affine(&a)
    }
}

impl From<[f64; 9]> for ProjectiveMatrix {
    fn from(m: [f64; 9]) -> Self {
        Self::from_array(m)
    }
}

// glam matrices are column-major
impl From<ProjectiveMatrix> for glam::DMat3 {
    fn from(p: ProjectiveMatrix) -> Self {
        let m = &p.m;
        glam::DMat3::from_cols_array(&[m[0], m[3], m[6], m[1], m[4], m[7], m[2], m[5], m[8]])
    }
}

impl From<glam::DMat3> for ProjectiveMatrix {
    fn from(g: glam::DMat3) -> Self {
        let c = g.to_cols_array();
        Self::from_array([c[0], c[3], c[6], c[1], c[4], c[7], c[2], c[5], c[8]])
    }
}

impl fmt::Display for ProjectiveMatrix {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for row in self.to_rows() {
            writeln!(f, "{}\t{}\t{}", row[0], row[1], row[2])?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use rand::{rngs::StdRng, Rng, SeedableRng};

    #[test]
    fn identity() {
        let m = ProjectiveMatrix::identity();
        assert!(m.is_identity());
        assert_eq!(m.determinant(), 1.0);
        assert_eq!(m.transform_point(3.0, -4.5), (3.0, -4.5));
    }

    #[test]
    fn is_identity_scaled() {
        let m = ProjectiveMatrix::new(2.0, 0.0, 0.0, 0.0, 2.0, 0.0, 0.0, 0.0, 2.0);
        assert!(m.is_identity());

        let m = ProjectiveMatrix::new(1.0, 0.0, 0.0, 0.0, 1.0, 0.0, 0.0, 0.0, 0.0);
        assert!(!m.is_identity());

        let m = ProjectiveMatrix::new(1.0, 0.0, 0.0, 0.0, 1.0, 0.0, 1e-3, 0.0, 1.0);
        assert!(!m.is_identity());
    }

    #[test]
    fn transform_point_translation() {
        let m = ProjectiveMatrix::new(1.0, 0.0, -1.0, 0.0, 1.0, 1.0, 0.0, 0.0, 1.0);
        assert_eq!(m.transform_point(1.0, 1.0), (0.0, 2.0));
    }

    #[test]
    fn transform_point_zero_divisor_passthrough() {
        // w = x - 2 vanishes at x = 2
        let m = ProjectiveMatrix::new(1.0, 0.0, 0.0, 0.0, 1.0, 0.0, 1.0, 0.0, -2.0);
        assert_eq!(m.transform_point(2.0, 7.0), (2.0, 7.0));
        assert!(m.try_transform_point(2.0, 7.0).is_err());
    }

    #[test]
    fn inverse_transform_point_zero_matrix() {
        let m = ProjectiveMatrix::new(0.0, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0);
        for (x, y) in [(0.0, 0.0), (1.0, 2.0), (-5.0, 13.0)] {
            assert!(matches!(
                m.inverse_transform_point(x, y),
                Err(GeometryError::NonInvertible(_))
            ));
        }
        assert!(!m.is_invertible());
    }

    #[test]
    fn inverse_composition_random() -> Result<(), GeometryError> {
        let mut rng = StdRng::seed_from_u64(42);
        let mut tested = 0;
        while tested < 200 {
            let mut coeffs = [0.0; 9];
            coeffs.iter_mut().for_each(|c| *c = rng.random_range(-2.0..2.0));
            coeffs[6] *= 0.01;
            coeffs[7] *= 0.01;
            coeffs[8] = rng.random_range(0.5..2.0);
            let m = ProjectiveMatrix::from_array(coeffs);
            if m.determinant().abs() < 1e-3 {
                continue;
            }

            let (x, y) = (rng.random_range(-50.0..50.0), rng.random_range(-50.0..50.0));
            let w = coeffs[6] * x + coeffs[7] * y + coeffs[8];
            if w.abs() < 1e-3 {
                continue;
            }

            let (u, v) = m.transform_point(x, y);
            let (xr, yr) = m.inverse_transform_point(u, v)?;
            assert!((xr - x).abs() < 1e-6, "x: {xr} != {x} for\n{m}");
            assert!((yr - y).abs() < 1e-6, "y: {yr} != {y} for\n{m}");
            tested += 1;
        }
        Ok(())
    }

    #[test]
    fn adjoint_is_scaled_inverse() -> Result<(), GeometryError> {
        let m = ProjectiveMatrix::new(2.0, 0.5, 3.0, -0.25, 1.5, 1.0, 0.001, 0.002, 1.0);
        let det = m.determinant();

        let mut adj = m;
        adj.adjoint();
        assert_eq!(adj, m.create_adjoint());

        let product = (adj * m).to_array();
        let expected = [det, 0.0, 0.0, 0.0, det, 0.0, 0.0, 0.0, det];
        for (a, b) in product.iter().zip(expected.iter()) {
            assert_relative_eq!(a, b, epsilon = 1e-12);
        }

        let inv = m.create_inverse()?;
        let eye = (inv * m).to_array();
        for (a, b) in eye.iter().zip(ProjectiveMatrix::IDENTITY.to_array().iter()) {
            assert_relative_eq!(a, b, epsilon = 1e-12);
        }
        Ok(())
    }

    #[test]
    fn determinant_matches_glam() {
        let m = ProjectiveMatrix::new(2.0, 0.5, 3.0, -0.25, 1.5, 1.0, 0.3, 0.2, 1.0);
        let g: glam::DMat3 = m.into();
        assert_relative_eq!(m.determinant(), g.determinant(), epsilon = 1e-12);

        let back = ProjectiveMatrix::from(g);
        assert_eq!(back, m);

        // glam maps column vectors, so the same point lands in the same place
        let p = g * glam::DVec3::new(4.0, -1.0, 1.0);
        let (x, y) = m.transform_point(4.0, -1.0);
        assert_relative_eq!(p.x / p.z, x, epsilon = 1e-12);
        assert_relative_eq!(p.y / p.z, y, epsilon = 1e-12);
    }

    #[test]
    fn concatenate_is_not_commutative() {
        let mut a = ProjectiveMatrix::identity();
        a.set_to_translation(1.0, 0.0);
        let mut b = ProjectiveMatrix::identity();
        b.set_to_scale(2.0, 2.0);

        // translate, then scale
        let mut post = a;
        post.concatenate(&b);
        assert_eq!(post.transform_point(1.0, 1.0), (4.0, 2.0));

        // scale, then translate
        let mut pre = a;
        pre.pre_concatenate(&b);
        assert_eq!(pre.transform_point(1.0, 1.0), (3.0, 2.0));

        assert_ne!(post, pre);
        assert_eq!(post, b * a);
        assert_eq!(pre, a * b);
    }

    #[test]
    fn concatenate_affine_matches_projective() {
        let affine = AffineTransform::new(1.0, 0.5, 2.0, -0.5, 1.0, 3.0);
        let mut p = ProjectiveMatrix::new(1.0, 0.0, 0.0, 0.0, 1.0, 0.0, 0.01, 0.02, 1.0);
        let mut q = p;
        p.concatenate_affine(&affine);
        q.concatenate(&ProjectiveMatrix::from(affine));
        assert_eq!(p, q);

        let mut p2 = ProjectiveMatrix::new(1.0, 0.0, 0.0, 0.0, 1.0, 0.0, 0.01, 0.02, 1.0);
        p2.pre_concatenate_affine(&affine);
        assert_ne!(p2, p);
    }

    #[test]
    fn rotation_about_point_fixes_point() {
        let mut m = ProjectiveMatrix::identity();
        m.set_to_rotation_about(std::f64::consts::FRAC_PI_3, 10.0, -4.0);
        let (x, y) = m.transform_point(10.0, -4.0);
        assert_relative_eq!(x, 10.0, epsilon = 1e-12);
        assert_relative_eq!(y, -4.0, epsilon = 1e-12);

        let mut r = ProjectiveMatrix::identity();
        r.rotate_about(std::f64::consts::FRAC_PI_3, 10.0, -4.0);
        assert_eq!(r, m);
    }

    #[test]
    fn composing_helpers() {
        let mut m = ProjectiveMatrix::identity();
        m.scale(2.0, 3.0);
        m.translate(1.0, 1.0);
        assert_eq!(m.transform_point(1.0, 1.0), (3.0, 4.0));

        let mut s = ProjectiveMatrix::identity();
        s.shear(1.0, 0.0);
        assert_eq!(s.transform_point(1.0, 2.0), (3.0, 2.0));

        let mut r = ProjectiveMatrix::identity();
        r.rotate(std::f64::consts::FRAC_PI_2);
        let (x, y) = r.transform_point(1.0, 0.0);
        assert_relative_eq!(x, 0.0, epsilon = 1e-12);
        assert_relative_eq!(y, 1.0, epsilon = 1e-12);
    }

    #[test]
    fn rows_roundtrip_and_display() {
        let rows = [[1.0, 2.0, 3.0], [4.0, 5.0, 6.0], [7.0, 8.0, 9.0]];
        let m = ProjectiveMatrix::from_rows(rows);
        assert_eq!(m.to_rows(), rows);
        assert_eq!(m.get(2, 0), 7.0);
        assert_eq!(m.to_string(), "1\t2\t3\n4\t5\t6\n7\t8\t9\n");
    }

    #[test]
    fn transform_points_trait() -> Result<(), GeometryError> {
        let mut m = ProjectiveMatrix::identity();
        m.set_to_translation(1.0, -1.0);
        let src = [glam::DVec2::new(0.0, 0.0), glam::DVec2::new(2.0, 3.0)];
        let mut dst = [glam::DVec2::ZERO; 2];
        Transform2D::transform_points(&m, &src, &mut dst)?;
        assert_eq!(dst[1], glam::DVec2::new(3.0, 2.0));

        let mut back = [glam::DVec2::ZERO; 2];
        Transform2D::inverse_transform_points(&m, &dst, &mut back)?;
        assert_eq!(back, src);

        let mut short = [glam::DVec2::ZERO; 1];
        assert_eq!(
            Transform2D::transform_points(&m, &src, &mut short),
            Err(GeometryError::PointCountMismatch(2, 1))
        );
        Ok(())
    }
}
