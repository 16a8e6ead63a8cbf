//! Quadrilaterals and the projective maps between them.
//!
//! Every map is built through the unit square: `square_to_quad` sends the
//! corners `(0, 0), (1, 0), (1, 1), (0, 1)` to the four corners of a
//! quadrangle, `quad_to_square` is its adjoint, and `quad_to_quad` chains the
//! two.

use glam::DVec2;

use crate::{error::GeometryError, projective::ProjectiveMatrix, rect::Rect};

/// Four points in fixed order: top-left, top-right, bottom-right, bottom-left.
///
/// The order matches the unit-square corners `(0, 0), (1, 0), (1, 1), (0, 1)`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Quadrangle {
    points: [DVec2; 4],
}

impl Quadrangle {
    /// Creates a quadrangle from its corners.
    pub fn new(top_left: DVec2, top_right: DVec2, bottom_right: DVec2, bottom_left: DVec2) -> Self {
        Self {
            points: [top_left, top_right, bottom_right, bottom_left],
        }
    }

    /// The axis-aligned quadrangle covering `rect`.
    pub fn from_rect(rect: &Rect) -> Self {
        let (x0, y0) = (rect.x as f64, rect.y as f64);
        let (x1, y1) = (x0 + rect.width as f64, y0 + rect.height as f64);
        Self::new(
            DVec2::new(x0, y0),
            DVec2::new(x1, y0),
            DVec2::new(x1, y1),
            DVec2::new(x0, y1),
        )
    }

    /// The corners in order top-left, top-right, bottom-right, bottom-left.
    pub fn points(&self) -> &[DVec2; 4] {
        &self.points
    }

    /// The top-left corner.
    pub fn top_left(&self) -> DVec2 {
        self.points[0]
    }

    /// The top-right corner.
    pub fn top_right(&self) -> DVec2 {
        self.points[1]
    }

    /// The bottom-right corner.
    pub fn bottom_right(&self) -> DVec2 {
        self.points[2]
    }

    /// The bottom-left corner.
    pub fn bottom_left(&self) -> DVec2 {
        self.points[3]
    }

    /// Moves the top-left corner.
    pub fn set_top_left(&mut self, p: DVec2) {
        self.points[0] = p;
    }

    /// Moves the top-right corner.
    pub fn set_top_right(&mut self, p: DVec2) {
        self.points[1] = p;
    }

    /// Moves the bottom-right corner.
    pub fn set_bottom_right(&mut self, p: DVec2) {
        self.points[2] = p;
    }

    /// Moves the bottom-left corner.
    pub fn set_bottom_left(&mut self, p: DVec2) {
        self.points[3] = p;
    }
}

/// Builds the map from the unit square onto `quad`.
///
/// Parallelograms take an affine shortcut; other quadrangles need the full
/// projective solution.
///
/// # Errors
///
/// [`GeometryError::DegenerateQuadrangle`] when three corners are collinear.
pub fn square_to_quad(quad: &Quadrangle) -> Result<ProjectiveMatrix, GeometryError> {
    let [p0, p1, p2, p3] = quad.points;
    let (x0, y0, x1, y1, x2, y2, x3, y3) = (p0.x, p0.y, p1.x, p1.y, p2.x, p2.y, p3.x, p3.y);

    let dx3 = x0 - x1 + x2 - x3;
    let dy3 = y0 - y1 + y2 - y3;

    if dx3 == 0.0 && dy3 == 0.0 {
        return Ok(ProjectiveMatrix::new(
            x1 - x0,
            x2 - x1,
            x0,
            y1 - y0,
            y2 - y1,
            y0,
            0.0,
            0.0,
            1.0,
        ));
    }

    let dx1 = x1 - x2;
    let dy1 = y1 - y2;
    let dx2 = x3 - x2;
    let dy2 = y3 - y2;

    let den = dx1 * dy2 - dx2 * dy1;
    if den == 0.0 {
        return Err(GeometryError::DegenerateQuadrangle);
    }
    let inv_den = 1.0 / den;

    let m20 = (dx3 * dy2 - dx2 * dy3) * inv_den;
    let m21 = (dx1 * dy3 - dx3 * dy1) * inv_den;

    Ok(ProjectiveMatrix::new(
        x1 - x0 + m20 * x1,
        x3 - x0 + m21 * x3,
        x0,
        y1 - y0 + m20 * y1,
        y3 - y0 + m21 * y3,
        y0,
        m20,
        m21,
        1.0,
    ))
}

/// Builds the map from `quad` onto the unit square.
///
/// The result is the adjoint of [`square_to_quad`], so it is only defined up to
/// scale.
pub fn quad_to_square(quad: &Quadrangle) -> Result<ProjectiveMatrix, GeometryError> {
    let mut m = square_to_quad(quad)?;
    m.adjoint();
    Ok(m)
}

/// Builds the map sending each corner of `src` onto the matching corner of `dst`.
///
/// # Example
///
/// ```
/// use glam::DVec2;
/// use quadwarp_geometry::{quad_to_quad, Quadrangle};
///
/// let src = Quadrangle::new(
///     DVec2::new(0.0, 0.0),
///     DVec2::new(2.0, 0.0),
///     DVec2::new(2.0, 2.0),
///     DVec2::new(0.0, 2.0),
/// );
/// let dst = Quadrangle::new(
///     DVec2::new(0.0, 0.0),
///     DVec2::new(4.0, 0.0),
///     DVec2::new(4.0, 4.0),
///     DVec2::new(0.0, 4.0),
/// );
///
/// let m = quad_to_quad(&src, &dst).unwrap();
/// assert_eq!(m.transform_point(1.0, 0.5), (2.0, 1.0));
/// ```
pub fn quad_to_quad(src: &Quadrangle, dst: &Quadrangle) -> Result<ProjectiveMatrix, GeometryError> {
    let mut m = quad_to_square(src)?;
    m.concatenate(&square_to_quad(dst)?);
    Ok(m)
}

/// Builds the map from the corners of `rect` onto `quad`.
pub fn rect_to_quad(rect: &Rect, quad: &Quadrangle) -> Result<ProjectiveMatrix, GeometryError> {
    quad_to_quad(&Quadrangle::from_rect(rect), quad)
}

/// Builds the map from `quad` onto the corners of `rect`.
pub fn quad_to_rect(quad: &Quadrangle, rect: &Rect) -> Result<ProjectiveMatrix, GeometryError> {
    quad_to_quad(quad, &Quadrangle::from_rect(rect))
}
