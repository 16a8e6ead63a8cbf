use glam::DVec2;

use crate::error::GeometryError;

/// Capability shared by every planar transform in this crate.
///
/// Point-array helpers are provided on top of the two single-point mappings,
/// so implementors only describe how one point moves.
pub trait Transform2D {
    /// Maps a point forward through the transform.
    fn transform_point(&self, x: f64, y: f64) -> (f64, f64);

    /// Maps a point backwards through the transform.
    ///
    /// # Errors
    ///
    /// Returns [`GeometryError::NonInvertible`] when the point has no preimage.
    fn inverse_transform_point(&self, x: f64, y: f64) -> Result<(f64, f64), GeometryError>;

    /// Maps every point of `src` forward into `dst`.
    ///
    /// # Errors
    ///
    /// The slices must have the same length.
    fn transform_points(&self, src: &[DVec2], dst: &mut [DVec2]) -> Result<(), GeometryError> {
        if src.len() != dst.len() {
            return Err(GeometryError::PointCountMismatch(src.len(), dst.len()));
        }
        for (s, d) in src.iter().zip(dst.iter_mut()) {
            let (x, y) = self.transform_point(s.x, s.y);
            *d = DVec2::new(x, y);
        }
        Ok(())
    }

    /// Maps every point of `src` backwards into `dst`.
    ///
    /// Stops at the first point without a preimage; `dst` is then only
    /// partially written.
    fn inverse_transform_points(
        &self,
        src: &[DVec2],
        dst: &mut [DVec2],
    ) -> Result<(), GeometryError> {
        if src.len() != dst.len() {
            return Err(GeometryError::PointCountMismatch(src.len(), dst.len()));
        }
        for (s, d) in src.iter().zip(dst.iter_mut()) {
            let (x, y) = self.inverse_transform_point(s.x, s.y)?;
            *d = DVec2::new(x, y);
        }
        Ok(())
    }
}
