/// An error type for the geometry module.
#[derive(thiserror::Error, Debug, Clone, PartialEq)]
pub enum GeometryError {
    /// The transform has a vanishing determinant or perspective divisor.
    #[error("transform cannot be inverted (|w| = {0:e} is below the divide epsilon)")]
    NonInvertible(f64),

    /// Three or more corners of the quadrangle are collinear.
    #[error("degenerate quadrangle: corners do not span a plane")]
    DegenerateQuadrangle,

    /// Source and destination point slices differ in length.
    #[error("point slices must have the same length ({0} != {1})")]
    PointCountMismatch(usize, usize),
}
