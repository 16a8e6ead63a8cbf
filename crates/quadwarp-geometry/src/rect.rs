use glam::DVec2;

/// An integer rectangle anchored at its top-left corner.
///
/// Width and height may be zero or negative; callers that need a drawable
/// area check them explicitly.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Rect {
    /// Left edge.
    pub x: i64,
    /// Top edge.
    pub y: i64,
    /// Extent along x.
    pub width: i64,
    /// Extent along y.
    pub height: i64,
}

impl Rect {
    /// Creates a rectangle from its origin and extent.
    pub fn new(x: i64, y: i64, width: i64, height: i64) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// The smallest integer rectangle enclosing every point.
    ///
    /// Minimum coordinates are floored and maximum coordinates ceiled.
    /// Coordinates beyond the `i64` range saturate. Returns `None` for an empty
    /// slice, when any coordinate is not finite or when the extent does not
    /// fit in `i64`.
    pub fn enclosing(points: &[DVec2]) -> Option<Self> {
        let first = points.first()?;
        let (mut min, mut max) = (*first, *first);
        for p in points {
            if !p.is_finite() {
                return None;
            }
            min = min.min(*p);
            max = max.max(*p);
        }

        let (x0, y0) = (min.x.floor() as i64, min.y.floor() as i64);
        let (x1, y1) = (max.x.ceil() as i64, max.y.ceil() as i64);
        Some(Self::new(x0, y0, x1.checked_sub(x0)?, y1.checked_sub(y0)?))
    }

    /// One past the right edge, or `None` on overflow.
    pub fn right(&self) -> Option<i64> {
        self.x.checked_add(self.width)
    }

    /// One past the bottom edge, or `None` on overflow.
    pub fn bottom(&self) -> Option<i64> {
        self.y.checked_add(self.height)
    }

    /// Whether the rectangle covers no pixels.
    pub fn is_empty(&self) -> bool {
        self.width <= 0 || self.height <= 0
    }
}
