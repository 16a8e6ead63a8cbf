use super::bicubic::bicubic_interpolation;
use super::bilinear::bilinear_interpolation;
use super::nearest::nearest_neighbor_interpolation;

/// Blends the four samples surrounding an inverse-mapped point.
///
/// `ex` and `ey` are the offsets of the point from the cell origin, in
/// `[0, 1]`. The samples are named `p{row}{col}` relative to that origin:
///
/// ```text
/// p00 (x0, y0)      p01 (x0 + 1, y0)
/// p10 (x0, y0 + 1)  p11 (x0 + 1, y0 + 1)
/// ```
///
/// Implementations must be pure; the resampling loop calls them from several
/// threads at once.
pub trait InterpolationKernel: Sync {
    /// Returns the reconstructed sample, clamped to `[0, 255]`.
    fn interpolate(&self, ex: f32, ey: f32, p00: u8, p01: u8, p10: u8, p11: u8) -> u8;
}

/// Interpolation mode for the resampling operations
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum InterpolationMode {
    /// Nearest neighbor interpolation
    Nearest,
    /// Bilinear interpolation
    #[default]
    Bilinear,
    /// Four-corner weighted sum; see [`Bicubic`]
    Bicubic,
}

impl InterpolationKernel for InterpolationMode {
    fn interpolate(&self, ex: f32, ey: f32, p00: u8, p01: u8, p10: u8, p11: u8) -> u8 {
        match self {
            InterpolationMode::Nearest => nearest_neighbor_interpolation(ex, ey, p00, p01, p10, p11),
            InterpolationMode::Bilinear => bilinear_interpolation(ex, ey, p00, p01, p10, p11),
            InterpolationMode::Bicubic => bicubic_interpolation(ex, ey, p00, p01, p10, p11),
        }
    }
}

/// Nearest neighbor kernel.
#[derive(Debug, Clone, Copy, Default)]
pub struct Nearest;

impl InterpolationKernel for Nearest {
    fn interpolate(&self, ex: f32, ey: f32, p00: u8, p01: u8, p10: u8, p11: u8) -> u8 {
        nearest_neighbor_interpolation(ex, ey, p00, p01, p10, p11)
    }
}

/// Bilinear kernel.
#[derive(Debug, Clone, Copy, Default)]
pub struct Bilinear;

impl InterpolationKernel for Bilinear {
    fn interpolate(&self, ex: f32, ey: f32, p00: u8, p01: u8, p10: u8, p11: u8) -> u8 {
        bilinear_interpolation(ex, ey, p00, p01, p10, p11)
    }
}

/// The bicubic-labelled kernel.
///
/// It weights the same four corners as [`Bilinear`] by the opposite
/// sub-rectangle areas and therefore produces the same values; it does not
/// read a 4x4 neighbourhood.
#[derive(Debug, Clone, Copy, Default)]
pub struct Bicubic;

impl InterpolationKernel for Bicubic {
    fn interpolate(&self, ex: f32, ey: f32, p00: u8, p01: u8, p10: u8, p11: u8) -> u8 {
        bicubic_interpolation(ex, ey, p00, p01, p10, p11)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::Rng;

    #[test]
    fn default_mode_is_bilinear() {
        assert_eq!(InterpolationMode::default(), InterpolationMode::Bilinear);
    }

    #[test]
    fn modes_dispatch_to_kernels() {
        let cases: [(&dyn InterpolationKernel, InterpolationMode); 3] = [
            (&Nearest, InterpolationMode::Nearest),
            (&Bilinear, InterpolationMode::Bilinear),
            (&Bicubic, InterpolationMode::Bicubic),
        ];
        for (kernel, mode) in cases {
            for (ex, ey) in [(0.0, 0.0), (0.3, 0.8), (0.75, 0.25), (0.5, 0.5)] {
                assert_eq!(
                    kernel.interpolate(ex, ey, 9, 80, 160, 250),
                    mode.interpolate(ex, ey, 9, 80, 160, 250)
                );
            }
        }
    }

    #[test]
    fn output_stays_in_range() {
        let mut rng = rand::rng();
        let modes = [
            InterpolationMode::Nearest,
            InterpolationMode::Bilinear,
            InterpolationMode::Bicubic,
        ];
        for _ in 0..2000 {
            let (ex, ey): (f32, f32) = (rng.random_range(0.0..1.0), rng.random_range(0.0..1.0));
            let p: [u8; 4] = rng.random();
            let lo = *p.iter().min().unwrap_or(&0);
            let hi = *p.iter().max().unwrap_or(&255);
            for mode in modes {
                let v = mode.interpolate(ex, ey, p[0], p[1], p[2], p[3]);
                assert!((lo..=hi).contains(&v), "{mode:?} produced {v} outside {p:?}");
            }
        }
    }
}
