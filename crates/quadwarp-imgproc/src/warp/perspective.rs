use quadwarp_geometry::ProjectiveMatrix;
use quadwarp_image::{Image, ImageSize, PixelBuffer};

use crate::{
    error::WarpError,
    interpolation::{InterpolationKernel, InterpolationMode},
    parallel::{self, CancelToken, ExecutionStrategy},
};

/// The 2x2 source cell an inverse-mapped point is reconstructed from.
#[derive(Debug, Clone, Copy, PartialEq)]
struct Cell {
    x0: usize,
    x1: usize,
    y0: usize,
    y1: usize,
    ex: f32,
    ey: f32,
}

impl Cell {
    /// Locates the cell for the source point `(sx, sy)`.
    ///
    /// Points whose floored coordinate lies more than one pixel outside the
    /// source yield `None`. Closer points are clamped onto the border cell, so
    /// the fetch never leaves the source.
    fn locate(sx: f64, sy: f64, size: ImageSize) -> Option<Self> {
        if !sx.is_finite() || !sy.is_finite() {
            return None;
        }
        let (xt, yt) = (sx.floor(), sy.floor());
        if xt < -1.0 || xt > (size.width - 1) as f64 || yt < -1.0 || yt > (size.height - 1) as f64
        {
            return None;
        }
        let (x0, x1, ex) = clamp_axis(sx, xt, size.width);
        let (y0, y1, ey) = clamp_axis(sy, yt, size.height);
        Some(Self {
            x0,
            x1,
            y0,
            y1,
            ex,
            ey,
        })
    }
}

// origin in [0, len - 2], offset measured from the clamped origin
fn clamp_axis(s: f64, t: f64, len: usize) -> (usize, usize, f32) {
    let i0 = (t.max(0.0) as usize).min(len.saturating_sub(2));
    let i1 = (i0 + 1).min(len - 1);
    let e = ((s - i0 as f64) as f32).clamp(0.0, 1.0);
    (i0, i1, e)
}

/// Applies a perspective transformation to an 8-bit image.
///
/// Uses the default [`ExecutionStrategy`] and no cancellation.
///
/// * `src` - The input image with shape (height, width, channels).
/// * `dst` - The output image; its size is the destination area.
/// * `m` - The 3x3 perspective transformation matrix src -> dst.
/// * `interpolation` - The interpolation mode to use.
///
/// # Example
///
/// ```
/// use quadwarp_geometry::ProjectiveMatrix;
/// use quadwarp_image::{Image, ImageSize};
/// use quadwarp_imgproc::interpolation::InterpolationMode;
/// use quadwarp_imgproc::warp::warp_perspective_u8;
///
/// let src = Image::<u8, 1>::new(
///   ImageSize {
///     width: 4,
///     height: 1,
///   },
///   vec![0, 10, 20, 30],
/// ).unwrap();
///
/// let mut m = ProjectiveMatrix::identity();
/// m.translate(-1.0, 0.0);
///
/// let mut dst = Image::<u8, 1>::from_size_val(src.size(), 99).unwrap();
/// warp_perspective_u8(&src, &mut dst, &m, InterpolationMode::Bilinear).unwrap();
///
/// // the last column maps to x = 4, outside the source, and keeps its value
/// assert_eq!(dst.as_slice(), &[10, 20, 30, 99]);
/// ```
pub fn warp_perspective_u8<const C: usize>(
    src: &Image<u8, C>,
    dst: &mut Image<u8, C>,
    m: &ProjectiveMatrix,
    interpolation: InterpolationMode,
) -> Result<(), WarpError> {
    warp_perspective_with_kernel(
        src,
        dst,
        m,
        &interpolation,
        ExecutionStrategy::default(),
        None,
    )
}

/// Resamples `src` into `dst` through `m` with an arbitrary kernel.
///
/// For every destination pixel the source location is found with the adjoint
/// of `m`. Pixels mapping more than one pixel outside the source are not
/// written, so they keep whatever background the destination holds.
///
/// # Errors
///
/// * [`WarpError::NonInvertible`] as soon as one pixel has no preimage. Rows
///   finished before that stay written.
/// * [`WarpError::Cancelled`] when `cancel` triggers between rows.
pub fn warp_perspective_with_kernel<K, const C: usize>(
    src: &Image<u8, C>,
    dst: &mut Image<u8, C>,
    m: &ProjectiveMatrix,
    kernel: &K,
    strategy: ExecutionStrategy,
    cancel: Option<&CancelToken>,
) -> Result<(), WarpError>
where
    K: InterpolationKernel + ?Sized,
{
    let src_size = src.size();
    if src_size.is_empty() {
        return Ok(());
    }

    let inv = m.create_adjoint();
    let src_data = src.as_slice();
    let src_cols = src.cols();
    let dst_cols = dst.cols();

    parallel::try_for_each_row(
        dst.as_slice_mut(),
        dst_cols * C,
        strategy,
        cancel,
        |y, row| -> Result<(), WarpError> {
            for (x, px) in row.chunks_exact_mut(C).enumerate() {
                let (sx, sy) = inv.try_transform_point(x as f64, y as f64)?;
                let Some(cell) = Cell::locate(sx, sy, src_size) else {
                    continue;
                };

                let base00 = (cell.y0 * src_cols + cell.x0) * C;
                let base01 = (cell.y0 * src_cols + cell.x1) * C;
                let base10 = (cell.y1 * src_cols + cell.x0) * C;
                let base11 = (cell.y1 * src_cols + cell.x1) * C;

                for (k, out) in px.iter_mut().enumerate() {
                    *out = kernel.interpolate(
                        cell.ex,
                        cell.ey,
                        src_data[base00 + k],
                        src_data[base01 + k],
                        src_data[base10 + k],
                        src_data[base11 + k],
                    );
                }
            }
            Ok(())
        },
    )
}

/// Resamples between two runtime buffers, one row after the other.
///
/// Same per-pixel contract as [`warp_perspective_with_kernel`], reached
/// through [`PixelBuffer`] so the channel count is only known at runtime.
///
/// # Errors
///
/// Besides the pipeline errors, [`WarpError::InvalidArgument`] when the
/// buffers differ in channel count.
pub fn warp_buffer(
    src: &dyn PixelBuffer,
    dst: &mut dyn PixelBuffer,
    m: &ProjectiveMatrix,
    kernel: &dyn InterpolationKernel,
    cancel: Option<&CancelToken>,
) -> Result<(), WarpError> {
    let channels = src.num_channels();
    if dst.num_channels() != channels {
        return Err(WarpError::InvalidArgument(format!(
            "source has {} channels but destination has {}",
            channels,
            dst.num_channels()
        )));
    }

    let src_size = src.size();
    if src_size.is_empty() {
        return Ok(());
    }
    let dst_size = dst.size();
    let inv = m.create_adjoint();

    let (mut p00, mut p01) = (vec![0u8; channels], vec![0u8; channels]);
    let (mut p10, mut p11) = (vec![0u8; channels], vec![0u8; channels]);
    let mut out = vec![0u8; channels];

    for y in 0..dst_size.height {
        if cancel.is_some_and(CancelToken::is_cancelled) {
            return Err(WarpError::Cancelled);
        }
        for x in 0..dst_size.width {
            let (sx, sy) = inv.try_transform_point(x as f64, y as f64)?;
            let Some(cell) = Cell::locate(sx, sy, src_size) else {
                continue;
            };

            src.get_pixel_channels(cell.x0, cell.y0, &mut p00)?;
            src.get_pixel_channels(cell.x0, cell.y1, &mut p10)?;
            src.get_pixel_channels(cell.x1, cell.y0, &mut p01)?;
            src.get_pixel_channels(cell.x1, cell.y1, &mut p11)?;

            for k in 0..channels {
                out[k] = kernel.interpolate(cell.ex, cell.ey, p00[k], p01[k], p10[k], p11[k]);
            }
            dst.set_pixel_channels(x, y, &out)?;
        }
    }
    Ok(())
}
