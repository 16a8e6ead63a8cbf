use std::borrow::Cow;

use log::debug;
use quadwarp_geometry::{DVec2, ProjectiveMatrix, Rect};
use quadwarp_image::{
    BufferAllocator, ChannelOrderConverter, ColorConverter, ColorModel, CpuAllocator, Image,
    ImageSize, PixelBuffer,
};

use crate::{
    error::WarpError,
    fill::FillPolicy,
    interpolation::InterpolationMode,
    parallel::{CancelToken, ExecutionStrategy},
};

use super::perspective::{warp_buffer, warp_perspective_with_kernel};

/// A perspective resampling operation.
///
/// Owns its transform (source to destination), interpolation mode and fill
/// policy; none of them change after construction. Each call to
/// [`TransformOp::filter`] validates, prepares the destination, fills the
/// background, resamples and converts in one pass, and aborts on the first
/// error.
///
/// # Example
///
/// ```
/// use quadwarp_geometry::{build_quad_to_quad, DVec2, Quadrangle};
/// use quadwarp_image::{Image, ImageSize};
/// use quadwarp_imgproc::{fill::FillPolicy, interpolation::InterpolationMode, warp::TransformOp};
///
/// let square = |s: f64| {
///     Quadrangle::new(
///         DVec2::new(0.0, 0.0),
///         DVec2::new(s, 0.0),
///         DVec2::new(s, s),
///         DVec2::new(0.0, s),
///     )
/// };
/// let m = build_quad_to_quad(&square(2.0), &square(4.0)).unwrap();
///
/// let src = Image::<u8, 1>::new(ImageSize { width: 2, height: 2 }, vec![0, 255, 255, 0]).unwrap();
/// let op = TransformOp::new(m, InterpolationMode::Bilinear, FillPolicy::TransparentFill);
/// let dst = op.filter(&src, None).unwrap();
///
/// assert_eq!(dst.size(), ImageSize { width: 4, height: 4 });
/// assert_eq!(dst.get_pixel(1, 1, 0).unwrap(), 128);
/// ```
#[derive(Debug, Clone)]
pub struct TransformOp {
    transform: ProjectiveMatrix,
    interpolation: InterpolationMode,
    fill: FillPolicy,
    strategy: ExecutionStrategy,
}

impl TransformOp {
    /// Creates an operation mapping source pixels through `transform`.
    pub fn new(transform: ProjectiveMatrix, interpolation: InterpolationMode, fill: FillPolicy) -> Self {
        Self {
            transform,
            interpolation,
            fill,
            strategy: ExecutionStrategy::default(),
        }
    }

    /// Bilinear interpolation with a transparent background.
    pub fn from_matrix(transform: ProjectiveMatrix) -> Self {
        Self::new(transform, InterpolationMode::default(), FillPolicy::default())
    }

    /// Runs the resampling loop under `strategy`.
    pub fn with_strategy(mut self, strategy: ExecutionStrategy) -> Self {
        self.strategy = strategy;
        self
    }

    /// A copy of the transform.
    pub fn transform(&self) -> ProjectiveMatrix {
        self.transform
    }

    /// The interpolation mode.
    pub fn interpolation(&self) -> InterpolationMode {
        self.interpolation
    }

    /// The fill policy.
    pub fn fill_policy(&self) -> FillPolicy {
        self.fill
    }

    /// The execution strategy.
    pub fn strategy(&self) -> ExecutionStrategy {
        self.strategy
    }

    /// Where a source point lands in the destination.
    pub fn point(&self, x: f64, y: f64) -> (f64, f64) {
        self.transform.transform_point(x, y)
    }

    /// Encloses the forward-mapped corners of a source of `size`.
    ///
    /// Minimum coordinates are floored and maximum coordinates ceiled.
    ///
    /// # Errors
    ///
    /// * [`WarpError::InvalidArgument`] when a corner maps to a non-finite point.
    /// * [`WarpError::DegenerateBounds`] when the rectangle has no area.
    pub fn destination_bounds(&self, size: ImageSize) -> Result<Rect, WarpError> {
        let (w, h) = (size.width as f64, size.height as f64);
        let corners = [(0.0, 0.0), (w, 0.0), (w, h), (0.0, h)].map(|(x, y)| {
            let (u, v) = self.point(x, y);
            DVec2::new(u, v)
        });

        let bounds = Rect::enclosing(&corners).ok_or_else(|| {
            WarpError::InvalidArgument(format!(
                "source corners map outside the integer plane: {corners:?}"
            ))
        })?;
        if bounds.is_empty() {
            return Err(WarpError::DegenerateBounds {
                width: bounds.width,
                height: bounds.height,
            });
        }
        Ok(bounds)
    }

    /// Allocates a zeroed destination for `src` on the heap.
    ///
    /// See [`TransformOp::create_compatible_destination_with`].
    pub fn create_compatible_destination<const C: usize>(
        &self,
        src: &Image<u8, C>,
    ) -> Result<Image<u8, C>, WarpError> {
        self.create_compatible_destination_with(src, &CpuAllocator)
    }

    /// Allocates a zeroed destination for `src` through `allocator`.
    ///
    /// The destination spans from the origin to the far corner of
    /// [`TransformOp::destination_bounds`]; content mapped to negative
    /// coordinates is cut off. It keeps the source color model, except that an
    /// indexed source resampled with blending gets the plain model of the same
    /// color space.
    ///
    /// # Errors
    ///
    /// * [`WarpError::DegenerateBounds`] when that span is not positive.
    /// * [`WarpError::InvalidArgument`] when the span does not fit in `i64`.
    /// * [`WarpError::Image`] with [`quadwarp_image::ImageError::ImageTooLarge`]
    ///   when the destination buffer is not addressable.
    pub fn create_compatible_destination_with<A, const C: usize>(
        &self,
        src: &Image<u8, C>,
        allocator: &A,
    ) -> Result<Image<u8, C>, WarpError>
    where
        A: BufferAllocator,
    {
        let bounds = self.destination_bounds(src.size())?;
        let (Some(width), Some(height)) = (bounds.right(), bounds.bottom()) else {
            return Err(WarpError::InvalidArgument(format!(
                "destination extent overflows: {bounds:?}"
            )));
        };
        if width <= 0 || height <= 0 {
            return Err(WarpError::DegenerateBounds { width, height });
        }

        let mut model = src.color_model();
        if model.indexed && self.interpolation != InterpolationMode::Nearest {
            model = plain(model);
        }

        let size = ImageSize {
            width: width as usize,
            height: height as usize,
        };
        size.buffer_len(C)?;
        debug!("allocating {size} destination with color model {model}");
        Ok(allocator.create_compatible(size, model)?)
    }

    /// Resamples `src` into `dst`, or into a fresh destination when `dst` is `None`.
    ///
    /// Allocation goes through [`CpuAllocator`] and color conversion through
    /// [`ChannelOrderConverter`].
    ///
    /// # Errors
    ///
    /// * [`WarpError::NonInvertible`] when the transform is singular.
    /// * [`WarpError::InvalidArgument`] for an empty source.
    /// * [`WarpError::DegenerateBounds`] when a fresh destination would be empty.
    /// * [`WarpError::UnsupportedColorModel`] when the color models cannot be
    ///   reconciled.
    pub fn filter<const C: usize>(
        &self,
        src: &Image<u8, C>,
        dst: Option<Image<u8, C>>,
    ) -> Result<Image<u8, C>, WarpError> {
        self.filter_with(src, dst, &CpuAllocator, &ChannelOrderConverter, None)
    }

    /// Like [`TransformOp::filter`], polling `cancel` once per row.
    pub fn filter_cancellable<const C: usize>(
        &self,
        src: &Image<u8, C>,
        dst: Option<Image<u8, C>>,
        cancel: &CancelToken,
    ) -> Result<Image<u8, C>, WarpError> {
        self.filter_with(src, dst, &CpuAllocator, &ChannelOrderConverter, Some(cancel))
    }

    /// Like [`TransformOp::filter`] with explicit collaborators.
    ///
    /// Color models are reconciled as follows:
    ///
    /// * an indexed destination resampled with blending is resampled into the
    ///   plain model of its color space and converted back;
    /// * an opaque source whose model differs from that working model is
    ///   converted before resampling;
    /// * any other source is resampled in its own model and the result is
    ///   converted afterwards.
    pub fn filter_with<A, V, const C: usize>(
        &self,
        src: &Image<u8, C>,
        dst: Option<Image<u8, C>>,
        allocator: &A,
        converter: &V,
        cancel: Option<&CancelToken>,
    ) -> Result<Image<u8, C>, WarpError>
    where
        A: BufferAllocator,
        V: ColorConverter,
    {
        self.validate(src.size())?;

        let mut dst = match dst {
            Some(dst) => dst,
            None => self.create_compatible_destination_with(src, allocator)?,
        };

        let target = dst.color_model();
        let working = if target.indexed && self.interpolation != InterpolationMode::Nearest {
            plain(target)
        } else {
            target
        };

        let src_model = src.color_model();
        let (src, model) = if src_model.is_compatible_with(&working) {
            (Cow::Borrowed(src), working)
        } else if src_model.is_opaque() {
            debug!("converting source from {src_model} to {working}");
            (Cow::Owned(converter.convert(src, &working)?), working)
        } else {
            (Cow::Borrowed(src), src_model)
        };

        if model.is_compatible_with(&target) {
            self.resample_into(&src, &mut dst, cancel)?;
            return Ok(dst);
        }

        debug!("resampling into an intermediate {model} buffer for a {target} destination");
        let mut tmp = converter.convert(&dst, &model)?;
        self.resample_into(&src, &mut tmp, cancel)?;
        Ok(converter.convert(&tmp, &target)?)
    }

    /// Resamples between runtime buffers of the same color model.
    ///
    /// # Errors
    ///
    /// * [`WarpError::InvalidArgument`] when the channel counts differ or both
    ///   handles refer to the same storage.
    /// * [`WarpError::UnsupportedColorModel`] when the color models differ;
    ///   this path does not convert.
    pub fn filter_buffer(
        &self,
        src: &dyn PixelBuffer,
        dst: &mut dyn PixelBuffer,
        cancel: Option<&CancelToken>,
    ) -> Result<(), WarpError> {
        if src.num_channels() != dst.num_channels() {
            return Err(WarpError::InvalidArgument(format!(
                "source has {} channels but destination has {}",
                src.num_channels(),
                dst.num_channels()
            )));
        }
        self.validate(src.size())?;
        if src.storage_addr() == dst.storage_addr() {
            return Err(WarpError::InvalidArgument(
                "source and destination share storage".to_string(),
            ));
        }

        let (src_model, dst_model) = (src.color_model(), dst.color_model());
        if !src_model.is_compatible_with(&dst_model) {
            return Err(WarpError::UnsupportedColorModel(format!(
                "cannot resample {src_model} into {dst_model} without conversion"
            )));
        }

        debug!(
            "warping buffer {} -> {} with {:?}, fill {:?}",
            src.size(),
            dst.size(),
            self.interpolation,
            self.fill
        );
        self.fill.fill_buffer(dst)?;
        warp_buffer(src, dst, &self.transform, &self.interpolation, cancel)
    }

    fn validate(&self, size: ImageSize) -> Result<(), WarpError> {
        let det = self.transform.determinant();
        if !self.transform.is_invertible() {
            return Err(WarpError::NonInvertible(det));
        }
        if size.is_empty() {
            return Err(WarpError::InvalidArgument(format!("empty source: {size}")));
        }
        Ok(())
    }

    fn resample_into<const C: usize>(
        &self,
        src: &Image<u8, C>,
        dst: &mut Image<u8, C>,
        cancel: Option<&CancelToken>,
    ) -> Result<(), WarpError> {
        debug!(
            "warping {} -> {} with {:?}, fill {:?}, strategy {:?}",
            src.size(),
            dst.size(),
            self.interpolation,
            self.fill,
            self.strategy
        );
        self.fill.fill_image(dst);
        warp_perspective_with_kernel(
            src,
            dst,
            &self.transform,
            &self.interpolation,
            self.strategy,
            cancel,
        )
    }
}

fn plain(model: ColorModel) -> ColorModel {
    ColorModel {
        indexed: false,
        ..model
    }
}

#[cfg(test)]
mod tests {
    use quadwarp_geometry::{build_quad_to_quad, Quadrangle};
    use quadwarp_image::{ColorModel, ImageError};

    use super::*;

    fn size(width: usize, height: usize) -> ImageSize {
        ImageSize { width, height }
    }

    fn square(s: f64) -> Quadrangle {
        Quadrangle::new(
            DVec2::new(0.0, 0.0),
            DVec2::new(s, 0.0),
            DVec2::new(s, s),
            DVec2::new(0.0, s),
        )
    }

    #[test]
    fn accessors() {
        let mut m = ProjectiveMatrix::identity();
        m.translate(3.0, -1.0);
        let op = TransformOp::from_matrix(m).with_strategy(ExecutionStrategy::Serial);
        assert_eq!(op.transform(), m);
        assert_eq!(op.interpolation(), InterpolationMode::Bilinear);
        assert_eq!(op.fill_policy(), FillPolicy::TransparentFill);
        assert_eq!(op.strategy(), ExecutionStrategy::Serial);
        assert_eq!(op.point(1.0, 1.0), (4.0, 0.0));
    }

    #[test]
    fn destination_bounds() -> Result<(), WarpError> {
        let mut m = ProjectiveMatrix::identity();
        m.translate(-0.5, 2.25);
        let op = TransformOp::from_matrix(m);
        assert_eq!(op.destination_bounds(size(4, 3))?, Rect::new(-1, 2, 5, 4));
        Ok(())
    }

    #[test]
    fn destination_bounds_degenerate() {
        let mut m = ProjectiveMatrix::identity();
        m.scale(1.0, 0.0);
        let op = TransformOp::from_matrix(m);
        assert_eq!(
            op.destination_bounds(size(4, 4)),
            Err(WarpError::DegenerateBounds {
                width: 4,
                height: 0
            })
        );
    }

    #[test]
    fn compatible_destination_size() -> Result<(), WarpError> {
        let src = Image::<u8, 1>::from_size_val(size(4, 4), 0)?;

        let mut m = ProjectiveMatrix::identity();
        m.translate(2.0, 1.0);
        let dst = TransformOp::from_matrix(m).create_compatible_destination(&src)?;
        assert_eq!(dst.size(), size(6, 5));

        // entirely left of the origin
        let mut m = ProjectiveMatrix::identity();
        m.translate(-10.0, 0.0);
        let res = TransformOp::from_matrix(m).create_compatible_destination(&src);
        assert_eq!(
            res,
            Err(WarpError::DegenerateBounds {
                width: -6,
                height: 4
            })
        );
        Ok(())
    }

    #[test]
    fn indexed_source_gets_plain_destination() -> Result<(), WarpError> {
        let src = Image::<u8, 1>::with_color_model(size(2, 2), vec![0; 4], ColorModel::indexed_gray())?;
        let m = ProjectiveMatrix::identity();

        let blended = TransformOp::from_matrix(m).create_compatible_destination(&src)?;
        assert_eq!(blended.color_model(), ColorModel::gray());

        let nearest = TransformOp::new(m, InterpolationMode::Nearest, FillPolicy::None)
            .create_compatible_destination(&src)?;
        assert_eq!(nearest.color_model(), ColorModel::indexed_gray());
        Ok(())
    }

    #[test]
    fn scale_two_by_quad() -> Result<(), WarpError> {
        let src = Image::<u8, 1>::new(size(2, 2), vec![0, 255, 255, 0])?;
        let m = build_quad_to_quad(&square(2.0), &square(4.0))?;
        let op = TransformOp::new(m, InterpolationMode::Bilinear, FillPolicy::TransparentFill);

        let dst = op.filter(&src, None)?;
        assert_eq!(dst.size(), size(4, 4));
        assert_eq!(dst.get_pixel(1, 1, 0)?, 128);
        assert_eq!(dst.get_pixel(0, 0, 0)?, 0);
        assert_eq!(dst.get_pixel(2, 0, 0)?, 255);
        Ok(())
    }

    #[test]
    fn singular_transform_rejected_before_work() -> Result<(), WarpError> {
        let src = Image::<u8, 1>::from_size_val(size(2, 2), 5)?;
        let dst = Image::<u8, 1>::from_size_val(size(2, 2), 9)?;
        let op = TransformOp::from_matrix(ProjectiveMatrix::new(
            1.0, 2.0, 0.0, 2.0, 4.0, 0.0, 0.0, 0.0, 1.0,
        ));
        let res = op.filter(&src, Some(dst));
        assert!(matches!(res, Err(WarpError::NonInvertible(_))));
        Ok(())
    }

    #[test]
    fn empty_source_rejected() -> Result<(), WarpError> {
        let src = Image::<u8, 1>::new(size(0, 3), vec![])?;
        let res = TransformOp::from_matrix(ProjectiveMatrix::identity()).filter(&src, None);
        assert!(matches!(res, Err(WarpError::InvalidArgument(_))));
        Ok(())
    }

    #[test]
    fn fill_policy_applied_to_given_destination() -> Result<(), WarpError> {
        let src = Image::<u8, 4>::from_size_val(size(2, 2), 200)?;
        let mut m = ProjectiveMatrix::identity();
        m.translate(3.0, 0.0);

        let dst = Image::<u8, 4>::from_size_val(size(6, 2), 77)?;
        let op = TransformOp::new(m, InterpolationMode::Nearest, FillPolicy::BlackFill);
        let dst = op.filter(&src, Some(dst))?;
        assert_eq!(dst.pixel(0, 0), Some(&[255u8, 0, 0, 0][..]));
        assert_eq!(dst.pixel(3, 1), Some(&[200u8; 4][..]));

        let dst = Image::<u8, 4>::from_size_val(size(6, 2), 77)?;
        let op = TransformOp::new(m, InterpolationMode::Nearest, FillPolicy::None);
        let dst = op.filter(&src, Some(dst))?;
        assert_eq!(dst.pixel(0, 0), Some(&[77u8; 4][..]));
        Ok(())
    }

    #[test]
    fn opaque_source_converted_first() -> Result<(), WarpError> {
        let src = Image::<u8, 3>::new(size(1, 1), vec![10, 20, 30])?;
        let dst = Image::<u8, 3>::with_color_model(size(1, 1), vec![0; 3], ColorModel::bgr())?;
        let out = TransformOp::from_matrix(ProjectiveMatrix::identity()).filter(&src, Some(dst))?;
        assert_eq!(out.color_model(), ColorModel::bgr());
        assert_eq!(out.as_slice(), &[30, 20, 10]);
        Ok(())
    }

    #[test]
    fn translucent_source_converted_after() -> Result<(), WarpError> {
        let mut model = ColorModel::rgb();
        model.transparency = quadwarp_image::Transparency::Translucent;
        let src = Image::<u8, 3>::with_color_model(size(2, 1), vec![1, 2, 3, 4, 5, 6], model)?;
        let dst = Image::<u8, 3>::with_color_model(size(2, 1), vec![0; 6], ColorModel::bgr())?;

        let op = TransformOp::new(
            ProjectiveMatrix::identity(),
            InterpolationMode::Nearest,
            FillPolicy::None,
        );
        let out = op.filter(&src, Some(dst))?;
        assert_eq!(out.color_model(), ColorModel::bgr());
        assert_eq!(out.as_slice(), &[3, 2, 1, 6, 5, 4]);
        Ok(())
    }

    #[test]
    fn indexed_destination_substituted() -> Result<(), WarpError> {
        let src = Image::<u8, 1>::new(size(2, 1), vec![0, 100])?;
        let dst =
            Image::<u8, 1>::with_color_model(size(3, 1), vec![0; 3], ColorModel::indexed_gray())?;
        let mut m = ProjectiveMatrix::identity();
        m.scale(2.0, 1.0);

        let op = TransformOp::new(m, InterpolationMode::Bilinear, FillPolicy::None);
        let out = op.filter(&src, Some(dst))?;
        assert_eq!(out.color_model(), ColorModel::indexed_gray());
        assert_eq!(out.as_slice(), &[0, 50, 100]);
        Ok(())
    }

    #[test]
    fn unsupported_conversion_surfaces() -> Result<(), WarpError> {
        let src = Image::<u8, 1>::new(size(1, 1), vec![0])?;
        let mut premultiplied = ColorModel::gray();
        premultiplied.alpha_premultiplied = true;
        let dst = Image::<u8, 1>::with_color_model(size(1, 1), vec![0], premultiplied)?;

        let res = TransformOp::from_matrix(ProjectiveMatrix::identity()).filter(&src, Some(dst));
        assert!(matches!(res, Err(WarpError::UnsupportedColorModel(_))));
        Ok(())
    }

    #[test]
    fn filter_cancelled() -> Result<(), WarpError> {
        let src = Image::<u8, 1>::from_size_val(size(4, 4), 1)?;
        let token = CancelToken::new();
        token.cancel();
        let res = TransformOp::from_matrix(ProjectiveMatrix::identity())
            .filter_cancellable(&src, None, &token);
        assert_eq!(res, Err(WarpError::Cancelled));
        Ok(())
    }

    #[test]
    fn filter_buffer_checks() -> Result<(), WarpError> {
        let op = TransformOp::from_matrix(ProjectiveMatrix::identity());
        let src = Image::<u8, 3>::from_size_val(size(2, 2), 40)?;

        let mut gray = Image::<u8, 1>::from_size_val(size(2, 2), 0)?;
        assert!(matches!(
            op.filter_buffer(&src, &mut gray, None),
            Err(WarpError::InvalidArgument(_))
        ));

        let mut bgr = Image::<u8, 3>::with_color_model(size(2, 2), vec![0; 12], ColorModel::bgr())?;
        assert!(matches!(
            op.filter_buffer(&src, &mut bgr, None),
            Err(WarpError::UnsupportedColorModel(_))
        ));

        let mut rgb = Image::<u8, 3>::from_size_val(size(2, 2), 0)?;
        op.filter_buffer(&src, &mut rgb, None)?;
        assert_eq!(rgb, src);
        Ok(())
    }

    #[test]
    fn errors_convert() {
        let e: WarpError = ImageError::UnsupportedColorModel("x".to_string()).into();
        assert_eq!(e, WarpError::UnsupportedColorModel("x".to_string()));
        let e: WarpError = ImageError::CastError("u8".to_string()).into();
        assert!(matches!(e, WarpError::Image(_)));
    }
}
