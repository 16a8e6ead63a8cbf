use crate::{
    color_model::{ColorModel, ColorSpace},
    error::ImageError,
    image::Image,
};

/// Converts rasters between color models of the same channel count.
pub trait ColorConverter {
    /// Returns a copy of `src` expressed under `target`.
    ///
    /// # Errors
    ///
    /// [`ImageError::UnsupportedColorModel`] when no conversion exists.
    fn convert<const C: usize>(
        &self,
        src: &Image<u8, C>,
        target: &ColorModel,
    ) -> Result<Image<u8, C>, ImageError>;
}

/// Handles conversions that only reorder or relabel channels.
///
/// Supported pairs:
/// * identical color spaces, including indexed and plain gray (the palette is
///   the identity ramp),
/// * RGB and BGR in either direction.
#[derive(Clone, Copy, Debug, Default)]
pub struct ChannelOrderConverter;

impl ColorConverter for ChannelOrderConverter {
    fn convert<const C: usize>(
        &self,
        src: &Image<u8, C>,
        target: &ColorModel,
    ) -> Result<Image<u8, C>, ImageError> {
        target.check_channels(C)?;
        let from = src.color_model();
        if from.alpha_premultiplied != target.alpha_premultiplied {
            return Err(ImageError::UnsupportedColorModel(format!(
                "cannot change alpha premultiplication from {from} to {target}"
            )));
        }

        let mut data = src.as_slice().to_vec();
        match (from.color_space, target.color_space) {
            (a, b) if a == b => {}
            (ColorSpace::Rgb, ColorSpace::Bgr) | (ColorSpace::Bgr, ColorSpace::Rgb) => {
                data.chunks_exact_mut(C).for_each(|px| px.swap(0, 2));
            }
            _ => {
                return Err(ImageError::UnsupportedColorModel(format!(
                    "no conversion from {from} to {target}"
                )))
            }
        }

        Image::with_color_model(src.size(), data, *target)
    }
}
