use crate::{
    color_model::ColorModel,
    error::ImageError,
    image::{Image, ImageSize},
};

/// Pixel-level access to an 8-bit raster whose channel count is only known at
/// runtime.
///
/// This is the seam through which foreign raster storage reaches the
/// resampling code. [`Image`] implements it for every channel count.
pub trait PixelBuffer {
    /// Size of the raster in pixels.
    fn size(&self) -> ImageSize;

    /// Number of channels per pixel.
    fn num_channels(&self) -> usize;

    /// How the channels are interpreted.
    fn color_model(&self) -> ColorModel;

    /// Copies the channels of pixel `(x, y)` into `out`.
    ///
    /// `out` must hold exactly [`PixelBuffer::num_channels`] values.
    fn get_pixel_channels(&self, x: usize, y: usize, out: &mut [u8]) -> Result<(), ImageError>;

    /// Overwrites the channels of pixel `(x, y)` with `values`.
    fn set_pixel_channels(&mut self, x: usize, y: usize, values: &[u8]) -> Result<(), ImageError>;

    /// Address of the first sample, used to detect two handles on one storage.
    fn storage_addr(&self) -> usize;
}

fn check_len(len: usize, channels: usize) -> Result<(), ImageError> {
    if len != channels {
        return Err(ImageError::InvalidChannelShape(len, channels));
    }
    Ok(())
}

impl<const C: usize> PixelBuffer for Image<u8, C> {
    fn size(&self) -> ImageSize {
        Image::size(self)
    }

    fn num_channels(&self) -> usize {
        C
    }

    fn color_model(&self) -> ColorModel {
        Image::color_model(self)
    }

    fn get_pixel_channels(&self, x: usize, y: usize, out: &mut [u8]) -> Result<(), ImageError> {
        check_len(out.len(), C)?;
        let px = self.pixel(x, y).ok_or(ImageError::PixelIndexOutOfBounds(
            x,
            y,
            self.width(),
            self.height(),
        ))?;
        out.copy_from_slice(px);
        Ok(())
    }

    fn set_pixel_channels(&mut self, x: usize, y: usize, values: &[u8]) -> Result<(), ImageError> {
        check_len(values.len(), C)?;
        let (w, h) = (self.width(), self.height());
        let px = self
            .pixel_mut(x, y)
            .ok_or(ImageError::PixelIndexOutOfBounds(x, y, w, h))?;
        px.copy_from_slice(values);
        Ok(())
    }

    fn storage_addr(&self) -> usize {
        self.as_slice().as_ptr() as usize
    }
}
