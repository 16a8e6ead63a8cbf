use crate::{
    color_model::ColorModel,
    error::ImageError,
    image::{Image, ImageSize},
};

/// Creates destination rasters for a given size and color model.
pub trait BufferAllocator {
    /// Allocates a zero-initialised raster of `size` under `color_model`.
    ///
    /// # Errors
    ///
    /// The model must describe `C` channels and the buffer must be addressable.
    fn create_compatible<const C: usize>(
        &self,
        size: ImageSize,
        color_model: ColorModel,
    ) -> Result<Image<u8, C>, ImageError>;
}

/// Allocates rasters on the heap.
#[derive(Clone, Copy, Debug, Default)]
pub struct CpuAllocator;

impl BufferAllocator for CpuAllocator {
    fn create_compatible<const C: usize>(
        &self,
        size: ImageSize,
        color_model: ColorModel,
    ) -> Result<Image<u8, C>, ImageError> {
        color_model.check_channels(C)?;
        let len = size.buffer_len(C)?;
        Image::with_color_model(size, vec![0u8; len], color_model)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cpu_allocator() -> Result<(), ImageError> {
        let size = ImageSize {
            width: 3,
            height: 2,
        };
        let image: Image<u8, 1> = CpuAllocator.create_compatible(size, ColorModel::indexed_gray())?;
        assert_eq!(image.size(), size);
        assert!(image.color_model().indexed);
        assert!(image.as_slice().iter().all(|&v| v == 0));

        let res: Result<Image<u8, 3>, _> = CpuAllocator.create_compatible(size, ColorModel::gray());
        assert!(matches!(
            res,
            Err(ImageError::ColorModelChannelMismatch(_, 1, 3))
        ));

        let huge = ImageSize {
            width: usize::MAX / 2,
            height: 3,
        };
        let res: Result<Image<u8, 4>, _> = CpuAllocator.create_compatible(huge, ColorModel::argb());
        assert_eq!(res, Err(ImageError::ImageTooLarge(huge.width, 3, 4)));
        Ok(())
    }
}
