use crate::{color_model::ColorModel, error::ImageError};

/// Image size in pixels
///
/// A struct to represent the size of an image in pixels.
///
/// # Examples
///
/// ```
/// use quadwarp_image::ImageSize;
///
/// let image_size = ImageSize {
///   width: 10,
///   height: 20,
/// };
///
/// assert_eq!(image_size.width, 10);
/// assert_eq!(image_size.height, 20);
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default)]
pub struct ImageSize {
    /// Width of the image in pixels
    pub width: usize,
    /// Height of the image in pixels
    pub height: usize,
}

impl ImageSize {
    /// Whether the size covers no pixels.
    pub fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }

    /// Number of elements of an interleaved buffer with `channels` per pixel.
    ///
    /// # Errors
    ///
    /// [`ImageError::ImageTooLarge`] when the count does not fit in `isize`.
    pub fn buffer_len(&self, channels: usize) -> Result<usize, ImageError> {
        self.width
            .checked_mul(self.height)
            .and_then(|n| n.checked_mul(channels))
            .filter(|&n| n <= isize::MAX as usize)
            .ok_or(ImageError::ImageTooLarge(self.width, self.height, channels))
    }
}

impl std::fmt::Display for ImageSize {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(
            f,
            "ImageSize {{ width: {}, height: {} }}",
            self.width, self.height
        )
    }
}

impl From<[usize; 2]> for ImageSize {
    fn from(size: [usize; 2]) -> Self {
        ImageSize {
            width: size[0],
            height: size[1],
        }
    }
}

/// Trait for image data types.
pub trait ImageDtype: Copy + Default + Into<f32> + Send + Sync {
    /// Convert a f32 value to the image data type.
    fn from_f32(x: f32) -> Self;
}

impl ImageDtype for f32 {
    fn from_f32(x: f32) -> Self {
        x
    }
}

impl ImageDtype for u8 {
    fn from_f32(x: f32) -> Self {
        x.round().clamp(0.0, 255.0) as u8
    }
}

/// Represents an image with pixel data.
///
/// Pixels are stored row-major and interleaved: the channels of pixel
/// `(x, y)` start at `(y * width + x) * CHANNELS`. Every image carries the
/// [`ColorModel`] its channels are interpreted under.
#[derive(Clone, Debug, PartialEq)]
pub struct Image<T, const CHANNELS: usize> {
    size: ImageSize,
    data: Vec<T>,
    color_model: ColorModel,
}

impl<T, const CHANNELS: usize> Image<T, CHANNELS> {
    /// Create a new image from pixel data.
    ///
    /// The color model is the plain model for `CHANNELS`; see
    /// [`ColorModel::for_channels`].
    ///
    /// # Errors
    ///
    /// If the length of the pixel data does not match the image size, or no
    /// color model exists for the channel count, an error is returned.
    ///
    /// # Examples
    ///
    /// ```
    /// use quadwarp_image::{Image, ImageSize};
    ///
    /// let image = Image::<u8, 3>::new(
    ///    ImageSize {
    ///       width: 10,
    ///       height: 20,
    ///    },
    ///    vec![0u8; 10 * 20 * 3],
    /// ).unwrap();
    ///
    /// assert_eq!(image.size().width, 10);
    /// assert_eq!(image.size().height, 20);
    /// assert_eq!(image.num_channels(), 3);
    /// ```
    pub fn new(size: ImageSize, data: Vec<T>) -> Result<Self, ImageError> {
        Self::with_color_model(size, data, ColorModel::for_channels(CHANNELS)?)
    }

    /// Create a new image whose channels are interpreted under `color_model`.
    ///
    /// # Errors
    ///
    /// The data length must match the size and the model must describe
    /// `CHANNELS` channels.
    pub fn with_color_model(
        size: ImageSize,
        data: Vec<T>,
        color_model: ColorModel,
    ) -> Result<Self, ImageError> {
        let len = size.buffer_len(CHANNELS)?;
        if data.len() != len {
            return Err(ImageError::InvalidChannelShape(data.len(), len));
        }
        color_model.check_channels(CHANNELS)?;

        Ok(Self {
            size,
            data,
            color_model,
        })
    }

    /// Create a new image with the given size and default pixel data.
    ///
    /// # Examples
    ///
    /// ```
    /// use quadwarp_image::{Image, ImageSize};
    ///
    /// let image = Image::<u8, 3>::from_size_val(
    ///   ImageSize {
    ///     width: 10,
    ///     height: 20,
    ///   }, 0u8).unwrap();
    ///
    /// assert_eq!(image.size().width, 10);
    /// assert_eq!(image.num_channels(), 3);
    /// ```
    pub fn from_size_val(size: ImageSize, val: T) -> Result<Self, ImageError>
    where
        T: Clone,
    {
        let data = vec![val; size.buffer_len(CHANNELS)?];
        Image::new(size, data)
    }

    /// Get the size of the image in pixels.
    pub fn size(&self) -> ImageSize {
        self.size
    }

    /// Get the number of columns of the image.
    pub fn cols(&self) -> usize {
        self.width()
    }

    /// Get the width of the image in pixels.
    pub fn width(&self) -> usize {
        self.size.width
    }

    /// Get the height of the image in pixels.
    pub fn height(&self) -> usize {
        self.size.height
    }

    /// Get the number of channels in the image.
    pub fn num_channels(&self) -> usize {
        CHANNELS
    }

    /// The color model the channels are interpreted under.
    pub fn color_model(&self) -> ColorModel {
        self.color_model
    }

    /// The interleaved pixel data.
    pub fn as_slice(&self) -> &[T] {
        &self.data
    }

    /// The interleaved pixel data, mutably.
    pub fn as_slice_mut(&mut self) -> &mut [T] {
        &mut self.data
    }

    /// The channels of pixel `(x, y)`, or `None` outside the image.
    pub fn pixel(&self, x: usize, y: usize) -> Option<&[T]> {
        if x >= self.width() || y >= self.height() {
            return None;
        }
        let offset = (y * self.width() + x) * CHANNELS;
        Some(&self.data[offset..offset + CHANNELS])
    }

    /// The channels of pixel `(x, y)` mutably, or `None` outside the image.
    pub fn pixel_mut(&mut self, x: usize, y: usize) -> Option<&mut [T]> {
        if x >= self.width() || y >= self.height() {
            return None;
        }
        let offset = (y * self.width() + x) * CHANNELS;
        Some(&mut self.data[offset..offset + CHANNELS])
    }

    fn check_index(&self, x: usize, y: usize, ch: usize) -> Result<usize, ImageError> {
        if x >= self.width() || y >= self.height() {
            return Err(ImageError::PixelIndexOutOfBounds(
                x,
                y,
                self.width(),
                self.height(),
            ));
        }
        if ch >= CHANNELS {
            return Err(ImageError::ChannelIndexOutOfBounds(ch, CHANNELS));
        }
        Ok((y * self.width() + x) * CHANNELS + ch)
    }

    /// Get one channel of a pixel.
    ///
    /// # Arguments
    ///
    /// * `x` - The x-coordinate of the pixel.
    /// * `y` - The y-coordinate of the pixel.
    /// * `ch` - The channel index of the pixel.
    pub fn get_pixel(&self, x: usize, y: usize, ch: usize) -> Result<T, ImageError>
    where
        T: Copy,
    {
        let idx = self.check_index(x, y, ch)?;
        Ok(self.data[idx])
    }

    /// Set one channel of a pixel.
    pub fn set_pixel(&mut self, x: usize, y: usize, ch: usize, val: T) -> Result<(), ImageError> {
        let idx = self.check_index(x, y, ch)?;
        self.data[idx] = val;
        Ok(())
    }

    /// Cast the pixel data of the image to a different type.
    ///
    /// The color model is kept.
    pub fn cast<U>(&self) -> Result<Image<U, CHANNELS>, ImageError>
    where
        U: num_traits::NumCast,
        T: num_traits::NumCast + Copy,
    {
        let casted_data = self
            .data
            .iter()
            .map(|&x| {
                U::from(x).ok_or_else(|| ImageError::CastError(std::any::type_name::<U>().to_string()))
            })
            .collect::<Result<Vec<U>, ImageError>>()?;

        Image::with_color_model(self.size, casted_data, self.color_model)
    }
}
