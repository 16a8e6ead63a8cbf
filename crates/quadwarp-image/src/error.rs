/// An error type for the image module.
#[derive(thiserror::Error, Debug, Clone, PartialEq)]
pub enum ImageError {
    /// Error when channel and shape are not valid.
    #[error("Data length ({0}) does not match the image size ({1})")]
    InvalidChannelShape(usize, usize),

    /// Error when the pixel coordinates are out of bounds.
    #[error("Pixel coordinates ({0}, {1}) are out of bounds ({2}, {3})")]
    PixelIndexOutOfBounds(usize, usize, usize, usize),

    /// Error when the channel index is out of bounds.
    #[error("Channel index ({0}) is out of bounds ({1})")]
    ChannelIndexOutOfBounds(usize, usize),

    /// Error when a pixel value cannot be cast to the target type.
    #[error("Failed to cast image data to {0}")]
    CastError(String),

    /// Error when two images that must match in size do not.
    #[error("Image size mismatch: ({0}, {1}) != ({2}, {3})")]
    InvalidImageSize(usize, usize, usize, usize),

    /// Error when a color model does not describe the buffer's channel count.
    #[error("Color model {0} expects {1} channels but the buffer has {2}")]
    ColorModelChannelMismatch(String, usize, usize),

    /// Error when the buffer for a size does not fit in memory.
    #[error("Image of {0}x{1} with {2} channels exceeds the addressable size")]
    ImageTooLarge(usize, usize, usize),

    /// Error when no conversion or allocation exists for a color model.
    #[error("Unsupported color model: {0}")]
    UnsupportedColorModel(String),
}
