use std::fmt;

use crate::error::ImageError;

/// Channel interpretation of a raster.
///
/// Four-channel rasters store alpha first, then red, green and blue.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ColorSpace {
    /// One luminance channel.
    Gray,
    /// Luminance followed by alpha.
    GrayAlpha,
    /// Red, green, blue.
    Rgb,
    /// Blue, green, red.
    Bgr,
    /// Alpha, red, green, blue.
    Argb,
}

impl ColorSpace {
    /// Number of channels a pixel of this space occupies.
    pub fn num_channels(&self) -> usize {
        match self {
            ColorSpace::Gray => 1,
            ColorSpace::GrayAlpha => 2,
            ColorSpace::Rgb | ColorSpace::Bgr => 3,
            ColorSpace::Argb => 4,
        }
    }

    /// Index of the alpha channel, if the space carries one.
    pub fn alpha_channel(&self) -> Option<usize> {
        match self {
            ColorSpace::GrayAlpha => Some(1),
            ColorSpace::Argb => Some(0),
            _ => None,
        }
    }
}

/// Whether a raster can hold partially transparent pixels.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Transparency {
    /// Every pixel is fully opaque.
    Opaque,
    /// Pixels carry an alpha value.
    Translucent,
}

/// Describes how the channels of a raster are to be interpreted.
///
/// Indexed models store palette indices in a single gray channel. The palette
/// is the identity ramp, so an index equals the gray level it represents.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct ColorModel {
    /// Channel interpretation.
    pub color_space: ColorSpace,
    /// Opaque or translucent.
    pub transparency: Transparency,
    /// Whether color channels are stored multiplied by alpha.
    pub alpha_premultiplied: bool,
    /// Whether samples are palette indices.
    pub indexed: bool,
}

impl ColorModel {
    /// A plain model for `color_space`; translucent exactly when it has alpha.
    pub const fn new(color_space: ColorSpace) -> Self {
        let transparency = match color_space {
            ColorSpace::GrayAlpha | ColorSpace::Argb => Transparency::Translucent,
            _ => Transparency::Opaque,
        };
        Self {
            color_space,
            transparency,
            alpha_premultiplied: false,
            indexed: false,
        }
    }

    /// Opaque single-channel gray.
    pub const fn gray() -> Self {
        Self::new(ColorSpace::Gray)
    }

    /// Gray with alpha.
    pub const fn gray_alpha() -> Self {
        Self::new(ColorSpace::GrayAlpha)
    }

    /// Opaque red, green, blue.
    pub const fn rgb() -> Self {
        Self::new(ColorSpace::Rgb)
    }

    /// Opaque blue, green, red.
    pub const fn bgr() -> Self {
        Self::new(ColorSpace::Bgr)
    }

    /// Alpha, red, green, blue.
    pub const fn argb() -> Self {
        Self::new(ColorSpace::Argb)
    }

    /// Single-channel palette indices over the identity gray ramp.
    pub const fn indexed_gray() -> Self {
        let mut model = Self::new(ColorSpace::Gray);
        model.indexed = true;
        model
    }

    /// The plain model conventionally used for a channel count.
    ///
    /// # Errors
    ///
    /// Channel counts outside `1..=4` have no color model.
    pub fn for_channels(channels: usize) -> Result<Self, ImageError> {
        match channels {
            1 => Ok(Self::gray()),
            2 => Ok(Self::gray_alpha()),
            3 => Ok(Self::rgb()),
            4 => Ok(Self::argb()),
            n => Err(ImageError::UnsupportedColorModel(format!(
                "no color model for {n} channels"
            ))),
        }
    }

    /// Number of channels a pixel occupies under this model.
    pub fn num_channels(&self) -> usize {
        self.color_space.num_channels()
    }

    /// Index of the alpha channel, if any.
    pub fn alpha_channel(&self) -> Option<usize> {
        self.color_space.alpha_channel()
    }

    /// Whether every pixel is fully opaque.
    pub fn is_opaque(&self) -> bool {
        self.transparency == Transparency::Opaque
    }

    /// Whether pixels of `other` can be copied into this model without conversion.
    pub fn is_compatible_with(&self, other: &ColorModel) -> bool {
        self.color_space == other.color_space
            && self.indexed == other.indexed
            && self.alpha_premultiplied == other.alpha_premultiplied
    }

    /// Checks that the model describes `channels` channels.
    pub fn check_channels(&self, channels: usize) -> Result<(), ImageError> {
        if self.num_channels() != channels {
            return Err(ImageError::ColorModelChannelMismatch(
                self.to_string(),
                self.num_channels(),
                channels,
            ));
        }
        Ok(())
    }
}

impl fmt::Display for ColorModel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}", self.color_space)?;
        if self.indexed {
            write!(f, " (indexed)")?;
        }
        if self.alpha_premultiplied {
            write!(f, " (premultiplied)")?;
        }
        Ok(())
    }
}
