#![deny(missing_docs)]
//! Raster types and the capabilities the resampling code needs from them:
//! pixel access, color models, allocation and color conversion.

/// Allocation of destination rasters.
pub mod allocator;

/// Runtime pixel access.
pub mod buffer;

/// Color models describing how channels are interpreted.
pub mod color_model;

/// Color conversion between models.
pub mod convert;

/// Error types for the image module.
pub mod error;

/// image representation for computer vision purposes.
pub mod image;

pub use crate::allocator::{BufferAllocator, CpuAllocator};
pub use crate::buffer::PixelBuffer;
pub use crate::color_model::{ColorModel, ColorSpace, Transparency};
pub use crate::convert::{ChannelOrderConverter, ColorConverter};
pub use crate::error::ImageError;
pub use crate::image::{Image, ImageDtype, ImageSize};
