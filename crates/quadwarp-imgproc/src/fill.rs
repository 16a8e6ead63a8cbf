use quadwarp_image::{ColorModel, Image, ImageError, PixelBuffer};

/// Background written to destination pixels before resampling.
///
/// Pixels whose inverse-mapped source falls outside the source keep this
/// value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FillPolicy {
    /// Leave the destination untouched.
    None,
    /// Zero every channel, alpha included. A no-op on models without alpha.
    #[default]
    TransparentFill,
    /// Zero the color channels; alpha, if any, is opaque.
    BlackFill,
    /// Every channel at full scale.
    WhiteFill,
}

impl FillPolicy {
    /// The pixel written under `color_model`, or `None` when nothing is written.
    pub fn fill_value(&self, color_model: &ColorModel) -> Option<Vec<u8>> {
        let n = color_model.num_channels();
        let alpha = color_model.alpha_channel();
        match self {
            FillPolicy::None => None,
            FillPolicy::TransparentFill => alpha.map(|_| vec![0; n]),
            FillPolicy::BlackFill => {
                let mut px = vec![0; n];
                if let Some(a) = alpha {
                    px[a] = 255;
                }
                Some(px)
            }
            FillPolicy::WhiteFill => Some(vec![255; n]),
        }
    }

    /// Writes the background into every pixel of `image`.
    pub fn fill_image<const C: usize>(&self, image: &mut Image<u8, C>) {
        let Some(value) = self.fill_value(&image.color_model()) else {
            return;
        };
        image
            .as_slice_mut()
            .chunks_exact_mut(C)
            .for_each(|px| px.copy_from_slice(&value));
    }

    /// Writes the background into every pixel of a runtime buffer.
    pub fn fill_buffer(&self, buffer: &mut dyn PixelBuffer) -> Result<(), ImageError> {
        let Some(value) = self.fill_value(&buffer.color_model()) else {
            return Ok(());
        };
        let size = buffer.size();
        for y in 0..size.height {
            for x in 0..size.width {
                buffer.set_pixel_channels(x, y, &value)?;
            }
        }
        Ok(())
    }
}
