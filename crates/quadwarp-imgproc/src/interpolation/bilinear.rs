use quadwarp_image::ImageDtype;

/// Kernel for bilinear interpolation
///
/// Blends along x on both rows, then along y.
pub(crate) fn bilinear_interpolation(
    ex: f32,
    ey: f32,
    p00: u8,
    p01: u8,
    p10: u8,
    p11: u8,
) -> u8 {
    let top = (1.0 - ex) * p00 as f32 + ex * p01 as f32;
    let bottom = (1.0 - ex) * p10 as f32 + ex * p11 as f32;
    u8::from_f32((1.0 - ey) * top + ey * bottom)
}
