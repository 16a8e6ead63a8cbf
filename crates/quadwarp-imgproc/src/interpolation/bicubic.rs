use quadwarp_image::ImageDtype;

/// Four-corner weighted sum used for the bicubic mode.
///
/// Each corner is weighted by the area of the opposite sub-rectangle, so the
/// result equals the bilinear kernel up to rounding.
pub(crate) fn bicubic_interpolation(
    ex: f32,
    ey: f32,
    p00: u8,
    p01: u8,
    p10: u8,
    p11: u8,
) -> u8 {
    let (fx, fy) = (1.0 - ex, 1.0 - ey);
    let v = fx * fy * p00 as f32 + ex * fy * p01 as f32 + fx * ey * p10 as f32 + ex * ey * p11 as f32;
    u8::from_f32(v)
}
