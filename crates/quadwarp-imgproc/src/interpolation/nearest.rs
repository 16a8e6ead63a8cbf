/// Kernel for nearest neighbor interpolation
///
/// Picks the corner of the cell closest to the offset; ties at `0.5` go to the
/// right and lower samples.
pub(crate) fn nearest_neighbor_interpolation(
    ex: f32,
    ey: f32,
    p00: u8,
    p01: u8,
    p10: u8,
    p11: u8,
) -> u8 {
    match (ex < 0.5, ey < 0.5) {
        (true, true) => p00,
        (false, true) => p01,
        (true, false) => p10,
        (false, false) => p11,
    }
}
