//! Color to brightness conversion.
//!
//! Colors are packed `0xAARRGGBB`. Luminance uses the integer luma weights
//! `77/150/29` over 256, truncating.

/// Extract an 8-bit luminance from an ARGB color.
///
/// When alpha is not `0xFF`, each channel is scaled by `alpha / 0xFF` before
/// the luma weighting.
pub fn extract_luminance(color: u32) -> u8 {
    let alpha = (color >> 24) & 0xFF;
    let mut red = (color >> 16) & 0xFF;
    let mut green = (color >> 8) & 0xFF;
    let mut blue = color & 0xFF;

    if alpha != 0xFF {
        red = red * alpha / 0xFF;
        green = green * alpha / 0xFF;
        blue = blue * alpha / 0xFF;
    }

    // Max is (256 * 255) >> 8 = 255, so the cast never truncates.
    ((77 * red + 150 * green + 29 * blue) >> 8) as u8
}

/// Scale a luminance into `0..=max_output`.
pub fn scale_to_range(luminance: u8, max_output: u32) -> u32 {
    (u64::from(luminance) * u64::from(max_output) / 0xFF) as u32
}

/// Luminance of `color` scaled to a device's maximum raw brightness.
pub fn scaled_brightness(color: u32, max_output: u32) -> u32 {
    scale_to_range(extract_luminance(color), max_output)
}
