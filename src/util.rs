//! Small shared helpers with no better home. Grounded on the teacher's
//! `util.rs::normalize_rgba_color`; the rest of that file (NDC rect
//! normalization, the GPU buffer pool) belongs to `crate::backend` and is
//! kept there instead of duplicated here.

/// Normalizes 8-bit RGBA components to `[0, 1]` floats in the same channel
/// order, the conversion [`crate::color::Color::normalize`] needs before a
/// straight-alpha byte color can feed [`crate::color::ColorF`].
pub fn normalize_rgba_color(color: &[u8; 4]) -> [f32; 4] {
    [
        color[0] as f32 / 255.0,
        color[1] as f32 / 255.0,
        color[2] as f32 / 255.0,
        color[3] as f32 / 255.0,
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalizes_full_white_to_ones() {
        assert_eq!(normalize_rgba_color(&[255, 255, 255, 255]), [1.0, 1.0, 1.0, 1.0]);
    }

    #[test]
    fn normalizes_zero_to_zero() {
        assert_eq!(normalize_rgba_color(&[0, 0, 0, 0]), [0.0, 0.0, 0.0, 0.0]);
    }
}
