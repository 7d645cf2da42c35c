//! 8-bit sRGB [`Color`] (the teacher's vertex-color representation) and the
//! floating-point, premultiplied-alpha [`ColorF`] used by the rasterizer and
//! gradient atlas.

use crate::util::normalize_rgba_color;

/// Packed 8-bit-per-channel sRGB color, straight (non-premultiplied) alpha.
/// This is the representation vertex buffers and the public `Canvas` API
/// work with.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Color(pub [u8; 4]);

impl Color {
    pub const TRANSPARENT: Self = Self([0, 0, 0, 0]);
    pub const BLACK: Self = Self([0, 0, 0, 255]);
    pub const WHITE: Self = Self([255, 255, 255, 255]);

    pub fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self([r, g, b, 255])
    }

    pub fn rgba(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self([r, g, b, a])
    }

    /// Normalizes to `[0,1]` floats, straight alpha, in shader-upload order.
    pub fn normalize(&self) -> [f32; 4] {
        normalize_rgba_color(&self.0)
    }

    pub fn to_array(&self) -> [u8; 4] {
        self.0
    }

    pub fn to_float(&self) -> ColorF {
        let [r, g, b, a] = self.normalize();
        ColorF::straight(r, g, b, a)
    }
}

impl From<ColorF> for Color {
    fn from(c: ColorF) -> Self {
        let [r, g, b, a] = c.to_straight();
        Color::rgba(
            (r.clamp(0.0, 1.0) * 255.0).round() as u8,
            (g.clamp(0.0, 1.0) * 255.0).round() as u8,
            (b.clamp(0.0, 1.0) * 255.0).round() as u8,
            (a.clamp(0.0, 1.0) * 255.0).round() as u8,
        )
    }
}

/// Floating-point color carried in **premultiplied alpha**: `r`, `g`, `b`
/// are already scaled by `a`. Premultiplied storage is what the rasterizer
/// and compositor blend in, since it makes `mix` and over-compositing a
/// plain linear interpolation/sum instead of a alpha-weighted special case.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ColorF {
    pub r: f32,
    pub g: f32,
    pub b: f32,
    pub a: f32,
}

impl Default for ColorF {
    fn default() -> Self {
        ColorF::TRANSPARENT
    }
}

impl ColorF {
    pub const TRANSPARENT: ColorF = ColorF { r: 0.0, g: 0.0, b: 0.0, a: 0.0 };
    pub const BLACK: ColorF = ColorF { r: 0.0, g: 0.0, b: 0.0, a: 1.0 };
    pub const WHITE: ColorF = ColorF { r: 1.0, g: 1.0, b: 1.0, a: 1.0 };

    /// Builds from straight-alpha components, premultiplying on construction.
    pub fn straight(r: f32, g: f32, b: f32, a: f32) -> Self {
        ColorF { r: r * a, g: g * a, b: b * a, a }
    }

    /// Builds directly from already-premultiplied components.
    pub fn premultiplied(r: f32, g: f32, b: f32, a: f32) -> Self {
        ColorF { r, g, b, a }
    }

    pub fn to_straight(&self) -> [f32; 4] {
        if self.a <= 0.0 {
            [0.0, 0.0, 0.0, 0.0]
        } else {
            [self.r / self.a, self.g / self.a, self.b / self.a, self.a]
        }
    }

    /// Linear interpolation in premultiplied space: this is the mix
    /// gradients and transitions use, and it composites correctly without
    /// having to special-case alpha.
    pub fn mix(t: f32, a: ColorF, b: ColorF) -> ColorF {
        ColorF {
            r: a.r + (b.r - a.r) * t,
            g: a.g + (b.g - a.g) * t,
            b: a.b + (b.b - a.b) * t,
            a: a.a + (b.a - a.a) * t,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn straight_round_trips_through_premultiplication() {
        let c = ColorF::straight(0.5, 0.25, 1.0, 0.5);
        let back = c.to_straight();
        assert!((back[0] - 0.5).abs() < 1e-6);
        assert!((back[1] - 0.25).abs() < 1e-6);
        assert!((back[2] - 1.0).abs() < 1e-6);
        assert!((back[3] - 0.5).abs() < 1e-6);
    }

    #[test]
    fn mix_at_zero_and_one_returns_endpoints() {
        let a = ColorF::BLACK;
        let b = ColorF::WHITE;
        assert_eq!(ColorF::mix(0.0, a, b), a);
        assert_eq!(ColorF::mix(1.0, a, b), b);
    }

    #[test]
    fn transparent_to_straight_is_zero_not_nan() {
        assert_eq!(ColorF::TRANSPARENT.to_straight(), [0.0, 0.0, 0.0, 0.0]);
    }

    #[test]
    fn color_colorf_round_trip_is_stable_for_opaque_colors() {
        let c = Color::rgb(10, 200, 60);
        let back: Color = c.to_float().into();
        assert_eq!(back, c);
    }
}
