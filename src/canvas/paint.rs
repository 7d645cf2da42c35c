//! The fill/stroke paint a draw call resolves against: a flat color, a
//! registered gradient sampled along a per-draw axis, or an image sampled
//! through a texture id. Mirrors the teacher's `Fill`/`Stroke` pair in
//! `shape.rs`, generalized from "always a solid color" to the three paint
//! kinds spec.md §3 names for a `RenderState` record.

use crate::atlas::GradientId;
use crate::color::Color;
use crate::render_state::SamplerMode;

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Paint {
    Solid(Color),
    /// `start`/`end` are the gradient's axis control points in local draw
    /// space for *this* call; the baked LUT itself (`id`) can be reused
    /// across calls with different axes.
    Gradient { id: GradientId, start: (f32, f32), end: (f32, f32) },
    Texture { image_id: u64, sampler: SamplerMode },
}

impl Default for Paint {
    fn default() -> Self {
        Paint::Solid(Color::TRANSPARENT)
    }
}

impl From<Color> for Paint {
    fn from(color: Color) -> Self {
        Paint::Solid(color)
    }
}
