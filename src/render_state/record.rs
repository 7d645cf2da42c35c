//! The `RenderState` command record: one draw operation's full state,
//! laid out to match a GPU uniform buffer's 256-byte minimum dynamic-offset
//! alignment (the same alignment constraint wgpu surfaces the teacher's
//! renderer through its instance-transform/color/metadata buffers in
//! `renderer/types.rs`'s `Buffers` struct).

use crate::geometry::{Matrix2D, Rectangle};
use bytemuck::{Pod, Zeroable};

pub const RENDER_STATE_ALIGN: usize = 256;

/// Which fragment shader a command's instances are drawn with. A closed set
/// (spec.md §3 names exactly these five), so a tagged enum rather than a
/// trait object — matches the teacher's own `DrawCommand` enum shape
/// (`renderer/types.rs`, no longer carried forward as a module but kept as
/// the idiom: small closed unions of draw kinds are plain enums here).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[repr(u32)]
pub enum ShaderKind {
    #[default]
    Rectangles = 0,
    Arcs = 1,
    Text = 2,
    Shadow = 3,
    Mask = 4,
}

/// How a command's paint color(s) should be interpreted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[repr(u32)]
pub enum SamplerMode {
    #[default]
    Nearest = 0,
    Linear = 1,
}

/// One command's worth of render state. `#[repr(C)]` plus explicit padding
/// keeps this exactly `RENDER_STATE_ALIGN` bytes, so an array of these can
/// be indexed with `wgpu`'s dynamic uniform-buffer offset alignment
/// directly, without per-record padding logic at upload time.
#[derive(Debug, Clone, Copy, PartialEq)]
#[repr(C)]
pub struct RenderState {
    pub transform: Matrix2D,
    pub color_override: [f32; 4],
    pub fill_color: [f32; 4],
    pub stroke_color: [f32; 4],
    pub clip_rect: Rectangle,
    pub corner_radii: [f32; 4],
    pub gradient_points: [f32; 4],
    pub paint_ref: u64,
    pub texture_id: u64,
    pub data_offset: u32,
    pub data_size: u32,
    pub instance_count: u32,
    pub gradient_lut_index: u32,
    pub stroke_width: f32,
    pub opacity: f32,
    pub blur_radius: f32,
    pub shader_kind: ShaderKind,
    pub sampler_mode: SamplerMode,
    pub flags: RenderFlags,
    _reserved: [u8; RESERVED_BYTES],
}

const FIXED_BYTES: usize = std::mem::size_of::<Matrix2D>()
    + std::mem::size_of::<[f32; 4]>() * 5 // color_override, fill_color, stroke_color, corner_radii, gradient_points
    + std::mem::size_of::<Rectangle>()
    + std::mem::size_of::<u64>() * 2 // paint_ref, texture_id
    + std::mem::size_of::<u32>() * 4 // data_offset, data_size, instance_count, gradient_lut_index
    + std::mem::size_of::<f32>() * 3 // stroke_width, opacity, blur_radius
    + std::mem::size_of::<u32>() * 3; // shader_kind + sampler_mode + flags, each repr(u32)

const RESERVED_BYTES: usize = RENDER_STATE_ALIGN - FIXED_BYTES;

bitflags::bitflags! {
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
    #[repr(transparent)]
    pub struct RenderFlags: u32 {
        const HAS_CLIP = 1 << 0;
        const HAS_TEXTURE = 1 << 1;
        const HAS_COLOR_OVERRIDE = 1 << 2;
        const IS_STROKE = 1 << 3;
        const SHADOW_INNER = 1 << 4;
        const SHADOW_OUTER = 1 << 5;
        const SUBPIXEL_TEXT = 1 << 6;
        const HAS_GRADIENT = 1 << 7;
    }
}

// Safety: every field is a plain-data numeric type and the struct is
// `repr(C)` with explicit padding, so it has no uninitialized bytes once
// constructed through `RenderState::new`.
unsafe impl Pod for RenderState {}
unsafe impl Zeroable for RenderState {}

impl Default for RenderState {
    fn default() -> Self {
        RenderState::new(Matrix2D::IDENTITY, Rectangle::ZERO, 0)
    }
}

impl RenderState {
    pub fn new(transform: Matrix2D, clip_rect: Rectangle, paint_ref: u64) -> Self {
        RenderState {
            transform,
            color_override: [0.0; 4],
            fill_color: [0.0; 4],
            stroke_color: [0.0; 4],
            clip_rect,
            corner_radii: [0.0; 4],
            gradient_points: [0.0; 4],
            paint_ref,
            texture_id: 0,
            data_offset: 0,
            data_size: 0,
            instance_count: 1,
            gradient_lut_index: 0,
            stroke_width: 0.0,
            opacity: 1.0,
            blur_radius: 0.0,
            shader_kind: ShaderKind::Rectangles,
            sampler_mode: SamplerMode::Nearest,
            flags: RenderFlags::empty(),
            _reserved: [0; RESERVED_BYTES],
        }
    }

    pub fn with_shader_kind(mut self, kind: ShaderKind) -> Self {
        self.shader_kind = kind;
        self
    }

    pub fn with_color_override(mut self, color: [f32; 4]) -> Self {
        self.color_override = color;
        self.flags |= RenderFlags::HAS_COLOR_OVERRIDE;
        self
    }

    pub fn with_fill_color(mut self, color: [f32; 4]) -> Self {
        self.fill_color = color;
        self
    }

    pub fn with_stroke(mut self, width: f32, color: [f32; 4]) -> Self {
        self.stroke_width = width;
        self.stroke_color = color;
        self.flags.set(RenderFlags::IS_STROKE, width > 0.0);
        self
    }

    pub fn with_texture(mut self, texture_id: u64, sampler_mode: SamplerMode) -> Self {
        self.texture_id = texture_id;
        self.sampler_mode = sampler_mode;
        self.flags |= RenderFlags::HAS_TEXTURE;
        self
    }

    pub fn with_gradient(mut self, points: [f32; 4], lut_index: u32) -> Self {
        self.gradient_points = points;
        self.gradient_lut_index = lut_index;
        self.flags |= RenderFlags::HAS_GRADIENT;
        self
    }

    pub fn with_corner_radii(mut self, radii: [f32; 4]) -> Self {
        self.corner_radii = radii;
        self
    }

    pub fn with_opacity(mut self, opacity: f32) -> Self {
        self.opacity = opacity.clamp(0.0, 1.0);
        self
    }

    pub fn with_data_range(mut self, offset: u32, size: u32, instances: u32) -> Self {
        self.data_offset = offset;
        self.data_size = size;
        self.instance_count = instances;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn render_state_is_exactly_the_dynamic_offset_alignment() {
        assert_eq!(std::mem::size_of::<RenderState>(), RENDER_STATE_ALIGN);
    }

    #[test]
    fn color_override_sets_its_flag() {
        let state = RenderState::default().with_color_override([1.0, 0.0, 0.0, 1.0]);
        assert!(state.flags.contains(RenderFlags::HAS_COLOR_OVERRIDE));
    }
}
