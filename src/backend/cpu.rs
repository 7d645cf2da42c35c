//! CPU/software backend: rasterizes the command stream directly into a
//! [`pixel::Image`](crate::pixel::Image) without any GPU context. Plays the
//! role the teacher's `softbuffer` dependency plays (present without a GPU
//! surface) and doubles as the backend headless tests and the S1-S6
//! scenarios in spec.md §8 render against, since it needs no display.
//!
//! Only `ShaderKind::Rectangles` and `ShaderKind::Mask` are rasterized in
//! software; `Text`/`Arcs`/`Shadow` commands are accepted (so a full
//! command stream can be submitted without branching per-backend) but are
//! no-ops here — those shader kinds are exercised against the `wgpu_backend`
//! in integration, not against this software path.

use super::device::{DeviceInfo, DeviceSelection, Limits, RenderDevice};
use super::encoder::{ImageRenderTarget, RenderEncoder, WindowRenderTarget};
use super::PlatformWindow;
use crate::atlas::GradientLut;
use crate::color::ColorF;
use crate::error::RenderDeviceError;
use crate::geometry::{RectangleI, SizeI};
use crate::pixel::{Image, ImageData, PixelFormat, PixelType};
use crate::render_state::{RenderState, ShaderKind};

pub struct CpuDevice {
    limits: Limits,
    selection: DeviceSelection,
}

impl CpuDevice {
    pub fn new(selection: DeviceSelection) -> Self {
        CpuDevice { limits: Limits::default(), selection }
    }
}

impl RenderDevice for CpuDevice {
    type Encoder = CpuEncoder;
    type WindowTarget = CpuWindowTarget;
    type ImageTarget = CpuImageTarget;

    fn info(&self) -> DeviceInfo {
        DeviceInfo {
            api: "software".into(),
            api_version: "1.0".into(),
            vendor: "vellum".into(),
            device: format!("{:?}", self.selection),
        }
    }

    fn limits(&self) -> Limits {
        self.limits
    }

    fn create_encoder(&self) -> CpuEncoder {
        CpuEncoder::default()
    }

    fn create_window_target<W: PlatformWindow>(
        &self,
        window: &W,
        pixel_type: PixelType,
        _depth_stencil: bool,
        _samples: u32,
    ) -> Result<CpuWindowTarget, RenderDeviceError> {
        let size = window.framebuffer_size();
        Ok(CpuWindowTarget {
            backbuffer: Image::new(ImageData::new(size.width, size.height, PixelFormat::Rgba, pixel_type)),
            vsync_interval: 1,
        })
    }

    fn create_image_target(&self, size: SizeI) -> Result<CpuImageTarget, RenderDeviceError> {
        Ok(CpuImageTarget {
            image: Image::new(ImageData::new(size.width, size.height, PixelFormat::Rgba, PixelType::U8)),
        })
    }
}

pub struct CpuWindowTarget {
    backbuffer: Image,
    vsync_interval: u32,
}

impl WindowRenderTarget for CpuWindowTarget {
    fn resize_backbuffer(&mut self, size: SizeI) {
        self.backbuffer = Image::new(ImageData::new(size.width, size.height, PixelFormat::Rgba, PixelType::U8));
    }

    fn present(&mut self) -> Result<(), RenderDeviceError> {
        // A real CPU presentation path would blit `self.backbuffer` to the
        // platform window's framebuffer (the teacher's `softbuffer` path);
        // out of scope here since `PlatformWindow` has no writable
        // framebuffer accessor (spec.md's out-of-scope list).
        Ok(())
    }

    fn set_vsync_interval(&mut self, interval: u32) {
        self.vsync_interval = interval;
    }
}

impl CpuWindowTarget {
    pub fn image_mut(&mut self) -> &mut Image {
        &mut self.backbuffer
    }

    pub fn vsync_interval(&self) -> u32 {
        self.vsync_interval
    }
}

pub struct CpuImageTarget {
    image: Image,
}

impl ImageRenderTarget for CpuImageTarget {
    fn image(&self) -> &Image {
        &self.image
    }

    fn image_mut(&mut self) -> &mut Image {
        &mut self.image
    }
}

#[derive(Default)]
pub struct CpuEncoder {
    subpixel_text: bool,
    gamma: f32,
    blue_light_filter: f32,
}

impl CpuEncoder {
    /// Renders one batch directly into `target`, honoring each command's
    /// clip rect, fill/stroke color, opacity, and (for `Mask` commands) an
    /// 8-bit alpha coverage sprite supplied by the caller through `data`
    /// (one float per covered pixel, row-major within the command's clip
    /// rect — the CPU analogue of the GPU sampling a sprite atlas texel).
    pub fn render_into(
        &mut self,
        target: &mut Image,
        states: &[RenderState],
        data: &[f32],
        gradient_luts: &std::collections::HashMap<u32, GradientLut>,
    ) {
        let bounds = target.bounds();
        let mut access = target.full_access();
        for state in states {
            let clip = clamp_rect(state.clip_rect.round_to_pixels(), bounds);
            if clip.max.x <= clip.min.x || clip.max.y <= clip.min.y {
                continue;
            }
            match state.shader_kind {
                ShaderKind::Rectangles => {
                    paint_rect(&mut access, clip, state, gradient_luts);
                }
                ShaderKind::Mask => {
                    paint_mask(&mut access, clip, state, data, gradient_luts);
                }
                ShaderKind::Arcs | ShaderKind::Text | ShaderKind::Shadow => {
                    // Rasterized by the GPU backends only; see module docs.
                }
            }
        }
    }
}

impl RenderEncoder for CpuEncoder {
    fn begin(&mut self, _clear_color: ColorF, _dirty_rects: &[RectangleI]) {
        // Clearing happens by the caller zeroing the target `Image` before
        // the first `render_into` call of the frame; this backend has no
        // persistent target bound to `begin` (see module docs on `Target`).
    }

    fn batch(&mut self, _states: &[RenderState], _data: &[f32]) {
        // No-op: `render_into` is the CPU backend's actual submission
        // entry point, since `batch` alone has no target to draw into.
    }

    fn end(&mut self) {}

    fn wait(&mut self) {}

    fn set_subpixel_text(&mut self, enabled: bool) {
        self.subpixel_text = enabled;
    }

    fn set_gamma(&mut self, gamma: f32) {
        self.gamma = gamma;
    }

    fn set_blue_light_filter(&mut self, amount: f32) {
        self.blue_light_filter = amount;
    }
}

fn clamp_rect(r: RectangleI, bounds: RectangleI) -> RectangleI {
    RectangleI::from_corners(
        (r.min.x.max(bounds.min.x), r.min.y.max(bounds.min.y)),
        (r.max.x.min(bounds.max.x), r.max.y.min(bounds.max.y)),
    )
}

/// Resolves a gradient's declared shape (spec.md §3's `GradientType`) plus
/// its two control points (carried in `RenderState.gradient_points`, not
/// the LUT — see `atlas::gradient`'s module docs) into the `t ∈ [0,1]`
/// lookup the LUT is sampled at, for the pixel center `(x, y)`.
///
/// `points` is `[start.x, start.y, end.x, end.y]`; for `Linear`/`Reflected`
/// those are the gradient's axis endpoints, for the rest they're center +
/// a point on the edge (radius/extent), matching `Gradient`'s doc comment.
fn gradient_t(kind: crate::atlas::GradientType, points: [f32; 4], x: f32, y: f32) -> f32 {
    use crate::atlas::GradientType;

    let [sx, sy, ex, ey] = points;
    let dx = ex - sx;
    let dy = ey - sy;
    let axis_len2 = dx * dx + dy * dy;
    let linear_t = || if axis_len2 <= f32::EPSILON { 0.0 } else { ((x - sx) * dx + (y - sy) * dy) / axis_len2 };
    let radius = axis_len2.sqrt();
    let radial_t = || {
        if radius <= f32::EPSILON {
            0.0
        } else {
            ((x - sx).hypot(y - sy)) / radius
        }
    };

    match kind {
        GradientType::Linear => linear_t(),
        GradientType::Reflected => {
            let folded = linear_t().rem_euclid(2.0);
            if folded <= 1.0 {
                folded
            } else {
                2.0 - folded
            }
        }
        GradientType::Radial => radial_t(),
        GradientType::InsideOutside => 1.0 - radial_t(),
        GradientType::Diamond => {
            let extent = dx.abs() + dy.abs();
            if extent <= f32::EPSILON {
                0.0
            } else {
                ((x - sx).abs() + (y - sy).abs()) / extent
            }
        }
        GradientType::Angle => {
            let base_angle = dy.atan2(dx);
            let angle = (y - sy).atan2(x - sx);
            (angle - base_angle).rem_euclid(std::f32::consts::TAU) / std::f32::consts::TAU
        }
    }
}

fn sample_color(
    state: &RenderState,
    gradient_luts: &std::collections::HashMap<u32, GradientLut>,
    x: f32,
    y: f32,
) -> ColorF {
    if state.flags.contains(crate::render_state::RenderFlags::HAS_GRADIENT) {
        if let Some(lut) = gradient_luts.get(&state.gradient_lut_index) {
            let t = gradient_t(lut.gradient_type, state.gradient_points, x, y);
            return lut.sample(t);
        }
    }
    let [r, g, b, a] = state.fill_color;
    ColorF::premultiplied(r, g, b, a)
}

fn paint_rect(
    access: &mut crate::pixel::ImageAccess<'_>,
    clip: RectangleI,
    state: &RenderState,
    gradient_luts: &std::collections::HashMap<u32, GradientLut>,
) {
    for y in clip.min.y..clip.max.y {
        for x in clip.min.x..clip.max.x {
            let color = sample_color(state, gradient_luts, x as f32 + 0.5, y as f32 + 0.5);
            blend_pixel(access, x as u32, y as u32, color, state.opacity);
        }
    }
}

fn paint_mask(
    access: &mut crate::pixel::ImageAccess<'_>,
    clip: RectangleI,
    state: &RenderState,
    coverage: &[f32],
    gradient_luts: &std::collections::HashMap<u32, GradientLut>,
) {
    let w = (clip.max.x - clip.min.x).max(0) as usize;
    for y in clip.min.y..clip.max.y {
        for x in clip.min.x..clip.max.x {
            let local_x = (x - clip.min.x) as usize;
            let local_y = (y - clip.min.y) as usize;
            let idx = (state.data_offset as usize) + local_y * w + local_x;
            let coverage = coverage.get(idx).copied().unwrap_or(0.0).clamp(0.0, 1.0);
            if coverage <= 0.0 {
                continue;
            }
            let color = sample_color(state, gradient_luts, x as f32 + 0.5, y as f32 + 0.5);
            blend_pixel(access, x as u32, y as u32, color, state.opacity * coverage);
        }
    }
}

fn blend_pixel(access: &mut crate::pixel::ImageAccess<'_>, x: u32, y: u32, src: ColorF, extra_alpha: f32) {
    let src_a = (src.a * extra_alpha).clamp(0.0, 1.0);
    if src_a <= 0.0 {
        return;
    }
    let bytes = access.pixel_bytes(x, y);
    let dst = [
        bytes[0] as f32 / 255.0,
        bytes[1] as f32 / 255.0,
        bytes[2] as f32 / 255.0,
        bytes[3] as f32 / 255.0,
    ];
    let src_straight = if src.a > 0.0 { [src.r / src.a, src.g / src.a, src.b / src.a] } else { [0.0; 3] };
    let out_a = src_a + dst[3] * (1.0 - src_a);
    let out = if out_a <= 0.0 {
        [0.0; 3]
    } else {
        [
            (src_straight[0] * src_a + dst[0] * dst[3] * (1.0 - src_a)) / out_a,
            (src_straight[1] * src_a + dst[1] * dst[3] * (1.0 - src_a)) / out_a,
            (src_straight[2] * src_a + dst[2] * dst[3] * (1.0 - src_a)) / out_a,
        ]
    };
    access.pixel_bytes_mut(x, y).copy_from_slice(&[
        (out[0].clamp(0.0, 1.0) * 255.0).round() as u8,
        (out[1].clamp(0.0, 1.0) * 255.0).round() as u8,
        (out[2].clamp(0.0, 1.0) * 255.0).round() as u8,
        (out_a.clamp(0.0, 1.0) * 255.0).round() as u8,
    ]);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::{Matrix2D, Rectangle};

    fn blank_image(w: u32, h: u32) -> Image {
        Image::new(ImageData::new(w, h, PixelFormat::Rgba, PixelType::U8))
    }

    #[test]
    fn s1_rectangle_fill() {
        let mut image = blank_image(100, 100);
        let clip = Rectangle::from_corners((10.0, 10.0), (90.0, 90.0));
        let fill = ColorF::straight(1.0, 0.5019608, 0.0, 1.0);
        let state = RenderState::new(Matrix2D::IDENTITY, clip, 0)
            .with_shader_kind(ShaderKind::Rectangles)
            .with_fill_color([fill.r, fill.g, fill.b, fill.a])
            .with_opacity(1.0);
        let mut encoder = CpuEncoder::default();
        let luts = std::collections::HashMap::new();
        encoder.render_into(&mut image, &[state], &[], &luts);

        let access = image.full_access();
        let inside = access.pixel_bytes(50, 50);
        assert_eq!(inside, &[255, 128, 0, 255]);
        let outside = access.pixel_bytes(5, 5);
        assert_eq!(outside, &[0, 0, 0, 0]);
    }

    #[test]
    fn s3_linear_gradient_left_right() {
        use crate::atlas::{Gradient, GradientStop, GradientType};
        let mut image = blank_image(100, 100);
        let gradient = Gradient::new(
            GradientType::Linear,
            (0.0, 0.0),
            (100.0, 0.0),
            vec![
                GradientStop { position: 0.0, color: ColorF::straight(1.0, 0.0, 0.0, 1.0) },
                GradientStop { position: 1.0, color: ColorF::straight(0.0, 0.0, 1.0, 1.0) },
            ],
        );
        let lut = gradient.rasterize();
        let mut luts = std::collections::HashMap::new();
        luts.insert(1u32, lut);

        let clip = Rectangle::from_corners((0.0, 0.0), (100.0, 100.0));
        let state = RenderState::new(Matrix2D::IDENTITY, clip, 0)
            .with_shader_kind(ShaderKind::Rectangles)
            .with_gradient([0.0, 0.0, 100.0, 0.0], 1);
        let mut encoder = CpuEncoder::default();
        encoder.render_into(&mut image, &[state], &[], &luts);

        let access = image.full_access();
        let left = access.pixel_bytes(0, 50);
        let right = access.pixel_bytes(99, 50);
        assert!(left[0] > 200 && left[2] < 50);
        assert!(right[2] > 200 && right[0] < 50);
    }
}
