//! The `RenderEncoder`/target traits: the small, backend-agnostic surface
//! that `crate::canvas` and `crate::widget::tree` submit batched commands
//! through. Per spec.md §4.F, kept deliberately small — all per-frame
//! resource management lives inside each concrete backend.

use crate::color::ColorF;
use crate::error::RenderDeviceError;
use crate::geometry::RectangleI;
use crate::pixel::Image;
use crate::render_state::RenderState;

/// One frame (or sub-frame) of submission: `begin` → one or more `batch`
/// calls → `end`. Mirrors the teacher's `Renderer::render` pass split
/// (`renderer/rendering.rs`, `renderer/passes.rs`) collapsed to the four
/// calls spec.md §4.F names.
pub trait RenderEncoder {
    /// Begins a pass against a target, clearing to `clear_color`.
    /// `dirty_rects` is a scissor/partial-redraw hint; an empty slice means
    /// "redraw everything".
    fn begin(&mut self, clear_color: ColorF, dirty_rects: &[RectangleI]);

    /// Submits one batch: `states[i]` reads `data[states[i].data_offset..
    /// +data_size]` for its per-instance geometry. Called once per flush of
    /// a `crate::render_state::CommandStream`.
    fn batch(&mut self, states: &[RenderState], data: &[f32]);

    fn end(&mut self);

    /// Blocks until all submitted work for this pass has completed on the
    /// device. A synchronous fence (spec.md §5): must not be held across a
    /// frame the UI thread is expected to keep animating during.
    fn wait(&mut self);

    fn set_subpixel_text(&mut self, enabled: bool);
    fn set_gamma(&mut self, gamma: f32);
    fn set_blue_light_filter(&mut self, amount: f32);
}

/// A window-backed presentation surface.
pub trait WindowRenderTarget {
    fn resize_backbuffer(&mut self, size: crate::geometry::SizeI);
    fn present(&mut self) -> Result<(), RenderDeviceError>;
    /// `0` disables vsync, `1` is standard vsync, `N>1` presents every Nth
    /// vblank.
    fn set_vsync_interval(&mut self, interval: u32);
}

/// An offscreen target whose contents can be read back as a CPU [`Image`].
pub trait ImageRenderTarget {
    fn image(&self) -> &Image;
    fn image_mut(&mut self) -> &mut Image;
}
