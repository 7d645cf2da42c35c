//! [`RawCanvas`]: the stateless drawing layer spec.md §4.G calls out as the
//! thing widgets ultimately paint through. Every method takes its full
//! paint/transform/clip/opacity state as arguments rather than tracking a
//! "current style" — that bookkeeping, plus the save/restore stack, belongs
//! to [`super::state::Canvas`], which wraps this type.
//!
//! Grounded on the teacher's `ShapeBuilder` (`shape.rs`): where the teacher
//! builds one `PathShape`/`RectShape`/... per draw call and hands it to
//! `Renderer::draw_shape`, this builds one [`RenderState`] plus a slice of
//! the flat instance-data buffer and hands both to a [`RenderEncoder`],
//! which is the same two-array batching model the teacher's renderer
//! consumes internally (`renderer/types.rs`'s vertex/index buffers), just
//! pushed one layer up so it no longer needs to know about `wgpu` buffer
//! handles.

use std::collections::HashMap;
use std::sync::Arc;

use tracing::warn;

use crate::atlas::{AtlasGuard, Gradient, GradientId, GradientLut, SpriteId};
use crate::backend::RenderEncoder;
use crate::color::ColorF;
use crate::error::FontError;
use crate::font::{
    CachedGlyph, Font, FontBackend, GlyphCacheKey, GlyphSpriteCache, ShapedRuns, ShapingCache,
    TextOptions, TextWithOptions,
};
use crate::geometry::{Matrix2D, Point, Rectangle};
use crate::path::raster::is_degenerate;
use crate::path::{rasterize, FillParams, FillRule, Path, StrokeParams};
use crate::render_state::{should_flush, RenderState, SamplerMode, ShaderKind, DEFAULT_BATCH_LIMIT};

use super::paint::Paint;

/// Per-frame shaping-cache TTL, in frames: entries for text that hasn't been
/// drawn in this many frames are dropped by [`RawCanvas::begin_frame`].
const SHAPING_CACHE_TTL_FRAMES: u64 = 120;

/// The stateless drawing layer wrapping one [`RenderEncoder`]. Owns the
/// shared atlas guard, the gradient LUT cache keyed by atlas row, the font
/// backend plus its two caches, and the flat `RenderState`/`f32` batch pair
/// commands accumulate into before a flush.
pub struct RawCanvas<E: RenderEncoder> {
    encoder: E,
    atlases: Arc<AtlasGuard>,
    font_backend: Box<dyn FontBackend>,
    glyph_cache: GlyphSpriteCache,
    shaping_cache: ShapingCache,
    gradient_luts: HashMap<u32, GradientLut>,
    states: Vec<RenderState>,
    data: Vec<f32>,
    command_limit: usize,
    frame: u64,
}

impl<E: RenderEncoder> RawCanvas<E> {
    pub fn new(encoder: E, atlases: Arc<AtlasGuard>, font_backend: Box<dyn FontBackend>) -> Self {
        RawCanvas {
            encoder,
            atlases,
            font_backend,
            glyph_cache: GlyphSpriteCache::new(),
            shaping_cache: ShapingCache::new(SHAPING_CACHE_TTL_FRAMES),
            gradient_luts: HashMap::new(),
            states: Vec::new(),
            data: Vec::new(),
            command_limit: DEFAULT_BATCH_LIMIT,
            frame: 0,
        }
    }

    pub fn encoder(&self) -> &E {
        &self.encoder
    }

    pub fn encoder_mut(&mut self) -> &mut E {
        &mut self.encoder
    }

    pub fn gradient_luts(&self) -> &HashMap<u32, GradientLut> {
        &self.gradient_luts
    }

    /// Advances the shaping cache's frame counter and garbage-collects
    /// expired entries. Call once per frame before drawing (spec.md §4.H's
    /// `garbageCollectCache`).
    pub fn begin_frame(&mut self, frame: u64, clear_color: ColorF, dirty_rects: &[crate::geometry::RectangleI]) {
        self.frame = frame;
        self.shaping_cache.garbage_collect(frame);
        self.encoder.begin(clear_color, dirty_rects);
    }

    /// Flushes any pending batch and ends the pass.
    pub fn end_frame(&mut self) {
        self.flush();
        self.encoder.end();
    }

    pub fn wait(&mut self) {
        self.encoder.wait();
    }

    /// Bakes `gradient`'s stops into a LUT and registers it under `id`,
    /// returning the atlas row every draw referencing this gradient must
    /// pass back as part of its [`Paint::Gradient`]. Safe to call again for
    /// the same id to re-bake after the stop list changes.
    pub fn define_gradient(&mut self, id: GradientId, gradient: &Gradient) -> u32 {
        let slot = self
            .atlases
            .with(|atlases| atlases.gradients.get(id).unwrap_or_else(|| atlases.gradients.insert(id)));
        self.gradient_luts.insert(slot.row, gradient.rasterize());
        slot.row
    }

    fn gradient_row(&self, id: GradientId) -> Option<u32> {
        self.atlases.with(|atlases| atlases.gradients.get(id).map(|s| s.row))
    }

    fn base_state(&self, paint: &Paint, transform: Matrix2D, clip: Rectangle, opacity: f32) -> RenderState {
        let mut state = RenderState::new(transform, clip, 0).with_opacity(opacity);
        match *paint {
            Paint::Solid(color) => {
                let cf = color.to_float();
                state = state.with_fill_color([cf.r, cf.g, cf.b, cf.a]);
            }
            Paint::Gradient { id, start, end } => {
                if let Some(row) = self.gradient_row(id) {
                    state = state.with_gradient([start.0, start.1, end.0, end.1], row);
                } else {
                    warn!(gradient = id.0, "gradient paint used before define_gradient; drawing nothing visible");
                }
            }
            Paint::Texture { image_id, sampler } => {
                state = state.with_texture(image_id, sampler);
            }
        }
        state
    }

    /// Appends one command, flushing the current batch first if adding it
    /// would exceed the configured limit. Grounded on
    /// `render_state::should_flush`, the same command/vertex-count decision
    /// `CommandStream` uses, generalized here to a flat float count instead
    /// of a vertex count.
    fn push_command(&mut self, mut state: RenderState, data: &[f32]) {
        if !self.states.is_empty() && should_flush(self.states.len(), self.data.len(), data.len(), self.command_limit) {
            self.flush();
        }
        let offset = self.data.len() as u32;
        state.data_offset = offset;
        state.data_size = data.len() as u32;
        self.data.extend_from_slice(data);
        self.states.push(state);
    }

    /// Submits the accumulated batch to the encoder and resets both arrays.
    pub fn flush(&mut self) {
        if self.states.is_empty() {
            return;
        }
        self.encoder.batch(&self.states, &self.data);
        self.states.clear();
        self.data.clear();
    }

    pub fn fill_rect(&mut self, rect: Rectangle, paint: &Paint, opacity: f32, clip: Rectangle, transform: Matrix2D) {
        let clipped = rect.intersection(&clip);
        if clipped.is_empty() {
            return;
        }
        let mut state = self.base_state(paint, transform, clipped, opacity);
        state = state.with_shader_kind(ShaderKind::Rectangles);
        self.push_command(state, &[]);
    }

    pub fn stroke_rect(
        &mut self,
        rect: Rectangle,
        stroke: StrokeParams,
        paint: &Paint,
        opacity: f32,
        clip: Rectangle,
        transform: Matrix2D,
    ) {
        let mut path = Path::new();
        path.add_rect(rect);
        self.emit_mask(&path, None, Some(stroke), paint, opacity, clip, transform);
    }

    pub fn fill_ellipse(
        &mut self,
        center: Point,
        rx: f32,
        ry: f32,
        paint: &Paint,
        opacity: f32,
        clip: Rectangle,
        transform: Matrix2D,
    ) {
        let bounds = Rectangle::from_corners((center.x - rx, center.y - ry), (center.x + rx, center.y + ry))
            .intersection(&clip);
        if bounds.is_empty() {
            return;
        }
        let mut state = self.base_state(paint, transform, bounds, opacity);
        state = state.with_shader_kind(ShaderKind::Arcs);
        self.push_command(state, &[center.x, center.y, rx, ry]);
    }

    /// Unlike [`RawCanvas::fill_ellipse`], stroking an ellipse isn't a
    /// uniform-inset of the `Arcs` shader's implicit form (the teacher never
    /// drew stroked arcs either), so this routes through the rasterizer like
    /// any other stroked path.
    pub fn stroke_ellipse(
        &mut self,
        center: Point,
        rx: f32,
        ry: f32,
        stroke: StrokeParams,
        paint: &Paint,
        opacity: f32,
        clip: Rectangle,
        transform: Matrix2D,
    ) {
        let mut path = Path::new();
        path.add_ellipse([center.x, center.y], rx, ry);
        self.emit_mask(&path, None, Some(stroke), paint, opacity, clip, transform);
    }

    pub fn fill_polygon(
        &mut self,
        points: &[[f32; 2]],
        rule: FillRule,
        paint: &Paint,
        opacity: f32,
        clip: Rectangle,
        transform: Matrix2D,
    ) {
        let mut path = Path::new();
        path.add_polygon(points);
        self.emit_mask(&path, Some(FillParams { rule }), None, paint, opacity, clip, transform);
    }

    pub fn stroke_polygon(
        &mut self,
        points: &[[f32; 2]],
        stroke: StrokeParams,
        paint: &Paint,
        opacity: f32,
        clip: Rectangle,
        transform: Matrix2D,
    ) {
        let mut path = Path::new();
        path.add_polygon(points);
        self.emit_mask(&path, None, Some(stroke), paint, opacity, clip, transform);
    }

    pub fn stroke_line(
        &mut self,
        from: Point,
        to: Point,
        stroke: StrokeParams,
        paint: &Paint,
        opacity: f32,
        clip: Rectangle,
        transform: Matrix2D,
    ) {
        let mut path = Path::new();
        path.move_to([from.x, from.y]).line_to([to.x, to.y]);
        self.emit_mask(&path, None, Some(stroke), paint, opacity, clip, transform);
    }

    pub fn fill_path(
        &mut self,
        path: &Path,
        rule: FillRule,
        paint: &Paint,
        opacity: f32,
        clip: Rectangle,
        transform: Matrix2D,
    ) {
        self.emit_mask(path, Some(FillParams { rule }), None, paint, opacity, clip, transform);
    }

    pub fn stroke_path(
        &mut self,
        path: &Path,
        stroke: StrokeParams,
        paint: &Paint,
        opacity: f32,
        clip: Rectangle,
        transform: Matrix2D,
    ) {
        self.emit_mask(path, None, Some(stroke), paint, opacity, clip, transform);
    }

    /// Common path behind every fill/stroke-by-rasterization call: tessellate
    /// to triangles, rasterize to an 8-bit coverage mask (`path::raster`),
    /// and emit it as a single `ShaderKind::Mask` command whose `data` is the
    /// coverage buffer — the exact layout `backend::cpu`'s `paint_mask`
    /// expects at `data[data_offset + local_y * width + local_x]`.
    fn emit_mask(
        &mut self,
        path: &Path,
        fill: Option<FillParams>,
        stroke: Option<StrokeParams>,
        paint: &Paint,
        opacity: f32,
        clip: Rectangle,
        transform: Matrix2D,
    ) {
        if is_degenerate(path) {
            return;
        }
        let raster = rasterize(path, fill, stroke, clip.round_to_pixels());
        if raster.width() == 0 || raster.height() == 0 {
            return;
        }
        let bounds = Rectangle::from_corners(
            (raster.bounds.min.x as f32, raster.bounds.min.y as f32),
            (raster.bounds.max.x as f32, raster.bounds.max.y as f32),
        );
        let mut state = self.base_state(paint, transform, bounds, opacity);
        state = state.with_shader_kind(ShaderKind::Mask);
        let coverage = raster.coverage_f32();
        self.push_command(state, &coverage);
    }

    /// Shapes `text` (consulting the shaping cache first) and draws the
    /// resulting runs at `pos`.
    pub fn fill_text(
        &mut self,
        text: &str,
        pos: Point,
        font: Font,
        options: &TextOptions,
        paint: &Paint,
        opacity: f32,
        clip: Rectangle,
        transform: Matrix2D,
    ) -> Result<(), FontError> {
        let key = TextWithOptions { font, text: text.to_string(), options: options.clone() };
        let runs = if let Some(runs) = self.shaping_cache.get(&key, self.frame) {
            runs.clone()
        } else {
            let runs = self.font_backend.shape(font, text, options)?;
            self.shaping_cache.insert(key, runs.clone(), self.frame);
            runs
        };
        self.draw_shaped_runs(&runs, pos, paint, opacity, clip, transform);
        Ok(())
    }

    /// Draws pre-shaped runs directly, skipping the shaping cache — for
    /// callers (e.g. a text widget re-using its own shaped layout across
    /// frames) that already hold a `ShapedRuns` result.
    pub fn draw_shaped_runs(
        &mut self,
        runs: &ShapedRuns,
        pos: Point,
        paint: &Paint,
        opacity: f32,
        clip: Rectangle,
        transform: Matrix2D,
    ) {
        for run in runs {
            if run.glyphs.is_empty() {
                continue;
            }
            // Best-effort: pack every glyph's bitmap into the sprite atlas so
            // the cache is warm by the time a GPU backend goes looking for
            // it. A rasterization failure here shouldn't drop the run.
            for glyph in &run.glyphs {
                if let Err(err) = self.ensure_glyph_sprite(run.face, run.size, glyph.glyph_id, glyph.pos.x, glyph.flags) {
                    warn!(?err, glyph = glyph.glyph_id, "glyph rasterization failed; skipping sprite cache warm-up");
                }
            }

            let mut quads = Vec::with_capacity(run.glyphs.len() * 4);
            for glyph in &run.glyphs {
                quads.extend_from_slice(&[
                    pos.x + run.position.x + glyph.pos.x,
                    pos.y + run.position.y,
                    glyph.right_caret - glyph.left_caret,
                    run.metrics.line_height(),
                ]);
            }

            let mut state = self.base_state(paint, transform, clip, opacity);
            state = state.with_shader_kind(ShaderKind::Text);
            state.instance_count = run.glyphs.len() as u32;
            self.push_command(state, &quads);
        }
    }

    /// Draws `image_id` (already uploaded/registered by the caller) as a
    /// textured rectangle. The CPU backend has no texture sampler of its own
    /// (`backend::cpu` only ever fills solid color or gradient-sampled
    /// rectangles); a GPU backend resolves `texture_id` against its own
    /// texture table.
    pub fn draw_image(
        &mut self,
        image_id: u64,
        dest: Rectangle,
        sampler: SamplerMode,
        opacity: f32,
        clip: Rectangle,
        transform: Matrix2D,
    ) {
        let clipped = dest.intersection(&clip);
        if clipped.is_empty() {
            return;
        }
        let mut state = RenderState::new(transform, clipped, 0).with_opacity(opacity).with_texture(image_id, sampler);
        state = state.with_shader_kind(ShaderKind::Rectangles);
        self.push_command(state, &[]);
    }

    fn quantize_subpixel(x: f32) -> u8 {
        ((x.fract().abs() * 4.0).round() as u8) % 4
    }

    fn glyph_sprite_id(key: GlyphCacheKey) -> SpriteId {
        use std::hash::{Hash, Hasher};
        let mut hasher = std::collections::hash_map::DefaultHasher::new();
        key.hash(&mut hasher);
        SpriteId(hasher.finish())
    }

    fn ensure_glyph_sprite(
        &mut self,
        face: crate::font::FaceId,
        size: f32,
        glyph_id: u32,
        subpixel_x: f32,
        flags: crate::font::GlyphFlags,
    ) -> Result<CachedGlyph, FontError> {
        let key = GlyphCacheKey { face, glyph_id, subpixel_x: Self::quantize_subpixel(subpixel_x), flags };
        if let Some(cached) = self.glyph_cache.get(key) {
            return Ok(cached);
        }
        let font = Font { face, size };
        let rasterized = self.font_backend.rasterize_glyph(font, glyph_id, subpixel_x)?;
        let sprite_id = Self::glyph_sprite_id(key);
        self.atlases.with(|atlases| atlases.sprites.insert(sprite_id, rasterized.width, rasterized.height));
        let cached = CachedGlyph {
            size: (rasterized.width, rasterized.height),
            sprite: sprite_id,
            bearing_x: rasterized.bearing_x,
            bearing_y: rasterized.bearing_y,
            advance: rasterized.advance,
        };
        self.glyph_cache.insert(key, cached);
        Ok(cached)
    }
}
