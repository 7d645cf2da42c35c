//! The external font-shaping collaborator (spec.md §6): this crate never
//! loads font files or runs OpenType shaping itself — it calls into a
//! [`FontBackend`] and consumes the `GlyphRun`s it hands back. Grounded on
//! the teacher's `text.rs`, which performs the equivalent call
//! (`Buffer::shape_until_scroll` + `buffer.layout_runs()`) inline against
//! `glyphon`; this module extracts that as a trait boundary so the default
//! `glyphon`-backed implementation (`super::backend::GlyphonBackend`) is
//! swappable in tests.

use crate::error::FontError;
use crate::geometry::{Point, Rectangle};

/// A font face handle. Opaque beyond equality/hashing — the backend is
/// free to interpret it however it loads faces (a path, a family name, a
/// database index).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct FaceId(pub u64);

/// A font at a specific size, the unit the shaper and the glyph caches key
/// on.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Font {
    pub face: FaceId,
    pub size: f32,
}

impl Eq for Font {}
impl std::hash::Hash for Font {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        self.face.hash(state);
        self.size.to_bits().hash(state);
    }
}

bitflags::bitflags! {
    /// Per-glyph rendering flags, kept on the cache key so hinting/AA
    /// variants of the same glyph don't collide in the sprite cache.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
    pub struct GlyphFlags: u32 {
        const BOLD = 1 << 0;
        const ITALIC = 1 << 1;
        const SUBPIXEL_AA = 1 << 2;
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TextDirection {
    #[default]
    LeftToRight,
    RightToLeft,
}

/// Shaping request options, part of the shaping cache key alongside the
/// font and text.
#[derive(Debug, Clone, PartialEq)]
pub struct TextOptions {
    pub direction: TextDirection,
    pub flags: GlyphFlags,
    pub letter_spacing: f32,
}

impl Default for TextOptions {
    fn default() -> Self {
        TextOptions { direction: TextDirection::LeftToRight, flags: GlyphFlags::empty(), letter_spacing: 0.0 }
    }
}

/// `(font, text, options)` bundled into one hashable cache key.
#[derive(Debug, Clone, PartialEq)]
pub struct TextWithOptions {
    pub font: Font,
    pub text: String,
    pub options: TextOptions,
}

impl Eq for TextWithOptions {}
impl std::hash::Hash for TextWithOptions {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        self.font.hash(state);
        self.text.hash(state);
        self.options.direction.hash(state);
        self.options.flags.bits().hash(state);
        self.options.letter_spacing.to_bits().hash(state);
    }
}

/// One glyph placed within a shaped run.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Glyph {
    pub glyph_id: u32,
    pub codepoint: u32,
    pub pos: Point,
    pub left_caret: f32,
    pub right_caret: f32,
    pub begin_char: usize,
    pub end_char: usize,
    pub direction: TextDirection,
    pub flags: GlyphFlags,
}

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct FontMetrics {
    pub ascent: f32,
    pub descent: f32,
    pub line_gap: f32,
    pub em_height: f32,
}

impl FontMetrics {
    pub fn line_height(&self) -> f32 {
        self.ascent + self.descent + self.line_gap
    }
}

/// Decoration drawn alongside a run (underline/strikethrough), resolved by
/// the shaper from the font's metrics.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Decoration {
    pub underline: bool,
    pub strikethrough: bool,
}

/// One contiguous run of glyphs from a single face/size/direction, the
/// shaper's unit of output. A shaped string is a `Vec<GlyphRun>` (multiple
/// runs arise from bidi, font fallback, or explicit line breaks).
#[derive(Debug, Clone, PartialEq)]
pub struct GlyphRun {
    pub glyphs: Vec<Glyph>,
    pub face: FaceId,
    pub size: f32,
    pub metrics: FontMetrics,
    pub decoration: Decoration,
    pub direction: TextDirection,
    pub visual_order: u32,
    pub position: Point,
}

impl GlyphRun {
    /// Total advance width of the run: the rightmost glyph's right caret,
    /// or zero for an empty run.
    pub fn advance_width(&self) -> f32 {
        self.glyphs.last().map(|g| g.right_caret).unwrap_or(0.0)
    }
}

pub type ShapedRuns = Vec<GlyphRun>;

/// An 8-bit alpha coverage bitmap for one rasterized glyph, plus the
/// bearing/advance metrics needed to place it.
#[derive(Debug, Clone, PartialEq)]
pub struct RasterizedGlyph {
    pub width: u32,
    pub height: u32,
    pub coverage: Vec<u8>,
    pub bearing_x: f32,
    pub bearing_y: f32,
    pub advance: f32,
}

/// The external shaper collaborator (spec.md §6): `shape`, `metrics`,
/// `has_codepoint`, `bounds`, plus `rasterize_glyph` for the glyph sprite
/// cache (`super::cache::GlyphSpriteCache`) to pack into the sprite atlas.
/// Out of scope: the backend owns font file loading and the actual
/// OpenType shaping algorithm.
pub trait FontBackend {
    fn shape(&mut self, font: Font, text: &str, options: &TextOptions) -> Result<ShapedRuns, FontError>;
    fn metrics(&self, font: Font) -> Result<FontMetrics, FontError>;
    fn has_codepoint(&self, font: Font, codepoint: u32) -> bool;
    fn bounds(&mut self, font: Font, text: &str) -> Result<Rectangle, FontError>;
    fn rasterize_glyph(
        &mut self,
        font: Font,
        glyph_id: u32,
        subpixel_x: f32,
    ) -> Result<RasterizedGlyph, FontError>;
}
