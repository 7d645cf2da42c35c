//! Font pipeline (consumer view, spec.md §4.H): this crate never shapes
//! text or parses font files itself. It calls into a [`FontBackend`]
//! collaborator for that, then owns the two caches that make repeated
//! shaping and glyph rasterization cheap (`cache::GlyphSpriteCache`,
//! `cache::ShapingCache`) and the line-breaking/alignment layout built on
//! top of shaped runs (`layout`).

pub mod backend;
pub mod cache;
pub mod layout;
pub mod shaper;

pub use backend::GlyphonBackend;
pub use cache::{CachedGlyph, GlyphCacheKey, GlyphSpriteCache, ShapingCache};
pub use layout::{align_horizontal, align_vertical, break_lines, HorizontalAlign, VerticalAlign};
pub use shaper::{
    Decoration, FaceId, Font, FontBackend, FontMetrics, Glyph, GlyphFlags, GlyphRun,
    RasterizedGlyph, ShapedRuns, TextDirection, TextOptions, TextWithOptions,
};
