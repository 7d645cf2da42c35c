//! Two caches the font pipeline keeps on top of the external shaper
//! (spec.md §4.H): a glyph sprite cache (rasterized glyph bitmaps, one per
//! distinct face/glyph/subpixel-phase/flags combination) and a shaping
//! cache (full `ShapedRuns` results, keyed by font+text+options, evicted by
//! a frame-count TTL rather than LRU since shaped runs for on-screen text
//! are re-requested every frame they're visible).
//!
//! Grounded on the teacher's `lru::LruCache` choice for its tessellation
//! cache (`cache.rs`) for the sprite side; the shaping side's TTL/frame
//! counter has no teacher analogue (the teacher never caches shaped text)
//! and is implemented directly from spec.md's description.

use super::shaper::{FaceId, GlyphFlags, ShapedRuns, TextWithOptions};
use crate::atlas::SpriteId;
use ahash::AHashMap;

/// Cache key for one rasterized glyph. `subpixel_x` is the glyph's
/// fractional-pixel horizontal phase, quantized (typically to quarters or
/// thirds of a pixel) so that nearby phases share a cache entry instead of
/// rasterizing once per unique float offset.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct GlyphCacheKey {
    pub face: FaceId,
    pub glyph_id: u32,
    pub subpixel_x: u8,
    pub flags: GlyphFlags,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CachedGlyph {
    pub size: (u32, u32),
    pub sprite: SpriteId,
    pub bearing_x: f32,
    pub bearing_y: f32,
    pub advance: f32,
}

/// Maps `(face, glyph_id, subpixel_x, flags)` to the sprite-atlas entry
/// holding its rasterized bitmap. A thin `HashMap` wrapper: eviction of the
/// underlying bitmap is the sprite atlas's job (it tracks its own
/// generation/LRU); this cache only needs to forget an entry when told to,
/// so a stale sprite id isn't reused after the atlas repacks.
#[derive(Debug, Default)]
pub struct GlyphSpriteCache {
    entries: AHashMap<GlyphCacheKey, CachedGlyph>,
}

impl GlyphSpriteCache {
    pub fn new() -> Self {
        GlyphSpriteCache::default()
    }

    pub fn get(&self, key: GlyphCacheKey) -> Option<CachedGlyph> {
        self.entries.get(&key).copied()
    }

    pub fn insert(&mut self, key: GlyphCacheKey, glyph: CachedGlyph) {
        self.entries.insert(key, glyph);
    }

    pub fn remove(&mut self, key: GlyphCacheKey) {
        self.entries.remove(&key);
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Drops every cached glyph whose atlas generation predates
    /// `current_generation` — called after the sprite atlas repacks, since
    /// a repack can move or evict any previously-packed sprite.
    pub fn invalidate_all(&mut self) {
        self.entries.clear();
    }
}

struct ShapingEntry {
    runs: ShapedRuns,
    last_used_frame: u64,
}

/// Caches full shaping results keyed by `(Font, TextWithOptions)`. Entries
/// record the frame they were last read on a frame counter
/// (`last_used_frame`); [`ShapingCache::garbage_collect`] drops anything
/// older than the configured TTL, called once per frame by the widget tree
/// or application shell.
#[derive(Default)]
pub struct ShapingCache {
    entries: AHashMap<TextWithOptions, ShapingEntry>,
    ttl_frames: u64,
}

impl ShapingCache {
    pub fn new(ttl_frames: u64) -> Self {
        ShapingCache { entries: AHashMap::new(), ttl_frames }
    }

    /// Returns cached runs for `key` if present, stamping the entry as
    /// used on `current_frame` so it survives the next garbage collection.
    pub fn get(&mut self, key: &TextWithOptions, current_frame: u64) -> Option<&ShapedRuns> {
        if let Some(entry) = self.entries.get_mut(key) {
            entry.last_used_frame = current_frame;
            Some(&entry.runs)
        } else {
            None
        }
    }

    pub fn insert(&mut self, key: TextWithOptions, runs: ShapedRuns, current_frame: u64) {
        self.entries.insert(key, ShapingEntry { runs, last_used_frame: current_frame });
    }

    /// Evicts every entry whose `last_used_frame` is more than `ttl_frames`
    /// behind `current_frame`. Called once per frame, per spec.md §4.H
    /// (`garbageCollectCache()`).
    pub fn garbage_collect(&mut self, current_frame: u64) {
        let ttl = self.ttl_frames;
        self.entries.retain(|_, entry| current_frame.saturating_sub(entry.last_used_frame) <= ttl);
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::font::shaper::{Font, TextOptions};

    fn key(n: u64) -> TextWithOptions {
        TextWithOptions {
            font: Font { face: FaceId(1), size: 16.0 },
            text: format!("text-{n}"),
            options: TextOptions::default(),
        }
    }

    #[test]
    fn glyph_cache_round_trips_an_entry() {
        let mut cache = GlyphSpriteCache::new();
        let k = GlyphCacheKey { face: FaceId(1), glyph_id: 5, subpixel_x: 0, flags: GlyphFlags::empty() };
        let glyph = CachedGlyph { size: (8, 12), sprite: SpriteId(1), bearing_x: 0.0, bearing_y: 10.0, advance: 9.0 };
        cache.insert(k, glyph);
        assert_eq!(cache.get(k), Some(glyph));
    }

    #[test]
    fn shaping_cache_survives_within_ttl() {
        let mut cache = ShapingCache::new(2);
        cache.insert(key(1), vec![], 0);
        assert!(cache.get(&key(1), 1).is_some());
        cache.garbage_collect(1);
        assert!(cache.get(&key(1), 2).is_some());
    }

    #[test]
    fn shaping_cache_evicts_past_ttl() {
        let mut cache = ShapingCache::new(2);
        cache.insert(key(1), vec![], 0);
        cache.garbage_collect(10);
        assert!(cache.get(&key(1), 10).is_none());
    }
}
