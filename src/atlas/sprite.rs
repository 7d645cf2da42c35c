//! Sprite atlas: packs externally-supplied images into shelves of a shared
//! texture, with LRU eviction and a generation counter per slot so that
//! cached GPU-side state (bind groups, vertex UVs) knows when a slot it
//! referenced has been repacked out from under it.
//!
//! Grounded on the teacher's `TextureManager`/`Cache` pair: `TextureManager`
//! keys its bind-group cache by `(texture_id, layout_epoch)` and drops
//! stale entries when a texture is re-allocated (`texture_manager.rs`); this
//! atlas generalizes that id+epoch invalidation to a single shared surface
//! with shelf packing, and reuses the teacher's `lru::LruCache` choice
//! (`cache.rs`) for eviction policy.

use crate::geometry::RectangleI;
use lru::LruCache;
use std::num::NonZeroUsize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SpriteId(pub u64);

/// A packed sprite's location plus the generation it was packed at.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SpriteSlot {
    pub rect: RectangleI,
    pub generation: u64,
}

/// A single horizontal shelf in the shelf-packing allocator.
struct Shelf {
    y: u32,
    height: u32,
    cursor_x: u32,
}

/// Packs sprites into a fixed-size atlas surface using shelf (strip)
/// packing: simple, allocation-order-stable, and good enough for the
/// typically-small, typically-similar-height sprites (glyphs, icons) this
/// atlas holds. Falls back to LRU eviction and a full repack once the
/// surface is exhausted.
pub struct SpriteAtlas {
    width: u32,
    height: u32,
    shelves: Vec<Shelf>,
    slots: LruCache<u64, SpriteSlot>,
    generation: u64,
}

impl SpriteAtlas {
    pub fn new(width: u32, height: u32, capacity: usize) -> Self {
        SpriteAtlas {
            width,
            height,
            shelves: Vec::new(),
            slots: LruCache::new(NonZeroUsize::new(capacity.max(1)).unwrap()),
            generation: 0,
        }
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn get(&mut self, id: SpriteId) -> Option<SpriteSlot> {
        self.slots.get(&id.0).copied()
    }

    /// Packs a new sprite of the given size, evicting the least-recently
    /// used slot(s) if the atlas is full. Returns `None` only if the sprite
    /// is larger than the entire atlas surface.
    pub fn insert(&mut self, id: SpriteId, width: u32, height: u32) -> Option<SpriteSlot> {
        if width > self.width || height > self.height {
            return None;
        }

        if let Some(rect) = self.try_pack(width, height) {
            return Some(self.commit(id, rect));
        }

        // Repack: the shelf layout has fragmented past usefulness for this
        // request. Evict oldest entries and reset shelves, then retry once.
        while !self.slots.is_empty() {
            self.slots.pop_lru();
            self.shelves.clear();
            if let Some(rect) = self.try_pack(width, height) {
                return Some(self.commit(id, rect));
            }
        }
        self.shelves.clear();
        self.try_pack(width, height).map(|rect| self.commit(id, rect))
    }

    fn commit(&mut self, id: SpriteId, rect: RectangleI) -> SpriteSlot {
        self.generation += 1;
        let slot = SpriteSlot { rect, generation: self.generation };
        self.slots.put(id.0, slot);
        slot
    }

    fn try_pack(&mut self, width: u32, height: u32) -> Option<RectangleI> {
        for shelf in &mut self.shelves {
            if height <= shelf.height && shelf.cursor_x + width <= self.width {
                let x = shelf.cursor_x;
                shelf.cursor_x += width;
                return Some(RectangleI::from_corners(
                    (x as i32, shelf.y as i32),
                    ((x + width) as i32, (shelf.y + height) as i32),
                ));
            }
        }

        let next_y = self.shelves.iter().map(|s| s.y + s.height).max().unwrap_or(0);
        if next_y + height > self.height {
            return None;
        }
        self.shelves.push(Shelf { y: next_y, height, cursor_x: width });
        Some(RectangleI::from_corners(
            (0, next_y as i32),
            (width as i32, (next_y + height) as i32),
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn packs_sprites_left_to_right_on_a_shelf() {
        let mut atlas = SpriteAtlas::new(256, 256, 16);
        let a = atlas.insert(SpriteId(1), 32, 32).unwrap();
        let b = atlas.insert(SpriteId(2), 32, 32).unwrap();
        assert_eq!(a.rect.max.x, b.rect.min.x);
        assert_eq!(a.rect.min.y, b.rect.min.y);
    }

    #[test]
    fn oversized_sprite_is_rejected() {
        let mut atlas = SpriteAtlas::new(64, 64, 16);
        assert!(atlas.insert(SpriteId(1), 128, 10).is_none());
    }

    #[test]
    fn repacking_bumps_generation_for_surviving_entries() {
        let mut atlas = SpriteAtlas::new(64, 64, 1);
        let first = atlas.insert(SpriteId(1), 16, 16).unwrap();
        let second = atlas.insert(SpriteId(2), 16, 16).unwrap();
        assert!(second.generation > first.generation);
        // id 1 was evicted by the capacity-1 LRU cache.
        assert!(atlas.get(SpriteId(1)).is_none());
    }
}
