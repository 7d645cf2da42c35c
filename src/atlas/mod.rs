//! Shared atlas storage: sprites and gradients, both id-keyed, LRU-evicted,
//! and generation-stamped for cache invalidation.

pub mod gradient;
pub mod sprite;

pub use gradient::{
    Gradient, GradientAtlas, GradientId, GradientLut, GradientStop, GradientType,
    GRADIENT_LUT_SAMPLES,
};
pub use sprite::{SpriteAtlas, SpriteId, SpriteSlot};

use parking_lot::ReentrantMutex;
use std::cell::RefCell;

/// Guards the atlases behind a single recursive mutex: atlas mutation can be
/// re-entered from within a callback the atlas itself invokes (e.g. a glyph
/// rasterization callback that also queries atlas occupancy), which a plain
/// `Mutex` would deadlock on. Mirrors the teacher's use of `RwLock` to guard
/// shared renderer-owned state (`texture_manager.rs`'s `texture_storage`),
/// upgraded to a reentrant lock since this guard is taken from nested call
/// sites rather than only from the render thread's top level.
pub struct AtlasGuard {
    inner: ReentrantMutex<RefCell<Atlases>>,
}

pub struct Atlases {
    pub sprites: SpriteAtlas,
    pub gradients: GradientAtlas,
}

impl AtlasGuard {
    pub fn new(sprite_surface: (u32, u32), sprite_capacity: usize, gradient_rows: u32) -> Self {
        AtlasGuard {
            inner: ReentrantMutex::new(RefCell::new(Atlases {
                sprites: SpriteAtlas::new(sprite_surface.0, sprite_surface.1, sprite_capacity),
                gradients: GradientAtlas::new(gradient_rows),
            })),
        }
    }

    pub fn with<R>(&self, f: impl FnOnce(&mut Atlases) -> R) -> R {
        let guard = self.inner.lock();
        f(&mut guard.borrow_mut())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reentrant_access_from_within_a_callback_does_not_deadlock() {
        let guard = AtlasGuard::new((256, 256), 16, 16);
        guard.with(|atlases| {
            atlases.sprites.insert(SpriteId(1), 8, 8);
            // Re-enter the same guard from within the outer closure.
            guard.with(|inner| {
                assert!(inner.sprites.get(SpriteId(1)).is_some());
            });
        });
    }
}
