//! Gradient atlas: each gradient is baked into a 1024-sample lookup table
//! (one row of a shared LUT texture), so the shader resolves a gradient
//! stop by a single texture sample instead of walking a stop list per
//! fragment.
//!
//! Grounded the same way as [`super::sprite::SpriteAtlas`]: id-keyed LRU
//! storage mirroring `TextureManager`'s `texture_storage` map
//! (`texture_manager.rs`), generation-stamped entries so stale shader
//! bindings can be detected, row allocation instead of shelf packing since
//! every LUT is the same fixed width.

use crate::color::ColorF;
use lru::LruCache;
use std::num::NonZeroUsize;

pub const GRADIENT_LUT_SAMPLES: usize = 1024;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct GradientId(pub u64);

/// The gradient shapes spec.md §3 names. `Angle` sweeps around the center
/// point; `Reflected` mirrors the linear axis back on itself;
/// `InsideOutside` is the radial gradient run in reverse (stop 0 at the
/// outer edge).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GradientType {
    Linear,
    Radial,
    Angle,
    Reflected,
    Diamond,
    InsideOutside,
}

/// A gradient definition: shape, two control points (their meaning depends
/// on `gradient_type` — axis endpoints for `Linear`/`Reflected`, center +
/// edge for `Radial`/`Diamond`/`InsideOutside`/`Angle`), and an ordered stop
/// list. `rasterize` bakes this into the 1024-sample [`GradientLut`] the
/// shader actually samples; the control points themselves are carried in
/// the `RenderState` record (`gradient_points`), not in the LUT.
#[derive(Debug, Clone, PartialEq)]
pub struct Gradient {
    pub gradient_type: GradientType,
    pub start: (f32, f32),
    pub end: (f32, f32),
    pub stops: Vec<GradientStop>,
}

impl Gradient {
    pub fn new(gradient_type: GradientType, start: (f32, f32), end: (f32, f32), stops: Vec<GradientStop>) -> Self {
        let mut stops = stops;
        stops.sort_by(|a, b| a.position.partial_cmp(&b.position).unwrap_or(std::cmp::Ordering::Equal));
        Gradient { gradient_type, start, end, stops }
    }

    pub fn rasterize(&self) -> GradientLut {
        GradientLut::bake_typed(&self.stops, self.gradient_type)
    }
}

/// One stop in a gradient definition: a position in `[0, 1]` and a color.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GradientStop {
    pub position: f32,
    pub color: ColorF,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GradientSlot {
    pub row: u32,
    pub generation: u64,
}

/// Precomputed 1024-sample row for a gradient. Stored premultiplied, ready
/// to upload as one row of an `Rgba32Float` (or `Rgba8UnormSrgb`, see
/// [`GradientLut::to_srgb8_row`]) texture. Carries `gradient_type` alongside
/// the baked samples so a consumer (e.g. `backend::cpu`'s software
/// rasterizer) can tell which shape `RenderState.gradient_points` describes
/// without threading the originating `Gradient` through separately.
pub struct GradientLut {
    pub gradient_type: GradientType,
    pub samples: Box<[ColorF; GRADIENT_LUT_SAMPLES]>,
}

impl GradientLut {
    /// Bakes a sorted (by `position`) stop list into a `Linear`-tagged LUT.
    /// Prefer [`GradientLut::bake_typed`] when the gradient's actual shape
    /// matters to the caller; this exists for callers (and tests) that only
    /// care about the stop interpolation, not the shape dispatch.
    pub fn bake(stops: &[GradientStop]) -> GradientLut {
        GradientLut::bake_typed(stops, GradientType::Linear)
    }

    /// Bakes a sorted (by `position`) stop list into a LUT by linear
    /// interpolation in premultiplied space, matching [`ColorF::mix`],
    /// tagged with the gradient shape it was baked from.
    pub fn bake_typed(stops: &[GradientStop], gradient_type: GradientType) -> GradientLut {
        assert!(!stops.is_empty(), "a gradient needs at least one stop");
        let mut samples = Box::new([ColorF::TRANSPARENT; GRADIENT_LUT_SAMPLES]);
        for (i, sample) in samples.iter_mut().enumerate() {
            let t = i as f32 / (GRADIENT_LUT_SAMPLES - 1) as f32;
            *sample = sample_stops(stops, t);
        }
        GradientLut { gradient_type, samples }
    }

    /// Samples the LUT at `t ∈ [0, 1]`, clamping out-of-range values to the
    /// nearest endpoint. This is the CPU-side equivalent of the shader's
    /// single texture fetch against the LUT row.
    pub fn sample(&self, t: f32) -> ColorF {
        let t = t.clamp(0.0, 1.0);
        let index = (t * (GRADIENT_LUT_SAMPLES - 1) as f32).round() as usize;
        self.samples[index.min(GRADIENT_LUT_SAMPLES - 1)]
    }

    pub fn to_srgb8_row(&self) -> Vec<u8> {
        let mut out = Vec::with_capacity(GRADIENT_LUT_SAMPLES * 4);
        for c in self.samples.iter() {
            let [r, g, b, a] = c.to_straight();
            out.extend_from_slice(&[
                (r.clamp(0.0, 1.0) * 255.0).round() as u8,
                (g.clamp(0.0, 1.0) * 255.0).round() as u8,
                (b.clamp(0.0, 1.0) * 255.0).round() as u8,
                (a.clamp(0.0, 1.0) * 255.0).round() as u8,
            ]);
        }
        out
    }
}

fn sample_stops(stops: &[GradientStop], t: f32) -> ColorF {
    if stops.len() == 1 {
        return stops[0].color;
    }
    if t <= stops[0].position {
        return stops[0].color;
    }
    let last = stops.len() - 1;
    if t >= stops[last].position {
        return stops[last].color;
    }
    for pair in stops.windows(2) {
        let (a, b) = (pair[0], pair[1]);
        if t >= a.position && t <= b.position {
            let span = (b.position - a.position).max(f32::EPSILON);
            let local_t = (t - a.position) / span;
            return ColorF::mix(local_t, a.color, b.color);
        }
    }
    stops[last].color
}

/// Row-allocated LUT storage with LRU eviction, keyed by gradient id.
pub struct GradientAtlas {
    row_capacity: u32,
    next_row: u32,
    free_rows: Vec<u32>,
    slots: LruCache<u64, GradientSlot>,
    generation: u64,
}

impl GradientAtlas {
    pub fn new(row_capacity: u32) -> Self {
        GradientAtlas {
            row_capacity,
            next_row: 0,
            free_rows: Vec::new(),
            slots: LruCache::new(NonZeroUsize::new(row_capacity.max(1) as usize).unwrap()),
            generation: 0,
        }
    }

    pub fn get(&mut self, id: GradientId) -> Option<GradientSlot> {
        self.slots.get(&id.0).copied()
    }

    pub fn insert(&mut self, id: GradientId) -> GradientSlot {
        // Evict before allocating: if the atlas is already at capacity,
        // `allocate_row` must see the row an LRU eviction just freed rather
        // than handing out a fresh (out-of-bounds, once `next_row` hits
        // `row_capacity`) one — matching `SpriteAtlas::insert`'s
        // evict-then-retry order.
        if self.free_rows.is_empty() && self.next_row >= self.row_capacity {
            if let Some((_, evicted)) = self.slots.pop_lru() {
                self.free_rows.push(evicted.row);
            }
        }
        let row = self.allocate_row();
        self.generation += 1;
        let slot = GradientSlot { row, generation: self.generation };
        if let Some((_, evicted)) = self.slots.push(id.0, slot) {
            self.free_rows.push(evicted.row);
        }
        slot
    }

    fn allocate_row(&mut self) -> u32 {
        if let Some(row) = self.free_rows.pop() {
            return row;
        }
        let row = self.next_row;
        self.next_row = (self.next_row + 1).min(self.row_capacity);
        row
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn stop(position: f32, color: ColorF) -> GradientStop {
        GradientStop { position, color }
    }

    #[test]
    fn lut_endpoints_match_stop_colors() {
        let lut = GradientLut::bake(&[stop(0.0, ColorF::BLACK), stop(1.0, ColorF::WHITE)]);
        assert_eq!(lut.samples[0], ColorF::BLACK);
        assert_eq!(lut.samples[GRADIENT_LUT_SAMPLES - 1], ColorF::WHITE);
    }

    #[test]
    fn lut_midpoint_is_interpolated() {
        let lut = GradientLut::bake(&[stop(0.0, ColorF::BLACK), stop(1.0, ColorF::WHITE)]);
        let mid = &lut.samples[GRADIENT_LUT_SAMPLES / 2];
        assert!(mid.r > 0.0 && mid.r < 1.0);
    }

    #[test]
    fn single_stop_gradient_is_constant() {
        let lut = GradientLut::bake(&[stop(0.5, ColorF::WHITE)]);
        assert!(lut.samples.iter().all(|&c| c == ColorF::WHITE));
    }

    #[test]
    fn eviction_frees_row_for_reuse() {
        let mut atlas = GradientAtlas::new(1);
        let first = atlas.insert(GradientId(1));
        let second = atlas.insert(GradientId(2));
        assert_eq!(first.row, second.row);
        assert!(atlas.get(GradientId(1)).is_none());
    }
}
