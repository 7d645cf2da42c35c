//! Rasterization of a [`Path`] into an 8-bit alpha coverage mask, clipped
//! to a rectangle — the `RasterizedPath` the spec's `Canvas::{fill,stroke}`
//! operations feed to a `ShaderKind::Mask` command (`crate::backend::cpu`'s
//! `paint_mask` samples exactly this coverage buffer).
//!
//! Grounded on the teacher's `PathShape::tessellate` (`shape.rs`), which
//! already produces triangles through `lyon::tessellation`; this module
//! reuses the same tessellators but rasterizes the resulting triangles to
//! a coverage grid instead of handing them to a GPU pipeline, since the
//! core is specified to own the CPU-side alpha mask (spec.md §4.D) rather
//! than only a GPU triangle list.

use super::{Path, PathElement};
use crate::geometry::{Rectangle, RectangleI};
use lyon::path::Path as LyonPath;
use lyon::tessellation::{
    BuffersBuilder, FillOptions, FillRule as LyonFillRule, FillTessellator, FillVertex,
    FillVertexConstructor, LineCap, LineJoin, StrokeOptions, StrokeTessellator, StrokeVertex,
    StrokeVertexConstructor, VertexBuffers,
};

/// Which points are "inside" a self-intersecting or multi-subpath fill.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FillRule {
    #[default]
    EvenOdd,
    Winding,
}

impl From<FillRule> for LyonFillRule {
    fn from(rule: FillRule) -> Self {
        match rule {
            FillRule::EvenOdd => LyonFillRule::EvenOdd,
            FillRule::Winding => LyonFillRule::NonZero,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct FillParams {
    pub rule: FillRule,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CapStyle {
    #[default]
    Flat,
    Square,
    Round,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum JoinStyle {
    #[default]
    Miter,
    Bevel,
    Round,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StrokeParams {
    pub join: JoinStyle,
    pub cap: CapStyle,
    pub width: f32,
    pub miter_limit: f32,
}

impl Default for StrokeParams {
    fn default() -> Self {
        StrokeParams { join: JoinStyle::Miter, cap: CapStyle::Flat, width: 1.0, miter_limit: 4.0 }
    }
}

/// An 8-bit alpha coverage mask produced by rasterizing a path, plus the
/// pixel rectangle it covers. `bounds` is always the intersection of the
/// path's geometric bounds and the requested clip rectangle (spec.md §8
/// invariant 7).
#[derive(Debug, Clone, PartialEq)]
pub struct RasterizedPath {
    pub bounds: RectangleI,
    /// Row-major, one byte per pixel in `bounds`; `coverage[y * width + x]`.
    coverage: Vec<u8>,
}

impl RasterizedPath {
    pub fn empty() -> Self {
        RasterizedPath { bounds: RectangleI::default(), coverage: Vec::new() }
    }

    pub fn width(&self) -> u32 {
        (self.bounds.max.x - self.bounds.min.x).max(0) as u32
    }

    pub fn height(&self) -> u32 {
        (self.bounds.max.y - self.bounds.min.y).max(0) as u32
    }

    pub fn coverage_bytes(&self) -> &[u8] {
        &self.coverage
    }

    /// Coverage at local pixel `(x, y)` within `bounds`, as a float in
    /// `[0, 1]`. Out-of-range coordinates read as zero coverage.
    pub fn coverage_at(&self, x: u32, y: u32) -> f32 {
        if x >= self.width() || y >= self.height() {
            return 0.0;
        }
        self.coverage[(y * self.width() + x) as usize] as f32 / 255.0
    }

    /// Coverage as `f32` in row-major order — the shape the CPU backend's
    /// `Mask` shader kind samples directly out of a command stream's data
    /// buffer.
    pub fn coverage_f32(&self) -> Vec<f32> {
        self.coverage.iter().map(|&b| b as f32 / 255.0).collect()
    }
}

const SUBSAMPLES: u32 = 4;

struct NoColor;
impl FillVertexConstructor<[f32; 2]> for NoColor {
    fn new_vertex(&mut self, vertex: FillVertex) -> [f32; 2] {
        vertex.position().to_array()
    }
}
impl StrokeVertexConstructor<[f32; 2]> for NoColor {
    fn new_vertex(&mut self, vertex: StrokeVertex) -> [f32; 2] {
        vertex.position().to_array()
    }
}

fn tessellate_fill(lyon_path: &LyonPath, params: FillParams) -> VertexBuffers<[f32; 2], u16> {
    let mut buffers = VertexBuffers::new();
    let mut tess = FillTessellator::new();
    let options = FillOptions::default().with_fill_rule(params.rule.into());
    let _ = tess.tessellate_path(lyon_path, &options, &mut BuffersBuilder::new(&mut buffers, NoColor));
    buffers
}

fn tessellate_stroke(lyon_path: &LyonPath, params: StrokeParams) -> VertexBuffers<[f32; 2], u16> {
    let mut buffers = VertexBuffers::new();
    let mut tess = StrokeTessellator::new();
    let cap = match params.cap {
        CapStyle::Flat => LineCap::Butt,
        CapStyle::Square => LineCap::Square,
        CapStyle::Round => LineCap::Round,
    };
    let join = match params.join {
        JoinStyle::Miter => LineJoin::Miter,
        JoinStyle::Bevel => LineJoin::Bevel,
        JoinStyle::Round => LineJoin::Round,
    };
    let options = StrokeOptions::default()
        .with_line_width(params.width)
        .with_line_cap(cap)
        .with_line_join(join)
        .with_miter_limit(params.miter_limit);
    let _ = tess.tessellate_path(lyon_path, &options, &mut BuffersBuilder::new(&mut buffers, NoColor));
    buffers
}

/// Rasterizes `path` with the given fill and/or stroke parameters, clipped
/// to `clip`. Both may be supplied (stroke-and-fill in one pass, coverage
/// unioned); at least one must be `Some` or the result is empty.
pub fn rasterize(
    path: &Path,
    fill: Option<FillParams>,
    stroke: Option<StrokeParams>,
    clip: RectangleI,
) -> RasterizedPath {
    let geom_bounds = path.approximate_bounds();
    let padded = if let Some(s) = stroke {
        geom_bounds.with_margin(s.width.max(0.0) / 2.0 + 1.0)
    } else {
        geom_bounds.with_margin(1.0)
    };
    let bounds_f = Rectangle::from_corners(
        (padded.min.x.floor(), padded.min.y.floor()),
        (padded.max.x.ceil(), padded.max.y.ceil()),
    );
    let bounds = clamp_to_clip(bounds_f.round_to_pixels(), clip);
    if bounds.max.x <= bounds.min.x || bounds.max.y <= bounds.min.y {
        return RasterizedPath::empty();
    }

    let lyon_path = path.to_lyon_path();
    let mut triangles: Vec<[[f32; 2]; 3]> = Vec::new();
    if let Some(params) = fill {
        let buffers = tessellate_fill(&lyon_path, params);
        collect_triangles(&buffers, &mut triangles);
    }
    if let Some(params) = stroke {
        let buffers = tessellate_stroke(&lyon_path, params);
        collect_triangles(&buffers, &mut triangles);
    }

    let width = (bounds.max.x - bounds.min.x) as u32;
    let height = (bounds.max.y - bounds.min.y) as u32;
    let mut coverage = vec![0u8; (width * height) as usize];

    let sub_step = 1.0 / SUBSAMPLES as f32;
    let max_hits = (SUBSAMPLES * SUBSAMPLES) as f32;
    for py in 0..height {
        for px in 0..width {
            let mut hits = 0u32;
            for sy in 0..SUBSAMPLES {
                for sx in 0..SUBSAMPLES {
                    let x = bounds.min.x as f32 + px as f32 + (sx as f32 + 0.5) * sub_step;
                    let y = bounds.min.y as f32 + py as f32 + (sy as f32 + 0.5) * sub_step;
                    if triangles.iter().any(|t| point_in_triangle([x, y], t)) {
                        hits += 1;
                    }
                }
            }
            if hits > 0 {
                coverage[(py * width + px) as usize] = ((hits as f32 / max_hits) * 255.0).round() as u8;
            }
        }
    }

    RasterizedPath { bounds, coverage }
}

fn clamp_to_clip(r: RectangleI, clip: RectangleI) -> RectangleI {
    RectangleI::from_corners(
        (r.min.x.max(clip.min.x), r.min.y.max(clip.min.y)),
        (r.max.x.min(clip.max.x), r.max.y.min(clip.max.y)),
    )
}

fn collect_triangles(buffers: &VertexBuffers<[f32; 2], u16>, out: &mut Vec<[[f32; 2]; 3]>) {
    for tri in buffers.indices.chunks_exact(3) {
        out.push([
            buffers.vertices[tri[0] as usize],
            buffers.vertices[tri[1] as usize],
            buffers.vertices[tri[2] as usize],
        ]);
    }
}

fn point_in_triangle(p: [f32; 2], t: &[[f32; 2]; 3]) -> bool {
    let sign = |a: [f32; 2], b: [f32; 2], c: [f32; 2]| {
        (a[0] - c[0]) * (b[1] - c[1]) - (b[0] - c[0]) * (a[1] - c[1])
    };
    let d1 = sign(p, t[0], t[1]);
    let d2 = sign(p, t[1], t[2]);
    let d3 = sign(p, t[2], t[0]);
    let has_neg = d1 < 0.0 || d2 < 0.0 || d3 < 0.0;
    let has_pos = d1 > 0.0 || d2 > 0.0 || d3 > 0.0;
    !(has_neg && has_pos)
}

/// Path element count helper used by [`crate::canvas`] to decide whether a
/// path is degenerate (no geometry to rasterize) before spending a pass on
/// tessellation.
pub fn is_degenerate(path: &Path) -> bool {
    path.elements().iter().all(|e| matches!(e, PathElement::MoveTo(_) | PathElement::Close))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn square() -> Path {
        let mut p = Path::new();
        p.move_to([10.0, 10.0])
            .line_to([90.0, 10.0])
            .line_to([90.0, 90.0])
            .line_to([10.0, 90.0])
            .close();
        p
    }

    #[test]
    fn fill_bounds_are_within_clip() {
        let clip = RectangleI::from_corners((0, 0), (100, 100));
        let raster = rasterize(&square(), Some(FillParams::default()), None, clip);
        assert!(raster.bounds.min.x >= clip.min.x && raster.bounds.max.x <= clip.max.x);
        assert!(raster.bounds.min.y >= clip.min.y && raster.bounds.max.y <= clip.max.y);
    }

    #[test]
    fn fill_bounds_are_clamped_by_a_tight_clip() {
        let clip = RectangleI::from_corners((20, 20), (50, 50));
        let raster = rasterize(&square(), Some(FillParams::default()), None, clip);
        assert_eq!(raster.bounds, clip);
    }

    #[test]
    fn interior_of_a_filled_square_is_fully_covered() {
        let clip = RectangleI::from_corners((0, 0), (100, 100));
        let raster = rasterize(&square(), Some(FillParams::default()), None, clip);
        let local_x = 50 - raster.bounds.min.x as u32;
        let local_y = 50 - raster.bounds.min.y as u32;
        assert_eq!(raster.coverage_at(local_x, local_y), 1.0);
    }

    #[test]
    fn exterior_of_a_filled_square_has_no_coverage() {
        let clip = RectangleI::from_corners((0, 0), (100, 100));
        let raster = rasterize(&square(), Some(FillParams::default()), None, clip);
        assert_eq!(raster.coverage_at(0, 0), 0.0);
    }

    #[test]
    fn empty_path_rasterizes_to_empty() {
        let clip = RectangleI::from_corners((0, 0), (100, 100));
        let raster = rasterize(&Path::new(), Some(FillParams::default()), None, clip);
        assert_eq!(raster.width(), 0);
        assert_eq!(raster.height(), 0);
    }
}
