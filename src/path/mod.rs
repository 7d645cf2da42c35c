//! Path construction, dash application, and fill/stroke tessellation.
//!
//! Grounded on the teacher's `ShapeBuilder`/`PathShape` (`shape.rs`):
//! `begin`/`line_to`/`cubic_bezier_to`/`quadratic_bezier_to`/`close` build a
//! `lyon::path::Path`, and `PathShape::tessellate` feeds it through a
//! `lyon::tessellation::FillTessellator` with a `FillVertexConstructor` that
//! stamps the depth and color the vertex pipeline needs. This module
//! generalizes that pipeline: it also tessellates strokes (the teacher's
//! `Stroke` field on `PathShape` was carried but never consumed — see
//! `DESIGN.md`), and applies dash patterns before stroking.

pub mod dash;
pub mod raster;

use crate::color::ColorF;
use crate::geometry::Rectangle;
use lyon::path::builder::PathBuilder;
use lyon::path::Path as LyonPath;
use lyon::tessellation::{
    BuffersBuilder, FillOptions, FillTessellator, FillVertex, FillVertexConstructor,
    StrokeOptions, StrokeTessellator, StrokeVertex, StrokeVertexConstructor, VertexBuffers,
};

pub use dash::apply_dash;
pub use raster::{rasterize, CapStyle, FillParams, FillRule, JoinStyle, RasterizedPath, StrokeParams};

/// A single tessellated vertex: position plus the interpolated paint
/// attributes the fragment shader needs. Generalizes the teacher's
/// `CustomVertex` (which hardcoded depth + straight color) to carry a
/// premultiplied color, matching [`ColorF`]'s blending convention.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PathVertex {
    pub position: [f32; 2],
    pub color: [f32; 4],
}

struct FillVertexConverter {
    color: [f32; 4],
}

impl FillVertexConstructor<PathVertex> for FillVertexConverter {
    fn new_vertex(&mut self, vertex: FillVertex) -> PathVertex {
        PathVertex { position: vertex.position().to_array(), color: self.color }
    }
}

struct StrokeVertexConverter {
    color: [f32; 4],
}

impl StrokeVertexConstructor<PathVertex> for StrokeVertexConverter {
    fn new_vertex(&mut self, vertex: StrokeVertex) -> PathVertex {
        PathVertex { position: vertex.position().to_array(), color: self.color }
    }
}

/// An editable sequence of path elements, convertible to the `lyon::path`
/// representation the tessellators consume. Kept as its own element list
/// (rather than only exposing `lyon::path::Path` directly) so dash
/// application can walk and rewrite segments without round-tripping
/// through lyon's iterator protocol.
#[derive(Debug, Clone, Default)]
pub struct Path {
    elements: Vec<PathElement>,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PathElement {
    MoveTo([f32; 2]),
    LineTo([f32; 2]),
    QuadTo { ctrl: [f32; 2], to: [f32; 2] },
    CubicTo { ctrl1: [f32; 2], ctrl2: [f32; 2], to: [f32; 2] },
    Close,
}

impl Path {
    pub fn new() -> Self {
        Path::default()
    }

    pub fn move_to(&mut self, p: [f32; 2]) -> &mut Self {
        self.elements.push(PathElement::MoveTo(p));
        self
    }

    pub fn line_to(&mut self, p: [f32; 2]) -> &mut Self {
        self.elements.push(PathElement::LineTo(p));
        self
    }

    pub fn quad_to(&mut self, ctrl: [f32; 2], to: [f32; 2]) -> &mut Self {
        self.elements.push(PathElement::QuadTo { ctrl, to });
        self
    }

    pub fn cubic_to(&mut self, ctrl1: [f32; 2], ctrl2: [f32; 2], to: [f32; 2]) -> &mut Self {
        self.elements.push(PathElement::CubicTo { ctrl1, ctrl2, to });
        self
    }

    pub fn close(&mut self) -> &mut Self {
        self.elements.push(PathElement::Close);
        self
    }

    /// The endpoint of the most recently added element, or the origin if
    /// the path is empty. Used by the corner-rounding helpers below to
    /// anchor their cubic approximations off whatever the caller last drew.
    pub fn last_point(&self) -> [f32; 2] {
        for el in self.elements.iter().rev() {
            match *el {
                PathElement::MoveTo(p) | PathElement::LineTo(p) => return p,
                PathElement::QuadTo { to, .. } | PathElement::CubicTo { to, .. } => return to,
                PathElement::Close => {}
            }
        }
        [0.0, 0.0]
    }

    /// A quarter-circle-ish corner from the current point, around `corner`,
    /// ending at `to`. Standard cubic approximation for right-angle rounded
    /// corners: control points sit a fixed fraction of the way from each
    /// endpoint toward the corner vertex.
    pub fn quarter_arc_to(&mut self, corner: [f32; 2], to: [f32; 2]) -> &mut Self {
        const K: f32 = 0.5522847498;
        let from = self.last_point();
        let lerp = |a: [f32; 2], b: [f32; 2], t: f32| [a[0] + (b[0] - a[0]) * t, a[1] + (b[1] - a[1]) * t];
        let c1 = lerp(from, corner, K);
        let c2 = lerp(to, corner, K);
        self.cubic_to(c1, c2, to)
    }

    /// Appends a circular arc around `center` from `start_angle` to
    /// `end_angle` (radians), connected to the current point with a
    /// straight line. Approximated with one cubic bezier per ≤90° segment,
    /// the same tolerance every other curve op in this module accepts.
    pub fn arc(&mut self, center: [f32; 2], radius: f32, start_angle: f32, end_angle: f32) -> &mut Self {
        let total = end_angle - start_angle;
        if total == 0.0 || radius <= 0.0 {
            return self;
        }
        let segments = (total.abs() / std::f32::consts::FRAC_PI_2).ceil().max(1.0) as u32;
        let step = total / segments as f32;
        let point_at = |angle: f32| [center[0] + radius * angle.cos(), center[1] + radius * angle.sin()];

        self.line_to(point_at(start_angle));
        let mut angle = start_angle;
        for _ in 0..segments {
            let next_angle = angle + step;
            let p0 = point_at(angle);
            let p1 = point_at(next_angle);
            let k = (4.0 / 3.0) * (step / 4.0).tan();
            let c1 = [p0[0] - k * radius * angle.sin(), p0[1] + k * radius * angle.cos()];
            let c2 = [p1[0] + k * radius * next_angle.sin(), p1[1] - k * radius * next_angle.cos()];
            self.cubic_to(c1, c2, p1);
            angle = next_angle;
        }
        self
    }

    /// Appends a closed rectangle subpath.
    pub fn add_rect(&mut self, rect: Rectangle) -> &mut Self {
        self.move_to([rect.min.x, rect.min.y])
            .line_to([rect.max.x, rect.min.y])
            .line_to([rect.max.x, rect.max.y])
            .line_to([rect.min.x, rect.max.y])
            .close()
    }

    /// Appends a closed rounded rectangle, with independently-radiused
    /// corners clamped so adjacent corners never overlap.
    pub fn add_round_rect(&mut self, rect: Rectangle, radii: crate::geometry::Corners) -> &mut Self {
        let max_r = rect.width().min(rect.height()) / 2.0;
        let tl = radii.top_left.clamp(0.0, max_r);
        let tr = radii.top_right.clamp(0.0, max_r);
        let bl = radii.bottom_left.clamp(0.0, max_r);
        let br = radii.bottom_right.clamp(0.0, max_r);
        let (x0, y0, x1, y1) = (rect.min.x, rect.min.y, rect.max.x, rect.max.y);

        if tl == 0.0 && tr == 0.0 && bl == 0.0 && br == 0.0 {
            return self.add_rect(rect);
        }

        self.move_to([x0 + tl, y0]);
        self.line_to([x1 - tr, y0]);
        self.quarter_arc_to([x1, y0], [x1, y0 + tr]);
        self.line_to([x1, y1 - br]);
        self.quarter_arc_to([x1, y1], [x1 - br, y1]);
        self.line_to([x0 + bl, y1]);
        self.quarter_arc_to([x0, y1], [x0, y1 - bl]);
        self.line_to([x0, y0 + tl]);
        self.quarter_arc_to([x0, y0], [x0 + tl, y0]);
        self.close()
    }

    /// Appends a closed ellipse as four cubic-bezier quadrants.
    pub fn add_ellipse(&mut self, center: [f32; 2], rx: f32, ry: f32) -> &mut Self {
        const K: f32 = 0.5522847498;
        let (cx, cy) = (center[0], center[1]);
        self.move_to([cx + rx, cy]);
        self.cubic_to([cx + rx, cy + ry * K], [cx + rx * K, cy + ry], [cx, cy + ry]);
        self.cubic_to([cx - rx * K, cy + ry], [cx - rx, cy + ry * K], [cx - rx, cy]);
        self.cubic_to([cx - rx, cy - ry * K], [cx - rx * K, cy - ry], [cx, cy - ry]);
        self.cubic_to([cx + rx * K, cy - ry], [cx + rx, cy - ry * K], [cx + rx, cy]);
        self.close()
    }

    /// Appends a closed polygon through `points`.
    pub fn add_polygon(&mut self, points: &[[f32; 2]]) -> &mut Self {
        if points.is_empty() {
            return self;
        }
        self.move_to(points[0]);
        for p in &points[1..] {
            self.line_to(*p);
        }
        self.close()
    }

    /// Appends a closed star: `points` outer vertices alternating with
    /// `points` inner vertices, starting straight up and rotated by
    /// `rotation_radians`.
    pub fn add_polystar(
        &mut self,
        center: [f32; 2],
        points: u32,
        inner_radius: f32,
        outer_radius: f32,
        rotation_radians: f32,
    ) -> &mut Self {
        if points < 2 {
            return self;
        }
        let step = std::f32::consts::PI / points as f32;
        let mut angle = rotation_radians - std::f32::consts::FRAC_PI_2;
        for i in 0..(points * 2) {
            let r = if i % 2 == 0 { outer_radius } else { inner_radius };
            let p = [center[0] + r * angle.cos(), center[1] + r * angle.sin()];
            if i == 0 {
                self.move_to(p);
            } else {
                self.line_to(p);
            }
            angle += step;
        }
        self.close()
    }

    /// Returns a new path with every point transformed by `m`.
    pub fn transformed(&self, m: &crate::geometry::Matrix2D) -> Path {
        let apply = |p: [f32; 2]| {
            let t = m.transform_point(crate::geometry::Point::new(p[0], p[1]));
            [t.x, t.y]
        };
        let mut out = Path::new();
        for el in &self.elements {
            match *el {
                PathElement::MoveTo(p) => {
                    out.move_to(apply(p));
                }
                PathElement::LineTo(p) => {
                    out.line_to(apply(p));
                }
                PathElement::QuadTo { ctrl, to } => {
                    out.quad_to(apply(ctrl), apply(to));
                }
                PathElement::CubicTo { ctrl1, ctrl2, to } => {
                    out.cubic_to(apply(ctrl1), apply(ctrl2), apply(to));
                }
                PathElement::Close => {
                    out.close();
                }
            }
        }
        out
    }

    pub fn elements(&self) -> &[PathElement] {
        &self.elements
    }

    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }

    /// Converts to a `lyon::path::Path`, the representation the
    /// tessellators operate on.
    pub fn to_lyon_path(&self) -> LyonPath {
        let mut builder = LyonPath::builder();
        let mut open = false;
        for el in &self.elements {
            match *el {
                PathElement::MoveTo(p) => {
                    if open {
                        builder.end(false);
                    }
                    builder.begin(p.into());
                    open = true;
                }
                PathElement::LineTo(p) => {
                    builder.line_to(p.into());
                }
                PathElement::QuadTo { ctrl, to } => {
                    builder.quadratic_bezier_to(ctrl.into(), to.into());
                }
                PathElement::CubicTo { ctrl1, ctrl2, to } => {
                    builder.cubic_bezier_to(ctrl1.into(), ctrl2.into(), to.into());
                }
                PathElement::Close => {
                    builder.close();
                    open = false;
                }
            }
        }
        if open {
            builder.end(false);
        }
        builder.build()
    }

    /// An approximate (control-point-hull) bounding box: cheap to compute
    /// and always a superset of the true tessellated bounds, since a
    /// Bezier curve never leaves its control polygon's convex hull.
    pub fn approximate_bounds(&self) -> Rectangle {
        let mut min = [f32::INFINITY, f32::INFINITY];
        let mut max = [f32::NEG_INFINITY, f32::NEG_INFINITY];
        let mut visit = |p: [f32; 2]| {
            min[0] = min[0].min(p[0]);
            min[1] = min[1].min(p[1]);
            max[0] = max[0].max(p[0]);
            max[1] = max[1].max(p[1]);
        };
        for el in &self.elements {
            match *el {
                PathElement::MoveTo(p) | PathElement::LineTo(p) => visit(p),
                PathElement::QuadTo { ctrl, to } => {
                    visit(ctrl);
                    visit(to);
                }
                PathElement::CubicTo { ctrl1, ctrl2, to } => {
                    visit(ctrl1);
                    visit(ctrl2);
                    visit(to);
                }
                PathElement::Close => {}
            }
        }
        if min[0].is_infinite() {
            return Rectangle::ZERO;
        }
        Rectangle::from_corners((min[0], min[1]), (max[0], max[1]))
    }

    pub fn fill(&self, color: ColorF) -> VertexBuffers<PathVertex, u16> {
        let lyon_path = self.to_lyon_path();
        let mut buffers = VertexBuffers::new();
        let mut tessellator = FillTessellator::new();
        let options = FillOptions::default();
        let converter = FillVertexConverter { color: premultiplied_array(color) };
        tessellator
            .tessellate_path(&lyon_path, &options, &mut BuffersBuilder::new(&mut buffers, converter))
            .expect("fill tessellation of a well-formed path cannot fail");
        buffers
    }

    pub fn stroke(&self, width: f32, color: ColorF) -> VertexBuffers<PathVertex, u16> {
        let lyon_path = self.to_lyon_path();
        let mut buffers = VertexBuffers::new();
        let mut tessellator = StrokeTessellator::new();
        let options = StrokeOptions::default().with_line_width(width);
        let converter = StrokeVertexConverter { color: premultiplied_array(color) };
        tessellator
            .tessellate_path(&lyon_path, &options, &mut BuffersBuilder::new(&mut buffers, converter))
            .expect("stroke tessellation of a well-formed path cannot fail");
        buffers
    }
}

fn premultiplied_array(c: ColorF) -> [f32; 4] {
    [c.r, c.g, c.b, c.a]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn approximate_bounds_of_a_triangle() {
        let mut path = Path::new();
        path.move_to([0.0, 0.0]).line_to([10.0, 0.0]).line_to([5.0, 10.0]).close();
        let bounds = path.approximate_bounds();
        assert_eq!(bounds, Rectangle::from_corners((0.0, 0.0), (10.0, 10.0)));
    }

    #[test]
    fn empty_path_has_zero_bounds() {
        assert_eq!(Path::new().approximate_bounds(), Rectangle::ZERO);
    }

    #[test]
    fn filling_a_triangle_produces_vertices() {
        let mut path = Path::new();
        path.move_to([0.0, 0.0]).line_to([10.0, 0.0]).line_to([5.0, 10.0]).close();
        let buffers = path.fill(ColorF::BLACK);
        assert!(!buffers.vertices.is_empty());
        assert!(!buffers.indices.is_empty());
    }

    #[test]
    fn stroking_a_line_produces_vertices() {
        let mut path = Path::new();
        path.move_to([0.0, 0.0]).line_to([100.0, 0.0]);
        let buffers = path.stroke(2.0, ColorF::BLACK);
        assert!(!buffers.vertices.is_empty());
    }

    #[test]
    fn add_rect_bounds_match_the_rectangle() {
        let mut path = Path::new();
        path.add_rect(Rectangle::from_corners((0.0, 0.0), (10.0, 20.0)));
        assert_eq!(path.approximate_bounds(), Rectangle::from_corners((0.0, 0.0), (10.0, 20.0)));
    }

    #[test]
    fn zero_radius_round_rect_matches_plain_rect() {
        let mut a = Path::new();
        a.add_round_rect(Rectangle::from_corners((0.0, 0.0), (10.0, 10.0)), crate::geometry::Corners::uniform(0.0));
        let mut b = Path::new();
        b.add_rect(Rectangle::from_corners((0.0, 0.0), (10.0, 10.0)));
        assert_eq!(a.elements().len(), b.elements().len());
    }

    #[test]
    fn round_rect_with_radii_stays_within_the_rect_bounds() {
        let mut path = Path::new();
        let rect = Rectangle::from_corners((0.0, 0.0), (100.0, 60.0));
        path.add_round_rect(rect, crate::geometry::Corners::uniform(12.0));
        let bounds = path.approximate_bounds();
        assert!(bounds.min.x >= rect.min.x - 0.01 && bounds.max.x <= rect.max.x + 0.01);
        assert!(bounds.min.y >= rect.min.y - 0.01 && bounds.max.y <= rect.max.y + 0.01);
    }

    #[test]
    fn ellipse_bounds_match_center_and_radii() {
        let mut path = Path::new();
        path.add_ellipse([50.0, 50.0], 20.0, 10.0);
        let bounds = path.approximate_bounds();
        assert!((bounds.width() - 40.0).abs() < 0.01);
        assert!((bounds.height() - 20.0).abs() < 0.01);
    }

    #[test]
    fn polygon_closes_back_to_the_first_point() {
        let mut path = Path::new();
        path.add_polygon(&[[0.0, 0.0], [10.0, 0.0], [5.0, 10.0]]);
        assert!(matches!(path.elements().last(), Some(PathElement::Close)));
    }

    #[test]
    fn transformed_translates_every_point() {
        let mut path = Path::new();
        path.move_to([0.0, 0.0]).line_to([10.0, 0.0]);
        let moved = path.transformed(&crate::geometry::Matrix2D::translation(5.0, 5.0));
        assert_eq!(moved.approximate_bounds(), Rectangle::from_corners((5.0, 5.0), (15.0, 5.0)));
    }

    #[test]
    fn arc_endpoints_land_on_the_circle() {
        let mut path = Path::new();
        path.move_to([10.0, 0.0]);
        path.arc([0.0, 0.0], 10.0, 0.0, std::f32::consts::PI);
        let bounds = path.approximate_bounds();
        assert!(bounds.width() > 15.0);
    }
}
