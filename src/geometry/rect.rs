//! Axis-aligned rectangle primitive, stored as two opposite corners.
//!
//! Grounded on the teacher's `[(f32, f32); 2]` two-corner convention for
//! `RectShape` (`shape.rs`) and its `normalize_rect` min/max handling
//! (`util.rs`), generalized into a standalone, numeric-generic type.

use super::point::PointOf;
use super::size::SizeOf;
use crate::error::EArgument;

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct RectangleOf<T> {
    pub min: PointOf<T>,
    pub max: PointOf<T>,
}

pub type Rectangle = RectangleOf<f32>;
pub type RectangleI = RectangleOf<i32>;

impl<T: Copy> RectangleOf<T> {
    pub fn new(min: PointOf<T>, max: PointOf<T>) -> Self {
        RectangleOf { min, max }
    }

    pub fn from_corners(min: (T, T), max: (T, T)) -> Self {
        RectangleOf::new(PointOf::new(min.0, min.1), PointOf::new(max.0, max.1))
    }
}

impl RectangleI {
    /// Validates that `subrect` lies fully within `self`. Integer twin of
    /// [`Rectangle::validate_subrect`], used by the pixel-addressable image
    /// bounds checks where coordinates are already in whole pixels.
    pub fn validate_subrect(&self, subrect: &RectangleI) -> Result<(), EArgument> {
        let fits = subrect.min.x >= self.min.x
            && subrect.min.y >= self.min.y
            && subrect.max.x <= self.max.x
            && subrect.max.y <= self.max.y;
        if fits {
            Ok(())
        } else {
            Err(EArgument::RectOutOfBounds {
                rect: (subrect.min.x, subrect.min.y, subrect.max.x, subrect.max.y),
                bounds: (self.min.x, self.min.y, self.max.x, self.max.y),
            })
        }
    }
}

impl Rectangle {
    pub const ZERO: Rectangle = Rectangle {
        min: PointOf { x: 0.0, y: 0.0 },
        max: PointOf { x: 0.0, y: 0.0 },
    };

    pub fn from_origin_size(origin: PointOf<f32>, size: SizeOf<f32>) -> Self {
        Rectangle::new(origin, PointOf::new(origin.x + size.width, origin.y + size.height))
    }

    pub fn width(&self) -> f32 {
        self.max.x - self.min.x
    }

    pub fn height(&self) -> f32 {
        self.max.y - self.min.y
    }

    pub fn size(&self) -> SizeOf<f32> {
        SizeOf::new(self.width(), self.height())
    }

    pub fn area(&self) -> f32 {
        (self.width().max(0.0)) * (self.height().max(0.0))
    }

    pub fn shortest_side(&self) -> f32 {
        self.width().min(self.height())
    }

    pub fn longest_side(&self) -> f32 {
        self.width().max(self.height())
    }

    pub fn is_empty(&self) -> bool {
        self.width() <= 0.0 || self.height() <= 0.0
    }

    pub fn contains(&self, p: PointOf<f32>) -> bool {
        p.x >= self.min.x && p.x < self.max.x && p.y >= self.min.y && p.y < self.max.y
    }

    pub fn with_margin(&self, amount: f32) -> Rectangle {
        Rectangle::new(
            PointOf::new(self.min.x - amount, self.min.y - amount),
            PointOf::new(self.max.x + amount, self.max.y + amount),
        )
    }

    /// Alias for [`Rectangle::with_margin`] expressing an inward padding
    /// (equivalent to a negative margin).
    pub fn with_padding(&self, amount: f32) -> Rectangle {
        self.with_margin(-amount)
    }

    pub fn with_offset(&self, dx: f32, dy: f32) -> Rectangle {
        Rectangle::new(
            PointOf::new(self.min.x + dx, self.min.y + dy),
            PointOf::new(self.max.x + dx, self.max.y + dy),
        )
    }

    pub fn with_scale(&self, sx: f32, sy: f32) -> Rectangle {
        Rectangle::new(
            PointOf::new(self.min.x * sx, self.min.y * sy),
            PointOf::new(self.max.x * sx, self.max.y * sy),
        )
    }

    pub fn with_size(&self, size: SizeOf<f32>) -> Rectangle {
        Rectangle::from_origin_size(self.min, size)
    }

    pub fn with_start(&self, start: PointOf<f32>) -> Rectangle {
        let size = self.size();
        Rectangle::from_origin_size(start, size)
    }

    /// The smallest rectangle containing both `self` and `other`.
    pub fn union(&self, other: &Rectangle) -> Rectangle {
        if self.is_empty() {
            return *other;
        }
        if other.is_empty() {
            return *self;
        }
        Rectangle::new(self.min.min(other.min), self.max.max(other.max))
    }

    /// The overlap between `self` and `other`; empty (zero area, located at
    /// `self.min`) if they don't overlap.
    pub fn intersection(&self, other: &Rectangle) -> Rectangle {
        let min = self.min.max(other.min);
        let max = self.max.min(other.max);
        if max.x < min.x || max.y < min.y {
            Rectangle::new(min, min)
        } else {
            Rectangle::new(min, max)
        }
    }

    pub fn round(&self) -> Rectangle {
        Rectangle::new(self.min.round(), self.max.round())
    }

    pub fn floor(&self) -> Rectangle {
        Rectangle::new(self.min.floor(), self.max.floor())
    }

    pub fn ceil(&self) -> Rectangle {
        Rectangle::new(self.min.ceil(), self.max.ceil())
    }

    /// Rounds to device pixels (`AlignedPixels` semantics).
    pub fn aligned_rect(&self, pixel_ratio: f32) -> Rectangle {
        self.with_scale(pixel_ratio, pixel_ratio)
            .round()
            .with_scale(1.0 / pixel_ratio, 1.0 / pixel_ratio)
    }

    pub fn flipped(&self) -> Rectangle {
        Rectangle::new(self.min.flipped(), self.max.flipped())
    }

    /// Rounds to the nearest integer pixel rectangle, the conversion a
    /// software rasterizer needs before it can index pixels directly.
    pub fn round_to_pixels(&self) -> RectangleI {
        let r = self.round();
        RectangleI::from_corners((r.min.x as i32, r.min.y as i32), (r.max.x as i32, r.max.y as i32))
    }

    /// A point at normalized coordinates `t` within the rectangle
    /// (`t = (0,0)` is `min`, `t = (1,1)` is `max`).
    pub fn at(&self, t: PointOf<f32>) -> PointOf<f32> {
        PointOf::new(
            self.min.x + t.x * self.width(),
            self.min.y + t.y * self.height(),
        )
    }

    /// Splits the rectangle into `count` equal horizontal slices.
    pub fn split_horizontal(&self, count: u32) -> Vec<Rectangle> {
        if count == 0 {
            return Vec::new();
        }
        let step = self.width() / count as f32;
        (0..count)
            .map(|i| {
                Rectangle::new(
                    PointOf::new(self.min.x + step * i as f32, self.min.y),
                    PointOf::new(self.min.x + step * (i + 1) as f32, self.max.y),
                )
            })
            .collect()
    }

    /// Validates that `subrect` lies fully within `self`, the precondition
    /// spec.md §3 requires of image subrect access.
    pub fn validate_subrect(&self, subrect: &Rectangle) -> Result<(), EArgument> {
        let fits = subrect.min.x >= self.min.x
            && subrect.min.y >= self.min.y
            && subrect.max.x <= self.max.x
            && subrect.max.y <= self.max.y;
        if fits {
            Ok(())
        } else {
            Err(EArgument::RectOutOfBounds {
                rect: (
                    subrect.min.x as i32,
                    subrect.min.y as i32,
                    subrect.max.x as i32,
                    subrect.max.y as i32,
                ),
                bounds: (
                    self.min.x as i32,
                    self.min.y as i32,
                    self.max.x as i32,
                    self.max.y as i32,
                ),
            })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rect(a: (f32, f32), b: (f32, f32)) -> Rectangle {
        Rectangle::from_corners(a, b)
    }

    #[test]
    fn intersection_is_subset_of_both() {
        let a = rect((0.0, 0.0), (10.0, 10.0));
        let b = rect((5.0, 5.0), (15.0, 15.0));
        let i = a.intersection(&b);
        assert_eq!(i, rect((5.0, 5.0), (10.0, 10.0)));
    }

    #[test]
    fn union_contains_both() {
        let a = rect((0.0, 0.0), (10.0, 10.0));
        let b = rect((5.0, 5.0), (15.0, 15.0));
        let u = a.union(&b);
        assert_eq!(u, rect((0.0, 0.0), (15.0, 15.0)));
    }

    #[test]
    fn contains_matches_membership() {
        let a = rect((0.0, 0.0), (10.0, 10.0));
        assert!(a.contains(PointOf::new(5.0, 5.0)));
        assert!(!a.contains(PointOf::new(10.0, 10.0)));
        assert!(!a.contains(PointOf::new(-1.0, 5.0)));
    }

    #[test]
    fn non_overlapping_intersection_is_empty() {
        let a = rect((0.0, 0.0), (5.0, 5.0));
        let b = rect((10.0, 10.0), (15.0, 15.0));
        assert!(a.intersection(&b).is_empty());
    }

    #[test]
    fn subrect_validation_rejects_overflow() {
        let bounds = rect((0.0, 0.0), (10.0, 10.0));
        let ok = rect((1.0, 1.0), (9.0, 9.0));
        let bad = rect((1.0, 1.0), (11.0, 9.0));
        assert!(bounds.validate_subrect(&ok).is_ok());
        assert!(bounds.validate_subrect(&bad).is_err());
    }

    #[test]
    fn integer_subrect_validation_rejects_overflow() {
        let bounds = RectangleI::from_corners((0, 0), (4, 4));
        let ok = RectangleI::from_corners((1, 1), (3, 3));
        let bad = RectangleI::from_corners((0, 0), (10, 10));
        assert!(bounds.validate_subrect(&ok).is_ok());
        assert!(bounds.validate_subrect(&bad).is_err());
    }
}
