//! 2D size primitive, generic over a numeric component type.

use std::ops::{Add, Mul, Sub};

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct SizeOf<T> {
    pub width: T,
    pub height: T,
}

pub type Size = SizeOf<f32>;
pub type SizeI = SizeOf<u32>;

impl<T> SizeOf<T> {
    pub fn new(width: T, height: T) -> Self {
        SizeOf { width, height }
    }
}

impl Size {
    pub const ZERO: Size = Size {
        width: 0.0,
        height: 0.0,
    };

    pub fn area(self) -> f32 {
        self.width * self.height
    }

    pub fn shortest_side(self) -> f32 {
        self.width.min(self.height)
    }

    pub fn longest_side(self) -> f32 {
        self.width.max(self.height)
    }

    pub fn flipped(self) -> Size {
        Size::new(self.height, self.width)
    }

    pub fn round(self) -> Size {
        Size::new(self.width.round(), self.height.round())
    }

    pub fn to_physical(self, scale_factor: f64) -> SizeI {
        SizeI::new(
            (self.width as f64 * scale_factor).round() as u32,
            (self.height as f64 * scale_factor).round() as u32,
        )
    }
}

impl SizeI {
    pub fn to_logical(self, scale_factor: f64) -> Size {
        Size::new(
            (self.width as f64 / scale_factor) as f32,
            (self.height as f64 / scale_factor) as f32,
        )
    }
}

impl<T: Add<Output = T>> Add for SizeOf<T> {
    type Output = SizeOf<T>;
    fn add(self, rhs: SizeOf<T>) -> SizeOf<T> {
        SizeOf::new(self.width + rhs.width, self.height + rhs.height)
    }
}

impl<T: Sub<Output = T>> Sub for SizeOf<T> {
    type Output = SizeOf<T>;
    fn sub(self, rhs: SizeOf<T>) -> SizeOf<T> {
        SizeOf::new(self.width - rhs.width, self.height - rhs.height)
    }
}

impl<T: Mul<Output = T> + Copy> Mul<T> for SizeOf<T> {
    type Output = SizeOf<T>;
    fn mul(self, scalar: T) -> SizeOf<T> {
        SizeOf::new(self.width * scalar, self.height * scalar)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn physical_logical_round_trip_is_stable() {
        let logical = Size::new(100.0, 200.0);
        let physical = logical.to_physical(2.0);
        assert_eq!(physical, SizeI::new(200, 400));
        assert_eq!(physical.to_logical(2.0), logical);
    }
}
