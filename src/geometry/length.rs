//! GUI-relative length values packed into a single 32-bit word.
//!
//! A [`Length`] carries a float value and a [`LengthUnit`] tag in the space of
//! a single `f32`. Valueless units (`Undefined`, `Auto`) are packed into the
//! NaN payload of the float so that any non-NaN bit pattern decodes as
//! `value x unit`, matching the bit trick used by the reference GUI toolkit
//! this crate's layout model is ported from: the unit tag lives in the low
//! mantissa bits, the value occupies everything else.

use std::fmt;

/// Unit tag for a [`Length`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum LengthUnit {
    /// Value ignored; represents "no length set".
    Undefined = 0,
    /// Value ignored; represents "let the layout engine decide".
    Auto = 1,

    /// GUI-space pixels (device-pixel independent).
    Pixels = 2,
    /// Physical device pixels.
    DevicePixels = 3,
    /// GUI pixels, rounded to the nearest device pixel once the pixel ratio
    /// is known.
    AlignedPixels = 4,
    /// Multiples of the resolved font's em-square.
    Em = 5,
    /// Percentage (0-100) of the parent's content box.
    Percent = 6,
    /// Percentage of viewport width.
    Vw = 7,
    /// Percentage of viewport height.
    Vh = 8,
    /// `min(Vw, Vh)`.
    Vmin = 9,
    /// `max(Vw, Vh)`.
    Vmax = 10,
}

impl LengthUnit {
    const LAST: u8 = LengthUnit::Vmax as u8;
    const DEFAULT: u8 = LengthUnit::Pixels as u8;

    /// Units below `Default` carry no numeric value.
    #[inline]
    fn is_valueless(tag: u8) -> bool {
        tag < Self::DEFAULT
    }

    #[inline]
    fn from_tag(tag: u8) -> Self {
        match tag {
            0 => LengthUnit::Undefined,
            1 => LengthUnit::Auto,
            2 => LengthUnit::Pixels,
            3 => LengthUnit::DevicePixels,
            4 => LengthUnit::AlignedPixels,
            5 => LengthUnit::Em,
            6 => LengthUnit::Percent,
            7 => LengthUnit::Vw,
            8 => LengthUnit::Vh,
            9 => LengthUnit::Vmin,
            10 => LengthUnit::Vmax,
            _ => unreachable!("unit tag out of range"),
        }
    }
}

// Number of bits needed to address `Undefined..=Vmax`.
const UNIT_BITS: u32 = 4;
const UNIT_MASK: u32 = (1u32 << UNIT_BITS) - 1;
const VALUE_MASK: u32 = !UNIT_MASK;
// Bit pattern of a quiet NaN with an all-zero mantissa-minus-tag payload.
const SPECIAL: u32 = 0x7FC0_0000;

const _: () = assert!((LengthUnit::LAST as u32) <= UNIT_MASK);

/// A packed `(value, unit)` pair occupying 4 bytes.
#[derive(Clone, Copy, PartialEq)]
pub struct Length {
    packed: u32,
}

impl Default for Length {
    fn default() -> Self {
        Length::UNDEFINED
    }
}

impl Length {
    /// The "no length set" sentinel.
    pub const UNDEFINED: Length = Length::pack_const(0.0, LengthUnit::Undefined);
    /// The "let the layout engine decide" sentinel.
    pub const AUTO: Length = Length::pack_const(0.0, LengthUnit::Auto);

    /// Constructs a length from a value and unit.
    #[inline]
    pub fn new(value: f32, unit: LengthUnit) -> Self {
        Length {
            packed: Self::pack(value, unit),
        }
    }

    /// Constructs a pixel length. The common case, so it gets a short name.
    #[inline]
    pub fn px(value: f32) -> Self {
        Length::new(value, LengthUnit::Pixels)
    }

    /// Constructs a percent length (0-100 range, matching CSS convention).
    #[inline]
    pub fn percent(value: f32) -> Self {
        Length::new(value, LengthUnit::Percent)
    }

    const fn pack_const(value: f32, unit: LengthUnit) -> Length {
        let tag = unit as u8 as u32;
        // const fn can't call the instance-method `is_valueless`, inline it.
        let packed = if tag < LengthUnit::DEFAULT as u32 {
            SPECIAL | tag
        } else {
            (value.to_bits() & VALUE_MASK) | (tag - LengthUnit::DEFAULT as u32)
        };
        Length { packed }
    }

    #[inline]
    fn pack(value: f32, unit: LengthUnit) -> u32 {
        let tag = unit as u8 as u32;
        if LengthUnit::is_valueless(tag) {
            SPECIAL | tag
        } else {
            (value.to_bits() & VALUE_MASK) | (tag - LengthUnit::DEFAULT as u32)
        }
    }

    /// Whether this length carries a numeric value (i.e. is not `Undefined`
    /// or `Auto`).
    #[inline]
    pub fn has_value(&self) -> bool {
        !LengthUnit::is_valueless(self.unit() as u8)
    }

    /// True if this is the `Undefined` sentinel.
    #[inline]
    pub fn is_undefined(&self) -> bool {
        matches!(self.unit(), LengthUnit::Undefined)
    }

    /// True if this is the `Auto` sentinel.
    #[inline]
    pub fn is_auto(&self) -> bool {
        matches!(self.unit(), LengthUnit::Auto)
    }

    /// The unit tag, decoded from the packed bits.
    #[inline]
    pub fn unit(&self) -> LengthUnit {
        if (self.packed & VALUE_MASK) == SPECIAL {
            LengthUnit::from_tag((self.packed & UNIT_MASK) as u8)
        } else {
            LengthUnit::from_tag((self.packed & UNIT_MASK) as u8 + LengthUnit::DEFAULT)
        }
    }

    /// The numeric value, decoded from the packed bits. `NaN` for valueless
    /// units.
    #[inline]
    pub fn value(&self) -> f32 {
        if (self.packed & VALUE_MASK) == SPECIAL {
            f32::NAN
        } else {
            f32::from_bits(self.packed & VALUE_MASK)
        }
    }

    /// The value, or `fallback` if this length carries no value.
    #[inline]
    pub fn value_or(&self, fallback: f32) -> f32 {
        if self.has_value() {
            self.value()
        } else {
            fallback
        }
    }

    /// Resolves a `Pixels`/`Em`/`Percent`/viewport length against the given
    /// scale, producing a new `Pixels` length. Non-matching units and
    /// valueless lengths pass through unchanged.
    #[inline]
    pub fn convert(&self, src: LengthUnit, scale: f32) -> Length {
        if self.unit() == src {
            Length::px(self.value() * scale)
        } else {
            *self
        }
    }
}

impl fmt::Debug for Length {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.has_value() {
            write!(f, "Length({}, {:?})", self.value(), self.unit())
        } else {
            write!(f, "Length({:?})", self.unit())
        }
    }
}

impl std::ops::Neg for Length {
    type Output = Length;
    fn neg(self) -> Length {
        Length::new(-self.value(), self.unit())
    }
}

impl std::ops::Mul<f32> for Length {
    type Output = Length;
    fn mul(self, factor: f32) -> Length {
        Length::new(self.value() * factor, self.unit())
    }
}

impl std::ops::Mul<Length> for f32 {
    type Output = Length;
    fn mul(self, value: Length) -> Length {
        value * self
    }
}

impl From<f32> for Length {
    fn from(value: f32) -> Self {
        Length::px(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn all_valued_units() -> Vec<LengthUnit> {
        vec![
            LengthUnit::Pixels,
            LengthUnit::DevicePixels,
            LengthUnit::AlignedPixels,
            LengthUnit::Em,
            LengthUnit::Percent,
            LengthUnit::Vw,
            LengthUnit::Vh,
            LengthUnit::Vmin,
            LengthUnit::Vmax,
        ]
    }

    #[test]
    fn round_trips_every_valued_unit() {
        for unit in all_valued_units() {
            for value in [0.0f32, 1.0, -42.5, 1000.25, -0.0] {
                let length = Length::new(value, unit);
                assert_eq!(length.value(), value, "unit {unit:?}");
                assert_eq!(length.unit(), unit, "unit {unit:?}");
            }
        }
    }

    #[test]
    fn undefined_decodes_as_undefined() {
        let u = Length::UNDEFINED;
        assert_eq!(u.unit(), LengthUnit::Undefined);
        assert!(!u.has_value());
    }

    #[test]
    fn auto_decodes_as_auto() {
        let a = Length::AUTO;
        assert_eq!(a.unit(), LengthUnit::Auto);
        assert!(!a.has_value());
    }

    #[test]
    fn default_is_undefined() {
        assert!(Length::default().is_undefined());
    }

    #[test]
    fn from_f32_is_pixels() {
        let l: Length = 10.0.into();
        assert_eq!(l.unit(), LengthUnit::Pixels);
        assert_eq!(l.value(), 10.0);
    }

    #[test]
    fn convert_scales_matching_unit_only() {
        let em = Length::new(2.0, LengthUnit::Em);
        let scaled = em.convert(LengthUnit::Em, 16.0);
        assert_eq!(scaled.unit(), LengthUnit::Pixels);
        assert_eq!(scaled.value(), 32.0);

        let px = Length::px(5.0);
        let unchanged = px.convert(LengthUnit::Em, 16.0);
        assert_eq!(unchanged.unit(), LengthUnit::Pixels);
        assert_eq!(unchanged.value(), 5.0);
    }

    #[test]
    fn size_is_four_bytes() {
        assert_eq!(std::mem::size_of::<Length>(), 4);
    }
}
