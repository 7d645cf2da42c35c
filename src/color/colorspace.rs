//! Color space tags and CIEXYZ-mediated conversion between them.
//!
//! Every space funnels through `CIEXYZ` (D65 white point) as the hub: a
//! direct `A -> B` matrix would need one entry per pair, while routing
//! through XYZ needs only one matrix/formula per space. Gamut-constrained
//! spaces (`Srgb`, `DisplayP3`, `AdobeRgb`, `Rec2020`) additionally clip
//! out-of-gamut results by attenuating chroma via binary search rather than
//! naive per-channel clamping, which would shift hue.

use std::marker::PhantomData;

/// Tag identifying which color space a [`Trichromatic`] value's three
/// components are expressed in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ColorSpace {
    /// Gamma-encoded sRGB, the default working space for 8-bit `Color`.
    Srgb,
    /// Linear-light sRGB primaries (no gamma encoding).
    LinearSrgb,
    /// Gamma-encoded Display P3 (wide-gamut).
    DisplayP3,
    /// Gamma-encoded Adobe RGB (1998).
    AdobeRgb,
    /// Gamma-encoded Rec. 2020 (UHDTV wide-gamut).
    Rec2020,
    /// CIE 1931 XYZ, D65 white point. The conversion hub.
    CieXyz,
    /// CIE 1976 L*u*v*.
    CieLuv,
    /// CIE 1976 L*a*b*.
    CieLab,
    /// Polar form of `CieLab` (lightness, chroma, hue).
    CieLch,
    /// Oklab perceptual color space.
    Oklab,
}

/// A three-component color value tagged with the [`ColorSpace`] its
/// components are expressed in. `Space` is a zero-sized marker type so the
/// tag is checked at compile time; use [`Trichromatic::space`] to read the
/// runtime [`ColorSpace`] when erasing the static tag.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Trichromatic<Space> {
    pub a: f32,
    pub b: f32,
    pub c: f32,
    _space: PhantomData<Space>,
}

impl<Space> Trichromatic<Space> {
    pub fn new(a: f32, b: f32, c: f32) -> Self {
        Trichromatic { a, b, c, _space: PhantomData }
    }
}

/// D65 XYZ tristimulus values, the hub every conversion routes through.
pub type Xyz = Trichromatic<marker::CieXyz>;

pub mod marker {
    pub struct Srgb;
    pub struct LinearSrgb;
    pub struct DisplayP3;
    pub struct AdobeRgb;
    pub struct Rec2020;
    pub struct CieXyz;
    pub struct CieLuv;
    pub struct CieLab;
    pub struct CieLch;
    pub struct Oklab;
}

fn srgb_to_linear(c: f32) -> f32 {
    if c <= 0.04045 {
        c / 12.92
    } else {
        ((c + 0.055) / 1.055).powf(2.4)
    }
}

fn linear_to_srgb(c: f32) -> f32 {
    if c <= 0.0031308 {
        c * 12.92
    } else {
        1.055 * c.powf(1.0 / 2.4) - 0.055
    }
}

/// Row-major 3x3 RGB->XYZ matrix times a column vector.
fn mat3_mul(m: [[f32; 3]; 3], v: [f32; 3]) -> [f32; 3] {
    [
        m[0][0] * v[0] + m[0][1] * v[1] + m[0][2] * v[2],
        m[1][0] * v[0] + m[1][1] * v[1] + m[1][2] * v[2],
        m[2][0] * v[0] + m[2][1] * v[1] + m[2][2] * v[2],
    ]
}

fn invert3(m: [[f32; 3]; 3]) -> [[f32; 3]; 3] {
    let det = m[0][0] * (m[1][1] * m[2][2] - m[1][2] * m[2][1])
        - m[0][1] * (m[1][0] * m[2][2] - m[1][2] * m[2][0])
        + m[0][2] * (m[1][0] * m[2][1] - m[1][1] * m[2][0]);
    let inv_det = 1.0 / det;
    [
        [
            (m[1][1] * m[2][2] - m[1][2] * m[2][1]) * inv_det,
            (m[0][2] * m[2][1] - m[0][1] * m[2][2]) * inv_det,
            (m[0][1] * m[1][2] - m[0][2] * m[1][1]) * inv_det,
        ],
        [
            (m[1][2] * m[2][0] - m[1][0] * m[2][2]) * inv_det,
            (m[0][0] * m[2][2] - m[0][2] * m[2][0]) * inv_det,
            (m[0][2] * m[1][0] - m[0][0] * m[1][2]) * inv_det,
        ],
        [
            (m[1][0] * m[2][1] - m[1][1] * m[2][0]) * inv_det,
            (m[0][1] * m[2][0] - m[0][0] * m[2][1]) * inv_det,
            (m[0][0] * m[1][1] - m[0][1] * m[1][0]) * inv_det,
        ],
    ]
}

// D65-referenced RGB->XYZ matrices (IEC 61966-2-1 / SMPTE EG 432-1 / ITU-R BT.2020).
const SRGB_TO_XYZ: [[f32; 3]; 3] = [
    [0.4124564, 0.3575761, 0.1804375],
    [0.2126729, 0.7151522, 0.0721750],
    [0.0193339, 0.1191920, 0.9503041],
];
const DISPLAY_P3_TO_XYZ: [[f32; 3]; 3] = [
    [0.4865709, 0.2656677, 0.1982173],
    [0.2289746, 0.6917385, 0.0792869],
    [0.0000000, 0.0451134, 1.0439444],
];
const ADOBE_RGB_TO_XYZ: [[f32; 3]; 3] = [
    [0.5767309, 0.1855540, 0.1881852],
    [0.2973769, 0.6273491, 0.0752741],
    [0.0270343, 0.0706872, 0.9911085],
];
const REC2020_TO_XYZ: [[f32; 3]; 3] = [
    [0.6369580, 0.1446169, 0.1688810],
    [0.2627002, 0.6779981, 0.0593017],
    [0.0000000, 0.0280727, 1.0609851],
];

const WHITE_D65: [f32; 3] = [0.95047, 1.0, 1.08883];

impl Trichromatic<marker::Srgb> {
    pub fn to_xyz(&self) -> Xyz {
        let linear = [srgb_to_linear(self.a), srgb_to_linear(self.b), srgb_to_linear(self.c)];
        let [x, y, z] = mat3_mul(SRGB_TO_XYZ, linear);
        Xyz::new(x, y, z)
    }
}

impl Trichromatic<marker::LinearSrgb> {
    /// No gamma decode needed: the components are already linear-light
    /// sRGB primaries, so this is a bare matrix multiply against the same
    /// `SRGB_TO_XYZ` primaries `Srgb::to_xyz` uses after its gamma decode.
    pub fn to_xyz(&self) -> Xyz {
        let [x, y, z] = mat3_mul(SRGB_TO_XYZ, [self.a, self.b, self.c]);
        Xyz::new(x, y, z)
    }
}

impl Xyz {
    pub fn to_srgb(&self) -> Trichromatic<marker::Srgb> {
        let linear = mat3_mul(invert3(SRGB_TO_XYZ), [self.a, self.b, self.c]);
        let clipped = clip_in_gamut(linear);
        Trichromatic::new(
            linear_to_srgb(clipped[0]),
            linear_to_srgb(clipped[1]),
            linear_to_srgb(clipped[2]),
        )
    }

    /// Inverse of `LinearSrgb::to_xyz`: same matrix and gamut clip as
    /// `to_srgb`, minus the gamma encode.
    pub fn to_linear_srgb(&self) -> Trichromatic<marker::LinearSrgb> {
        let linear = mat3_mul(invert3(SRGB_TO_XYZ), [self.a, self.b, self.c]);
        let clipped = clip_in_gamut(linear);
        Trichromatic::new(clipped[0], clipped[1], clipped[2])
    }

    pub fn to_display_p3(&self) -> Trichromatic<marker::DisplayP3> {
        let linear = mat3_mul(invert3(DISPLAY_P3_TO_XYZ), [self.a, self.b, self.c]);
        let clipped = clip_in_gamut(linear);
        Trichromatic::new(
            linear_to_srgb(clipped[0]),
            linear_to_srgb(clipped[1]),
            linear_to_srgb(clipped[2]),
        )
    }

    pub fn to_adobe_rgb(&self) -> Trichromatic<marker::AdobeRgb> {
        let linear = mat3_mul(invert3(ADOBE_RGB_TO_XYZ), [self.a, self.b, self.c]);
        let clipped = clip_in_gamut(linear);
        // Adobe RGB uses a 2.2 power gamma rather than the sRGB piecewise curve.
        Trichromatic::new(
            clipped[0].max(0.0).powf(1.0 / 2.2),
            clipped[1].max(0.0).powf(1.0 / 2.2),
            clipped[2].max(0.0).powf(1.0 / 2.2),
        )
    }

    pub fn to_rec2020(&self) -> Trichromatic<marker::Rec2020> {
        let linear = mat3_mul(invert3(REC2020_TO_XYZ), [self.a, self.b, self.c]);
        let clipped = clip_in_gamut(linear);
        Trichromatic::new(
            linear_to_srgb(clipped[0]),
            linear_to_srgb(clipped[1]),
            linear_to_srgb(clipped[2]),
        )
    }

    pub fn to_lab(&self) -> Trichromatic<marker::CieLab> {
        fn f(t: f32) -> f32 {
            const DELTA: f32 = 6.0 / 29.0;
            if t > DELTA.powi(3) {
                t.cbrt()
            } else {
                t / (3.0 * DELTA * DELTA) + 4.0 / 29.0
            }
        }
        let fx = f(self.a / WHITE_D65[0]);
        let fy = f(self.b / WHITE_D65[1]);
        let fz = f(self.c / WHITE_D65[2]);
        let l = 116.0 * fy - 16.0;
        let a = 500.0 * (fx - fy);
        let bb = 200.0 * (fy - fz);
        Trichromatic::new(l, a, bb)
    }

    pub fn to_luv(&self) -> Trichromatic<marker::CieLuv> {
        let denom = self.a + 15.0 * self.b + 3.0 * self.c;
        let (u_prime, v_prime) = if denom.abs() < 1e-9 {
            (0.0, 0.0)
        } else {
            (4.0 * self.a / denom, 9.0 * self.b / denom)
        };
        let wdenom = WHITE_D65[0] + 15.0 * WHITE_D65[1] + 3.0 * WHITE_D65[2];
        let un_prime = 4.0 * WHITE_D65[0] / wdenom;
        let vn_prime = 9.0 * WHITE_D65[1] / wdenom;

        let yr = self.b / WHITE_D65[1];
        let l = if yr > (6.0f32 / 29.0).powi(3) {
            116.0 * yr.cbrt() - 16.0
        } else {
            (29.0f32 / 3.0).powi(3) * yr
        };
        let u = 13.0 * l * (u_prime - un_prime);
        let v = 13.0 * l * (v_prime - vn_prime);
        Trichromatic::new(l, u, v)
    }

    /// Oklab, via the published M1/M2 matrices (Björn Ottosson).
    pub fn to_oklab(&self) -> Trichromatic<marker::Oklab> {
        let [l, m, s] = mat3_mul(OKLAB_M1, [self.a, self.b, self.c]);
        let lms_prime = [l.cbrt(), m.cbrt(), s.cbrt()];
        let [lightness, a, b] = mat3_mul(OKLAB_M2, lms_prime);
        Trichromatic::new(lightness, a, b)
    }
}

/// Oklab's published M1 (XYZ->LMS) and M2 (LMS'->Lab) matrices, shared by
/// `Xyz::to_oklab` and this module's inverse so the two stay in lockstep.
const OKLAB_M1: [[f32; 3]; 3] = [
    [0.8189330101, 0.3618667424, -0.1288597137],
    [0.0329845436, 0.9293118715, 0.0361456387],
    [0.0482003018, 0.2643662691, 0.6338517070],
];
const OKLAB_M2: [[f32; 3]; 3] = [
    [0.2104542553, 0.7936177850, -0.0040720468],
    [1.9779984951, -2.4285922050, 0.4505937099],
    [0.0259040371, 0.7827717662, -0.8086757660],
];

impl Trichromatic<marker::Oklab> {
    /// Inverse of `Xyz::to_oklab`: undo `M2`, cube (inverse of the cube
    /// root `to_oklab` applies to go from LMS to LMS'), then undo `M1`.
    pub fn to_xyz(&self) -> Xyz {
        let lms_ = mat3_mul(invert3(OKLAB_M2), [self.a, self.b, self.c]);
        let lms = [lms_[0].powi(3), lms_[1].powi(3), lms_[2].powi(3)];
        let [x, y, z] = mat3_mul(invert3(OKLAB_M1), lms);
        Xyz::new(x, y, z)
    }
}

impl Trichromatic<marker::CieLab> {
    pub fn to_xyz(&self) -> Xyz {
        const DELTA: f32 = 6.0 / 29.0;
        fn finv(t: f32) -> f32 {
            if t > DELTA {
                t.powi(3)
            } else {
                3.0 * DELTA * DELTA * (t - 4.0 / 29.0)
            }
        }
        let fy = (self.a + 16.0) / 116.0;
        let fx = fy + self.b / 500.0;
        let fz = fy - self.c / 200.0;
        Xyz::new(finv(fx) * WHITE_D65[0], finv(fy) * WHITE_D65[1], finv(fz) * WHITE_D65[2])
    }

    /// Polar form: lightness, chroma, hue (degrees).
    pub fn to_lch(&self) -> Trichromatic<marker::CieLch> {
        let c = (self.b * self.b + self.c * self.c).sqrt();
        let h = self.c.atan2(self.b).to_degrees().rem_euclid(360.0);
        Trichromatic::new(self.a, c, h)
    }
}

impl Trichromatic<marker::CieLch> {
    pub fn to_lab(&self) -> Trichromatic<marker::CieLab> {
        let h = self.c.to_radians();
        Trichromatic::new(self.a, self.b * h.cos(), self.b * h.sin())
    }
}

/// Attenuates out-of-`[0,1]` linear RGB toward gray by binary-searching the
/// largest chroma scale that keeps all three channels in gamut, rather than
/// clamping each channel independently (which shifts hue toward whichever
/// channel clipped hardest).
fn clip_in_gamut(linear: [f32; 3]) -> [f32; 3] {
    if linear.iter().all(|&c| (0.0..=1.0).contains(&c)) {
        return linear;
    }
    let gray = (linear[0] + linear[1] + linear[2]) / 3.0;
    let gray = gray.clamp(0.0, 1.0);
    let mut lo = 0.0f32;
    let mut hi = 1.0f32;
    for _ in 0..24 {
        let mid = (lo + hi) / 2.0;
        let candidate = [
            gray + (linear[0] - gray) * mid,
            gray + (linear[1] - gray) * mid,
            gray + (linear[2] - gray) * mid,
        ];
        if candidate.iter().all(|&c| (-1e-4..=1.0 + 1e-4).contains(&c)) {
            lo = mid;
        } else {
            hi = mid;
        }
    }
    [
        (gray + (linear[0] - gray) * lo).clamp(0.0, 1.0),
        (gray + (linear[1] - gray) * lo).clamp(0.0, 1.0),
        (gray + (linear[2] - gray) * lo).clamp(0.0, 1.0),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn srgb_white_round_trips_through_xyz() {
        let white = Trichromatic::<marker::Srgb>::new(1.0, 1.0, 1.0);
        let xyz = white.to_xyz();
        let back = xyz.to_srgb();
        assert!((back.a - 1.0).abs() < 1e-3);
        assert!((back.b - 1.0).abs() < 1e-3);
        assert!((back.c - 1.0).abs() < 1e-3);
    }

    #[test]
    fn srgb_black_is_xyz_origin() {
        let black = Trichromatic::<marker::Srgb>::new(0.0, 0.0, 0.0);
        let xyz = black.to_xyz();
        assert!(xyz.a.abs() < 1e-6 && xyz.b.abs() < 1e-6 && xyz.c.abs() < 1e-6);
    }

    #[test]
    fn lab_round_trips_through_xyz() {
        let xyz = Trichromatic::<marker::Srgb>::new(0.2, 0.6, 0.9).to_xyz();
        let lab = xyz.to_lab();
        let back = lab.to_xyz();
        assert!((xyz.a - back.a).abs() < 1e-3);
        assert!((xyz.b - back.b).abs() < 1e-3);
        assert!((xyz.c - back.c).abs() < 1e-3);
    }

    #[test]
    fn lab_lch_round_trip_preserves_lab() {
        let lab = Trichromatic::<marker::CieLab>::new(50.0, 20.0, -30.0);
        let back = lab.to_lch().to_lab();
        assert!((lab.b - back.b).abs() < 1e-3);
        assert!((lab.c - back.c).abs() < 1e-3);
    }

    #[test]
    fn oklab_round_trips_through_xyz() {
        let xyz = Trichromatic::<marker::Srgb>::new(0.3, 0.6, 0.9).to_xyz();
        let back = xyz.to_oklab().to_xyz();
        assert!((xyz.a - back.a).abs() < 1e-3);
        assert!((xyz.b - back.b).abs() < 1e-3);
        assert!((xyz.c - back.c).abs() < 1e-3);
    }

    #[test]
    fn linear_srgb_round_trips_through_xyz() {
        let linear = Trichromatic::<marker::LinearSrgb>::new(0.25, 0.5, 0.75);
        let back = linear.to_xyz().to_linear_srgb();
        assert!((linear.a - back.a).abs() < 1e-3);
        assert!((linear.b - back.b).abs() < 1e-3);
        assert!((linear.c - back.c).abs() < 1e-3);
    }

    /// Spec invariant 5: `convertColorSpace<sRGBLinear>(convertColorSpace
    /// <OKLAB>(c)) == c` for `c` in the sRGB gamut, read as "routing a
    /// linear-sRGB color through Oklab and back loses nothing" — both
    /// directions go through the `Xyz` hub, so this chains
    /// `LinearSrgb -> Xyz -> Oklab -> Xyz -> LinearSrgb`.
    #[test]
    fn linear_srgb_oklab_round_trip_matches_invariant_five() {
        let c = Trichromatic::<marker::LinearSrgb>::new(0.2, 0.5, 0.8);
        let oklab = c.to_xyz().to_oklab();
        let back = oklab.to_xyz().to_linear_srgb();
        assert!((c.a - back.a).abs() < 1e-3);
        assert!((c.b - back.b).abs() < 1e-3);
        assert!((c.c - back.c).abs() < 1e-3);
    }

    #[test]
    fn out_of_gamut_clip_preserves_hue_direction() {
        // A value with one channel far out of range.
        let clipped = clip_in_gamut([1.5, 0.2, -0.3]);
        for c in clipped {
            assert!((-1e-3..=1.0 + 1e-3).contains(&c));
        }
    }
}
