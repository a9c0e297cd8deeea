// SPDX-License-Identifier: Parity-7.0.0 OR PolyForm-Noncommercial-1.0.0
/*! Color-space model: gamut and transfer curve, tracked independently of bit
depth.

The same bit depth can be encoded in multiple gamuts and curves, and GPU
texture sampling silently assumes linear data, so every texture boundary in
this crate states which [`ColorSpace`] the bytes represent. The closed set
covers gamma-encoded and linear variants of two gamuts plus one
extended-range HDR space; anything else classifies into the
[`Native`](ColorSpace::Native) escape hatch rather than failing, unless the
caller explicitly asks for strict matching.
*/

use crate::composite::CompositeImage;
use crate::error::Error;

/// Chromaticity set of a gamut.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Primaries {
    /// BT.709 / sRGB primaries.
    Bt709,
    /// DCI-P3 primaries with a D65 white point (Display P3).
    DciP3,
}

/// Transfer curve applied to channel values.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Transfer {
    /// The piecewise sRGB gamma encoding.
    Srgb,
    /// Identity; values are proportional to light.
    Linear,
    /// Identity with values permitted outside [0, 1].
    ExtendedLinear,
}

/// The generalized platform color-space handle: a gamut plus a curve.
///
/// Round-tripping a known [`ColorSpace`] through its profile and back yields
/// the same variant; profiles that match no known variant classify into the
/// escape hatch and never crash.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ColorProfile {
    pub primaries: Primaries,
    pub transfer: Transfer,
}

/// The closed set of supported color spaces, plus an escape hatch for an
/// arbitrary profile.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ColorSpace {
    /// Gamma-encoded sRGB.
    Srgb,
    /// Linear sRGB (BT.709 primaries, identity curve).
    LinearSrgb,
    /// Gamma-encoded Display P3.
    DisplayP3,
    /// Linear Display P3.
    LinearDisplayP3,
    /// Extended-range linear HDR (BT.709 primaries, values beyond [0, 1]).
    ExtendedLinear,
    /// An arbitrary profile outside the closed set.
    Native(ColorProfile),
}

impl ColorSpace {
    /// The non-escape-hatch variants.
    pub const KNOWN: [ColorSpace; 5] = [
        ColorSpace::Srgb,
        ColorSpace::LinearSrgb,
        ColorSpace::DisplayP3,
        ColorSpace::LinearDisplayP3,
        ColorSpace::ExtendedLinear,
    ];

    /// The profile handle for this color space.
    pub const fn profile(self) -> ColorProfile {
        match self {
            ColorSpace::Srgb => ColorProfile {
                primaries: Primaries::Bt709,
                transfer: Transfer::Srgb,
            },
            ColorSpace::LinearSrgb => ColorProfile {
                primaries: Primaries::Bt709,
                transfer: Transfer::Linear,
            },
            ColorSpace::DisplayP3 => ColorProfile {
                primaries: Primaries::DciP3,
                transfer: Transfer::Srgb,
            },
            ColorSpace::LinearDisplayP3 => ColorProfile {
                primaries: Primaries::DciP3,
                transfer: Transfer::Linear,
            },
            ColorSpace::ExtendedLinear => ColorProfile {
                primaries: Primaries::Bt709,
                transfer: Transfer::ExtendedLinear,
            },
            ColorSpace::Native(profile) => profile,
        }
    }

    /// Classifies a profile into the closed set, or the escape hatch when it
    /// matches no known variant. Never fails.
    ///
    /// ```
    /// use textures_and_frames::color_space::ColorSpace;
    ///
    /// let profile = ColorSpace::DisplayP3.profile();
    /// assert_eq!(ColorSpace::from_profile(profile), ColorSpace::DisplayP3);
    /// ```
    pub fn from_profile(profile: ColorProfile) -> ColorSpace {
        for known in ColorSpace::KNOWN {
            if known.profile() == profile {
                return known;
            }
        }
        ColorSpace::Native(profile)
    }

    /// Classifies a profile, failing on anything outside the closed set.
    ///
    /// Use this where silent reclassification would risk an invisible color
    /// shift; [`from_profile`](Self::from_profile) is the lenient default.
    pub fn from_profile_strict(profile: ColorProfile) -> Result<ColorSpace, Error> {
        match ColorSpace::from_profile(profile) {
            ColorSpace::Native(_) => Err(Error::UnsupportedColorSpace),
            known => Ok(known),
        }
    }

    /// The profile used at the texture/composite bridge.
    ///
    /// Texture sampling treats texel data as linear regardless of the
    /// texture's logical encoding, so the bridge always declares a linear
    /// curve over the space's own primaries.
    pub const fn linearized_profile(self) -> ColorProfile {
        let base = self.profile();
        ColorProfile {
            primaries: base.primaries,
            transfer: match base.transfer {
                Transfer::ExtendedLinear => Transfer::ExtendedLinear,
                _ => Transfer::Linear,
            },
        }
    }

    /// Reads the color space a compositing image is tagged with.
    pub fn of_composite(image: &CompositeImage) -> Result<ColorSpace, Error> {
        image.color_space().ok_or(Error::ColorSpaceNotFound)
    }

    /// Whether values in this space are proportional to light.
    pub const fn is_linear(self) -> bool {
        matches!(
            self.profile().transfer,
            Transfer::Linear | Transfer::ExtendedLinear
        )
    }
}

/// Converts one sRGB-encoded channel value to linear.
///
/// Handles extended-range inputs by mirroring the curve for negatives.
#[inline]
pub fn srgb_to_linear(encoded: f32) -> f32 {
    if encoded < 0.0 {
        return -srgb_to_linear(-encoded);
    }
    if encoded <= 0.04045 {
        encoded / 12.92
    } else {
        ((encoded + 0.055) / 1.055).powf(2.4)
    }
}

/// Converts one linear channel value to the sRGB encoding.
#[inline]
pub fn linear_to_srgb(linear: f32) -> f32 {
    if linear < 0.0 {
        return -linear_to_srgb(-linear);
    }
    if linear <= 0.0031308 {
        12.92 * linear
    } else {
        1.055 * linear.powf(1.0 / 2.4) - 0.055
    }
}

/// Linear BT.709 to linear Display P3, both D65.
pub const BT709_TO_P3: [[f32; 3]; 3] = [
    [0.822_462_1, 0.177_538_0, 0.0],
    [0.033_194_1, 0.966_805_8, 0.0],
    [0.017_082_7, 0.072_397_4, 0.910_519_9],
];

/// Linear Display P3 to linear BT.709, both D65.
pub const P3_TO_BT709: [[f32; 3]; 3] = [
    [1.224_940_1, -0.224_940_4, 0.0],
    [-0.042_056_9, 1.042_057_1, 0.0],
    [-0.019_637_6, -0.078_636_1, 1.098_273_5],
];

/// The gamut matrix between two primary sets, or `None` when they already
/// agree.
pub const fn gamut_matrix(from: Primaries, to: Primaries) -> Option<[[f32; 3]; 3]> {
    match (from, to) {
        (Primaries::Bt709, Primaries::DciP3) => Some(BT709_TO_P3),
        (Primaries::DciP3, Primaries::Bt709) => Some(P3_TO_BT709),
        _ => None,
    }
}

/// Applies a 3×3 gamut matrix to one RGB triple.
#[inline]
pub fn apply_matrix(m: &[[f32; 3]; 3], rgb: [f32; 3]) -> [f32; 3] {
    [
        m[0][0] * rgb[0] + m[0][1] * rgb[1] + m[0][2] * rgb[2],
        m[1][0] * rgb[0] + m[1][1] * rgb[1] + m[1][2] * rgb[2],
        m[2][0] * rgb[0] + m[2][1] * rgb[1] + m[2][2] * rgb[2],
    ]
}
