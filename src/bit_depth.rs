// SPDX-License-Identifier: Parity-7.0.0 OR PolyForm-Noncommercial-1.0.0
/*! The closed set of per-channel bit widths and its mappings.

Every pixel this crate moves is 4-channel RGBA; [`BitDepth`] decides how wide
one channel is. The mapping from a depth to a GPU pixel format, a compositing
format tag, and a video frame code is total over the supported set, and the
inverse mappings either resolve to exactly one depth or fail. The
channel-swapped 8-bit transport variant (BGRA ordering) is the same depth as
standard 8-bit; the swap is an orthogonal transport detail, not a distinct
depth.
*/

use crate::error::Error;
use crate::frame::FrameFormat;

/// Bits used per color channel.
///
/// ```
/// use textures_and_frames::BitDepth;
///
/// let depth = BitDepth::from_bits_per_component(16).unwrap();
/// assert_eq!(depth, BitDepth::Sixteen);
/// assert_eq!(depth.bytes_per_pixel(), 8);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BitDepth {
    /// 8-bit normalized unsigned channels.
    Eight,
    /// 16-bit half-precision float channels.
    Sixteen,
    /// 32-bit single-precision float channels.
    ThirtyTwo,
}

/// Sample tag of a compositing-image stage.
///
/// A [`CompositeImage`](crate::composite::CompositeImage) holds working
/// samples as `f32`; this tag records which concrete depth the stage was
/// produced from, or should be rasterized back into.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CompositeFormat {
    Rgba8,
    Rgba16Float,
    Rgba32Float,
}

impl BitDepth {
    /// All supported depths, in ascending width order.
    pub const ALL: [BitDepth; 3] = [BitDepth::Eight, BitDepth::Sixteen, BitDepth::ThirtyTwo];

    /// Bytes one RGBA pixel occupies at this depth.
    pub const fn bytes_per_pixel(self) -> usize {
        match self {
            BitDepth::Eight => 4,
            BitDepth::Sixteen => 8,
            BitDepth::ThirtyTwo => 16,
        }
    }

    /// Bits per component, as a decoded image would report it.
    pub const fn bits_per_component(self) -> u8 {
        match self {
            BitDepth::Eight => 8,
            BitDepth::Sixteen => 16,
            BitDepth::ThirtyTwo => 32,
        }
    }

    /// Infers the depth from a decoded image's per-component bit count.
    pub const fn from_bits_per_component(bits: u8) -> Result<Self, Error> {
        match bits {
            8 => Ok(BitDepth::Eight),
            16 => Ok(BitDepth::Sixteen),
            32 => Ok(BitDepth::ThirtyTwo),
            other => Err(Error::UnsupportedBitsPerComponent(other)),
        }
    }

    /// The compositing tag for this depth.
    pub const fn composite_format(self) -> CompositeFormat {
        match self {
            BitDepth::Eight => CompositeFormat::Rgba8,
            BitDepth::Sixteen => CompositeFormat::Rgba16Float,
            BitDepth::ThirtyTwo => CompositeFormat::Rgba32Float,
        }
    }

    /// The depth a compositing tag was produced from.
    pub const fn from_composite_format(format: CompositeFormat) -> Self {
        match format {
            CompositeFormat::Rgba8 => BitDepth::Eight,
            CompositeFormat::Rgba16Float => BitDepth::Sixteen,
            CompositeFormat::Rgba32Float => BitDepth::ThirtyTwo,
        }
    }

    /// The packed 4-channel video frame code for this depth.
    ///
    /// 8-bit video interchange is BGRA-ordered; the wider depths are RGBA.
    pub const fn frame_code(self) -> FrameFormat {
        match self {
            BitDepth::Eight => FrameFormat::Bgra8,
            BitDepth::Sixteen => FrameFormat::Rgba16Half,
            BitDepth::ThirtyTwo => FrameFormat::Rgba32Float,
        }
    }
}
