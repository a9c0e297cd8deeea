// SPDX-License-Identifier: Parity-7.0.0 OR PolyForm-Noncommercial-1.0.0
//! Central error type for every conversion path.

use crate::bit_depth::BitDepth;

/// Everything that can go wrong while converting between representations.
///
/// Failures surface synchronously to the immediate caller and carry enough
/// context to build a diagnostic (the offending format, the maximum allowed
/// extent, the mismatched lengths). Nothing is silently swallowed; the one
/// designed default is lenient color-space classification into
/// [`ColorSpace::Native`](crate::ColorSpace::Native), which is not an error
/// path at all.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The image data could not be located or decoded into pixels.
    #[error("image not found or undecodable")]
    ImageNotFound,

    /// The source carried no color space to infer from.
    #[error("no color space attached to the source image")]
    ColorSpaceNotFound,

    /// A GPU pixel format outside the supported closed set.
    #[error("unsupported pixel format {0}")]
    UnsupportedPixelFormat(&'static str),

    /// A decoded image whose per-component bit count is not 8, 16, or 32.
    #[error("unsupported bits per component: {0}")]
    UnsupportedBitsPerComponent(u8),

    /// A requested bit depth this routine cannot express.
    #[error("bit depth {0:?} is not supported by this operation")]
    UnsupportedBits(BitDepth),

    /// Strict color-space matching was requested and the profile matched no
    /// known variant.
    #[error("color space profile matches no supported variant")]
    UnsupportedColorSpace,

    /// A dimension was zero.
    #[error("resolution has a zero dimension")]
    ResolutionZero,

    /// A dimension exceeded the allowed maximum.
    #[error("resolution exceeds the maximum of {max} per dimension")]
    ResolutionTooHigh { max: u32 },

    /// A malformed resolution, such as an odd extent for a chroma-subsampled
    /// format.
    #[error("bad resolution for the requested format")]
    BadResolution,

    /// An input with no pixels at all.
    #[error("input size is zero")]
    SizeIsZero,

    /// The device failed to allocate a texture.
    #[error("texture allocation failed: {0}")]
    MakeTextureFailed(String),

    /// The device failed to allocate a buffer.
    #[error("buffer allocation failed: {0}")]
    MakeBufferFailed(String),

    /// Command encoding could not be completed.
    #[error("command encoding failed: {0}")]
    MakeEncoderFailed(String),

    /// No GPU adapter is available on this host.
    #[error("no GPU adapter available")]
    NoAdapter,

    /// The adapter refused to produce a device.
    #[error("device request failed: {0}")]
    RequestDeviceFailed(String),

    /// The device lacks a capability this operation needs.
    #[error("device capability missing: {0}")]
    UnsupportedDevice(&'static str),

    /// A caller-supplied raw buffer whose length does not match the declared
    /// resolution times channel count.
    #[error("buffer length {actual} does not match expected {expected}")]
    BufferSizeMismatch { expected: usize, actual: usize },

    /// A texture set whose members do not share one resolution.
    #[error("textures have differing resolutions")]
    DifferentResolutions,

    /// An empty texture set where at least one element is required.
    #[error("empty input set")]
    Empty,

    /// A slice index outside the chosen axis.
    #[error("index {index} is out of bounds for extent {extent}")]
    IndexOutOfBounds { index: u32, extent: u32 },

    /// PNG decode failure from the codec layer.
    #[error("decode failed: {0}")]
    Decode(#[from] png::DecodingError),

    /// PNG encode failure from the codec layer.
    #[error("encode failed: {0}")]
    Encode(#[from] png::EncodingError),

    /// File I/O failure while reading an image from disk.
    #[error("i/o failed: {0}")]
    Io(String),
}
