// SPDX-License-Identifier: Parity-7.0.0 OR PolyForm-Noncommercial-1.0.0
use crate::bit_depth::BitDepth;
use crate::error::Error;
use crate::frame::FrameFormat;
use crate::geometry::TextureUsage;
use crate::pixel_formats::{
    BGRA8Unorm, R8Unorm, RG8Unorm, RG16Float, RGBA8Unorm, RGBA16Float, RGBA32Float,
};

pub trait PixelFormat {
    const WGPU_FORMAT: wgpu::TextureFormat;
}

impl PixelFormat for RGBA8Unorm {
    const WGPU_FORMAT: wgpu::TextureFormat = wgpu::TextureFormat::Rgba8Unorm;
}
impl PixelFormat for BGRA8Unorm {
    const WGPU_FORMAT: wgpu::TextureFormat = wgpu::TextureFormat::Bgra8Unorm;
}
impl PixelFormat for RGBA16Float {
    const WGPU_FORMAT: wgpu::TextureFormat = wgpu::TextureFormat::Rgba16Float;
}
impl PixelFormat for RGBA32Float {
    const WGPU_FORMAT: wgpu::TextureFormat = wgpu::TextureFormat::Rgba32Float;
}
impl PixelFormat for R8Unorm {
    const WGPU_FORMAT: wgpu::TextureFormat = wgpu::TextureFormat::R8Unorm;
}
impl PixelFormat for RG8Unorm {
    const WGPU_FORMAT: wgpu::TextureFormat = wgpu::TextureFormat::Rg8Unorm;
}
impl PixelFormat for RG16Float {
    const WGPU_FORMAT: wgpu::TextureFormat = wgpu::TextureFormat::Rg16Float;
}

impl BitDepth {
    /// The GPU pixel format for this depth.
    ///
    /// `swap_rb` selects the channel-swapped transport variant; it is
    /// meaningful only at 8 bits and ignored at the wider depths.
    pub const fn texture_format(self, swap_rb: bool) -> wgpu::TextureFormat {
        match (self, swap_rb) {
            (BitDepth::Eight, false) => wgpu::TextureFormat::Rgba8Unorm,
            (BitDepth::Eight, true) => wgpu::TextureFormat::Bgra8Unorm,
            (BitDepth::Sixteen, _) => wgpu::TextureFormat::Rgba16Float,
            (BitDepth::ThirtyTwo, _) => wgpu::TextureFormat::Rgba32Float,
        }
    }

    /// The depth a GPU pixel format encodes.
    ///
    /// Swapped and sRGB-view 8-bit variants all resolve to
    /// [`BitDepth::Eight`]; the swap and the view encoding are transport
    /// details, not distinct depths. Anything outside the supported set
    /// fails.
    pub const fn from_texture_format(format: wgpu::TextureFormat) -> Result<Self, Error> {
        match format {
            wgpu::TextureFormat::Rgba8Unorm
            | wgpu::TextureFormat::Rgba8UnormSrgb
            | wgpu::TextureFormat::Bgra8Unorm
            | wgpu::TextureFormat::Bgra8UnormSrgb => Ok(BitDepth::Eight),
            wgpu::TextureFormat::Rgba16Float => Ok(BitDepth::Sixteen),
            wgpu::TextureFormat::Rgba32Float => Ok(BitDepth::ThirtyTwo),
            _ => Err(Error::UnsupportedPixelFormat("not a supported RGBA format")),
        }
    }

    /// Whether a format stores its channels in swapped (BGRA) order.
    pub const fn format_swaps_channels(format: wgpu::TextureFormat) -> bool {
        matches!(
            format,
            wgpu::TextureFormat::Bgra8Unorm | wgpu::TextureFormat::Bgra8UnormSrgb
        )
    }
}

impl TextureUsage {
    /// Converts this usage intent to the corresponding wgpu usage flags.
    ///
    /// Both intents stay copyable in and out so conversions never dead-end
    /// on a texture they cannot read back.
    pub const fn wgpu_usage(&self) -> wgpu::TextureUsages {
        let base = wgpu::TextureUsages::TEXTURE_BINDING
            .union(wgpu::TextureUsages::COPY_SRC)
            .union(wgpu::TextureUsages::COPY_DST);
        match self {
            TextureUsage::RenderAndRead => base.union(wgpu::TextureUsages::RENDER_ATTACHMENT),
            TextureUsage::WriteAndRead => base.union(wgpu::TextureUsages::STORAGE_BINDING),
        }
    }
}

impl FrameFormat {
    /// The GPU pixel format one plane of this frame format binds as.
    pub const fn plane_texture_format(self, plane: usize) -> wgpu::TextureFormat {
        match (self, plane) {
            (FrameFormat::Gray8, 0) => wgpu::TextureFormat::R8Unorm,
            (FrameFormat::TwoComponentHalf, 0) => wgpu::TextureFormat::Rg16Float,
            (FrameFormat::Nv12, 0) => wgpu::TextureFormat::R8Unorm,
            (FrameFormat::Nv12, 1) => wgpu::TextureFormat::Rg8Unorm,
            (FrameFormat::Bgra8, 0) => wgpu::TextureFormat::Bgra8Unorm,
            (FrameFormat::Rgba16Half, 0) => wgpu::TextureFormat::Rgba16Float,
            (FrameFormat::Rgba32Float, 0) => wgpu::TextureFormat::Rgba32Float,
            _ => panic!("no such plane"),
        }
    }
}

/// Classifies a texture's format as the video frame format its content
/// would travel in.
///
/// A lone chroma plane has no frame of its own; it only exists inside a
/// biplanar format.
pub fn classify_frame_format(texture: &super::factory::Texture) -> Result<FrameFormat, Error> {
    match texture.format() {
        wgpu::TextureFormat::R8Unorm => Ok(FrameFormat::Gray8),
        wgpu::TextureFormat::Rg16Float => Ok(FrameFormat::TwoComponentHalf),
        wgpu::TextureFormat::Rgba8Unorm
        | wgpu::TextureFormat::Rgba8UnormSrgb
        | wgpu::TextureFormat::Bgra8Unorm
        | wgpu::TextureFormat::Bgra8UnormSrgb => Ok(FrameFormat::Bgra8),
        wgpu::TextureFormat::Rgba16Float => Ok(FrameFormat::Rgba16Half),
        wgpu::TextureFormat::Rgba32Float => Ok(FrameFormat::Rgba32Float),
        _ => Err(Error::UnsupportedPixelFormat("no video frame form")),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn texture_format_bijection() {
        for depth in BitDepth::ALL {
            for swap in [false, true] {
                assert_eq!(
                    BitDepth::from_texture_format(depth.texture_format(swap)).unwrap(),
                    depth
                );
            }
        }
    }

    #[test]
    fn swap_is_not_a_distinct_depth() {
        assert_eq!(
            BitDepth::from_texture_format(wgpu::TextureFormat::Bgra8Unorm).unwrap(),
            BitDepth::Eight
        );
        assert_eq!(
            BitDepth::from_texture_format(wgpu::TextureFormat::Bgra8UnormSrgb).unwrap(),
            BitDepth::Eight
        );
    }

    #[test]
    fn unrecognized_format_fails() {
        assert!(matches!(
            BitDepth::from_texture_format(wgpu::TextureFormat::R32Sint),
            Err(Error::UnsupportedPixelFormat(_))
        ));
    }

    #[test]
    fn usage_flags_always_copyable() {
        for usage in [TextureUsage::RenderAndRead, TextureUsage::WriteAndRead] {
            let flags = usage.wgpu_usage();
            assert!(flags.contains(wgpu::TextureUsages::COPY_SRC));
            assert!(flags.contains(wgpu::TextureUsages::COPY_DST));
        }
    }
}
