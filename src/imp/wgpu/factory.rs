// SPDX-License-Identifier: Parity-7.0.0 OR PolyForm-Noncommercial-1.0.0
/*! Texture allocation.

Every texture is freshly created per call and owned by the caller; nothing
is pooled. Allocation runs inside an out-of-memory error scope so exhaustion
surfaces as a typed failure instead of an uncaptured device error.
*/

use super::device::Device;
use crate::bit_depth::BitDepth;
use crate::error::Error;
use crate::geometry::{Extent2, Extent3, TextureUsage};

/// Allocates the texture one plane of a video frame binds as; the chroma
/// plane of a subsampled format arrives already halved.
pub async fn empty_frame_plane(
    device: &Device,
    format: crate::frame::FrameFormat,
    plane: usize,
    extent: Extent2,
) -> Result<Texture, Error> {
    Texture::empty_plane(device, extent, format.plane_texture_format(plane), "frame plane").await
}

/// What shape a texture is.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextureKind {
    D2,
    D2Multisampled,
    D3,
    D2Array,
}

/// A GPU texture plus the metadata queries conversions need.
///
/// The wrapped resource is device-owned; this type only creates and
/// references it, never manages device lifetime beyond the call that made
/// it.
#[derive(Debug, Clone)]
pub struct Texture {
    texture: wgpu::Texture,
}

impl Texture {
    /// Allocates an empty 2D texture.
    ///
    /// `swap_rb` selects the channel-swapped 8-bit variant; a swapped
    /// storage-writable texture needs the device's swapped-storage
    /// capability. `sample_count` above 1 allocates a multisampled render
    /// target, which cannot carry mipmaps or storage and is not copyable.
    pub async fn empty_2d(
        device: &Device,
        extent: Extent2,
        depth: BitDepth,
        usage: TextureUsage,
        swap_rb: bool,
        sample_count: u32,
        mipmaps: bool,
        debug_name: &str,
    ) -> Result<Texture, Error> {
        extent.validate(device.max_extent_2d())?;
        if !matches!(sample_count, 1 | 4) {
            return Err(Error::UnsupportedDevice("sample count"));
        }
        let format = depth.texture_format(swap_rb);
        if swap_rb
            && matches!(usage, TextureUsage::WriteAndRead)
            && !device.supports_bgra_storage()
        {
            return Err(Error::UnsupportedDevice("bgra8unorm-storage"));
        }
        let wgpu_usage = if sample_count > 1 {
            // multisampled targets resolve, they don't copy
            wgpu::TextureUsages::TEXTURE_BINDING | wgpu::TextureUsages::RENDER_ATTACHMENT
        } else {
            usage.wgpu_usage()
        };
        let mip_level_count = if mipmaps && sample_count == 1 {
            extent.width.max(extent.height).ilog2() + 1
        } else {
            1
        };
        let descriptor = wgpu::TextureDescriptor {
            label: Some(debug_name),
            size: wgpu::Extent3d {
                width: extent.width,
                height: extent.height,
                depth_or_array_layers: 1,
            },
            mip_level_count,
            sample_count,
            dimension: wgpu::TextureDimension::D2,
            format,
            usage: wgpu_usage,
            view_formats: &[],
        };
        Self::allocate(device, &descriptor).await
    }

    /// Allocates an empty 3D texture.
    ///
    /// Volumetric allocations get the smaller extent ceiling; a 3D texture
    /// cannot be a render attachment, so the render intent degrades to
    /// plain binding.
    pub async fn empty_3d(
        device: &Device,
        extent: Extent3,
        depth: BitDepth,
        usage: TextureUsage,
        debug_name: &str,
    ) -> Result<Texture, Error> {
        extent.validate(device.max_extent_3d())?;
        let format = depth.texture_format(false);
        let wgpu_usage = match usage {
            TextureUsage::RenderAndRead => {
                wgpu::TextureUsages::TEXTURE_BINDING
                    | wgpu::TextureUsages::COPY_SRC
                    | wgpu::TextureUsages::COPY_DST
            }
            TextureUsage::WriteAndRead => usage.wgpu_usage(),
        };
        let descriptor = wgpu::TextureDescriptor {
            label: Some(debug_name),
            size: wgpu::Extent3d {
                width: extent.width,
                height: extent.height,
                depth_or_array_layers: extent.depth,
            },
            mip_level_count: 1,
            sample_count: 1,
            dimension: wgpu::TextureDimension::D3,
            format,
            usage: wgpu_usage,
            view_formats: &[],
        };
        Self::allocate(device, &descriptor).await
    }

    /// Allocates an empty 2D array texture with `layers` slices.
    pub async fn empty_array(
        device: &Device,
        extent: Extent2,
        layers: u32,
        depth: BitDepth,
        usage: TextureUsage,
        debug_name: &str,
    ) -> Result<Texture, Error> {
        extent.validate(device.max_extent_2d())?;
        if layers == 0 {
            return Err(Error::ResolutionZero);
        }
        let descriptor = wgpu::TextureDescriptor {
            label: Some(debug_name),
            size: wgpu::Extent3d {
                width: extent.width,
                height: extent.height,
                depth_or_array_layers: layers,
            },
            mip_level_count: 1,
            sample_count: 1,
            dimension: wgpu::TextureDimension::D2,
            format: depth.texture_format(false),
            usage: usage.wgpu_usage(),
            view_formats: &[],
        };
        Self::allocate(device, &descriptor).await
    }

    /// Allocates a plane texture in an arbitrary narrow format.
    async fn empty_plane(
        device: &Device,
        extent: Extent2,
        format: wgpu::TextureFormat,
        debug_name: &str,
    ) -> Result<Texture, Error> {
        extent.validate(device.max_extent_2d())?;
        let descriptor = wgpu::TextureDescriptor {
            label: Some(debug_name),
            size: wgpu::Extent3d {
                width: extent.width,
                height: extent.height,
                depth_or_array_layers: 1,
            },
            mip_level_count: 1,
            sample_count: 1,
            dimension: wgpu::TextureDimension::D2,
            format,
            usage: wgpu::TextureUsages::TEXTURE_BINDING
                | wgpu::TextureUsages::COPY_SRC
                | wgpu::TextureUsages::COPY_DST,
            view_formats: &[],
        };
        Self::allocate(device, &descriptor).await
    }

    /// Allocates a 2D texture in a statically known pixel format.
    ///
    /// Typed textures are bindable and copyable; storage and render intents
    /// stay with the dynamically negotiated constructors.
    pub async fn empty_typed<F: crate::pixel_formats::sealed::PixelFormat>(
        device: &Device,
        extent: Extent2,
        debug_name: &str,
    ) -> Result<Texture, Error> {
        Texture::empty_plane(device, extent, <F as super::pixel_format::PixelFormat>::WGPU_FORMAT, debug_name)
            .await
    }

    /// Whether this texture's format is exactly `F`.
    pub fn format_matches_typed<F: crate::pixel_formats::sealed::PixelFormat>(&self) -> bool {
        self.texture.format() == <F as super::pixel_format::PixelFormat>::WGPU_FORMAT
    }

    /// Allocates a destination matching `src`'s descriptor.
    pub(crate) async fn matching(
        device: &Device,
        src: &Texture,
        debug_name: &str,
    ) -> Result<Texture, Error> {
        let descriptor = wgpu::TextureDescriptor {
            label: Some(debug_name),
            size: src.texture.size(),
            mip_level_count: src.texture.mip_level_count(),
            sample_count: src.texture.sample_count(),
            dimension: src.texture.dimension(),
            format: src.texture.format(),
            usage: src.texture.usage(),
            view_formats: &[],
        };
        Self::allocate(device, &descriptor).await
    }

    pub(crate) async fn allocate(
        device: &Device,
        descriptor: &wgpu::TextureDescriptor<'_>,
    ) -> Result<Texture, Error> {
        device
            .device()
            .push_error_scope(wgpu::ErrorFilter::OutOfMemory);
        let texture = device.device().create_texture(descriptor);
        device
            .finish_allocation_scope(Error::MakeTextureFailed)
            .await?;
        logwise::trace_sync!(
            "allocated texture {w}x{h}x{d}",
            w = descriptor.size.width,
            h = descriptor.size.height,
            d = descriptor.size.depth_or_array_layers
        );
        Ok(Texture { texture })
    }

    pub fn wgpu(&self) -> &wgpu::Texture {
        &self.texture
    }

    pub fn width(&self) -> u32 {
        self.texture.width()
    }

    pub fn height(&self) -> u32 {
        self.texture.height()
    }

    /// Depth for volume textures, layer count for arrays, 1 for plain 2D.
    pub fn depth_or_layers(&self) -> u32 {
        self.texture.depth_or_array_layers()
    }

    pub fn extent2(&self) -> Extent2 {
        Extent2::new(self.width(), self.height())
    }

    pub fn extent3(&self) -> Extent3 {
        Extent3::new(self.width(), self.height(), self.depth_or_layers())
    }

    pub fn format(&self) -> wgpu::TextureFormat {
        self.texture.format()
    }

    pub fn mip_level_count(&self) -> u32 {
        self.texture.mip_level_count()
    }

    pub fn sample_count(&self) -> u32 {
        self.texture.sample_count()
    }

    /// The bit depth this texture's format encodes, for 4-channel formats.
    pub fn bit_depth(&self) -> Result<BitDepth, Error> {
        BitDepth::from_texture_format(self.texture.format())
    }

    /// Whether the format stores channels in swapped (BGRA) order.
    pub fn swaps_channels(&self) -> bool {
        BitDepth::format_swaps_channels(self.texture.format())
    }

    pub fn kind(&self) -> TextureKind {
        match self.texture.dimension() {
            wgpu::TextureDimension::D3 => TextureKind::D3,
            wgpu::TextureDimension::D2 if self.texture.sample_count() > 1 => {
                TextureKind::D2Multisampled
            }
            wgpu::TextureDimension::D2 if self.texture.depth_or_array_layers() > 1 => {
                TextureKind::D2Array
            }
            _ => TextureKind::D2,
        }
    }
}
