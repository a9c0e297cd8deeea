// SPDX-License-Identifier: Parity-7.0.0 OR PolyForm-Noncommercial-1.0.0
/*! The texture factory and the public texture handle.

Allocation validates resolution bounds before touching the device: zero
dimensions and dimensions beyond the device ceiling fail up front, with the
ceiling in the error for diagnostics. The caller owns the returned texture;
release follows the backend's ordinary resource discipline when the handle
drops.
*/

use crate::bit_depth::BitDepth;
use crate::device::Device;
use crate::error::Error;
use crate::geometry::{Extent2, Extent3, TextureUsage};
use crate::imp;

pub use crate::imp::TextureKind;

/// A GPU texture created by this crate.
#[derive(Debug, Clone)]
pub struct Texture(pub(crate) imp::Texture);

impl Texture {
    /// Allocates an empty 2D texture.
    ///
    /// `swap_rb` selects the channel-swapped 8-bit transport variant and is
    /// ignored at wider depths. A `sample_count` above 1 allocates a
    /// multisampled render target.
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
        imp::Texture::empty_2d(
            &device.0,
            extent,
            depth,
            usage,
            swap_rb,
            sample_count,
            mipmaps,
            debug_name,
        )
        .await
        .map(Texture)
    }

    /// Allocates an empty volumetric texture.
    pub async fn empty_3d(
        device: &Device,
        extent: Extent3,
        depth: BitDepth,
        usage: TextureUsage,
        debug_name: &str,
    ) -> Result<Texture, Error> {
        imp::Texture::empty_3d(&device.0, extent, depth, usage, debug_name)
            .await
            .map(Texture)
    }

    /// Allocates an empty 2D array texture.
    pub async fn empty_array(
        device: &Device,
        extent: Extent2,
        layers: u32,
        depth: BitDepth,
        usage: TextureUsage,
        debug_name: &str,
    ) -> Result<Texture, Error> {
        imp::Texture::empty_array(&device.0, extent, layers, depth, usage, debug_name)
            .await
            .map(Texture)
    }

    pub fn width(&self) -> u32 {
        self.0.width()
    }

    pub fn height(&self) -> u32 {
        self.0.height()
    }

    /// Depth for volume textures, layer count for arrays, 1 otherwise.
    pub fn depth_or_layers(&self) -> u32 {
        self.0.depth_or_layers()
    }

    pub fn extent2(&self) -> Extent2 {
        self.0.extent2()
    }

    pub fn extent3(&self) -> Extent3 {
        self.0.extent3()
    }

    pub fn kind(&self) -> TextureKind {
        self.0.kind()
    }

    pub fn mip_level_count(&self) -> u32 {
        self.0.mip_level_count()
    }

    pub fn sample_count(&self) -> u32 {
        self.0.sample_count()
    }

    /// The bit depth this texture's pixel format encodes.
    ///
    /// Fails for plane formats that are not 4-channel RGBA.
    pub fn bit_depth(&self) -> Result<BitDepth, Error> {
        self.0.bit_depth()
    }

    /// Whether the format stores channels in swapped (BGRA) order.
    pub fn swaps_channels(&self) -> bool {
        self.0.swaps_channels()
    }
}
