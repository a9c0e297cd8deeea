// SPDX-License-Identifier: Parity-7.0.0 OR PolyForm-Noncommercial-1.0.0
/*! GPU copy and convert utilities.

Every operation here encodes its commands into a single command buffer,
commits once, and suspends the caller until the device signals completion.
Nothing is pooled and nothing is cancelled; a committed command buffer is
always awaited.
*/

use crate::color_space::ColorSpace;
use crate::device::Device;
use crate::error::Error;
use crate::geometry::Axis;
use crate::imp;
use crate::texture::Texture;

/// How stacked slices should be addressed afterwards.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextureStack {
    /// A 2D array texture, one layer per input.
    Array,
    /// A volume texture, one depth slice per input.
    Volume,
}

/// Copies a texture into a freshly allocated destination of matching
/// descriptor.
pub async fn copy_texture(device: &Device, src: &Texture) -> Result<Texture, Error> {
    imp::copy_texture(&device.0, &src.0).await.map(Texture)
}

/// Copies a texture into a caller-supplied destination, enabling
/// zero-allocation updates.
///
/// The destination must match the source's extent and format exactly.
pub async fn copy_texture_into(
    device: &Device,
    src: &Texture,
    dst: &Texture,
) -> Result<(), Error> {
    imp::copy_texture_into(&device.0, &src.0, &dst.0).await
}

/// Converts a texture between color spaces with a GPU compute pass,
/// writing a freshly allocated destination.
///
/// Identical profiles degenerate to a plain copy. The destination uses the
/// non-swapped format of the source's bit depth.
pub async fn convert_color_space(
    device: &Device,
    src: &Texture,
    from: ColorSpace,
    to: ColorSpace,
) -> Result<Texture, Error> {
    imp::convert_color_space(&device.0, &src.0, from, to)
        .await
        .map(Texture)
}

/// Extracts a 1-voxel-thick slab from a volume texture as a new 2D texture.
///
/// The index must lie within the chosen axis's extent; the result's
/// resolution matches the two non-sampled axes.
pub async fn extract_slice(
    device: &Device,
    src: &Texture,
    axis: Axis,
    index: u32,
) -> Result<Texture, Error> {
    imp::extract_slice(&device.0, &src.0, axis, index)
        .await
        .map(Texture)
}

/// Stacks same-sized 2D textures into one array or volume texture.
///
/// The inputs must share one extent and format; each lands in the slice
/// matching its position, within one command buffer.
pub async fn stack_textures(
    device: &Device,
    textures: &[Texture],
    stack: TextureStack,
) -> Result<Texture, Error> {
    let refs: Vec<&imp::Texture> = textures.iter().map(|t| &t.0).collect();
    imp::stack_textures(&device.0, &refs, stack).await.map(Texture)
}
