// SPDX-License-Identifier: Parity-7.0.0 OR PolyForm-Noncommercial-1.0.0
/*! Texture-to-texture copies: full copies, slab extraction from volumes, and
stacking flat textures into arrays or volumes.

Every operation here encodes into one command buffer, commits once, and
suspends the caller on the submit-completion continuation.
*/

use super::device::Device;
use super::factory::Texture;
use crate::blit::TextureStack;
use crate::error::Error;
use crate::geometry::Axis;

fn copy_info(texture: &Texture, origin: wgpu::Origin3d) -> wgpu::TexelCopyTextureInfo<'_> {
    wgpu::TexelCopyTextureInfo {
        texture: texture.wgpu(),
        mip_level: 0,
        origin,
        aspect: wgpu::TextureAspect::All,
    }
}

async fn submit_and_wait(
    device: &Device,
    encoder: wgpu::CommandEncoder,
) -> Result<(), Error> {
    let command = encoder.finish();
    device
        .finish_allocation_scope(Error::MakeEncoderFailed)
        .await?;
    device.queue().submit(std::iter::once(command));
    device.wait_for_submit().await;
    Ok(())
}

fn begin_encoder(device: &Device, label: &str) -> wgpu::CommandEncoder {
    device
        .device()
        .push_error_scope(wgpu::ErrorFilter::Validation);
    device
        .device()
        .create_command_encoder(&wgpu::CommandEncoderDescriptor {
            label: Some(label),
        })
}

/// Copies `src` into a freshly allocated texture of matching descriptor.
pub async fn copy_texture(device: &Device, src: &Texture) -> Result<Texture, Error> {
    if src.sample_count() > 1 {
        return Err(Error::UnsupportedDevice("multisampled texture copy"));
    }
    let dst = Texture::matching(device, src, "copy destination").await?;
    copy_texture_into(device, src, &dst).await?;
    Ok(dst)
}

/// Copies `src` into a caller-supplied destination, enabling zero-allocation
/// updates.
pub async fn copy_texture_into(
    device: &Device,
    src: &Texture,
    dst: &Texture,
) -> Result<(), Error> {
    if src.extent3() != dst.extent3() {
        return Err(Error::DifferentResolutions);
    }
    if src.format() != dst.format() {
        return Err(Error::UnsupportedPixelFormat(
            "source and destination formats differ",
        ));
    }
    let extent = src.extent3();
    let mut encoder = begin_encoder(device, "texture copy");
    encoder.copy_texture_to_texture(
        copy_info(src, wgpu::Origin3d::ZERO),
        copy_info(dst, wgpu::Origin3d::ZERO),
        wgpu::Extent3d {
            width: extent.width,
            height: extent.height,
            depth_or_array_layers: extent.depth,
        },
    );
    submit_and_wait(device, encoder).await
}

/// Extracts a 1-voxel-thick axis-aligned slab from a volume texture into a
/// new 2D texture.
///
/// Slicing Z is a single blit; X and Y blit one column or row per depth
/// layer into the rotated destination. The destination extent follows
/// [`Extent3::slice_extent`](crate::geometry::Extent3::slice_extent).
pub async fn extract_slice(
    device: &Device,
    src: &Texture,
    axis: Axis,
    index: u32,
) -> Result<Texture, Error> {
    if src.kind() != super::factory::TextureKind::D3 {
        return Err(Error::BadResolution);
    }
    let extent = src.extent3();
    let bound = extent.along(axis);
    if index >= bound {
        return Err(Error::IndexOutOfBounds {
            index,
            extent: bound,
        });
    }
    let slice_extent = extent.slice_extent(axis);
    let descriptor = wgpu::TextureDescriptor {
        label: Some("volume slice"),
        size: wgpu::Extent3d {
            width: slice_extent.width,
            height: slice_extent.height,
            depth_or_array_layers: 1,
        },
        mip_level_count: 1,
        sample_count: 1,
        dimension: wgpu::TextureDimension::D2,
        format: src.format(),
        usage: wgpu::TextureUsages::TEXTURE_BINDING
            | wgpu::TextureUsages::COPY_SRC
            | wgpu::TextureUsages::COPY_DST,
        view_formats: &[],
    };
    let dst = Texture::allocate(device, &descriptor).await?;

    let mut encoder = begin_encoder(device, "volume slice");
    match axis {
        Axis::Z => {
            encoder.copy_texture_to_texture(
                copy_info(src, wgpu::Origin3d { x: 0, y: 0, z: index }),
                copy_info(&dst, wgpu::Origin3d::ZERO),
                wgpu::Extent3d {
                    width: extent.width,
                    height: extent.height,
                    depth_or_array_layers: 1,
                },
            );
        }
        Axis::X => {
            // one 1-wide column per depth layer, landing at x = z
            for z in 0..extent.depth {
                encoder.copy_texture_to_texture(
                    copy_info(src, wgpu::Origin3d { x: index, y: 0, z }),
                    copy_info(&dst, wgpu::Origin3d { x: z, y: 0, z: 0 }),
                    wgpu::Extent3d {
                        width: 1,
                        height: extent.height,
                        depth_or_array_layers: 1,
                    },
                );
            }
        }
        Axis::Y => {
            // one 1-tall row per depth layer, landing at y = z
            for z in 0..extent.depth {
                encoder.copy_texture_to_texture(
                    copy_info(src, wgpu::Origin3d { x: 0, y: index, z }),
                    copy_info(&dst, wgpu::Origin3d { x: 0, y: z, z: 0 }),
                    wgpu::Extent3d {
                        width: extent.width,
                        height: 1,
                        depth_or_array_layers: 1,
                    },
                );
            }
        }
    }
    submit_and_wait(device, encoder).await?;
    Ok(dst)
}

/// Stacks same-sized 2D textures into one array or volume texture, one
/// slice per input, in order.
pub async fn stack_textures(
    device: &Device,
    textures: &[&Texture],
    stack: TextureStack,
) -> Result<Texture, Error> {
    let first = *textures.first().ok_or(Error::Empty)?;
    let extent = first.extent2();
    let format = first.format();
    for texture in textures {
        if texture.extent2() != extent {
            return Err(Error::DifferentResolutions);
        }
        if texture.format() != format {
            return Err(Error::UnsupportedPixelFormat(
                "stacked textures must share one format",
            ));
        }
        if texture.sample_count() > 1 || texture.depth_or_layers() > 1 {
            return Err(Error::UnsupportedDevice("stack of plain 2D textures"));
        }
    }

    let slices = textures.len() as u32;
    let max_slices = match stack {
        TextureStack::Array => device.device().limits().max_texture_array_layers,
        TextureStack::Volume => device.max_extent_3d(),
    };
    if slices > max_slices {
        return Err(Error::ResolutionTooHigh { max: max_slices });
    }
    if matches!(stack, TextureStack::Volume)
        && (extent.width > device.max_extent_3d() || extent.height > device.max_extent_3d())
    {
        return Err(Error::ResolutionTooHigh {
            max: device.max_extent_3d(),
        });
    }
    let descriptor = wgpu::TextureDescriptor {
        label: Some("texture stack"),
        size: wgpu::Extent3d {
            width: extent.width,
            height: extent.height,
            depth_or_array_layers: slices,
        },
        mip_level_count: 1,
        sample_count: 1,
        dimension: match stack {
            TextureStack::Array => wgpu::TextureDimension::D2,
            TextureStack::Volume => wgpu::TextureDimension::D3,
        },
        format,
        usage: wgpu::TextureUsages::TEXTURE_BINDING
            | wgpu::TextureUsages::COPY_SRC
            | wgpu::TextureUsages::COPY_DST,
        view_formats: &[],
    };
    let dst = Texture::allocate(device, &descriptor).await?;

    let mut encoder = begin_encoder(device, "texture stack");
    for (i, texture) in textures.iter().enumerate() {
        encoder.copy_texture_to_texture(
            copy_info(texture, wgpu::Origin3d::ZERO),
            copy_info(
                &dst,
                wgpu::Origin3d {
                    x: 0,
                    y: 0,
                    z: i as u32,
                },
            ),
            wgpu::Extent3d {
                width: extent.width,
                height: extent.height,
                depth_or_array_layers: 1,
            },
        );
    }
    submit_and_wait(device, encoder).await?;
    Ok(dst)
}
