// SPDX-License-Identifier: Parity-7.0.0 OR PolyForm-Noncommercial-1.0.0
/*! Direct memory traffic between CPU bytes and textures.

Writes go through the queue's texture write path at the tight row stride.
Reads blit into an intermediate buffer at the copy alignment the device
demands, then map and repack to tight rows; there is no CPU-mappable texture
storage, so every readback takes the blit tier.
*/

use super::device::Device;
use super::factory::Texture;
use crate::error::Error;

impl Texture {
    fn bytes_per_pixel(&self) -> Result<usize, Error> {
        self.format()
            .block_copy_size(None)
            .map(|b| b as usize)
            .ok_or(Error::UnsupportedPixelFormat("format has no copy size"))
    }

    /// Writes tightly packed pixel bytes covering the whole texture.
    ///
    /// For a volume or array texture the data covers every slice in order.
    pub async fn write_bytes(&self, device: &Device, tight: &[u8]) -> Result<(), Error> {
        if self.sample_count() > 1 {
            return Err(Error::UnsupportedDevice("multisampled texture write"));
        }
        let bpp = self.bytes_per_pixel()?;
        let extent = self.extent3();
        let expected = extent.pixel_count() * bpp;
        if tight.len() != expected {
            return Err(Error::BufferSizeMismatch {
                expected,
                actual: tight.len(),
            });
        }

        let bytes_per_row = extent.width as usize * bpp;
        device.queue().write_texture(
            wgpu::TexelCopyTextureInfo {
                texture: self.wgpu(),
                mip_level: 0,
                origin: wgpu::Origin3d::ZERO,
                aspect: wgpu::TextureAspect::All,
            },
            tight,
            wgpu::TexelCopyBufferLayout {
                offset: 0,
                bytes_per_row: Some(bytes_per_row as u32),
                rows_per_image: Some(extent.height),
            },
            wgpu::Extent3d {
                width: extent.width,
                height: extent.height,
                depth_or_array_layers: extent.depth,
            },
        );
        // write_texture stages internally; completion still flows through
        // the submit callback
        device.wait_for_submit().await;
        Ok(())
    }

    /// Reads the whole texture back as tightly packed pixel bytes.
    ///
    /// Builds a disposable encoder chain: blit into an aligned intermediate
    /// buffer, submit once, suspend until the device signals completion,
    /// then map and strip the alignment padding.
    pub async fn read_bytes(&self, device: &Device) -> Result<Vec<u8>, Error> {
        if self.sample_count() > 1 {
            return Err(Error::UnsupportedDevice("multisampled texture read"));
        }
        let bpp = self.bytes_per_pixel()?;
        let extent = self.extent3();
        let tight_row = extent.width as usize * bpp;
        let aligned_row = tight_row
            .div_ceil(wgpu::COPY_BYTES_PER_ROW_ALIGNMENT as usize)
            * wgpu::COPY_BYTES_PER_ROW_ALIGNMENT as usize;
        let buffer_len = aligned_row * extent.height as usize * extent.depth as usize;

        device
            .device()
            .push_error_scope(wgpu::ErrorFilter::OutOfMemory);
        let buffer = device.device().create_buffer(&wgpu::BufferDescriptor {
            label: Some("texture readback"),
            size: buffer_len as u64,
            usage: wgpu::BufferUsages::MAP_READ | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });
        device
            .finish_allocation_scope(Error::MakeBufferFailed)
            .await?;

        device
            .device()
            .push_error_scope(wgpu::ErrorFilter::Validation);
        let mut encoder = device
            .device()
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: wgpu::Label::from("texture readback"),
            });
        encoder.copy_texture_to_buffer(
            wgpu::TexelCopyTextureInfo {
                texture: self.wgpu(),
                mip_level: 0,
                origin: wgpu::Origin3d::ZERO,
                aspect: wgpu::TextureAspect::All,
            },
            wgpu::TexelCopyBufferInfo {
                buffer: &buffer,
                layout: wgpu::TexelCopyBufferLayout {
                    offset: 0,
                    bytes_per_row: Some(aligned_row as u32),
                    rows_per_image: Some(extent.height),
                },
            },
            wgpu::Extent3d {
                width: extent.width,
                height: extent.height,
                depth_or_array_layers: extent.depth,
            },
        );
        let command = encoder.finish();
        device
            .finish_allocation_scope(Error::MakeEncoderFailed)
            .await?;
        device.queue().submit(std::iter::once(command));
        device.wait_for_submit().await;

        let (s, r) = r#continue::continuation();
        buffer.slice(..).map_async(wgpu::MapMode::Read, move |result| {
            s.send(result);
        });
        device.set_needs_poll();
        r.await.map_err(|e| Error::MakeBufferFailed(e.to_string()))?;

        let mut out = Vec::with_capacity(tight_row * extent.height as usize * extent.depth as usize);
        {
            let mapped = buffer.slice(..).get_mapped_range();
            for image in 0..extent.depth as usize {
                let image_start = image * aligned_row * extent.height as usize;
                for y in 0..extent.height as usize {
                    let start = image_start + y * aligned_row;
                    out.extend_from_slice(&mapped[start..start + tight_row]);
                }
            }
        }
        buffer.unmap();
        Ok(out)
    }
}
