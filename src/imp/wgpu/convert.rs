// SPDX-License-Identifier: Parity-7.0.0 OR PolyForm-Noncommercial-1.0.0
/*! Cross-color-space conversion as a compute pass.

The kernel decodes the source transfer curve, applies the 3×3 gamut matrix,
re-encodes with the destination curve, and writes a freshly allocated
storage texture. The matrices are the same constants the CPU paths use; the
GPU and CPU routes agree to float precision.
*/

use super::device::Device;
use super::factory::Texture;
use crate::color_space::{self, ColorSpace, Transfer};
use crate::error::Error;
use crate::geometry::TextureUsage;
use crate::pixel_formats::pixel_as_bytes;
use crate::pixel_formats::sealed::ReprC;

const KERNEL: &str = r#"
struct Params {
    m0: vec4<f32>,
    m1: vec4<f32>,
    m2: vec4<f32>,
    modes: vec4<u32>,
}

@group(0) @binding(0) var src: texture_2d<f32>;
@group(0) @binding(1) var dst: texture_storage_2d<{{format}}, write>;
@group(0) @binding(2) var<uniform> params: Params;

fn srgb_to_linear(v: f32) -> f32 {
    let a = abs(v);
    if (a <= 0.04045) {
        return v / 12.92;
    }
    return sign(v) * pow((a + 0.055) / 1.055, 2.4);
}

fn linear_to_srgb(v: f32) -> f32 {
    let a = abs(v);
    if (a <= 0.0031308) {
        return 12.92 * v;
    }
    return sign(v) * (1.055 * pow(a, 1.0 / 2.4) - 0.055);
}

fn decode(v: f32, mode: u32) -> f32 {
    if (mode == 1u) {
        return srgb_to_linear(v);
    }
    return v;
}

fn encode(v: f32, mode: u32) -> f32 {
    if (mode == 1u) {
        return linear_to_srgb(v);
    }
    return v;
}

@compute @workgroup_size(8, 8, 1)
fn main(@builtin(global_invocation_id) gid: vec3<u32>) {
    let size = textureDimensions(src);
    if (gid.x >= size.x || gid.y >= size.y) {
        return;
    }
    let texel = textureLoad(src, vec2<i32>(gid.xy), 0);
    let lin = vec3<f32>(
        decode(texel.r, params.modes.x),
        decode(texel.g, params.modes.x),
        decode(texel.b, params.modes.x),
    );
    let converted = vec3<f32>(
        dot(lin, params.m0.xyz),
        dot(lin, params.m1.xyz),
        dot(lin, params.m2.xyz),
    );
    let out = vec4<f32>(
        encode(converted.x, params.modes.y),
        encode(converted.y, params.modes.y),
        encode(converted.z, params.modes.y),
        texel.a,
    );
    textureStore(dst, vec2<i32>(gid.xy), out);
}
"#;

#[repr(C)]
#[derive(Clone, Copy, Debug)]
struct Params {
    m0: [f32; 4],
    m1: [f32; 4],
    m2: [f32; 4],
    modes: [u32; 4],
}
unsafe impl ReprC for Params {}

const fn transfer_mode(transfer: Transfer) -> u32 {
    match transfer {
        Transfer::Srgb => 1,
        Transfer::Linear | Transfer::ExtendedLinear => 0,
    }
}

fn storage_format_name(format: wgpu::TextureFormat) -> Result<&'static str, Error> {
    match format {
        wgpu::TextureFormat::Rgba8Unorm => Ok("rgba8unorm"),
        wgpu::TextureFormat::Rgba16Float => Ok("rgba16float"),
        wgpu::TextureFormat::Rgba32Float => Ok("rgba32float"),
        _ => Err(Error::UnsupportedPixelFormat("no storage binding form")),
    }
}

/// Converts a 2D texture between color spaces on the GPU, writing a fresh
/// destination texture in the non-swapped format of the source's depth.
///
/// Identical profiles degenerate to a plain copy; identical primaries skip
/// the gamut matrix and only re-encode the transfer curve.
pub async fn convert_color_space(
    device: &Device,
    src: &Texture,
    from: ColorSpace,
    to: ColorSpace,
) -> Result<Texture, Error> {
    if src.sample_count() > 1 || src.depth_or_layers() > 1 {
        return Err(Error::UnsupportedDevice("conversion of plain 2D textures"));
    }
    let depth = src.bit_depth()?;
    let from_profile = from.profile();
    let to_profile = to.profile();
    if from_profile == to_profile {
        return copy_converted(device, src).await;
    }

    let matrix = color_space::gamut_matrix(from_profile.primaries, to_profile.primaries)
        .unwrap_or([[1.0, 0.0, 0.0], [0.0, 1.0, 0.0], [0.0, 0.0, 1.0]]);
    let dst_format = depth.texture_format(false);
    let extent = src.extent2();
    let dst = Texture::empty_2d(
        device,
        extent,
        depth,
        TextureUsage::WriteAndRead,
        false,
        1,
        false,
        "color space conversion",
    )
    .await?;

    logwise::info_sync!(
        "color conversion pass {w}x{h}",
        w = extent.width,
        h = extent.height
    );

    let shader_text = KERNEL.replace("{{format}}", storage_format_name(dst_format)?);
    let module = device
        .device()
        .create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("color space conversion"),
            source: wgpu::ShaderSource::Wgsl(shader_text.into()),
        });

    let params = Params {
        m0: [matrix[0][0], matrix[0][1], matrix[0][2], 0.0],
        m1: [matrix[1][0], matrix[1][1], matrix[1][2], 0.0],
        m2: [matrix[2][0], matrix[2][1], matrix[2][2], 0.0],
        modes: [
            transfer_mode(from_profile.transfer),
            transfer_mode(to_profile.transfer),
            0,
            0,
        ],
    };
    device
        .device()
        .push_error_scope(wgpu::ErrorFilter::OutOfMemory);
    let params_buffer = device.device().create_buffer(&wgpu::BufferDescriptor {
        label: Some("conversion params"),
        size: std::mem::size_of::<Params>() as u64,
        usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
        mapped_at_creation: false,
    });
    device
        .finish_allocation_scope(Error::MakeBufferFailed)
        .await?;
    device
        .queue()
        .write_buffer(&params_buffer, 0, pixel_as_bytes(std::slice::from_ref(&params)));

    let layout = device
        .device()
        .create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("color space conversion"),
            entries: &[
                wgpu::BindGroupLayoutEntry {
                    binding: 0,
                    visibility: wgpu::ShaderStages::COMPUTE,
                    ty: wgpu::BindingType::Texture {
                        sample_type: wgpu::TextureSampleType::Float { filterable: false },
                        view_dimension: wgpu::TextureViewDimension::D2,
                        multisampled: false,
                    },
                    count: None,
                },
                wgpu::BindGroupLayoutEntry {
                    binding: 1,
                    visibility: wgpu::ShaderStages::COMPUTE,
                    ty: wgpu::BindingType::StorageTexture {
                        access: wgpu::StorageTextureAccess::WriteOnly,
                        format: dst_format,
                        view_dimension: wgpu::TextureViewDimension::D2,
                    },
                    count: None,
                },
                wgpu::BindGroupLayoutEntry {
                    binding: 2,
                    visibility: wgpu::ShaderStages::COMPUTE,
                    ty: wgpu::BindingType::Buffer {
                        ty: wgpu::BufferBindingType::Uniform,
                        has_dynamic_offset: false,
                        min_binding_size: None,
                    },
                    count: None,
                },
            ],
        });
    let pipeline_layout = device
        .device()
        .create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("color space conversion"),
            bind_group_layouts: &[&layout],
            push_constant_ranges: &[],
        });
    let pipeline = device
        .device()
        .create_compute_pipeline(&wgpu::ComputePipelineDescriptor {
            label: Some("color space conversion"),
            layout: Some(&pipeline_layout),
            module: &module,
            entry_point: Some("main"),
            compilation_options: Default::default(),
            cache: None,
        });

    let src_view = src.wgpu().create_view(&wgpu::TextureViewDescriptor::default());
    let dst_view = dst.wgpu().create_view(&wgpu::TextureViewDescriptor::default());
    let bind_group = device.device().create_bind_group(&wgpu::BindGroupDescriptor {
        label: Some("color space conversion"),
        layout: &layout,
        entries: &[
            wgpu::BindGroupEntry {
                binding: 0,
                resource: wgpu::BindingResource::TextureView(&src_view),
            },
            wgpu::BindGroupEntry {
                binding: 1,
                resource: wgpu::BindingResource::TextureView(&dst_view),
            },
            wgpu::BindGroupEntry {
                binding: 2,
                resource: params_buffer.as_entire_binding(),
            },
        ],
    });

    device
        .device()
        .push_error_scope(wgpu::ErrorFilter::Validation);
    let mut encoder = device
        .device()
        .create_command_encoder(&wgpu::CommandEncoderDescriptor {
            label: Some("color space conversion"),
        });
    {
        let mut pass = encoder.begin_compute_pass(&wgpu::ComputePassDescriptor {
            label: Some("color space conversion"),
            timestamp_writes: None,
        });
        pass.set_pipeline(&pipeline);
        pass.set_bind_group(0, &bind_group, &[]);
        pass.dispatch_workgroups(extent.width.div_ceil(8), extent.height.div_ceil(8), 1);
    }
    let command = encoder.finish();
    device
        .finish_allocation_scope(Error::MakeEncoderFailed)
        .await?;
    device.queue().submit(std::iter::once(command));
    device.wait_for_submit().await;
    Ok(dst)
}

async fn copy_converted(device: &Device, src: &Texture) -> Result<Texture, Error> {
    super::blit::copy_texture(device, src).await
}
