// SPDX-License-Identifier: Parity-7.0.0 OR PolyForm-Noncommercial-1.0.0
//! wgpu backend: the shared device, the texture factory, and every GPU copy,
//! upload, readback, and conversion pass.

mod blit;
mod convert;
mod device;
mod factory;
mod pixel_format;
mod upload;

pub use blit::{copy_texture, copy_texture_into, extract_slice, stack_textures};
pub use convert::convert_color_space;
pub use device::Device;
pub use factory::{Texture, TextureKind, empty_frame_plane};
pub use pixel_format::{PixelFormat, classify_frame_format};
