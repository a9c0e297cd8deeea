#![allow(dead_code)]

// SPDX-License-Identifier: Parity-7.0.0 OR PolyForm-Noncommercial-1.0.0
//! Stub backend for builds without `backend_wgpu`. The CPU-side models and
//! codecs keep working; anything touching a device fails at the entry point.

use crate::bit_depth::BitDepth;
use crate::blit::TextureStack;
use crate::error::Error;
use crate::frame::FrameFormat;
use crate::geometry::{Axis, Extent2, Extent3, TextureUsage};
use std::sync::Arc;

pub trait PixelFormat {}

impl PixelFormat for crate::pixel_formats::RGBA8Unorm {}
impl PixelFormat for crate::pixel_formats::BGRA8Unorm {}
impl PixelFormat for crate::pixel_formats::RGBA16Float {}
impl PixelFormat for crate::pixel_formats::RGBA32Float {}
impl PixelFormat for crate::pixel_formats::R8Unorm {}
impl PixelFormat for crate::pixel_formats::RG8Unorm {}
impl PixelFormat for crate::pixel_formats::RG16Float {}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextureKind {
    D2,
    D2Multisampled,
    D3,
    D2Array,
}

#[derive(Debug)]
pub struct Device;

impl Device {
    pub async fn shared() -> Result<Arc<Device>, Error> {
        Err(Error::UnsupportedDevice("no GPU backend compiled in"))
    }

    pub fn max_extent_2d(&self) -> u32 {
        crate::geometry::MAX_EXTENT_2D
    }

    pub fn max_extent_3d(&self) -> u32 {
        crate::geometry::MAX_EXTENT_3D
    }
}

#[derive(Debug, Clone)]
pub struct Texture;

impl Texture {
    pub async fn empty_2d(
        _device: &Device,
        _extent: Extent2,
        _depth: BitDepth,
        _usage: TextureUsage,
        _swap_rb: bool,
        _sample_count: u32,
        _mipmaps: bool,
        _debug_name: &str,
    ) -> Result<Texture, Error> {
        todo!()
    }

    pub async fn empty_3d(
        _device: &Device,
        _extent: Extent3,
        _depth: BitDepth,
        _usage: TextureUsage,
        _debug_name: &str,
    ) -> Result<Texture, Error> {
        todo!()
    }

    pub async fn empty_array(
        _device: &Device,
        _extent: Extent2,
        _layers: u32,
        _depth: BitDepth,
        _usage: TextureUsage,
        _debug_name: &str,
    ) -> Result<Texture, Error> {
        todo!()
    }

    pub async fn empty_typed<F: crate::pixel_formats::sealed::PixelFormat>(
        _device: &Device,
        _extent: Extent2,
        _debug_name: &str,
    ) -> Result<Texture, Error> {
        todo!()
    }

    pub fn format_matches_typed<F: crate::pixel_formats::sealed::PixelFormat>(&self) -> bool {
        todo!()
    }

    pub async fn write_bytes(&self, _device: &Device, _tight: &[u8]) -> Result<(), Error> {
        todo!()
    }

    pub async fn read_bytes(&self, _device: &Device) -> Result<Vec<u8>, Error> {
        todo!()
    }

    pub fn width(&self) -> u32 {
        todo!()
    }

    pub fn height(&self) -> u32 {
        todo!()
    }

    pub fn depth_or_layers(&self) -> u32 {
        todo!()
    }

    pub fn extent2(&self) -> Extent2 {
        todo!()
    }

    pub fn extent3(&self) -> Extent3 {
        todo!()
    }

    pub fn mip_level_count(&self) -> u32 {
        todo!()
    }

    pub fn sample_count(&self) -> u32 {
        todo!()
    }

    pub fn bit_depth(&self) -> Result<BitDepth, Error> {
        todo!()
    }

    pub fn swaps_channels(&self) -> bool {
        todo!()
    }

    pub fn kind(&self) -> TextureKind {
        todo!()
    }
}

pub fn classify_frame_format(_texture: &Texture) -> Result<FrameFormat, Error> {
    todo!()
}

pub async fn empty_frame_plane(
    _device: &Device,
    _format: FrameFormat,
    _plane: usize,
    _extent: Extent2,
) -> Result<Texture, Error> {
    todo!()
}

pub async fn copy_texture(_device: &Device, _src: &Texture) -> Result<Texture, Error> {
    todo!()
}

pub async fn copy_texture_into(
    _device: &Device,
    _src: &Texture,
    _dst: &Texture,
) -> Result<(), Error> {
    todo!()
}

pub async fn extract_slice(
    _device: &Device,
    _src: &Texture,
    _axis: Axis,
    _index: u32,
) -> Result<Texture, Error> {
    todo!()
}

pub async fn stack_textures(
    _device: &Device,
    _textures: &[&Texture],
    _stack: TextureStack,
) -> Result<Texture, Error> {
    todo!()
}

pub async fn convert_color_space(
    _device: &Device,
    _src: &Texture,
    _from: crate::color_space::ColorSpace,
    _to: crate::color_space::ColorSpace,
) -> Result<Texture, Error> {
    todo!()
}
