// SPDX-License-Identifier: Parity-7.0.0 OR PolyForm-Noncommercial-1.0.0
/*! textures_and_frames converts pixel data between the representations a
graphics or media application actually has in hand: decoded images, GPU
textures, compositing intermediates, bitmaps, video frame buffers, and raw
channel arrays.

It is a utility layer over a GPU backend and an image codec, not a rendering
engine. There are no filters, no resampling, and no file-format parsing of
its own; the part it owns is the negotiation logic that decides, for every
conversion path, which bit depth, which color space, and which memory layout
to use, plus the GPU-side copy/convert operations that move pixel data
between textures without a CPU round-trip.

# Representations

| Representation | Type | Storage |
|----------------|------|---------|
| Native image | [`native::NativeImage`] | decoded bitmap + original encoded bytes |
| Compositing image | [`composite::CompositeImage`] | f32 RGBA samples, color-space tagged |
| Bitmap image | [`bitmap::BitmapImage`] | packed pixels at an explicit [`BitDepth`] |
| GPU texture | [`texture::Texture`] | device-owned, allocated per call |
| Video frame buffer | [`frame::FrameBuffer`] | CPU planes behind a lock/unlock guard |
| Raw channel buffer | flat `u8` / `f16` / `f32` slices | always 4 channels per pixel |

Every conversion is an `async fn`: CPU-heavy work (decode, encode, format
inference) runs inside the call, and GPU work suspends the caller until the
device-driven completion callback fires. Within one call, GPU commands are
encoded into a single command buffer and committed once. Completion ordering
across concurrent calls on a shared texture is not guaranteed here; callers
issuing concurrent reads and writes against one texture supply their own
synchronization.

# Bit depth and color space

[`BitDepth`] is the closed set of per-channel widths (8, 16, 32), each with a
total mapping to a GPU pixel format, a compositing format tag, and a video
frame code. [`ColorSpace`] tracks gamut and transfer curve independently of
bit depth, because the same bit depth can be encoded in multiple gamuts and
curves, and texture sampling silently assumes linear data; every read from or
write to a texture states which color space the bytes represent.

# Backends

The GPU side targets [wgpu](https://wgpu.rs) via the default `backend_wgpu`
feature. Disabling it compiles a stub backend whose device entry point fails,
leaving the CPU-side models and codecs usable on their own.
*/

pub mod bit_depth;
pub mod bitmap;
pub mod blit;
pub mod color_space;
pub mod composite;
pub mod convert;
pub mod device;
pub mod error;
pub mod frame;
pub mod geometry;
mod imp;
pub mod native;
pub mod pixel_formats;
pub mod texture;

pub use bit_depth::BitDepth;
pub use color_space::ColorSpace;
pub use error::Error;

pub type Priority = some_executor::Priority;
