// SPDX-License-Identifier: Parity-7.0.0 OR PolyForm-Noncommercial-1.0.0
/*! The format conversion core: every pairwise conversion among native
images, compositing images, textures, bitmaps, video frame buffers, and raw
channel buffers.

Each boundary applies the bit-depth and color-space models. Image-to-texture
runs a two-tier strategy: the fast path hands decoded bytes straight to the
device, and any recoverable failure falls back to the manual path through
the compositing intermediate. The fallback is an internal retry; callers
only see an error when both tiers fail.

A conversion either fully succeeds or fails outright; there is no partial
or degraded result anywhere in this module.
*/

use crate::bit_depth::BitDepth;
use crate::bitmap::BitmapImage;
use crate::color_space::{self, ColorSpace};
use crate::composite::CompositeImage;
use crate::device::Device;
use crate::error::Error;
use crate::frame::{FrameBuffer, FrameFormat};
use crate::geometry::{Extent2, Extent3, TextureUsage};
use crate::imp;
use crate::native::NativeImage;
use crate::pixel_formats::sealed::{PixelFormat, RawSample};
use crate::pixel_formats::{bytes_to_samples, pixel_as_bytes};
use crate::texture::{Texture, TextureKind};

/// Swaps the R and B bytes of packed 8-bit RGBA data in place.
fn swap_rb_in_place(bytes: &mut [u8]) {
    for px in bytes.chunks_exact_mut(4) {
        px.swap(0, 2);
    }
}

/// Writes a flat raw channel buffer into a new 2D texture.
///
/// The buffer is RGBA-interleaved, row-major, exactly
/// `width * height * 4` samples; anything else is a size mismatch. The
/// sample type decides the bit depth.
pub async fn texture_from_raw<S: RawSample>(
    device: &Device,
    extent: Extent2,
    samples: &[S],
    usage: TextureUsage,
    swap_rb: bool,
) -> Result<Texture, Error> {
    let expected = extent.pixel_count() * 4;
    if samples.len() != expected {
        return Err(Error::BufferSizeMismatch {
            expected,
            actual: samples.len(),
        });
    }
    let texture = Texture::empty_2d(
        device,
        extent,
        S::BIT_DEPTH,
        usage,
        swap_rb,
        1,
        false,
        "raw channel upload",
    )
    .await?;
    texture.0.write_bytes(&device.0, pixel_as_bytes(samples)).await?;
    Ok(texture)
}

/// Writes a flat raw channel buffer into a new volumetric texture.
///
/// The buffer covers `width * height * depth * 4` samples, slice after
/// slice.
pub async fn texture_from_raw_3d<S: RawSample>(
    device: &Device,
    extent: Extent3,
    samples: &[S],
    usage: TextureUsage,
) -> Result<Texture, Error> {
    let expected = extent.pixel_count() * 4;
    if samples.len() != expected {
        return Err(Error::BufferSizeMismatch {
            expected,
            actual: samples.len(),
        });
    }
    let texture = Texture::empty_3d(device, extent, S::BIT_DEPTH, usage, "raw volume upload").await?;
    texture.0.write_bytes(&device.0, pixel_as_bytes(samples)).await?;
    Ok(texture)
}

/// Reads a texture back as a flat raw channel buffer.
///
/// The sample type must match the texture's bit depth; a depth the request
/// cannot express fails rather than converting silently.
pub async fn raw_from_texture<S: RawSample>(
    device: &Device,
    texture: &Texture,
) -> Result<Vec<S>, Error> {
    let depth = texture.bit_depth()?;
    if depth != S::BIT_DEPTH {
        return Err(Error::UnsupportedBits(S::BIT_DEPTH));
    }
    let bytes = texture.0.read_bytes(&device.0).await?;
    Ok(bytes_to_samples(&bytes))
}

/// Writes typed pixels into a new 2D texture of the statically matching
/// format.
///
/// This covers the plane formats the flat channel API cannot express, such
/// as a lone luma or chroma plane.
pub async fn texture_from_pixels<F: PixelFormat>(
    device: &Device,
    extent: Extent2,
    pixels: &[F::CPixel],
) -> Result<Texture, Error> {
    let expected = extent.pixel_count();
    if pixels.len() != expected {
        return Err(Error::BufferSizeMismatch {
            expected,
            actual: pixels.len(),
        });
    }
    let texture = imp::Texture::empty_typed::<F>(&device.0, extent, "typed pixel upload").await?;
    texture.write_bytes(&device.0, pixel_as_bytes(pixels)).await?;
    Ok(Texture(texture))
}

/// Reads a texture back as typed pixels of its exact format.
pub async fn pixels_from_texture<F: PixelFormat>(
    device: &Device,
    texture: &Texture,
) -> Result<Vec<F::CPixel>, Error> {
    if !texture.0.format_matches_typed::<F>() {
        return Err(Error::UnsupportedPixelFormat(
            "texture format does not match the requested pixel type",
        ));
    }
    let bytes = texture.0.read_bytes(&device.0).await?;
    Ok(bytes_to_samples(&bytes))
}

/// Uploads a bitmap's pixels into a new texture at the bitmap's depth.
pub async fn bitmap_to_texture(
    device: &Device,
    bitmap: &BitmapImage,
    usage: TextureUsage,
) -> Result<Texture, Error> {
    let texture = Texture::empty_2d(
        device,
        bitmap.extent(),
        bitmap.bit_depth(),
        usage,
        false,
        1,
        false,
        "bitmap upload",
    )
    .await?;
    texture
        .0
        .write_bytes(&device.0, &bitmap.tight_bytes())
        .await?;
    Ok(texture)
}

/// Samples a texture into a compositing image tagged with the requested
/// color space.
///
/// The sampling boundary always treats texel data as linear, so the decode
/// to working-linear happens here against the requested space's curve.
/// Requesting [`ColorSpace::ExtendedLinear`] tags the output as sRGB with
/// the expand-to-HDR flag instead, because the sampling boundary does not
/// accept the HDR tag directly.
pub async fn texture_to_composite(
    device: &Device,
    texture: &Texture,
    space: ColorSpace,
) -> Result<CompositeImage, Error> {
    if texture.kind() != TextureKind::D2 {
        return Err(Error::BadResolution);
    }
    let depth = texture.bit_depth()?;
    let mut bytes = texture.0.read_bytes(&device.0).await?;
    if texture.swaps_channels() {
        swap_rb_in_place(&mut bytes);
    }
    // widen to encoded f32 through the bitmap layer's sample view
    let staging = BitmapImage::new_tight(texture.extent2(), depth, None, bytes)?;
    let mut samples = staging.encoded_samples();

    if space == ColorSpace::ExtendedLinear {
        let mut composite = CompositeImage::from_samples(
            texture.extent2(),
            samples,
            Some(ColorSpace::Srgb),
            depth.composite_format(),
        )?;
        composite.set_expand_hdr();
        return Ok(composite);
    }

    if !space.is_linear() {
        for px in samples.chunks_exact_mut(4) {
            px[0] = color_space::srgb_to_linear(px[0]);
            px[1] = color_space::srgb_to_linear(px[1]);
            px[2] = color_space::srgb_to_linear(px[2]);
        }
    }
    CompositeImage::from_samples(
        texture.extent2(),
        samples,
        Some(space),
        depth.composite_format(),
    )
}

/// Rasterizes a compositing image into a concrete bitmap.
///
/// With no depth given, the image's own inference picks one by inspecting
/// its format and sample range.
pub fn composite_to_bitmap(
    image: &CompositeImage,
    depth: Option<BitDepth>,
) -> Result<BitmapImage, Error> {
    image.render(depth)
}

/// Renders a compositing image into a new texture through the manual path.
pub async fn composite_to_texture(
    device: &Device,
    image: &CompositeImage,
    usage: TextureUsage,
) -> Result<Texture, Error> {
    let bitmap = image.render(None)?;
    bitmap_to_texture(device, &bitmap, usage).await
}

/// Reads a texture into a concrete bitmap at the requested color space and
/// depth (inferred when unspecified).
pub async fn texture_to_bitmap(
    device: &Device,
    texture: &Texture,
    depth: Option<BitDepth>,
    space: ColorSpace,
) -> Result<BitmapImage, Error> {
    let composite = texture_to_composite(device, texture, space).await?;
    composite.render(depth)
}

/// Converts a native image into a texture.
///
/// Prefers the fast path (decoded bytes straight to the device); on
/// failure falls back to the manual path: decode to the compositing
/// intermediate, infer depth and color space from the source, apply a
/// gamut conversion when the requested space's primaries differ, allocate
/// through the factory, and populate. Callers see an error only when both
/// tiers fail.
pub async fn native_to_texture(
    device: &Device,
    image: &NativeImage,
    space: Option<ColorSpace>,
    usage: TextureUsage,
) -> Result<Texture, Error> {
    let requested_matches_source =
        space.is_none() || space == image.color_space();
    if requested_matches_source {
        match bitmap_to_texture(device, image.bitmap(), usage).await {
            Ok(texture) => return Ok(texture),
            Err(e) => {
                logwise::warn_sync!(
                    "image upload fast path failed, falling back: {error}",
                    error = logwise::privacy::LogIt(&e)
                );
            }
        }
    }

    // manual path: through the compositing intermediate
    let from = image.color_space().ok_or(Error::ColorSpaceNotFound)?;
    let to = space.unwrap_or(from);
    let composite = image.bitmap().to_composite()?;
    let mut samples = composite.samples().to_vec();
    if let Some(matrix) =
        color_space::gamut_matrix(from.profile().primaries, to.profile().primaries)
    {
        for px in samples.chunks_exact_mut(4) {
            let [r, g, b] = color_space::apply_matrix(&matrix, [px[0], px[1], px[2]]);
            px[0] = r;
            px[1] = g;
            px[2] = b;
        }
    }
    let retagged = CompositeImage::from_samples(
        image.extent(),
        samples,
        Some(to),
        image.bit_depth().composite_format(),
    )?;
    composite_to_texture(device, &retagged, usage).await
}

/// Reads a texture back into a native image.
pub async fn texture_to_native(
    device: &Device,
    texture: &Texture,
    depth: Option<BitDepth>,
    space: ColorSpace,
) -> Result<NativeImage, Error> {
    let bitmap = texture_to_bitmap(device, texture, depth, space).await?;
    Ok(NativeImage::from_bitmap(bitmap))
}

/// Binds a video frame buffer's planes to textures, one per plane.
///
/// The chroma plane of a subsampled format arrives at half extent. The
/// buffer is locked for the duration and unlocks on every exit path.
pub async fn frame_to_textures(
    device: &Device,
    frame: &FrameBuffer,
) -> Result<Vec<Texture>, Error> {
    let guard = frame.lock();
    let mut textures = Vec::with_capacity(frame.plane_count());
    for plane in 0..frame.plane_count() {
        let extent = frame.plane_extent(plane);
        let texture =
            imp::empty_frame_plane(&device.0, frame.format(), plane, extent).await?;
        let bpp = frame.format().plane_bytes_per_pixel(plane);
        let mut tight = Vec::with_capacity(extent.pixel_count() * bpp);
        for y in 0..extent.height {
            tight.extend_from_slice(guard.row(plane, y));
        }
        texture.write_bytes(&device.0, &tight).await?;
        textures.push(Texture(texture));
    }
    Ok(textures)
}

/// Reads plane textures back into an existing frame buffer.
///
/// One texture per plane, each matching its plane's extent.
pub async fn textures_to_frame(
    device: &Device,
    textures: &[Texture],
    frame: &FrameBuffer,
) -> Result<(), Error> {
    if textures.len() != frame.plane_count() {
        return Err(Error::BadResolution);
    }
    for (plane, texture) in textures.iter().enumerate() {
        if texture.extent2() != frame.plane_extent(plane) {
            return Err(Error::DifferentResolutions);
        }
    }
    let mut guard = frame.lock();
    for (plane, texture) in textures.iter().enumerate() {
        let bytes = texture.0.read_bytes(&device.0).await?;
        guard.write_plane(plane, &bytes)?;
    }
    Ok(())
}

/// Wraps a single-plane texture into a new frame buffer of the matching
/// video format.
pub async fn frame_from_texture(
    device: &Device,
    texture: &Texture,
) -> Result<FrameBuffer, Error> {
    let format = imp::classify_frame_format(&texture.0)?;
    let frame = FrameBuffer::new(format, texture.extent2())?;
    let mut bytes = texture.0.read_bytes(&device.0).await?;
    // 8-bit video interchange is BGRA; unswapped sources reorder here
    if format == FrameFormat::Bgra8 && !texture.swaps_channels() {
        swap_rb_in_place(&mut bytes);
    }
    let mut guard = frame.lock();
    guard.write_plane(0, &bytes)?;
    drop(guard);
    Ok(frame)
}
