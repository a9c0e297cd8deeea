// SPDX-License-Identifier: Parity-7.0.0 OR PolyForm-Noncommercial-1.0.0
/*! Concrete bitmap images: packed pixels at an explicit bit depth, plus the
PNG codec boundary.

A [`BitmapImage`] stores transfer-encoded channel values the way the file or
GPU wants them, RGBA-interleaved and row-major with an explicit
bytes-per-row that may exceed tight packing. The codec boundary delegates
entirely to the `png` crate; there is no format parsing here.
*/

use crate::bit_depth::BitDepth;
use crate::color_space::{self, ColorSpace};
use crate::composite::CompositeImage;
use crate::error::Error;
use crate::geometry::Extent2;
use crate::pixel_formats::f16;
use std::borrow::Cow;
use std::io::Cursor;

/// A packed RGBA bitmap at one of the supported bit depths.
#[derive(Debug, Clone)]
pub struct BitmapImage {
    extent: Extent2,
    bit_depth: BitDepth,
    color_space: Option<ColorSpace>,
    bytes_per_row: usize,
    data: Vec<u8>,
}

impl BitmapImage {
    /// Builds a tightly packed bitmap from raw pixel bytes.
    ///
    /// `data.len()` must equal `width * bytes_per_pixel * height` exactly.
    pub fn new_tight(
        extent: Extent2,
        bit_depth: BitDepth,
        color_space: Option<ColorSpace>,
        data: Vec<u8>,
    ) -> Result<Self, Error> {
        if extent.width == 0 || extent.height == 0 {
            return Err(Error::SizeIsZero);
        }
        let bytes_per_row = extent.width as usize * bit_depth.bytes_per_pixel();
        let expected = bytes_per_row * extent.height as usize;
        if data.len() != expected {
            return Err(Error::BufferSizeMismatch {
                expected,
                actual: data.len(),
            });
        }
        Ok(BitmapImage {
            extent,
            bit_depth,
            color_space,
            bytes_per_row,
            data,
        })
    }

    /// Builds a bitmap over strided storage, as a readback produces it.
    pub(crate) fn with_stride(
        extent: Extent2,
        bit_depth: BitDepth,
        color_space: Option<ColorSpace>,
        bytes_per_row: usize,
        data: Vec<u8>,
    ) -> Result<Self, Error> {
        let tight_row = extent.width as usize * bit_depth.bytes_per_pixel();
        if bytes_per_row < tight_row || data.len() < bytes_per_row * extent.height as usize {
            return Err(Error::BufferSizeMismatch {
                expected: bytes_per_row.max(tight_row) * extent.height as usize,
                actual: data.len(),
            });
        }
        Ok(BitmapImage {
            extent,
            bit_depth,
            color_space,
            bytes_per_row,
            data,
        })
    }

    /// Quantizes transfer-encoded f32 RGBA samples into packed storage.
    pub(crate) fn from_encoded_samples(
        extent: Extent2,
        bit_depth: BitDepth,
        color_space: Option<ColorSpace>,
        encoded: &[f32],
    ) -> Result<Self, Error> {
        let expected = extent.pixel_count() * 4;
        if encoded.len() != expected {
            return Err(Error::BufferSizeMismatch {
                expected,
                actual: encoded.len(),
            });
        }
        let data = match bit_depth {
            BitDepth::Eight => encoded
                .iter()
                .map(|v| (v.clamp(0.0, 1.0) * 255.0 + 0.5) as u8)
                .collect(),
            BitDepth::Sixteen => {
                let mut bytes = Vec::with_capacity(expected * 2);
                for v in encoded {
                    bytes.extend_from_slice(&f16::from_f32(*v).to_le_bytes());
                }
                bytes
            }
            BitDepth::ThirtyTwo => {
                let mut bytes = Vec::with_capacity(expected * 4);
                for v in encoded {
                    bytes.extend_from_slice(&v.to_le_bytes());
                }
                bytes
            }
        };
        BitmapImage::new_tight(extent, bit_depth, color_space, data)
    }

    pub fn extent(&self) -> Extent2 {
        self.extent
    }

    pub fn bit_depth(&self) -> BitDepth {
        self.bit_depth
    }

    pub fn color_space(&self) -> Option<ColorSpace> {
        self.color_space
    }

    pub fn bytes_per_row(&self) -> usize {
        self.bytes_per_row
    }

    /// One row of pixel bytes, without any trailing stride padding.
    pub fn row(&self, y: u32) -> &[u8] {
        assert!(y < self.extent.height);
        let tight = self.extent.width as usize * self.bit_depth.bytes_per_pixel();
        let start = y as usize * self.bytes_per_row;
        &self.data[start..start + tight]
    }

    /// Whether rows are packed with no stride padding.
    pub fn is_tight(&self) -> bool {
        self.bytes_per_row == self.extent.width as usize * self.bit_depth.bytes_per_pixel()
    }

    /// The pixel bytes with stride padding removed.
    pub fn tight_bytes(&self) -> Cow<'_, [u8]> {
        if self.is_tight() {
            Cow::Borrowed(&self.data)
        } else {
            let tight = self.extent.width as usize * self.bit_depth.bytes_per_pixel();
            let mut out = Vec::with_capacity(tight * self.extent.height as usize);
            for y in 0..self.extent.height {
                out.extend_from_slice(self.row(y));
            }
            Cow::Owned(out)
        }
    }

    /// Transfer-encoded channel values widened to f32, tightly packed.
    pub fn encoded_samples(&self) -> Vec<f32> {
        let mut out = Vec::with_capacity(self.extent.pixel_count() * 4);
        for y in 0..self.extent.height {
            let row = self.row(y);
            match self.bit_depth {
                BitDepth::Eight => {
                    out.extend(row.iter().map(|b| *b as f32 / 255.0));
                }
                BitDepth::Sixteen => {
                    for pair in row.chunks_exact(2) {
                        out.push(f16::from_le_bytes([pair[0], pair[1]]).to_f32());
                    }
                }
                BitDepth::ThirtyTwo => {
                    for quad in row.chunks_exact(4) {
                        out.push(f32::from_le_bytes([quad[0], quad[1], quad[2], quad[3]]));
                    }
                }
            }
        }
        out
    }

    /// Decodes into the linear compositing intermediate.
    pub fn to_composite(&self) -> Result<CompositeImage, Error> {
        let decode = |v: f32| -> f32 {
            match self.color_space.map(|s| s.profile().transfer) {
                Some(color_space::Transfer::Srgb) => color_space::srgb_to_linear(v),
                _ => v,
            }
        };
        let mut samples = self.encoded_samples();
        for px in samples.chunks_exact_mut(4) {
            px[0] = decode(px[0]);
            px[1] = decode(px[1]);
            px[2] = decode(px[2]);
        }
        CompositeImage::from_samples(
            self.extent,
            samples,
            self.color_space,
            self.bit_depth.composite_format(),
        )
    }

    /// Encodes as PNG.
    ///
    /// PNG carries 8- or 16-bit unsigned channels; half floats quantize
    /// through the normalized range, and 32-bit float content has no PNG
    /// representation at all.
    pub fn encode_png(&self) -> Result<Vec<u8>, Error> {
        let (png_depth, bytes) = match self.bit_depth {
            BitDepth::Eight => (png::BitDepth::Eight, self.tight_bytes().into_owned()),
            BitDepth::Sixteen => {
                let mut out = Vec::with_capacity(self.extent.pixel_count() * 8);
                for y in 0..self.extent.height {
                    for pair in self.row(y).chunks_exact(2) {
                        let v = f16::from_le_bytes([pair[0], pair[1]]).to_f32();
                        let q = (v.clamp(0.0, 1.0) * 65_535.0 + 0.5) as u16;
                        out.extend_from_slice(&q.to_be_bytes());
                    }
                }
                (png::BitDepth::Sixteen, out)
            }
            BitDepth::ThirtyTwo => return Err(Error::UnsupportedBits(self.bit_depth)),
        };

        let mut cursor = Cursor::new(Vec::new());
        {
            let mut encoder = png::Encoder::new(
                &mut cursor,
                self.extent.width,
                self.extent.height,
            );
            encoder.set_color(png::ColorType::Rgba);
            encoder.set_depth(png_depth);
            match self.color_space {
                Some(space) if space.is_linear() => {
                    encoder.set_source_gamma(png::ScaledFloat::new(1.0));
                }
                Some(_) => {
                    encoder.set_source_gamma(png::ScaledFloat::new(1.0 / 2.2));
                }
                None => {}
            }
            let mut writer = encoder.write_header()?;
            writer.write_image_data(&bytes)?;
            writer.finish()?;
        }
        Ok(cursor.into_inner())
    }

    /// Decodes a PNG into a bitmap, inferring depth and color space.
    ///
    /// 8-bit files decode to [`BitDepth::Eight`], 16-bit files to
    /// [`BitDepth::Sixteen`]. Files with an sRGB chunk, or with no color
    /// chunks at all, classify as sRGB; a source gamma of 1.0 classifies as
    /// linear; any other gamma leaves the color space unattached.
    pub fn decode_png(bytes: &[u8]) -> Result<Self, Error> {
        let decoder = png::Decoder::new(Cursor::new(bytes));
        let mut reader = decoder.read_info()?;

        let info_bits = match reader.info().bit_depth {
            png::BitDepth::Eight => 8u8,
            png::BitDepth::Sixteen => 16,
            png::BitDepth::One => 1,
            png::BitDepth::Two => 2,
            png::BitDepth::Four => 4,
        };
        let bit_depth = BitDepth::from_bits_per_component(info_bits)?;
        let color_type = reader.info().color_type;
        let color_space = if reader.info().srgb.is_some() {
            Some(ColorSpace::Srgb)
        } else if let Some(gamma) = reader.info().gamma() {
            let g = gamma.into_value();
            if (g - 1.0).abs() < 1e-3 {
                Some(ColorSpace::LinearSrgb)
            } else if (g - 1.0 / 2.2).abs() < 5e-3 {
                Some(ColorSpace::Srgb)
            } else {
                None
            }
        } else {
            // the codec's documented default
            Some(ColorSpace::Srgb)
        };

        let mut buf = vec![0u8; reader.output_buffer_size().unwrap()];
        let frame = reader.next_frame(&mut buf)?;
        buf.truncate(frame.buffer_size());
        let extent = Extent2::new(frame.width, frame.height);

        let bytes_per_sample = bit_depth.bits_per_component() as usize / 8;
        let rgba = match color_type {
            png::ColorType::Rgba => buf,
            png::ColorType::Rgb => {
                let mut out =
                    Vec::with_capacity(extent.pixel_count() * 4 * bytes_per_sample);
                for px in buf.chunks_exact(3 * bytes_per_sample) {
                    out.extend_from_slice(px);
                    out.extend(std::iter::repeat_n(0xffu8, bytes_per_sample));
                }
                out
            }
            png::ColorType::Grayscale => {
                let mut out =
                    Vec::with_capacity(extent.pixel_count() * 4 * bytes_per_sample);
                for px in buf.chunks_exact(bytes_per_sample) {
                    for _ in 0..3 {
                        out.extend_from_slice(px);
                    }
                    out.extend(std::iter::repeat_n(0xffu8, bytes_per_sample));
                }
                out
            }
            png::ColorType::GrayscaleAlpha => {
                let mut out =
                    Vec::with_capacity(extent.pixel_count() * 4 * bytes_per_sample);
                for px in buf.chunks_exact(2 * bytes_per_sample) {
                    let (gray, alpha) = px.split_at(bytes_per_sample);
                    for _ in 0..3 {
                        out.extend_from_slice(gray);
                    }
                    out.extend_from_slice(alpha);
                }
                out
            }
            png::ColorType::Indexed => return Err(Error::ImageNotFound),
        };

        // PNG stores 16-bit samples big-endian; our storage is half floats.
        let data = match bit_depth {
            BitDepth::Eight => rgba,
            BitDepth::Sixteen => {
                let mut out = Vec::with_capacity(rgba.len());
                for pair in rgba.chunks_exact(2) {
                    let v = u16::from_be_bytes([pair[0], pair[1]]) as f32 / 65_535.0;
                    out.extend_from_slice(&f16::from_f32(v).to_le_bytes());
                }
                out
            }
            BitDepth::ThirtyTwo => unreachable!("PNG has no 32-bit channels"),
        };

        BitmapImage::new_tight(extent, bit_depth, color_space, data)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn checkerboard(extent: Extent2) -> Vec<u8> {
        let mut data = Vec::with_capacity(extent.pixel_count() * 4);
        for y in 0..extent.height {
            for x in 0..extent.width {
                let on = (x + y) % 2 == 0;
                data.extend_from_slice(if on {
                    &[255, 128, 0, 255]
                } else {
                    &[0, 64, 255, 255]
                });
            }
        }
        data
    }

    #[test]
    fn tight_length_validated() {
        let extent = Extent2::new(10, 10);
        assert!(matches!(
            BitmapImage::new_tight(extent, BitDepth::Eight, None, vec![0u8; 399]),
            Err(Error::BufferSizeMismatch {
                expected: 400,
                actual: 399
            })
        ));
    }

    #[test]
    fn png_roundtrip_8bit() {
        let extent = Extent2::new(16, 9);
        let bitmap = BitmapImage::new_tight(
            extent,
            BitDepth::Eight,
            Some(ColorSpace::Srgb),
            checkerboard(extent),
        )
        .unwrap();
        let png = bitmap.encode_png().unwrap();
        let back = BitmapImage::decode_png(&png).unwrap();
        assert_eq!(back.extent(), extent);
        assert_eq!(back.bit_depth(), BitDepth::Eight);
        assert_eq!(back.color_space(), Some(ColorSpace::Srgb));
        assert_eq!(back.tight_bytes(), bitmap.tight_bytes());
    }

    #[test]
    fn png_roundtrip_16bit_within_tolerance() {
        let extent = Extent2::new(4, 4);
        let encoded: Vec<f32> = (0..extent.pixel_count() * 4)
            .map(|i| (i % 7) as f32 / 7.0)
            .collect();
        let bitmap = BitmapImage::from_encoded_samples(
            extent,
            BitDepth::Sixteen,
            Some(ColorSpace::LinearSrgb),
            &encoded,
        )
        .unwrap();
        let png = bitmap.encode_png().unwrap();
        let back = BitmapImage::decode_png(&png).unwrap();
        assert_eq!(back.bit_depth(), BitDepth::Sixteen);
        assert_eq!(back.color_space(), Some(ColorSpace::LinearSrgb));
        for (a, b) in bitmap.encoded_samples().iter().zip(back.encoded_samples()) {
            assert!((a - b).abs() < 2e-3, "{a} vs {b}");
        }
    }

    #[test]
    fn float_bitmap_has_no_png_form() {
        let extent = Extent2::new(2, 2);
        let bitmap = BitmapImage::from_encoded_samples(
            extent,
            BitDepth::ThirtyTwo,
            Some(ColorSpace::LinearSrgb),
            &vec![0.5f32; 16],
        )
        .unwrap();
        assert!(matches!(
            bitmap.encode_png(),
            Err(Error::UnsupportedBits(BitDepth::ThirtyTwo))
        ));
    }

    #[test]
    fn composite_roundtrip_decodes_transfer() {
        let extent = Extent2::new(8, 8);
        let bitmap = BitmapImage::new_tight(
            extent,
            BitDepth::Eight,
            Some(ColorSpace::Srgb),
            checkerboard(extent),
        )
        .unwrap();
        let composite = bitmap.to_composite().unwrap();
        // 128/255 encoded decodes below its encoded value under the curve
        let px = composite.sample(0, 0);
        assert!(px.g < 128.0 / 255.0);
        let rendered = composite.render(Some(BitDepth::Eight)).unwrap();
        assert_eq!(rendered.tight_bytes(), bitmap.tight_bytes());
    }

    #[test]
    fn stride_rows_ignore_padding() {
        let extent = Extent2::new(2, 2);
        // 8 tight bytes per row, padded to 12
        let mut data = Vec::new();
        for y in 0..2u8 {
            for x in 0..2u8 {
                data.extend_from_slice(&[x, y, 7, 255]);
            }
            data.extend_from_slice(&[0xAA; 4]);
        }
        let bitmap =
            BitmapImage::with_stride(extent, BitDepth::Eight, None, 12, data).unwrap();
        assert!(!bitmap.is_tight());
        assert_eq!(bitmap.row(1), &[0, 1, 7, 255, 1, 1, 7, 255]);
        assert_eq!(bitmap.tight_bytes().len(), 16);
    }
}
