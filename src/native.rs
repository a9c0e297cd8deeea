// SPDX-License-Identifier: Parity-7.0.0 OR PolyForm-Noncommercial-1.0.0
/*! The native-image stand-in: a decoded bitmap plus the encoded bytes it
came from.

Keeping the original encoded bytes around lets the fast texture-upload path
hand them (or the decoded pixels) straight through without a re-encode, and
lets [`write_png`](NativeImage::write_png) return the original file verbatim
when no parameter changed.
*/

use crate::bit_depth::BitDepth;
use crate::bitmap::BitmapImage;
use crate::color_space::{self, ColorSpace};
use crate::error::Error;
use crate::geometry::Extent2;
use std::path::Path;

/// An image as the surrounding system hands it to us.
#[derive(Debug, Clone)]
pub struct NativeImage {
    bitmap: BitmapImage,
    encoded: Option<Vec<u8>>,
}

impl NativeImage {
    /// Decodes PNG bytes, keeping them for fast-path reuse.
    pub fn from_png_bytes(bytes: Vec<u8>) -> Result<Self, Error> {
        let bitmap = BitmapImage::decode_png(&bytes)?;
        Ok(NativeImage {
            bitmap,
            encoded: Some(bytes),
        })
    }

    /// Reads and decodes a PNG file.
    pub async fn from_path(path: &Path, priority: async_file::Priority) -> Result<Self, Error> {
        let file = async_file::File::open(path, priority)
            .await
            .map_err(|e| Error::Io(e.to_string()))?;
        let data = file
            .read_all(priority)
            .await
            .map_err(|e| Error::Io(e.to_string()))?;
        logwise::info_sync!(
            "loaded image file, {len} bytes",
            len = data.len()
        );
        NativeImage::from_png_bytes(data.into_boxed_slice().into_vec())
    }

    /// Wraps an already-decoded bitmap.
    pub fn from_bitmap(bitmap: BitmapImage) -> Self {
        NativeImage {
            bitmap,
            encoded: None,
        }
    }

    pub fn extent(&self) -> Extent2 {
        self.bitmap.extent()
    }

    pub fn bit_depth(&self) -> BitDepth {
        self.bitmap.bit_depth()
    }

    pub fn color_space(&self) -> Option<ColorSpace> {
        self.bitmap.color_space()
    }

    pub fn bitmap(&self) -> &BitmapImage {
        &self.bitmap
    }

    /// The encoded bytes this image was constructed from, if any.
    pub fn encoded_bytes(&self) -> Option<&[u8]> {
        self.encoded.as_deref()
    }

    /// Encodes as PNG at the requested depth and color space.
    ///
    /// When both match the stored representation and the original encoded
    /// bytes are still on hand, those bytes come back verbatim. Otherwise
    /// the image re-renders through the compositing intermediate, applying
    /// a gamut conversion when the primaries differ.
    pub fn write_png(
        &self,
        bit_depth: Option<BitDepth>,
        color_space: Option<ColorSpace>,
    ) -> Result<Vec<u8>, Error> {
        let depth = bit_depth.unwrap_or_else(|| self.bitmap.bit_depth());
        let space = match color_space {
            Some(s) => s,
            None => self.bitmap.color_space().ok_or(Error::ColorSpaceNotFound)?,
        };
        if depth == self.bitmap.bit_depth()
            && Some(space) == self.bitmap.color_space()
            && self.encoded.is_some()
        {
            return Ok(self.encoded.clone().unwrap());
        }

        let composite = self.bitmap.to_composite()?;
        let source_space = self.bitmap.color_space().ok_or(Error::ColorSpaceNotFound)?;
        let mut samples = composite.samples().to_vec();
        if let Some(matrix) = color_space::gamut_matrix(
            source_space.profile().primaries,
            space.profile().primaries,
        ) {
            for px in samples.chunks_exact_mut(4) {
                let [r, g, b] = color_space::apply_matrix(&matrix, [px[0], px[1], px[2]]);
                px[0] = r;
                px[1] = g;
                px[2] = b;
            }
        }
        let retagged = crate::composite::CompositeImage::from_samples(
            self.bitmap.extent(),
            samples,
            Some(space),
            depth.composite_format(),
        )?;
        retagged.render(Some(depth))?.encode_png()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_image(extent: Extent2) -> NativeImage {
        let mut data = Vec::with_capacity(extent.pixel_count() * 4);
        for i in 0..extent.pixel_count() {
            data.extend_from_slice(&[(i % 256) as u8, 40, 200, 255]);
        }
        let bitmap =
            BitmapImage::new_tight(extent, BitDepth::Eight, Some(ColorSpace::Srgb), data)
                .unwrap();
        NativeImage::from_bitmap(bitmap)
    }

    #[test]
    fn unchanged_parameters_reuse_encoded_bytes() {
        let png = test_image(Extent2::new(5, 5)).write_png(None, None).unwrap();
        let image = NativeImage::from_png_bytes(png.clone()).unwrap();
        let rewritten = image.write_png(None, None).unwrap();
        assert_eq!(rewritten, png);
    }

    #[test]
    fn depth_change_reencodes() {
        let image = test_image(Extent2::new(4, 3));
        let wide = image.write_png(Some(BitDepth::Sixteen), None).unwrap();
        let decoded = NativeImage::from_png_bytes(wide).unwrap();
        assert_eq!(decoded.bit_depth(), BitDepth::Sixteen);
        assert_eq!(decoded.extent(), Extent2::new(4, 3));
    }

    #[test]
    fn gamut_change_shifts_pixels() {
        let image = test_image(Extent2::new(2, 2));
        let p3 = image
            .write_png(None, Some(ColorSpace::DisplayP3))
            .unwrap();
        let decoded = NativeImage::from_png_bytes(p3).unwrap();
        // saturated blue-ish source lands on different P3 coordinates
        assert_ne!(
            decoded.bitmap().tight_bytes(),
            image.bitmap().tight_bytes()
        );
    }
}
