// SPDX-License-Identifier: Parity-7.0.0 OR PolyForm-Noncommercial-1.0.0
/*! The compositing-engine intermediate: linear working samples between
textures and concrete bitmaps.

A [`CompositeImage`] is the CPU-side stage every lossy boundary passes
through. Samples are `f32` RGBA in linear light over the tagged space's
primaries; the tag records which [`ColorSpace`] the stage belongs to and the
[`CompositeFormat`] records which concrete depth it came from (or should be
rasterized back into). Rasterizing applies the space's transfer curve and
quantizes; the reverse constructor decodes back to linear.
*/

use crate::bit_depth::{BitDepth, CompositeFormat};
use crate::bitmap::BitmapImage;
use crate::color_space::{self, ColorSpace, Transfer};
use crate::error::Error;
use crate::geometry::Extent2;
use crate::pixel_formats::Float4;

/// A resolution-tagged block of linear f32 RGBA working samples.
#[derive(Debug, Clone)]
pub struct CompositeImage {
    extent: Extent2,
    /// Flat RGBA, row-major, 4 floats per pixel, linear light.
    samples: Vec<f32>,
    color_space: Option<ColorSpace>,
    format: CompositeFormat,
    expand_hdr: bool,
}

impl CompositeImage {
    /// Wraps flat linear RGBA samples.
    ///
    /// `samples.len()` must equal `width * height * 4`.
    pub fn from_samples(
        extent: Extent2,
        samples: Vec<f32>,
        color_space: Option<ColorSpace>,
        format: CompositeFormat,
    ) -> Result<Self, Error> {
        if extent.width == 0 || extent.height == 0 {
            return Err(Error::SizeIsZero);
        }
        let expected = extent.pixel_count() * 4;
        if samples.len() != expected {
            return Err(Error::BufferSizeMismatch {
                expected,
                actual: samples.len(),
            });
        }
        Ok(CompositeImage {
            extent,
            samples,
            color_space,
            format,
            expand_hdr: false,
        })
    }

    /// Marks this stage as destined for extended-range output.
    ///
    /// The texture-sampling boundary does not accept the HDR tag directly;
    /// a texture sampled with [`ColorSpace::ExtendedLinear`] requested comes
    /// back tagged [`ColorSpace::Srgb`] with this flag set instead.
    pub(crate) fn set_expand_hdr(&mut self) {
        self.expand_hdr = true;
    }

    pub fn extent(&self) -> Extent2 {
        self.extent
    }

    pub fn color_space(&self) -> Option<ColorSpace> {
        self.color_space
    }

    pub fn format(&self) -> CompositeFormat {
        self.format
    }

    pub fn expand_hdr(&self) -> bool {
        self.expand_hdr
    }

    pub fn samples(&self) -> &[f32] {
        &self.samples
    }

    /// One pixel's linear RGBA.
    pub fn sample(&self, x: u32, y: u32) -> Float4 {
        assert!(x < self.extent.width && y < self.extent.height);
        let i = (y as usize * self.extent.width as usize + x as usize) * 4;
        Float4 {
            r: self.samples[i],
            g: self.samples[i + 1],
            b: self.samples[i + 2],
            a: self.samples[i + 3],
        }
    }

    /// Whether any color sample falls outside [0, 1].
    pub fn has_out_of_range_samples(&self) -> bool {
        self.samples
            .chunks_exact(4)
            .any(|px| px[..3].iter().any(|v| *v < 0.0 || *v > 1.0))
    }

    /// The depth rasterization should use when the caller does not say.
    ///
    /// Extended-range content needs float channels; everything else keeps
    /// the depth the stage was produced from.
    pub fn inferred_bit_depth(&self) -> BitDepth {
        if self.expand_hdr || self.has_out_of_range_samples() {
            BitDepth::Sixteen
        } else {
            BitDepth::from_composite_format(self.format)
        }
    }

    /// Rasterizes into a concrete bitmap at `depth`, or at
    /// [`inferred_bit_depth`](Self::inferred_bit_depth) when `None`.
    ///
    /// Applies the tagged space's transfer curve; an image destined for
    /// extended range stays linear and unclamped regardless of its tag.
    pub fn render(&self, depth: Option<BitDepth>) -> Result<BitmapImage, Error> {
        let depth = depth.unwrap_or_else(|| self.inferred_bit_depth());
        let space = self.color_space;
        let transfer = if self.expand_hdr {
            Transfer::ExtendedLinear
        } else {
            space.map_or(Transfer::Linear, |s| s.profile().transfer)
        };
        logwise::trace_sync!(
            "composite render {w}x{h} depth {depth}",
            w = self.extent.width,
            h = self.extent.height,
            depth = depth.bits_per_component()
        );

        let encode = |v: f32| -> f32 {
            match transfer {
                Transfer::Srgb => color_space::linear_to_srgb(v),
                Transfer::Linear | Transfer::ExtendedLinear => v,
            }
        };
        let mut encoded = Vec::with_capacity(self.samples.len());
        for px in self.samples.chunks_exact(4) {
            encoded.push(encode(px[0]));
            encoded.push(encode(px[1]));
            encoded.push(encode(px[2]));
            encoded.push(px[3]);
        }
        BitmapImage::from_encoded_samples(self.extent, depth, space, &encoded)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn gradient(extent: Extent2) -> Vec<f32> {
        let mut v = Vec::with_capacity(extent.pixel_count() * 4);
        for y in 0..extent.height {
            for x in 0..extent.width {
                v.push(x as f32 / extent.width as f32);
                v.push(y as f32 / extent.height as f32);
                v.push(0.25);
                v.push(1.0);
            }
        }
        v
    }

    #[test]
    fn sample_length_validated() {
        let extent = Extent2::new(4, 4);
        let short = vec![0.0f32; 15];
        assert!(matches!(
            CompositeImage::from_samples(extent, short, None, CompositeFormat::Rgba8),
            Err(Error::BufferSizeMismatch {
                expected: 64,
                actual: 15
            })
        ));
    }

    #[test]
    fn zero_extent_rejected() {
        assert!(matches!(
            CompositeImage::from_samples(
                Extent2::new(0, 4),
                Vec::new(),
                None,
                CompositeFormat::Rgba8
            ),
            Err(Error::SizeIsZero)
        ));
    }

    #[test]
    fn inferred_depth_widens_for_hdr() {
        let extent = Extent2::new(2, 2);
        let mut image = CompositeImage::from_samples(
            extent,
            gradient(extent),
            Some(ColorSpace::Srgb),
            CompositeFormat::Rgba8,
        )
        .unwrap();
        assert_eq!(image.inferred_bit_depth(), BitDepth::Eight);
        image.set_expand_hdr();
        assert_eq!(image.inferred_bit_depth(), BitDepth::Sixteen);

        let bright = CompositeImage::from_samples(
            extent,
            vec![2.5f32; 16],
            Some(ColorSpace::LinearSrgb),
            CompositeFormat::Rgba8,
        )
        .unwrap();
        assert_eq!(bright.inferred_bit_depth(), BitDepth::Sixteen);
    }

    #[test]
    fn render_reports_tagged_space() {
        let extent = Extent2::new(3, 2);
        let image = CompositeImage::from_samples(
            extent,
            gradient(extent),
            Some(ColorSpace::Srgb),
            CompositeFormat::Rgba8,
        )
        .unwrap();
        let bitmap = image.render(None).unwrap();
        assert_eq!(bitmap.extent(), extent);
        assert_eq!(bitmap.bit_depth(), BitDepth::Eight);
        assert_eq!(bitmap.color_space(), Some(ColorSpace::Srgb));
        assert_eq!(ColorSpace::of_composite(&image).unwrap(), ColorSpace::Srgb);
    }

    #[test]
    fn missing_color_space_is_reported() {
        let extent = Extent2::new(2, 2);
        let untagged =
            CompositeImage::from_samples(extent, vec![0.5; 16], None, CompositeFormat::Rgba8)
                .unwrap();
        assert!(matches!(
            ColorSpace::of_composite(&untagged),
            Err(crate::error::Error::ColorSpaceNotFound)
        ));
    }
}
