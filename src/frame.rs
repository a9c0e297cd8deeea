// SPDX-License-Identifier: Parity-7.0.0 OR PolyForm-Noncommercial-1.0.0
/*! Video frame buffers: CPU pixel planes behind a lock/unlock contract.

A [`FrameBuffer`] is what a capture or decode pipeline hands over: one or
more planes of pixel data in a fourcc-tagged [`FrameFormat`], with per-plane
row strides that may exceed tight packing. Base-address access is bracketed
by [`lock`](FrameBuffer::lock); the returned guard releases on every exit
path, success or failure, because the release lives in `Drop`.

Formats classify four ways for the GPU boundary: grayscale, two-component
float, planar chroma-subsampled, and packed 4-channel. The chroma plane of a
subsampled format is half the luma extent in both axes.
*/

use crate::bit_depth::BitDepth;
use crate::error::Error;
use crate::geometry::Extent2;
use std::sync::{Mutex, MutexGuard};

/// Row strides round up to this many bytes.
pub const ROW_ALIGNMENT: usize = 64;

/// The supported video pixel formats, fourcc-tagged.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FrameFormat {
    /// Single 8-bit grayscale plane.
    Gray8,
    /// Single plane of two half-float components per pixel.
    TwoComponentHalf,
    /// Biplanar chroma-subsampled: full-res 8-bit luma plane, half-res
    /// interleaved 8-bit CbCr plane.
    Nv12,
    /// Packed 8-bit BGRA.
    Bgra8,
    /// Packed 16-bit half-float RGBA.
    Rgba16Half,
    /// Packed 32-bit float RGBA.
    Rgba32Float,
}

const fn fourcc(tag: &[u8; 4]) -> u32 {
    u32::from_be_bytes(*tag)
}

impl FrameFormat {
    /// The four-character code identifying this format on the wire.
    pub const fn code(self) -> u32 {
        match self {
            FrameFormat::Gray8 => fourcc(b"L008"),
            FrameFormat::TwoComponentHalf => fourcc(b"2C0h"),
            FrameFormat::Nv12 => fourcc(b"420f"),
            FrameFormat::Bgra8 => fourcc(b"BGRA"),
            FrameFormat::Rgba16Half => fourcc(b"RGhA"),
            FrameFormat::Rgba32Float => fourcc(b"RGfA"),
        }
    }

    /// Resolves a wire code back to the format.
    pub fn from_code(code: u32) -> Result<Self, Error> {
        const ALL: [FrameFormat; 6] = [
            FrameFormat::Gray8,
            FrameFormat::TwoComponentHalf,
            FrameFormat::Nv12,
            FrameFormat::Bgra8,
            FrameFormat::Rgba16Half,
            FrameFormat::Rgba32Float,
        ];
        ALL.into_iter()
            .find(|f| f.code() == code)
            .ok_or(Error::UnsupportedPixelFormat("unknown fourcc"))
    }

    pub const fn plane_count(self) -> usize {
        match self {
            FrameFormat::Nv12 => 2,
            _ => 1,
        }
    }

    pub const fn is_chroma_subsampled(self) -> bool {
        matches!(self, FrameFormat::Nv12)
    }

    /// Bytes per pixel within one plane.
    pub const fn plane_bytes_per_pixel(self, plane: usize) -> usize {
        match (self, plane) {
            (FrameFormat::Gray8, 0) => 1,
            (FrameFormat::TwoComponentHalf, 0) => 4,
            (FrameFormat::Nv12, 0) => 1,
            // interleaved CbCr
            (FrameFormat::Nv12, 1) => 2,
            (FrameFormat::Bgra8, 0) => 4,
            (FrameFormat::Rgba16Half, 0) => 8,
            (FrameFormat::Rgba32Float, 0) => 16,
            _ => panic!("no such plane"),
        }
    }

    /// The pixel extent of one plane; the chroma plane halves both axes.
    pub const fn plane_extent(self, extent: Extent2, plane: usize) -> Extent2 {
        match (self, plane) {
            (FrameFormat::Nv12, 1) => Extent2 {
                width: extent.width.div_ceil(2),
                height: extent.height.div_ceil(2),
            },
            _ => extent,
        }
    }

    /// The bit depth of a packed 4-channel format; planar and narrow
    /// formats have none.
    pub const fn bit_depth(self) -> Option<BitDepth> {
        match self {
            FrameFormat::Bgra8 => Some(BitDepth::Eight),
            FrameFormat::Rgba16Half => Some(BitDepth::Sixteen),
            FrameFormat::Rgba32Float => Some(BitDepth::ThirtyTwo),
            _ => None,
        }
    }

    /// Whether the packed layout is channel-swapped (BGRA order).
    pub const fn swaps_channels(self) -> bool {
        matches!(self, FrameFormat::Bgra8)
    }
}

#[derive(Debug)]
struct Planes {
    data: Vec<Vec<u8>>,
}

/// A CPU video pixel buffer.
#[derive(Debug)]
pub struct FrameBuffer {
    format: FrameFormat,
    extent: Extent2,
    strides: Vec<usize>,
    planes: Mutex<Planes>,
}

impl FrameBuffer {
    /// Allocates a zeroed frame buffer.
    ///
    /// Chroma-subsampled formats need even extents; anything else is a
    /// malformed resolution for that format.
    pub fn new(format: FrameFormat, extent: Extent2) -> Result<Self, Error> {
        if extent.width == 0 || extent.height == 0 {
            return Err(Error::SizeIsZero);
        }
        if format.is_chroma_subsampled() && (extent.width % 2 != 0 || extent.height % 2 != 0) {
            return Err(Error::BadResolution);
        }
        let mut strides = Vec::with_capacity(format.plane_count());
        let mut data = Vec::with_capacity(format.plane_count());
        for plane in 0..format.plane_count() {
            let plane_extent = format.plane_extent(extent, plane);
            let tight = plane_extent.width as usize * format.plane_bytes_per_pixel(plane);
            let stride = tight.div_ceil(ROW_ALIGNMENT) * ROW_ALIGNMENT;
            strides.push(stride);
            data.push(vec![0u8; stride * plane_extent.height as usize]);
        }
        Ok(FrameBuffer {
            format,
            extent,
            strides,
            planes: Mutex::new(Planes { data }),
        })
    }

    pub fn format(&self) -> FrameFormat {
        self.format
    }

    pub fn extent(&self) -> Extent2 {
        self.extent
    }

    pub fn plane_count(&self) -> usize {
        self.format.plane_count()
    }

    pub fn plane_extent(&self, plane: usize) -> Extent2 {
        self.format.plane_extent(self.extent, plane)
    }

    /// Bytes per row of one plane, including alignment padding.
    pub fn plane_stride(&self, plane: usize) -> usize {
        self.strides[plane]
    }

    /// Locks the backing memory for base-address access.
    ///
    /// The returned guard is the unlock: it releases when dropped, on every
    /// exit path.
    ///
    /// ```
    /// use textures_and_frames::frame::{FrameBuffer, FrameFormat};
    /// use textures_and_frames::geometry::Extent2;
    ///
    /// let buffer = FrameBuffer::new(FrameFormat::Gray8, Extent2::new(4, 4)).unwrap();
    /// {
    ///     let mut guard = buffer.lock();
    ///     guard.plane_mut(0)[0] = 0x7f;
    /// } // unlocked here
    /// assert_eq!(buffer.lock().plane(0)[0], 0x7f);
    /// ```
    pub fn lock(&self) -> FrameGuard<'_> {
        logwise::trace_sync!("frame buffer lock");
        FrameGuard {
            buffer: self,
            planes: self.planes.lock().expect("frame buffer lock poisoned"),
        }
    }
}

/// Scoped access to a locked frame buffer's planes.
pub struct FrameGuard<'a> {
    buffer: &'a FrameBuffer,
    planes: MutexGuard<'a, Planes>,
}

impl FrameGuard<'_> {
    /// The full backing bytes of one plane, stride included.
    pub fn plane(&self, plane: usize) -> &[u8] {
        &self.planes.data[plane]
    }

    pub fn plane_mut(&mut self, plane: usize) -> &mut [u8] {
        &mut self.planes.data[plane]
    }

    /// One tight row of one plane.
    pub fn row(&self, plane: usize, y: u32) -> &[u8] {
        let extent = self.buffer.plane_extent(plane);
        assert!(y < extent.height);
        let stride = self.buffer.strides[plane];
        let tight = extent.width as usize * self.buffer.format.plane_bytes_per_pixel(plane);
        let start = y as usize * stride;
        &self.planes.data[plane][start..start + tight]
    }

    /// Copies tight rows into one plane, honoring the stride.
    pub fn write_plane(&mut self, plane: usize, tight_rows: &[u8]) -> Result<(), Error> {
        let extent = self.buffer.plane_extent(plane);
        let tight = extent.width as usize * self.buffer.format.plane_bytes_per_pixel(plane);
        let expected = tight * extent.height as usize;
        if tight_rows.len() != expected {
            return Err(Error::BufferSizeMismatch {
                expected,
                actual: tight_rows.len(),
            });
        }
        let stride = self.buffer.strides[plane];
        let data = &mut self.planes.data[plane];
        for y in 0..extent.height as usize {
            data[y * stride..y * stride + tight]
                .copy_from_slice(&tight_rows[y * tight..(y + 1) * tight]);
        }
        Ok(())
    }
}

impl Drop for FrameGuard<'_> {
    fn drop(&mut self) {
        logwise::trace_sync!("frame buffer unlock");
    }
}
