// SPDX-License-Identifier: Parity-7.0.0 OR PolyForm-Noncommercial-1.0.0
/*! Resolutions, usage intents, and the bounds the factory enforces.

2D textures are cheap enough to allow large extents; volumetric allocations
multiply by depth and get a much smaller ceiling.
*/

use crate::error::Error;

/// Largest allowed 2D extent per side.
pub const MAX_EXTENT_2D: u32 = 16_384;

/// Largest allowed 3D extent per axis.
pub const MAX_EXTENT_3D: u32 = 2_048;

/// A 2D resolution in pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Extent2 {
    pub width: u32,
    pub height: u32,
}

impl Extent2 {
    pub const fn new(width: u32, height: u32) -> Self {
        Extent2 { width, height }
    }

    pub const fn pixel_count(self) -> usize {
        self.width as usize * self.height as usize
    }

    /// Checks both dimensions against zero and `max`.
    pub const fn validate(self, max: u32) -> Result<(), Error> {
        if self.width == 0 || self.height == 0 {
            return Err(Error::ResolutionZero);
        }
        if self.width > max || self.height > max {
            return Err(Error::ResolutionTooHigh { max });
        }
        Ok(())
    }
}

/// A volumetric resolution in voxels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Extent3 {
    pub width: u32,
    pub height: u32,
    pub depth: u32,
}

impl Extent3 {
    pub const fn new(width: u32, height: u32, depth: u32) -> Self {
        Extent3 {
            width,
            height,
            depth,
        }
    }

    pub const fn pixel_count(self) -> usize {
        self.width as usize * self.height as usize * self.depth as usize
    }

    pub const fn plane(self) -> Extent2 {
        Extent2 {
            width: self.width,
            height: self.height,
        }
    }

    pub const fn validate(self, max: u32) -> Result<(), Error> {
        if self.width == 0 || self.height == 0 || self.depth == 0 {
            return Err(Error::ResolutionZero);
        }
        if self.width > max || self.height > max || self.depth > max {
            return Err(Error::ResolutionTooHigh { max });
        }
        Ok(())
    }

    /// Extent along one axis.
    pub const fn along(self, axis: Axis) -> u32 {
        match axis {
            Axis::X => self.width,
            Axis::Y => self.height,
            Axis::Z => self.depth,
        }
    }

    /// The 2D extent of a 1-voxel slab taken across `axis`.
    ///
    /// Slicing X yields (depth × height); slicing Y yields (width × depth);
    /// slicing Z yields (width × height).
    pub const fn slice_extent(self, axis: Axis) -> Extent2 {
        match axis {
            Axis::X => Extent2 {
                width: self.depth,
                height: self.height,
            },
            Axis::Y => Extent2 {
                width: self.width,
                height: self.depth,
            },
            Axis::Z => Extent2 {
                width: self.width,
                height: self.height,
            },
        }
    }
}

/// What a newly allocated texture is for.
///
/// This is an intent tag; the backend maps it to the usage flag set the
/// device wants. Both intents keep the texture copyable in and out and
/// bindable for reads.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextureUsage {
    /// Rendered into by a pass, then read.
    RenderAndRead,
    /// Written by compute or direct upload, then read.
    WriteAndRead,
}

/// An axis of a volumetric texture.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Axis {
    X,
    Y,
    Z,
}
