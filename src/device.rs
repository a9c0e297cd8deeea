// SPDX-License-Identifier: Parity-7.0.0 OR PolyForm-Noncommercial-1.0.0
/*! The shared GPU device handle.

The device and its queue are process-wide, lazily-initialized singletons;
everything else (textures, buffers, encoders) is created fresh per call.
This type is a cheap clone of the shared handle.
*/

use crate::error::Error;
use crate::imp;
use std::sync::Arc;

/// A handle to the process-wide GPU device.
#[derive(Debug, Clone)]
pub struct Device(pub(crate) Arc<imp::Device>);

impl Device {
    /// The shared device, created on first use.
    ///
    /// Fails with [`Error::NoAdapter`] when the host has no usable GPU, or
    /// [`Error::RequestDeviceFailed`] when the adapter refuses a device.
    pub async fn shared() -> Result<Device, Error> {
        imp::Device::shared().await.map(Device)
    }

    /// The largest 2D extent this device accepts per side.
    pub fn max_extent_2d(&self) -> u32 {
        self.0.max_extent_2d()
    }

    /// The largest 3D extent this device accepts per axis.
    pub fn max_extent_3d(&self) -> u32 {
        self.0.max_extent_3d()
    }
}
