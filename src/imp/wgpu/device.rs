// SPDX-License-Identifier: Parity-7.0.0 OR PolyForm-Noncommercial-1.0.0
/*! The process-wide shared device.

The device and queue are lazily-initialized singletons; textures, buffers,
and encoders are always created fresh per call. A dedicated poll thread
drives `map_async` and `on_submitted_work_done` callbacks, woken through a
channel whenever work is committed, so callers can suspend on a continuation
instead of blocking a foreground thread.
*/

use crate::error::Error;
use crate::geometry;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc::{self, Receiver, Sender};
use std::sync::{Arc, Mutex};
use std::thread::{self, JoinHandle};
use wgpu::{Limits, PollType, Trace};

static SHARED: Mutex<Option<Arc<Device>>> = Mutex::new(None);

/// The shared GPU device, queue, and poll plumbing.
#[derive(Debug)]
pub struct Device {
    device: wgpu::Device,
    queue: wgpu::Queue,
    adapter: wgpu::Adapter,
    poll_thread: Option<JoinHandle<()>>,
    poll_shutdown: Arc<AtomicBool>,
    poll_trigger: Sender<()>,
}

impl Device {
    /// The process-wide device, created on first use.
    pub async fn shared() -> Result<Arc<Device>, Error> {
        if let Some(existing) = SHARED.lock().expect("device registry poisoned").as_ref() {
            return Ok(existing.clone());
        }
        let created = Arc::new(Device::create().await?);
        let mut slot = SHARED.lock().expect("device registry poisoned");
        match slot.as_ref() {
            // a concurrent caller won the race; use theirs
            Some(existing) => Ok(existing.clone()),
            None => {
                *slot = Some(created.clone());
                Ok(created)
            }
        }
    }

    async fn create() -> Result<Device, Error> {
        let instance = wgpu::Instance::new(&wgpu::InstanceDescriptor::from_env_or_default());
        let adapter = instance
            .request_adapter(&wgpu::RequestAdapterOptions {
                power_preference: Default::default(),
                force_fallback_adapter: false,
                compatible_surface: None,
            })
            .await
            .map_err(|_| Error::NoAdapter)?;

        let supported = adapter.limits();
        let mut limits = Limits::default();
        limits.max_texture_dimension_2d = supported
            .max_texture_dimension_2d
            .min(geometry::MAX_EXTENT_2D);
        limits.max_texture_dimension_3d = supported
            .max_texture_dimension_3d
            .min(geometry::MAX_EXTENT_3D);

        // Swapped-channel storage writes are gated on the device; take the
        // capability when the adapter offers it.
        let mut features = wgpu::Features::empty();
        if adapter
            .features()
            .contains(wgpu::Features::BGRA8UNORM_STORAGE)
        {
            features |= wgpu::Features::BGRA8UNORM_STORAGE;
        }

        let descriptor = wgpu::DeviceDescriptor {
            label: wgpu::Label::from("textures_and_frames shared device"),
            required_features: features,
            required_limits: limits,
            memory_hints: Default::default(),
            trace: Trace::Off,
        };
        let (device, queue) = adapter
            .request_device(&descriptor)
            .await
            .map_err(|e| Error::RequestDeviceFailed(e.to_string()))?;

        let poll_shutdown = Arc::new(AtomicBool::new(false));
        let shutdown_clone = poll_shutdown.clone();
        let (poll_sender, poll_receiver): (Sender<()>, Receiver<()>) = mpsc::channel();
        let poll_device = device.clone();
        let poll_thread = thread::Builder::new()
            .name("wgpu_poll".to_string())
            .spawn(move || {
                while !shutdown_clone.load(Ordering::Relaxed) {
                    match poll_receiver.recv() {
                        Ok(_) => {
                            // Poll until the queue is empty
                            let _ = poll_device.poll(PollType::Wait);
                        }
                        Err(_) => break, // Channel closed, exit thread
                    }
                }
            })
            .map_err(|e| Error::RequestDeviceFailed(e.to_string()))?;

        logwise::info_sync!("acquired shared GPU device");
        Ok(Device {
            device,
            queue,
            adapter,
            poll_thread: Some(poll_thread),
            poll_shutdown,
            poll_trigger: poll_sender,
        })
    }

    pub(crate) fn device(&self) -> &wgpu::Device {
        &self.device
    }

    pub(crate) fn queue(&self) -> &wgpu::Queue {
        &self.queue
    }

    #[allow(dead_code)]
    pub(crate) fn adapter(&self) -> &wgpu::Adapter {
        &self.adapter
    }

    /// The largest 2D extent this device accepts.
    pub fn max_extent_2d(&self) -> u32 {
        self.device.limits().max_texture_dimension_2d
    }

    /// The largest 3D extent this device accepts.
    pub fn max_extent_3d(&self) -> u32 {
        self.device.limits().max_texture_dimension_3d
    }

    pub(crate) fn supports_bgra_storage(&self) -> bool {
        self.device
            .features()
            .contains(wgpu::Features::BGRA8UNORM_STORAGE)
    }

    /// Signal the polling thread that GPU work may be ready.
    pub(crate) fn set_needs_poll(&self) {
        let _ = self.poll_trigger.send(());
    }

    /// Suspends until everything committed so far completes on the device.
    ///
    /// The continuation is fulfilled by the device-driven callback exactly
    /// once; there is no timeout and no cancellation.
    pub(crate) async fn wait_for_submit(&self) {
        let (s, r) = r#continue::continuation();
        self.queue.on_submitted_work_done(|| {
            s.send(());
        });
        self.set_needs_poll();
        r.await;
    }

    /// Closes an out-of-memory error scope opened around an allocation.
    pub(crate) async fn finish_allocation_scope(
        &self,
        what: impl FnOnce(String) -> Error,
    ) -> Result<(), Error> {
        let scope = self.device.pop_error_scope();
        self.set_needs_poll();
        match scope.await {
            None => Ok(()),
            Some(e) => Err(what(e.to_string())),
        }
    }
}

impl Drop for Device {
    fn drop(&mut self) {
        self.poll_shutdown.store(true, Ordering::Relaxed);
        let _ = self.poll_trigger.send(());
        if let Some(handle) = self.poll_thread.take() {
            let _ = handle.join();
        }
    }
}
