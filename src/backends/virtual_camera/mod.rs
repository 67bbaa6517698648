// SPDX-License-Identifier: GPL-3.0-only

//! Virtual camera backend
//!
//! Serves frames from memory instead of real hardware. Each virtual device
//! sits at a fixed index and cycles through its frames on every read. The
//! backend keeps shared open/release counters so callers can check that
//! handles are released before new ones are opened.
//!
//! Used by `camera-scanner serve --image <path>` and by the test suite.

mod file_source;

pub use file_source::load_image_as_frame;

use crate::backends::camera::types::{BackendError, BackendResult, CameraDevice, CameraFrame};
use crate::backends::camera::{CameraBackend, CameraHandle};
use image::{Rgb, RgbImage};
use std::collections::BTreeMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Instant;
use tracing::debug;

/// A device served by [`VirtualCameraBackend`]
#[derive(Debug, Clone)]
pub struct VirtualDevice {
    /// Frames returned round-robin
    frames: Vec<CameraFrame>,
    /// Every read fails when set (simulates an unplugged camera)
    fail_reads: bool,
}

impl VirtualDevice {
    /// Device cycling through the given frames
    pub fn from_frames(frames: Vec<CameraFrame>) -> Self {
        Self {
            frames,
            fail_reads: false,
        }
    }

    /// Device serving a single still frame
    pub fn still(frame: CameraFrame) -> Self {
        Self::from_frames(vec![frame])
    }

    /// Device serving a uniformly colored frame
    pub fn solid(width: u32, height: u32, color: [u8; 3]) -> Self {
        Self::still(CameraFrame::from_rgb(RgbImage::from_pixel(
            width,
            height,
            Rgb(color),
        )))
    }

    /// Make every read on this device fail
    pub fn failing_reads(mut self) -> Self {
        self.fail_reads = true;
        self
    }

    fn resolution(&self) -> (u32, u32) {
        self.frames
            .first()
            .map(|f| (f.width, f.height))
            .unwrap_or((0, 0))
    }
}

/// Open/release counters shared by a backend and all of its handles
#[derive(Debug, Default)]
pub struct VirtualStats {
    opens: AtomicUsize,
    releases: AtomicUsize,
    live: AtomicUsize,
    peak_live: AtomicUsize,
    reads: AtomicUsize,
}

impl VirtualStats {
    /// Successful opens so far
    pub fn opens(&self) -> usize {
        self.opens.load(Ordering::SeqCst)
    }

    /// Handles released so far
    pub fn releases(&self) -> usize {
        self.releases.load(Ordering::SeqCst)
    }

    /// Handles currently open
    pub fn live(&self) -> usize {
        self.live.load(Ordering::SeqCst)
    }

    /// Highest number of handles that were open at the same time
    pub fn peak_live(&self) -> usize {
        self.peak_live.load(Ordering::SeqCst)
    }

    /// Frame reads attempted
    pub fn reads(&self) -> usize {
        self.reads.load(Ordering::SeqCst)
    }

    fn record_open(&self) {
        self.opens.fetch_add(1, Ordering::SeqCst);
        let live = self.live.fetch_add(1, Ordering::SeqCst) + 1;
        self.peak_live.fetch_max(live, Ordering::SeqCst);
    }

    fn record_release(&self) {
        self.releases.fetch_add(1, Ordering::SeqCst);
        self.live.fetch_sub(1, Ordering::SeqCst);
    }
}

/// In-memory camera backend
#[derive(Debug, Clone, Default)]
pub struct VirtualCameraBackend {
    devices: Arc<BTreeMap<u32, VirtualDevice>>,
    stats: Arc<VirtualStats>,
}

impl VirtualCameraBackend {
    /// Backend with no devices
    pub fn new() -> Self {
        Self::default()
    }

    /// Add (or replace) the device at `index`
    pub fn with_device(self, index: u32, device: VirtualDevice) -> Self {
        let mut devices = (*self.devices).clone();
        devices.insert(index, device);
        Self {
            devices: Arc::new(devices),
            stats: self.stats,
        }
    }

    /// Shared open/release counters
    pub fn stats(&self) -> Arc<VirtualStats> {
        Arc::clone(&self.stats)
    }
}

impl CameraBackend for VirtualCameraBackend {
    fn open(&self, index: u32) -> BackendResult<Box<dyn CameraHandle>> {
        let device = self
            .devices
            .get(&index)
            .ok_or_else(|| BackendError::DeviceNotFound(format!("virtual camera {}", index)))?;

        self.stats.record_open();
        debug!(index, live = self.stats.live(), "Virtual camera opened");

        Ok(Box::new(VirtualHandle {
            index,
            device: device.clone(),
            next_frame: 0,
            stats: Arc::clone(&self.stats),
        }))
    }

    fn probe(&self, index: u32) -> Option<CameraDevice> {
        let device = self.devices.get(&index)?;
        let (width, height) = device.resolution();
        Some(CameraDevice::new(index, width, height).with_card("Virtual Camera"))
    }

    fn name(&self) -> &'static str {
        "virtual"
    }
}

struct VirtualHandle {
    index: u32,
    device: VirtualDevice,
    next_frame: usize,
    stats: Arc<VirtualStats>,
}

impl CameraHandle for VirtualHandle {
    fn index(&self) -> u32 {
        self.index
    }

    fn is_opened(&self) -> bool {
        !self.device.frames.is_empty()
    }

    fn read_frame(&mut self) -> BackendResult<CameraFrame> {
        self.stats.reads.fetch_add(1, Ordering::SeqCst);

        if self.device.fail_reads {
            return Err(BackendError::CaptureFailed("virtual read failure".into()));
        }

        let count = self.device.frames.len();
        let frame = self
            .device
            .frames
            .get(self.next_frame % count.max(1))
            .ok_or_else(|| BackendError::CaptureFailed("virtual camera has no frames".into()))?;
        self.next_frame = self.next_frame.wrapping_add(1);

        let mut frame = frame.clone();
        frame.captured_at = Instant::now();
        Ok(frame)
    }

    fn resolution(&self) -> (u32, u32) {
        self.device.resolution()
    }
}

impl Drop for VirtualHandle {
    fn drop(&mut self) {
        self.stats.record_release();
        debug!(index = self.index, "Virtual camera released");
    }
}
