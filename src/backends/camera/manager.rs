// SPDX-License-Identifier: GPL-3.0-only

//! Frame source: device handle lifecycle
//!
//! The source owns at most one open [`CameraHandle`] at a time. Opening a new
//! index always releases the previous handle first.

use super::types::*;
use super::{CameraBackend, CameraHandle};
use tracing::{debug, info, warn};

/// Single-handle frame source on top of a [`CameraBackend`]
pub struct FrameSource {
    /// Backend used to open and probe devices
    backend: Box<dyn CameraBackend>,
    /// The currently open device, if any
    handle: Option<Box<dyn CameraHandle>>,
}

impl FrameSource {
    /// Create a frame source with no device open
    pub fn new(backend: Box<dyn CameraBackend>) -> Self {
        info!(backend = backend.name(), "Creating frame source");
        Self {
            backend,
            handle: None,
        }
    }

    /// Open the device at `index`, releasing any open device first
    ///
    /// Returns whether the device is now ready to deliver frames.
    pub fn start(&mut self, index: u32) -> bool {
        self.release();

        match self.backend.open(index) {
            Ok(handle) => {
                let opened = handle.is_opened();
                let (width, height) = handle.resolution();
                info!(index, width, height, opened, "Camera opened");
                self.handle = Some(handle);
                opened
            }
            Err(e) => {
                warn!(index, error = %e, "Failed to open camera");
                false
            }
        }
    }

    /// Release the open device, if any
    pub fn stop(&mut self) {
        self.release();
    }

    fn release(&mut self) {
        if let Some(handle) = self.handle.take() {
            let index = handle.index();
            drop(handle);
            info!(index, "Camera released");
        }
    }

    /// Capture one frame from the open device
    ///
    /// Returns `None` when no device is open or the read fails; both are
    /// expected conditions that the caller recovers from by polling again.
    pub fn capture(&mut self) -> Option<CameraFrame> {
        let handle = self.handle.as_mut()?;
        if !handle.is_opened() {
            return None;
        }

        match handle.read_frame() {
            Ok(frame) => {
                debug!(
                    index = handle.index(),
                    width = frame.width,
                    height = frame.height,
                    "Frame captured"
                );
                Some(frame)
            }
            Err(e) => {
                warn!(index = handle.index(), error = %e, "Failed to read frame");
                None
            }
        }
    }

    /// Probe device indices `0..max_probe` and return the usable ones
    ///
    /// Each device is opened and closed again; results are not cached.
    pub fn enumerate(&self, max_probe: u32) -> Vec<CameraDevice> {
        let cameras: Vec<CameraDevice> = (0..max_probe)
            .filter_map(|index| self.backend.probe(index))
            .collect();

        debug!(max_probe, found = cameras.len(), "Camera enumeration complete");
        cameras
    }

    /// Whether a device is open and ready
    pub fn is_running(&self) -> bool {
        self.handle.as_ref().is_some_and(|h| h.is_opened())
    }

    /// Index of the open device
    pub fn current_index(&self) -> Option<u32> {
        self.handle.as_ref().map(|h| h.index())
    }
}

impl Drop for FrameSource {
    fn drop(&mut self) {
        self.release();
    }
}

impl std::fmt::Debug for FrameSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FrameSource")
            .field("backend", &self.backend.name())
            .field("current_index", &self.current_index())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backends::virtual_camera::{VirtualCameraBackend, VirtualDevice};

    fn source_with_devices(indices: &[u32]) -> (FrameSource, VirtualCameraBackend) {
        let mut backend = VirtualCameraBackend::new();
        for &index in indices {
            backend = backend.with_device(index, VirtualDevice::solid(64, 48, [40, 40, 40]));
        }
        (FrameSource::new(Box::new(backend.clone())), backend)
    }

    #[test]
    fn test_capture_without_device_is_none() {
        let (mut source, _) = source_with_devices(&[0]);
        assert!(source.capture().is_none());
        assert!(!source.is_running());
    }

    #[test]
    fn test_start_missing_device_fails() {
        let (mut source, _) = source_with_devices(&[0]);
        assert!(!source.start(3));
        assert!(source.capture().is_none());
    }

    #[test]
    fn test_restart_releases_previous_handle_first() {
        let (mut source, backend) = source_with_devices(&[0, 1]);
        assert!(source.start(0));
        assert!(source.start(1));

        let stats = backend.stats();
        assert_eq!(stats.opens(), 2);
        assert_eq!(stats.releases(), 1);
        assert_eq!(stats.peak_live(), 1);
        assert_eq!(source.current_index(), Some(1));
    }

    #[test]
    fn test_stop_is_idempotent() {
        let (mut source, backend) = source_with_devices(&[0]);
        source.stop();
        assert!(source.start(0));
        source.stop();
        source.stop();
        assert_eq!(backend.stats().live(), 0);
        assert_eq!(backend.stats().releases(), 1);
    }

    #[test]
    fn test_enumerate_skips_missing_indices() {
        let (source, _) = source_with_devices(&[0, 2]);
        let cameras = source.enumerate(5);
        let indices: Vec<u32> = cameras.iter().map(|c| c.index).collect();
        assert_eq!(indices, vec![0, 2]);
    }
}
