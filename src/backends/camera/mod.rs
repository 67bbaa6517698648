// SPDX-License-Identifier: MPL-2.0

//! Camera backend abstraction
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────┐
//! │    ScanSession      │
//! └──────────┬──────────┘
//!            │
//!            ▼
//! ┌─────────────────────┐
//! │     FrameSource     │  ← Owns at most one open handle
//! └──────────┬──────────┘
//!            │
//!            ▼
//! ┌─────────────────────┐
//! │ CameraBackend Trait │  ← Open / probe device indices
//! └──────────┬──────────┘
//!            │
//!       ┌────┴─────┐
//!       ▼          ▼
//!   ┌──────┐  ┌─────────┐
//!   │ V4L2 │  │ Virtual │
//!   └──────┘  └─────────┘
//! ```

pub mod format_converters;
pub mod manager;
pub mod types;
pub mod v4l2;

pub use manager::FrameSource;
pub use types::*;
pub use v4l2::V4l2Backend;

/// Camera backend trait
///
/// A backend knows how to turn a device index into an open handle, and how
/// to probe an index without keeping it open.
pub trait CameraBackend: Send + Sync {
    /// Open the device at `index`
    ///
    /// # Returns
    /// * `Ok(handle)` - Device is open and ready to deliver frames
    /// * `Err(BackendError)` - Device missing, busy, or in an unusable format
    fn open(&self, index: u32) -> BackendResult<Box<dyn CameraHandle>>;

    /// Probe a device index
    ///
    /// Opens the device, reads its resolution and closes it again.
    /// Returns `None` when nothing usable lives at `index`.
    fn probe(&self, index: u32) -> Option<CameraDevice>;

    /// Backend name for logging
    fn name(&self) -> &'static str;
}

/// An exclusively owned, open capture device
///
/// Dropping the handle releases the device.
pub trait CameraHandle: Send {
    /// Device index this handle is bound to
    fn index(&self) -> u32;

    /// Whether the device can currently deliver frames
    fn is_opened(&self) -> bool;

    /// Read one frame, blocking until the device delivers it
    fn read_frame(&mut self) -> BackendResult<CameraFrame>;

    /// Negotiated resolution (width, height)
    fn resolution(&self) -> (u32, u32);
}
