// SPDX-License-Identifier: GPL-3.0-only
// Shared types for camera backend abstraction

//! Shared types for camera backends

use image::{GrayImage, RgbImage};
use serde::Serialize;
use std::sync::Arc;
use std::time::Instant;

/// Wire format requested from a capture device
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SourceFormat {
    /// Motion JPEG - every buffer is a complete JPEG image
    Mjpeg,
    /// YUYV - packed 4:2:2 (Y0 U Y1 V)
    Yuyv,
}

impl SourceFormat {
    /// Formats we try, most preferred first
    pub const PREFERRED: [SourceFormat; 2] = [SourceFormat::Mjpeg, SourceFormat::Yuyv];

    /// FourCC code for this format
    pub fn fourcc(&self) -> [u8; 4] {
        match self {
            Self::Mjpeg => *b"MJPG",
            Self::Yuyv => *b"YUYV",
        }
    }

    /// Parse a FourCC code reported by the device
    pub fn from_fourcc(code: &[u8; 4]) -> Option<Self> {
        match code {
            b"MJPG" | b"JPEG" => Some(Self::Mjpeg),
            b"YUYV" | b"YUY2" => Some(Self::Yuyv),
            _ => None,
        }
    }
}

impl std::fmt::Display for SourceFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Mjpeg => write!(f, "MJPG"),
            Self::Yuyv => write!(f, "YUYV"),
        }
    }
}

/// A camera found while probing device indices
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CameraDevice {
    /// Device index (`/dev/video<index>` for V4L2)
    pub index: u32,
    /// Display name reported to clients
    pub name: String,
    /// Card name from the driver, when known
    pub card: Option<String>,
    /// Native width in pixels
    pub width: u32,
    /// Native height in pixels
    pub height: u32,
}

impl CameraDevice {
    /// Create a device entry with the default `Camera <index>` display name
    pub fn new(index: u32, width: u32, height: u32) -> Self {
        Self {
            index,
            name: format!("Camera {}", index),
            card: None,
            width,
            height,
        }
    }

    /// Attach the driver's card name
    pub fn with_card(mut self, card: impl Into<String>) -> Self {
        let card = card.into();
        self.card = if card.is_empty() { None } else { Some(card) };
        self
    }

    /// Resolution as `<width>x<height>`
    pub fn resolution_label(&self) -> String {
        format!("{}x{}", self.width, self.height)
    }
}

/// A single frame from the camera
///
/// Backends convert whatever the device delivers (MJPEG, YUYV) to tightly
/// packed RGB24 before the frame leaves the backend.
#[derive(Debug, Clone)]
pub struct CameraFrame {
    pub width: u32,
    pub height: u32,
    /// RGB24 pixel data, `width * 3` bytes per row
    pub data: Arc<[u8]>,
    /// Timestamp when frame was captured (for latency diagnostics)
    pub captured_at: Instant,
}

impl CameraFrame {
    /// Wrap an RGB image without copying its pixels again
    pub fn from_rgb(image: RgbImage) -> Self {
        let (width, height) = image.dimensions();
        Self {
            width,
            height,
            data: Arc::from(image.into_raw().into_boxed_slice()),
            captured_at: Instant::now(),
        }
    }

    /// Convert to an owned RGB image
    ///
    /// Returns `None` when the buffer does not match the advertised geometry.
    pub fn to_rgb_image(&self) -> Option<RgbImage> {
        RgbImage::from_raw(self.width, self.height, self.data.to_vec())
            .filter(|_| self.data.len() == (self.width * self.height * 3) as usize)
    }

    /// Convert to an 8-bit luma image (for symbol detection)
    pub fn to_luma_image(&self) -> Option<GrayImage> {
        self.to_rgb_image()
            .map(|rgb| image::DynamicImage::ImageRgb8(rgb).to_luma8())
    }
}

/// Result type for backend operations
pub type BackendResult<T> = Result<T, BackendError>;

/// Error types for backend operations
#[derive(Debug, Clone, PartialEq)]
pub enum BackendError {
    /// Camera device not found or could not be opened
    DeviceNotFound(String),
    /// Device delivered a format we cannot convert
    FormatNotSupported(String),
    /// No frame could be read from an open device
    CaptureFailed(String),
    /// General I/O error
    IoError(String),
    /// Other errors
    Other(String),
}

impl std::fmt::Display for BackendError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            BackendError::DeviceNotFound(msg) => write!(f, "Device not found: {}", msg),
            BackendError::FormatNotSupported(msg) => write!(f, "Format not supported: {}", msg),
            BackendError::CaptureFailed(msg) => write!(f, "Capture failed: {}", msg),
            BackendError::IoError(msg) => write!(f, "I/O error: {}", msg),
            BackendError::Other(msg) => write!(f, "Error: {}", msg),
        }
    }
}

impl std::error::Error for BackendError {}

impl From<std::io::Error> for BackendError {
    fn from(err: std::io::Error) -> Self {
        BackendError::IoError(err.to_string())
    }
}
