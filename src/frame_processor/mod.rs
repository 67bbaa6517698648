// SPDX-License-Identifier: MPL-2.0

//! Frame processor module for symbol detection
//!
//! Detection sits behind the [`SymbolDecoder`] trait so the scan session
//! can run against a real decoder or a deterministic stand-in.

pub mod tasks;
pub mod types;

pub use tasks::qr_detector::QrDetector;
pub use types::{DetectedSymbol, Point};

use crate::backends::camera::CameraFrame;

/// Symbol decoding capability
///
/// Implementations are pure functions of the frame's pixels and hold no
/// per-frame state.
pub trait SymbolDecoder: Send + Sync {
    /// Detect and decode every symbol in `frame`
    fn decode(&self, frame: &CameraFrame) -> Vec<DetectedSymbol>;
}
