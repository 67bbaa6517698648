// SPDX-License-Identifier: GPL-3.0-only

//! QR code detection task
//!
//! This module implements QR code detection using the rqrr crate.
//! Frames are converted to grayscale, optionally downscaled, searched for
//! QR grids, and every grid that decodes is reported with its four corners
//! mapped back to the original frame's pixel coordinates.

use crate::backends::camera::types::CameraFrame;
use crate::constants::detection;
use crate::frame_processor::SymbolDecoder;
use crate::frame_processor::types::{DetectedSymbol, Point};
use image::GrayImage;
use image::imageops::{self, FilterType};
use tracing::{debug, trace, warn};

/// QR code detector
///
/// Analyzes camera frames to detect and decode QR codes.
/// Large frames are downscaled before searching.
#[derive(Debug, Clone)]
pub struct QrDetector {
    /// Maximum dimension for processing (frames are downscaled to this)
    max_dimension: u32,
}

impl Default for QrDetector {
    fn default() -> Self {
        Self::new()
    }
}

impl QrDetector {
    /// Create a new QR detector with default settings
    pub fn new() -> Self {
        Self {
            max_dimension: detection::DEFAULT_MAX_DIMENSION,
        }
    }

    /// Create a QR detector with custom max dimension
    pub fn with_max_dimension(max_dimension: u32) -> Self {
        Self {
            max_dimension: max_dimension.max(1),
        }
    }

    pub fn max_dimension(&self) -> u32 {
        self.max_dimension
    }
}

impl SymbolDecoder for QrDetector {
    fn decode(&self, frame: &CameraFrame) -> Vec<DetectedSymbol> {
        match frame.to_luma_image() {
            Some(gray) => detect_sync(&gray, self.max_dimension),
            None => {
                warn!(
                    width = frame.width,
                    height = frame.height,
                    "Frame data does not match its dimensions, skipping detection"
                );
                Vec::new()
            }
        }
    }
}

/// Downscale so neither side exceeds `max_dimension`
///
/// Returns the image to search and the factor that maps its coordinates
/// back to the source.
fn prepare_for_detection(gray: &GrayImage, max_dimension: u32) -> (GrayImage, f32) {
    let (width, height) = gray.dimensions();
    if width <= max_dimension && height <= max_dimension {
        return (gray.clone(), 1.0);
    }

    let scale = (width as f32 / max_dimension as f32).max(height as f32 / max_dimension as f32);
    let new_width = ((width as f32 / scale) as u32).max(1);
    let new_height = ((height as f32 / scale) as u32).max(1);
    let resized = imageops::resize(gray, new_width, new_height, FilterType::Triangle);
    (resized, scale)
}

/// Synchronous QR detection
fn detect_sync(gray: &GrayImage, max_dimension: u32) -> Vec<DetectedSymbol> {
    let start = std::time::Instant::now();

    let (proc_image, scale) = prepare_for_detection(gray, max_dimension);
    let (proc_width, proc_height) = proc_image.dimensions();

    trace!(
        proc_width,
        proc_height,
        scale,
        conversion_ms = start.elapsed().as_millis(),
        "Prepared grayscale image for processing"
    );

    let mut prepared = rqrr::PreparedImage::prepare_from_greyscale(
        proc_width as usize,
        proc_height as usize,
        |x, y| proc_image.get_pixel(x as u32, y as u32).0[0],
    );
    let grids = prepared.detect_grids();

    trace!(count = grids.len(), "QR grid search complete");

    let mut detections = Vec::with_capacity(grids.len());
    for grid in grids {
        let content = match grid.decode() {
            Ok((_meta, content)) => content,
            Err(e) => {
                debug!(error = ?e, "Failed to decode QR code");
                continue;
            }
        };

        let boundary: Vec<Point> = grid
            .bounds
            .iter()
            .map(|corner| {
                Point::new(
                    (corner.x as f32 * scale).round() as i32,
                    (corner.y as f32 * scale).round() as i32,
                )
            })
            .collect();

        debug!(content = %content, corners = ?boundary, "Detected QR code");

        if let Some(symbol) = DetectedSymbol::new(detection::QR_KIND, content, boundary) {
            detections.push(symbol);
        }
    }

    if !detections.is_empty() {
        debug!(
            count = detections.len(),
            total_ms = start.elapsed().as_millis(),
            "QR detection found codes"
        );
    }

    detections
}
