// SPDX-License-Identifier: GPL-3.0-only
//! Pixel format conversion for raw capture buffers
//!
//! V4L2 devices hand us either complete JPEG images (MJPEG) or packed YUV
//! 4:2:2. Both are normalised to tightly packed RGB24 here.

use super::types::{BackendError, BackendResult, SourceFormat};
use image::{ImageFormat, RgbImage};

/// Convert a raw capture buffer in `format` to an RGB image
pub fn to_rgb(
    format: SourceFormat,
    data: &[u8],
    width: u32,
    height: u32,
) -> BackendResult<RgbImage> {
    match format {
        SourceFormat::Mjpeg => mjpeg_to_rgb(data),
        SourceFormat::Yuyv => {
            let rgb = yuyv_to_rgb(data, width, height);
            RgbImage::from_raw(width, height, rgb).ok_or_else(|| {
                BackendError::CaptureFailed(format!(
                    "Short YUYV buffer: {} bytes for {}x{}",
                    data.len(),
                    width,
                    height
                ))
            })
        }
    }
}

/// Decode one MJPEG buffer
pub fn mjpeg_to_rgb(data: &[u8]) -> BackendResult<RgbImage> {
    image::load_from_memory_with_format(data, ImageFormat::Jpeg)
        .map(|img| img.to_rgb8())
        .map_err(|e| BackendError::CaptureFailed(format!("MJPEG decode failed: {}", e)))
}

/// Convert YUYV (YUV 4:2:2) to RGB24
///
/// YUYV format: Y0 U0 Y1 V0 - each 4-byte group encodes 2 pixels.
/// Uses BT.601 coefficients for YUV to RGB conversion.
pub fn yuyv_to_rgb(data: &[u8], width: u32, height: u32) -> Vec<u8> {
    let pixel_count = (width * height) as usize;
    let mut rgb = Vec::with_capacity(pixel_count * 3);

    'outer: for chunk in data.chunks_exact(4) {
        let y0 = chunk[0] as f32;
        let u = chunk[1] as f32 - 128.0;
        let y1 = chunk[2] as f32;
        let v = chunk[3] as f32 - 128.0;

        for y in [y0, y1] {
            if rgb.len() >= pixel_count * 3 {
                break 'outer;
            }

            rgb.push((y + 1.402 * v).clamp(0.0, 255.0) as u8);
            rgb.push((y - 0.344 * u - 0.714 * v).clamp(0.0, 255.0) as u8);
            rgb.push((y + 1.772 * u).clamp(0.0, 255.0) as u8);
        }
    }

    rgb
}
