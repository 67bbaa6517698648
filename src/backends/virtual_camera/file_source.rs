// SPDX-License-Identifier: GPL-3.0-only

//! Still image loading for virtual cameras

use crate::backends::camera::types::{BackendError, BackendResult, CameraFrame};
use crate::constants::file_formats;
use std::path::Path;
use tracing::info;

/// Load an image file and convert it to a CameraFrame
///
/// Supports common image formats: PNG, JPEG, GIF, BMP, WebP
pub fn load_image_as_frame(path: &Path) -> BackendResult<CameraFrame> {
    let extension = path
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_lowercase())
        .unwrap_or_default();

    if !file_formats::is_image_extension(&extension) {
        return Err(BackendError::Other(format!(
            "Unsupported file format: {}",
            extension
        )));
    }

    info!(path = %path.display(), "Loading image file");

    let img = image::open(path).map_err(|e| {
        BackendError::Other(format!("Failed to load image '{}': {}", path.display(), e))
    })?;

    let rgb = img.to_rgb8();
    info!(width = rgb.width(), height = rgb.height(), "Image loaded successfully");

    Ok(CameraFrame::from_rgb(rgb))
}
