// SPDX-License-Identifier: GPL-3.0-only

//! Annotated frame encoding
//!
//! Frames leave the service as JPEG, either inline in a scan response or
//! written to disk by the one-shot `scan` command.

use crate::constants::encoding;
use crate::errors::{AppError, AppResult};
use image::RgbImage;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// JPEG encoder for annotated frames
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FrameEncoder {
    quality: u8,
}

impl Default for FrameEncoder {
    fn default() -> Self {
        Self::new(encoding::DEFAULT_JPEG_QUALITY)
    }
}

impl FrameEncoder {
    /// Create an encoder, clamping `quality` to 1-100
    pub fn new(quality: u8) -> Self {
        Self {
            quality: quality.clamp(1, 100),
        }
    }

    pub fn quality(&self) -> u8 {
        self.quality
    }

    /// Encode image as JPEG
    pub fn encode_jpeg(&self, image: &RgbImage) -> AppResult<Vec<u8>> {
        let mut buffer = Vec::new();
        let mut cursor = std::io::Cursor::new(&mut buffer);

        let mut encoder =
            image::codecs::jpeg::JpegEncoder::new_with_quality(&mut cursor, self.quality);

        encoder
            .encode(
                image.as_raw(),
                image.width(),
                image.height(),
                image::ExtendedColorType::Rgb8,
            )
            .map_err(|e| AppError::Other(format!("JPEG encoding failed: {}", e)))?;

        debug!(size = buffer.len(), quality = self.quality, "Encoded frame");
        Ok(buffer)
    }
}

/// Timestamped output path (`scan_YYYYMMDD_HHMMSS.jpg`) inside `dir`
pub fn timestamped_path(dir: &Path) -> PathBuf {
    let timestamp = chrono::Local::now().format("%Y%m%d_%H%M%S");
    dir.join(format!("scan_{}.jpg", timestamp))
}

/// Default directory for saved scans (`~/Pictures/camera-scanner`)
pub fn default_output_dir() -> PathBuf {
    dirs::picture_dir()
        .or_else(dirs::home_dir)
        .unwrap_or_else(|| PathBuf::from("."))
        .join("camera-scanner")
}

/// Write encoded bytes to disk, creating parent directories
pub async fn save(data: Vec<u8>, path: PathBuf) -> AppResult<PathBuf> {
    info!(path = %path.display(), "Saving annotated frame");

    let target = path.clone();
    tokio::task::spawn_blocking(move || -> AppResult<()> {
        if let Some(parent) = target.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(&target, &data)?;
        Ok(())
    })
    .await
    .map_err(|e| AppError::Other(format!("Save task error: {}", e)))??;

    info!(path = %path.display(), "Frame saved successfully");
    Ok(path)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_encodes_jpeg_magic() {
        let image = RgbImage::from_pixel(16, 8, image::Rgb([10, 200, 30]));
        let data = FrameEncoder::default().encode_jpeg(&image).unwrap();
        assert_eq!(&data[..2], &[0xFF, 0xD8]);
    }

    #[test]
    fn test_empty_image_is_an_error() {
        let image = RgbImage::new(0, 0);
        let err = FrameEncoder::default().encode_jpeg(&image).unwrap_err();
        assert!(matches!(err, AppError::Other(ref msg) if msg.starts_with("JPEG encoding failed")));
    }

    #[test]
    fn test_quality_is_clamped() {
        assert_eq!(FrameEncoder::new(0).quality(), 1);
        assert_eq!(FrameEncoder::new(255).quality(), 100);
    }

    #[test]
    fn test_timestamped_path_shape() {
        let path = timestamped_path(Path::new("/tmp/out"));
        let name = path.file_name().unwrap().to_string_lossy().into_owned();
        assert!(name.starts_with("scan_"));
        assert!(name.ends_with(".jpg"));
        assert_eq!(path.parent(), Some(Path::new("/tmp/out")));
    }

    #[tokio::test]
    async fn test_save_creates_parent_dirs() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("frame.jpg");
        let saved = save(vec![1, 2, 3], path.clone()).await.unwrap();
        assert_eq!(saved, path);
        assert_eq!(std::fs::read(&path).unwrap(), vec![1, 2, 3]);
    }
}
