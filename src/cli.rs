// SPDX-License-Identifier: GPL-3.0-only

//! CLI commands
//!
//! This module provides command-line functionality for:
//! - Running the HTTP API
//! - Listing available cameras
//! - Scanning a single frame to a file

use camera_scanner::backends::camera::{CameraBackend, V4l2Backend};
use camera_scanner::backends::virtual_camera::{
    VirtualCameraBackend, VirtualDevice, load_image_as_frame,
};
use camera_scanner::encoding;
use camera_scanner::errors::{AppError, AppResult, CameraError};
use camera_scanner::session::SystemClock;
use camera_scanner::{Config, QrDetector, ScanSession};
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// Attempts before a one-shot scan gives up waiting for a frame
const SCAN_ATTEMPTS: usize = 5;

type CliResult = Result<(), Box<dyn std::error::Error>>;

/// Build a session on V4L2 devices, or on a still image served as camera 0
fn build_session(config: &Config, image: Option<&Path>) -> AppResult<ScanSession> {
    let backend: Box<dyn CameraBackend> = match image {
        Some(path) => {
            let frame = load_image_as_frame(path)?;
            tracing::info!(path = %path.display(), "Serving image as virtual camera 0");
            Box::new(VirtualCameraBackend::new().with_device(0, VirtualDevice::still(frame)))
        }
        None => Box::new(V4l2Backend::new()),
    };

    Ok(ScanSession::new(
        backend,
        Box::new(QrDetector::with_max_dimension(config.decoder_max_dimension)),
        Arc::new(SystemClock),
        config,
    ))
}

/// Run the HTTP API until Ctrl+C
pub async fn serve(config: Config, image: Option<PathBuf>) -> CliResult {
    let session = build_session(&config, image.as_deref())?.into_shared();
    camera_scanner::server::serve(&config, session).await?;
    Ok(())
}

/// List all available cameras
pub async fn list_cameras(config: &Config) -> CliResult {
    let session = build_session(config, None)?;
    let cameras = tokio::task::spawn_blocking(move || session.enumerate_cameras()).await?;

    if cameras.is_empty() {
        println!("No cameras found.");
        return Ok(());
    }

    println!("Available cameras:");
    println!();
    for camera in &cameras {
        println!("  [{}] {}", camera.index, camera.name);
        if let Some(card) = &camera.card {
            println!("      Device: {}", card);
        }
        println!("      Resolution: {}", camera.resolution_label());
        println!();
    }

    Ok(())
}

/// Capture one frame, print decoded symbols and save the annotated image
pub async fn scan_once(config: &Config, camera_index: u32, output: Option<PathBuf>) -> CliResult {
    let mut session = build_session(config, None)?;

    let outcome = tokio::task::spawn_blocking(move || {
        if !session.start(Some(camera_index)) {
            return Err(AppError::Camera(CameraError::StartFailed(camera_index)));
        }
        println!("Capturing from camera {}...", camera_index);

        for _ in 0..SCAN_ATTEMPTS {
            let outcome = session.perform_scan();
            if outcome.frame_captured {
                return Ok(outcome);
            }
        }
        Err(AppError::Camera(CameraError::NoFrameAvailable))
    })
    .await??;

    if outcome.reported_symbols.is_empty() {
        println!("No codes found.");
    } else {
        println!("Found {} code(s):", outcome.reported_symbols.len());
        for symbol in &outcome.reported_symbols {
            println!("  {}", symbol.label());
        }
    }

    let data = outcome
        .encoded_frame
        .ok_or_else(|| AppError::Other("Failed to encode annotated frame".to_string()))?;
    let path = match output {
        Some(path) if path.is_dir() => encoding::timestamped_path(&path),
        Some(path) => path,
        None => encoding::timestamped_path(&encoding::default_output_dir()),
    };

    let saved = encoding::save(data, path).await?;
    println!("Saved: {}", saved.display());
    Ok(())
}
