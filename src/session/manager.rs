// SPDX-License-Identifier: GPL-3.0-only

//! Scan session: capture, decode, gate, annotate, encode
//!
//! One [`ScanSession`] owns the frame source and the cooldown gate for the
//! lifetime of the service. Handlers share it as a [`SharedSession`]; the
//! mutex serializes every call that touches the device handle.

use super::cooldown::{Clock, CooldownGate, CooldownStatus};
use super::overlay::OverlayRenderer;
use crate::backends::camera::{CameraBackend, CameraDevice, FrameSource};
use crate::config::Config;
use crate::encoding::FrameEncoder;
use crate::frame_processor::{DetectedSymbol, SymbolDecoder};
use std::sync::{Arc, Mutex, MutexGuard};
use tracing::{debug, info, warn};

/// Session shared between request handlers
pub type SharedSession = Arc<Mutex<ScanSession>>;

/// Lock a shared session, recovering from a poisoned mutex
///
/// A panic in one request must not take the scanner down for every later
/// request; the session state stays consistent between calls.
pub fn lock_session(session: &SharedSession) -> MutexGuard<'_, ScanSession> {
    session.lock().unwrap_or_else(|poisoned| {
        warn!("Scan session mutex was poisoned, recovering");
        poisoned.into_inner()
    })
}

/// Result of one [`ScanSession::perform_scan`] call
#[derive(Debug, Clone, PartialEq)]
pub struct ScanOutcome {
    /// Annotated frame as JPEG, `None` if no frame or encoding failed
    pub encoded_frame: Option<Vec<u8>>,
    /// Symbols reported to the caller (empty while resting)
    pub reported_symbols: Vec<DetectedSymbol>,
    /// Gate state after this scan
    pub can_scan: bool,
    /// Seconds until results are reported again
    pub time_until_next_scan: f64,
    /// Whether the source delivered a frame at all
    pub frame_captured: bool,
    /// Symbols detected and drawn, reported or not
    pub detected_count: usize,
}

/// Long-lived scanner state
pub struct ScanSession {
    source: FrameSource,
    decoder: Box<dyn SymbolDecoder>,
    clock: Arc<dyn Clock>,
    gate: CooldownGate,
    renderer: OverlayRenderer,
    encoder: FrameEncoder,
    default_index: u32,
    max_probe: u32,
}

impl ScanSession {
    pub fn new(
        backend: Box<dyn CameraBackend>,
        decoder: Box<dyn SymbolDecoder>,
        clock: Arc<dyn Clock>,
        config: &Config,
    ) -> Self {
        info!(
            cooldown_secs = config.cooldown_secs,
            jpeg_quality = config.jpeg_quality,
            "Creating scan session"
        );
        Self {
            source: FrameSource::new(backend),
            decoder,
            clock,
            gate: CooldownGate::new(config.cooldown_secs),
            renderer: OverlayRenderer::new(),
            encoder: FrameEncoder::new(config.jpeg_quality),
            default_index: config.default_camera_index,
            max_probe: config.max_probe,
        }
    }

    /// Wrap into a [`SharedSession`]
    pub fn into_shared(self) -> SharedSession {
        Arc::new(Mutex::new(self))
    }

    /// Open `index` (or the configured default), replacing any open device
    pub fn start(&mut self, index: Option<u32>) -> bool {
        self.source.start(index.unwrap_or(self.default_index))
    }

    /// Release the open device; no-op when none is open
    pub fn stop(&mut self) {
        self.source.stop();
    }

    pub fn is_running(&self) -> bool {
        self.source.is_running()
    }

    pub fn current_index(&self) -> Option<u32> {
        self.source.current_index()
    }

    /// Probe the configured number of device indices
    pub fn enumerate_cameras(&self) -> Vec<CameraDevice> {
        self.source.enumerate(self.max_probe)
    }

    pub fn cooldown_status(&self) -> CooldownStatus {
        self.gate.status(self.clock.now())
    }

    /// Capture one frame, decode it, gate the results and annotate it
    ///
    /// Decoding runs on every captured frame so the overlay always shows
    /// live detections. Results are only reported while the gate is ready,
    /// and only a non-empty report starts a new cooldown.
    pub fn perform_scan(&mut self) -> ScanOutcome {
        let Some(frame) = self.source.capture() else {
            let status = self.cooldown_status();
            debug!("No frame available for scan");
            return ScanOutcome {
                encoded_frame: None,
                reported_symbols: Vec::new(),
                can_scan: status.can_scan,
                time_until_next_scan: status.time_until_next_scan,
                frame_captured: false,
                detected_count: 0,
            };
        };

        let gate_was_ready = self.gate.can_scan(self.clock.now());
        let detected = self.decoder.decode(&frame);

        let reported_symbols = if gate_was_ready {
            if !detected.is_empty() {
                let now = self.clock.now();
                self.gate.record_scan(now);
                info!(
                    count = detected.len(),
                    cooldown_secs = self.gate.duration(),
                    "Reported scan results, cooldown started"
                );
            }
            detected.clone()
        } else {
            if !detected.is_empty() {
                debug!(count = detected.len(), "Withholding detections while resting");
            }
            Vec::new()
        };

        let now = self.clock.now();
        let can_scan = self.gate.can_scan(now);
        let time_until_next_scan = self.gate.time_remaining(now);

        let encoded_frame = match frame.to_rgb_image() {
            Some(mut image) => {
                let resting = (!gate_was_ready).then_some(time_until_next_scan);
                self.renderer.render(&mut image, &detected, resting);
                match self.encoder.encode_jpeg(&image) {
                    Ok(data) => Some(data),
                    Err(e) => {
                        warn!(error = %e, "Failed to encode annotated frame");
                        None
                    }
                }
            }
            None => {
                warn!(
                    width = frame.width,
                    height = frame.height,
                    "Frame buffer does not match its dimensions"
                );
                None
            }
        };

        ScanOutcome {
            encoded_frame,
            reported_symbols,
            can_scan,
            time_until_next_scan,
            frame_captured: true,
            detected_count: detected.len(),
        }
    }
}

impl std::fmt::Debug for ScanSession {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ScanSession")
            .field("source", &self.source)
            .field("gate", &self.gate)
            .field("encoder", &self.encoder)
            .finish_non_exhaustive()
    }
}
