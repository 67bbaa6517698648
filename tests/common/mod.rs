// SPDX-License-Identifier: GPL-3.0-only

//! Shared fakes for integration tests

#![allow(dead_code)]

use camera_scanner::backends::camera::CameraFrame;
use camera_scanner::backends::virtual_camera::{VirtualCameraBackend, VirtualDevice};
use camera_scanner::session::ManualClock;
use camera_scanner::{Config, DetectedSymbol, Point, ScanSession, SymbolDecoder};
use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

/// Decoder that replays a script of per-frame results, then reports nothing
#[derive(Default)]
pub struct ScriptedDecoder {
    script: Mutex<VecDeque<Vec<DetectedSymbol>>>,
    calls: Arc<AtomicUsize>,
}

impl ScriptedDecoder {
    pub fn new(script: Vec<Vec<DetectedSymbol>>) -> Self {
        Self {
            script: Mutex::new(script.into()),
            calls: Arc::new(AtomicUsize::new(0)),
        }
    }

    /// Decoder that reports the same symbols `frames` times
    pub fn repeat(symbols: Vec<DetectedSymbol>, frames: usize) -> Self {
        Self::new(vec![symbols; frames])
    }

    /// Shared count of decode calls
    pub fn calls(&self) -> Arc<AtomicUsize> {
        Arc::clone(&self.calls)
    }
}

impl SymbolDecoder for ScriptedDecoder {
    fn decode(&self, _frame: &CameraFrame) -> Vec<DetectedSymbol> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.script.lock().unwrap().pop_front().unwrap_or_default()
    }
}

pub fn square(kind: &str, payload: &str) -> DetectedSymbol {
    DetectedSymbol::new(
        kind,
        payload,
        vec![
            Point::new(10, 10),
            Point::new(50, 10),
            Point::new(50, 50),
            Point::new(10, 50),
        ],
    )
    .unwrap()
}

/// Backend with solid-color cameras at the given indices
pub fn backend_with(indices: &[u32]) -> VirtualCameraBackend {
    indices.iter().fold(VirtualCameraBackend::new(), |backend, &index| {
        backend.with_device(index, VirtualDevice::solid(96, 72, [40, 40, 40]))
    })
}

/// Config with the given cooldown and everything else default
pub fn config_with_cooldown(cooldown_secs: f64) -> Config {
    Config {
        cooldown_secs,
        ..Config::default()
    }
}

pub fn session_with(
    backend: VirtualCameraBackend,
    decoder: ScriptedDecoder,
    clock: Arc<ManualClock>,
    config: &Config,
) -> ScanSession {
    ScanSession::new(Box::new(backend), Box::new(decoder), clock, config)
}
