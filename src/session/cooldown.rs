// SPDX-License-Identifier: GPL-3.0-only

//! Scan cooldown gate
//!
//! After a scan reports at least one symbol, further results are withheld
//! until the cooldown duration has elapsed. Detection and overlay rendering
//! keep running while resting; only reporting is gated.

use serde::Serialize;
use std::sync::Mutex;

/// Wall-clock source in epoch seconds
pub trait Clock: Send + Sync {
    fn now(&self) -> f64;
}

/// System wall clock
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> f64 {
        chrono::Utc::now().timestamp_micros() as f64 / 1_000_000.0
    }
}

/// Manually advanced clock for deterministic tests and replays
#[derive(Debug, Default)]
pub struct ManualClock {
    now: Mutex<f64>,
}

impl ManualClock {
    pub fn new(start: f64) -> Self {
        Self {
            now: Mutex::new(start),
        }
    }

    pub fn set(&self, secs: f64) {
        *self.now.lock().unwrap_or_else(|e| e.into_inner()) = secs;
    }

    pub fn advance(&self, secs: f64) {
        *self.now.lock().unwrap_or_else(|e| e.into_inner()) += secs;
    }
}

impl Clock for ManualClock {
    fn now(&self) -> f64 {
        *self.now.lock().unwrap_or_else(|e| e.into_inner())
    }
}

/// Snapshot of the gate for status reporting
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct CooldownStatus {
    pub can_scan: bool,
    pub time_until_next_scan: f64,
    pub cooldown_duration: f64,
}

/// Two-state gate: READY reports results, RESTING withholds them
#[derive(Debug, Clone, PartialEq)]
pub struct CooldownGate {
    /// Epoch seconds of the last reported detection
    last_scan: Option<f64>,
    duration: f64,
}

impl CooldownGate {
    /// Create a gate that starts READY
    pub fn new(duration: f64) -> Self {
        Self {
            last_scan: None,
            duration: duration.max(0.0),
        }
    }

    pub fn duration(&self) -> f64 {
        self.duration
    }

    pub fn last_scan(&self) -> Option<f64> {
        self.last_scan
    }

    pub fn can_scan(&self, now: f64) -> bool {
        match self.last_scan {
            Some(last) => now - last >= self.duration,
            None => true,
        }
    }

    /// Seconds until the gate is READY again, 0 while READY
    pub fn time_remaining(&self, now: f64) -> f64 {
        match self.last_scan {
            Some(last) => (self.duration - (now - last)).max(0.0),
            None => 0.0,
        }
    }

    /// Enter RESTING, starting at `now`
    pub fn record_scan(&mut self, now: f64) {
        self.last_scan = Some(now);
    }

    pub fn status(&self, now: f64) -> CooldownStatus {
        CooldownStatus {
            can_scan: self.can_scan(now),
            time_until_next_scan: self.time_remaining(now),
            cooldown_duration: self.duration,
        }
    }
}
