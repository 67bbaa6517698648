// SPDX-License-Identifier: GPL-3.0-only

//! Scan session management
//!
//! - [`cooldown`]: report gating after a successful scan
//! - [`hull`]: outline reduction for long detector polygons
//! - [`overlay`]: outline, label and countdown drawing
//! - [`manager`]: the per-request scan pipeline

pub mod cooldown;
pub mod hull;
pub mod manager;
pub mod overlay;

pub use cooldown::{Clock, CooldownGate, CooldownStatus, ManualClock, SystemClock};
pub use manager::{ScanOutcome, ScanSession, SharedSession, lock_session};
pub use overlay::OverlayRenderer;
