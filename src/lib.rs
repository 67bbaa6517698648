// SPDX-License-Identifier: MPL-2.0

//! Camera Scanner - a local HTTP API for webcam barcode and QR code scanning
//!
//! A client starts a camera, polls single frames, and receives each frame
//! annotated with outlines around detected symbols together with the decoded
//! payloads. After a successful scan, results are withheld for a cooldown
//! period while detections keep being drawn, so the operator can move the
//! next item into view.
//!
//! # Architecture
//!
//! - [`backends`]: Camera device access (V4L2 and virtual devices)
//! - [`frame_processor`]: Symbol detection behind the [`SymbolDecoder`] trait
//! - [`session`]: Cooldown gate, overlay rendering and the scan pipeline
//! - [`encoding`]: JPEG encoding of annotated frames
//! - [`server`]: warp routes over a shared [`ScanSession`]
//! - [`config`]: TOML configuration with command-line overrides

pub mod backends;
pub mod config;
pub mod constants;
pub mod encoding;
pub mod errors;
pub mod frame_processor;
pub mod server;
pub mod session;

// Re-export commonly used types
pub use config::Config;
pub use errors::{AppError, AppResult};
pub use frame_processor::{DetectedSymbol, Point, QrDetector, SymbolDecoder};
pub use session::{ScanOutcome, ScanSession, SharedSession};
