// SPDX-License-Identifier: MPL-2.0

//! Backend abstraction layer for frame capture
//!
//! # Architecture
//!
//! The backend layer abstracts hardware access, providing a consistent API
//! regardless of where frames come from:
//!
//! ```text
//! ┌─────────────────────────────────────────────┐
//! │               Scan Session                   │
//! └────────────────────┬────────────────────────┘
//!                      │
//! ┌────────────────────┴────────────────────────┐
//! │              Backend Layer                   │
//! │  ┌─────────────┐    ┌──────────────────┐   │
//! │  │   Camera    │    │  Virtual Camera  │   │
//! │  │   (V4L2)    │    │  (still images)  │   │
//! │  └─────────────┘    └──────────────────┘   │
//! └─────────────────────────────────────────────┘
//! ```
//!
//! # Modules
//!
//! - [`camera`]: Backend traits, frame source and the V4L2 implementation
//! - [`virtual_camera`]: In-memory devices for demos and tests

pub mod camera;
pub mod virtual_camera;
