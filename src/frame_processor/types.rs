// SPDX-License-Identifier: MPL-2.0

//! Core types for symbol detection results

use serde::Serialize;

/// A pixel position in frame coordinates
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct Point {
    pub x: i32,
    pub y: i32,
}

impl Point {
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }
}

impl From<(i32, i32)> for Point {
    fn from((x, y): (i32, i32)) -> Self {
        Self { x, y }
    }
}

/// A barcode or QR code found in a frame
///
/// `boundary` is the polygon exactly as the decoder reported it, in frame
/// pixel coordinates. It always has at least one point.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DetectedSymbol {
    /// Symbology tag (e.g. `QRCODE`)
    pub kind: String,
    /// Decoded text content
    pub payload: String,
    /// Boundary polygon as reported by the decoder
    pub boundary: Vec<Point>,
}

impl DetectedSymbol {
    /// Create a symbol, returning `None` for an empty boundary
    pub fn new(
        kind: impl Into<String>,
        payload: impl Into<String>,
        boundary: Vec<Point>,
    ) -> Option<Self> {
        if boundary.is_empty() {
            return None;
        }
        Some(Self {
            kind: kind.into(),
            payload: payload.into(),
            boundary,
        })
    }

    /// Overlay label text (`<kind>: <payload>`)
    pub fn label(&self) -> String {
        format!("{}: {}", self.kind, self.payload)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_boundary_is_rejected() {
        assert!(DetectedSymbol::new("QRCODE", "hello", Vec::new()).is_none());
    }

    #[test]
    fn test_label_format() {
        let symbol = DetectedSymbol::new("EAN13", "4006381333931", vec![Point::new(1, 2)]).unwrap();
        assert_eq!(symbol.label(), "EAN13: 4006381333931");
    }
}
