// SPDX-License-Identifier: GPL-3.0-only

//! JSON response bodies
//!
//! Every endpoint answers with HTTP 200 and one of these bodies, including
//! failures, so a polling client only ever has to look at `success`.

use crate::backends::camera::CameraDevice;
use crate::constants::encoding::FRAME_MIME;
use crate::frame_processor::DetectedSymbol;
use crate::session::{CooldownStatus, ScanOutcome};
use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use serde::{Deserialize, Serialize};

/// Body of `POST /api/camera/start`
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct StartRequest {
    #[serde(default)]
    pub camera_index: Option<u32>,
}

/// `{success, message}` acknowledgement
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatusResponse {
    pub success: bool,
    pub message: String,
}

impl StatusResponse {
    pub fn new(success: bool, message: impl Into<String>) -> Self {
        Self {
            success,
            message: message.into(),
        }
    }
}

/// `{success: false, error}` body for every failure
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub success: bool,
    pub error: String,
}

impl ErrorResponse {
    pub fn new(error: impl Into<String>) -> Self {
        Self {
            success: false,
            error: error.into(),
        }
    }
}

/// Liveness body for `GET /`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServiceInfo {
    pub message: String,
    pub version: String,
}

/// One reported symbol
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SymbolResult {
    #[serde(rename = "type")]
    pub kind: String,
    pub data: String,
    pub points: Vec<[i32; 2]>,
}

impl From<&DetectedSymbol> for SymbolResult {
    fn from(symbol: &DetectedSymbol) -> Self {
        Self {
            kind: symbol.kind.clone(),
            data: symbol.payload.clone(),
            points: symbol.boundary.iter().map(|p| [p.x, p.y]).collect(),
        }
    }
}

/// Body of a successful `GET /api/camera/scan`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScanResponse {
    pub success: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub frame: Option<String>,
    pub results: Vec<SymbolResult>,
    pub count: usize,
    pub can_scan: bool,
    pub time_until_next_scan: f64,
}

impl From<&ScanOutcome> for ScanResponse {
    fn from(outcome: &ScanOutcome) -> Self {
        let results: Vec<SymbolResult> =
            outcome.reported_symbols.iter().map(SymbolResult::from).collect();
        Self {
            success: true,
            frame: outcome.encoded_frame.as_deref().map(data_url),
            count: results.len(),
            results,
            can_scan: outcome.can_scan,
            time_until_next_scan: outcome.time_until_next_scan,
        }
    }
}

/// Body of `GET /api/camera/cooldown-status`
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CooldownResponse {
    pub can_scan: bool,
    pub time_until_next_scan: f64,
    pub cooldown_duration: f64,
}

impl From<CooldownStatus> for CooldownResponse {
    fn from(status: CooldownStatus) -> Self {
        Self {
            can_scan: status.can_scan,
            time_until_next_scan: status.time_until_next_scan,
            cooldown_duration: status.cooldown_duration,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CameraEntry {
    pub index: u32,
    pub name: String,
    pub resolution: String,
}

impl From<&CameraDevice> for CameraEntry {
    fn from(device: &CameraDevice) -> Self {
        Self {
            index: device.index,
            name: device.name.clone(),
            resolution: device.resolution_label(),
        }
    }
}

/// Body of `GET /api/cameras`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CamerasResponse {
    pub cameras: Vec<CameraEntry>,
}

/// `data:image/jpeg;base64,...` URL for an encoded frame
pub fn data_url(jpeg: &[u8]) -> String {
    format!("data:{};base64,{}", FRAME_MIME, STANDARD.encode(jpeg))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::frame_processor::Point;

    #[test]
    fn test_data_url_prefix() {
        assert_eq!(data_url(&[0xFF, 0xD8, 0xFF]), "data:image/jpeg;base64,/9j/");
    }

    #[test]
    fn test_scan_response_uses_raw_boundary() {
        let boundary: Vec<Point> = [(0, 0), (4, 4), (8, 0), (8, 8), (0, 8), (4, 4)]
            .into_iter()
            .map(Point::from)
            .collect();
        let symbol = DetectedSymbol::new("QRCODE", "hello", boundary).unwrap();
        let outcome = ScanOutcome {
            encoded_frame: None,
            reported_symbols: vec![symbol],
            can_scan: false,
            time_until_next_scan: 5.0,
            frame_captured: true,
            detected_count: 1,
        };

        let json = serde_json::to_value(ScanResponse::from(&outcome)).unwrap();
        assert_eq!(json["count"], 1);
        assert_eq!(json["results"][0]["type"], "QRCODE");
        assert_eq!(json["results"][0]["data"], "hello");
        assert_eq!(json["results"][0]["points"].as_array().unwrap().len(), 6);
        assert_eq!(json["results"][0]["points"][1], serde_json::json!([4, 4]));
        assert!(json.get("frame").is_none());
    }

    #[test]
    fn test_start_request_defaults() {
        let empty: StartRequest = serde_json::from_str("{}").unwrap();
        assert_eq!(empty.camera_index, None);
        let given: StartRequest = serde_json::from_str(r#"{"camera_index": 2}"#).unwrap();
        assert_eq!(given.camera_index, Some(2));
    }
}
