// SPDX-License-Identifier: GPL-3.0-only

//! Request handlers
//!
//! Session calls block on the device, so each one runs on the blocking
//! pool. A failed or panicked call becomes an [`ErrorResponse`] rather than
//! a rejection.

use super::response::{
    CameraEntry, CamerasResponse, CooldownResponse, ErrorResponse, ScanResponse, ServiceInfo,
    StartRequest, StatusResponse,
};
use crate::constants::{APP_VERSION, server};
use crate::session::{ScanSession, SharedSession, lock_session};
use std::convert::Infallible;
use tracing::{debug, info, warn};
use warp::hyper::body::Bytes;
use warp::reply::{Json, json};

/// Run `f` against the locked session on the blocking pool
async fn run_blocking<T, F>(session: SharedSession, f: F) -> Result<T, String>
where
    F: FnOnce(&mut ScanSession) -> T + Send + 'static,
    T: Send + 'static,
{
    tokio::task::spawn_blocking(move || {
        let mut guard = lock_session(&session);
        f(&mut guard)
    })
    .await
    .map_err(|e| format!("Session task failed: {}", e))
}

fn error_reply(error: impl Into<String>) -> Json {
    let error = error.into();
    warn!(error = %error, "Request failed");
    json(&ErrorResponse::new(error))
}

/// Parse the optional start body; empty means "use the default camera"
fn parse_start_request(body: &[u8]) -> Result<StartRequest, serde_json::Error> {
    if body.iter().all(u8::is_ascii_whitespace) {
        return Ok(StartRequest::default());
    }
    serde_json::from_slice(body)
}

pub async fn index() -> Result<Json, Infallible> {
    Ok(json(&ServiceInfo {
        message: server::SERVICE_MESSAGE.to_string(),
        version: APP_VERSION.to_string(),
    }))
}

pub async fn start_camera(body: Bytes, session: SharedSession) -> Result<Json, Infallible> {
    let request = match parse_start_request(&body) {
        Ok(request) => request,
        Err(e) => return Ok(error_reply(format!("Invalid request body: {}", e))),
    };

    match run_blocking(session, move |s| s.start(request.camera_index)).await {
        Ok(true) => {
            info!(camera_index = ?request.camera_index, "Camera started via API");
            Ok(json(&StatusResponse::new(true, "Camera started")))
        }
        Ok(false) => Ok(json(&StatusResponse::new(false, "Failed to start camera"))),
        Err(e) => Ok(error_reply(e)),
    }
}

pub async fn stop_camera(session: SharedSession) -> Result<Json, Infallible> {
    match run_blocking(session, |s| s.stop()).await {
        Ok(()) => Ok(json(&StatusResponse::new(true, "Camera stopped"))),
        Err(e) => Ok(error_reply(e)),
    }
}

pub async fn scan(session: SharedSession) -> Result<Json, Infallible> {
    let outcome = match run_blocking(session, |s| s.perform_scan()).await {
        Ok(outcome) => outcome,
        Err(e) => return Ok(error_reply(e)),
    };

    if !outcome.frame_captured {
        debug!("Scan requested with no frame available");
        return Ok(json(&ErrorResponse::new(server::CAMERA_NOT_AVAILABLE)));
    }

    Ok(json(&ScanResponse::from(&outcome)))
}

pub async fn cooldown_status(session: SharedSession) -> Result<Json, Infallible> {
    match run_blocking(session, |s| s.cooldown_status()).await {
        Ok(status) => Ok(json(&CooldownResponse::from(status))),
        Err(e) => Ok(error_reply(e)),
    }
}

pub async fn list_cameras(session: SharedSession) -> Result<Json, Infallible> {
    match run_blocking(session, |s| s.enumerate_cameras()).await {
        Ok(devices) => Ok(json(&CamerasResponse {
            cameras: devices.iter().map(CameraEntry::from).collect(),
        })),
        Err(e) => Ok(error_reply(e)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_blank_start_body_uses_default() {
        assert_eq!(parse_start_request(b"").unwrap(), StartRequest::default());
        assert_eq!(parse_start_request(b" \n").unwrap(), StartRequest::default());
    }

    #[test]
    fn test_malformed_start_body() {
        assert!(parse_start_request(b"{camera_index").is_err());
        assert!(parse_start_request(br#"{"camera_index": -1}"#).is_err());
    }
}
