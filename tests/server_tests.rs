// SPDX-License-Identifier: GPL-3.0-only

//! HTTP API tests against a virtual camera

mod common;

use camera_scanner::server::response::{
    CamerasResponse, CooldownResponse, ErrorResponse, ScanResponse, ServiceInfo, StatusResponse,
};
use camera_scanner::session::ManualClock;
use camera_scanner::{SharedSession, server};
use common::*;
use serde::de::DeserializeOwned;
use std::sync::Arc;
use warp::http::StatusCode;

fn shared(indices: &[u32], decoder: ScriptedDecoder, clock: Arc<ManualClock>) -> SharedSession {
    session_with(backend_with(indices), decoder, clock, &config_with_cooldown(5.0)).into_shared()
}

fn body<T: DeserializeOwned>(response: &warp::http::Response<warp::hyper::body::Bytes>) -> T {
    serde_json::from_slice(response.body()).unwrap()
}

#[tokio::test]
async fn test_index() {
    let clock = Arc::new(ManualClock::new(0.0));
    let api = server::routes(shared(&[0], ScriptedDecoder::default(), clock));

    let response = warp::test::request().method("GET").path("/").reply(&api).await;
    assert_eq!(response.status(), StatusCode::OK);
    let info: ServiceInfo = body(&response);
    assert_eq!(info.message, "Barcode Scanner API");
}

#[tokio::test]
async fn test_start_scan_stop_flow() {
    let clock = Arc::new(ManualClock::new(0.0));
    let decoder = ScriptedDecoder::repeat(vec![square("QRCODE", "hello")], 2);
    let api = server::routes(shared(&[0], decoder, Arc::clone(&clock)));

    let response = warp::test::request()
        .method("POST")
        .path("/api/camera/start")
        .json(&serde_json::json!({ "camera_index": 0 }))
        .reply(&api)
        .await;
    let started: StatusResponse = body(&response);
    assert!(started.success);
    assert_eq!(started.message, "Camera started");

    let response = warp::test::request()
        .method("GET")
        .path("/api/camera/scan")
        .reply(&api)
        .await;
    let scan: ScanResponse = body(&response);
    assert!(scan.success);
    assert_eq!(scan.count, 1);
    assert_eq!(scan.results[0].kind, "QRCODE");
    assert_eq!(scan.results[0].data, "hello");
    assert_eq!(scan.results[0].points[0], [10, 10]);
    assert!(!scan.can_scan);
    assert!(
        scan.frame
            .as_deref()
            .is_some_and(|f| f.starts_with("data:image/jpeg;base64,"))
    );

    // Second scan while resting: frame present, results withheld
    clock.set(3.0);
    let response = warp::test::request()
        .method("GET")
        .path("/api/camera/scan")
        .reply(&api)
        .await;
    let resting: ScanResponse = body(&response);
    assert!(resting.success);
    assert_eq!(resting.count, 0);
    assert!(resting.results.is_empty());
    assert!((resting.time_until_next_scan - 2.0).abs() < 1e-9);
    assert!(resting.frame.is_some());

    let response = warp::test::request()
        .method("POST")
        .path("/api/camera/stop")
        .reply(&api)
        .await;
    let stopped: StatusResponse = body(&response);
    assert!(stopped.success);
    assert_eq!(stopped.message, "Camera stopped");

    let response = warp::test::request()
        .method("GET")
        .path("/api/camera/scan")
        .reply(&api)
        .await;
    assert_eq!(response.status(), StatusCode::OK);
    let error: ErrorResponse = body(&response);
    assert!(!error.success);
    assert_eq!(error.error, "Camera not available");
}

#[tokio::test]
async fn test_start_without_body_uses_default_camera() {
    let clock = Arc::new(ManualClock::new(0.0));
    let api = server::routes(shared(&[0], ScriptedDecoder::default(), clock));

    let response = warp::test::request()
        .method("POST")
        .path("/api/camera/start")
        .reply(&api)
        .await;
    let started: StatusResponse = body(&response);
    assert!(started.success);
}

#[tokio::test]
async fn test_start_missing_camera() {
    let clock = Arc::new(ManualClock::new(0.0));
    let api = server::routes(shared(&[0], ScriptedDecoder::default(), clock));

    let response = warp::test::request()
        .method("POST")
        .path("/api/camera/start")
        .json(&serde_json::json!({ "camera_index": 3 }))
        .reply(&api)
        .await;
    let started: StatusResponse = body(&response);
    assert!(!started.success);
    assert_eq!(started.message, "Failed to start camera");
}

#[tokio::test]
async fn test_malformed_start_body_is_json_error() {
    let clock = Arc::new(ManualClock::new(0.0));
    let api = server::routes(shared(&[0], ScriptedDecoder::default(), clock));

    let response = warp::test::request()
        .method("POST")
        .path("/api/camera/start")
        .body("{not json")
        .reply(&api)
        .await;
    assert_eq!(response.status(), StatusCode::OK);
    let error: ErrorResponse = body(&response);
    assert!(!error.success);
    assert!(error.error.starts_with("Invalid request body"));
}

#[tokio::test]
async fn test_cooldown_status() {
    let clock = Arc::new(ManualClock::new(0.0));
    let api = server::routes(shared(&[0], ScriptedDecoder::default(), clock));

    let response = warp::test::request()
        .method("GET")
        .path("/api/camera/cooldown-status")
        .reply(&api)
        .await;
    let status: CooldownResponse = body(&response);
    assert!(status.can_scan);
    assert_eq!(status.time_until_next_scan, 0.0);
    assert_eq!(status.cooldown_duration, 5.0);
}

#[tokio::test]
async fn test_list_cameras() {
    let clock = Arc::new(ManualClock::new(0.0));
    let api = server::routes(shared(&[0, 2], ScriptedDecoder::default(), clock));

    let response = warp::test::request()
        .method("GET")
        .path("/api/cameras")
        .reply(&api)
        .await;
    let cameras: CamerasResponse = body(&response);
    assert_eq!(cameras.cameras.len(), 2);
    assert_eq!(cameras.cameras[1].index, 2);
    assert_eq!(cameras.cameras[1].name, "Camera 2");
    assert_eq!(cameras.cameras[1].resolution, "96x72");
}

#[tokio::test]
async fn test_unknown_route_and_wrong_method() {
    let clock = Arc::new(ManualClock::new(0.0));
    let api = server::routes(shared(&[0], ScriptedDecoder::default(), clock));

    let response = warp::test::request()
        .method("GET")
        .path("/api/nope")
        .reply(&api)
        .await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    let error: ErrorResponse = body(&response);
    assert!(!error.success);

    let response = warp::test::request()
        .method("GET")
        .path("/api/camera/start")
        .reply(&api)
        .await;
    assert_eq!(response.status(), StatusCode::METHOD_NOT_ALLOWED);
}

#[tokio::test]
async fn test_cors_header_present() {
    let clock = Arc::new(ManualClock::new(0.0));
    let api = server::routes(shared(&[0], ScriptedDecoder::default(), clock));

    let response = warp::test::request()
        .method("GET")
        .path("/api/camera/cooldown-status")
        .header("origin", "http://localhost:3000")
        .reply(&api)
        .await;
    assert!(response.headers().contains_key("access-control-allow-origin"));
}
