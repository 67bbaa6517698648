// SPDX-License-Identifier: GPL-3.0-only

//! HTTP API
//!
//! A thin warp layer over the shared [`ScanSession`](crate::session::ScanSession):
//!
//! | Route | Method | Handler |
//! |-------|--------|---------|
//! | `/` | GET | [`handlers::index`] |
//! | `/api/camera/start` | POST | [`handlers::start_camera`] |
//! | `/api/camera/stop` | POST | [`handlers::stop_camera`] |
//! | `/api/camera/scan` | GET | [`handlers::scan`] |
//! | `/api/camera/cooldown-status` | GET | [`handlers::cooldown_status`] |
//! | `/api/cameras` | GET | [`handlers::list_cameras`] |

pub mod handlers;
pub mod response;

use crate::config::Config;
use crate::errors::{AppError, AppResult};
use crate::session::{SharedSession, lock_session};
use response::ErrorResponse;
use std::convert::Infallible;
use tracing::{info, warn};
use warp::http::StatusCode;
use warp::{Filter, Rejection, Reply};

/// Inject the shared session into a route
fn with_session(
    session: SharedSession,
) -> impl Filter<Extract = (SharedSession,), Error = Infallible> + Clone {
    warp::any().map(move || session.clone())
}

/// All API routes with CORS, rejection handling and request tracing
pub fn routes(session: SharedSession) -> impl Filter<Extract = impl Reply, Error = Infallible> + Clone {
    let index = warp::path::end().and(warp::get()).and_then(handlers::index);

    let start = warp::path!("api" / "camera" / "start")
        .and(warp::post())
        .and(warp::body::bytes())
        .and(with_session(session.clone()))
        .and_then(handlers::start_camera);

    let stop = warp::path!("api" / "camera" / "stop")
        .and(warp::post())
        .and(with_session(session.clone()))
        .and_then(handlers::stop_camera);

    let scan = warp::path!("api" / "camera" / "scan")
        .and(warp::get())
        .and(with_session(session.clone()))
        .and_then(handlers::scan);

    let cooldown = warp::path!("api" / "camera" / "cooldown-status")
        .and(warp::get())
        .and(with_session(session.clone()))
        .and_then(handlers::cooldown_status);

    let cameras = warp::path!("api" / "cameras")
        .and(warp::get())
        .and(with_session(session))
        .and_then(handlers::list_cameras);

    let cors = warp::cors()
        .allow_any_origin()
        .allow_methods(vec!["GET", "POST", "OPTIONS"])
        .allow_headers(vec!["content-type"]);

    index
        .or(start)
        .or(stop)
        .or(scan)
        .or(cooldown)
        .or(cameras)
        .with(cors)
        .recover(handle_rejection)
        .with(warp::trace::request())
}

/// Turn rejections into JSON error bodies
///
/// Unknown routes and wrong methods keep their HTTP status; anything else is
/// answered with 200 like every other API failure.
async fn handle_rejection(err: Rejection) -> Result<impl Reply, Infallible> {
    let (status, message) = if err.is_not_found() {
        (StatusCode::NOT_FOUND, "Not found".to_string())
    } else if err.find::<warp::reject::MethodNotAllowed>().is_some() {
        (StatusCode::METHOD_NOT_ALLOWED, "Method not allowed".to_string())
    } else if let Some(e) = err.find::<warp::cors::CorsForbidden>() {
        (StatusCode::FORBIDDEN, e.to_string())
    } else {
        warn!(rejection = ?err, "Unhandled rejection");
        (StatusCode::OK, format!("{:?}", err))
    };

    Ok(warp::reply::with_status(
        warp::reply::json(&ErrorResponse::new(message)),
        status,
    ))
}

/// Resolves on Ctrl+C; never resolves if the handler cannot be installed
async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!(error = %e, "Failed to listen for Ctrl+C");
        std::future::pending::<()>().await;
    }
    info!("Shutdown signal received");
}

/// Serve the API until Ctrl+C, then release the camera
pub async fn serve(config: &Config, session: SharedSession) -> AppResult<()> {
    let addr = config.bind_addr()?;

    let (bound, server) = warp::serve(routes(session.clone()))
        .try_bind_with_graceful_shutdown(addr, shutdown_signal())
        .map_err(|e| AppError::Server(format!("Failed to bind {}: {}", addr, e)))?;

    info!(addr = %bound, "Scanner API listening");
    server.await;

    tokio::task::spawn_blocking(move || lock_session(&session).stop())
        .await
        .map_err(|e| AppError::Server(format!("Failed to release camera: {}", e)))?;

    info!("Server stopped");
    Ok(())
}
