//! Local control server.
//!
//! Exposes characteristic reads and writes for the light over plain HTTP,
//! plus health, status and Prometheus metrics endpoints. There is no
//! pairing or encryption; bind it to a trusted network only.

pub mod state;

use axum::{
    Json, Router,
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
};
use metrics_exporter_prometheus::PrometheusHandle;
use serde::{Deserialize, Serialize};
use std::net::SocketAddr;
use tokio::net::TcpListener;
use tower_http::trace::TraceLayer;
use tracing::{error, info};

use crate::accessories::{Characteristic, LightSnapshot, LightbulbAccessory};
use crate::drivers::LightDriver;
use crate::error::LightError;
use crate::metrics::Metrics;
use crate::web::state::ControlStats;

/// Application state shared with all route handlers.
pub struct AppState<D: LightDriver> {
    pub light: LightbulbAccessory<D>,
    pub stats: ControlStats,
    pub metrics_handle: PrometheusHandle,
}

impl<D: LightDriver> Clone for AppState<D> {
    fn clone(&self) -> Self {
        Self {
            light: self.light.clone(),
            stats: self.stats.clone(),
            metrics_handle: self.metrics_handle.clone(),
        }
    }
}

#[derive(Debug, Deserialize, Serialize)]
pub struct WriteRequest {
    pub characteristics: Vec<Characteristic>,
}

#[derive(Debug, Serialize)]
struct WriteStatus {
    characteristic: &'static str,
    status: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    message: Option<String>,
}

impl WriteStatus {
    fn new(write: &Characteristic, result: &Result<(), LightError>) -> Self {
        let (status, message) = match result {
            Ok(()) => ("ok", None),
            Err(e @ LightError::InvalidArgument { .. }) => ("invalid_argument", Some(e.to_string())),
            Err(e @ LightError::Hardware(_)) => ("hardware_error", Some(e.to_string())),
        };
        Self {
            characteristic: write.name(),
            status,
            message,
        }
    }
}

#[derive(Debug, Serialize)]
struct ReadResponse {
    #[serde(flatten)]
    light: LightSnapshot,
    program_mode: u8,
}

pub fn router<D: LightDriver + 'static>(state: AppState<D>) -> Router {
    Router::new()
        .route(
            "/characteristics",
            get(get_characteristics::<D>).put(put_characteristics::<D>),
        )
        .route("/health", get(health_handler::<D>))
        .route("/api/status", get(api_status_handler::<D>))
        .route("/metrics", get(metrics_handler::<D>))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Binds the control server and serves it in the background.
pub async fn start_control_server<D: LightDriver + 'static>(
    port: u16,
    state: AppState<D>,
) -> Result<(), std::io::Error> {
    let addr = SocketAddr::from(([0, 0, 0, 0], port));
    let listener = TcpListener::bind(addr).await?;
    info!("Control server for {} listening on http://{}", state.light.name(), addr);

    let app = router(state);
    tokio::spawn(async move {
        if let Err(e) = axum::serve(listener, app).await {
            error!("Control server error: {}", e);
        }
    });

    Ok(())
}

/// Applies characteristic writes in request order.
async fn put_characteristics<D: LightDriver + 'static>(
    State(state): State<AppState<D>>,
    Json(request): Json<WriteRequest>,
) -> Response {
    let results = state.light.apply_all(&request.characteristics).await;
    for result in &results {
        state.stats.record(result);
    }

    if results.iter().all(Result::is_ok) {
        return StatusCode::NO_CONTENT.into_response();
    }

    let statuses: Vec<WriteStatus> = request
        .characteristics
        .iter()
        .zip(&results)
        .map(|(write, result)| WriteStatus::new(write, result))
        .collect();
    (
        StatusCode::MULTI_STATUS,
        Json(serde_json::json!({ "characteristics": statuses })),
    )
        .into_response()
}

async fn get_characteristics<D: LightDriver + 'static>(
    State(state): State<AppState<D>>,
) -> Response {
    Json(ReadResponse {
        light: state.light.snapshot().await,
        program_mode: state.light.program_mode(),
    })
    .into_response()
}

/// Unhealthy while the last color could not be displayed.
async fn health_handler<D: LightDriver + 'static>(State(state): State<AppState<D>>) -> Response {
    if state.light.hardware_synced() {
        (StatusCode::OK, "OK").into_response()
    } else {
        (StatusCode::SERVICE_UNAVAILABLE, "UNHEALTHY").into_response()
    }
}

async fn api_status_handler<D: LightDriver + 'static>(
    State(state): State<AppState<D>>,
) -> Response {
    let summary = state.stats.summary();
    let json = serde_json::json!({
        "status": "ok",
        "name": state.light.name(),
        "uptime_seconds": summary.uptime_seconds,
        "light": state.light.snapshot().await,
        "program_mode": state.light.program_mode(),
        "writes": {
            "total": summary.writes,
            "rejected": summary.rejected_writes,
            "render_failures": summary.render_failures,
        },
        "last_error": summary.last_error,
    });
    Json(json).into_response()
}

async fn metrics_handler<D: LightDriver + 'static>(State(state): State<AppState<D>>) -> Response {
    Metrics::set_uptime(state.stats.start_time());

    let metrics = state.metrics_handle.render();
    (
        StatusCode::OK,
        [("content-type", "text/plain; version=0.0.4; charset=utf-8")],
        metrics,
    )
        .into_response()
}
