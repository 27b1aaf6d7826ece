use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;

use crate::application::NetworkMonitor;
use crate::domain::{normalize_mac, DisplayRecord, MacError};
use crate::ports::RecordStore;

/// Error type that implements IntoResponse
#[derive(Debug)]
pub struct AppError(StatusCode, String);

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        (self.0, self.1).into_response()
    }
}

impl From<MacError> for AppError {
    fn from(err: MacError) -> Self {
        AppError(StatusCode::BAD_REQUEST, err.to_string())
    }
}

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    pub monitor: Arc<NetworkMonitor>,
    pub store: Arc<dyn RecordStore>,
}

/// Response for /api/network
#[derive(Debug, Serialize)]
pub struct NetworkResponse {
    pub timestamp: String,
    pub stale: bool,
    pub interfaces: Vec<DisplayRecord>,
}

/// Response for /api/vendors/{mac}
#[derive(Debug, Serialize)]
pub struct VendorResponse {
    pub mac: String,
    pub prefix: String,
    pub vendor: String,
}

/// Handler for GET /api/health
pub async fn health_handler() -> (StatusCode, Json<serde_json::Value>) {
    (
        StatusCode::OK,
        Json(serde_json::json!({
            "status": "healthy",
            "service": "nanonet"
        })),
    )
}

/// Handler for GET /api/network
pub async fn network_handler(State(state): State<AppState>) -> Json<NetworkResponse> {
    let tick = state.store.latest();

    Json(NetworkResponse {
        timestamp: tick.timestamp.to_rfc3339(),
        stale: tick.stale,
        interfaces: tick.interfaces.clone(),
    })
}

/// Handler for GET /api/vendors/{mac}
pub async fn vendor_handler(
    State(state): State<AppState>,
    Path(mac): Path<String>,
) -> Result<Json<VendorResponse>, AppError> {
    let prefix = normalize_mac(&mac)?;
    let vendor = state.monitor.vendors().vendor_for(&prefix).to_string();

    Ok(Json(VendorResponse { mac, prefix, vendor }))
}
