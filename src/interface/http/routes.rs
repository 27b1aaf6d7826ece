use std::sync::Arc;

use axum::{routing::get, Router};
use tower_http::cors::CorsLayer;

use crate::application::NetworkMonitor;
use crate::ports::RecordStore;

use super::handlers::{health_handler, network_handler, vendor_handler, AppState};

pub fn create_router(monitor: Arc<NetworkMonitor>, store: Arc<dyn RecordStore>) -> Router {
    let state = AppState { monitor, store };

    Router::new()
        .route("/api/health", get(health_handler))
        .route("/api/network", get(network_handler))
        .route("/api/vendors/{mac}", get(vendor_handler))
        .layer(CorsLayer::permissive())
        .with_state(state)
}
