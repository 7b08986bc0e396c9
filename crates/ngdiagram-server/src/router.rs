//! Axum router setup for the diagram server

use std::sync::Arc;

use axum::{
    Router,
    routing::{get, post},
};
use tower_http::cors::CorsLayer;

use crate::{
    ServerState,
    handlers::{get_diagram, get_filtered_diagram, get_metadata, health_check, post_analyze},
    websocket::ws_handler,
};

pub fn create_router(state: Arc<ServerState>) -> Router {
    Router::new()
        .route("/ws", get(ws_handler))
        .route("/api/health", get(health_check))
        .route("/api/diagram", get(get_diagram))
        .route("/api/diagram/filtered", get(get_filtered_diagram))
        .route("/api/metadata/:id", get(get_metadata))
        .route("/api/analyze", post(post_analyze))
        .layer(CorsLayer::permissive())
        .with_state(state)
}
