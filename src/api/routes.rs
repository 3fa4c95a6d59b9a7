//! Route Definitions
//!
//! Maps URLs to handlers with type-safe routing.

use super::{handlers::*, websocket::websocket_handler};
use axum::{
    routing::{get, post},
    Router,
};
use std::sync::Arc;

/// Build the API router with all endpoints
pub fn create_router(state: Arc<AppState>) -> Router {
    Router::new()
        // Health check
        .route("/health", get(health_handler))
        // Room lifecycle
        .route("/rooms", post(create_room_handler))
        .route("/rooms/:code", get(room_status_handler))
        .route("/rooms/:code/join", post(join_room_handler))
        // Realtime event stream per room
        .route("/ws/:code", get(websocket_handler))
        // Attach shared state
        .with_state(state)
}
