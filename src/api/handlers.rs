//! Request Handlers
//!
//! Room lifecycle endpoints; the host creates and joins in one request,
//! everyone else joins by code.

use super::{errors::ApiError, middleware::RequestId, models::*};
use crate::bridge::RealtimeBridge;
use crate::config::BingohallConfig;
use crate::room::RoomManager;
use axum::{
    extract::{Path, State},
    Extension, Json,
};
use std::sync::Arc;
use tracing::info;

/// Shared application state
pub struct AppState {
    pub rooms: Arc<RoomManager>,
    pub config: BingohallConfig,
    pub version: String,
}

/// Health check handler
/// GET /health
pub async fn health_handler(State(state): State<Arc<AppState>>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "Running".to_string(),
        version: state.version.clone(),
        rooms: state.rooms.room_count(),
    })
}

/// Create a room; the host joins it in the same request
/// POST /rooms
pub async fn create_room_handler(
    Extension(request_id): Extension<RequestId>,
    State(state): State<Arc<AppState>>,
    Json(request): Json<CreateRoomRequest>,
) -> Result<Json<CreateRoomResponse>, ApiError> {
    let limit = request
        .limit
        .unwrap_or(state.config.room.default_player_limit);

    let code = state
        .rooms
        .create_room(limit)
        .await
        .map_err(|e| ApiError::from_bridge(request_id.0.clone(), e))?;

    let joined = state
        .rooms
        .join_room(&code, &request.name)
        .await
        .map_err(|e| ApiError::from_bridge(request_id.0.clone(), e))?;

    let snapshot = state
        .rooms
        .snapshot(&code)
        .map_err(|e| ApiError::from_bridge(request_id.0, e))?;

    info!("Host {} opened room {}", request.name, code);
    Ok(Json(CreateRoomResponse {
        code,
        player_id: joined.player_id,
        limit: snapshot.limit,
    }))
}

/// Join an existing room by code
/// POST /rooms/{code}/join
pub async fn join_room_handler(
    Extension(request_id): Extension<RequestId>,
    State(state): State<Arc<AppState>>,
    Path(code): Path<String>,
    Json(request): Json<JoinRoomRequest>,
) -> Result<Json<JoinRoomResponse>, ApiError> {
    let joined = state
        .rooms
        .join_room(&code, &request.name)
        .await
        .map_err(|e| ApiError::from_bridge(request_id.0.clone(), e))?;

    let snapshot = state
        .rooms
        .snapshot(&code)
        .map_err(|e| ApiError::from_bridge(request_id.0, e))?;

    Ok(Json(JoinRoomResponse {
        code,
        player_id: joined.player_id,
        players: snapshot.players,
    }))
}

/// Room status snapshot (lobby polling / reconnect)
/// GET /rooms/{code}
pub async fn room_status_handler(
    Extension(request_id): Extension<RequestId>,
    State(state): State<Arc<AppState>>,
    Path(code): Path<String>,
) -> Result<Json<RoomStatusResponse>, ApiError> {
    let snapshot = state
        .rooms
        .snapshot(&code)
        .map_err(|e| ApiError::from_bridge(request_id.0, e))?;

    Ok(Json(RoomStatusResponse {
        code: snapshot.code,
        status: snapshot.status,
        players: snapshot.players,
        call_count: snapshot.call_count,
        limit: snapshot.limit,
        winner: snapshot.winner,
        created_at: snapshot.created_at,
    }))
}
