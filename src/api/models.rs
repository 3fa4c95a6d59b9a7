//! Request and response models for the room endpoints

use crate::bridge::{RoomStatus, RosterEntry};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// POST /rooms
#[derive(Debug, Clone, Deserialize)]
pub struct CreateRoomRequest {
    /// Host's display name
    pub name: String,
    /// Player limit; server default applies when omitted
    #[serde(default)]
    pub limit: Option<usize>,
}

#[derive(Debug, Clone, Serialize)]
pub struct CreateRoomResponse {
    pub code: String,
    pub player_id: String,
    pub limit: usize,
}

/// POST /rooms/{code}/join
#[derive(Debug, Clone, Deserialize)]
pub struct JoinRoomRequest {
    pub name: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct JoinRoomResponse {
    pub code: String,
    pub player_id: String,
    pub players: Vec<RosterEntry>,
}

/// GET /rooms/{code}
#[derive(Debug, Clone, Serialize)]
pub struct RoomStatusResponse {
    pub code: String,
    pub status: RoomStatus,
    pub players: Vec<RosterEntry>,
    pub call_count: usize,
    pub limit: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub winner: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// GET /health
#[derive(Debug, Clone, Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    pub rooms: usize,
}
