//! Realtime bridge seam
//!
//! The game core never talks to the network directly; it consumes an
//! ordered stream of `RoomEvent`s and publishes through this trait. The
//! bridge's delivery order is the authoritative call order for every
//! participant in an online game.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::fmt;
use tokio::sync::broadcast;

/// Errors surfaced by a realtime bridge implementation
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum BridgeError {
    #[error("Invalid room code: '{0}'")]
    InvalidRoomCode(String),

    #[error("Room {0} not found")]
    RoomNotFound(String),

    #[error("Room {code} is full ({limit} players)")]
    RoomFull { code: String, limit: usize },

    #[error("Room {0} already started")]
    AlreadyStarted(String),

    #[error("Connection unavailable: {0}")]
    ConnectionUnavailable(String),
}

/// Room lifecycle status broadcast to all participants
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RoomStatus {
    Waiting,
    Playing,
}

impl fmt::Display for RoomStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RoomStatus::Waiting => write!(f, "waiting"),
            RoomStatus::Playing => write!(f, "playing"),
        }
    }
}

/// One roster line as seen by every participant
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RosterEntry {
    pub id: String,
    pub name: String,
    pub ready: bool,
}

/// Events delivered, in publish order, to every room subscriber
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum RoomEvent {
    /// Full roster snapshot after any membership or ready change
    Roster { players: Vec<RosterEntry> },

    /// A number was called; `seq` is its position in the append-only log
    Call { number: u8, seq: usize },

    /// Terminal winner announcement, meaningful at most once
    Winner { name: String },

    /// Room moved between waiting and playing
    Status { status: RoomStatus },
}

/// Result of joining a room: assigned identity plus the event stream
pub struct JoinedRoom {
    pub player_id: String,
    pub events: broadcast::Receiver<RoomEvent>,
}

/// Publish/subscribe operations a realtime backend must provide.
///
/// Subscriptions share a single ordered stream per room; participants
/// must apply `Call` events in the order received.
#[async_trait]
pub trait RealtimeBridge: Send + Sync {
    /// Create a room with the given player limit, returning its code
    async fn create_room(&self, limit: usize) -> Result<String, BridgeError>;

    /// Join an existing room by code
    async fn join_room(&self, code: &str, name: &str) -> Result<JoinedRoom, BridgeError>;

    /// Update a participant's ready flag and rebroadcast the roster
    async fn publish_player(
        &self,
        code: &str,
        player_id: &str,
        ready: bool,
    ) -> Result<(), BridgeError>;

    /// Append a call to the room's call log; duplicates are dropped
    async fn publish_call(&self, code: &str, number: u8) -> Result<(), BridgeError>;

    /// Announce the winner; only the first announcement sticks
    async fn publish_winner(&self, code: &str, name: &str) -> Result<(), BridgeError>;

    /// Move the room between waiting and playing
    async fn set_room_status(&self, code: &str, status: RoomStatus) -> Result<(), BridgeError>;

    /// Subscribe to the room's ordered event stream
    async fn subscribe(&self, code: &str) -> Result<broadcast::Receiver<RoomEvent>, BridgeError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_event_serialization_tags() {
        let event = RoomEvent::Call { number: 7, seq: 0 };
        let json = serde_json::to_string(&event).unwrap();
        assert!(json.contains("\"type\":\"call\""));
        assert!(json.contains("\"number\":7"));
    }

    #[test]
    fn test_status_serialization() {
        let event = RoomEvent::Status {
            status: RoomStatus::Playing,
        };
        let json = serde_json::to_string(&event).unwrap();
        assert!(json.contains("\"playing\""));
    }

    #[test]
    fn test_bridge_error_display() {
        let error = BridgeError::RoomFull {
            code: "1234".to_string(),
            limit: 2,
        };
        assert_eq!(error.to_string(), "Room 1234 is full (2 players)");
    }
}
