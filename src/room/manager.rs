//! In-process room registry backing the realtime bridge
//!
//! One broadcast channel per room carries every event in publish order;
//! the append-only call log plus set-once winner give the ordering and
//! at-most-once guarantees the game core relies on.

use crate::bridge::{
    BridgeError, JoinedRoom, RealtimeBridge, RoomEvent, RoomStatus, RosterEntry,
};
use crate::config::RoomConfig;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use dashmap::DashMap;
use rand::Rng;
use serde::Serialize;
use std::collections::HashSet;
use std::sync::Mutex;
use std::sync::Arc;
use tokio::sync::broadcast;
use tracing::{debug, info, warn};
use uuid::Uuid;

/// Mutable state of a single room, guarded as one unit so event publish
/// order always matches state mutation order.
#[derive(Debug)]
struct RoomState {
    status: RoomStatus,
    players: Vec<RosterEntry>,
    calls: Vec<u8>,
    called: HashSet<u8>,
    winner: Option<String>,
}

/// A live room: shared state plus its event fan-out channel
pub struct Room {
    code: String,
    limit: usize,
    created_at: DateTime<Utc>,
    state: Mutex<RoomState>,
    tx: broadcast::Sender<RoomEvent>,
}

impl Room {
    fn new(code: String, limit: usize, event_buffer: usize) -> Self {
        let (tx, _rx) = broadcast::channel(event_buffer);
        Self {
            code,
            limit,
            created_at: Utc::now(),
            state: Mutex::new(RoomState {
                status: RoomStatus::Waiting,
                players: Vec::new(),
                calls: Vec::new(),
                called: HashSet::new(),
                winner: None,
            }),
            tx,
        }
    }

    fn broadcast(&self, event: RoomEvent) {
        if self.tx.send(event).is_err() {
            debug!("Room {} has no subscribers", self.code);
        }
    }

    /// Events a late subscriber needs to catch up: status, roster, the
    /// call log in order, and the winner if one is already set.
    pub fn backlog(&self) -> Vec<RoomEvent> {
        let state = self.state.lock().expect("room lock");
        let mut events = vec![
            RoomEvent::Status {
                status: state.status,
            },
            RoomEvent::Roster {
                players: state.players.clone(),
            },
        ];
        for (seq, &number) in state.calls.iter().enumerate() {
            events.push(RoomEvent::Call { number, seq });
        }
        if let Some(name) = &state.winner {
            events.push(RoomEvent::Winner { name: name.clone() });
        }
        events
    }
}

/// Point-in-time view of a room for the HTTP status endpoint
#[derive(Debug, Clone, Serialize)]
pub struct RoomSnapshot {
    pub code: String,
    pub status: RoomStatus,
    pub players: Vec<RosterEntry>,
    pub call_count: usize,
    pub limit: usize,
    pub winner: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// Thread-safe registry of live rooms keyed by 4-digit code
pub struct RoomManager {
    rooms: DashMap<String, Arc<Room>>,
    config: RoomConfig,
}

impl RoomManager {
    pub fn new(config: RoomConfig) -> Self {
        Self {
            rooms: DashMap::new(),
            config,
        }
    }

    pub fn room_count(&self) -> usize {
        self.rooms.len()
    }

    /// Validate and fetch a room by code
    fn room(&self, code: &str) -> Result<Arc<Room>, BridgeError> {
        validate_code(code)?;
        self.rooms
            .get(code)
            .map(|entry| Arc::clone(entry.value()))
            .ok_or_else(|| BridgeError::RoomNotFound(code.to_string()))
    }

    /// Snapshot for the status endpoint
    pub fn snapshot(&self, code: &str) -> Result<RoomSnapshot, BridgeError> {
        let room = self.room(code)?;
        let state = room.state.lock().expect("room lock");
        Ok(RoomSnapshot {
            code: room.code.clone(),
            status: state.status,
            players: state.players.clone(),
            call_count: state.calls.len(),
            limit: room.limit,
            winner: state.winner.clone(),
            created_at: room.created_at,
        })
    }

    /// Backlog for a late subscriber (used by the WebSocket handler)
    pub fn backlog(&self, code: &str) -> Result<Vec<RoomEvent>, BridgeError> {
        Ok(self.room(code)?.backlog())
    }

    fn generate_code(&self) -> Result<String, BridgeError> {
        let mut rng = rand::thread_rng();
        for _ in 0..self.config.code_retry_limit {
            let code = rng.gen_range(1000..=9999).to_string();
            if !self.rooms.contains_key(&code) {
                return Ok(code);
            }
        }
        Err(BridgeError::ConnectionUnavailable(
            "No free room codes".to_string(),
        ))
    }

    /// Drop a room and all its subscriptions
    pub fn close_room(&self, code: &str) {
        if self.rooms.remove(code).is_some() {
            info!("Room {} closed", code);
        }
    }
}

/// Room codes are 4+ digit numeric strings, as generated by the host
fn validate_code(code: &str) -> Result<(), BridgeError> {
    if code.len() < 4 || !code.chars().all(|c| c.is_ascii_digit()) {
        return Err(BridgeError::InvalidRoomCode(code.to_string()));
    }
    Ok(())
}

#[async_trait]
impl RealtimeBridge for RoomManager {
    async fn create_room(&self, limit: usize) -> Result<String, BridgeError> {
        let limit = limit
            .max(2)
            .min(self.config.max_player_limit);
        let code = self.generate_code()?;
        let room = Arc::new(Room::new(code.clone(), limit, self.config.event_buffer));
        self.rooms.insert(code.clone(), room);
        info!("Room {} created (limit {})", code, limit);
        Ok(code)
    }

    async fn join_room(&self, code: &str, name: &str) -> Result<JoinedRoom, BridgeError> {
        let room = self.room(code)?;
        let events = room.tx.subscribe();

        let player_id = Uuid::new_v4().to_string();
        {
            let mut state = room.state.lock().expect("room lock");
            if state.status != RoomStatus::Waiting {
                return Err(BridgeError::AlreadyStarted(code.to_string()));
            }
            if state.players.len() >= room.limit {
                return Err(BridgeError::RoomFull {
                    code: code.to_string(),
                    limit: room.limit,
                });
            }
            let name = if name.trim().is_empty() {
                "Anonymous".to_string()
            } else {
                name.trim().to_string()
            };
            state.players.push(RosterEntry {
                id: player_id.clone(),
                name,
                ready: false,
            });
            // Broadcast under the lock; send never blocks and this keeps
            // delivery order identical to mutation order
            room.broadcast(RoomEvent::Roster {
                players: state.players.clone(),
            });
        }

        info!("Player {} joined room {}", player_id, code);
        Ok(JoinedRoom { player_id, events })
    }

    async fn publish_player(
        &self,
        code: &str,
        player_id: &str,
        ready: bool,
    ) -> Result<(), BridgeError> {
        let room = self.room(code)?;
        let mut state = room.state.lock().expect("room lock");
        match state.players.iter_mut().find(|p| p.id == player_id) {
            Some(player) => player.ready = ready,
            None => {
                warn!("Unknown player {} in room {}", player_id, code);
                return Ok(());
            }
        }
        room.broadcast(RoomEvent::Roster {
            players: state.players.clone(),
        });
        Ok(())
    }

    async fn publish_call(&self, code: &str, number: u8) -> Result<(), BridgeError> {
        let room = self.room(code)?;
        let mut state = room.state.lock().expect("room lock");
        // A number is called at most once per room
        if !state.called.insert(number) {
            debug!("Room {}: duplicate call {} dropped", code, number);
            return Ok(());
        }
        state.calls.push(number);
        let seq = state.calls.len() - 1;
        room.broadcast(RoomEvent::Call { number, seq });
        Ok(())
    }

    async fn publish_winner(&self, code: &str, name: &str) -> Result<(), BridgeError> {
        let room = self.room(code)?;
        {
            let mut state = room.state.lock().expect("room lock");
            // First announcement wins; later ones are dropped
            if state.winner.is_some() {
                return Ok(());
            }
            state.winner = Some(name.to_string());
            room.broadcast(RoomEvent::Winner {
                name: name.to_string(),
            });
        }
        info!("Room {}: winner {}", code, name);
        Ok(())
    }

    async fn set_room_status(&self, code: &str, status: RoomStatus) -> Result<(), BridgeError> {
        let room = self.room(code)?;
        {
            let mut state = room.state.lock().expect("room lock");
            if state.status == status {
                return Ok(());
            }
            state.status = status;
            room.broadcast(RoomEvent::Status { status });
        }
        info!("Room {}: status -> {}", code, status);
        Ok(())
    }

    async fn subscribe(&self, code: &str) -> Result<broadcast::Receiver<RoomEvent>, BridgeError> {
        Ok(self.room(code)?.tx.subscribe())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn manager() -> RoomManager {
        RoomManager::new(RoomConfig::default())
    }

    #[tokio::test]
    async fn test_create_generates_numeric_code() {
        let manager = manager();
        let code = manager.create_room(2).await.unwrap();
        assert!(code.len() >= 4);
        assert!(code.chars().all(|c| c.is_ascii_digit()));
        assert_eq!(manager.room_count(), 1);
    }

    #[tokio::test]
    async fn test_join_unknown_room() {
        let manager = manager();
        let result = manager.join_room("9999", "Alice").await;
        assert!(matches!(result, Err(BridgeError::RoomNotFound(_))));
    }

    #[tokio::test]
    async fn test_short_code_rejected() {
        let manager = manager();
        let result = manager.join_room("12", "Alice").await;
        assert!(matches!(result, Err(BridgeError::InvalidRoomCode(_))));
    }

    #[tokio::test]
    async fn test_room_full() {
        let manager = manager();
        let code = manager.create_room(2).await.unwrap();
        manager.join_room(&code, "Alice").await.unwrap();
        manager.join_room(&code, "Bob").await.unwrap();

        let result = manager.join_room(&code, "Carol").await;
        assert!(matches!(result, Err(BridgeError::RoomFull { .. })));
    }

    #[tokio::test]
    async fn test_join_after_start_rejected() {
        let manager = manager();
        let code = manager.create_room(4).await.unwrap();
        manager.join_room(&code, "Alice").await.unwrap();
        manager
            .set_room_status(&code, RoomStatus::Playing)
            .await
            .unwrap();

        let result = manager.join_room(&code, "Bob").await;
        assert!(matches!(result, Err(BridgeError::AlreadyStarted(_))));
    }

    #[tokio::test]
    async fn test_calls_delivered_in_publish_order() {
        let manager = manager();
        let code = manager.create_room(2).await.unwrap();
        let mut events = manager.subscribe(&code).await.unwrap();

        for n in [5u8, 9, 1] {
            manager.publish_call(&code, n).await.unwrap();
        }

        for (expected_seq, expected_number) in [(0usize, 5u8), (1, 9), (2, 1)] {
            match events.recv().await.unwrap() {
                RoomEvent::Call { number, seq } => {
                    assert_eq!(number, expected_number);
                    assert_eq!(seq, expected_seq);
                }
                other => panic!("unexpected event {:?}", other),
            }
        }
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 8)]
    async fn test_concurrent_calls_delivered_in_seq_order() {
        let manager = Arc::new(manager());
        let code = manager.create_room(2).await.unwrap();
        let mut events = manager.subscribe(&code).await.unwrap();

        let mut handles = Vec::new();
        for n in 1..=20u8 {
            let manager = Arc::clone(&manager);
            let code = code.clone();
            handles.push(tokio::spawn(async move {
                manager.publish_call(&code, n).await.unwrap();
            }));
        }
        for handle in handles {
            handle.await.unwrap();
        }

        // The stream carries seq 0..20 in order regardless of publisher
        // interleaving: the send happens under the room lock
        for expected_seq in 0..20usize {
            match events.recv().await.unwrap() {
                RoomEvent::Call { seq, .. } => assert_eq!(seq, expected_seq),
                other => panic!("unexpected event {:?}", other),
            }
        }
    }

    #[tokio::test]
    async fn test_duplicate_call_dropped() {
        let manager = manager();
        let code = manager.create_room(2).await.unwrap();
        manager.publish_call(&code, 7).await.unwrap();
        manager.publish_call(&code, 7).await.unwrap();

        let snapshot = manager.snapshot(&code).unwrap();
        assert_eq!(snapshot.call_count, 1);
    }

    #[tokio::test]
    async fn test_winner_set_once() {
        let manager = manager();
        let code = manager.create_room(2).await.unwrap();
        manager.publish_winner(&code, "Alice").await.unwrap();
        manager.publish_winner(&code, "Bob").await.unwrap();

        let snapshot = manager.snapshot(&code).unwrap();
        assert_eq!(snapshot.winner.as_deref(), Some("Alice"));
    }

    #[tokio::test]
    async fn test_backlog_replays_history() {
        let manager = manager();
        let code = manager.create_room(2).await.unwrap();
        manager.join_room(&code, "Alice").await.unwrap();
        manager
            .set_room_status(&code, RoomStatus::Playing)
            .await
            .unwrap();
        manager.publish_call(&code, 3).await.unwrap();

        let backlog = manager.backlog(&code).unwrap();
        assert!(matches!(
            backlog[0],
            RoomEvent::Status {
                status: RoomStatus::Playing
            }
        ));
        assert!(matches!(backlog[1], RoomEvent::Roster { .. }));
        assert!(matches!(backlog[2], RoomEvent::Call { number: 3, seq: 0 }));
    }

    #[tokio::test]
    async fn test_ready_flag_broadcast() {
        let manager = manager();
        let code = manager.create_room(2).await.unwrap();
        let joined = manager.join_room(&code, "Alice").await.unwrap();
        let mut events = manager.subscribe(&code).await.unwrap();

        manager
            .publish_player(&code, &joined.player_id, true)
            .await
            .unwrap();

        match events.recv().await.unwrap() {
            RoomEvent::Roster { players } => {
                assert!(players[0].ready);
            }
            other => panic!("unexpected event {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_close_room() {
        let manager = manager();
        let code = manager.create_room(2).await.unwrap();
        manager.close_room(&code);
        assert!(manager.snapshot(&code).is_err());
    }
}
